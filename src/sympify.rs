//! Conversion of native values into expressions.

use log::debug;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::context::Context;
use crate::error::{Result, SymError};
use crate::node::Constant;
use crate::number::Number;
use crate::reference::ExprRef;

/// Parser for expression text that is not a plain literal.
pub trait ExprParser {
    fn parse(&self, ctx: &Context, text: &str) -> std::result::Result<ExprRef, String>;
}

/// Values that can be turned into an expression.
pub trait Sympify {
    fn sympify(self, ctx: &Context) -> Result<ExprRef>;
}

/// A complex literal `re + im*I`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl Context {
    pub fn sympify(&self, value: impl Sympify) -> Result<ExprRef> {
        value.sympify(self)
    }

    /// Install the parser used for text that is not a literal.
    pub fn set_parser(&self, parser: Box<dyn ExprParser>) {
        *self.parser.borrow_mut() = Some(parser);
    }

    fn parse_text(&self, text: &str) -> Result<ExprRef> {
        debug!("sympify(text = {:?})", text);
        let t = text.trim();

        if let Ok(n) = t.parse::<BigInt>() {
            return Ok(self.big_integer(n));
        }
        if let Some((p, q)) = t.split_once('/') {
            if let (Ok(p), Ok(q)) = (p.trim().parse::<BigInt>(), q.trim().parse::<BigInt>()) {
                return Number::rational(p, q)
                    .map(|n| self.number(n))
                    .ok_or_else(|| SymError::conversion(text, "zero denominator"));
            }
        }
        if let Some(e) = self.parse_name(t) {
            return Ok(e);
        }
        if let Ok(x) = t.parse::<f64>() {
            return Ok(self.float(x));
        }

        let parser = self.parser.borrow();
        match parser.as_ref() {
            Some(p) => p.parse(self, text).map_err(|cause| SymError::conversion(text, cause)),
            None => Err(SymError::conversion(text, "no expression parser registered")),
        }
    }

    fn parse_name(&self, t: &str) -> Option<ExprRef> {
        let mut chars = t.chars();
        let first = chars.next()?;
        if !(first.is_alphabetic() || first == '_') || !chars.all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        let e = match t {
            "True" => self.boolean(true),
            "False" => self.boolean(false),
            _ => match Constant::ALL.iter().find(|c| c.to_string() == t) {
                Some(&c) => self.constant(c),
                None => self.symbol(t),
            },
        };
        Some(e)
    }
}

impl Sympify for ExprRef {
    fn sympify(self, _ctx: &Context) -> Result<ExprRef> {
        Ok(self)
    }
}

impl Sympify for i64 {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.integer(self))
    }
}

impl Sympify for i32 {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.integer(self as i64))
    }
}

impl Sympify for BigInt {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.big_integer(self))
    }
}

impl Sympify for BigRational {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.number(Number::Rational(self)))
    }
}

impl Sympify for f64 {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.float(self))
    }
}

impl Sympify for bool {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.boolean(self))
    }
}

impl Sympify for Complex {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        let re = ctx.float(self.re);
        if self.im == 0.0 {
            return Ok(re);
        }
        let im = ctx.mul(ctx.float(self.im), ctx.imaginary_unit());
        Ok(ctx.add(re, im))
    }
}

impl<A: Sympify, B: Sympify> Sympify for (A, B) {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        let a = self.0.sympify(ctx)?;
        let b = self.1.sympify(ctx)?;
        Ok(ctx.interval(a, b))
    }
}

impl Sympify for &str {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        ctx.parse_text(self)
    }
}

impl Sympify for String {
    fn sympify(self, ctx: &Context) -> Result<ExprRef> {
        ctx.parse_text(&self)
    }
}
