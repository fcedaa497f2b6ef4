//! Multiplicative accumulation: `Π base^exp`.

use std::collections::HashMap;

use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use crate::cache::Constructor;
use crate::context::Context;
use crate::error::{Result, SymError};
use crate::kind::KindId;
use crate::node::{Constant, Node};
use crate::number::Number;
use crate::reference::ExprRef;
use crate::sum::SumBuilder;

/// Mutable accumulator for a product.
///
/// Numeric powers that evaluate exactly are folded into a running scalar.
/// Products fed into the builder are distributed, and a one-term sum
/// `c·k` is split into `k` and `c`.
pub struct ProductBuilder<'a> {
    ctx: &'a Context,
    terms: HashMap<ExprRef, ExprRef>,
    scalar: Number,
}

impl<'a> ProductBuilder<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            terms: HashMap::new(),
            scalar: Number::one(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.scalar.is_one()
    }

    /// Multiply by `base^exp`.
    pub fn update(&mut self, base: ExprRef, exp: ExprRef) -> &mut Self {
        let ctx = self.ctx;
        let node = ctx.node(base);
        match &*node {
            Node::Number(_) if base == ctx.one => {}
            Node::Number(n) => {
                let folded = ctx.as_number(exp).and_then(|e| n.pow(&e));
                match folded {
                    Some(value) => self.scalar = self.scalar.mul(&value),
                    None => self.combine(base, exp),
                }
            }
            Node::Sum(terms) if terms.len() == 1 => {
                let (k, v) = terms[0];
                self.update(k, exp).update(v, exp);
            }
            Node::Product(terms) => {
                for &(k, v) in terms {
                    let e = ctx.mul(v, exp);
                    self.update(k, e);
                }
            }
            _ => self.combine(base, exp),
        }
        self
    }

    fn combine(&mut self, base: ExprRef, exp: ExprRef) {
        match self.terms.get(&base) {
            Some(&old) => {
                let e = self.ctx.add(old, exp);
                self.terms.insert(base, e);
            }
            None => {
                self.terms.insert(base, exp);
            }
        }
    }

    /// Fill an empty builder from a raw term map.
    pub fn load(&mut self, terms: impl IntoIterator<Item = (ExprRef, ExprRef)>) -> Result<&mut Self> {
        if !self.is_empty() {
            return Err(SymError::InvariantViolation(
                "raw term map loaded into a non-empty product".to_string(),
            ));
        }
        for (k, v) in terms {
            self.update(k, v);
        }
        Ok(self)
    }

    /// Evaluate every power that can be evaluated, until nothing changes.
    fn settle(&mut self) {
        let ctx = self.ctx;
        'restart: loop {
            self.terms.retain(|_, e| !ctx.is_zero(*e));

            let entries: Vec<(ExprRef, ExprRef)> = self.terms.iter().map(|(&k, &v)| (k, v)).collect();
            for (k, v) in entries {
                let Some(r) = ctx.try_power(k, v) else {
                    continue;
                };
                self.terms.remove(&k);
                match ctx.as_number(r) {
                    Some(n) => self.scalar = self.scalar.mul(&n),
                    None => {
                        debug!("Product: {}**{} => {}, restarting", k, v, r);
                        self.update(r, ctx.one);
                        continue 'restart;
                    }
                }
            }

            // The scalar may itself be a base, as in `2 * 2**x`.
            if !self.scalar.is_one() {
                let scalar = ctx.number(self.scalar.clone());
                if let Some(&e) = self.terms.get(&scalar) {
                    let e = ctx.add(e, ctx.one);
                    self.terms.insert(scalar, e);
                    self.scalar = Number::one();
                    continue 'restart;
                }
            }
            break;
        }
    }

    /// Freeze into a canonical node.
    pub fn finish(mut self) -> ExprRef {
        let ctx = self.ctx;
        self.settle();

        if self.terms.is_empty() {
            debug!("Product() => scalar");
            return ctx.number(self.scalar);
        }

        let single = match self.terms.iter().next() {
            Some((&k, &v)) if self.terms.len() == 1 && v == ctx.one => Some(k),
            _ => None,
        };
        let object = match single {
            Some(k) => k,
            None => ctx.intern_terms(KindId::PRODUCT, self.terms.into_iter().collect()),
        };
        if self.scalar.is_one() {
            return object;
        }

        debug!("Product: scalar coefficient {} on {}", self.scalar, object);
        let mut sum = SumBuilder::new(ctx);
        sum.update(object, ctx.number(self.scalar));
        sum.finish()
    }
}

impl Context {
    pub fn mul(&self, a: ExprRef, b: ExprRef) -> ExprRef {
        debug!("mul(a = {}, b = {})", a, b);

        if let (Some(x), Some(y)) = (self.as_number(a), self.as_number(b)) {
            return self.number(x.mul(&y));
        }
        if a == self.one {
            return b;
        }
        if b == self.one {
            return a;
        }

        self.get_or_build(Constructor::Mul, Some(&[a, b]), || {
            let mut product = ProductBuilder::new(self);
            product.update(a, self.one).update(b, self.one);
            product.finish()
        })
    }

    pub fn mul_many(&self, factors: impl IntoIterator<Item = ExprRef>) -> ExprRef {
        let factors: Vec<ExprRef> = factors.into_iter().collect();
        debug!("mul_many(factors = {:?})", factors);

        self.get_or_build(Constructor::Mul, Some(&factors), || {
            let mut product = ProductBuilder::new(self);
            for &f in &factors {
                product.update(f, self.one);
            }
            product.finish()
        })
    }

    pub fn pow(&self, base: ExprRef, exp: ExprRef) -> ExprRef {
        debug!("pow(base = {}, exp = {})", base, exp);

        if self.is_zero(exp) {
            debug!("pow(X,0) => 1");
            return self.one;
        }
        if exp == self.one {
            debug!("pow(X,1) => X");
            return base;
        }
        if base == self.one {
            debug!("pow(1,X) => 1");
            return self.one;
        }
        if let (Some(b), Some(e)) = (self.as_number(base), self.as_number(exp)) {
            if let Some(r) = b.pow(&e) {
                return self.number(r);
            }
        }

        self.get_or_build(Constructor::Pow, Some(&[base, exp]), || {
            let mut product = ProductBuilder::new(self);
            product.update(base, exp);
            product.finish()
        })
    }

    pub fn div(&self, a: ExprRef, b: ExprRef) -> ExprRef {
        let inv = self.pow(b, self.minus_one);
        self.mul(a, inv)
    }

    pub fn sqrt(&self, a: ExprRef) -> ExprRef {
        let half = self.number(Number::Rational(BigRational::new(BigInt::from(1), BigInt::from(2))));
        self.pow(a, half)
    }

    /// Evaluate `base^exp` when a rule applies.
    ///
    /// `None` means there is nothing to evaluate and the power stays as it is.
    pub fn try_power(&self, base: ExprRef, exp: ExprRef) -> Option<ExprRef> {
        let node = self.node(base);
        match &*node {
            Node::Number(_) if base == self.one => Some(self.one),
            Node::Number(n) => {
                let e = self.as_number(exp)?;
                if n.is_zero() && e.is_negative() {
                    return Some(self.complex_infinity());
                }
                n.pow(&e).map(|r| self.number(r))
            }
            Node::Constant(c) if exp != self.one => self.constant_power(*c, exp),
            _ => None,
        }
    }

    fn constant_power(&self, c: Constant, exp: ExprRef) -> Option<ExprRef> {
        let e = self.node(exp);
        match c {
            Constant::NaN => Some(self.nan()),
            Constant::ImaginaryUnit => {
                let k = e.as_number()?.as_integer()?;
                match k.mod_floor(&BigInt::from(4)).to_u8()? {
                    0 => Some(self.one),
                    1 => Some(self.imaginary_unit()),
                    2 => Some(self.minus_one),
                    _ => Some(self.neg(self.imaginary_unit())),
                }
            }
            Constant::Infinity | Constant::ComplexInfinity => match &*e {
                Node::Constant(Constant::NaN) => Some(self.nan()),
                Node::Constant(Constant::Infinity) if c == Constant::Infinity => Some(self.infinity()),
                Node::Number(n) if n.is_positive() => Some(self.constant(c)),
                Node::Number(n) if n.is_negative() => Some(self.zero),
                _ => None,
            },
            _ => None,
        }
    }
}
