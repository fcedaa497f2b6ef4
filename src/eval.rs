//! Operator syntax for building expressions.
//!
//! Operators on [`ExprRef`] only record the operation; the context performs it:
//!
//! ```
//! use sym_rs::context::Context;
//!
//! let ctx = Context::default();
//! let a = ctx.symbol("a");
//! let b = ctx.symbol("b");
//! let nb = ctx.eval(!b).unwrap();
//! let f = ctx.eval(a & nb).unwrap();
//! assert_eq!(ctx.tostr(f), "And(a, Not(b))");
//! ```

use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Not, Sub};

use crate::context::Context;
use crate::error::Result;
use crate::reference::ExprRef;

pub struct AndOp {
    f: ExprRef,
    g: ExprRef,
}

impl BitAnd for ExprRef {
    type Output = AndOp;

    fn bitand(self, rhs: Self) -> Self::Output {
        AndOp { f: self, g: rhs }
    }
}

pub struct OrOp {
    f: ExprRef,
    g: ExprRef,
}

impl BitOr for ExprRef {
    type Output = OrOp;

    fn bitor(self, rhs: Self) -> Self::Output {
        OrOp { f: self, g: rhs }
    }
}

pub struct XorOp {
    f: ExprRef,
    g: ExprRef,
}

impl BitXor for ExprRef {
    type Output = XorOp;

    fn bitxor(self, rhs: Self) -> Self::Output {
        XorOp { f: self, g: rhs }
    }
}

pub struct NotOp {
    f: ExprRef,
}

impl Not for ExprRef {
    type Output = NotOp;

    fn not(self) -> Self::Output {
        NotOp { f: self }
    }
}

pub struct AddOp {
    f: ExprRef,
    g: ExprRef,
}

impl Add for ExprRef {
    type Output = AddOp;

    fn add(self, rhs: Self) -> Self::Output {
        AddOp { f: self, g: rhs }
    }
}

pub struct SubOp {
    f: ExprRef,
    g: ExprRef,
}

impl Sub for ExprRef {
    type Output = SubOp;

    fn sub(self, rhs: Self) -> Self::Output {
        SubOp { f: self, g: rhs }
    }
}

pub struct MulOp {
    f: ExprRef,
    g: ExprRef,
}

impl Mul for ExprRef {
    type Output = MulOp;

    fn mul(self, rhs: Self) -> Self::Output {
        MulOp { f: self, g: rhs }
    }
}

pub trait Eval {
    fn eval(&self, ctx: &Context) -> Result<ExprRef>;
}

impl Context {
    pub fn eval(&self, value: impl Eval) -> Result<ExprRef> {
        value.eval(self)
    }
}

impl Eval for ExprRef {
    fn eval(&self, _ctx: &Context) -> Result<ExprRef> {
        Ok(*self)
    }
}

impl Eval for AndOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        ctx.and([self.f, self.g])
    }
}

impl Eval for OrOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        ctx.or([self.f, self.g])
    }
}

impl Eval for XorOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        ctx.xor([self.f, self.g])
    }
}

impl Eval for NotOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        ctx.not(self.f)
    }
}

impl Eval for AddOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.add(self.f, self.g))
    }
}

impl Eval for SubOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.sub(self.f, self.g))
    }
}

impl Eval for MulOp {
    fn eval(&self, ctx: &Context) -> Result<ExprRef> {
        Ok(ctx.mul(self.f, self.g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_eval_ref() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        assert_eq!(ctx.eval(x).unwrap(), x);
    }

    #[test]
    fn test_eval_not() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        assert_eq!(ctx.eval(!x).unwrap(), ctx.not(x).unwrap());
    }

    #[test]
    fn test_eval_and() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let f = ctx.and([x, y]).unwrap();
        assert_eq!(ctx.eval(x & y).unwrap(), f);
    }

    #[test]
    fn test_eval_or() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let f = ctx.or([x, y]).unwrap();
        assert_eq!(ctx.eval(x | y).unwrap(), f);
    }

    #[test]
    fn test_eval_xor() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let f = ctx.xor([x, y]).unwrap();
        assert_eq!(ctx.eval(x ^ y).unwrap(), f);
    }

    #[test]
    fn test_eval_arithmetic() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let two = ctx.integer(2);
        assert_eq!(ctx.eval(x + x).unwrap(), ctx.mul(two, x));
        assert_eq!(ctx.eval(x - x).unwrap(), ctx.zero);
        assert_eq!(ctx.eval(x * x).unwrap(), ctx.pow(x, two));
    }

    #[test]
    fn test_eval_rejects_non_boolean() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let s = ctx.add(x, ctx.one);
        assert!(ctx.eval(s & x).is_err());
    }
}
