//! Additive accumulation: `Σ coeff·base`.

use std::collections::HashMap;

use log::debug;

use crate::cache::Constructor;
use crate::context::Context;
use crate::error::{Result, SymError};
use crate::kind::KindId;
use crate::node::Node;
use crate::number::Number;
use crate::reference::ExprRef;

/// Mutable accumulator for a sum.
///
/// Numbers are folded into a running scalar and never become keys. Sums fed
/// into the builder are distributed, so nested sums flatten. The builder is
/// consumed by [`finish`][SumBuilder::finish], which yields the canonical node.
pub struct SumBuilder<'a> {
    ctx: &'a Context,
    terms: HashMap<ExprRef, ExprRef>,
    scalar: Number,
}

impl<'a> SumBuilder<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            terms: HashMap::new(),
            scalar: Number::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.scalar.is_zero()
    }

    /// Add `coeff·term`.
    pub fn update(&mut self, term: ExprRef, coeff: ExprRef) -> &mut Self {
        let ctx = self.ctx;
        let node = ctx.node(term);
        match (&*node, ctx.as_number(coeff)) {
            (Node::Number(n), Some(c)) => {
                self.scalar = self.scalar.add(&n.mul(&c));
            }
            (Node::Number(_), None) => {
                let product = ctx.mul(term, coeff);
                self.update(product, ctx.one);
            }
            (Node::Sum(terms), _) => {
                for &(k, v) in terms {
                    let c = ctx.mul(v, coeff);
                    self.update(k, c);
                }
            }
            _ => match self.terms.get(&term) {
                Some(&old) => {
                    let c = ctx.add(old, coeff);
                    self.terms.insert(term, c);
                }
                None => {
                    self.terms.insert(term, coeff);
                }
            },
        }
        self
    }

    /// Fill an empty builder from a raw term map.
    pub fn load(&mut self, terms: impl IntoIterator<Item = (ExprRef, ExprRef)>) -> Result<&mut Self> {
        if !self.is_empty() {
            return Err(SymError::InvariantViolation(
                "raw term map loaded into a non-empty sum".to_string(),
            ));
        }
        for (k, v) in terms {
            self.update(k, v);
        }
        Ok(self)
    }

    /// Freeze into a canonical node.
    pub fn finish(mut self) -> ExprRef {
        let ctx = self.ctx;
        self.terms.retain(|_, c| !ctx.is_zero(*c));
        if !self.scalar.is_zero() {
            self.terms.insert(ctx.one, ctx.number(self.scalar.clone()));
        }

        if self.terms.is_empty() {
            debug!("Sum() => 0");
            return ctx.zero;
        }
        if self.terms.len() == 1 {
            if let Some((&k, &v)) = self.terms.iter().next() {
                if k == ctx.one {
                    debug!("Sum({{1: c}}) => c");
                    return v;
                }
                if v == ctx.one {
                    debug!("Sum({{x: 1}}) => x");
                    return k;
                }
            }
        }
        ctx.intern_terms(KindId::SUM, self.terms.into_iter().collect())
    }
}

impl Context {
    pub fn add(&self, a: ExprRef, b: ExprRef) -> ExprRef {
        debug!("add(a = {}, b = {})", a, b);

        if let (Some(x), Some(y)) = (self.as_number(a), self.as_number(b)) {
            return self.number(x.add(&y));
        }
        if self.is_zero(a) {
            return b;
        }
        if self.is_zero(b) {
            return a;
        }

        self.get_or_build(Constructor::Add, Some(&[a, b]), || {
            let mut sum = SumBuilder::new(self);
            sum.update(a, self.one).update(b, self.one);
            sum.finish()
        })
    }

    pub fn add_many(&self, terms: impl IntoIterator<Item = ExprRef>) -> ExprRef {
        let terms: Vec<ExprRef> = terms.into_iter().collect();
        debug!("add_many(terms = {:?})", terms);

        self.get_or_build(Constructor::Add, Some(&terms), || {
            let mut sum = SumBuilder::new(self);
            for &t in &terms {
                sum.update(t, self.one);
            }
            sum.finish()
        })
    }

    pub fn neg(&self, a: ExprRef) -> ExprRef {
        self.mul(self.minus_one, a)
    }

    pub fn sub(&self, a: ExprRef, b: ExprRef) -> ExprRef {
        let nb = self.neg(b);
        self.add(a, nb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_empty_sum_is_zero() {
        let ctx = Context::default();
        assert_eq!(SumBuilder::new(&ctx).finish(), ctx.zero);
    }

    #[test]
    fn test_zero_coefficient_is_dropped() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let mut sum = SumBuilder::new(&ctx);
        sum.update(x, ctx.zero);
        assert_eq!(sum.finish(), ctx.zero);
    }

    #[test]
    fn test_singleton_collapses() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let mut sum = SumBuilder::new(&ctx);
        sum.update(x, ctx.one);
        assert_eq!(sum.finish(), x);

        let mut sum = SumBuilder::new(&ctx);
        sum.update(ctx.integer(7), ctx.one);
        assert_eq!(sum.finish(), ctx.integer(7));
    }

    #[test]
    fn test_like_terms_combine() {
        let ctx = Context::default();
        let x = ctx.symbol("x");

        let mut three_times = SumBuilder::new(&ctx);
        three_times.update(x, ctx.one).update(x, ctx.one).update(x, ctx.one);
        let a = three_times.finish();

        let mut once = SumBuilder::new(&ctx);
        once.update(x, ctx.integer(3));
        let b = once.finish();

        assert_eq!(a, b);
        assert_eq!(ctx.terms(a), Some(vec![(x, ctx.integer(3))]));
    }

    #[test]
    fn test_insertion_order_is_irrelevant() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");

        let mut s1 = SumBuilder::new(&ctx);
        s1.update(x, ctx.integer(3)).update(y, ctx.one).update(x, ctx.integer(2));
        let mut s2 = SumBuilder::new(&ctx);
        s2.update(x, ctx.integer(2)).update(x, ctx.integer(3)).update(y, ctx.one);
        assert_eq!(s1.finish(), s2.finish());
    }

    #[test]
    fn test_nested_sums_flatten() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let two_x = ctx.mul(ctx.integer(2), x);
        let three_x = ctx.mul(ctx.integer(3), x);

        let mut sum = SumBuilder::new(&ctx);
        sum.update(two_x, ctx.integer(4));
        assert_eq!(sum.finish(), ctx.mul(ctx.integer(8), x));

        let mut sum = SumBuilder::new(&ctx);
        sum.update(three_x, ctx.one).update(two_x, ctx.integer(4));
        assert_eq!(sum.finish(), ctx.mul(ctx.integer(11), x));
    }

    #[test]
    fn test_scalars_never_become_keys() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let s = ctx.add_many([ctx.integer(2), x, ctx.integer(3)]);
        let terms = ctx.terms(s).unwrap();
        assert_eq!(terms.len(), 2);
        assert!(terms.contains(&(ctx.one, ctx.integer(5))));
        assert!(terms.contains(&(x, ctx.one)));
    }

    #[test]
    fn test_load_into_non_empty_builder() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let mut sum = SumBuilder::new(&ctx);
        assert!(sum.load([(x, ctx.integer(2))]).is_ok());
        assert!(matches!(
            sum.load([(x, ctx.one)]),
            Err(SymError::InvariantViolation(_))
        ));
        assert_eq!(sum.finish(), ctx.mul(ctx.integer(2), x));
    }

    #[test]
    fn test_add_numbers() {
        let ctx = Context::default();
        let r = ctx.add(ctx.rational(1, 2).unwrap(), ctx.rational(1, 2).unwrap());
        assert_eq!(r, ctx.one);
    }

    #[test]
    fn test_sub_cancels() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let s = ctx.add(x, y);
        assert_eq!(ctx.sub(s, y), x);
        assert_eq!(ctx.sub(x, x), ctx.zero);
    }

    #[test]
    fn test_add_is_cached_by_arguments() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let a = ctx.add(x, y);
        let b = ctx.add(x, y);
        let c = ctx.add(y, x);
        assert_eq!(a, b);
        assert_eq!(a, c);
        let stats = ctx.cache_stats();
        let add = stats
            .iter()
            .find(|s| s.constructor == Constructor::Add)
            .unwrap();
        assert_eq!(add.hits, 1);
        assert_eq!(add.entries, 2);
    }
}
