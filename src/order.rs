//! Total order over expressions.
//!
//! Nodes of different kinds compare by the registry's kind order. Nodes of the
//! same kind compare by contents, with term maps and commutative operand sets
//! first sorted by this same order. Handles are never used as tie-breakers, so
//! the order does not depend on construction history.

use std::cmp::Ordering;

use crate::context::Context;
use crate::kind::KindId;
use crate::node::Node;
use crate::reference::ExprRef;

/// Kinds whose operand order carries no meaning.
pub(crate) fn is_commutative(kind: KindId) -> bool {
    matches!(kind, KindId::AND | KindId::OR | KindId::XOR)
}

impl Context {
    pub fn compare(&self, a: ExprRef, b: ExprRef) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (na, nb) = (self.node(a), self.node(b));
        let (ka, kb) = (na.kind(), nb.kind());
        if ka != kb {
            return self.registry().order(ka, kb);
        }
        match (&*na, &*nb) {
            (Node::Boolean(x), Node::Boolean(y)) => x.cmp(y),
            (Node::Number(x), Node::Number(y)) => x.cmp_total(y),
            (Node::Symbol(x), Node::Symbol(y)) => x.name.cmp(&y.name).then(x.dummy.cmp(&y.dummy)),
            (Node::Interval(a1, b1), Node::Interval(a2, b2)) => self
                .compare(*a1, *a2)
                .then_with(|| self.compare(*b1, *b2)),
            (Node::Sum(x), Node::Sum(y)) | (Node::Product(x), Node::Product(y)) => {
                self.compare_terms(x, y)
            }
            (Node::Apply(head, x), Node::Apply(_, y)) => {
                if is_commutative(*head) {
                    self.compare_seq(&self.sorted(x), &self.sorted(y))
                } else {
                    self.compare_seq(x, y)
                }
            }
            // Constants are their own kind.
            _ => Ordering::Equal,
        }
    }

    /// Copy of `items` sorted by [`compare`][Context::compare].
    pub fn sorted(&self, items: &[ExprRef]) -> Vec<ExprRef> {
        let mut items = items.to_vec();
        items.sort_by(|&a, &b| self.compare(a, b));
        items
    }

    /// The greatest of `items`, if any.
    pub fn greatest(&self, items: impl IntoIterator<Item = ExprRef>) -> Option<ExprRef> {
        items.into_iter().max_by(|&a, &b| self.compare(a, b))
    }

    fn compare_seq(&self, x: &[ExprRef], y: &[ExprRef]) -> Ordering {
        x.len().cmp(&y.len()).then_with(|| {
            x.iter()
                .zip(y)
                .map(|(&p, &q)| self.compare(p, q))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }

    fn compare_terms(&self, x: &[(ExprRef, ExprRef)], y: &[(ExprRef, ExprRef)]) -> Ordering {
        if x.len() != y.len() {
            return x.len().cmp(&y.len());
        }
        let mut x = x.to_vec();
        let mut y = y.to_vec();
        x.sort_by(|p, q| self.compare(p.0, q.0));
        y.sort_by(|p, q| self.compare(p.0, q.0));
        for (&(k1, v1), &(k2, v2)) in x.iter().zip(&y) {
            let o = self.compare(k1, k2).then_with(|| self.compare(v1, v2));
            if o.is_ne() {
                return o;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_numbers_before_symbols() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let two = ctx.integer(2);
        assert_eq!(ctx.compare(two, x), Ordering::Less);
        assert_eq!(ctx.compare(x, two), Ordering::Greater);
        assert_eq!(ctx.compare(x, x), Ordering::Equal);
    }

    #[test]
    fn test_symbols_by_name() {
        let ctx = Context::default();
        let b = ctx.symbol("b");
        let a = ctx.symbol("a");
        assert_eq!(ctx.compare(a, b), Ordering::Less);
        assert_eq!(ctx.sorted(&[b, a]), vec![a, b]);
    }

    #[test]
    fn test_order_is_independent_of_construction_order() {
        let ctx = Context::default();
        let y = ctx.symbol("y");
        let x = ctx.symbol("x");
        // y was interned first, yet x sorts first
        assert_eq!(ctx.sorted(&[y, x]), vec![x, y]);
    }

    #[test]
    fn test_mixed_kinds_total_order() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let sample = vec![
            ctx.integer(3),
            ctx.integer(-1),
            x,
            y,
            ctx.add(x, y),
            ctx.add(x, ctx.integer(2)),
            ctx.mul(x, y),
            ctx.pow(x, ctx.integer(2)),
            ctx.rational(1, 2).unwrap(),
        ];
        for &a in &sample {
            assert_eq!(ctx.compare(a, a), Ordering::Equal);
            for &b in &sample {
                assert_eq!(ctx.compare(a, b), ctx.compare(b, a).reverse());
                if a != b {
                    assert_ne!(ctx.compare(a, b), Ordering::Equal);
                }
                for &c in &sample {
                    if ctx.compare(a, b).is_lt() && ctx.compare(b, c).is_lt() {
                        assert!(ctx.compare(a, c).is_lt());
                    }
                }
            }
        }
    }

    #[test]
    fn test_greatest() {
        let ctx = Context::default();
        let a = ctx.symbol("a");
        let b = ctx.symbol("b");
        assert_eq!(ctx.greatest([a, b]), Some(b));
        assert_eq!(ctx.greatest([]), None);
    }
}
