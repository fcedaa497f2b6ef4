//! Boolean connectives, conditions and type predicates.
//!
//! Every constructor here goes through [`Context::apply`], so arguments are
//! checked and results are cached like any other application. The rewrite
//! rules live in the `canon_*` functions:
//!
//! - `Not`: literals fold, double negation cancels.
//! - `And`/`Or`: operands form a flat set; the absorbing literal or a
//!   complementary pair short-circuits; the empty set is the identity.
//! - `XOr`: `True` operands and complementary pairs are counted as parity;
//!   duplicates cancel; odd parity negates the greatest remaining operand.
//! - `Implies` and `Equiv` are rewritten into the connectives above.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::context::Context;
use crate::error::Result;
use crate::kind::KindId;
use crate::node::{Constant, Node};
use crate::reference::ExprRef;
use crate::types::Truth;

// Constructors.
impl Context {
    pub fn not(&self, a: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::NOT, vec![a])
    }

    pub fn and(&self, args: impl IntoIterator<Item = ExprRef>) -> Result<ExprRef> {
        self.apply(KindId::AND, args.into_iter().collect())
    }

    pub fn or(&self, args: impl IntoIterator<Item = ExprRef>) -> Result<ExprRef> {
        self.apply(KindId::OR, args.into_iter().collect())
    }

    pub fn xor(&self, args: impl IntoIterator<Item = ExprRef>) -> Result<ExprRef> {
        self.apply(KindId::XOR, args.into_iter().collect())
    }

    pub fn implies(&self, a: ExprRef, b: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::IMPLIES, vec![a, b])
    }

    pub fn equiv(&self, a: ExprRef, b: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::EQUIV, vec![a, b])
    }

    pub fn equal(&self, lhs: ExprRef, rhs: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::EQUAL, vec![lhs, rhs])
    }

    pub fn less(&self, lhs: ExprRef, rhs: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::LESS, vec![lhs, rhs])
    }

    pub fn is_real(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::IS_REAL, vec![x])
    }

    pub fn is_rational(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::IS_RATIONAL, vec![x])
    }

    pub fn is_integer(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::IS_INTEGER, vec![x])
    }

    pub fn is_positive(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::IS_POSITIVE, vec![x])
    }

    pub fn is_negative(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::IS_NEGATIVE, vec![x])
    }

    /// Left-hand side of a condition.
    pub fn lhs(&self, condition: ExprRef) -> Option<ExprRef> {
        match &*self.node(condition) {
            Node::Apply(KindId::EQUAL | KindId::LESS, args) => Some(args[0]),
            _ => None,
        }
    }

    /// Right-hand side of a condition.
    pub fn rhs(&self, condition: ExprRef) -> Option<ExprRef> {
        match &*self.node(condition) {
            Node::Apply(KindId::EQUAL | KindId::LESS, args) => Some(args[1]),
            _ => None,
        }
    }

    /// Operand of `Not(x)`.
    fn negated(&self, e: ExprRef) -> Option<ExprRef> {
        match &*self.node(e) {
            Node::Apply(KindId::NOT, args) => Some(args[0]),
            _ => None,
        }
    }
}

// Canonicalization.
impl Context {
    pub(crate) fn canon_not(&self, a: ExprRef) -> Result<ExprRef> {
        if let Some(b) = self.as_boolean(a) {
            debug!("Not(literal) => literal");
            return Ok(self.boolean(!b));
        }
        if let Some(x) = self.negated(a) {
            debug!("Not(Not(x)) => x");
            return Ok(x);
        }
        Ok(self.raw_apply(KindId::NOT, vec![a]))
    }

    /// `And` when `kind` is `AND`, `Or` when it is `OR`.
    pub(crate) fn canon_junction(&self, kind: KindId, args: Vec<ExprRef>) -> Result<ExprRef> {
        // Absorbing element: False for And, True for Or.
        let absorbing = kind == KindId::OR;

        let mut set: Vec<ExprRef> = Vec::new();
        let mut seen = HashSet::new();
        let mut push = |e: ExprRef, set: &mut Vec<ExprRef>| {
            if seen.insert(e) {
                set.push(e);
            }
        };
        for a in args {
            let node = self.node(a);
            match &*node {
                Node::Boolean(b) if *b == absorbing => {
                    debug!("{}(.., {}, ..) => {}", self.kind_name(kind), b, b);
                    return Ok(self.boolean(absorbing));
                }
                Node::Boolean(_) => {}
                Node::Apply(head, inner) if *head == kind => {
                    for &e in inner {
                        push(e, &mut set);
                    }
                }
                _ => push(a, &mut set),
            }
        }

        if set.iter().any(|&e| self.negated(e).is_some_and(|x| set.contains(&x))) {
            debug!("{}(x, Not(x)) => {}", self.kind_name(kind), absorbing);
            return Ok(self.boolean(absorbing));
        }

        match set.len() {
            0 => Ok(self.boolean(!absorbing)),
            1 => Ok(set[0]),
            _ => Ok(self.raw_apply(kind, set)),
        }
    }

    pub(crate) fn canon_xor(&self, args: Vec<ExprRef>) -> Result<ExprRef> {
        let mut parity = false;
        let mut set: Vec<ExprRef> = Vec::new();
        let toggle = |e: ExprRef, set: &mut Vec<ExprRef>| match set.iter().position(|&x| x == e) {
            Some(i) => {
                set.swap_remove(i);
            }
            None => set.push(e),
        };

        for a in args {
            let node = self.node(a);
            match &*node {
                Node::Boolean(b) => parity ^= *b,
                Node::Apply(KindId::XOR, inner) => {
                    for &e in inner {
                        toggle(e, &mut set);
                    }
                }
                _ => toggle(a, &mut set),
            }
        }

        // XOr(x, Not(x)) is True.
        while let Some(i) = set
            .iter()
            .position(|&e| self.negated(e).is_some_and(|x| set.contains(&x)))
        {
            let e = set.swap_remove(i);
            if let Some(x) = self.negated(e) {
                set.retain(|&y| y != x);
            }
            parity = !parity;
        }

        if set.is_empty() {
            return Ok(self.boolean(parity));
        }
        if parity {
            if let Some(g) = self.greatest(set.iter().copied()) {
                set.retain(|&y| y != g);
                set.push(self.canon_not(g)?);
            }
        }
        if set.len() == 1 {
            return Ok(set[0]);
        }
        Ok(self.raw_apply(KindId::XOR, set))
    }

    pub(crate) fn canon_equal(&self, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        if lhs == rhs {
            return self.boolean(true);
        }
        if let (Some(x), Some(y)) = (self.as_number(lhs), self.as_number(rhs)) {
            return self.boolean(x.partial_cmp_value(&y).is_some_and(|o| o.is_eq()));
        }
        self.raw_apply(KindId::EQUAL, vec![lhs, rhs])
    }

    pub(crate) fn canon_less(&self, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        if lhs == rhs {
            return self.boolean(false);
        }
        if let (Some(x), Some(y)) = (self.as_number(lhs), self.as_number(rhs)) {
            return self.boolean(x.partial_cmp_value(&y).is_some_and(|o| o.is_lt()));
        }
        self.raw_apply(KindId::LESS, vec![lhs, rhs])
    }

    pub(crate) fn canon_type_condition(&self, kind: KindId, x: ExprRef) -> ExprRef {
        let node = self.node(x);
        let decided = match (&*node, kind) {
            (Node::Number(_), KindId::IS_REAL) => Some(true),
            (Node::Number(n), KindId::IS_RATIONAL) => Some(!n.is_float()),
            (Node::Number(n), KindId::IS_INTEGER) => Some(n.is_integer()),
            (Node::Constant(c), KindId::IS_REAL) => match c {
                Constant::Exp1 | Constant::Pi => Some(true),
                Constant::ImaginaryUnit | Constant::ComplexInfinity => Some(false),
                _ => None,
            },
            (Node::Constant(c), _) if c.is_real() || *c == Constant::ImaginaryUnit => Some(false),
            _ => None,
        };
        match decided {
            Some(b) => self.boolean(b),
            None => self.raw_apply(kind, vec![x]),
        }
    }
}

// Refinement and testing.
impl Context {
    /// Collapse type conditions on the same argument.
    ///
    /// Inside `And` the most specific condition is kept (`IsInteger(x)` over
    /// `IsReal(x)`), inside `Or` the most general one.
    pub fn refine(&self, pred: ExprRef) -> Result<ExprRef> {
        let node = self.node(pred);
        let Node::Apply(head, args) = &*node else {
            return Ok(pred);
        };
        if !head.is_connective() {
            return Ok(pred);
        }
        let args: Vec<ExprRef> = args
            .iter()
            .map(|&a| self.refine(a))
            .collect::<Result<_>>()?;

        match *head {
            KindId::AND | KindId::OR => {
                let keep_specific = *head == KindId::AND;
                let mut best: HashMap<ExprRef, (u8, ExprRef)> = HashMap::new();
                let mut rest = Vec::new();
                for &a in &args {
                    match self.type_condition(a) {
                        Some((level, subject)) => {
                            let better = match best.get(&subject) {
                                Some(&(l, _)) if keep_specific => level > l,
                                Some(&(l, _)) => level < l,
                                None => true,
                            };
                            if better {
                                best.insert(subject, (level, a));
                            }
                        }
                        None => rest.push(a),
                    }
                }
                rest.extend(best.into_values().map(|(_, a)| a));
                self.apply(*head, rest)
            }
            _ => self.apply(*head, args),
        }
    }

    /// Specificity level and argument of a type condition.
    fn type_condition(&self, e: ExprRef) -> Option<(u8, ExprRef)> {
        match &*self.node(e) {
            Node::Apply(head, args) => head.type_condition_level().map(|l| (l, args[0])),
            _ => None,
        }
    }

    /// Substitute truth values for atoms and re-canonicalize the connectives.
    pub fn assign(&self, pred: ExprRef, values: &HashMap<ExprRef, bool>) -> Result<ExprRef> {
        if let Some(&b) = values.get(&pred) {
            return Ok(self.boolean(b));
        }
        let node = self.node(pred);
        match &*node {
            Node::Apply(head, args) if head.is_connective() => {
                let mut changed = false;
                let mut replaced = Vec::with_capacity(args.len());
                for &a in args {
                    let r = self.assign(a, values)?;
                    changed |= r != a;
                    replaced.push(r);
                }
                if changed {
                    self.apply(*head, replaced)
                } else {
                    Ok(pred)
                }
            }
            _ => Ok(pred),
        }
    }

    /// Decide `pred` under `assumption`.
    ///
    /// The assumption is a condition, a negated condition, or an `And` of
    /// those. Type conditions imply their more general forms; a false type
    /// condition implies that the more specific forms are false too.
    pub fn test(&self, pred: ExprRef, assumption: ExprRef) -> Result<Truth> {
        debug!("test(pred = {}, assumption = {})", pred, assumption);

        let mut values = HashMap::new();
        let conjuncts = match &*self.node(assumption) {
            Node::Apply(KindId::AND, args) => args.clone(),
            _ => vec![assumption],
        };
        for c in conjuncts {
            match self.negated(c) {
                Some(x) => values.insert(x, false),
                None => values.insert(c, true),
            };
        }

        let known: Vec<(ExprRef, bool)> = values.iter().map(|(&k, &v)| (k, v)).collect();
        for (atom, value) in known {
            let Some((level, subject)) = self.type_condition(atom) else {
                continue;
            };
            for kind in [KindId::IS_REAL, KindId::IS_RATIONAL, KindId::IS_INTEGER] {
                let Some(l) = kind.type_condition_level() else {
                    continue;
                };
                let implied = if value { l < level } else { l > level };
                if implied {
                    let cond = self.apply(kind, vec![subject])?;
                    values.entry(cond).or_insert(value);
                }
            }
        }

        let r = self.assign(pred, &values)?;
        Ok(match self.as_boolean(r) {
            Some(true) => Truth::True,
            Some(false) => Truth::False,
            None => Truth::Unknown(r),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn atoms(ctx: &Context) -> (ExprRef, ExprRef, ExprRef) {
        (ctx.symbol("a"), ctx.symbol("b"), ctx.symbol("c"))
    }

    #[test]
    fn test_not() {
        let ctx = Context::default();
        let (a, _, _) = atoms(&ctx);
        let t = ctx.boolean(true);
        let f = ctx.boolean(false);
        assert_eq!(ctx.not(t).unwrap(), f);
        assert_eq!(ctx.not(f).unwrap(), t);
        let na = ctx.not(a).unwrap();
        assert!(ctx.is_kind(na, KindId::NOT));
        assert_eq!(ctx.not(na).unwrap(), a);
    }

    #[test]
    fn test_and_or_identities() {
        let ctx = Context::default();
        let (a, _, _) = atoms(&ctx);
        let na = ctx.not(a).unwrap();
        assert_eq!(ctx.and([a, na]).unwrap(), ctx.boolean(false));
        assert_eq!(ctx.or([a, na]).unwrap(), ctx.boolean(true));
        assert_eq!(ctx.and([]).unwrap(), ctx.boolean(true));
        assert_eq!(ctx.or([]).unwrap(), ctx.boolean(false));
        assert_eq!(ctx.and([a]).unwrap(), a);
        assert_eq!(ctx.and([a, a]).unwrap(), a);
    }

    #[test]
    fn test_and_literals() {
        let ctx = Context::default();
        let (a, b, _) = atoms(&ctx);
        let t = ctx.boolean(true);
        let f = ctx.boolean(false);
        assert_eq!(ctx.and([a, f, b]).unwrap(), f);
        assert_eq!(ctx.and([a, t]).unwrap(), a);
        assert_eq!(ctx.or([a, t, b]).unwrap(), t);
        assert_eq!(ctx.or([a, f]).unwrap(), a);
    }

    #[test]
    fn test_and_is_a_flat_set() {
        let ctx = Context::default();
        let (a, b, c) = atoms(&ctx);
        let ab = ctx.and([a, b]).unwrap();
        let abc = ctx.and([ab, c]).unwrap();
        assert_eq!(abc, ctx.and([c, b, a]).unwrap());
        assert_eq!(ctx.args(abc).len(), 3);
        // Or operands are not flattened into And.
        let a_or_b = ctx.or([a, b]).unwrap();
        let mixed = ctx.and([a_or_b, c]).unwrap();
        assert_eq!(ctx.args(mixed).len(), 2);
    }

    #[test]
    fn test_xor() {
        let ctx = Context::default();
        let (a, b, _) = atoms(&ctx);
        let t = ctx.boolean(true);
        let na = ctx.not(a).unwrap();
        assert_eq!(ctx.xor([a, a]).unwrap(), ctx.boolean(false));
        assert_eq!(ctx.xor([a, na]).unwrap(), t);
        assert_eq!(ctx.xor([]).unwrap(), ctx.boolean(false));
        assert_eq!(ctx.xor([t]).unwrap(), t);
        assert_eq!(ctx.xor([a]).unwrap(), a);
        assert_eq!(ctx.xor([a, t]).unwrap(), na);
        assert_eq!(ctx.xor([a, b]).unwrap(), ctx.xor([b, a]).unwrap());
        // odd parity negates the greatest operand
        let nb = ctx.not(b).unwrap();
        assert_eq!(ctx.xor([a, b, t]).unwrap(), ctx.xor([a, nb]).unwrap());
    }

    #[test]
    fn test_xor_flattens() {
        let ctx = Context::default();
        let (a, b, c) = atoms(&ctx);
        let ab = ctx.xor([a, b]).unwrap();
        assert_eq!(ctx.xor([ab, c]).unwrap(), ctx.xor([a, b, c]).unwrap());
        assert_eq!(ctx.xor([ab, a]).unwrap(), b);
    }

    #[test]
    fn test_implies_and_equiv() {
        let ctx = Context::default();
        let (a, b, _) = atoms(&ctx);
        let na = ctx.not(a).unwrap();
        assert_eq!(ctx.implies(a, b).unwrap(), ctx.or([na, b]).unwrap());
        let x = ctx.xor([a, b]).unwrap();
        assert_eq!(ctx.equiv(a, b).unwrap(), ctx.not(x).unwrap());
        assert_eq!(ctx.equiv(a, a).unwrap(), ctx.boolean(true));
    }

    #[test]
    fn test_conditions() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let one = ctx.one;
        let two = ctx.integer(2);
        assert_eq!(ctx.equal(x, x).unwrap(), ctx.boolean(true));
        assert_eq!(ctx.less(x, x).unwrap(), ctx.boolean(false));
        assert_eq!(ctx.less(one, two).unwrap(), ctx.boolean(true));
        assert_eq!(ctx.equal(one, two).unwrap(), ctx.boolean(false));
        assert_eq!(ctx.equal(ctx.float(2.0), two).unwrap(), ctx.boolean(true));
        let c = ctx.less(x, two).unwrap();
        assert!(ctx.is_kind(c, KindId::LESS));
        assert_eq!(ctx.lhs(c), Some(x));
        assert_eq!(ctx.rhs(c), Some(two));
    }

    #[test]
    fn test_type_conditions_on_literals() {
        let ctx = Context::default();
        let t = ctx.boolean(true);
        let f = ctx.boolean(false);
        let half = ctx.rational(1, 2).unwrap();
        assert_eq!(ctx.is_integer(ctx.integer(3)).unwrap(), t);
        assert_eq!(ctx.is_integer(half).unwrap(), f);
        assert_eq!(ctx.is_rational(half).unwrap(), t);
        assert_eq!(ctx.is_rational(ctx.float(0.5)).unwrap(), f);
        assert_eq!(ctx.is_real(ctx.pi()).unwrap(), t);
        assert_eq!(ctx.is_rational(ctx.pi()).unwrap(), f);
        assert_eq!(ctx.is_real(ctx.imaginary_unit()).unwrap(), f);
        assert_eq!(ctx.is_positive(ctx.integer(3)).unwrap(), t);
        assert_eq!(ctx.is_negative(ctx.integer(3)).unwrap(), f);
    }

    #[test]
    fn test_is_positive_expands() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let expected = ctx
            .and([ctx.is_real(x).unwrap(), ctx.less(ctx.zero, x).unwrap()])
            .unwrap();
        assert_eq!(ctx.is_positive(x).unwrap(), expected);
    }

    #[test]
    fn test_refine() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let real = ctx.is_real(x).unwrap();
        let int = ctx.is_integer(x).unwrap();
        let rat_y = ctx.is_rational(y).unwrap();

        let conj = ctx.and([real, int, rat_y]).unwrap();
        assert_eq!(ctx.refine(conj).unwrap(), ctx.and([int, rat_y]).unwrap());

        let disj = ctx.or([real, int]).unwrap();
        assert_eq!(ctx.refine(disj).unwrap(), real);

        let nested = ctx.not(conj).unwrap();
        let expected = ctx.not(ctx.and([int, rat_y]).unwrap()).unwrap();
        assert_eq!(ctx.refine(nested).unwrap(), expected);
    }

    #[test]
    fn test_test_under_assumption() {
        let ctx = Context::default();
        let x = ctx.symbol("x");
        let real = ctx.is_real(x).unwrap();
        let rational = ctx.is_rational(x).unwrap();
        let int = ctx.is_integer(x).unwrap();
        let lt = ctx.less(x, ctx.zero).unwrap();

        assert_eq!(ctx.test(real, int).unwrap(), Truth::True);
        let not_real = ctx.not(real).unwrap();
        assert_eq!(ctx.test(int, not_real).unwrap(), Truth::False);

        let pred = ctx.and([rational, lt]).unwrap();
        assert_eq!(ctx.test(pred, int).unwrap(), Truth::Unknown(lt));

        let both = ctx.and([int, lt]).unwrap();
        assert_eq!(ctx.test(pred, both).unwrap(), Truth::True);
    }
}
