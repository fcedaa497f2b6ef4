use std::fmt;

use crate::kind::KindId;
use crate::number::Number;
use crate::reference::ExprRef;
use crate::utils::{pairing2, pairing3, pairing_seq, std_hash, MyHash};

/// Named constants that behave as atoms.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Constant {
    ImaginaryUnit,
    Infinity,
    ComplexInfinity,
    NaN,
    Exp1,
    Pi,
}

impl Constant {
    pub const ALL: [Constant; 6] = [
        Constant::ImaginaryUnit,
        Constant::Infinity,
        Constant::ComplexInfinity,
        Constant::NaN,
        Constant::Exp1,
        Constant::Pi,
    ];

    pub fn kind(self) -> KindId {
        match self {
            Constant::ImaginaryUnit => KindId::IMAGINARY_UNIT,
            Constant::Infinity => KindId::INFINITY,
            Constant::ComplexInfinity => KindId::COMPLEX_INFINITY,
            Constant::NaN => KindId::NAN,
            Constant::Exp1 => KindId::EXP1,
            Constant::Pi => KindId::PI,
        }
    }

    /// Real-valued constants.
    pub fn is_real(self) -> bool {
        matches!(self, Constant::Exp1 | Constant::Pi)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Constant::ImaginaryUnit => "I",
            Constant::Infinity => "oo",
            Constant::ComplexInfinity => "zoo",
            Constant::NaN => "nan",
            Constant::Exp1 => "E",
            Constant::Pi => "pi",
        };
        write!(f, "{}", s)
    }
}

/// A symbol; `dummy == 0` for ordinary symbols, a unique counter otherwise.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Symbol {
    pub name: String,
    pub dummy: u32,
}

impl Symbol {
    pub fn is_dummy(&self) -> bool {
        self.dummy != 0
    }
}

/// Canonical node contents.
///
/// Term lists of sums and products, and operand lists of commutative
/// connectives, are stored sorted by handle so that equal contents compare
/// equal. The total order used for printing and comparison is recomputed on
/// demand by the context.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Node {
    Boolean(bool),
    Number(Number),
    Constant(Constant),
    Symbol(Symbol),
    Interval(ExprRef, ExprRef),
    /// `Σ coeff·base`, as `(base, coeff)` pairs. The integer one as a base
    /// stands for the bare numeric term.
    Sum(Vec<(ExprRef, ExprRef)>),
    /// `Π base^exp`, as `(base, exp)` pairs.
    Product(Vec<(ExprRef, ExprRef)>),
    /// Function or predicate application.
    Apply(KindId, Vec<ExprRef>),
}

impl Node {
    pub fn kind(&self) -> KindId {
        match self {
            Node::Boolean(_) => KindId::BOOLEAN,
            Node::Number(n) if n.is_integer() => KindId::INTEGER,
            Node::Number(n) if n.is_float() => KindId::FLOAT,
            Node::Number(_) => KindId::FRACTION,
            Node::Constant(c) => c.kind(),
            Node::Symbol(_) => KindId::SYMBOL,
            Node::Interval(_, _) => KindId::INTERVAL,
            Node::Sum(_) => KindId::SUM,
            Node::Product(_) => KindId::PRODUCT,
            Node::Apply(head, _) => *head,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Node::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Term map of a sum or product.
    pub fn terms(&self) -> Option<&[(ExprRef, ExprRef)]> {
        match self {
            Node::Sum(terms) | Node::Product(terms) => Some(terms),
            _ => None,
        }
    }

    /// Operands of an application.
    pub fn args(&self) -> &[ExprRef] {
        match self {
            Node::Apply(_, args) => args,
            _ => &[],
        }
    }
}

fn hash_terms(seed: u64, terms: &[(ExprRef, ExprRef)]) -> u64 {
    pairing_seq(
        seed,
        terms
            .iter()
            .map(|(k, v)| pairing2(k.get() as u64, v.get() as u64)),
    )
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        let kind = self.kind().id() as u64;
        match self {
            Node::Boolean(b) => pairing2(kind, *b as u64),
            Node::Number(n) => pairing2(kind, std_hash(n)),
            Node::Constant(_) => kind,
            Node::Symbol(s) => pairing3(kind, std_hash(&s.name), s.dummy as u64),
            Node::Interval(a, b) => pairing3(kind, a.get() as u64, b.get() as u64),
            Node::Sum(terms) | Node::Product(terms) => hash_terms(kind, terms),
            Node::Apply(_, args) => pairing_seq(kind, args.iter().map(|a| a.get() as u64)),
        }
    }
}
