//! Node kinds and their global order.
//!
//! Every node carries a [`KindId`]. The [`KindRegistry`] maps kinds to names,
//! signatures and a slot in the ordering table. Comparing two nodes of
//! different kinds compares their slots; kinds without a slot sort after all
//! known kinds and among themselves by name.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, warn};

use crate::error::{Result, SymError};
use crate::function::Signature;
use crate::types::Sort;

/// Identity of a node kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct KindId(u32);

impl KindId {
    pub const BOOLEAN: KindId = KindId(0);
    pub const IMAGINARY_UNIT: KindId = KindId(1);
    pub const INFINITY: KindId = KindId(2);
    pub const COMPLEX_INFINITY: KindId = KindId(3);
    pub const NAN: KindId = KindId(4);
    pub const EXP1: KindId = KindId(5);
    pub const PI: KindId = KindId(6);
    pub const INTEGER: KindId = KindId(7);
    pub const FRACTION: KindId = KindId(8);
    pub const FLOAT: KindId = KindId(9);
    pub const INTERVAL: KindId = KindId(10);
    pub const SYMBOL: KindId = KindId(11);
    pub const PRODUCT: KindId = KindId(12);
    pub const SUM: KindId = KindId(13);
    pub const SIN: KindId = KindId(14);
    pub const COS: KindId = KindId(15);
    pub const EQUAL: KindId = KindId(16);
    pub const LESS: KindId = KindId(17);
    pub const IS_REAL: KindId = KindId(18);
    pub const IS_RATIONAL: KindId = KindId(19);
    pub const IS_INTEGER: KindId = KindId(20);
    pub const IS_POSITIVE: KindId = KindId(21);
    pub const IS_NEGATIVE: KindId = KindId(22);
    pub const NOT: KindId = KindId(23);
    pub const AND: KindId = KindId(24);
    pub const OR: KindId = KindId(25);
    pub const XOR: KindId = KindId(26);
    pub const IMPLIES: KindId = KindId(27);
    pub const EQUIV: KindId = KindId(28);

    pub fn id(self) -> u32 {
        self.0
    }

    /// Boolean connectives, whose operands are rebuilt during truth-table
    /// evaluation. Everything else boolean-valued is an atom.
    pub fn is_connective(self) -> bool {
        matches!(self, KindId::NOT | KindId::AND | KindId::OR | KindId::XOR)
    }

    /// Type conditions, ordered from least to most specific.
    pub fn type_condition_level(self) -> Option<u8> {
        match self {
            KindId::IS_REAL => Some(1),
            KindId::IS_RATIONAL => Some(2),
            KindId::IS_INTEGER => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn builtin_kinds() -> Vec<(&'static str, Option<Signature>)> {
    use Sort::{Boolean, Value};
    let unary = |arg, result| Some(Signature::fixed([arg], result));
    let binary = |arg, result| Some(Signature::fixed([arg, arg], result));
    vec![
        ("Boolean", None),
        ("ImaginaryUnit", None),
        ("Infinity", None),
        ("ComplexInfinity", None),
        ("NaN", None),
        ("Exp1", None),
        ("Pi", None),
        ("Integer", None),
        ("Fraction", None),
        ("Float", None),
        ("Interval", None),
        ("Symbol", None),
        ("Product", None),
        ("Sum", None),
        ("sin", unary(Value, Value)),
        ("cos", unary(Value, Value)),
        ("Equal", binary(Value, Boolean)),
        ("Less", binary(Value, Boolean)),
        ("IsReal", unary(Value, Boolean)),
        ("IsRational", unary(Value, Boolean)),
        ("IsInteger", unary(Value, Boolean)),
        ("IsPositive", unary(Value, Boolean)),
        ("IsNegative", unary(Value, Boolean)),
        ("Not", unary(Boolean, Boolean)),
        ("And", Some(Signature::variadic(Boolean, Boolean))),
        ("Or", Some(Signature::variadic(Boolean, Boolean))),
        ("XOr", Some(Signature::variadic(Boolean, Boolean))),
        ("Implies", binary(Boolean, Boolean)),
        ("Equiv", binary(Boolean, Boolean)),
    ]
}

#[derive(Debug, Clone)]
pub struct KindInfo {
    pub name: String,
    /// Slot in the ordering table.
    pub rank: Option<usize>,
    pub signature: Option<Signature>,
    /// User-defined function kinds are ordered by name without complaint.
    pub undefined_function: bool,
}

#[derive(Debug)]
pub struct KindRegistry {
    kinds: Vec<KindInfo>,
    by_name: HashMap<String, KindId>,
    ranked: usize,
    reported: RefCell<HashSet<KindId>>,
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KindRegistry {
    /// Create a registry holding every builtin kind, ranked in declaration order.
    pub fn new() -> Self {
        let mut registry = Self {
            kinds: Vec::new(),
            by_name: HashMap::new(),
            ranked: 0,
            reported: RefCell::new(HashSet::new()),
        };
        for (name, signature) in builtin_kinds() {
            let kind = registry.intern(name);
            registry.kinds[kind.0 as usize].signature = signature;
            registry.register(kind);
        }
        assert_eq!(registry.lookup("Equiv"), Some(KindId::EQUIV));
        registry
    }

    /// Number of known kinds (ranked or not).
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Return the kind with the given name, creating an unranked one if needed.
    pub fn intern(&mut self, name: &str) -> KindId {
        if let Some(&kind) = self.by_name.get(name) {
            return kind;
        }
        let kind = KindId(self.kinds.len() as u32);
        debug!("intern kind {} as {}", name, kind);
        self.kinds.push(KindInfo {
            name: name.to_string(),
            rank: None,
            signature: None,
            undefined_function: false,
        });
        self.by_name.insert(name.to_string(), kind);
        kind
    }

    /// Append `kind` to the ordering table.
    ///
    /// Returns `false` (and logs) if the kind already has a slot.
    pub fn register(&mut self, kind: KindId) -> bool {
        let info = &mut self.kinds[kind.0 as usize];
        if let Some(rank) = info.rank {
            warn!(
                "Ignoring re-registration of kind {} (already at position {})",
                info.name, rank
            );
            return false;
        }
        info.rank = Some(self.ranked);
        self.ranked += 1;
        true
    }

    pub fn lookup(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    pub fn info(&self, kind: KindId) -> &KindInfo {
        &self.kinds[kind.0 as usize]
    }

    pub fn name(&self, kind: KindId) -> &str {
        &self.info(kind).name
    }

    pub fn signature(&self, kind: KindId) -> Option<&Signature> {
        self.info(kind).signature.as_ref()
    }

    pub(crate) fn define_function(&mut self, name: &str, signature: Signature) -> KindId {
        if let Some(kind) = self.lookup(name) {
            warn!("Ignoring redefinition of {}", name);
            return kind;
        }
        let kind = self.intern(name);
        let info = &mut self.kinds[kind.0 as usize];
        info.signature = Some(signature);
        info.undefined_function = true;
        kind
    }

    /// Position of `kind` in the ordering table.
    pub fn position(&self, kind: KindId) -> Result<usize> {
        let info = self.info(kind);
        info.rank
            .ok_or_else(|| SymError::UnknownKind(info.name.clone()))
    }

    /// Total order over kinds.
    ///
    /// Kinds missing from the table sort after all ranked kinds and are then
    /// compared by name. A missing kind is logged once.
    pub fn order(&self, a: KindId, b: KindId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        match (self.position(a), self.position(b)) {
            (Ok(i), Ok(j)) => i.cmp(&j),
            (Ok(_), Err(e)) => {
                self.report(b, &e);
                Ordering::Less
            }
            (Err(e), Ok(_)) => {
                self.report(a, &e);
                Ordering::Greater
            }
            (Err(ea), Err(eb)) => {
                self.report(a, &ea);
                self.report(b, &eb);
                self.name(a).cmp(self.name(b))
            }
        }
    }

    fn report(&self, kind: KindId, error: &SymError) {
        if self.info(kind).undefined_function {
            return;
        }
        if self.reported.borrow_mut().insert(kind) {
            warn!("{}", error);
        }
    }
}
