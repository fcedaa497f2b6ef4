//! The expression manager.
//!
//! A [`Context`] owns everything that the canonicalization core shares:
//! the hash-consed node table, the kind registry and the construction caches.
//! All expressions are [`ExprRef`] handles into one context, and every
//! operation goes through it, just like every BDD operation goes through its
//! manager.
//!
//! The context uses `RefCell` internally and is therefore neither `Sync` nor
//! meant to be shared between threads: canonicalization is single-threaded.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use log::{debug, trace};
use num_bigint::BigInt;

use crate::cache::{CacheStats, ConstructionCache, Constructor};
use crate::error::{Result, SymError};
use crate::kind::{KindId, KindRegistry};
use crate::node::{Constant, Node, Symbol};
use crate::number::Number;
use crate::product::ProductBuilder;
use crate::reference::ExprRef;
use crate::sum::SumBuilder;
use crate::sympify::ExprParser;
use crate::table::Table;

type Storage = Table<Rc<Node>>;

pub struct Context {
    storage: RefCell<Storage>,
    registry: RefCell<KindRegistry>,
    cache: RefCell<ConstructionCache>,
    pub(crate) parser: RefCell<Option<Box<dyn ExprParser>>>,
    dummies: Cell<u32>,
    pub zero: ExprRef,
    pub one: ExprRef,
    pub minus_one: ExprRef,
    yes: ExprRef,
    no: ExprRef,
}

impl Context {
    /// Create a context whose node table has `2^bucket_bits` buckets.
    pub fn new(bucket_bits: usize) -> Self {
        let mut storage = Storage::new(bucket_bits);
        let mut put = |node: Node| ExprRef::new(storage.put(Rc::new(node)).0 as u32);

        let zero = put(Node::Number(Number::zero()));
        let one = put(Node::Number(Number::one()));
        let minus_one = put(Node::Number(Number::from_i64(-1)));
        let no = put(Node::Boolean(false));
        let yes = put(Node::Boolean(true));

        Self {
            storage: RefCell::new(storage),
            registry: RefCell::new(KindRegistry::new()),
            cache: RefCell::new(ConstructionCache::new()),
            parser: RefCell::new(None),
            dummies: Cell::new(0),
            zero,
            one,
            minus_one,
            yes,
            no,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(16)
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Context")
            .field("nodes", &storage.len())
            .field("buckets", &storage.buckets())
            .field("kinds", &self.registry.borrow().len())
            .field("cached", &self.cache.borrow().len())
            .finish()
    }
}

// Node access.
impl Context {
    pub(crate) fn intern(&self, node: Node) -> ExprRef {
        let (index, fresh) = self.storage.borrow_mut().put(Rc::new(node));
        let r = ExprRef::new(index as u32);
        if fresh {
            trace!("intern: new node {}", r);
        }
        r
    }

    /// Intern a sum or product from its term map.
    pub(crate) fn intern_terms(&self, kind: KindId, mut terms: Vec<(ExprRef, ExprRef)>) -> ExprRef {
        terms.sort_by_key(|(k, _)| k.get());
        match kind {
            KindId::SUM => self.intern(Node::Sum(terms)),
            KindId::PRODUCT => self.intern(Node::Product(terms)),
            _ => unreachable!("intern_terms called for {}", kind),
        }
    }

    /// Contents of a node.
    pub fn node(&self, e: ExprRef) -> Rc<Node> {
        Rc::clone(self.storage.borrow().value(e.index()))
    }

    /// Number of distinct nodes created so far.
    pub fn size(&self) -> usize {
        self.storage.borrow().len()
    }

    pub fn kind(&self, e: ExprRef) -> KindId {
        self.node(e).kind()
    }

    pub fn is_kind(&self, e: ExprRef, kind: KindId) -> bool {
        self.kind(e) == kind
    }

    /// Structural hash, computed once when the node was created.
    pub fn hash(&self, e: ExprRef) -> u64 {
        self.storage.borrow().hash(e.index())
    }

    pub fn as_number(&self, e: ExprRef) -> Option<Number> {
        self.node(e).as_number().cloned()
    }

    pub fn is_number(&self, e: ExprRef) -> bool {
        matches!(*self.node(e), Node::Number(_))
    }

    /// Numeric zero, integer or float.
    pub fn is_zero(&self, e: ExprRef) -> bool {
        e == self.zero || matches!(self.node(e).as_number(), Some(n) if n.is_zero())
    }

    pub fn is_one(&self, e: ExprRef) -> bool {
        e == self.one
    }

    pub fn as_boolean(&self, e: ExprRef) -> Option<bool> {
        self.node(e).as_boolean()
    }

    /// Term map of a sum or product, in canonical (total) order.
    pub fn terms(&self, e: ExprRef) -> Option<Vec<(ExprRef, ExprRef)>> {
        let node = self.node(e);
        let mut terms = node.terms()?.to_vec();
        terms.sort_by(|a, b| self.compare(a.0, b.0));
        Some(terms)
    }

    /// Operands of an application, in stored order.
    pub fn args(&self, e: ExprRef) -> Vec<ExprRef> {
        self.node(e).args().to_vec()
    }
}

// Atoms.
impl Context {
    pub fn boolean(&self, value: bool) -> ExprRef {
        if value {
            self.yes
        } else {
            self.no
        }
    }

    pub fn number(&self, value: Number) -> ExprRef {
        self.intern(Node::Number(value))
    }

    pub fn integer(&self, value: i64) -> ExprRef {
        self.number(Number::from_i64(value))
    }

    pub fn big_integer(&self, value: BigInt) -> ExprRef {
        self.number(Number::from_bigint(value))
    }

    /// `p/q` in lowest terms.
    pub fn rational(&self, p: i64, q: i64) -> Result<ExprRef> {
        Number::rational(p, q)
            .map(|n| self.number(n))
            .ok_or_else(|| SymError::invalid("Fraction", "zero denominator"))
    }

    pub fn float(&self, value: f64) -> ExprRef {
        self.number(Number::float(value))
    }

    pub fn constant(&self, c: Constant) -> ExprRef {
        self.intern(Node::Constant(c))
    }

    pub fn imaginary_unit(&self) -> ExprRef {
        self.constant(Constant::ImaginaryUnit)
    }

    pub fn infinity(&self) -> ExprRef {
        self.constant(Constant::Infinity)
    }

    pub fn complex_infinity(&self) -> ExprRef {
        self.constant(Constant::ComplexInfinity)
    }

    pub fn nan(&self) -> ExprRef {
        self.constant(Constant::NaN)
    }

    pub fn e(&self) -> ExprRef {
        self.constant(Constant::Exp1)
    }

    pub fn pi(&self) -> ExprRef {
        self.constant(Constant::Pi)
    }

    pub fn symbol(&self, name: &str) -> ExprRef {
        self.intern(Node::Symbol(Symbol {
            name: name.to_string(),
            dummy: 0,
        }))
    }

    /// A fresh symbol, distinct from every other symbol of the same name.
    pub fn dummy(&self, name: &str) -> ExprRef {
        let index = self.dummies.get() + 1;
        self.dummies.set(index);
        self.intern(Node::Symbol(Symbol {
            name: name.to_string(),
            dummy: index,
        }))
    }

    /// Closed interval `[a, b]`.
    pub fn interval(&self, a: ExprRef, b: ExprRef) -> ExprRef {
        self.get_or_build(Constructor::Interval, Some(&[a, b]), || {
            self.intern(Node::Interval(a, b))
        })
    }
}

// Kinds.
impl Context {
    /// Read access to the kind registry.
    pub fn registry(&self) -> std::cell::Ref<'_, KindRegistry> {
        self.registry.borrow()
    }

    pub(crate) fn registry_mut(&self) -> std::cell::RefMut<'_, KindRegistry> {
        self.registry.borrow_mut()
    }

    /// Add a named kind to the ordering table, returning its id.
    pub fn register_kind(&self, name: &str) -> KindId {
        let mut registry = self.registry.borrow_mut();
        let kind = registry.intern(name);
        registry.register(kind);
        kind
    }

    pub fn kind_name(&self, kind: KindId) -> String {
        self.registry.borrow().name(kind).to_string()
    }
}

// Construction caches.
impl Context {
    /// Return the cached result of `constructor(args)`, building it on a miss.
    ///
    /// `None` as the key means no hashable key could be derived from the
    /// arguments; the value is then built without touching the cache.
    pub fn get_or_build<F>(&self, constructor: Constructor, key: Option<&[ExprRef]>, build: F) -> ExprRef
    where
        F: FnOnce() -> ExprRef,
    {
        let Some(args) = key else {
            return build();
        };
        if let Some(r) = self.cache.borrow_mut().get(constructor, args) {
            trace!("{}: cache hit -> {}", constructor, r);
            return r;
        }
        let r = build();
        self.cache.borrow_mut().insert(constructor, args.to_vec(), r);
        r
    }

    /// Fallible variant of [`get_or_build`][Context::get_or_build]. Errors are not cached.
    pub fn try_get_or_build<F>(
        &self,
        constructor: Constructor,
        key: Option<&[ExprRef]>,
        build: F,
    ) -> Result<ExprRef>
    where
        F: FnOnce() -> Result<ExprRef>,
    {
        let Some(args) = key else {
            return build();
        };
        if let Some(r) = self.cache.borrow_mut().get(constructor, args) {
            trace!("{}: cache hit -> {}", constructor, r);
            return Ok(r);
        }
        let r = build()?;
        self.cache.borrow_mut().insert(constructor, args.to_vec(), r);
        Ok(r)
    }

    /// Invalidate every construction cache.
    ///
    /// Nodes already handed out stay valid; only memoized constructions are
    /// forgotten.
    pub fn clear_cache(&self) {
        debug!("clear_cache()");
        self.cache.borrow_mut().clear();
    }

    pub fn cache_stats(&self) -> Vec<CacheStats> {
        self.cache.borrow().stats()
    }

    /// Number of memoized constructions.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

// Structural substitution.
impl Context {
    /// Replace every occurrence of `old` in `e` by `new`.
    ///
    /// Returns `e` itself (the same handle) when nothing matched.
    pub fn subs(&self, e: ExprRef, old: ExprRef, new: ExprRef) -> Result<ExprRef> {
        if e == old {
            return Ok(new);
        }
        let node = self.node(e);
        match &*node {
            Node::Sum(terms) | Node::Product(terms) => {
                let mut changed = false;
                let mut replaced = Vec::with_capacity(terms.len());
                for &(k, v) in terms {
                    let nk = self.subs(k, old, new)?;
                    let nv = self.subs(v, old, new)?;
                    changed |= nk != k || nv != v;
                    replaced.push((nk, nv));
                }
                if !changed {
                    return Ok(e);
                }
                if let Node::Sum(_) = &*node {
                    // A coefficient that stopped being a number becomes a factor.
                    let mut builder = SumBuilder::new(self);
                    for (k, v) in replaced {
                        if self.is_number(v) {
                            builder.update(k, v);
                        } else {
                            builder.update(self.mul(v, k), self.one);
                        }
                    }
                    Ok(builder.finish())
                } else {
                    let mut builder = ProductBuilder::new(self);
                    for (k, v) in replaced {
                        builder.update(k, v);
                    }
                    Ok(builder.finish())
                }
            }
            Node::Apply(head, args) => {
                let mut changed = false;
                let mut replaced = Vec::with_capacity(args.len());
                for &a in args {
                    let na = self.subs(a, old, new)?;
                    changed |= na != a;
                    replaced.push(na);
                }
                if !changed {
                    return Ok(e);
                }
                self.apply(*head, replaced)
            }
            Node::Interval(a, b) => {
                let na = self.subs(*a, old, new)?;
                let nb = self.subs(*b, old, new)?;
                if na == *a && nb == *b {
                    return Ok(e);
                }
                Ok(self.interval(na, nb))
            }
            _ => Ok(e),
        }
    }
}
