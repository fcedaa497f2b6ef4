//! Function and predicate application.

use std::fmt;

use log::debug;

use crate::cache::Constructor;
use crate::context::Context;
use crate::error::{Result, SymError};
use crate::kind::KindId;
use crate::node::Node;
use crate::order::is_commutative;
use crate::reference::ExprRef;
use crate::types::Sort;

#[derive(Debug, Clone, Eq, PartialEq)]
enum Params {
    Fixed(Vec<Sort>),
    Variadic(Sort),
}

/// Declared argument sorts and result sort of a function kind.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    params: Params,
    result: Sort,
}

impl Signature {
    pub fn fixed(args: impl IntoIterator<Item = Sort>, result: Sort) -> Self {
        Self {
            params: Params::Fixed(args.into_iter().collect()),
            result,
        }
    }

    pub fn variadic(arg: Sort, result: Sort) -> Self {
        Self {
            params: Params::Variadic(arg),
            result,
        }
    }

    pub fn result(&self) -> Sort {
        self.result
    }

    /// Number of arguments, `None` if variadic.
    pub fn arity(&self) -> Option<usize> {
        match &self.params {
            Params::Fixed(sorts) => Some(sorts.len()),
            Params::Variadic(_) => None,
        }
    }

    fn sort_of(&self, i: usize) -> Sort {
        match &self.params {
            Params::Fixed(sorts) => sorts[i],
            Params::Variadic(sort) => *sort,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Params::Fixed(sorts) => {
                let args: Vec<String> = sorts.iter().map(|s| s.to_string()).collect();
                write!(f, "({}) -> {}", args.join(", "), self.result)
            }
            Params::Variadic(sort) => write!(f, "({}...) -> {}", sort, self.result),
        }
    }
}

impl Context {
    /// Declare a user function; it is ordered by name after all known kinds.
    pub fn function(&self, name: &str, signature: Signature) -> KindId {
        debug!("function(name = {}, signature = {})", name, signature);
        self.registry_mut().define_function(name, signature)
    }

    /// Whether `e` can stand where a boolean is expected.
    pub fn is_boolean_valued(&self, e: ExprRef) -> bool {
        match &*self.node(e) {
            Node::Boolean(_) | Node::Symbol(_) => true,
            Node::Apply(head, _) => self.result_sort(*head) == Some(Sort::Boolean),
            _ => false,
        }
    }

    /// Whether `e` can stand where an ordinary value is expected.
    pub fn is_value(&self, e: ExprRef) -> bool {
        match &*self.node(e) {
            Node::Boolean(_) => false,
            Node::Apply(head, _) => self.result_sort(*head) != Some(Sort::Boolean),
            _ => true,
        }
    }

    fn result_sort(&self, kind: KindId) -> Option<Sort> {
        self.registry().signature(kind).map(|s| s.result())
    }

    fn check_signature(&self, kind: KindId, args: &[ExprRef]) -> Result<()> {
        let name = self.kind_name(kind);
        let signature = self
            .registry()
            .signature(kind)
            .cloned()
            .ok_or_else(|| SymError::invalid(&name, "not applicable"))?;

        if let Some(n) = signature.arity() {
            if n != args.len() {
                return Err(SymError::invalid(
                    &name,
                    format!("expected {} arguments, got {}", n, args.len()),
                ));
            }
        }
        for (i, &a) in args.iter().enumerate() {
            let ok = match signature.sort_of(i) {
                Sort::Any => true,
                Sort::Boolean => self.is_boolean_valued(a),
                Sort::Value => self.is_value(a),
            };
            if !ok {
                return Err(SymError::invalid(
                    &name,
                    format!("argument {} must be a {}, got {}", i + 1, signature.sort_of(i), self.tostr(a)),
                ));
            }
        }
        Ok(())
    }

    /// Apply a function or predicate kind to `args`.
    ///
    /// Arguments are checked against the kind's signature and the result is
    /// canonicalized by the kind's rules.
    pub fn apply(&self, kind: KindId, args: Vec<ExprRef>) -> Result<ExprRef> {
        debug!("apply(kind = {}, args = {:?})", self.kind_name(kind), args);

        self.try_get_or_build(Constructor::Apply(kind), Some(&args), || {
            self.check_signature(kind, &args)?;
            self.canonize(kind, args.clone())
        })
    }

    /// Intern an application without rewriting it.
    pub(crate) fn raw_apply(&self, kind: KindId, mut args: Vec<ExprRef>) -> ExprRef {
        if is_commutative(kind) {
            args.sort_by_key(|a| a.get());
            args.dedup();
        }
        self.intern(Node::Apply(kind, args))
    }

    fn canonize(&self, kind: KindId, args: Vec<ExprRef>) -> Result<ExprRef> {
        match kind {
            KindId::NOT => self.canon_not(args[0]),
            KindId::AND => self.canon_junction(KindId::AND, args),
            KindId::OR => self.canon_junction(KindId::OR, args),
            KindId::XOR => self.canon_xor(args),
            KindId::IMPLIES => {
                let na = self.not(args[0])?;
                self.or([na, args[1]])
            }
            KindId::EQUIV => {
                let x = self.xor([args[0], args[1]])?;
                self.not(x)
            }
            KindId::EQUAL => Ok(self.canon_equal(args[0], args[1])),
            KindId::LESS => Ok(self.canon_less(args[0], args[1])),
            KindId::IS_REAL | KindId::IS_RATIONAL | KindId::IS_INTEGER => {
                Ok(self.canon_type_condition(kind, args[0]))
            }
            KindId::IS_POSITIVE => {
                let real = self.is_real(args[0])?;
                let positive = self.less(self.zero, args[0])?;
                self.and([real, positive])
            }
            KindId::IS_NEGATIVE => {
                let real = self.is_real(args[0])?;
                let negative = self.less(args[0], self.zero)?;
                self.and([real, negative])
            }
            KindId::SIN if self.is_zero(args[0]) => {
                debug!("sin(0) => 0");
                Ok(self.zero)
            }
            KindId::COS if self.is_zero(args[0]) => {
                debug!("cos(0) => 1");
                Ok(self.one)
            }
            _ => Ok(self.raw_apply(kind, args)),
        }
    }

    pub fn sin(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::SIN, vec![x])
    }

    pub fn cos(&self, x: ExprRef) -> Result<ExprRef> {
        self.apply(KindId::COS, vec![x])
    }
}
