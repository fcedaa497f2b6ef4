//! Canonical string forms.
//!
//! [`Context::tostr`] gives the minimal infix form used in tests and logs,
//! [`Context::torepr`] a constructor-style form that shows node structure.

use crate::context::Context;
use crate::node::Node;
use crate::order::is_commutative;
use crate::reference::ExprRef;
use crate::types::Precedence;

impl Context {
    /// Binding strength of `e` when printed.
    pub fn precedence(&self, e: ExprRef) -> Precedence {
        match &*self.node(e) {
            Node::Number(n) if n.is_negative() => Precedence::ADD,
            Node::Number(n) if n.is_fraction() => Precedence::MUL,
            Node::Sum(terms) if terms.len() == 1 => {
                let (_, c) = terms[0];
                match self.as_number(c) {
                    Some(c) if c.is_negative() => Precedence::ADD,
                    _ => Precedence::MUL,
                }
            }
            Node::Sum(_) => Precedence::ADD,
            Node::Product(terms) if terms.len() == 1 => Precedence::POW,
            Node::Product(_) => Precedence::MUL,
            Node::Apply(..) => Precedence::APPLY,
            _ => Precedence::ATOM,
        }
    }

    /// Infix form at top level.
    pub fn tostr(&self, e: ExprRef) -> String {
        self.tostr_at(e, Precedence::TOP)
    }

    /// Infix form, parenthesized iff `e` binds no tighter than `level`.
    pub fn tostr_at(&self, e: ExprRef, level: Precedence) -> String {
        let s = self.render(e);
        if self.precedence(e).needs_parens(level) {
            format!("({})", s)
        } else {
            s
        }
    }

    fn render(&self, e: ExprRef) -> String {
        let node = self.node(e);
        match &*node {
            Node::Boolean(true) => "True".to_string(),
            Node::Boolean(false) => "False".to_string(),
            Node::Number(n) => n.to_string(),
            Node::Constant(c) => c.to_string(),
            Node::Symbol(s) if s.is_dummy() => format!("_{}", s.name),
            Node::Symbol(s) => s.name.clone(),
            Node::Interval(a, b) => format!("[{}, {}]", self.tostr(*a), self.tostr(*b)),
            Node::Sum(_) => self.render_sum(e),
            Node::Product(_) => self.render_product(e),
            Node::Apply(head, args) => {
                let args = if is_commutative(*head) {
                    self.sorted(args)
                } else {
                    args.clone()
                };
                let args: Vec<String> = args.iter().map(|&a| self.tostr(a)).collect();
                format!("{}({})", self.kind_name(*head), args.join(", "))
            }
        }
    }

    fn render_sum(&self, e: ExprRef) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.terms(e).unwrap_or_default().into_iter().enumerate() {
            let (negative, body) = match self.as_number(v) {
                Some(c) if k == self.one => (c.is_negative(), c.abs().to_string()),
                Some(c) => {
                    let magnitude = c.abs();
                    let body = if magnitude.is_one() {
                        self.tostr_at(k, Precedence::ADD)
                    } else {
                        format!(
                            "{}*{}",
                            self.tostr_at(self.number(magnitude), Precedence::MUL),
                            self.tostr_at(k, Precedence::ADD)
                        )
                    };
                    (c.is_negative(), body)
                }
                None => (
                    false,
                    format!(
                        "{}*{}",
                        self.tostr_at(v, Precedence::ADD),
                        self.tostr_at(k, Precedence::ADD)
                    ),
                ),
            };
            match (i, negative) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            out.push_str(&body);
        }
        out
    }

    fn render_product(&self, e: ExprRef) -> String {
        let factors: Vec<String> = self
            .terms(e)
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| {
                if v == self.one {
                    self.tostr_at(k, Precedence::MUL)
                } else {
                    format!(
                        "{}**{}",
                        self.tostr_at(k, Precedence::POW),
                        self.tostr_at(v, Precedence::POW)
                    )
                }
            })
            .collect();
        factors.join("*")
    }

    /// Constructor-style representation, e.g. `Sum({Symbol('x'): Integer(3)})`.
    pub fn torepr(&self, e: ExprRef) -> String {
        let node = self.node(e);
        match &*node {
            Node::Boolean(b) => format!("Boolean({})", if *b { "True" } else { "False" }),
            Node::Number(n) if n.is_integer() => format!("Integer({})", n),
            Node::Number(n) if n.is_float() => format!("Float({})", n),
            Node::Number(n) => {
                let s = n.to_string();
                let (p, q) = s.split_once('/').unwrap_or((s.as_str(), "1"));
                format!("Fraction({}, {})", p, q)
            }
            Node::Constant(c) => format!("{}()", self.kind_name(c.kind())),
            Node::Symbol(s) if s.is_dummy() => format!("Dummy('{}')", s.name),
            Node::Symbol(s) => format!("Symbol('{}')", s.name),
            Node::Interval(a, b) => format!("Interval({}, {})", self.torepr(*a), self.torepr(*b)),
            Node::Sum(_) | Node::Product(_) => {
                let entries: Vec<String> = self
                    .terms(e)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(k, v)| format!("{}: {}", self.torepr(k), self.torepr(v)))
                    .collect();
                format!("{}({{{}}})", self.kind_name(node.kind()), entries.join(", "))
            }
            Node::Apply(head, args) => {
                let args: Vec<String> = args.iter().map(|&a| self.torepr(a)).collect();
                format!("{}({})", self.kind_name(*head), args.join(", "))
            }
        }
    }
}
