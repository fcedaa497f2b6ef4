//! # sym-rs: canonical forms for symbolic expressions
//!
//! **`sym-rs`** is a manager-centric library that turns sums, products and boolean predicates
//! into a unique, cached, immutable normal form.
//! Semantically equal constructions are represented by the same handle.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the [`Context`][crate::context::Context].
//!   It owns the hash-consed node table, the kind registry and the construction caches.
//! - **Lightweight Handles**: Expressions are [`ExprRef`][crate::reference::ExprRef] handles.
//!   Equal canonical nodes always get equal handles, so equality is a single integer comparison.
//! - **Builders**: [`SumBuilder`][crate::sum::SumBuilder] and [`ProductBuilder`][crate::product::ProductBuilder]
//!   accumulate terms and are consumed by `finish`, which produces the canonical node.
//! - **Boolean Algebra**: `Not`, `And`, `Or`, `XOr`, `Implies` and `Equiv` canonicalize on construction;
//!   predicates can be refined, tested under assumptions, and minimized with Quine–McCluskey.
//! - **Total Order**: every pair of expressions is comparable, independently of construction history.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sym_rs::context::Context;
//!
//! // 1. Initialize the manager
//! let ctx = Context::default();
//!
//! // 2. Create symbols
//! let x = ctx.symbol("x");
//! let y = ctx.symbol("y");
//!
//! // 3. Build expressions through the manager
//! let s = ctx.add_many([x, x, x]);
//! assert_eq!(s, ctx.mul(ctx.integer(3), x));
//! assert_eq!(ctx.tostr(s), "3*x");
//!
//! // 4. Powers fold
//! let x5 = ctx.mul(ctx.pow(x, ctx.integer(3)), ctx.pow(x, ctx.integer(2)));
//! assert_eq!(ctx.tostr(x5), "x**5");
//!
//! // 5. Predicates canonicalize and minimize
//! let a = ctx.symbol("a");
//! let na = ctx.not(a).unwrap();
//! assert_eq!(ctx.and([a, na]).unwrap(), ctx.boolean(false));
//!
//! let f = ctx.or([a, ctx.and([a, y]).unwrap()]).unwrap();
//! assert_eq!(ctx.minimize(f).unwrap(), a);
//! ```
//!
//! ## Core Components
//!
//! - **[`context`]**: The [`Context`][crate::context::Context] manager.
//! - **[`sum`]**, **[`product`]**: Accumulators and the arithmetic constructors.
//! - **[`predicate`]**: Boolean connectives, conditions and type predicates.
//! - **[`minimize`]**: Truth tables and Quine–McCluskey minimization.
//! - **[`kind`]**: Node kinds and their global order.

pub mod cache;
pub mod context;
pub mod error;
pub mod eval;
pub mod function;
pub mod kind;
pub mod minimize;
pub mod node;
pub mod number;
pub mod order;
pub mod predicate;
pub mod printer;
pub mod product;
pub mod reference;
pub mod sum;
pub mod sympify;
pub mod table;
pub mod types;
pub mod utils;
