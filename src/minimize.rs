//! Truth tables and two-level minimization.
//!
//! [`Context::minimize`] rebuilds a predicate as a minimal sum of products
//! using the Quine–McCluskey method. Truth tables are the correctness check:
//! a predicate and its minimized form must have equal tables over the same
//! atoms.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::context::Context;
use crate::error::{Result, SymError};
use crate::node::Node;
use crate::reference::ExprRef;

/// Most atoms a truth table is built for; the row vector grows as `2^n`.
pub const MAX_ATOMS: usize = 24;

/// Truth table of a predicate.
///
/// Row `i` holds the value under the assignment given by the bits of `i`,
/// with the first atom as the most significant bit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthTable {
    pub atoms: Vec<ExprRef>,
    pub rows: Vec<bool>,
}

impl TruthTable {
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Rows that evaluate to true.
    pub fn minterms(&self) -> Vec<u64> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| i as u64)
            .collect()
    }

    /// Value under an assignment, one entry per atom.
    pub fn value(&self, assignment: &[bool]) -> Option<bool> {
        if assignment.len() != self.atoms.len() {
            return None;
        }
        let index = assignment.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize);
        self.rows.get(index).copied()
    }
}

/// A product term over `n` atoms: bits under `mask` are "don't care".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Implicant {
    pub value: u64,
    pub mask: u64,
}

impl Implicant {
    pub fn minterm(value: u64) -> Self {
        Self { value, mask: 0 }
    }

    pub fn covers(&self, minterm: u64) -> bool {
        minterm & !self.mask == self.value
    }

    /// Merge two implicants that differ in exactly one cared-for bit.
    pub fn combine(&self, other: &Implicant) -> Option<Implicant> {
        if self.mask != other.mask {
            return None;
        }
        let diff = self.value ^ other.value;
        if diff.count_ones() != 1 {
            return None;
        }
        Some(Implicant {
            value: self.value & !diff,
            mask: self.mask | diff,
        })
    }

    /// Pattern over `0`, `1` and `-`, most significant bit first.
    pub fn pattern(&self, n: usize) -> String {
        (0..n)
            .rev()
            .map(|bit| {
                if self.mask >> bit & 1 == 1 {
                    '-'
                } else if self.value >> bit & 1 == 1 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }
}

/// All prime implicants of the given minterms, sorted by pattern.
pub fn prime_implicants(minterms: &[u64], n: usize) -> Vec<Implicant> {
    let mut current: Vec<Implicant> = minterms.iter().map(|&m| Implicant::minterm(m)).collect();
    let mut primes = Vec::new();

    while !current.is_empty() {
        let mut next = HashSet::new();
        let mut combined = HashSet::new();
        for (i, a) in current.iter().enumerate() {
            for b in &current[i + 1..] {
                if let Some(c) = a.combine(b) {
                    next.insert(c);
                    combined.insert(*a);
                    combined.insert(*b);
                }
            }
        }
        primes.extend(current.iter().filter(|t| !combined.contains(*t)).copied());
        current = next.into_iter().collect();
        current.sort_by_key(|t| t.pattern(n));
    }

    primes.sort_by_key(|t| t.pattern(n));
    primes.dedup();
    primes
}

/// A smallest set of primes covering every minterm.
///
/// Essential primes are taken first. The rest is searched by increasing size;
/// among covers of equal size the one whose patterns come first
/// lexicographically wins (patterns compare as strings, so `-` < `0` < `1`).
pub fn minimal_cover(primes: &[Implicant], minterms: &[u64], n: usize) -> Vec<Implicant> {
    let mut chosen: Vec<Implicant> = Vec::new();
    for &m in minterms {
        let covering: Vec<&Implicant> = primes.iter().filter(|p| p.covers(m)).collect();
        if let [only] = covering[..] {
            if !chosen.contains(only) {
                chosen.push(*only);
            }
        }
    }

    let remaining: Vec<u64> = minterms
        .iter()
        .copied()
        .filter(|&m| !chosen.iter().any(|p| p.covers(m)))
        .collect();

    if !remaining.is_empty() {
        let mut candidates: Vec<Implicant> = primes
            .iter()
            .filter(|p| !chosen.contains(p) && remaining.iter().any(|&m| p.covers(m)))
            .copied()
            .collect();
        candidates.sort_by_key(|p| p.pattern(n));

        let picked = (1..=candidates.len())
            .find_map(|size| first_cover(&candidates, &remaining, size))
            .unwrap_or(candidates);
        chosen.extend(picked);
    }

    chosen.sort_by_key(|p| p.pattern(n));
    chosen
}

/// The first `size`-combination of `candidates` (in lexicographic index order)
/// that covers all of `minterms`.
fn first_cover(candidates: &[Implicant], minterms: &[u64], size: usize) -> Option<Vec<Implicant>> {
    let k = candidates.len();
    if size > k {
        return None;
    }
    let mut idx: Vec<usize> = (0..size).collect();
    loop {
        if minterms
            .iter()
            .all(|&m| idx.iter().any(|&i| candidates[i].covers(m)))
        {
            return Some(idx.iter().map(|&i| candidates[i]).collect());
        }
        // Advance to the next combination.
        let mut i = size;
        loop {
            if i == 0 {
                return None;
            }
            i -= 1;
            if idx[i] != i + k - size {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..size {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

impl Context {
    /// Distinct boolean atoms of `pred`, in total order.
    ///
    /// Atoms are symbols and every boolean-valued application that is not a
    /// connective, such as conditions and type predicates.
    pub fn atoms(&self, pred: ExprRef) -> Vec<ExprRef> {
        let mut seen = HashSet::new();
        let mut stack = vec![pred];
        while let Some(e) = stack.pop() {
            let node = self.node(e);
            match &*node {
                Node::Boolean(_) => {}
                Node::Apply(head, args) if head.is_connective() => stack.extend(args.iter().copied()),
                _ => {
                    seen.insert(e);
                }
            }
        }
        self.sorted(&seen.into_iter().collect::<Vec<_>>())
    }

    /// Evaluate `pred` under every assignment of `atoms` (its own atoms when `None`).
    ///
    /// The table holds `2^n` rows, so at most [`MAX_ATOMS`] atoms are accepted.
    pub fn truth_table(&self, pred: ExprRef, atoms: Option<&[ExprRef]>) -> Result<TruthTable> {
        let atoms = match atoms {
            Some(atoms) => atoms.to_vec(),
            None => self.atoms(pred),
        };
        debug!("truth_table(pred = {}, atoms = {:?})", pred, atoms);

        if atoms.len() > MAX_ATOMS {
            return Err(SymError::invalid(
                "truth_table",
                format!("{} atoms exceed the limit of {}", atoms.len(), MAX_ATOMS),
            ));
        }
        let mut rows = vec![false; 1 << atoms.len()];
        self.fill_rows(pred, &atoms, 0, 0, &mut rows)?;
        Ok(TruthTable { atoms, rows })
    }

    fn fill_rows(&self, pred: ExprRef, atoms: &[ExprRef], depth: usize, index: usize, rows: &mut [bool]) -> Result<()> {
        let free = atoms.len() - depth;
        if let Some(b) = self.as_boolean(pred) {
            let start = index << free;
            rows[start..start + (1 << free)].fill(b);
            return Ok(());
        }
        if free == 0 {
            return Err(SymError::invalid(
                "truth_table",
                format!("{} does not reduce to a literal over the given atoms", self.tostr(pred)),
            ));
        }
        let atom = atoms[depth];
        for value in [false, true] {
            let values = HashMap::from([(atom, value)]);
            let reduced = self.assign(pred, &values)?;
            self.fill_rows(reduced, atoms, depth + 1, index << 1 | value as usize, rows)?;
        }
        Ok(())
    }

    /// Minimal sum-of-products form of `pred`.
    pub fn minimize(&self, pred: ExprRef) -> Result<ExprRef> {
        debug!("minimize(pred = {})", pred);

        let table = self.truth_table(pred, None)?;
        let n = table.num_atoms();
        let minterms = table.minterms();
        if minterms.is_empty() {
            return Ok(self.boolean(false));
        }
        if minterms.len() == table.rows.len() {
            return Ok(self.boolean(true));
        }

        let primes = prime_implicants(&minterms, n);
        let cover = minimal_cover(&primes, &minterms, n);
        debug!(
            "minimize: {} primes, cover = {:?}",
            primes.len(),
            cover.iter().map(|p| p.pattern(n)).collect::<Vec<_>>()
        );

        let mut terms = Vec::with_capacity(cover.len());
        for implicant in &cover {
            let mut literals = Vec::new();
            for (i, &atom) in table.atoms.iter().enumerate() {
                let bit = n - 1 - i;
                if implicant.mask >> bit & 1 == 1 {
                    continue;
                }
                if implicant.value >> bit & 1 == 1 {
                    literals.push(atom);
                } else {
                    literals.push(self.not(atom)?);
                }
            }
            terms.push(self.and(literals)?);
        }
        self.or(terms)
    }
}
