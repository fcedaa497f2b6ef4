use std::fmt::{Display, Formatter};

/// Handle to a canonical node stored in a [`Context`][crate::context::Context].
///
/// Nodes are hash-consed, so two handles are equal iff the nodes they point to
/// have equal kind and equal canonical contents. Handles are only meaningful
/// for the context that produced them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExprRef(u32);

impl ExprRef {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the index of the node in the table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for ExprRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ExprRef::new(42).to_string(), "@42");
    }

    #[test]
    fn test_index() {
        let r = ExprRef::new(7);
        assert_eq!(r.index(), 7);
        assert_eq!(r.get(), 7);
    }
}
