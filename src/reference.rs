use std::fmt::{Display, Formatter};
use std::ops::Neg;

use crate::types::NodeId;

/// A reference to a BDD node, possibly negated (complemented edge).
///
/// The least significant bit holds the negation flag and the remaining
/// bits store the node ID.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    /// The constant true function.
    pub const ONE: Self = Self::positive(NodeId::TERMINAL);
    /// The constant false function.
    pub const ZERO: Self = Self::negative(NodeId::TERMINAL);

    pub const fn new(id: NodeId, negated: bool) -> Self {
        Self((id.raw() << 1) | (negated as u32))
    }

    pub const fn positive(id: NodeId) -> Self {
        Self::new(id, false)
    }

    pub const fn negative(id: NodeId) -> Self {
        Self::new(id, true)
    }

    /// Returns the node ID this reference points to.
    #[inline]
    pub const fn id(self) -> NodeId {
        NodeId::new(self.0 >> 1)
    }

    #[inline]
    pub const fn is_negated(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Returns the non-negated version of this reference.
    #[inline]
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }

    pub const fn is_terminal(self) -> bool {
        self.id().is_terminal()
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            write!(f, "~{}", self.id())
        } else {
            write!(f, "{}", self.id())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_positive_negative() {
        let id = NodeId::new(42);

        let pos = Ref::positive(id);
        assert_eq!(pos.id(), id);
        assert!(!pos.is_negated());

        let neg = Ref::negative(id);
        assert_eq!(neg.id(), id);
        assert!(neg.is_negated());
        assert_ne!(pos, neg);
        assert_eq!(neg.regular(), pos);
    }

    #[test]
    fn test_ref_negation() {
        let pos = Ref::positive(NodeId::new(5));
        let neg = -pos;
        assert!(neg.is_negated());
        assert_eq!(-neg, pos);
    }

    #[test]
    fn test_terminals() {
        assert_eq!(-Ref::ONE, Ref::ZERO);
        assert!(Ref::ONE.is_terminal());
        assert!(Ref::ZERO.is_terminal());
        assert!(!Ref::positive(NodeId::new(1)).is_terminal());
    }

    #[test]
    fn test_ref_display() {
        let id = NodeId::new(42);
        assert_eq!(format!("{}", Ref::positive(id)), "@42");
        assert_eq!(format!("{}", Ref::negative(id)), "~@42");
    }
}
