//! Type-safe wrappers for BDD variables and node identifiers.
//!
//! Newtypes keep variable IDs and node slots apart, so a node index can
//! never be passed where a variable is expected.

use std::fmt;

/// A variable identifier (1-indexed).
///
/// The variable order is the natural order of IDs: `x1 < x2 < ...`.
///
/// # Invariants
///
/// - Variable IDs must be >= 1
/// - [`Var::TERMINAL`] is a sentinel ordered after every real variable
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Pseudo-variable carried by the terminal node.
    ///
    /// Because it compares greater than every allocated variable, the top
    /// variable of a set of operands is simply their minimum.
    pub const TERMINAL: Var = Var(u32::MAX);

    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw variable ID.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Zero-based position of this variable, e.g. for indexing subtables.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "x⊥")
        } else {
            write!(f, "x{}", self.0)
        }
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Index of a node slot in the manager's arena.
///
/// Slot 0 always holds the terminal node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The terminal node.
    pub const TERMINAL: NodeId = NodeId(0);

    /// Largest ID that still fits into a [`Ref`][crate::reference::Ref].
    pub const MAX: u32 = 0x7FFF_FFFF;

    /// Creates a node ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` exceeds [`NodeId::MAX`].
    pub const fn new(id: u32) -> Self {
        assert!(id <= Self::MAX, "Node ID out of range");
        NodeId(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_terminal(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId::new(id)
    }
}

/// A contiguous block of variables handed out by
/// [`Bdd::allocate`][crate::bdd::Bdd::allocate].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VarSet {
    first: u32,
    len: usize,
}

impl VarSet {
    pub(crate) fn new(first: u32, len: usize) -> Self {
        Self { first, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the `i`-th variable of the set (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn get(&self, i: usize) -> Var {
        assert!(i < self.len, "Variable {} out of range 0..{}", i, self.len);
        Var::new(self.first + i as u32)
    }

    pub fn iter(&self) -> impl Iterator<Item = Var> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}
