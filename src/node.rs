use crate::reference::Ref;
use crate::types::Var;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: Var,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    /// The single terminal node stored in slot 0.
    pub const TERMINAL: Node = Node {
        variable: Var::TERMINAL,
        low: Ref::ONE,
        high: Ref::ONE,
    };

    pub fn new(variable: Var, low: Ref, high: Ref) -> Self {
        Self { variable, low, high }
    }
}
