//! The BDD manager.
//!
//! All nodes live in one arena owned by [`Bdd`]; formulas are plain [`Ref`]
//! handles into it. Nodes are created only through [`Bdd::mk_node`], which
//! enforces the two ROBDD invariants:
//!
//! - **reduced**: no node has `low == high`, and a unique table per variable
//!   guarantees that a `(variable, low, high)` triple exists at most once;
//! - **ordered**: children always carry a larger variable than their parent.
//!
//! Edges may be complemented. The high edge stored in a node is never
//! negated, which keeps the representation canonical: two handles denote
//! the same function iff they are equal.
//!
//! Operations (`apply_ite` and the combinators built on it, `restrict`) are
//! memoized in a computed table shared across calls.
//!
//! The node table is bounded by [`BddConfig::max_nodes`]. Running out of
//! nodes is reported as [`BddError::NodeCapacityExceeded`] by whichever
//! operation needed the extra node.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::error::BddError;
use crate::node::Node;
use crate::reference::Ref;
use crate::subtable::Subtable;
use crate::types::{NodeId, Var, VarSet};

pub type Result<T, E = BddError> = std::result::Result<T, E>;

/// Key of the computed table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
    Restrict(Ref, Var, bool),
}

/// Sizing of a [`Bdd`] manager.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BddConfig {
    /// Maximum number of nodes (terminal included) the arena may hold.
    pub max_nodes: usize,
    /// Maximum number of variables that can be allocated.
    pub max_vars: usize,
    /// Initial capacity of the computed table, as a power of two.
    pub cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            max_nodes: 2_000_000,
            max_vars: 4096,
            cache_bits: 18,
        }
    }
}

impl BddConfig {
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_max_vars(mut self, max_vars: usize) -> Self {
        self.max_vars = max_vars;
        self
    }

    pub fn with_cache_bits(mut self, cache_bits: usize) -> Self {
        self.cache_bits = cache_bits;
        self
    }
}

pub struct Bdd {
    config: BddConfig,
    nodes: RefCell<Vec<Node>>,
    free: RefCell<Vec<NodeId>>,
    subtables: RefCell<Vec<Subtable>>,
    cache: RefCell<Cache<OpKey, Ref>>,
}

impl Bdd {
    pub fn with_config(config: BddConfig) -> Self {
        assert!(config.max_nodes >= 1, "Node table must fit the terminal node");
        assert!(
            config.max_nodes <= NodeId::MAX as usize + 1,
            "Node table can hold at most 2^31 nodes"
        );

        let cache = Cache::new(config.cache_bits);
        Self {
            config,
            nodes: RefCell::new(vec![Node::TERMINAL]),
            free: RefCell::new(Vec::new()),
            subtables: RefCell::new(Vec::new()),
            cache: RefCell::new(cache),
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::with_config(BddConfig::default())
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("capacity", &self.config.max_nodes)
            .field("nodes", &self.num_nodes())
            .field("vars", &self.num_vars())
            .finish()
    }
}

impl Bdd {
    pub fn config(&self) -> &BddConfig {
        &self.config
    }

    pub fn cache(&self) -> std::cell::Ref<'_, Cache<OpKey, Ref>> {
        self.cache.borrow()
    }

    /// Number of allocated variables.
    pub fn num_vars(&self) -> usize {
        self.subtables.borrow().len()
    }

    /// Number of live nodes, terminal included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len() - self.free.borrow().len()
    }

    pub fn one(&self) -> Ref {
        Ref::ONE
    }
    pub fn zero(&self) -> Ref {
        Ref::ZERO
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::ONE
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.is_terminal()
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes.borrow()[id.index()]
    }
    pub fn variable(&self, id: NodeId) -> Var {
        self.node(id).variable
    }
    pub fn low(&self, id: NodeId) -> Ref {
        self.node(id).low
    }
    pub fn high(&self, id: NodeId) -> Ref {
        self.node(id).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.id());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.id());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    fn check_var(&self, v: Var) -> Result<()> {
        if v.is_terminal() || v.index() >= self.num_vars() {
            return Err(BddError::UnknownVariable(v));
        }
        Ok(())
    }

    /// Reserves `n` fresh variables, placed after all existing ones in the order.
    pub fn allocate(&self, n: usize) -> Result<VarSet> {
        let allocated = self.num_vars();
        if allocated + n > self.config.max_vars {
            return Err(BddError::VariableCapacityExceeded {
                requested: n,
                allocated,
                limit: self.config.max_vars,
            });
        }
        // Every variable needs at least its own literal node.
        if self.num_nodes() + n > self.config.max_nodes {
            return Err(BddError::NodeCapacityExceeded {
                limit: self.config.max_nodes,
            });
        }

        let first = allocated as u32 + 1;
        let mut subtables = self.subtables.borrow_mut();
        for i in 0..n {
            subtables.push(Subtable::new(Var::new(first + i as u32)));
        }
        debug!("allocated {} variables starting at x{}", n, first);
        Ok(VarSet::new(first, n))
    }

    fn alloc(&self, node: Node) -> Result<NodeId> {
        if let Some(id) = self.free.borrow_mut().pop() {
            self.nodes.borrow_mut()[id.index()] = node;
            return Ok(id);
        }

        let mut nodes = self.nodes.borrow_mut();
        if nodes.len() >= self.config.max_nodes {
            return Err(BddError::NodeCapacityExceeded {
                limit: self.config.max_nodes,
            });
        }
        let id = NodeId::new(nodes.len() as u32);
        nodes.push(node);
        Ok(id)
    }

    pub fn mk_node(&self, v: Var, low: Ref, high: Ref) -> Result<Ref> {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        // Handle duplicates
        if low == high {
            return Ok(low);
        }

        // Handle canonicity
        if high.is_negated() {
            return Ok(-self.mk_node(v, -low, -high)?);
        }

        self.check_var(v)?;
        debug_assert!(
            v < self.variable(low.id()) && v < self.variable(high.id()),
            "Variable order violated: {} above {} / {}",
            v,
            self.variable(low.id()),
            self.variable(high.id())
        );

        let existing = self.subtables.borrow()[v.index()].find(low, high);
        if let Some(id) = existing {
            return Ok(Ref::positive(id));
        }

        let id = self.alloc(Node::new(v, low, high))?;
        self.subtables.borrow_mut()[v.index()].insert(low, high, id);
        Ok(Ref::positive(id))
    }

    /// The formula "`v` is true".
    pub fn mk_var(&self, v: Var) -> Result<Ref> {
        self.mk_node(v, Ref::ZERO, Ref::ONE)
    }

    /// The formula "`v` is false".
    pub fn mk_nvar(&self, v: Var) -> Result<Ref> {
        Ok(-self.mk_var(v)?)
    }

    pub fn top_cofactors(&self, node: Ref, v: Var) -> (Ref, Ref) {
        let n = self.node(node.id());
        if n.variable != v {
            debug_assert!(v < n.variable, "{} is below the top variable {}", v, n.variable);
            return (node, node);
        }
        if node.is_negated() {
            (-n.low, -n.high)
        } else {
            (n.low, n.high)
        }
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use queens_bdd::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let vars = bdd.allocate(3).unwrap();
    /// let x = bdd.mk_var(vars.get(0)).unwrap();
    /// let y = bdd.mk_var(vars.get(1)).unwrap();
    /// let z = bdd.mk_var(vars.get(2)).unwrap();
    /// let f = bdd.apply_ite(x, y, z).unwrap();
    /// let x_and_y = bdd.apply_and(x, y).unwrap();
    /// let not_x_and_z = bdd.apply_and(-x, z).unwrap();
    /// assert_eq!(f, bdd.apply_or(x_and_y, not_x_and_z).unwrap());
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Result<Ref> {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return Ok(g);
        }
        if self.is_zero(f) {
            return Ok(h);
        }

        // From now on, F is known not to be a constant.

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        //   ite(F,1,~F) => 1
        //   ite(F,F,1) => 1
        //   ite(F,~F,0) => 0
        if g == h {
            return Ok(g);
        }
        if self.is_one(g) && self.is_zero(h) {
            return Ok(f);
        }
        if self.is_zero(g) && self.is_one(h) {
            return Ok(-f);
        }
        if self.is_one(g) && h == -f {
            return Ok(Ref::ONE);
        }
        if g == f && self.is_one(h) {
            return Ok(Ref::ONE);
        }
        if g == -f && self.is_zero(h) {
            return Ok(Ref::ZERO);
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, Ref::ONE, h);
        }
        if h == f {
            return self.apply_ite(f, g, Ref::ZERO);
        }
        if g == -f {
            return self.apply_ite(f, Ref::ZERO, h);
        }
        if h == -f {
            return self.apply_ite(f, g, Ref::ONE);
        }

        let i = self.variable(f.id());
        let j = self.variable(g.id());
        let k = self.variable(h.id());

        // Equivalent pairs:
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        // (choose the one with the lowest variable)
        if self.is_one(g) && k < i {
            return self.apply_ite(h, Ref::ONE, f);
        }
        if self.is_zero(h) && j < i {
            return self.apply_ite(g, f, Ref::ZERO);
        }
        if self.is_one(h) && j < i {
            return self.apply_ite(-g, -f, Ref::ONE);
        }
        if self.is_zero(g) && k < i {
            return self.apply_ite(-h, Ref::ZERO, -f);
        }
        if g == -h && j < i {
            return self.apply_ite(g, f, -f);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(res) = cached {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return Ok(if n { -res } else { res });
        }

        // Determine the top variable (terminals sort last):
        let m = i.min(j).min(k);
        debug_assert!(!m.is_terminal());

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0)?;
        let t = self.apply_ite(f1, g1, h1)?;

        let res = self.mk_node(m, e, t)?;
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        Ok(if n { -res } else { res })
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_and(u = {}, v = {})", u, v);
        self.apply_ite(u, v, Ref::ZERO)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_or(u = {}, v = {})", u, v);
        self.apply_ite(u, Ref::ONE, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_xor(u = {}, v = {})", u, v);
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_eq(u = {}, v = {})", u, v);
        self.apply_ite(u, v, -v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_imply(u = {}, v = {})", u, v);
        self.apply_ite(u, v, Ref::ONE)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref> {
        let mut res = Ref::ONE;
        for node in nodes {
            res = self.apply_and(res, node)?;
        }
        Ok(res)
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref> {
        let mut res = Ref::ZERO;
        for node in nodes {
            res = self.apply_or(res, node)?;
        }
        Ok(res)
    }

    /// f|v<-value
    ///
    /// Substitutes the constant `value` for `v` and returns the reduced result.
    pub fn restrict(&self, f: Ref, v: Var, value: bool) -> Result<Ref> {
        debug!("restrict(f = {}, v = {}, value = {})", f, v, value);
        self.check_var(v)?;
        self.restrict_(f, v, value)
    }

    fn restrict_(&self, f: Ref, v: Var, value: bool) -> Result<Ref> {
        let i = self.variable(f.id());

        if v < i {
            // 'f' does not depend on 'v'
            return Ok(f);
        }

        if v == i {
            let (f0, f1) = self.top_cofactors(f, v);
            return Ok(if value { f1 } else { f0 });
        }

        // restrict(~f) == ~restrict(f)
        if f.is_negated() {
            return Ok(-self.restrict_(-f, v, value)?);
        }

        let key = OpKey::Restrict(f, v, value);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(res) = cached {
            return Ok(res);
        }

        let (f0, f1) = self.top_cofactors(f, i);
        let low = self.restrict_(f0, v, value)?;
        let high = self.restrict_(f1, v, value)?;
        let res = self.mk_node(i, low, high)?;
        self.cache.borrow_mut().insert(key, res);
        Ok(res)
    }

    /// IDs of all nodes reachable from `nodes`, terminal included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        visited.insert(NodeId::TERMINAL);
        let mut queue = VecDeque::from_iter(nodes.into_iter().map(Ref::id));

        while let Some(id) = queue.pop_front() {
            if visited.insert(id) {
                let node = self.node(id);
                queue.push_back(node.low.id());
                queue.push_back(node.high.id());
            }
        }

        visited
    }

    /// Number of nodes in the graph of `f`, terminal included.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    /// Frees every node not reachable from `roots` and clears the computed table.
    ///
    /// Handles to freed nodes become dangling: callers must pass every
    /// formula they intend to keep using. Returns the number of freed nodes.
    pub fn collect_garbage(&self, roots: &[Ref]) -> usize {
        debug!("Collecting garbage...");

        self.cache.borrow_mut().clear();

        let alive = self.descendants(roots.iter().copied());
        let mut free = self.free.borrow_mut();
        let mut freed = 0;
        for subtable in self.subtables.borrow_mut().iter_mut() {
            let removed = subtable.retain(|id| alive.contains(&id));
            freed += removed.len();
            free.extend(removed);
        }

        debug!("Freed {} nodes, {} alive", freed, alive.len());
        freed
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        let v = self.variable(node.id());
        let low = self.low_node(node);
        let high = self.high_node(node);

        format!(
            "{}:({}, {}, {})",
            node,
            v,
            self.to_bracket_string(high),
            self.to_bracket_string(low)
        )
    }
}
