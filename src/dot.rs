//! BDD to DOT (Graphviz) conversion.
//!
//! Conventions of the generated graph:
//! - the two constants are squares at the bottom (sink rank),
//! - variable nodes are circles, one rank per variable,
//! - solid edges are high (then) branches, dashed edges are low (else)
//!   branches, and negated edges end in a hollow circle,
//! - roots are rectangles at the top (source rank).
//!
//! ```
//! use queens_bdd::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let vars = bdd.allocate(2).unwrap();
//! let x1 = bdd.mk_var(vars.get(0)).unwrap();
//! let x2 = bdd.mk_var(vars.get(1)).unwrap();
//! let f = bdd.apply_and(x1, x2).unwrap();
//!
//! let dot = bdd.to_dot(&[f]).unwrap();
//! assert!(dot.starts_with("graph {"));
//! // Render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::bdd::Bdd;
use crate::reference::Ref;
use crate::types::{NodeId, Var};

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    pub node_shape: &'static str,
    pub terminal_shape: &'static str,
    pub root_shape: &'static str,
    pub high_edge_style: &'static str,
    pub low_edge_style: &'static str,
    /// Labels for variable nodes; defaults to `x<id>`.
    pub var_label: fn(Var) -> String,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            var_label: |v| v.to_string(),
        }
    }
}

fn target(r: Ref) -> String {
    match r {
        Ref::ONE => "one".to_string(),
        Ref::ZERO => "zero".to_string(),
        _ => format!("n{}", r.id().raw()),
    }
}

fn arrow(r: Ref) -> &'static str {
    if r.is_negated() && !r.is_terminal() {
        ", dir=forward, arrowhead=odot"
    } else {
        ""
    }
}

impl Bdd {
    /// Converts the graphs rooted at `roots` to DOT format.
    ///
    /// Shared nodes are displayed once.
    pub fn to_dot(&self, roots: &[Ref]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    pub fn to_dot_with_config(&self, roots: &[Ref], config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}, fixedsize=true];", config.node_shape)?;

        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "zero [shape={}, label=\"0\"];", config.terminal_shape)?;
        writeln!(dot, "one [shape={}, label=\"1\"];", config.terminal_shape)?;
        writeln!(dot, "}}")?;

        let all_nodes = self.descendants(roots.iter().copied());

        let mut levels = BTreeMap::<Var, Vec<NodeId>>::new();
        for &id in all_nodes.iter() {
            if id.is_terminal() {
                continue;
            }
            levels.entry(self.variable(id)).or_default().push(id);
        }

        for (&var, ids) in levels.iter_mut() {
            ids.sort();
            writeln!(dot, "{{ rank=same")?;
            for id in ids.iter() {
                writeln!(dot, "n{} [label=\"{}\"];", id.raw(), (config.var_label)(var))?;
            }
            writeln!(dot, "}}")?;
        }

        for ids in levels.values() {
            for &id in ids {
                let node = self.node(id);
                debug_assert!(!node.high.is_negated());
                writeln!(
                    dot,
                    "n{} -- {} [style={}];",
                    id.raw(),
                    target(node.high),
                    config.high_edge_style
                )?;
                writeln!(
                    dot,
                    "n{} -- {} [style={}{}];",
                    id.raw(),
                    target(node.low),
                    config.low_edge_style,
                    arrow(node.low)
                )?;
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
        }
        writeln!(dot, "}}")?;

        for (i, &root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -- {} [{}];", i, target(root), arrow(root).trim_start_matches(", "))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dot_basic() {
        let bdd = Bdd::default();
        let vars = bdd.allocate(3).unwrap();
        let x1 = bdd.mk_var(vars.get(0)).unwrap();
        let x3 = bdd.mk_var(vars.get(2)).unwrap();
        let f = bdd.apply_and(-x1, x3).unwrap();

        let dot = bdd.to_dot(&[f]).unwrap();
        assert!(dot.starts_with("graph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("label=\"x1\""));
        assert!(dot.contains("label=\"x3\""));
        assert!(!dot.contains("label=\"x2\""));
    }

    #[test]
    fn test_to_dot_negated_root() {
        let bdd = Bdd::default();
        let vars = bdd.allocate(2).unwrap();
        let x1 = bdd.mk_var(vars.get(0)).unwrap();
        let x2 = bdd.mk_var(vars.get(1)).unwrap();
        let f = bdd.apply_or(x1, x2).unwrap();

        let dot = bdd.to_dot(&[-f, bdd.zero(), bdd.one()]).unwrap();
        assert!(dot.contains("arrowhead=odot"));
        assert!(dot.contains("r1 -- zero"));
        assert!(dot.contains("r2 -- one"));
    }

    #[test]
    fn test_to_dot_custom_labels() {
        let bdd = Bdd::default();
        let vars = bdd.allocate(1).unwrap();
        let x = bdd.mk_var(vars.get(0)).unwrap();

        let config = DotConfig {
            var_label: |v| format!("cell{}", v.index()),
            ..DotConfig::default()
        };
        let dot = bdd.to_dot_with_config(&[x], &config).unwrap();
        assert!(dot.contains("label=\"cell0\""));
    }
}
