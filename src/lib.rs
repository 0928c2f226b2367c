//! # queens-bdd: incremental N-Queens on Binary Decision Diagrams
//!
//! **`queens-bdd`** tracks an interactive N-Queens game and tells, after every move,
//! which cells can no longer take a queen and which cells must take one.
//!
//! ## What is a BDD?
//!
//! A Binary Decision Diagram is a data structure that represents a boolean function as a directed acyclic graph.
//! It is **canonical**: for a fixed variable ordering, every boolean function has exactly one representation.
//! Checking whether a formula is unsatisfiable is therefore a constant-time comparison with the `0` terminal.
//!
//! ## How the game uses it
//!
//! - One variable per cell; the whole rule set (at most one queen per column, row and diagonal,
//!   at least one queen per column) is a single formula whose models are the N-Queens solutions.
//! - A move restricts the cell's variable to true.
//! - A cell is **forbidden** when restricting it to true yields `0`, and **forced**
//!   when restricting it to false yields `0`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use num_bigint::BigUint;
//! use queens_bdd::board::Cell;
//! use queens_bdd::queens::{Placement, Queens};
//!
//! let mut game = Queens::new(8).unwrap();
//! assert_eq!(game.solution_count(), BigUint::from(92u32));
//!
//! assert_eq!(game.insert_queen(0, 0).unwrap(), Placement::Placed);
//! assert_eq!(game.board()[(0, 0)], Cell::Queen);
//! assert_eq!(game.board()[(1, 1)], Cell::Forbidden);
//! assert_eq!(game.solution_count(), BigUint::from(4u32));
//! ```
//!
//! The engine can also be used on its own:
//!
//! ```rust
//! use queens_bdd::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let vars = bdd.allocate(2).unwrap();
//! let x1 = bdd.mk_var(vars.get(0)).unwrap();
//! let x2 = bdd.mk_var(vars.get(1)).unwrap();
//!
//! // f = x1 AND (NOT x2)
//! let f = bdd.apply_and(x1, bdd.apply_not(x2)).unwrap();
//! assert!(!bdd.is_zero(f));
//!
//! let g = bdd.restrict(f, vars.get(1), true).unwrap();
//! assert!(bdd.is_zero(g));
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The [`Bdd`][crate::bdd::Bdd] manager: unique table, computed table, ITE and restriction.
//! - **[`queens`]**: The game controller.
//! - **[`board`]**: The board the player sees.
//! - **[`sat`]**: Model counting.
//! - **[`dot`]**: Utilities for visualizing BDDs using Graphviz.

pub mod bdd;
pub mod board;
pub mod cache;
pub mod dot;
pub mod error;
pub mod node;
pub mod queens;
pub mod reference;
pub mod sat;
pub mod subtable;
pub mod types;
