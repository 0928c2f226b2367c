//! Incremental N-Queens legality tracking.
//!
//! The whole game is one formula over N² variables, one per cell
//! (`row * size + col`): queens on the same column, row or diagonal exclude
//! each other and every column needs at least one queen. The satisfying
//! assignments of this formula are exactly the N-Queens solutions.
//!
//! Each move fixes a variable to true by restricting the formula. After
//! every move, a single scan over the board (column by column, rows inside)
//! asks two questions per undecided cell:
//!
//! - is the formula with a queen here unsatisfiable? Then the cell is
//!   [`Cell::Forbidden`];
//! - is the formula *without* a queen here unsatisfiable? Then a queen is
//!   forced: the cell becomes [`Cell::Queen`] and the formula is restricted
//!   right away, so later cells of the same scan see it.
//!
//! One pass is enough. A queen is forced only when every remaining solution
//! already has it, so fixing it changes no other cell's status. Every
//! `Empty` cell left after a scan is therefore a legal move.
//!
//! ```
//! use queens_bdd::board::Cell;
//! use queens_bdd::queens::{Placement, Queens};
//!
//! let mut game = Queens::new(4).unwrap();
//! // The corner belongs to no 4-queens solution.
//! assert_eq!(game.board()[(0, 0)], Cell::Forbidden);
//!
//! assert_eq!(game.insert_queen(0, 1).unwrap(), Placement::Placed);
//! // Only one solution is left and it is filled in.
//! assert_eq!(game.board().queens(), vec![(0, 1), (1, 3), (2, 0), (3, 2)]);
//! assert!(game.is_solved());
//! ```

use std::fmt::{self, Display, Formatter};

use log::{debug, info};
use num_bigint::BigUint;

use crate::bdd::{Bdd, BddConfig};
use crate::board::{Board, Cell};
use crate::error::QueensError;
use crate::reference::Ref;
use crate::types::{Var, VarSet};

pub type Result<T, E = QueensError> = std::result::Result<T, E>;

/// Settings of a [`Queens`] game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct QueensConfig {
    /// Sizing of the underlying BDD manager.
    pub bdd: BddConfig,
    /// Largest accepted board size.
    pub max_size: usize,
    /// Free unreachable nodes after every move.
    pub collect_garbage: bool,
}

impl Default for QueensConfig {
    fn default() -> Self {
        Self {
            bdd: BddConfig::default(),
            max_size: 64,
            collect_garbage: true,
        }
    }
}

impl QueensConfig {
    pub fn with_bdd(mut self, bdd: BddConfig) -> Self {
        self.bdd = bdd;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_collect_garbage(mut self, collect_garbage: bool) -> Self {
        self.collect_garbage = collect_garbage;
        self
    }
}

/// Outcome of [`Queens::insert_queen`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Placement {
    /// The queen was placed.
    Placed,
    /// No remaining solution has a queen on this cell; nothing was placed.
    Rejected,
    /// The cell already held a queen or was forbidden; nothing changed.
    AlreadyDetermined,
}

/// Engine statistics of a game.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stats {
    pub nodes: usize,
    pub formula_size: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_hit_rate: f64,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes (formula: {}), cache: {} hits / {} misses ({:.1}%)",
            self.nodes,
            self.formula_size,
            self.cache_hits,
            self.cache_misses,
            100.0 * self.cache_hit_rate
        )
    }
}

/// An N-Queens game whose legal moves are derived from a BDD.
///
/// Each game owns its own [`Bdd`] manager.
#[derive(Debug)]
pub struct Queens {
    config: QueensConfig,
    size: usize,
    bdd: Bdd,
    vars: VarSet,
    formula: Ref,
    board: Board,
}

impl Queens {
    /// Starts a game on a `size`×`size` board with the default configuration.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_config(size, QueensConfig::default())
    }

    pub fn with_config(size: usize, config: QueensConfig) -> Result<Self> {
        Self::check_size(size, &config)?;

        let cells = size.checked_mul(size).ok_or(QueensError::InvalidSize {
            size,
            max: config.max_size,
        })?;
        let bdd = Bdd::with_config(config.bdd.clone());
        let vars = bdd.allocate(cells)?;
        let mut queens = Self {
            config,
            size,
            bdd,
            vars,
            formula: Ref::ONE,
            board: Board::new(size),
        };

        queens.create_rules()?;
        info!(
            "Initialized {}x{} board, formula has {} nodes",
            size,
            size,
            queens.bdd.size(queens.formula)
        );

        let mut board = Board::new(size);
        queens.formula = queens.update_board(queens.formula, &mut board)?;
        queens.board = board;
        if queens.config.collect_garbage {
            queens.collect_garbage();
        }

        Ok(queens)
    }

    /// Discards the current game and starts a new one on a `size`×`size` board.
    ///
    /// On error the current game is left untouched.
    pub fn initialize_board(&mut self, size: usize) -> Result<()> {
        *self = Self::with_config(size, self.config.clone())?;
        Ok(())
    }

    fn check_size(size: usize, config: &QueensConfig) -> Result<()> {
        if size == 0 || size > config.max_size {
            return Err(QueensError::InvalidSize {
                size,
                max: config.max_size,
            });
        }
        Ok(())
    }

    fn check_coordinate(&self, col: usize, row: usize) -> Result<()> {
        if col >= self.size || row >= self.size {
            return Err(QueensError::InvalidCoordinate {
                col,
                row,
                size: self.size,
            });
        }
        Ok(())
    }

    pub fn config(&self) -> &QueensConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Read-only view of the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Handle of the live formula.
    pub fn formula(&self) -> Ref {
        self.formula
    }

    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    /// Variable of the cell `(col, row)`.
    fn var(&self, col: usize, row: usize) -> Var {
        self.vars.get(row * self.size + col)
    }

    /// Number of queens on the board, placed or forced.
    pub fn queens(&self) -> usize {
        self.board.count(Cell::Queen)
    }

    pub fn is_solved(&self) -> bool {
        self.queens() == self.size
    }

    /// Number of N-Queens solutions that extend the current board.
    pub fn solution_count(&self) -> BigUint {
        // Every queen fixed a variable by restriction, which leaves it free
        // in the formula and doubles the raw count.
        self.bdd.sat_count(self.formula, self.bdd.num_vars()) >> self.queens()
    }

    pub fn stats(&self) -> Stats {
        let cache = self.bdd.cache();
        Stats {
            nodes: self.bdd.num_nodes(),
            formula_size: self.bdd.size(self.formula),
            cache_hits: cache.hits(),
            cache_misses: cache.misses(),
            cache_hit_rate: cache.hit_rate(),
        }
    }

    /// Places a queen at `(col, row)`.
    ///
    /// A move on a cell that is already decided changes nothing. A move that
    /// no remaining solution allows is rejected without touching the
    /// formula. In both other cases the board is rescanned for forced and
    /// forbidden cells.
    pub fn insert_queen(&mut self, col: usize, row: usize) -> Result<Placement> {
        self.check_coordinate(col, row)?;

        if self.board[(col, row)].is_determined() {
            debug!("({}, {}) is already {:?}", col, row, self.board[(col, row)]);
            return Ok(Placement::AlreadyDetermined);
        }

        let with_queen = self.bdd.restrict(self.formula, self.var(col, row), true)?;
        let mut board = self.board.clone();
        let (placement, formula) = if self.bdd.is_zero(with_queen) {
            info!("Rejected queen at ({}, {})", col, row);
            (Placement::Rejected, self.formula)
        } else {
            info!("Placed queen at ({}, {})", col, row);
            board.set(col, row, Cell::Queen);
            (Placement::Placed, with_queen)
        };

        self.formula = self.update_board(formula, &mut board)?;
        self.board = board;
        if self.config.collect_garbage {
            self.collect_garbage();
        }

        Ok(placement)
    }

    /// One pass over the undecided cells of `board`, marking forbidden and
    /// forced cells. Returns the formula with the forced queens applied.
    fn update_board(&self, mut formula: Ref, board: &mut Board) -> Result<Ref> {
        for col in 0..self.size {
            for row in 0..self.size {
                if board[(col, row)].is_determined() {
                    continue;
                }

                let var = self.var(col, row);
                let with_queen = self.bdd.restrict(formula, var, true)?;
                if self.bdd.is_zero(with_queen) {
                    debug!("({}, {}) is forbidden", col, row);
                    board.set(col, row, Cell::Forbidden);
                    continue;
                }

                let without_queen = self.bdd.restrict(formula, var, false)?;
                if self.bdd.is_zero(without_queen) {
                    info!("Queen at ({}, {}) is forced", col, row);
                    board.set(col, row, Cell::Queen);
                    formula = with_queen;
                }
            }
        }
        Ok(formula)
    }

    fn collect_garbage(&self) {
        let freed = self.bdd.collect_garbage(&[self.formula]);
        debug!("GC freed {} nodes, {} remain", freed, self.bdd.num_nodes());
    }

    fn create_rules(&mut self) -> Result<()> {
        for col in 0..self.size {
            for row in 0..self.size {
                self.create_column_rule(col, row)?;
                self.create_row_rule(col, row)?;
                self.create_diagonal_rule(col, row)?;
            }
        }
        self.create_coverage_rule()
    }

    /// ¬(col,row) ∨ ⋀ ¬others
    fn exclusion(&self, col: usize, row: usize, others: &[(usize, usize)]) -> Result<Ref> {
        let mut rest = Ref::ONE;
        for &(x, y) in others {
            let not_other = self.bdd.mk_nvar(self.var(x, y))?;
            rest = self.bdd.apply_and(rest, not_other)?;
        }
        let not_here = self.bdd.mk_nvar(self.var(col, row))?;
        Ok(self.bdd.apply_or(not_here, rest)?)
    }

    fn add_rule(&mut self, rule: Ref) -> Result<()> {
        self.formula = self.bdd.apply_and(self.formula, rule)?;
        Ok(())
    }

    fn create_column_rule(&mut self, col: usize, row: usize) -> Result<()> {
        let others: Vec<_> = (0..self.size).filter(|&y| y != row).map(|y| (col, y)).collect();
        let rule = self.exclusion(col, row, &others)?;
        self.add_rule(rule)
    }

    fn create_row_rule(&mut self, col: usize, row: usize) -> Result<()> {
        let others: Vec<_> = (0..self.size).filter(|&x| x != col).map(|x| (x, row)).collect();
        let rule = self.exclusion(col, row, &others)?;
        self.add_rule(rule)
    }

    fn create_diagonal_rule(&mut self, col: usize, row: usize) -> Result<()> {
        let others = diagonals(self.size, col, row);
        let rule = self.exclusion(col, row, &others)?;
        self.add_rule(rule)
    }

    /// At least one queen in every column.
    fn create_coverage_rule(&mut self) -> Result<()> {
        for col in 0..self.size {
            let mut column = Ref::ZERO;
            for row in 0..self.size {
                let here = self.bdd.mk_var(self.var(col, row))?;
                column = self.bdd.apply_or(column, here)?;
            }
            self.add_rule(column)?;
        }
        Ok(())
    }
}

/// Cells on the four diagonal rays starting next to `(col, row)`.
fn diagonals(size: usize, col: usize, row: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for (dx, dy) in [(1, 1), (-1, -1), (-1, 1), (1, -1)] {
        let mut x = col as isize + dx;
        let mut y = row as isize + dy;
        while (0..size as isize).contains(&x) && (0..size as isize).contains(&y) {
            cells.push((x as usize, y as usize));
            x += dx;
            y += dy;
        }
    }
    cells
}
