use num_bigint::BigUint;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use test_log::test;

use queens_bdd::board::{Board, Cell};
use queens_bdd::queens::{Placement, Queens};

/// All N-Queens solutions as `rows[col]`.
fn solutions(n: usize) -> Vec<Vec<usize>> {
    fn go(n: usize, rows: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        let col = rows.len();
        if col == n {
            out.push(rows.clone());
            return;
        }
        for row in 0..n {
            let safe = rows
                .iter()
                .enumerate()
                .all(|(c, &r)| r != row && col - c != row.abs_diff(r));
            if safe {
                rows.push(row);
                go(n, rows, out);
                rows.pop();
            }
        }
    }

    let mut out = Vec::new();
    go(n, &mut Vec::new(), &mut out);
    out
}

/// Solutions that put a queen on every queen of `board`.
fn extensions<'a>(all: &'a [Vec<usize>], board: &Board) -> Vec<&'a Vec<usize>> {
    let queens = board.queens();
    all.iter()
        .filter(|rows| queens.iter().all(|&(col, row)| rows[col] == row))
        .collect()
}

/// Checks that every decided cell agrees with the solutions extending the board.
fn check_consistent(game: &Queens, all: &[Vec<usize>]) {
    let board = game.board();
    let ext = extensions(all, board);

    assert_eq!(game.solution_count(), BigUint::from(ext.len()));

    for (col, row, cell) in board.iter() {
        let used = ext.iter().filter(|rows| rows[col] == row).count();
        match cell {
            Cell::Queen => assert_eq!(used, ext.len(), "queen at ({}, {}) is not in every solution", col, row),
            Cell::Forbidden => assert_eq!(used, 0, "forbidden ({}, {}) is in a solution", col, row),
            Cell::Empty => {}
        }
    }
}

#[test]
fn test_brute_force_counts() {
    let expected = [1, 0, 0, 2, 10, 4, 40, 92];
    for (i, &count) in expected.iter().enumerate() {
        assert_eq!(solutions(i + 1).len(), count);
    }
}

#[test]
fn test_initial_board_matches_brute_force() {
    for n in 1..=7 {
        let game = Queens::new(n).unwrap();
        let all = solutions(n);

        check_consistent(&game, &all);

        // Before any move the marking is exact: a cell is forbidden iff no
        // solution uses it, and nothing is forced for n > 1.
        for (col, row, cell) in game.board().iter() {
            let used = all.iter().any(|rows| rows[col] == row);
            if !used {
                assert_eq!(cell, Cell::Forbidden, "n={} ({}, {})", n, col, row);
            } else if n > 1 {
                assert_eq!(cell, Cell::Empty, "n={} ({}, {})", n, col, row);
            }
        }
    }
}

#[test]
fn test_four_by_four_game() {
    let mut game = Queens::new(4).unwrap();
    assert_eq!(game.insert_queen(0, 0).unwrap(), Placement::AlreadyDetermined);

    assert_eq!(game.insert_queen(0, 1).unwrap(), Placement::Placed);
    assert!(game.is_solved());

    let board = game.board();
    assert_eq!(board.queens(), vec![(0, 1), (1, 3), (2, 0), (3, 2)]);
    assert_eq!(board.count(Cell::Forbidden), 12);
    assert_eq!(
        board.to_grid(),
        vec![
            vec![-1i8, 1, -1, -1],
            vec![-1, -1, -1, 1],
            vec![1, -1, -1, -1],
            vec![-1, -1, 1, -1],
        ]
    );
}

#[test]
fn test_transposed_games_agree() {
    // The rules are symmetric in columns and rows.
    let n = 6;
    let mut game = Queens::new(n).unwrap();
    let mut mirror = Queens::new(n).unwrap();
    assert_eq!(game.board().transpose(), *mirror.board());

    game.insert_queen(1, 0).unwrap();
    mirror.insert_queen(0, 1).unwrap();
    assert_eq!(game.solution_count(), mirror.solution_count());
    assert_eq!(game.board().queens().len(), mirror.board().queens().len());
}

#[test]
fn test_random_games() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for n in 4..=7 {
        let all = solutions(n);

        for _ in 0..10 {
            let mut game = Queens::new(n).unwrap();
            check_consistent(&game, &all);

            while game.board().count(Cell::Empty) > 0 {
                let col = rng.random_range(0..n);
                let row = rng.random_range(0..n);

                let before = game.board().clone();
                let legal = extensions(&all, &before).iter().any(|rows| rows[col] == row);

                let placement = game.insert_queen(col, row).unwrap();
                let after = game.board();

                match placement {
                    Placement::AlreadyDetermined => {
                        assert!(before[(col, row)].is_determined());
                        assert_eq!(after, &before);
                    }
                    Placement::Placed => {
                        assert!(legal, "({}, {}) was placed but is illegal", col, row);
                        assert_eq!(after[(col, row)], Cell::Queen);
                    }
                    Placement::Rejected => {
                        // Every cell left empty by a scan is a legal move.
                        panic!("empty cell ({}, {}) was rejected", col, row);
                    }
                }

                // Decided cells never change.
                for (c, r, cell) in before.iter() {
                    if cell.is_determined() {
                        assert_eq!(after[(c, r)], cell);
                    }
                }

                check_consistent(&game, &all);
            }

            // A fully decided board of a solvable size is a solution.
            if !all.is_empty() {
                assert!(game.is_solved());
                assert_eq!(game.solution_count(), BigUint::from(1u32));
            }
        }
    }
}

#[test]
fn test_out_of_range_moves_are_errors() {
    let mut game = Queens::new(4).unwrap();
    let before = game.board().clone();
    assert!(game.insert_queen(4, 4).is_err());
    assert!(game.insert_queen(0, 100).is_err());
    assert_eq!(game.board(), &before);
}
