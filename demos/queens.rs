use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use log::info;

use queens_bdd::bdd::BddConfig;
use queens_bdd::queens::{Placement, Queens, QueensConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Board size.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Maximum number of BDD nodes.
    #[clap(long, value_name = "INT", default_value = "2000000")]
    max_nodes: usize,

    /// Disable garbage collection after each move.
    #[clap(long)]
    no_gc: bool,

    /// Write the final formula in DOT format to this file.
    #[clap(long, value_name = "FILE")]
    dot: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let config = QueensConfig::default()
        .with_bdd(BddConfig::default().with_max_nodes(args.max_nodes))
        .with_collect_garbage(!args.no_gc);
    let mut game = Queens::with_config(args.n, config)?;

    println!("{}", game.board());
    println!("{} solutions, {}", game.solution_count(), game.stats());
    println!("Enter moves as `col row` (0-based), one per line:");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let coords: Vec<usize> = line
            .split_whitespace()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()
            .wrap_err_with(|| format!("Bad move `{}`", line))?;
        let &[col, row] = coords.as_slice() else {
            bail!("Expected `col row`, got `{}`", line);
        };

        match game.insert_queen(col, row) {
            Ok(Placement::Placed) => {}
            Ok(Placement::Rejected) => println!("Illegal move ({}, {})", col, row),
            Ok(Placement::AlreadyDetermined) => println!("Cell ({}, {}) is already decided", col, row),
            Err(e) => {
                println!("{}", e);
                continue;
            }
        }

        println!("{}", game.board());
        println!("{} solutions, {}", game.solution_count(), game.stats());
        if game.is_solved() {
            println!("Solved!");
            break;
        }
    }

    if let Some(path) = &args.dot {
        let dot = game.bdd().to_dot(&[game.formula()])?;
        std::fs::write(path, dot).wrap_err_with(|| format!("Could not write {}", path.display()))?;
        info!("Formula written to {}", path.display());
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
