//! Counts move-tree leaves from a position, optionally split by root move.
//!
//! ```text
//! chess-perft --depth 5
//! chess-perft --fen "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1" --depth 3 --divide
//! chess-perft --depth 2 --moves e2e4 e7e5
//! ```

use anyhow::{bail, Context};
use chess_core::Fen;
use chess_engine::{perft, perft_divide, uci, Position};
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Perft driver for the chess engine.
#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Counts legal move-tree leaves to a fixed depth")]
struct Args {
    /// Starting position
    #[arg(long, default_value = Fen::STARTPOS)]
    fen: String,

    /// Search depth in plies
    #[arg(long, short, default_value = "4")]
    depth: u32,

    /// Print the count below each root move
    #[arg(long)]
    divide: bool,

    /// UCI moves to play before counting
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut position = Position::from_fen(&args.fen)
        .with_context(|| format!("invalid FEN '{}'", args.fen))?;
    for text in &args.moves {
        let m = uci::parse_move(&position, text)?;
        if !position.legal_moves(false).contains(m) {
            bail!("illegal move '{}' in {}", text, position.to_fen());
        }
        position.play_move(m);
    }

    tracing::info!(fen = %position.to_fen(), depth = args.depth, "running perft");
    let start = Instant::now();

    let nodes = if args.divide {
        let results = perft_divide(&mut position, args.depth);
        for (name, count) in &results {
            println!("{}: {}", name, count);
        }
        let total: u64 = results.iter().map(|(_, count)| count).sum();
        println!();
        total
    } else {
        perft(&mut position, args.depth)
    };
    println!("Nodes searched: {}", nodes);

    let elapsed = start.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    tracing::info!(nodes, elapsed_ms = elapsed.as_millis() as u64, nps = nps as u64, "done");
    Ok(())
}
