use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use dualboard::{
    chess::board::Board,
    perft::{divide, gamut, perft, perft_with_undo},
};

mod cli;

fn board_from(fen: Option<&str>) -> anyhow::Result<Board> {
    match fen {
        Some(fen) => Board::from_fen(fen)
            .with_context(|| format!("invalid FEN \"{fen}\"")),
        None => Ok(Board::default()),
    }
}

fn show(board: &Board) {
    println!("{board:X}");
    println!("side to move: {}", board.turn());
    println!("status: {:?}", board.check_state(board.turn()));
    let moves = board.legal_moves();
    let moves = moves.iter().map(ToString::to_string).collect::<Vec<_>>();
    println!("legal moves ({}): {}", moves.len(), moves.join(" "));
}

fn run_perft(board: &mut Board, depth: usize, undo: bool, split: bool) {
    let start = Instant::now();
    let nodes = if split {
        let mut total = 0;
        for (m, n) in divide(board, depth) {
            println!("{m}: {n}");
            total += n;
        }
        total
    } else if undo {
        perft_with_undo(board, depth)
    } else {
        perft(board, depth)
    };
    let elapsed = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    println!("depth {depth}: {nodes} nodes in {}ms ({nps:.0} nps)", elapsed.as_millis());
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    match cli.subcommand {
        Some(cli::Subcommands::Perft {
            depth,
            fen,
            undo,
            divide: split,
        }) => {
            let mut board = board_from(fen.as_deref())?;
            run_perft(&mut board, depth, undo, split);
        }
        Some(cli::Subcommands::Suite { path, limit }) => gamut(&path, limit)?,
        Some(cli::Subcommands::Show { fen }) => show(&board_from(fen.as_deref())?),
        None => show(&Board::default()),
    }

    Ok(())
}
