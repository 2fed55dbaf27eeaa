use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Option<Subcommands>,
}

#[derive(Subcommand)]
pub enum Subcommands {
    /// Count the leaf nodes of the move tree from a position.
    Perft {
        /// Depth of the tree, in plies.
        #[clap(short, long)]
        depth: usize,
        /// Position to count from - if omitted, the starting position is used.
        #[clap(long)]
        fen: Option<String>,
        /// Apply and undo moves on one board instead of copying it per move.
        #[clap(long)]
        undo: bool,
        /// Print the node count below each root move.
        #[clap(long)]
        divide: bool,
    },
    /// Run a perft suite file and check every count.
    Suite {
        /// Path to the suite, one `<fen> ;D1 <nodes> ;D2 <nodes> ...` entry per line.
        #[clap(long, value_name = "PATH", default_value = "epds/perftsuite.epd")]
        path: PathBuf,
        /// Skip the remaining depths of an entry once its expected count exceeds this.
        #[clap(long, value_name = "NODES", default_value = "60000000")]
        limit: u64,
    },
    /// Print a position and its legal moves.
    Show {
        /// Position to print - if omitted, the starting position is used.
        #[clap(long)]
        fen: Option<String>,
    },
}
