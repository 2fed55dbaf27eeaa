#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Dualboard, a reversible chess rules engine.
//!
//! Positions are held in two agreeing representations: a 64-square grid and
//! a per-side index of piece locations grouped by type. Moves are applied and
//! taken back incrementally, so a single board can be walked through an
//! entire search tree.

pub mod chess;
pub mod errors;
pub mod perft;
