//! Chess rules engine: legal move generation, special moves (castling, en
//! passant, promotion), check, checkmate, stalemate and draw detection. For
//! more information, see [README].
//!
//! ```
//! use tabia::chess::core::Move;
//! use tabia::{Game, Status};
//!
//! let mut game = Game::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     let next_move = Move::from_uci(uci, game.position()).unwrap();
//!     game = game.apply_move(&next_move).unwrap();
//! }
//! assert!(matches!(game.status(), Status::Checkmate(_)));
//! ```
//!
//! [README]: https://github.com/kirillbobyrev/tabia/blob/main/README.md

// TODO: Gradually move most of warnings to deny.
#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
// Performance is extremely important.
#![deny(clippy::perf)]

pub mod chess;
pub mod interface;

pub use chess::core::{Move, MoveList, Piece, PieceKind, Player, Square};
pub use chess::game::{DrawReason, Game, MoveError, Status};
pub use chess::position::Position;
pub use interface::Session;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the crate was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version, build type and GitHub repository on
/// startup.
pub fn print_engine_info() {
    println!("Tabia chess rules engine {}", engine_version());
    println!("<https://github.com/kirillbobyrev/tabia>");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
