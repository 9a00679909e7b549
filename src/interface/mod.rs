//! Line-based text protocol for playing a [`Game`] through any pair of
//! streams. The `tabia` binary runs a [`Session`] over stdin and stdout.
//!
//! [`Session::run`] is the "main loop": it reads one command per line,
//! executes it and writes the response. Invalid input does not terminate the
//! session, the problem is reported as a line starting with `error:`.
//!
//! | Command               | Response                                      |
//! |-----------------------|-----------------------------------------------|
//! | `new`                 | `ok`, the game is reset                       |
//! | `play <move>...`      | status after the moves (alias: `move`)        |
//! | `moves`               | sorted legal moves, space separated           |
//! | `undo`                | status after taking the last move back        |
//! | `status`              | current status                                |
//! | `history`             | played moves, space separated                 |
//! | `fen`                 | FEN of the current position                   |
//! | `d`                   | board dump                                    |
//! | `perft <depth>`       | number of leaf nodes at the given depth       |
//! | `version`             | engine version                                |
//! | `quit`                | stops the session                             |

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::chess::core::Move;
use crate::chess::game::Game;
use crate::chess::position::perft;
use crate::interface::command::Command;

mod command;

/// Holds the current game and the I/O of the protocol.
pub struct Session<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a new session with a fresh game and provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game: Game::new(),
            input,
            output,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Plays a sequence of moves in UCI notation. Either all of them are
    /// applied or the game stays as it was.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first move that could not be parsed or
    /// applied.
    pub fn play<S: AsRef<str>>(&mut self, moves: &[S]) -> anyhow::Result<()> {
        let mut game = self.game.clone();
        for next_move in moves {
            let parsed = Move::from_uci(next_move.as_ref(), game.position())?;
            game = game.apply_move(&parsed)?;
        }
        self.game = game;
        Ok(())
    }

    /// Continuously reads the input stream and executes commands until `quit`
    /// is sent or the input ends.
    ///
    /// # Errors
    ///
    /// Only I/O failures stop the loop with an error.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self
                .input
                .read_line(&mut line)
                .context("reading session input")?
                == 0
            {
                debug!("input closed");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    warn!(line = line.trim(), "unparseable command");
                    writeln!(self.output, "error: {e:#}")?;
                    continue;
                },
            };
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command) {
                writeln!(self.output, "error: {e:#}")?;
            }
            self.output.flush()?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::NewGame => {
                self.game = Game::new();
                writeln!(self.output, "ok")?;
            },
            Command::Play { moves } => {
                self.play(moves.as_slice())?;
                writeln!(self.output, "{}", self.game.status())?;
            },
            Command::Moves => writeln!(
                self.output,
                "{}",
                self.game
                    .legal_moves()
                    .iter()
                    .map(ToString::to_string)
                    .sorted()
                    .join(" ")
            )?,
            Command::Undo => {
                let Some(previous) = self.game.undo() else {
                    bail!("nothing to undo");
                };
                self.game = previous;
                writeln!(self.output, "{}", self.game.status())?;
            },
            Command::Status => writeln!(self.output, "{}", self.game.status())?,
            Command::History => writeln!(self.output, "{}", self.game.history().join(" "))?,
            Command::Fen => writeln!(self.output, "{}", self.game.position())?,
            Command::Display => write!(self.output, "{:?}", self.game.position())?,
            Command::Perft { depth } => {
                writeln!(self.output, "{}", perft(self.game.position(), depth))?;
            },
            Command::Version => writeln!(self.output, "tabia {}", crate::engine_version())?,
            Command::Quit => {},
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(input: &str) -> String {
        let mut input = input.as_bytes();
        let mut output = Vec::new();
        Session::new(&mut input, &mut output).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn play_and_inspect() {
        assert_eq!(
            run("play e2e4 e7e5\nhistory\nfen\nstatus\n"),
            "ongoing\n\
             e2e4 e7e5\n\
             rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2\n\
             ongoing\n"
        );
    }

    #[test]
    fn moves_are_sorted() {
        assert_eq!(
            run("moves\n"),
            "a2a3 a2a4 b1a3 b1c3 b2b3 b2b4 c2c3 c2c4 d2d3 d2d4 e2e3 e2e4 f2f3 \
             f2f4 g1f3 g1h3 g2g3 g2g4 h2h3 h2h4\n"
        );
    }

    #[test]
    fn errors_do_not_stop_the_session() {
        assert_eq!(
            run("play e2e5\nfoo\nundo\nplay e2e4 e7e6 e4e6\nhistory\nperft 2\n"),
            "error: illegal move e2e5\n\
             error: unknown command: foo\n\
             error: nothing to undo\n\
             error: illegal move e4e6\n\
             \n\
             400\n"
        );
    }

    #[test]
    fn game_over() {
        assert_eq!(
            run("move f2f3 e7e5 g2g4 d8h4\nmoves\nplay a2a3\nundo\nnew\nhistory\n"),
            "checkmate, White is mated\n\
             \n\
             error: game is over (checkmate, White is mated)\n\
             ongoing\n\
             ok\n\
             \n"
        );
    }

    #[test]
    fn quit() {
        assert_eq!(run("status\nquit\nstatus\n"), "ongoing\n");
    }
}
