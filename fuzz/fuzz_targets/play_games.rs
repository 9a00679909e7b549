#![no_main]
//! Plays games where every byte of the input picks the next move and checks
//! that the state machine agrees with shakmaty along the way.

use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position};
use tabia::chess::core::MoveKind;
use tabia::{Game, MoveError, Status};

fuzz_target!(|data: &[u8]| {
    let mut game = Game::new();
    for &byte in data {
        let moves = game.legal_moves();
        if game.status().is_terminal() {
            assert!(moves.is_empty());
            if let Some(blocked) = game.position().generate_moves().first() {
                assert!(matches!(
                    game.apply_move(blocked),
                    Err(MoveError::GameOver(status)) if status == game.status()
                ));
            }
            break;
        }
        let next_move = moves[usize::from(byte) % moves.len()];
        let next = game.apply_move(&next_move).unwrap();

        let position = next.position();
        assert_eq!(position.side_to_move(), game.position().side_to_move().opponent());
        assert_eq!(
            position.en_passant_square().is_some(),
            next_move.kind() == MoveKind::DoublePawnPush
        );
        if let Status::Checkmate(player) | Status::Check(player) = next.status() {
            assert_eq!(player, position.side_to_move());
            assert!(next.in_check());
        }

        let fen: shakmaty::fen::Fen = position.fen().parse().unwrap();
        let reference: Chess = fen.into_position(CastlingMode::Standard).unwrap();
        assert_eq!(
            position
                .generate_moves()
                .iter()
                .map(ToString::to_string)
                .sorted()
                .collect_vec(),
            reference
                .legal_moves()
                .iter()
                .map(|m| m.to_uci(CastlingMode::Standard).to_string())
                .sorted()
                .collect_vec()
        );
        assert_eq!(next.undo().map(|g| g.position().clone()), Some(game.position().clone()));
        game = next;
    }
});
