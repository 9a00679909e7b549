mod common;

use common::{get_moves, setup, sorted_moves};
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};
use tabia::chess::core::Move;
use tabia::chess::game::{Game, Status};
use tabia::chess::position::{perft, Position};

#[test]
fn starting_moves() {
    assert_eq!(
        get_moves(&Position::starting()),
        sorted_moves(&[
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ])
    );
}

// Artifacts from the fuzzer or perft.
#[test]
fn en_passant_edge_cases() {
    // Capturing en passant would expose the king on the rank.
    assert_eq!(
        get_moves(&setup("K7/8/8/8/1R2Pp1k/8/8/8 b - e3 0 1")),
        sorted_moves(&["h4h5", "h4h3", "h4g4", "h4g5", "h4g3", "f4f3"])
    );
    // Capturing en passant removes the checking pawn.
    assert_eq!(
        get_moves(&setup("4k1r1/8/8/4PpP1/6K1/8/8/8 w - f6 0 1")),
        sorted_moves(&["g4f4", "g4f3", "g4f5", "g4g3", "g4h3", "g4h4", "g4h5", "e5f6"])
    );
    assert_eq!(
        get_moves(&setup("r3k3/r7/8/5pP1/5QKN/8/8/6RR w - f6 0 1")),
        sorted_moves(&["f4f5", "h4f5", "g4f5", "g4f3", "g4g3", "g4h3", "g5f6", "g4h5"])
    );
    assert_eq!(
        get_moves(&setup("8/2p5/3p4/1P5r/KR3p1k/8/4P1P1/8 b - - 1 1")),
        sorted_moves(&[
            "c7c6", "c7c5", "d6d5", "h5b5", "h5c5", "h5d5", "h5e5", "h5g5", "h5f5", "h5h6", "h5h7",
            "h5h8", "h4g4", "h4g5", "h4g3"
        ])
    );
}

#[test]
fn castling_conditions() {
    // Can castle both sides.
    assert_eq!(
        get_moves(&setup("r3k2r/8/8/8/8/8/6N1/4K3 b kq - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7", "e8c8", "e8g8"
        ])
    );
    // The king would pass through an attacked square.
    assert_eq!(
        get_moves(&setup("r3k2r/8/8/8/8/8/6R1/4K3 b kq - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7", "e8c8"
        ])
    );
    // Only the rook passes over the attacked b8.
    assert_eq!(
        get_moves(&setup("r3k2r/8/8/8/8/8/1R6/4K3 b q - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8d8", "e8d7",
            "e8f8", "e8f7", "e8c8"
        ])
    );
    // The king would pass through d8.
    assert_eq!(
        get_moves(&setup("r3k2r/8/8/8/8/8/3R4/4K3 b kq - 0 1")),
        sorted_moves(&[
            "a8a7", "a8a6", "a8a5", "a8a4", "a8a3", "a8a2", "a8a1", "a8b8", "a8c8", "a8d8", "h8f8",
            "h8g8", "h8h7", "h8h6", "h8h5", "h8h4", "h8h3", "h8h2", "h8h1", "e8e7", "e8f8", "e8f7",
            "e8g8"
        ])
    );
}

#[test]
fn perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, 0), 1);
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);
    assert_eq!(perft(&position, 3), 8902);
}

#[test]
fn perft_kiwipete() {
    let position = setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(perft(&position, 1), 48);
    assert_eq!(perft(&position, 2), 2039);
}

#[test]
fn perft_endgame() {
    let position = setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&position, 1), 14);
    assert_eq!(perft(&position, 2), 191);
    assert_eq!(perft(&position, 3), 2812);
}

#[test]
fn perft_complex() {
    let position = setup("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
    assert_eq!(perft(&position, 1), 6);
    assert_eq!(perft(&position, 2), 264);
    assert_eq!(perft(&position, 3), 9467);
}

#[test]
fn perft_fifth() {
    let position = setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&position, 1), 44);
    assert_eq!(perft(&position, 2), 1486);
}

#[test]
fn perft_sixth() {
    let position =
        setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    assert_eq!(perft(&position, 1), 46);
    assert_eq!(perft(&position, 2), 2079);
}

// These are very expensive in the Debug setting: disable them by default.
#[ignore]
#[test]
fn perft_deep() {
    assert_eq!(perft(&Position::starting(), 5), 4_865_609);
    assert_eq!(
        perft(
            &setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            4
        ),
        4_085_603
    );
    assert_eq!(
        perft(&setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"), 5),
        674_624
    );
    assert_eq!(
        perft(
            &setup("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1"),
            4
        ),
        422_333
    );
    assert_eq!(
        perft(
            &setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8"),
            3
        ),
        62_379
    );
    assert_eq!(
        perft(
            &setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10"),
            3
        ),
        89_890
    );
}

fn shakmaty_moves(position: &Chess) -> Vec<(String, shakmaty::Move)> {
    position
        .legal_moves()
        .into_iter()
        .map(|m| (m.to_uci(CastlingMode::Standard).to_string(), m))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect()
}

fn play_random_game(rng: &mut StdRng, max_plies: usize) {
    let mut game = Game::new();
    let mut reference = Chess::default();
    for _ in 0..max_plies {
        let status = game.status();
        if status.is_terminal() {
            match status {
                Status::Checkmate(_) => assert!(reference.is_checkmate(), "{:?}", game.position()),
                Status::Stalemate => assert!(reference.is_stalemate(), "{:?}", game.position()),
                _ => {},
            }
            return;
        }
        let expected = shakmaty_moves(&reference);
        let actual = game
            .legal_moves()
            .iter()
            .map(Move::to_string)
            .sorted()
            .collect_vec();
        assert_eq!(
            actual,
            expected.iter().map(|(uci, _)| uci.clone()).collect_vec(),
            "{:?}",
            game.position()
        );
        assert_eq!(game.in_check(), reference.is_check());

        let (uci, reference_move) = &expected[rng.gen_range(0..expected.len())];
        let next_move = Move::from_uci(uci, game.position()).unwrap();
        game = game.apply_move(&next_move).unwrap();
        reference.play_unchecked(reference_move);
    }
}

#[test]
fn random_playouts_match_shakmaty() {
    let mut rng = StdRng::seed_from_u64(0x7A_B1A);
    for _ in 0..20 {
        play_random_game(&mut rng, 200);
    }
}

// This test is very expensive in the Debug setting: disable it by default.
#[ignore]
#[test]
fn many_random_playouts_match_shakmaty() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..1000 {
        play_random_game(&mut rng, 400);
    }
}

#[test]
fn fen_matches_shakmaty() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut game = Game::new();
    for _ in 0..60 {
        if game.status().is_terminal() {
            break;
        }
        let moves = game.legal_moves();
        game = game
            .apply_move(&moves[rng.gen_range(0..moves.len())])
            .unwrap();
        // Every position we produce is accepted by the reference
        // implementation.
        let fen: shakmaty::fen::Fen = game.position().fen().parse().unwrap();
        let reference: Chess = fen.into_position(CastlingMode::Standard).unwrap();
        assert_eq!(
            get_moves(game.position()),
            shakmaty_moves(&reference)
                .into_iter()
                .map(|(uci, _)| uci)
                .collect_vec()
        );
    }
}
