use super::*;
use chess_core::parse_uci_move;

fn mv(pos: &Position, txt: &str) -> Move {
    parse_uci_move(pos, txt).unwrap_or_else(|| panic!("{txt} is not legal"))
}

#[test]
fn test_capture_scores_victim_value() {
    // White knight on d5 can take the queen on c7 or the pawn on e7.
    let pos = Position::from_fen("4k3/2q1p3/8/3N4/8/8/8/4K3 w - - 0 1").unwrap();
    let takes_queen = order_score(mv(&pos, "d5c7"), &pos);
    let takes_pawn = order_score(mv(&pos, "d5e7"), &pos);
    assert!(takes_queen > takes_pawn);
    // Knight from d5 (20) to c7 (0): 9 for the queen, -0.2 positional.
    assert!((takes_queen - 8.8).abs() < 1e-5);
}

#[test]
fn test_en_passant_counts_as_pawn_capture() {
    let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let ep = mv(&pos, "e5d6");
    assert!(ep.is_en_passant);
    assert!(order_score(ep, &pos) >= 1.0);
}

#[test]
fn test_promotion_bonus() {
    let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let promo = mv(&pos, "a7a8q");
    // a7 (50) to a8 (0) loses half a pawn of table value.
    assert!((order_score(promo, &pos) - 8.5).abs() < 1e-5);
}

#[test]
fn test_quiet_moves_use_table_delta() {
    let pos = Position::startpos();
    // Knight b1 (-40) to c3 (10).
    assert!((order_score(mv(&pos, "b1c3"), &pos) - 0.5).abs() < 1e-5);
    // Pawn e2 (-20) to e4 (20).
    assert!((order_score(mv(&pos, "e2e4"), &pos) - 0.4).abs() < 1e-5);
}

#[test]
fn test_ordered_moves_put_captures_first_and_keep_everything() {
    let pos = Position::from_fen("4k3/2q1p3/8/3N4/8/8/8/4K3 w - - 0 1").unwrap();
    let ordered = ordered_moves(&pos);
    let mut plain = legal_moves(&pos);
    assert_eq!(ordered.len(), plain.len());
    assert_eq!(ordered[0], mv(&pos, "d5c7"));
    assert_eq!(ordered[1], mv(&pos, "d5e7"));

    let key = |m: &Move| (m.from, m.to, m.promo.map(|p| p.idx()));
    let mut sorted = ordered.clone();
    sorted.sort_by_key(key);
    plain.sort_by_key(key);
    assert_eq!(sorted, plain);
}

#[test]
fn test_ordering_is_stable() {
    let pos = Position::startpos();
    let scores: Vec<f32> = ordered_moves(&pos)
        .iter()
        .map(|&m| order_score(m, &pos))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // Among equal scores the generator's order survives.
    let generated = legal_moves(&pos);
    let ordered = ordered_moves(&pos);
    for pair in ordered.windows(2) {
        if order_score(pair[0], &pos) == order_score(pair[1], &pos) {
            let a = generated.iter().position(|m| *m == pair[0]);
            let b = generated.iter().position(|m| *m == pair[1]);
            assert!(a < b);
        }
    }
}
