use super::*;
use crate::ordering::ordered_moves;
use chess_core::parse_uci_move;

const BACK_RANK_MATE: &str = "6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1";
const FOOLS_MATE_TO_PLAY: &str =
    "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2";
const FOOLS_MATE_DONE: &str =
    "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

/// Plain minimax without pruning: the score and the first move reaching it.
fn minimax(pos: &Position, depth: u8, max_depth: u8, nodes: &mut u64) -> (f32, Option<Move>) {
    let mut stats = SearchStats::default();
    let moves = match classify(pos, depth, max_depth, &mut stats) {
        Node::Scored(score) => {
            *nodes += stats.nodes;
            return (score, None);
        }
        Node::Expand(moves) => moves,
    };
    let ext = if pos.side_to_move == Color::White { 1.0 } else { -1.0 };
    let mut best: Option<(f32, Move)> = None;
    for mv in moves {
        let (score, _) = minimax(&pos.apply(mv), depth + 1, max_depth, nodes);
        if best.map_or(true, |(b, _)| score * ext > b * ext) {
            best = Some((score, mv));
        }
    }
    let (score, mv) = best.expect("expanded node has moves");
    (score, Some(mv))
}

#[test]
fn test_depth_one_picks_best_evaluated_child() {
    let start = Position::startpos();
    let mut stats = SearchStats::default();
    let (score, best) = search_root(&start, 1, &mut stats);

    let mut expected: Option<(f32, Move)> = None;
    for mv in ordered_moves(&start) {
        let s = evaluate(&start.apply(mv));
        if expected.map_or(true, |(e, _)| s > e) {
            expected = Some((s, mv));
        }
    }
    assert_eq!(Some((score, best.unwrap())), expected);
    assert_eq!(stats.nodes, 20);
}

#[test]
fn test_alpha_beta_matches_minimax() {
    for (fen, depth) in [
        (chess_core::START_FEN, 3),
        (KIWIPETE, 2),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
        ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 2),
    ] {
        let p = pos(fen);
        let mut full = 0;
        let expected = minimax(&p, 0, depth, &mut full);
        let mut stats = SearchStats::default();
        assert_eq!(search_root(&p, depth, &mut stats), expected, "{fen}");
        assert!(stats.nodes <= full);
    }
}

#[test]
fn test_white_finds_mate_in_one() {
    let p = pos(BACK_RANK_MATE);
    let qe8 = parse_uci_move(&p, "e1e8").unwrap();
    for depth in 1..=3 {
        let (score, best) = search_root(&p, depth, &mut SearchStats::default());
        assert_eq!(score, INF_SCORE - 1.0, "depth {depth}");
        assert_eq!(best, Some(qe8));
    }
}

#[test]
fn test_black_finds_mate_in_one() {
    let p = pos(FOOLS_MATE_TO_PLAY);
    let (score, best) = search_root(&p, 2, &mut SearchStats::default());
    assert_eq!(score, -(INF_SCORE - 1.0));
    assert_eq!(best, parse_uci_move(&p, "d8h4"));
}

#[test]
fn test_mated_node_scores_by_depth_without_evaluating() {
    let p = pos(FOOLS_MATE_DONE);
    let mut stats = SearchStats::default();
    assert_eq!(
        search(&p, 3, 5, f32::NEG_INFINITY, f32::INFINITY, &mut stats),
        (-(INF_SCORE - 3.0), None)
    );
    assert_eq!(stats.nodes, 1);

    // Mate beats the depth limit even at the leaf ply.
    let (score, _) = search(&p, 2, 2, f32::NEG_INFINITY, f32::INFINITY, &mut stats);
    assert_eq!(score, -(INF_SCORE - 2.0));
}

#[test]
fn test_stalemate_scores_zero() {
    let p = pos("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert_eq!(search_root(&p, 4, &mut SearchStats::default()), (0.0, None));
}

#[test]
fn test_fifty_move_draw_stops_immediately() {
    let p = pos("8/8/8/4k3/8/4K3/8/4R3 w - - 100 60");
    let mut stats = SearchStats::default();
    assert_eq!(search_root(&p, 5, &mut stats), (0.0, None));
    assert_eq!(stats.nodes, 0);
}

#[test]
fn test_leaf_returns_evaluation_and_no_move() {
    let p = pos(KIWIPETE);
    let mut stats = SearchStats::default();
    assert_eq!(
        search(&p, 4, 4, f32::NEG_INFINITY, f32::INFINITY, &mut stats),
        (evaluate(&p), None)
    );
    assert_eq!(stats.nodes, 1);
}

#[test]
fn test_empty_move_list_is_a_draw() {
    let p = Position::startpos();
    assert_eq!(
        expand(&p, &[], 0, 3, f32::NEG_INFINITY, f32::INFINITY, &mut SearchStats::default()),
        (0.0, None)
    );
}
