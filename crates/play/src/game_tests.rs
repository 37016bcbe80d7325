use std::io::Cursor;

use distributed_engine::{Cluster, SoloGroup};

use super::*;

const BACK_RANK_MATE: &str = "6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1";

fn setup(fen: &str, human: Color, depth: u8) -> GameSetup {
    GameSetup {
        start: Position::from_fen(fen).unwrap(),
        human,
        limits: SearchLimits::depth(depth),
    }
}

/// Runs a game on `workers` threads, rank 0 reading `script`. Returns each
/// rank's outcome and what rank 0 printed.
fn run(workers: usize, setup: &GameSetup, script: &str) -> (Vec<Outcome>, String) {
    let results = Cluster::run(workers, |world| {
        let mut console = Console::new(Cursor::new(script.to_string()), Vec::new());
        let outcome = play(&world, setup, Some(&mut console))?;
        Ok((outcome, console.output))
    })
    .unwrap();

    let printed = String::from_utf8(results[0].1.clone()).unwrap();
    for (_, output) in &results[1..] {
        assert!(output.is_empty(), "only rank 0 talks to the human");
    }
    (results.into_iter().map(|(outcome, _)| outcome).collect(), printed)
}

#[test]
fn test_human_mates_after_a_bad_entry() {
    let (outcomes, printed) = run(2, &setup(BACK_RANK_MATE, Color::White, 2), "e1e9\ne1e8\n");
    assert!(outcomes.iter().all(|&o| o == Outcome::Checkmate { winner: Color::White }));
    assert!(printed.contains("Invalid move. Try again."));
    assert!(printed.contains("Black is checkmated. White wins!"));
}

#[test]
fn test_computer_finds_the_mate() {
    let (outcomes, printed) = run(3, &setup(BACK_RANK_MATE, Color::Black, 2), "");
    assert!(outcomes.iter().all(|&o| o == Outcome::Checkmate { winner: Color::White }));
    assert!(printed.contains("Computer (White) plays: e1e8"));
}

#[test]
fn test_end_of_input_quits_every_worker() {
    let (outcomes, printed) = run(3, &setup(chess_core::START_FEN, Color::White, 2), "");
    assert_eq!(outcomes, vec![Outcome::Quit; 3]);
    assert!(printed.contains("Your move (White): "));
    assert!(printed.contains("Game abandoned."));
}

#[test]
fn test_quit_command() {
    let (outcomes, _) = run(2, &setup(chess_core::START_FEN, Color::White, 1), "e2e4\nquit\n");
    assert_eq!(outcomes, vec![Outcome::Quit; 2]);
}

#[test]
fn test_game_over_before_any_move() {
    let stalemate = setup("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", Color::White, 2);
    let (outcomes, printed) = run(2, &stalemate, "");
    assert_eq!(outcomes, vec![Outcome::Stalemate; 2]);
    assert!(printed.contains("Stalemate. It's a draw!"));

    let fifty = setup("8/8/8/4k3/8/4K3/8/4R3 w - - 100 60", Color::White, 2);
    let (outcomes, printed) = run(1, &fifty, "");
    assert_eq!(outcomes, vec![Outcome::Draw(DrawReason::FiftyMove)]);
    assert!(printed.contains("Draw due to 50-move rule."));
}

#[test]
fn test_solo_group_plays_without_a_cluster() {
    let mut console = Console::new(Cursor::new("e1e8\n"), Vec::new());
    let outcome = play(&SoloGroup, &setup(BACK_RANK_MATE, Color::White, 1), Some(&mut console));
    assert_eq!(outcome.unwrap(), Outcome::Checkmate { winner: Color::White });
}
