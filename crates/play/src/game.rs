//! Human vs computer, played by every worker of a group in lock-step.
//!
//! Only rank 0 talks to the human. Each accepted move (or the decision to
//! quit) is broadcast, so all members replay the same game and meet in the
//! same collectives when it is the computer's turn.

use std::io::{BufRead, Write};

use chess_core::{move_to_uci, parse_uci_move, Color, DrawReason, Position, SearchLimits, Terminal};
use distributed_engine::{compute_best_move_distributed, GroupError, WorkerGroup};
use tracing::debug;

/// Line-based terminal for the human player.
pub struct Console<R, W> {
    input: R,
    pub output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: impl std::fmt::Display) {
        writeln!(self.output, "{text}").ok();
        self.output.flush().ok();
    }

    /// Prompts until the text is a legal move. `None` means the human quit
    /// or the input ended.
    fn read_move(&mut self, pos: &Position) -> Option<String> {
        loop {
            write!(self.output, "Your move ({}): ", pos.side_to_move).ok();
            self.output.flush().ok();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let text = line.trim();
            if matches!(text, "quit" | "exit") {
                return None;
            }
            if parse_uci_move(pos, text).is_some() {
                return Some(text.to_string());
            }
            self.say("Invalid move. Try again.");
        }
    }
}

/// How a game came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
    Quit,
}

impl Outcome {
    fn message(self) -> String {
        match self {
            Outcome::Checkmate { winner } => {
                format!("{} is checkmated. {winner} wins!", winner.other())
            }
            Outcome::Stalemate => "Stalemate. It's a draw!".to_string(),
            Outcome::Draw(reason) => format!("Draw due to {reason}."),
            Outcome::Quit => "Game abandoned.".to_string(),
        }
    }
}

/// Where the game starts and who sits where.
#[derive(Debug, Clone)]
pub struct GameSetup {
    pub start: Position,
    pub human: Color,
    pub limits: SearchLimits,
}

fn game_over(pos: &Position) -> Option<Outcome> {
    if let Some(terminal) = pos.terminal() {
        return Some(match terminal {
            Terminal::WhiteCheckmated => Outcome::Checkmate { winner: Color::Black },
            Terminal::BlackCheckmated => Outcome::Checkmate { winner: Color::White },
            Terminal::WhiteStalemated | Terminal::BlackStalemated => Outcome::Stalemate,
        });
    }
    pos.draw_reason().map(Outcome::Draw)
}

/// Plays one game to the end. Every member of `group` must call this;
/// `console` is only read on rank 0.
pub fn play<G, R, W>(
    group: &G,
    setup: &GameSetup,
    mut console: Option<&mut Console<R, W>>,
) -> Result<Outcome, GroupError>
where
    G: WorkerGroup,
    R: BufRead,
    W: Write,
{
    if group.rank() != 0 {
        console = None;
    }
    let mut pos = setup.start.clone();

    loop {
        if let Some(console) = console.as_deref_mut() {
            console.say(format_args!("\n{pos}\n"));
        }

        if let Some(outcome) = game_over(&pos) {
            if let Some(console) = console.as_deref_mut() {
                console.say(outcome.message());
            }
            return Ok(outcome);
        }

        let mv = if pos.side_to_move == setup.human {
            let offered = console.as_deref_mut().map(|console| console.read_move(&pos));
            let Some(text) = group.broadcast(0, offered)? else {
                if let Some(console) = console.as_deref_mut() {
                    console.say(Outcome::Quit.message());
                }
                return Ok(Outcome::Quit);
            };
            parse_uci_move(&pos, &text)
                .ok_or_else(|| GroupError::Protocol(format!("rank 0 sent illegal move {text}")))?
        } else {
            let Some(mv) = compute_best_move_distributed(&pos, &setup.limits, group)? else {
                return Err(GroupError::Protocol("no move found in a live position".into()));
            };
            if let Some(console) = console.as_deref_mut() {
                console.say(format_args!(
                    "Computer ({}) plays: {}",
                    pos.side_to_move,
                    move_to_uci(mv)
                ));
            }
            mv
        };

        debug!(rank = group.rank(), mv = %move_to_uci(mv), "move played");
        pos = pos.apply(mv);
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
