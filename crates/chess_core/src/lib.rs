pub mod board;
pub mod movegen;
pub mod perft;
pub mod rules;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use board::*;
pub use movegen::{legal_moves, legal_moves_into};
pub use perft::perft;
pub use rules::{DrawReason, Terminal};
pub use time_control::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait: implemented by search engines built on these rules
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Score of the deepest completed iteration; positive favours White
    pub score: f32,
    /// Deepest iteration that completed (0 if none did)
    pub depth: u8,
    /// Number of nodes searched across all workers
    pub nodes: u64,
    /// Whether the time budget ended the search before the depth limit
    pub stopped: bool,
}

/// Trait that all chess engines must implement.
pub trait Engine: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search the position with the given search limits.
    ///
    /// # Arguments
    /// * `pos` - The current position to analyze
    /// * `limits` - Search limits (depth, time)
    ///
    /// # Returns
    /// SearchResult containing best move, score, and statistics
    fn search(&mut self, pos: &Position, limits: SearchLimits)
    -> Result<SearchResult, Self::Error>;

    /// Returns the engine's name for identification
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
