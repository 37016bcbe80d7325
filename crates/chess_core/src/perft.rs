use crate::{board::Position, movegen::legal_moves_into, types::Move};

/// Counts the leaf positions reachable in exactly `depth` plies.
///
/// Used to check the move generator against published node counts; every
/// worker of a search depends on it producing the same list for the same
/// position.
pub fn perft(pos: &Position, depth: u8) -> u64 {
    fn walk(pos: &mut Position, depth: u8, buffers: &mut [Vec<Move>]) -> u64 {
        let Some((moves, deeper)) = buffers.split_first_mut() else {
            return 1;
        };
        legal_moves_into(pos, moves);
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in moves.iter().copied() {
            let undo = pos.make_move(mv);
            nodes += walk(pos, depth - 1, deeper);
            pos.unmake_move(mv, undo);
        }
        nodes
    }

    let mut scratch = pos.clone();
    let mut buffers = vec![Vec::with_capacity(64); depth as usize];
    walk(&mut scratch, depth, &mut buffers)
}
