//! Coordinate move notation (`e2e4`, `e7e8q`), as used by UCI.

use crate::{board::Position, movegen::legal_moves, types::*};

pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.symbol());
    }
    s
}

/// Resolves coordinate text against the legal moves of `pos`, so the castle
/// and en passant flags come from the move generator. Returns `None` for
/// malformed text and for moves that are not legal here.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Option<Move> {
    let txt = txt.trim();
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return None;
    }
    let from = coord_to_sq(&txt[0..2])?;
    let to = coord_to_sq(&txt[2..4])?;
    let promo = match txt[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_symbol(ch)? {
            PieceKind::Pawn | PieceKind::King => return None,
            kind => Some(kind),
        },
    };

    legal_moves(pos).into_iter().find(|m| {
        // A bare promotion push defaults to a queen.
        let wanted = if m.promo.is_some() {
            promo.or(Some(PieceKind::Queen))
        } else {
            promo
        };
        m.from == from && m.to == to && m.promo == wanted
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_round_trip_on_start_moves() {
        let pos = Position::startpos();
        for mv in legal_moves(&pos) {
            assert_eq!(parse_uci_move(&pos, &move_to_uci(mv)), Some(mv));
        }
    }

    #[test]
    fn test_rejects_illegal_and_malformed_text() {
        let pos = Position::startpos();
        assert_eq!(parse_uci_move(&pos, "e2e5"), None);
        assert_eq!(parse_uci_move(&pos, "e2"), None);
        assert_eq!(parse_uci_move(&pos, "z9e4"), None);
        assert_eq!(parse_uci_move(&pos, "hello"), None);
    }

    #[test]
    fn test_promotion_choice() {
        let pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let knight = parse_uci_move(&pos, "e7e8n").unwrap();
        assert_eq!(knight.promo, Some(PieceKind::Knight));
        let default = parse_uci_move(&pos, "e7e8").unwrap();
        assert_eq!(default.promo, Some(PieceKind::Queen));
    }

    #[test]
    fn test_castle_flag_comes_from_movegen() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = parse_uci_move(&pos, "e1g1").unwrap();
        assert!(mv.is_castle);
    }
}
