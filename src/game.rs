/*
 * Repertoire Trainer
 * Copyright (C) 2024 mhonert (https://github.com/mhonert)
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Plays a training game on a real board: trainee input is checked for chess legality,
//! converted to canonical SAN and validated against the book.

use log::{info, warn};
use rand::Rng;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, File, Move, Position, Rank, Square};
use crate::cursor::CursorState;
use crate::error::{GameError, MoveError};
use crate::movetext::Side;
use crate::selector::{MoveSelector, Reply};
use crate::tree::RepertoireTree;

pub struct TrainingGame<'t, R: Rng> {
    selector: MoveSelector<'t, R>,
    position: Chess,
    trainee: Side,
    mistakes: u32,
}

impl<'t, R: Rng> TrainingGame<'t, R> {
    /// The tree must have been compiled for the same trainee side
    pub fn new(tree: &'t RepertoireTree, rng: R, trainee: Side) -> Self {
        debug_assert_eq!(tree.player_moves_first(), trainee.is_white());
        TrainingGame { selector: MoveSelector::new(tree, rng), position: Chess::default(), trainee, mistakes: 0 }
    }

    pub fn new_session(&mut self) {
        self.selector.new_session();
        self.position = Chess::default();
        self.mistakes = 0;
    }

    pub fn trainee(&self) -> Side {
        self.trainee
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn is_players_turn(&self) -> bool {
        self.selector.is_players_turn()
    }

    pub fn book_moves(&self) -> Vec<&'t str> {
        self.selector.legal_player_replies()
    }

    pub fn played(&self) -> Vec<&'t str> {
        self.selector.played()
    }

    /// True once the prepared line has no further moves for either side
    pub fn is_line_complete(&self) -> bool {
        self.selector.state() == CursorState::Exhausted
            || (self.selector.is_players_turn() && self.selector.legal_player_replies().is_empty())
    }

    /// Resolves SAN ("Nf3") or UCI ("g1f3") input to a legal move, rendered as canonical SAN
    pub fn canonical_san(&self, input: &str) -> Result<String, GameError> {
        let m = self.parse_move(input).ok_or_else(|| GameError::IllegalMove { input: input.to_string() })?;

        let mut pos = self.position.clone();
        Ok(SanPlus::from_move_and_play_unchecked(&mut pos, m).to_string())
    }

    fn parse_move(&self, input: &str) -> Option<Move> {
        if let Ok(uci) = input.parse::<UciMove>() {
            if let Ok(m) = uci.to_move(&self.position) {
                return Some(m);
            }
        }

        let san = input.parse::<SanPlus>().ok()?;
        san.san.to_move(&self.position).ok()
    }

    /// Plays the trainee's move if it is both legal and in the book.
    /// Moves outside the book are counted as mistakes and leave the position unchanged.
    pub fn play_trainee_move(&mut self, input: &str) -> Result<String, GameError> {
        if !self.selector.is_players_turn() {
            return Err(GameError::NotPlayersTurn);
        }

        let san = self.canonical_san(input)?;
        match self.selector.validate_and_play(&san) {
            Ok(()) => {
                if let Err(e) = self.apply_san(&san) {
                    self.selector.take_back();
                    return Err(e);
                }
                Ok(san)
            }

            Err(e @ MoveError::InvalidMove { .. }) => {
                self.mistakes += 1;
                warn!("Deviation from the book: {}", e);
                Err(e.into())
            }

            Err(e) => Err(e.into()),
        }
    }

    pub fn play_book_reply(&mut self) -> Result<Reply, GameError> {
        let reply = self.selector.choose_opponent_reply();
        match &reply {
            Reply::Move(san) => {
                if let Err(e) = self.apply_san(san) {
                    self.selector.take_back();
                    return Err(e);
                }
            }
            Reply::Terminal => info!("Line complete after {} moves with {} mistakes", self.played().len(), self.mistakes),
        }
        Ok(reply)
    }

    fn apply_san(&mut self, san: &str) -> Result<(), GameError> {
        let m = san.parse::<SanPlus>().ok()
            .and_then(|s| s.san.to_move(&self.position).ok())
            .ok_or_else(|| GameError::IllegalBookMove { san: san.to_string() })?;

        self.position.play_unchecked(m);
        Ok(())
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    /// Text diagram of the board, seen from the trainee's side
    pub fn render(&self) -> String {
        let board = self.position.board();
        let ranks: Vec<u32> = if self.trainee.is_white() { (0..8).rev().collect() } else { (0..8).collect() };
        let files: Vec<u32> = if self.trainee.is_white() { (0..8).collect() } else { (0..8).rev().collect() };

        let mut out = String::with_capacity(256);
        for &rank in ranks.iter() {
            out.push(char::from(b'1' + rank as u8));
            out.push(' ');
            for &file in files.iter() {
                let square = Square::from_coords(File::new(file), Rank::new(rank));
                out.push(' ');
                out.push(board.piece_at(square).map_or('.', |p| p.char()));
            }
            out.push('\n');
        }

        out.push_str("  ");
        for &file in files.iter() {
            out.push(' ');
            out.push(char::from(b'a' + file as u8));
        }
        out.push('\n');

        if self.position.is_check() {
            out.push_str("Check!\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use super::*;

    fn tree(book: &str, trainee: Side) -> RepertoireTree {
        RepertoireTree::from_reader(book.as_bytes(), trainee.is_white()).unwrap()
    }

    #[test]
    fn test_uci_input_is_converted_to_san() {
        let tree = tree("1. e4 e5 2. Nf3 Nc6\n", Side::White);
        let game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::White);

        assert_eq!("e4", game.canonical_san("e2e4").unwrap());
        assert_eq!("Nf3", game.canonical_san("g1f3").unwrap());
        assert_eq!("Nf3", game.canonical_san("Nf3").unwrap());
        assert!(matches!(game.canonical_san("e2e5"), Err(GameError::IllegalMove { .. })));
        assert!(matches!(game.canonical_san("Qh5"), Err(GameError::IllegalMove { .. })));
    }

    #[test]
    fn test_check_suffix_is_added() {
        let tree = tree("1. e4 d5 2. exd5 Qxd5 3. Nc3 Qe5+\n", Side::Black);
        let mut game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::Black);

        assert_eq!(Reply::Move("e4".to_string()), game.play_book_reply().unwrap());
        assert_eq!("d5", game.play_trainee_move("d7d5").unwrap());
        assert_eq!(Reply::Move("exd5".to_string()), game.play_book_reply().unwrap());
        assert_eq!("Qxd5", game.play_trainee_move("Qxd5").unwrap());
        assert_eq!(Reply::Move("Nc3".to_string()), game.play_book_reply().unwrap());

        assert_eq!("Qe5+", game.play_trainee_move("d5e5").unwrap());
        assert!(game.is_check());
        assert!(!game.is_line_complete());
        assert_eq!(Reply::Terminal, game.play_book_reply().unwrap());
        assert!(game.is_line_complete());
    }

    #[test]
    fn test_deviation_counts_as_mistake() {
        let tree = tree("1. e4 e5\n", Side::White);
        let mut game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::White);

        assert!(matches!(game.play_trainee_move("d4"), Err(GameError::Book(MoveError::InvalidMove { .. }))));
        assert_eq!(1, game.mistakes());
        assert!(game.is_players_turn());

        assert_eq!("e4", game.play_trainee_move("e4").unwrap());
        assert!(matches!(game.play_trainee_move("d4"), Err(GameError::NotPlayersTurn)));
    }

    #[test]
    fn test_line_ending_on_opponent_move_is_complete() {
        let tree = tree("1. e4 e5\n", Side::White);
        let mut game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::White);

        game.play_trainee_move("e4").unwrap();
        game.play_book_reply().unwrap();
        assert!(game.is_line_complete());
        assert!(game.book_moves().is_empty());
    }

    #[test]
    fn test_illegal_book_move() {
        let tree = tree("1. e4 e4\n", Side::White);
        let mut game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::White);

        game.play_trainee_move("e4").unwrap();
        assert_eq!(Err(GameError::IllegalBookMove { san: "e4".to_string() }), game.play_book_reply());
    }

    #[test]
    fn test_illegal_book_move_keeps_book_and_board_in_sync() {
        let tree = tree("1. e4 e4 2. d4 d5\n", Side::White);
        let mut game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::White);

        game.play_trainee_move("e4").unwrap();
        assert!(game.play_book_reply().is_err());

        assert_eq!(vec!["e4"], game.played());
        assert!(!game.is_players_turn());
        assert_eq!(vec!["e4"], game.book_moves());
        assert!(matches!(game.play_trainee_move("d4"), Err(GameError::NotPlayersTurn)));
        assert_eq!("e5", game.canonical_san("e7e5").unwrap());
    }

    #[test]
    fn test_render_from_black_side() {
        let tree = tree("1. e4 e5\n", Side::Black);
        let game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::Black);
        let diagram = game.render();
        let lines: Vec<&str> = diagram.lines().collect();

        assert_eq!("1  R N B K Q B N R", lines[0]);
        assert_eq!("8  r n b k q b n r", lines[7]);
        assert_eq!("   h g f e d c b a", lines[8]);
    }

    #[test]
    fn test_new_session_resets_board() {
        let tree = tree("1. e4 e5\n", Side::White);
        let mut game = TrainingGame::new(&tree, StdRng::seed_from_u64(1), Side::White);
        game.play_trainee_move("e4").unwrap();
        let _ = game.play_trainee_move("Nf3");

        game.new_session();
        assert!(game.played().is_empty());
        assert_eq!(0, game.mistakes());
        assert_eq!("e4", game.canonical_san("e2e4").unwrap());
    }
}
