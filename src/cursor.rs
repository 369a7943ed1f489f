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

use crate::tree::{NodeId, RepertoireTree, TreeNode};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CursorState {
    AtRoot,
    InLine,
    Exhausted,
}

/// Current position within a repertoire tree for one training session
#[derive(Clone, Debug)]
pub struct Cursor {
    current: NodeId,
    players_turn: bool,
    exhausted: bool,
}

impl Cursor {
    pub fn new(players_turn: bool) -> Self {
        Cursor { current: NodeId::ROOT, players_turn, exhausted: false }
    }

    pub fn at_root(tree: &RepertoireTree) -> Self {
        Cursor::new(tree.player_moves_first())
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_players_turn(&self) -> bool {
        self.players_turn
    }

    pub fn children_of_current<'t>(&self, tree: &'t RepertoireTree) -> impl Iterator<Item = (NodeId, &'t TreeNode)> + 't {
        tree.child_ids(self.current).iter().map(move |&id| (id, tree.node(id)))
    }

    /// Moves to the given child of the current node.
    /// The caller is responsible for passing a valid child.
    pub fn advance_to(&mut self, child: NodeId) {
        self.current = child;
        self.players_turn = !self.players_turn;
    }

    /// Moves back to the parent of the current node
    pub fn retreat_to(&mut self, parent: NodeId) {
        self.current = parent;
        self.players_turn = !self.players_turn;
        self.exhausted = false;
    }

    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    pub fn state(&self) -> CursorState {
        if self.exhausted {
            CursorState::Exhausted
        } else if self.current == NodeId::ROOT {
            CursorState::AtRoot
        } else {
            CursorState::InLine
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_flips_turn() {
        let tree = RepertoireTree::from_reader("1. e4 e5\n".as_bytes(), true).unwrap();
        let mut cursor = Cursor::at_root(&tree);
        assert_eq!(CursorState::AtRoot, cursor.state());
        assert!(cursor.is_players_turn());

        let (e4, _) = cursor.children_of_current(&tree).next().unwrap();
        cursor.advance_to(e4);
        assert_eq!(CursorState::InLine, cursor.state());
        assert!(!cursor.is_players_turn());
        assert_eq!(e4, cursor.current());
    }

    #[test]
    fn test_retreat_restores_turn() {
        let tree = RepertoireTree::from_reader("1. e4 e5\n".as_bytes(), true).unwrap();
        let mut cursor = Cursor::at_root(&tree);
        let (e4, _) = cursor.children_of_current(&tree).next().unwrap();
        cursor.advance_to(e4);

        cursor.retreat_to(tree.root());
        assert_eq!(CursorState::AtRoot, cursor.state());
        assert!(cursor.is_players_turn());
    }

    #[test]
    fn test_exhausted() {
        let mut cursor = Cursor::new(false);
        cursor.mark_exhausted();
        assert_eq!(CursorState::Exhausted, cursor.state());
    }
}
