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

use std::fmt;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::cursor::{Cursor, CursorState};
use crate::error::MoveError;
use crate::tree::{NodeId, RepertoireTree};

/// Book reply of the opponent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Move(String),

    /// The prepared line has no further continuation
    Terminal,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Move(san) => write!(f, "{}", san),
            Reply::Terminal => write!(f, "gg"),
        }
    }
}

/// Validates trainee moves against the repertoire and picks book replies for the opponent.
///
/// The random source is injected, so tests can use a seeded generator.
pub struct MoveSelector<'t, R: Rng> {
    tree: &'t RepertoireTree,
    cursor: Cursor,
    rng: R,
    played: Vec<NodeId>,
}

impl<'t, R: Rng> MoveSelector<'t, R> {
    pub fn new(tree: &'t RepertoireTree, rng: R) -> Self {
        MoveSelector { tree, cursor: Cursor::at_root(tree), rng, played: Vec::new() }
    }

    /// Starts a new game on the same repertoire
    pub fn new_session(&mut self) {
        self.cursor = Cursor::at_root(self.tree);
        self.played.clear();
    }

    pub fn tree(&self) -> &'t RepertoireTree {
        self.tree
    }

    pub fn is_players_turn(&self) -> bool {
        self.cursor.is_players_turn()
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    /// Moves played in the current session, in order
    pub fn played(&self) -> Vec<&'t str> {
        self.played.iter().map(|&id| self.tree.node(id).san()).collect()
    }

    /// Book moves available from the current position; empty once the line has run out
    pub fn legal_player_replies(&self) -> Vec<&'t str> {
        self.cursor.children_of_current(self.tree).map(|(_, node)| node.san()).collect()
    }

    pub fn validate_and_play(&mut self, candidate: &str) -> Result<(), MoveError> {
        let matches: Vec<NodeId> = self.cursor.children_of_current(self.tree)
            .filter(|(_, node)| node.san() == candidate)
            .map(|(id, _)| id)
            .collect();

        match matches.as_slice() {
            [child] => {
                self.advance(*child);
                Ok(())
            }

            [] => Err(MoveError::InvalidMove {
                candidate: candidate.to_string(),
                expected: self.legal_player_replies().into_iter().map(String::from).collect(),
            }),

            _ => Err(MoveError::AmbiguousMove { candidate: candidate.to_string(), matches: matches.len() }),
        }
    }

    pub fn choose_opponent_reply(&mut self) -> Reply {
        let children = self.tree.child_ids(self.cursor.current());
        debug!("Choosing between {} book replies", children.len());

        match children.choose(&mut self.rng) {
            Some(&child) => {
                self.advance(child);
                Reply::Move(self.tree.node(child).san().to_string())
            }

            None => {
                self.cursor.mark_exhausted();
                Reply::Terminal
            }
        }
    }

    /// Reverts the last played move, returning its move text
    pub fn take_back(&mut self) -> Option<&'t str> {
        let last = self.played.pop()?;
        let node = self.tree.node(last);
        self.cursor.retreat_to(node.parent().unwrap_or(NodeId::ROOT));
        Some(node.san())
    }

    fn advance(&mut self, child: NodeId) {
        self.cursor.advance_to(child);
        self.played.push(child);
    }
}
