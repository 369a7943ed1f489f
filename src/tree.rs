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
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use log::{debug, info};
use crate::error::BookError;
use crate::movetext::{read_book, BookLine, MoveToken, Ply};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A half-move reached by one specific sequence of moves from the start position.
#[derive(Clone, Debug)]
pub struct TreeNode {
    ply: Option<Ply>,
    san: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    player_move: bool,
}

impl TreeNode {
    fn root() -> Self {
        TreeNode { ply: None, san: String::new(), parent: None, children: Vec::new(), player_move: false }
    }

    /// Ply label of the move, `None` for the root
    pub fn ply(&self) -> Option<Ply> {
        self.ply
    }

    pub fn san(&self) -> &str {
        &self.san
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this move is played by the trainee
    pub fn is_player_move(&self) -> bool {
        self.player_move
    }

    fn matches(&self, token: &MoveToken) -> bool {
        self.ply == Some(token.ply) && self.san == token.san
    }
}

/// Opening repertoire compiled into an arena tree.
///
/// Every path from the root is a prepared line. Positions where the trainee is to move have at
/// most one continuation, positions where the opponent is to move may branch.
/// The tree is immutable once built and can be shared by any number of training sessions.
#[derive(Clone, Debug)]
pub struct RepertoireTree {
    nodes: Vec<TreeNode>,
    player_moves_first: bool,
    line_count: usize,
}

impl RepertoireTree {
    /// Reads and compiles the given book file.
    /// `player_moves_first` is true if the trainee plays white.
    pub fn from_file<P: AsRef<Path>>(path: P, player_moves_first: bool) -> Result<RepertoireTree, BookError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BookError::Io { path: path.to_path_buf(), source })?;

        info!("Reading opening book: {} ...", path.display());
        RepertoireTree::from_reader(BufReader::new(file), player_moves_first)
    }

    pub fn from_reader<R: BufRead>(reader: R, player_moves_first: bool) -> Result<RepertoireTree, BookError> {
        let lines = read_book(reader)?;
        if lines.is_empty() {
            return Err(BookError::Empty);
        }
        RepertoireTree::from_lines(&lines, player_moves_first)
    }

    pub fn from_lines(lines: &[BookLine], player_moves_first: bool) -> Result<RepertoireTree, BookError> {
        let mut tree = RepertoireTree { nodes: vec![TreeNode::root()], player_moves_first, line_count: 0 };

        for line in lines.iter() {
            tree.add_line(line)?;
        }

        info!("Compiled repertoire: {} lines, {} moves, depth {}", tree.line_count, tree.len(), tree.max_depth());
        Ok(tree)
    }

    fn add_line(&mut self, line: &BookLine) -> Result<(), BookError> {
        // Every line starts from the initial position, so the turn flag restarts as well
        let mut player_move = self.player_moves_first;
        let mut parent = NodeId::ROOT;

        for token in line.moves.iter() {
            parent = match self.find_child(parent, token) {
                Some(existing) => existing,

                None => {
                    if player_move {
                        if let Some(&sibling) = self.nodes[parent.0].children.first() {
                            return Err(BookError::RepertoireConflict {
                                line: line.line,
                                ply: token.ply,
                                existing: self.nodes[sibling.0].san.clone(),
                                rejected: token.san.clone(),
                            });
                        }
                    }
                    self.add_node(parent, token, player_move)
                }
            };

            player_move = !player_move;
        }

        debug!("Added book line {} ({} half-moves)", line.line, line.moves.len());
        self.line_count += 1;
        Ok(())
    }

    fn find_child(&self, parent: NodeId, token: &MoveToken) -> Option<NodeId> {
        self.nodes[parent.0].children.iter().copied().find(|&c| self.nodes[c.0].matches(token))
    }

    fn add_node(&mut self, parent: NodeId, token: &MoveToken, player_move: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            ply: Some(token.ply),
            san: token.san.clone(),
            parent: Some(parent),
            children: Vec::new(),
            player_move,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes[id.0].children.iter().map(move |c| &self.nodes[c.0])
    }

    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn player_moves_first(&self) -> bool {
        self.player_moves_first
    }

    /// Number of half-move nodes, excluding the root
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of book lines the tree was compiled from
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Length of the longest prepared line in half-moves
    pub fn max_depth(&self) -> usize {
        (1..self.nodes.len()).map(|i| self.depth(NodeId(i))).max().unwrap_or(0)
    }

    fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Moves leading from the start position to the given node
    pub fn path_to(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if node.ply.is_some() {
                path.push(node.san.as_str());
            }
            current = node.parent;
        }
        path.reverse();
        path
    }

    fn write_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        for &child in self.nodes[id.0].children.iter() {
            let node = &self.nodes[child.0];
            let marker = if node.player_move { '*' } else { ' ' };
            if let Some(ply) = node.ply {
                writeln!(f, "{:indent$}{}{} {}", "", marker, ply, node.san, indent = indent)?;
            }
            self.write_subtree(f, child, indent + 2)?;
        }
        Ok(())
    }
}

/// Prints one move per line, indented by depth; trainee moves are marked with '*'
impl fmt::Display for RepertoireTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+")?;
        self.write_subtree(f, NodeId::ROOT, 0)
    }
}
