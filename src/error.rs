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
use std::path::PathBuf;
use thiserror::Error;
use crate::movetext::Ply;

/// Errors while splitting a single book line into move tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected text before the first move number: '{text}'")]
    UnexpectedText { text: String },

    #[error("expected move number {expected}, found {found}")]
    MoveNumberMismatch { expected: u16, found: String },

    #[error("malformed moves after move number {number}: '{fragment}'")]
    MalformedFragment { number: u16, fragment: String },
}

/// Errors while loading a book file and compiling it into a repertoire tree
#[derive(Error, Debug)]
pub enum BookError {
    #[error("could not read book file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read book: {0}")]
    Read(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: multiple responses for the same position at {ply} ('{existing}' is already in the book, '{rejected}' conflicts with it)")]
    RepertoireConflict {
        line: usize,
        ply: Ply,
        existing: String,
        rejected: String,
    },

    #[error("book contains no lines")]
    Empty,
}

/// Errors for moves that can not be played from the current book position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("{candidate} is not in the book (expected: {})", expected_list(.expected))]
    InvalidMove { candidate: String, expected: Vec<String> },

    #[error("{candidate} matches {matches} book moves in the same position")]
    AmbiguousMove { candidate: String, matches: usize },
}

/// Errors while playing a training game on the board
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("'{input}' is not a legal move in this position")]
    IllegalMove { input: String },

    #[error("book move {san} is not legal in this position")]
    IllegalBookMove { san: String },

    #[error("it is not the trainee's turn")]
    NotPlayersTurn,

    #[error(transparent)]
    Book(#[from] MoveError),
}

fn expected_list(expected: &[String]) -> String {
    if expected.is_empty() {
        "end of line".to_string()
    } else {
        expected.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_message() {
        let err = MoveError::InvalidMove { candidate: "d4".to_string(), expected: vec!["e4".to_string()] };
        assert_eq!("d4 is not in the book (expected: e4)", err.to_string());

        let err = MoveError::InvalidMove { candidate: "d4".to_string(), expected: Vec::new() };
        assert_eq!("d4 is not in the book (expected: end of line)", err.to_string());
    }
}
