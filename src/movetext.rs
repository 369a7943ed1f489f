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

//! Splits book lines in "1. e4 e5 2. Nf3 Nc6" notation into half-move tokens.

use std::fmt;
use std::io::BufRead;
use std::sync::OnceLock;
use log::debug;
use regex::Regex;
use crate::error::{BookError, ParseError};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn is_white(self) -> bool {
        matches!(self, Side::White)
    }

    fn prefix(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// Color and move number of a half-move, displayed as "w1", "b1", "w2", ...
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ply {
    pub side: Side,
    pub number: u16,
}

impl Ply {
    pub fn new(side: Side, number: u16) -> Self {
        Ply { side, number }
    }

    pub fn white(number: u16) -> Self {
        Ply::new(Side::White, number)
    }

    pub fn black(number: u16) -> Self {
        Ply::new(Side::Black, number)
    }
}

impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.prefix(), self.number)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveToken {
    pub ply: Ply,
    pub san: String,
}

impl MoveToken {
    pub fn new(ply: Ply, san: &str) -> Self {
        MoveToken { ply, san: san.to_string() }
    }
}

/// A parsed book line together with its 1-based line number in the book file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookLine {
    pub line: usize,
    pub moves: Vec<MoveToken>,
}

fn move_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.").expect("valid move number pattern"))
}

/// Parses a single line of movetext.
///
/// Every move number must be followed by a white and a black move, except for the last one,
/// which may hold only a white move (line ends on white's move).
/// Move texts are kept verbatim, including check, capture and promotion markers.
pub fn parse_line(line: &str) -> Result<Vec<MoveToken>, ParseError> {
    let pattern = move_number_pattern();

    let mut numbers = Vec::new();
    let mut fragments = Vec::new();
    let mut last_end = 0;

    for caps in pattern.captures_iter(line) {
        let (Some(all), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let fragment = line[last_end..all.start()].trim();
        if numbers.is_empty() {
            if !fragment.is_empty() {
                return Err(ParseError::UnexpectedText { text: fragment.to_string() });
            }
        } else {
            fragments.push(fragment);
        }

        numbers.push(digits.as_str());
        last_end = all.end();
    }

    if numbers.is_empty() {
        let rest = line.trim();
        if rest.is_empty() {
            return Ok(Vec::new());
        }
        return Err(ParseError::UnexpectedText { text: rest.to_string() });
    }
    fragments.push(line[last_end..].trim());

    let mut tokens = Vec::with_capacity(fragments.len() * 2);
    let last = fragments.len() - 1;

    for (i, (&found, fragment)) in numbers.iter().zip(fragments).enumerate() {
        let number = (i + 1) as u16;
        if found.parse::<u16>().ok() != Some(number) {
            return Err(ParseError::MoveNumberMismatch { expected: number, found: found.to_string() });
        }

        let moves: Vec<&str> = fragment.split_whitespace().collect();
        match moves.as_slice() {
            _ if !moves.iter().all(|m| is_move_text(m)) => {
                return Err(ParseError::MalformedFragment { number, fragment: fragment.to_string() });
            }

            [white, black] => {
                tokens.push(MoveToken::new(Ply::white(number), white));
                tokens.push(MoveToken::new(Ply::black(number), black));
            }

            [white] if i == last => {
                tokens.push(MoveToken::new(Ply::white(number), white));
            }

            _ => {
                return Err(ParseError::MalformedFragment { number, fragment: fragment.to_string() });
            }
        }
    }

    Ok(tokens)
}

/// Move text starts with a piece letter or file, or is castling written with zeros
fn is_move_text(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_alphabetic()) || text.starts_with("0-0")
}

/// Reads all book lines until the end of the input or the first blank line.
pub fn read_book<R: BufRead>(reader: R) -> Result<Vec<BookLine>, BookError> {
    let mut lines = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let mut line = line?;
        if idx == 0 {
            if let Some(rest) = line.strip_prefix('\u{feff}') {
                line = rest.to_string();
            }
        }

        if line.trim().is_empty() {
            debug!("Blank line {} ends the book", idx + 1);
            break;
        }

        let moves = parse_line(&line).map_err(|source| BookError::Parse { line: idx + 1, source })?;
        lines.push(BookLine { line: idx + 1, moves });
    }

    Ok(lines)
}
