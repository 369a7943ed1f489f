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
use std::path::Path;
use anyhow::Context;
use rand::Rng;
use serde::Deserialize;
use crate::movetext::Side;

pub const DEFAULT_CONFIG_FILE: &str = "trainer.toml";

const DEFAULT_REPLY_DELAY_MS: u64 = 500;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    White,
    Black,
    #[default]
    Random,
}

impl ColorChoice {
    pub fn resolve<R: Rng>(self, rng: &mut R) -> Side {
        match self {
            ColorChoice::White => Side::White,
            ColorChoice::Black => Side::Black,
            ColorChoice::Random => if rng.gen_bool(0.5) { Side::White } else { Side::Black },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainerConfig {
    #[serde(default)]
    pub book: Option<String>,

    #[serde(default)]
    pub color: ColorChoice,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_reply_delay")]
    pub reply_delay_ms: u64,
}

fn default_reply_delay() -> u64 {
    DEFAULT_REPLY_DELAY_MS
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig { book: None, color: ColorChoice::default(), seed: None, reply_delay_ms: DEFAULT_REPLY_DELAY_MS }
    }
}

pub fn parse_trainer_config(config_str: &str) -> anyhow::Result<TrainerConfig> {
    Ok(toml::from_str(config_str)?)
}

pub fn read_trainer_config<P: AsRef<Path>>(file_path: P) -> anyhow::Result<TrainerConfig> {
    let file_path = file_path.as_ref();
    let config_str = std::fs::read_to_string(file_path)
        .with_context(|| format!("could not read trainer configuration {}", file_path.display()))?;

    parse_trainer_config(&config_str).with_context(|| format!("invalid trainer configuration {}", file_path.display()))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_trainer_config(r#"
            book = "prep/as_black.txt"
            color = "black"
            seed = 42
            reply_delay_ms = 0
        "#).unwrap();

        assert_eq!(Some("prep/as_black.txt".to_string()), config.book);
        assert_eq!(ColorChoice::Black, config.color);
        assert_eq!(Some(42), config.seed);
        assert_eq!(0, config.reply_delay_ms);
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(TrainerConfig::default(), parse_trainer_config("").unwrap());
    }

    #[test]
    fn test_parse_unknown_color() {
        assert!(parse_trainer_config(r#"color = "green""#).is_err());
    }

    #[test]
    fn test_resolve_color() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(Side::White, ColorChoice::White.resolve(&mut rng));
        assert_eq!(Side::Black, ColorChoice::Black.resolve(&mut rng));

        let sides: Vec<Side> = (0..64).map(|_| ColorChoice::Random.resolve(&mut rng)).collect();
        assert!(sides.contains(&Side::White));
        assert!(sides.contains(&Side::Black));
    }
}
