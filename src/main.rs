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

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use anyhow::Context;
use clap::Parser;
use env_logger::{Env, Target};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use repertoire_trainer::config::{read_trainer_config, TrainerConfig, DEFAULT_CONFIG_FILE};
use repertoire_trainer::error::{GameError, MoveError};
use repertoire_trainer::game::TrainingGame;
use repertoire_trainer::movetext::Side;
use repertoire_trainer::selector::Reply;
use repertoire_trainer::tree::RepertoireTree;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "repertoire-trainer", version, about = "Trains prepared chess opening lines against a book opponent")]
struct Args {
    /// Play the white pieces
    #[arg(short = 'w', long, conflicts_with = "black")]
    white: bool,

    /// Play the black pieces
    #[arg(short = 'b', long)]
    black: bool,

    /// Opening book file, one line per prepared game
    #[arg(long, value_name = "FILE")]
    book: Option<PathBuf>,

    /// Trainer configuration file
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for the opponent's move choice
    #[arg(long)]
    seed: Option<u64>,

    /// Print the compiled repertoire tree and exit
    #[arg(long)]
    print_tree: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).target(Target::Stdout).init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let book = args.book.clone()
        .or_else(|| config.book.as_ref().map(PathBuf::from))
        .context("no opening book given (use --book or set 'book' in the configuration)")?;

    let mut rng = match args.seed.or(config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let trainee = if args.white {
        Side::White
    } else if args.black {
        Side::Black
    } else {
        config.color.resolve(&mut rng)
    };

    let tree = RepertoireTree::from_file(&book, trainee.is_white())
        .with_context(|| format!("could not load opening book {}", book.display()))?;

    if args.print_tree {
        print!("{}", tree);
        return Ok(());
    }

    println!("Repertoire Trainer v{}", VERSION);
    println!(" - Playing {} with {} prepared lines", trainee, tree.line_count());
    println!(" - Enter moves in SAN (Nf3) or UCI (g1f3) notation, 'hint', 'new' or 'quit'");

    let reply_delay = Duration::from_millis(config.reply_delay_ms);
    let mut game = TrainingGame::new(&tree, rng, trainee);
    run(&mut game, reply_delay)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TrainerConfig> {
    match path {
        Some(path) => read_trainer_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => read_trainer_config(DEFAULT_CONFIG_FILE),
        None => Ok(TrainerConfig::default()),
    }
}

fn run(game: &mut TrainingGame<StdRng>, reply_delay: Duration) -> anyhow::Result<()> {
    start_line(game)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("could not read from stdin")?;

        match line.trim() {
            "" => continue,

            "quit" => return Ok(()),

            "hint" => {
                let moves = game.book_moves();
                if moves.is_empty() {
                    println!("No book moves left in this line");
                } else {
                    println!("Book moves: {}", moves.join(", "));
                }
            }

            "new" => {
                game.new_session();
                start_line(game)?;
            }

            _ if game.is_line_complete() => {
                println!("The line is complete, enter 'new' to start again");
            }

            input => match game.play_trainee_move(input) {
                Ok(san) => {
                    println!("You played {}", san);
                    thread::sleep(reply_delay);
                    reply(game)?;
                }

                Err(GameError::Book(e @ MoveError::InvalidMove { .. })) => {
                    println!("Wrong move: {}", e);
                }

                Err(e @ GameError::Book(MoveError::AmbiguousMove { .. })) => {
                    return Err(e).context("inconsistent repertoire tree");
                }

                Err(e) => println!("{}", e),
            },
        }

        io::stdout().flush()?;
    }

    Ok(())
}

fn start_line(game: &mut TrainingGame<StdRng>) -> anyhow::Result<()> {
    println!();
    if game.is_players_turn() {
        print!("{}", game.render());
        Ok(())
    } else {
        reply(game)
    }
}

fn reply(game: &mut TrainingGame<StdRng>) -> anyhow::Result<()> {
    match game.play_book_reply() {
        Ok(Reply::Move(san)) => {
            println!("Opponent played {}", san);
            print!("{}", game.render());
            if game.is_line_complete() {
                finish_line(game);
            }
        }

        Ok(Reply::Terminal) => finish_line(game),

        Err(e @ GameError::IllegalBookMove { .. }) => {
            error!("Line {} can not be played on the board", game.played().join(" "));
            return Err(e).context("opening book contains an illegal move");
        }

        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn finish_line(game: &TrainingGame<StdRng>) {
    info!("Line complete: {}", game.played().join(" "));
    println!("Nice! Line complete with {} mistakes, enter 'new' to play again", game.mistakes());
}
