//! Wordbase-Rust command line.
//!
//! ## Usage
//!
//! - `wordbase-rust` - Start the interactive shell
//! - `wordbase-rust suggest --board TEXT` - Suggest a move for player one
//! - `wordbase-rust words --board TEXT ROW COL` - List words starting at a cell
//! - `wordbase-rust duel --board TEXT` - Pit minimax against MCTS

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};

use wordbase_rust::board::{format_path, parse_path, Board};
use wordbase_rust::dictionary::Dictionary;
use wordbase_rust::duel::Duel;
use wordbase_rust::error::Error;
use wordbase_rust::game::{GameState, Player, Strategy};
use wordbase_rust::mcts::{MctsConfig, MonteCarloTreeSearch};
use wordbase_rust::minimax::{Minimax, MinimaxConfig};
use wordbase_rust::position::Position;
use wordbase_rust::shell::Shell;

/// Wordbase-Rust: minimax and MCTS engines for a territory word game
#[derive(Parser)]
#[command(name = "wordbase-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Newline-separated word list
    #[arg(long, global = true, default_value = "words.txt")]
    dict: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive analysis shell
    Shell,
    /// Suggest a move for player one on a fresh board
    Suggest {
        #[arg(long)]
        board: String,
        #[arg(long, value_enum, default_value_t = Algo::Minimax)]
        algo: Algo,
        /// Seconds to think
        #[arg(long, default_value_t = 3.0)]
        seconds: f64,
        /// Deepest minimax iteration
        #[arg(long, default_value_t = 20)]
        depth: u32,
        /// Disable the transposition table
        #[arg(long)]
        no_tt: bool,
        /// MCTS simulation cap
        #[arg(long, default_value_t = 10_000_000)]
        sims: usize,
        /// Disable blocking moves in MCTS rollouts
        #[arg(long)]
        no_block: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the words starting at a cell
    Words {
        #[arg(long)]
        board: String,
        row: usize,
        col: usize,
    },
    /// Play minimax against MCTS
    Duel {
        #[arg(long)]
        board: String,
        #[arg(long, default_value_t = 20)]
        games: u32,
        /// Seconds per move for both sides
        #[arg(long, default_value_t = 1.0)]
        seconds: f64,
        /// Plies after which a game is scored as a draw
        #[arg(long, default_value_t = 500)]
        max_plies: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Algo {
    Minimax,
    Mcts,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER).map_err(|e| anyhow!("installing logger: {e}"))?;
    log::set_max_level(level);
    Ok(())
}

fn load_board(text: &str, dictionary: &Dictionary) -> Result<Rc<Board>> {
    let board = Board::new(text, dictionary).context("decoding board")?;
    Ok(Rc::new(board))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let dictionary = Dictionary::load(&cli.dict)
        .with_context(|| format!("loading dictionary {}", cli.dict.display()))?;

    match cli.command {
        Some(Commands::Shell) | None => {
            let mut shell = Shell::new(dictionary);
            shell.run()?;
        }
        Some(Commands::Suggest {
            board,
            algo,
            seconds,
            depth,
            no_tt,
            sims,
            no_block,
            seed,
        }) => {
            let position = Position::new(load_board(&board, &dictionary)?, Player::One);
            if position.legal_moves().is_empty() {
                return Err(Error::NoLegalMoves(Player::One).into());
            }
            let mut strategy: Box<dyn Strategy<Position>> = match algo {
                Algo::Minimax => Box::new(Minimax::<Position>::new(MinimaxConfig {
                    max_seconds: seconds,
                    max_depth: depth,
                    use_transposition_table: !no_tt,
                    seed,
                })),
                Algo::Mcts => Box::new(MonteCarloTreeSearch::<Position>::new(MctsConfig {
                    max_seconds: seconds,
                    max_simulations: sims,
                    block: !no_block,
                    seed,
                })),
            };
            let id = strategy.get_move(&position)?;
            let instance = position.board().instance(id);
            println!("{} {}", instance.word, format_path(&instance.path));
        }
        Some(Commands::Words { board, row, col }) => {
            let board = load_board(&board, &dictionary)?;
            let cell = parse_path(&format!("({row},{col})"))?[0];
            for (word, path) in board.word_paths(cell) {
                println!("{word} {}", format_path(path));
            }
        }
        Some(Commands::Duel {
            board,
            games,
            seconds,
            max_plies,
        }) => {
            let start = Position::new(load_board(&board, &dictionary)?, Player::One);
            let mut minimax: Minimax<Position> = Minimax::new(MinimaxConfig {
                max_seconds: seconds,
                ..MinimaxConfig::default()
            });
            let mut mcts: MonteCarloTreeSearch<Position> = MonteCarloTreeSearch::new(MctsConfig {
                max_seconds: seconds,
                ..MctsConfig::default()
            });
            let mut duel: Duel<'_, Position> =
                Duel::new(&mut minimax, &mut mcts, games).with_max_plies(max_plies);
            let tally = duel.run(&start)?;
            println!("minimax vs mcts: {tally}");
        }
    }

    Ok(())
}
