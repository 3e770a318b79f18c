//! Interactive command shell for analysing games.
//!
//! Reads one command per line, prints the reply, and keeps a single board and
//! position between commands.
//!
//! ## Commands
//!
//! - `nb BOARD` - load a new board from its text encoding; player one to move
//! - `psb` - print the static board with its bombs
//! - `ps` - print the current position
//! - `h` - heuristic value for the player to move
//! - `words Y X` - every word-instance starting at a cell
//! - `lm` - legal moves, best first
//! - `lwm WORD` - every legal placement of one word with its resulting value
//! - `m PATH` - play the word following `PATH`, e.g. `m (0,0),(0,1),(0,2)`
//! - `ap` - words already played
//! - `add-ap WORD...` - mark words as already played
//! - `bombs PATH`, `mbombs PATH` - drop bombs or mega-bombs on cells
//! - `sm [secs] [depth] [tt]` - suggest a move with minimax
//! - `smmc [secs]` - suggest a move with Monte Carlo tree search
//! - `l FILE` - run the commands in a file
//! - `help`, `quit`

use std::fs;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::board::{format_path, parse_path, Board};
use crate::catalog::WordId;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::game::{GameState, Player, Strategy};
use crate::mcts::{MctsConfig, MonteCarloTreeSearch};
use crate::minimax::{Minimax, MinimaxConfig};
use crate::position::Position;

const PROMPT: &str = "boardshell> ";

const KNOWN_COMMANDS: &[&str] = &[
    "add-ap", "ap", "bombs", "h", "help", "l", "lm", "lwm", "m", "mbombs", "nb", "ps", "psb",
    "quit", "sm", "smmc", "words",
];

/// Shell state: the dictionary, the position under study, and search settings.
pub struct Shell {
    dictionary: Dictionary,
    position: Option<Position>,
    minimax: MinimaxConfig,
    mcts: MctsConfig,
}

impl Shell {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_configs(dictionary, MinimaxConfig::default(), MctsConfig::default())
    }

    pub fn with_configs(dictionary: Dictionary, minimax: MinimaxConfig, mcts: MctsConfig) -> Self {
        Self {
            dictionary,
            position: None,
            minimax,
            mcts,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;
            let Some(line) = lines.next() else {
                writeln!(output)?;
                break;
            };
            let line = line?;
            let Some((command, args)) = split_command(&line) else {
                continue;
            };

            let (success, message) = self.execute(&command, &args);
            if !success {
                writeln!(output, "error: {message}")?;
            } else if !message.is_empty() {
                writeln!(output, "{}", message.trim_end())?;
            }

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command and return (success, reply).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        let reply = match command {
            "quit" => Ok(String::new()),
            "help" => Ok(KNOWN_COMMANDS.join(" ")),
            "nb" => self.new_board(args),
            "psb" => self.current().map(|p| p.board().to_string()),
            "ps" => self.current().map(|p| p.to_string()),
            "h" => self.current().map(|p| p.heuristic().to_string()),
            "words" => self.words(args),
            "lm" => self.legal_moves(),
            "lwm" => self.legal_word_moves(args),
            "m" => self.play(args),
            "ap" => self.current().map(|p| p.played_words().join(" ")),
            "add-ap" => self.add_already_played(args),
            "bombs" => self.bombs(args, false),
            "mbombs" => self.bombs(args, true),
            "sm" => self.suggest_minimax(args),
            "smmc" => self.suggest_mcts(args),
            "l" => self.load(args),
            _ => return (false, format!("unknown command: {command}")),
        };
        match reply {
            Ok(message) => (true, message),
            Err(e) => (false, e.to_string()),
        }
    }

    fn current(&self) -> Result<&Position> {
        self.position.as_ref().ok_or(Error::NoBoard)
    }

    fn current_mut(&mut self) -> Result<&mut Position> {
        self.position.as_mut().ok_or(Error::NoBoard)
    }

    /// The current position, if a search can run on it.
    fn searchable(&self) -> Result<&Position> {
        let position = self.current()?;
        if position.is_terminal() {
            return Err(Error::TerminalPosition);
        }
        if position.legal_moves().is_empty() {
            return Err(Error::NoLegalMoves(position.player_to_move()));
        }
        Ok(position)
    }

    fn new_board(&mut self, args: &[&str]) -> Result<String> {
        if args.is_empty() {
            return Err(Error::Usage("nb BOARD"));
        }
        let board = Board::new(&args.concat(), &self.dictionary)?;
        let count = board.catalog().len();
        self.position = Some(Position::new(Rc::new(board), Player::One));
        Ok(format!("{count} word-instances"))
    }

    fn words(&self, args: &[&str]) -> Result<String> {
        let usage = Error::Usage("words Y X (row, column)");
        let [row, col] = args else {
            return Err(usage);
        };
        let path = parse_path(&format!("({row},{col})")).map_err(|_| usage)?;
        let board = self.current()?.board();
        let lines: Vec<String> = board
            .word_paths(path[0])
            .into_iter()
            .map(|(word, path)| format!("{word} {}", format_path(path)))
            .collect();
        Ok(lines.join("\n"))
    }

    fn legal_moves(&self) -> Result<String> {
        let position = self.current()?;
        let lines: Vec<String> = position
            .legal_moves()
            .into_iter()
            .map(|id| describe(position.board(), id))
            .collect();
        Ok(lines.join("\n"))
    }

    fn legal_word_moves(&self, args: &[&str]) -> Result<String> {
        let [word] = args else {
            return Err(Error::Usage("lwm WORD"));
        };
        let position = self.current()?;
        let lines: Vec<String> = position
            .legal_moves_matching(Some(*word))
            .into_iter()
            .map(|id| {
                let mut next = position.clone();
                next.play(id);
                // Seen from the player who just moved
                let value = -next.heuristic();
                format!("{} h={value}", describe(position.board(), id))
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn play(&mut self, args: &[&str]) -> Result<String> {
        if args.is_empty() {
            return Err(Error::Usage("m PATH"));
        }
        let path = parse_path(&args.join(" "))?;
        let position = self.current_mut()?;
        if position.is_terminal() {
            return Err(Error::TerminalPosition);
        }
        let id = position.board().instance_for_path(&path)?;
        if !position.legal_moves().contains(&id) {
            return Err(Error::IllegalMove(path));
        }
        let played = describe(position.board(), id);
        position.play(id);
        Ok(played)
    }

    fn add_already_played(&mut self, args: &[&str]) -> Result<String> {
        if args.is_empty() {
            return Err(Error::Usage("add-ap WORD..."));
        }
        let position = self.current_mut()?;
        let marked: usize = args
            .iter()
            .map(|word| position.add_already_played(&word.to_lowercase()))
            .sum();
        Ok(format!("{marked} word-instances marked played"))
    }

    fn bombs(&mut self, args: &[&str], mega: bool) -> Result<String> {
        if args.is_empty() {
            return Err(Error::Usage("bombs PATH"));
        }
        let cells = parse_path(&args.join(" "))?;
        self.current_mut()?.put_bombs(&cells, mega);
        Ok(String::new())
    }

    fn suggest_minimax(&mut self, args: &[&str]) -> Result<String> {
        const USAGE: &str = "sm [secs] [depth] [tt]";
        let mut config = self.minimax.clone();
        if let Some(secs) = args.first() {
            config.max_seconds = secs.parse().map_err(|_| Error::Usage(USAGE))?;
        }
        if let Some(depth) = args.get(1) {
            config.max_depth = depth.parse().map_err(|_| Error::Usage(USAGE))?;
        }
        if let Some(tt) = args.get(2) {
            config.use_transposition_table = parse_switch(tt).ok_or(Error::Usage(USAGE))?;
        }

        let position = self.searchable()?;
        let mut search: Minimax<Position> = Minimax::new(config);
        let id = search.get_move(position)?;
        let stats = search.stats();
        Ok(format!(
            "{} (depth {}, {} nodes)",
            describe(position.board(), id),
            stats.depth,
            stats.nodes
        ))
    }

    fn suggest_mcts(&mut self, args: &[&str]) -> Result<String> {
        let mut config = self.mcts.clone();
        if let Some(secs) = args.first() {
            config.max_seconds = secs.parse().map_err(|_| Error::Usage("smmc [secs]"))?;
        }

        let position = self.searchable()?;
        let mut search: MonteCarloTreeSearch<Position> = MonteCarloTreeSearch::new(config);
        let id = search.get_move(position)?;
        Ok(format!(
            "{} ({} simulations)",
            describe(position.board(), id),
            search.simulations()
        ))
    }

    /// Run a command file, stopping at the first failing command.
    fn load(&mut self, args: &[&str]) -> Result<String> {
        let [file] = args else {
            return Err(Error::Usage("l FILE"));
        };
        let script = fs::read_to_string(file)?;
        let mut replies = Vec::new();
        for (n, line) in script.lines().enumerate() {
            let Some((command, args)) = split_command(line) else {
                continue;
            };
            if command == "quit" {
                break;
            }
            let (success, message) = self.execute(&command, &args);
            if !success {
                replies.push(format!("{file}:{}: error: {message}", n + 1));
                break;
            }
            if !message.is_empty() {
                replies.push(message);
            }
        }
        Ok(replies.join("\n"))
    }
}

/// Split a line into a lowercased command and its arguments.
fn split_command(line: &str) -> Option<(String, Vec<&str>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_lowercase();
    Some((command, parts.collect()))
}

fn parse_switch(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// `word (r,c),(r,c),...`
fn describe(board: &Board, id: WordId) -> String {
    let instance = board.instance(id);
    format!("{} {}", instance.word, format_path(&instance.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CELLS;

    fn cao_shell() -> Shell {
        let mut shell = Shell::with_configs(
            Dictionary::from_words(["cao"]),
            MinimaxConfig {
                max_seconds: f64::INFINITY,
                max_depth: 1,
                use_transposition_table: true,
                seed: Some(9),
            },
            MctsConfig {
                max_seconds: f64::INFINITY,
                max_simulations: 50,
                block: true,
                seed: Some(9),
            },
        );
        let text = format!("cao{}", "z".repeat(CELLS - 3));
        let (success, _) = shell.execute("nb", &[&text]);
        assert!(success);
        shell
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  # comment"), None);
        assert_eq!(split_command(""), None);
        let (command, args) = split_command("LWM cao").unwrap();
        assert_eq!(command, "lwm");
        assert_eq!(args, vec!["cao"]);
    }

    #[test]
    fn test_commands_need_a_board() {
        let mut shell = Shell::new(Dictionary::from_words(["cao"]));
        let (success, message) = shell.execute("ps", &[]);
        assert!(!success);
        assert_eq!(message, "no board loaded");
        let (success, _) = shell.execute("frobnicate", &[]);
        assert!(!success);
    }

    #[test]
    fn test_words_and_legal_moves() {
        let mut shell = cao_shell();
        let (success, reply) = shell.execute("words", &["0", "0"]);
        assert!(success);
        assert_eq!(reply, "cao (0,0),(0,1),(0,2)");

        let (success, reply) = shell.execute("lm", &[]);
        assert!(success);
        assert_eq!(reply, "cao (0,0),(0,1),(0,2)");

        let (success, reply) = shell.execute("lwm", &["cao"]);
        assert!(success);
        assert_eq!(reply, "cao (0,0),(0,1),(0,2) h=0");

        let (success, _) = shell.execute("words", &["13", "0"]);
        assert!(!success);
    }

    #[test]
    fn test_play_move_and_played_words() {
        let mut shell = cao_shell();
        let (success, reply) = shell.execute("m", &["(0,0),(0,1),(0,2)"]);
        assert!(success, "{reply}");
        assert_eq!(shell.position().unwrap().player_to_move(), Player::Two);

        let (_, reply) = shell.execute("ap", &[]);
        assert_eq!(reply, "cao");

        let (_, reply) = shell.execute("ps", &[]);
        assert!(reply.starts_with("player(2): h=0"));

        // Consumed, so no longer legal
        let (success, _) = shell.execute("m", &["(0,0),(0,1),(0,2)"]);
        assert!(!success);
    }

    #[test]
    fn test_add_already_played_and_bombs() {
        let mut shell = cao_shell();
        let (success, reply) = shell.execute("add-ap", &["CAO"]);
        assert!(success);
        assert_eq!(reply, "1 word-instances marked played");
        let (_, reply) = shell.execute("lm", &[]);
        assert!(reply.is_empty());

        let (success, _) = shell.execute("mbombs", &["(5,5)"]);
        assert!(success);
        let (_, reply) = shell.execute("ps", &[]);
        assert!(reply.lines().nth(7).unwrap().contains("+z"));
    }

    #[test]
    fn test_suggestions() {
        let mut shell = cao_shell();
        let (success, reply) = shell.execute("sm", &[]);
        assert!(success, "{reply}");
        assert!(reply.starts_with("cao (0,0),(0,1),(0,2) (depth 1"));

        let (success, _) = shell.execute("sm", &["x"]);
        assert!(!success);

        let (success, reply) = shell.execute("smmc", &[]);
        assert!(success, "{reply}");
        assert!(reply.starts_with("cao (0,0),(0,1),(0,2)"));
    }

    #[test]
    fn test_suggestions_without_moves_are_errors() {
        let mut shell = cao_shell();
        let (success, _) = shell.execute("m", &["(0,0),(0,1),(0,2)"]);
        assert!(success);

        // Player two has nothing to play but has not lost
        let (success, reply) = shell.execute("sm", &["1"]);
        assert!(!success);
        assert_eq!(reply, "player 2 has no legal moves");
        let (success, reply) = shell.execute("smmc", &["0.2"]);
        assert!(!success);
        assert_eq!(reply, "player 2 has no legal moves");
        assert!(shell.position().is_some());
    }

    #[test]
    fn test_run_with_script() {
        let mut shell = cao_shell();
        let input = b"h\n\nbogus\nquit\nps\n" as &[u8];
        let mut output = Vec::new();
        shell.run_with(input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("boardshell> 0\n"));
        assert!(text.contains("error: unknown command: bogus"));
        assert!(!text.contains("player("));
    }
}
