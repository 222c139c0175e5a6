//! Interactive command loop
//!
//! Reads `start`/`exit` commands, plays each game to completion, and serves
//! human moves from the same console.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tictac_core::{Mark, Match, MatchConfig, MatchError, MoveError, MoveSource};

use crate::command::Command;
use crate::render::render;

/// Line-oriented terminal: prompts on `out`, answers from `input`
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print `prompt` and read one line, `None` at end of input
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

impl<R: BufRead, W: Write> MoveSource for Console<R, W> {
    /// A read error is logged and treated as closed input, ending the game.
    fn read_move(&mut self, mark: Mark) -> Option<String> {
        match self.prompt("Enter the coordinates: ") {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(%mark, error = %err, "failed to read move");
                None
            }
        }
    }

    fn reject(&mut self, error: &MoveError) {
        if let Err(err) = self.say(&error.to_string()) {
            tracing::error!(error = %err, "failed to report rejected move");
        }
    }
}

// ============================================================================
// COMMAND LOOP
// ============================================================================

/// Run commands until `exit` or end of input
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, seed: Option<u64>) -> Result<()> {
    let mut games_started: u64 = 0;

    while let Some(line) = console.prompt("Input command: ")? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(error = %err, input = %line, "bad command");
                console.say("Bad parameters!")?;
                continue;
            }
        };

        let Some(mut config) = command.match_config() else {
            break;
        };

        if let Some(seed) = seed {
            config = config.with_seed(seed.wrapping_add(games_started));
        }
        games_started += 1;

        if !play_game(console, &config)? {
            tracing::info!("input closed during game");
            break;
        }
    }

    Ok(())
}

/// Play one game, printing the board after every move.
/// Returns `false` if input ran out before the game finished.
fn play_game<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &MatchConfig,
) -> Result<bool> {
    tracing::info!(x = %config.x, o = %config.o, seed = ?config.seed, "starting game");

    let mut game = Match::from_config(config);
    console.say(&render(game.board()))?;

    while !game.state().is_finished() {
        let selector = game.selector(game.to_move());
        if !selector.is_human() {
            console.say(&format!("Making move level \"{}\"", selector.tier()))?;
        }

        match game.step(console) {
            Ok(_) => console.say(&render(game.board()))?,
            Err(MatchError::InputClosed(_)) => return Ok(false),
            Err(err) => return Err(err).context("game aborted"),
        }
    }

    console.say(&game.state().to_string())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str, seed: Option<u64>) -> String {
        let mut console = Console::new(Cursor::new(script.to_string()), Vec::new());
        run(&mut console, seed).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let out = run_script("exit\n", None);
        assert_eq!(out, "Input command: ");
    }

    #[test]
    fn test_bad_parameters_then_exit() {
        let out = run_script("start easy\nfoo\nstart easy wizard\nexit\n", None);
        assert_eq!(out.matches("Bad parameters!").count(), 3);
    }

    #[test]
    fn test_ai_game_reports_outcome() {
        let out = run_script("start hard hard\nexit\n", Some(11));
        assert!(out.contains("Making move level \"hard\""));
        assert!(out.trim_end().ends_with("Input command:"));
        assert!(out.contains("Draw"));
    }

    #[test]
    fn test_human_game_with_reprompts() {
        let script = "start user user\n1 3\n1 1\nx 1\n1 3\n2 3\n2 1\n3 3\nexit\n";
        let out = run_script(script, None);
        assert!(out.contains("You should enter numbers!"));
        assert!(out.contains("This cell is occupied! Choose another one!"));
        assert!(out.contains("X wins"));
        assert!(out.contains("| X X X |"));
    }

    #[test]
    fn test_end_of_input_mid_game() {
        let out = run_script("start user easy\n", None);
        assert!(out.ends_with("Enter the coordinates: "));
    }
}
