//! Operator commands: `start <x-kind> <o-kind>` and `exit`

use std::str::FromStr;

use tictac_core::{ConfigError, MatchConfig, Tier};

/// A parsed operator command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Play one game with the given tiers
    Start { x: Tier, o: Tier },
    /// Leave the command loop
    Exit,
}

impl Command {
    /// Match configuration for a `start` command
    pub fn match_config(&self) -> Option<MatchConfig> {
        match *self {
            Command::Start { x, o } => Some(MatchConfig::new(x, o)),
            Command::Exit => None,
        }
    }
}

impl FromStr for Command {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();

        match tokens.next() {
            Some("exit") => Ok(Command::Exit),
            Some("start") => {
                let x = tokens.next().ok_or(ConfigError::MissingArgument("x-kind"))?;
                let o = tokens.next().ok_or(ConfigError::MissingArgument("o-kind"))?;
                Ok(Command::Start {
                    x: x.parse()?,
                    o: o.parse()?,
                })
            }
            Some(other) => Err(ConfigError::UnknownCommand(other.to_string())),
            None => Err(ConfigError::UnknownCommand(String::new())),
        }
    }
}
