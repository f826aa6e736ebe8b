//! Line commands for the terminal front end.
//!
//! Lines starting with `:` are commands; anything else is raw search-box
//! input.

use shopscout_core::types::{Category, PriceRange};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw query text, fed to the debouncer as typed.
    Query(String),
    Category(Category),
    Price(PriceRange),
    Chat(String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command ':{0}' (try :help)")]
    Unknown(String),
    #[error("unknown category '{0}' (expected All, Electronics, Fashion or Groceries)")]
    UnknownCategory(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid price '{0}'")]
    InvalidPrice(String),
}

pub const HELP: &str = "\
commands:
  <text>                 type into the search box
  :category <name>       All, Electronics, Fashion, Groceries
  :price <min> <max>     set the price slider
  :chat <message>        ask the assistant
  :show                  print filters, results and chat
  :quit                  exit";

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Query(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };

        match name {
            "category" | "cat" => {
                if arg.is_empty() {
                    return Err(CommandError::Usage(":category <name>"));
                }
                Category::parse(arg)
                    .map(Command::Category)
                    .ok_or_else(|| CommandError::UnknownCategory(arg.to_string()))
            }
            "price" => {
                let mut bounds = arg.split_whitespace();
                match (bounds.next(), bounds.next(), bounds.next()) {
                    (Some(min), Some(max), None) => {
                        Ok(Command::Price(PriceRange::new(parse_price(min)?, parse_price(max)?)))
                    }
                    _ => Err(CommandError::Usage(":price <min> <max>")),
                }
            }
            // Blank messages are passed through; the chat manager ignores them.
            "chat" => Ok(Command::Chat(arg.to_string())),
            "show" => Ok(Command::Show),
            "help" | "h" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_price(raw: &str) -> Result<u64, CommandError> {
    raw.replace(['_', ','], "")
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidPrice(raw.to_string()))
}
