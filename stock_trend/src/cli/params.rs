use std::str::FromStr;

use thiserror::Error;

use crate::{
    models::range::{Range, RangeError},
    selection::{Event, SelectionWarning, normalize_symbol},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Symbol(#[from] SelectionWarning),
}

/// One line typed into the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Event(Event),
    Suggest(String),
    Pick(String),
    RefreshQuote,
    Show,
    Help,
    Quit,
}

pub const SESSION_HELP: &str = "\
commands:
  add <SYM>       track a symbol
  remove <SYM>    stop tracking a symbol
  toggle <SYM>    select / deselect a tracked symbol
  click <SYM>     select only this symbol (as if clicked on the chart)
  range <R>       switch range: 1d 5d 1mo 6mo ytd 1y 5y
  suggest <TEXT>  look up matching symbols
  pick <SYM>      add a symbol from the last suggestions
  quote           refresh the live quote
  show            print the session as JSON
  quit";

/// Splits a comma-separated symbol list, dropping blanks and normalizing the
/// rest.
pub fn parse_symbols(list: &str) -> Result<Vec<String>, CommandError> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_symbol(s).map_err(CommandError::from))
        .collect()
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        let cmd = match verb.to_lowercase().as_str() {
            "add" => SessionCommand::Event(Event::AddSymbol(arg("add")?)),
            "remove" | "rm" => SessionCommand::Event(Event::RemoveSymbol(arg("remove")?)),
            "toggle" => SessionCommand::Event(Event::ToggleSelect(arg("toggle")?)),
            "click" => SessionCommand::Event(Event::ChartClick(arg("click")?)),
            "range" => SessionCommand::Event(Event::SetRange(arg("range")?.parse::<Range>()?)),
            "suggest" => SessionCommand::Suggest(arg("suggest")?),
            "pick" => SessionCommand::Pick(arg("pick")?),
            "quote" => SessionCommand::RefreshQuote,
            "show" | "" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}
