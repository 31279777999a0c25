//! Interactive shell command parsing.

use std::path::PathBuf;

use thiserror::Error;
use wcc_core::models::MoveDirection;

/// One line typed at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Append files and probe them.
    Add(Vec<PathBuf>),
    /// Append files, keeping only `.wav`.
    Drop(Vec<PathBuf>),
    /// Swap a row with its neighbour (zero-based index).
    Move { index: usize, direction: MoveDirection },
    /// Delete a row (zero-based index).
    Remove(usize),
    /// Choose the destination; `None` proposes the default.
    Output(Option<PathBuf>),
    List,
    Combine,
    Reset,
    Help,
    Quit,
}

impl ShellCommand {
    /// Commands that change the job, refused while a combine is running.
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::List | Self::Help | Self::Quit)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("{0}")]
    Quoting(String),

    #[error("'{command}' needs {what}")]
    MissingArgument { command: String, what: &'static str },

    #[error("'{0}' is not a row number (rows start at 1)")]
    BadRow(String),

    #[error("'{command}' takes {expected}")]
    TooManyArguments { command: String, expected: &'static str },
}

pub const HELP: &str = "\
Commands:
  add <file>...     add files (quote paths with spaces)
  drop <file>...    add files, ignoring anything that is not .wav
  up <n>            move row n up
  down <n>          move row n down
  rm <n>            remove row n
  output [file]     choose the output file (no argument: default name)
  list              show the file table
  combine           merge the files into one multichannel WAV
  reset             start a new job
  help              show this help
  quit              leave";

/// Parse a prompt line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, CommandError> {
    let words = shell_words::split(line).map_err(|e| CommandError::Quoting(e.to_string()))?;
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };
    if name.starts_with('#') {
        return Ok(None);
    }

    let command = match name.as_str() {
        "add" => ShellCommand::Add(paths(name, args)?),
        "drop" => ShellCommand::Drop(paths(name, args)?),
        "up" => ShellCommand::Move {
            index: row(name, args)?,
            direction: MoveDirection::Up,
        },
        "down" => ShellCommand::Move {
            index: row(name, args)?,
            direction: MoveDirection::Down,
        },
        "rm" | "remove" => ShellCommand::Remove(row(name, args)?),
        "output" | "out" => match args {
            [] => ShellCommand::Output(None),
            [path] => ShellCommand::Output(Some(PathBuf::from(path))),
            _ => return Err(too_many(name, "at most one path")),
        },
        "list" | "ls" => no_args(name, args, ShellCommand::List)?,
        "combine" => no_args(name, args, ShellCommand::Combine)?,
        "reset" | "new" => no_args(name, args, ShellCommand::Reset)?,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn paths(command: &str, args: &[String]) -> Result<Vec<PathBuf>, CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            what: "at least one file",
        });
    }
    Ok(args.iter().map(PathBuf::from).collect())
}

/// 1-based row number on the prompt, 0-based index in the session.
fn row(command: &str, args: &[String]) -> Result<usize, CommandError> {
    match args {
        [] => Err(CommandError::MissingArgument {
            command: command.to_string(),
            what: "a row number",
        }),
        [n] => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(CommandError::BadRow(n.clone())),
        },
        _ => Err(too_many(command, "one row number")),
    }
}

fn no_args(
    command: &str,
    args: &[String],
    parsed: ShellCommand,
) -> Result<ShellCommand, CommandError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(too_many(command, "no arguments"))
    }
}

fn too_many(command: &str, expected: &'static str) -> CommandError {
    CommandError::TooManyArguments {
        command: command.to_string(),
        expected,
    }
}
