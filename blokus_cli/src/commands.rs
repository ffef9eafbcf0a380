use std::str::FromStr;

use blokus::{OrientationChange, PieceId};

pub const HELP: &str = "\
Commands:
  select <piece>     pick a piece from your hand
  deselect           put the selected piece back
  rotate cw|ccw      turn the selected piece
  flip h|v           mirror the selected piece
  place <row> <col>  place the selected piece with its pivot on that cell
  pieces             show the pieces in your hand
  board              show the board
  help               show this help
  quit               leave the game";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Select(PieceId),
    Deselect,
    Orient(OrientationChange),
    Place { row: i8, col: i8 },
    Pieces,
    Board,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    Empty,
    UnknownCommand(String),
    /// The command exists but its arguments are wrong.
    Usage(&'static str),
}

impl std::error::Error for ParseCommandError {}

impl std::fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseCommandError::Empty => write!(f, "Type a command, or \"help\""),
            ParseCommandError::UnknownCommand(cmd) => {
                write!(f, "Unknown command \"{}\", try \"help\"", cmd)
            }
            ParseCommandError::Usage(usage) => write!(f, "Usage: {}", usage),
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("select" | "s", [piece]) => Command::Select(
                piece
                    .parse()
                    .map_err(|_| ParseCommandError::Usage("select <piece>"))?,
            ),
            ("select" | "s", _) => return Err(ParseCommandError::Usage("select <piece>")),
            ("deselect", []) => Command::Deselect,
            ("rotate" | "r", ["cw"]) => Command::Orient(OrientationChange::RotateClockwise),
            ("rotate" | "r", ["ccw"]) => {
                Command::Orient(OrientationChange::RotateCounterclockwise)
            }
            ("rotate" | "r", _) => return Err(ParseCommandError::Usage("rotate cw|ccw")),
            ("flip" | "f", ["h"]) => Command::Orient(OrientationChange::FlipHorizontal),
            ("flip" | "f", ["v"]) => Command::Orient(OrientationChange::FlipVertical),
            ("flip" | "f", _) => return Err(ParseCommandError::Usage("flip h|v")),
            ("place" | "p", [row, col]) => {
                let usage = ParseCommandError::Usage("place <row> <col>");
                Command::Place {
                    row: row.parse().map_err(|_| usage.clone())?,
                    col: col.parse().map_err(|_| usage)?,
                }
            }
            ("place" | "p", _) => return Err(ParseCommandError::Usage("place <row> <col>")),
            ("pieces", []) => Command::Pieces,
            ("board", []) => Command::Board,
            ("help" | "?", _) => Command::Help,
            ("quit" | "q" | "exit", _) => Command::Quit,
            _ => return Err(ParseCommandError::UnknownCommand(name.to_owned())),
        };
        Ok(command)
    }
}
