//! Interactive shell
//!
//! Line-oriented front end over [`Client`]. One command per line:
//!
//! ```text
//! GET <key>
//! SET <key> <len>      (value follows on the next line)
//! DELETE <key>
//! STREAM
//! ```
//!
//! Replies are prefixed with `< `. Any malformed command, invalid key or
//! server ERROR prints `< ERROR` and ends the session.

use std::io::{BufRead, Write};

use crate::client::Client;
use crate::error::{KvError, Result};
use crate::protocol::{Item, MAX_BODY_SIZE};

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Get { key: String },
    Set { key: String, len: usize },
    Delete { key: String },
    Stream,
}

/// Parse one input line
///
/// Words are separated by exactly one space, so stray spaces change the
/// arity and the line is rejected.
pub fn parse_line(line: &str) -> Result<ShellCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ShellCommand::Empty);
    }
    let parts: Vec<&str> = line.split(' ').collect();

    let command = match parts.as_slice() {
        ["GET", key] => ShellCommand::Get {
            key: key.to_string(),
        },
        ["SET", key, len] => {
            let len = len
                .parse()
                .ok()
                .filter(|&n: &usize| n <= MAX_BODY_SIZE as usize)
                .ok_or_else(|| KvError::InvalidCommand(format!("bad length '{}'", len)))?;
            ShellCommand::Set {
                key: key.to_string(),
                len,
            }
        }
        ["DELETE", key] => ShellCommand::Delete {
            key: key.to_string(),
        },
        ["STREAM"] => ShellCommand::Stream,
        _ => return Err(KvError::InvalidCommand(line.to_string())),
    };

    Ok(command)
}

/// Truncate or space-pad `line` to exactly `len` bytes
///
/// Truncation never splits a UTF-8 character; the gap is padded instead.
pub fn fit_value(line: &str, len: usize) -> String {
    let mut cut = len.min(line.len());
    while !line.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut value = String::with_capacity(len);
    value.push_str(&line[..cut]);
    while value.len() < len {
        value.push(' ');
    }
    value
}

/// Reply lines for a GET
pub fn format_value(value: &str) -> Vec<String> {
    let mut lines = vec![format!("< VALUE {}", value.len())];
    if !value.is_empty() {
        lines.push(format!("< {}", value));
    }
    lines
}

/// Reply lines for a STREAM
pub fn format_stream(items: &[Item]) -> Vec<String> {
    if items.is_empty() {
        return vec!["< EMPTY".to_string()];
    }
    items
        .iter()
        .flat_map(|item| {
            let value = item.value_str();
            [
                format!("< KEY {} VALUE {}", item.key, value.len()),
                format!("< {}", value),
            ]
        })
        .collect()
}

/// Drive a session until input ends or a command fails
///
/// Returns `Ok` on end of input and the failing error otherwise, after
/// `< ERROR` has been written.
pub fn run<R: BufRead, W: Write>(client: &mut Client, mut input: R, mut output: W) -> Result<()> {
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match execute(client, &line, &mut input, &mut output) {
            Ok(lines) => {
                for reply in lines {
                    writeln!(output, "{}", reply)?;
                }
            }
            Err(e) => {
                tracing::debug!("Ending session: {}", e);
                writeln!(output, "< ERROR")?;
                output.flush()?;
                return Err(e);
            }
        }
    }
}

fn execute<R: BufRead, W: Write>(
    client: &mut Client,
    line: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>> {
    match parse_line(line)? {
        ShellCommand::Empty => Ok(Vec::new()),
        ShellCommand::Get { key } => Ok(format_value(&client.get(&key)?)),
        ShellCommand::Set { key, len } => {
            write!(output, "> ")?;
            output.flush()?;

            let mut value_line = String::new();
            if input.read_line(&mut value_line)? == 0 {
                return Err(KvError::InvalidCommand("missing value line".to_string()));
            }
            let raw = value_line.trim_end_matches(['\r', '\n']);

            client.set(&key, &fit_value(raw, len))?;
            Ok(vec!["< OK".to_string()])
        }
        ShellCommand::Delete { key } => {
            client.delete(&key)?;
            Ok(vec!["< OK".to_string()])
        }
        ShellCommand::Stream => Ok(format_stream(&client.stream()?)),
    }
}
