//! Command script parser using nom
//!
//! One command per line:
//! ```text
//! # comment
//! INSERT <key> <value...>
//! UPDATE <key> <value...>
//! FIND <key>
//! PEEK <key>
//! REMOVE <key>
//! PRINT | LEN | STATS | CLEAR
//! ```
//!
//! Keywords are case-insensitive. A key is one whitespace-free token; a
//! value is the rest of the line, trimmed.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till1},
    character::complete::space1,
    combinator::{all_consuming, map, rest, value, verify},
    sequence::{preceded, tuple},
    IResult,
};

/// A parsed script command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { key: String, value: String },
    Update { key: String, value: String },
    Find(String),
    Peek(String),
    Remove(String),
    Print,
    Len,
    Stats,
    Clear,
}

/// Parse one script line
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    match all_consuming(command)(line) {
        Ok((_, cmd)) => Ok(Some(cmd)),
        Err(_) => Err(format!("cannot parse '{}'", line)),
    }
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        map(tuple((tag_no_case("INSERT"), key, val)), |(_, key, value)| {
            Command::Insert { key, value }
        }),
        map(tuple((tag_no_case("UPDATE"), key, val)), |(_, key, value)| {
            Command::Update { key, value }
        }),
        map(preceded(tag_no_case("FIND"), key), Command::Find),
        map(preceded(tag_no_case("PEEK"), key), Command::Peek),
        map(preceded(tag_no_case("REMOVE"), key), Command::Remove),
        value(Command::Print, tag_no_case("PRINT")),
        value(Command::Len, tag_no_case("LEN")),
        value(Command::Stats, tag_no_case("STATS")),
        value(Command::Clear, tag_no_case("CLEAR")),
    ))(input)
}

fn key(input: &str) -> IResult<&str, String> {
    map(
        preceded(space1, take_till1(|c: char| c.is_whitespace())),
        str::to_string,
    )(input)
}

fn val(input: &str) -> IResult<&str, String> {
    map(
        preceded(space1, verify(rest, |s: &str| !s.trim().is_empty())),
        |s: &str| s.trim().to_string(),
    )(input)
}
