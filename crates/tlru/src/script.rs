//! Operation script parser using nom
//!
//! Script format, one operation per line:
//! ```text
//! put <key> <value>
//! get <key>
//! del <key>
//! # comment
//! ```
//!
//! Keywords are case-insensitive. Keys and values are whitespace-free tokens.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till1},
    character::complete::space1,
    combinator::{all_consuming, map},
    sequence::{preceded, separated_pair, terminated},
    IResult,
};
use serde::Serialize;

/// Capacity used by the built-in demo
pub const DEMO_CAPACITY: usize = 2;

/// Built-in demo: fill, overflow twice, refresh a key, then read one back
pub const DEMO_SCRIPT: &str = "\
put 1 1
put 2 2
put 3 3
put 4 4
put 3 3
get 4
";

/// A single cache operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Op {
    /// Insert or overwrite a key
    Put {
        /// Key to store
        key: String,
        /// Value to store
        value: String,
    },
    /// Read a key
    Get {
        /// Key to read
        key: String,
    },
    /// Remove a key
    Del {
        /// Key to remove
        key: String,
    },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Put { key, value } => write!(f, "put {} {}", key, value),
            Op::Get { key } => write!(f, "get {}", key),
            Op::Del { key } => write!(f, "del {}", key),
        }
    }
}

/// Script line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn keyword<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(name), space1)
}

fn op(input: &str) -> IResult<&str, Op> {
    alt((
        map(
            preceded(keyword("put"), separated_pair(token, space1, token)),
            |(key, value)| Op::Put {
                key: key.to_string(),
                value: value.to_string(),
            },
        ),
        map(preceded(keyword("get"), token), |key| Op::Get {
            key: key.to_string(),
        }),
        map(preceded(keyword("del"), token), |key| Op::Del {
            key: key.to_string(),
        }),
    ))(input)
}

/// Parse one non-blank, non-comment line
pub fn parse_op(line: &str) -> Option<Op> {
    all_consuming(op)(line.trim()).ok().map(|(_, op)| op)
}

/// Parse a whole script, skipping blank lines and `#` comments
pub fn parse_script(input: &str) -> Result<Vec<Op>, ScriptError> {
    let mut ops = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_op(line) {
            Some(op) => ops.push(op),
            None => {
                return Err(ScriptError {
                    line: i + 1,
                    message: format!("unrecognised operation '{}'", line),
                })
            }
        }
    }

    Ok(ops)
}
