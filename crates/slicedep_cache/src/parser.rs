//! Parser for Makefile-style dependency listings emitted by Slice translators.
//!
//! A translator run with `--depend` prints one rule per translated file:
//!
//! ```text
//! Hello.ice: Hello.ice \
//!     /opt/Ice/slice/Ice/Identity.ice
//! Other.ice: Other.ice C\:/Program\ Files/Ice/slice/Ice/Current.ice
//! ```
//!
//! Rules are joined across trailing-backslash continuations, split into file
//! names by a small escape-aware lexer, and turned into [`DependencyRecord`]s.

use std::path::PathBuf;
use std::time::SystemTime;

use slicedep_common::normalize_path;

use crate::error::DependError;
use crate::record::DependencyRecord;

/// Parses translator output, stamping every record with the current time.
pub fn parse(raw: &str) -> Result<Vec<DependencyRecord>, DependError> {
    parse_at(raw, SystemTime::now())
}

/// Parses translator output, stamping every record with `timestamp`.
///
/// Blank lines are skipped and never end a rule. A continuation left dangling
/// at the end of the input is still parsed as a rule.
pub fn parse_at(raw: &str, timestamp: SystemTime) -> Result<Vec<DependencyRecord>, DependError> {
    let mut records = Vec::new();
    let mut rule = String::new();
    let mut rule_line = 0;
    let mut open = false;

    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !open {
            rule_line = idx + 1;
            open = true;
        }
        match line.strip_suffix('\\') {
            Some(head) => rule.push_str(head),
            None => {
                rule.push_str(line);
                records.push(parse_rule(&rule, rule_line, timestamp)?);
                rule.clear();
                open = false;
            }
        }
    }

    if open && !rule.trim().is_empty() {
        records.push(parse_rule(&rule, rule_line, timestamp)?);
    }

    Ok(records)
}

/// Turns one logical rule into a record.
fn parse_rule(
    rule: &str,
    line: usize,
    timestamp: SystemTime,
) -> Result<DependencyRecord, DependError> {
    let malformed = |reason: &str| DependError::MalformedDependencyText {
        line,
        text: rule.trim().to_string(),
        reason: reason.to_string(),
    };

    let mut words = tokenize(rule);
    let Some(first) = words.first_mut() else {
        return Err(malformed("rule names no files"));
    };
    if first.escaped_tail || !first.text.ends_with(':') {
        return Err(malformed("first file is not followed by ':'"));
    }
    first.text.pop();
    if first.text.is_empty() {
        return Err(malformed("rule has no target before ':'"));
    }

    let dependencies: Vec<PathBuf> = words.iter().map(|w| normalize_path(&w.text)).collect();
    DependencyRecord::new(dependencies, timestamp)
}

/// A file name produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Word {
    text: String,
    /// The last character came from an escape sequence (`\:` or `\ `).
    escaped_tail: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Between words.
    Whitespace,
    /// Inside a word.
    Token,
    /// Just consumed a backslash inside or at the start of a word.
    Escape,
}

/// Characters a backslash escapes instead of acting as a separator.
fn is_escapable(c: char) -> bool {
    c == ':' || c.is_whitespace()
}

/// Splits a logical rule into file names.
///
/// A backslash before whitespace or `:` escapes that character into the
/// current word. Any other backslash is a directory separator and becomes
/// `/`. A backslash at the very end of the rule is dropped.
fn tokenize(rule: &str) -> Vec<Word> {
    let mut lexer = Lexer::default();
    for c in rule.chars() {
        lexer.feed(c);
    }
    lexer.finish()
}

#[derive(Debug)]
struct Lexer {
    state: LexState,
    current: String,
    escaped_tail: bool,
    words: Vec<Word>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self {
            state: LexState::Whitespace,
            current: String::new(),
            escaped_tail: false,
            words: Vec::new(),
        }
    }
}

impl Lexer {
    fn feed(&mut self, c: char) {
        self.state = match self.state {
            LexState::Escape if is_escapable(c) => {
                self.current.push(c);
                self.escaped_tail = true;
                LexState::Token
            }
            LexState::Escape => {
                self.push_plain('/');
                self.step(c)
            }
            LexState::Whitespace | LexState::Token => self.step(c),
        };
    }

    /// Handles `c` outside of an escape sequence.
    fn step(&mut self, c: char) -> LexState {
        if c == '\\' {
            LexState::Escape
        } else if c.is_whitespace() {
            self.flush();
            LexState::Whitespace
        } else {
            self.push_plain(c);
            LexState::Token
        }
    }

    fn push_plain(&mut self, c: char) {
        self.current.push(c);
        self.escaped_tail = false;
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.words.push(Word {
                text: std::mem::take(&mut self.current),
                escaped_tail: self.escaped_tail,
            });
        }
        self.escaped_tail = false;
    }

    fn finish(mut self) -> Vec<Word> {
        self.flush();
        self.words
    }
}
