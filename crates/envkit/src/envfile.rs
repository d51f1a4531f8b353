// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented model of `KEY=VALUE` env files.
//!
//! Comments, blank lines and anything that is not an active assignment are
//! kept verbatim so that rewriting a file only ever touches the lines for the
//! keys being updated.

use std::io::Write;
use std::path::Path;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./envfile_test.rs"]
mod envfile_test;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// An active `KEY=VALUE` line.
    Assign { key: String, text: String },
    /// Comments, blanks and unrecognized lines.
    Verbatim(String),
}

impl Line {
    fn parse(text: &str) -> Self {
        match assignment_key(text) {
            Some(key) => Line::Assign {
                key: key.to_string(),
                text: text.to_string(),
            },
            None => Line::Verbatim(text.to_string()),
        }
    }

    fn text(&self) -> &str {
        match self {
            Line::Assign { text, .. } | Line::Verbatim(text) => text,
        }
    }
}

/// Returns the key of an active assignment line, if this is one.
fn assignment_key(text: &str) -> Option<&str> {
    if text.starts_with('#') {
        return None;
    }
    let (key, _) = text.split_once('=')?;
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return None;
    }
    Some(key)
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || key.starts_with('#')
        || key.contains('=')
        || key.chars().any(char::is_whitespace)
    {
        return Err(Error::InvalidValue {
            key: key.to_string(),
            reason: "not a valid env file key".to_string(),
        });
    }
    Ok(())
}

/// An env file held in memory.
///
/// The line ending is taken from the first line break in the parsed text
/// and used for every line on render, so CRLF files stay CRLF when keys are
/// rewritten or appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<Line>,
    trailing_newline: bool,
    crlf: bool,
}

impl EnvFile {
    /// Create an empty env file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse env file contents.
    pub fn parse<S: AsRef<str>>(text: S) -> Self {
        let text = text.as_ref();
        if text.is_empty() {
            return Self::default();
        }

        let crlf = text
            .find('\n')
            .is_some_and(|i| text[..i].ends_with('\r'));
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = body
            .split('\n')
            .map(|line| {
                let line = if crlf {
                    line.strip_suffix('\r').unwrap_or(line)
                } else {
                    line
                };
                Line::parse(line)
            })
            .collect();
        Self {
            lines,
            trailing_newline,
            crlf,
        }
    }

    /// Load an env file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;
        Ok(Self::parse(text))
    }

    /// Write the file atomically.
    ///
    /// Contents go to a temporary file next to `path` which is then renamed
    /// over it, so readers and interrupted runs never see a partial line.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let write_failed = |error| Error::WriteFailed {
            path: path.to_path_buf(),
            error,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(self.render().as_bytes())
            .map_err(write_failed)?;
        tmp.as_file().sync_all().map_err(write_failed)?;
        tmp.persist(path).map_err(|e| write_failed(e.error))?;

        tracing::debug!(path = %path.display(), "wrote env file");
        Ok(())
    }

    /// Whether lines are terminated with `\r\n`.
    pub fn is_crlf(&self) -> bool {
        self.crlf
    }

    /// Render back to text.
    pub fn render(&self) -> String {
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut out = self
            .lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join(eol);
        if self.trailing_newline {
            out.push_str(eol);
        }
        out
    }

    /// Raw value of the active assignment for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Assign { key: k, text } if k == key => Some(&text[key.len() + 1..]),
            _ => None,
        })
    }

    /// Whether an active assignment for `key` exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All active assignments in file order, as raw `(key, value)` pairs.
    ///
    /// A key assigned more than once is yielded once per assignment.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            Line::Assign { key, text } => Some((key.as_str(), &text[key.len() + 1..])),
            Line::Verbatim(_) => None,
        })
    }

    /// Insert or replace the assignment for `key`.
    ///
    /// The first existing `KEY=` line is replaced in place and any later
    /// active lines for the same key are dropped. When the key is absent a new
    /// line is appended. Applying the same call twice leaves the rendered
    /// bytes unchanged.
    pub fn set_var(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        if value.contains(['\n', '\r']) {
            return Err(Error::InvalidValue {
                key: key.to_string(),
                reason: "values cannot span multiple lines".to_string(),
            });
        }

        let text = format!("{key}={value}");
        let mut found = false;
        self.lines.retain_mut(|line| match line {
            Line::Assign { key: k, text: t } if k == key => {
                if found {
                    return false;
                }
                found = true;
                *t = text.clone();
                true
            }
            _ => true,
        });

        if !found {
            self.lines.push(Line::Assign {
                key: key.to_string(),
                text,
            });
            self.trailing_newline = true;
        }
        Ok(())
    }
}

/// Upsert a single key directly in the file at `path`.
pub fn upsert<P: AsRef<Path>>(path: P, key: &str, value: &str) -> Result<()> {
    let path = path.as_ref();
    let mut file = EnvFile::load(path)?;
    file.set_var(key, value)?;
    file.save(path)
}

/// Strip one pair of matching surrounding quotes from a raw value.
pub fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
