//! Flat `key=value` properties reader.
//!
//! Follows the Java `.properties` line format: `#`/`!` comments, trailing
//! backslash continuation, and a key that ends at the first unescaped `=`,
//! `:` or whitespace. Escapes (`\:`, `\=`, `\t`, `\uXXXX`, ...) are decoded
//! in keys and values. Trailing whitespace is trimmed from values, and files
//! are read as UTF-8 rather than ISO-8859-1.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// In-memory view of a properties source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyReader {
    values: HashMap<String, String>,
}

impl PropertyReader {
    /// Read and parse a properties file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = Self::parse(&text);
        debug!(path = %path.display(), keys = reader.len(), "Loaded properties file");
        Ok(reader)
    }

    /// Parse properties text. Never fails; lines without a separator become
    /// keys with an empty value.
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        let mut pending = String::new();

        for raw in text.lines() {
            let line = if pending.is_empty() {
                raw.trim()
            } else {
                raw.trim_start()
            };

            if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }

            if ends_with_continuation(line) {
                pending.push_str(&line[..line.len() - 1]);
                continue;
            }

            pending.push_str(line);
            let logical = std::mem::take(&mut pending);
            if let Some((key, value)) = split_entry(&logical) {
                values.insert(key, value);
            }
        }

        if !pending.is_empty() {
            if let Some((key, value)) = split_entry(&pending) {
                values.insert(key, value);
            }
        }

        Self { values }
    }

    /// Value of `key`, or an empty string when the key is absent.
    pub fn property(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Value of `key` when present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set or replace a value. Used by test fixtures that build
    /// configurations in memory.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyReader {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = idx;
            break;
        }
    }

    let mut value = line[key_end..].trim_start();
    if let Some(rest) = value.strip_prefix(&['=', ':'][..]) {
        value = rest.trim_start();
    }

    Some((unescape(&line[..key_end]), unescape(value)))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    None => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}
