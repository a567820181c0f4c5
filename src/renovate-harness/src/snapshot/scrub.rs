//! Removal of version numbers from snapshot text.

use regex::{Captures, Regex};

/// Replacement for every scrubbed version.
pub const REDACTED_VERSION: &str = "redacted";

/// `to <version>` plus one following space. Quotes end the token so YAML
/// quoting survives.
const VERSION_TARGET: &str = r#"\bto ([^\s'"]+) ?"#;

/// Replaces every `to <version>` with `to redacted`, line by line.
///
/// Tokens already starting with `redacted` are kept, so scrubbing twice
/// changes nothing.
#[derive(Debug, Clone)]
pub struct Scrubber {
    pattern: Regex,
}

impl Scrubber {
    /// # Errors
    ///
    /// Returns an error if the version pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(VERSION_TARGET)?,
        })
    }

    #[must_use]
    pub fn scrub_line(&self, line: &str) -> String {
        self.pattern
            .replace_all(line, |caps: &Captures<'_>| {
                if caps[1].starts_with(REDACTED_VERSION) {
                    caps[0].to_string()
                } else {
                    format!("to {REDACTED_VERSION}")
                }
            })
            .into_owned()
    }

    #[must_use]
    pub fn scrub(&self, text: &str) -> String {
        text.lines()
            .map(|line| self.scrub_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
