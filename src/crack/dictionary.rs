//! Candidate password list, one word per line.

use crate::crypt::MAX_PASSWORD_LEN;
use crate::error::{Error, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Maximum number of words a dictionary may hold.
pub const DICTIONARY_LIMIT: usize = 1000;

/// A validated list of candidate passwords.
///
/// Every word is non-empty, contains no space and is at most
/// [`MAX_PASSWORD_LEN`] bytes long, so each one can be hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// Reads words from `reader`.
    ///
    /// Blank lines are skipped. Any bad line rejects the whole dictionary, so a
    /// partial word list is never used.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut words = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| Error::MalformedDictionaryEntry {
                line: line_no,
                reason: e.to_string(),
            })?;
            let word = line.strip_suffix('\r').unwrap_or(&line);
            if word.is_empty() {
                continue;
            }
            push_word(&mut words, word, line_no)?;
        }
        Ok(Self { words })
    }

    /// Builds a dictionary from in-memory words, with the same checks as
    /// [`Dictionary::parse`]. An empty word is rejected here rather than skipped.
    pub fn from_words<'a, I: IntoIterator<Item = &'a str>>(words: I) -> Result<Self> {
        let mut checked = Vec::new();
        for (idx, word) in words.into_iter().enumerate() {
            if word.is_empty() {
                return Err(Error::MalformedDictionaryEntry {
                    line: idx + 1,
                    reason: "empty word".to_string(),
                });
            }
            push_word(&mut checked, word, idx + 1)?;
        }
        Ok(Self { words: checked })
    }

    /// Skips validation so tests can feed words the loaders would refuse.
    #[cfg(test)]
    pub(crate) fn unchecked(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Reads the dictionary file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let dictionary = Self::parse(BufReader::new(file))?;
        debug!("loaded {} words from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

fn push_word(words: &mut Vec<String>, word: &str, line: usize) -> Result<()> {
    validate_word(word, line)?;
    if words.len() == DICTIONARY_LIMIT {
        return Err(Error::TooManyWords {
            limit: DICTIONARY_LIMIT,
        });
    }
    words.push(word.to_string());
    Ok(())
}

fn validate_word(word: &str, line: usize) -> Result<()> {
    let reason = if word.contains(' ') {
        "contains a space".to_string()
    } else if word.len() > MAX_PASSWORD_LEN {
        format!("longer than {MAX_PASSWORD_LEN} bytes")
    } else {
        return Ok(());
    };
    Err(Error::MalformedDictionaryEntry { line, reason })
}
