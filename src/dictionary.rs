//! Word list answering whole-word and prefix queries.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::Result;

/// A set of words plus every prefix of those words.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    words: FxHashSet<String>,
    prefixes: FxHashSet<String>,
}

impl Dictionary {
    /// Build a dictionary from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::default();
        for word in words {
            dict.insert(word.as_ref());
        }
        dict
    }

    /// Read one word per line; trailing whitespace is trimmed and blank lines skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut dict = Self::default();
        for line in reader.lines() {
            dict.insert(&line?);
        }
        Ok(dict)
    }

    /// Load a newline-delimited word list from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn insert(&mut self, line: &str) {
        let word = line.trim_end();
        if word.is_empty() {
            return;
        }
        for (i, _) in word.char_indices().skip(1) {
            self.prefixes.insert(word[..i].to_string());
        }
        self.prefixes.insert(word.to_string());
        self.words.insert(word.to_string());
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// True if some word starts with `prefix`. Only meaningful for length >= 2.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
