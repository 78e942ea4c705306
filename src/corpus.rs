//! Corpus text source: an immutable collection of non-empty lines read from
//! UTF-8 text files, queried by index or uniformly at random.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::Rng;

/// Text lines loaded from corpus files. Built once, then read-only.
#[derive(Clone, Debug, Default)]
pub struct CorpusSource {
    lines: Vec<String>,
}

impl CorpusSource {
    /// Reads each named file under `directory` line by line, trimming
    /// whitespace and discarding blank lines. Files that are missing or
    /// unreadable are skipped with a warning; the directory itself need not
    /// exist when text is synthesized instead of drawn from a corpus.
    pub fn load(directory: &Path, filenames: &[String]) -> CorpusSource {
        let mut lines = Vec::new();
        for filename in filenames {
            let path = directory.join(filename);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("skipping corpus file {}: {err}", path.display());
                    continue;
                }
            };
            lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }
        log::debug!("loaded {} corpus lines", lines.len());
        CorpusSource { lines }
    }

    /// Builds a source from in-memory lines, applying the same trim and
    /// blank-line filtering as [`CorpusSource::load`].
    pub fn from_lines<I, S>(lines: I) -> CorpusSource
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        CorpusSource { lines }
    }

    /// Uniformly random line, or the empty string when nothing is loaded.
    pub fn random_line<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.lines.is_empty() {
            return "";
        }
        &self.lines[rng.gen_range(0..self.lines.len())]
    }

    /// Line at `index`, or the empty string when out of range.
    pub fn line_at(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every character that is neither whitespace nor present in
    /// `available`, preserving order and multiplicity. Used to pre-screen
    /// corpus text against the glyph inventory.
    pub fn filter_to_available(text: &str, available: &BTreeSet<char>) -> String {
        text.chars()
            .filter(|ch| ch.is_whitespace() || available.contains(ch))
            .collect()
    }
}
