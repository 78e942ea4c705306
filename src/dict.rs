//! Character dictionary mapping text entries to integer glyph codes.
//!
//! The on-disk format is one entry per line, `"<char> : <code>"` with the
//! exact space-colon-space separator. Entries may be multi-codepoint
//! strings; the glyph loader later restricts itself to single-scalar
//! entries because composition walks Unicode scalars. Lines that do not
//! match the separator, or whose code is not a decimal integer, are skipped
//! silently. The last entry wins on duplicate keys.

use crate::error::{ComposerError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Bidirectional mapping between dictionary entries and glyph codes.
#[derive(Clone, Debug, Default)]
pub struct CharacterDict {
    forward: HashMap<String, u32>,
    reverse: HashMap<u32, String>,
}

impl CharacterDict {
    /// Read and parse a dictionary file. A missing or unreadable file is the
    /// one fatal setup error of the loading stage.
    pub fn load(path: &Path) -> Result<CharacterDict> {
        let text = fs::read_to_string(path).map_err(|source| ComposerError::DictRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse dictionary text. Never fails; bad lines are dropped.
    pub fn parse(text: &str) -> CharacterDict {
        let mut dict = CharacterDict::default();
        for line in text.lines() {
            let line = line.trim();
            let Some((entry, code)) = line.split_once(" : ") else {
                continue;
            };
            let Ok(code) = code.parse::<u32>() else {
                continue;
            };
            if entry.is_empty() {
                continue;
            }
            dict.insert(entry.to_string(), code);
        }
        dict
    }

    fn insert(&mut self, entry: String, code: u32) {
        // Last entry wins. A re-keyed entry drops its stale reverse record so
        // code -> entry -> code stays an identity for every stored code.
        if let Some(old_code) = self.forward.insert(entry.clone(), code) {
            if old_code != code && self.reverse.get(&old_code).map(String::as_str) == Some(&entry)
            {
                self.reverse.remove(&old_code);
            }
        }
        self.reverse.insert(code, entry);
    }

    /// Code for a dictionary entry.
    pub fn code_for(&self, entry: &str) -> Option<u32> {
        self.forward.get(entry).copied()
    }

    /// Entry text for a code.
    pub fn entry_for(&self, code: u32) -> Option<&str> {
        self.reverse.get(&code).map(String::as_str)
    }

    /// Entry for a code when it is a single Unicode scalar; the glyph index
    /// is keyed by `char`, so multi-scalar entries resolve to `None` here.
    pub fn scalar_for(&self, code: u32) -> Option<char> {
        let entry = self.entry_for(code)?;
        let mut chars = entry.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// All codes with a stored entry.
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.reverse.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_separator_only() {
        let dict = CharacterDict::parse("A : 65\nB:66\nC  :  67\nD : 68\n");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.code_for("A"), Some(65));
        assert_eq!(dict.code_for("B"), None, "missing space-colon-space");
        assert_eq!(dict.code_for("C"), None, "double spaces do not match");
        assert_eq!(dict.code_for("D"), Some(68));
    }

    #[test]
    fn skips_non_numeric_codes_and_blank_lines() {
        let dict = CharacterDict::parse("A : x\n\n好 : 1024\nB : 1 : 2\n");
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.code_for("好"), Some(1024));
        assert_eq!(dict.entry_for(1024), Some("好"));
    }

    #[test]
    fn last_entry_wins_on_duplicates() {
        let dict = CharacterDict::parse("A : 65\nA : 97\n");
        assert_eq!(dict.code_for("A"), Some(97));
        assert_eq!(dict.entry_for(97), Some("A"));
        assert_eq!(dict.entry_for(65), None, "stale reverse record dropped");
    }

    #[test]
    fn round_trip_identity_for_loaded_codes() {
        let dict = CharacterDict::parse("A : 65\nB : 66\n好 : 1024\nB : 200\n");
        for code in dict.codes().collect::<Vec<_>>() {
            let entry = dict.entry_for(code).expect("entry for stored code");
            assert_eq!(dict.code_for(entry), Some(code));
        }
    }

    #[test]
    fn scalar_lookup_rejects_multi_scalar_entries() {
        let dict = CharacterDict::parse("A : 65\nfi : 70\n");
        assert_eq!(dict.scalar_for(65), Some('A'));
        assert_eq!(dict.scalar_for(70), None);
        assert_eq!(dict.entry_for(70), Some("fi"), "entry itself is kept");
    }
}
