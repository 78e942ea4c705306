//! Glyph inventory: the character dictionary plus every pre-rendered
//! character image found on disk, indexed by `(character, style)`.
//!
//! The store is built once by [`GlyphStore::load`] and queried read-only
//! afterwards, so it can be shared freely across worker threads.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rand::Rng;
use walkdir::WalkDir;

use crate::dict::CharacterDict;
use crate::error::Result;
use crate::image::io::{is_supported_image, load_grayscale_image};
use crate::image::GrayBuffer;

/// One pre-rendered character image together with its provenance.
#[derive(Clone, Debug)]
pub struct GlyphImage {
    /// Character this glyph renders.
    pub character: char,
    /// Style identifier (font or source variant), taken from the filename.
    pub style: String,
    /// Grayscale pixel data. Width and height are always nonzero.
    pub image: GrayBuffer,
}

/// Immutable index of glyph images keyed by character, then by style.
#[derive(Clone, Debug, Default)]
pub struct GlyphStore {
    dict: CharacterDict,
    glyphs: BTreeMap<char, BTreeMap<String, GlyphImage>>,
}

impl GlyphStore {
    /// Loads the dictionary at `dict_path`, then scans the whole subtree of
    /// `image_dir` for glyph images named `<style>_<code>.<ext>`.
    ///
    /// A missing dictionary file is fatal. A missing image directory is not:
    /// the store simply starts empty. Individual files that fail to parse or
    /// decode are skipped with a warning so sparse or partially corrupt glyph
    /// sets still load.
    pub fn load(dict_path: &Path, image_dir: &Path) -> Result<GlyphStore> {
        let dict = CharacterDict::load(dict_path)?;
        let mut store = GlyphStore {
            dict,
            glyphs: BTreeMap::new(),
        };

        if !image_dir.is_dir() {
            log::warn!(
                "glyph directory {} not found; store starts empty",
                image_dir.display()
            );
            return Ok(store);
        }

        let mut loaded = 0usize;
        for entry in WalkDir::new(image_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_supported_image(path) {
                continue;
            }
            let (style, code) = match parse_glyph_filename(path) {
                Some(parsed) => parsed,
                None => {
                    log::warn!("skipping glyph with unparsable name {}", path.display());
                    continue;
                }
            };
            let character = match store.dict.scalar_for(code) {
                Some(ch) => ch,
                None => {
                    log::debug!(
                        "skipping glyph {}: code {code} has no single-character entry",
                        path.display()
                    );
                    continue;
                }
            };
            let image = match load_grayscale_image(path) {
                Ok(image) => image,
                Err(err) => {
                    log::warn!("skipping glyph {}: {err}", path.display());
                    continue;
                }
            };
            if image.w == 0 || image.h == 0 {
                log::warn!("skipping glyph {}: empty image", path.display());
                continue;
            }
            store.insert(GlyphImage {
                character,
                style,
                image,
            });
            loaded += 1;
        }

        log::debug!(
            "loaded {loaded} glyphs covering {} characters from {}",
            store.glyphs.len(),
            image_dir.display()
        );
        Ok(store)
    }

    /// Builds a store directly from in-memory glyphs, bypassing the
    /// filesystem. The dictionary is left empty.
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = GlyphImage>) -> GlyphStore {
        let mut store = GlyphStore::default();
        for glyph in glyphs {
            store.insert(glyph);
        }
        store
    }

    fn insert(&mut self, glyph: GlyphImage) {
        self.glyphs
            .entry(glyph.character)
            .or_default()
            .insert(glyph.style.clone(), glyph);
    }

    /// Looks up a glyph for `character`. A known `style` is honored exactly;
    /// otherwise one of the styles available for that character is chosen
    /// uniformly at random. Returns `None` when the character has no glyph at
    /// all, which callers treat as a normal skip rather than an error.
    pub fn glyph<R: Rng + ?Sized>(
        &self,
        character: char,
        style: Option<&str>,
        rng: &mut R,
    ) -> Option<&GlyphImage> {
        let styles = self.glyphs.get(&character)?;
        if let Some(name) = style {
            if let Some(glyph) = styles.get(name) {
                return Some(glyph);
            }
        }
        let pick = rng.gen_range(0..styles.len());
        styles.values().nth(pick)
    }

    /// Characters with at least one loaded glyph.
    pub fn available_characters(&self) -> BTreeSet<char> {
        self.glyphs.keys().copied().collect()
    }

    /// Union of style identifiers across all characters.
    pub fn available_styles(&self) -> BTreeSet<String> {
        self.glyphs
            .values()
            .flat_map(|styles| styles.keys().cloned())
            .collect()
    }

    /// Total number of stored glyph images.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.values().map(|styles| styles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn dict(&self) -> &CharacterDict {
        &self.dict
    }
}

/// Splits a glyph filename into its style prefix and numeric character code.
///
/// The style is everything before the first underscore of the stem; the code
/// is everything after it and must parse as a decimal integer. Returns `None`
/// for names that do not follow the pattern.
fn parse_glyph_filename(path: &Path) -> Option<(String, u32)> {
    let stem = path.file_stem()?.to_str()?;
    let (style, code) = stem.split_once('_')?;
    let code = code.parse::<u32>().ok()?;
    Some((style.to_string(), code))
}
