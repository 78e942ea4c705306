#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod backgrounds;
pub mod compose;
pub mod config;
pub mod corpus;
pub mod dict;
pub mod error;
pub mod generator;
pub mod glyphs;
pub mod image;

// Lower-level building blocks – still public, but considered unstable
// internals. (You can tighten or feature-gate these later.)
pub mod augment;

// --- High-level re-exports -------------------------------------------------

// Main entry points: batch generator + per-line compositor.
pub use crate::compose::{ComposeOptions, LineCompositor};
pub use crate::generator::{
    GenerationSummary, GeneratorOptions, LineSampleGenerator, SampleRecord,
};

// Error type shared by every fallible operation in the crate.
pub use crate::error::{ComposerError, Result};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use line_composer::prelude::*;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// # fn main() {
/// let glyphs = ['a', 'b', 'c'].map(|character| GlyphImage {
///     character,
///     style: "print".to_string(),
///     image: GrayBuffer::filled(24, 32, 0),
/// });
/// let store = GlyphStore::from_glyphs(glyphs);
/// let backgrounds = BackgroundPool::default();
///
/// let compositor = LineCompositor::new(&store, &backgrounds, ComposeOptions::default());
/// let mut rng = StdRng::seed_from_u64(7);
/// let (image, label) = compositor.compose_line("abc cab", None, false, false, &mut rng);
/// println!("label={label:?} size={:?}", image.map(|img| img.size()));
/// # }
/// ```
pub mod prelude {
    pub use crate::backgrounds::BackgroundPool;
    pub use crate::glyphs::{GlyphImage, GlyphStore};
    pub use crate::image::GrayBuffer;
    pub use crate::{ComposeOptions, LineCompositor, LineSampleGenerator};
}
