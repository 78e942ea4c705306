//! Line composition: glyph sequence assembly, whitespace cropping, background
//! blending and light augmentation.
//!
//! The pipeline mirrors how a human would paste character cutouts onto a
//! strip of paper:
//!
//! 1. Collect a glyph buffer per character, dropping characters without one.
//! 2. Concatenate horizontally, centering shorter glyphs vertically.
//! 3. Crop surrounding whitespace with a small randomized margin.
//! 4. Optionally lay the strip over a scanned background.
//! 5. Optionally apply mild photometric augmentation.
//!
//! Every stage degrades rather than fails: missing glyphs shrink the label,
//! and `(None, "")` is returned only when nothing renderable remains.

pub mod assemble;
pub mod blend;
pub mod crop;

use rand::Rng;

use crate::augment::photometric;
use crate::backgrounds::BackgroundPool;
use crate::glyphs::GlyphStore;
use crate::image::GrayBuffer;

pub use assemble::assemble;
pub use blend::blend_with_background;
pub use crop::{crop_whitespace, ink_bbox};

/// Knobs for the composition pipeline.
#[derive(Clone, Debug)]
pub struct ComposeOptions {
    /// Width of the blank buffer standing in for a whitespace character.
    pub space_width: usize,
    /// Height of the whitespace buffer.
    pub space_height: usize,
    /// Pixels strictly below this value count as ink during cropping.
    pub crop_threshold: u8,
    /// Upper bound of the random margin added to each side of the ink box.
    pub crop_margin: usize,
    /// Line pixels strictly below this value overwrite the background.
    pub blend_threshold: u8,
    /// Mild augmentation applied after blending.
    pub light_augment: LightAugmentOptions,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            space_width: 20,
            space_height: 32,
            crop_threshold: 230,
            crop_margin: 3,
            blend_threshold: 180,
            light_augment: LightAugmentOptions::default(),
        }
    }
}

/// Probabilities and strengths of the compositor's built-in augmentation.
///
/// Heavier geometric distortions live in [`crate::augment`]; this stage only
/// varies exposure and adds sensor-like artifacts.
#[derive(Clone, Debug)]
pub struct LightAugmentOptions {
    /// Probability of a multiplicative brightness change.
    pub brightness_prob: f64,
    /// Brightness factor range, sampled uniformly.
    pub brightness_range: (f32, f32),
    /// Probability of additive Gaussian noise.
    pub noise_prob: f64,
    /// Standard deviation of the noise in pixel units.
    pub noise_std: f32,
    /// Probability of a mild Gaussian blur.
    pub blur_prob: f64,
    /// Sigma of the blur kernel.
    pub blur_sigma: f32,
}

impl Default for LightAugmentOptions {
    fn default() -> Self {
        Self {
            brightness_prob: 0.3,
            brightness_range: (0.8, 1.2),
            noise_prob: 0.2,
            noise_std: 5.0,
            blur_prob: 0.1,
            blur_sigma: 0.5,
        }
    }
}

/// Composes text lines from glyph images. Holds read-only borrows, so
/// multiple compositors can share one store and pool across threads.
#[derive(Clone, Debug)]
pub struct LineCompositor<'a> {
    store: &'a GlyphStore,
    backgrounds: &'a BackgroundPool,
    opts: ComposeOptions,
}

impl<'a> LineCompositor<'a> {
    pub fn new(
        store: &'a GlyphStore,
        backgrounds: &'a BackgroundPool,
        opts: ComposeOptions,
    ) -> Self {
        Self {
            store,
            backgrounds,
            opts,
        }
    }

    /// Renders `text` into a line image and returns it with the label of
    /// characters actually rendered.
    ///
    /// Whitespace becomes a fixed-size blank cell; characters without a glyph
    /// are dropped from both the image and the label. Returns `(None, "")`
    /// when the text is empty, all-whitespace, or nothing renderable remains.
    pub fn compose_line<R: Rng + ?Sized>(
        &self,
        text: &str,
        style: Option<&str>,
        use_background: bool,
        use_augment: bool,
        rng: &mut R,
    ) -> (Option<GrayBuffer>, String) {
        if text.trim().is_empty() {
            return (None, String::new());
        }

        let space = GrayBuffer::filled(self.opts.space_width, self.opts.space_height, 255);
        let mut parts: Vec<&GrayBuffer> = Vec::new();
        let mut label = String::new();

        for ch in text.chars() {
            if ch.is_whitespace() {
                parts.push(&space);
                label.push(ch);
            } else if let Some(glyph) = self.store.glyph(ch, style, rng) {
                parts.push(&glyph.image);
                label.push(ch);
            }
        }

        let Some(assembled) = assemble(&parts) else {
            return (None, String::new());
        };

        let mut line = crop_whitespace(
            &assembled,
            self.opts.crop_threshold,
            self.opts.crop_margin,
            rng,
        );

        if use_background {
            if let Some(background) = self.backgrounds.pick(rng) {
                line = blend_with_background(&line, background, self.opts.blend_threshold);
            }
        }

        if use_augment {
            line = self.light_augment(line, rng);
        }

        (Some(line), label)
    }

    fn light_augment<R: Rng + ?Sized>(&self, mut line: GrayBuffer, rng: &mut R) -> GrayBuffer {
        let opts = &self.opts.light_augment;
        if rng.gen::<f64>() < opts.brightness_prob {
            let factor = rng.gen_range(opts.brightness_range.0..=opts.brightness_range.1);
            line = photometric::scale_brightness(&line, factor);
        }
        if rng.gen::<f64>() < opts.noise_prob {
            line = photometric::gaussian_noise(&line, opts.noise_std, rng);
        }
        if rng.gen::<f64>() < opts.blur_prob {
            // Fixed 3x3 kernel; only the sigma is configurable.
            line = photometric::gaussian_blur_sized(&line, opts.blur_sigma, 1);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::GlyphImage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // All-ink cells make cropped dimensions exact under a zero margin.
    fn ink_glyph(character: char, w: usize, h: usize) -> GlyphImage {
        GlyphImage {
            character,
            style: "test".to_string(),
            image: GrayBuffer::filled(w, h, 0),
        }
    }

    fn fixed_compositor_opts() -> ComposeOptions {
        ComposeOptions {
            crop_margin: 0,
            ..ComposeOptions::default()
        }
    }

    #[test]
    fn empty_and_whitespace_text_yield_nothing() {
        let store = GlyphStore::from_glyphs([ink_glyph('A', 20, 30)]);
        let pool = BackgroundPool::default();
        let compositor = LineCompositor::new(&store, &pool, ComposeOptions::default());
        let mut rng = StdRng::seed_from_u64(1);

        let (img, label) = compositor.compose_line("", None, false, false, &mut rng);
        assert!(img.is_none());
        assert_eq!(label, "");

        let (img, label) = compositor.compose_line("   ", None, false, false, &mut rng);
        assert!(img.is_none());
        assert_eq!(label, "");
    }

    #[test]
    fn unknown_characters_are_dropped_from_image_and_label() {
        let store = GlyphStore::from_glyphs([ink_glyph('A', 20, 30), ink_glyph('B', 20, 30)]);
        let pool = BackgroundPool::default();
        let compositor = LineCompositor::new(&store, &pool, fixed_compositor_opts());
        let mut rng = StdRng::seed_from_u64(2);

        let (img, label) = compositor.compose_line("AXB", None, false, false, &mut rng);
        let img = img.unwrap();
        assert_eq!(label, "AB");
        assert_eq!(img.size(), (40, 30));
    }

    #[test]
    fn text_with_only_unknown_characters_yields_nothing() {
        let store = GlyphStore::from_glyphs([ink_glyph('A', 20, 30)]);
        let pool = BackgroundPool::default();
        let compositor = LineCompositor::new(&store, &pool, ComposeOptions::default());
        let mut rng = StdRng::seed_from_u64(3);

        let (img, label) = compositor.compose_line("XYZ", None, false, false, &mut rng);
        assert!(img.is_none());
        assert_eq!(label, "");
    }

    #[test]
    fn whitespace_becomes_a_fixed_width_cell() {
        let store = GlyphStore::from_glyphs([ink_glyph('A', 20, 30), ink_glyph('B', 20, 30)]);
        let pool = BackgroundPool::default();
        let compositor = LineCompositor::new(&store, &pool, fixed_compositor_opts());
        let mut rng = StdRng::seed_from_u64(4);

        let (img, label) = compositor.compose_line("A B", None, false, false, &mut rng);
        let img = img.unwrap();
        assert_eq!(label, "A B");
        // 20 (A) + 20 (space) + 20 (B); ink spans the full glyph cells.
        assert_eq!(img.size(), (60, 30));
    }

    #[test]
    fn background_blend_keeps_line_dimensions() {
        let store = GlyphStore::from_glyphs([ink_glyph('A', 20, 30)]);
        let pool = BackgroundPool::from_images([GrayBuffer::filled(5, 5, 210)]);
        let compositor = LineCompositor::new(&store, &pool, fixed_compositor_opts());
        let mut rng = StdRng::seed_from_u64(5);

        let (img, _) = compositor.compose_line("AA", None, true, false, &mut rng);
        assert_eq!(img.unwrap().size(), (40, 30));
    }
}
