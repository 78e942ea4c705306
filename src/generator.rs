//! Batch sample generation: text selection, composition, persistence and the
//! labels manifest.
//!
//! Each sample is independent: its random source is derived from the base
//! seed plus the sample index, so a batch is reproducible whether it runs
//! sequentially or on the thread pool, and a failed sample only costs its
//! own index.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::augment::{AugmentOptions, AugmentPipeline};
use crate::backgrounds::BackgroundPool;
use crate::compose::{ComposeOptions, LineCompositor};
use crate::corpus::CorpusSource;
use crate::error::{ComposerError, Result};
use crate::glyphs::GlyphStore;
use crate::image::io::{resize_lanczos, save_gray_buffer, write_json_file};
use crate::image::{GrayBuffer, OutputFormat};

/// Controls whether batch generation runs sequentially or on the Rayon pool.
#[derive(Clone, Copy, Debug)]
pub struct ParallelGenOptions {
    enabled: bool,
    min_samples_for_parallel: usize,
}

impl ParallelGenOptions {
    /// Construct explicit options.
    pub fn new(enabled: bool, min_samples_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_samples_for_parallel: min_samples_for_parallel.max(1),
        }
    }

    /// Disable parallel generation regardless of batch size.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_samples_for_parallel: usize::MAX,
        }
    }

    /// Returns true when `sample_count` should be sharded across threads.
    pub fn should_parallelize(&self, sample_count: usize) -> bool {
        self.enabled && sample_count >= self.min_samples_for_parallel
    }
}

impl Default for ParallelGenOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_samples_for_parallel: 64,
        }
    }
}

/// Knobs for a generation run.
#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    /// Number of samples to attempt.
    pub samples: usize,
    /// Directory receiving images and `labels.json`.
    pub output_dir: PathBuf,
    /// Draw text from the corpus when it has lines; otherwise synthesize
    /// random text from the available characters.
    pub use_corpus: bool,
    /// Blend composed lines with a random background.
    pub use_background: bool,
    /// Apply the compositor's light augmentation.
    pub use_augment: bool,
    /// Additionally run the composed augmentation pipeline on each sample.
    pub extra_augment: Option<AugmentOptions>,
    /// Corpus lines longer than this are cut to a random window of this many
    /// characters.
    pub max_text_len: usize,
    /// Length bounds for synthesized random text.
    pub random_text_len: (usize, usize),
    /// Style forced for all glyph lookups; `None` picks per character.
    pub style: Option<String>,
    /// Output image encoding.
    pub format: OutputFormat,
    /// Aspect-preserving resize of each final image to this height.
    pub target_height: Option<usize>,
    /// Base seed; sample `i` uses `seed + i`.
    pub seed: u64,
    /// Thread pool gating.
    pub parallel: ParallelGenOptions,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            samples: 100,
            output_dir: PathBuf::from("./output_lines"),
            use_corpus: true,
            use_background: true,
            use_augment: true,
            extra_augment: None,
            max_text_len: 20,
            random_text_len: (3, 15),
            style: None,
            format: OutputFormat::default(),
            target_height: None,
            seed: 0,
            parallel: ParallelGenOptions::default(),
        }
    }
}

/// One persisted sample as recorded in `labels.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampleRecord {
    pub filename: String,
    /// Label: the characters actually rendered.
    pub text: String,
    pub path: PathBuf,
    /// Requested text before glyph filtering.
    pub original_text: String,
    /// Final `[width, height]` in pixels.
    pub image_size: [usize; 2],
}

/// Outcome of a generation run.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationSummary {
    pub requested: usize,
    pub produced: usize,
    pub skipped: usize,
    pub elapsed_ms: u64,
    pub labels_path: PathBuf,
}

/// Drives corpus selection, composition and persistence for N samples.
///
/// Owns the loaded inputs; workers borrow them read-only, so a batch can be
/// sharded without copying the glyph set.
pub struct LineSampleGenerator {
    store: GlyphStore,
    corpus: CorpusSource,
    backgrounds: BackgroundPool,
    compose_opts: ComposeOptions,
    opts: GeneratorOptions,
    pipeline: Option<AugmentPipeline>,
    available: Vec<char>,
}

impl LineSampleGenerator {
    /// Fails with [`ComposerError::NoGlyphs`] when the store is empty, since
    /// no sample could ever be rendered.
    pub fn new(
        store: GlyphStore,
        corpus: CorpusSource,
        backgrounds: BackgroundPool,
        compose_opts: ComposeOptions,
        opts: GeneratorOptions,
    ) -> Result<Self> {
        if store.is_empty() {
            return Err(ComposerError::NoGlyphs);
        }
        let pipeline = opts.extra_augment.clone().map(AugmentPipeline::new);
        let available = store.available_characters().into_iter().collect();
        Ok(Self {
            store,
            corpus,
            backgrounds,
            compose_opts,
            opts,
            pipeline,
            available,
        })
    }

    /// Runs the batch and writes `labels.json` alongside the images.
    ///
    /// Per-sample failures (unrenderable text, write errors) are logged and
    /// skipped; the run itself only fails on structural problems such as an
    /// uncreatable output directory.
    pub fn generate(&self) -> Result<GenerationSummary> {
        let started = Instant::now();
        fs::create_dir_all(&self.opts.output_dir).map_err(|source| ComposerError::CreateDir {
            path: self.opts.output_dir.clone(),
            source,
        })?;

        let compositor =
            LineCompositor::new(&self.store, &self.backgrounds, self.compose_opts.clone());
        let records = self.run_batch(&compositor);

        let produced = records.len();
        let skipped = self.opts.samples - produced;
        let labels_path = self.opts.output_dir.join("labels.json");
        write_json_file(&labels_path, &records)?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        log::debug!(
            "generated {produced}/{} samples ({skipped} skipped) in {elapsed_ms} ms",
            self.opts.samples
        );
        Ok(GenerationSummary {
            requested: self.opts.samples,
            produced,
            skipped,
            elapsed_ms,
            labels_path,
        })
    }

    fn run_batch(&self, compositor: &LineCompositor<'_>) -> Vec<SampleRecord> {
        let count = self.opts.samples;
        if self.opts.parallel.should_parallelize(count) {
            #[cfg(feature = "parallel")]
            {
                return self.run_batch_parallel(compositor, count);
            }
        }

        (0..count)
            .filter_map(|index| self.generate_one(compositor, index))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn run_batch_parallel(
        &self,
        compositor: &LineCompositor<'_>,
        count: usize,
    ) -> Vec<SampleRecord> {
        use rayon::prelude::*;

        // Indexed parallel iterators collect in index order, which keeps
        // labels.json stable across pool sizes.
        (0..count)
            .into_par_iter()
            .filter_map(|index| self.generate_one(compositor, index))
            .collect()
    }

    /// Produces and persists sample `index`, or `None` when it is skipped.
    fn generate_one(&self, compositor: &LineCompositor<'_>, index: usize) -> Option<SampleRecord> {
        let mut rng = StdRng::seed_from_u64(self.opts.seed.wrapping_add(index as u64));

        let text = self.pick_text(&mut rng);
        let (image, label) = compositor.compose_line(
            &text,
            self.opts.style.as_deref(),
            self.opts.use_background,
            self.opts.use_augment,
            &mut rng,
        );
        let Some(mut image) = image else {
            log::debug!("sample {index}: nothing renderable in {text:?}, skipping");
            return None;
        };

        if let Some(pipeline) = &self.pipeline {
            image = pipeline.apply(&image, &mut rng);
        }
        if let Some(target_height) = self.opts.target_height {
            image = resize_to_height(&image, target_height);
        }

        let filename = format!("line_{index:06}.{}", self.opts.format.extension());
        let path = self.opts.output_dir.join(&filename);
        if let Err(err) = save_gray_buffer(&image, &path, self.opts.format) {
            log::warn!("sample {index}: {err}, skipping");
            return None;
        }

        Some(SampleRecord {
            filename,
            text: label,
            path,
            original_text: text,
            image_size: [image.w, image.h],
        })
    }

    fn pick_text<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        if self.opts.use_corpus && !self.corpus.is_empty() {
            let line = self.corpus.random_line(rng);
            return window_text(line, self.opts.max_text_len, rng);
        }

        let (min_len, max_len) = self.opts.random_text_len;
        let len = rng.gen_range(min_len..=max_len);
        (0..len)
            .map(|_| self.available[rng.gen_range(0..self.available.len())])
            .collect()
    }
}

/// Cuts `line` down to a random `max_len`-character window when it is longer.
fn window_text<R: Rng + ?Sized>(line: &str, max_len: usize, rng: &mut R) -> String {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= max_len {
        return line.to_string();
    }
    let start = rng.gen_range(0..=chars.len() - max_len);
    chars[start..start + max_len].iter().collect()
}

/// Aspect-preserving resize to a fixed height.
fn resize_to_height(img: &GrayBuffer, target_height: usize) -> GrayBuffer {
    if target_height == 0 || img.h == 0 || img.h == target_height {
        return img.clone();
    }
    let scale = target_height as f32 / img.h as f32;
    let new_w = ((img.w as f32 * scale).round() as usize).max(1);
    resize_lanczos(img, new_w, target_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_pass_through_the_window() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(window_text("short", 20, &mut rng), "short");
    }

    #[test]
    fn long_lines_are_cut_to_the_window_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let line: String = "abcdefghij".repeat(5);
        for _ in 0..10 {
            let cut = window_text(&line, 20, &mut rng);
            assert_eq!(cut.chars().count(), 20);
            assert!(line.contains(&cut));
        }
    }

    #[test]
    fn window_counts_characters_not_bytes() {
        let mut rng = StdRng::seed_from_u64(1);
        let line = "漢字漢字漢字";
        let cut = window_text(line, 4, &mut rng);
        assert_eq!(cut.chars().count(), 4);
    }

    #[test]
    fn height_resize_preserves_aspect_ratio() {
        let img = GrayBuffer::filled(100, 50, 128);
        let out = resize_to_height(&img, 25);
        assert_eq!(out.size(), (50, 25));
    }

    #[test]
    fn resize_to_current_height_is_a_copy() {
        let img = GrayBuffer::filled(40, 30, 128);
        assert_eq!(resize_to_height(&img, 30).size(), (40, 30));
    }

    #[test]
    fn empty_store_is_rejected() {
        let result = LineSampleGenerator::new(
            GlyphStore::default(),
            CorpusSource::default(),
            BackgroundPool::default(),
            ComposeOptions::default(),
            GeneratorOptions::default(),
        );
        assert!(matches!(result, Err(ComposerError::NoGlyphs)));
    }
}
