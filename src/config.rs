//! JSON configuration for the generation tools.
//!
//! Sections deserialize independently with full defaults, so a minimal
//! config only needs the input paths and the output directory. `to_*`
//! methods convert the file-level view into the runtime option structs.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::augment::AugmentOptions;
use crate::compose::ComposeOptions;
use crate::error::{ComposerError, Result};
use crate::generator::{GeneratorOptions, ParallelGenOptions};
use crate::image::OutputFormat;

#[derive(Debug, Deserialize)]
pub struct GeneratorToolConfig {
    pub inputs: InputConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Optional heavy augmentation applied on top of composition.
    #[serde(default)]
    pub augment: Option<AugmentConfig>,
    pub output: OutputConfig,
}

impl GeneratorToolConfig {
    /// Assembles the runtime options for [`crate::generator::LineSampleGenerator`].
    pub fn to_generator_options(&self) -> GeneratorOptions {
        let generation = &self.generation;
        GeneratorOptions {
            samples: generation.num_samples,
            output_dir: self.output.directory.clone(),
            use_corpus: generation.use_corpus,
            use_background: generation.add_background,
            use_augment: generation.apply_augmentation,
            extra_augment: self.augment.as_ref().map(AugmentConfig::to_augment_options),
            max_text_len: generation.max_text_len,
            random_text_len: (generation.random_text_min, generation.random_text_max),
            style: generation.style.clone(),
            format: self.output.to_output_format(),
            target_height: generation.target_height,
            seed: generation.seed,
            parallel: ParallelGenOptions::default(),
        }
    }
}

/// Input locations: dictionary, glyphs, corpus and backgrounds.
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Character dictionary file with `<char> : <code>` lines.
    pub char_dict: PathBuf,
    /// Glyph image root, scanned recursively for `<style>_<code>.<ext>`.
    pub glyph_dir: PathBuf,
    /// Directory holding the corpus text files.
    #[serde(default)]
    pub corpus_dir: Option<PathBuf>,
    /// Corpus filenames resolved against `corpus_dir`.
    #[serde(default)]
    pub corpus_files: Vec<String>,
    /// Background image directory; the pool stays empty when omitted.
    #[serde(default)]
    pub background_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Width of the whitespace cell in pixels.
    pub space_width: usize,
    /// Height of the whitespace cell in pixels.
    pub space_height: usize,
    /// Pixels below this value count as ink when cropping whitespace.
    pub crop_threshold: u8,
    /// Maximum random margin per side of the ink bounding box.
    pub crop_margin: usize,
    /// Line pixels below this value overwrite the background.
    pub blend_threshold: u8,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            space_width: 20,
            space_height: 32,
            crop_threshold: 230,
            crop_margin: 3,
            blend_threshold: 180,
        }
    }
}

impl ComposeConfig {
    pub fn to_compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            space_width: self.space_width,
            space_height: self.space_height,
            crop_threshold: self.crop_threshold,
            crop_margin: self.crop_margin,
            blend_threshold: self.blend_threshold,
            ..ComposeOptions::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of samples to attempt.
    pub num_samples: usize,
    /// Draw text from the corpus when it has lines.
    pub use_corpus: bool,
    /// Blend a random background behind each line.
    pub add_background: bool,
    /// Apply the compositor's light augmentation.
    pub apply_augmentation: bool,
    /// Force one style for every glyph lookup.
    pub style: Option<String>,
    /// Corpus lines are cut to a random window of this many characters.
    pub max_text_len: usize,
    /// Minimum length of synthesized random text.
    pub random_text_min: usize,
    /// Maximum length of synthesized random text.
    pub random_text_max: usize,
    /// Resize final images to this height, keeping the aspect ratio.
    pub target_height: Option<usize>,
    /// Master seed; sample `i` derives its own stream from `seed + i`.
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_samples: 100,
            use_corpus: true,
            add_background: true,
            apply_augmentation: true,
            style: None,
            max_text_len: 20,
            random_text_min: 3,
            random_text_max: 15,
            target_height: None,
            seed: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Probability of each primary transform; gaps and blur use `0.3 x` it.
    pub prob_each: f64,
    /// Symmetric rotation bound in degrees.
    pub rotation_deg: f32,
    /// Corner displacement bound as a fraction of the short side.
    pub perspective_strength: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub contrast_min: f32,
    pub contrast_max: f32,
    /// Structuring element side for stroke adjustment.
    pub stroke_kernel: usize,
    pub gap_min: usize,
    pub gap_max: usize,
    /// Strength shared by the blur kinds.
    pub blur_strength: f32,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            prob_each: 0.5,
            rotation_deg: 5.0,
            perspective_strength: 0.1,
            brightness_min: 0.8,
            brightness_max: 1.2,
            contrast_min: 0.8,
            contrast_max: 1.2,
            stroke_kernel: 2,
            gap_min: 2,
            gap_max: 8,
            blur_strength: 1.0,
        }
    }
}

impl AugmentConfig {
    pub fn to_augment_options(&self) -> AugmentOptions {
        AugmentOptions {
            prob_each: self.prob_each,
            rotation_range: (-self.rotation_deg, self.rotation_deg),
            perspective_strength: self.perspective_strength,
            brightness_range: (self.brightness_min, self.brightness_max),
            contrast_range: (self.contrast_min, self.contrast_max),
            stroke_kernel: self.stroke_kernel,
            gap_size_range: (self.gap_min, self.gap_max),
            blur_strength: self.blur_strength,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving images and `labels.json`.
    pub directory: PathBuf,
    /// `jpg` or `png`.
    #[serde(default = "default_format")]
    pub format: String,
    /// JPEG quality in 1..=100; ignored for PNG.
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,
}

impl OutputConfig {
    pub fn to_output_format(&self) -> OutputFormat {
        match self.format.as_str() {
            "png" => OutputFormat::Png,
            _ => OutputFormat::Jpeg {
                quality: self.jpeg_quality,
            },
        }
    }
}

fn default_format() -> String {
    "jpg".to_string()
}

fn default_quality() -> u8 {
    90
}

pub fn load_config(path: &Path) -> Result<GeneratorToolConfig> {
    let data = fs::read_to_string(path).map_err(|source| ComposerError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ComposerError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
