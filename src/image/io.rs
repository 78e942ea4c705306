//! I/O helpers for grayscale buffers and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG into an owned 8-bit gray buffer.
//! - `save_gray_buffer`: write a buffer as PNG or JPEG with a quality knob.
//! - `resize_lanczos`: area-weighted rescale through the `image` crate.
//! - `write_json_file`: pretty-print a serializable value to disk with
//!   non-ASCII text preserved literally.

use super::GrayBuffer;
use crate::error::{ComposerError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, GrayImage, ImageEncoder, Luma};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Output encoding for persisted line images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG with an explicit quality in 1..=100.
    Jpeg { quality: u8 },
    Png,
}

impl OutputFormat {
    /// File extension used for generated sample filenames.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: 90 }
    }
}

/// File extensions accepted for glyph and background images (lowercase only).
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// True when `path` ends in one of the supported (case-sensitive) extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e))
}

/// Load an image from disk and convert to an 8-bit grayscale buffer.
pub fn load_grayscale_image(path: &Path) -> Result<GrayBuffer> {
    let img = image::open(path)
        .map_err(|source| ComposerError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    Ok(from_gray_image(img))
}

/// Save a buffer to `path` in the requested format, creating parent dirs.
pub fn save_gray_buffer(buffer: &GrayBuffer, path: &Path, format: OutputFormat) -> Result<()> {
    ensure_parent_dir(path)?;
    match format {
        OutputFormat::Png => DynamicImage::ImageLuma8(to_gray_image(buffer))
            .save(path)
            .map_err(|source| ComposerError::ImageEncode {
                path: path.to_path_buf(),
                source,
            }),
        OutputFormat::Jpeg { quality } => {
            let file = File::create(path).map_err(|source| ComposerError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
            let writer = BufWriter::new(file);
            JpegEncoder::new_with_quality(writer, quality)
                .write_image(
                    &buffer.data,
                    buffer.w as u32,
                    buffer.h as u32,
                    ExtendedColorType::L8,
                )
                .map_err(|source| ComposerError::ImageEncode {
                    path: path.to_path_buf(),
                    source,
                })
        }
    }
}

/// Rescale a buffer to `new_w × new_h` with the Lanczos3 filter.
pub fn resize_lanczos(buffer: &GrayBuffer, new_w: usize, new_h: usize) -> GrayBuffer {
    let resized = imageops::resize(
        &to_gray_image(buffer),
        new_w as u32,
        new_h as u32,
        FilterType::Lanczos3,
    );
    from_gray_image(resized)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
/// serde_json emits UTF-8 without escaping non-ASCII characters.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json =
        serde_json::to_string_pretty(value).map_err(|source| ComposerError::JsonSerialize {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, json).map_err(|source| ComposerError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert to the `image` crate's buffer type for encoding and resizing.
pub fn to_gray_image(buffer: &GrayBuffer) -> GrayImage {
    let mut out = GrayImage::new(buffer.w as u32, buffer.h as u32);
    for (y, row) in buffer.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([px]));
        }
    }
    out
}

/// Convert back from the `image` crate's buffer type.
pub fn from_gray_image(img: GrayImage) -> GrayBuffer {
    let w = img.width() as usize;
    let h = img.height() as usize;
    GrayBuffer::from_raw(w, h, img.into_raw())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ComposerError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
