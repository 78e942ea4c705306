//! Pixel-level transforms: brightness, contrast, noise, blurs, stroke
//! thickness and gap artifacts.
//!
//! Every transform is pure: it reads one buffer and returns a new one.
//! Randomized variants take an explicit `Rng` so a seeded source reproduces
//! the exact output.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::image::GrayBuffer;

/// Blur flavor selector for [`blur`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurKind {
    Gaussian,
    Motion,
    /// Picks Gaussian or motion with equal probability.
    Random,
}

/// Morphology selector for [`stroke_thickness`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeMode {
    /// Neighborhood maximum; thins dark strokes on a light background.
    Dilate,
    /// Neighborhood minimum; thickens dark strokes.
    Erode,
    /// Picks dilate or erode with equal probability.
    Random,
}

#[inline]
fn clamp_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Multiplies every pixel by `factor`, clipped to `[0, 255]`.
pub fn scale_brightness(img: &GrayBuffer, factor: f32) -> GrayBuffer {
    map_pixels(img, |v| v * factor)
}

/// Applies contrast around the mid-gray point: `(v - 127.5) * factor + 127.5`.
pub fn adjust_contrast(img: &GrayBuffer, factor: f32) -> GrayBuffer {
    map_pixels(img, |v| (v - 127.5) * factor + 127.5)
}

/// Random brightness followed by random contrast, both sampled uniformly from
/// their ranges. Intermediate values stay in floating point; only the final
/// result is clipped.
pub fn brightness_contrast<R: Rng + ?Sized>(
    img: &GrayBuffer,
    brightness_range: (f32, f32),
    contrast_range: (f32, f32),
    rng: &mut R,
) -> GrayBuffer {
    let brightness = rng.gen_range(brightness_range.0..=brightness_range.1);
    let contrast = rng.gen_range(contrast_range.0..=contrast_range.1);
    map_pixels(img, |v| (v * brightness - 127.5) * contrast + 127.5)
}

/// Photocopy look: flattened contrast plus a constant brightness offset.
pub fn copy_effect(img: &GrayBuffer, contrast_factor: f32, brightness_offset: f32) -> GrayBuffer {
    map_pixels(img, |v| {
        (v - 127.5) * contrast_factor + 127.5 + brightness_offset
    })
}

/// Adds zero-mean Gaussian noise with standard deviation `std` (pixel units).
pub fn gaussian_noise<R: Rng + ?Sized>(img: &GrayBuffer, std: f32, rng: &mut R) -> GrayBuffer {
    let normal = match Normal::new(0.0f32, std) {
        Ok(normal) if std > 0.0 => normal,
        _ => return img.clone(),
    };
    let mut out = img.clone();
    for v in &mut out.data {
        *v = clamp_u8(*v as f32 + normal.sample(rng));
    }
    out
}

/// Separable Gaussian blur with `2 * radius + 1` taps per axis.
pub fn gaussian_blur_sized(img: &GrayBuffer, sigma: f32, radius: usize) -> GrayBuffer {
    if sigma <= 0.0 || radius == 0 || img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let taps = gaussian_taps(sigma, radius);
    let tmp = convolve_rows(img, &taps);
    convolve_cols(&tmp, &taps)
}

/// Gaussian blur with the kernel radius derived from `sigma` (about three
/// standard deviations per side).
pub fn gaussian_blur(img: &GrayBuffer, sigma: f32) -> GrayBuffer {
    let radius = ((3.0 * sigma).round() as usize).max(1);
    gaussian_blur_sized(img, sigma, radius)
}

/// Horizontal mean blur simulating camera motion along the text direction.
pub fn motion_blur(img: &GrayBuffer, size: usize) -> GrayBuffer {
    if size <= 1 || img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let anchor = (size / 2) as isize;
    let norm = 1.0 / size as f32;
    let mut out = GrayBuffer::filled(img.w, img.h, 0);
    for y in 0..img.h {
        for x in 0..img.w {
            let mut acc = 0.0f32;
            for i in 0..size {
                let sx = (x as isize + i as isize - anchor).clamp(0, img.w as isize - 1);
                acc += img.get(sx as usize, y) as f32;
            }
            out.set(x, y, clamp_u8((acc * norm).round()));
        }
    }
    out
}

/// Applies a blur of the requested kind. Gaussian uses `sigma = strength`;
/// motion uses a horizontal kernel of `3 + round(strength * 5)` pixels.
pub fn blur<R: Rng + ?Sized>(
    img: &GrayBuffer,
    kind: BlurKind,
    strength: f32,
    rng: &mut R,
) -> GrayBuffer {
    let gaussian = match kind {
        BlurKind::Gaussian => true,
        BlurKind::Motion => false,
        BlurKind::Random => rng.gen_bool(0.5),
    };
    if gaussian {
        gaussian_blur(img, strength)
    } else {
        motion_blur(img, 3 + (strength * 5.0).round() as usize)
    }
}

/// Thickens or thins strokes with a square min/max filter of side `kernel`.
pub fn stroke_thickness<R: Rng + ?Sized>(
    img: &GrayBuffer,
    mode: StrokeMode,
    kernel: usize,
    rng: &mut R,
) -> GrayBuffer {
    if kernel <= 1 || img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let mode = match mode {
        StrokeMode::Random => {
            if rng.gen_bool(0.5) {
                StrokeMode::Dilate
            } else {
                StrokeMode::Erode
            }
        }
        other => other,
    };
    let anchor = (kernel / 2) as isize;
    let mut out = GrayBuffer::filled(img.w, img.h, 0);
    for y in 0..img.h {
        for x in 0..img.w {
            let mut best = match mode {
                StrokeMode::Dilate => u8::MIN,
                _ => u8::MAX,
            };
            for dy in 0..kernel {
                let sy = y as isize + dy as isize - anchor;
                if sy < 0 || sy >= img.h as isize {
                    continue;
                }
                for dx in 0..kernel {
                    let sx = x as isize + dx as isize - anchor;
                    if sx < 0 || sx >= img.w as isize {
                        continue;
                    }
                    let v = img.get(sx as usize, sy as usize);
                    best = match mode {
                        StrokeMode::Dilate => best.max(v),
                        _ => best.min(v),
                    };
                }
            }
            out.set(x, y, best);
        }
    }
    out
}

/// Whites out short horizontal segments to simulate broken strokes. `gaps`
/// defaults to a uniform count in `1..=3`; each gap's width is drawn from
/// `size_range` and its position is uniform over the buffer.
pub fn random_gaps<R: Rng + ?Sized>(
    img: &GrayBuffer,
    gaps: Option<usize>,
    size_range: (usize, usize),
    rng: &mut R,
) -> GrayBuffer {
    if img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let count = gaps.unwrap_or_else(|| rng.gen_range(1..=3));
    let mut out = img.clone();
    for _ in 0..count {
        let size = rng.gen_range(size_range.0..=size_range.1);
        let x = rng.gen_range(0..=img.w.saturating_sub(size));
        let y = rng.gen_range(0..img.h);
        for gx in x..(x + size).min(img.w) {
            out.set(gx, y, 255);
        }
    }
    out
}

fn map_pixels(img: &GrayBuffer, f: impl Fn(f32) -> f32) -> GrayBuffer {
    let mut out = img.clone();
    for v in &mut out.data {
        *v = clamp_u8(f(*v as f32));
    }
    out
}

pub(crate) fn gaussian_taps(sigma: f32, radius: usize) -> Vec<f32> {
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for tap in &mut taps {
        *tap /= sum;
    }
    taps
}

fn convolve_rows(img: &GrayBuffer, taps: &[f32]) -> GrayBuffer {
    let radius = taps.len() / 2;
    let mut out = GrayBuffer::filled(img.w, img.h, 0);
    for y in 0..img.h {
        for x in 0..img.w {
            let mut acc = 0.0f32;
            for (i, tap) in taps.iter().enumerate() {
                let sx = (x as isize + i as isize - radius as isize).clamp(0, img.w as isize - 1);
                acc += img.get(sx as usize, y) as f32 * tap;
            }
            out.set(x, y, clamp_u8(acc.round()));
        }
    }
    out
}

fn convolve_cols(img: &GrayBuffer, taps: &[f32]) -> GrayBuffer {
    let radius = taps.len() / 2;
    let mut out = GrayBuffer::filled(img.w, img.h, 0);
    for y in 0..img.h {
        for x in 0..img.w {
            let mut acc = 0.0f32;
            for (i, tap) in taps.iter().enumerate() {
                let sy = (y as isize + i as isize - radius as isize).clamp(0, img.h as isize - 1);
                acc += img.get(x, sy as usize) as f32 * tap;
            }
            out.set(x, y, clamp_u8(acc.round()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gradient_image() -> GrayBuffer {
        let mut img = GrayBuffer::filled(8, 8, 0);
        for y in 0..8 {
            for x in 0..8 {
                img.set(x, y, (x * 32) as u8);
            }
        }
        img
    }

    #[test]
    fn brightness_scales_and_clips() {
        let img = GrayBuffer::filled(4, 4, 200);
        assert_eq!(scale_brightness(&img, 1.5).get(0, 0), 255);
        assert_eq!(scale_brightness(&img, 0.5).get(0, 0), 100);
    }

    #[test]
    fn contrast_pivots_around_mid_gray() {
        let mut img = GrayBuffer::filled(2, 1, 0);
        img.set(0, 0, 27);
        img.set(1, 0, 227);
        let out = adjust_contrast(&img, 0.5);
        // 27 -> (27 - 127.5) * 0.5 + 127.5 = 77.25, truncated.
        assert_eq!(out.get(0, 0), 77);
        assert_eq!(out.get(1, 0), 177);
    }

    #[test]
    fn copy_effect_flattens_and_lifts() {
        let mut img = GrayBuffer::filled(2, 1, 0);
        img.set(1, 0, 255);
        let out = copy_effect(&img, 0.8, 20.0);
        // 0 -> 25.5 + 20 = 45.5; 255 -> 229.5 + 20 = 249.5.
        assert_eq!(out.get(0, 0), 45);
        assert_eq!(out.get(1, 0), 249);
    }

    #[test]
    fn noise_stays_within_pixel_bounds() {
        let img = gradient_image();
        let mut rng = StdRng::seed_from_u64(42);
        let out = gaussian_noise(&img, 50.0, &mut rng);
        assert_eq!(out.size(), img.size());
        // clamp_u8 guarantees the range; make sure something changed.
        assert_ne!(out.data, img.data);
    }

    #[test]
    fn zero_noise_is_identity() {
        let img = gradient_image();
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(gaussian_noise(&img, 0.0, &mut rng).data, img.data);
    }

    #[test]
    fn blur_preserves_uniform_images() {
        let img = GrayBuffer::filled(6, 6, 180);
        let out = gaussian_blur_sized(&img, 0.5, 1);
        assert!(out.data.iter().all(|&v| v == 180));
    }

    #[test]
    fn blur_smooths_an_impulse() {
        let mut img = GrayBuffer::filled(7, 7, 0);
        img.set(3, 3, 255);
        let out = gaussian_blur_sized(&img, 1.0, 2);
        assert!(out.get(3, 3) < 255, "peak is attenuated");
        assert!(out.get(2, 3) > 0, "mass spreads to neighbors");
    }

    #[test]
    fn motion_blur_spreads_horizontally_only() {
        let mut img = GrayBuffer::filled(9, 3, 0);
        img.set(4, 1, 255);
        let out = motion_blur(&img, 3);
        assert!(out.get(3, 1) > 0);
        assert!(out.get(5, 1) > 0);
        assert_eq!(out.get(4, 0), 0, "no vertical spread");
    }

    #[test]
    fn dilate_takes_neighborhood_max_and_erode_min() {
        let mut img = GrayBuffer::filled(5, 5, 100);
        img.set(2, 2, 250);
        img.set(1, 1, 10);
        let mut rng = StdRng::seed_from_u64(0);

        let dilated = stroke_thickness(&img, StrokeMode::Dilate, 3, &mut rng);
        assert_eq!(dilated.get(1, 1), 250, "bright pixel expands");

        let eroded = stroke_thickness(&img, StrokeMode::Erode, 3, &mut rng);
        assert_eq!(eroded.get(2, 2), 10, "dark pixel expands");
    }

    #[test]
    fn gaps_whiten_single_row_segments() {
        let img = GrayBuffer::filled(20, 5, 0);
        let mut rng = StdRng::seed_from_u64(9);
        let out = random_gaps(&img, Some(2), (2, 8), &mut rng);
        let whitened = out.data.iter().filter(|&&v| v == 255).count();
        assert!(whitened >= 2, "at least the two gap starts are white");
        assert!(whitened <= 16, "gaps cover at most two 8px segments");
    }

    #[test]
    fn randomized_transforms_are_reproducible_under_a_fixed_seed() {
        let img = gradient_image();
        let a = brightness_contrast(
            &img,
            (0.8, 1.2),
            (0.8, 1.2),
            &mut StdRng::seed_from_u64(77),
        );
        let b = brightness_contrast(
            &img,
            (0.8, 1.2),
            (0.8, 1.2),
            &mut StdRng::seed_from_u64(77),
        );
        assert_eq!(a.data, b.data);
    }
}
