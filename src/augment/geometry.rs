//! Geometric transforms: rotation with canvas expansion, random perspective
//! warps and elastic deformation.
//!
//! All three resample through inverse mapping with bilinear interpolation, so
//! every output pixel is produced exactly once and uncovered areas take the
//! fill color.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use rand::Rng;

use super::photometric::gaussian_taps;
use crate::image::{FloatPlane, GrayBuffer};

const EPS: f32 = 1e-9;

/// Rotates by an angle drawn uniformly from `angle_range` degrees.
pub fn rotate<R: Rng + ?Sized>(
    img: &GrayBuffer,
    angle_range: (f32, f32),
    background: u8,
    rng: &mut R,
) -> GrayBuffer {
    let angle = rng.gen_range(angle_range.0..=angle_range.1);
    rotate_by(img, angle, background)
}

/// Rotates by `angle_deg` around the image center, expanding the canvas so
/// no content is clipped. Exposed area takes `background`.
pub fn rotate_by(img: &GrayBuffer, angle_deg: f32, background: u8) -> GrayBuffer {
    if img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let theta = angle_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let src_w = img.w as f32;
    let src_h = img.h as f32;
    let new_w = (src_w * cos.abs() + src_h * sin.abs()).ceil() as usize;
    let new_h = (src_w * sin.abs() + src_h * cos.abs()).ceil() as usize;

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = new_w as f32 / 2.0;
    let dst_cy = new_h as f32 / 2.0;

    let mut out = GrayBuffer::filled(new_w, new_h, background);
    for y in 0..new_h {
        for x in 0..new_w {
            let dx = x as f32 + 0.5 - dst_cx;
            let dy = y as f32 + 0.5 - dst_cy;
            // Inverse rotation back into source coordinates.
            let sx = cos * dx + sin * dy + src_cx;
            let sy = -sin * dx + cos * dy + src_cy;
            if let Some(v) = sample_bilinear(img, sx - 0.5, sy - 0.5) {
                out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

/// Random perspective warp. Each corner moves by an independent uniform
/// displacement bounded by `strength * min(w, h)`, clamped to the image;
/// output dimensions equal the input's and exposed area fills white.
pub fn perspective<R: Rng + ?Sized>(img: &GrayBuffer, strength: f32, rng: &mut R) -> GrayBuffer {
    if img.w < 2 || img.h < 2 || !(strength > 0.0) {
        return img.clone();
    }
    let w = img.w as f32;
    let h = img.h as f32;
    let src = [
        [0.0, 0.0],
        [w - 1.0, 0.0],
        [0.0, h - 1.0],
        [w - 1.0, h - 1.0],
    ];
    let max_d = strength * w.min(h);
    let mut dst = src;
    for corner in &mut dst {
        let dx = rng.gen_range(-max_d..=max_d);
        let dy = rng.gen_range(-max_d..=max_d);
        corner[0] = (corner[0] + dx).clamp(0.0, w - 1.0);
        corner[1] = (corner[1] + dy).clamp(0.0, h - 1.0);
    }

    let Some(h_mat) = homography_from_corners(&src, &dst) else {
        return img.clone();
    };
    let Some(h_inv) = h_mat.try_inverse() else {
        return img.clone();
    };

    let mut out = GrayBuffer::filled(img.w, img.h, 255);
    for y in 0..img.h {
        for x in 0..img.w {
            let p = h_inv * Vector3::new(x as f32, y as f32, 1.0);
            if !p[2].is_finite() || p[2].abs() <= EPS {
                continue;
            }
            if let Some(v) = sample_bilinear(img, p[0] / p[2], p[1] / p[2]) {
                out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

/// Elastic deformation: two uniform `[-1, 1]` displacement fields scaled by
/// `alpha`, smoothed by a Gaussian of `sigma`, then applied as a bilinear
/// remap with coordinates clamped to the image.
pub fn elastic<R: Rng + ?Sized>(
    img: &GrayBuffer,
    alpha: f32,
    sigma: f32,
    rng: &mut R,
) -> GrayBuffer {
    if img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let mut dx = FloatPlane::new(img.w, img.h);
    let mut dy = FloatPlane::new(img.w, img.h);
    for v in &mut dx.data {
        *v = rng.gen_range(-1.0f32..=1.0) * alpha;
    }
    for v in &mut dy.data {
        *v = rng.gen_range(-1.0f32..=1.0) * alpha;
    }
    let dx = smooth_plane(&dx, sigma);
    let dy = smooth_plane(&dy, sigma);

    let mut out = GrayBuffer::filled(img.w, img.h, 255);
    for y in 0..img.h {
        for x in 0..img.w {
            let sx = (x as f32 + dx.get(x, y)).clamp(0.0, img.w as f32 - 1.0);
            let sy = (y as f32 + dy.get(x, y)).clamp(0.0, img.h as f32 - 1.0);
            if let Some(v) = sample_bilinear(img, sx, sy) {
                out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

/// Bilinear sample at pixel-center coordinates. `None` outside the valid
/// support `[0, w-1] x [0, h-1]`.
fn sample_bilinear(img: &GrayBuffer, x: f32, y: f32) -> Option<f32> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    if x < 0.0 || y < 0.0 || x > (img.w - 1) as f32 || y > (img.h - 1) as f32 {
        return None;
    }
    let xf = x.floor();
    let yf = y.floor();
    let x0 = xf as usize;
    let y0 = yf as usize;
    let x1 = (x0 + 1).min(img.w - 1);
    let y1 = (y0 + 1).min(img.h - 1);
    let tx = x - xf;
    let ty = y - yf;

    let v00 = img.get(x0, y0) as f32;
    let v10 = img.get(x1, y0) as f32;
    let v01 = img.get(x0, y1) as f32;
    let v11 = img.get(x1, y1) as f32;
    let top = v00 + (v10 - v00) * tx;
    let bottom = v01 + (v11 - v01) * tx;
    Some(top + (bottom - top) * ty)
}

/// Solves the homography mapping four `src` points onto `dst` via the 8x8
/// linear system; `None` for degenerate configurations.
fn homography_from_corners(src: &[[f32; 2]; 4], dst: &[[f32; 2]; 4]) -> Option<Matrix3<f32>> {
    let mut a = SMatrix::<f32, 8, 8>::zeros();
    let mut b = SVector::<f32, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src[i];
        let [u, v] = dst[i];
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }
    let h = a.lu().solve(&b)?;
    Some(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    ))
}

fn smooth_plane(plane: &FloatPlane, sigma: f32) -> FloatPlane {
    if sigma <= 0.0 || plane.w == 0 || plane.h == 0 {
        return plane.clone();
    }
    let radius = ((3.0 * sigma).ceil() as usize).max(1);
    let taps = gaussian_taps(sigma, radius);

    let mut tmp = FloatPlane::new(plane.w, plane.h);
    for y in 0..plane.h {
        for x in 0..plane.w {
            let mut acc = 0.0f32;
            for (i, tap) in taps.iter().enumerate() {
                let sx =
                    (x as isize + i as isize - radius as isize).clamp(0, plane.w as isize - 1);
                acc += plane.get(sx as usize, y) * tap;
            }
            tmp.set(x, y, acc);
        }
    }
    let mut out = FloatPlane::new(plane.w, plane.h);
    for y in 0..plane.h {
        for x in 0..plane.w {
            let mut acc = 0.0f32;
            for (i, tap) in taps.iter().enumerate() {
                let sy =
                    (y as isize + i as isize - radius as isize).clamp(0, plane.h as isize - 1);
                acc += tmp.get(x, sy as usize) * tap;
            }
            out.set(x, y, acc);
        }
    }
    out
}
