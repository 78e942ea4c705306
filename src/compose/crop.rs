//! Ink bounding box computation and randomized-margin whitespace cropping.

use rand::Rng;

use crate::image::GrayBuffer;

/// Tight half-open bounding box `(x0, y0, x1, y1)` of all pixels strictly
/// below `threshold`, or `None` when the buffer holds no ink at all.
pub fn ink_bbox(img: &GrayBuffer, threshold: u8) -> Option<(usize, usize, usize, usize)> {
    let mut x0 = img.w;
    let mut y0 = img.h;
    let mut x1 = 0usize;
    let mut y1 = 0usize;
    let mut found = false;

    for (y, row) in img.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v < threshold {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x + 1);
                y1 = y1.max(y + 1);
                found = true;
            }
        }
    }

    found.then_some((x0, y0, x1, y1))
}

/// Crops `img` to the ink bounding box, expanded outward by an independent
/// uniform sample from `0..=margin` on each side (top, bottom, left, right in
/// that order) and clamped to the buffer. A buffer without ink is returned
/// unchanged.
pub fn crop_whitespace<R: Rng + ?Sized>(
    img: &GrayBuffer,
    threshold: u8,
    margin: usize,
    rng: &mut R,
) -> GrayBuffer {
    let Some((x0, y0, x1, y1)) = ink_bbox(img, threshold) else {
        return img.clone();
    };

    let top = y0.saturating_sub(rng.gen_range(0..=margin));
    let bottom = (y1 + rng.gen_range(0..=margin)).min(img.h);
    let left = x0.saturating_sub(rng.gen_range(0..=margin));
    let right = (x1 + rng.gen_range(0..=margin)).min(img.w);

    img.crop(left, top, right, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn buffer_with_ink(w: usize, h: usize, spots: &[(usize, usize)]) -> GrayBuffer {
        let mut img = GrayBuffer::filled(w, h, 255);
        for &(x, y) in spots {
            img.set(x, y, 0);
        }
        img
    }

    #[test]
    fn bbox_is_tight_and_half_open() {
        let img = buffer_with_ink(10, 8, &[(2, 3), (6, 5)]);
        assert_eq!(ink_bbox(&img, 230), Some((2, 3, 7, 6)));
    }

    #[test]
    fn near_white_pixels_are_not_ink() {
        let mut img = GrayBuffer::filled(5, 5, 255);
        img.set(2, 2, 230);
        assert_eq!(ink_bbox(&img, 230), None, "threshold comparison is strict");
        img.set(2, 2, 229);
        assert_eq!(ink_bbox(&img, 230), Some((2, 2, 3, 3)));
    }

    #[test]
    fn blank_buffer_is_returned_unchanged() {
        let img = GrayBuffer::filled(9, 4, 255);
        let mut rng = StdRng::seed_from_u64(5);
        let cropped = crop_whitespace(&img, 230, 3, &mut rng);
        assert_eq!(cropped, img);
    }

    #[test]
    fn zero_margin_crop_is_idempotent() {
        let img = buffer_with_ink(12, 9, &[(3, 2), (8, 6)]);
        let mut rng = StdRng::seed_from_u64(5);
        let once = crop_whitespace(&img, 230, 0, &mut rng);
        assert_eq!(once.size(), (6, 5));
        let twice = crop_whitespace(&once, 230, 0, &mut rng);
        assert_eq!(twice, once);
    }

    #[test]
    fn margins_never_leave_the_buffer() {
        let img = buffer_with_ink(6, 6, &[(0, 0), (5, 5)]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let cropped = crop_whitespace(&img, 230, 3, &mut rng);
            assert_eq!(cropped.size(), (6, 6), "bbox spans the whole buffer");
        }
    }
}
