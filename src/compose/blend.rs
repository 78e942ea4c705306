//! Background blending: resize, top-left crop, threshold overlay.

use crate::image::io::resize_lanczos;
use crate::image::GrayBuffer;

/// Lays `line` over `background` and returns a buffer of the line's exact
/// dimensions.
///
/// A background smaller than the line in either dimension is first resized to
/// the line's size with a Lanczos filter; a larger one contributes its
/// top-left region. The overlay is a hard cutoff rather than alpha
/// compositing: wherever the line pixel is strictly below `threshold` it
/// overwrites the background pixel, everywhere else the background shows
/// through.
pub fn blend_with_background(
    line: &GrayBuffer,
    background: &GrayBuffer,
    threshold: u8,
) -> GrayBuffer {
    let resized;
    let base = if background.w < line.w || background.h < line.h {
        resized = resize_lanczos(background, line.w, line.h);
        &resized
    } else {
        background
    };

    let mut out = base.crop(0, 0, line.w, line.h);
    for y in 0..line.h {
        for x in 0..line.w {
            let v = line.get(x, y);
            if v < threshold {
                out.set(x, y, v);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_matches_line_dimensions_for_larger_background() {
        let line = GrayBuffer::filled(8, 4, 255);
        let background = GrayBuffer::filled(20, 10, 200);
        let out = blend_with_background(&line, &background, 180);
        assert_eq!(out.size(), (8, 4));
    }

    #[test]
    fn output_matches_line_dimensions_for_smaller_background() {
        let line = GrayBuffer::filled(8, 4, 255);
        let background = GrayBuffer::filled(3, 2, 200);
        let out = blend_with_background(&line, &background, 180);
        assert_eq!(out.size(), (8, 4));
    }

    #[test]
    fn ink_overwrites_and_background_shows_elsewhere() {
        let mut line = GrayBuffer::filled(4, 4, 255);
        line.set(1, 1, 40);
        line.set(2, 2, 179);
        line.set(3, 3, 180);
        let background = GrayBuffer::filled(4, 4, 200);

        let out = blend_with_background(&line, &background, 180);
        assert_eq!(out.get(1, 1), 40, "ink pixel is copied verbatim");
        assert_eq!(out.get(2, 2), 179, "threshold comparison is strict");
        assert_eq!(out.get(3, 3), 200, "pixel at the threshold keeps background");
        assert_eq!(out.get(0, 0), 200, "white area keeps background");
    }

    #[test]
    fn larger_background_contributes_its_top_left_region() {
        let mut background = GrayBuffer::filled(6, 6, 100);
        background.set(0, 0, 190);
        background.set(5, 5, 250);
        let line = GrayBuffer::filled(3, 3, 255);

        let out = blend_with_background(&line, &background, 180);
        assert_eq!(out.get(0, 0), 190);
        assert_eq!(out.get(2, 2), 100);
    }
}
