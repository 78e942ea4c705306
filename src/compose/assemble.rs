//! Height-normalized horizontal concatenation of glyph buffers.

use crate::image::GrayBuffer;

/// Concatenates `parts` left to right into a single line buffer.
///
/// The line height is the maximum part height; shorter parts are centered
/// vertically, with `pad_top = diff / 2` and the remainder below. The canvas
/// is filled white before pasting, so the padding needs no separate pass.
/// Returns `None` for an empty sequence.
pub fn assemble(parts: &[&GrayBuffer]) -> Option<GrayBuffer> {
    let max_h = parts.iter().map(|part| part.h).max()?;
    let total_w: usize = parts.iter().map(|part| part.w).sum();

    let mut line = GrayBuffer::filled(total_w, max_h, 255);
    let mut x = 0usize;
    for part in parts {
        let pad_top = (max_h - part.h) / 2;
        line.paste(part, x, pad_top);
        x += part.w;
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_height_is_max_part_height_and_width_is_sum() {
        let a = GrayBuffer::filled(20, 30, 0);
        let b = GrayBuffer::filled(10, 12, 0);
        let line = assemble(&[&a, &b]).unwrap();
        assert_eq!(line.size(), (30, 30));
    }

    #[test]
    fn shorter_parts_are_centered_vertically() {
        let tall = GrayBuffer::filled(4, 10, 0);
        let short = GrayBuffer::filled(4, 5, 0);
        let line = assemble(&[&tall, &short]).unwrap();

        // 10 - 5 = 5, pad_top = 2, pad_bottom = 3.
        assert_eq!(line.get(4, 1), 255, "row above the centered part is white");
        assert_eq!(line.get(4, 2), 0, "first row of the centered part");
        assert_eq!(line.get(4, 6), 0, "last row of the centered part");
        assert_eq!(line.get(4, 7), 255, "row below the centered part is white");
    }

    #[test]
    fn parts_keep_their_order() {
        let dark = GrayBuffer::filled(3, 4, 10);
        let mid = GrayBuffer::filled(2, 4, 120);
        let line = assemble(&[&dark, &mid]).unwrap();
        assert_eq!(line.get(0, 0), 10);
        assert_eq!(line.get(3, 0), 120);
    }

    #[test]
    fn empty_sequence_yields_none() {
        assert!(assemble(&[]).is_none());
    }
}
