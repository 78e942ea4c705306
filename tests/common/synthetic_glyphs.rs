use line_composer::glyphs::{GlyphImage, GlyphStore};
use line_composer::image::GrayBuffer;

/// Generates a white glyph cell with a one-pixel black frame. The frame puts
/// ink on every edge, so composed line dimensions stay exact under cropping.
pub fn framed_glyph(character: char, w: usize, h: usize) -> GlyphImage {
    assert!(w >= 2 && h >= 2, "frame needs at least 2x2 pixels");

    let mut image = GrayBuffer::filled(w, h, 255);
    for x in 0..w {
        image.set(x, 0, 0);
        image.set(x, h - 1, 0);
    }
    for y in 0..h {
        image.set(0, y, 0);
        image.set(w - 1, y, 0);
    }
    GlyphImage {
        character,
        style: "print".to_string(),
        image,
    }
}

/// Builds an in-memory store with one framed glyph per character.
pub fn store_for(characters: &[char], w: usize, h: usize) -> GlyphStore {
    GlyphStore::from_glyphs(characters.iter().map(|&c| framed_glyph(c, w, h)))
}

/// Uniform gray background of the given size.
pub fn flat_background(w: usize, h: usize, value: u8) -> GrayBuffer {
    GrayBuffer::filled(w, h, value)
}
