pub mod synthetic_glyphs;
