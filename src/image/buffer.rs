//! Owned single-channel pixel buffers in row-major layout (stride == width).
//!
//! `GrayBuffer` is the 8-bit working type every pipeline stage consumes and
//! produces. `FloatPlane` backs intermediate float math (displacement fields,
//! blur accumulators) where u8 precision would round away the signal.

/// Owned 8-bit grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayBuffer {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of bytes between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<u8>,
}

impl GrayBuffer {
    /// Construct a buffer of size `w × h` filled with `fill`.
    pub fn filled(w: usize, h: usize, fill: u8) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![fill; w * h],
        }
    }

    /// Wrap raw row-major bytes; `data.len()` must equal `w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), w * h, "raw buffer size mismatch");
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    /// Borrow row `y` as a slice of `w` pixels.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }

    #[inline]
    /// Borrow row `y` mutably.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.stride)
    }

    /// Copy `src` into this buffer with its top-left corner at (x0, y0).
    /// The source must fit entirely within the destination bounds.
    pub fn paste(&mut self, src: &GrayBuffer, x0: usize, y0: usize) {
        debug_assert!(x0 + src.w <= self.w && y0 + src.h <= self.h);
        for y in 0..src.h {
            let dst_start = (y0 + y) * self.stride + x0;
            self.data[dst_start..dst_start + src.w].copy_from_slice(src.row(y));
        }
    }

    /// Extract the half-open window `[x0, x1) × [y0, y1)` as a new buffer.
    pub fn crop(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> GrayBuffer {
        debug_assert!(x0 <= x1 && y0 <= y1 && x1 <= self.w && y1 <= self.h);
        let (cw, ch) = (x1 - x0, y1 - y0);
        let mut out = GrayBuffer::filled(cw, ch, 0);
        for y in 0..ch {
            let src_start = (y0 + y) * self.stride + x0;
            out.row_mut(y).copy_from_slice(&self.data[src_start..src_start + cw]);
        }
        out
    }

    /// Dimensions as a `(width, height)` pair.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }
}

/// Owned single-channel f32 plane used for intermediate math.
#[derive(Clone, Debug)]
pub struct FloatPlane {
    pub w: usize,
    pub h: usize,
    pub data: Vec<f32>,
}

impl FloatPlane {
    /// Construct a zero-initialized plane of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.w + x] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paste_places_source_at_offset() {
        let mut canvas = GrayBuffer::filled(6, 4, 255);
        let patch = GrayBuffer::from_raw(2, 2, vec![1, 2, 3, 4]);
        canvas.paste(&patch, 3, 1);
        assert_eq!(canvas.get(3, 1), 1);
        assert_eq!(canvas.get(4, 1), 2);
        assert_eq!(canvas.get(3, 2), 3);
        assert_eq!(canvas.get(4, 2), 4);
        assert_eq!(canvas.get(2, 1), 255, "pixels left of the patch untouched");
    }

    #[test]
    fn crop_extracts_half_open_window() {
        let buf = GrayBuffer::from_raw(4, 3, (0..12).collect());
        let sub = buf.crop(1, 0, 3, 2);
        assert_eq!(sub.size(), (2, 2));
        assert_eq!(sub.data, vec![1, 2, 5, 6]);
    }

    #[test]
    fn crop_full_extent_is_identity() {
        let buf = GrayBuffer::from_raw(3, 2, vec![9, 8, 7, 6, 5, 4]);
        let same = buf.crop(0, 0, 3, 2);
        assert_eq!(same, buf);
    }
}
