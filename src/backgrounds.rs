//! Pool of candidate background images used by the compositor's blend stage.

use std::fs;
use std::path::Path;

use rand::Rng;

use crate::image::io::{is_supported_image, load_grayscale_image};
use crate::image::GrayBuffer;

/// Backgrounds loaded once at startup and picked uniformly at random per
/// composed line. Read-only after construction.
#[derive(Clone, Debug, Default)]
pub struct BackgroundPool {
    images: Vec<GrayBuffer>,
}

impl BackgroundPool {
    /// Loads every supported image directly under `directory`. A missing
    /// directory leaves the pool empty; files that fail to decode are skipped
    /// with a warning. Files are loaded in sorted name order so a seeded pick
    /// is reproducible across runs.
    pub fn load(directory: &Path) -> BackgroundPool {
        let mut pool = BackgroundPool::default();
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(_) => {
                log::warn!(
                    "background directory {} not found; pool starts empty",
                    directory.display()
                );
                return pool;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_supported_image(path))
            .collect();
        paths.sort();

        for path in paths {
            match load_grayscale_image(&path) {
                Ok(image) if image.w > 0 && image.h > 0 => pool.images.push(image),
                Ok(_) => log::warn!("skipping background {}: empty image", path.display()),
                Err(err) => log::warn!("skipping background {}: {err}", path.display()),
            }
        }

        log::debug!("loaded {} background images", pool.images.len());
        pool
    }

    /// Builds a pool from in-memory buffers, bypassing the filesystem.
    pub fn from_images(images: impl IntoIterator<Item = GrayBuffer>) -> BackgroundPool {
        BackgroundPool {
            images: images.into_iter().collect(),
        }
    }

    /// Uniformly random background, or `None` when the pool is empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&GrayBuffer> {
        if self.images.is_empty() {
            return None;
        }
        Some(&self.images[rng.gen_range(0..self.images.len())])
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_draws_from_loaded_images() {
        let pool = BackgroundPool::from_images([
            GrayBuffer::filled(4, 4, 200),
            GrayBuffer::filled(8, 8, 210),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            let bg = pool.pick(&mut rng).unwrap();
            assert!(bg.w == 4 || bg.w == 8);
        }
    }

    #[test]
    fn empty_pool_yields_none() {
        let pool = BackgroundPool::default();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pool.pick(&mut rng).is_none());
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }
}
