//! Sprite masks for the bird, pipes and ground.
//!
//! Sprites are loaded from PNG files when an asset directory is given and
//! scaled up 2x with Scale2x. Without assets the built-in silhouettes below
//! are used. They have the same dimensions as the scaled art, so
//! physics and collisions behave identically either way.

use super::mask::Mask;
use crate::core::error::{Error, Result};
use crate::core::{BASE_SPRITE_SIZE, BIRD_FRAMES, BIRD_SPRITE_SIZE, PIPE_SPRITE_SIZE};
use image::RgbaImage;
use std::path::Path;

pub const BIRD_FILES: [&str; BIRD_FRAMES] = ["bird1.png", "bird2.png", "bird3.png"];
pub const PIPE_FILE: &str = "pipe.png";
pub const BASE_FILE: &str = "base.png";
pub const BACKGROUND_FILE: &str = "background.png";

#[derive(Debug, Clone)]
pub struct SpriteSet {
    bird_frames: [Mask; BIRD_FRAMES],
    pipe_top: Mask,
    pipe_bottom: Mask,
    base: Mask,
}

impl SpriteSet {
    /// Built-in silhouettes: an elliptical bird, solid pipes and ground.
    pub fn builtin() -> Self {
        let (bw, bh) = BIRD_SPRITE_SIZE;
        // Wing up, level, down: the wing pixels sit below the body on one side.
        let wing_rows = [bh / 4, bh / 2, bh * 3 / 4];
        let bird_frames = wing_rows.map(|wing_row| {
            Mask::from_fn(bw, bh, |x, y| {
                let dx = (x as f64 + 0.5 - bw as f64 / 2.0) / (bw as f64 / 2.0);
                let dy = (y as f64 + 0.5 - bh as f64 / 2.0) / (bh as f64 / 2.0);
                let body = dx * dx + dy * dy <= 1.0;
                let wing = x < bw / 3 && y.abs_diff(wing_row) <= 3;
                body || wing
            })
        });

        let (pw, ph) = PIPE_SPRITE_SIZE;
        let pipe = Mask::filled(pw, ph);
        let (gw, gh) = BASE_SPRITE_SIZE;

        Self {
            bird_frames,
            pipe_top: pipe.flipped_vertical(),
            pipe_bottom: pipe,
            base: Mask::filled(gw, gh),
        }
    }

    /// Load the PNG sprites from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let bird_frames = [
            load_mask(&dir.join(BIRD_FILES[0]))?,
            load_mask(&dir.join(BIRD_FILES[1]))?,
            load_mask(&dir.join(BIRD_FILES[2]))?,
        ];

        let pipe = load_mask(&dir.join(PIPE_FILE))?;
        let base = load_mask(&dir.join(BASE_FILE))?;

        // Not used for masks, but an asset dir without it is incomplete.
        load_image(&dir.join(BACKGROUND_FILE))?;

        log::info!(
            "loaded sprites from {} (bird {}x{}, pipe {}x{})",
            dir.display(),
            bird_frames[0].width(),
            bird_frames[0].height(),
            pipe.width(),
            pipe.height()
        );

        Ok(Self {
            bird_frames,
            pipe_top: pipe.flipped_vertical(),
            pipe_bottom: pipe,
            base,
        })
    }

    pub fn bird_frame(&self, frame: usize) -> &Mask {
        &self.bird_frames[frame % BIRD_FRAMES]
    }

    pub fn bird_width(&self) -> u32 {
        self.bird_frames[0].width()
    }

    pub fn bird_height(&self) -> u32 {
        self.bird_frames[0].height()
    }

    pub fn pipe_top(&self) -> &Mask {
        &self.pipe_top
    }

    pub fn pipe_bottom(&self) -> &Mask {
        &self.pipe_bottom
    }

    pub fn pipe_width(&self) -> i32 {
        self.pipe_top.width() as i32
    }

    pub fn pipe_height(&self) -> i32 {
        self.pipe_top.height() as i32
    }

    pub fn base_width(&self) -> i32 {
        self.base.width() as i32
    }
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

fn load_mask(path: &Path) -> Result<Mask> {
    Ok(Mask::from_rgba(&scale2x(&load_image(path)?)))
}

/// Scale2x (AdvMAME2x) pixel-art upscaling.
pub fn scale2x(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w * 2, h * 2);
    if w == 0 || h == 0 {
        return out;
    }

    for y in 0..h {
        for x in 0..w {
            let e = *src.get_pixel(x, y);
            let b = *src.get_pixel(x, y.saturating_sub(1));
            let d = *src.get_pixel(x.saturating_sub(1), y);
            let f = *src.get_pixel((x + 1).min(w - 1), y);
            let hh = *src.get_pixel(x, (y + 1).min(h - 1));

            let (e0, e1, e2, e3) = if b != hh && d != f {
                (
                    if d == b { d } else { e },
                    if b == f { f } else { e },
                    if d == hh { d } else { e },
                    if hh == f { f } else { e },
                )
            } else {
                (e, e, e, e)
            };

            out.put_pixel(2 * x, 2 * y, e0);
            out.put_pixel(2 * x + 1, 2 * y, e1);
            out.put_pixel(2 * x, 2 * y + 1, e2);
            out.put_pixel(2 * x + 1, 2 * y + 1, e3);
        }
    }
    out
}
