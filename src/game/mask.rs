//! Pixel-perfect collision masks.
//!
//! A mask is a solid/empty bit per sprite pixel. Overlap tests use the same
//! convention as most 2D libraries: the offset passed to [`Mask::overlap`] is
//! the position of the other mask's top-left corner relative to this one's.

use crate::core::MASK_ALPHA_THRESHOLD;
use image::RgbaImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// An empty mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// A fully solid mask.
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask by asking `solid` about every pixel.
    pub fn from_fn(width: u32, height: u32, solid: impl Fn(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Pixels whose alpha is above the threshold are solid.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            image.get_pixel(x, y).0[3] > MASK_ALPHA_THRESHOLD
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = solid;
        }
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Upside-down copy (used for the top pipe).
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x, self.height - 1 - y)
        })
    }

    /// Counter-clockwise rotation by `degrees` about the centre.
    ///
    /// The result is the bounding box of the rotated mask, so it can be larger
    /// than the source. Sampling is nearest neighbour.
    pub fn rotated(&self, degrees: f64) -> Self {
        if degrees.rem_euclid(360.0) == 0.0 {
            return self.clone();
        }

        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f64, self.height as f64);
        // Trim float noise so a quarter turn doesn't gain a pixel.
        let new_w = (w * cos.abs() + h * sin.abs() - 1e-9).ceil() as u32;
        let new_h = (w * sin.abs() + h * cos.abs() - 1e-9).ceil() as u32;

        Self::from_fn(new_w, new_h, |dx, dy| {
            // y grows downward, so a visual counter-clockwise turn samples
            // the source through the inverse rotation below.
            let rx = dx as f64 + 0.5 - new_w as f64 / 2.0;
            let ry = dy as f64 + 0.5 - new_h as f64 / 2.0;
            let sx = rx * cos - ry * sin + w / 2.0;
            let sy = rx * sin + ry * cos + h / 2.0;
            sx >= 0.0 && sy >= 0.0 && self.get(sx.floor() as u32, sy.floor() as u32)
        })
    }

    /// First solid pixel shared with `other`, in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (ox, oy) = offset;
        let x_start = ox.max(0);
        let x_end = (ox + other.width as i32).min(self.width as i32);
        let y_start = oy.max(0);
        let y_end = (oy + other.height as i32).min(self.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }

    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
