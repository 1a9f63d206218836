use crate::error::{FinchError, FinchResult};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Largest value an 8-bit sample can hold.
pub const MAX_SAMPLE: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl Shape {
    pub const fn new(width: u32, height: u32, channels: u8) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn element_count(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    fn validate(&self) -> FinchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FinchError::InvalidImage(format!(
                "zero-sized raster {}",
                self
            )));
        }
        if self.channels != 1 && self.channels != 3 {
            return Err(FinchError::InvalidImage(format!(
                "unsupported channel count {}",
                self.channels
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Immutable 8-bit raster, row-major and channel-interleaved.
///
/// The sample buffer is shared, so clones are cheap and there is no way to
/// write into an `Image` once built. Anything that wants to draw goes through
/// [`Canvas`], which owns a private copy.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    shape: Shape,
    data: Arc<[u8]>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image").field("shape", &self.shape).finish()
    }
}

impl Image {
    pub fn new(shape: Shape, data: Vec<u8>) -> FinchResult<Self> {
        shape.validate()?;
        if data.len() != shape.element_count() {
            return Err(FinchError::InvalidImage(format!(
                "buffer holds {} samples, shape {} needs {}",
                data.len(),
                shape,
                shape.element_count()
            )));
        }
        Ok(Self {
            shape,
            data: Arc::from(data),
        })
    }

    pub fn filled(shape: Shape, value: u8) -> FinchResult<Self> {
        Self::new(shape, vec![value; shape.element_count()])
    }

    /// Builds an image by asking `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(shape: Shape, f: F) -> FinchResult<Self>
    where
        F: Fn(u32, u32, u8) -> u8,
    {
        let mut data = Vec::with_capacity(shape.element_count());
        for y in 0..shape.height {
            for x in 0..shape.width {
                for c in 0..shape.channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self::new(shape, data)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn width(&self) -> u32 {
        self.shape.width
    }

    pub fn height(&self) -> u32 {
        self.shape.height
    }

    pub fn channels(&self) -> u8 {
        self.shape.channels
    }

    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// Samples of the pixel at `(x, y)`, one per channel.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(
            x < self.shape.width && y < self.shape.height,
            "pixel ({}, {}) outside {} image",
            x,
            y,
            self.shape
        );
        let c = self.shape.channels as usize;
        let idx = (y as usize * self.shape.width as usize + x as usize) * c;
        &self.data[idx..idx + c]
    }

    /// True when both images point at the same sample buffer.
    pub fn shares_buffer(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn ensure_same_shape(&self, other: &Image) -> FinchResult<()> {
        if self.shape != other.shape {
            return Err(FinchError::IncompatibleShapes {
                left: self.shape,
                right: other.shape,
            });
        }
        Ok(())
    }

    /// Re-lays the image out with `channels` samples per pixel.
    ///
    /// Gray expands by replication, color collapses to Rec.601 luma. Asking for
    /// the current layout hands back a clone of the same buffer.
    pub fn to_channels(&self, channels: u8) -> FinchResult<Image> {
        if channels == self.shape.channels {
            return Ok(self.clone());
        }
        let shape = Shape::new(self.shape.width, self.shape.height, channels);
        shape.validate()?;

        let data = match (self.shape.channels, channels) {
            (1, 3) => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
            (3, 1) => self
                .data
                .chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
            (from, to) => {
                return Err(FinchError::InvalidImage(format!(
                    "cannot convert {} channels to {}",
                    from, to
                )))
            }
        };
        Ok(Image { shape, data })
    }

    /// Decodes an image file, shrinking it so neither side exceeds
    /// `max_dimension` (aspect ratio kept; `0` disables shrinking).
    pub fn load<P: AsRef<Path>>(path: P, max_dimension: u32, color: bool) -> FinchResult<Self> {
        let path = path.as_ref();
        let mut decoded = image::open(path)?;

        if max_dimension > 0 && (decoded.width() > max_dimension || decoded.height() > max_dimension)
        {
            debug!(
                "Downscaling {:?} from {}x{} to fit {}",
                path,
                decoded.width(),
                decoded.height(),
                max_dimension
            );
            decoded = decoded.resize(max_dimension, max_dimension, FilterType::Triangle);
        }

        let (width, height) = (decoded.width(), decoded.height());
        if color {
            Self::new(Shape::new(width, height, 3), decoded.to_rgb8().into_raw())
        } else {
            Self::new(Shape::new(width, height, 1), decoded.to_luma8().into_raw())
        }
    }
}

/// Rec.601 luma of an RGB triple.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Private, writable copy of an [`Image`] for annotation.
pub struct Canvas {
    shape: Shape,
    data: Vec<u8>,
}

impl Canvas {
    pub fn copy_of(image: &Image) -> Self {
        Self {
            shape: image.shape,
            data: image.data.to_vec(),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Writes an RGB color at `(x, y)`; gray canvases receive its luma.
    /// Out-of-bounds coordinates are clipped silently.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.shape.width as i64 || y >= self.shape.height as i64 {
            return;
        }
        let c = self.shape.channels as usize;
        let idx = (y as usize * self.shape.width as usize + x as usize) * c;
        if c == 1 {
            self.data[idx] = luma(rgb[0], rgb[1], rgb[2]);
        } else {
            self.data[idx..idx + 3].copy_from_slice(&rgb);
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, rgb: [u8; 3]) {
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.put_pixel(x + dx, y + dy, rgb);
            }
        }
    }

    pub fn into_image(self) -> Image {
        Image {
            shape: self.shape,
            data: Arc::from(self.data),
        }
    }
}
