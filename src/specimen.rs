use crate::brush::{self, BrushSet, Stroke};
use crate::error::FinchResult;
use crate::raster::{Image, Shape};
use std::sync::Arc;

/// A candidate drawing: its strokes, the raster they produce and the most
/// recent difference against the target.
///
/// The cached image is fixed at construction. A different drawing is a new
/// `Specimen`, so a diff image can only ever describe the cached image it sits
/// next to.
#[derive(Debug, Clone)]
pub struct Specimen {
    brush: Arc<BrushSet>,
    strokes: Vec<Stroke>,
    cached_image: Image,
    diff_image: Option<Image>,
}

impl Specimen {
    /// Renders `strokes` with `brush` at the session shape.
    pub fn render(brush: Arc<BrushSet>, strokes: Vec<Stroke>, shape: Shape) -> FinchResult<Self> {
        let cached_image = brush::render(&brush, &strokes, shape)?;
        Ok(Self {
            brush,
            strokes,
            cached_image,
            diff_image: None,
        })
    }

    /// Wraps an already rendered image.
    pub fn from_image(brush: Arc<BrushSet>, cached_image: Image) -> Self {
        Self {
            brush,
            strokes: Vec::new(),
            cached_image,
            diff_image: None,
        }
    }

    pub fn brush(&self) -> &BrushSet {
        &self.brush
    }

    pub fn brush_handle(&self) -> Arc<BrushSet> {
        Arc::clone(&self.brush)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn cached_image(&self) -> &Image {
        &self.cached_image
    }

    pub fn diff_image(&self) -> Option<&Image> {
        self.diff_image.as_ref()
    }

    pub(crate) fn set_diff_image(&mut self, diff: Image) {
        self.diff_image = Some(diff);
    }
}
