use crate::error::{FinchError, FinchResult};
use crate::raster::Image;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Combines two same-shaped images into a difference image of that shape.
pub trait DifferenceMethod: Send + Sync {
    fn name(&self) -> &'static str;

    fn compute(&self, a: &Image, b: &Image) -> FinchResult<Image>;
}

/// Per-sample `|a - b|`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbsoluteDifference;

impl DifferenceMethod for AbsoluteDifference {
    fn name(&self) -> &'static str {
        "absolute"
    }

    fn compute(&self, a: &Image, b: &Image) -> FinchResult<Image> {
        a.ensure_same_shape(b)?;
        let shape = a.shape();
        let row = shape.row_len();

        let mut out = vec![0u8; shape.element_count()];
        out.par_chunks_mut(row)
            .zip(a.samples().par_chunks(row))
            .zip(b.samples().par_chunks(row))
            .for_each(|((dst, ra), rb)| {
                for ((d, &x), &y) in dst.iter_mut().zip(ra).zip(rb) {
                    *d = x.abs_diff(y);
                }
            });

        Image::new(shape, out)
    }
}

/// Configuration-facing selector for a [`DifferenceMethod`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceKind {
    #[default]
    Absolute,
}

impl DifferenceKind {
    /// Resolves a configured name. Unknown names fail here, before any pixel is touched.
    pub fn from_name(name: &str) -> FinchResult<Self> {
        Self::from_str(name.trim()).map_err(|_| {
            tracing::warn!(
                "Difference method '{}' requested; known: {}",
                name,
                Self::iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            FinchError::UnknownDifferenceMethod(name.to_string())
        })
    }

    pub fn method(self) -> Box<dyn DifferenceMethod> {
        match self {
            DifferenceKind::Absolute => Box::new(AbsoluteDifference),
        }
    }
}
