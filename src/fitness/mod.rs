pub mod difference;

pub use self::difference::{AbsoluteDifference, DifferenceKind, DifferenceMethod};

use crate::error::FinchResult;
use crate::raster::{Image, MAX_SAMPLE};
use crate::specimen::Specimen;
use rayon::prelude::*;

/// Normalized divergence in `[0, 1]`. Lower is better; 0 is a pixel-perfect match.
pub type FitnessScore = f64;

/// Scores specimens against a target with a pluggable difference method.
pub struct FitnessEvaluator {
    method: Box<dyn DifferenceMethod>,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new(DifferenceKind::default())
    }
}

impl FitnessEvaluator {
    pub fn new(kind: DifferenceKind) -> Self {
        Self {
            method: kind.method(),
        }
    }

    pub fn with_method(method: Box<dyn DifferenceMethod>) -> Self {
        Self { method }
    }

    pub fn method_name(&self) -> &'static str {
        self.method.name()
    }

    /// Diffs the specimen's rendering against `target`, stores the difference
    /// image on the specimen and returns the normalized score.
    ///
    /// Shapes must match exactly; nothing is resized or cropped.
    pub fn evaluate(&self, specimen: &mut Specimen, target: &Image) -> FinchResult<FitnessScore> {
        let (diff, score) = self.compare(specimen.cached_image(), target)?;
        specimen.set_diff_image(diff);
        Ok(score)
    }

    /// Difference image and score for two bare images.
    pub fn compare(&self, image: &Image, target: &Image) -> FinchResult<(Image, FitnessScore)> {
        image.ensure_same_shape(target)?;
        let diff = self.method.compute(image, target)?;
        let score = normalized_score(&diff);
        Ok((diff, score))
    }
}

/// One-shot form of [`FitnessEvaluator::evaluate`].
pub fn evaluate(
    specimen: &mut Specimen,
    target: &Image,
    kind: DifferenceKind,
) -> FinchResult<FitnessScore> {
    FitnessEvaluator::new(kind).evaluate(specimen, target)
}

/// Sum of all samples over the largest sum the shape allows.
pub fn normalized_score(diff: &Image) -> FitnessScore {
    let total: u64 = diff
        .samples()
        .par_chunks(64 * 1024)
        .map(|chunk| chunk.iter().map(|&s| s as u64).sum::<u64>())
        .sum();
    let max_total = diff.shape().element_count() as u64 * MAX_SAMPLE as u64;
    total as f64 / max_total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{BrushKind, BrushSet};
    use crate::error::FinchError;
    use crate::raster::Shape;
    use std::sync::Arc;

    fn specimen_of(img: Image) -> Specimen {
        Specimen::from_image(Arc::new(BrushSet::new(BrushKind::Round, 1.0, 4.0)), img)
    }

    #[test]
    fn diff_is_stored_on_specimen() {
        let target = Image::new(Shape::new(2, 2, 1), vec![0, 0, 0, 0]).unwrap();
        let mut s = specimen_of(Image::new(Shape::new(2, 2, 1), vec![255, 0, 0, 0]).unwrap());

        assert!(s.diff_image().is_none());
        let score = FitnessEvaluator::default().evaluate(&mut s, &target).unwrap();

        assert_eq!(score, 0.25);
        assert_eq!(s.diff_image().unwrap().samples(), &[255, 0, 0, 0]);
    }

    #[test]
    fn shape_mismatch_leaves_specimen_untouched() {
        let target = Image::filled(Shape::new(3, 2, 1), 0).unwrap();
        let mut s = specimen_of(Image::filled(Shape::new(2, 3, 1), 0).unwrap());

        let err = FitnessEvaluator::default()
            .evaluate(&mut s, &target)
            .unwrap_err();
        assert!(matches!(err, FinchError::IncompatibleShapes { .. }));
        assert!(s.diff_image().is_none());
    }

    #[test]
    fn unknown_method_fails_at_selection() {
        assert!(matches!(
            DifferenceKind::from_name("squared"),
            Err(FinchError::UnknownDifferenceMethod(name)) if name == "squared"
        ));
        assert_eq!(
            DifferenceKind::from_name("ABSOLUTE").unwrap(),
            DifferenceKind::Absolute
        );
    }
}
