use finch::fitness::FitnessEvaluator;
use finch::raster::{Image, Shape};
use proptest::prelude::*;

prop_compose! {
    fn arb_shape()(width in 1u32..24, height in 1u32..24, color in any::<bool>()) -> Shape {
        Shape::new(width, height, if color { 3 } else { 1 })
    }
}

prop_compose! {
    fn arb_pair()(shape in arb_shape())(
        a in prop::collection::vec(any::<u8>(), shape.element_count()),
        b in prop::collection::vec(any::<u8>(), shape.element_count()),
        shape in Just(shape),
    ) -> (Image, Image) {
        (Image::new(shape, a).unwrap(), Image::new(shape, b).unwrap())
    }
}

proptest! {
    #[test]
    fn score_stays_in_unit_range((a, b) in arb_pair()) {
        let (_, score) = FitnessEvaluator::default().compare(&a, &b).unwrap();
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn image_against_itself_is_zero((a, _) in arb_pair()) {
        let (diff, score) = FitnessEvaluator::default().compare(&a, &a).unwrap();
        prop_assert_eq!(score, 0.0);
        prop_assert!(diff.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn absolute_difference_is_symmetric((a, b) in arb_pair()) {
        let evaluator = FitnessEvaluator::default();
        let (ab, score_ab) = evaluator.compare(&a, &b).unwrap();
        let (ba, score_ba) = evaluator.compare(&b, &a).unwrap();
        prop_assert_eq!(ab.samples(), ba.samples());
        prop_assert_eq!(score_ab, score_ba);
    }

    #[test]
    fn diff_matches_per_sample_distance((a, b) in arb_pair()) {
        let (diff, _) = FitnessEvaluator::default().compare(&a, &b).unwrap();
        for ((&d, &x), &y) in diff.samples().iter().zip(a.samples()).zip(b.samples()) {
            prop_assert_eq!(d, x.abs_diff(y));
        }
    }

    #[test]
    fn one_only_at_full_contrast((a, b) in arb_pair()) {
        let (_, score) = FitnessEvaluator::default().compare(&a, &b).unwrap();
        let all_max = a
            .samples()
            .iter()
            .zip(b.samples())
            .all(|(&x, &y)| x.abs_diff(y) == 255);
        prop_assert_eq!(score == 1.0, all_max);
    }
}
