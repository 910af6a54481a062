use adclut_core::{
    CalibrationDataset, CalibrationError, CalibrationParams, CalibrationSample, generate_table,
};
use proptest::prelude::*;

prop_compose! {
    // Arbitrary in-range captures: many repeats per level, possibly non-monotonic
    fn any_capture()(
        samples in prop::collection::vec((0u32..256, 0u32..4096), 1..400),
    ) -> Vec<CalibrationSample> {
        samples.into_iter().map(|(d, r)| CalibrationSample::new(d, r)).collect()
    }
}

prop_compose! {
    // One sample per level, strictly increasing on both axes
    fn increasing_capture()(
        levels in prop::collection::btree_set(0u32..256, 2..40),
    )(
        steps in prop::collection::vec(1u32..100, levels.len()),
        levels in Just(levels),
    ) -> Vec<CalibrationSample> {
        let mut raw = 10u32;
        levels
            .into_iter()
            .zip(steps)
            .map(|(d, s)| {
                raw += s;
                CalibrationSample::new(d, raw)
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn tables_are_full_length_in_range_and_clamped(samples in any_capture()) {
        let ds = CalibrationDataset::new(samples, CalibrationParams::default()).unwrap();
        match generate_table(&ds) {
            Ok(table) => {
                prop_assert_eq!(table.len(), 4096);
                prop_assert!(table.entries().iter().all(|&v| v <= 4095));
                prop_assert!(table.entries()[..5].iter().all(|&v| v == 0));
            }
            // Only possible when every level averages to the same voltage
            Err(e) => prop_assert!(
                matches!(e, CalibrationError::DegenerateInterpolation { .. }),
                "unexpected error {e}"
            ),
        }
    }

    #[test]
    fn reordering_samples_does_not_change_the_table(samples in any_capture()) {
        let p = CalibrationParams::default();
        let mut reversed = samples.clone();
        reversed.reverse();
        let a = generate_table(&CalibrationDataset::new(samples, p).unwrap());
        let b = generate_table(&CalibrationDataset::new(reversed, p).unwrap());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn increasing_points_give_non_decreasing_table(samples in increasing_capture()) {
        let ds = CalibrationDataset::new(samples, CalibrationParams::default()).unwrap();
        let table = generate_table(&ds).unwrap();
        prop_assert!(table.is_non_decreasing());
    }
}
