// SPDX-License-Identifier: Apache-2.0

use hdviz_store::{normalize, rescale_widths, WIDTH_OFFSET, WIDTH_SPAN};
use proptest::prelude::*;
use proptest::test_runner::Config;

const EPS: f64 = 1e-9;

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn rescaled_widths_stay_inside_the_band(
        widths in proptest::collection::vec(0.0_f64..1.0e6, 1..64)
    ) {
        let max = widths.iter().copied().fold(0.0_f64, f64::max);
        let scaled = rescale_widths(&widths, max);
        prop_assert_eq!(scaled.len(), widths.len());
        for w in scaled {
            prop_assert!(w >= WIDTH_OFFSET - EPS, "{w}");
            prop_assert!(w <= WIDTH_OFFSET + WIDTH_SPAN + EPS, "{w}");
        }
    }

    #[test]
    fn non_positive_width_max_leaves_only_the_offset(
        widths in proptest::collection::vec(-1.0e3_f64..1.0e3, 0..32),
        max in -1.0e3_f64..=0.0
    ) {
        for w in rescale_widths(&widths, max) {
            prop_assert_eq!(w, WIDTH_OFFSET);
        }
    }

    #[test]
    fn values_inside_the_range_normalize_onto_unit_interval(
        min in -1.0e3_f64..1.0e3,
        span in 1.0e-3_f64..1.0e3,
        fractions in proptest::collection::vec(0.0_f64..=1.0, 0..64)
    ) {
        let values: Vec<f64> = fractions.iter().map(|f| min + f * span).collect();
        for v in normalize(&values, min, min + span) {
            prop_assert!((-EPS..=1.0 + EPS).contains(&v), "{v}");
        }
    }

    #[test]
    fn flat_range_normalizes_to_zero(
        at in -1.0e3_f64..1.0e3,
        values in proptest::collection::vec(-1.0e3_f64..1.0e3, 0..32)
    ) {
        prop_assert!(normalize(&values, at, at).iter().all(|v| *v == 0.0));
    }
}
