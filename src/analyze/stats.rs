//! Outlier-robust statistics used to normalize raw counts against a
//! calibration sample.
//!
//! robust_z = asinh((x - median) / (1.4826 * MAD))
//!
//! The asinh keeps small deviations roughly linear but compresses large ones
//! logarithmically, so one extreme value (in the input or in the sample) moves
//! the result by a bounded amount.

/// Consistency constant: makes MAD comparable to a standard deviation for
/// normally distributed data.
pub const MAD_SCALE: f64 = 1.4826;

/// Median of a sample; 0 for an empty one. The input is not reordered.
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation. Never 0: degenerate samples report 1.
pub fn mad(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 1.0;
    }
    let m = median(xs);
    let deviations: Vec<f64> = xs.iter().map(|x| (x - m).abs()).collect();
    let d = median(&deviations);
    if d == 0.0 {
        1.0
    } else {
        d
    }
}

/// asinh-compressed z-score of `x` against `sample`.
pub fn robust_z(x: f64, sample: &[f64]) -> f64 {
    let m = median(sample);
    let mut scale = MAD_SCALE * mad(sample);
    if scale == 0.0 {
        scale = 1.0;
    }
    ((x - m) / scale).asinh()
}

/// Clamp into `[lo, hi]`. NaN collapses to 0 (then clamped) so downstream
/// sums stay finite.
pub fn clip(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() {
        return 0.0_f64.max(lo).min(hi);
    }
    x.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_even_empty() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn median_does_not_mutate_input() {
        let xs = vec![5.0, 1.0, 4.0];
        let _ = median(&xs);
        assert_eq!(xs, vec![5.0, 1.0, 4.0]);
    }

    #[test]
    fn mad_defaults_to_one_when_degenerate() {
        assert_eq!(mad(&[]), 1.0);
        assert_eq!(mad(&[7.0, 7.0, 7.0]), 1.0);
        // deviations from 3: [2,1,0,1,2] -> median 1
        assert_eq!(mad(&[1.0, 2.0, 3.0, 4.0, 5.0]), 1.0);
        // deviations from 20: [10,0,10] -> 10
        assert_eq!(mad(&[10.0, 20.0, 30.0]), 10.0);
    }

    #[test]
    fn robust_z_at_median_is_zero() {
        for sample in [
            vec![1.0],
            vec![1.0, 2.0],
            vec![1.0, 5.0, 10.0, 50.0, 100.0],
            vec![-3.0, 0.0, 0.0, 9.5],
        ] {
            assert_eq!(robust_z(median(&sample), &sample), 0.0);
        }
    }

    #[test]
    fn robust_z_sign_follows_deviation() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(robust_z(10.0, &s) > 0.0);
        assert!(robust_z(-10.0, &s) < 0.0);
    }

    #[test]
    fn extreme_input_grows_only_logarithmically() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        let big = robust_z(1e6, &s);
        let huge = robust_z(1e12, &s);
        // six orders of magnitude on the input add ~ln(1e6) ≈ 13.8 on the output
        assert!(huge - big < 14.0, "big={big} huge={huge}");
        assert!(huge.is_finite());
    }

    #[test]
    fn single_outlier_in_sample_has_bounded_effect() {
        let clean = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let mut dirty = clean.to_vec();
        dirty[6] = 1e9;
        for x in [0.0, 4.0, 10.0, 100.0] {
            let delta = (robust_z(x, &clean) - robust_z(x, &dirty)).abs();
            assert!(delta < 0.5, "x={x} delta={delta}");
        }
    }

    #[test]
    fn clip_bounds_and_nan() {
        assert_eq!(clip(1_000_000.0, -3.0, 3.0), 3.0);
        assert_eq!(clip(-1_000_000.0, -3.0, 3.0), -3.0);
        assert_eq!(clip(1.25, -3.0, 3.0), 1.25);
        assert_eq!(clip(f64::NAN, -3.0, 3.0), 0.0);
        assert_eq!(clip(f64::INFINITY, -3.0, 3.0), 3.0);
    }
}
