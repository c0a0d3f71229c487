//! Local-maximum peak finding on a sampled curve

/// Find local maxima of a curve
///
/// A peak is a sample (or the middle of a flat run) strictly higher than
/// the samples on both sides. The first and last samples are never peaks.
///
/// # Arguments
/// * `curve` - Sampled values; NaN never forms a peak
/// * `min_distance` - Minimum index separation; the higher peak wins
/// * `min_prominence` - Minimum height above the higher of the two bases
///
/// # Returns
/// Peak indices in increasing order
pub fn find_peaks(curve: &[f64], min_distance: usize, min_prominence: f64) -> Vec<usize> {
    let mut peaks = local_maxima(curve);

    if min_prominence > 0.0 {
        peaks.retain(|&p| prominence(curve, p) >= min_prominence);
    }

    if min_distance > 1 && peaks.len() > 1 {
        peaks = enforce_distance(curve, &peaks, min_distance);
    }

    peaks
}

fn local_maxima(curve: &[f64]) -> Vec<usize> {
    let n = curve.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < n - 1 {
        if curve[i - 1] < curve[i] {
            // Walk across a plateau
            let mut j = i;
            while j + 1 < n && curve[j + 1] == curve[i] {
                j += 1;
            }
            if j + 1 < n && curve[j + 1] < curve[i] {
                peaks.push((i + j) / 2);
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }

    peaks
}

/// Height of a peak above the higher of its two bases
///
/// Each base is the lowest sample between the peak and the nearest
/// strictly higher sample (or the curve end) on that side.
fn prominence(curve: &[f64], peak: usize) -> f64 {
    let height = curve[peak];

    let mut left_min = height;
    for &v in curve[..peak].iter().rev() {
        if v > height {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = height;
    for &v in &curve[peak + 1..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }

    height - left_min.max(right_min)
}

fn enforce_distance(curve: &[f64], peaks: &[usize], min_distance: usize) -> Vec<usize> {
    // Highest first; equal heights keep index order
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| curve[peaks[b]].total_cmp(&curve[peaks[a]]));

    let mut keep = vec![true; peaks.len()];
    for &k in &order {
        if !keep[k] {
            continue;
        }
        for (other, flag) in keep.iter_mut().enumerate() {
            if other != k && peaks[other].abs_diff(peaks[k]) < min_distance {
                *flag = false;
            }
        }
    }

    peaks
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &kept)| kept.then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_maxima() {
        assert_eq!(find_peaks(&[0.0, 1.0, 0.0, 2.0, 0.0], 1, 0.0), vec![1, 3]);
        assert!(find_peaks(&[1.0, 1.0, 1.0, 1.0], 1, 0.0).is_empty());
        assert!(find_peaks(&[0.0, 1.0], 1, 0.0).is_empty());
    }

    #[test]
    fn test_endpoints_are_not_peaks() {
        assert!(find_peaks(&[3.0, 1.0, 2.0], 1, 0.0).is_empty());
        assert!(find_peaks(&[0.0, 1.0, 2.0], 1, 0.0).is_empty());
        assert!(find_peaks(&[0.0, 1.0, 1.0], 1, 0.0).is_empty());
    }

    #[test]
    fn test_plateau_midpoint() {
        assert_eq!(find_peaks(&[0.0, 1.0, 1.0, 1.0, 0.0], 1, 0.0), vec![2]);
        assert_eq!(find_peaks(&[0.0, 1.0, 1.0, 0.0], 1, 0.0), vec![1]);
        // A plateau that rises again is a shoulder, not a peak
        assert!(find_peaks(&[0.0, 1.0, 1.0, 2.0], 1, 0.0).is_empty());
    }

    #[test]
    fn test_nan_never_peaks() {
        assert_eq!(find_peaks(&[0.0, f64::NAN, 0.0, 1.0, 0.0], 1, 0.0), vec![3]);
    }

    #[test]
    fn test_prominence_filter() {
        let curve = [0.0, 5.0, 4.0, 6.0, 0.0];
        assert!((prominence(&curve, 1) - 1.0).abs() < 1e-12);
        assert!((prominence(&curve, 3) - 6.0).abs() < 1e-12);

        assert_eq!(find_peaks(&curve, 1, 0.0), vec![1, 3]);
        assert_eq!(find_peaks(&curve, 1, 2.0), vec![3]);
    }

    #[test]
    fn test_distance_keeps_highest() {
        let curve = [0.0, 3.0, 0.0, 5.0, 0.0, 4.0, 0.0];
        assert_eq!(find_peaks(&curve, 2, 0.0), vec![1, 3, 5]);
        assert_eq!(find_peaks(&curve, 3, 0.0), vec![3]);

        // Equal heights: the earlier peak wins
        let twins = [0.0, 2.0, 0.0, 2.0, 0.0];
        assert_eq!(find_peaks(&twins, 3, 0.0), vec![1]);
    }

    proptest! {
        #[test]
        fn test_peaks_are_local_maxima(
            curve in prop::collection::vec(-100.0f64..100.0, 0..200),
            distance in 1usize..10,
        ) {
            let peaks = find_peaks(&curve, distance, 0.0);

            for w in peaks.windows(2) {
                prop_assert!(w[0] < w[1]);
                prop_assert!(w[1] - w[0] >= distance);
            }
            for &p in &peaks {
                prop_assert!(p > 0 && p + 1 < curve.len());
                prop_assert!(curve[p] >= curve[p - 1]);
                prop_assert!(curve[p] >= curve[p + 1]);
            }
        }
    }
}
