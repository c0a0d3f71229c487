//! Robust statistics with explicit masks
//!
//! Every reduction takes a `mask` slice where `true` excludes the lane.
//! Reductions over an empty selection return `None`.

/// Scale factor turning a MAD into a Gaussian standard deviation (1/Φ⁻¹(3/4))
pub const NMAD_SCALE: f64 = 1.482_602_218_505_602;

fn selected(values: &[f64], mask: &[bool]) -> Vec<f64> {
    values
        .iter()
        .zip(mask)
        .filter(|(_, &masked)| !masked)
        .map(|(&v, _)| v)
        .collect()
}

/// Median of an owned buffer (averages the two central values for even counts)
fn median_in_place(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(0.5 * (values[mid - 1] + values[mid]))
    } else {
        Some(values[mid])
    }
}

/// Median of the unmasked values
pub fn masked_median(values: &[f64], mask: &[bool]) -> Option<f64> {
    median_in_place(&mut selected(values, mask))
}

/// Normalized median absolute deviation of the unmasked values
///
/// # Returns
/// `NMAD_SCALE * median(|x - median(x)|)`, an estimate of σ for
/// Gaussian-distributed data that ignores sparse outliers
pub fn masked_nmad(values: &[f64], mask: &[bool]) -> Option<f64> {
    let mut kept = selected(values, mask);
    let center = median_in_place(&mut kept)?;

    let mut deviations: Vec<f64> = kept.iter().map(|&v| (v - center).abs()).collect();
    median_in_place(&mut deviations).map(|mad| NMAD_SCALE * mad)
}

/// Arithmetic mean of the unmasked values
pub fn masked_mean(values: &[f64], mask: &[bool]) -> Option<f64> {
    let kept = selected(values, mask);
    if kept.is_empty() {
        return None;
    }
    Some(kept.iter().sum::<f64>() / kept.len() as f64)
}

/// Population standard deviation (ddof = 0) of the unmasked values
pub fn masked_std(values: &[f64], mask: &[bool]) -> Option<f64> {
    let kept = selected(values, mask);
    let mean = masked_mean(&kept, &vec![false; kept.len()])?;
    let var = kept.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / kept.len() as f64;
    Some(var.sqrt())
}

/// Median over all values
pub fn median(values: &[f64]) -> Option<f64> {
    median_in_place(&mut values.to_vec())
}

/// Standard deviation over all values
pub fn std_dev(values: &[f64]) -> Option<f64> {
    masked_std(values, &vec![false; values.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_masked_median_skips_masked_lanes() {
        let values = [1.0, 100.0, 2.0, 3.0];
        let mask = [false, true, false, false];
        assert_eq!(masked_median(&values, &mask), Some(2.0));
        assert_eq!(masked_median(&values, &[true; 4]), None);
    }

    #[test]
    fn test_nmad_ignores_outlier() {
        // MAD of [1, 2, 3, 4, 1000] around median 3 is median([2, 1, 0, 1, 997]) = 1
        let values = [1.0, 2.0, 3.0, 4.0, 1000.0];
        let nmad = masked_nmad(&values, &[false; 5]).unwrap();
        assert!((nmad - NMAD_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(masked_mean(&values, &[false; 8]), Some(5.0));
        assert!((std_dev(&values).unwrap() - 2.0).abs() < 1e-12);
    }
}
