//! Zero-crossing rate over the whole waveform and over equal segments.

use crate::result::FeatureMap;
use crate::utils;

/// Overall and segmental zero-crossing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZcrStats {
    pub overall: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ZcrStats {
    pub const FIELDS: [&'static str; 5] = ["zcr_overall", "zcr_mean", "zcr_std", "zcr_min", "zcr_max"];

    pub fn to_map(&self) -> FeatureMap {
        Self::FIELDS
            .into_iter()
            .zip([self.overall, self.mean, self.std, self.min, self.max])
            .collect()
    }
}

/// Sign changes normalised by twice the sample count.
///
/// Returns `None` for an empty signal.
///
/// # Example
/// ```
/// use glottis::feature::zcr::zero_crossing_ratio;
///
/// let y = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
/// assert_eq!(zero_crossing_ratio(&y), Some(0.4375)); // 7 / 16
/// ```
pub fn zero_crossing_ratio(y: &[f32]) -> Option<f64> {
    if y.is_empty() {
        return None;
    }
    Some(utils::sign_changes(y) as f64 / (2 * y.len()) as f64)
}

/// Split `len` samples into `n_segments` contiguous ranges.
///
/// Each range has `len / n_segments` samples except the last, which runs
/// to the end of the signal.
pub fn segment_bounds(len: usize, n_segments: usize) -> Vec<(usize, usize)> {
    if n_segments == 0 {
        return Vec::new();
    }
    let seg_len = len / n_segments;
    (0..n_segments)
        .map(|i| {
            let start = i * seg_len;
            let end = if i + 1 == n_segments { len } else { start + seg_len };
            (start, end)
        })
        .collect()
}

/// Zero-crossing statistics with `n_segments` segments.
///
/// Segments with one sample or fewer are left out of the segment
/// statistics. An empty signal gives all-absent fields.
pub fn zcr_statistics(y: &[f32], n_segments: usize) -> ZcrStats {
    let Some(overall) = zero_crossing_ratio(y) else {
        return ZcrStats::default();
    };

    let per_segment: Vec<f64> = segment_bounds(y.len(), n_segments)
        .into_iter()
        .filter(|(start, end)| end - start > 1)
        .filter_map(|(start, end)| zero_crossing_ratio(&y[start..end]))
        .collect();

    ZcrStats {
        overall: Some(overall),
        mean: utils::mean(&per_segment),
        std: utils::pstd(&per_segment),
        min: utils::min(&per_segment),
        max: utils::max(&per_segment),
    }
}
