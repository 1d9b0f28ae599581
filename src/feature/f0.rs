//! Summary statistics of the voiced F0 contour.

use crate::result::FeatureMap;
use crate::track::PitchTrack;
use crate::utils;

/// Raw statistics over voiced frames, all absent when nothing is voiced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct F0Stats {
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
    /// Population standard deviation
    pub std: Option<f64>,
}

impl F0Stats {
    pub const FIELDS: [&'static str; 5] = ["f0_mean", "f0_min", "f0_max", "f0_range", "f0_std"];

    /// Flatten into `f0_*` fields.
    pub fn to_map(&self) -> FeatureMap {
        Self::FIELDS
            .into_iter()
            .zip([self.mean, self.min, self.max, self.range, self.std])
            .collect()
    }
}

/// Compute F0 statistics over the voiced frames of a pitch track.
///
/// No smoothing or outlier rejection is applied.
///
/// # Example
/// ```
/// use glottis::PitchTrack;
/// use glottis::feature::f0::f0_statistics;
///
/// let track = PitchTrack::new(vec![0.0, 100.0, 150.0, 200.0, 0.0], 0.0, 0.01).unwrap();
/// let stats = f0_statistics(&track);
/// assert_eq!(stats.mean, Some(150.0));
/// assert_eq!(stats.range, Some(100.0));
/// ```
pub fn f0_statistics(track: &PitchTrack) -> F0Stats {
    let voiced = track.voiced_frequencies();
    let (Some(min), Some(max)) = (utils::min(&voiced), utils::max(&voiced)) else {
        return F0Stats::default();
    };
    F0Stats {
        mean: utils::mean(&voiced),
        min: Some(min),
        max: Some(max),
        range: Some(max - min),
        std: utils::pstd(&voiced),
    }
}
