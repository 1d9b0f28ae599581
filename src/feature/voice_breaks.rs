//! Voiced/unvoiced run-length segmentation.

use crate::result::FeatureMap;

/// Run-length summary of a voicing mask.
///
/// Durations are measured in frames; the `_seconds` helpers scale them by
/// the frame spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceBreaks {
    /// Voiced-to-unvoiced transitions
    pub breaks: usize,
    pub voiced_percentage: f64,
    pub unvoiced_percentage: f64,
    /// Lengths of voiced runs in frames, in order
    pub voiced_runs: Vec<usize>,
    /// Lengths of unvoiced runs in frames, in order
    pub unvoiced_runs: Vec<usize>,
}

impl VoiceBreaks {
    pub const FIELDS: [&'static str; 7] = [
        "voice_breaks_count",
        "voiced_percentage",
        "unvoiced_percentage",
        "avg_voiced_duration",
        "avg_unvoiced_duration",
        "voiced_segments_count",
        "unvoiced_segments_count",
    ];

    /// Average run durations in seconds, appended by [`Self::to_timed_map`].
    pub const TIMED_FIELDS: [&'static str; 2] =
        ["avg_voiced_duration_seconds", "avg_unvoiced_duration_seconds"];

    /// Mean voiced run length in frames, 0 without voiced runs.
    pub fn avg_voiced_duration(&self) -> f64 {
        mean_run(&self.voiced_runs)
    }

    /// Mean unvoiced run length in frames, 0 without unvoiced runs.
    pub fn avg_unvoiced_duration(&self) -> f64 {
        mean_run(&self.unvoiced_runs)
    }

    pub fn avg_voiced_duration_seconds(&self, frame_duration: f64) -> f64 {
        self.avg_voiced_duration() * frame_duration
    }

    pub fn avg_unvoiced_duration_seconds(&self, frame_duration: f64) -> f64 {
        self.avg_unvoiced_duration() * frame_duration
    }

    pub fn to_map(&self) -> FeatureMap {
        Self::FIELDS
            .into_iter()
            .zip([
                Some(self.breaks as f64),
                Some(self.voiced_percentage),
                Some(self.unvoiced_percentage),
                Some(self.avg_voiced_duration()),
                Some(self.avg_unvoiced_duration()),
                Some(self.voiced_runs.len() as f64),
                Some(self.unvoiced_runs.len() as f64),
            ])
            .collect()
    }

    /// [`Self::to_map`] plus run durations in seconds.
    pub fn to_timed_map(&self, frame_duration: f64) -> FeatureMap {
        let mut map = self.to_map();
        let [voiced, unvoiced] = Self::TIMED_FIELDS;
        map.insert(voiced, Some(self.avg_voiced_duration_seconds(frame_duration)));
        map.insert(unvoiced, Some(self.avg_unvoiced_duration_seconds(frame_duration)));
        map
    }

    /// Fields for a recording where segmentation was not possible.
    pub fn absent_map() -> FeatureMap {
        Self::FIELDS
            .into_iter()
            .chain(Self::TIMED_FIELDS)
            .map(|name| (name, None))
            .collect()
    }
}

fn mean_run(runs: &[usize]) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().sum::<usize>() as f64 / runs.len() as f64
}

/// Run-length encode a voicing mask.
///
/// Returns `None` for an empty mask.
///
/// # Example
/// ```
/// use glottis::feature::voice_breaks::voice_breaks;
///
/// let vb = voice_breaks(&[true, true, false, false, true, false]).unwrap();
/// assert_eq!(vb.breaks, 2);
/// assert_eq!(vb.voiced_runs, vec![2, 1]);
/// assert_eq!(vb.voiced_percentage, 50.0);
/// ```
pub fn voice_breaks(mask: &[bool]) -> Option<VoiceBreaks> {
    let (&first, rest) = mask.split_first()?;

    let mut voiced_runs = Vec::new();
    let mut unvoiced_runs = Vec::new();
    let mut breaks = 0usize;

    let mut current = first;
    let mut run = 1usize;
    for &v in rest {
        if v == current {
            run += 1;
            continue;
        }
        if current {
            voiced_runs.push(run);
            breaks += 1;
        } else {
            unvoiced_runs.push(run);
        }
        current = v;
        run = 1;
    }
    if current {
        voiced_runs.push(run);
    } else {
        unvoiced_runs.push(run);
    }

    let total = mask.len() as f64;
    let voiced = mask.iter().filter(|&&v| v).count() as f64;
    Some(VoiceBreaks {
        breaks,
        voiced_percentage: voiced / total * 100.0,
        unvoiced_percentage: (total - voiced) / total * 100.0,
        voiced_runs,
        unvoiced_runs,
    })
}
