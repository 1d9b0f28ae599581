//! Input data for a single recording: the pitch track and the waveform.

use ndarray::Array2;

/// Per-frame fundamental frequency estimates with uniform frame timing.
///
/// A frequency of `0.0` marks an unvoiced frame. Frame `i` sits at
/// `frame_start_time + i * frame_duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrack {
    frequencies: Vec<f64>,
    frame_start_time: f64,
    frame_duration: f64,
}

impl PitchTrack {
    /// Build a pitch track.
    ///
    /// # Arguments
    /// * `frequencies` - F0 per frame in Hz (0.0 for unvoiced)
    /// * `frame_start_time` - Time of the first frame in seconds
    /// * `frame_duration` - Spacing between frames in seconds
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if a frequency is negative or not
    /// finite, if the start time is not finite, or if the frame duration
    /// is not a positive finite number.
    ///
    /// # Example
    /// ```
    /// use glottis::PitchTrack;
    ///
    /// let track = PitchTrack::new(vec![0.0, 120.0, 121.0], 0.01, 0.01).unwrap();
    /// assert_eq!(track.voiced_count(), 2);
    /// assert!((track.frame_time(2) - 0.03).abs() < 1e-12);
    /// ```
    pub fn new(
        frequencies: Vec<f64>,
        frame_start_time: f64,
        frame_duration: f64,
    ) -> crate::Result<Self> {
        if let Some(&bad) = frequencies.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(crate::Error::InvalidParameter {
                name: "frequencies",
                value: bad.to_string(),
                reason: "must be finite and >= 0".into(),
            });
        }
        if !frame_start_time.is_finite() {
            return Err(crate::Error::InvalidParameter {
                name: "frame_start_time",
                value: frame_start_time.to_string(),
                reason: "must be finite".into(),
            });
        }
        if !(frame_duration.is_finite() && frame_duration > 0.0) {
            return Err(crate::Error::InvalidParameter {
                name: "frame_duration",
                value: frame_duration.to_string(),
                reason: "must be finite and > 0".into(),
            });
        }
        Ok(Self {
            frequencies,
            frame_start_time,
            frame_duration,
        })
    }

    /// F0 per frame in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn frame_start_time(&self) -> f64 {
        self.frame_start_time
    }

    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Time in seconds of frame `idx`.
    pub fn frame_time(&self, idx: usize) -> f64 {
        self.frame_start_time + idx as f64 * self.frame_duration
    }

    /// Boolean voicing decision per frame (`frequency > 0`).
    pub fn voiced_mask(&self) -> Vec<bool> {
        self.frequencies.iter().map(|&f| f > 0.0).collect()
    }

    /// Indices of voiced frames, in order.
    pub fn voiced_indices(&self) -> Vec<usize> {
        self.frequencies
            .iter()
            .enumerate()
            .filter(|(_, f)| **f > 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Frequencies of voiced frames, in order.
    pub fn voiced_frequencies(&self) -> Vec<f64> {
        self.frequencies.iter().copied().filter(|&f| f > 0.0).collect()
    }

    pub fn voiced_count(&self) -> usize {
        self.frequencies.iter().filter(|&&f| f > 0.0).count()
    }
}

/// A mono audio signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap mono samples.
    ///
    /// # Errors
    /// Returns `Error::InvalidSize` if `sample_rate` is 0.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> crate::Result<Self> {
        if sample_rate == 0 {
            return Err(crate::Error::InvalidSize {
                name: "sample_rate",
                value: 0,
                reason: "must be > 0",
            });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Downmix a `(channels, frames)` matrix by averaging channels.
    ///
    /// # Errors
    /// Returns `Error::InvalidSize` if the matrix has no channels or
    /// `sample_rate` is 0.
    pub fn from_channels(data: &Array2<f32>, sample_rate: u32) -> crate::Result<Self> {
        let (channels, frames) = (data.shape()[0], data.shape()[1]);
        if channels == 0 {
            return Err(crate::Error::InvalidSize {
                name: "channels",
                value: 0,
                reason: "must be > 0",
            });
        }
        let samples = (0..frames)
            .map(|frame| {
                let sum: f32 = (0..channels).map(|ch| data[(ch, frame)]).sum();
                sum / channels as f32
            })
            .collect();
        Self::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_track_rejects_negative_frequency() {
        let result = PitchTrack::new(vec![100.0, -1.0], 0.0, 0.01);
        assert!(matches!(
            result,
            Err(crate::Error::InvalidParameter { name: "frequencies", .. })
        ));
    }

    #[test]
    fn test_pitch_track_rejects_nan_frequency() {
        assert!(PitchTrack::new(vec![f64::NAN], 0.0, 0.01).is_err());
    }

    #[test]
    fn test_pitch_track_rejects_bad_timing() {
        assert!(PitchTrack::new(vec![100.0], 0.0, 0.0).is_err());
        assert!(PitchTrack::new(vec![100.0], 0.0, -0.01).is_err());
        assert!(PitchTrack::new(vec![100.0], f64::INFINITY, 0.01).is_err());
    }

    #[test]
    fn test_voiced_views() {
        let track = PitchTrack::new(vec![0.0, 110.0, 0.0, 220.0], 0.0, 0.01).unwrap();
        assert_eq!(track.voiced_mask(), vec![false, true, false, true]);
        assert_eq!(track.voiced_indices(), vec![1, 3]);
        assert_eq!(track.voiced_frequencies(), vec![110.0, 220.0]);
        assert_eq!(track.voiced_count(), 2);
        assert_eq!(track.len(), 4);
    }

    #[test]
    fn test_waveform_duration() {
        let wf = Waveform::new(vec![0.0; 8000], 16000).unwrap();
        assert_eq!(wf.duration(), 0.5);
        assert!(Waveform::new(vec![0.0], 0).is_err());
    }

    #[test]
    fn test_waveform_from_channels_averages() {
        let data = Array2::from_shape_vec((2, 3), vec![1.0, 0.0, -1.0, 0.0, 1.0, -1.0]).unwrap();
        let wf = Waveform::from_channels(&data, 8000).unwrap();
        assert_eq!(wf.samples(), &[0.5, 0.5, -1.0]);
    }
}
