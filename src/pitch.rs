//! YIN fundamental frequency tracking.
//!
//! The difference function is evaluated through an FFT autocorrelation, so a
//! frame costs `O(n log n)` instead of `O(n * max_lag)`.

use crate::capability::PitchTracker;
use crate::fft::FftPlan;
use crate::track::{PitchTrack, Waveform};

/// Configuration for YIN pitch estimation.
///
/// # Example
/// ```
/// use glottis::pitch::YinConfig;
///
/// let config = YinConfig::default()
///     .with_fmin(60.0)
///     .with_fmax(400.0);
/// assert_eq!(config.frame_length, 2048);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YinConfig {
    /// Length of analysis frames in samples
    pub frame_length: usize,
    /// Number of samples between frames
    pub hop_length: usize,
    /// Minimum frequency to consider in Hz
    pub fmin: f64,
    /// Maximum frequency to consider in Hz
    pub fmax: f64,
    /// CMNDF threshold for the first-dip search
    pub threshold: f64,
}

impl Default for YinConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            fmin: 75.0,
            fmax: 600.0,
            threshold: 0.1,
        }
    }
}

impl YinConfig {
    pub fn with_frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    pub fn with_hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = hop_length;
        self
    }

    pub fn with_fmin(mut self, fmin: f64) -> Self {
        self.fmin = fmin;
        self
    }

    pub fn with_fmax(mut self, fmax: f64) -> Self {
        self.fmax = fmax;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Check the sample-rate independent constraints.
    pub fn validate(&self) -> crate::Result<()> {
        if self.frame_length < 4 {
            return Err(crate::Error::InvalidSize {
                name: "frame_length",
                value: self.frame_length,
                reason: "must be >= 4",
            });
        }
        if self.hop_length == 0 {
            return Err(crate::Error::InvalidSize {
                name: "hop_length",
                value: 0,
                reason: "must be > 0",
            });
        }
        if !(self.fmin.is_finite() && self.fmin > 0.0) {
            return Err(crate::Error::InvalidParameter {
                name: "fmin",
                value: self.fmin.to_string(),
                reason: "must be finite and > 0".into(),
            });
        }
        if !(self.fmax.is_finite() && self.fmax > self.fmin) {
            return Err(crate::Error::InvalidParameter {
                name: "fmax",
                value: self.fmax.to_string(),
                reason: format!("must be finite and > fmin ({})", self.fmin),
            });
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(crate::Error::InvalidParameter {
                name: "threshold",
                value: self.threshold.to_string(),
                reason: "must be in (0, 1)".into(),
            });
        }
        Ok(())
    }

    /// Lag search range `[tau_min, tau_max)` in samples at `sr`.
    fn lag_range(&self, sr: u32) -> crate::Result<(usize, usize)> {
        let sr = sr as f64;
        let tau_min = ((sr / self.fmax).floor() as usize).max(1);
        let tau_max = (sr / self.fmin).ceil() as usize + 1;
        if tau_max > self.frame_length / 2 || tau_min + 2 > tau_max {
            return Err(crate::Error::InvalidParameter {
                name: "frame_length",
                value: self.frame_length.to_string(),
                reason: format!("too short to cover fmin {} Hz at {} Hz", self.fmin, sr),
            });
        }
        Ok((tau_min, tau_max))
    }
}

/// [`PitchTracker`] backed by [`yin`].
///
/// # Example
/// ```
/// use glottis::capability::PitchTracker;
/// use glottis::pitch::YinTracker;
/// use glottis::{Waveform, io};
///
/// let wave = Waveform::new(io::tone(220.0, 16000, 0.5), 16000).unwrap();
/// let track = YinTracker::default().track(&wave).unwrap();
/// let f0 = track.voiced_frequencies();
/// assert!(!f0.is_empty());
/// assert!(f0.iter().all(|f| (f - 220.0).abs() < 5.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YinTracker {
    config: YinConfig,
}

impl YinTracker {
    pub fn new(config: YinConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &YinConfig {
        &self.config
    }
}

impl PitchTracker for YinTracker {
    fn track(&self, waveform: &Waveform) -> crate::Result<PitchTrack> {
        let sr = waveform.sample_rate();
        let f0 = yin(waveform.samples(), sr, &self.config)?;
        let sr = sr as f64;
        PitchTrack::new(
            f0,
            (self.config.frame_length / 2) as f64 / sr,
            self.config.hop_length as f64 / sr,
        )
    }
}

/// YIN pitch estimation.
///
/// Frame `i` covers samples `[i * hop, i * hop + frame_length)`; a signal
/// shorter than one frame yields a single partial frame.
///
/// # Returns
/// F0 per frame in Hz, `0.0` where no pitch was detected.
///
/// # Errors
/// Returns `Error::EmptyAudio` / `Error::NonFiniteAudio` for an empty or
/// non-finite signal and `Error::InvalidParameter` / `Error::InvalidSize`
/// for a bad config.
pub fn yin(y: &[f32], sr: u32, config: &YinConfig) -> crate::Result<Vec<f64>> {
    crate::utils::valid_audio(y)?;
    config.validate()?;
    let (tau_min, tau_max) = config.lag_range(sr)?;

    let frame_length = config.frame_length;
    let hop = config.hop_length;
    let n_frames = y.len().saturating_sub(frame_length) / hop + 1;
    let plan = FftPlan::new(frame_length.next_power_of_two() * 2);

    let f0 = (0..n_frames)
        .map(|idx| {
            let start = idx * hop;
            let end = (start + frame_length).min(y.len());
            let frame = &y[start..end];
            if frame.len() < 2 * tau_max {
                return 0.0;
            }
            let cmndf = cmndf(&difference(&plan, frame, tau_max));
            match first_dip(&cmndf, tau_min, config.threshold) {
                Some(tau) => {
                    let period = tau as f64 + parabolic_shift(&cmndf, tau);
                    let freq = sr as f64 / period;
                    if freq >= config.fmin && freq <= config.fmax {
                        freq
                    } else {
                        0.0
                    }
                }
                None => 0.0,
            }
        })
        .collect();

    Ok(f0)
}

/// `d(tau) = sum_j (x[j] - x[j + tau])^2` for `tau < max_lag`.
fn difference(plan: &FftPlan, frame: &[f32], max_lag: usize) -> Vec<f64> {
    let n = frame.len();
    let r = plan.autocorrelate(frame, max_lag);

    let mut energy = Vec::with_capacity(n + 1);
    energy.push(0.0f64);
    let mut acc = 0.0f64;
    for &v in frame {
        acc += v as f64 * v as f64;
        energy.push(acc);
    }

    r.iter()
        .enumerate()
        .map(|(tau, &r_tau)| {
            let head = energy[n - tau];
            let tail = energy[n] - energy[tau];
            (head + tail - 2.0 * r_tau as f64).max(0.0)
        })
        .collect()
}

/// Cumulative mean normalized difference function.
fn cmndf(diff: &[f64]) -> Vec<f64> {
    let mut out = vec![1.0; diff.len()];
    let mut running = 0.0;
    for tau in 1..diff.len() {
        running += diff[tau];
        if running > 0.0 {
            out[tau] = diff[tau] * tau as f64 / running;
        }
    }
    out
}

/// First lag below `threshold`, followed down to its local minimum.
fn first_dip(cmndf: &[f64], tau_min: usize, threshold: f64) -> Option<usize> {
    let mut tau = (tau_min..cmndf.len()).find(|&t| cmndf[t] < threshold)?;
    while tau + 1 < cmndf.len() && cmndf[tau + 1] < cmndf[tau] {
        tau += 1;
    }
    Some(tau)
}

fn parabolic_shift(cmndf: &[f64], tau: usize) -> f64 {
    if tau == 0 || tau + 1 >= cmndf.len() {
        return 0.0;
    }
    let (s0, s1, s2) = (cmndf[tau - 1], cmndf[tau], cmndf[tau + 1]);
    let denom = s0 - 2.0 * s1 + s2;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    let shift = 0.5 * (s0 - s2) / denom;
    if shift.abs() <= 1.0 { shift } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::tone;
    use approx::assert_relative_eq;

    #[test]
    fn test_difference_matches_direct_sum() {
        let frame: Vec<f32> = (0..64).map(|i| ((i * 7 % 11) as f32 - 5.0) / 5.0).collect();
        let plan = FftPlan::new(128);
        let d = difference(&plan, &frame, 20);
        for (tau, &got) in d.iter().enumerate() {
            let expected: f64 = (0..frame.len() - tau)
                .map(|j| {
                    let delta = (frame[j] - frame[j + tau]) as f64;
                    delta * delta
                })
                .sum();
            assert_relative_eq!(got, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_yin_sine() {
        let y = tone(150.0, 16000, 1.0);
        let f0 = yin(&y, 16000, &YinConfig::default()).unwrap();
        assert_eq!(f0.len(), (16000 - 2048) / 512 + 1);
        for f in f0 {
            assert_relative_eq!(f, 150.0, epsilon = 2.0);
        }
    }

    #[test]
    fn test_yin_silence_is_unvoiced() {
        let f0 = yin(&vec![0.0; 8000], 16000, &YinConfig::default()).unwrap();
        assert!(f0.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_estimates_stay_in_range() {
        // 1 kHz is above fmax; only subharmonics may be reported
        let y = tone(1000.0, 16000, 0.5);
        let f0 = yin(&y, 16000, &YinConfig::default()).unwrap();
        assert!(f0.iter().all(|&f| f == 0.0 || (75.0..=600.0).contains(&f)));
    }

    #[test]
    fn test_short_signal_single_frame() {
        let y = tone(200.0, 16000, 0.01);
        let f0 = yin(&y, 16000, &YinConfig::default()).unwrap();
        assert_eq!(f0, vec![0.0]);
    }

    #[test]
    fn test_tracker_frame_timing() {
        let wave = Waveform::new(tone(200.0, 16000, 0.5), 16000).unwrap();
        let track = YinTracker::default().track(&wave).unwrap();
        assert_relative_eq!(track.frame_start_time(), 1024.0 / 16000.0);
        assert_relative_eq!(track.frame_duration(), 512.0 / 16000.0);
    }

    #[test]
    fn test_invalid_config() {
        assert!(YinTracker::new(YinConfig::default().with_hop_length(0)).is_err());
        assert!(YinTracker::new(YinConfig::default().with_fmax(50.0)).is_err());
        assert!(YinTracker::new(YinConfig::default().with_threshold(0.0)).is_err());
        // fmin of 5 Hz needs a lag longer than half a 2048-sample frame
        let short = YinConfig::default().with_fmin(5.0);
        assert!(yin(&tone(200.0, 16000, 0.5), 16000, &short).is_err());
    }

    #[test]
    fn test_non_finite_input() {
        let mut y = tone(200.0, 16000, 0.5);
        y[100] = f32::NAN;
        assert!(matches!(
            yin(&y, 16000, &YinConfig::default()),
            Err(crate::Error::NonFiniteAudio)
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            yin(&[], 16000, &YinConfig::default()),
            Err(crate::Error::EmptyAudio)
        ));
    }
}
