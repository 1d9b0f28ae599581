//! Jitter and shimmer as coefficients of variation.
//!
//! Both estimates share the same reduction, `std / mean` over an operand
//! sampled at voiced frames. Jitter uses the voiced F0 values themselves;
//! shimmer uses the absolute waveform amplitude read at the time of each
//! voiced frame.

use crate::capability::AmplitudeSampler;
use crate::config::AnalysisConfig;
use crate::result::{Estimate, Reason};
use crate::track::{PitchTrack, Waveform};
use crate::utils;

fn cv_estimate(operand: &[f64]) -> Estimate {
    match utils::coefficient_of_variation(operand) {
        Some(cv) => Estimate::Value(cv),
        None => Estimate::NotComputed(Reason::ZeroMean),
    }
}

/// Jitter as the coefficient of variation of voiced F0.
///
/// Requires more than `config.perturbation_min_voiced` voiced frames.
///
/// # Example
/// ```
/// use glottis::{AnalysisConfig, PitchTrack};
/// use glottis::feature::perturbation::jitter_manual;
///
/// let track = PitchTrack::new(vec![100.0; 10], 0.0, 0.01).unwrap();
/// let jitter = jitter_manual(&track, &AnalysisConfig::default());
/// assert_eq!(jitter.value(), Some(0.0));
/// ```
pub fn jitter_manual(track: &PitchTrack, config: &AnalysisConfig) -> Estimate {
    let voiced = track.voiced_frequencies();
    if voiced.len() <= config.perturbation_min_voiced {
        return Estimate::NotComputed(Reason::InsufficientVoicedData {
            threshold: config.perturbation_min_voiced,
            found: voiced.len(),
        });
    }
    cv_estimate(&voiced)
}

/// Absolute amplitudes at voiced frame times inside the waveform.
///
/// Non-finite samples are dropped.
pub fn voiced_amplitudes(
    track: &PitchTrack,
    waveform: &Waveform,
    sampler: &dyn AmplitudeSampler,
) -> crate::Result<Vec<f64>> {
    let duration = waveform.duration();
    let mut amplitudes = Vec::new();
    for idx in track.voiced_indices() {
        let time = track.frame_time(idx);
        if time >= duration {
            continue;
        }
        let amplitude = sampler.amplitude_at(waveform, time)?;
        if amplitude.is_finite() {
            amplitudes.push(amplitude.abs());
        }
    }
    Ok(amplitudes)
}

/// Shimmer as the coefficient of variation of absolute amplitude at
/// voiced frame times.
///
/// Requires more than `config.perturbation_min_voiced` voiced frames and
/// more than `config.shimmer_min_amplitudes` finite amplitude samples. A
/// sampler failure yields `NotComputed(Upstream)`.
pub fn shimmer_manual(
    track: &PitchTrack,
    waveform: &Waveform,
    sampler: &dyn AmplitudeSampler,
    config: &AnalysisConfig,
) -> Estimate {
    let voiced = track.voiced_count();
    if voiced <= config.perturbation_min_voiced {
        return Estimate::NotComputed(Reason::InsufficientVoicedData {
            threshold: config.perturbation_min_voiced,
            found: voiced,
        });
    }

    let amplitudes = match voiced_amplitudes(track, waveform, sampler) {
        Ok(a) => a,
        Err(e) => return e.into(),
    };
    if amplitudes.len() <= config.shimmer_min_amplitudes {
        return Estimate::NotComputed(Reason::InsufficientAmplitudes {
            threshold: config.shimmer_min_amplitudes,
            found: amplitudes.len(),
        });
    }
    cv_estimate(&amplitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Returns the sample at the nearest index, NaN past the end.
    struct Nearest;

    impl AmplitudeSampler for Nearest {
        fn amplitude_at(&self, waveform: &Waveform, time: f64) -> crate::Result<f64> {
            let idx = (time * waveform.sample_rate() as f64).round() as usize;
            Ok(waveform
                .samples()
                .get(idx)
                .map(|&s| s as f64)
                .unwrap_or(f64::NAN))
        }
    }

    /// Reports `0.5` everywhere except NaN and infinity at chosen frames.
    struct Corrupted {
        nan: &'static [usize],
        inf: &'static [usize],
    }

    impl AmplitudeSampler for Corrupted {
        fn amplitude_at(&self, _: &Waveform, time: f64) -> crate::Result<f64> {
            let frame = (time / 0.01).round() as usize;
            Ok(if self.nan.contains(&frame) {
                f64::NAN
            } else if self.inf.contains(&frame) {
                f64::INFINITY
            } else {
                0.5
            })
        }
    }

    struct Failing;

    impl AmplitudeSampler for Failing {
        fn amplitude_at(&self, _: &Waveform, _: f64) -> crate::Result<f64> {
            Err(crate::Error::capability("amplitude sampler", "unavailable"))
        }
    }

    #[test]
    fn test_jitter_needs_more_than_five_frames() {
        let config = AnalysisConfig::default();
        let track = PitchTrack::new(vec![100.0, 300.0, 100.0, 300.0, 100.0], 0.0, 0.01).unwrap();
        assert_eq!(
            jitter_manual(&track, &config),
            Estimate::NotComputed(Reason::InsufficientVoicedData {
                threshold: 5,
                found: 5
            })
        );
    }

    #[test]
    fn test_jitter_zero_variance_is_exact_zero() {
        let track = PitchTrack::new(vec![100.0; 10], 0.0, 0.01).unwrap();
        let jitter = jitter_manual(&track, &AnalysisConfig::default());
        assert_eq!(jitter, Estimate::Value(0.0));
    }

    #[test]
    fn test_jitter_value() {
        let track = PitchTrack::new(vec![90.0, 110.0, 90.0, 110.0, 90.0, 110.0], 0.0, 0.01).unwrap();
        let jitter = jitter_manual(&track, &AnalysisConfig::default());
        assert_relative_eq!(jitter.value().unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_shimmer_samples_voiced_frame_times() {
        // 100 Hz sample rate, one frame per sample
        let samples: Vec<f32> = (0..10).map(|i| if i % 2 == 0 { 1.0 } else { -3.0 }).collect();
        let waveform = Waveform::new(samples, 100).unwrap();
        let track = PitchTrack::new(vec![120.0; 10], 0.0, 0.01).unwrap();
        let shimmer = shimmer_manual(&track, &waveform, &Nearest, &AnalysisConfig::default());
        // |amplitudes| alternate 1 and 3: mean 2, std 1
        assert_relative_eq!(shimmer.value().unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_shimmer_drops_frames_past_duration() {
        let waveform = Waveform::new(vec![0.5; 4], 100).unwrap();
        let track = PitchTrack::new(vec![120.0; 10], 0.0, 0.01).unwrap();
        let shimmer = shimmer_manual(&track, &waveform, &Nearest, &AnalysisConfig::default());
        assert_eq!(
            shimmer,
            Estimate::NotComputed(Reason::InsufficientAmplitudes {
                threshold: 5,
                found: 4
            })
        );
    }

    #[test]
    fn test_shimmer_drops_non_finite_amplitudes() {
        let waveform = Waveform::new(vec![0.5; 20], 100).unwrap();
        let config = AnalysisConfig::default();

        // 10 voiced frames, 3 unusable: 7 equal amplitudes remain
        let track = PitchTrack::new(vec![120.0; 10], 0.0, 0.01).unwrap();
        let sampler = Corrupted { nan: &[0, 2], inf: &[4] };
        assert_eq!(voiced_amplitudes(&track, &waveform, &sampler).unwrap().len(), 7);
        assert_eq!(shimmer_manual(&track, &waveform, &sampler, &config), Estimate::Value(0.0));

        // 8 voiced frames, 3 unusable: the amplitude gate sees 5
        let track = PitchTrack::new(vec![120.0; 8], 0.0, 0.01).unwrap();
        let sampler = Corrupted { nan: &[1, 3], inf: &[6] };
        assert_eq!(
            shimmer_manual(&track, &waveform, &sampler, &config),
            Estimate::NotComputed(Reason::InsufficientAmplitudes {
                threshold: 5,
                found: 5
            })
        );
    }

    #[test]
    fn test_shimmer_silent_waveform_has_zero_mean() {
        let waveform = Waveform::new(vec![0.0; 20], 100).unwrap();
        let track = PitchTrack::new(vec![120.0; 10], 0.0, 0.01).unwrap();
        let shimmer = shimmer_manual(&track, &waveform, &Nearest, &AnalysisConfig::default());
        assert_eq!(shimmer, Estimate::NotComputed(Reason::ZeroMean));
    }

    #[test]
    fn test_shimmer_sampler_failure_is_contained() {
        let waveform = Waveform::new(vec![0.5; 20], 100).unwrap();
        let track = PitchTrack::new(vec![120.0; 10], 0.0, 0.01).unwrap();
        let shimmer = shimmer_manual(&track, &waveform, &Failing, &AnalysisConfig::default());
        assert!(matches!(shimmer, Estimate::NotComputed(Reason::Upstream(_))));
    }

    #[test]
    fn test_shimmer_voiced_gate_runs_before_sampling() {
        let waveform = Waveform::new(vec![0.5; 20], 100).unwrap();
        let track = PitchTrack::new(vec![120.0, 0.0, 120.0], 0.0, 0.01).unwrap();
        let shimmer = shimmer_manual(&track, &waveform, &Failing, &AnalysisConfig::default());
        assert!(matches!(
            shimmer,
            Estimate::NotComputed(Reason::InsufficientVoicedData { found: 2, .. })
        ));
    }
}
