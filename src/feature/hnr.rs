//! Harmonics-to-noise ratio from a harmonic/noise partition of the
//! short-time spectrum at sampled voiced frames.

use crate::capability::{Spectrum, SpectrumProvider};
use crate::config::AnalysisConfig;
use crate::result::{Estimate, Reason};
use crate::track::{PitchTrack, Waveform};

/// Harmonic and noise power of one spectrum relative to `f0`.
///
/// A bin is harmonic when its nearest harmonic number `h = round(freq / f0)`
/// satisfies `1 <= h <= max_harmonic` and the bin lies within
/// `tolerance * f0` of `h * f0`. Everything else, including DC and bins
/// below `f0 / 2`, is noise.
///
/// # Returns
/// `(harmonic_power, noise_power)`
pub fn partition_power(
    spectrum: &Spectrum,
    f0: f64,
    max_harmonic: u32,
    tolerance: f64,
) -> (f64, f64) {
    let mut harmonic = 0.0f64;
    let mut noise = 0.0f64;
    for (freq, power) in spectrum.bins() {
        let h = (freq / f0).round_ties_even();
        if h >= 1.0 && h <= max_harmonic as f64 && (freq - h * f0).abs() < f0 * tolerance {
            harmonic += power;
        } else {
            noise += power;
        }
    }
    (harmonic, noise)
}

/// HNR in dB for one spectrum.
///
/// `None` when there is no noise power. A frame with noise but no
/// harmonic power yields `-inf`.
pub fn frame_hnr(spectrum: &Spectrum, f0: f64, max_harmonic: u32, tolerance: f64) -> Option<f64> {
    let (harmonic, noise) = partition_power(spectrum, f0, max_harmonic, tolerance);
    if noise > 0.0 {
        Some(10.0 * (harmonic / noise).log10())
    } else {
        None
    }
}

/// Voiced frame indices selected for spectral evaluation.
///
/// Takes every `max(1, count / max_points)`-th voiced frame.
pub fn evaluation_frames(track: &PitchTrack, max_points: usize) -> Vec<usize> {
    let voiced = track.voiced_indices();
    let stride = (voiced.len() / max_points.max(1)).max(1);
    voiced.into_iter().step_by(stride).collect()
}

/// Mean spectral HNR (dB) over a subsample of voiced frames.
///
/// Requires more than `config.hnr_min_voiced` voiced frames. Points past
/// the end of the waveform, points without a spectrum and frames without
/// noise power are skipped. A provider error yields `NotComputed(Upstream)`.
///
/// # Example
/// ```
/// use glottis::{AnalysisConfig, PitchTrack, Waveform};
/// use glottis::feature::hnr::hnr_manual;
/// use glottis::spectrum::StftSpectrum;
///
/// let sr = 16000;
/// let samples: Vec<f32> = (0..sr)
///     .map(|i| (2.0 * std::f32::consts::PI * 200.0 * i as f32 / sr as f32).sin())
///     .collect();
/// let waveform = Waveform::new(samples, sr as u32).unwrap();
/// let track = PitchTrack::new(vec![200.0; 90], 0.05, 0.01).unwrap();
///
/// let hnr = hnr_manual(&track, &waveform, &StftSpectrum::default(), &AnalysisConfig::default());
/// assert!(hnr.value().unwrap() > 10.0);
/// ```
pub fn hnr_manual(
    track: &PitchTrack,
    waveform: &Waveform,
    provider: &dyn SpectrumProvider,
    config: &AnalysisConfig,
) -> Estimate {
    let voiced = track.voiced_count();
    if voiced <= config.hnr_min_voiced {
        return Estimate::NotComputed(Reason::InsufficientVoicedData {
            threshold: config.hnr_min_voiced,
            found: voiced,
        });
    }

    let duration = waveform.duration();
    let frequencies = track.frequencies();
    let mut values = Vec::new();
    for idx in evaluation_frames(track, config.hnr_max_points) {
        let time = track.frame_time(idx);
        if time >= duration {
            continue;
        }
        let spectrum = match provider.spectrum_at(waveform, time) {
            Ok(Some(s)) => s,
            Ok(None) => continue,
            Err(e) => return e.into(),
        };
        let f0 = frequencies[idx];
        if f0 <= 0.0 {
            continue;
        }
        if let Some(hnr) = frame_hnr(&spectrum, f0, config.hnr_max_harmonic, config.hnr_tolerance) {
            values.push(hnr);
        }
    }

    match crate::utils::mean(&values) {
        Some(m) => Estimate::Value(m),
        None => Estimate::NotComputed(Reason::NoUsableFrames),
    }
}
