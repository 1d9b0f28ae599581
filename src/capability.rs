//! Narrow interfaces to the acoustic-analysis backends the engine relies on.
//!
//! The engine only needs three things from a backend: a pitch track for a
//! waveform, a short-time power spectrum at a point in time, and the
//! amplitude of the waveform at a point in time. Any backend can plug in by
//! implementing these traits; [`crate::pitch::YinTracker`],
//! [`crate::spectrum::StftSpectrum`] and [`crate::sampler::LinearSampler`]
//! are the built-in ones.

use crate::result::Family;
use crate::track::{PitchTrack, Waveform};

/// Produces a per-frame F0 track from a waveform.
pub trait PitchTracker: Send + Sync {
    fn track(&self, waveform: &Waveform) -> crate::Result<PitchTrack>;
}

/// A power spectrum: parallel arrays of bin frequency (Hz) and power.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub powers: Vec<f64>,
}

impl Spectrum {
    /// Iterate over `(frequency, power)` bins.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.powers.iter().copied())
    }
}

/// Computes a short-time spectrum around a given time.
pub trait SpectrumProvider: Send + Sync {
    /// `Ok(None)` means no spectrum is available at `time`.
    fn spectrum_at(&self, waveform: &Waveform, time: f64) -> crate::Result<Option<Spectrum>>;
}

/// Reads the waveform amplitude at a given time.
pub trait AmplitudeSampler: Send + Sync {
    /// May return NaN when no value is defined at `time`.
    fn amplitude_at(&self, waveform: &Waveform, time: f64) -> crate::Result<f64>;
}

/// An additional estimator contributed by a backend, such as a
/// library-native jitter or HNR variant.
///
/// Each method is reported as its own field next to the built-in
/// estimates; its failure only blanks its own field.
pub trait ExternalMethod: Send + Sync {
    /// Field name in the result map, e.g. `"jitter_local"`.
    fn name(&self) -> &str;

    /// The feature family the field belongs to.
    fn family(&self) -> Family;

    fn compute(&self, track: &PitchTrack, waveform: &Waveform) -> crate::Result<f64>;
}
