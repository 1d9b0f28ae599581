//! Amplitude lookup at arbitrary times.

use crate::capability::AmplitudeSampler;
use crate::track::Waveform;

/// Linear interpolation between the two samples around `time`.
///
/// Outside `[0, duration]` and for an empty waveform the amplitude is
/// undefined and `NaN` is returned.
///
/// # Example
/// ```
/// use glottis::capability::AmplitudeSampler;
/// use glottis::sampler::LinearSampler;
/// use glottis::Waveform;
///
/// let wave = Waveform::new(vec![0.0, 1.0, 0.0, -1.0], 4).unwrap();
/// let a = LinearSampler.amplitude_at(&wave, 0.125).unwrap();
/// assert!((a - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSampler;

impl AmplitudeSampler for LinearSampler {
    fn amplitude_at(&self, waveform: &Waveform, time: f64) -> crate::Result<f64> {
        let samples = waveform.samples();
        if samples.is_empty() || !(0.0..=waveform.duration()).contains(&time) {
            return Ok(f64::NAN);
        }

        let pos = time * waveform.sample_rate() as f64;
        let i = pos.floor() as usize;
        if i + 1 >= samples.len() {
            return Ok(samples[samples.len() - 1] as f64);
        }
        let frac = pos - i as f64;
        let (a, b) = (samples[i] as f64, samples[i + 1] as f64);
        Ok(a + (b - a) * frac)
    }
}
