//! Short-time power spectrum at an arbitrary point in time.

use crate::capability::{Spectrum, SpectrumProvider};
use crate::fft::rfft;
use crate::track::Waveform;
use crate::window::WindowType;

/// Configuration for [`StftSpectrum`].
#[derive(Debug, Clone, PartialEq)]
pub struct StftSpectrumConfig {
    /// Analysis window length in seconds
    pub window_seconds: f64,
    pub window: WindowType,
}

impl Default for StftSpectrumConfig {
    fn default() -> Self {
        Self {
            window_seconds: 0.1,
            window: WindowType::Hann,
        }
    }
}

impl StftSpectrumConfig {
    pub fn with_window_seconds(mut self, window_seconds: f64) -> Self {
        self.window_seconds = window_seconds;
        self
    }

    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.window_seconds.is_finite() && self.window_seconds > 0.0) {
            return Err(crate::Error::InvalidParameter {
                name: "window_seconds",
                value: self.window_seconds.to_string(),
                reason: "must be finite and > 0".into(),
            });
        }
        Ok(())
    }
}

/// Windowed-FFT [`SpectrumProvider`].
///
/// The analysis window is centred on the requested time and zero-padded
/// where it overhangs the signal. `n_fft` is the next power of two at or
/// above the window length; bin `k` sits at `k * sr / n_fft` Hz and holds
/// `|X[k]|^2`.
///
/// # Example
/// ```
/// use glottis::capability::SpectrumProvider;
/// use glottis::spectrum::StftSpectrum;
/// use glottis::{Waveform, io};
///
/// let wave = Waveform::new(io::tone(500.0, 8000, 1.0), 8000).unwrap();
/// let spec = StftSpectrum::default().spectrum_at(&wave, 0.5).unwrap().unwrap();
/// let (peak, _) = spec
///     .bins()
///     .max_by(|a, b| a.1.total_cmp(&b.1))
///     .unwrap();
/// assert!((peak - 500.0).abs() < 8000.0 / 1024.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StftSpectrum {
    config: StftSpectrumConfig,
}

impl StftSpectrum {
    pub fn new(config: StftSpectrumConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StftSpectrumConfig {
        &self.config
    }

    /// Window length in samples at `sr`.
    pub fn window_length(&self, sr: u32) -> usize {
        ((self.config.window_seconds * sr as f64).round() as usize).max(2)
    }
}

impl SpectrumProvider for StftSpectrum {
    fn spectrum_at(&self, waveform: &Waveform, time: f64) -> crate::Result<Option<Spectrum>> {
        if waveform.is_empty() || !time.is_finite() || time < 0.0 || time >= waveform.duration() {
            return Ok(None);
        }

        let sr = waveform.sample_rate();
        let samples = waveform.samples();
        let win_length = self.window_length(sr);
        let n_fft = win_length.next_power_of_two();
        let window = self.config.window.build(win_length);

        let centre = (time * sr as f64).round() as isize;
        let start = centre - (win_length / 2) as isize;
        let mut frame = vec![0.0f32; n_fft];
        for (i, (slot, &w)) in frame.iter_mut().zip(&window).enumerate() {
            let idx = start + i as isize;
            if idx >= 0 && (idx as usize) < samples.len() {
                *slot = samples[idx as usize] * w;
            }
        }

        let bin_hz = sr as f64 / n_fft as f64;
        let (frequencies, powers) = rfft(&frame)
            .iter()
            .enumerate()
            .map(|(k, c)| (k as f64 * bin_hz, c.norm_sqr() as f64))
            .unzip();

        Ok(Some(Spectrum {
            frequencies,
            powers,
        }))
    }
}
