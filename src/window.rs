//! Analysis windows for short-time spectra.

use std::f32::consts::PI;

/// Periodic Hann window of length `n`.
pub fn hann(n: usize) -> Vec<f32> {
    cosine_sum(n, &[0.5, 0.5])
}

/// Periodic Hamming window of length `n`.
pub fn hamming(n: usize) -> Vec<f32> {
    cosine_sum(n, &[0.54, 0.46])
}

/// Periodic Blackman window of length `n`.
///
/// Lower side lobes than Hann at the cost of a wider main lobe, which
/// matters when harmonics sit close together.
pub fn blackman(n: usize) -> Vec<f32> {
    cosine_sum(n, &[0.42, 0.5, 0.08])
}

/// `w[i] = a0 - a1 cos(x) + a2 cos(2x) - ...` with `x = 2 pi i / n`.
fn cosine_sum(n: usize, coeffs: &[f32]) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    let m = n as f32;
    (0..n)
        .map(|i| {
            let x = 2.0 * PI * i as f32 / m;
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &a)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * (k as f32 * x).cos()
                })
                .sum()
        })
        .collect()
}

/// Window shape used by [`crate::spectrum::StftSpectrum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    #[default]
    Hann,
    Hamming,
    Blackman,
}

impl WindowType {
    /// Parse a window name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "hann" | "hanning" => Some(WindowType::Hann),
            "hamming" => Some(WindowType::Hamming),
            "blackman" => Some(WindowType::Blackman),
            _ => None,
        }
    }

    /// Build a window of this type with length `n`.
    pub fn build(self, n: usize) -> Vec<f32> {
        match self {
            WindowType::Hann => hann(n),
            WindowType::Hamming => hamming(n),
            WindowType::Blackman => blackman(n),
        }
    }
}
