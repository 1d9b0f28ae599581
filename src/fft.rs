use num_complex::Complex32;
use realfft::RealFftPlanner;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT plan for forward and inverse complex FFT operations.
///
/// This struct caches FFT plans for efficient reuse across frames.
///
/// # Example
/// ```
/// use glottis::fft::FftPlan;
/// use num_complex::Complex32;
///
/// let plan = FftPlan::new(512);
/// let mut buffer = vec![Complex32::new(1.0, 0.0); 512];
/// plan.forward(&mut buffer);
/// plan.inverse(&mut buffer);
/// assert!((buffer[0].re - 1.0).abs() < 1e-5);
/// ```
pub struct FftPlan {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    len: usize,
}

impl FftPlan {
    /// Create a new FFT plan for a given size.
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        Self {
            forward,
            inverse,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Perform forward FFT in-place.
    pub fn forward(&self, buffer: &mut [Complex32]) {
        self.forward.process(buffer);
    }

    /// Perform inverse FFT in-place, scaled by 1/len.
    pub fn inverse(&self, buffer: &mut [Complex32]) {
        self.inverse.process(buffer);
        let scale = 1.0 / self.len as f32;
        for v in buffer.iter_mut() {
            *v *= scale;
        }
    }

    /// Unnormalised autocorrelation `r[k] = sum_j y[j] * y[j + k]` for
    /// lags `0..max_lag`.
    ///
    /// The plan length must be at least `2 * y.len()` so the circular
    /// correlation does not wrap.
    pub fn autocorrelate(&self, y: &[f32], max_lag: usize) -> Vec<f32> {
        debug_assert!(self.len >= 2 * y.len());
        let mut buffer = vec![Complex32::new(0.0, 0.0); self.len];
        for (b, &v) in buffer.iter_mut().zip(y) {
            b.re = v;
        }

        self.forward(&mut buffer);
        for c in buffer.iter_mut() {
            *c = Complex32::new(c.norm_sqr(), 0.0);
        }
        self.inverse(&mut buffer);

        buffer
            .iter()
            .take(max_lag.min(y.len()))
            .map(|c| c.re)
            .collect()
    }
}

/// Compute the real-to-complex FFT (rfft) of a real-valued input.
///
/// # Returns
/// Complex FFT output of length `input.len() / 2 + 1`
///
/// # Example
/// ```
/// use glottis::fft::rfft;
///
/// let signal = vec![1.0f32; 1024];
/// let spectrum = rfft(&signal);
/// assert_eq!(spectrum.len(), 513); // 1024/2 + 1
/// ```
pub fn rfft(input: &[f32]) -> Vec<Complex32> {
    if input.is_empty() {
        return Vec::new();
    }
    let len = input.len();
    let mut planner = RealFftPlanner::<f32>::new();
    let r2c = planner.plan_fft_forward(len);
    let mut in_buf = input.to_vec();
    let mut out_buf = r2c.make_output_vec();
    let _ = r2c.process(&mut in_buf, &mut out_buf);
    out_buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rfft_length() {
        assert_eq!(rfft(&[0.0f32; 8]).len(), 5);
        assert!(rfft(&[]).is_empty());
    }

    #[test]
    fn test_autocorrelate_matches_direct_sum() {
        let y = [1.0f32, 2.0, -1.0, 0.5, 3.0];
        let plan = FftPlan::new(16);
        let r = plan.autocorrelate(&y, 4);
        assert_eq!(r.len(), 4);
        for (lag, &got) in r.iter().enumerate() {
            let expected: f32 = (0..y.len() - lag).map(|j| y[j] * y[j + lag]).sum();
            assert_relative_eq!(got, expected, epsilon = 1e-4);
        }
    }
}
