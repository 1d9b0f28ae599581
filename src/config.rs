//! Tunable thresholds for the feature extraction engine.

/// Voiced frames that jitter and shimmer must exceed.
pub const DEFAULT_PERTURBATION_MIN_VOICED: usize = 5;

/// Valid amplitude samples that shimmer must exceed.
pub const DEFAULT_SHIMMER_MIN_AMPLITUDES: usize = 5;

/// Voiced frames that the spectral HNR estimate must exceed.
pub const DEFAULT_HNR_MIN_VOICED: usize = 10;

/// Target number of spectral evaluation points for HNR.
pub const DEFAULT_HNR_MAX_POINTS: usize = 10;

/// Highest harmonic counted as harmonic power.
pub const DEFAULT_HNR_MAX_HARMONIC: u32 = 5;

/// Half-width of the harmonic band as a fraction of F0.
pub const DEFAULT_HNR_TOLERANCE: f64 = 0.1;

/// Number of contiguous segments for segmental ZCR.
pub const DEFAULT_ZCR_SEGMENTS: usize = 10;

/// Configuration for the analysis engine.
///
/// All thresholds are strict lower bounds: a method needs *more than*
/// the configured number of frames or samples.
///
/// # Example
/// ```
/// use glottis::config::AnalysisConfig;
///
/// let config = AnalysisConfig::new()
///     .with_hnr_max_harmonic(8)
///     .with_hnr_tolerance(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Jitter and shimmer require more than this many voiced frames
    pub perturbation_min_voiced: usize,
    /// Shimmer requires more than this many valid amplitude samples
    pub shimmer_min_amplitudes: usize,
    /// HNR requires more than this many voiced frames
    pub hnr_min_voiced: usize,
    /// Divisor for the voiced-frame subsampling stride
    pub hnr_max_points: usize,
    /// Highest harmonic number classified as harmonic power
    pub hnr_max_harmonic: u32,
    /// Tolerance band around each harmonic, relative to F0
    pub hnr_tolerance: f64,
    /// Number of segments used for segmental ZCR statistics
    pub zcr_segments: usize,
}

impl AnalysisConfig {
    /// Create a configuration with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voiced-frame minimum for jitter and shimmer.
    pub fn with_perturbation_min_voiced(mut self, n: usize) -> Self {
        self.perturbation_min_voiced = n;
        self
    }

    /// Set the amplitude-sample minimum for shimmer.
    pub fn with_shimmer_min_amplitudes(mut self, n: usize) -> Self {
        self.shimmer_min_amplitudes = n;
        self
    }

    /// Set the voiced-frame minimum for HNR.
    pub fn with_hnr_min_voiced(mut self, n: usize) -> Self {
        self.hnr_min_voiced = n;
        self
    }

    /// Set the HNR evaluation point divisor.
    pub fn with_hnr_max_points(mut self, n: usize) -> Self {
        self.hnr_max_points = n;
        self
    }

    /// Set the highest harmonic counted as harmonic power.
    pub fn with_hnr_max_harmonic(mut self, n: u32) -> Self {
        self.hnr_max_harmonic = n;
        self
    }

    /// Set the harmonic tolerance band (fraction of F0).
    pub fn with_hnr_tolerance(mut self, tolerance: f64) -> Self {
        self.hnr_tolerance = tolerance;
        self
    }

    /// Set the number of ZCR segments.
    pub fn with_zcr_segments(mut self, n: usize) -> Self {
        self.zcr_segments = n;
        self
    }

    /// Check that every threshold is usable.
    ///
    /// # Errors
    /// Returns `Error::InvalidSize` for zero-sized counts and
    /// `Error::InvalidParameter` for a tolerance outside `(0, 0.5]`.
    pub fn validate(&self) -> crate::Result<()> {
        if self.hnr_max_points == 0 {
            return Err(crate::Error::InvalidSize {
                name: "hnr_max_points",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.hnr_max_harmonic == 0 {
            return Err(crate::Error::InvalidSize {
                name: "hnr_max_harmonic",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.zcr_segments == 0 {
            return Err(crate::Error::InvalidSize {
                name: "zcr_segments",
                value: 0,
                reason: "must be > 0",
            });
        }
        // Bands wider than half a harmonic spacing would overlap.
        if !(self.hnr_tolerance > 0.0 && self.hnr_tolerance <= 0.5) {
            return Err(crate::Error::InvalidParameter {
                name: "hnr_tolerance",
                value: self.hnr_tolerance.to_string(),
                reason: "must be in (0, 0.5]".into(),
            });
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            perturbation_min_voiced: DEFAULT_PERTURBATION_MIN_VOICED,
            shimmer_min_amplitudes: DEFAULT_SHIMMER_MIN_AMPLITUDES,
            hnr_min_voiced: DEFAULT_HNR_MIN_VOICED,
            hnr_max_points: DEFAULT_HNR_MAX_POINTS,
            hnr_max_harmonic: DEFAULT_HNR_MAX_HARMONIC,
            hnr_tolerance: DEFAULT_HNR_TOLERANCE,
            zcr_segments: DEFAULT_ZCR_SEGMENTS,
        }
    }
}
