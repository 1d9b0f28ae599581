//! Voice-quality feature extraction for speech recordings.
//!
//! Glottis turns a pitch track and a waveform into a flat table of
//! voice-quality measures. Every measure is computed independently: a
//! method that lacks data or whose backend fails is reported as absent and
//! never takes the rest of the record down with it.
//!
//! # Features
//!
//! - **F0 statistics**: mean, min, max, range and standard deviation of the
//!   voiced pitch contour
//! - **Jitter and shimmer**: coefficient of variation of voiced F0 and of
//!   amplitude at voiced frames
//! - **HNR**: harmonic/noise power partition of short-time spectra
//! - **ZCR**: zero-crossing ratio over the waveform and over equal segments
//! - **Voice breaks**: run-length summary of the voicing decision
//!
//! # Quick Start
//!
//! ```rust
//! use glottis::{Analyzer, Family, Waveform, io};
//! use glottis::pitch::YinTracker;
//!
//! let waveform = Waveform::new(io::tone(180.0, 16000, 1.0), 16000).unwrap();
//! let features = Analyzer::default().analyze_waveform(&YinTracker::default(), &waveform);
//!
//! let f0 = features.family(Family::F0);
//! assert!((f0.value("f0_mean").unwrap() - 180.0).abs() < 2.0);
//! assert_eq!(features.family(Family::VoiceBreaks).value("voice_breaks_count"), Some(0.0));
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`feature`] | The feature families as pure functions |
//! | [`analysis`] | [`Analyzer`]: per-recording assembly and batch runs |
//! | [`capability`] | Backend traits: pitch tracking, spectra, amplitudes |
//! | [`pitch`] | YIN pitch tracker |
//! | [`spectrum`] | Windowed-FFT short-time spectrum |
//! | [`sampler`] | Linear-interpolation amplitude sampler |
//! | [`track`] | [`PitchTrack`] and [`Waveform`] inputs |
//! | [`result`] | [`Estimate`], [`FeatureMap`] and [`Family`] |
//! | [`config`] | Analysis thresholds |
//! | [`io`] | Audio decoding (WAV, M4A/AAC) |
//! | [`files`] | Locating recordings under label directories |
//! | [`report`] | Manifests, feature CSV and error logs |
//!
//! # Error Handling
//!
//! Constructors, I/O and backends return [`Result<T>`]. Per-method feature
//! results are [`Estimate`] values instead: absence carries a [`Reason`]
//! and is never an error.
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `parallel` | Batch analysis on the rayon thread pool |

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod analysis;
pub mod capability;
pub mod config;
pub mod feature;
pub mod fft;
pub mod files;
pub mod io;
pub mod pitch;
pub mod report;
pub mod result;
pub mod sampler;
pub mod spectrum;
pub mod track;
pub mod utils;
pub mod window;

pub use analysis::{Analyzer, RecordingFeatures};
pub use config::AnalysisConfig;
pub use result::{Estimate, Family, FeatureMap, MethodEstimates, Reason};
pub use track::{PitchTrack, Waveform};
