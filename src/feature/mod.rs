//! Per-recording voice-quality feature families.
//!
//! Each family is a pure function of the pitch track and/or the waveform
//! and never fails: missing values are reported as absent fields.

pub mod f0;
pub mod hnr;
pub mod perturbation;
pub mod voice_breaks;
pub mod zcr;

pub use f0::{F0Stats, f0_statistics};
pub use hnr::hnr_manual;
pub use perturbation::{jitter_manual, shimmer_manual};
pub use voice_breaks::{VoiceBreaks, voice_breaks};
pub use zcr::{ZcrStats, zcr_statistics};
