//! Per-recording feature assembly with per-method failure isolation.

use crate::capability::{AmplitudeSampler, ExternalMethod, PitchTracker, SpectrumProvider};
use crate::config::AnalysisConfig;
use crate::feature::{
    F0Stats, VoiceBreaks, ZcrStats, f0_statistics, hnr_manual, jitter_manual, shimmer_manual,
    voice_breaks, zcr_statistics,
};
use crate::result::{Estimate, Family, FeatureMap, MethodEstimates, Reason};
use crate::sampler::LinearSampler;
use crate::spectrum::StftSpectrum;
use crate::track::{PitchTrack, Waveform};
use log::{debug, warn};
use std::path::Path;

/// All feature families for one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingFeatures {
    pub f0: F0Stats,
    pub jitter: MethodEstimates,
    pub shimmer: MethodEstimates,
    pub hnr: MethodEstimates,
    pub zcr: ZcrStats,
    /// `None` for an empty or missing pitch track
    pub voice_breaks: Option<VoiceBreaks>,
    /// Frame spacing of the pitch track, `None` when there was no track
    pub frame_duration: Option<f64>,
}

impl RecordingFeatures {
    /// Fields of one family, in a stable order.
    pub fn family(&self, family: Family) -> FeatureMap {
        match family {
            Family::F0 => self.f0.to_map(),
            Family::Jitter => self.jitter.to_map(),
            Family::Shimmer => self.shimmer.to_map(),
            Family::Hnr => self.hnr.to_map(),
            Family::Zcr => self.zcr.to_map(),
            Family::VoiceBreaks => match (&self.voice_breaks, self.frame_duration) {
                (Some(vb), Some(frame_duration)) => vb.to_timed_map(frame_duration),
                (Some(vb), None) => {
                    let mut map = vb.to_map();
                    for name in VoiceBreaks::TIMED_FIELDS {
                        map.insert(name, None);
                    }
                    map
                }
                (None, _) => VoiceBreaks::absent_map(),
            },
        }
    }

    /// Fields of every family.
    pub fn to_map(&self) -> FeatureMap {
        let mut map = FeatureMap::new();
        for family in Family::ALL {
            map.extend(self.family(family));
        }
        map
    }

    /// Whether `family` produced a usable result.
    ///
    /// F0, ZCR and voice breaks hinge on their headline field; the
    /// perturbation and HNR families succeed when any method has a value.
    pub fn succeeded(&self, family: Family) -> bool {
        match family {
            Family::F0 => self.f0.mean.is_some(),
            Family::Zcr => self.zcr.overall.is_some(),
            Family::VoiceBreaks => self.voice_breaks.is_some(),
            Family::Jitter => self.jitter.best().is_some(),
            Family::Shimmer => self.shimmer.best().is_some(),
            Family::Hnr => self.hnr.best().is_some(),
        }
    }
}

/// The feature extraction engine.
///
/// Holds the thresholds and the spectrum/amplitude backends, plus any
/// external methods to report alongside the built-in estimates.
///
/// # Example
/// ```
/// use glottis::{Analyzer, PitchTrack, Waveform, io};
///
/// let analyzer = Analyzer::default();
/// let waveform = Waveform::new(io::tone(200.0, 16000, 1.0), 16000).unwrap();
/// let track = PitchTrack::new(vec![200.0; 90], 0.05, 0.01).unwrap();
///
/// let features = analyzer.analyze(&track, &waveform);
/// assert_eq!(features.f0.mean, Some(200.0));
/// assert_eq!(features.jitter.manual.value(), Some(0.0));
/// assert!(features.to_map().value("zcr_overall").is_some());
/// ```
pub struct Analyzer {
    config: AnalysisConfig,
    spectrum: Box<dyn SpectrumProvider>,
    sampler: Box<dyn AmplitudeSampler>,
    external: Vec<Box<dyn ExternalMethod>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
            spectrum: Box::new(StftSpectrum::default()),
            sampler: Box::new(LinearSampler),
            external: Vec::new(),
        }
    }
}

#[cfg(feature = "parallel")]
const _: () = {
    fn _assert_send_sync<T: Send + Sync>() {}
    fn _check() {
        _assert_send_sync::<Analyzer>();
    }
};

impl Analyzer {
    /// Build an engine with custom backends.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` / `Error::InvalidSize` if the
    /// configuration does not validate.
    pub fn new(
        config: AnalysisConfig,
        spectrum: impl SpectrumProvider + 'static,
        sampler: impl AmplitudeSampler + 'static,
    ) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            spectrum: Box::new(spectrum),
            sampler: Box::new(sampler),
            external: Vec::new(),
        })
    }

    /// Build an engine with the built-in backends.
    pub fn with_config(config: AnalysisConfig) -> crate::Result<Self> {
        Self::new(config, StftSpectrum::default(), LinearSampler)
    }

    /// Register an additional method, reported under its own field.
    pub fn with_external(mut self, method: impl ExternalMethod + 'static) -> Self {
        self.external.push(Box::new(method));
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Compute every family for one recording.
    ///
    /// Never fails: each method that cannot produce a value is reported as
    /// absent and logged.
    pub fn analyze(&self, track: &PitchTrack, waveform: &Waveform) -> RecordingFeatures {
        let config = &self.config;

        let mut jitter = MethodEstimates::new(Family::Jitter, jitter_manual(track, config));
        let mut shimmer = MethodEstimates::new(
            Family::Shimmer,
            shimmer_manual(track, waveform, self.sampler.as_ref(), config),
        );
        let mut hnr = MethodEstimates::new(
            Family::Hnr,
            hnr_manual(track, waveform, self.spectrum.as_ref(), config),
        );

        for method in &self.external {
            let estimate = match method.compute(track, waveform) {
                Ok(v) if v.is_finite() => Estimate::Value(v),
                Ok(v) => Estimate::NotComputed(Reason::Upstream(format!("non-finite result {v}"))),
                Err(e) => e.into(),
            };
            let target = match method.family() {
                Family::Jitter => &mut jitter,
                Family::Shimmer => &mut shimmer,
                Family::Hnr => &mut hnr,
                other => {
                    warn!(
                        "external method `{}` targets {other}, which takes no external methods",
                        method.name()
                    );
                    continue;
                }
            };
            target.external.push((method.name().to_string(), estimate));
        }

        for estimates in [&jitter, &shimmer, &hnr] {
            log_absent(estimates);
        }

        RecordingFeatures {
            f0: f0_statistics(track),
            jitter,
            shimmer,
            hnr,
            zcr: zcr_statistics(waveform.samples(), config.zcr_segments),
            voice_breaks: voice_breaks(&track.voiced_mask()),
            frame_duration: Some(track.frame_duration()),
        }
    }

    /// Track pitch with `tracker`, then compute every family.
    ///
    /// A tracker failure blanks the pitch-dependent families; ZCR is still
    /// computed from the waveform.
    pub fn analyze_waveform(
        &self,
        tracker: &dyn PitchTracker,
        waveform: &Waveform,
    ) -> RecordingFeatures {
        match tracker.track(waveform) {
            Ok(track) => self.analyze(&track, waveform),
            Err(e) => {
                warn!("pitch tracking failed: {e}");
                self.without_pitch(waveform, &e.to_string())
            }
        }
    }

    /// Load `path` and analyze it.
    ///
    /// # Errors
    /// Returns `Error::Audio` if the file cannot be decoded.
    pub fn analyze_file<P: AsRef<Path>>(
        &self,
        tracker: &dyn PitchTracker,
        path: P,
    ) -> crate::Result<RecordingFeatures> {
        let waveform = crate::io::load_waveform(path)?;
        Ok(self.analyze_waveform(tracker, &waveform))
    }

    /// Analyze many waveforms; results keep the input order.
    ///
    /// Runs on the rayon pool when the `parallel` feature is enabled.
    pub fn analyze_batch(
        &self,
        tracker: &dyn PitchTracker,
        waveforms: &[Waveform],
    ) -> Vec<RecordingFeatures> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            waveforms
                .par_iter()
                .map(|w| self.analyze_waveform(tracker, w))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            waveforms
                .iter()
                .map(|w| self.analyze_waveform(tracker, w))
                .collect()
        }
    }

    /// Load and analyze many files; results keep the input order.
    pub fn analyze_files<P: AsRef<Path> + Sync>(
        &self,
        tracker: &dyn PitchTracker,
        paths: &[P],
    ) -> Vec<crate::Result<RecordingFeatures>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            paths
                .par_iter()
                .map(|p| self.analyze_file(tracker, p))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            paths.iter().map(|p| self.analyze_file(tracker, p)).collect()
        }
    }

    fn without_pitch(&self, waveform: &Waveform, message: &str) -> RecordingFeatures {
        let upstream = || Estimate::NotComputed(Reason::Upstream(message.to_string()));
        let mut families = [Family::Jitter, Family::Shimmer, Family::Hnr]
            .map(|family| MethodEstimates::new(family, upstream()));
        for method in &self.external {
            if let Some(target) = families.iter_mut().find(|f| f.family == method.family()) {
                target.external.push((method.name().to_string(), upstream()));
            }
        }
        let [jitter, shimmer, hnr] = families;

        RecordingFeatures {
            f0: F0Stats::default(),
            jitter,
            shimmer,
            hnr,
            zcr: zcr_statistics(waveform.samples(), self.config.zcr_segments),
            voice_breaks: None,
            frame_duration: None,
        }
    }
}

fn log_absent(estimates: &MethodEstimates) {
    let manual = (estimates.manual_field(), &estimates.manual);
    let external = estimates.external.iter().map(|(n, e)| (n.clone(), e));
    for (name, estimate) in std::iter::once(manual).chain(external) {
        match estimate.reason() {
            Some(reason) if matches!(reason, Reason::Upstream(_)) => warn!("{name}: {reason}"),
            Some(reason) => debug!("{name}: {reason}"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Spectrum;

    struct Broken;

    impl SpectrumProvider for Broken {
        fn spectrum_at(&self, _: &Waveform, _: f64) -> crate::Result<Option<Spectrum>> {
            Err(crate::Error::capability("spectrum", "backend offline"))
        }
    }

    struct NoTrack;

    impl PitchTracker for NoTrack {
        fn track(&self, _: &Waveform) -> crate::Result<PitchTrack> {
            Err(crate::Error::capability("pitch tracker", "unavailable"))
        }
    }

    struct MeanF0;

    impl ExternalMethod for MeanF0 {
        fn name(&self) -> &str {
            "jitter_mean_f0"
        }

        fn family(&self) -> Family {
            Family::Jitter
        }

        fn compute(&self, track: &PitchTrack, _: &Waveform) -> crate::Result<f64> {
            crate::utils::mean(&track.voiced_frequencies())
                .ok_or_else(|| crate::Error::capability("mean f0", "no voiced frames"))
        }
    }

    fn inputs() -> (PitchTrack, Waveform) {
        let track = PitchTrack::new(vec![150.0; 40], 0.05, 0.01).unwrap();
        let waveform = Waveform::new(crate::io::tone(173.0, 8000, 0.5), 8000).unwrap();
        (track, waveform)
    }

    #[test]
    fn test_failing_spectrum_only_blanks_hnr() {
        let analyzer =
            Analyzer::new(AnalysisConfig::default(), Broken, LinearSampler).unwrap();
        let (track, waveform) = inputs();
        let features = analyzer.analyze(&track, &waveform);

        assert!(matches!(
            features.hnr.manual,
            Estimate::NotComputed(Reason::Upstream(_))
        ));
        assert!(!features.succeeded(Family::Hnr));
        assert!(features.succeeded(Family::Jitter));
        assert!(features.succeeded(Family::Shimmer));
        assert!(features.succeeded(Family::F0));
        assert!(features.succeeded(Family::VoiceBreaks));
    }

    #[test]
    fn test_tracker_failure_keeps_zcr() {
        let analyzer = Analyzer::default().with_external(MeanF0);
        let (_, waveform) = inputs();
        let features = analyzer.analyze_waveform(&NoTrack, &waveform);

        assert!(features.succeeded(Family::Zcr));
        for family in [Family::F0, Family::Jitter, Family::Shimmer, Family::Hnr, Family::VoiceBreaks] {
            assert!(!features.succeeded(family), "{family} should be absent");
            assert!(!features.family(family).any_present());
        }
        // external fields are still reported, just empty
        assert_eq!(features.jitter.to_map().get("jitter_mean_f0"), Some(None));
    }

    #[test]
    fn test_external_method_reported_before_manual() {
        let analyzer = Analyzer::default().with_external(MeanF0);
        let (track, waveform) = inputs();
        let map = analyzer.analyze(&track, &waveform).family(Family::Jitter);

        let names: Vec<&str> = map.names().collect();
        assert_eq!(names, vec!["jitter_mean_f0", "jitter_manual"]);
        assert_eq!(map.value("jitter_mean_f0"), Some(150.0));
        assert_eq!(map.value("jitter_manual"), Some(0.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig::default().with_zcr_segments(0);
        assert!(Analyzer::with_config(config).is_err());
    }

    #[test]
    fn test_full_map_layout() {
        let (track, waveform) = inputs();
        let map = Analyzer::default().analyze(&track, &waveform).to_map();
        let names: Vec<&str> = map.names().collect();
        assert_eq!(names.first(), Some(&"f0_mean"));
        assert!(names.contains(&"hnr_manual"));
        assert!(names.contains(&"avg_unvoiced_duration_seconds"));
        assert_eq!(map.value("voice_breaks_count"), Some(0.0));
    }

    #[test]
    fn test_batch_preserves_order() {
        let analyzer = Analyzer::default();
        let tracker = crate::pitch::YinTracker::default();
        let waveforms: Vec<Waveform> = [110.0, 220.0, 330.0]
            .iter()
            .map(|&f| Waveform::new(crate::io::tone(f, 16000, 0.5), 16000).unwrap())
            .collect();
        let results = analyzer.analyze_batch(&tracker, &waveforms);
        assert_eq!(results.len(), 3);
        let means: Vec<f64> = results.iter().map(|r| r.f0.mean.unwrap()).collect();
        assert!(means[0] < means[1] && means[1] < means[2]);
    }
}
