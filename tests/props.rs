use glottis::feature::{f0_statistics, jitter_manual, voice_breaks, zcr_statistics};
use glottis::{AnalysisConfig, Analyzer, PitchTrack, Waveform};
use proptest::prelude::*;

fn frequency() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 50.0f64..500.0]
}

proptest! {
    #[test]
    fn zcr_is_bounded(y in prop::collection::vec(-1.0f32..1.0, 1..2000), n in 1usize..20) {
        let stats = zcr_statistics(&y, n);
        let overall = stats.overall.unwrap();
        prop_assert!((0.0..0.5).contains(&overall));
        if let (Some(min), Some(mean), Some(max)) = (stats.min, stats.mean, stats.max) {
            prop_assert!(min <= mean + 1e-12 && mean <= max + 1e-12);
            prop_assert!(max < 0.5);
        }
    }

    #[test]
    fn voice_break_runs_cover_the_mask(mask in prop::collection::vec(any::<bool>(), 1..300)) {
        let vb = voice_breaks(&mask).unwrap();
        let total: usize = vb.voiced_runs.iter().chain(&vb.unvoiced_runs).sum();
        prop_assert_eq!(total, mask.len());
        prop_assert!((vb.voiced_percentage + vb.unvoiced_percentage - 100.0).abs() < 1e-9);

        let ends_voiced = mask.last().copied().unwrap_or(false);
        prop_assert_eq!(vb.breaks, vb.voiced_runs.len() - usize::from(ends_voiced));

        // runs alternate, so counts differ by at most one
        prop_assert!(vb.voiced_runs.len().abs_diff(vb.unvoiced_runs.len()) <= 1);
    }

    #[test]
    fn f0_statistics_are_ordered(freqs in prop::collection::vec(frequency(), 0..200)) {
        let track = PitchTrack::new(freqs.clone(), 0.0, 0.01).unwrap();
        let stats = f0_statistics(&track);
        match (stats.min, stats.mean, stats.max, stats.range, stats.std) {
            (Some(min), Some(mean), Some(max), Some(range), Some(std)) => {
                prop_assert!(min > 0.0);
                prop_assert!(min <= mean + 1e-9 && mean <= max + 1e-9);
                prop_assert_eq!(range, max - min);
                prop_assert!(std >= 0.0 && std <= range + 1e-9);
            }
            (None, None, None, None, None) => {
                prop_assert!(freqs.iter().all(|&f| f == 0.0));
            }
            other => prop_assert!(false, "partially absent statistics: {:?}", other),
        }
    }

    #[test]
    fn jitter_ignores_unvoiced_frames(
        freqs in prop::collection::vec(60.0f64..400.0, 6..60),
        gaps in prop::collection::vec(any::<bool>(), 6..60),
    ) {
        let config = AnalysisConfig::default();
        let plain = PitchTrack::new(freqs.clone(), 0.0, 0.01).unwrap();
        let mut gapped = Vec::new();
        for (i, f) in freqs.iter().enumerate() {
            if gaps.get(i).copied().unwrap_or(false) {
                gapped.push(0.0);
            }
            gapped.push(*f);
        }
        let gapped = PitchTrack::new(gapped, 0.0, 0.01).unwrap();
        prop_assert_eq!(jitter_manual(&plain, &config), jitter_manual(&gapped, &config));
    }

    #[test]
    fn analyzer_reports_every_field(
        freqs in prop::collection::vec(frequency(), 0..120),
        y in prop::collection::vec(-1.0f32..1.0, 0..4000),
    ) {
        let track = PitchTrack::new(freqs, 0.0, 0.01).unwrap();
        let waveform = Waveform::new(y, 4000).unwrap();
        let map = Analyzer::default().analyze(&track, &waveform).to_map();
        prop_assert_eq!(map.len(), 22);
        // hnr_manual may be -inf for a frame with no harmonic power
        prop_assert!(map.iter().all(|(_, v)| v.is_none_or(|x| !x.is_nan())));
    }
}
