//! Batch voice-feature extraction over a recording manifest.

use anyhow::{Context, Result};
use clap::Parser;
use glottis::files::find_all_audio_paths;
use glottis::pitch::{YinConfig, YinTracker};
use glottis::report::{ErrorLog, FeatureRow, Manifest, Scope, write_features_csv};
use glottis::sampler::LinearSampler;
use glottis::spectrum::{StftSpectrum, StftSpectrumConfig};
use glottis::window::WindowType;
use glottis::{AnalysisConfig, Analyzer};
use log::{info, warn};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Extract voice-quality features for every recording in a manifest
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Manifest file (tab- or comma-separated) listing the recordings
    #[arg(short, long)]
    manifest: PathBuf,

    /// Base directory holding the `0/` and `1/` recording folders
    #[arg(short, long)]
    audio_base: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    output: PathBuf,

    /// Error log path (default: next to the output, `<stem>_errors.txt`)
    #[arg(short, long)]
    error_log: Option<PathBuf>,

    /// Feature family: f0, jitter, shimmer, hnr, zcr, voice-breaks or all
    #[arg(short, long, default_value = "all")]
    family: Scope,

    /// Manifest column holding the recording ID
    #[arg(long, default_value = "audio_audio.m4a")]
    id_column: String,

    /// Lowest F0 searched by the pitch tracker, in Hz
    #[arg(long, default_value = "75")]
    fmin: f64,

    /// Highest F0 searched by the pitch tracker, in Hz
    #[arg(long, default_value = "600")]
    fmax: f64,

    /// Spectral window used for HNR: hann, hamming or blackman
    #[arg(long, default_value = "hann", value_parser = parse_window)]
    window: WindowType,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let manifest = Manifest::read(&args.manifest, &args.id_column)
        .with_context(|| format!("failed to read manifest {}", args.manifest.display()))?;
    let mut seen = BTreeSet::new();
    let ids: Vec<String> = manifest
        .ids()
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(String::from)
        .collect();
    info!("{} recordings in {}", ids.len(), args.manifest.display());

    let tracker = YinTracker::new(YinConfig::default().with_fmin(args.fmin).with_fmax(args.fmax))
        .context("invalid pitch tracker settings")?;
    let spectrum = StftSpectrum::new(StftSpectrumConfig::default().with_window(args.window))
        .context("invalid spectrum settings")?;
    let analyzer = Analyzer::new(AnalysisConfig::default(), spectrum, LinearSampler)?;

    let located = find_all_audio_paths(&args.audio_base, &ids);
    let mut errors = ErrorLog::new();
    let mut jobs: Vec<(String, PathBuf)> = Vec::with_capacity(located.len());
    for id in &ids {
        match located.get(id) {
            Some(path) => jobs.push((id.clone(), path.clone())),
            None => errors.push(id.as_str(), "audio file not found"),
        }
    }
    info!(
        "found audio for {}/{} recordings, extracting {} features",
        jobs.len(),
        ids.len(),
        args.family
    );

    let paths: Vec<&Path> = jobs.iter().map(|(_, p)| p.as_path()).collect();
    let results = analyzer.analyze_files(&tracker, &paths);

    let mut rows = Vec::new();
    for ((id, path), result) in jobs.into_iter().zip(results) {
        match result {
            Ok(features) if args.family.succeeded(&features) => rows.push(FeatureRow {
                id,
                path,
                features: args.family.fields(&features),
            }),
            Ok(_) => errors.push(id, format!("no {} features could be computed", args.family.title())),
            Err(e) => {
                warn!("{id}: {e}");
                errors.push(id, e);
            }
        }
    }

    let out = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    write_features_csv(BufWriter::new(out), &manifest, &rows)?;
    info!("features written to {}", args.output.display());

    if !errors.is_empty() {
        let log_path = args.error_log.clone().unwrap_or_else(|| default_error_log(&args.output));
        let file = File::create(&log_path)
            .with_context(|| format!("failed to create {}", log_path.display()))?;
        errors.write(BufWriter::new(file), args.family.title())?;
        info!("{} errors logged to {}", errors.len(), log_path.display());
    }

    let total = ids.len();
    let success_rate = if total > 0 {
        rows.len() as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    info!("total recordings: {total}");
    info!("successful: {}", rows.len());
    info!("failed: {}", errors.len());
    info!("success rate: {success_rate:.1}%");
    Ok(())
}

fn default_error_log(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("features");
    output.with_file_name(format!("{stem}_errors.txt"))
}

fn parse_window(name: &str) -> std::result::Result<WindowType, String> {
    WindowType::parse(name).ok_or_else(|| format!("unknown window `{name}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_flag() {
        let args = Args::try_parse_from([
            "glottis", "-m", "m.tsv", "-a", "data", "-o", "out.csv", "--window", "Blackman",
        ])
        .unwrap();
        assert_eq!(args.window, WindowType::Blackman);

        let args = Args::try_parse_from(["glottis", "-m", "m.tsv", "-a", "data", "-o", "out.csv"])
            .unwrap();
        assert_eq!(args.window, WindowType::Hann);
        assert_eq!(args.family, Scope::All);

        assert!(
            Args::try_parse_from([
                "glottis", "-m", "m.tsv", "-a", "data", "-o", "out.csv", "--window", "kaiser",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_default_error_log_path() {
        assert_eq!(
            default_error_log(Path::new("out/features.csv")),
            PathBuf::from("out/features_errors.txt")
        );
    }
}
