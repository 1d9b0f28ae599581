//! Audio file decoding and synthetic test signals.

use crate::track::Waveform;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ndarray::Array2;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("hound error: {0}")]
    Hound(#[from] hound::Error),
    #[error("symphonia error: {0}")]
    Symphonia(SymphoniaError),
    #[error("no audio track found")]
    NoAudioTrack,
    #[error("unsupported number of channels")]
    UnsupportedChannels,
}

impl From<SymphoniaError> for AudioError {
    fn from(err: SymphoniaError) -> Self {
        Self::Symphonia(err)
    }
}

/// Load a WAV file as a `(channels, frames)` matrix.
///
/// Integer PCM is scaled to `[-1, 1)`.
///
/// # Errors
/// Returns `Error::Audio` if the file cannot be read or is invalid.
pub fn load_wav<P: AsRef<Path>>(path: P) -> crate::Result<(Array2<f32>, AudioSpec)> {
    let mut reader = WavReader::open(path).map_err(AudioError::Hound)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AudioError::UnsupportedChannels.into());
    }

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(AudioError::Hound)?,
        (SampleFormat::Int, bits) if bits <= 16 => {
            let scale = (1i32 << (bits - 1)) as f32;
            reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(AudioError::Hound)?
        }
        (SampleFormat::Int, bits) => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(AudioError::Hound)?
        }
    };

    Ok((
        deinterleave(&samples, channels),
        AudioSpec {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        },
    ))
}

/// Load any supported audio file as a `(channels, frames)` matrix.
///
/// WAV goes through `hound`; everything else is probed and decoded with
/// `symphonia`.
///
/// # Example
/// ```no_run
/// use glottis::io;
///
/// let (data, spec) = io::load("recordings/0/abc123.wav").unwrap();
/// assert_eq!(data.shape()[0], spec.channels as usize);
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<(Array2<f32>, AudioSpec)> {
    let path = path.as_ref();
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if is_wav {
        load_wav(path)
    } else {
        Ok(decode(path)?)
    }
}

/// Load a file and downmix it to a mono [`Waveform`].
pub fn load_waveform<P: AsRef<Path>>(path: P) -> crate::Result<Waveform> {
    let (data, spec) = load(path)?;
    Waveform::from_channels(&data, spec.sample_rate)
}

fn decode(path: &Path) -> Result<(Array2<f32>, AudioSpec), AudioError> {
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let file = std::fs::File::open(path).map_err(SymphoniaError::IoError)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.sample_rate.is_some())
        .ok_or(AudioError::NoAudioTrack)?
        .clone();

    let sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    if channels == 0 {
        return Err(AudioError::UnsupportedChannels);
    }

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track.id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(audio) => audio,
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let mut sb = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        sb.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sb.samples());
    }

    Ok((
        deinterleave(&samples, channels as usize),
        AudioSpec {
            sample_rate,
            channels,
        },
    ))
}

/// Interleaved samples to `(channels, frames)`; a trailing partial frame is dropped.
fn deinterleave(samples: &[f32], channels: usize) -> Array2<f32> {
    let frames = samples.len() / channels;
    Array2::from_shape_fn((channels, frames), |(ch, frame)| {
        samples[frame * channels + ch]
    })
}

/// Write a `(channels, frames)` matrix as 16-bit PCM WAV.
///
/// Samples are clipped to `[-1, 1]` before quantisation.
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    data: &Array2<f32>,
    sample_rate: u32,
) -> crate::Result<()> {
    let channels = data.shape()[0] as u16;
    let frames = data.shape()[1];

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(AudioError::Hound)?;
    for frame in 0..frames {
        for ch in 0..channels as usize {
            let sample = data[(ch, frame)].clamp(-1.0, 1.0);
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .map_err(AudioError::Hound)?;
        }
    }
    writer.finalize().map_err(AudioError::Hound)?;
    Ok(())
}

/// Unit-amplitude sine of `frequency` Hz.
pub fn tone(frequency: f32, sr: u32, duration: f32) -> Vec<f32> {
    let n_samples = (duration * sr as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sr as f32;
    (0..n_samples)
        .map(|i| (angular_freq * i as f32).sin())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glottis_io_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_tone() {
        let signal = tone(440.0, 22050, 0.1);
        assert_eq!(signal.len(), 2205);
        assert!(signal.iter().any(|&x| x.abs() > 0.9));
    }

    #[test]
    fn test_deinterleave() {
        let data = deinterleave(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(data.shape(), &[2, 2]);
        assert_eq!(data[(0, 1)], 3.0);
        assert_eq!(data[(1, 1)], 4.0);
    }

    #[test]
    fn test_wav_save_load_stereo() {
        let path = temp_path("stereo.wav");
        let data =
            Array2::from_shape_vec((2, 4), vec![0.5, -0.5, 0.25, 0.0, 0.1, 0.2, 0.3, 0.4]).unwrap();
        save_wav(&path, &data, 8000).unwrap();

        let (loaded, spec) = load(&path).unwrap();
        assert_eq!(spec, AudioSpec { sample_rate: 8000, channels: 2 });
        assert_eq!(loaded.shape(), &[2, 4]);
        for (a, b) in loaded.iter().zip(data.iter()) {
            assert!((a - b).abs() < 1e-3);
        }

        let wave = load_waveform(&path).unwrap();
        assert_eq!(wave.sample_rate(), 8000);
        assert!((wave.samples()[0] - 0.3).abs() < 1e-3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let result = load(temp_path("does_not_exist.wav"));
        assert!(matches!(result, Err(crate::Error::Audio(AudioError::Hound(_)))));
    }
}
