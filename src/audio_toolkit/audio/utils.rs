use anyhow::{bail, Result};
use hound::{WavSpec, WavWriter};
use log::debug;
use std::path::Path;

use super::recorder::RecordingArtifact;

/// Fallback PCM parameters when the artifact MIME carries none.
const DEFAULT_SAMPLE_RATE: u32 = 16_000;
const DEFAULT_CHANNELS: u16 = 1;

/// Save a recording artifact as a WAV file.
///
/// The artifact payload is interpreted as interleaved little-endian 16-bit
/// PCM; rate and channel count are taken from the artifact's MIME type
/// parameters (`audio/l16;rate=..;channels=..`).
pub fn save_artifact_wav<P: AsRef<Path>>(path: P, artifact: &RecordingArtifact) -> Result<()> {
    if !artifact.mime_type.starts_with("audio/l16") {
        bail!(
            "cannot encode '{}' as WAV, expected an audio/l16 payload",
            artifact.mime_type
        );
    }

    let (sample_rate, channels) = pcm_params(&artifact.mime_type);
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    if artifact.data.len() % 2 != 0 {
        debug!("artifact payload has a trailing odd byte, ignoring it");
    }
    for pair in artifact.data.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;

    debug!("Saved WAV file: {:?}", path.as_ref());
    Ok(())
}

/// Parses `rate`/`channels` parameters out of an `audio/l16` MIME type.
fn pcm_params(mime_type: &str) -> (u32, u16) {
    let mut rate = DEFAULT_SAMPLE_RATE;
    let mut channels = DEFAULT_CHANNELS;
    for param in mime_type.split(';').skip(1) {
        let mut kv = param.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("rate"), Some(value)) => {
                if let Ok(value) = value.parse() {
                    rate = value;
                }
            }
            (Some("channels"), Some(value)) => {
                if let Ok(value) = value.parse() {
                    channels = value;
                }
            }
            _ => {}
        }
    }
    (rate, channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    #[test]
    fn pcm_params_parsed_from_mime() {
        assert_eq!(pcm_params("audio/l16;rate=48000;channels=2"), (48000, 2));
        assert_eq!(pcm_params("audio/l16; rate=44100"), (44100, 1));
        assert_eq!(pcm_params("audio/l16"), (16000, 1));
        assert_eq!(pcm_params("audio/l16;rate=bogus"), (16000, 1));
    }

    #[test]
    fn artifact_round_trips_through_wav() {
        let samples: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN];
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let artifact = RecordingArtifact {
            data,
            mime_type: "audio/l16;rate=22050;channels=1".to_string(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        save_artifact_wav(&path, &artifact).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.spec().channels, 1);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn empty_artifact_writes_empty_wav() {
        let artifact = RecordingArtifact {
            data: Vec::new(),
            mime_type: super::super::recorder::DEFAULT_MIME_TYPE.to_string(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        save_artifact_wav(&path, &artifact).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn non_pcm_artifact_is_rejected() {
        let artifact = RecordingArtifact {
            data: vec![1, 2, 3],
            mime_type: "audio/webm".to_string(),
        };
        let dir = tempfile::tempdir().unwrap();
        assert!(save_artifact_wav(dir.path().join("x.wav"), &artifact).is_err());
    }
}
