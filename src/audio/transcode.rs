use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::TranscodeError;

/// Sample rate expected by the telephony leg
pub const TELEPHONY_SAMPLE_RATE: u32 = 8000;
/// Bytes per telephony sample (16-bit signed, little endian)
pub const TELEPHONY_SAMPLE_WIDTH: usize = 2;

/// Converts encoded audio into telephony PCM.
///
/// Implementations are synchronous and may be CPU heavy; callers on an async
/// runtime should run them on a blocking thread.
pub trait Transcoder: Send + Sync {
    /// Convert `audio` (any supported container/codec) into raw 16-bit signed
    /// little-endian PCM at 8kHz mono, with no header.
    fn transcode(&self, audio: &[u8]) -> Result<Vec<u8>, TranscodeError>;
}

/// Decoded interleaved samples plus their format
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

/// Symphonia-backed transcoder (MP3, WAV, FLAC, OGG/Vorbis, AAC/M4A)
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaTranscoder;

impl SymphoniaTranscoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transcoder for SymphoniaTranscoder {
    fn transcode(&self, audio: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let decoded = decode(audio)?;

        debug!(
            "Decoded {:.2}s of audio ({}Hz, {} channels, {} samples)",
            decoded.duration_seconds(),
            decoded.sample_rate,
            decoded.channels,
            decoded.samples.len()
        );

        let mono = downmix_to_mono(&decoded.samples, decoded.channels);
        let resampled = resample(&mono, decoded.sample_rate, TELEPHONY_SAMPLE_RATE);
        if resampled.is_empty() {
            return Err(TranscodeError::Empty);
        }

        Ok(samples_to_bytes(&resampled))
    }
}

/// Decode an in-memory audio blob to interleaved 16-bit samples.
pub fn decode(audio: &[u8]) -> Result<DecodedAudio, TranscodeError> {
    if audio.is_empty() {
        return Err(TranscodeError::Empty);
    }

    let mss = MediaSourceStream::new(Box::new(Cursor::new(audio.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscodeError::Unsupported(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(TranscodeError::NoAudioTrack)?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| TranscodeError::Unsupported(e.to_string()))?;

    let mut samples: Vec<i16> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(TranscodeError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(buffer) => {
                let spec = *buffer.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut sample_buf = SampleBuffer::<i16>::new(buffer.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(buffer);
                samples.extend_from_slice(sample_buf.samples());
            }
            // Corrupt packets are skipped, the stream itself is still usable
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(TranscodeError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(TranscodeError::Empty);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Average interleaved channels into one.
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks_exact(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Resample mono audio.
///
/// Output length is `floor(len * to_rate / from_rate)`. Downsampling averages
/// each output sample's input window; upsampling interpolates linearly.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }
    if from_rate == 0 || to_rate == 0 {
        return Vec::new();
    }

    let from = from_rate as u64;
    let to = to_rate as u64;
    let out_len = (samples.len() as u64 * to / from) as usize;

    if from > to {
        (0..out_len as u64)
            .map(|i| {
                let start = (i * from / to) as usize;
                let end = (((i + 1) * from / to) as usize).min(samples.len()).max(start + 1);
                let window = &samples[start..end];
                let sum: i64 = window.iter().map(|&s| s as i64).sum();
                (sum / window.len() as i64) as i16
            })
            .collect()
    } else {
        let step = from as f64 / to as f64;
        let last = samples.len() - 1;
        (0..out_len)
            .map(|i| {
                let pos = i as f64 * step;
                let idx = (pos.floor() as usize).min(last);
                let next = (idx + 1).min(last);
                let frac = pos - idx as f64;
                let value = samples[idx] as f64 * (1.0 - frac) + samples[next] as f64 * frac;
                value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
            })
            .collect()
    }
}

pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
