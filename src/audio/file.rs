use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::transcode::{decode, Transcoder, TELEPHONY_SAMPLE_RATE, TELEPHONY_SAMPLE_WIDTH};

/// Container for PCM written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmContainer {
    /// Headerless s16le samples, exactly what goes on the wire
    Raw,
    /// The same samples wrapped in a WAV header
    Wav,
}

/// Summary of a file conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input_duration_seconds: f64,
    pub input_sample_rate: u32,
    pub input_channels: u16,
    pub output_bytes: usize,
}

impl ConversionReport {
    pub fn output_duration_seconds(&self) -> f64 {
        self.output_bytes as f64 / (TELEPHONY_SAMPLE_RATE as f64 * TELEPHONY_SAMPLE_WIDTH as f64)
    }
}

/// Convert an audio file on disk into telephony PCM.
pub fn convert_file(
    transcoder: &dyn Transcoder,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    container: PcmContainer,
) -> Result<ConversionReport> {
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Converting {} -> {}", input.display(), output.display());

    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read audio file: {}", input.display()))?;

    let source = decode(&bytes).context("Failed to decode input audio")?;
    let pcm = transcoder
        .transcode(&bytes)
        .context("Failed to transcode input audio")?;

    write_pcm(output, &pcm, container)?;

    let report = ConversionReport {
        input_duration_seconds: source.duration_seconds(),
        input_sample_rate: source.sample_rate,
        input_channels: source.channels,
        output_bytes: pcm.len(),
    };

    info!(
        "Converted {:.2}s ({}Hz, {} channels) into {} bytes of 8kHz mono PCM",
        report.input_duration_seconds,
        report.input_sample_rate,
        report.input_channels,
        report.output_bytes
    );

    Ok(report)
}

/// Write 8kHz mono s16le PCM bytes to `path`.
pub fn write_pcm(path: impl AsRef<Path>, pcm: &[u8], container: PcmContainer) -> Result<()> {
    let path = path.as_ref();

    match container {
        PcmContainer::Raw => std::fs::write(path, pcm)
            .with_context(|| format!("Failed to write PCM file: {:?}", path))?,
        PcmContainer::Wav => {
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate: TELEPHONY_SAMPLE_RATE,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };

            let mut writer = hound::WavWriter::create(path, spec)
                .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

            for chunk in pcm.chunks_exact(2) {
                writer
                    .write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))
                    .context("Failed to write sample to WAV")?;
            }

            writer.finalize().context("Failed to finalize WAV file")?;
        }
    }

    Ok(())
}
