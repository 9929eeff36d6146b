pub mod file;
pub mod transcode;

pub use file::{convert_file, write_pcm, ConversionReport, PcmContainer};
pub use transcode::{
    DecodedAudio, SymphoniaTranscoder, Transcoder, TELEPHONY_SAMPLE_RATE, TELEPHONY_SAMPLE_WIDTH,
};
