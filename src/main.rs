use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exotel_bridge::audio::{convert_file, PcmContainer};
use exotel_bridge::session::SessionConfig;
use exotel_bridge::{
    simulate_call, AppState, Config, ElevenLabsClient, SimulatedCall, SpeechSynthesizer,
    SymphoniaTranscoder,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "exotel-bridge", version, about = "Telephony media stream to TTS bridge")]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/exotel-bridge")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept telephony WebSocket connections (default)
    Serve {
        /// Override the configured listening port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Convert an audio file to 8kHz mono 16-bit PCM
    Transcode {
        input: PathBuf,
        output: PathBuf,
        /// Wrap the PCM in a WAV header instead of writing raw samples
        #[arg(long)]
        wav: bool,
    },
    /// Run one synthesis request and save the provider's audio
    Synthesize {
        /// Text to speak (defaults to the configured response text)
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Play a scripted call against a running bridge
    Simulate {
        #[arg(long, default_value = "ws://127.0.0.1:8777/ws")]
        url: String,
        #[arg(short, long)]
        text: Option<String>,
        /// Number of media frames to send
        #[arg(short, long, default_value_t = 1)]
        frames: u32,
        /// Seconds to wait for each reply
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("exotel_bridge=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => run_server(&cli.config, port).await,
        Command::Transcode { input, output, wav } => {
            let container = if wav { PcmContainer::Wav } else { PcmContainer::Raw };
            let report = convert_file(&SymphoniaTranscoder::new(), &input, &output, container)?;
            println!(
                "{} -> {} ({:.2}s, {} bytes)",
                input.display(),
                output.display(),
                report.output_duration_seconds(),
                report.output_bytes
            );
            Ok(())
        }
        Command::Synthesize { text, out } => {
            let cfg = Config::load(&cli.config)?;
            let client = ElevenLabsClient::new(&cfg.synthesis)
                .context("Synthesis provider is not configured")?;
            let text = text.unwrap_or(cfg.session.default_response_text);

            let audio = client.synthesize(&text).await?;
            tokio::fs::write(&out, &audio)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;

            println!("Wrote {} bytes to {}", audio.len(), out.display());
            Ok(())
        }
        Command::Simulate {
            url,
            text,
            frames,
            timeout,
        } => {
            let call = SimulatedCall {
                response_text: text,
                media_frames: frames,
                response_timeout: Duration::from_secs(timeout),
                ..SimulatedCall::default()
            };

            let replies = simulate_call(&url, &call).await?;
            for reply in &replies {
                println!("{}", reply);
            }
            info!("{} of {} media frames answered", replies.len(), frames);
            Ok(())
        }
    }
}

async fn run_server(config_path: &str, port: Option<u16>) -> Result<()> {
    let mut cfg = Config::load(config_path)?;
    if let Some(port) = port {
        cfg.server.port = port;
    }

    info!("Exotel bridge v{}", env!("CARGO_PKG_VERSION"));

    // Credentials are checked before binding
    let synthesizer = ElevenLabsClient::new(&cfg.synthesis)
        .context("Synthesis provider is not configured")?;
    info!("Using ElevenLabs voice {}", synthesizer.voice_id());

    let state = AppState::new(
        Arc::new(synthesizer),
        Arc::new(SymphoniaTranscoder::new()),
        SessionConfig::from_config(&cfg),
    );

    let addr = format!("{}:{}", cfg.server.bind, cfg.server.port);
    exotel_bridge::serve(&addr, state).await
}
