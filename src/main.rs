use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use talking_friend::api::{ApiServer, ApiState};
use talking_friend::brain::{ResponseEngine, SeededPicker};
use talking_friend::voice::{
    Assistant, ConsoleAdapter, ConsoleSpeaker, ElevenLabsTts, ProxySpeaker, RecordingSession,
    Speaker,
};
use talking_friend::Config;

/// Talking Friend - a tiny voice assistant with a text-to-speech proxy
#[derive(Parser)]
#[command(name = "talking-friend", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the assistant's reply to one utterance
    Ask {
        /// What was "heard"
        text: String,
        /// Seed for reproducible reply selection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Talk to the assistant from the terminal
    ///
    /// Press Enter to start or stop listening; typed lines are transcripts.
    Chat {
        /// Base URL of a running proxy; replies are synthesized through it
        #[arg(long)]
        speak_url: Option<String>,
        /// Where synthesized replies are written
        #[arg(long, default_value = "replies")]
        audio_out: PathBuf,
        /// Voice to request from the proxy
        #[arg(long)]
        voice_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,talking_friend=info",
        1 => "info,talking_friend=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Ask { text, seed } => {
            ask(&config, &text, seed);
            Ok(())
        }
        Command::Chat {
            speak_url,
            audio_out,
            voice_id,
        } => {
            chat(config, speak_url, audio_out, voice_id).await;
            Ok(())
        }
    }
}

/// Run the TTS proxy, reply endpoint and static UI
async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        port = config.server.port,
        static_dir = %config.server.static_dir.display(),
        "starting talking friend server"
    );

    let state = Arc::new(ApiState {
        synthesizer: Arc::new(ElevenLabsTts::new(&config.tts)),
        engine: Arc::new(ResponseEngine::new().with_custom_rules(&config.rules)),
        tts_configured: config.tts.api_key.is_some(),
        static_dir: Some(config.server.static_dir.clone()),
    });

    ApiServer::new(state, config.server.port).run().await?;
    Ok(())
}

/// Answer a single utterance
fn ask(config: &Config, text: &str, seed: Option<u64>) {
    let engine = ResponseEngine::new().with_custom_rules(&config.rules);
    let engine = match seed {
        Some(seed) => engine.with_picker(SeededPicker::new(seed)),
        None => engine,
    };

    let reply = engine.respond(text);
    tracing::debug!(intent = %reply.intent, "answered");
    println!("{}", reply.text);
}

/// Interactive console session
async fn chat(
    config: Config,
    speak_url: Option<String>,
    audio_out: PathBuf,
    voice_id: Option<String>,
) {
    let speaker: Arc<dyn Speaker> = match speak_url {
        Some(url) => Arc::new(ProxySpeaker::new(&url, voice_id, audio_out)),
        None => Arc::new(ConsoleSpeaker),
    };

    let adapter = ConsoleAdapter::new();
    let session = RecordingSession::new(adapter.clone(), config.session.max_duration);
    let engine = Arc::new(ResponseEngine::new().with_custom_rules(&config.rules));
    let mut assistant = Assistant::new(session, engine, speaker);

    let mut display = assistant.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_status = String::new();
        while display.changed().await.is_ok() {
            let current = display.borrow_and_update().clone();
            let status = current.status.to_string();
            if status != last_status {
                println!("[{status}] {}", current.button);
                last_status = status;
            }
        }
    });

    println!("Press Enter to talk, Enter again to stop, /quit to exit.");

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let input = tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        adapter.feed(stdin, tx).await;
    });

    assistant.run(rx).await;
    drop(assistant);

    input.abort();
    let _ = printer.await;
}
