use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use voxclone_core::service::{HttpSynthesisService, SynthesisService};
use voxclone_core::settings::SettingsManager;
use voxclone_core::types::Language;

mod oneshot;
mod player;
mod tui;

use crate::tui::TuiApp;

#[derive(Parser, Debug)]
#[command(name = "voxclone")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "VoxClone - text-to-speech and voice cloning from the terminal")]
struct Args {
    /// Load settings from a specific profile
    #[arg(long, value_name = "NAME", global = true)]
    profile: Option<String>,

    /// Synthesis service address, overriding the configured one
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize text with the service's default voice
    Synthesize {
        #[arg(long)]
        text: String,

        /// File or directory to save the audio to
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Synthesize text in the voice of an audio sample
    Clone {
        #[arg(long)]
        text: String,

        /// Audio sample to clone (5-10 seconds works best)
        #[arg(long)]
        voice_file: PathBuf,

        /// Language code, e.g. en, fr, zh-cn
        #[arg(long)]
        language: Option<Language>,

        /// Media type of the sample when its extension is not recognised
        #[arg(long)]
        media_type: Option<String>,

        /// File or directory to save the audio to
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show what the synthesis service has loaded
    Info,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    let settings_manager = SettingsManager::from_settings_dir(
        SettingsManager::default_settings_dir()?,
        args.profile.as_deref(),
    )?;
    // The override applies to this run only and is never written back
    let mut settings = settings_manager.settings();
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }

    info!(
        "CLI startup: profile={:?}, base_url={}, command={:?}",
        settings_manager.current_profile(),
        settings.base_url,
        args.command
    );

    let service: Arc<dyn SynthesisService> =
        Arc::new(HttpSynthesisService::new(settings.base_url.clone())?);

    match args.command {
        Some(Command::Synthesize { text, out }) => {
            let saved = oneshot::run_synthesize(service, &settings, text, out).await?;
            println!("{}", saved.display());
        }
        Some(Command::Clone {
            text,
            voice_file,
            language,
            media_type,
            out,
        }) => {
            let request = oneshot::CloneArgs {
                text,
                voice_file,
                language: language.unwrap_or(settings.default_language),
                media_type,
                out,
            };
            let saved = oneshot::run_clone(service, &settings, request).await?;
            println!("{}", saved.display());
        }
        Some(Command::Info) => {
            print!("{}", oneshot::describe_service(service.as_ref()).await?);
        }
        None => {
            let mut tui_app = TuiApp::new(service, settings, settings_manager)?;
            tui_app.run().await?;
        }
    }

    Ok(())
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // The terminal belongs to the TUI, so traces go to a file in the user's home
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    let trace_dir = home.join(".voxclone").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("voxclone.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
