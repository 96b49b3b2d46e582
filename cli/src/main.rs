use std::path::PathBuf;

use clap::{Parser, Subcommand};

use guidance_cli::commands::{self, RunOptions};
use guidance_cli::logging;

#[derive(Parser)]
#[command(version, about = "Turn-by-turn voice guidance simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Scenario TOML file
    scenario: PathBuf,
    /// Settings TOML file (default: ~/.config/guidance/settings.toml)
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Speak utterances through an external TTS program
    #[arg(long)]
    speak: bool,
    /// TTS program used with --speak
    #[arg(long)]
    tts: Option<String>,
    /// Cue sound for waypoint and favorite announcements
    #[arg(long)]
    cue: Option<PathBuf>,
}

impl RunArgs {
    fn options(&self) -> RunOptions {
        RunOptions {
            settings: self.settings.clone(),
            speak: self.speak,
            tts_program: self.tts.clone(),
            cue: self.cue.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print every utterance
    Simulate {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Drive a scenario's route interactively
    Repl {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the announcement thresholds for a vehicle class
    Thresholds {
        vehicle: String,
        /// Default speed in m/s for classes without a fixed table
        #[arg(short, long)]
        default_speed: Option<f32>,
    },
    /// Print the speakable form of a name
    Normalize {
        name: String,
        /// Voice language, e.g. "en" or "de"
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Simulate { run } => commands::simulate(&run.scenario, &run.options()).await,
        Commands::Repl { run } => commands::interactive(&run.scenario, &run.options()).await,
        Commands::Thresholds {
            vehicle,
            default_speed,
        } => commands::show_thresholds(vehicle, *default_speed),
        Commands::Normalize { name, language } => {
            commands::normalize(name, language.as_deref());
            Ok(())
        }
    }
}
