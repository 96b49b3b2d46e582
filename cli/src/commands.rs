use std::path::{Path, PathBuf};

use chrono::Local;

use guidance_core::phrase::speakable_point_name;
use guidance_core::{
    GuidanceSettings, TimingProfile, VehicleClass, VehicleProfile, default_settings_path,
    load_settings,
};

use crate::repl;
use crate::scenario::Scenario;
use crate::simulator::Simulator;
use crate::speech::{CommandCue, DEFAULT_TTS_PROGRAM};

/// Options shared by `simulate` and `repl`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub settings: Option<PathBuf>,
    pub speak: bool,
    pub tts_program: Option<String>,
    /// Sound played before waypoint and favorite announcements
    pub cue: Option<PathBuf>,
}

/// Settings from `--settings`, else from the default location, else defaults
pub fn resolve_settings(path: Option<&Path>) -> Result<GuidanceSettings, String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_settings_path() {
            Some(path) => path,
            None => return Ok(GuidanceSettings::default()),
        },
    };
    load_settings(&path).map_err(|e| match std::error::Error::source(&e) {
        Some(source) => format!("{e}: {source}"),
        None => e.to_string(),
    })
}

fn prepare(scenario_path: &Path, options: &RunOptions) -> Result<(Scenario, Simulator), String> {
    let scenario = Scenario::load(scenario_path)?;
    let settings = resolve_settings(options.settings.as_deref())?;
    let mut sim = Simulator::from_scenario(&scenario, settings, Local::now().naive_local());
    if let Some(cue) = &options.cue {
        sim.engine_mut()
            .set_cue_player(Some(Box::new(CommandCue::new("paplay", cue))));
    }
    Ok((scenario, sim))
}

fn start_voice(sim: &mut Simulator, options: &RunOptions) -> Option<tokio::task::JoinHandle<()>> {
    if !options.speak {
        return None;
    }
    let program = options.tts_program.as_deref().unwrap_or(DEFAULT_TTS_PROGRAM);
    Some(sim.speech_mut().with_voice(program))
}

pub async fn simulate(scenario_path: &Path, options: &RunOptions) -> Result<(), String> {
    let (scenario, mut sim) = prepare(scenario_path, options)?;
    let voice = start_voice(&mut sim, options);

    let result = sim.run(&scenario.steps);
    tracing::info!(
        steps = scenario.steps.len(),
        spoken = sim.speech().history().len(),
        "Scenario finished"
    );

    // Dropping the simulator closes the voice channel; wait for queued speech
    drop(sim);
    if let Some(voice) = voice {
        voice.await.map_err(|e| e.to_string())?;
    }
    result
}

pub async fn interactive(scenario_path: &Path, options: &RunOptions) -> Result<(), String> {
    let (_, mut sim) = prepare(scenario_path, options)?;
    let voice = start_voice(&mut sim, options);

    tokio::task::block_in_place(|| repl::run(&mut sim))?;

    drop(sim);
    if let Some(voice) = voice {
        voice.await.map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn show_thresholds(vehicle: &str, default_speed: Option<f32>) -> Result<(), String> {
    let class =
        VehicleClass::from_name(vehicle).ok_or_else(|| format!("unknown vehicle: {vehicle}"))?;
    let profile = VehicleProfile::new(
        class,
        default_speed.unwrap_or(VehicleProfile::default().default_speed),
    );
    let timing = TimingProfile::for_vehicle(&profile);

    println!("{:<20} {:>8}", "Threshold", "Value");
    println!("{}", "-".repeat(29));
    println!("{:<20} {:>6} m", "prepare_long", timing.prepare_long);
    println!("{:<20} {:>6} m", "prepare_long_end", timing.prepare_long_end);
    println!("{:<20} {:>6} m", "prepare", timing.prepare);
    println!("{:<20} {:>6} m", "prepare_end", timing.prepare_end);
    println!("{:<20} {:>6} m", "turn_in", timing.turn_in);
    println!("{:<20} {:>6} m", "turn_in_end", timing.turn_in_end);
    println!("{:<20} {:>6} m", "turn", timing.turn);
    println!("{:<20} {:>4.1} m/s", "turn_default_speed", timing.turn_default_speed);
    println!("{:<20} {:>4.1} m/s", "default_speed", timing.default_speed);
    Ok(())
}

pub fn normalize(name: &str, language: Option<&str>) {
    println!("{}", speakable_point_name(name, language));
}
