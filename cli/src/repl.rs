//! Interactive shell over a scenario's route
//!
//! Each line is split with `shlex` and parsed with clap, then applied to the
//! simulator as a single step.

use std::io::Write;

use clap::{Parser, Subcommand};

use guidance_core::PointKind;

use crate::scenario::{Movement, Step, TimedStep};
use crate::simulator::Simulator;

pub fn readline() -> Result<String, String> {
    write!(std::io::stdout(), "$ ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    let read = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok("exit".to_string());
    }
    Ok(buffer)
}

#[derive(Parser)]
#[command(no_binary_name = true, about = "guidance shell")]
struct Line {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(clap::Args, Debug, Clone, Copy)]
struct MoveArgs {
    /// Absolute position along the route (m)
    #[arg(long)]
    to: Option<f64>,
    /// Distance to drive from the current position (m)
    #[arg(long)]
    by: Option<f64>,
    /// Current speed (m/s)
    #[arg(short, long)]
    speed: Option<f32>,
}

impl From<MoveArgs> for Movement {
    fn from(args: MoveArgs) -> Self {
        Movement {
            position: args.to,
            advance: args.by,
            speed: args.speed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ReplCommand {
    /// Position update
    Tick {
        #[command(flatten)]
        movement: MoveArgs,
    },
    /// Repeat the current instruction
    Repeat {
        #[command(flatten)]
        movement: MoveArgs,
    },
    /// Let simulated time pass
    Wait { secs: u32 },
    /// Road alarm, e.g. toll_booth or railway
    Alarm { name: String },
    SpeedAlarm { max_speed: u32, speed: f32 },
    OffRoute { distance: f64 },
    BackOnRoute,
    Reroute {
        #[arg(long)]
        new_route: bool,
    },
    GpsLost,
    GpsRecovered,
    Attach,
    Detach,
    Arrive {
        name: Option<String>,
        #[arg(long)]
        intermediate: bool,
    },
    Waypoint {
        names: Vec<String>,
        /// Announce the approach at this distance instead of passing
        #[arg(long)]
        distance: Option<f64>,
    },
    UTurn,
    Interrupt,
    Mute,
    Unmute,
    /// Show position, tier and timing
    Status,
    /// Show everything spoken so far
    History,
    Exit,
}

/// Handle one line. Returns true when the shell should exit.
pub fn respond(line: &str, sim: &mut Simulator) -> Result<bool, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    let parsed = Line::try_parse_from(args).map_err(|e| e.to_string())?;

    let step = match parsed.command {
        ReplCommand::Tick { movement } => Step::Tick {
            movement: movement.into(),
        },
        ReplCommand::Repeat { movement } => Step::Repeat {
            movement: movement.into(),
        },
        ReplCommand::Wait { secs } => return sim.apply(&TimedStep::new(secs, Step::Wait)).map(|_| false),
        ReplCommand::Alarm { name } => Step::Alarm { alarm: name },
        ReplCommand::SpeedAlarm { max_speed, speed } => Step::SpeedAlarm { max_speed, speed },
        ReplCommand::OffRoute { distance } => Step::OffRoute { distance },
        ReplCommand::BackOnRoute => Step::BackOnRoute,
        ReplCommand::Reroute { new_route } => Step::Reroute { new_route },
        ReplCommand::GpsLost => Step::GpsLost,
        ReplCommand::GpsRecovered => Step::GpsRecovered,
        ReplCommand::Attach => Step::AttachSink,
        ReplCommand::Detach => Step::DetachSink,
        ReplCommand::Arrive { name, intermediate } => Step::Arrive { intermediate, name },
        ReplCommand::Waypoint { names, distance } => match distance {
            Some(distance) => Step::ApproachPoint {
                point: PointKind::Waypoint,
                names,
                distance,
            },
            None => Step::PassPoint {
                point: PointKind::Waypoint,
                names,
            },
        },
        ReplCommand::UTurn => Step::UTurnAtWaypoint,
        ReplCommand::Interrupt => Step::Interrupt,
        ReplCommand::Mute => Step::Mute { on: true },
        ReplCommand::Unmute => Step::Mute { on: false },
        ReplCommand::Status => {
            print_status(sim);
            return Ok(false);
        }
        ReplCommand::History => {
            for line in sim.speech().history() {
                println!("{line}");
            }
            return Ok(false);
        }
        ReplCommand::Exit => {
            sim.terminate();
            println!("quitting...");
            return Ok(true);
        }
    };

    sim.apply(&TimedStep::new(1, step))?;
    Ok(false)
}

fn print_status(sim: &Simulator) {
    use guidance_core::ManeuverSource;

    let engine = sim.engine();
    println!("time:      {} s", sim.elapsed());
    println!("position:  {:.0} m", sim.route().traveled());
    match sim.route().next_maneuver() {
        Some(next) => println!("next:      {:?} in {} m", next.turn(), next.distance),
        None => println!("next:      (arrived)"),
    }
    println!("tier:      {:?}", engine.tier());
    println!("go-ahead:  {:?}", engine.progress().go_ahead());
    println!("sink:      {}", if engine.has_sink() { "attached" } else { "detached" });
    println!("muted:     {}", engine.is_mute());
}

/// Run the shell until `exit` or end of input
pub fn run(sim: &mut Simulator) -> Result<(), String> {
    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, sim) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use guidance_core::{GuidanceSettings, PlannedManeuver, PlannedRoute, Tier, TurnKind};

    fn simulator() -> Simulator {
        let route = PlannedRoute::new(
            1,
            vec![
                PlannedManeuver::new(2000.0, TurnKind::left()),
                PlannedManeuver::new(3000.0, TurnKind::Straight),
            ],
        )
        .unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Simulator::new(GuidanceSettings::default(), route, start)
    }

    #[test]
    fn tick_command_moves_and_advances_tier() {
        let mut sim = simulator();
        assert!(!respond("tick --to 1960", &mut sim).unwrap());
        assert_eq!(sim.route().traveled(), 1960.0);
        assert_eq!(sim.engine().tier(), Tier::Told);
    }

    #[test]
    fn bad_input_is_reported() {
        let mut sim = simulator();
        assert!(respond("tick --to", &mut sim).is_err());
        assert!(respond("alarm \"unterminated", &mut sim).is_err());
        assert!(respond("alarm dragons", &mut sim).is_err());
    }

    #[test]
    fn exit_ends_the_shell() {
        let mut sim = simulator();
        assert!(respond("exit", &mut sim).unwrap());
    }
}
