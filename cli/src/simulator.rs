//! Scenario runner
//!
//! Owns the engine, the scripted route and a simulated clock. Every step
//! advances the clock, drives one engine operation, runs listener callbacks
//! queued for the main context and prints what the sink received.

use chrono::{Duration, NaiveDateTime};
use tokio::sync::mpsc;

use guidance_core::command::{ChannelScheduler, MainTask};
use guidance_core::{
    AlarmKind, ChannelSink, GuidanceEngine, GuidanceSettings, PlannedRoute, SinkCapabilities,
    SpeechEvent, VoiceMessageListeners, create_speech_channel,
};

use crate::scenario::{Movement, Scenario, Step, TimedStep};
use crate::speech::SpeechService;

pub struct Simulator {
    engine: GuidanceEngine,
    route: PlannedRoute,
    start: NaiveDateTime,
    clock: NaiveDateTime,
    speed: Option<f32>,
    next_route_id: u32,
    speech_tx: mpsc::Sender<SpeechEvent>,
    capabilities: SinkCapabilities,
    speech: SpeechService,
    main_rx: mpsc::UnboundedReceiver<MainTask>,
}

impl Simulator {
    pub fn new(settings: GuidanceSettings, mut route: PlannedRoute, start: NaiveDateTime) -> Self {
        let (scheduler, main_rx) = ChannelScheduler::channel();
        let listeners = VoiceMessageListeners::new(std::sync::Arc::new(scheduler));
        if settings.notifies_listeners() {
            let secs = settings.wake_on_voice_secs;
            listeners.add(std::sync::Arc::new(move || {
                tracing::info!(secs, "Screen wake");
            }));
        }

        let (speech_tx, speech_rx) = create_speech_channel();
        route.reroute(1);

        Self {
            engine: GuidanceEngine::with_listeners(settings, listeners),
            route,
            start,
            clock: start,
            speed: None,
            next_route_id: 2,
            speech_tx,
            capabilities: SinkCapabilities::default(),
            speech: SpeechService::new(speech_rx, start),
            main_rx,
        }
    }

    /// Build from a scenario. The settings in the scenario win over `settings`.
    pub fn from_scenario(
        scenario: &Scenario,
        settings: GuidanceSettings,
        start: NaiveDateTime,
    ) -> Self {
        let settings = scenario.settings.clone().unwrap_or(settings);
        let mut sim = Self::new(settings, scenario.route.clone(), start);
        if scenario.attach_sink {
            sim.attach_sink();
        }
        sim.announce_route(true);
        sim
    }

    pub fn engine(&self) -> &GuidanceEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GuidanceEngine {
        &mut self.engine
    }

    pub fn route(&self) -> &PlannedRoute {
        &self.route
    }

    pub fn clock(&self) -> NaiveDateTime {
        self.clock
    }

    /// Simulated seconds since the start
    pub fn elapsed(&self) -> i64 {
        (self.clock - self.start).num_seconds()
    }

    pub fn speech_mut(&mut self) -> &mut SpeechService {
        &mut self.speech
    }

    pub fn speech(&self) -> &SpeechService {
        &self.speech
    }

    fn attach_sink(&mut self) {
        let sink = ChannelSink::new(self.speech_tx.clone(), self.capabilities.clone());
        self.engine.attach_sink(Box::new(sink), &self.route, self.clock);
        self.flush();
    }

    fn announce_route(&mut self, new_route: bool) {
        self.engine
            .new_route_calculated(new_route, &self.route, self.clock);
        self.flush();
    }

    fn move_vehicle(&mut self, movement: &Movement) {
        if let Some(position) = movement.position {
            self.route.advance_to(position);
        }
        if let Some(meters) = movement.advance {
            self.route.advance_by(meters);
        }
        if movement.speed.is_some() {
            self.speed = movement.speed;
        }
    }

    /// Run every step in order
    pub fn run(&mut self, steps: &[TimedStep]) -> Result<(), String> {
        for step in steps {
            self.apply(step)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, timed: &TimedStep) -> Result<(), String> {
        self.clock += Duration::seconds(i64::from(timed.after));
        let now = self.clock;
        tracing::debug!(step = ?timed.step, position = self.route.traveled(), "Step");

        match &timed.step {
            Step::Tick { movement } => {
                self.move_vehicle(movement);
                self.engine.tick(&self.route, self.speed, now);
            }
            Step::Repeat { movement } => {
                self.move_vehicle(movement);
                self.engine
                    .announce_current_direction(&self.route, self.speed, now);
            }
            Step::Alarm { alarm } => {
                let kind = AlarmKind::from_name(alarm)
                    .ok_or_else(|| format!("unknown alarm: {alarm}"))?;
                self.engine
                    .announce_alarm(kind, self.speed.unwrap_or(0.0), now);
            }
            Step::SpeedAlarm { max_speed, speed } => {
                self.engine.announce_speed_alarm(*max_speed, *speed, now);
            }
            Step::OffRoute { distance } => self.engine.announce_off_route(*distance, now),
            Step::BackOnRoute => self.engine.announce_back_on_route(now),
            Step::Reroute { new_route } => {
                self.route.reroute(self.next_route_id);
                self.next_route_id += 1;
                self.announce_route(*new_route);
            }
            Step::GpsLost => self.engine.gps_location_lost(now),
            Step::GpsRecovered => self.engine.gps_location_recover(now),
            Step::AttachSink => self.attach_sink(),
            Step::DetachSink => {
                self.engine.detach_sink();
            }
            Step::Arrive { intermediate, name } => {
                let name = name.as_deref().unwrap_or(&self.route.destination_name);
                if *intermediate {
                    self.engine.arrived_at_intermediate_point(name, now);
                } else {
                    self.engine.arrived_at_destination(name, now);
                }
            }
            Step::ApproachPoint {
                point,
                names,
                distance,
            } => self.engine.approach_point(*point, names, *distance, now),
            Step::PassPoint { point, names } => self.engine.announce_point(*point, names, now),
            Step::UTurnAtWaypoint => self.engine.announce_u_turn_at_waypoint(now),
            Step::Interrupt => self.engine.interrupt_route_commands(),
            Step::Mute { on } => self.engine.set_mute(*on),
            Step::Wait => {}
        }

        self.flush();
        Ok(())
    }

    /// Shut down: the sink drops whatever is still queued
    pub fn terminate(&mut self) {
        self.engine.on_application_terminate();
        self.flush();
    }

    /// Run queued main-context work and print sink output
    fn flush(&mut self) {
        while let Ok(task) = self.main_rx.try_recv() {
            task();
        }
        self.speech.drain(self.clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SCENARIO: &str = r#"
attach_sink = false

[route]
destination_name = "Home"
maneuvers = [
    { at = 2000.0, turn = { type = "left" }, street = "Elm Street" },
    { at = 3000.0, turn = { type = "straight" } },
]

[[steps]]
kind = "tick"
position = 600.0

[[steps]]
kind = "attach-sink"

[[steps]]
kind = "tick"
position = 1700.0
speed = 20.0
after = 60

[[steps]]
kind = "tick"
advance = 260.0

[[steps]]
kind = "arrive"
after = 30
"#;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn runs_scenario_with_late_sink() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        let mut sim = Simulator::from_scenario(&scenario, GuidanceSettings::default(), start());
        sim.run(&scenario.steps).unwrap();

        let history = sim.speech().history();
        assert_eq!(
            history,
            [
                "[    2s] Route calculated, 2.4 kilometers, 3 minutes",
                "[   62s] In 300 meters turn left onto Elm Street",
                "[   63s] Turn left onto Elm Street",
                "[   93s] You have arrived at your destination Home",
            ]
        );
        assert_eq!(sim.route().traveled(), 1960.0);
    }

    #[test]
    fn unknown_alarm_is_an_error() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        let mut sim = Simulator::from_scenario(&scenario, GuidanceSettings::default(), start());
        let err = sim
            .apply(&TimedStep::new(
                1,
                Step::Alarm {
                    alarm: "dragons".to_string(),
                },
            ))
            .unwrap_err();
        assert_eq!(err, "unknown alarm: dragons");
    }
}
