//! Announcement decision engine
//!
//! Driven by position ticks from the route collaborator. Each tick looks at
//! the next maneuver (and the one after it), decides which escalation tier
//! applies and, at most once per tier, composes an utterance for the
//! attached sink. Alarms, arrivals and route notices enter through their own
//! entry points and share the same dispatch path.

use chrono::{Duration, NaiveDateTime};
use guidance_types::{GuidanceSettings, VehicleProfile};
use serde::{Deserialize, Serialize};

use crate::alarms::{AlarmKind, AlarmThrottle};
use crate::command::{
    CommandSink, CuePlayer, PendingCommand, Phrase, SinkCapabilities, Utterance,
    VoiceMessageListeners,
};
use crate::phrase::{PhraseBuilder, SpeakableName};
use crate::route::{
    BearSide, Maneuver, ManeuverAhead, ManeuverSource, RoadSegment, TurnKind, is_target_point,
};
use crate::timing::{Imminence, TimingProfile};

use super::{AnnouncementProgress, Tier};

/// Arrival-type points besides the route targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Waypoint,
    Favorite,
    Poi,
}

impl PointKind {
    /// Waypoints and favorites are preceded by the cue sound
    fn has_cue(self) -> bool {
        matches!(self, PointKind::Waypoint | PointKind::Favorite)
    }
}

pub struct GuidanceEngine {
    settings: GuidanceSettings,
    timing: TimingProfile,
    progress: AnnouncementProgress,
    alarms: AlarmThrottle,
    sink: Option<Box<dyn CommandSink>>,
    /// Route notice waiting for a sink
    pending: Option<PendingCommand>,
    cue: Option<Box<dyn CuePlayer>>,
    listeners: VoiceMessageListeners,
    last_announcement: Option<NaiveDateTime>,
    /// Extra distance covered while the Bluetooth link warms up; refreshed on
    /// every threshold comparison
    bt_delay_distance: f64,
}

impl std::fmt::Debug for GuidanceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuidanceEngine")
            .field("vehicle", &self.settings.vehicle)
            .field("progress", &self.progress)
            .field("sink_attached", &self.sink.is_some())
            .field("pending", &self.pending)
            .field("last_announcement", &self.last_announcement)
            .finish_non_exhaustive()
    }
}

impl Default for GuidanceEngine {
    fn default() -> Self {
        Self::new(GuidanceSettings::default())
    }
}

impl GuidanceEngine {
    pub fn new(settings: GuidanceSettings) -> Self {
        Self::with_listeners(settings, VoiceMessageListeners::default())
    }

    /// Engine whose listeners are notified through a specific scheduler
    pub fn with_listeners(settings: GuidanceSettings, listeners: VoiceMessageListeners) -> Self {
        let timing = TimingProfile::for_vehicle(&settings.vehicle);
        Self {
            settings,
            timing,
            progress: AnnouncementProgress::default(),
            alarms: AlarmThrottle::default(),
            sink: None,
            pending: None,
            cue: None,
            listeners,
            last_announcement: None,
            bt_delay_distance: 0.0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &GuidanceSettings {
        &self.settings
    }

    /// Replace the settings. Thresholds are re-derived from the vehicle profile.
    pub fn set_settings(&mut self, settings: GuidanceSettings) {
        if settings.vehicle != self.settings.vehicle {
            tracing::info!(vehicle = ?settings.vehicle, "Vehicle profile changed");
        }
        self.timing = TimingProfile::for_vehicle(&settings.vehicle);
        self.settings = settings;
    }

    /// Switch vehicle class or default speed
    pub fn set_vehicle(&mut self, vehicle: VehicleProfile) {
        let mut settings = self.settings.clone();
        settings.vehicle = vehicle;
        self.set_settings(settings);
    }

    pub fn set_mute(&mut self, mute: bool) {
        self.settings.mute = mute;
    }

    pub fn is_mute(&self) -> bool {
        self.settings.mute
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    pub fn progress(&self) -> &AnnouncementProgress {
        &self.progress
    }

    pub fn tier(&self) -> Tier {
        self.progress.tier()
    }

    pub fn alarms(&self) -> &AlarmThrottle {
        &self.alarms
    }

    pub fn last_announcement(&self) -> Option<NaiveDateTime> {
        self.last_announcement
    }

    pub fn listeners(&self) -> &VoiceMessageListeners {
        &self.listeners
    }

    pub fn set_cue_player(&mut self, cue: Option<Box<dyn CuePlayer>>) {
        self.cue = cue;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sink
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach a speech backend. A queued route notice is spoken immediately
    /// with the distance and time left on `source`.
    pub fn attach_sink(
        &mut self,
        sink: Box<dyn CommandSink>,
        source: &dyn ManeuverSource,
        now: NaiveDateTime,
    ) {
        tracing::info!(capabilities = ?sink.capabilities(), "Command sink attached");
        self.sink = Some(sink);
        if let Some(pending) = self.pending.take()
            && let Some(utterance) = pending.utterance(source)
        {
            tracing::info!("Playing queued route notice");
            self.last_announcement = Some(now);
            self.dispatch(utterance);
        }
    }

    pub fn detach_sink(&mut self) -> Option<Box<dyn CommandSink>> {
        let sink = self.sink.take();
        if sink.is_some() {
            tracing::info!("Command sink detached");
        }
        sink
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn pending(&self) -> Option<&PendingCommand> {
        self.pending.as_ref()
    }

    /// Stop the utterance currently being spoken
    pub fn interrupt_route_commands(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.stop();
        }
    }

    /// Drop everything the sink has queued
    pub fn on_application_terminate(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.clear();
        }
    }

    fn capabilities(&self) -> Option<&SinkCapabilities> {
        self.sink.as_deref().map(|s| s.capabilities())
    }

    fn phrases(&self) -> PhraseBuilder<'_> {
        PhraseBuilder::new(&self.settings, self.capabilities())
    }

    /// Start a new utterance. `None` when no sink is attached, in which case
    /// the announcement is dropped.
    fn speaker(&mut self, now: NaiveDateTime) -> Option<Utterance> {
        if self.sink.is_none() {
            tracing::debug!("No command sink, announcement dropped");
            return None;
        }
        self.last_announcement = Some(now);
        Some(Utterance::new())
    }

    fn dispatch(&mut self, utterance: Utterance) {
        if utterance.is_empty() {
            return;
        }
        if self.settings.notifies_listeners() {
            self.listeners.notify();
        }
        if self.settings.mute {
            tracing::debug!(%utterance, "Muted, utterance dropped");
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            tracing::debug!(%utterance, "Speaking");
            sink.play(utterance);
        }
    }

    fn play_cue(&self) {
        if self.settings.mute {
            return;
        }
        if let Some(cue) = self.cue.as_ref()
            && let Err(e) = cue.play_cue()
        {
            tracing::warn!(error = %e, "Cue sound failed");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Thresholds
    // ─────────────────────────────────────────────────────────────────────────

    fn refresh_bt_delay(&mut self, speed: f32) {
        let warming_up = self.settings.guidance_over_bt_sco
            && !self.sink.as_ref().is_some_and(|s| s.sco_connected());
        self.bt_delay_distance = if warming_up {
            let speed = f64::from(self.timing.effective_speed(speed));
            speed * f64::from(self.settings.bt_sco_delay_ms) / 1000.0
        } else {
            0.0
        };
    }

    /// Whether `distance` is inside `threshold`, by raw distance or by time
    /// to cover it at `current_speed` against `threshold_speed`. Widened by
    /// the Bluetooth warm-up distance while the link is not yet open.
    pub fn is_imminent(
        &mut self,
        current_speed: f32,
        distance: f64,
        threshold: u32,
        threshold_speed: f32,
    ) -> bool {
        self.refresh_bt_delay(current_speed);
        self.timing.is_imminent(
            current_speed,
            distance,
            f64::from(threshold),
            threshold_speed,
            self.bt_delay_distance,
        )
    }

    /// Coarse closeness of a maneuver at `distance`
    pub fn calculate_imminent(&mut self, distance: f64, speed: Option<f32>) -> Imminence {
        let speed = speed.unwrap_or(self.timing.default_speed);
        let turn = self.timing.turn;
        if self.is_imminent(speed, distance, turn, 0.0) {
            Imminence::Turn
        } else if distance <= f64::from(self.timing.prepare) {
            Imminence::Prepare
        } else if distance <= f64::from(self.timing.prepare_long) {
            Imminence::LongPrepare
        } else {
            Imminence::Far
        }
    }

    fn needs_informing(&self, now: NaiveDateTime) -> bool {
        let Some(secs) = self.settings.keep_informing_secs() else {
            return false;
        };
        self.last_announcement
            .is_none_or(|last| now > last + Duration::seconds(secs))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Position ticks
    // ─────────────────────────────────────────────────────────────────────────

    /// Process one position update
    pub fn tick(&mut self, source: &dyn ManeuverSource, speed: Option<f32>, now: NaiveDateTime) {
        self.update(source, speed, now, false);
    }

    /// Re-speak the current instruction on demand
    pub fn announce_current_direction(
        &mut self,
        source: &dyn ManeuverSource,
        speed: Option<f32>,
        now: NaiveDateTime,
    ) {
        if self.progress.tier() == Tier::UTurnWaypointTold {
            if self.play_u_turn_at_waypoint(now) {
                self.progress.disarm_go_ahead();
            }
            return;
        }
        self.update(source, speed, now, true);
    }

    /// Core tier evaluation. With `repeat` the current tier's prompt is
    /// spoken again even if it was already passed.
    pub fn update(
        &mut self,
        source: &dyn ManeuverSource,
        speed: Option<f32>,
        now: NaiveDateTime,
        repeat: bool,
    ) {
        let speed = match speed {
            Some(s) if s.is_finite() => s.max(self.timing.default_speed),
            _ => self.timing.default_speed,
        };

        let Some(next_info) = source.next_maneuver() else {
            return;
        };
        let Some(next) = next_info.maneuver.clone() else {
            return;
        };
        let dist = next_info.distance;
        let current = source.current_segment();

        if self.progress.observe(next.id) {
            self.alarms.back_on_route_pending = false;
            tracing::debug!(maneuver = ?next.id, dist, "Tracking new maneuver");
        }

        if dist <= 0 {
            return;
        }

        if !repeat {
            if self.needs_informing(now) {
                let street = self.phrases().street_name(current.as_ref(), Some(&next), false);
                self.play_go_ahead(now, dist, street);
                return;
            }
            if self.progress.tier() == Tier::Told {
                return;
            }
        }

        let t = self.timing;
        if self.progress.tier() == Tier::Unknown {
            self.progress.arm_go_ahead(dist, t.turn, t.prepare_long);
        }

        let next_next = source.maneuver_after(&next_info);
        let tier = self.progress.tier();
        let reachable = |stage: Tier| repeat || tier.not_passed(stage);
        let speakable = next.turn.is_some();
        if !speakable {
            tracing::warn!(maneuver = ?next.id, "Maneuver without turn descriptor");
        }
        let d = f64::from(dist);

        if reachable(Tier::Turn) && self.is_imminent(speed, d, t.turn, t.turn_default_speed) {
            if speakable {
                self.speak_turn(now, current.as_ref(), &next, next_next.as_ref());
            }
            self.complete(Tier::Turn);
        } else if reachable(Tier::TurnIn) && self.is_imminent(speed, d, t.turn_in, 0.0) {
            if speakable && (repeat || dist >= t.turn_in_end as i32) {
                let close_next = match next_next.as_ref() {
                    Some(nn) => {
                        let nn_dist = f64::from(nn.distance);
                        self.is_imminent(speed, nn_dist, t.turn, 0.0)
                            || nn.distance < t.turn_in_end as i32
                    }
                    None => false,
                };
                let pronounce = next_next
                    .as_ref()
                    .filter(|_| close_next)
                    .and_then(|nn| nn.maneuver.as_ref());
                let spoken_dist = f64::from(dist) - self.bt_delay_distance;
                self.play_make_turn_in(now, current.as_ref(), &next, spoken_dist, pronounce);
                self.play_go_and_arrive(now, repeat, &next_info, current.as_ref());
            }
            self.complete(Tier::TurnIn);
        } else if reachable(Tier::Prepare) && dist <= t.prepare as i32 {
            if speakable && (repeat || dist >= t.prepare_end as i32) {
                let keep = next.turn.is_some_and(|turn| turn.is_keep());
                if repeat || !keep {
                    self.play_prepare_turn(now, current.as_ref(), &next, d);
                    self.play_go_and_arrive(now, repeat, &next_info, current.as_ref());
                }
            }
            self.complete(Tier::Prepare);
        } else if reachable(Tier::LongPrepare) && dist <= t.prepare_long as i32 {
            if speakable && (repeat || dist >= t.prepare_long_end as i32) {
                self.play_prepare_turn(now, current.as_ref(), &next, d);
                self.play_go_and_arrive(now, repeat, &next_info, current.as_ref());
            }
            self.complete(Tier::LongPrepare);
        } else if tier.not_passed(Tier::Unknown) {
            self.complete(Tier::Unknown);
        } else if repeat
            || (tier.not_passed(Tier::Prepare) && self.progress.go_ahead_reached(dist))
        {
            self.progress.disarm_go_ahead();
            let street = self.phrases().street_name(current.as_ref(), Some(&next), false);
            self.play_go_ahead(now, dist, street);
        }
    }

    fn complete(&mut self, stage: Tier) {
        let before = self.progress.tier();
        self.progress.complete(stage);
        let tier = self.progress.tier();
        if tier != before {
            tracing::debug!(?before, tier = ?tier, "Tier advanced");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Maneuver prompts
    // ─────────────────────────────────────────────────────────────────────────

    fn play_go_ahead(&mut self, now: NaiveDateTime, dist: i32, street: SpeakableName) {
        if let Some(mut utterance) = self.speaker(now) {
            utterance.go_ahead(Some(f64::from(dist)), street);
            self.dispatch(utterance);
        }
    }

    /// Arrival clause for a target point, or `None` for regular maneuvers
    fn arrival_phrase(&self, info: &ManeuverAhead) -> Option<Phrase> {
        if !info.is_target_point() {
            return None;
        }
        let name = self.phrases().point_name(info.point_name());
        Some(if info.is_intermediate() {
            Phrase::AndArriveAtIntermediatePoint { name }
        } else {
            Phrase::AndArriveAtDestination { name }
        })
    }

    /// TURN tier: the turn itself, any close follow-up, and the arrival clause
    /// when the follow-up is a route target.
    fn speak_turn(
        &mut self,
        now: NaiveDateTime,
        current: Option<&RoadSegment>,
        next: &Maneuver,
        next_next: Option<&ManeuverAhead>,
    ) {
        let turn_in_end = self.timing.turn_in_end as i32;
        let close = next_next.filter(|nn| nn.distance < turn_in_end);
        self.play_make_turn(now, current, next, close);

        if next.is_straight() || !is_target_point(next_next) {
            return;
        }
        let Some(nn) = next_next else {
            return;
        };
        let Some(arrival) = self.arrival_phrase(nn) else {
            return;
        };
        let nn_dist = f64::from(nn.distance);
        let nn_straight = nn.turn().is_some_and(|turn| turn.is_straight());

        if nn.distance < turn_in_end {
            if let Some(mut utterance) = self.speaker(now) {
                if nn_straight {
                    utterance.then().go_ahead(Some(nn_dist), SpeakableName::Empty);
                }
                utterance.push(arrival);
                self.dispatch(utterance);
            }
        } else if nn_dist < f64::from(turn_in_end) * 1.2
            && let Some(mut utterance) = self.speaker(now)
        {
            utterance
                .then()
                .go_ahead(Some(nn_dist), SpeakableName::Empty)
                .push(arrival);
            self.dispatch(utterance);
        }
    }

    /// "Turn left onto ..." without a distance, chained with the following
    /// maneuver when it is close
    fn play_make_turn(
        &mut self,
        now: NaiveDateTime,
        current: Option<&RoadSegment>,
        next: &Maneuver,
        close_next: Option<&ManeuverAhead>,
    ) {
        let Some(turn) = next.turn else {
            return;
        };
        let include_destination = !self.progress.suppress_destination();
        let street = self
            .phrases()
            .street_name(current, Some(next), include_destination);
        let Some(mut utterance) = self.speaker(now) else {
            return;
        };

        let mut play = true;
        if let Some(direction) = turn.direction() {
            utterance.push(Phrase::Turn {
                direction,
                distance: None,
                street,
            });
        } else if let TurnKind::Roundabout { exit, angle } = turn {
            utterance.push(Phrase::Roundabout {
                distance: None,
                angle,
                exit,
                street,
            });
        } else if turn.is_u_turn() {
            utterance.push(Phrase::MakeUTurn {
                distance: None,
                street,
            });
        } else {
            play = false;
        }

        if let Some(nn) = close_next
            && let Some(nn_turn) = nn.turn()
        {
            if !nn_turn.is_straight() && turn.is_straight() {
                utterance.go_ahead(None, SpeakableName::Empty);
                play = true;
            }
            if play {
                let nn_dist = Some(f64::from(nn.distance));
                if let Some(direction) = nn_turn.direction() {
                    utterance.then().push(Phrase::Turn {
                        direction,
                        distance: nn_dist,
                        street: SpeakableName::Empty,
                    });
                } else if let TurnKind::Roundabout { exit, angle } = nn_turn {
                    utterance.then().push(Phrase::Roundabout {
                        distance: nn_dist,
                        angle,
                        exit,
                        street: SpeakableName::Empty,
                    });
                } else if nn_turn.is_u_turn() {
                    utterance.then().push(Phrase::MakeUTurn {
                        distance: nn_dist,
                        street: SpeakableName::Empty,
                    });
                }
            }
        }

        if play {
            self.dispatch(utterance);
        }
    }

    /// "In 300 m turn left onto ...", optionally "then bear right"
    fn play_make_turn_in(
        &mut self,
        now: NaiveDateTime,
        current: Option<&RoadSegment>,
        next: &Maneuver,
        dist: f64,
        pronounce_next: Option<&Maneuver>,
    ) {
        let Some(turn) = next.turn else {
            return;
        };
        let phrases = self.phrases();
        let with_destination = phrases.street_name(current, Some(next), true);
        let without_destination = phrases.street_name(current, Some(next), false);
        let Some(mut utterance) = self.speaker(now) else {
            return;
        };

        let mut play = true;
        if let Some(direction) = turn.direction() {
            utterance.push(Phrase::Turn {
                direction,
                distance: Some(dist),
                street: with_destination.clone(),
            });
            self.progress.set_suppress_destination(true);
        } else if let TurnKind::Roundabout { exit, angle } = turn {
            utterance.push(Phrase::Roundabout {
                distance: Some(dist),
                angle,
                exit,
                street: with_destination.clone(),
            });
            self.progress.set_suppress_destination(false);
        } else if turn.is_u_turn() {
            utterance.push(Phrase::MakeUTurn {
                distance: Some(dist),
                street: with_destination.clone(),
            });
            self.progress.set_suppress_destination(true);
        } else {
            play = false;
        }

        if let Some(nn_turn) = pronounce_next.and_then(|m| m.turn) {
            play = true;
            if !nn_turn.is_straight() && turn.is_straight() {
                utterance.go_ahead(Some(dist), with_destination);
            }
            match nn_turn.bearing_side() {
                Some(BearSide::Left) => {
                    utterance.then().push(Phrase::BearLeft {
                        street: without_destination,
                    });
                }
                Some(BearSide::Right) => {
                    utterance.then().push(Phrase::BearRight {
                        street: without_destination,
                    });
                }
                None => {}
            }
        }

        if play {
            self.dispatch(utterance);
        }
    }

    /// "After 1.4 km turn left onto ..."
    fn play_prepare_turn(
        &mut self,
        now: NaiveDateTime,
        current: Option<&RoadSegment>,
        next: &Maneuver,
        dist: f64,
    ) {
        let Some(turn) = next.turn else {
            return;
        };
        let street = self.phrases().street_name(current, Some(next), true);
        let Some(mut utterance) = self.speaker(now) else {
            return;
        };

        if let Some(direction) = turn.direction() {
            utterance.push(Phrase::PrepareTurn {
                direction,
                distance: dist,
                street,
            });
        } else if let TurnKind::Roundabout { exit, .. } = turn {
            utterance.push(Phrase::PrepareRoundabout {
                distance: dist,
                exit,
                street,
            });
        } else if turn.is_u_turn() {
            utterance.push(Phrase::PrepareMakeUTurn {
                distance: dist,
                street,
            });
        }
        self.dispatch(utterance);
    }

    /// Arrival clause when the next maneuver is itself a route target.
    /// Spoken once per maneuver unless repeating.
    fn play_go_and_arrive(
        &mut self,
        now: NaiveDateTime,
        repeat: bool,
        next_info: &ManeuverAhead,
        current: Option<&RoadSegment>,
    ) {
        if !next_info.is_target_point() || (self.progress.arrival_announced() && !repeat) {
            return;
        }
        let Some(arrival) = self.arrival_phrase(next_info) else {
            return;
        };
        let straight = next_info.turn().is_some_and(|turn| turn.is_straight());

        if straight {
            let street = self
                .phrases()
                .street_name(current, next_info.maneuver.as_ref(), false);
            if let Some(mut utterance) = self.speaker(now) {
                utterance
                    .go_ahead(Some(f64::from(next_info.distance)), street)
                    .push(arrival);
                self.dispatch(utterance);
            }
            self.progress.mark_arrival_announced();
        } else if i64::from(next_info.distance) <= 2 * i64::from(self.timing.turn_in) {
            if let Some(utterance) = self.speaker(now) {
                self.dispatch(utterance.with(arrival));
            }
            self.progress.mark_arrival_announced();
        }
    }

    fn play_u_turn_at_waypoint(&mut self, now: NaiveDateTime) -> bool {
        match self.speaker(now) {
            Some(utterance) => {
                self.dispatch(utterance.with(Phrase::MakeUTurnAtWaypoint));
                true
            }
            None => false,
        }
    }

    /// Tell the driver to turn around at an intermediate waypoint
    pub fn announce_u_turn_at_waypoint(&mut self, now: NaiveDateTime) {
        if self.play_u_turn_at_waypoint(now) {
            self.progress.enter_u_turn_waypoint();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Alarms
    // ─────────────────────────────────────────────────────────────────────────

    /// Road alarm from the route collaborator. `speed` is the current speed
    /// in m/s, used by speed-limit alarms.
    pub fn announce_alarm(&mut self, alarm: AlarmKind, speed: f32, now: NaiveDateTime) {
        if let AlarmKind::SpeedLimit { max_speed } = alarm {
            self.announce_speed_alarm(max_speed, speed, now);
            return;
        }
        if !alarm.is_enabled(&self.settings) {
            return;
        }
        match self.speaker(now) {
            Some(utterance) => self.dispatch(utterance.with(Phrase::Attention { alarm })),
            None => tracing::warn!(%alarm, "No command sink, alarm dropped"),
        }
        if alarm == AlarmKind::TollBooth {
            self.progress.set_suppress_destination(false);
        }
    }

    /// Over-the-limit observation; spoken after the debounce
    pub fn announce_speed_alarm(&mut self, max_speed: u32, speed: f32, now: NaiveDateTime) {
        let enabled = self.settings.speak_speed_limit;
        if !self.alarms.speed_limit.poll(now, enabled) {
            return;
        }
        if let Some(utterance) = self.speaker(now) {
            self.alarms.speed_limit.mark_spoken(now);
            tracing::info!(max_speed, speed, "Speed alarm");
            self.dispatch(utterance.with(Phrase::SpeedAlarm { max_speed, speed }));
        }
    }

    /// Vehicle left the route, `distance` meters from it
    pub fn announce_off_route(&mut self, distance: f64, now: NaiveDateTime) {
        if !self.alarms.off_route.is_due(now) {
            return;
        }
        if let Some(utterance) = self.speaker(now) {
            self.dispatch(utterance.with(Phrase::OffRoute { distance }));
            self.alarms.back_on_route_pending = true;
        }
        self.alarms.off_route.record(now);
        tracing::info!(distance, wait = ?self.alarms.off_route.wait(), "Off route");
    }

    /// Vehicle returned to the route
    pub fn announce_back_on_route(&mut self, now: NaiveDateTime) {
        if self.alarms.back_on_route_pending {
            if let Some(utterance) = self.speaker(now) {
                self.dispatch(utterance.with(Phrase::BackOnRoute));
            }
            self.alarms.back_on_route_pending = false;
        }
        self.alarms.off_route.reset();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Points and arrival
    // ─────────────────────────────────────────────────────────────────────────

    /// Approaching waypoints, favorites or POIs `distance` meters ahead
    pub fn approach_point(
        &mut self,
        kind: PointKind,
        names: &[String],
        distance: f64,
        now: NaiveDateTime,
    ) {
        let Some(mut utterance) = self.speaker(now) else {
            return;
        };
        if kind.has_cue() {
            self.play_cue();
        }
        let name = names.join(", ");
        utterance.go_ahead(Some(distance), SpeakableName::Empty);
        utterance.push(match kind {
            PointKind::Waypoint => Phrase::AndArriveAtWaypoint { name },
            PointKind::Favorite => Phrase::AndArriveAtFavorite { name },
            PointKind::Poi => Phrase::AndArriveAtPoi { name },
        });
        self.dispatch(utterance);
    }

    /// Passing waypoints, favorites or POIs now
    pub fn announce_point(&mut self, kind: PointKind, names: &[String], now: NaiveDateTime) {
        let Some(utterance) = self.speaker(now) else {
            return;
        };
        if kind.has_cue() {
            self.play_cue();
        }
        let name = names.join(", ");
        self.dispatch(utterance.with(match kind {
            PointKind::Waypoint => Phrase::ArrivedAtWaypoint { name },
            PointKind::Favorite => Phrase::ArrivedAtFavorite { name },
            PointKind::Poi => Phrase::ArrivedAtPoi { name },
        }));
    }

    pub fn arrived_at_destination(&mut self, name: &str, now: NaiveDateTime) {
        let name = self.phrases().point_name(name);
        if let Some(utterance) = self.speaker(now) {
            self.dispatch(utterance.with(Phrase::ArrivedAtDestination { name }));
        }
    }

    pub fn arrived_at_intermediate_point(&mut self, name: &str, now: NaiveDateTime) {
        let name = self.phrases().point_name(name);
        if let Some(utterance) = self.speaker(now) {
            self.dispatch(utterance.with(Phrase::ArrivedAtIntermediatePoint { name }));
        }
    }

    pub fn gps_location_lost(&mut self, now: NaiveDateTime) {
        if let Some(utterance) = self.speaker(now) {
            self.dispatch(utterance.with(Phrase::GpsLocationLost));
        }
    }

    pub fn gps_location_recover(&mut self, now: NaiveDateTime) {
        if let Some(utterance) = self.speaker(now) {
            self.dispatch(utterance.with(Phrase::GpsLocationRecover));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Routes
    // ─────────────────────────────────────────────────────────────────────────

    /// A route was calculated (`new_route`) or recalculated after leaving it.
    /// Without a sink the notice is kept until one is attached.
    pub fn new_route_calculated(
        &mut self,
        new_route: bool,
        source: &dyn ManeuverSource,
        now: NaiveDateTime,
    ) {
        let command = PendingCommand::new(new_route);
        tracing::info!(new_route, left = source.left_distance(), "Route calculated");

        if self.sink.is_none() {
            self.pending = Some(command);
        } else if let Some(utterance) = command.utterance(source) {
            self.last_announcement = Some(now);
            self.dispatch(utterance);
        }

        self.progress.reset_for_route(new_route);
        if new_route {
            self.alarms.reset();
        }
    }
}
