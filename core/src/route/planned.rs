//! Scripted route source
//!
//! A `PlannedRoute` is a list of maneuvers placed at cumulative distances
//! along the route. The vehicle position is a single "distance traveled"
//! value moved forward by the caller. The last maneuver is the destination.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

use super::{
    LocalizedName, Maneuver, ManeuverAhead, ManeuverId, ManeuverSource, RoadSegment, Target,
    TargetKind, TurnKind,
};

/// A maneuver at a fixed position along a planned route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedManeuver {
    /// Distance from the start of the route (m)
    pub at: f64,

    /// Missing descriptors are passed through as malformed maneuvers
    #[serde(default)]
    pub turn: Option<TurnKind>,

    #[serde(default)]
    pub street: Option<String>,

    #[serde(default, rename = "ref")]
    pub ref_code: Option<String>,

    #[serde(default)]
    pub destination: Option<String>,

    /// Reaching this maneuver completes an intermediate stop
    #[serde(default)]
    pub intermediate: bool,

    /// Name of the intermediate stop
    #[serde(default)]
    pub point_name: Option<String>,

    /// Road taken after this maneuver; derived from the names above when absent
    #[serde(default)]
    pub road: Option<RoadSegment>,
}

impl PlannedManeuver {
    pub fn new(at: f64, turn: TurnKind) -> Self {
        Self {
            at,
            turn: Some(turn),
            street: None,
            ref_code: None,
            destination: None,
            intermediate: false,
            point_name: None,
            road: None,
        }
    }

    pub fn street(mut self, street: &str) -> Self {
        self.street = Some(street.to_string());
        self
    }

    pub fn destination(mut self, destination: &str) -> Self {
        self.destination = Some(destination.to_string());
        self
    }

    pub fn intermediate(mut self, name: &str) -> Self {
        self.intermediate = true;
        self.point_name = Some(name.to_string());
        self
    }

    fn road_after(&self) -> RoadSegment {
        if let Some(road) = &self.road {
            return road.clone();
        }
        RoadSegment {
            ref_code: self.ref_code.clone(),
            name: self.street.as_deref().map(LocalizedName::new),
            destination: self.destination.as_deref().map(LocalizedName::new),
        }
    }
}

fn default_average_speed() -> f32 {
    13.0
}

/// In-memory route with a movable position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub maneuvers: Vec<PlannedManeuver>,

    #[serde(default)]
    pub start_road: Option<RoadSegment>,

    #[serde(default)]
    pub destination_name: String,

    /// Used for the remaining-time estimate (m/s)
    #[serde(default = "default_average_speed")]
    pub average_speed: f32,

    #[serde(skip)]
    route_id: u32,

    #[serde(skip)]
    traveled: f64,
}

impl PlannedRoute {
    pub fn new(route_id: u32, maneuvers: Vec<PlannedManeuver>) -> Result<Self, RouteError> {
        let route = Self {
            maneuvers,
            start_road: None,
            destination_name: String::new(),
            average_speed: default_average_speed(),
            route_id,
            traveled: 0.0,
        };
        route.validate()?;
        Ok(route)
    }

    /// Check that maneuvers exist and are placed at increasing positions
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.maneuvers.is_empty() {
            return Err(RouteError::Empty);
        }
        let mut previous = 0.0;
        for (index, m) in self.maneuvers.iter().enumerate() {
            if !m.at.is_finite() || m.at <= 0.0 {
                return Err(RouteError::InvalidPosition { index, at: m.at });
            }
            if index > 0 && m.at <= previous {
                return Err(RouteError::NotIncreasing {
                    index,
                    at: m.at,
                    previous,
                });
            }
            previous = m.at;
        }
        Ok(())
    }

    pub fn with_destination_name(mut self, name: &str) -> Self {
        self.destination_name = name.to_string();
        self
    }

    pub fn with_start_road(mut self, road: RoadSegment) -> Self {
        self.start_road = Some(road);
        self
    }

    pub fn route_id(&self) -> u32 {
        self.route_id
    }

    /// Give the route a new identity (every maneuver id changes) and restart
    /// from the current position.
    pub fn reroute(&mut self, route_id: u32) {
        self.route_id = route_id;
    }

    pub fn traveled(&self) -> f64 {
        self.traveled
    }

    pub fn advance_to(&mut self, position: f64) {
        self.traveled = position.max(0.0);
    }

    pub fn advance_by(&mut self, meters: f64) {
        self.advance_to(self.traveled + meters);
    }

    pub fn total_length(&self) -> f64 {
        self.maneuvers.last().map(|m| m.at).unwrap_or(0.0)
    }

    pub fn has_arrived(&self) -> bool {
        self.traveled >= self.total_length()
    }

    /// Index of the first maneuver still ahead of the vehicle
    fn index_ahead(&self) -> Option<usize> {
        self.maneuvers.iter().position(|m| m.at > self.traveled)
    }

    fn ahead(&self, index: usize, distance: f64) -> ManeuverAhead {
        let planned = &self.maneuvers[index];
        let id = ManeuverId::new(self.route_id, index as u32);
        let maneuver = Maneuver {
            id,
            turn: planned.turn,
            street_name: planned.street.clone(),
            ref_code: planned.ref_code.clone(),
            destination_name: planned.destination.clone(),
        };

        let target = if index + 1 == self.maneuvers.len() {
            Some(Target {
                kind: TargetKind::Destination,
                name: self.destination_name.clone(),
            })
        } else if planned.intermediate {
            Some(Target {
                kind: TargetKind::Intermediate,
                name: planned.point_name.clone().unwrap_or_default(),
            })
        } else {
            None
        };

        ManeuverAhead {
            maneuver: Some(maneuver),
            distance: distance.round() as i32,
            target,
        }
    }
}

impl ManeuverSource for PlannedRoute {
    fn next_maneuver(&self) -> Option<ManeuverAhead> {
        let index = self.index_ahead()?;
        Some(self.ahead(index, self.maneuvers[index].at - self.traveled))
    }

    fn maneuver_after(&self, ahead: &ManeuverAhead) -> Option<ManeuverAhead> {
        let id = ahead.maneuver.as_ref()?.id;
        if id.route != self.route_id {
            return None;
        }
        let index = id.index as usize;
        let next = self.maneuvers.get(index + 1)?;
        Some(self.ahead(index + 1, next.at - self.maneuvers[index].at))
    }

    fn current_segment(&self) -> Option<RoadSegment> {
        match self.index_ahead() {
            Some(0) => self.start_road.clone(),
            Some(index) => Some(self.maneuvers[index - 1].road_after()),
            None => self.maneuvers.last().map(PlannedManeuver::road_after),
        }
    }

    fn left_distance(&self) -> u32 {
        (self.total_length() - self.traveled).max(0.0).round() as u32
    }

    fn left_time(&self) -> u32 {
        if self.average_speed <= 0.0 {
            return 0;
        }
        (f64::from(self.left_distance()) / f64::from(self.average_speed)).round() as u32
    }
}
