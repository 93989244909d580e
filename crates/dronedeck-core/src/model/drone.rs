// ── Drone domain model ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity_id::EntityId;

/// Flight status as reported by (or predicted for) a drone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Grounded,
    TakingOff,
    Flying,
    Hovering,
    Landing,
    ReturningHome,
    Emergency,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Grounded => "grounded",
            Self::TakingOff => "taking_off",
            Self::Flying => "flying",
            Self::Hovering => "hovering",
            Self::Landing => "landing",
            Self::ReturningHome => "returning_home",
            Self::Emergency => "emergency",
        };
        f.write_str(s)
    }
}

/// One drone as rendered by the fleet dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: EntityId,
    pub name: String,
    pub flight_status: FlightStatus,
    pub battery_pct: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

/// Request body for a drone command dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneCommand {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl DroneCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            params: None,
        }
    }

    pub fn with_params(command: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            command: command.into(),
            params: Some(params),
        }
    }
}
