// ── Drone command catalog ──
//
// Maps each flight command to its endpoint and the status the dashboard
// should show while the command is in flight.

use std::sync::Arc;

use dronedeck_api::Method;

use super::{CommandCatalog, CommandSpec, Projector};
use crate::model::{CacheKey, Drone, DroneCommand, FlightStatus};

const COMMANDS_ENDPOINT: &str = "fleet/drones/{id}/commands";

/// Predicted status shown between dispatch and confirmation.
///
/// Relative movement and rotation commands all predict `Flying`; the
/// rest have a dedicated transitional status.
fn predicted_status(command: &str) -> Option<FlightStatus> {
    match command {
        "takeoff" => Some(FlightStatus::TakingOff),
        "land" => Some(FlightStatus::Landing),
        "hover" => Some(FlightStatus::Hovering),
        "emergency_stop" => Some(FlightStatus::Emergency),
        "return_to_home" => Some(FlightStatus::ReturningHome),
        c if c.starts_with("move_") || c.starts_with("rotate_") => Some(FlightStatus::Flying),
        _ => None,
    }
}

fn status_projector(status: FlightStatus) -> Projector<Drone, DroneCommand> {
    Arc::new(move |drone, _request| {
        let mut predicted = drone.clone();
        predicted.flight_status = status;
        predicted
    })
}

fn command_spec(command: &str, idempotent: bool) -> CommandSpec<Drone, DroneCommand> {
    let mut spec =
        CommandSpec::new(Method::Post, COMMANDS_ENDPOINT).invalidates(CacheKey::fleet_stats());
    if idempotent {
        spec = spec.idempotent();
    }
    if let Some(status) = predicted_status(command) {
        spec = spec.project(status_projector(status));
    }
    spec
}

/// The shipped drone-command catalog.
///
/// Absolute commands (takeoff, land, ...) are idempotent and may be
/// retried; relative movement commands are not — retrying a
/// `move_forward` moves the drone again.
pub fn drone_catalog() -> CommandCatalog<Drone, DroneCommand> {
    let mut catalog = CommandCatalog::new();
    for command in [
        "takeoff",
        "land",
        "hover",
        "emergency_stop",
        "return_to_home",
    ] {
        catalog = catalog.with(command, command_spec(command, true));
    }
    for command in [
        "move_forward",
        "move_backward",
        "move_left",
        "move_right",
        "move_up",
        "move_down",
        "rotate_left",
        "rotate_right",
    ] {
        catalog = catalog.with(command, command_spec(command, false));
    }
    catalog
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EntityId;

    fn drone() -> Drone {
        Drone {
            id: EntityId::from("d-1"),
            name: "alpha".into(),
            flight_status: FlightStatus::Grounded,
            battery_pct: 80,
            altitude_m: None,
            last_seen: None,
        }
    }

    #[test]
    fn prediction_table_matches_dashboard_expectations() {
        let cases = [
            ("takeoff", FlightStatus::TakingOff),
            ("land", FlightStatus::Landing),
            ("hover", FlightStatus::Hovering),
            ("emergency_stop", FlightStatus::Emergency),
            ("return_to_home", FlightStatus::ReturningHome),
            ("move_forward", FlightStatus::Flying),
            ("rotate_left", FlightStatus::Flying),
        ];
        for (command, expected) in cases {
            assert_eq!(predicted_status(command), Some(expected), "{command}");
        }
        assert_eq!(predicted_status("self_destruct"), None);
    }

    #[test]
    fn projector_only_touches_flight_status() {
        let catalog = drone_catalog();
        let spec = catalog.get(&"takeoff".into()).unwrap();
        let project = spec.projector.as_ref().unwrap();

        let before = drone();
        let after = project(&before, &DroneCommand::new("takeoff"));

        assert_eq!(after.flight_status, FlightStatus::TakingOff);
        assert_eq!(after.battery_pct, before.battery_pct);
        assert_eq!(after.name, before.name);
        // Pure: the input is untouched.
        assert_eq!(before.flight_status, FlightStatus::Grounded);
    }

    #[test]
    fn movement_commands_are_not_idempotent() {
        let catalog = drone_catalog();
        assert!(catalog.get(&"takeoff".into()).unwrap().idempotent);
        assert!(!catalog.get(&"move_forward".into()).unwrap().idempotent);
    }

    #[test]
    fn every_command_invalidates_fleet_stats() {
        let catalog = drone_catalog();
        for kind in catalog.kinds() {
            let spec = catalog.get(&kind).unwrap();
            assert_eq!(spec.dependent_keys, vec![CacheKey::fleet_stats()], "{kind}");
        }
    }
}
