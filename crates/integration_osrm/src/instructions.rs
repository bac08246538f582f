//! Human-readable instructions from OSRM maneuvers

use domain::ManeuverModifier;

/// Compose the instruction shown for a maneuver
///
/// `kind` is the OSRM maneuver type, `name` the street the step continues on
/// (may be empty) and `exit` the roundabout exit number, if any.
#[must_use]
pub fn directive_text(
    kind: &str,
    modifier: Option<ManeuverModifier>,
    name: &str,
    exit: Option<u32>,
) -> String {
    let name = name.trim();
    let onto = |text: String| {
        if name.is_empty() {
            text
        } else {
            format!("{text} onto {name}")
        }
    };

    match kind {
        "depart" => {
            if name.is_empty() {
                "Depart".to_string()
            } else {
                format!("Head out on {name}")
            }
        },
        "arrive" => "Arrive at your destination".to_string(),
        "new name" | "continue" | "notification" => match modifier {
            Some(m @ (ManeuverModifier::Left | ManeuverModifier::Right)) => {
                onto(format!("Turn {}", m.label()))
            },
            Some(ManeuverModifier::UTurn) => onto("Make a U-turn".to_string()),
            _ => onto("Continue".to_string()),
        },
        "merge" => onto(with_side("Merge", modifier)),
        "on ramp" => onto(with_side("Take the ramp", modifier)),
        "off ramp" => onto(with_side("Take the exit", modifier)),
        "fork" => onto(keep(modifier, "at the fork")),
        "end of road" => onto(turn(modifier, " at the end of the road")),
        "roundabout" | "rotary" | "roundabout turn" => match exit {
            Some(n) => onto(format!("At the roundabout, take exit {n}")),
            None => onto("Enter the roundabout".to_string()),
        },
        "exit roundabout" | "exit rotary" => onto("Exit the roundabout".to_string()),
        _ => onto(turn(modifier, "")),
    }
}

fn turn(modifier: Option<ManeuverModifier>, suffix: &str) -> String {
    match modifier {
        Some(ManeuverModifier::Straight) | None => format!("Continue straight{suffix}"),
        Some(ManeuverModifier::UTurn) => format!("Make a U-turn{suffix}"),
        Some(m) => format!("Turn {}{suffix}", m.label()),
    }
}

fn keep(modifier: Option<ManeuverModifier>, suffix: &str) -> String {
    match side(modifier) {
        Some(side) => format!("Keep {side} {suffix}"),
        None => format!("Continue straight {suffix}"),
    }
}

fn with_side(action: &str, modifier: Option<ManeuverModifier>) -> String {
    match side(modifier) {
        Some(side) => format!("{action} on the {side}"),
        None => action.to_string(),
    }
}

const fn side(modifier: Option<ManeuverModifier>) -> Option<&'static str> {
    match modifier {
        Some(
            ManeuverModifier::Left | ManeuverModifier::SlightLeft | ManeuverModifier::SharpLeft,
        ) => Some("left"),
        Some(
            ManeuverModifier::Right | ManeuverModifier::SlightRight | ManeuverModifier::SharpRight,
        ) => Some("right"),
        _ => None,
    }
}
