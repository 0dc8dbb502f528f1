// 🔲 Zone Selection - drag-to-select state machine
//
// Disabled → (toggle) → Armed → (press) → Drawing → (release) → Committed
//
// Only a release commits; presses and moves touch the draft rectangle, which
// nothing outside the map overlay observes.

use crate::geo::{GeoBounds, LatLng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneEvent {
    Press(LatLng),
    Move(LatLng),
    Release(LatLng),
    ToggleMode,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ZoneSelection {
    /// Selection mode off
    #[default]
    Disabled,
    /// Mode on, waiting for a press
    Armed,
    /// Gesture in progress; `committed` is what the rest of the UI still sees
    Drawing {
        start: LatLng,
        current: LatLng,
        committed: Option<GeoBounds>,
    },
    Committed(GeoBounds),
}

impl ZoneSelection {
    pub fn handle(self, event: ZoneEvent) -> ZoneSelection {
        use ZoneSelection::*;

        match (self, event) {
            (_, ZoneEvent::Clear) => Disabled,

            (Disabled, ZoneEvent::ToggleMode) => Armed,
            (_, ZoneEvent::ToggleMode) => Disabled,

            (Armed, ZoneEvent::Press(p)) => Drawing {
                start: p,
                current: p,
                committed: None,
            },
            (Committed(bounds), ZoneEvent::Press(p)) => Drawing {
                start: p,
                current: p,
                committed: Some(bounds),
            },

            (Drawing { start, committed, .. }, ZoneEvent::Move(p)) => Drawing {
                start,
                current: p,
                committed,
            },

            (Drawing { start, .. }, ZoneEvent::Release(p)) => {
                Committed(GeoBounds::from_corners(start, p))
            }

            (state, _) => state,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, ZoneSelection::Disabled)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, ZoneSelection::Drawing { .. })
    }

    /// The selection the statistics panel and filters see
    pub fn committed(&self) -> Option<GeoBounds> {
        match self {
            ZoneSelection::Committed(bounds) => Some(*bounds),
            ZoneSelection::Drawing { committed, .. } => *committed,
            _ => None,
        }
    }

    /// In-progress rectangle
    pub fn draft(&self) -> Option<GeoBounds> {
        match self {
            ZoneSelection::Drawing { start, current, .. } => {
                Some(GeoBounds::from_corners(*start, *current))
            }
            _ => None,
        }
    }
}
