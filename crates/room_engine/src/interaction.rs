use crate::entity::EntityId;
use crate::furniture::{FurnitureId, FurnitureItem};
use crate::grid::GridPosition;
use crate::room::MoveOutcome;

/// What clicking a furniture item asks the room to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionIntent {
    ToggleState,
    WalkTo(GridPosition),
    Nothing,
}

/// Togglable items switch, seats are approached, everything else is inert.
pub fn resolve_intent(item: &FurnitureItem) -> InteractionIntent {
    if item.is_togglable() {
        InteractionIntent::ToggleState
    } else if item.capabilities.can_sit {
        InteractionIntent::WalkTo(item.position)
    } else {
        InteractionIntent::Nothing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    Toggled {
        furniture_id: FurnitureId,
        state: i32,
    },
    Approaching {
        entity_id: EntityId,
        target: GridPosition,
        steps: usize,
    },
    Ignored(IgnoredReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    UnknownFurniture,
    UnknownEntity,
    NoLocalEntity,
    NotInteractive,
    NoRoute(MoveOutcome),
}

impl InteractionOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}
