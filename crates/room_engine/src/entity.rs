use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::furniture::{seat_at, FurnitureItem};
use crate::grid::GridPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub(crate) struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub color: String,
}

/// Who is entering the room and how they look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: String,
    pub appearance: Appearance,
}

impl Identity {
    pub fn new(display_name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            appearance: Appearance {
                color: color.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    Idle,
    Walking,
    Sitting,
}

impl MotionState {
    pub(crate) fn from_flags(is_walking: bool, is_sitting: bool) -> Self {
        if is_walking {
            Self::Walking
        } else if is_sitting {
            Self::Sitting
        } else {
            Self::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickTransition {
    Stepped {
        from: GridPosition,
        to: GridPosition,
    },
    Stopped {
        at: GridPosition,
        seated: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) identity: Identity,
    pub(crate) grid_position: GridPosition,
    pub(crate) rotation: Direction,
    pub(crate) path: VecDeque<GridPosition>,
    pub(crate) is_walking: bool,
    pub(crate) is_sitting: bool,
    pub(crate) previous_grid_position: GridPosition,
    pub(crate) next_grid_position: GridPosition,
    pub(crate) last_tick_at: Option<Duration>,
}

impl Entity {
    pub(crate) fn spawn(
        id: EntityId,
        identity: Identity,
        position: GridPosition,
        rotation: Direction,
    ) -> Self {
        Self {
            id,
            identity,
            grid_position: position,
            rotation,
            path: VecDeque::new(),
            is_walking: false,
            is_sitting: false,
            previous_grid_position: position,
            next_grid_position: position,
            last_tick_at: None,
        }
    }

    pub(crate) fn motion_state(&self) -> MotionState {
        MotionState::from_flags(self.is_walking, self.is_sitting)
    }

    /// Cell a new path must start from: the committed step target while
    /// walking, the occupied cell otherwise.
    pub(crate) fn path_origin(&self) -> GridPosition {
        if self.is_walking {
            self.next_grid_position
        } else {
            self.grid_position
        }
    }

    pub(crate) fn has_pending_motion(&self) -> bool {
        self.is_walking || !self.path.is_empty()
    }

    /// Replaces whatever remains of the current path.
    pub(crate) fn assign_path(&mut self, path: Vec<GridPosition>) {
        self.path = path.into();
    }

    /// State after one tick at `tick_at`, computed from this pre-tick state
    /// alone. `None` when the tick leaves the entity untouched.
    pub(crate) fn advanced(
        &self,
        furniture: &[FurnitureItem],
        tick_at: Duration,
    ) -> Option<(Entity, TickTransition)> {
        if let Some(&step) = self.path.front() {
            debug_assert!(
                self.next_grid_position.is_adjacent_to(step),
                "path steps must be single-cell moves"
            );
            let mut next = self.clone();
            next.path.pop_front();
            next.previous_grid_position = self.next_grid_position;
            next.next_grid_position = step;
            next.grid_position = step;
            next.rotation = Direction::between(self.next_grid_position, step);
            next.is_walking = true;
            next.is_sitting = false;
            next.last_tick_at = Some(tick_at);
            return Some((
                next,
                TickTransition::Stepped {
                    from: self.next_grid_position,
                    to: step,
                },
            ));
        }

        if !self.is_walking {
            return None;
        }

        let mut next = self.clone();
        next.is_walking = false;
        next.previous_grid_position = self.next_grid_position;
        next.last_tick_at = Some(tick_at);
        let seat = seat_at(furniture, next.grid_position);
        if let Some(seat) = seat {
            next.is_sitting = true;
            next.rotation = seat.rotation;
        }
        let at = next.grid_position;
        Some((
            next,
            TickTransition::Stopped {
                at,
                seated: seat.is_some(),
            },
        ))
    }
}
