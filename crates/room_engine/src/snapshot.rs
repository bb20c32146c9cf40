use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::direction::Direction;
use crate::entity::{Appearance, Entity, EntityId, MotionState};
use crate::furniture::FurnitureItem;
use crate::grid::{Grid, GridPosition};

static SNAPSHOT_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_snapshot_lock_poison_once(operation: &'static str) {
    if SNAPSHOT_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "snapshot lock poisoned; recovered inner value");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub display_name: String,
    pub appearance: Appearance,
    pub grid_position: GridPosition,
    pub rotation: Direction,
    pub path: Vec<GridPosition>,
    pub is_walking: bool,
    pub is_sitting: bool,
    pub previous_grid_position: GridPosition,
    pub next_grid_position: GridPosition,
    pub last_tick_at: Option<Duration>,
}

impl EntitySnapshot {
    pub fn motion_state(&self) -> MotionState {
        MotionState::from_flags(self.is_walking, self.is_sitting)
    }

    /// Progress through the current step at simulation time `now`, in [0, 1].
    /// An entity that has never ticked is fully settled.
    pub fn interpolation_alpha(&self, now: Duration, tick_interval: Duration) -> f32 {
        match self.last_tick_at {
            Some(tick_at) => interpolation_alpha(now.saturating_sub(tick_at), tick_interval),
            None => 1.0,
        }
    }

    /// Cell-space position to draw at `now`. Only walking entities blend.
    pub fn render_position(&self, now: Duration, tick_interval: Duration) -> (f32, f32) {
        let next = (
            self.next_grid_position.x as f32,
            self.next_grid_position.y as f32,
        );
        if !self.is_walking {
            return next;
        }
        let previous = (
            self.previous_grid_position.x as f32,
            self.previous_grid_position.y as f32,
        );
        let alpha = self.interpolation_alpha(now, tick_interval);
        (
            previous.0 + (next.0 - previous.0) * alpha,
            previous.1 + (next.1 - previous.1) * alpha,
        )
    }
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            display_name: entity.identity.display_name.clone(),
            appearance: entity.identity.appearance.clone(),
            grid_position: entity.grid_position,
            rotation: entity.rotation,
            path: entity.path.iter().copied().collect(),
            is_walking: entity.is_walking,
            is_sitting: entity.is_sitting,
            previous_grid_position: entity.previous_grid_position,
            next_grid_position: entity.next_grid_position,
            last_tick_at: entity.last_tick_at,
        }
    }
}

pub fn interpolation_alpha(since_tick: Duration, tick_interval: Duration) -> f32 {
    if tick_interval.is_zero() {
        return 1.0;
    }
    (since_tick.as_secs_f32() / tick_interval.as_secs_f32()).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSnapshot {
    pub tick: u64,
    pub clock: Duration,
    pub tick_interval: Duration,
    pub local_entity: Option<EntityId>,
    pub grid: Grid,
    pub entities: Vec<EntitySnapshot>,
    pub furniture: Vec<FurnitureItem>,
}

impl RoomSnapshot {
    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn local(&self) -> Option<&EntitySnapshot> {
        self.local_entity.and_then(|id| self.entity(id))
    }
}

/// Read side of the room for render or network loops. Cloning is cheap and
/// every clone observes the latest published snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotHandle {
    latest: Arc<RwLock<Arc<RoomSnapshot>>>,
}

impl SnapshotHandle {
    pub(crate) fn new(initial: RoomSnapshot) -> Self {
        Self {
            latest: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    pub fn latest(&self) -> Arc<RoomSnapshot> {
        match self.latest.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => {
                warn_snapshot_lock_poison_once("read");
                Arc::clone(&*poisoned.into_inner())
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: RoomSnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.latest.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_snapshot_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                *guard = snapshot;
            }
        }
    }
}
