use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::RoomConfig;
use crate::direction::Direction;
use crate::entity::{Entity, EntityId, EntityIdAllocator, Identity, TickTransition};
use crate::furniture::{seat_at, FurnitureId, FurnitureItem};
use crate::grid::{build_grid, Grid, GridPosition, LayoutError, StaticLayout};
use crate::interaction::{resolve_intent, IgnoredReason, InteractionIntent, InteractionOutcome};
use crate::pathfinding::{find_path, path_cost};
use crate::scheduler::{TickScheduler, TickStamp};
use crate::snapshot::{EntitySnapshot, RoomSnapshot, SnapshotHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(
        "layout is {actual_width}x{actual_height}, config expects {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("entry cell ({x},{y}) lies outside the {width}x{height} grid")]
    EntryOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Assigned { steps: usize },
    AlreadyThere,
    Unreachable,
    UnknownEntity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub ticks_run: u32,
    /// Ticks skipped because nothing was moving.
    pub idle_ticks: u32,
    pub entity_updates: usize,
}

#[derive(Debug)]
struct CollisionCache {
    revision: u64,
    grid: Grid,
}

impl CollisionCache {
    fn refresh(&mut self, layout: &StaticLayout, furniture: &[FurnitureItem], revision: u64) {
        if self.revision == revision {
            return;
        }
        self.grid = build_grid(layout, furniture);
        self.revision = revision;
        debug!(revision, "collision_grid_rebuilt");
    }
}

/// One room's simulation. All mutation goes through this type; readers get
/// owned snapshots or a [`SnapshotHandle`].
#[derive(Debug)]
pub struct Room {
    config: RoomConfig,
    layout: StaticLayout,
    furniture: Vec<FurnitureItem>,
    furniture_revision: u64,
    collision: CollisionCache,
    entities: Vec<Entity>,
    allocator: EntityIdAllocator,
    local_entity: Option<EntityId>,
    scheduler: TickScheduler,
    snapshots: SnapshotHandle,
}

impl Room {
    pub fn new(
        config: RoomConfig,
        layout: StaticLayout,
        furniture: Vec<FurnitureItem>,
    ) -> Result<Self, RoomError> {
        if config.tick_interval.is_zero() {
            return Err(RoomError::ZeroTickInterval);
        }
        if layout.width() != config.width || layout.height() != config.height {
            return Err(RoomError::DimensionMismatch {
                expected_width: config.width,
                expected_height: config.height,
                actual_width: layout.width(),
                actual_height: layout.height(),
            });
        }
        let grid = build_grid(&layout, &furniture);
        if !grid.contains(config.entry_cell) {
            return Err(RoomError::EntryOutOfBounds {
                x: config.entry_cell.x,
                y: config.entry_cell.y,
                width: config.width,
                height: config.height,
            });
        }

        let initial = RoomSnapshot {
            tick: 0,
            clock: Duration::ZERO,
            tick_interval: config.tick_interval,
            local_entity: None,
            grid: grid.clone(),
            entities: Vec::new(),
            furniture: furniture.clone(),
        };
        info!(
            width = config.width,
            height = config.height,
            furniture_count = furniture.len(),
            tick_interval_ms = config.tick_interval.as_millis() as u64,
            "room_created"
        );

        Ok(Self {
            scheduler: TickScheduler::new(config.tick_interval),
            config,
            layout,
            furniture,
            furniture_revision: 0,
            collision: CollisionCache { revision: 0, grid },
            entities: Vec::new(),
            allocator: EntityIdAllocator::default(),
            local_entity: None,
            snapshots: SnapshotHandle::new(initial),
        })
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn tick_interval(&self) -> Duration {
        self.scheduler.tick_interval()
    }

    pub fn clock(&self) -> Duration {
        self.scheduler.clock()
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.scheduler.ticks_elapsed()
    }

    pub fn local_entity(&self) -> Option<EntityId> {
        self.local_entity
    }

    pub fn collision_grid(&mut self) -> &Grid {
        self.refresh_collision();
        &self.collision.grid
    }

    pub fn entities(&self) -> Vec<EntitySnapshot> {
        self.entities.iter().map(EntitySnapshot::from).collect()
    }

    pub fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities
            .iter()
            .find(|entity| entity.id == id)
            .map(EntitySnapshot::from)
    }

    pub fn furniture(&self) -> Vec<FurnitureItem> {
        self.furniture.clone()
    }

    pub fn furniture_item(&self, id: &FurnitureId) -> Option<FurnitureItem> {
        self.furniture.iter().find(|item| &item.id == id).cloned()
    }

    pub fn has_pending_motion(&self) -> bool {
        self.entities.iter().any(Entity::has_pending_motion)
    }

    pub fn snapshot(&mut self) -> RoomSnapshot {
        self.refresh_collision();
        RoomSnapshot {
            tick: self.scheduler.ticks_elapsed(),
            clock: self.scheduler.clock(),
            tick_interval: self.scheduler.tick_interval(),
            local_entity: self.local_entity,
            grid: self.collision.grid.clone(),
            entities: self.entities(),
            furniture: self.furniture.clone(),
        }
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshots.clone()
    }

    /// Adds the visitor at the entry cell and makes it the local entity.
    pub fn join_room(&mut self, identity: Identity) -> EntityId {
        let entry = self.config.entry_cell;
        let rotation = self.config.entry_rotation;
        let id = self.insert_entity(identity, entry, rotation);
        self.local_entity = Some(id);
        info!(entity = id.0, x = entry.x, y = entry.y, "entity_joined");
        self.publish_snapshot();
        id
    }

    /// Places a non-local entity, e.g. a resident bot. `None` off-grid.
    pub fn spawn_entity(
        &mut self,
        identity: Identity,
        position: GridPosition,
        rotation: Direction,
    ) -> Option<EntityId> {
        if !self.collision.grid.contains(position) {
            debug!(x = position.x, y = position.y, "spawn_ignored_out_of_bounds");
            return None;
        }
        let id = self.insert_entity(identity, position, rotation);
        info!(entity = id.0, x = position.x, y = position.y, "entity_spawned");
        self.publish_snapshot();
        Some(id)
    }

    pub fn move_entity(&mut self, entity_id: EntityId, target: GridPosition) -> MoveOutcome {
        let outcome = self.assign_route(entity_id, target);
        if matches!(outcome, MoveOutcome::Assigned { .. }) {
            self.publish_snapshot();
        }
        outcome
    }

    pub fn interact(
        &mut self,
        furniture_id: &FurnitureId,
        entity_id: EntityId,
    ) -> InteractionOutcome {
        let Some(item_index) = self.furniture_index(furniture_id) else {
            debug!(furniture = %furniture_id, "interaction_ignored_unknown_furniture");
            return InteractionOutcome::Ignored(IgnoredReason::UnknownFurniture);
        };
        if self.entity_index(entity_id).is_none() {
            debug!(entity = entity_id.0, "interaction_ignored_unknown_entity");
            return InteractionOutcome::Ignored(IgnoredReason::UnknownEntity);
        }

        let outcome = match resolve_intent(&self.furniture[item_index]) {
            InteractionIntent::ToggleState => {
                let item = &mut self.furniture[item_index];
                let state = item.toggle_state();
                let kind = item.kind;
                self.furniture_revision = self.furniture_revision.saturating_add(1);
                info!(
                    furniture = %furniture_id,
                    kind = kind.as_str(),
                    state,
                    "furniture_toggled"
                );
                InteractionOutcome::Toggled {
                    furniture_id: furniture_id.clone(),
                    state,
                }
            }
            InteractionIntent::WalkTo(target) => match self.assign_route(entity_id, target) {
                MoveOutcome::Assigned { steps } => InteractionOutcome::Approaching {
                    entity_id,
                    target,
                    steps,
                },
                other => InteractionOutcome::Ignored(IgnoredReason::NoRoute(other)),
            },
            InteractionIntent::Nothing => {
                debug!(furniture = %furniture_id, "interaction_ignored_inert");
                InteractionOutcome::Ignored(IgnoredReason::NotInteractive)
            }
        };
        if !outcome.is_ignored() {
            self.publish_snapshot();
        }
        outcome
    }

    /// [`Room::interact`] on behalf of the local entity.
    pub fn interact_furniture(&mut self, furniture_id: &FurnitureId) -> InteractionOutcome {
        match self.local_entity {
            Some(entity_id) => self.interact(furniture_id, entity_id),
            None => {
                debug!(furniture = %furniture_id, "interaction_ignored_no_local_entity");
                InteractionOutcome::Ignored(IgnoredReason::NoLocalEntity)
            }
        }
    }

    pub fn relocate_furniture(
        &mut self,
        furniture_id: &FurnitureId,
        position: GridPosition,
        rotation: Direction,
    ) -> bool {
        let Some(index) = self.furniture_index(furniture_id) else {
            debug!(furniture = %furniture_id, "relocation_ignored_unknown_furniture");
            return false;
        };
        let item = &mut self.furniture[index];
        item.position = position;
        item.rotation = rotation;
        let kind = item.kind;
        self.furniture_revision = self.furniture_revision.saturating_add(1);
        self.unseat_stranded_entities();
        info!(
            furniture = %furniture_id,
            kind = kind.as_str(),
            x = position.x,
            y = position.y,
            rotation = rotation.code(),
            "furniture_relocated"
        );
        self.publish_snapshot();
        true
    }

    /// Feeds elapsed time into the scheduler and runs every tick that became
    /// due, then publishes a fresh snapshot.
    pub fn advance(&mut self, elapsed: Duration) -> TickReport {
        let mut report = TickReport::default();
        for stamp in self.scheduler.accumulate(elapsed) {
            report.ticks_run = report.ticks_run.saturating_add(1);
            if !self.has_pending_motion() {
                report.idle_ticks = report.idle_ticks.saturating_add(1);
                continue;
            }
            report.entity_updates = report
                .entity_updates
                .saturating_add(self.run_tick(stamp));
        }
        if report.ticks_run > 1 {
            trace!(
                ticks = report.ticks_run,
                idle_ticks = report.idle_ticks,
                entity_updates = report.entity_updates,
                "tick_batch"
            );
        }
        self.publish_snapshot();
        report
    }

    fn run_tick(&mut self, stamp: TickStamp) -> usize {
        let updates: Vec<(usize, Entity, TickTransition)> = self
            .entities
            .iter()
            .enumerate()
            .filter_map(|(index, entity)| {
                entity
                    .advanced(&self.furniture, stamp.at)
                    .map(|(next, transition)| (index, next, transition))
            })
            .collect();

        let changed = updates.len();
        for (index, next, transition) in updates {
            log_transition(&next, stamp, transition);
            self.entities[index] = next;
        }
        changed
    }

    fn assign_route(&mut self, entity_id: EntityId, target: GridPosition) -> MoveOutcome {
        self.refresh_collision();
        let Some(index) = self.entity_index(entity_id) else {
            debug!(entity = entity_id.0, "move_ignored_unknown_entity");
            return MoveOutcome::UnknownEntity;
        };
        let origin = self.entities[index].path_origin();
        if origin == target {
            debug!(entity = entity_id.0, x = target.x, y = target.y, "move_ignored_already_there");
            return MoveOutcome::AlreadyThere;
        }

        let path = find_path(origin, target, &self.collision.grid);
        if path.is_empty() {
            debug!(
                entity = entity_id.0,
                from_x = origin.x,
                from_y = origin.y,
                to_x = target.x,
                to_y = target.y,
                "path_rejected"
            );
            return MoveOutcome::Unreachable;
        }

        let steps = path.len();
        let cost = path_cost(origin, &path);
        self.entities[index].assign_path(path);
        debug!(
            entity = entity_id.0,
            from_x = origin.x,
            from_y = origin.y,
            to_x = target.x,
            to_y = target.y,
            steps,
            cost,
            "path_assigned"
        );
        MoveOutcome::Assigned { steps }
    }

    /// Sitting holds only while a seat occupies the entity's cell.
    fn unseat_stranded_entities(&mut self) {
        for entity in &mut self.entities {
            if entity.is_sitting && seat_at(&self.furniture, entity.grid_position).is_none() {
                entity.is_sitting = false;
                debug!(
                    entity = entity.id.0,
                    x = entity.grid_position.x,
                    y = entity.grid_position.y,
                    "entity_unseated"
                );
            }
        }
    }

    fn insert_entity(
        &mut self,
        identity: Identity,
        position: GridPosition,
        rotation: Direction,
    ) -> EntityId {
        let id = self.allocator.allocate();
        self.entities
            .push(Entity::spawn(id, identity, position, rotation));
        id
    }

    fn refresh_collision(&mut self) {
        self.collision
            .refresh(&self.layout, &self.furniture, self.furniture_revision);
    }

    fn publish_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.snapshots.publish(snapshot);
    }

    fn entity_index(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }

    fn furniture_index(&self, id: &FurnitureId) -> Option<usize> {
        self.furniture.iter().position(|item| &item.id == id)
    }
}

fn log_transition(entity: &Entity, stamp: TickStamp, transition: TickTransition) {
    let entity_id = entity.id;
    match transition {
        TickTransition::Stepped { from, to } => trace!(
            entity = entity_id.0,
            tick = stamp.index,
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y,
            "entity_stepped"
        ),
        TickTransition::Stopped { at, seated } => debug!(
            entity = entity_id.0,
            tick = stamp.index,
            x = at.x,
            y = at.y,
            seated,
            state = ?entity.motion_state(),
            "entity_stopped"
        ),
    }
}

#[cfg(test)]
mod tests;
