//! Tick-based room simulation: grid walkability, A* routing, entity
//! movement and sitting, and furniture interaction.

mod config;
mod direction;
mod entity;
mod furniture;
mod grid;
mod interaction;
pub mod pathfinding;
pub mod preset;
mod room;
mod scheduler;
mod snapshot;

pub use config::{
    resolve_tick_interval, RoomConfig, DEFAULT_ENTRY_CELL, DEFAULT_ENTRY_ROTATION,
    DEFAULT_GRID_SIZE, DEFAULT_TICK_INTERVAL, TICK_INTERVAL_ENV_VAR,
};
pub use direction::{Direction, InvalidDirectionCode};
pub use entity::{Appearance, EntityId, Identity, MotionState};
pub use furniture::{seat_at, Capabilities, FurnitureId, FurnitureItem, FurnitureKind};
pub use grid::{build_grid, is_walkable, CellCode, Grid, GridPosition, LayoutError, StaticLayout};
pub use interaction::{resolve_intent, IgnoredReason, InteractionIntent, InteractionOutcome};
pub use pathfinding::find_path;
pub use room::{MoveOutcome, Room, RoomError, TickReport};
pub use scheduler::{plan_sim_steps, DueTicks, StepPlan, TickScheduler, TickStamp};
pub use snapshot::{interpolation_alpha, EntitySnapshot, RoomSnapshot, SnapshotHandle};
