use std::env;
use std::time::Duration;

use tracing::warn;

use crate::direction::Direction;
use crate::grid::GridPosition;

pub const TICK_INTERVAL_ENV_VAR: &str = "ROOM_TICK_MS";
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(480);
pub const DEFAULT_GRID_SIZE: u32 = 14;
pub const DEFAULT_ENTRY_CELL: GridPosition = GridPosition { x: 12, y: 11 };
pub const DEFAULT_ENTRY_ROTATION: Direction = Direction::NorthWest;

/// Fixed for the lifetime of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    pub tick_interval: Duration,
    pub width: u32,
    pub height: u32,
    pub entry_cell: GridPosition,
    pub entry_rotation: Direction,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            width: DEFAULT_GRID_SIZE,
            height: DEFAULT_GRID_SIZE,
            entry_cell: DEFAULT_ENTRY_CELL,
            entry_rotation: DEFAULT_ENTRY_ROTATION,
        }
    }
}

impl RoomConfig {
    pub fn with_env_overrides(mut self) -> Self {
        self.tick_interval = resolve_tick_interval(self.tick_interval);
        self
    }
}

pub fn resolve_tick_interval(fallback: Duration) -> Duration {
    match env::var(TICK_INTERVAL_ENV_VAR) {
        Ok(value) => match parse_tick_interval_ms(&value) {
            Some(interval) => interval,
            None => {
                warn!(
                    env_var = TICK_INTERVAL_ENV_VAR,
                    value = value.as_str(),
                    "invalid tick interval env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = TICK_INTERVAL_ENV_VAR,
                error = %err,
                "unable to read tick interval env var; falling back to config"
            );
            fallback
        }
    }
}

fn parse_tick_interval_ms(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
