use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use room_engine::preset::LOUNGE_ENTRY_WALK_TARGET;
use room_engine::{Direction, EntityId, FurnitureId, GridPosition, Room};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Delay before a freshly joined visitor starts walking in.
const ENTRY_WALK_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum ScriptStep {
    Wait {
        ms: u64,
    },
    Move {
        x: i32,
        y: i32,
    },
    Interact {
        furniture: FurnitureId,
    },
    Relocate {
        furniture: FurnitureId,
        x: i32,
        y: i32,
        rotation: Direction,
    },
}

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read session script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse session script {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SessionScript {
    steps: Vec<ScriptStep>,
}

impl SessionScript {
    pub(crate) fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, origin: &Path) -> Result<Self, ScriptError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        match serde_path_to_error::deserialize::<_, Vec<ScriptStep>>(&mut deserializer) {
            Ok(steps) => Ok(Self { steps }),
            Err(error) => {
                let json_path = error.path().to_string();
                Err(ScriptError::Parse {
                    path: origin.to_path_buf(),
                    json_path,
                    source: error.into_inner(),
                })
            }
        }
    }

    /// Walk in from the door shortly after joining.
    pub(crate) fn entry_walk() -> Self {
        Self {
            steps: vec![
                ScriptStep::Wait {
                    ms: ENTRY_WALK_DELAY_MS,
                },
                ScriptStep::Move {
                    x: LOUNGE_ENTRY_WALK_TARGET.x,
                    y: LOUNGE_ENTRY_WALK_TARGET.y,
                },
            ],
        }
    }

    /// Used when no script is given: sit down, switch a lamp off, get up.
    pub(crate) fn default_tour() -> Self {
        Self {
            steps: vec![
                ScriptStep::Wait { ms: 6000 },
                ScriptStep::Interact {
                    furniture: FurnitureId::from("c1"),
                },
                ScriptStep::Wait { ms: 8000 },
                ScriptStep::Interact {
                    furniture: FurnitureId::from("l1"),
                },
                ScriptStep::Wait { ms: 1000 },
                ScriptStep::Move { x: 7, y: 10 },
            ],
        }
    }

    pub(crate) fn followed_by(mut self, next: SessionScript) -> Self {
        self.steps.extend(next.steps);
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Replays a script against the room clock. Waits accumulate on the script's
/// own timeline, so replay does not depend on frame pacing.
#[derive(Debug)]
pub(crate) struct ScriptPlayer {
    steps: VecDeque<ScriptStep>,
    resume_at: Duration,
}

impl ScriptPlayer {
    pub(crate) fn new(script: SessionScript, start_at: Duration) -> Self {
        Self {
            steps: script.steps.into(),
            resume_at: start_at,
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn apply_due(&mut self, room: &mut Room, actor: EntityId) -> usize {
        let mut applied = 0usize;
        while self.resume_at <= room.clock() {
            let Some(step) = self.steps.pop_front() else {
                break;
            };
            applied += 1;
            match step {
                ScriptStep::Wait { ms } => {
                    self.resume_at = self.resume_at.saturating_add(Duration::from_millis(ms));
                }
                ScriptStep::Move { x, y } => {
                    let outcome = room.move_entity(actor, GridPosition::new(x, y));
                    info!(x, y, outcome = ?outcome, "script_move");
                }
                ScriptStep::Interact { furniture } => {
                    let outcome = room.interact(&furniture, actor);
                    info!(furniture = %furniture, outcome = ?outcome, "script_interact");
                }
                ScriptStep::Relocate {
                    furniture,
                    x,
                    y,
                    rotation,
                } => {
                    let moved =
                        room.relocate_furniture(&furniture, GridPosition::new(x, y), rotation);
                    info!(furniture = %furniture, x, y, moved, "script_relocate");
                }
            }
        }
        applied
    }
}
