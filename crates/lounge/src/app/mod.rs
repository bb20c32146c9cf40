pub(crate) mod bootstrap;
pub(crate) mod cli;
pub(crate) mod loop_runner;
mod metrics;
mod script;

use room_engine::RoomError;
use thiserror::Error;

use self::script::ScriptError;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("failed to build room: {0}")]
    Room(#[from] RoomError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to encode final snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}
