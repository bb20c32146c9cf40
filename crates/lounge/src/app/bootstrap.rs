use room_engine::preset::lounge_room;
use room_engine::{EntityId, Room, RoomConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::cli::SessionOptions;
use super::script::{ScriptPlayer, SessionScript};
use super::SessionError;

pub(crate) struct AppWiring {
    pub(crate) options: SessionOptions,
    pub(crate) room: Room,
    pub(crate) visitor: EntityId,
    pub(crate) player: ScriptPlayer,
}

pub(crate) fn build_app(options: SessionOptions) -> Result<AppWiring, SessionError> {
    init_tracing();
    info!("=== Lounge Startup ===");

    let config = RoomConfig::default().with_env_overrides();
    let mut room = lounge_room(config)?;
    let visitor = room.join_room(options.identity.clone());

    let script = match &options.script {
        Some(path) => {
            let script = SessionScript::load(path)?;
            info!(path = %path.display(), steps = script.len(), "script_loaded");
            script
        }
        None => SessionScript::default_tour(),
    };
    let player = ScriptPlayer::new(
        SessionScript::entry_walk().followed_by(script),
        room.clock(),
    );

    Ok(AppWiring {
        options,
        room,
        visitor,
        player,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
