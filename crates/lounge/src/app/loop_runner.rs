use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use room_engine::{GridPosition, MotionState, RoomSnapshot};
use tracing::{error, info, trace};

use super::bootstrap::AppWiring;
use super::metrics::LoopMetricsWindow;
use super::SessionError;

const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_session(app) {
        Ok(snapshot_json) => {
            println!("{snapshot_json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "session_failed");
            ExitCode::FAILURE
        }
    }
}

/// Drives the room from wall-clock frames until the session duration has
/// passed. Returns the final snapshot as pretty JSON.
fn run_session(app: AppWiring) -> Result<String, SessionError> {
    let AppWiring {
        options,
        mut room,
        visitor,
        mut player,
    } = app;
    let snapshots = room.snapshot_handle();
    let tick_interval = room.tick_interval();

    info!(
        duration_ms = options.duration.as_millis() as u64,
        frame_ms = options.frame.as_millis() as u64,
        tick_interval_ms = tick_interval.as_millis() as u64,
        visitor = visitor.0,
        "loop_config"
    );

    let started = Instant::now();
    let mut last_frame_instant = started;
    let mut metrics = LoopMetricsWindow::new(METRICS_LOG_INTERVAL, started);
    let mut last_observed: Option<(GridPosition, MotionState)> = None;
    let mut script_done_logged = false;

    loop {
        thread::sleep(options.frame);
        let now = Instant::now();
        let frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        player.apply_due(&mut room, visitor);
        if player.is_finished() && !script_done_logged {
            info!(clock_ms = room.clock().as_millis() as u64, "script_finished");
            script_done_logged = true;
        }
        let report = room.advance(frame_dt);
        metrics.record_frame(frame_dt, &report);

        let latest = snapshots.latest();
        observe_visitor(&latest, &mut last_observed);

        if let Some(window) = metrics.close_if_due(now) {
            info!(
                fps = window.fps,
                tps = window.tps,
                idle_ratio = window.idle_ratio,
                frame_time_ms = window.frame_time_ms,
                tick = latest.tick,
                entity_count = latest.entities.len(),
                "loop_metrics"
            );
        }

        if now.saturating_duration_since(started) >= options.duration {
            break;
        }
    }

    let final_snapshot = snapshots.latest();
    info!(
        ticks = final_snapshot.tick,
        clock_ms = final_snapshot.clock.as_millis() as u64,
        "shutdown"
    );
    serde_json::to_string_pretty(&*final_snapshot).map_err(SessionError::Encode)
}

/// Logs the visitor's committed cell and motion state whenever either
/// changes, plus the interpolated draw position at trace level.
fn observe_visitor(
    snapshot: &RoomSnapshot,
    last_observed: &mut Option<(GridPosition, MotionState)>,
) {
    let Some(visitor) = snapshot.local() else {
        return;
    };

    let (render_x, render_y) = visitor.render_position(snapshot.clock, snapshot.tick_interval);
    trace!(render_x, render_y, "visitor_render_position");

    let observed = (visitor.grid_position, visitor.motion_state());
    if *last_observed == Some(observed) {
        return;
    }
    *last_observed = Some(observed);
    info!(
        x = observed.0.x,
        y = observed.0.y,
        rotation = visitor.rotation.code(),
        state = ?observed.1,
        "visitor_state"
    );
}
