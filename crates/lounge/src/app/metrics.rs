use std::time::{Duration, Instant};

use room_engine::TickReport;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LoopMetrics {
    pub(crate) fps: f32,
    pub(crate) tps: f32,
    /// Share of ticks skipped because nothing in the room was moving.
    pub(crate) idle_ratio: f32,
    pub(crate) frame_time_ms: f32,
}

/// Per-interval frame and tick counters for the `loop_metrics` log line.
#[derive(Debug)]
pub(crate) struct LoopMetricsWindow {
    window_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    idle_ticks: u32,
    frame_time_sum: Duration,
}

impl LoopMetricsWindow {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            interval,
            frames: 0,
            ticks: 0,
            idle_ticks: 0,
            frame_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, report: &TickReport) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        self.ticks = self.ticks.saturating_add(report.ticks_run);
        self.idle_ticks = self.idle_ticks.saturating_add(report.idle_ticks);
    }

    /// Closes the window once `interval` has passed and starts the next one.
    pub(crate) fn close_if_due(&mut self, now: Instant) -> Option<LoopMetrics> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_sum.as_secs_f32() * 1000.0 / frames as f32,
        };
        let idle_ratio = match self.ticks {
            0 => 0.0,
            ticks => self.idle_ticks as f32 / ticks as f32,
        };
        let metrics = LoopMetrics {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            idle_ratio,
            frame_time_ms,
        };

        *self = Self::new(self.interval, now);
        Some(metrics)
    }
}
