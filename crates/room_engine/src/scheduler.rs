use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub remaining_accumulator: Duration,
}

/// Splits an accumulator into whole ticks. Every elapsed interval becomes a
/// tick; nothing is dropped however large the backlog.
pub fn plan_sim_steps(mut accumulator: Duration, tick_interval: Duration) -> StepPlan {
    if tick_interval.is_zero() {
        return StepPlan {
            ticks_to_run: 0,
            remaining_accumulator: accumulator,
        };
    }

    let mut ticks_to_run = 0u32;
    while accumulator >= tick_interval {
        accumulator -= tick_interval;
        ticks_to_run = ticks_to_run.saturating_add(1);
    }
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickStamp {
    /// 1-based tick number since the scheduler started.
    pub index: u64,
    /// Simulation clock at the tick boundary.
    pub at: Duration,
}

/// Ticks that became due during one [`TickScheduler::accumulate`] call.
#[derive(Debug, Clone)]
pub struct DueTicks {
    next_index: u64,
    next_at: Duration,
    remaining: u32,
    tick_interval: Duration,
}

impl Iterator for DueTicks {
    type Item = TickStamp;

    fn next(&mut self) -> Option<TickStamp> {
        if self.remaining == 0 {
            return None;
        }
        let stamp = TickStamp {
            index: self.next_index,
            at: self.next_at,
        };
        self.remaining -= 1;
        self.next_index = self.next_index.saturating_add(1);
        self.next_at = self.next_at.saturating_add(self.tick_interval);
        Some(stamp)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for DueTicks {}

/// Fixed-interval accumulator. Tick `k` happens at `k * tick_interval` on a
/// clock that only moves by the deltas fed into [`accumulate`].
///
/// [`accumulate`]: TickScheduler::accumulate
#[derive(Debug, Clone)]
pub struct TickScheduler {
    tick_interval: Duration,
    accumulator: Duration,
    ticks_elapsed: u64,
    last_tick_at: Duration,
}

impl TickScheduler {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            accumulator: Duration::ZERO,
            ticks_elapsed: 0,
            last_tick_at: Duration::ZERO,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    pub fn last_tick_at(&self) -> Duration {
        self.last_tick_at
    }

    pub fn clock(&self) -> Duration {
        self.last_tick_at.saturating_add(self.accumulator)
    }

    pub fn accumulate(&mut self, elapsed: Duration) -> DueTicks {
        let plan = plan_sim_steps(
            self.accumulator.saturating_add(elapsed),
            self.tick_interval,
        );
        let due = DueTicks {
            next_index: self.ticks_elapsed.saturating_add(1),
            next_at: self.last_tick_at.saturating_add(self.tick_interval),
            remaining: plan.ticks_to_run,
            tick_interval: self.tick_interval,
        };

        self.ticks_elapsed = self
            .ticks_elapsed
            .saturating_add(u64::from(plan.ticks_to_run));
        for _ in 0..plan.ticks_to_run {
            self.last_tick_at = self.last_tick_at.saturating_add(self.tick_interval);
        }
        self.accumulator = plan.remaining_accumulator;
        due
    }
}
