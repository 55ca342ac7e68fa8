//! Frame scheduling with an explicit running/stopped lifecycle.

/// Accumulates elapsed time against a fixed interval
#[derive(Debug, Clone)]
pub struct SimulationClock {
    interval_s: f32,
    accumulated_s: f32,
}

impl SimulationClock {
    pub fn new(interval_s: f32) -> Self {
        Self {
            interval_s,
            accumulated_s: 0.0,
        }
    }

    /// Add `dt_s` and report whether the interval was exceeded
    ///
    /// When exceeded, the accumulator is reduced modulo the interval.
    pub fn advance(&mut self, dt_s: f32) -> bool {
        self.accumulated_s += dt_s.max(0.0);
        if self.accumulated_s > self.interval_s {
            self.accumulated_s %= self.interval_s;
            true
        } else {
            false
        }
    }

    pub fn accumulated_s(&self) -> f32 {
        self.accumulated_s
    }
}

/// Lifecycle of a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, no frames delivered yet
    Idle,
    /// Delivering one frame per refresh
    Running,
    /// Stopped for good
    Stopped,
}

/// Outcome of one host refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Whether the frame callback ran
    pub ticked: bool,
    /// Number of frames delivered so far, including this one
    pub tick: u64,
    /// Whether the clock interval elapsed on this refresh
    /// Reserved for rate-limited work, nothing consumes it yet
    pub interval_elapsed: bool,
}

/// Drives one frame callback per host refresh while running
#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    clock: SimulationClock,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new(clock: SimulationClock) -> Self {
        Self {
            state: SchedulerState::Idle,
            clock,
            ticks: 0,
        }
    }

    /// Begin delivering frames; only allowed once, from `Idle`
    pub fn start(&mut self) -> Result<(), String> {
        match self.state {
            SchedulerState::Idle => {
                self.state = SchedulerState::Running;
                Ok(())
            }
            other => Err(format!("Scheduler cannot start from {:?}", other)),
        }
    }

    /// Stop delivering frames; there is no way back to running
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            log::info!("Scheduler stopped after {} frames", self.ticks);
        }
        self.state = SchedulerState::Stopped;
    }

    /// Handle one host refresh of `dt_s` seconds
    ///
    /// Runs `frame` exactly once when running. Otherwise nothing is touched,
    /// including the clock.
    pub fn on_refresh(&mut self, dt_s: f32, frame: impl FnOnce()) -> FrameReport {
        if self.state != SchedulerState::Running {
            return FrameReport {
                ticked: false,
                tick: self.ticks,
                interval_elapsed: false,
            };
        }

        frame();
        self.ticks += 1;
        let interval_elapsed = self.clock.advance(dt_s);

        FrameReport {
            ticked: true,
            tick: self.ticks,
            interval_elapsed,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_wraps_at_interval() {
        let mut clock = SimulationClock::new(0.5);

        assert!(!clock.advance(0.2));
        assert!(!clock.advance(0.2));
        assert!(clock.advance(0.2));
        assert!((clock.accumulated_s() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_clock_ignores_negative_time() {
        let mut clock = SimulationClock::new(0.5);
        clock.advance(0.3);
        clock.advance(-1.0);
        assert!((clock.accumulated_s() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_idle_scheduler_does_not_tick() {
        let mut scheduler = FrameScheduler::new(SimulationClock::new(0.5));
        let mut calls = 0;

        let report = scheduler.on_refresh(0.016, || calls += 1);

        assert!(!report.ticked);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_running_scheduler_ticks_once_per_refresh() {
        let mut scheduler = FrameScheduler::new(SimulationClock::new(0.5));
        scheduler.start().unwrap();
        let mut calls = 0;

        for _ in 0..10 {
            scheduler.on_refresh(0.016, || calls += 1);
        }

        assert_eq!(calls, 10);
        assert_eq!(scheduler.ticks(), 10);
    }

    #[test]
    fn test_interval_reported_without_gating_frames() {
        let mut scheduler = FrameScheduler::new(SimulationClock::new(0.6));
        scheduler.start().unwrap();

        let reports: Vec<FrameReport> = (0..10)
            .map(|_| scheduler.on_refresh(0.25, || {}))
            .collect();

        assert!(reports.iter().all(|r| r.ticked));
        // Crossings at 0.75, 0.65, 0.8 and 0.7 accumulated seconds
        let crossed: Vec<u64> = reports
            .iter()
            .filter(|r| r.interval_elapsed)
            .map(|r| r.tick)
            .collect();
        assert_eq!(crossed, vec![3, 5, 8, 10]);
    }

    #[test]
    fn test_stop_is_final() {
        let mut scheduler = FrameScheduler::new(SimulationClock::new(0.5));
        scheduler.start().unwrap();
        scheduler.stop();

        assert!(scheduler.start().is_err());
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        let mut calls = 0;
        for _ in 0..100 {
            let report = scheduler.on_refresh(0.016, || calls += 1);
            assert!(!report.ticked);
        }
        assert_eq!(calls, 0);
        assert_eq!(scheduler.clock().accumulated_s(), 0.0);
    }

    #[test]
    fn test_start_twice_fails() {
        let mut scheduler = FrameScheduler::new(SimulationClock::new(0.5));
        assert!(scheduler.start().is_ok());
        assert!(scheduler.start().is_err());
        assert!(scheduler.is_running());
    }
}
