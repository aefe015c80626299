use crate::settings::AnimationSettings;
use derive_more::{Display, From};
use std::time::Duration;

/// A live repeating timer owned by the host event loop.
pub trait TimerHandle {
    /// Stops the timer. Called at most once per handle.
    fn cancel(self);
}

/// Identifies one transition. Ticks carrying an older id are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
#[display("run#{_0}")]
pub struct RunId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running { run: RunId, ticks: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    /// The tick that was just counted was the last one.
    Finished,
}

#[derive(Debug)]
pub struct TransitionScheduler<H> {
    timing: AnimationSettings,
    phase: Phase,
    elapsed: Duration,
    last_run: u64,
    timer: Option<H>,
}

impl<H: TimerHandle> TransitionScheduler<H> {
    pub fn new(timing: AnimationSettings) -> Self {
        Self {
            timing,
            phase: Phase::Idle,
            elapsed: Duration::ZERO,
            last_run: 0,
            timer: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.timing.interval
    }

    pub fn steps(&self) -> u32 {
        self.timing.steps()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn current_run(&self) -> Option<RunId> {
        match self.phase {
            Phase::Running { run, .. } => Some(run),
            Phase::Idle => None,
        }
    }

    /// Begins a new run, abandoning whatever was in flight.
    pub fn start(&mut self) -> RunId {
        self.cancel();
        self.last_run += 1;
        let run = RunId(self.last_run);
        self.phase = Phase::Running { run, ticks: 0 };
        self.elapsed = Duration::ZERO;
        log::trace!("{run} started, {} steps", self.steps());
        run
    }

    /// Hands over the host timer driving `run`. A timer for a run that is no
    /// longer current is cancelled right away.
    pub fn attach(&mut self, run: RunId, timer: H) {
        if self.current_run() != Some(run) {
            log::debug!("{run} was superseded before its timer was attached");
            timer.cancel();
            return;
        }
        if let Some(previous) = self.timer.replace(timer) {
            previous.cancel();
        }
    }

    /// Counts one tick of `run`. Returns `None` for stale or idle runs, in
    /// which case nothing should move.
    pub fn tick(&mut self, run: RunId) -> Option<Progress> {
        let Phase::Running {
            run: current,
            ticks,
        } = &mut self.phase
        else {
            return None;
        };
        if *current != run {
            return None;
        }

        *ticks += 1;
        let done = *ticks >= self.timing.steps();
        self.elapsed += self.timing.interval;

        if done {
            log::trace!("{run} finished after {:?}", self.elapsed);
            self.cancel();
            Some(Progress::Finished)
        } else {
            Some(Progress::Running)
        }
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default)]
    pub(crate) struct FakeTimer(pub(crate) Rc<Cell<u32>>);

    impl FakeTimer {
        pub(crate) fn cancelled(&self) -> bool {
            self.0.get() > 0
        }
    }

    impl TimerHandle for FakeTimer {
        fn cancel(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_runs_for_duration_over_interval_ticks() {
        let mut scheduler = TransitionScheduler::<FakeTimer>::new(AnimationSettings::default());
        let run = scheduler.start();
        let timer = FakeTimer::default();
        scheduler.attach(run, timer.clone());

        for _ in 0..7 {
            assert_eq!(scheduler.tick(run), Some(Progress::Running));
        }
        assert_eq!(scheduler.tick(run), Some(Progress::Finished));
        assert_eq!(scheduler.elapsed(), Duration::from_millis(200));
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(timer.0.get(), 1);

        assert_eq!(scheduler.tick(run), None);
    }

    #[test]
    fn test_restart_cancels_previous_timer() {
        let mut scheduler = TransitionScheduler::<FakeTimer>::new(AnimationSettings::default());
        let first = scheduler.start();
        let first_timer = FakeTimer::default();
        scheduler.attach(first, first_timer.clone());
        scheduler.tick(first);

        let second = scheduler.start();
        assert_ne!(first, second);
        assert!(first_timer.cancelled());
        assert_eq!(scheduler.tick(first), None);
        assert_eq!(scheduler.tick(second), Some(Progress::Running));
        assert_eq!(scheduler.elapsed(), Duration::from_millis(25));
    }

    #[test]
    fn test_late_timer_for_stale_run_is_cancelled() {
        let mut scheduler = TransitionScheduler::<FakeTimer>::new(AnimationSettings::default());
        let first = scheduler.start();
        let second = scheduler.start();

        let late = FakeTimer::default();
        scheduler.attach(first, late.clone());
        assert!(late.cancelled());

        let live = FakeTimer::default();
        scheduler.attach(second, live.clone());
        assert!(!live.cancelled());
        assert_eq!(scheduler.current_run(), Some(second));
    }

    #[test]
    fn test_single_step_when_duration_is_shorter_than_interval() {
        let timing = AnimationSettings {
            duration: Duration::from_millis(10),
            ..AnimationSettings::default()
        };
        let mut scheduler = TransitionScheduler::<FakeTimer>::new(timing);
        let run = scheduler.start();
        assert_eq!(scheduler.tick(run), Some(Progress::Finished));
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = TransitionScheduler::<FakeTimer>::new(AnimationSettings::default());
        let run = scheduler.start();
        let timer = FakeTimer::default();
        scheduler.attach(run, timer.clone());

        scheduler.cancel();
        scheduler.cancel();
        assert_eq!(timer.0.get(), 1);
        assert_eq!(scheduler.tick(run), None);
    }
}
