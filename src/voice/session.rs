//! Recording session lifecycle
//!
//! A session is either `Idle` or `Listening`. Starting arms exactly one
//! countdown ticker and one deadline timer; every way out of `Listening`
//! aborts both. Timer tasks only send [`TimerEvent`]s, tagged with the
//! generation of the pair that produced them, so a fire racing a stop is
//! recognized as stale and dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::adapter::VoiceAdapter;
use crate::Result;

/// Countdown resolution
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// State of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
}

/// Fired by the session's timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One countdown period elapsed
    Tick { generation: u64 },
    /// The auto-stop deadline was reached
    Deadline { generation: u64 },
}

impl TimerEvent {
    const fn generation(self) -> u64 {
        match self {
            Self::Tick { generation } | Self::Deadline { generation } => generation,
        }
    }
}

/// What a timer event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Event belonged to a cancelled timer pair
    Stale,
    /// Countdown updated
    Ticked { remaining_secs: u64 },
    /// Deadline reached, session stopped
    Expired,
}

/// The live countdown/deadline pair; aborted on drop
struct TimerPair {
    countdown: JoinHandle<()>,
    deadline: JoinHandle<()>,
}

impl Drop for TimerPair {
    fn drop(&mut self) {
        self.countdown.abort();
        self.deadline.abort();
    }
}

/// One speech capture session with countdown and auto-stop
pub struct RecordingSession<A> {
    adapter: A,
    max_duration: Duration,
    state: SessionState,
    deadline: Option<Instant>,
    remaining_secs: u64,
    generation: u64,
    timers: Option<TimerPair>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl<A: VoiceAdapter> RecordingSession<A> {
    /// Create an idle session
    #[must_use]
    pub fn new(adapter: A, max_duration: Duration) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            adapter,
            max_duration,
            state: SessionState::Idle,
            deadline: None,
            remaining_secs: 0,
            generation: 0,
            timers: None,
            timer_tx,
            timer_rx,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    /// Absolute auto-stop time while listening
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whole seconds left on the countdown, as last displayed
    #[must_use]
    pub const fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Number of timer pairs armed over the session's lifetime
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a countdown/deadline pair is currently armed
    #[must_use]
    pub const fn has_live_timers(&self) -> bool {
        self.timers.is_some()
    }

    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Start listening
    ///
    /// Returns `Ok(false)` without side effects if already listening.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if it cannot begin; the session stays idle
    pub fn start(&mut self) -> Result<bool> {
        if self.is_listening() {
            tracing::debug!("start ignored, already listening");
            return Ok(false);
        }

        self.adapter.begin()?;

        let now = Instant::now();
        let deadline = now + self.max_duration;
        self.state = SessionState::Listening;
        self.deadline = Some(deadline);
        self.remaining_secs = ceil_secs(self.max_duration);
        self.arm_timers(now, deadline);

        tracing::info!(
            max_ms = u64::try_from(self.max_duration.as_millis()).unwrap_or(u64::MAX),
            generation = self.generation,
            "recording started"
        );
        Ok(true)
    }

    /// Stop listening
    ///
    /// Returns `false` and touches nothing if the session is idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_listening() {
            return false;
        }

        self.timers = None;
        self.adapter.end();
        self.state = SessionState::Idle;
        self.deadline = None;
        self.remaining_secs = 0;

        tracing::info!(generation = self.generation, "recording stopped");
        true
    }

    /// Wait for the next timer event
    ///
    /// Pends forever while no timers are armed.
    pub async fn next_timer_event(&mut self) -> TimerEvent {
        match self.timer_rx.recv().await {
            Some(event) => event,
            // the session holds a sender, so the channel can't close
            None => std::future::pending().await,
        }
    }

    /// Apply a timer event
    pub fn on_timer(&mut self, event: TimerEvent) -> TimerOutcome {
        if !self.is_listening() || event.generation() != self.generation {
            tracing::trace!(?event, "stale timer event");
            return TimerOutcome::Stale;
        }

        match event {
            TimerEvent::Tick { .. } => {
                let left = self
                    .deadline
                    .map_or(Duration::ZERO, |d| d.saturating_duration_since(Instant::now()));
                self.remaining_secs = ceil_secs(left);
                TimerOutcome::Ticked {
                    remaining_secs: self.remaining_secs,
                }
            }
            TimerEvent::Deadline { .. } => {
                tracing::info!("recording deadline reached");
                self.stop();
                TimerOutcome::Expired
            }
        }
    }

    fn arm_timers(&mut self, now: Instant, deadline: Instant) {
        // dropping the old pair aborts it before the new one exists
        self.timers = None;
        self.generation += 1;
        let generation = self.generation;

        let tx = self.timer_tx.clone();
        let countdown = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(now + TICK_PERIOD, TICK_PERIOD);
            loop {
                interval.tick().await;
                if tx.send(TimerEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        });

        let tx = self.timer_tx.clone();
        let deadline = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(TimerEvent::Deadline { generation });
        });

        self.timers = Some(TimerPair {
            countdown,
            deadline,
        });
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Error;

    #[derive(Default, Clone)]
    struct CountingAdapter {
        begins: Arc<AtomicUsize>,
        ends: Arc<AtomicUsize>,
        refuse: bool,
    }

    impl VoiceAdapter for CountingAdapter {
        fn begin(&mut self) -> Result<()> {
            if self.refuse {
                return Err(Error::Adapter("not-allowed".to_string()));
            }
            self.begins.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn end(&mut self) {
            self.ends.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(15_000)), 15);
        assert_eq!(ceil_secs(Duration::from_millis(14_001)), 15);
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::ZERO), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_while_idle_is_noop() {
        let adapter = CountingAdapter::default();
        let mut session = RecordingSession::new(adapter.clone(), Duration::from_secs(15));

        assert!(!session.stop());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.generation(), 0);
        assert!(!session.has_live_timers());
        assert_eq!(adapter.ends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_arms_one_pair() {
        let adapter = CountingAdapter::default();
        let mut session = RecordingSession::new(adapter.clone(), Duration::from_secs(15));

        assert!(session.start().unwrap());
        assert!(!session.start().unwrap());

        assert_eq!(session.generation(), 1);
        assert!(session.has_live_timers());
        assert_eq!(session.remaining_secs(), 15);
        assert_eq!(adapter.begins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_begin_stays_idle() {
        let adapter = CountingAdapter {
            refuse: true,
            ..CountingAdapter::default()
        };
        let mut session = RecordingSession::new(adapter, Duration::from_secs(15));

        let err = session.start().unwrap_err();
        assert!(matches!(err, Error::Adapter(_)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.has_live_timers());
        assert!(session.deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks() {
        let mut session =
            RecordingSession::new(CountingAdapter::default(), Duration::from_secs(3));
        session.start().unwrap();

        let event = session.next_timer_event().await;
        assert_eq!(event, TimerEvent::Tick { generation: 1 });
        assert_eq!(
            session.on_timer(event),
            TimerOutcome::Ticked { remaining_secs: 2 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_events_ignored_after_restart() {
        let adapter = CountingAdapter::default();
        let mut session = RecordingSession::new(adapter.clone(), Duration::from_secs(15));

        session.start().unwrap();
        session.stop();
        session.start().unwrap();

        assert_eq!(
            session.on_timer(TimerEvent::Deadline { generation: 1 }),
            TimerOutcome::Stale
        );
        assert!(session.is_listening());
        assert_eq!(adapter.ends.load(Ordering::SeqCst), 1);
    }
}
