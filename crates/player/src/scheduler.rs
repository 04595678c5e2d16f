// FILE: crates/player/src/scheduler.rs
//! Periodic time reporting while playing

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Identifies one run of the tick timer
///
/// A token stays live until its timer is cancelled or replaced. Ticks that
/// carry a dead token must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchedulerToken(u64);

impl SchedulerToken {
    /// Returns the raw token id
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Owns at most one running tick timer
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    next_id: u64,
    live: Option<(SchedulerToken, JoinHandle<()>)>,
}

impl TickScheduler {
    /// Creates an idle scheduler that ticks every `period` once started
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_id: 0,
            live: None,
        }
    }

    /// Returns the tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts a fresh timer, cancelling the one that was running
    ///
    /// `make_tick` runs on the timer task once per period and its result is
    /// sent to `sink`. The first tick fires one period after start. The
    /// timer stops by itself when the sink is closed.
    pub fn start<T, F>(&mut self, sink: UnboundedSender<T>, make_tick: F) -> SchedulerToken
    where
        T: Send + 'static,
        F: Fn(SchedulerToken) -> T + Send + 'static,
    {
        self.stop();

        self.next_id += 1;
        let token = SchedulerToken(self.next_id);
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if sink.send(make_tick(token)).is_err() {
                    log::debug!("Tick sink closed, stopping timer {}", token.id());
                    break;
                }
            }
        });

        log::debug!("Started tick timer {} every {:?}", token.id(), period);
        self.live = Some((token, handle));
        token
    }

    /// Cancels the timer identified by `token`
    ///
    /// Returns false if that token was not live.
    pub fn cancel(&mut self, token: SchedulerToken) -> bool {
        if !self.is_live(token) {
            return false;
        }
        self.stop().is_some()
    }

    /// Cancels whatever timer is running
    pub fn stop(&mut self) -> Option<SchedulerToken> {
        self.live.take().map(|(token, handle)| {
            handle.abort();
            log::debug!("Cancelled tick timer {}", token.id());
            token
        })
    }

    /// Returns true if `token` belongs to the running timer
    pub fn is_live(&self, token: SchedulerToken) -> bool {
        matches!(&self.live, Some((live, _)) if *live == token)
    }

    /// Returns the token of the running timer
    pub fn live_token(&self) -> Option<SchedulerToken> {
        self.live.as_ref().map(|(token, _)| *token)
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.live.take() {
            handle.abort();
        }
    }
}
