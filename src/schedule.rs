//! Refresh cadence for the polled rows

use crate::config::Preferences;
use crate::panel::{ControlCenter, Snapshot};
use log::debug;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshGroup {
    /// Brightness, volume, Wi-Fi, Bluetooth
    Fast,
    /// Battery
    Slow,
    /// Free-form CLI label
    Cli,
}

impl RefreshGroup {
    pub const ALL: [RefreshGroup; 3] = [RefreshGroup::Fast, RefreshGroup::Slow, RefreshGroup::Cli];
}

/// Interval per group; `None` disables the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    fast: Option<Duration>,
    slow: Option<Duration>,
    cli: Option<Duration>,
}

fn nonzero(d: Duration) -> Option<Duration> {
    (!d.is_zero()).then_some(d)
}

impl RefreshSchedule {
    pub fn new(fast: Duration, slow: Duration, cli: Duration) -> Self {
        RefreshSchedule {
            fast: nonzero(fast),
            slow: nonzero(slow),
            cli: nonzero(cli),
        }
    }

    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self::new(
            Duration::from_millis(prefs.refresh_fast_millis),
            Duration::from_secs(prefs.refresh_slow_seconds),
            Duration::from_secs(prefs.refresh_cli_seconds),
        )
    }

    pub fn interval(&self, group: RefreshGroup) -> Option<Duration> {
        match group {
            RefreshGroup::Fast => self.fast,
            RefreshGroup::Slow => self.slow,
            RefreshGroup::Cli => self.cli,
        }
    }

    /// The shortest enabled interval, i.e. how often a driver loop has to wake up.
    pub fn tick(&self) -> Option<Duration> {
        RefreshGroup::ALL.iter().filter_map(|g| self.interval(*g)).min()
    }
}

/// Tracks when each group last ran.
#[derive(Debug, Clone)]
pub struct Ticker {
    schedule: RefreshSchedule,
    last: [Instant; 3],
}

impl Ticker {
    pub fn new(schedule: RefreshSchedule, start: Instant) -> Self {
        Ticker {
            schedule,
            last: [start; 3],
        }
    }

    pub fn schedule(&self) -> &RefreshSchedule {
        &self.schedule
    }

    /// Groups whose interval has elapsed at `now`; their clocks restart.
    pub fn due(&mut self, now: Instant) -> Vec<RefreshGroup> {
        let mut due = Vec::new();
        for (idx, group) in RefreshGroup::ALL.iter().enumerate() {
            let Some(interval) = self.schedule.interval(*group) else {
                continue;
            };
            if now.saturating_duration_since(self.last[idx]) >= interval {
                self.last[idx] = now;
                due.push(*group);
            }
        }
        due
    }
}

/// Background polling thread. Snapshots of the due groups arrive on the
/// receiver, so a UI thread can `try_recv` without ever blocking on a probe.
pub struct Poller {
    /// Dropping the sender wakes the thread out of its tick wait
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling; the first snapshot covers every group.
    pub fn spawn(center: Arc<ControlCenter>, schedule: RefreshSchedule) -> (Self, Receiver<Snapshot>) {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let tick = schedule.tick().unwrap_or(Duration::from_secs(1));

        let handle = thread::spawn(move || {
            let mut ticker = Ticker::new(schedule, Instant::now());
            let mut groups = RefreshGroup::ALL.to_vec();
            loop {
                if !groups.is_empty() && tx.send(center.collect(&groups)).is_err() {
                    debug!("Poller receiver gone, stopping");
                    break;
                }
                match stop_rx.recv_timeout(tick) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => break,
                }
                groups = ticker.due(Instant::now());
            }
        });

        (
            Poller {
                stop: Some(stop_tx),
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Ask the thread to finish and wait for it; a probe in flight completes first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
