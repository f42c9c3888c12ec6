//! Console spinner with a shared progress value.
//!
//! The scan over a book runs single-threaded; the only concurrency in the
//! whole program is the display thread spawned here, which polls a shared
//! percentage every 100ms and redraws `spinner + percent` on stderr. The
//! thread is stopped through a stop token and joined on every exit path
//! (the guard does both in `Drop`) so the terminal is never left with a
//! half-drawn status line.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use once_cell::sync::Lazy;
use tracing::warn;

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Percentage shared between the scan loop and the display thread,
/// stored as tenths of a percent so an atomic integer suffices.
#[derive(Clone, Debug, Default)]
pub struct SharedProgress {
    tenths: Arc<AtomicU64>,
}

impl SharedProgress {
    pub fn set_percent(&self, percent: f64) {
        let clamped = percent.clamp(0.0, 100.0);
        self.tenths.store((clamped * 10.0) as u64, Ordering::Release);
    }

    pub fn percent(&self) -> f64 {
        self.tenths.load(Ordering::Acquire) as f64 / 10.0
    }
}

/// One-way stop signal, checked each polling cycle.
#[derive(Clone, Debug, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn trip(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_tripped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Stops and joins the display thread when dropped, success or failure.
pub struct SpinnerGuard {
    stop: StopToken,
    handle: Option<JoinHandle<()>>,
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.stop.trip();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Progress display thread panicked");
            }
        }
    }
}

/// Spawn the display thread. `label` is the verb shown next to the spinner.
pub fn start_spinner(label: &'static str, progress: SharedProgress) -> SpinnerGuard {
    let stop = StopToken::default();
    let thread_stop = stop.clone();
    let handle = thread::spawn(move || {
        let mut frames = SPINNER_FRAMES.iter().cycle();
        while !thread_stop.is_tripped() {
            let frame = frames.next().copied().unwrap_or('|');
            eprint!("\r{label}... {frame} {:.1}%", progress.percent());
            let _ = io::stderr().flush();
            thread::sleep(POLL_INTERVAL);
        }
        // Clear the status line before handing the terminal back.
        eprint!("\r{:width$}\r", "", width = label.len() + 16);
        let _ = io::stderr().flush();
    });
    SpinnerGuard {
        stop,
        handle: Some(handle),
    }
}

static INTERRUPT: Lazy<StopToken> = Lazy::new(|| {
    let token = StopToken::default();
    let handler_token = token.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.trip()) {
        warn!("Failed to install Ctrl-C handler: {err}");
    }
    token
});

/// Process-wide interrupt token, tripped by Ctrl-C. Batch loops check it
/// between requests so a run stops at a clean boundary.
pub fn interrupt_token() -> StopToken {
    INTERRUPT.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_to_tenths_and_clamps() {
        let progress = SharedProgress::default();
        progress.set_percent(42.46);
        assert!((progress.percent() - 42.4).abs() < f64::EPSILON);
        progress.set_percent(150.0);
        assert!((progress.percent() - 100.0).abs() < f64::EPSILON);
        progress.set_percent(-3.0);
        assert!((progress.percent() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn spinner_guard_joins_on_drop() {
        let progress = SharedProgress::default();
        let guard = start_spinner("Testing", progress.clone());
        progress.set_percent(50.0);
        drop(guard);
        // Reaching here means the display thread was joined.
    }

    #[test]
    fn stop_token_is_one_way() {
        let token = StopToken::default();
        assert!(!token.is_tripped());
        token.trip();
        assert!(token.is_tripped());
        let clone = token.clone();
        assert!(clone.is_tripped());
    }
}
