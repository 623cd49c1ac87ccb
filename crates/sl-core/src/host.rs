//! Host lifecycle hooks and the clock that feeds metadata columns.
//!
//! # Design
//!
//! The host process (game loop, UI loop, service tick…) owns time.  It tells
//! the logging layer about it through two traits:
//!
//! - [`HostLifecycle`] — "process started" / "one frame elapsed" callbacks.
//! - [`HostClock`] — wall-clock text and the current frame number, read once
//!   per committed row for the `Timestamp` and `Framecount` columns.
//!
//! A frame count of `-1` means "no frame has elapsed yet / not available".

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Local, Timelike};

/// Frame count reported before the host has started or advanced any frame.
pub const FRAME_UNAVAILABLE: i64 = -1;

// ── HostLifecycle ─────────────────────────────────────────────────────────────

/// Callbacks invoked by the host at key points of its main loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — frame counter
///
/// ```rust,ignore
/// struct FrameCounter(AtomicU64);
///
/// impl HostLifecycle for FrameCounter {
///     fn on_frame(&self) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait HostLifecycle {
    /// Called once when the host process has started.
    fn on_start(&self) {}

    /// Called once per elapsed host frame.
    fn on_frame(&self) {}
}

// ── HostClock ─────────────────────────────────────────────────────────────────

/// Source of the `Timestamp` and `Framecount` metadata values.
pub trait HostClock: HostLifecycle + Send + Sync {
    /// Wall-clock time as `yyyy-MM-dd HH:mm:ss.ffff`.
    fn now(&self) -> String;

    /// Current frame number, or [`FRAME_UNAVAILABLE`].
    fn frame_count(&self) -> i64;
}

/// `yyyy-MM-dd HH:mm:ss.ffff` (four fractional digits, ten-thousandths).
pub fn wall_clock_text(at: &DateTime<Local>) -> String {
    format!(
        "{}.{:04}",
        at.format("%Y-%m-%d %H:%M:%S"),
        at.nanosecond() % 1_000_000_000 / 100_000
    )
}

/// `yyyy_MM_dd_HH_mm_ss_ffff`: the same instant in a file-name-safe form.
pub fn file_stamp_text(at: &DateTime<Local>) -> String {
    format!(
        "{}_{:04}",
        at.format("%Y_%m_%d_%H_%M_%S"),
        at.nanosecond() % 1_000_000_000 / 100_000
    )
}

/// [`file_stamp_text`] for the current local time.
pub fn file_stamp_now() -> String {
    file_stamp_text(&Local::now())
}

// ── SystemClock ───────────────────────────────────────────────────────────────

/// Local wall-clock time plus a frame counter advanced by [`HostLifecycle`].
///
/// Shared between the host loop and every log store through an `Arc`; the
/// counters are atomics so `on_frame` never needs `&mut`.
#[derive(Debug, Default)]
pub struct SystemClock {
    started: AtomicBool,
    frames:  AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames elapsed since `on_start`.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

impl HostLifecycle for SystemClock {
    fn on_start(&self) {
        self.started.store(true, Ordering::Relaxed);
    }

    fn on_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> String {
        wall_clock_text(&Local::now())
    }

    fn frame_count(&self) -> i64 {
        let frames = self.frames();
        if !self.started.load(Ordering::Relaxed) || frames == 0 {
            return FRAME_UNAVAILABLE;
        }
        i64::try_from(frames).unwrap_or(i64::MAX)
    }
}

// ── FixedClock ────────────────────────────────────────────────────────────────

/// A deterministic clock: constant timestamp, frame counter starting at a
/// given value and incremented by `on_frame`.
///
/// Intended for tests and offline replays.
#[derive(Debug)]
pub struct FixedClock {
    now:   String,
    frame: AtomicI64,
}

impl FixedClock {
    pub fn new(now: impl Into<String>, frame: i64) -> Self {
        Self { now: now.into(), frame: AtomicI64::new(frame) }
    }
}

impl HostLifecycle for FixedClock {
    fn on_frame(&self) {
        self.frame.fetch_add(1, Ordering::Relaxed);
    }
}

impl HostClock for FixedClock {
    fn now(&self) -> String {
        self.now.clone()
    }

    fn frame_count(&self) -> i64 {
        self.frame.load(Ordering::Relaxed)
    }
}
