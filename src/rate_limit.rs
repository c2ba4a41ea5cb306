//! Fixed-window request admission control.
//!
//! State is process-local. Horizontally scaled deployments get one
//! independent budget per instance unless they inject a shared
//! [`RateLimiter`] implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Admission check keyed by client identifier.
pub trait RateLimiter: Send + Sync {
    /// Record one request for `identifier` and report whether it is allowed.
    fn allow(&self, identifier: &str, limit: u32, window: Duration) -> bool;
}

/// Default requests per window.
pub const DEFAULT_LIMIT: u32 = 10;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default chance that a call sweeps elapsed windows.
pub const DEFAULT_CLEANUP_PROBABILITY: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// In-memory fixed-window counter.
///
/// Elapsed windows are swept opportunistically: each call has a small fixed
/// chance of scanning the whole table. There is no background task.
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
    cleanup_probability: f64,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::with_cleanup_probability(DEFAULT_CLEANUP_PROBABILITY)
    }

    /// `probability` is clamped to `[0, 1]`.
    pub fn with_cleanup_probability(probability: f64) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            cleanup_probability: probability.clamp(0.0, 1.0),
        }
    }

    /// [`RateLimiter::allow`] against an explicit clock reading.
    pub fn allow_at(&self, identifier: &str, limit: u32, window: Duration, now: Instant) -> bool {
        if self.should_sweep() {
            self.sweep_expired(now);
        }

        let mut windows = self.windows.lock();
        match windows.get_mut(identifier) {
            Some(w) if now <= w.reset_at => {
                if w.count >= limit {
                    return false;
                }
                w.count += 1;
                true
            }
            _ => {
                windows.insert(
                    identifier.to_string(),
                    Window {
                        count: 1,
                        reset_at: now + window,
                    },
                );
                true
            }
        }
    }

    /// Drop every window that has elapsed at `now`. Returns how many were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, w| now <= w.reset_at);
        let removed = before - windows.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = windows.len(), "swept rate-limit windows");
        }
        removed
    }

    /// Number of tracked identifiers.
    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.lock().is_empty()
    }

    fn should_sweep(&self) -> bool {
        if self.cleanup_probability <= 0.0 {
            return false;
        }
        if self.cleanup_probability >= 1.0 {
            return true;
        }
        let mut buf = [0u8; 4];
        if getrandom::getrandom(&mut buf).is_err() {
            return false;
        }
        (u32::from_le_bytes(buf) as f64 / u32::MAX as f64) < self.cleanup_probability
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn allow(&self, identifier: &str, limit: u32, window: Duration) -> bool {
        self.allow_at(identifier, limit, window, Instant::now())
    }
}
