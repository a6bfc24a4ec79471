//! Rate-limited warnings for tracker connectivity failures.

/// Suppresses all but every Nth warning.
///
/// Owned by the client instance rather than shared process state, so
/// its counter resets with the client's lifetime.
#[derive(Debug, Clone)]
pub struct WarnLimiter {
    every: u32,
    remaining: u32,
}

impl WarnLimiter {
    pub fn new(every: u32) -> Self {
        Self {
            every,
            remaining: 0,
        }
    }

    /// True when the caller should emit this warning; the next
    /// `every` occurrences are then suppressed.
    pub fn should_warn(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            false
        } else {
            self.remaining = self.every;
            true
        }
    }
}

impl Default for WarnLimiter {
    /// One warning per ten suppressed occurrences.
    fn default() -> Self {
        Self::new(10)
    }
}
