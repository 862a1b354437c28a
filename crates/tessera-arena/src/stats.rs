//! Utilisation counters and the human-readable stats dump.
//!
//! Counters are collected by the [`Arena`](crate::Arena) facade when
//! [`ArenaConfig::enable_stats`](crate::ArenaConfig::enable_stats) is set, so
//! they mean the same thing for every backend. The dump format is free text
//! for people, not a machine-readable contract.

use std::io;

/// `part / whole` as a percentage; 0 for an empty whole.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Counters describing how an arena has been used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Successful `push` and `push_zero` calls.
    pub pushes: u64,
    /// Successful `push_zero` calls (a subset of `pushes`).
    pub zeroed_pushes: u64,
    /// Failed allocation requests.
    pub failed_pushes: u64,
    /// Bytes requested by successful pushes, before alignment rounding.
    pub bytes_requested: u64,
    /// Operations that increased capacity.
    pub growth_events: u64,
    /// `reserve` calls, including no-ops.
    pub reserves: u64,
    /// Successful `reset` calls.
    pub resets: u64,
    /// Highest `allocated()` observed.
    pub peak_allocated: usize,
}

impl ArenaStats {
    /// Record a successful push of `size` bytes.
    pub(crate) fn record_push(&mut self, size: usize, zeroed: bool, allocated: usize) {
        self.pushes += 1;
        if zeroed {
            self.zeroed_pushes += 1;
        }
        self.bytes_requested += size as u64;
        self.peak_allocated = self.peak_allocated.max(allocated);
    }

    /// Record a capacity change around an operation.
    pub(crate) fn record_capacity(&mut self, before: usize, after: usize) {
        if after > before {
            self.growth_events += 1;
        }
    }

    /// Write the counters as indented `name: value` lines.
    pub fn write_to(&self, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "  pushes:           {}", self.pushes)?;
        writeln!(out, "  zeroed pushes:    {}", self.zeroed_pushes)?;
        writeln!(out, "  failed pushes:    {}", self.failed_pushes)?;
        writeln!(out, "  bytes requested:  {}", self.bytes_requested)?;
        writeln!(out, "  growth events:    {}", self.growth_events)?;
        writeln!(out, "  reserves:         {}", self.reserves)?;
        writeln!(out, "  resets:           {}", self.resets)?;
        writeln!(out, "  peak allocated:   {} bytes", self.peak_allocated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_empty_is_zero() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(16, 64), 25.0);
    }

    #[test]
    fn record_push_tracks_peak() {
        let mut stats = ArenaStats::default();
        stats.record_push(40, false, 40);
        stats.record_push(8, true, 48);
        stats.record_push(8, false, 8);
        assert_eq!(stats.pushes, 3);
        assert_eq!(stats.zeroed_pushes, 1);
        assert_eq!(stats.bytes_requested, 56);
        assert_eq!(stats.peak_allocated, 48);
    }

    #[test]
    fn only_increases_count_as_growth() {
        let mut stats = ArenaStats::default();
        stats.record_capacity(64, 64);
        stats.record_capacity(64, 128);
        assert_eq!(stats.growth_events, 1);
    }

    #[test]
    fn write_to_lists_every_counter() {
        let stats = ArenaStats {
            pushes: 3,
            resets: 1,
            ..Default::default()
        };
        let mut out = Vec::new();
        stats.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("pushes:           3"));
        assert!(text.contains("resets:           1"));
        assert_eq!(text.lines().count(), 8);
    }
}
