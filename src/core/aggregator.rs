use crate::domain::model::CompletedBlock;
use std::time::{Duration, Instant};

/// Marker substring on the first line of an exchange report.
const START_MARKER: &str = "exchanges present";
/// Marker substring on the last line of an exchange report.
const END_MARKER: &str = "exchanges available";

/// A stalled block is abandoned once the gap between consecutive lines
/// exceeds this.
pub const BLOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Delimits multi-line exchange reports inside a boundary-free chat stream.
///
/// Chat messages arrive one line at a time with no framing beyond the content
/// markers, so this keeps a running buffer and a timestamp of the last line.
/// One instance serves one logical stream and must be fed lines in arrival
/// order by a single caller.
pub struct LineAggregator {
    collecting: bool,
    buffer: Vec<String>,
    last_line_at: Instant,
}

impl LineAggregator {
    pub fn new() -> Self {
        Self {
            collecting: false,
            buffer: Vec::new(),
            last_line_at: Instant::now(),
        }
    }

    /// Feeds one chat line. Returns a block only when this line completes one.
    pub fn observe(&mut self, line: &str, now: Instant) -> Option<CompletedBlock> {
        // A long silence means any half-collected block is stale chat, not
        // part of whatever arrives next.
        if now.saturating_duration_since(self.last_line_at) > BLOCK_TIMEOUT {
            if self.collecting {
                tracing::debug!("Abandoning stale exchange block after timeout");
            }
            self.reset();
        }
        self.last_line_at = now;

        if line.contains(START_MARKER) {
            // A fresh header always wins; a previous unfinished buffer is
            // dropped rather than merged into the new block.
            self.reset();
            self.collecting = true;
            self.buffer.push(line.to_string());
            tracing::debug!("🔍 Started collecting exchange block");
            return None;
        }

        if self.collecting {
            self.buffer.push(line.to_string());
            if line.contains(END_MARKER) {
                let block = CompletedBlock::from_lines(&self.buffer);
                self.reset();
                tracing::debug!("📦 Complete exchange block collected ({} chars)", block.as_str().len());
                return Some(block);
            }
        }

        None
    }

    fn reset(&mut self) {
        self.collecting = false;
        self.buffer.clear();
    }
}

impl Default for LineAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(agg: &mut LineAggregator, lines: &[&str], start: Instant) -> Vec<CompletedBlock> {
        let mut out = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let now = start + Duration::from_millis(i as u64 * 100);
            if let Some(block) = agg.observe(line, now) {
                out.push(block);
            }
        }
        out
    }

    #[test]
    fn ignores_lines_outside_a_block() {
        let mut agg = LineAggregator::new();
        let now = Instant::now();
        assert!(agg.observe("random chat line", now).is_none());
        assert!(agg.observe("Input: 1 Diamond", now).is_none());
        // Still idle: a later complete block parses normally.
        let blocks = feed(
            &mut agg,
            &["(1/5) exchanges present", "4 exchanges available"],
            now,
        );
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn collects_a_full_block() {
        let mut agg = LineAggregator::new();
        let blocks = feed(
            &mut agg,
            &[
                "(3/5) exchanges present",
                "Input: 1 Diamond",
                "Output: 2 Sand",
                "4 exchanges available",
            ],
            Instant::now(),
        );
        assert_eq!(blocks.len(), 1);
        let lines: Vec<&str> = blocks[0].lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Input: 1 Diamond");
    }

    #[test]
    fn new_start_marker_drops_partial_block() {
        let mut agg = LineAggregator::new();
        let blocks = feed(
            &mut agg,
            &[
                "(3/5) exchanges present",
                "Input: 1 Diamond",
                "(2/5) exchanges present",
                "Input: 9 Dirt",
                "Output: 1 Stone",
                "1 exchanges available",
            ],
            Instant::now(),
        );
        assert_eq!(blocks.len(), 1);
        // Nothing from the abandoned first block survives.
        assert!(!blocks[0].as_str().contains("Diamond"));
        assert!(blocks[0].as_str().contains("Dirt"));
    }

    #[test]
    fn timeout_clears_in_progress_state() {
        let mut agg = LineAggregator::new();
        let start = Instant::now();
        assert!(agg.observe("(3/5) exchanges present", start).is_none());
        assert!(agg
            .observe("Input: 1 Diamond", start + Duration::from_millis(500))
            .is_none());
        // Gap longer than a second: the block is gone, so the end marker
        // alone completes nothing.
        let late = start + Duration::from_millis(2000);
        assert!(agg.observe("4 exchanges available", late).is_none());
    }

    #[test]
    fn timeout_does_not_affect_a_fresh_start_line() {
        let mut agg = LineAggregator::new();
        let start = Instant::now();
        assert!(agg.observe("(3/5) exchanges present", start).is_none());
        // Same gap, but the late line is itself a start marker: new block.
        let late = start + Duration::from_secs(5);
        assert!(agg.observe("(1/5) exchanges present", late).is_none());
        let done = agg.observe("2 exchanges available", late + Duration::from_millis(100));
        assert!(done.is_some());
    }
}
