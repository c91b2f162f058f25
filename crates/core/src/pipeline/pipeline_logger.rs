use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for extraction events.
///
/// Decouples the use case from where its progress ends up (log crate,
/// nowhere, a test recorder) so callers can observe a run without changing
/// the orchestration code.
pub trait PipelineLogger: Send {
    /// A new source is about to be read; `position` counts from 1.
    fn source_started(&mut self, name: &str, position: usize, total: usize);

    /// Frames emitted from the current source. `expected` is 0 when the
    /// source does not declare its length.
    fn progress(&mut self, current: usize, expected: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn info(&mut self, message: &str);

    /// A per-item failure that did not stop the run.
    fn warn(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn source_started(&mut self, _name: &str, _position: usize, _total: usize) {}
    fn progress(&mut self, _current: usize, _expected: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
}

/// Forwards events to the `log` facade and keeps per-stage timings for a
/// summary at the end of the run.
///
/// Progress lines are throttled to every `throttle_frames` frames.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    sources: usize,
    frames: usize,
    warnings: Vec<String>,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            sources: 0,
            frames: 0,
            warnings: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was processed.
    pub fn summary_string(&self) -> Option<String> {
        if self.sources == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Extraction summary ({} frames from {} sources, {:.1}s total):",
            self.frames,
            self.sources,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        if !self.warnings.is_empty() {
            lines.push(format!("  Warnings: {}", self.warnings.len()));
        }

        if self.frames > 0 && elapsed_ms > 0.0 {
            let fps = self.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn source_started(&mut self, name: &str, position: usize, total: usize) {
        self.sources += 1;
        log::info!("Reading {name} ({position}/{total})");
    }

    fn progress(&mut self, current: usize, expected: usize) {
        self.frames += 1;
        let at_step = current % self.throttle_frames == 0;
        if expected > 0 {
            if at_step || current == expected {
                let pct = current as f64 / expected as f64 * 100.0;
                log::info!("Extracted {current}/{expected} frames ({pct:.1}%)");
            }
        } else if at_step {
            log::info!("Extracted {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
        log::warn!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.source_started("a.avi", 1, 1);
        logger.progress(1, 10);
        logger.timing("read", 5.0);
        logger.info("hello");
        logger.warn("careful");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("read", 20.0);
        logger.timing("read", 30.0);
        logger.timing("write", 5.0);

        let read = logger.timings_for("read").unwrap();
        assert_eq!(read.len(), 2);
        assert_relative_eq!(read[0], 20.0);
        assert_relative_eq!(read[1], 30.0);
        assert_eq!(logger.timings_for("write").unwrap().len(), 1);
        assert!(logger.timings_for("encode").is_none());
    }

    #[test]
    fn test_summary_counts_sources_and_frames() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut logger = LogPipelineLogger::new(2);
        logger.source_started("a.avi", 1, 2);
        logger.progress(1, 0);
        logger.progress(2, 0);
        logger.source_started("b.avi", 2, 2);
        logger.progress(1, 1);
        logger.timing("read", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("3 frames from 2 sources"));
        assert!(summary.contains("read"));
        logger.summary();
    }

    #[test]
    fn test_summary_lists_warnings() {
        let mut logger = LogPipelineLogger::default();
        logger.source_started("a.avi", 1, 1);
        logger.warn("Skipping a.avi: corrupt");

        assert_eq!(logger.warnings(), ["Skipping a.avi: corrupt"]);
        assert!(logger.summary_string().unwrap().contains("Warnings: 1"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = LogPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_zero_throttle_clamped() {
        let mut logger = LogPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
        logger.progress(1, 0);
        assert_eq!(logger.frames, 1);
    }
}
