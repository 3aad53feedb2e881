//! Metrics collection and reporting for a coding session.
//!
//! The codec functions update the counters they can observe directly (raw
//! bytes, symbols, tree rebuilds, statistics resets). The size of the
//! compressed side is filled in by whoever owns the compressed stream.
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe; it belongs to one session.

use std::time::{Duration, Instant};

/// Counters and timing for one compress or decompress run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the session started
    pub start_time: Instant,

    /// When the session ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed bytes read (compress) or written (decompress)
    pub raw_bytes: u64,

    /// Compressed bytes written (compress) or read (decompress)
    pub compressed_bytes: u64,

    /// Bytes of code-length table (static format only)
    pub header_bytes: u64,

    // === Coding ===
    /// Symbols coded, including EOS
    pub symbols_coded: u64,

    /// Code trees built during the session
    pub tree_rebuilds: u64,

    /// Frequency-table resets at block boundaries (adaptive format only)
    pub table_resets: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            compressed_bytes: 0,
            header_bytes: 0,
            symbols_coded: 0,
            tree_rebuilds: 0,
            table_resets: 0,
        }
    }

    /// Mark the session as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if no raw data was seen.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average compressed bits per raw byte, header excluded.
    pub fn bits_per_byte(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            let payload = self.compressed_bytes.saturating_sub(self.header_bytes);
            payload as f64 * 8.0 / self.raw_bytes as f64
        }
    }

    /// Compute throughput in raw bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Session Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Sizes ===");
        println!("Raw:        {} bytes ({:.2} MiB)", self.raw_bytes, self.raw_bytes as f64 / 1024.0 / 1024.0);
        println!("Compressed: {} bytes ({:.2} MiB)", self.compressed_bytes, self.compressed_bytes as f64 / 1024.0 / 1024.0);
        println!("Header:     {} bytes", self.header_bytes);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!("Bits per byte: {:.3}", self.bits_per_byte());
        println!();

        println!("=== Coding ===");
        println!("Symbols coded: {}", self.symbols_coded);
        println!("Tree rebuilds: {}", self.tree_rebuilds);
        println!("Table resets: {}", self.table_resets);
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             header_bytes={}\n\
             compression_ratio={:.4}\n\
             symbols_coded={}\n\
             tree_rebuilds={}\n\
             table_resets={}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.header_bytes,
            self.compression_ratio(),
            self.symbols_coded,
            self.tree_rebuilds,
            self.table_resets,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100);
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.compression_ratio(), 0.0);

        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 750;
        assert_eq!(metrics.compression_ratio(), 0.75);
    }

    #[test]
    fn test_bits_per_byte_excludes_header() {
        let mut metrics = Metrics::new();
        metrics.raw_bytes = 100;
        metrics.header_bytes = 257;
        metrics.compressed_bytes = 257 + 50;
        assert_eq!(metrics.bits_per_byte(), 4.0);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut metrics = Metrics::new();
        metrics.complete();
        let first = metrics.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(metrics.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 600;
        metrics.table_resets = 3;

        let text = metrics.export_text();
        assert!(text.contains("raw_bytes=1000"));
        assert!(text.contains("compressed_bytes=600"));
        assert!(text.contains("compression_ratio=0.6000"));
        assert!(text.contains("table_resets=3"));
    }
}
