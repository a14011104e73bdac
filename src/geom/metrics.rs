//! Opt-in timing hooks for ring recomputation.
//!
//! Timing is only collected when the `ring_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call compiles down to running the closure.
//!
//! ```ignore
//! let mut metrics = RingMetrics::default();
//! metrics.begin();
//! let placements = metrics.time(TimingBucket::Layout, || allocate_arcs(&specs, gap, &dims));
//! if let Some(report) = metrics.end() {
//!     log::debug!("layout took {} ns", report.layout_ns);
//! }
//! ```

/// Phases of one ring recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Arc allocation and anchor placement.
    Layout,
    /// Cross-section vertex generation and index stitching.
    Meshing,
    /// Smooth normal accumulation.
    Normals,
    /// Connector curves, markers and labels.
    Connectors,
    /// Topology counting for diagnostics.
    Diagnostics,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RingTimingReport {
    pub layout_ns: u64,
    pub meshing_ns: u64,
    pub normals_ns: u64,
    pub connectors_ns: u64,
    pub diagnostics_ns: u64,
}

impl RingTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.layout_ns
            .saturating_add(self.meshing_ns)
            .saturating_add(self.normals_ns)
            .saturating_add(self.connectors_ns)
            .saturating_add(self.diagnostics_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    /// Adds every bucket of `other` into this report.
    pub fn accumulate(&mut self, other: &RingTimingReport) {
        self.layout_ns = self.layout_ns.saturating_add(other.layout_ns);
        self.meshing_ns = self.meshing_ns.saturating_add(other.meshing_ns);
        self.normals_ns = self.normals_ns.saturating_add(other.normals_ns);
        self.connectors_ns = self.connectors_ns.saturating_add(other.connectors_ns);
        self.diagnostics_ns = self.diagnostics_ns.saturating_add(other.diagnostics_ns);
    }
}

/// Accumulator for timing ring operations.
///
/// Call [`begin`](Self::begin) to reset, wrap work with [`time`](Self::time),
/// and call [`end`](Self::end) to retrieve the report.
#[derive(Debug, Default)]
pub struct RingMetrics {
    #[cfg(all(feature = "ring_metrics", not(target_arch = "wasm32")))]
    report: RingTimingReport,
}

impl RingMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "ring_metrics", not(target_arch = "wasm32")))]
        {
            self.report = RingTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<RingTimingReport> {
        #[cfg(all(feature = "ring_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "ring_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "ring_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "ring_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    /// Folds a report produced elsewhere (e.g. on a worker thread) into this one.
    pub fn absorb(&mut self, other: Option<&RingTimingReport>) {
        #[cfg(all(feature = "ring_metrics", not(target_arch = "wasm32")))]
        {
            if let Some(other) = other {
                self.report.accumulate(other);
            }
        }

        #[cfg(not(all(feature = "ring_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = other;
        }
    }

    #[cfg(all(feature = "ring_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Layout => &mut self.report.layout_ns,
            TimingBucket::Meshing => &mut self.report.meshing_ns,
            TimingBucket::Normals => &mut self.report.normals_ns,
            TimingBucket::Connectors => &mut self.report.connectors_ns,
            TimingBucket::Diagnostics => &mut self.report.diagnostics_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
