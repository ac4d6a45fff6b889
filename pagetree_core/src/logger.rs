use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde::Serialize;

/// Sink for recoverable problems found while building pages.
///
/// Every call emits a `tracing` event and bumps a counter so that the caller
/// can decide whether a run with logged errors should fail. Shared between
/// worker threads.
#[derive(Debug, Default)]
pub struct PageLogger {
	errors: AtomicUsize,
	warnings: AtomicUsize,
}

impl PageLogger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn error(&self, message: &str) {
		tracing::error!("{message}");
		self.errors.fetch_add(1, Ordering::Relaxed);
	}

	pub fn warn(&self, message: &str) {
		tracing::warn!("{message}");
		self.warnings.fetch_add(1, Ordering::Relaxed);
	}

	pub fn error_count(&self) -> usize {
		self.errors.load(Ordering::Relaxed)
	}

	pub fn warning_count(&self) -> usize {
		self.warnings.load(Ordering::Relaxed)
	}

	/// Snapshot of the counters.
	pub fn report(&self) -> GenerationReport {
		GenerationReport {
			errors: self.error_count(),
			warnings: self.warning_count(),
		}
	}
}

/// Problem counts of one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
	pub errors: usize,
	pub warnings: usize,
}

impl GenerationReport {
	pub fn is_clean(&self) -> bool {
		self.errors == 0 && self.warnings == 0
	}

	pub fn has_errors(&self) -> bool {
		self.errors > 0
	}
}
