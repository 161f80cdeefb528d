use std::time::{Duration, Instant};

/// A single cancellable deferred task with a trailing-edge deadline.
///
/// Scheduling replaces whatever was pending, so only the last value handed to
/// [`Debouncer::schedule`] within a quiet period is ever released. A quiet
/// period that runs past the clock's range never becomes due.
#[derive(Debug)]
pub(crate) struct Debouncer<T> {
	quiet: Duration,
	pending: Option<(Option<Instant>, T)>,
}

impl<T> Debouncer<T> {
	pub(crate) fn new(quiet: Duration) -> Self {
		Self {
			quiet,
			pending: None,
		}
	}

	pub(crate) fn quiet_period(&self) -> Duration {
		self.quiet
	}

	pub(crate) fn schedule(&mut self, value: T, now: Instant) {
		self.pending = Some((now.checked_add(self.quiet), value));
	}

	pub(crate) fn cancel(&mut self) {
		self.pending = None;
	}

	pub(crate) fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	pub(crate) fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().and_then(|(deadline, _)| *deadline)
	}

	/// Release the pending value once its deadline has passed.
	pub(crate) fn fire_due(&mut self, now: Instant) -> Option<T> {
		match &self.pending {
			Some((Some(deadline), _)) if now >= *deadline => self.pending.take().map(|(_, value)| value),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const QUIET: Duration = Duration::from_millis(300);

	#[test]
	fn nothing_fires_before_the_quiet_period() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(QUIET);
		debouncer.schedule("a", start);
		assert_eq!(debouncer.fire_due(start + Duration::from_millis(299)), None);
		assert_eq!(debouncer.fire_due(start + QUIET), Some("a"));
		assert!(!debouncer.is_pending());
		assert_eq!(debouncer.fire_due(start + QUIET * 2), None);
	}

	#[test]
	fn rescheduling_resets_the_deadline_and_value() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(QUIET);
		debouncer.schedule("Tata", start);
		debouncer.schedule("Tata Motors", start + Duration::from_millis(100));
		assert_eq!(debouncer.fire_due(start + QUIET), None);
		assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(400)));
		assert_eq!(
			debouncer.fire_due(start + Duration::from_millis(400)),
			Some("Tata Motors")
		);
	}

	#[test]
	fn cancel_drops_the_pending_value() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(QUIET);
		debouncer.schedule(1, start);
		debouncer.cancel();
		assert_eq!(debouncer.fire_due(start + QUIET * 10), None);
		assert_eq!(debouncer.deadline(), None);
	}

	#[test]
	fn unrepresentable_deadlines_stay_pending() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(Duration::MAX);
		debouncer.schedule("x", start);
		assert!(debouncer.is_pending());
		assert_eq!(debouncer.deadline(), None);
		assert_eq!(debouncer.fire_due(start + Duration::from_secs(3600)), None);

		debouncer.cancel();
		assert!(!debouncer.is_pending());
	}
}
