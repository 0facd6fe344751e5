use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation clock for submitted requests.
///
/// Generation 0 is never handed out; the first call to [`Self::next`] returns 1.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently issued generation (0 if none).
	pub fn last(&self) -> u64 {
		self.next.load(Ordering::Acquire)
	}
}

/// The single authoritative "latest submitted generation" marker.
///
/// Writers only ever move the marker forward (`fetch_max`), so a late claim
/// from an older submission can never rewind it. Readers compare their own
/// generation against the marker at delivery time.
#[derive(Debug, Default, Clone)]
pub struct Supersession {
	latest: Arc<AtomicU64>,
}

impl Supersession {
	/// Creates a marker with no claimed generation.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `generation` as the latest submission. Returns the previous marker.
	pub fn claim(&self, generation: u64) -> u64 {
		self.latest.fetch_max(generation, Ordering::AcqRel)
	}

	/// Returns the latest claimed generation.
	pub fn latest(&self) -> u64 {
		self.latest.load(Ordering::Acquire)
	}

	/// Returns true when `generation` is still the latest claim.
	pub fn is_current(&self, generation: u64) -> bool {
		self.latest() == generation
	}
}

/// Generation-scoped handle carried alongside one submitted request.
#[derive(Debug, Clone)]
pub struct Ticket {
	generation: u64,
	supersession: Supersession,
}

impl Ticket {
	/// Creates a ticket for `generation` observing `supersession`.
	pub fn new(generation: u64, supersession: Supersession) -> Self {
		Self { generation, supersession }
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true while no newer request has been submitted.
	pub fn is_current(&self) -> bool {
		self.supersession.is_current(self.generation)
	}

	/// Returns true once a newer request has been submitted.
	pub fn is_superseded(&self) -> bool {
		!self.is_current()
	}
}

/// Clock and marker shared by every execution unit serving one request
/// stream.
///
/// A replacement unit spawned with the same lineage keeps numbering where
/// the old one stopped, and its first request supersedes anything the old
/// unit still had in flight.
#[derive(Debug, Default, Clone)]
pub struct Lineage {
	clock: GenerationClock,
	supersession: Supersession,
}

impl Lineage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Claims the next generation and returns its ticket.
	pub fn issue(&self) -> Ticket {
		let generation = self.clock.next();
		self.supersession.claim(generation);
		Ticket::new(generation, self.supersession.clone())
	}

	/// Marks every ticket older than `generation` as superseded.
	pub fn supersede_before(&self, generation: u64) {
		self.supersession.claim(generation);
	}

	/// Latest claimed generation.
	pub fn latest(&self) -> u64 {
		self.supersession.latest()
	}
}
