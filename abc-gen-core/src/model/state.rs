use rand::Rng;

/// Represents a state in a first-order Markov chain.
///
/// A `State` corresponds to one projected token (`key`) and stores all
/// observed transitions from this token to the next one.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations: a successor recorded N
/// times is N times as likely to be sampled as one recorded once.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Pick the next token using weighted random sampling
/// - Merge with another state having the same key (ex. combining corpora)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - `total` always equals the sum of all occurrence counts
#[derive(Clone, Debug)]
pub struct State {
	/// Identifier of the state (projected token).
	key: String,
	/// Outgoing transitions in first-observation order.
	/// The count represents how many times this transition was observed.
	/// Example: [("c", 42), ("de", 3)]
	successors: Vec<(String, usize)>,
	/// Sum of all occurrence counts.
	total: usize,
}

impl State {
	/// Creates a new empty state for the given key.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			successors: Vec::new(),
			total: 0,
		}
	}

	/// Returns the key this state belongs to.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the total number of recorded observations.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Records an occurrence of a transition toward `value`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	///
	/// Successors keep their first-observation order, so sampling with the
	/// same seeded randomness source replays identically.
	pub fn add_transition(&mut self, value: &str) {
		match self.successors.iter_mut().find(|(token, _)| token == value) {
			Some((_, occurrence)) => *occurrence += 1,
			None => self.successors.push((value.to_owned(), 1)),
		}
		self.total += 1;
	}

	/// Picks the next token using weighted random sampling.
	///
	/// The probability of selecting a token is its occurrence count divided
	/// by the state total. A single uniform index in `[0, total)` is drawn
	/// from `rng` and resolved by cumulative subtraction over the ordered
	/// successor list.
	///
	/// Returns `None` if the state has no observations.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		if self.total == 0 {
			return None;
		}

		// Randomly select a successor
		let mut r = rng.random_range(0..self.total);

		let mut fallback: Option<&str> = None;
		for (token, occurrence) in &self.successors {
			if r < *occurrence {
				return Some(token);
			}
			r -= occurrence;
			fallback = Some(token);
		}

		// Fallback: should not happen while `total` matches the counts,
		// but kept for safety.
		fallback
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same key. Transition occurrence
	/// counts are summed; successors unknown to `self` are appended.
	///
	/// This method is intended for combining models built from different
	/// corpora into a single one.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err("Key mismatch".to_owned());
		}

		for (token, occurrence) in &other.successors {
			match self.successors.iter_mut().find(|(existing, _)| existing == token) {
				Some((_, existing)) => *existing += occurrence,
				None => self.successors.push((token.clone(), *occurrence)),
			}
		}
		self.total += other.total;

		Ok(())
	}
}
