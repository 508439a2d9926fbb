use std::collections::HashMap;

use rand::Rng;

use super::state::State;

/// Projection applied to the key side of every transition and to seeds.
///
/// Must be deterministic: the same raw token always projects to the same
/// key, otherwise recorded transitions become unreachable.
pub type KeyProjection = fn(&str) -> String;

/// Default key projection: keep ASCII letters only.
///
/// In abc notation, non-letter characters dictate how fast or how many
/// times a note is played. The same note sequence played at a different
/// speed would never share a state under a raw word-to-word mapping, so
/// keys are stripped of non-letters while successor values keep their
/// annotations.
pub fn alpha_only(token: &str) -> String {
	token.chars().filter(char::is_ascii_alphabetic).collect()
}

/// A first-order Markov chain of string tokens.
///
/// The `ChainModel` maps each projected token to a state holding the
/// weighted multiset of successors observed after it. Each call to
/// [`record_transition`](Self::record_transition) increases the
/// probability of the state transition key->value; a call to
/// [`sample_next`](Self::sample_next) returns the next token based on
/// these probabilities.
///
/// For example: given a corpus of 'words', the model can map the
/// probabilities of all transitions between a word and the next word,
/// where words are defined by how they are delimited (whitespace and
/// bars for abc notation).
///
/// # Responsibilities
/// - Record weighted transitions fed by a tokenizer
/// - Sample the next token for a seed, weighted by observed frequency
/// - Report the most frequently observed key (used to pick a starting seed)
/// - Merge with models built from other corpora
///
/// # Invariants
/// - Keys are stored projected; successor values are stored raw
/// - `P(sample == value | key) == count(key, value) / sum(count(key, *))`
#[derive(Clone, Debug)]
pub struct ChainModel {
	/// Projection applied to keys at record time and to seeds at lookup.
	projection: KeyProjection,

	/// Mapping from a projected token to its state.
	states: HashMap<String, State>,
}

impl ChainModel {
	/// Creates an empty model with the [`alpha_only`] key projection.
	pub fn new() -> Self {
		Self::with_projection(alpha_only)
	}

	/// Creates an empty model with a custom key projection.
	pub fn with_projection(projection: KeyProjection) -> Self {
		Self {
			projection,
			states: HashMap::new(),
		}
	}

	/// Records one state transition from `key` to `value`.
	///
	/// Based on other current recorded transitions from `key`, this call
	/// will increase the probability of the Markov state transition
	/// key->value.
	///
	/// Absence of either side is not an error: it is a valid "skip"
	/// signal from the tokenizer (ex. end of stream), and nothing is done.
	/// Empty-but-present strings are recorded like any other token.
	///
	/// The key is projected before insertion; the value is stored raw.
	pub fn record_transition(&mut self, key: Option<&str>, value: Option<&str>) {
		let (Some(key), Some(value)) = (key, value) else {
			return;
		};

		let key = (self.projection)(key);
		let state = self.states.entry(key.clone()).or_insert_with(|| State::new(&key));
		state.add_transition(value);
	}

	/// Returns the next Markov state weighted on the frequency of its
	/// mapping from `seed`.
	///
	/// The seed is projected before lookup, so differently-annotated
	/// spellings of the same token resolve to the same state.
	///
	/// For example: if "seed" is mapped only to "abc" 6 times and "def"
	/// 4 times, sampling "seed" returns "abc" 60% of the time and "def"
	/// 40% of the time.
	///
	/// Returns `None` if no transitions from `seed` exist. This is a
	/// defined terminal condition, not an error.
	pub fn sample_next<R: Rng>(&self, seed: &str, rng: &mut R) -> Option<&str> {
		let key = (self.projection)(seed);
		self.states.get(&key)?.sample(rng)
	}

	/// Returns the key with the most recorded observations.
	///
	/// In the event that there is more than one possible result, any one
	/// of them may be returned. Returns `None` if the model is empty.
	///
	/// Used to pick a good starting seed, not for correctness of
	/// generation.
	pub fn most_frequent_key(&self) -> Option<&str> {
		self.states
			.values()
			.max_by_key(|state| state.total())
			.map(State::key)
	}

	/// Returns the total number of observations recorded under `seed`
	/// (after projection), or 0 if the key was never observed.
	pub fn transition_count(&self, seed: &str) -> usize {
		let key = (self.projection)(seed);
		self.states.get(&key).map_or(0, State::total)
	}

	/// Returns the number of distinct keys in the model.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// Returns `true` if no transition has been recorded yet.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Merges another model into this one.
	///
	/// Occurrence counts for matching states and transitions are summed;
	/// states unknown to `self` are cloned over. Intended for combining
	/// models built from different corpora.
	///
	/// # Errors
	/// Returns an error if the two models carry different key projections.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.projection != other.projection {
			return Err("Projection mismatch".to_owned());
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}

impl Default for ChainModel {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn alpha_only_strips_non_letters() {
		assert_eq!(alpha_only("a2"), "a");
		assert_eq!(alpha_only("C,3/2"), "C");
		assert_eq!(alpha_only("^f'"), "f");
		assert_eq!(alpha_only("|:"), "");
	}

	#[test]
	fn absent_key_or_value_is_a_no_op() {
		let mut model = ChainModel::new();
		model.record_transition(None, Some("c"));
		model.record_transition(Some("a"), None);
		model.record_transition(None, None);
		assert!(model.is_empty());
		assert_eq!(model.len(), 0);
	}

	#[test]
	fn unknown_seed_returns_none() {
		let mut model = ChainModel::new();
		model.record_transition(Some("a"), Some("b"));

		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(model.sample_next("zzz", &mut rng), None);
	}

	#[test]
	fn sampling_matches_recorded_frequencies() {
		// Post-projection keys: "a", "a" and "c".
		let mut model = ChainModel::new();
		model.record_transition(Some("a"), Some("c"));
		model.record_transition(Some("a"), Some("de"));
		model.record_transition(Some("c"), Some("a2"));

		let mut rng = StdRng::seed_from_u64(42);
		let trials = 10_000;
		let mut c_count = 0;
		for _ in 0..trials {
			match model.sample_next("a", &mut rng) {
				Some("c") => c_count += 1,
				Some("de") => (),
				other => panic!("unexpected sample: {other:?}"),
			}
		}
		let ratio = c_count as f64 / trials as f64;
		assert!(
			(0.45..0.55).contains(&ratio),
			"expected ~50% 'c', got {:.1}%",
			ratio * 100.0
		);

		for _ in 0..100 {
			assert_eq!(model.sample_next("c", &mut rng), Some("a2"));
		}
	}

	#[test]
	fn key_side_is_projected_on_record_and_lookup() {
		let mut model = ChainModel::new();
		model.record_transition(Some("a2"), Some("x"));
		assert_eq!(model.transition_count("a"), 1);

		let mut rng = StdRng::seed_from_u64(3);
		assert_eq!(model.sample_next("a", &mut rng), Some("x"));
		// The seed is projected on lookup as well.
		assert_eq!(model.sample_next("a4", &mut rng), Some("x"));
	}

	#[test]
	fn repeated_pairs_raise_probability_proportionally() {
		let mut model = ChainModel::new();
		for _ in 0..9 {
			model.record_transition(Some("k"), Some("often"));
		}
		model.record_transition(Some("k"), Some("rare"));

		let mut rng = StdRng::seed_from_u64(11);
		let trials = 10_000;
		let mut often = 0;
		for _ in 0..trials {
			if model.sample_next("k", &mut rng) == Some("often") {
				often += 1;
			}
		}
		let ratio = often as f64 / trials as f64;
		assert!(
			(0.85..0.95).contains(&ratio),
			"expected ~90% 'often', got {:.1}%",
			ratio * 100.0
		);
	}

	#[test]
	fn most_frequent_key_prefers_the_largest_multiset() {
		let mut model = ChainModel::new();
		assert_eq!(model.most_frequent_key(), None);

		for _ in 0..3 {
			model.record_transition(Some("a"), Some("x"));
		}
		for _ in 0..5 {
			model.record_transition(Some("b"), Some("y"));
		}
		assert_eq!(model.most_frequent_key(), Some("b"));
	}

	#[test]
	fn empty_values_are_recorded_when_present() {
		let mut model = ChainModel::new();
		model.record_transition(Some("a"), Some(""));
		assert_eq!(model.transition_count("a"), 1);
	}

	#[test]
	fn merge_combines_observations() {
		let mut left = ChainModel::new();
		left.record_transition(Some("a"), Some("x"));

		let mut right = ChainModel::new();
		right.record_transition(Some("a"), Some("x"));
		right.record_transition(Some("b"), Some("y"));

		left.merge(&right).unwrap();
		assert_eq!(left.transition_count("a"), 2);
		assert_eq!(left.transition_count("b"), 1);
	}
}
