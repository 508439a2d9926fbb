use rand::Rng;

use super::chain_model::ChainModel;
use super::walk_params::{StartSeed, WalkParams};

/// Drives a [`ChainModel`] to produce a finite token sequence.
///
/// The generator borrows an already-built, read-only model; it holds no
/// sampling state of its own beyond the current seed of a running walk.
///
/// # Responsibilities
/// - Resolve the starting seed from the walk parameters
/// - Repeatedly sample the next token, re-seeding with each output
/// - Stop on step-budget exhaustion or on a dead end
/// - Fire the group-boundary callback for presentation
pub struct Generator<'a> {
	model: &'a ChainModel,
}

impl<'a> Generator<'a> {
	/// Creates a generator over a built model.
	pub fn new(model: &'a ChainModel) -> Self {
		Self { model }
	}

	/// Runs the walk and returns the generated token sequence.
	///
	/// Starting from the seed resolved per `params.start_seed`, repeats up
	/// to `params.total_steps` times: sample the next token from the
	/// current seed (the model projects the seed on every lookup); append
	/// the raw token to the sequence and make it the new seed. Sampling
	/// `None` is a normal, expected termination (corpora are finite and
	/// chains can dead-end): the walk stops immediately and the sequence
	/// collected so far is returned.
	///
	/// After every `group_size`-th appended token, `on_group_boundary` is
	/// invoked with the 1-based count of completed groups. The callback is
	/// presentation-only and has no effect on sampling; a partial trailing
	/// group fires no boundary.
	///
	/// An empty model, or a `MostFrequent` seed on an empty model, yields
	/// an empty sequence and no callback invocation.
	pub fn run<R: Rng, F: FnMut(usize)>(
		&self,
		params: &WalkParams,
		rng: &mut R,
		mut on_group_boundary: F,
	) -> Vec<String> {
		if self.model.is_empty() {
			return Vec::new();
		}
		let first_seed = match &params.start_seed {
			StartSeed::MostFrequent => self.model.most_frequent_key(),
			StartSeed::Custom(seed) => Some(seed.as_str()),
		};
		let Some(first_seed) = first_seed else {
			return Vec::new();
		};

		let mut sequence: Vec<String> = Vec::new();
		let mut seed = first_seed;
		for step in 1..=params.total_steps {
			match self.model.sample_next(seed, rng) {
				Some(token) => {
					sequence.push(token.to_owned());
					seed = token;
				}
				// Dead end: the projected seed was never observed as a
				// transition source. Return what we have.
				None => return sequence,
			}
			if params.group_size > 0 && step % params.group_size == 0 {
				on_group_boundary(step / params.group_size);
			}
		}

		sequence
	}
}
