/// Strategy used to select the starting seed when generating a sequence.
///
/// # Variants
/// - `MostFrequent`: seed from the key with the most recorded
///   observations (resolves to nothing on an empty model).
/// - `Custom(String)`: use the provided token as the initial seed.
#[derive(Clone, Debug, PartialEq)]
pub enum StartSeed {
	MostFrequent,
	Custom(String),
}

/// Parameters for one generation walk.
///
/// # Responsibilities
/// - Bound the walk with a fixed step budget
/// - Group output tokens for presentation (boundary callbacks)
/// - Select the starting-seed strategy
#[derive(Clone, Debug)]
pub struct WalkParams {
	/// Maximum number of sampling steps.
	pub total_steps: usize,

	/// Number of steps between two boundary callbacks (0 disables them).
	pub group_size: usize,

	/// Strategy used to resolve the first seed.
	pub start_seed: StartSeed,
}

impl Default for WalkParams {
	/// 50 measures of 2 words, seeded from the most frequent key.
	fn default() -> Self {
		Self {
			total_steps: 100,
			group_size: 2,
			start_seed: StartSeed::MostFrequent,
		}
	}
}
