//! abc-notation collaborators around the Markov core.
//!
//! abc notation (abcnotation.com) is a text-based language that can
//! express western music and convert easily to MIDI or sheet music. A
//! corpus is the music part of many abc tunes combined into one text
//! file (without headers). Words are delimited by whitespace and bars
//! ('|'); non-letter characters carry duration and repetition.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::chain_model::ChainModel;
use crate::model::generator::Generator;
use crate::model::walk_params::{StartSeed, WalkParams};

/// Splits one corpus line into abc words.
///
/// Words are delimited by whitespace or bars ('|'); empty fragments from
/// consecutive delimiters are dropped.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
	line.split(|c: char| c.is_whitespace() || c == '|')
		.filter(|word| !word.is_empty())
}

/// Feeds a corpus into the model, one consecutive word pair at a time.
///
/// The pairing carries across line boundaries: the last word of a line
/// becomes the key for the first word of the next. Keys are projected by
/// the model at record time while values keep their raw spelling.
///
/// For example: a corpus with contents "a c | a2 de" will add a mapping
/// of a->c with 50% probability, a->de with 50% probability and c->a2
/// with 100% probability ("a2" projects to "a").
pub fn train_from_lines<I, S>(model: &mut ChainModel, lines: I)
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut previous: Option<String> = None;
	for line in lines {
		for word in tokenize(line.as_ref()) {
			// The first word of the corpus has no key yet; the model
			// treats the absence as a skip signal.
			model.record_transition(previous.as_deref(), Some(word));
			previous = Some(word.to_owned());
		}
	}
	log::debug!("corpus ingested: {} keys", model.len());
}

/// Header block of an exported abc tune.
///
/// Exported tunes are currently restricted to 4/4 time and C major; the
/// defaults mirror those restrictions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TuneHeader {
	/// X: reference number within the file.
	pub reference: u32,
	/// T: tune title.
	pub title: String,
	/// C: composer.
	pub composer: String,
	/// M: meter.
	pub meter: String,
	/// L: unit note length.
	pub unit_note_length: String,
	/// Q: tempo.
	pub tempo: String,
	/// K: key signature. Always the last header field.
	pub key: String,
}

impl Default for TuneHeader {
	fn default() -> Self {
		Self {
			reference: 1,
			title: "Untitled".to_owned(),
			composer: "abc-gen".to_owned(),
			meter: "4/4".to_owned(),
			unit_note_length: "1/8".to_owned(),
			tempo: "1/4=100".to_owned(),
			key: "Cmaj".to_owned(),
		}
	}
}

impl fmt::Display for TuneHeader {
	/// Renders the header block. The final `K:` line carries no newline;
	/// the tune body supplies its own leading line break.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "X:{}", self.reference)?;
		writeln!(f, "T:{}", self.title)?;
		writeln!(f, "C:{}", self.composer)?;
		writeln!(f, "M:{}", self.meter)?;
		writeln!(f, "L:{}", self.unit_note_length)?;
		writeln!(f, "Q:{}", self.tempo)?;
		write!(f, "K:{}", self.key)
	}
}

/// Shape of a generated score.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreLayout {
	/// Number of measures of music to generate.
	pub measures: usize,
	/// Number of musical words per measure.
	pub words_per_measure: usize,
	/// Measures per output line.
	pub measures_per_line: usize,
}

impl Default for ScoreLayout {
	fn default() -> Self {
		Self {
			measures: 50,
			words_per_measure: 2,
			measures_per_line: 6,
		}
	}
}

impl ScoreLayout {
	/// Walk parameters equivalent to this layout: one step per word,
	/// one group per measure.
	pub fn walk_params(&self, start_seed: StartSeed) -> WalkParams {
		WalkParams {
			total_steps: self.measures * self.words_per_measure,
			group_size: self.words_per_measure,
			start_seed,
		}
	}
}

/// Generates the tune body: a Markov walk laid out as measures.
///
/// Each word is followed by a space; a bar ("| ") closes every completed
/// measure; a line break opens every `measures_per_line`-th measure,
/// including the first. A walk that dead-ends mid-measure leaves the
/// partial measure without a closing bar.
///
/// An empty model or an unresolvable seed yields an empty body.
pub fn compose_body<R: Rng>(
	model: &ChainModel,
	layout: &ScoreLayout,
	start_seed: &StartSeed,
	rng: &mut R,
) -> String {
	let mut body = String::new();
	if layout.words_per_measure == 0 {
		return body;
	}

	let params = layout.walk_params(start_seed.clone());
	let mut completed = Vec::new();
	let words = Generator::new(model).run(&params, rng, |measure| completed.push(measure));

	for (index, measure) in words.chunks(layout.words_per_measure).enumerate() {
		if layout.measures_per_line > 0 && index % layout.measures_per_line == 0 {
			body.push('\n');
		}
		for word in measure {
			body.push_str(word);
			body.push(' ');
		}
		if completed.contains(&(index + 1)) {
			body.push_str("| ");
		}
	}

	body
}

/// Composes a complete abc document: header block followed by the body.
pub fn compose_tune<R: Rng>(
	model: &ChainModel,
	header: &TuneHeader,
	layout: &ScoreLayout,
	start_seed: &StartSeed,
	rng: &mut R,
) -> String {
	format!("{}{}", header, compose_body(model, layout, start_seed, rng))
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn tokenize_splits_on_whitespace_and_bars() {
		let words: Vec<&str> = tokenize("a c | a2 de").collect();
		assert_eq!(words, vec!["a", "c", "a2", "de"]);
	}

	#[test]
	fn tokenize_drops_empty_fragments() {
		let words: Vec<&str> = tokenize("  |  a ||b | ").collect();
		assert_eq!(words, vec!["a", "b"]);
	}

	#[test]
	fn training_pairs_consecutive_words() {
		let mut model = ChainModel::new();
		train_from_lines(&mut model, ["a c | a2 de"]);
		// a->c, c->a2 and a->de ("a2" projects to "a").
		assert_eq!(model.transition_count("a"), 2);
		assert_eq!(model.transition_count("c"), 1);
		assert_eq!(model.transition_count("de"), 0);
	}

	#[test]
	fn training_pairs_across_line_boundaries() {
		let mut model = ChainModel::new();
		train_from_lines(&mut model, ["a b", "c d"]);
		// b->c spans the line break.
		assert_eq!(model.transition_count("b"), 1);
	}

	#[test]
	fn header_renders_the_abc_field_block() {
		let header = TuneHeader {
			title: "Night Walk".to_owned(),
			..TuneHeader::default()
		};
		assert_eq!(
			header.to_string(),
			"X:1\nT:Night Walk\nC:abc-gen\nM:4/4\nL:1/8\nQ:1/4=100\nK:Cmaj"
		);
	}

	#[test]
	fn body_lays_out_measures_bars_and_lines() {
		// Deterministic single-successor chain: a -> b -> a -> ...
		let mut model = ChainModel::new();
		model.record_transition(Some("a"), Some("b"));
		model.record_transition(Some("b"), Some("a"));

		let layout = ScoreLayout {
			measures: 3,
			words_per_measure: 2,
			measures_per_line: 2,
		};
		let mut rng = StdRng::seed_from_u64(9);
		let body = compose_body(&model, &layout, &StartSeed::Custom("a".to_owned()), &mut rng);
		assert_eq!(body, "\nb a | b a | \nb a | ");
	}

	#[test]
	fn dead_end_leaves_the_partial_measure_unbarred() {
		let mut model = ChainModel::new();
		model.record_transition(Some("a"), Some("b"));
		model.record_transition(Some("b"), Some("x9"));
		model.record_transition(Some("x"), Some("y"));

		let layout = ScoreLayout {
			measures: 5,
			words_per_measure: 2,
			measures_per_line: 6,
		};
		let mut rng = StdRng::seed_from_u64(9);
		let body = compose_body(&model, &layout, &StartSeed::Custom("a".to_owned()), &mut rng);
		// The walk is b, x9, y then a dead end on "y".
		assert_eq!(body, "\nb x9 | y ");
	}

	#[test]
	fn empty_model_composes_a_header_only_document() {
		let model = ChainModel::new();
		let header = TuneHeader::default();
		let mut rng = StdRng::seed_from_u64(9);
		let tune = compose_tune(
			&model,
			&header,
			&ScoreLayout::default(),
			&StartSeed::MostFrequent,
			&mut rng,
		);
		assert_eq!(tune, header.to_string());
	}
}
