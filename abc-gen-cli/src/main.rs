use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use abc_gen_core::abc::{self, ScoreLayout, TuneHeader};
use abc_gen_core::io::{read_file, sanitize_filename};
use abc_gen_core::model::chain_model::ChainModel;
use abc_gen_core::model::walk_params::StartSeed;

/* abc-gen-cli:
 *
 * Uses a Markov chain process in order to 'randomly' compose music in
 * the same style as a defined corpus of music. Music is read and written
 * in abc notation (abcnotation.com), a text-based language for western
 * music that converts easily into MIDI audio or sheet music.
 *
 * As input, the program requires an abc corpus: the music part of many
 * different abc tunes (without headers) combined into one text file.
 * Drop such a file next to this program and run it; the program exports
 * a newly composed .abc file seeded from the corpus statistics.
 */
fn main() {
	env_logger::init();

	if let Err(error) = run() {
		eprintln!("{error}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	// Read and analyze the corpus
	let lines = prompt_corpus("Enter an abc corpus filename: ")?;
	let mut model = ChainModel::new();
	abc::train_from_lines(&mut model, &lines);

	// Get output info from the user
	let (path, title) = prompt_output_file("What would you like to call your song? ")?;

	// Write the Markov-generated abc file
	let header = TuneHeader {
		title,
		..TuneHeader::default()
	};
	let mut rng = rand::rng();
	let tune = abc::compose_tune(
		&model,
		&header,
		&ScoreLayout::default(),
		&StartSeed::MostFrequent,
		&mut rng,
	);
	fs::write(&path, tune)?;

	conclusion(&path);
	Ok(())
}

/// Reads a line of text from the user through the console.
fn read_line(prompt: &str) -> io::Result<String> {
	print!("{prompt}");
	io::stdout().flush()?;

	let mut input = String::new();
	io::stdin().lock().read_line(&mut input)?;
	Ok(input.trim_end_matches(['\r', '\n']).to_owned())
}

/// Prompts for a corpus filename until a readable file is named.
fn prompt_corpus(prompt: &str) -> Result<Vec<String>, Box<dyn Error>> {
	loop {
		let filename = read_line(prompt)?;
		match read_file(&filename) {
			Ok(lines) => return Ok(lines),
			Err(_) => println!("Sorry, we couldn't find that file."),
		}
	}
}

/// Prompts for a song name and derives a fresh `.abc` output path from it.
///
/// Reserved pathname characters are stripped from the file name while the
/// raw name is kept as the tune title. If a file with the requested name
/// already exists, the user is reprompted.
fn prompt_output_file(prompt: &str) -> Result<(PathBuf, String), Box<dyn Error>> {
	loop {
		let song_name = read_line(prompt)?;
		let path = PathBuf::from(format!("{}.abc", sanitize_filename(&song_name)));
		if path.exists() {
			println!("Sorry, that song name is already taken.");
			continue;
		}
		return Ok((path, song_name));
	}
}

/// A conclusion message to the user.
fn conclusion(path: &Path) {
	let shown = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
	println!();
	println!("Congratulations! You have composed a new randomly generated abc file.");
	println!("Your song exists as an abc file at: {}", shown.display());
	println!(
		"To convert the song into a MIDI file and sheet music, please visit http://www.mandolintab.net/abcconverter.php"
	);
}
