use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Characters rejected by common filesystems in file names.
const RESERVED_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '|', '?', '*', '\\'];

/// Strips reserved pathname characters from a user-supplied name.
///
/// Examples:
/// - `"my:song?"` → `"mysong"`
/// - `"plain name"` → `"plain name"`
pub fn sanitize_filename(name: &str) -> String {
	name.chars()
		.filter(|c| !RESERVED_NAME_CHARS.contains(c))
		.collect()
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths). Only files directly contained in
/// the directory are listed; subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			if path.extension() == Some(std::ffi::OsStr::new(extension)) {
				if let Some(name) = path.file_name() {
					files.push(name.to_string_lossy().to_string());
				}
			}
		}
	}

	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sanitize_strips_reserved_characters() {
		assert_eq!(sanitize_filename("my<so:ng>?*"), "mysong");
		assert_eq!(sanitize_filename(r#"a/b\c|d"e"#), "abcde");
		assert_eq!(sanitize_filename("plain name"), "plain name");
	}
}
