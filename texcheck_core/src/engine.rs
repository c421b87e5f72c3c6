use std::io::BufRead;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::Emitter;
use crate::Scanner;
use crate::Settings;
use crate::TexCheckResult;

/// Outcome of checking one top-level document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
	/// Name the document was opened under.
	pub document: String,
	/// Lines read, including those of every file it pulled in through
	/// `\input` and `\include`.
	pub lines: usize,
}

/// Check the document at `path` and every file it includes.
///
/// Each call gets a fresh scanner, so modes and open brackets never leak from
/// one document into the next. Diagnostics and counters accumulate in
/// `emitter`.
pub fn check_file<W: Write>(
	path: &Path,
	settings: &Settings,
	emitter: &mut Emitter<W>,
) -> TexCheckResult<FileReport> {
	let name = path.to_string_lossy();
	let mut scanner = Scanner::new(settings, emitter);
	scanner.push_file(&name)?;
	finish(&name, scanner)
}

/// Check an in-memory document. `name` only labels diagnostics; relative
/// `\input` paths resolve against the search paths and the working
/// directory.
pub fn check_source<W: Write>(
	name: &str,
	text: &str,
	settings: &Settings,
	emitter: &mut Emitter<W>,
) -> TexCheckResult<FileReport> {
	check_reader(name, Cursor::new(text.as_bytes().to_vec()), settings, emitter)
}

/// Check a document from an open reader such as standard input.
pub fn check_reader<W: Write>(
	name: &str,
	reader: impl BufRead + 'static,
	settings: &Settings,
	emitter: &mut Emitter<W>,
) -> TexCheckResult<FileReport> {
	let mut scanner = Scanner::new(settings, emitter);
	scanner.push_reader(name, reader)?;
	finish(name, scanner)
}

fn finish<W: Write>(name: &str, mut scanner: Scanner<'_, W>) -> TexCheckResult<FileReport> {
	let lines = scanner.run()?;
	debug!(document = name, lines, "checked document");

	Ok(FileReport {
		document: name.to_string(),
		lines,
	})
}
