use std::fmt;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::TexCheckError;
use crate::TexCheckResult;
use crate::stack::Stack;

/// Default limit on `\input` nesting.
pub const DEFAULT_MAX_INPUT_DEPTH: usize = 32;

/// One file being read.
struct FileFrame {
	name: String,
	reader: Box<dyn BufRead>,
	line: usize,
	/// Directory of the file, searched first for nested inputs.
	dir: Option<PathBuf>,
}

impl fmt::Debug for FileFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FileFrame")
			.field("name", &self.name)
			.field("line", &self.line)
			.finish_non_exhaustive()
	}
}

/// The stack of files opened through `\input` and `\include`.
///
/// The top frame is the file currently being read. When it runs out of lines
/// it is popped and reading falls through to its parent, so callers only see
/// one continuous stream of lines.
#[derive(Debug)]
pub struct InputStack {
	frames: Stack<FileFrame>,
	search_paths: Vec<PathBuf>,
	max_depth: usize,
	lines_read: usize,
}

impl Default for InputStack {
	fn default() -> Self {
		Self::new(Vec::new(), DEFAULT_MAX_INPUT_DEPTH)
	}
}

impl InputStack {
	pub fn new(search_paths: Vec<PathBuf>, max_depth: usize) -> Self {
		Self {
			frames: Stack::new("input stack"),
			search_paths,
			max_depth,
			lines_read: 0,
		}
	}

	/// Resolve `name` and push it as the new current file.
	///
	/// Relative names are looked up next to the current file, then in each
	/// configured search path, then relative to the working directory. A name
	/// without an extension is also tried with `.tex` appended.
	pub fn push_file(&mut self, name: &str) -> TexCheckResult<()> {
		let name = name.trim();
		if name.is_empty() {
			return Err(TexCheckError::FileNotFound {
				name: name.to_string(),
			});
		}

		if self.frames.used() >= self.max_depth {
			return Err(TexCheckError::InputDepthExceeded {
				name: name.to_string(),
				depth: self.max_depth,
			});
		}

		let Some((path, file)) = self.open_candidate(name) else {
			return Err(TexCheckError::FileNotFound {
				name: name.to_string(),
			});
		};

		debug!(file = %path.display(), depth = self.frames.used() + 1, "entering input file");
		self.frames.push(FileFrame {
			name: path.display().to_string(),
			reader: Box::new(BufReader::new(file)),
			line: 0,
			dir: path.parent().map(Path::to_path_buf),
		})
	}

	/// Push an already open reader, e.g. standard input or an in-memory
	/// document.
	pub fn push_reader(&mut self, name: &str, reader: impl BufRead + 'static) -> TexCheckResult<()> {
		self.frames.push(FileFrame {
			name: name.to_string(),
			reader: Box::new(reader),
			line: 0,
			dir: None,
		})
	}

	fn open_candidate(&self, name: &str) -> Option<(PathBuf, File)> {
		let relative = Path::new(name);
		let current_dir = self.frames.top().and_then(|frame| frame.dir.clone());
		let bases = current_dir
			.into_iter()
			.chain(self.search_paths.iter().cloned())
			.chain(std::iter::once(PathBuf::new()));

		for base in bases {
			let path = base.join(relative);
			let mut candidates = vec![path.clone()];
			if path.extension().is_none() {
				candidates.push(path.with_extension("tex"));
			}

			for candidate in candidates {
				if !candidate.is_file() {
					continue;
				}
				if let Ok(file) = File::open(&candidate) {
					return Some((candidate, file));
				}
			}
		}

		None
	}

	/// Read the next line, without its line terminator. Exhausted or
	/// unreadable files are popped transparently. Returns `None` once every
	/// frame is exhausted.
	pub fn read_line(&mut self) -> Option<Vec<u8>> {
		loop {
			let frame = self.frames.top_mut()?;
			let mut buffer = Vec::new();

			match frame.reader.read_until(b'\n', &mut buffer) {
				Ok(0) => {
					debug!(file = %frame.name, lines = frame.line, "leaving input file");
					self.frames.pop();
				}
				Ok(_) => {
					frame.line += 1;
					self.lines_read += 1;
					if buffer.last() == Some(&b'\n') {
						buffer.pop();
					}
					if buffer.last() == Some(&b'\r') {
						buffer.pop();
					}
					return Some(buffer);
				}
				Err(error) => {
					warn!(file = %frame.name, %error, "stopped reading file");
					self.frames.pop();
				}
			}
		}
	}

	/// Name of the file currently being read.
	pub fn current_name(&self) -> Option<&str> {
		self.frames.top().map(|frame| frame.name.as_str())
	}

	/// Line number of the last line read from the current file.
	pub fn current_line(&self) -> usize {
		self.frames.top().map_or(0, |frame| frame.line)
	}

	/// Number of open files.
	pub fn depth(&self) -> usize {
		self.frames.used()
	}

	/// Total number of lines read across all files.
	pub fn lines_read(&self) -> usize {
		self.lines_read
	}
}
