use logos::Logos;

use crate::Diagnostic;

/// Default output template: `file:line:column:Severity number: message`.
pub const DEFAULT_FORMAT: &str = "%f:%l:%c:%k %n: %m\n";

/// Templates selected by `--verbosity`.
pub const VERBOSITY_FORMATS: [&str; 4] = [
	DEFAULT_FORMAT,
	"%k %n in %f line %l: %m\n%r%s%t\n%u\n",
	"%k %n in %f line %l: %m\n%r%i%s%I%t\n\n",
	"%f:%l:%c:%d:%n:%m\n",
];

const INVERSE_ON: &str = "\x1b[7m";
const INVERSE_OFF: &str = "\x1b[27m";

#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("%b")]
	Delimiter,
	#[token("%c")]
	Column,
	#[token("%d")]
	Length,
	#[token("%f")]
	File,
	#[token("%i")]
	InverseOn,
	#[token("%I")]
	InverseOff,
	#[token("%k")]
	Kind,
	#[token("%l")]
	Line,
	#[token("%m")]
	Message,
	#[token("%n")]
	Number,
	#[token("%u")]
	Underline,
	#[token("%r")]
	Before,
	#[token("%s")]
	At,
	#[token("%t")]
	After,
	#[token("%%")]
	Percent,
	/// `%` followed by a character with no placeholder meaning.
	#[regex(r"%[^bcdfiIklmnurst%]")]
	Escaped,
	#[regex(r"[^%]+")]
	Text,
}

/// One placeholder of an output template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
	Delimiter,
	Column,
	Length,
	File,
	InverseOn,
	InverseOff,
	Kind,
	Line,
	Message,
	Number,
	Underline,
	Before,
	At,
	After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPiece {
	Literal(String),
	Field(Field),
}

/// A parsed output template.
///
/// `%` introduces a placeholder. `%%` prints a percent sign and a `%`
/// followed by any other character prints that character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
	pieces: Vec<FormatPiece>,
	delimiter: String,
}

impl Default for OutputFormat {
	fn default() -> Self {
		Self::parse(DEFAULT_FORMAT)
	}
}

impl OutputFormat {
	pub fn parse(template: &str) -> Self {
		let mut pieces: Vec<FormatPiece> = Vec::new();
		let mut lexer = RawToken::lexer(template);

		while let Some(result) = lexer.next() {
			let field = match result {
				Ok(RawToken::Delimiter) => Field::Delimiter,
				Ok(RawToken::Column) => Field::Column,
				Ok(RawToken::Length) => Field::Length,
				Ok(RawToken::File) => Field::File,
				Ok(RawToken::InverseOn) => Field::InverseOn,
				Ok(RawToken::InverseOff) => Field::InverseOff,
				Ok(RawToken::Kind) => Field::Kind,
				Ok(RawToken::Line) => Field::Line,
				Ok(RawToken::Message) => Field::Message,
				Ok(RawToken::Number) => Field::Number,
				Ok(RawToken::Underline) => Field::Underline,
				Ok(RawToken::Before) => Field::Before,
				Ok(RawToken::At) => Field::At,
				Ok(RawToken::After) => Field::After,
				Ok(RawToken::Percent) => {
					push_literal(&mut pieces, "%");
					continue;
				}
				Ok(RawToken::Text) => {
					push_literal(&mut pieces, lexer.slice());
					continue;
				}
				Ok(RawToken::Escaped) => {
					push_literal(&mut pieces, &lexer.slice()[1..]);
					continue;
				}
				// A trailing `%` prints nothing.
				Err(()) => continue,
			};
			pieces.push(FormatPiece::Field(field));
		}

		Self {
			pieces,
			delimiter: String::new(),
		}
	}

	/// Preset template for a verbosity level. Out of range levels use the
	/// most verbose preset below them.
	pub fn for_verbosity(level: u8) -> Self {
		let index = usize::from(level).min(VERBOSITY_FORMATS.len() - 1);
		Self::parse(VERBOSITY_FORMATS[index])
	}

	/// Text substituted for `%b`.
	#[must_use]
	pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
		self.delimiter = delimiter.into();
		self
	}

	pub fn pieces(&self) -> &[FormatPiece] {
		&self.pieces
	}

	pub fn render(&self, diagnostic: &Diagnostic) -> String {
		let mut output = String::new();
		let (before, at, after) = diagnostic.split_source();

		for piece in &self.pieces {
			match piece {
				FormatPiece::Literal(text) => output.push_str(text),
				FormatPiece::Field(field) => {
					match field {
						Field::Delimiter => output.push_str(&self.delimiter),
						Field::Column => output.push_str(&(diagnostic.column + 1).to_string()),
						Field::Length => output.push_str(&diagnostic.length.to_string()),
						Field::File => output.push_str(&diagnostic.file),
						Field::InverseOn => output.push_str(INVERSE_ON),
						Field::InverseOff => output.push_str(INVERSE_OFF),
						Field::Kind => output.push_str(&diagnostic.severity().to_string()),
						Field::Line => output.push_str(&diagnostic.line.to_string()),
						Field::Message => output.push_str(&diagnostic.message()),
						Field::Number => output.push_str(&diagnostic.code.to_string()),
						Field::Underline => output.push_str(&diagnostic.underline()),
						Field::Before => output.push_str(&before),
						Field::At => output.push_str(&at),
						Field::After => output.push_str(&after),
					}
				}
			}
		}

		output
	}
}

fn push_literal(pieces: &mut Vec<FormatPiece>, text: &str) {
	if text.is_empty() {
		return;
	}

	if let Some(FormatPiece::Literal(last)) = pieces.last_mut() {
		last.push_str(text);
	} else {
		pieces.push(FormatPiece::Literal(text.to_string()));
	}
}
