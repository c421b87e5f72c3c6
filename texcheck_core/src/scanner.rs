//! The line scanner.
//!
//! A [`Scanner`] reads a document one physical line at a time through its
//! [`InputStack`] and runs every character rule over a working copy of the
//! line. The working copy may be overwritten (masked `\verb` arguments,
//! collapsed spaces, wiped command arguments) but diagnostics always quote
//! the untouched original and use its columns.
//!
//! Modes that LaTeX keeps globally (math, verbatim, italic correction,
//! preamble, `@` as a letter) live in [`ScanState`] and carry over from line
//! to line and across `\input` boundaries.

use std::io::BufRead;
use std::io::Write;

use tracing::debug;
use tracing::trace;

use crate::BracketTally;
use crate::ContextEntry;
use crate::ContextStack;
use crate::Diagnostic;
use crate::Emitter;
use crate::ErrorCode;
use crate::InputStack;
use crate::ItalicFlag;
use crate::ListName;
use crate::Opening;
use crate::QuoteStyle;
use crate::Settings;
use crate::TexCheckResult;
use crate::context::is_closing_bracket;
use crate::context::matching_bracket;
use crate::cursor::at;
use crate::cursor::ends_at;
use crate::cursor::find_from;
use crate::cursor::get_token;
use crate::cursor::in_set_or_end;
use crate::cursor::is_space;
use crate::cursor::is_tex_letter;
use crate::cursor::skip_ahead;
use crate::cursor::skip_back;
use crate::cursor::starts_at;

/// Punctuation that should not sit next to a quote or in front of an
/// interword space check.
pub(crate) const GENERAL_PUNCTUATION: &[u8] = b",;";

/// Punctuation that makes an italic correction unnecessary.
pub(crate) const SMALL_PUNCTUATION: &[u8] = b".,";

/// Italic correction tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItalicState {
	#[default]
	Off,
	On,
	/// `\/` has been seen since italics were switched on.
	Corrected,
}

/// Modes shared by every line and every included file of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
	/// Math nesting. Non-zero means math mode.
	pub math: u32,
	/// Terminator that ends the current verbatim region.
	pub verbatim: Option<String>,
	pub italic: ItalicState,
	/// Flag for the next `{`, set by an italic command such as `\emph`.
	pub pending_italic: ItalicFlag,
	/// `true` until `\begin{document}` is seen.
	pub in_header: bool,
	/// `true` between `\makeatletter` and `\makeatother`.
	pub at_letter: bool,
}

impl Default for ScanState {
	fn default() -> Self {
		Self {
			math: 0,
			verbatim: None,
			italic: ItalicState::Off,
			pending_italic: ItalicFlag::None,
			in_header: true,
			at_letter: false,
		}
	}
}

impl ScanState {
	pub fn in_math(&self) -> bool {
		self.math > 0
	}
}

/// The line currently being scanned.
#[derive(Debug, Clone, Default)]
pub(crate) struct CurrentLine {
	pub file: String,
	pub number: usize,
	/// The line as read, without its terminator.
	pub source: Vec<u8>,
	/// Working copy: the line plus `\n`, with comments cut off and masked
	/// regions overwritten.
	pub buf: Vec<u8>,
}

/// Single-pass checker for one LaTeX document and the files it includes.
#[derive(Debug)]
pub struct Scanner<'s, W: Write> {
	pub(crate) settings: &'s Settings,
	emitter: &'s mut Emitter<W>,
	pub(crate) input: InputStack,
	pub(crate) brackets: ContextStack,
	pub(crate) environments: ContextStack,
	tally: BracketTally,
	pub(crate) state: ScanState,
	pub(crate) line: CurrentLine,
	/// Name of the outermost document, used for end-of-input reports.
	document: Option<String>,
}

impl<'s, W: Write> Scanner<'s, W> {
	pub fn new(settings: &'s Settings, emitter: &'s mut Emitter<W>) -> Self {
		Self {
			settings,
			emitter,
			input: InputStack::new(settings.input_paths.clone(), settings.max_input_depth),
			brackets: ContextStack::new("bracket stack"),
			environments: ContextStack::new("environment stack"),
			tally: BracketTally::default(),
			state: ScanState::default(),
			line: CurrentLine::default(),
			document: None,
		}
	}

	/// Open `name` as the document to check.
	pub fn push_file(&mut self, name: &str) -> TexCheckResult<()> {
		self.input.push_file(name)?;
		if self.document.is_none() {
			self.document = self.input.current_name().map(str::to_string);
		}
		Ok(())
	}

	/// Check text from an already open reader.
	pub fn push_reader(&mut self, name: &str, reader: impl BufRead + 'static) -> TexCheckResult<()> {
		self.input.push_reader(name, reader)?;
		if self.document.is_none() {
			self.document = Some(name.to_string());
		}
		Ok(())
	}

	/// Scan every line of every pushed file, then report what was left open.
	/// Returns the number of lines read.
	pub fn run(&mut self) -> TexCheckResult<usize> {
		while let Some(line) = self.input.read_line() {
			self.scan_line(&line)?;
		}
		self.finish()?;

		Ok(self.input.lines_read())
	}

	pub fn state(&self) -> &ScanState {
		&self.state
	}

	/// The working copy of the last scanned line.
	pub fn working_line(&self) -> &[u8] {
		&self.line.buf
	}

	pub fn bracket_depth(&self) -> usize {
		self.brackets.depth()
	}

	pub fn environment_depth(&self) -> usize {
		self.environments.depth()
	}

	/// Run every rule over one physical line.
	pub fn scan_line(&mut self, text: &[u8]) -> TexCheckResult<()> {
		self.line = CurrentLine {
			file: self
				.input
				.current_name()
				.or(self.document.as_deref())
				.unwrap_or_default()
				.to_string(),
			number: self.input.current_line(),
			source: text.to_vec(),
			buf: text.to_vec(),
		};
		self.line.buf.push(b'\n');
		trace!(file = %self.line.file, line = self.line.number, "scanning line");

		self.strip_comment()?;

		let mut cursor = match self.skip_verbatim(0)? {
			Some(cursor) => cursor,
			None => self.line.buf.len() as isize,
		};

		while self.b(cursor) != 0 {
			cursor = self.scan_char(cursor)?;
		}

		if self.state.verbatim.is_none() {
			self.check_user_patterns()?;
		}

		Ok(())
	}

	/// Report everything still open at the end of input.
	pub fn finish(&mut self) -> TexCheckResult<()> {
		let open_brackets: Vec<_> = self.brackets.drain().collect();
		let open_environments: Vec<_> = self.environments.drain().collect();
		for entry in open_brackets.into_iter().chain(open_environments) {
			self.report_unclosed(entry)?;
		}

		if self.state.in_math() {
			self.report_summary(ErrorCode::MathModeStillOn, Vec::new())?;
		}

		let unbalanced: Vec<_> = self.tally.unbalanced().collect();
		for (open, close) in unbalanced {
			self.report_summary(
				ErrorCode::UnbalancedBracketCount,
				vec![char::from(open).to_string(), char::from(close).to_string()],
			)?;
		}

		Ok(())
	}

	/// Byte of the working copy at `index`, `0` outside it.
	pub(crate) fn b(&self, index: isize) -> u8 {
		at(&self.line.buf, index)
	}

	pub(crate) fn has(&self, list: ListName, word: &str) -> bool {
		self.settings.has(list, word)
	}

	/// Emit `code` for the current line.
	pub(crate) fn report(
		&mut self,
		code: ErrorCode,
		column: isize,
		length: usize,
		args: Vec<String>,
	) -> TexCheckResult<()> {
		let diagnostic = Diagnostic {
			code,
			file: self.line.file.clone(),
			line: self.line.number,
			column: usize::try_from(column).unwrap_or(0),
			length,
			args,
			source: self.line.source.clone(),
		};
		self.emitter
			.emit(diagnostic, self.state.in_math(), self.state.in_header)?;
		Ok(())
	}

	fn report_unclosed(&mut self, entry: ContextEntry) -> TexCheckResult<()> {
		let diagnostic = Diagnostic {
			code: ErrorCode::UnclosedDelimiter,
			file: entry.file,
			line: entry.line,
			column: entry.column,
			length: entry.length,
			args: vec![entry.token],
			source: entry.source,
		};
		self.emitter
			.emit(diagnostic, self.state.in_math(), self.state.in_header)?;
		Ok(())
	}

	/// Whole-document reports carry no source line.
	fn report_summary(&mut self, code: ErrorCode, args: Vec<String>) -> TexCheckResult<()> {
		let diagnostic = Diagnostic {
			code,
			file: self.document.clone().unwrap_or_default(),
			line: self.input.lines_read(),
			column: 0,
			length: 0,
			args,
			source: Vec::new(),
		};
		self.emitter
			.emit(diagnostic, self.state.in_math(), self.state.in_header)?;
		Ok(())
	}

	/// Overwrite `start..end` of the working copy with the fill character.
	pub(crate) fn fill(&mut self, start: isize, end: isize) {
		let len = self.line.buf.len() as isize;
		let start = start.clamp(0, len) as usize;
		let end = end.clamp(0, len) as usize;
		if start < end {
			self.line.buf[start..end].fill(self.settings.verbatim_fill);
		}
	}

	/// Cut the line at the first `%` not preceded by a backslash.
	fn strip_comment(&mut self) -> TexCheckResult<()> {
		let buf = &self.line.buf;
		let found = (0..buf.len()).find(|&i| buf[i] == b'%' && at(buf, i as isize - 1) != b'\\');

		if let Some(index) = found {
			self.report(ErrorCode::Comment, index as isize, 1, Vec::new())?;
			self.line.buf.truncate(index);
		}

		Ok(())
	}

	/// While in verbatim mode, look for the terminator from `cursor`.
	/// Returns where scanning continues, or `None` when the rest of the line
	/// is verbatim text.
	pub(crate) fn skip_verbatim(&mut self, cursor: isize) -> TexCheckResult<Option<isize>> {
		let Some(terminator) = self.state.verbatim.clone() else {
			return Ok(Some(cursor));
		};

		let from = usize::try_from(cursor).unwrap_or(0);
		let Some(found) = find_from(&self.line.buf, from, terminator.as_bytes()) else {
			return Ok(None);
		};

		debug!(line = self.line.number, %terminator, "leaving verbatim");
		self.state.verbatim = None;

		let after = skip_ahead(&self.line.buf, (found + terminator.len()) as isize, is_space);
		if self.b(after) != 0 {
			let rest = &self.line.buf[after as usize..];
			let length = rest.trim_ascii_end().len();
			self.report(ErrorCode::IgnoredText, after, length, Vec::new())?;
		}

		// Resume on the terminator itself so `\end{...}` closes its
		// environment.
		Ok(Some(found as isize))
	}

	/// Apply the rule for the byte at `pos` and return the next position.
	fn scan_char(&mut self, pos: isize) -> TexCheckResult<isize> {
		let raw = self.b(pos);
		let c = if is_space(raw) { b' ' } else { raw };
		let pre = self.b(pos - 1);
		let next = self.b(pos + 1);

		if !c.is_ascii() && starts_at(&self.line.buf, pos, self.settings.other_quote.as_bytes()) {
			let glyph = self.settings.other_quote.clone();
			let length = glyph.len();
			self.report(ErrorCode::UseOtherQuote, pos, length, vec![glyph])?;
			return Ok(pos + length as isize);
		}

		match c {
			b'~' => {
				if is_space(pre) {
					self.report(ErrorCode::DoubleSpace, pos - 1, 1, Vec::new())?;
				} else if is_space(next) {
					self.report(ErrorCode::DoubleSpace, pos + 1, 1, Vec::new())?;
				}
			}
			b'x' | b'X' => {
				self.check_times(pos)?;
				self.check_math_word(pos)?;
			}
			c if c.is_ascii_alphabetic() => self.check_math_word(pos)?,
			b' ' => self.check_spaces(pos)?,
			b'.' => {
				self.check_period(pos)?;
				self.check_sentence_end(pos, c)?;
				self.check_punctuation(pos, c)?;
			}
			b':' | b'?' | b'!' | b';' => {
				self.check_sentence_end(pos, c)?;
				self.check_punctuation(pos, c)?;
			}
			b',' => self.check_punctuation(pos, c)?,
			b'\'' | b'`' => return self.check_quotes(pos, c),
			b'"' => self.report(ErrorCode::UseQuoteLigature, pos, 1, Vec::new())?,
			b'_' | b'^' => self.check_script(pos)?,
			b'-' => self.check_dash(pos)?,
			b'\\' => return self.check_command(pos),
			b'(' => {
				self.check_open_paren(pos)?;
				self.handle_bracket(pos, c)?;
			}
			b')' => {
				if is_space(pre) {
					self.report(
						ErrorCode::NoSpaceAroundParenthesis,
						pos,
						1,
						vec!["in front of".into()],
					)?;
				}
				if next.is_ascii_alphabetic() {
					self.report(
						ErrorCode::SpaceAroundParenthesis,
						pos + 1,
						1,
						vec!["after".into()],
					)?;
				}
				self.handle_bracket(pos, c)?;
			}
			b'{' | b'}' | b'[' | b']' => self.handle_bracket(pos, c)?,
			b'$' => {
				if pre != b'\\' {
					let cursor = if next == b'$' { pos + 2 } else { pos + 1 };
					self.state.math ^= 1;
					return Ok(cursor);
				}
			}
			_ => {}
		}

		Ok(pos + 1)
	}

	/// `x` between two numbers.
	fn check_times(&mut self, pos: isize) -> TexCheckResult<()> {
		let filler = |c: u8| is_space(c) || b"{}$".contains(&c);
		let before = skip_back(&self.line.buf, pos - 1, filler);
		if !self.b(before).is_ascii_digit() {
			return Ok(());
		}

		let after = skip_ahead(&self.line.buf, pos + 1, filler);
		if self.b(after).is_ascii_digit() {
			self.report(ErrorCode::UseTimes, pos, 1, Vec::new())?;
		}

		Ok(())
	}

	/// A word in math mode that has an operator command (`sin`, `log`).
	fn check_math_word(&mut self, pos: isize) -> TexCheckResult<()> {
		let pre = self.b(pos - 1);
		if pre.is_ascii_alphabetic() || pre == b'\\' || !self.state.in_math() {
			return Ok(());
		}

		let end = skip_ahead(&self.line.buf, pos, |c| c.is_ascii_alphabetic());
		let word = String::from_utf8_lossy(&self.line.buf[pos as usize..end as usize]).into_owned();
		if self.has(ListName::MathRoman, &word) {
			let length = word.len();
			self.report(ErrorCode::MathOperatorWord, pos, length, vec![word])?;
		}

		Ok(())
	}

	/// Runs of interior whitespace. All but the outer two spaces are masked
	/// so the run is only reported once.
	fn check_spaces(&mut self, pos: isize) -> TexCheckResult<()> {
		let end = skip_ahead(&self.line.buf, pos + 1, is_space);
		if self.b(end) == 0 || self.b(pos - 1) == 0 || end - (pos + 1) <= 0 {
			return Ok(());
		}

		self.report(ErrorCode::MultipleSpaces, pos, (end - pos) as usize, Vec::new())?;
		self.fill(pos + 1, end - 1);

		Ok(())
	}

	/// Ellipsis spelled as `...` and periods that do not end a sentence.
	fn check_period(&mut self, pos: isize) -> TexCheckResult<()> {
		let pre = self.b(pos - 1);

		if self.b(pos + 1) == b'.' && self.b(pos + 2) == b'.' {
			let level = self.check_dots(pos - 1, pos + 3);
			self.report(ErrorCode::Ellipsis, pos, 3, vec![level.command().into()])?;
		}

		let after = skip_ahead(&self.line.buf, pos + 1, |c| {
			GENERAL_PUNCTUATION.contains(&c)
		});
		if !is_space(self.b(after)) || pre.is_ascii_uppercase() || pre == b'@' || pre == b'.' {
			return Ok(());
		}

		let word = skip_ahead(&self.line.buf, after, is_space);
		if self.b(word).is_ascii_lowercase() {
			self.report(ErrorCode::InterwordSpacing, pos + 1, 1, Vec::new())?;
		} else {
			self.check_abbreviations(pos)?;
		}

		Ok(())
	}

	/// Whether the text ending at the period `pos` is a known abbreviation.
	/// Every suffix up to the longest abbreviation is tried.
	fn check_abbreviations(&mut self, pos: isize) -> TexCheckResult<()> {
		if !self
			.emitter
			.registry()
			.is_enabled(ErrorCode::InterwordSpacing)
		{
			return Ok(());
		}

		let max_len = self.settings.lists.abbreviation_max_len() as isize;
		for length in 1..=max_len + 1 {
			let start = pos + 1 - length;
			if start < 0 {
				break;
			}

			let before = self.b(start - 1);
			let found = std::str::from_utf8(&self.line.buf[start as usize..=pos as usize])
				.is_ok_and(|suffix| self.settings.lists.is_abbreviation(suffix));
			if !before.is_ascii_alphabetic() && found {
				self.report(ErrorCode::InterwordSpacing, pos + 1, 1, Vec::new())?;
			}
			if before == 0 {
				break;
			}
		}

		Ok(())
	}

	/// Two capitals before sentence punctuation, e.g. `the USA. Then`.
	fn check_sentence_end(&mut self, pos: isize, c: u8) -> TexCheckResult<()> {
		if is_space(self.b(pos + 1))
			&& self.b(pos - 1).is_ascii_uppercase()
			&& (self.b(pos - 2).is_ascii_uppercase() || c != b'.')
		{
			self.report(ErrorCode::IntersentenceSpacing, pos, 1, Vec::new())?;
		}

		Ok(())
	}

	/// Spaces in front of punctuation and punctuation on the wrong side of a
	/// math boundary.
	fn check_punctuation(&mut self, pos: isize, c: u8) -> TexCheckResult<()> {
		let pre = self.b(pos - 1);
		let next = self.b(pos + 1);

		if is_space(pre) && !(next.is_ascii_digit() && (c == b'.' || c == b',')) {
			self.report(ErrorCode::SpaceBeforePunctuation, pos - 1, 1, Vec::new())?;
		}

		if self.state.in_math()
			&& ((next == b'$' && self.b(pos + 2) != b'$')
				|| starts_at(&self.line.buf, pos + 1, b"\\)"))
		{
			self.report(
				ErrorCode::PunctuationMath,
				pos,
				1,
				vec!["outside inner".into()],
			)?;
		}

		if !self.state.in_math()
			&& ((pre == b'$' && self.b(pos - 2) == b'$')
				|| ends_at(&self.line.buf, pos - 1, b"\\]"))
		{
			self.report(
				ErrorCode::PunctuationMath,
				pos,
				1,
				vec!["inside display".into()],
			)?;
		}

		Ok(())
	}

	/// Quote characters. Returns the position after the quote run.
	fn check_quotes(&mut self, pos: isize, c: u8) -> TexCheckResult<isize> {
		let settings = self.settings;
		let pre = self.b(pos - 1);
		let glyph = settings.other_quote.as_bytes();

		if self.b(pos + 1) == c && self.b(pos + 2) == c {
			let quote = char::from(c).to_string();
			self.report(ErrorCode::TripleQuote, pos, 3, vec![quote; 6])?;
		}

		let other = if c == b'\'' { b'`' } else { b'\'' };
		let mut end = skip_ahead(&self.line.buf, pos + 1, |b| b == c);
		let mixing = self.b(end) == other
			|| self.b(end) == b'"'
			|| starts_at(&self.line.buf, end, glyph);

		loop {
			if b"`'\"".contains(&self.b(end)) && self.b(end) != 0 {
				end += 1;
			} else if starts_at(&self.line.buf, end, glyph) {
				end += glyph.len() as isize;
			} else {
				break;
			}
		}

		let span = (end - pos) as usize;
		if mixing {
			self.report(ErrorCode::MixedQuotes, pos, span, Vec::new())?;
		}

		let after = self.b(end);
		if c == b'\'' {
			if after.is_ascii_alphabetic()
				&& (in_set_or_end(pre, GENERAL_PUNCTUATION) || is_space(pre))
			{
				self.report(ErrorCode::BeginQuote, pos, span, Vec::new())?;
			}

			// A single quoted word is exempt from the style check.
			let word_start = skip_back(&self.line.buf, pos - 1, |b| {
				b.is_ascii_alphanumeric() || GENERAL_PUNCTUATION.contains(&b)
			});
			if self.b(word_start) != b'`' {
				let style = settings.quote_style;
				if pre != 0 && style == QuoteStyle::Logical && self.is_punctuation(pos - 1) {
					self.report(ErrorCode::QuoteStyle, pos - 1, 1, vec!["in front of".into()])?;
				}
				if after != 0 && style == QuoteStyle::Traditional && self.is_punctuation(end) {
					self.report(ErrorCode::QuoteStyle, end, 1, vec!["after".into()])?;
				}
			}
		} else if pre.is_ascii_alphabetic()
			&& (in_set_or_end(after, GENERAL_PUNCTUATION) || is_space(after))
		{
			self.report(ErrorCode::EndQuote, pos, span, Vec::new())?;
		}

		Ok(end)
	}

	/// Unescaped general punctuation.
	fn is_punctuation(&self, index: isize) -> bool {
		GENERAL_PUNCTUATION.contains(&self.b(index)) && self.b(index - 1) != b'\\'
	}

	/// Sub- and superscripts.
	fn check_script(&mut self, pos: isize) -> TexCheckResult<()> {
		if self.b(pos - 1) == b'\\' {
			return Ok(());
		}

		let base = skip_back(&self.line.buf, pos - 1, is_space);
		match self.b(base) {
			b'}' => {
				if self.b(pos - 2) == b'\\' {
					self.report(ErrorCode::EncloseParenthesis, pos - 2, 2, Vec::new())?;
				}
			}
			b')' | b']' => {
				self.report(ErrorCode::EncloseParenthesis, pos - 1, 1, Vec::new())?;
			}
			_ => {}
		}

		let start = skip_ahead(&self.line.buf, pos + 1, is_space);
		let first = self.b(start);
		let end = if first.is_ascii_alphabetic() {
			skip_ahead(&self.line.buf, start, |b| b.is_ascii_alphabetic())
		} else if first.is_ascii_digit() {
			skip_ahead(&self.line.buf, start, |b| b.is_ascii_digit())
		} else {
			return Ok(());
		};

		if end - start > 1 {
			self.report(ErrorCode::BraceSubscript, start, (end - start) as usize, Vec::new())?;
		}

		Ok(())
	}

	/// Dash length against the neighbouring characters.
	fn check_dash(&mut self, pos: isize) -> TexCheckResult<()> {
		let end = skip_ahead(&self.line.buf, pos + 1, |b| b == b'-');
		let count = (end - pos) as usize;

		if self.state.in_math() {
			if count > 1 {
				self.report(ErrorCode::WrongDashLength, pos, count, Vec::new())?;
			}
			return Ok(());
		}

		let pre = self.b(pos - 1);
		let post = self.b(end);
		let mut list = None;
		if is_space(pre) && is_space(post) {
			list = Some(ListName::WordDash);
		}
		if pre.is_ascii_digit() && post.is_ascii_digit() {
			list = Some(ListName::NumberDash);
		}
		if pre.is_ascii_alphabetic() && post.is_ascii_alphabetic() {
			list = Some(ListName::HyphenDash);
		}

		if let Some(list) = list {
			if !self.settings.lists.allows_dash(list, count) {
				self.report(ErrorCode::WrongDashLength, pos, count, Vec::new())?;
			}
		}

		Ok(())
	}

	/// A command name. Returns where scanning continues.
	fn check_command(&mut self, pos: isize) -> TexCheckResult<isize> {
		let end = get_token(&self.line.buf, pos, self.state.at_letter).unwrap_or(pos + 1);
		let command =
			String::from_utf8_lossy(&self.line.buf[pos as usize..end as usize]).into_owned();
		let pre = self.b(pos - 1);

		if is_space(pre) {
			if self.has(ListName::Linker, &command) {
				self.report(ErrorCode::NonBreakingSpace, pos - 1, 1, Vec::new())?;
			}
			if self.has(ListName::PostLink, &command) {
				self.report(ErrorCode::SpaceBeforeReference, pos - 1, 1, Vec::new())?;
			}
		}

		let after = self.b(end);
		if is_space(after)
			&& !self.state.in_math()
			&& !self.has(ListName::Silent, &command)
			&& command.len() != 2
		{
			self.report(ErrorCode::SpaceAfterCommand, end, 1, Vec::new())?;
		} else if after == b'\\'
			&& !self.b(end + 1).is_ascii_alphabetic()
			&& !is_space(self.b(end + 1))
		{
			self.report(ErrorCode::UnintendedCommand, end, 2, Vec::new())?;
		}

		self.perform_command(pos, end, &command)?;

		Ok(self
			.skip_verbatim(end)?
			.unwrap_or(self.line.buf.len() as isize))
	}

	/// `(` glued to the preceding word.
	fn check_open_paren(&mut self, pos: isize) -> TexCheckResult<()> {
		let pre = self.b(pos - 1);

		if pre != 0
			&& !is_space(pre)
			&& !pre.is_ascii_digit()
			&& !b"([{`~".contains(&pre)
			&& self.b(pos - 2) != b'\\'
		{
			let at_letter = self.state.at_letter;
			let word = skip_back(&self.line.buf, pos - 1, |b| is_tex_letter(b, at_letter));
			if self.b(word) != b'\\' {
				self.report(
					ErrorCode::SpaceAroundParenthesis,
					pos,
					1,
					vec!["in front of".into()],
				)?;
			}
		}

		if is_space(self.b(pos + 1)) {
			self.report(
				ErrorCode::NoSpaceAroundParenthesis,
				pos + 1,
				1,
				vec!["after".into()],
			)?;
		}

		Ok(())
	}

	/// Push openers, pop and match closers.
	fn handle_bracket(&mut self, pos: isize, c: u8) -> TexCheckResult<()> {
		self.tally.add(c);

		if !is_closing_bracket(c) {
			let flags = if c == b'{' {
				match std::mem::take(&mut self.state.pending_italic) {
					ItalicFlag::None if self.state.italic == ItalicState::Off => ItalicFlag::WasOff,
					ItalicFlag::None => ItalicFlag::WasOn,
					pending => pending,
				}
			} else {
				ItalicFlag::None
			};

			let token = char::from(c).to_string();
			let opening = opening_at(&self.line, pos, 1);
			let entry = self.brackets.open(&token, &opening)?;
			entry.flags = flags;
			return Ok(());
		}

		let expected = match self.brackets.close() {
			Some(entry) => {
				match entry.flags {
					ItalicFlag::WasOff => {
						if self.state.italic == ItalicState::On {
							let next = skip_ahead(&self.line.buf, pos + 1, |b| b == b'}');
							if !in_set_or_end(self.b(next), SMALL_PUNCTUATION) {
								self.report(ErrorCode::MissingItalicCorrection, pos, 1, Vec::new())?;
							}
						}
						self.state.italic = ItalicState::Off;
					}
					ItalicFlag::WasOn => self.state.italic = ItalicState::On,
					ItalicFlag::None => {}
				}
				entry.token.bytes().next().and_then(matching_bracket)
			}
			None => None,
		};

		match expected {
			Some(expected) if expected == c => {}
			Some(expected) => {
				self.report(
					ErrorCode::ExpectedDelimiter,
					pos,
					1,
					vec![char::from(expected).to_string(), char::from(c).to_string()],
				)?;
			}
			None => {
				self.report(ErrorCode::SoloDelimiter, pos, 1, vec![char::from(c).to_string()])?;
			}
		}

		Ok(())
	}

	/// Search the masked line for user-defined patterns, overlapping matches
	/// included.
	fn check_user_patterns(&mut self) -> TexCheckResult<()> {
		if !self.emitter.registry().is_enabled(ErrorCode::UserPattern) {
			return Ok(());
		}

		let lowered = self.line.buf.to_ascii_lowercase();
		let mut found = Vec::new();
		let searches = [
			(ListName::UserWarn, &self.line.buf),
			(ListName::UserWarnCase, &lowered),
		];
		for (list, haystack) in searches {
			for pattern in self.settings.lists.get(list).words() {
				let mut from = 0;
				while let Some(index) = find_from(haystack, from, pattern.as_bytes()) {
					found.push((index, pattern.len()));
					from = index + 1;
				}
			}
		}

		for (index, length) in found {
			self.report(ErrorCode::UserPattern, index as isize, length, Vec::new())?;
		}

		Ok(())
	}
}

/// Location of a construct opened on `line` at `column`.
pub(crate) fn opening_at(line: &CurrentLine, column: isize, length: usize) -> Opening<'_> {
	Opening {
		file: &line.file,
		line: line.number,
		column: usize::try_from(column).unwrap_or(0),
		length,
		source: &line.source,
	}
}
