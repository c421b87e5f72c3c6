use crate::TexCheckResult;
use crate::stack::Stack;

/// Italic state recorded on an opening `{` so the matching `}` can restore
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItalicFlag {
	#[default]
	None,
	/// Italics were off when the group opened.
	WasOff,
	/// Italics were on when the group opened.
	WasOn,
}

/// One currently open nesting construct: a bracket character or an
/// environment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
	/// The opening token (`(`, `{`, or the environment name).
	pub token: String,
	/// File the construct was opened in.
	pub file: String,
	/// 1-indexed line number.
	pub line: usize,
	/// 0-indexed byte column of the opening token.
	pub column: usize,
	/// Length of the opening token for underlining.
	pub length: usize,
	pub flags: ItalicFlag,
	/// Copy of the source line the construct was opened on.
	pub source: Vec<u8>,
}

/// Location data for a construct being opened.
#[derive(Debug, Clone)]
pub struct Opening<'a> {
	pub file: &'a str,
	pub line: usize,
	pub column: usize,
	pub length: usize,
	pub source: &'a [u8],
}

/// A LIFO of open brackets or environments.
#[derive(Debug, Clone)]
pub struct ContextStack {
	entries: Stack<ContextEntry>,
}

impl ContextStack {
	pub fn new(what: &'static str) -> Self {
		Self {
			entries: Stack::new(what),
		}
	}

	/// Push a new entry and hand it back so the caller can set its flags.
	pub fn open(&mut self, token: &str, at: &Opening<'_>) -> TexCheckResult<&mut ContextEntry> {
		self.entries.push(ContextEntry {
			token: token.to_string(),
			file: at.file.to_string(),
			line: at.line,
			column: at.column,
			length: at.length,
			flags: ItalicFlag::None,
			source: at.source.to_vec(),
		})?;

		let items = self.entries.items_mut();
		let index = items.len() - 1;
		Ok(&mut items[index])
	}

	/// Pop the innermost entry for the caller to validate.
	pub fn close(&mut self) -> Option<ContextEntry> {
		self.entries.pop()
	}

	/// Whether the innermost entry was opened with `candidate`, without
	/// popping it. The scanner validates through [`ContextStack::close`]
	/// instead; this is for callers inspecting the nesting.
	pub fn peek_matches(&self, candidate: &str) -> bool {
		self.entries
			.top()
			.is_some_and(|entry| entry.token == candidate)
	}

	pub fn top(&self) -> Option<&ContextEntry> {
		self.entries.top()
	}

	pub fn depth(&self) -> usize {
		self.entries.used()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Pop every remaining entry, innermost first.
	pub fn drain(&mut self) -> impl Iterator<Item = ContextEntry> + '_ {
		std::iter::from_fn(move || self.entries.pop())
	}
}

/// Bracket pairs in the order `open, close`.
pub const BRACKET_ORDER: [u8; 6] = *b"()[]{}";

/// The closing bracket for an opener, or the opener for a closer.
pub fn matching_bracket(c: u8) -> Option<u8> {
	let index = BRACKET_ORDER.iter().position(|&b| b == c)?;
	Some(BRACKET_ORDER[index ^ 1])
}

/// Whether `c` is one of the closing brackets.
pub fn is_closing_bracket(c: u8) -> bool {
	BRACKET_ORDER
		.iter()
		.position(|&b| b == c)
		.is_some_and(|index| index & 1 == 1)
}

/// Running count of every bracket character seen during a run.
#[derive(Debug, Clone, Default)]
pub struct BracketTally {
	counts: [usize; 6],
}

impl BracketTally {
	pub fn add(&mut self, c: u8) {
		if let Some(index) = BRACKET_ORDER.iter().position(|&b| b == c) {
			self.counts[index] += 1;
		}
	}

	pub fn count(&self, c: u8) -> usize {
		BRACKET_ORDER
			.iter()
			.position(|&b| b == c)
			.map_or(0, |index| self.counts[index])
	}

	/// Pairs whose opening and closing counts differ.
	pub fn unbalanced(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
		BRACKET_ORDER
			.chunks(2)
			.zip(self.counts.chunks(2))
			.filter(|(_, counts)| counts[0] != counts[1])
			.map(|(pair, _)| (pair[0], pair[1]))
	}
}
