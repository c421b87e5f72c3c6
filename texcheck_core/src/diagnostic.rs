use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::TexCheckError;
use crate::TexCheckResult;

/// How serious a diagnostic is. Decides which counter an emission bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Severity {
	Warning,
	Error,
	Message,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Warning => "Warning",
			Self::Error => "Error",
			Self::Message => "Message",
		};
		f.write_str(label)
	}
}

/// Where a diagnostic is allowed to fire. `None` means either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
	/// `Some(true)`: only in math mode, `Some(false)`: only outside it.
	pub math: Option<bool>,
	/// `Some(true)`: only in the preamble, `Some(false)`: only after
	/// `\begin{document}`.
	pub header: Option<bool>,
}

impl Context {
	pub const ANY: Self = Self {
		math: None,
		header: None,
	};
	pub const IN_MATH: Self = Self {
		math: Some(true),
		header: None,
	};
	pub const OUT_MATH: Self = Self {
		math: Some(false),
		header: None,
	};

	/// Whether the current scanner modes satisfy this requirement.
	pub fn allows(self, in_math: bool, in_header: bool) -> bool {
		self.math.is_none_or(|wanted| wanted == in_math)
			&& self.header.is_none_or(|wanted| wanted == in_header)
	}
}

macro_rules! error_codes {
	($($variant:ident = $number:literal, $severity:ident, $context:ident, $enabled:literal, $template:literal;)+) => {
		/// Every diagnostic the scanner can produce. The discriminant is the
		/// number shown to users and accepted by `--warn` / `--nowarn`.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		#[repr(u16)]
		#[non_exhaustive]
		pub enum ErrorCode {
			$($variant = $number,)+
		}

		/// The static message catalogue, indexed by `number - 1`.
		pub static MESSAGES: &[MessageSpec] = &[
			$(MessageSpec {
				code: ErrorCode::$variant,
				severity: Severity::$severity,
				context: Context::$context,
				enabled: $enabled,
				template: $template,
			},)+
		];
	};
}

error_codes! {
	SpaceAfterCommand = 1, Warning, OUT_MATH, true, "Command terminated with space.";
	NonBreakingSpace = 2, Warning, OUT_MATH, true, "Non-breaking space (`~') should have been used.";
	EncloseParenthesis = 3, Warning, IN_MATH, true, "You should enclose the previous parenthesis with `{}'.";
	ItalicCorrectionNotItalic = 4, Warning, ANY, true, "Italic correction (`\\/') found in non-italic buffer.";
	ItalicCorrectionDuplicate = 5, Warning, ANY, true, "Italic correction (`\\/') found more than once.";
	MissingItalicCorrection = 6, Warning, ANY, true, "No italic correction (`\\/') found.";
	AccentNeedsDotless = 7, Warning, ANY, true, "Accent command `%s' needs use of `\\%s%s'.";
	WrongDashLength = 8, Warning, ANY, true, "Wrong length of dash may have been used.";
	ExpectedDelimiter = 9, Error, ANY, true, "`%s' expected, found `%s'.";
	SoloDelimiter = 10, Error, ANY, true, "Solo `%s' found.";
	Ellipsis = 11, Warning, ANY, true, "You should use %s to achieve an ellipsis.";
	InterwordSpacing = 12, Warning, OUT_MATH, true, "Interword spacing (`\\ ') should perhaps be used.";
	IntersentenceSpacing = 13, Warning, OUT_MATH, true, "Intersentence spacing (`\\@') should perhaps be used.";
	MissingArgument = 14, Error, ANY, true, "Could not find argument for command.";
	UnclosedDelimiter = 15, Error, ANY, true, "No match found for `%s'.";
	MathModeStillOn = 16, Error, ANY, true, "Mathmode still on at end of LaTeX file.";
	UnbalancedBracketCount = 17, Warning, ANY, true, "Number of `%s' doesn't match the number of `%s'!";
	UseQuoteLigature = 18, Warning, OUT_MATH, true, "Use either `` or '' as an alternative to `\"'.";
	UseOtherQuote = 19, Warning, ANY, true, "Use \"'\" (ASCII 39) instead of \"%s\".";
	UserPattern = 20, Warning, ANY, true, "User-specified pattern found.";
	UnintendedCommand = 21, Warning, ANY, true, "This command might not be intended.";
	Comment = 22, Message, ANY, false, "Comment displayed.";
	TripleQuote = 23, Warning, OUT_MATH, true, "Either %s\\,%s%s or %s%s\\,%s will look better.";
	SpaceBeforeReference = 24, Warning, OUT_MATH, true, "Delete this space to maintain correct pagereferences.";
	BraceSubscript = 25, Warning, IN_MATH, true, "You might wish to put this between a pair of `{}'";
	SpaceBeforePunctuation = 26, Warning, ANY, true, "You ought to remove spaces in front of punctuation.";
	CommandNotExecuted = 27, Error, ANY, true, "Could not execute LaTeX command.";
	ItalicCorrectionBeforePunctuation = 28, Warning, ANY, true, "Don't use \\/ in front of small punctuation.";
	UseTimes = 29, Warning, ANY, true, "$\\times$ may look prettier here.";
	MultipleSpaces = 30, Warning, OUT_MATH, true, "Multiple spaces detected in input.";
	IgnoredText = 31, Warning, ANY, true, "This text may be ignored.";
	BeginQuote = 32, Warning, OUT_MATH, true, "Use ` to begin quotation, not '.";
	EndQuote = 33, Warning, OUT_MATH, true, "Use ' to end quotation, not `.";
	MixedQuotes = 34, Warning, OUT_MATH, true, "Don't mix quotes.";
	MathOperatorWord = 35, Warning, IN_MATH, true, "You should perhaps use `\\%s' instead.";
	SpaceAroundParenthesis = 36, Warning, OUT_MATH, true, "You should put a space %s parenthesis.";
	NoSpaceAroundParenthesis = 37, Warning, OUT_MATH, true, "You should avoid spaces %s parenthesis.";
	QuoteStyle = 38, Warning, OUT_MATH, true, "You should not use punctuation %s quotes.";
	DoubleSpace = 39, Warning, OUT_MATH, true, "Double space found.";
	PunctuationMath = 40, Warning, ANY, true, "You should put punctuation %s math mode.";
	TexPrimitive = 41, Warning, ANY, true, "You ought to not use primitive TeX in LaTeX code.";
	SpaceBeforeCommand = 42, Warning, ANY, true, "You should remove spaces in front of `%s'";
	CharacterAfterCommand = 43, Warning, ANY, true, "`%s' is normally not followed by `%s'.";
}

/// Static description of one diagnostic.
#[derive(Debug, Clone, Copy)]
pub struct MessageSpec {
	pub code: ErrorCode,
	pub severity: Severity,
	pub context: Context,
	/// Whether the diagnostic is shown unless configured otherwise.
	pub enabled: bool,
	/// Message text with `%s` argument slots.
	pub template: &'static str,
}

impl ErrorCode {
	pub fn number(self) -> u16 {
		self as u16
	}

	pub fn spec(self) -> &'static MessageSpec {
		&MESSAGES[usize::from(self.number()) - 1]
	}

	pub fn severity(self) -> Severity {
		self.spec().severity
	}

	pub fn from_number(number: u16) -> TexCheckResult<Self> {
		MESSAGES
			.get(usize::from(number).wrapping_sub(1))
			.map(|spec| spec.code)
			.ok_or(TexCheckError::UnknownWarning(number))
	}

	/// Render the message template with `args` filling the `%s` slots in
	/// order. Missing arguments render as empty text.
	pub fn render(self, args: &[String]) -> String {
		let mut output = String::new();
		let mut args = args.iter();
		let mut parts = self.spec().template.split("%s").peekable();

		while let Some(part) = parts.next() {
			output.push_str(part);
			if parts.peek().is_some() {
				output.push_str(args.next().map_or("", String::as_str));
			}
		}

		output
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.number())
	}
}

/// Per-run enablement of each diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enablement {
	On,
	/// Explicitly turned off by the user; emissions are counted as
	/// suppressed.
	UserOff,
	/// Off by default; emissions are dropped silently.
	SystemOff,
}

/// Enablement table for all diagnostics.
#[derive(Debug, Clone)]
pub struct Registry {
	states: Vec<Enablement>,
}

impl Default for Registry {
	fn default() -> Self {
		Self {
			states: MESSAGES
				.iter()
				.map(|spec| {
					if spec.enabled {
						Enablement::On
					} else {
						Enablement::SystemOff
					}
				})
				.collect(),
		}
	}
}

impl Registry {
	pub fn enable(&mut self, code: ErrorCode) {
		self.set(code, Enablement::On);
	}

	pub fn disable(&mut self, code: ErrorCode) {
		self.set(code, Enablement::UserOff);
	}

	pub fn set(&mut self, code: ErrorCode, state: Enablement) {
		self.states[usize::from(code.number()) - 1] = state;
	}

	pub fn state(&self, code: ErrorCode) -> Enablement {
		self.states[usize::from(code.number()) - 1]
	}

	pub fn is_enabled(&self, code: ErrorCode) -> bool {
		self.state(code) == Enablement::On
	}
}

/// One emitted finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub code: ErrorCode,
	pub file: String,
	/// 1-indexed line number.
	pub line: usize,
	/// 0-indexed byte column into the original line.
	pub column: usize,
	/// Length in bytes of the offending text.
	pub length: usize,
	/// Arguments for the message template.
	pub args: Vec<String>,
	/// The unmodified source line.
	pub source: Vec<u8>,
}

impl Diagnostic {
	pub fn severity(&self) -> Severity {
		self.code.severity()
	}

	pub fn message(&self) -> String {
		self.code.render(&self.args)
	}

	/// Source text before, at and after the reported span.
	pub fn split_source(&self) -> (String, String, String) {
		let len = self.source.len();
		let start = self.column.min(len);
		let end = self.column.saturating_add(self.length).min(len);

		(
			String::from_utf8_lossy(&self.source[..start]).into_owned(),
			String::from_utf8_lossy(&self.source[start..end]).into_owned(),
			String::from_utf8_lossy(&self.source[end..]).into_owned(),
		)
	}

	/// Spaces up to the column followed by one caret per byte of the span.
	pub fn underline(&self) -> String {
		format!("{}{}", " ".repeat(self.column), "^".repeat(self.length))
	}
}
