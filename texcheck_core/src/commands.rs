use std::io::Write;

use tracing::debug;
use tracing::warn;

use crate::ErrorCode;
use crate::ItalicFlag;
use crate::ListName;
use crate::Scanner;
use crate::TexCheckError;
use crate::TexCheckResult;
use crate::cursor::ArgMode;
use crate::cursor::ends_at;
use crate::cursor::get_arg;
use crate::cursor::in_set_or_end;
use crate::cursor::is_space;
use crate::cursor::skip_ahead;
use crate::cursor::skip_back;
use crate::cursor::starts_at;
use crate::scanner::ItalicState;
use crate::scanner::SMALL_PUNCTUATION;
use crate::scanner::opening_at;

/// Which ellipsis command fits a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotLevel {
	Unknown,
	/// `\cdots`
	Center,
	/// `\ldots`
	Low,
}

impl DotLevel {
	/// Agreement of the two sides of an ellipsis.
	fn and(self, other: Self) -> Self {
		if self == other { self } else { Self::Unknown }
	}

	/// Command suggested in the ellipsis message.
	pub fn command(self) -> &'static str {
		match self {
			Self::Unknown => "\\cdots or \\ldots",
			Self::Center => "\\cdots",
			Self::Low => "\\ldots",
		}
	}
}

impl<W: Write> Scanner<'_, W> {
	/// Everything that happens once a command name has been read. `pos` is
	/// the backslash, `cursor` the byte after the name.
	pub(crate) fn perform_command(
		&mut self,
		pos: isize,
		cursor: isize,
		command: &str,
	) -> TexCheckResult<()> {
		let settings = self.settings;
		let length = command.len();
		let at_letter = self.state.at_letter;
		let arg_start = skip_ahead(&self.line.buf, cursor, is_space);
		let argument = get_arg(&self.line.buf, arg_start, ArgMode::StripToken, at_letter);

		if settings.wipe_verb && command == "\\verb" {
			self.wipe_verb(pos, cursor)?;
		}

		if self.has(ListName::AccentCommands, command) {
			match &argument {
				Some(argument) => {
					let letter = argument.text.bytes().find(|&b| b != b'{');
					if let Some(letter @ (b'i' | b'j')) = letter {
						let math = if self.state.in_math() { "math" } else { "" };
						self.report(
							ErrorCode::AccentNeedsDotless,
							pos,
							length,
							vec![
								command.to_string(),
								char::from(letter).to_string(),
								math.to_string(),
							],
						)?;
					}
				}
				None => self.report(ErrorCode::MissingArgument, pos, length, Vec::new())?,
			}
		}

		if self.has(ListName::NotPreSpaced, command) && is_space(self.b(pos - 1)) {
			self.report(
				ErrorCode::SpaceBeforeCommand,
				pos - 1,
				1,
				vec![command.to_string()],
			)?;
		}

		let forbidden = settings
			.lists
			.get(ListName::NoCharNext)
			.has(command)
			.and_then(|entry| entry.payload.as_deref());
		if let Some(forbidden) = forbidden {
			let next = self.b(skip_ahead(&self.line.buf, cursor, is_space));
			if next != 0 && forbidden.as_bytes().contains(&next) {
				self.report(
					ErrorCode::CharacterAfterCommand,
					pos,
					length,
					vec![command.to_string(), char::from(next).to_string()],
				)?;
			}
		}

		if command == "\\begin" || command == "\\end" {
			match &argument {
				Some(argument) => self.perform_environment(pos, command, &argument.text)?,
				None => self.report(ErrorCode::MissingArgument, pos, length, Vec::new())?,
			}
		}

		self.check_italic(command, cursor);

		if let Some(code) = self.builtin_command(command, cursor)? {
			self.report(code, pos, length, Vec::new())?;
		}

		let used = match command {
			"\\cdots" => Some(DotLevel::Center),
			"\\ldots" | "\\dots" => Some(DotLevel::Low),
			_ => None,
		};
		if let Some(used) = used {
			let expected = self.check_dots(pos - 1, cursor);
			if expected != DotLevel::Unknown && expected != used {
				self.report(
					ErrorCode::Ellipsis,
					pos,
					length,
					vec![expected.command().to_string()],
				)?;
			}
		}

		let template = settings
			.lists
			.get(ListName::WipeArg)
			.has(command)
			.and_then(|entry| entry.payload.as_deref());
		if let Some(template) = template {
			self.wipe_argument(pos, command, template)?;
		}

		Ok(())
	}

	/// Mask `\verb<d>...<d>` and `\verb*<d>...<d>`.
	fn wipe_verb(&mut self, pos: isize, cursor: isize) -> TexCheckResult<()> {
		let (delimiter, from) = if self.b(cursor) == b'*' {
			(self.b(cursor + 1), cursor + 2)
		} else {
			(self.b(cursor), cursor + 1)
		};
		let close = skip_ahead(&self.line.buf, from, |b| b != delimiter);

		if delimiter != 0 && self.b(close) == delimiter {
			self.fill(pos, close + 1);
		} else {
			self.report(ErrorCode::MissingArgument, pos, 5, Vec::new())?;
		}

		Ok(())
	}

	/// `\begin{name}` and `\end{name}`.
	fn perform_environment(&mut self, pos: isize, command: &str, name: &str) -> TexCheckResult<()> {
		let begin = command == "\\begin";

		if name == "document" && self.state.in_header {
			debug!(line = self.line.number, "leaving preamble");
			self.state.in_header = false;
		}

		if begin {
			let opening = opening_at(&self.line, pos, command.len());
			self.environments.open(name, &opening)?;
		} else {
			match self.environments.close() {
				Some(entry) if entry.token == name => {}
				Some(entry) => {
					self.report(
						ErrorCode::ExpectedDelimiter,
						pos,
						command.len(),
						vec![entry.token, name.to_string()],
					)?;
				}
				None => {
					self.report(
						ErrorCode::SoloDelimiter,
						pos,
						command.len(),
						vec![name.to_string()],
					)?;
				}
			}
		}

		if self.has(ListName::MathEnvironments, name) {
			self.state.math = if begin {
				self.state.math + 1
			} else {
				self.state.math.saturating_sub(1)
			};
		}

		if begin && self.has(ListName::VerbatimEnvironments, name) {
			debug!(line = self.line.number, environment = name, "entering verbatim");
			self.state.verbatim = Some(format!("\\end{{{name}}}"));
		}

		Ok(())
	}

	/// Italic switches and italic commands taking a `{...}` argument.
	fn check_italic(&mut self, command: &str, cursor: isize) {
		if self.has(ListName::NonItalic, command) {
			self.state.italic = ItalicState::Off;
		} else if self.has(ListName::Italic, command) {
			self.state.italic = ItalicState::On;
		} else if self.has(ListName::ItalicCommands, command)
			&& self.b(skip_ahead(&self.line.buf, cursor, is_space)) == b'{'
		{
			self.state.pending_italic = if self.state.italic == ItalicState::Off {
				ItalicFlag::WasOff
			} else {
				ItalicFlag::WasOn
			};
			self.state.italic = ItalicState::On;
		}
	}

	/// Commands that change scanner modes or are checked by name. Returns a
	/// diagnostic to report on the command itself.
	fn builtin_command(&mut self, command: &str, cursor: isize) -> TexCheckResult<Option<ErrorCode>> {
		match command {
			"\\makeatletter" => self.state.at_letter = true,
			"\\makeatother" => self.state.at_letter = false,
			"\\input" | "\\include" if self.settings.follow_input => {
				return self.follow_input(cursor);
			}
			_ if self.has(ListName::Primitives, command) => {
				return Ok(Some(ErrorCode::TexPrimitive));
			}
			"\\(" | "\\[" => self.state.math += 1,
			"\\)" | "\\]" => self.state.math = self.state.math.saturating_sub(1),
			"\\/" => {
				match self.state.italic {
					ItalicState::On => {
						self.state.italic = ItalicState::Corrected;
						let next = skip_ahead(&self.line.buf, cursor, |b| b == b'{' || b == b'}');
						if in_set_or_end(self.b(next), SMALL_PUNCTUATION) {
							return Ok(Some(ErrorCode::ItalicCorrectionBeforePunctuation));
						}
					}
					ItalicState::Corrected => {
						return Ok(Some(ErrorCode::ItalicCorrectionDuplicate));
					}
					ItalicState::Off => return Ok(Some(ErrorCode::ItalicCorrectionNotItalic)),
				}
			}
			_ => {}
		}

		Ok(None)
	}

	/// Push the file named by an `\input` or `\include` argument. Failing to
	/// open it is reported on the command and scanning carries on.
	fn follow_input(&mut self, cursor: isize) -> TexCheckResult<Option<ErrorCode>> {
		let start = skip_ahead(&self.line.buf, cursor, is_space);
		let name = if self.b(start) == b'{' {
			get_arg(&self.line.buf, start, ArgMode::StripToken, self.state.at_letter)
				.map(|arg| arg.text)
		} else {
			let rest = &self.line.buf[usize::try_from(start).unwrap_or(0)..];
			Some(String::from_utf8_lossy(rest.trim_ascii()).into_owned())
		};

		let Some(name) = name else {
			return Ok(Some(ErrorCode::CommandNotExecuted));
		};

		match self.input.push_file(&name) {
			Ok(()) => Ok(None),
			Err(
				error @ (TexCheckError::FileNotFound { .. }
				| TexCheckError::InputDepthExceeded { .. }
				| TexCheckError::Io(_)),
			) => {
				warn!(file = %self.line.file, line = self.line.number, %error, "could not follow input");
				Ok(Some(ErrorCode::CommandNotExecuted))
			}
			Err(error) => Err(error),
		}
	}

	/// The ellipsis command that fits between the tokens ending at `pre` and
	/// starting at `post`. Outside math only `\ldots` fits.
	pub(crate) fn check_dots(&self, pre: isize, post: isize) -> DotLevel {
		if !self.state.in_math() {
			return DotLevel::Low;
		}

		let empty = |b: u8| is_space(b) || b == b'{' || b == b'}';
		let pre = skip_back(&self.line.buf, pre, empty);
		let post = skip_ahead(&self.line.buf, post, empty);

		let mut front = DotLevel::Unknown;
		let mut back = DotLevel::Unknown;
		let contexts = [
			(ListName::CenterDots, DotLevel::Center),
			(ListName::LowDots, DotLevel::Low),
		];

		for (list, level) in contexts {
			if front != DotLevel::Unknown && back != DotLevel::Unknown {
				break;
			}
			for word in self.settings.lists.get(list).words() {
				if front != DotLevel::Unknown && back != DotLevel::Unknown {
					break;
				}
				if starts_at(&self.line.buf, post, word.as_bytes()) {
					back = level;
				}
				if ends_at(&self.line.buf, pre, word.as_bytes()) {
					front = level;
				}
			}
		}

		front.and(back)
	}

	/// Mask a command and the arguments its template names: `*` an optional
	/// star, `[` an optional bracket argument, `{` a required argument.
	pub(crate) fn wipe_argument(&mut self, pos: isize, command: &str, template: &str) -> TexCheckResult<()> {
		let at_letter = self.state.at_letter;
		let mut cursor = Some(pos + command.len() as isize);

		for spec in template.bytes() {
			let Some(current) = cursor else {
				break;
			};
			if self.b(current) == 0 {
				break;
			}

			let start = skip_ahead(&self.line.buf, current, is_space);
			cursor = match spec {
				b'*' => Some(if self.b(start) == b'*' { start + 1 } else { start }),
				b'[' => {
					if self.b(start) == b'[' {
						get_arg(&self.line.buf, start, ArgMode::Until(b']'), at_letter)
							.map(|arg| arg.end)
					} else {
						Some(start)
					}
				}
				b'{' => {
					get_arg(&self.line.buf, start, ArgMode::Token, at_letter).map(|arg| arg.end)
				}
				b']' | b'}' => Some(current),
				_ => {
					return Err(TexCheckError::WipeTemplate {
						command: command.to_string(),
						template: template.to_string(),
					});
				}
			};
		}

		match cursor {
			Some(end) => self.fill(pos, end),
			None => {
				// The argument never closes: keep the text but hide its
				// brackets.
				let fill = self.settings.verbatim_fill;
				let start = usize::try_from(pos).unwrap_or(0);
				for byte in self.line.buf.iter_mut().skip(start) {
					if b"()[]{}".contains(byte) {
						*byte = fill;
					}
				}
			}
		}

		Ok(())
	}
}
