//! Bounds-checked byte scanning over the working line buffer.
//!
//! Positions are `isize` so that "one before the start" can be expressed
//! while walking backwards. Reading outside the buffer yields `0`, which no
//! classifier accepts, so every walk stops at either end.

/// Byte at `index`, or `0` outside the buffer.
pub(crate) fn at(buf: &[u8], index: isize) -> u8 {
	usize::try_from(index)
		.ok()
		.and_then(|index| buf.get(index))
		.copied()
		.unwrap_or(0)
}

/// First index at or after `from` whose byte fails `check`.
pub(crate) fn skip_ahead(buf: &[u8], from: isize, check: impl Fn(u8) -> bool) -> isize {
	let mut index = from.max(0);
	while let Some(&byte) = usize::try_from(index).ok().and_then(|i| buf.get(i)) {
		if byte == 0 || !check(byte) {
			break;
		}
		index += 1;
	}
	index
}

/// First index at or before `from` whose byte fails `check`, or `-1` when the
/// walk runs off the front.
pub(crate) fn skip_back(buf: &[u8], from: isize, check: impl Fn(u8) -> bool) -> isize {
	let mut index = from.min(buf.len() as isize - 1);
	while index >= 0 {
		let byte = at(buf, index);
		if byte == 0 || !check(byte) {
			break;
		}
		index -= 1;
	}
	index
}

/// Whether `needle` occurs at `index`.
pub(crate) fn starts_at(buf: &[u8], index: isize, needle: &[u8]) -> bool {
	usize::try_from(index)
		.ok()
		.and_then(|index| buf.get(index..))
		.is_some_and(|rest| !needle.is_empty() && rest.starts_with(needle))
}

/// Whether `needle` ends at `last`, i.e. its final byte sits at `last`.
pub(crate) fn ends_at(buf: &[u8], last: isize, needle: &[u8]) -> bool {
	let start = last + 1 - needle.len() as isize;
	start >= 0 && starts_at(buf, start, needle)
}

/// Offset of the first occurrence of `needle` at or after `from`.
pub(crate) fn find_from(buf: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
	if needle.is_empty() {
		return None;
	}

	buf.get(from..)?
		.windows(needle.len())
		.position(|window| window == needle)
		.map(|offset| from + offset)
}

/// Whitespace as the C locale classifies it.
pub(crate) fn is_space(byte: u8) -> bool {
	matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Letters that may appear in a command name.
pub(crate) fn is_tex_letter(byte: u8, at_letter: bool) -> bool {
	byte.is_ascii_alphabetic() || (at_letter && byte == b'@')
}

/// Membership in a punctuation set where the end of the buffer also
/// counts as a member.
pub(crate) fn in_set_or_end(byte: u8, set: &[u8]) -> bool {
	byte == 0 || set.contains(&byte)
}

/// Read one token starting at `from`: a command (`\` plus one non-letter or
/// a run of letters) or a single byte. Returns the end of the token, or
/// `None` at the end of the buffer.
pub(crate) fn get_token(buf: &[u8], from: isize, at_letter: bool) -> Option<isize> {
	if at(buf, from) == 0 {
		return None;
	}

	if at(buf, from) != b'\\' {
		return Some(from + 1);
	}

	let next = at(buf, from + 1);
	if next == 0 {
		return Some(from + 1);
	}
	if !is_tex_letter(next, at_letter) {
		return Some(from + 2);
	}

	Some(skip_ahead(buf, from + 1, |byte| {
		is_tex_letter(byte, at_letter)
	}))
}

/// How far [`get_arg`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgMode {
	/// One balanced token: `{foo}` or a single token.
	Token,
	/// As [`ArgMode::Token`] with the outer braces removed from the text.
	StripToken,
	/// Tokens up to and including the first one starting with this byte.
	Until(u8),
}

/// A located argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Arg {
	pub text: String,
	/// Index just past the argument.
	pub end: isize,
}

/// Read an argument starting at `from`, which should already be past any
/// leading whitespace. Returns `None` when the buffer ends before the
/// argument is complete.
pub(crate) fn get_arg(buf: &[u8], from: isize, mode: ArgMode, at_letter: bool) -> Option<Arg> {
	match mode {
		ArgMode::Token | ArgMode::StripToken => {
			let mut depth: i64 = 0;
			let mut cursor = from;

			loop {
				let end = get_token(buf, cursor, at_letter)?;
				match at(buf, cursor) {
					b'{' => depth += 1,
					b'}' => depth -= 1,
					_ => {}
				}
				cursor = end;
				if depth == 0 {
					break;
				}
			}

			let mut text = slice(buf, from, cursor);
			if mode == ArgMode::StripToken && text.starts_with('{') {
				text.remove(0);
				text.pop();
			}

			Some(Arg { text, end: cursor })
		}
		ArgMode::Until(stop) => {
			let mut cursor = from;

			loop {
				let arg = get_arg(buf, cursor, ArgMode::Token, at_letter)?;
				let first = at(buf, cursor);
				cursor = arg.end;
				if first == stop {
					break;
				}
			}

			Some(Arg {
				text: slice(buf, from, cursor),
				end: cursor,
			})
		}
	}
}

fn slice(buf: &[u8], from: isize, to: isize) -> String {
	let start = usize::try_from(from).unwrap_or(0).min(buf.len());
	let end = usize::try_from(to).unwrap_or(0).clamp(start, buf.len());
	String::from_utf8_lossy(&buf[start..end]).into_owned()
}
