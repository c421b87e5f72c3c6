use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::TexCheckError;
use crate::TexCheckResult;
use crate::wordlist::WordList;

/// Names of the word lists the scanner consults. These are also the keys of
/// the `[lists]` and `[lists.replace]` tables in `texcheck.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ListName {
	/// Commands that may be followed by a space without warning.
	Silent,
	/// Cross-reference commands that want a `~` in front.
	Linker,
	/// Commands that should not be preceded by a space (`\label`, `\index`).
	PostLink,
	/// Commands that must never be preceded by a space.
	NotPreSpaced,
	/// Commands with a set of characters that should not follow them.
	NoCharNext,
	/// Commands whose arguments are masked before scanning continues.
	WipeArg,
	MathEnvironments,
	VerbatimEnvironments,
	Italic,
	NonItalic,
	ItalicCommands,
	/// Words that should be typeset as math operators (`\sin`, `\log`).
	MathRoman,
	Abbreviations,
	AbbreviationsCase,
	Primitives,
	HyphenDash,
	NumberDash,
	WordDash,
	CenterDots,
	LowDots,
	UserWarn,
	UserWarnCase,
	AccentCommands,
}

impl ListName {
	pub const ALL: [ListName; 23] = [
		Self::Silent,
		Self::Linker,
		Self::PostLink,
		Self::NotPreSpaced,
		Self::NoCharNext,
		Self::WipeArg,
		Self::MathEnvironments,
		Self::VerbatimEnvironments,
		Self::Italic,
		Self::NonItalic,
		Self::ItalicCommands,
		Self::MathRoman,
		Self::Abbreviations,
		Self::AbbreviationsCase,
		Self::Primitives,
		Self::HyphenDash,
		Self::NumberDash,
		Self::WordDash,
		Self::CenterDots,
		Self::LowDots,
		Self::UserWarn,
		Self::UserWarnCase,
		Self::AccentCommands,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Silent => "silent",
			Self::Linker => "linker",
			Self::PostLink => "post_link",
			Self::NotPreSpaced => "not_pre_spaced",
			Self::NoCharNext => "no_char_next",
			Self::WipeArg => "wipe_arg",
			Self::MathEnvironments => "math_environments",
			Self::VerbatimEnvironments => "verbatim_environments",
			Self::Italic => "italic",
			Self::NonItalic => "non_italic",
			Self::ItalicCommands => "italic_commands",
			Self::MathRoman => "math_roman",
			Self::Abbreviations => "abbreviations",
			Self::AbbreviationsCase => "abbreviations_case",
			Self::Primitives => "primitives",
			Self::HyphenDash => "hyphen_dash",
			Self::NumberDash => "number_dash",
			Self::WordDash => "word_dash",
			Self::CenterDots => "center_dots",
			Self::LowDots => "low_dots",
			Self::UserWarn => "user_warn",
			Self::UserWarnCase => "user_warn_case",
			Self::AccentCommands => "accent_commands",
		}
	}

	/// Entries of these lists carry a `name:payload` suffix.
	fn has_payload(self) -> bool {
		matches!(self, Self::WipeArg | Self::NoCharNext)
	}

	/// Built-in contents of each list.
	pub fn defaults(self) -> &'static [&'static str] {
		match self {
			Self::Silent => SILENT,
			Self::Linker => &["\\ref", "\\vref", "\\pageref", "\\eqref", "\\cite"],
			Self::PostLink => &["\\index", "\\label"],
			Self::NotPreSpaced => &["\\footnote", "\\footnotemark", "\\/"],
			Self::NoCharNext => &["\\left:{}", "\\right:{}"],
			Self::WipeArg => WIPE_ARG,
			Self::MathEnvironments => MATH_ENVIRONMENTS,
			Self::VerbatimEnvironments => VERBATIM_ENVIRONMENTS,
			Self::Italic => &["\\it", "\\em", "\\sl", "\\itshape", "\\slshape"],
			Self::NonItalic => &["\\bf", "\\rm", "\\sf", "\\tt", "\\sc", "\\upshape"],
			Self::ItalicCommands => &["\\textit", "\\textsl", "\\emph"],
			Self::MathRoman => MATH_ROMAN,
			Self::Abbreviations => ABBREVIATIONS,
			Self::AbbreviationsCase => ABBREVIATIONS_CASE,
			Self::Primitives => PRIMITIVES,
			Self::HyphenDash => &["1", "3"],
			Self::NumberDash => &["2"],
			Self::WordDash => &["3"],
			Self::CenterDots => &[
				"=", "+", "-", "\\cdot", "\\div", "&", "\\times", "\\geq", "\\leq", "<", ">",
			],
			Self::LowDots => &[".", ",", ";"],
			Self::UserWarn | Self::UserWarnCase => &[],
			Self::AccentCommands => ACCENT_COMMANDS,
		}
	}
}

const SILENT: &[&str] = &[
	"\\rm",
	"\\em",
	"\\bf",
	"\\it",
	"\\sl",
	"\\sf",
	"\\sc",
	"\\tt",
	"\\selectfont",
	"\\rmfamily",
	"\\sffamily",
	"\\ttfamily",
	"\\mdseries",
	"\\bfseries",
	"\\slshape",
	"\\scshape",
	"\\upshape",
	"\\itshape",
	"\\relax",
	"\\protect",
	"\\hline",
	"\\newline",
	"\\newpage",
	"\\clearpage",
	"\\cleardoublepage",
	"\\pagebreak",
	"\\nopagebreak",
	"\\linebreak",
	"\\nolinebreak",
	"\\noindent",
	"\\indent",
	"\\smallskip",
	"\\medskip",
	"\\bigskip",
	"\\item",
	"\\centering",
	"\\raggedright",
	"\\raggedleft",
	"\\maketitle",
	"\\tableofcontents",
	"\\listoffigures",
	"\\listoftables",
	"\\appendix",
	"\\par",
	"\\and",
	"\\tiny",
	"\\scriptsize",
	"\\footnotesize",
	"\\small",
	"\\normalsize",
	"\\large",
	"\\Large",
	"\\LARGE",
	"\\huge",
	"\\Huge",
	"\\makeatletter",
	"\\makeatother",
	"\\displaystyle",
	"\\textstyle",
	"\\quad",
	"\\qquad",
	"\\fussy",
	"\\sloppy",
	"\\else",
	"\\fi",
];

const WIPE_ARG: &[&str] = &[
	"\\label:{}",
	"\\ref:{}",
	"\\eqref:{}",
	"\\vref:{}",
	"\\pageref:{}",
	"\\index:[]{}",
	"\\cite:[]{}",
	"\\nocite:{}",
	"\\input:{}",
	"\\include:{}",
	"\\includeonly:{}",
	"\\verbatiminput:[]{}",
	"\\includegraphics:*[][]{}",
	"\\graphicspath:{}",
	"\\url:{}",
	"\\bibliography:{}",
	"\\bibliographystyle:{}",
	"\\usepackage:[]{}",
	"\\documentclass:[]{}",
	"\\hyphenation:{}",
	"\\pagestyle:{}",
	"\\thispagestyle:{}",
	"\\hspace:*{}",
	"\\vspace:*{}",
];

const MATH_ENVIRONMENTS: &[&str] = &[
	"displaymath",
	"math",
	"equation",
	"equation*",
	"eqnarray",
	"eqnarray*",
	"align",
	"align*",
	"alignat",
	"alignat*",
	"flalign",
	"flalign*",
	"gather",
	"gather*",
	"multline",
	"multline*",
];

const VERBATIM_ENVIRONMENTS: &[&str] = &[
	"verbatim",
	"verbatim*",
	"Verbatim",
	"comment",
	"listing",
	"lstlisting",
	"minted",
	"filecontents",
	"filecontents*",
];

const MATH_ROMAN: &[&str] = &[
	"log", "lg", "ln", "lim", "limsup", "liminf", "sin", "arcsin", "sinh", "cos", "arccos", "cosh",
	"tan", "arctan", "tanh", "cot", "coth", "sec", "csc", "max", "min", "sup", "inf", "arg", "ker",
	"dim", "hom", "det", "exp", "Pr", "gcd", "deg", "bmod", "pmod", "mod",
];

const ABBREVIATIONS: &[&str] = &[
	"Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Fig.", "Eq.", "Sec.", "Ch.", "Thm.", "Lem.", "Prop.",
	"Def.", "Tab.", "et al.",
];

const ABBREVIATIONS_CASE: &[&str] = &[
	"e.g.", "i.e.", "etc.", "cf.", "viz.", "vs.", "resp.", "approx.", "ca.", "pp.", "vol.", "no.",
];

const PRIMITIVES: &[&str] = &[
	"\\above",
	"\\advance",
	"\\catcode",
	"\\chardef",
	"\\closein",
	"\\closeout",
	"\\copy",
	"\\count",
	"\\countdef",
	"\\cr",
	"\\crcr",
	"\\csname",
	"\\delcode",
	"\\dimendef",
	"\\dimen",
	"\\divide",
	"\\expandafter",
	"\\font",
	"\\hskip",
	"\\vskip",
	"\\openout",
];

const ACCENT_COMMANDS: &[&str] = &[
	"\\hat", "\\check", "\\breve", "\\acute", "\\grave", "\\tilde", "\\bar", "\\vec", "\\dot",
	"\\ddot", "\\'", "\\`", "\\^", "\\\"", "\\~", "\\=", "\\.", "\\u", "\\v", "\\H", "\\t",
];

/// All word lists consulted while scanning, built once per run and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct WordLists {
	lists: HashMap<ListName, WordList>,
	empty: WordList,
}

impl WordLists {
	/// Lists populated with the built-in defaults.
	pub fn builtin() -> TexCheckResult<Self> {
		Self::build(&HashMap::new(), &HashMap::new())
	}

	/// Build lists from the defaults, replacing those named in `replace` and
	/// appending the entries named in `extend`.
	pub fn build(
		extend: &HashMap<ListName, Vec<String>>,
		replace: &HashMap<ListName, Vec<String>>,
	) -> TexCheckResult<Self> {
		let mut lists = HashMap::new();

		for name in ListName::ALL {
			let mut list = WordList::new();

			match replace.get(&name) {
				Some(entries) => {
					for entry in entries {
						insert_entry(&mut list, name, entry)?;
					}
				}
				None => {
					for entry in name.defaults() {
						insert_entry(&mut list, name, entry)?;
					}
				}
			}

			for entry in extend.get(&name).into_iter().flatten() {
				insert_entry(&mut list, name, entry)?;
			}

			if matches!(name, ListName::UserWarnCase | ListName::AbbreviationsCase) {
				list.to_lower()?;
			}

			lists.insert(name, list);
		}

		Ok(Self {
			lists,
			empty: WordList::new(),
		})
	}

	pub fn get(&self, name: ListName) -> &WordList {
		self.lists.get(&name).unwrap_or(&self.empty)
	}

	pub fn get_mut(&mut self, name: ListName) -> Option<&mut WordList> {
		self.lists.get_mut(&name)
	}

	pub fn contains(&self, name: ListName, word: &str) -> bool {
		self.get(name).contains(word)
	}

	/// Whether `text` is a known abbreviation, checking the case-sensitive
	/// list first and then the case-insensitive one.
	pub fn is_abbreviation(&self, text: &str) -> bool {
		self.contains(ListName::Abbreviations, text)
			|| self.contains(ListName::AbbreviationsCase, &text.to_lowercase())
	}

	/// Longest abbreviation in either abbreviation list.
	pub fn abbreviation_max_len(&self) -> usize {
		self.get(ListName::Abbreviations)
			.max_len()
			.max(self.get(ListName::AbbreviationsCase).max_len())
	}

	/// Whether a run of `count` hyphens is an allowed length in `name`.
	pub fn allows_dash(&self, name: ListName, count: usize) -> bool {
		self.get(name)
			.words()
			.filter_map(|word| word.trim().parse::<usize>().ok())
			.any(|len| len == count)
	}
}

fn insert_entry(list: &mut WordList, name: ListName, entry: &str) -> TexCheckResult<()> {
	if !name.has_payload() {
		list.insert(entry, None)?;
		return Ok(());
	}

	let (word, payload) = split_payload(entry).ok_or_else(|| {
		TexCheckError::InvalidListEntry {
			list: name.as_str().to_string(),
			entry: entry.to_string(),
		}
	})?;

	if name == ListName::WipeArg {
		validate_wipe_template(word, payload)?;
	}

	list.insert(word, Some(payload))?;
	Ok(())
}

/// Split `\cmd:payload` into its command and payload. The search for `:`
/// starts after the command's first character so `\:` stays a command.
fn split_payload(entry: &str) -> Option<(&str, &str)> {
	let start = entry.char_indices().nth(2).map_or(entry.len(), |(i, _)| i);
	let offset = entry[start..].find(':')?;
	let (word, rest) = entry.split_at(start + offset);
	Some((word, &rest[1..]))
}

/// Wipe templates describe the arguments to mask, e.g. `*[]{}`.
pub(crate) fn validate_wipe_template(command: &str, template: &str) -> TexCheckResult<()> {
	if template
		.chars()
		.all(|c| matches!(c, '*' | '[' | ']' | '{' | '}'))
	{
		return Ok(());
	}

	Err(TexCheckError::WipeTemplate {
		command: command.to_string(),
		template: template.to_string(),
	})
}
