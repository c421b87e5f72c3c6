use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use texcheck_core::QuoteStyle;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Find typographic and structural mistakes in LaTeX documents.",
	long_about = "texcheck scans LaTeX source for common typographic and structural mistakes: \
	              missing ties before references, wrong dash lengths, unbalanced brackets and \
	              environments, misplaced italic corrections, quote misuse and more.\n\nIt \
	              never runs TeX. Documents are read line by line and files pulled in with \
	              \\input or \\include are followed.\n\nWith no paths, the document is read from \
	              standard input. Directories are searched for *.tex and *.ltx files."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct TexCheckCli {
	/// Documents or directories to check.
	pub paths: Vec<PathBuf>,

	/// Path to a config file. Defaults to `texcheck.toml`, `.texcheck.toml` or
	/// `.config/texcheck.toml` in the current directory.
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// Don't print the summary line.
	#[arg(long, short, default_value_t = false)]
	pub quiet: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,

	/// Preset output format: 0 is one line per diagnostic, 1 and 2 add the
	/// source line, 3 is machine readable.
	#[arg(long, short, value_parser = clap::value_parser!(u8).range(0..=3))]
	pub verbosity: Option<u8>,

	/// Output template. Overrides `--verbosity`. `%f` file, `%l` line, `%c`
	/// column, `%k` severity, `%n` number, `%m` message.
	#[arg(long)]
	pub format: Option<String>,

	/// Enable a diagnostic by number. May be repeated.
	#[arg(long, short, value_name = "N")]
	pub warn: Vec<u16>,

	/// Disable a diagnostic by number. May be repeated.
	#[arg(long, short, value_name = "N")]
	pub nowarn: Vec<u16>,

	/// Report diagnostics in the preamble.
	#[arg(long)]
	pub header_errors: Option<bool>,

	/// Don't follow `\input` and `\include`.
	#[arg(long, default_value_t = false)]
	pub no_inputs: bool,

	/// Where punctuation belongs relative to closing quotes.
	#[arg(long, value_enum)]
	pub quote_style: Option<QuoteStyleArg>,

	/// Limit on nested `\input` files.
	#[arg(long)]
	pub max_input_depth: Option<usize>,

	/// Log what the checker is doing to stderr.
	#[arg(long, default_value_t = false)]
	pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QuoteStyleArg {
	/// Punctuation inside the quotes.
	Traditional,
	/// Punctuation outside the quotes.
	Logical,
	/// Accept both.
	Either,
}

impl From<QuoteStyleArg> for QuoteStyle {
	fn from(style: QuoteStyleArg) -> Self {
		match style {
			QuoteStyleArg::Traditional => Self::Traditional,
			QuoteStyleArg::Logical => Self::Logical,
			QuoteStyleArg::Either => Self::Either,
		}
	}
}
