use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DEFAULT_FORMAT;
use crate::DEFAULT_MAX_INPUT_DEPTH;
use crate::ErrorCode;
use crate::ListName;
use crate::OutputFormat;
use crate::Registry;
use crate::TexCheckError;
use crate::TexCheckResult;
use crate::WordLists;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"texcheck.toml",
	".texcheck.toml",
	".config/texcheck.toml",
];

/// Default glob patterns for documents found when walking a directory.
pub const DEFAULT_INCLUDE_PATTERNS: [&str; 2] = ["**/*.tex", "**/*.ltx"];

/// Where punctuation belongs relative to a closing quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
	/// Punctuation goes inside the quotes: ``` ``word,'' ```.
	Traditional,
	/// Punctuation goes outside the quotes unless it belongs to the quoted
	/// text: ``` ``word'', ```.
	#[default]
	Logical,
	/// Either placement is accepted.
	Either,
}

/// Configuration loaded from a `texcheck.toml` file.
///
/// ```toml
/// quote_style = "traditional"
/// header_errors = false
/// input_paths = ["chapters"]
///
/// [warnings]
/// disable = [1, 36]
/// enable = [22]
///
/// [lists]
/// silent = ["\\xspace"]
/// wipe_arg = ["\\todo:[]{}"]
///
/// [lists.replace]
/// word_dash = ["2", "3"]
///
/// [exclude]
/// patterns = ["build/"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TexCheckConfig {
	#[serde(default)]
	pub quote_style: QuoteStyle,
	/// Report diagnostics found in the preamble. When `false` nothing before
	/// `\begin{document}` is reported.
	#[serde(default = "default_true")]
	pub header_errors: bool,
	/// Follow `\input` and `\include` into the named files.
	#[serde(default = "default_true")]
	pub follow_input: bool,
	/// Mask the argument of `\verb` before scanning the rest of the line.
	#[serde(default = "default_true")]
	pub wipe_verb: bool,
	/// Limit on nested `\input` files.
	#[serde(default = "default_max_input_depth")]
	pub max_input_depth: usize,
	/// Template for each printed diagnostic. See [`OutputFormat`].
	#[serde(default)]
	pub output_format: Option<String>,
	/// Text printed for `%b` in the output template.
	#[serde(default)]
	pub delimiter: String,
	/// Quote glyph that should be written as `'` instead.
	#[serde(default = "default_other_quote")]
	pub other_quote: String,
	/// Character used to overwrite masked text.
	#[serde(default = "default_verbatim_fill")]
	pub verbatim_fill: char,
	/// Extra directories searched for `\input` files.
	#[serde(default)]
	pub input_paths: Vec<PathBuf>,
	#[serde(default)]
	pub warnings: WarningsConfig,
	#[serde(default)]
	pub lists: ListsConfig,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	#[serde(default)]
	pub include: IncludeConfig,
}

impl Default for TexCheckConfig {
	fn default() -> Self {
		Self {
			quote_style: QuoteStyle::default(),
			header_errors: true,
			follow_input: true,
			wipe_verb: true,
			max_input_depth: DEFAULT_MAX_INPUT_DEPTH,
			output_format: None,
			delimiter: String::new(),
			other_quote: default_other_quote(),
			verbatim_fill: default_verbatim_fill(),
			input_paths: Vec::new(),
			warnings: WarningsConfig::default(),
			lists: ListsConfig::default(),
			exclude: ExcludeConfig::default(),
			include: IncludeConfig::default(),
		}
	}
}

/// Diagnostic numbers to switch on or off.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarningsConfig {
	#[serde(default)]
	pub enable: Vec<u16>,
	#[serde(default)]
	pub disable: Vec<u16>,
}

/// Word list overrides. Top-level keys extend the built-in list of that
/// name; keys under `[lists.replace]` replace it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListsConfig {
	#[serde(default)]
	pub replace: HashMap<ListName, Vec<String>>,
	#[serde(flatten)]
	pub extend: HashMap<ListName, Vec<String>>,
}

/// Gitignore-style patterns for files and directories to skip when walking
/// a directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Glob patterns selecting the documents to check when walking a directory.
/// Empty means [`DEFAULT_INCLUDE_PATTERNS`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_true() -> bool {
	true
}

fn default_max_input_depth() -> usize {
	DEFAULT_MAX_INPUT_DEPTH
}

fn default_other_quote() -> String {
	"\u{b4}".to_string()
}

fn default_verbatim_fill() -> char {
	'|'
}

impl TexCheckConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> TexCheckResult<Option<TexCheckConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit path.
	pub fn load_file(path: &Path) -> TexCheckResult<TexCheckConfig> {
		let content = std::fs::read_to_string(path)?;
		Self::parse(&content)
	}

	pub fn parse(content: &str) -> TexCheckResult<TexCheckConfig> {
		toml::from_str(content).map_err(|e| TexCheckError::ConfigParse(e.to_string()))
	}

	/// Include patterns, falling back to the defaults.
	pub fn include_patterns(&self) -> Vec<String> {
		if self.include.patterns.is_empty() {
			DEFAULT_INCLUDE_PATTERNS
				.iter()
				.map(ToString::to_string)
				.collect()
		} else {
			self.include.patterns.clone()
		}
	}

	/// Build the runtime settings: word lists, enablement and output format.
	pub fn to_settings(&self) -> TexCheckResult<Settings> {
		if !self.verbatim_fill.is_ascii() {
			return Err(TexCheckError::ConfigParse(format!(
				"`verbatim_fill` must be an ASCII character, found `{}`",
				self.verbatim_fill
			)));
		}

		let lists = WordLists::build(&self.lists.extend, &self.lists.replace)?;

		let mut registry = Registry::default();
		for &number in &self.warnings.enable {
			registry.enable(ErrorCode::from_number(number)?);
		}
		for &number in &self.warnings.disable {
			registry.disable(ErrorCode::from_number(number)?);
		}

		let format = OutputFormat::parse(self.output_format.as_deref().unwrap_or(DEFAULT_FORMAT))
			.with_delimiter(self.delimiter.clone());

		Ok(Settings {
			lists,
			registry,
			format,
			quote_style: self.quote_style,
			header_errors: self.header_errors,
			follow_input: self.follow_input,
			wipe_verb: self.wipe_verb,
			max_input_depth: self.max_input_depth,
			other_quote: self.other_quote.clone(),
			verbatim_fill: self.verbatim_fill as u8,
			input_paths: self.input_paths.clone(),
		})
	}
}

/// Everything the scanner needs for one run, resolved from configuration
/// and command-line overrides.
#[derive(Debug, Clone)]
pub struct Settings {
	pub lists: WordLists,
	pub registry: Registry,
	pub format: OutputFormat,
	pub quote_style: QuoteStyle,
	pub header_errors: bool,
	pub follow_input: bool,
	pub wipe_verb: bool,
	pub max_input_depth: usize,
	pub other_quote: String,
	pub verbatim_fill: u8,
	pub input_paths: Vec<PathBuf>,
}

impl Settings {
	/// Settings for the built-in configuration.
	pub fn builtin() -> TexCheckResult<Self> {
		TexCheckConfig::default().to_settings()
	}

	/// Whether `list` contains `word`.
	pub fn has(&self, list: ListName, word: &str) -> bool {
		self.lists.contains(list, word)
	}
}
