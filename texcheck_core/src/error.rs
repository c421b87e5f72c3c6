use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TexCheckError {
	#[error(transparent)]
	#[diagnostic(code(texcheck::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(texcheck::config_parse),
		help("check that texcheck.toml is valid TOML with [lists] and/or [warnings] sections")
	)]
	ConfigParse(String),

	#[error("invalid entry `{entry}` in word list `{list}`")]
	#[diagnostic(code(texcheck::invalid_list_entry))]
	InvalidListEntry { list: String, entry: String },

	#[error("unknown diagnostic number: {0}")]
	#[diagnostic(
		code(texcheck::unknown_warning),
		help("diagnostic numbers range from 1 to 43")
	)]
	UnknownWarning(u16),

	#[error("could not open input file: `{name}`")]
	#[diagnostic(
		code(texcheck::file_not_found),
		help("add the directory containing the file to `input_paths` in texcheck.toml")
	)]
	FileNotFound { name: String },

	#[error("input nesting too deep while opening `{name}` (limit: {depth})")]
	#[diagnostic(
		code(texcheck::input_depth),
		help("check for files that \\input each other, or raise `max_input_depth`")
	)]
	InputDepthExceeded { name: String, depth: usize },

	#[error("out of memory while growing the {what}")]
	#[diagnostic(code(texcheck::stack_exhausted))]
	StackExhausted { what: &'static str },

	#[error("unknown character in argument wipe template `{template}` for `{command}`")]
	#[diagnostic(
		code(texcheck::wipe_template),
		help("wipe templates may only contain `*`, `[`, `]`, `{{` and `}}`")
	)]
	WipeTemplate { command: String, template: String },

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(texcheck::exclude_pattern))]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("invalid include pattern `{pattern}`: {reason}")]
	#[diagnostic(code(texcheck::include_pattern))]
	InvalidIncludePattern { pattern: String, reason: String },
}

pub type TexCheckResult<T> = Result<T, TexCheckError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
