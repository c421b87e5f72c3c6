use crate::Diagnostic;
use crate::Emitter;
use crate::Settings;
use crate::TexCheckConfig;
use crate::check_source;

pub(crate) const DOCUMENT: &str = "doc.tex";

pub(crate) fn builtin_settings() -> Settings {
	Settings::builtin().unwrap_or_else(|e| panic!("builtin settings: {e}"))
}

pub(crate) fn settings_from(toml: &str) -> Settings {
	TexCheckConfig::parse(toml)
		.and_then(|config| config.to_settings())
		.unwrap_or_else(|e| panic!("settings: {e}"))
}

/// Check `text` with `settings` and hand back the emitter for inspection.
pub(crate) fn run_with(settings: &Settings, text: &str) -> Emitter<Vec<u8>> {
	let mut emitter = Emitter::from_settings(Vec::new(), settings).capturing();
	check_source(DOCUMENT, text, settings, &mut emitter)
		.unwrap_or_else(|e| panic!("check_source: {e}"));
	emitter
}

pub(crate) fn run(text: &str) -> Emitter<Vec<u8>> {
	run_with(&builtin_settings(), text)
}

/// Numbers of the printed diagnostics in emission order.
pub(crate) fn codes_with(settings: &Settings, text: &str) -> Vec<u16> {
	run_with(settings, text)
		.printed()
		.iter()
		.map(|diagnostic| diagnostic.code.number())
		.collect()
}

pub(crate) fn codes(text: &str) -> Vec<u16> {
	codes_with(&builtin_settings(), text)
}

/// `(number, line, column)` of each printed diagnostic.
pub(crate) fn located(text: &str) -> Vec<(u16, usize, usize)> {
	run(text)
		.printed()
		.iter()
		.map(|diagnostic| (diagnostic.code.number(), diagnostic.line, diagnostic.column))
		.collect()
}

/// The printed diagnostics with the given number.
pub(crate) fn printed_with(text: &str, number: u16) -> Vec<Diagnostic> {
	run(text)
		.printed()
		.iter()
		.filter(|diagnostic| diagnostic.code.number() == number)
		.cloned()
		.collect()
}
