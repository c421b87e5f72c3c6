use std::io::Cursor;
use std::path::PathBuf;

use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;
use crate::cursor::ArgMode;
use crate::cursor::get_arg;
use crate::cursor::get_token;
use crate::cursor::skip_back;

// --- Scanner rules ---

#[rstest]
#[case::balanced("(a) [b] {c}", vec![])]
#[case::wrong_closer("(a]", vec![9, 17, 17])]
#[case::solo_closer("a}", vec![10, 17])]
#[case::multiple_spaces("a    b", vec![30])]
#[case::masked_spaces("a || b", vec![])]
#[case::math_left_on("$a$ $", vec![16])]
#[case::centered_dots("$a = \\cdots = b$", vec![])]
#[case::low_dots_in_centered_context("$a = \\ldots = b$", vec![11])]
#[case::text_ellipsis("wait...", vec![11])]
#[case::verbatim_body("\\begin{verbatim}\n{ ( ]\n\\end{verbatim}", vec![])]
#[case::text_after_verbatim("\\begin{verbatim}\nx\n\\end{verbatim} tail", vec![31])]
#[case::number_range_hyphen("pages 1-5", vec![8])]
#[case::number_range_dash("pages 1--5", vec![])]
#[case::hyphenated_word("a well-known fact", vec![])]
#[case::word_hyphen("a - b", vec![8])]
#[case::word_dash("a --- b", vec![])]
#[case::math_dash("$a--b$", vec![8])]
#[case::times("3x4", vec![29])]
#[case::math_operator("$sin x$", vec![35])]
#[case::math_environment("\\begin{equation}\nsin x\n\\end{equation}", vec![35])]
#[case::long_subscript("$x^12$", vec![25])]
#[case::sentence_after_capitals("the USA. Then", vec![13])]
#[case::abbreviation("Dr. Smith", vec![12])]
#[case::lowercase_after_period("etc. and", vec![12])]
#[case::inner_abbreviation_periods("see e.g. this", vec![12])]
#[case::spaced_reference("see \\ref{fig}", vec![2])]
#[case::spaced_label("text \\label{x}", vec![24])]
#[case::spaced_footnote("word \\footnote{x}", vec![42])]
#[case::primitive("\\hskip{}", vec![41])]
#[case::brace_after_delimiter("$\\left{x\\right}$", vec![43, 43])]
#[case::accent_on_i("\\'{i}", vec![7])]
#[case::unterminated_verb("\\verb|abc", vec![14])]
#[case::masked_verb("\\verb|a{b|", vec![])]
#[case::missing_italic_correction("\\textit{word} next", vec![6])]
#[case::italic_correction_before_period("\\textit{word}.", vec![])]
#[case::italic_corrected("\\textit{word\\/} next", vec![])]
#[case::correction_outside_italics("a\\/ b", vec![4])]
#[case::correction_before_punctuation("{\\it word\\/.}", vec![28])]
#[case::correction_twice("{\\it a\\/b\\/}", vec![5])]
#[case::space_before_punctuation("word .", vec![26])]
#[case::glued_parenthesis("word(x)", vec![36])]
#[case::padded_parentheses("( x )", vec![37, 37])]
#[case::triple_quote("```a", vec![23])]
#[case::space_around_tie("a ~b", vec![39])]
#[case::punctuation_before_inline_math_end("$a,$ b", vec![40])]
#[case::other_quote_glyph("it\u{b4}s", vec![19])]
#[case::straight_quotes("say \"hi\"", vec![18, 18])]
#[case::unclosed_environment("\\begin{itemize}\n\\item x", vec![15])]
#[case::mismatched_environment("\\begin{foo}\nx\n\\end{bar}", vec![9])]
#[case::space_after_command("\\foo bar", vec![1])]
#[case::silent_command("\\rm bar", vec![])]
fn scanner_rules(#[case] input: &str, #[case] expected: Vec<u16>) {
	assert_eq!(codes(input), expected);
}

#[rstest]
#[case::wrong_closer("(a]", vec![(9, 1, 2), (17, 1, 0), (17, 1, 0)])]
#[case::spaced_reference("see \\ref{fig}", vec![(2, 1, 3)])]
#[case::space_after_command("\\foo bar", vec![(1, 1, 4)])]
#[case::unclosed_environment("\\begin{itemize}\n\\item x", vec![(15, 1, 0)])]
#[case::second_line("ok\nwait...", vec![(11, 2, 4)])]
fn diagnostic_locations(#[case] input: &str, #[case] expected: Vec<(u16, usize, usize)>) {
	assert_eq!(located(input), expected);
}

#[test]
fn mismatched_environment_names_both_sides() {
	let printed = printed_with("\\begin{foo}\nx\n\\end{bar}", 9);
	assert_eq!(printed.len(), 1);
	assert_eq!(printed[0].line, 3);
	assert_eq!(printed[0].length, 4);
	assert_eq!(printed[0].message(), "`foo' expected, found `bar'.");
}

#[test]
fn unclosed_environment_quotes_opening_line() {
	let printed = printed_with("\\begin{itemize}\n\\item x", 15);
	assert_eq!(printed.len(), 1);
	assert_eq!(printed[0].source, b"\\begin{itemize}".to_vec());
	assert_eq!(printed[0].message(), "No match found for `itemize'.");
}

#[test]
fn ellipsis_suggests_centered_dots() {
	let printed = printed_with("$a = \\ldots = b$", 11);
	assert_eq!(
		printed[0].message(),
		"You should use \\cdots to achieve an ellipsis."
	);
}

#[test]
fn accent_message_names_dotless_letter() {
	let printed = printed_with("\\'{i}", 7);
	assert_eq!(printed[0].message(), "Accent command `\\'' needs use of `\\i'.");
}

#[test]
fn multiple_spaces_are_masked_once() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let mut scanner = Scanner::new(&settings, &mut emitter);
	scanner.scan_line(b"a    b")?;
	assert_eq!(scanner.working_line(), b"a || b\n");

	Ok(())
}

#[test]
fn scanner_tracks_modes_across_lines() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let mut scanner = Scanner::new(&settings, &mut emitter);

	scanner.scan_line(b"\\makeatletter $a")?;
	assert!(scanner.state().at_letter);
	assert!(scanner.state().in_math());

	scanner.scan_line(b"\\begin{equation}")?;
	assert_eq!(scanner.state().math, 2);
	assert_eq!(scanner.environment_depth(), 1);

	scanner.scan_line(b"\\end{equation}$ \\makeatother")?;
	assert!(!scanner.state().in_math());
	assert!(!scanner.state().at_letter);
	assert_eq!(scanner.environment_depth(), 0);

	Ok(())
}

#[test]
fn math_counter_never_goes_negative() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let mut scanner = Scanner::new(&settings, &mut emitter);

	scanner.scan_line(b"\\) \\] x")?;
	assert_eq!(scanner.state().math, 0);

	Ok(())
}

#[test]
fn document_environment_leaves_preamble() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let mut scanner = Scanner::new(&settings, &mut emitter);

	assert!(scanner.state().in_header);
	scanner.scan_line(b"\\begin{document}")?;
	assert!(!scanner.state().in_header);

	Ok(())
}

#[test]
fn unknown_wipe_template_is_fatal() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let mut scanner = Scanner::new(&settings, &mut emitter);
	scanner.scan_line(b"\\foo{a}")?;

	let result = scanner.wipe_argument(0, "\\foo", "{x}");
	assert!(matches!(result, Err(TexCheckError::WipeTemplate { .. })));

	Ok(())
}

#[test]
#[traced_test]
fn verbatim_transitions_are_logged() {
	codes("\\begin{verbatim}\nx\n\\end{verbatim}");
	assert!(logs_contain("entering verbatim"));
	assert!(logs_contain("leaving verbatim"));
}

// --- Quote style ---

#[rstest]
#[case::logical_inside("logical", "``a word,'' next", vec![38])]
#[case::logical_outside("logical", "``a word'', next", vec![])]
#[case::traditional_inside("traditional", "``a word,'' next", vec![])]
#[case::traditional_outside("traditional", "``a word'', next", vec![38])]
#[case::either_inside("either", "``a word,'' next", vec![])]
#[case::either_outside("either", "``a word'', next", vec![])]
#[case::single_word_exempt("logical", "``word,'' next", vec![])]
fn quote_style(#[case] style: &str, #[case] input: &str, #[case] expected: Vec<u16>) {
	let settings = settings_from(&format!("quote_style = \"{style}\""));
	assert_eq!(codes_with(&settings, input), expected);
}

// --- Emission and counters ---

#[test]
fn counters_match_printed_severities() {
	let emitter = run("(a]\n\\foo bar");
	let counters = emitter.counters();
	let errors = emitter
		.printed()
		.iter()
		.filter(|diagnostic| diagnostic.severity() == Severity::Error)
		.count();
	let warnings = emitter
		.printed()
		.iter()
		.filter(|diagnostic| diagnostic.severity() == Severity::Warning)
		.count();

	assert_eq!(counters.errors, errors);
	assert_eq!(counters.warnings, warnings);
	assert_eq!(counters.errors, 1);
	assert_eq!(counters.warnings, 3);
	assert_eq!(counters.user_suppressed, 0);
}

#[test]
fn disabled_codes_count_as_user_suppressed() {
	let settings = settings_from("[warnings]\ndisable = [1]");
	let emitter = run_with(&settings, "\\foo bar\n\\baz qux");
	let counters = emitter.counters();

	assert!(emitter.printed().is_empty());
	assert_eq!(counters.warnings, 0);
	assert_eq!(counters.user_suppressed, 2);
}

#[test]
fn comments_are_reported_only_when_enabled() {
	assert_eq!(codes("a % note"), vec![]);

	let settings = settings_from("[warnings]\nenable = [22]");
	let emitter = run_with(&settings, "a % note");
	assert_eq!(emitter.printed().len(), 1);
	assert_eq!(emitter.printed()[0].column, 2);
	assert_eq!(emitter.counters(), Counters::default());
}

#[rstest]
#[case::header_errors_on("header_errors = true", vec![(1, 1), (1, 3)])]
#[case::header_errors_off("header_errors = false", vec![(1, 3)])]
fn header_errors(#[case] config: &str, #[case] expected: Vec<(u16, usize)>) {
	let settings = settings_from(config);
	let emitter = run_with(
		&settings,
		"\\foo bar\n\\begin{document}\n\\foo bar\n\\end{document}",
	);
	let found: Vec<_> = emitter
		.printed()
		.iter()
		.map(|diagnostic| (diagnostic.code.number(), diagnostic.line))
		.collect();
	assert_eq!(found, expected);
}

#[test]
fn user_patterns_match_case_sensitively_and_not() {
	let settings = settings_from(
		r#"
[lists]
user_warn = ["foo"]
user_warn_case = ["BAR"]
"#,
	);
	let emitter = run_with(&settings, "foo BAR Foo");
	let found: Vec<_> = emitter
		.printed()
		.iter()
		.map(|diagnostic| (diagnostic.code.number(), diagnostic.column))
		.collect();
	assert_eq!(found, vec![(20, 0), (20, 4)]);
}

#[test]
fn disabled_verb_wiping_scans_the_argument() {
	let settings = settings_from("wipe_verb = false");
	assert_eq!(codes_with(&settings, "\\verb|a{b|"), vec![15, 17]);
}

#[test]
fn emitter_renders_with_its_format() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	check_source(DOCUMENT, "see \\ref{fig}", &settings, &mut emitter)?;

	insta::assert_snapshot!(
		emitter.output().trim_end(),
		@"doc.tex:1:4:Warning 2: Non-breaking space (`~') should have been used."
	);

	Ok(())
}

#[test]
fn emitter_keeps_nothing_unless_capturing() -> TexCheckResult<()> {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings);
	check_source(DOCUMENT, "see \\ref{fig}\na    b", &settings, &mut emitter)?;

	assert!(emitter.printed().is_empty());
	assert_eq!(emitter.counters().warnings, 2);
	assert_eq!(emitter.output().lines().count(), 2);

	Ok(())
}

#[test]
fn summary_sentence_pluralizes() {
	let counters = Counters {
		errors: 0,
		warnings: 1,
		user_suppressed: 3,
	};
	assert_eq!(
		counters.to_string(),
		"No errors printed; One warning printed; 3 user suppressed warnings printed."
	);
}

// --- Input files ---

#[test]
fn input_files_are_followed() -> TexCheckResult<()> {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(tmp.path().join("main.tex"), "\\input{chapter}\nx  y\n")
		.unwrap_or_else(|e| panic!("write: {e}"));
	std::fs::write(tmp.path().join("chapter.tex"), "a  b\n")
		.unwrap_or_else(|e| panic!("write: {e}"));

	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let report = check_file(&tmp.path().join("main.tex"), &settings, &mut emitter)?;

	assert_eq!(report.lines, 3);
	let printed = emitter.printed();
	assert_eq!(printed.len(), 2);
	assert_eq!(printed[0].code, ErrorCode::MultipleSpaces);
	assert!(printed[0].file.ends_with("chapter.tex"));
	assert_eq!(printed[0].line, 1);
	assert_eq!(printed[0].column, 1);

	// Back in the parent after the nested file is exhausted.
	assert_eq!(printed[1].code, ErrorCode::MultipleSpaces);
	assert!(printed[1].file.ends_with("main.tex"));
	assert_eq!(printed[1].line, 2);
	assert_eq!(printed[1].column, 1);

	Ok(())
}

#[test]
#[traced_test]
fn missing_input_is_reported_and_logged() {
	assert_eq!(codes("\\input{no-such-chapter}\nx"), vec![27]);
	assert!(logs_contain("could not follow input"));
}

#[test]
fn inputs_are_not_followed_when_disabled() {
	let settings = settings_from("follow_input = false");
	assert_eq!(codes_with(&settings, "\\input{no-such-chapter}"), vec![]);
}

#[test]
fn recursive_inputs_stop_at_depth_limit() -> TexCheckResult<()> {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(tmp.path().join("a.tex"), "\\input{a}\n")
		.unwrap_or_else(|e| panic!("write: {e}"));

	let mut settings = builtin_settings();
	settings.max_input_depth = 3;
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let report = check_file(&tmp.path().join("a.tex"), &settings, &mut emitter)?;

	assert_eq!(report.lines, 3);
	let numbers: Vec<_> = emitter.printed().iter().map(|d| d.code.number()).collect();
	assert_eq!(numbers, vec![27]);

	Ok(())
}

#[test]
fn missing_document_is_an_error() {
	let settings = builtin_settings();
	let mut emitter = Emitter::from_settings(Vec::new(), &settings).capturing();
	let result = check_file(
		&PathBuf::from("definitely/not/here.tex"),
		&settings,
		&mut emitter,
	);
	assert!(matches!(result, Err(TexCheckError::FileNotFound { .. })));
}

#[test]
fn input_stack_strips_line_endings() -> TexCheckResult<()> {
	let mut input = InputStack::default();
	input.push_reader("mem", Cursor::new(b"one\r\ntwo\n".to_vec()))?;

	assert_eq!(input.read_line(), Some(b"one".to_vec()));
	assert_eq!(input.current_line(), 1);
	assert_eq!(input.read_line(), Some(b"two".to_vec()));
	assert_eq!(input.read_line(), None);
	assert_eq!(input.lines_read(), 2);
	assert_eq!(input.depth(), 0);

	Ok(())
}

// --- Output format ---

fn reference_diagnostic() -> Diagnostic {
	Diagnostic {
		code: ErrorCode::NonBreakingSpace,
		file: DOCUMENT.to_string(),
		line: 1,
		column: 3,
		length: 1,
		args: Vec::new(),
		source: b"see \\ref{x}".to_vec(),
	}
}

#[rstest]
#[case::default(
	OutputFormat::default(),
	"doc.tex:1:4:Warning 2: Non-breaking space (`~') should have been used.\n"
)]
#[case::verbose(
	OutputFormat::for_verbosity(1),
	"Warning 2 in doc.tex line 1: Non-breaking space (`~') should have been used.\nsee \\ref{x}\n   ^\n"
)]
#[case::machine(
	OutputFormat::for_verbosity(3),
	"doc.tex:1:4:1:2:Non-breaking space (`~') should have been used.\n"
)]
#[case::out_of_range_level(
	OutputFormat::for_verbosity(9),
	"doc.tex:1:4:1:2:Non-breaking space (`~') should have been used.\n"
)]
#[case::inverse(OutputFormat::parse("%r%i%s%I%t"), "see\x1b[7m \x1b[27m\\ref{x}")]
#[case::delimiter(OutputFormat::parse("%b%f%b").with_delimiter("|"), "|doc.tex|")]
fn output_format_render(#[case] format: OutputFormat, #[case] expected: &str) {
	assert_eq!(format.render(&reference_diagnostic()), expected);
}

#[test]
fn output_format_escapes() {
	let format = OutputFormat::parse("%%x%q%");
	assert_eq!(format.pieces(), &[FormatPiece::Literal("%xq".to_string())]);
}

// --- Diagnostic catalogue ---

#[test]
fn catalogue_is_indexed_by_number() -> TexCheckResult<()> {
	assert_eq!(MESSAGES.len(), 43);
	for (index, spec) in MESSAGES.iter().enumerate() {
		assert_eq!(usize::from(spec.code.number()), index + 1);
	}
	assert_eq!(ErrorCode::from_number(43)?, ErrorCode::CharacterAfterCommand);
	assert!(matches!(
		ErrorCode::from_number(0),
		Err(TexCheckError::UnknownWarning(0))
	));
	assert!(matches!(
		ErrorCode::from_number(44),
		Err(TexCheckError::UnknownWarning(44))
	));

	Ok(())
}

#[test]
fn message_templates_fill_every_slot() {
	let quotes = vec!["`".to_string(); 6];
	assert_eq!(
		ErrorCode::TripleQuote.render(&quotes),
		"Either `\\,`` or ``\\,` will look better."
	);
	assert_eq!(
		ErrorCode::ExpectedDelimiter.render(&[")".to_string()]),
		"`)' expected, found `'."
	);
}

#[test]
fn registry_defaults_follow_catalogue() {
	let mut registry = Registry::default();
	assert_eq!(registry.state(ErrorCode::Comment), Enablement::SystemOff);
	assert!(registry.is_enabled(ErrorCode::SpaceAfterCommand));

	registry.disable(ErrorCode::SpaceAfterCommand);
	assert_eq!(
		registry.state(ErrorCode::SpaceAfterCommand),
		Enablement::UserOff
	);
	registry.enable(ErrorCode::Comment);
	assert!(registry.is_enabled(ErrorCode::Comment));
}

#[test]
fn diagnostic_splits_source_around_span() {
	let diagnostic = reference_diagnostic();
	assert_eq!(
		diagnostic.split_source(),
		("see".to_string(), " ".to_string(), "\\ref{x}".to_string())
	);
	assert_eq!(diagnostic.underline(), "   ^");
}

// --- Cursor helpers ---

#[rstest]
#[case::command(b"\\foo bar".as_slice(), false, Some(4))]
#[case::symbol_command(b"\\, x".as_slice(), false, Some(2))]
#[case::at_as_other(b"\\my@cmd".as_slice(), false, Some(3))]
#[case::at_as_letter(b"\\my@cmd".as_slice(), true, Some(7))]
#[case::plain_byte(b"ab".as_slice(), false, Some(1))]
#[case::empty(b"".as_slice(), false, None)]
fn tokens(#[case] buf: &[u8], #[case] at_letter: bool, #[case] expected: Option<isize>) {
	assert_eq!(get_token(buf, 0, at_letter), expected);
}

#[test]
fn arguments_respect_nesting() {
	let arg = get_arg(b"{a{b}c} d", 0, ArgMode::StripToken, false);
	assert_eq!(arg.map(|arg| (arg.text, arg.end)), Some(("a{b}c".to_string(), 7)));

	let arg = get_arg(b"{a{b}c} d", 0, ArgMode::Token, false);
	assert_eq!(arg.map(|arg| arg.text), Some("{a{b}c}".to_string()));

	let arg = get_arg(b"[opt]{x}", 0, ArgMode::Until(b']'), false);
	assert_eq!(arg.map(|arg| (arg.text, arg.end)), Some(("[opt]".to_string(), 5)));

	assert_eq!(get_arg(b"{open", 0, ArgMode::Token, false), None);
}

#[test]
fn backward_walk_stops_before_start() {
	assert_eq!(skip_back(b"   ", 2, |b| b == b' '), -1);
	assert_eq!(skip_back(b"a  ", 2, |b| b == b' '), 0);
}

// --- Word lists and stacks ---

#[test]
fn word_list_lookup() -> TexCheckResult<()> {
	let mut list = WordList::from_words(["a", "bb"])?;
	assert_eq!(list.len(), 2);
	assert_eq!(list.max_len(), 2);
	assert!(!list.insert("a", None)?);
	assert!(list.insert("\\label", Some("{}"))?);
	assert_eq!(
		list.has("\\label").and_then(|entry| entry.payload.as_deref()),
		Some("{}")
	);
	assert!(!list.contains("c"));

	Ok(())
}

#[test]
fn word_list_rewrites_collapse_duplicates() -> TexCheckResult<()> {
	let mut list = WordList::from_words(["Foo", "foo", "BAR"])?;
	list.to_lower()?;
	assert_eq!(list.words().collect::<Vec<_>>(), vec!["foo", "bar"]);

	let mut list = WordList::from_words(["et~al."])?;
	list.replace_in_all('~', ' ')?;
	assert!(list.contains("et al."));

	Ok(())
}

#[test]
fn builtin_lists_split_payloads() -> TexCheckResult<()> {
	let lists = WordLists::builtin()?;
	let wipe = lists.get(ListName::WipeArg).has("\\includegraphics");
	assert_eq!(
		wipe.and_then(|entry| entry.payload.as_deref()),
		Some("*[][]{}")
	);
	assert!(lists.is_abbreviation("e.g."));
	assert!(lists.is_abbreviation("E.G."));
	assert!(!lists.is_abbreviation("dr."));
	assert!(lists.allows_dash(ListName::NumberDash, 2));

	Ok(())
}

#[test]
fn stack_grows_and_pops() -> TexCheckResult<()> {
	let mut stack = Stack::new("test stack");
	assert_eq!(stack.size(), 0);
	stack.push(1)?;
	stack.push(2)?;
	assert!(stack.size() >= INITIAL_CAPACITY);
	assert_eq!(stack.used(), 2);
	assert_eq!(stack.top(), Some(&2));
	assert_eq!(stack.pop(), Some(2));
	assert_eq!(stack.pop(), Some(1));
	assert_eq!(stack.pop(), None);

	Ok(())
}

#[test]
fn context_stack_drains_innermost_first() -> TexCheckResult<()> {
	let source = b"({".to_vec();
	let mut stack = ContextStack::new("bracket stack");
	for (column, token) in ["(", "{"].into_iter().enumerate() {
		let opening = Opening {
			file: DOCUMENT,
			line: 1,
			column,
			length: 1,
			source: &source,
		};
		stack.open(token, &opening)?;
	}

	assert!(stack.peek_matches("{"));
	let drained: Vec<_> = stack.drain().map(|entry| entry.token).collect();
	assert_eq!(drained, vec!["{".to_string(), "(".to_string()]);
	assert!(stack.is_empty());

	Ok(())
}

#[test]
fn bracket_tally_reports_unequal_pairs() {
	let mut tally = BracketTally::default();
	for c in b"(()[]{" {
		tally.add(*c);
	}
	assert_eq!(tally.count(b'('), 2);
	assert_eq!(tally.unbalanced().collect::<Vec<_>>(), vec![
		(b'(', b')'),
		(b'{', b'}')
	]);
	assert_eq!(matching_bracket(b'}'), Some(b'{'));
	assert!(is_closing_bracket(b']'));
	assert!(!is_closing_bracket(b'['));
}

// --- Configuration ---

#[test]
fn config_overrides_settings() -> TexCheckResult<()> {
	let config = TexCheckConfig::parse(
		r##"
quote_style = "traditional"
header_errors = false
verbatim_fill = "#"

[warnings]
disable = [1]
enable = [22]

[lists]
silent = ["\\foo"]

[lists.replace]
word_dash = ["2", "3"]
"##,
	)?;
	let settings = config.to_settings()?;

	assert_eq!(settings.quote_style, QuoteStyle::Traditional);
	assert!(!settings.header_errors);
	assert_eq!(settings.verbatim_fill, b'#');
	assert_eq!(
		settings.registry.state(ErrorCode::SpaceAfterCommand),
		Enablement::UserOff
	);
	assert!(settings.registry.is_enabled(ErrorCode::Comment));
	assert!(settings.has(ListName::Silent, "\\foo"));
	assert!(settings.has(ListName::Silent, "\\rm"));
	assert!(settings.lists.allows_dash(ListName::WordDash, 2));
	assert_eq!(codes_with(&settings, "\\foo bar"), vec![]);

	Ok(())
}

#[rstest]
#[case::bad_toml("quote_style = ")]
#[case::unknown_style("quote_style = \"french\"")]
fn config_parse_errors(#[case] content: &str) {
	assert!(matches!(
		TexCheckConfig::parse(content),
		Err(TexCheckError::ConfigParse(_))
	));
}

#[test]
fn config_rejects_bad_entries() -> TexCheckResult<()> {
	let config = TexCheckConfig::parse("[lists]\nwipe_arg = [\"\\\\foo:{x}\"]")?;
	assert!(matches!(
		config.to_settings(),
		Err(TexCheckError::WipeTemplate { .. })
	));

	let config = TexCheckConfig::parse("[lists]\nwipe_arg = [\"\\\\foo\"]")?;
	assert!(matches!(
		config.to_settings(),
		Err(TexCheckError::InvalidListEntry { .. })
	));

	let config = TexCheckConfig::parse("[warnings]\ndisable = [99]")?;
	assert!(matches!(
		config.to_settings(),
		Err(TexCheckError::UnknownWarning(99))
	));

	Ok(())
}

#[test]
fn config_discovery_order() -> TexCheckResult<()> {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	assert!(TexCheckConfig::load(tmp.path())?.is_none());

	std::fs::write(tmp.path().join(".texcheck.toml"), "header_errors = false\n")
		.unwrap_or_else(|e| panic!("write: {e}"));
	assert_eq!(
		TexCheckConfig::resolve_path(tmp.path()),
		Some(tmp.path().join(".texcheck.toml"))
	);

	std::fs::write(tmp.path().join("texcheck.toml"), "wipe_verb = false\n")
		.unwrap_or_else(|e| panic!("write: {e}"));
	let config = TexCheckConfig::load(tmp.path())?
		.unwrap_or_else(|| panic!("config should be found"));
	assert!(!config.wipe_verb);
	assert!(config.header_errors);

	Ok(())
}

// --- Source collection ---

#[test]
fn collect_sources_walks_directories() -> TexCheckResult<()> {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let root = tmp.path();
	for dir in ["sub", ".hidden", "build"] {
		std::fs::create_dir_all(root.join(dir)).unwrap_or_else(|e| panic!("mkdir: {e}"));
	}
	for file in [
		"a.tex",
		"notes.txt",
		"sub/b.ltx",
		".hidden/c.tex",
		"build/d.tex",
	] {
		std::fs::write(root.join(file), "x\n").unwrap_or_else(|e| panic!("write: {e}"));
	}

	let options = SourceOptions {
		exclude: vec!["build/".to_string()],
		..SourceOptions::default()
	};
	let sources = collect_sources(&[root.to_path_buf()], &options)?;
	assert_eq!(sources, vec![root.join("a.tex"), root.join("sub/b.ltx")]);

	let explicit = collect_sources(&[root.join("notes.txt")], &options)?;
	assert_eq!(explicit, vec![root.join("notes.txt")]);

	Ok(())
}

#[test]
fn collect_sources_rejects_bad_globs() {
	let options = SourceOptions {
		include: vec!["[".to_string()],
		exclude: Vec::new(),
	};
	assert!(matches!(
		collect_sources(&[], &options),
		Err(TexCheckError::InvalidIncludePattern { .. })
	));
}
