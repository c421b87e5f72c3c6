mod common;

use clap::Parser;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;
use similar_asserts::assert_eq;
use texcheck_cli::QuoteStyleArg;
use texcheck_cli::TexCheckCli;
use texcheck_core::AnyEmptyResult;

#[test]
fn clean_document_exits_successfully() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "Hello world\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.arg("paper.tex")
		.assert()
		.success()
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains(
			"No errors printed; No warnings printed; No user suppressed warnings printed.",
		));

	Ok(())
}

#[test]
fn errors_set_exit_status_one() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "(a]\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.arg("paper.tex")
		.assert()
		.code(1)
		.stdout(predicates::str::contains("paper.tex:1:").and(predicates::str::contains("Error 9:")))
		.stderr(predicates::str::contains("One error printed"));

	Ok(())
}

#[test]
fn warnings_alone_exit_successfully() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "see \\ref{fig}\n")?;

	let mut cmd = common::texcheck_cmd();
	let output = cmd.current_dir(tmp.path()).arg("paper.tex").output()?;

	assert!(output.status.success());
	insta::assert_snapshot!(
		String::from_utf8(output.stdout)?.trim_end(),
		@"paper.tex:1:4:Warning 2: Non-breaking space (`~') should have been used."
	);

	Ok(())
}

#[rstest]
#[case::one_line(0, "paper.tex:1:4:Warning 2:")]
#[case::with_source(1, "Warning 2 in paper.tex line 1:")]
#[case::machine(3, "paper.tex:1:4:")]
fn verbosity_selects_the_format(#[case] level: u8, #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "see \\ref{fig}\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["-v", &level.to_string(), "paper.tex"])
		.assert()
		.success()
		.stdout(predicates::str::starts_with(expected));

	Ok(())
}

#[test]
fn nowarn_turns_a_diagnostic_off() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "see \\ref{fig}\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["-n", "2", "paper.tex"])
		.assert()
		.success()
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("One user suppressed warning printed."));

	Ok(())
}

#[test]
fn unknown_warning_number_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "Hello.\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["-w", "99", "paper.tex"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("unknown diagnostic number: 99"));

	Ok(())
}

#[test]
fn reads_standard_input_without_paths() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.write_stdin("see \\ref{fig}\n")
		.assert()
		.success()
		.stdout(predicates::str::contains("stdin:1:4:Warning 2:"));

	Ok(())
}

#[test]
fn quiet_hides_the_summary() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "Hello world\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["--quiet", "paper.tex"])
		.assert()
		.success()
		.stderr(predicates::str::contains("printed").not());

	Ok(())
}

#[test]
fn missing_document_exits_with_two() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.arg("absent.tex")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("absent.tex"));

	Ok(())
}

#[test]
fn custom_format_unescapes_newlines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "see \\ref{fig}\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["--format", "%n@%l\\n", "paper.tex"])
		.assert()
		.success()
		.stdout("2@1\n");

	Ok(())
}

#[test]
fn directories_are_searched_for_tex_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir(tmp.path().join("chapters"))?;
	std::fs::write(tmp.path().join("chapters/one.tex"), "see \\ref{a}\n")?;
	std::fs::write(tmp.path().join("chapters/notes.txt"), "see \\ref{b}\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["--format", "%f\\n", "chapters"])
		.assert()
		.success()
		.stdout(predicates::str::contains("one.tex").and(predicates::str::contains("notes.txt").not()));

	Ok(())
}

#[test]
fn config_file_disables_warnings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "see \\ref{fig}\n")?;
	std::fs::write(tmp.path().join("texcheck.toml"), "[warnings]\ndisable = [2]\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.arg("paper.tex")
		.assert()
		.success()
		.stdout(predicates::str::is_empty());

	Ok(())
}

#[test]
fn explicit_config_path_is_used() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("paper.tex"), "see \\ref{fig}\n")?;
	std::fs::write(tmp.path().join("custom.toml"), "[warnings]\ndisable = [2]\n")?;

	let mut cmd = common::texcheck_cmd();
	let _ = cmd
		.current_dir(tmp.path())
		.args(["--config", "custom.toml", "paper.tex"])
		.assert()
		.success()
		.stdout(predicates::str::is_empty());

	Ok(())
}

#[test]
fn parses_all_overrides() -> AnyEmptyResult {
	let cli = TexCheckCli::try_parse_from([
		"texcheck",
		"-q",
		"-v",
		"2",
		"-w",
		"22",
		"-n",
		"1",
		"-n",
		"2",
		"--header-errors",
		"true",
		"--no-inputs",
		"--quote-style",
		"logical",
		"--max-input-depth",
		"4",
		"a.tex",
	])?;

	assert!(cli.quiet);
	assert_eq!(cli.verbosity, Some(2));
	assert_eq!(cli.warn, vec![22]);
	assert_eq!(cli.nowarn, vec![1, 2]);
	assert_eq!(cli.header_errors, Some(true));
	assert!(cli.no_inputs);
	assert!(matches!(cli.quote_style, Some(QuoteStyleArg::Logical)));
	assert_eq!(cli.max_input_depth, Some(4));
	assert_eq!(cli.paths.len(), 1);

	Ok(())
}

#[test]
fn rejects_out_of_range_verbosity() {
	assert!(TexCheckCli::try_parse_from(["texcheck", "-v", "7"]).is_err());
}
