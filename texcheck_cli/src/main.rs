use std::io::BufWriter;
use std::io::Write;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use texcheck_cli::TexCheckCli;
use texcheck_core::AnyResult;
use texcheck_core::Counters;
use texcheck_core::Emitter;
use texcheck_core::ErrorCode;
use texcheck_core::Settings;
use texcheck_core::SourceOptions;
use texcheck_core::TexCheckConfig;
use texcheck_core::TexCheckError;
use texcheck_core::TexCheckResult;
use texcheck_core::VERBOSITY_FORMATS;
use texcheck_core::check_file;
use texcheck_core::check_reader;
use texcheck_core::collect_sources;
use tracing::debug;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = TexCheckCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	match run(&args) {
		Ok(status) => process::exit(status),
		Err(e) => {
			report_error(e);
			process::exit(2);
		}
	}
}

/// Logs go to stderr so they never mix with diagnostics. `RUST_LOG`
/// overrides the default level.
fn init_tracing(verbose: bool, use_color: bool) {
	let default = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn report_error(e: Box<dyn std::error::Error>) {
	// Try to render through miette for rich diagnostics with help text
	// and error codes.
	match e.downcast::<TexCheckError>() {
		Ok(error) => {
			let report: miette::Report = (*error).into();
			eprintln!("{report:?}");
		}
		Err(e) => {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn load_config(args: &TexCheckCli) -> TexCheckResult<TexCheckConfig> {
	if let Some(path) = &args.config {
		return TexCheckConfig::load_file(path);
	}

	let root = std::env::current_dir()?;
	Ok(TexCheckConfig::load(&root)?.unwrap_or_default())
}

/// Apply command-line overrides on top of the config file.
fn resolve_settings(args: &TexCheckCli, config: &TexCheckConfig) -> TexCheckResult<Settings> {
	let mut config = config.clone();

	if let Some(header_errors) = args.header_errors {
		config.header_errors = header_errors;
	}
	if args.no_inputs {
		config.follow_input = false;
	}
	if let Some(style) = args.quote_style {
		config.quote_style = style.into();
	}
	if let Some(depth) = args.max_input_depth {
		config.max_input_depth = depth;
	}
	if let Some(format) = &args.format {
		config.output_format = Some(format.replace("\\n", "\n").replace("\\t", "\t"));
	} else if let Some(level) = args.verbosity {
		config.output_format = Some(VERBOSITY_FORMATS[usize::from(level)].to_string());
	}

	let mut settings = config.to_settings()?;
	for &number in &args.warn {
		settings.registry.enable(ErrorCode::from_number(number)?);
	}
	for &number in &args.nowarn {
		settings.registry.disable(ErrorCode::from_number(number)?);
	}

	Ok(settings)
}

fn run(args: &TexCheckCli) -> AnyResult<i32> {
	let config = load_config(args)?;
	let settings = resolve_settings(args, &config)?;
	let stdout = std::io::stdout().lock();
	let mut emitter = Emitter::from_settings(BufWriter::new(stdout), &settings);

	let outcome = check_all(args, &config, &settings, &mut emitter);
	emitter.flush()?;

	if !args.quiet {
		print_summary(emitter.counters());
	}

	let unreadable = outcome?;
	if unreadable > 0 {
		return Ok(2);
	}

	Ok(i32::from(emitter.counters().errors > 0))
}

/// Check every requested document. Documents that can't be opened are
/// reported and skipped. Returns how many were skipped.
fn check_all<W: Write>(
	args: &TexCheckCli,
	config: &TexCheckConfig,
	settings: &Settings,
	emitter: &mut Emitter<W>,
) -> TexCheckResult<usize> {
	if args.paths.is_empty() {
		check_reader("stdin", std::io::stdin().lock(), settings, emitter)?;
		return Ok(0);
	}

	let sources = collect_sources(&args.paths, &SourceOptions::from(config))?;
	let mut unreadable = 0;

	for source in &sources {
		match check_file(source, settings, emitter) {
			Ok(report) => {
				debug!(document = %report.document, lines = report.lines, "done");
			}
			Err(error @ (TexCheckError::FileNotFound { .. } | TexCheckError::Io(_))) => {
				emitter.flush()?;
				report_error(Box::new(error));
				unreadable += 1;
			}
			Err(error) => return Err(error),
		}
	}

	Ok(unreadable)
}

fn print_summary(counters: Counters) {
	let summary = counters.to_string();
	let line = if counters.errors > 0 {
		colored!(summary, red)
	} else if counters.warnings > 0 {
		colored!(summary, yellow)
	} else {
		colored!(summary, green)
	};
	eprintln!("{line}");
}
