use std::fmt;
use std::io::Write;

use crate::Diagnostic;
use crate::Enablement;
use crate::OutputFormat;
use crate::Registry;
use crate::Settings;
use crate::Severity;
use crate::TexCheckResult;

/// Running totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
	pub errors: usize,
	pub warnings: usize,
	/// Diagnostics that fired but were turned off by the user.
	pub user_suppressed: usize,
}

impl fmt::Display for Counters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} printed; {} printed; {} printed.",
			counted(self.errors, "error"),
			counted(self.warnings, "warning"),
			counted(self.user_suppressed, "user suppressed warning"),
		)
	}
}

fn counted(count: usize, noun: &str) -> String {
	match count {
		0 => format!("No {noun}s"),
		1 => format!("One {noun}"),
		n => format!("{n} {noun}s"),
	}
}

/// Formats diagnostics, filters them by enablement and context, and keeps
/// the counters.
///
/// One emitter is shared by every document of a run so the totals cover the
/// whole run.
#[derive(Debug)]
pub struct Emitter<W: Write> {
	out: W,
	registry: Registry,
	format: OutputFormat,
	/// When `false` every diagnostic must also be outside the preamble.
	header_errors: bool,
	counters: Counters,
	/// Printed diagnostics, kept only when capturing was requested.
	printed: Option<Vec<Diagnostic>>,
}

impl Emitter<Vec<u8>> {
	/// An emitter writing into memory.
	pub fn buffered(registry: Registry, format: OutputFormat) -> Self {
		Self::new(Vec::new(), registry, format)
	}

	/// The rendered output so far.
	pub fn output(&self) -> String {
		String::from_utf8_lossy(&self.out).into_owned()
	}
}

impl<W: Write> Emitter<W> {
	pub fn new(out: W, registry: Registry, format: OutputFormat) -> Self {
		Self {
			out,
			registry,
			format,
			header_errors: true,
			counters: Counters::default(),
			printed: None,
		}
	}

	/// An emitter configured from resolved settings.
	pub fn from_settings(out: W, settings: &Settings) -> Self {
		Self::new(out, settings.registry.clone(), settings.format.clone())
			.with_header_errors(settings.header_errors)
	}

	/// Keep every printed diagnostic so it can be inspected with
	/// [`Emitter::printed`]. Off by default since each diagnostic carries a
	/// copy of its source line.
	#[must_use]
	pub fn capturing(mut self) -> Self {
		self.printed = Some(Vec::new());
		self
	}

	#[must_use]
	pub fn with_header_errors(mut self, header_errors: bool) -> Self {
		self.header_errors = header_errors;
		self
	}

	/// Report `diagnostic` given the scanner's current modes. Returns whether
	/// it was printed.
	pub fn emit(
		&mut self,
		diagnostic: Diagnostic,
		in_math: bool,
		in_header: bool,
	) -> TexCheckResult<bool> {
		match self.registry.state(diagnostic.code) {
			Enablement::On => {}
			Enablement::UserOff => {
				self.counters.user_suppressed += 1;
				return Ok(false);
			}
			Enablement::SystemOff => return Ok(false),
		}

		let mut context = diagnostic.code.spec().context;
		if !self.header_errors {
			context.header = Some(false);
		}
		if !context.allows(in_math, in_header) {
			return Ok(false);
		}

		match diagnostic.severity() {
			Severity::Warning => self.counters.warnings += 1,
			Severity::Error => self.counters.errors += 1,
			Severity::Message => {}
		}

		self.out
			.write_all(self.format.render(&diagnostic).as_bytes())?;
		if let Some(printed) = &mut self.printed {
			printed.push(diagnostic);
		}

		Ok(true)
	}

	pub fn counters(&self) -> Counters {
		self.counters
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Every diagnostic printed so far, in emission order. Empty unless the
	/// emitter is [capturing](Emitter::capturing).
	pub fn printed(&self) -> &[Diagnostic] {
		self.printed.as_deref().unwrap_or_default()
	}

	pub fn flush(&mut self) -> TexCheckResult<()> {
		self.out.flush()?;
		Ok(())
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}
