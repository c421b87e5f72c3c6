use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use tracing::debug;

use crate::DEFAULT_INCLUDE_PATTERNS;
use crate::TexCheckConfig;
use crate::TexCheckError;
use crate::TexCheckResult;

/// How directories given on the command line are expanded into documents.
#[derive(Debug, Clone)]
pub struct SourceOptions {
	/// Glob patterns, relative to the walked directory, a document must match.
	pub include: Vec<String>,
	/// Gitignore-style patterns for files and directories to skip.
	pub exclude: Vec<String>,
}

impl Default for SourceOptions {
	fn default() -> Self {
		Self {
			include: DEFAULT_INCLUDE_PATTERNS
				.iter()
				.map(ToString::to_string)
				.collect(),
			exclude: Vec::new(),
		}
	}
}

impl From<&TexCheckConfig> for SourceOptions {
	fn from(config: &TexCheckConfig) -> Self {
		Self {
			include: config.include_patterns(),
			exclude: config.exclude.patterns.clone(),
		}
	}
}

/// Expand `paths` into the documents to check.
///
/// Files are taken as given, even when they don't match the include
/// patterns. Directories are walked recursively, skipping hidden
/// directories, and contribute every file matching the include patterns that
/// the exclude patterns don't reject. Each directory's documents are sorted.
pub fn collect_sources(paths: &[PathBuf], options: &SourceOptions) -> TexCheckResult<Vec<PathBuf>> {
	let include = build_glob_set(&options.include)?;
	let mut sources = Vec::new();

	for path in paths {
		if !path.is_dir() {
			sources.push(path.clone());
			continue;
		}

		let exclude = build_exclude_matcher(path, &options.exclude)?;
		let mut found = Vec::new();
		let mut visited = HashSet::new();
		walk_dir(path, path, &include, &exclude, &mut found, &mut visited)?;
		found.sort();
		debug!(root = %path.display(), documents = found.len(), "collected documents");
		sources.extend(found);
	}

	Ok(sources)
}

fn build_glob_set(patterns: &[String]) -> TexCheckResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			TexCheckError::InvalidIncludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}
	builder.build().map_err(|e| {
		TexCheckError::InvalidIncludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> TexCheckResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			TexCheckError::InvalidExcludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}
	builder.build().map_err(|e| {
		TexCheckError::InvalidExcludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

fn is_hidden(path: &Path) -> bool {
	path.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.starts_with('.'))
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	include: &GlobSet,
	exclude: &Gitignore,
	files: &mut Vec<PathBuf>,
	visited: &mut HashSet<PathBuf>,
) -> TexCheckResult<()> {
	// Symlinked directories can loop back on themselves.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited.insert(canonical) {
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			if !is_hidden(&path) {
				walk_dir(root, &path, include, exclude, files, visited)?;
			}
			continue;
		}

		let relative = path.strip_prefix(root).unwrap_or(&path);
		if include.is_match(relative) {
			files.push(path);
		}
	}

	Ok(())
}
