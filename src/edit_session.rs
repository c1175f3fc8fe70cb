//! One-call edit entry points: requests in, new content and a diff out.

use crate::{
	DiffOptions, DiffResult, EditRequest, Error, FileStore, HashlineEdit, NoopEdit, NormalizationOptions, Result,
	apply_hashline_edits, generate_diff_string, resolve_edit_requests,
};

#[derive(Debug, Clone, Default)]
pub struct EditSessionOptions {
	pub normalization: NormalizationOptions,
	pub diff: DiffOptions,
}

impl EditSessionOptions {
	pub fn with_normalization(mut self, normalization: NormalizationOptions) -> Self {
		self.normalization = normalization;
		self
	}

	pub fn with_diff(mut self, diff: DiffOptions) -> Self {
		self.diff = diff;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
	pub file_path: String,
	pub content: String,
	pub diff: DiffResult,
	pub first_changed_line: Option<usize>,
	pub warnings: Vec<String>,
	pub noop_edits: Vec<NoopEdit>,
}

impl EditOutcome {
	/// Text handed back to the agent after a successful edit.
	pub fn report(&self) -> String {
		let mut out = format!("Updated {}", self.file_path);
		if let Some(line) = self.first_changed_line {
			out.push_str(&format!(" (first change at line {line})"));
		}
		out.push('\n');

		if !self.warnings.is_empty() {
			out.push_str("\nWarnings:\n");
			for warning in &self.warnings {
				out.push_str(&format!("- {warning}\n"));
			}
		}

		if !self.noop_edits.is_empty() {
			out.push_str("\nEdits with no effect:\n");
			for noop in &self.noop_edits {
				out.push_str(&format!("- edit {} at {} already matches the file\n", noop.edit_index, noop.loc));
			}
		}

		out.push_str("\n<diff>\n");
		out.push_str(&self.diff.diff);
		if !self.diff.diff.is_empty() && !self.diff.diff.ends_with('\n') {
			out.push('\n');
		}
		out.push_str("</diff>");
		out
	}
}

/// Resolves raw edit requests and applies them to `original`.
///
/// A batch that leaves the content unchanged fails with [`Error::ApplyNoChanges`].
pub fn apply_edit_requests(
	file_path: &str,
	original: &str,
	requests: Vec<EditRequest>,
	options: &EditSessionOptions,
) -> Result<EditOutcome> {
	let edits = resolve_edit_requests(requests)?;
	apply_edits(file_path, original, edits, options)
}

/// Applies already-resolved edits to `original`. Same contract as [`apply_edit_requests`].
pub fn apply_edits(
	file_path: &str,
	original: &str,
	edits: Vec<HashlineEdit>,
	options: &EditSessionOptions,
) -> Result<EditOutcome> {
	let applied = apply_hashline_edits(original, edits, &options.normalization)?;

	if applied.content == original {
		return Err(Error::apply_no_changes(file_path, applied.noop_edits));
	}

	let diff = generate_diff_string(original, &applied.content, &options.diff);

	Ok(EditOutcome {
		file_path: file_path.to_string(),
		content: applied.content,
		diff,
		first_changed_line: applied.first_changed_line,
		warnings: applied.warnings,
		noop_edits: applied.noop_edits,
	})
}

/// Reads `path` from `store`, applies `requests`, and writes the result back.
///
/// A missing file is only accepted when every edit is an anchorless append/prepend,
/// in which case it is created.
pub fn edit_file(
	store: &dyn FileStore,
	path: &str,
	requests: Vec<EditRequest>,
	options: &EditSessionOptions,
) -> Result<EditOutcome> {
	let edits = resolve_edit_requests(requests)?;

	let original = if store.exists(path)? {
		store.read(path)?
	} else if edits.iter().all(|edit| edit.anchors().is_empty()) {
		tracing::debug!(path, "creating file from anchorless inserts");
		String::new()
	} else {
		return Err(Error::file_not_found(path));
	};

	let outcome = apply_edits(path, &original, edits, options)?;
	store.write(path, &outcome.content)?;

	Ok(outcome)
}

// region:    --- Tests


// endregion: --- Tests
