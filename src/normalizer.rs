//! Best-effort correction of the malformed edit shapes models commonly produce.
//!
//! Every correction is reported as a warning string. Nothing is changed silently.

use crate::{EditKind, HashlineEdit, equals_ignoring_whitespace};
use std::collections::HashSet;

const ESCAPED_TAB: &str = "\\t";

/// Toggles for the edit normalization heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationOptions {
	/// Drop a trailing range-replace line that re-types the line after the range.
	pub trim_boundary_echo: bool,
	/// Turn leading literal `\t` runs into real tabs when no real tab is present.
	pub fix_escaped_tabs: bool,
	/// Drop an append's first (or a prepend's last) line when it re-types the anchor line.
	pub strip_insert_anchor_echo: bool,
}

impl Default for NormalizationOptions {
	fn default() -> Self {
		Self {
			trim_boundary_echo: true,
			fix_escaped_tabs: true,
			strip_insert_anchor_echo: false,
		}
	}
}

impl NormalizationOptions {
	/// All heuristics off. Edits are applied exactly as given (deduplication still applies).
	pub fn disabled() -> Self {
		Self {
			trim_boundary_echo: false,
			fix_escaped_tabs: false,
			strip_insert_anchor_echo: false,
		}
	}

	pub fn with_trim_boundary_echo(mut self, value: bool) -> Self {
		self.trim_boundary_echo = value;
		self
	}

	pub fn with_fix_escaped_tabs(mut self, value: bool) -> Self {
		self.fix_escaped_tabs = value;
		self
	}

	pub fn with_strip_insert_anchor_echo(mut self, value: bool) -> Self {
		self.strip_insert_anchor_echo = value;
		self
	}
}

/// An edit paired with its index in the submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEdit {
	pub index: usize,
	pub edit: HashlineEdit,
}

/// Collapses edits with the same op, anchor lines and content to their first occurrence.
pub fn dedupe_edits(edits: Vec<HashlineEdit>) -> Vec<IndexedEdit> {
	let mut seen: HashSet<(EditKind, Option<usize>, Option<usize>, String)> = HashSet::new();
	let mut out = Vec::with_capacity(edits.len());

	for (index, edit) in edits.into_iter().enumerate() {
		let end_line = match &edit {
			HashlineEdit::Replace { end, .. } => end.as_ref().map(|tag| tag.line),
			_ => None,
		};
		let key = (
			edit.kind(),
			edit.pos().map(|tag| tag.line),
			end_line,
			edit.lines().join("\n"),
		);

		if seen.insert(key) {
			out.push(IndexedEdit { index, edit });
		} else {
			tracing::debug!(index, loc = %edit.loc(), "dropping duplicate hashline edit");
		}
	}

	out
}

/// Applies the enabled heuristics to one edit in place, returning the warnings produced.
///
/// `file_lines` must be the pre-batch snapshot the edit was validated against.
pub fn normalize_edit(edit: &mut HashlineEdit, file_lines: &[String], options: &NormalizationOptions) -> Vec<String> {
	let mut warnings = Vec::new();
	let loc = edit.loc();

	if options.fix_escaped_tabs
		&& let Some(count) = fix_escaped_tab_indent(edit.lines_mut())
	{
		warnings.push(format!(
			"Auto-corrected {loc}: converted literal \\t indentation to tabs on {count} line{}.",
			if count == 1 { "" } else { "s" }
		));
	}

	match edit {
		HashlineEdit::Replace {
			pos, end: Some(end), lines,
		} if options.trim_boundary_echo => {
			if let Some(removed) = trim_range_boundary_echo(file_lines, pos.line, end.line, lines) {
				warnings.push(format!(
					"Auto-corrected range replace {loc}: removed trailing replacement line \"{removed}\" that duplicated the line after the range."
				));
			}
		}
		HashlineEdit::Append { pos: Some(tag), lines } if options.strip_insert_anchor_echo => {
			let anchor = &file_lines[tag.line - 1];
			if lines.len() > 1 && equals_ignoring_whitespace(&lines[0], anchor) {
				let removed = lines.remove(0);
				warnings.push(format!(
					"Auto-corrected append {loc}: removed leading line \"{removed}\" that repeated the anchor line."
				));
			}
		}
		HashlineEdit::Prepend { pos: Some(tag), lines } if options.strip_insert_anchor_echo => {
			let anchor = &file_lines[tag.line - 1];
			if lines.len() > 1 && lines.last().is_some_and(|last| equals_ignoring_whitespace(last, anchor)) {
				let removed = lines.pop().unwrap_or_default();
				warnings.push(format!(
					"Auto-corrected prepend {loc}: removed trailing line \"{removed}\" that repeated the anchor line."
				));
			}
		}
		_ => {}
	}

	for warning in &warnings {
		tracing::warn!("{warning}");
	}

	warnings
}

// region:    --- Support

/// Drops the last replacement line when it echoes the line right after the range,
/// unless it also matches the range's own last line. Returns the dropped line.
fn trim_range_boundary_echo(
	file_lines: &[String],
	start_line: usize,
	end_line: usize,
	lines: &mut Vec<String>,
) -> Option<String> {
	debug_assert!(start_line <= end_line);
	let last = lines.last()?;
	let next_line = file_lines.get(end_line)?;
	let inside_line = &file_lines[end_line - 1];

	if equals_ignoring_whitespace(last, next_line) && !equals_ignoring_whitespace(last, inside_line) {
		lines.pop()
	} else {
		None
	}
}

/// Converts leading literal `\t` runs to tabs. Only acts when no line contains a real tab
/// and every non-empty line starts with at least one `\t`. Returns the converted line count.
fn fix_escaped_tab_indent(lines: &mut [String]) -> Option<usize> {
	if lines.iter().any(|line| line.contains('\t')) {
		return None;
	}

	let mut non_empty = lines.iter().filter(|line| !line.is_empty()).peekable();
	non_empty.peek()?;
	if !non_empty.all(|line| line.starts_with(ESCAPED_TAB)) {
		return None;
	}

	let mut count = 0;
	for line in lines.iter_mut().filter(|line| !line.is_empty()) {
		let mut rest = line.as_str();
		let mut depth = 0;
		while let Some(stripped) = rest.strip_prefix(ESCAPED_TAB) {
			rest = stripped;
			depth += 1;
		}
		*line = format!("{}{rest}", "\t".repeat(depth));
		count += 1;
	}

	Some(count)
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
