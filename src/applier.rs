use crate::{HashlineEdit, IndexedEdit, NormalizationOptions, Result, dedupe_edits, normalize_edit, validate_edits};
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyHashlineResult {
	pub content: String,
	/// Lowest 1-based line touched in the resulting content.
	pub first_changed_line: Option<usize>,
	pub warnings: Vec<String>,
	pub noop_edits: Vec<NoopEdit>,
}

impl ApplyHashlineResult {
	fn unchanged(content: &str) -> Self {
		Self {
			content: content.to_string(),
			first_changed_line: None,
			warnings: Vec::new(),
			noop_edits: Vec::new(),
		}
	}
}

/// An edit that validated but would not have changed anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoopEdit {
	/// Index of the edit in the submitted batch.
	pub edit_index: usize,
	pub loc: String,
	pub current_content: String,
}

/// Splits content into the line array edits address. Plain `\n` split, so `""` is one empty line.
pub fn split_file_lines(content: &str) -> Vec<String> {
	content.split('\n').map(str::to_string).collect()
}

/// Validates, normalizes and applies a batch of edits to `content`.
///
/// The batch is atomic: any stale anchor fails the whole batch with
/// [`crate::Error::HashlineMismatch`] before anything is modified.
pub fn apply_hashline_edits(
	content: &str,
	edits: Vec<HashlineEdit>,
	options: &NormalizationOptions,
) -> Result<ApplyHashlineResult> {
	if edits.is_empty() {
		return Ok(ApplyHashlineResult::unchanged(content));
	}

	let original_lines = split_file_lines(content);
	validate_edits(&edits, &original_lines)?;

	let submitted = edits.len();
	let mut edits = dedupe_edits(edits);
	tracing::debug!(submitted, kept = edits.len(), lines = original_lines.len(), "applying hashline edits");

	let mut warnings = Vec::new();
	for indexed in edits.iter_mut() {
		warnings.extend(normalize_edit(&mut indexed.edit, &original_lines, options));
	}

	let mut annotated: Vec<AnnotatedEdit> = edits
		.into_iter()
		.map(|indexed| AnnotatedEdit::new(indexed, original_lines.len()))
		.collect();
	annotated.sort_by_key(AnnotatedEdit::sort_key);

	let mut file_lines = original_lines.clone();
	let mut first_changed_line: Option<usize> = None;
	let mut noop_edits = Vec::new();

	let mut track_first_changed = |line: usize| {
		if first_changed_line.is_none_or(|current| line < current) {
			first_changed_line = Some(line);
		}
	};

	for AnnotatedEdit { index, edit, .. } in annotated {
		let loc = edit.loc();
		match edit {
			HashlineEdit::Replace { pos, end, lines } => {
				let start = pos.line;
				let end_line = end.as_ref().map_or(start, |end| end.line);
				let orig_lines = &original_lines[start - 1..end_line];

				if orig_lines == lines.as_slice() {
					noop_edits.push(NoopEdit {
						edit_index: index,
						loc,
						current_content: orig_lines.join("\n"),
					});
					continue;
				}

				file_lines.splice(start - 1..end_line, lines);
				track_first_changed(start);
			}

			HashlineEdit::Append { pos, lines } => {
				let lines = blank_if_empty(lines);
				match pos {
					Some(tag) => {
						// a same-line replace may have shortened the file
						let at = tag.line.min(file_lines.len());
						file_lines.splice(at..at, lines);
						track_first_changed(at + 1);
					}
					None if is_empty_placeholder(&file_lines) => {
						file_lines.splice(0..1, lines);
						track_first_changed(1);
					}
					None => {
						let first_new = file_lines.len() + 1;
						file_lines.extend(lines);
						track_first_changed(first_new);
					}
				}
			}

			HashlineEdit::Prepend { pos, lines } => {
				let lines = blank_if_empty(lines);
				match pos {
					Some(tag) => {
						let at = (tag.line - 1).min(file_lines.len());
						file_lines.splice(at..at, lines);
						track_first_changed(at + 1);
					}
					None if is_empty_placeholder(&file_lines) => {
						file_lines.splice(0..1, lines);
						track_first_changed(1);
					}
					None => {
						file_lines.splice(0..0, lines);
						track_first_changed(1);
					}
				}
			}
		}
	}

	if !noop_edits.is_empty() {
		tracing::debug!(count = noop_edits.len(), "hashline edits with no effect");
	}

	Ok(ApplyHashlineResult {
		content: file_lines.join("\n"),
		first_changed_line,
		warnings,
		noop_edits,
	})
}

// region:    --- Ordering

/// Edit plus where it sits in the bottom-up application order.
#[derive(Debug)]
struct AnnotatedEdit {
	index: usize,
	edit: HashlineEdit,
	sort_line: usize,
	precedence: u8,
}

impl AnnotatedEdit {
	fn new(indexed: IndexedEdit, line_count: usize) -> Self {
		let IndexedEdit { index, edit } = indexed;
		let (sort_line, precedence) = match &edit {
			HashlineEdit::Replace { pos, end, .. } => (end.as_ref().unwrap_or(pos).line, 0),
			HashlineEdit::Append { pos, .. } => (pos.as_ref().map_or(line_count + 1, |tag| tag.line), 1),
			HashlineEdit::Prepend { pos, .. } => (pos.as_ref().map_or(0, |tag| tag.line), 2),
		};
		Self {
			index,
			edit,
			sort_line,
			precedence,
		}
	}

	/// Highest line first, then replace before append before prepend, then batch order.
	/// Each splice then lands below every line a later edit still addresses.
	fn sort_key(&self) -> (Reverse<usize>, u8, usize) {
		(Reverse(self.sort_line), self.precedence, self.index)
	}
}

// endregion: --- Ordering

// region:    --- Support

/// An empty insert means "insert a blank line", not "insert nothing".
fn blank_if_empty(lines: Vec<String>) -> Vec<String> {
	if lines.is_empty() { vec![String::new()] } else { lines }
}

fn is_empty_placeholder(file_lines: &[String]) -> bool {
	file_lines.len() == 1 && file_lines[0].is_empty()
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
