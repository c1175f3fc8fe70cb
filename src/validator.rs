use crate::{Error, HashMismatch, HashlineEdit, HashlineMismatch, LineTag, Result, compute_line_hash};

/// Checks every anchor of a batch against the same pre-batch snapshot.
///
/// Out-of-range lines and inverted ranges fail immediately. Hash mismatches are collected
/// across the whole batch and returned together as one [`Error::HashlineMismatch`].
/// A fresh batch whose edits touch the same lines fails with [`Error::OverlappingEdits`].
pub fn validate_edits(edits: &[HashlineEdit], file_lines: &[String]) -> Result<()> {
	let mut mismatches: Vec<HashMismatch> = Vec::new();

	for edit in edits {
		if let HashlineEdit::Replace { pos, end: Some(end), .. } = edit
			&& pos.line > end.line
		{
			return Err(Error::invalid_range(pos.line, end.line));
		}

		for tag in edit.anchors() {
			if let Some(mismatch) = check_tag(tag, file_lines)?
				&& !mismatches.contains(&mismatch)
			{
				mismatches.push(mismatch);
			}
		}
	}

	if mismatches.is_empty() {
		return check_overlaps(edits);
	}

	mismatches.sort_by_key(|m| m.line);
	tracing::debug!(count = mismatches.len(), "hashline validation found stale anchors");

	Err(HashlineMismatch::new(mismatches, file_lines.to_vec()).into())
}

/// Resolves one tag. `Ok(None)` means the line exists and its hash matches.
pub fn check_tag(tag: &LineTag, file_lines: &[String]) -> Result<Option<HashMismatch>> {
	if tag.line < 1 || tag.line > file_lines.len() {
		return Err(Error::line_out_of_range(tag.line, file_lines.len()));
	}

	let actual = compute_line_hash(&file_lines[tag.line - 1]);
	if actual == tag.hash {
		Ok(None)
	} else {
		Ok(Some(HashMismatch {
			line: tag.line,
			expected: tag.hash.clone(),
			actual: actual.to_string(),
		}))
	}
}

// region:    --- Support

fn check_overlaps(edits: &[HashlineEdit]) -> Result<()> {
	for (i, first) in edits.iter().enumerate() {
		for second in &edits[i + 1..] {
			// identical edits are collapsed later by dedupe
			if first != second && edits_overlap(first, second) {
				return Err(Error::overlapping_edits(first.loc(), second.loc()));
			}
		}
	}
	Ok(())
}

fn edits_overlap(a: &HashlineEdit, b: &HashlineEdit) -> bool {
	match (replaced_span(a), replaced_span(b)) {
		(Some((a_start, a_end)), Some((b_start, b_end))) => a_start <= b_end && b_start <= a_end,
		(Some(span), None) => lands_in_range(b, span),
		(None, Some(span)) => lands_in_range(a, span),
		(None, None) => false,
	}
}

fn replaced_span(edit: &HashlineEdit) -> Option<(usize, usize)> {
	match edit {
		HashlineEdit::Replace { pos, end, .. } => Some((pos.line, end.as_ref().map_or(pos.line, |end| end.line))),
		_ => None,
	}
}

/// True when an anchored insert would land among the lines a multi-line replace removes.
/// Inserts around a single-line replace are ordered by precedence instead.
fn lands_in_range(insert: &HashlineEdit, (start, end): (usize, usize)) -> bool {
	if start == end {
		return false;
	}
	match insert {
		HashlineEdit::Append { pos: Some(tag), .. } => start <= tag.line && tag.line <= end,
		HashlineEdit::Prepend { pos: Some(tag), .. } => start < tag.line && tag.line <= end,
		_ => false,
	}
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
