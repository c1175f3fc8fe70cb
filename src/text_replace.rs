//! Free-text (non-anchored) replace edits.
//!
//! Locating the text is delegated to a [`TextMatcher`]. The crate ships [`ExactMatcher`];
//! approximate matchers plug in through the same trait.

use crate::{DiffOptions, DiffResult, Error, Result, generate_diff_string};

const BOM: char = '\u{FEFF}';
const MAX_PREVIEWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
	pub allow_fuzzy: bool,
	/// Minimum confidence (0.0..=1.0) for a fuzzy match to be accepted.
	pub threshold: f64,
}

impl Default for MatchOptions {
	fn default() -> Self {
		Self {
			allow_fuzzy: true,
			threshold: 0.95,
		}
	}
}

/// What a matcher found for a needle. Offsets are byte offsets into the haystack.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
	/// One exact match, or one fuzzy match at or above the threshold.
	Unique { start: usize, end: usize, confidence: f64 },
	/// Best candidate, below the threshold.
	Closest { start: usize, end: usize, confidence: f64 },
	Multiple { occurrences: usize, previews: Vec<String> },
	NotFound,
}

/// The text search service a free-text replace depends on.
pub trait TextMatcher {
	/// `haystack` and `needle` are already LF-normalized.
	fn find(&self, haystack: &str, needle: &str, options: &MatchOptions) -> MatchOutcome;
}

/// Exact substring matching only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl TextMatcher for ExactMatcher {
	fn find(&self, haystack: &str, needle: &str, _options: &MatchOptions) -> MatchOutcome {
		if needle.is_empty() {
			return MatchOutcome::NotFound;
		}

		let starts: Vec<usize> = haystack.match_indices(needle).map(|(idx, _)| idx).collect();
		match starts.as_slice() {
			[] => MatchOutcome::NotFound,
			[start] => MatchOutcome::Unique {
				start: *start,
				end: start + needle.len(),
				confidence: 1.0,
			},
			_ => MatchOutcome::Multiple {
				occurrences: starts.len(),
				previews: starts.iter().take(MAX_PREVIEWS).map(|idx| preview_at(haystack, *idx)).collect(),
			},
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct ReplaceTextOptions {
	pub match_options: MatchOptions,
	/// Replace every exact occurrence instead of requiring a unique match.
	pub all: bool,
	pub diff: DiffOptions,
}

impl ReplaceTextOptions {
	pub fn with_all(mut self, all: bool) -> Self {
		self.all = all;
		self
	}

	pub fn with_match_options(mut self, match_options: MatchOptions) -> Self {
		self.match_options = match_options;
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceTextResult {
	pub content: String,
	pub replacements: usize,
	pub diff: DiffResult,
}

/// Replaces `old_text` with `new_text` in `content`.
///
/// Line endings and a leading BOM are normalized for matching and restored in the output.
pub fn replace_text(
	content: &str,
	old_text: &str,
	new_text: &str,
	matcher: &dyn TextMatcher,
	options: &ReplaceTextOptions,
) -> Result<ReplaceTextResult> {
	let (bom, body) = match content.strip_prefix(BOM) {
		Some(body) => (true, body),
		None => (false, content),
	};
	let crlf = body.contains("\r\n");
	let haystack = body.replace("\r\n", "\n");
	let needle = old_text.replace("\r\n", "\n");
	let replacement = new_text.replace("\r\n", "\n");

	let (new_body, replacements) = if options.all {
		let count = haystack.matches(needle.as_str()).count();
		if needle.is_empty() || count == 0 {
			return Err(Error::TextNotFound);
		}
		(haystack.replace(needle.as_str(), &replacement), count)
	} else {
		match matcher.find(&haystack, &needle, &options.match_options) {
			MatchOutcome::Unique { start, end, confidence } => {
				if confidence < 1.0 {
					tracing::debug!(confidence, "free-text replace used a fuzzy match");
				}
				let mut out = String::with_capacity(haystack.len() + replacement.len());
				out.push_str(&haystack[..start]);
				out.push_str(&replacement);
				out.push_str(&haystack[end..]);
				(out, 1)
			}
			MatchOutcome::Closest { start, end, confidence } => {
				return Err(Error::TextLowConfidence {
					confidence,
					threshold: options.match_options.threshold,
					closest: haystack[start..end].to_string(),
				});
			}
			MatchOutcome::Multiple { occurrences, previews } => {
				return Err(Error::TextAmbiguous { occurrences, previews });
			}
			MatchOutcome::NotFound => return Err(Error::TextNotFound),
		}
	};

	let diff = generate_diff_string(&haystack, &new_body, &options.diff);

	let mut new_content = if crlf { new_body.replace('\n', "\r\n") } else { new_body };
	if bom {
		new_content.insert(0, BOM);
	}

	Ok(ReplaceTextResult {
		content: new_content,
		replacements,
		diff,
	})
}

// region:    --- Support

fn preview_at(haystack: &str, idx: usize) -> String {
	let line_no = haystack[..idx].matches('\n').count() + 1;
	let line_start = haystack[..idx].rfind('\n').map_or(0, |i| i + 1);
	let line = haystack[line_start..].lines().next().unwrap_or_default();
	format!("  line {line_no}: {}", line.trim())
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
