use crate::format_line_tag;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Lines of context shown above and below each stale line.
pub const MISMATCH_CONTEXT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMismatch {
	pub line: usize,
	pub expected: String,
	pub actual: String,
}

impl HashMismatch {
	pub fn stale_tag(&self) -> String {
		format!("{}#{}", self.line, self.expected)
	}

	pub fn current_tag(&self) -> String {
		format!("{}#{}", self.line, self.actual)
	}
}

/// Every stale anchor of a batch, plus the file snapshot they were checked against.
///
/// `Display` renders the grep-style report shown to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashlineMismatch {
	pub mismatches: Vec<HashMismatch>,
	pub file_lines: Vec<String>,
}

impl HashlineMismatch {
	pub fn new(mismatches: Vec<HashMismatch>, file_lines: Vec<String>) -> Self {
		Self { mismatches, file_lines }
	}

	/// Maps each stale `LINE#HASH` to the tag the line has now.
	pub fn remaps(&self) -> HashMap<String, String> {
		self.mismatches.iter().map(|m| (m.stale_tag(), m.current_tag())).collect()
	}

	/// The 1-based line numbers displayed in the report, ascending.
	pub fn display_lines(&self) -> Vec<usize> {
		let total = self.file_lines.len();
		let mut lines = BTreeSet::new();
		for m in &self.mismatches {
			let lo = m.line.saturating_sub(MISMATCH_CONTEXT).max(1);
			let hi = (m.line + MISMATCH_CONTEXT).min(total);
			lines.extend(lo..=hi);
		}
		lines.into_iter().collect()
	}

	fn changed_line_count(&self) -> usize {
		self.mismatches.iter().map(|m| m.line).collect::<HashSet<_>>().len()
	}
}

impl fmt::Display for HashlineMismatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let stale_lines: HashSet<usize> = self.mismatches.iter().map(|m| m.line).collect();
		let count = self.changed_line_count();

		writeln!(
			f,
			"{count} line{} changed since last read. Use the updated LINE#ID references shown below (>>> marks changed lines).",
			if count > 1 { "s have" } else { " has" }
		)?;
		writeln!(f)?;

		let mut prev_line: Option<usize> = None;
		for line_num in self.display_lines() {
			if prev_line.is_some_and(|prev| line_num > prev + 1) {
				writeln!(f, "    ...")?;
			}
			prev_line = Some(line_num);

			let content = &self.file_lines[line_num - 1];
			let prefix = if stale_lines.contains(&line_num) { ">>>" } else { "   " };
			writeln!(f, "{prefix} {}:{content}", format_line_tag(line_num, content))?;
		}

		Ok(())
	}
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;
	use crate::compute_line_hash;

	fn make_lines(count: usize) -> Vec<String> {
		(1..=count).map(|i| format!("line {i}")).collect()
	}

	fn stale(line: usize, file_lines: &[String]) -> HashMismatch {
		let actual = compute_line_hash(&file_lines[line - 1]).to_string();
		let expected = if actual == "ZZ" { "PP" } else { "ZZ" }.to_string();
		HashMismatch { line, expected, actual }
	}

	#[test]
	fn test_mismatch_display_windows() -> Result<()> {
		// -- Setup & Fixtures
		let file_lines = make_lines(20);
		let report = HashlineMismatch::new(vec![stale(3, &file_lines), stale(15, &file_lines)], file_lines.clone());

		// -- Exec
		let display_lines = report.display_lines();
		let text = report.to_string();

		// -- Check
		assert_eq!(display_lines, vec![1, 2, 3, 4, 5, 13, 14, 15, 16, 17]);
		assert!(text.starts_with("2 lines have changed since last read."));
		assert_eq!(text.matches("    ...\n").count(), 1);
		assert!(text.contains(&format!(">>> {}:line 3\n", format_line_tag(3, "line 3"))));
		assert!(text.contains(&format!("    {}:line 4\n", format_line_tag(4, "line 4"))));
		assert_eq!(text.matches(">>>").count(), 2);

		Ok(())
	}

	#[test]
	fn test_mismatch_display_overlapping_windows_merge() -> Result<()> {
		// -- Setup & Fixtures
		let file_lines = make_lines(10);
		let report = HashlineMismatch::new(vec![stale(4, &file_lines), stale(6, &file_lines)], file_lines.clone());

		// -- Exec
		let text = report.to_string();

		// -- Check
		assert_eq!(report.display_lines(), vec![2, 3, 4, 5, 6, 7, 8]);
		assert!(!text.contains("..."));

		Ok(())
	}

	#[test]
	fn test_mismatch_single_line_header_and_clamp() -> Result<()> {
		// -- Setup & Fixtures
		let file_lines = make_lines(2);
		let report = HashlineMismatch::new(vec![stale(1, &file_lines)], file_lines.clone());

		// -- Exec
		let text = report.to_string();

		// -- Check
		assert!(text.starts_with("1 line has changed since last read."));
		assert_eq!(report.display_lines(), vec![1, 2]);

		Ok(())
	}

	#[test]
	fn test_mismatch_remaps() -> Result<()> {
		// -- Setup & Fixtures
		let file_lines = make_lines(5);
		let m = stale(2, &file_lines);
		let report = HashlineMismatch::new(vec![m.clone()], file_lines.clone());

		// -- Exec
		let remaps = report.remaps();

		// -- Check
		assert_eq!(remaps.len(), 1);
		assert_eq!(remaps.get(&m.stale_tag()), Some(&format_line_tag(2, "line 2")));

		Ok(())
	}
}

// endregion: --- Tests
