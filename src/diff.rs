use diffy::{DiffOptions as DiffyOptions, Line};

const DEFAULT_CONTEXT_LINES: usize = 4;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
	/// Unchanged lines kept on each side of a change.
	pub context_lines: usize,
}

impl Default for DiffOptions {
	fn default() -> Self {
		Self {
			context_lines: DEFAULT_CONTEXT_LINES,
		}
	}
}

impl DiffOptions {
	pub fn with_context_lines(mut self, context_lines: usize) -> Self {
		self.context_lines = context_lines;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
	pub diff: String,
	/// First 1-based line of the new content where a change occurs.
	pub first_changed_line: Option<usize>,
}

impl DiffResult {
	/// True when old and new content have no textual difference.
	pub fn is_unchanged(&self) -> bool {
		self.first_changed_line.is_none()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
	Equal,
	Delete,
	Insert,
}

/// Renders a line-numbered diff where long unchanged runs collapse to a `...` line.
///
/// Removed lines carry their old line number, added and context lines their new one.
pub fn generate_diff_string(old: &str, new: &str, options: &DiffOptions) -> DiffResult {
	if old == new {
		return DiffResult {
			diff: String::new(),
			first_changed_line: None,
		};
	}

	let width = line_number_width(old, new);
	let ops = full_line_diff(old, new);
	let context = options.context_lines;

	let mut out: Vec<String> = Vec::new();
	let mut first_changed_line = None;
	let (mut old_no, mut new_no) = (1usize, 1usize);

	let mut i = 0;
	while i < ops.len() {
		let (op, text) = (ops[i].0, ops[i].1.as_str());

		if op != Op::Equal {
			match op {
				Op::Delete => {
					first_changed_line.get_or_insert(new_no);
					out.push(format_line('-', old_no, width, text));
					old_no += 1;
				}
				_ => {
					first_changed_line.get_or_insert(new_no);
					out.push(format_line('+', new_no, width, text));
					new_no += 1;
				}
			}
			i += 1;
			continue;
		}

		// -- Unchanged run [i, j)
		let mut j = i;
		while j < ops.len() && ops[j].0 == Op::Equal {
			j += 1;
		}
		let run = &ops[i..j];
		let at_start = i == 0;
		let at_end = j == ops.len();

		let (head, tail) = match (at_start, at_end) {
			(true, _) => (0, context.min(run.len())),
			(false, true) => (context.min(run.len()), 0),
			(false, false) if run.len() > context * 2 => (context, context),
			(false, false) => (run.len(), 0),
		};

		for (k, (_, text)) in run.iter().enumerate().take(head) {
			out.push(format_line(' ', new_no + k, width, text));
		}
		if head + tail < run.len() {
			out.push(format!(" {:>width$} {ELLIPSIS}", ""));
		}
		for (k, (_, text)) in run.iter().enumerate().skip(run.len() - tail) {
			out.push(format_line(' ', new_no + k, width, text));
		}

		old_no += run.len();
		new_no += run.len();
		i = j;
	}

	DiffResult {
		diff: out.join("\n"),
		first_changed_line,
	}
}

/// Renders `@@ -old,len +new,len @@` hunks, each line numbered from its hunk start.
pub fn generate_unified_diff(old: &str, new: &str, options: &DiffOptions) -> DiffResult {
	if old == new {
		return DiffResult {
			diff: String::new(),
			first_changed_line: None,
		};
	}

	let width = line_number_width(old, new);
	let mut diffy_options = DiffyOptions::new();
	diffy_options.set_context_len(options.context_lines);
	let patch = diffy_options.create_patch(old, new);

	let mut out: Vec<String> = Vec::new();
	let mut first_changed_line = None;

	for hunk in patch.hunks() {
		let old_range = hunk.old_range();
		let new_range = hunk.new_range();
		out.push(format!(
			"@@ -{},{} +{},{} @@",
			old_range.start(),
			old_range.len(),
			new_range.start(),
			new_range.len()
		));

		let mut old_no = old_range.start().max(1);
		let mut new_no = new_range.start().max(1);
		for line in hunk.lines() {
			match line {
				Line::Context(text) => {
					out.push(format_line(' ', new_no, width, strip_eol(text)));
					old_no += 1;
					new_no += 1;
				}
				Line::Delete(text) => {
					first_changed_line.get_or_insert(new_no);
					out.push(format_line('-', old_no, width, strip_eol(text)));
					old_no += 1;
				}
				Line::Insert(text) => {
					first_changed_line.get_or_insert(new_no);
					out.push(format_line('+', new_no, width, strip_eol(text)));
					new_no += 1;
				}
			}
		}
	}

	DiffResult {
		diff: out.join("\n"),
		first_changed_line,
	}
}

// region:    --- Support

fn format_line(sign: char, line_no: usize, width: usize, text: &str) -> String {
	format!("{sign}{line_no:>width$} {text}")
}

fn line_number_width(old: &str, new: &str) -> usize {
	let max_lines = old.split('\n').count().max(new.split('\n').count());
	max_lines.to_string().len()
}

fn strip_eol(text: &str) -> &str {
	text.strip_suffix('\n').unwrap_or(text)
}

/// Line-level diff of the whole content, as one sequence of ops.
///
/// Uses a single hunk with context wider than either side, so every line appears once.
fn full_line_diff(old: &str, new: &str) -> Vec<(Op, String)> {
	let full_context = old.split('\n').count() + new.split('\n').count();
	let mut diffy_options = DiffyOptions::new();
	diffy_options.set_context_len(full_context);
	let patch = diffy_options.create_patch(old, new);

	patch
		.hunks()
		.iter()
		.flat_map(|hunk| hunk.lines().iter())
		.map(|line| match line {
			Line::Context(text) => (Op::Equal, strip_eol(text).to_string()),
			Line::Delete(text) => (Op::Delete, strip_eol(text).to_string()),
			Line::Insert(text) => (Op::Insert, strip_eol(text).to_string()),
		})
		.collect()
}

// endregion: --- Support

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;

	fn numbered(count: usize) -> String {
		(1..=count).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
	}

	fn ellipsis_count(diff: &str) -> usize {
		diff.lines().filter(|l| l.trim() == ELLIPSIS).count()
	}

	#[test]
	fn test_diff_collapsed_single_change_middle() -> Result<()> {
		// -- Setup & Fixtures
		let old = numbered(100);
		let new = old.replace("line 50\n", "line fifty\n");

		// -- Exec
		let res = generate_diff_string(&old, &new, &DiffOptions::default());

		// -- Check
		assert_eq!(ellipsis_count(&res.diff), 2);
		assert_eq!(res.first_changed_line, Some(50));
		let lines: Vec<&str> = res.diff.lines().collect();
		// ..., 4 context, -, +, 4 context, ...
		assert_eq!(lines.len(), 12);
		assert_eq!(lines[1], "  46 line 46");
		assert_eq!(lines[5], "- 50 line 50");
		assert_eq!(lines[6], "+ 50 line fifty");
		assert_eq!(lines[10], "  54 line 54");

		Ok(())
	}

	#[test]
	fn test_diff_collapsed_context_len() -> Result<()> {
		// -- Setup & Fixtures
		let old = numbered(30);
		let new = old.replace("line 10\n", "line ten\n");

		// -- Exec
		let res = generate_diff_string(&old, &new, &DiffOptions::default().with_context_lines(1));

		// -- Check
		let context_lines = res.diff.lines().filter(|l| l.starts_with(' ') && l.trim() != ELLIPSIS).count();
		assert_eq!(context_lines, 2);
		assert_eq!(ellipsis_count(&res.diff), 2);

		Ok(())
	}

	#[test]
	fn test_diff_collapsed_middle_run() -> Result<()> {
		// -- Setup & Fixtures
		let old = numbered(40);
		let new = old.replace("line 5\n", "line five\n").replace("line 35\n", "line thirty-five\n");

		// -- Exec
		let res = generate_diff_string(&old, &new, &DiffOptions::default());

		// -- Check
		// head: 4 lines, no elision; middle run of 29 elided once; tail: 4 lines then elision.
		assert_eq!(ellipsis_count(&res.diff), 2);
		assert_eq!(res.first_changed_line, Some(5));
		assert!(res.diff.starts_with("  1 line 1\n"));

		Ok(())
	}

	#[test]
	fn test_diff_collapsed_short_middle_run_kept() -> Result<()> {
		// -- Setup & Fixtures
		let old = "a\nb\nc\nd\ne";
		let new = "A\nb\nc\nd\nE";

		// -- Exec
		let res = generate_diff_string(old, new, &DiffOptions::default());

		// -- Check
		assert_eq!(ellipsis_count(&res.diff), 0);
		assert!(res.diff.contains(" 2 b\n 3 c\n 4 d"));

		Ok(())
	}

	#[test]
	fn test_diff_collapsed_unchanged() -> Result<()> {
		// -- Exec
		let res = generate_diff_string("same\n", "same\n", &DiffOptions::default());

		// -- Check
		assert!(res.is_unchanged());
		assert!(res.diff.is_empty());

		Ok(())
	}

	#[test]
	fn test_diff_collapsed_pure_delete_first_changed() -> Result<()> {
		// -- Exec
		let res = generate_diff_string("a\nb\nc\n", "a\nc\n", &DiffOptions::default());

		// -- Check
		assert_eq!(res.first_changed_line, Some(2));
		assert!(res.diff.contains("-2 b"));

		Ok(())
	}

	#[test]
	fn test_diff_unified_hunks() -> Result<()> {
		// -- Setup & Fixtures
		let old = numbered(40);
		let new = old.replace("line 5\n", "line five\n").replace("line 35\n", "line thirty-five\n");

		// -- Exec
		let res = generate_unified_diff(&old, &new, &DiffOptions::default().with_context_lines(2));

		// -- Check
		let headers: Vec<&str> = res.diff.lines().filter(|l| l.starts_with("@@")).collect();
		assert_eq!(headers, vec!["@@ -3,5 +3,5 @@", "@@ -33,5 +33,5 @@"]);
		assert!(res.diff.contains("- 5 line 5\n+ 5 line five"));
		assert!(res.diff.contains("\n 33 line 33\n"));
		assert_eq!(res.first_changed_line, Some(5));

		Ok(())
	}

	#[test]
	fn test_diff_full_line_ops() -> Result<()> {
		// -- Exec
		let ops = full_line_diff("a\nb\nc\n", "a\nB\nc\n");

		// -- Check
		let expected = vec![
			(Op::Equal, "a".to_string()),
			(Op::Delete, "b".to_string()),
			(Op::Insert, "B".to_string()),
			(Op::Equal, "c".to_string()),
		];
		assert_eq!(ops, expected);

		Ok(())
	}

	#[test]
	fn test_diff_unified_unchanged() -> Result<()> {
		// -- Exec
		let res = generate_unified_diff("x", "x", &DiffOptions::default());

		// -- Check
		assert!(res.is_unchanged());

		Ok(())
	}
}

// endregion: --- Tests
