use once_cell::sync::Lazy;
use regex::Regex;
use std::hash::Hasher;
use twox_hash::XxHash32;

/// The 16 symbols a hash nibble maps to. Chosen to avoid digits and hex letters so a
/// tag hash can never be mistaken for a line number.
pub const NIBBLE_STR: &str = "ZPMQVRWSNKTXJBYH";

static DICT: Lazy<Vec<String>> = Lazy::new(|| {
	let nibbles: Vec<char> = NIBBLE_STR.chars().collect();
	(0..256usize)
		.map(|i| format!("{}{}", nibbles[(i >> 4) & 0x0f], nibbles[i & 0x0f]))
		.collect()
});

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Computes the 2-char content fingerprint of a line.
///
/// A trailing `\r` and all whitespace are ignored, so re-indenting a line keeps its hash.
pub fn compute_line_hash(line: &str) -> &'static str {
	let line = line.strip_suffix('\r').unwrap_or(line);
	let normalized = RE_WHITESPACE.replace_all(line, "");

	let mut hasher = XxHash32::with_seed(0);
	hasher.write(normalized.as_bytes());
	let hash = hasher.finish() as u32;

	DICT[(hash & 0xff) as usize].as_str()
}

/// Formats the `LINE#HASH` reference for a line.
pub fn format_line_tag(line: usize, content: &str) -> String {
	format!("{line}#{}", compute_line_hash(content))
}

/// Formats one `LINE#HASH:CONTENT` listing line.
pub fn format_hash_line(line: usize, content: &str) -> String {
	format!("{}:{content}", format_line_tag(line, content))
}

/// Formats a whole content as a hash-tagged listing, numbering from `start_line`.
///
/// Lines are split on `\n` exactly, so `""` yields one empty line and a trailing
/// newline yields a trailing empty line.
pub fn format_hash_lines(content: &str, start_line: usize) -> String {
	content
		.split('\n')
		.enumerate()
		.map(|(i, line)| format_hash_line(start_line + i, line))
		.collect::<Vec<_>>()
		.join("\n")
}

// region:    --- Whitespace Support

pub(crate) fn strip_all_whitespace(s: &str) -> String {
	RE_WHITESPACE.replace_all(s, "").to_string()
}

pub(crate) fn equals_ignoring_whitespace(a: &str, b: &str) -> bool {
	a == b || strip_all_whitespace(a) == strip_all_whitespace(b)
}

// endregion: --- Whitespace Support

// region:    --- Tests


// endregion: --- Tests
