use crate::{Error, Result, compute_line_hash};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

// The hash is exactly two symbols: a third alphabet symbol makes the tag invalid.
static RE_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^\s*[>+-]*\s*(\d+)\s*#\s*([ZPMQVRWSNKTXJBYH]{2})(?:$|[^ZPMQVRWSNKTXJBYH])")
		.expect("tag regex is valid")
});

/// A `LINE#HASH` anchor: a 1-based line position plus the hash its content is expected to have.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineTag {
	pub line: usize,
	pub hash: String,
}

impl LineTag {
	pub fn new(line: usize, hash: impl Into<String>) -> Self {
		Self {
			line,
			hash: hash.into(),
		}
	}

	/// Builds the tag a line currently has.
	pub fn from_content(line: usize, content: &str) -> Self {
		Self::new(line, compute_line_hash(content))
	}

	/// Parses a tag, tolerating the `>>>`, `+`, `-` and whitespace decorations used in
	/// diff and mismatch displays. Anything after the hash (e.g. `:content`) is ignored.
	pub fn parse(tag: &str) -> Result<Self> {
		let caps = RE_TAG.captures(tag).ok_or_else(|| Error::invalid_line_tag(tag))?;

		let line = caps[1].parse::<usize>().map_err(|_| Error::invalid_line_tag(tag))?;
		if line < 1 {
			return Err(Error::InvalidLineNumber {
				line,
				tag: tag.to_string(),
			});
		}

		Ok(Self::new(line, &caps[2]))
	}

	/// True when the tag addresses an existing line whose current hash matches.
	pub fn is_valid_for(&self, file_lines: &[String]) -> bool {
		self.line >= 1
			&& self.line <= file_lines.len()
			&& compute_line_hash(&file_lines[self.line - 1]) == self.hash
	}
}

impl fmt::Display for LineTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}#{}", self.line, self.hash)
	}
}

impl FromStr for LineTag {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

/// Parses a `LINE#HASH` reference. See [`LineTag::parse`].
pub fn parse_tag(tag: &str) -> Result<LineTag> {
	LineTag::parse(tag)
}

// region:    --- Tests


// endregion: --- Tests
