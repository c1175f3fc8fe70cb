use crate::{Error, LineTag, Result};
use derive_more::Display;

/// One anchored edit. Content is always a list of lines; an empty list on `Replace` deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashlineEdit {
	/// Replaces `pos.line`, or the inclusive range `pos.line..=end.line` when `end` is set.
	Replace {
		pos: LineTag,
		end: Option<LineTag>,
		lines: Vec<String>,
	},
	/// Inserts after `pos.line`, or at end of file when `pos` is absent.
	Append { pos: Option<LineTag>, lines: Vec<String> },
	/// Inserts before `pos.line`, or at start of file when `pos` is absent.
	Prepend { pos: Option<LineTag>, lines: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum EditKind {
	#[display("replace")]
	Replace,
	#[display("append")]
	Append,
	#[display("prepend")]
	Prepend,
}

impl HashlineEdit {
	pub fn replace(pos: LineTag, lines: Vec<String>) -> Self {
		Self::Replace { pos, end: None, lines }
	}

	pub fn replace_range(pos: LineTag, end: LineTag, lines: Vec<String>) -> Self {
		Self::Replace {
			pos,
			end: Some(end),
			lines,
		}
	}

	pub fn append(pos: Option<LineTag>, lines: Vec<String>) -> Self {
		Self::Append { pos, lines }
	}

	pub fn prepend(pos: Option<LineTag>, lines: Vec<String>) -> Self {
		Self::Prepend { pos, lines }
	}

	pub fn kind(&self) -> EditKind {
		match self {
			Self::Replace { .. } => EditKind::Replace,
			Self::Append { .. } => EditKind::Append,
			Self::Prepend { .. } => EditKind::Prepend,
		}
	}

	pub fn lines(&self) -> &[String] {
		match self {
			Self::Replace { lines, .. } | Self::Append { lines, .. } | Self::Prepend { lines, .. } => lines,
		}
	}

	pub fn lines_mut(&mut self) -> &mut Vec<String> {
		match self {
			Self::Replace { lines, .. } | Self::Append { lines, .. } | Self::Prepend { lines, .. } => lines,
		}
	}

	/// The primary anchor, if any.
	pub fn pos(&self) -> Option<&LineTag> {
		match self {
			Self::Replace { pos, .. } => Some(pos),
			Self::Append { pos, .. } | Self::Prepend { pos, .. } => pos.as_ref(),
		}
	}

	/// Every anchor this edit references, in order.
	pub fn anchors(&self) -> Vec<&LineTag> {
		match self {
			Self::Replace { pos, end, .. } => std::iter::once(pos).chain(end.as_ref()).collect(),
			Self::Append { pos, .. } | Self::Prepend { pos, .. } => pos.iter().collect(),
		}
	}

	/// The location label used in no-op and warning messages (`LINE#HASH`, `EOF` or `BOF`).
	pub fn loc(&self) -> String {
		match self {
			Self::Replace { pos, end: None, .. } => pos.to_string(),
			Self::Replace {
				pos, end: Some(end), ..
			} => format!("{pos}-{end}"),
			Self::Append { pos, .. } => pos.as_ref().map(LineTag::to_string).unwrap_or_else(|| "EOF".to_string()),
			Self::Prepend { pos, .. } => pos.as_ref().map(LineTag::to_string).unwrap_or_else(|| "BOF".to_string()),
		}
	}

	/// Parses the compact single-line edit syntax:
	///
	/// - `LINE#ID:CONTENT` replace one line
	/// - `LINE#ID-LINE#ID:CONTENT` replace a range
	/// - `>+LINE#ID CONTENT` append after
	/// - `<+LINE#ID CONTENT` prepend before
	pub fn parse_compact(line: &str) -> Result<Self> {
		let line = line.trim();

		if let Some(stripped) = line.strip_prefix(">+") {
			let (tag, content) = split_tag_and_content(stripped.trim(), line)?;
			return Ok(Self::append(Some(tag), vec![content]));
		}

		if let Some(stripped) = line.strip_prefix("<+") {
			let (tag, content) = split_tag_and_content(stripped.trim(), line)?;
			return Ok(Self::prepend(Some(tag), vec![content]));
		}

		let Some(colon_idx) = line.find(':') else {
			return Err(Error::EditParse { line: line.to_string() });
		};
		let ref_part = line[..colon_idx].trim();
		let lines = vec![line[colon_idx + 1..].to_string()];

		match ref_part.split_once('-') {
			Some((first, last)) => Ok(Self::replace_range(LineTag::parse(first)?, LineTag::parse(last)?, lines)),
			None => Ok(Self::replace(LineTag::parse(ref_part)?, lines)),
		}
	}
}

// region:    --- Support

fn split_tag_and_content(rest: &str, full_line: &str) -> Result<(LineTag, String)> {
	let (ref_part, content) = rest.split_once(' ').ok_or_else(|| Error::EditParse {
		line: full_line.to_string(),
	})?;
	Ok((LineTag::parse(ref_part)?, content.to_string()))
}

// endregion: --- Support

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;

	#[test]
	fn test_hashline_edit_parse_compact_replace() -> Result<()> {
		// -- Exec
		let single = HashlineEdit::parse_compact("5#QQ:let x = 2;")?;
		let range = HashlineEdit::parse_compact("5#QQ-7#ZP:}")?;

		// -- Check
		assert_eq!(single, HashlineEdit::replace(LineTag::new(5, "QQ"), vec!["let x = 2;".into()]));
		assert_eq!(
			range,
			HashlineEdit::replace_range(LineTag::new(5, "QQ"), LineTag::new(7, "ZP"), vec!["}".into()])
		);

		Ok(())
	}

	#[test]
	fn test_hashline_edit_parse_compact_inserts() -> Result<()> {
		// -- Exec
		let append = HashlineEdit::parse_compact(">+3#HY // added")?;
		let prepend = HashlineEdit::parse_compact("<+1#ZZ use std::fmt;")?;

		// -- Check
		assert_eq!(append, HashlineEdit::append(Some(LineTag::new(3, "HY")), vec!["// added".into()]));
		assert_eq!(prepend, HashlineEdit::prepend(Some(LineTag::new(1, "ZZ")), vec!["use std::fmt;".into()]));

		Ok(())
	}

	#[test]
	fn test_hashline_edit_parse_compact_invalid() -> Result<()> {
		// -- Exec & Check
		assert!(matches!(HashlineEdit::parse_compact("no edit here"), Err(Error::EditParse { .. })));
		assert!(matches!(HashlineEdit::parse_compact(">+3#HY"), Err(Error::EditParse { .. })));

		Ok(())
	}

	#[test]
	fn test_hashline_edit_loc_and_anchors() -> Result<()> {
		// -- Setup & Fixtures
		let range = HashlineEdit::replace_range(LineTag::new(2, "QQ"), LineTag::new(4, "ZP"), vec![]);
		let eof = HashlineEdit::append(None, vec!["x".into()]);

		// -- Exec & Check
		assert_eq!(range.loc(), "2#QQ-4#ZP");
		assert_eq!(range.anchors().len(), 2);
		assert_eq!(eof.loc(), "EOF");
		assert!(eof.anchors().is_empty());
		assert_eq!(HashlineEdit::prepend(None, vec![]).loc(), "BOF");
		assert_eq!(EditKind::Prepend.to_string(), "prepend");

		Ok(())
	}
}

// endregion: --- Tests
