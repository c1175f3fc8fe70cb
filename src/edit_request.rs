use crate::{Error, HashlineEdit, LineTag, Result};
use serde::Deserialize;

/// An edit as sent by a tool caller, before anchors are parsed.
///
/// ```json
/// { "op": "replace", "pos": "5#QQ", "end": "7#ZP", "lines": ["..."] }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EditRequest {
	pub op: String,
	#[serde(default)]
	pub pos: Option<String>,
	#[serde(default)]
	pub end: Option<String>,
	#[serde(default)]
	pub lines: Option<EditLines>,
}

/// `lines` accepts an array or a single string. A single string is one line; splitting
/// multi-line strings is up to the caller.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EditLines {
	Many(Vec<String>),
	One(String),
}

impl From<EditLines> for Vec<String> {
	fn from(lines: EditLines) -> Self {
		match lines {
			EditLines::Many(lines) => lines,
			EditLines::One(line) => vec![line],
		}
	}
}

impl EditRequest {
	pub fn new(op: impl Into<String>, pos: Option<&str>, end: Option<&str>, lines: Vec<String>) -> Self {
		Self {
			op: op.into(),
			pos: pos.map(str::to_string),
			end: end.map(str::to_string),
			lines: Some(EditLines::Many(lines)),
		}
	}

	/// Resolves this request into a typed edit.
	///
	/// For `replace`, a lone `end` is used as the anchor. Blank anchor strings count as absent.
	pub fn into_edit(self) -> Result<HashlineEdit> {
		let pos = parse_optional_tag(self.pos.as_deref())?;
		let end = parse_optional_tag(self.end.as_deref())?;
		let lines: Vec<String> = self.lines.map(Vec::from).unwrap_or_default();

		match self.op.trim().to_ascii_lowercase().as_str() {
			"replace" => match (pos, end) {
				(Some(pos), end) => Ok(HashlineEdit::Replace { pos, end, lines }),
				(None, Some(end)) => Ok(HashlineEdit::replace(end, lines)),
				(None, None) => Err(Error::edit_missing_anchor(self.op)),
			},
			"append" => Ok(HashlineEdit::append(pos, lines)),
			"prepend" => Ok(HashlineEdit::prepend(pos, lines)),
			_ => Err(Error::UnknownEditOp { op: self.op }),
		}
	}
}

/// Parses a JSON array of edit requests.
pub fn parse_edit_requests(json: &str) -> Result<Vec<EditRequest>> {
	Ok(serde_json::from_str(json)?)
}

/// Resolves every request, failing on the first malformed one.
pub fn resolve_edit_requests(requests: Vec<EditRequest>) -> Result<Vec<HashlineEdit>> {
	requests.into_iter().map(EditRequest::into_edit).collect()
}

// region:    --- Support

fn parse_optional_tag(tag: Option<&str>) -> Result<Option<LineTag>> {
	match tag.map(str::trim) {
		Some(tag) if !tag.is_empty() => Ok(Some(LineTag::parse(tag)?)),
		_ => Ok(None),
	}
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
