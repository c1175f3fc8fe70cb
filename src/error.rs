use crate::{HashlineMismatch, NoopEdit};
use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
	#[from(String, &String, &str)]
	Custom(String),

	// -- Tag codec
	#[display("Invalid line reference \"{tag}\". Expected format \"LINE#ID\" (e.g. \"5#QQ\").")]
	InvalidLineTag { tag: String },

	#[display("Line number must be >= 1, got {line} in \"{tag}\".")]
	InvalidLineNumber { line: usize, tag: String },

	// -- Malformed requests
	#[display("Line {line} does not exist (file has {total} lines)")]
	LineOutOfRange { line: usize, total: usize },

	#[display("Range start line {start} must be <= end line {end}")]
	InvalidRange { start: usize, end: usize },

	#[display("Edits at {first} and {second} touch the same lines. Merge them into one edit.")]
	OverlappingEdits { first: String, second: String },

	#[display("Edit '{op}' requires at least one of 'pos' or 'end'")]
	EditMissingAnchor { op: String },

	#[display("Unknown edit op '{op}'. Expected one of: replace, append, prepend")]
	UnknownEditOp { op: String },

	#[display("Could not parse hashline edit: {line}")]
	EditParse { line: String },

	// -- Stale anchors
	#[from]
	HashlineMismatch(HashlineMismatch),

	// -- Apply
	#[display("No changes made to '{file_path}'. The edits produced content identical to the current file.")]
	ApplyNoChanges {
		file_path: String,
		noop_edits: Vec<NoopEdit>,
	},

	#[display("Path '{path}' is outside of base directory '{base_dir}'")]
	SecurityViolation { path: String, base_dir: String },

	#[display("File not found: '{path}'")]
	FileNotFound { path: String },

	#[display("Cannot write file '{path}'. Cause: {cause}")]
	IoWriteFile { path: String, cause: std::io::Error },

	#[display("Cannot delete file '{path}'. Cause: {cause}")]
	IoDeleteFile { path: String, cause: std::io::Error },

	// -- Text replace
	#[display("Could not find the text to replace. The file may have changed, re-read it and retry.")]
	TextNotFound,

	#[display("Found {occurrences} occurrences of the text to replace, add more context to make it unique:\n{}", previews.join("\n"))]
	TextAmbiguous { occurrences: usize, previews: Vec<String> },

	#[display("Closest match has confidence {confidence:.2} which is below the threshold {threshold:.2}:\n{closest}")]
	TextLowConfidence {
		confidence: f64,
		threshold: f64,
		closest: String,
	},

	// -- Externals
	#[from]
	Io(std::io::Error),

	#[from]
	SimpleFs(simple_fs::Error),

	#[from]
	SerdeJson(serde_json::Error),

	#[from]
	Utf8(std::string::FromUtf8Error),
}

// region:    --- Constructors

impl Error {
	pub fn invalid_line_tag(tag: impl Into<String>) -> Self {
		Self::InvalidLineTag { tag: tag.into() }
	}

	pub fn line_out_of_range(line: usize, total: usize) -> Self {
		Self::LineOutOfRange { line, total }
	}

	pub fn invalid_range(start: usize, end: usize) -> Self {
		Self::InvalidRange { start, end }
	}

	pub fn overlapping_edits(first: impl Into<String>, second: impl Into<String>) -> Self {
		Self::OverlappingEdits {
			first: first.into(),
			second: second.into(),
		}
	}

	pub fn edit_missing_anchor(op: impl Into<String>) -> Self {
		Self::EditMissingAnchor { op: op.into() }
	}

	pub fn apply_no_changes(file_path: impl Into<String>, noop_edits: Vec<NoopEdit>) -> Self {
		Self::ApplyNoChanges {
			file_path: file_path.into(),
			noop_edits,
		}
	}

	pub fn security_violation(path: impl Into<String>, base_dir: impl Into<String>) -> Self {
		Self::SecurityViolation {
			path: path.into(),
			base_dir: base_dir.into(),
		}
	}

	pub fn file_not_found(path: impl Into<String>) -> Self {
		Self::FileNotFound { path: path.into() }
	}

	pub fn io_write_file(path: impl Into<String>, cause: std::io::Error) -> Self {
		Self::IoWriteFile {
			path: path.into(),
			cause,
		}
	}

	pub fn io_delete_file(path: impl Into<String>, cause: std::io::Error) -> Self {
		Self::IoDeleteFile {
			path: path.into(),
			cause,
		}
	}

	pub fn simple_fs(err: simple_fs::Error) -> Self {
		Self::SimpleFs(err)
	}

	/// Returns the stale-anchor payload when this error is a hash mismatch.
	pub fn as_mismatch(&self) -> Option<&HashlineMismatch> {
		match self {
			Self::HashlineMismatch(mismatch) => Some(mismatch),
			_ => None,
		}
	}
}

// endregion: --- Constructors

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
