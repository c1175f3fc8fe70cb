//! Incremental `LINE#HASH:CONTENT` listings for large inputs.
//!
//! Output is a sequence of newline-joined groups bounded by line count and byte size.
//! Joining the groups with `\n` gives exactly `format_hash_lines` of the whole input.

use crate::format_hash_line;
use std::collections::VecDeque;

const DEFAULT_MAX_CHUNK_LINES: usize = 200;
const DEFAULT_MAX_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashlineStreamOptions {
	pub start_line: usize,
	pub max_chunk_lines: usize,
	pub max_chunk_bytes: usize,
}

impl Default for HashlineStreamOptions {
	fn default() -> Self {
		Self {
			start_line: 1,
			max_chunk_lines: DEFAULT_MAX_CHUNK_LINES,
			max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
		}
	}
}

impl HashlineStreamOptions {
	pub fn with_start_line(mut self, start_line: usize) -> Self {
		self.start_line = start_line;
		self
	}

	pub fn with_max_chunk_lines(mut self, max_chunk_lines: usize) -> Self {
		self.max_chunk_lines = max_chunk_lines.max(1);
		self
	}

	pub fn with_max_chunk_bytes(mut self, max_chunk_bytes: usize) -> Self {
		self.max_chunk_bytes = max_chunk_bytes.max(1);
		self
	}
}

// region:    --- HashlineChunker

/// Formats lines one at a time and groups them into bounded chunks.
#[derive(Debug)]
pub struct HashlineChunker {
	line_num: usize,
	max_chunk_lines: usize,
	max_chunk_bytes: usize,
	out_lines: Vec<String>,
	out_bytes: usize,
	saw_any_line: bool,
	ready: VecDeque<String>,
}

impl HashlineChunker {
	pub fn new(options: &HashlineStreamOptions) -> Self {
		Self {
			line_num: options.start_line,
			max_chunk_lines: options.max_chunk_lines.max(1),
			max_chunk_bytes: options.max_chunk_bytes.max(1),
			out_lines: Vec::new(),
			out_bytes: 0,
			saw_any_line: false,
			ready: VecDeque::new(),
		}
	}

	pub fn push_line(&mut self, line: &str) {
		self.saw_any_line = true;
		let formatted = format_hash_line(self.line_num, line);
		self.line_num += 1;

		let sep_bytes = usize::from(!self.out_lines.is_empty());
		if !self.out_lines.is_empty()
			&& (self.out_lines.len() >= self.max_chunk_lines
				|| self.out_bytes + sep_bytes + formatted.len() > self.max_chunk_bytes)
		{
			self.flush();
		}

		self.out_bytes += usize::from(!self.out_lines.is_empty()) + formatted.len();
		self.out_lines.push(formatted);

		if self.out_lines.len() >= self.max_chunk_lines || self.out_bytes >= self.max_chunk_bytes {
			self.flush();
		}
	}

	/// Flushes what is left. A source that produced no line at all still yields one empty line.
	pub fn finish(&mut self) {
		if !self.saw_any_line {
			self.push_line("");
		}
		self.flush();
	}

	pub fn pop_ready(&mut self) -> Option<String> {
		self.ready.pop_front()
	}

	fn flush(&mut self) {
		if self.out_lines.is_empty() {
			return;
		}
		let chunk = self.out_lines.join("\n");
		tracing::trace!(lines = self.out_lines.len(), bytes = chunk.len(), "hashline chunk ready");
		self.ready.push_back(chunk);
		self.out_lines.clear();
		self.out_bytes = 0;
	}
}

// endregion: --- HashlineChunker

// region:    --- Decoding

/// Decodes UTF-8 fed in arbitrary byte chunks.
///
/// Sequences split across chunks are carried over. Invalid bytes decode to U+FFFD,
/// the same way `String::from_utf8_lossy` would on the whole input.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
	pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, bytes: &[u8]) -> String {
		self.pending.extend_from_slice(bytes);

		let mut out = String::new();
		let mut start = 0;
		loop {
			match std::str::from_utf8(&self.pending[start..]) {
				Ok(valid) => {
					out.push_str(valid);
					start = self.pending.len();
					break;
				}
				Err(err) => {
					let valid_end = start + err.valid_up_to();
					out.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
					match err.error_len() {
						Some(len) => {
							out.push(char::REPLACEMENT_CHARACTER);
							start = valid_end + len;
						}
						// Incomplete sequence at the end, wait for more bytes.
						None => {
							start = valid_end;
							break;
						}
					}
				}
			}
		}

		self.pending.drain(..start);
		out
	}

	/// Decodes whatever is still pending (a truncated sequence becomes U+FFFD).
	pub fn finish(&mut self) -> String {
		let rest = String::from_utf8_lossy(&self.pending).into_owned();
		self.pending.clear();
		rest
	}
}

/// Splits text fed in pieces on `\n`, with the same results as `str::split('\n')` on the whole.
#[derive(Debug, Default)]
pub struct LineSplitter {
	partial: String,
}

impl LineSplitter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the lines completed by `text`.
	pub fn push_str(&mut self, text: &str) -> Vec<String> {
		let mut lines = Vec::new();
		let mut rest = text;
		while let Some(idx) = rest.find('\n') {
			self.partial.push_str(&rest[..idx]);
			lines.push(std::mem::take(&mut self.partial));
			rest = &rest[idx + 1..];
		}
		self.partial.push_str(rest);
		lines
	}

	/// The final line. Always present, possibly empty (input ending in `\n` or empty input).
	pub fn finish(&mut self) -> String {
		std::mem::take(&mut self.partial)
	}
}

// endregion: --- Decoding

// region:    --- Iterators

/// Lazy iterator of formatted chunks over a line source.
pub struct HashLineChunks<I> {
	lines: I,
	chunker: HashlineChunker,
	finished: bool,
}

impl<I, S> Iterator for HashLineChunks<I>
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
	type Item = String;

	fn next(&mut self) -> Option<String> {
		loop {
			if let Some(chunk) = self.chunker.pop_ready() {
				return Some(chunk);
			}
			if self.finished {
				return None;
			}
			match self.lines.next() {
				Some(line) => self.chunker.push_line(line.as_ref()),
				None => {
					self.chunker.finish();
					self.finished = true;
				}
			}
		}
	}
}

/// Lazy iterator of lines decoded from UTF-8 byte chunks.
pub struct Utf8Lines<I> {
	chunks: I,
	decoder: Utf8ChunkDecoder,
	splitter: LineSplitter,
	pending: VecDeque<String>,
	exhausted: bool,
}

impl<I> Utf8Lines<I> {
	pub fn new(chunks: I) -> Self {
		Self {
			chunks,
			decoder: Utf8ChunkDecoder::new(),
			splitter: LineSplitter::new(),
			pending: VecDeque::new(),
			exhausted: false,
		}
	}
}

impl<I, B> Iterator for Utf8Lines<I>
where
	I: Iterator<Item = B>,
	B: AsRef<[u8]>,
{
	type Item = String;

	fn next(&mut self) -> Option<String> {
		loop {
			if let Some(line) = self.pending.pop_front() {
				return Some(line);
			}
			if self.exhausted {
				return None;
			}
			match self.chunks.next() {
				Some(bytes) => {
					let text = self.decoder.push(bytes.as_ref());
					self.pending.extend(self.splitter.push_str(&text));
				}
				None => {
					let text = self.decoder.finish();
					self.pending.extend(self.splitter.push_str(&text));
					self.pending.push_back(self.splitter.finish());
					self.exhausted = true;
				}
			}
		}
	}
}

/// Streams a listing from pre-split lines. An empty source yields one empty line.
pub fn stream_hash_lines_from_lines<I, S>(lines: I, options: HashlineStreamOptions) -> HashLineChunks<I::IntoIter>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	HashLineChunks {
		lines: lines.into_iter(),
		chunker: HashlineChunker::new(&options),
		finished: false,
	}
}

/// Streams a listing from UTF-8 byte chunks, as they arrive.
pub fn stream_hash_lines_from_chunks<I, B>(
	chunks: I,
	options: HashlineStreamOptions,
) -> HashLineChunks<Utf8Lines<I::IntoIter>>
where
	I: IntoIterator<Item = B>,
	B: AsRef<[u8]>,
{
	stream_hash_lines_from_lines(Utf8Lines::new(chunks.into_iter()), options)
}

/// Streams a listing from a byte buffer held in memory.
pub fn stream_hash_lines_from_utf8(
	source: &[u8],
	options: HashlineStreamOptions,
) -> HashLineChunks<Utf8Lines<std::iter::Once<&[u8]>>> {
	stream_hash_lines_from_chunks(std::iter::once(source), options)
}

// endregion: --- Iterators

// region:    --- Tests


// endregion: --- Tests
