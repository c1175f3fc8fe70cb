//! `futures::Stream` adapters over the hashline chunker.
//!
//! The source is only polled when the consumer asks for the next chunk. Dropping the
//! returned stream drops the source, and a source error ends the stream after it is yielded.

use crate::{Error, HashlineChunker, HashlineStreamOptions, LineSplitter, Result, Utf8ChunkDecoder};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

/// Streams a listing from an async source of pre-split lines.
pub fn stream_hash_lines_from_line_stream<S, L>(source: S, options: HashlineStreamOptions) -> impl Stream<Item = String>
where
	S: Stream<Item = L>,
	L: AsRef<str>,
{
	let state = LineStreamState {
		source: Box::pin(source),
		chunker: HashlineChunker::new(&options),
		finished: false,
	};

	stream::unfold(state, |mut state| async move {
		loop {
			if let Some(chunk) = state.chunker.pop_ready() {
				return Some((chunk, state));
			}
			if state.finished {
				return None;
			}
			match state.source.next().await {
				Some(line) => state.chunker.push_line(line.as_ref()),
				None => {
					state.chunker.finish();
					state.finished = true;
				}
			}
		}
	})
}

/// Streams a listing from an async source of UTF-8 byte chunks (e.g. a file or socket reader).
pub fn stream_hash_lines_from_byte_stream<S, B, E>(
	source: S,
	options: HashlineStreamOptions,
) -> impl Stream<Item = Result<String>>
where
	S: Stream<Item = core::result::Result<B, E>>,
	B: AsRef<[u8]>,
	E: Into<Error>,
{
	let state = ByteStreamState {
		source: Box::pin(source),
		decoder: Utf8ChunkDecoder::new(),
		splitter: LineSplitter::new(),
		chunker: HashlineChunker::new(&options),
		status: Status::Reading,
	};

	stream::unfold(state, |mut state| async move {
		loop {
			if state.status == Status::Failed {
				return None;
			}
			if let Some(chunk) = state.chunker.pop_ready() {
				return Some((Ok(chunk), state));
			}
			if state.status == Status::Done {
				return None;
			}

			match state.source.next().await {
				Some(Ok(bytes)) => {
					let text = state.decoder.push(bytes.as_ref());
					for line in state.splitter.push_str(&text) {
						state.chunker.push_line(&line);
					}
				}
				Some(Err(err)) => {
					state.status = Status::Failed;
					return Some((Err(err.into()), state));
				}
				None => {
					let text = state.decoder.finish();
					for line in state.splitter.push_str(&text) {
						state.chunker.push_line(&line);
					}
					state.chunker.push_line(&state.splitter.finish());
					state.chunker.finish();
					state.status = Status::Done;
				}
			}
		}
	})
}

// region:    --- Support

struct LineStreamState<S> {
	source: Pin<Box<S>>,
	chunker: HashlineChunker,
	finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
	Reading,
	Done,
	Failed,
}

struct ByteStreamState<S> {
	source: Pin<Box<S>>,
	decoder: Utf8ChunkDecoder,
	splitter: LineSplitter,
	chunker: HashlineChunker,
	status: Status,
}

// endregion: --- Support

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;
	use crate::format_hash_lines;
	use futures::executor::block_on;

	fn byte_chunks(content: &str, size: usize) -> Vec<core::result::Result<Vec<u8>, std::io::Error>> {
		content.as_bytes().chunks(size).map(|c| Ok(c.to_vec())).collect()
	}

	#[test]
	fn test_hashline_stream_async_bytes_parity() -> Result<()> {
		// -- Setup & Fixtures
		let inputs = ["", "\n", "no newline", "a\nb\n", "ünï\ncødé\n"];

		// -- Exec & Check
		for input in inputs {
			for size in [1, 3, 16] {
				let source = stream::iter(byte_chunks(input, size));
				let chunks: Vec<String> = block_on(
					stream_hash_lines_from_byte_stream(source, HashlineStreamOptions::default()).collect::<Vec<_>>(),
				)
				.into_iter()
				.collect::<crate::Result<Vec<_>>>()?;
				assert_eq!(chunks.join("\n"), format_hash_lines(input, 1), "input {input:?} size {size}");
			}
		}

		Ok(())
	}

	#[test]
	fn test_hashline_stream_async_lines() -> Result<()> {
		// -- Setup & Fixtures
		let source = stream::iter(vec!["fn main() {", "}", ""]);
		let options = HashlineStreamOptions::default().with_max_chunk_lines(2);

		// -- Exec
		let chunks: Vec<String> = block_on(stream_hash_lines_from_line_stream(source, options).collect());

		// -- Check
		assert_eq!(chunks.len(), 2);
		assert_eq!(chunks.join("\n"), format_hash_lines("fn main() {\n}\n", 1));

		Ok(())
	}

	#[test]
	fn test_hashline_stream_async_source_error_stops() -> Result<()> {
		// -- Setup & Fixtures
		let items: Vec<core::result::Result<Vec<u8>, std::io::Error>> = vec![
			Ok(b"one\ntwo\n".to_vec()),
			Err(std::io::Error::new(std::io::ErrorKind::Interrupted, "aborted")),
			Ok(b"never\n".to_vec()),
		];
		let options = HashlineStreamOptions::default().with_max_chunk_lines(1);

		// -- Exec
		let results: Vec<crate::Result<String>> =
			block_on(stream_hash_lines_from_byte_stream(stream::iter(items), options).collect());

		// -- Check
		assert_eq!(results.len(), 3);
		assert!(results[0].as_ref().is_ok_and(|c| c.ends_with(":one")));
		assert!(results[1].as_ref().is_ok_and(|c| c.ends_with(":two")));
		assert!(matches!(results[2], Err(Error::Io(_))));

		Ok(())
	}

	#[test]
	fn test_hashline_stream_async_early_drop() -> Result<()> {
		// -- Setup & Fixtures
		let source = stream::iter(0..).map(|i| format!("line {i}"));
		let options = HashlineStreamOptions::default().with_max_chunk_lines(10);

		// -- Exec
		let first: Vec<String> = block_on(stream_hash_lines_from_line_stream(source, options).take(2).collect());

		// -- Check
		assert_eq!(first.len(), 2);
		assert!(first[1].starts_with("11#"));

		Ok(())
	}
}

// endregion: --- Tests
