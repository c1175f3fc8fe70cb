//! Hash-anchored line edits.
//!
//! Files are shown to an agent as `LINE#ID:CONTENT` listings. Edits address lines by those
//! tags, so an edit made against a stale view is rejected as a whole, with a report of the
//! current tags, instead of landing on the wrong line.

// region:    --- Modules

mod applier;
mod diff;
mod edit_request;
mod edit_session;
mod error;
mod file_store;
mod fs_guard;
mod hashline_edit;
mod hashline_stream;
mod hashline_stream_async;
mod line_hash;
mod line_tag;
mod mismatch;
mod normalizer;
mod text_replace;
mod validator;

pub use applier::*;
pub use diff::*;
pub use edit_request::*;
pub use edit_session::*;
pub use error::*;
pub use file_store::*;
pub use hashline_edit::*;
pub use hashline_stream::*;
pub use hashline_stream_async::*;
pub use line_hash::*;
pub use line_tag::*;
pub use mismatch::*;
pub use normalizer::*;
pub use text_replace::*;
pub use validator::*;

#[cfg(feature = "prompt")]
mod prompt;
#[cfg(feature = "prompt")]
pub use prompt::*;


// endregion: --- Modules
