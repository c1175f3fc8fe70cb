/// Agent-facing instructions for the hashline edit tool.
pub const HASHLINE_EDIT_PROMPT: &str = include_str!("prompt/hashline-edit.md");

// region:    --- Tests


// endregion: --- Tests
