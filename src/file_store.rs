use crate::fs_guard::resolve_in_base;
use crate::{Error, Result};
use simple_fs::{SPath, ensure_dir, ensure_file_dir, read_to_string};
use std::fs;

/// Where edited files are read from and written to.
///
/// Paths are relative to whatever root the implementation manages.
pub trait FileStore {
	fn exists(&self, path: &str) -> Result<bool>;

	fn read_binary(&self, path: &str) -> Result<Vec<u8>>;

	/// Reads a UTF-8 text file.
	fn read(&self, path: &str) -> Result<String> {
		let bytes = self.read_binary(path)?;
		Ok(String::from_utf8(bytes)?)
	}

	/// Writes (creates or replaces) a text file, creating parent directories as needed.
	fn write(&self, path: &str, content: &str) -> Result<()>;

	fn delete(&self, path: &str) -> Result<()>;

	fn mkdir(&self, path: &str) -> Result<()>;
}

/// A [`FileStore`] rooted at a directory. Paths escaping the directory are refused.
#[derive(Debug, Clone)]
pub struct DirFileStore {
	base_dir: SPath,
}

impl DirFileStore {
	pub fn new(base_dir: SPath) -> Self {
		Self { base_dir }
	}

	pub fn base_dir(&self) -> &SPath {
		&self.base_dir
	}

	fn existing_file(&self, path: &str) -> Result<SPath> {
		let full_path = resolve_in_base(&self.base_dir, path)?;
		if !full_path.is_file() {
			return Err(Error::file_not_found(path));
		}
		Ok(full_path)
	}
}

impl FileStore for DirFileStore {
	fn exists(&self, path: &str) -> Result<bool> {
		let full_path = resolve_in_base(&self.base_dir, path)?;
		Ok(full_path.exists())
	}

	fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
		let full_path = self.existing_file(path)?;
		Ok(fs::read(&full_path)?)
	}

	fn read(&self, path: &str) -> Result<String> {
		let full_path = self.existing_file(path)?;
		read_to_string(&full_path).map_err(Error::simple_fs)
	}

	fn write(&self, path: &str, content: &str) -> Result<()> {
		let full_path = resolve_in_base(&self.base_dir, path)?;
		ensure_file_dir(&full_path).map_err(Error::simple_fs)?;
		fs::write(&full_path, content).map_err(|err| Error::io_write_file(full_path.to_string(), err))?;
		tracing::debug!(path = %full_path, bytes = content.len(), "file written");
		Ok(())
	}

	fn delete(&self, path: &str) -> Result<()> {
		let full_path = self.existing_file(path)?;
		fs::remove_file(&full_path).map_err(|err| Error::io_delete_file(full_path.to_string(), err))?;
		Ok(())
	}

	fn mkdir(&self, path: &str) -> Result<()> {
		let full_path = resolve_in_base(&self.base_dir, path)?;
		ensure_dir(&full_path).map_err(Error::simple_fs)?;
		Ok(())
	}
}

// region:    --- Tests


// endregion: --- Tests
