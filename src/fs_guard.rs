use crate::{Error, Result};
use simple_fs::SPath;

/// Resolves `rel_path` under `base_dir`, refusing paths that escape it (e.g. via `..`).
pub fn resolve_in_base(base_dir: &SPath, rel_path: &str) -> Result<SPath> {
	let target = base_dir.join(rel_path);
	check_in_base(&target, base_dir)?;
	Ok(target.into_collapsed())
}

// region:    --- Support

fn check_in_base(target: &SPath, base_dir: &SPath) -> Result<()> {
	let base_dir = base_dir.clone().into_collapsed();
	let target = target.clone().into_collapsed();

	let base = relative_str(&base_dir);
	let target_str = relative_str(&target);

	// Compare whole components: `base_evil/` must not pass for `base`.
	let inside = if base.is_empty() {
		target_str != ".." && !target_str.starts_with("../") && !target_str.starts_with('/')
	} else {
		target_str == base
			|| target_str
				.strip_prefix(base)
				.is_some_and(|rest| rest.starts_with('/') || base.ends_with('/'))
	};

	if !inside {
		return Err(Error::security_violation(target.to_string(), base_dir.to_string()));
	}

	Ok(())
}

fn relative_str(path: &SPath) -> &str {
	let path = path.as_str();
	let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
	let path = path.strip_prefix("./").unwrap_or(path);
	if path == "." { "" } else { path }
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
