use anyhow::Context;
use log::{info, warn};
use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf}
};

/// Whether the user is signed in.
///
/// The token is provisioned by the sign-in flow of the web frontend and stored in a `token` file.
/// It is read once at startup and then passed around explicitly.
#[derive(Clone, Debug, Default)]
pub struct Session {
	token: Option<String>,
	path: Option<PathBuf>
}

impl Session {
	#[cfg(test)]
	pub fn with_token(token: impl Into<String>) -> Self {
		Self {
			token: Some(token.into()),
			path: None
		}
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let token = match fs::read_to_string(path) {
			Ok(text) => Some(text.trim().to_owned()).filter(|token| !token.is_empty()),
			Err(err) if err.kind() == ErrorKind::NotFound => None,
			Err(err) => return Err(err).with_context(|| format!("failed to read token {path:?}"))
		};
		info!("signed in: {}", token.is_some());
		Ok(Self {
			token,
			path: Some(path.to_owned())
		})
	}

	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	pub fn is_signed_in(&self) -> bool {
		self.token.is_some()
	}

	/// Forget the token, also on disk. Called when the backend rejected it.
	pub fn invalidate(&mut self) {
		if self.token.take().is_none() {
			return;
		}
		if let Some(path) = &self.path {
			if let Err(err) = fs::remove_file(path) {
				if err.kind() != ErrorKind::NotFound {
					warn!("failed to remove token {path:?}: {err}");
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn missing_file_is_anonymous() {
		let dir = TempDir::new().unwrap();
		let session = Session::load(&dir.path().join("token")).unwrap();
		assert!(!session.is_signed_in());
	}

	#[test]
	fn blank_file_is_anonymous() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("token");
		fs::write(&path, "\n").unwrap();
		assert!(!Session::load(&path).unwrap().is_signed_in());
	}

	#[test]
	fn invalidate_removes_token_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("token");
		fs::write(&path, "abc\n").unwrap();
		let mut session = Session::load(&path).unwrap();
		assert_eq!(session.token(), Some("abc"));
		session.invalidate();
		assert!(!session.is_signed_in());
		assert!(!path.exists());
	}
}
