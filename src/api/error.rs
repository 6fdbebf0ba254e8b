use log::{error, warn};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("not authorized ({0})")]
	Unauthorized(StatusCode),
	#[error("server answered {status}: {message}")]
	Status { status: StatusCode, message: String },
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("unexpected response: {0}")]
	Decode(#[from] serde_json::Error)
}

/// What a screen gets to see of an [`ApiError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Failure {
	/// session is missing or expired
	Auth,
	Other(String)
}

impl ApiError {
	pub fn classify(&self) -> Failure {
		match self {
			ApiError::Unauthorized(status) => {
				warn!("request rejected with {status}");
				Failure::Auth
			},
			err => {
				error!("{err}");
				Failure::Other(err.to_string())
			}
		}
	}

	pub(super) fn from_status(status: StatusCode, body: &[u8]) -> Self {
		if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
			return ApiError::Unauthorized(status);
		}
		let mut message = String::from_utf8_lossy(body).trim().to_owned();
		if message.is_empty() {
			message = status
				.canonical_reason()
				.unwrap_or("unknown error")
				.to_owned();
		}
		if message.len() > 200 {
			let mut end = 200;
			while !message.is_char_boundary(end) {
				end -= 1;
			}
			message.truncate(end);
			message.push('…');
		}
		ApiError::Status { status, message }
	}
}
