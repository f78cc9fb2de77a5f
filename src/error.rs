//! Failure taxonomy for backend calls and local persistence.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
	#[error("request failed: {0}")]
	Network(String),

	#[error("HTTP error {status}: {body}")]
	Status { status: u16, body: String },

	#[error("unexpected response body: {0}")]
	Decode(String),

	#[error("no matching nodes")]
	EmptyResult,

	#[error("please enter a query")]
	EmptyQuery,

	#[error("another request is still running")]
	Busy,

	#[error("storage unavailable: {0}")]
	Storage(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<gloo_net::Error> for ClientError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => ClientError::Decode(e.to_string()),
			other => ClientError::Network(other.to_string()),
		}
	}
}

impl From<serde_json::Error> for ClientError {
	fn from(err: serde_json::Error) -> Self {
		ClientError::Decode(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_are_user_readable() {
		let err = ClientError::Status {
			status: 503,
			body: "down".into(),
		};
		assert_eq!(err.to_string(), "HTTP error 503: down");
		assert_eq!(ClientError::EmptyQuery.to_string(), "please enter a query");
	}

	#[test]
	fn json_errors_become_decode_failures() {
		let err: ClientError = serde_json::from_str::<u8>("nope").unwrap_err().into();
		assert!(matches!(err, ClientError::Decode(_)));
	}
}
