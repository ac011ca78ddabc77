//! Optional observability helpers for outbound provider requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_msgraph.request` with the `kind`
//!   (endpoint family) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `oauth2_msgraph_request_total` counter for every
//!   attempt/success/failure, labeled by `kind` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outbound request families observed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Authorization code exchange against the token endpoint.
	TokenExchange,
	/// Resource-owner (`/me`) lookup.
	ResourceOwner,
	/// Any other authenticated Graph call.
	ApiRequest,
}
impl RequestKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::TokenExchange => "token_exchange",
			RequestKind::ResourceOwner => "resource_owner",
			RequestKind::ApiRequest => "api_request",
		}
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Request is about to be sent.
	Attempt,
	/// Response passed classification.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}

	/// Maps a result into [`RequestOutcome::Success`] or [`RequestOutcome::Failure`].
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { RequestOutcome::Success } else { RequestOutcome::Failure }
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
