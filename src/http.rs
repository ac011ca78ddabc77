//! Transport primitives for token exchanges and Graph calls.
//!
//! The module exposes [`GraphHttpClient`] alongside [`CapturedResponse`] and [`ResponseSlot`]
//! so downstream crates can plug in custom HTTP clients. Handles record the raw body of every
//! non-success response into their slot; the OAuth facade reads it back to classify token
//! endpoint failures with the provider's own classifier instead of the generic OAuth parser,
//! which drops fields such as `error_codes`.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Abstraction over HTTP transports used for token exchanges and Graph calls.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared behind `Arc`, and the
/// handles they return must own whatever state is required so their request futures remain
/// `Send` for the lifetime of the in-flight operation.
pub trait GraphHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records failed responses in `slot`.
	///
	/// # Capture Contract
	///
	/// - Call [`ResponseSlot::take`] before submitting the HTTP request so stale bodies never leak
	///   across requests.
	/// - When the response status is not a success, save the status and body with
	///   [`ResponseSlot::store`] before handing the response back.
	fn with_capture(&self, slot: ResponseSlot) -> Self::Handle;
}

/// Status and body of a non-success response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl CapturedResponse {
	/// Decodes the body as JSON, if possible.
	pub fn json(&self) -> Option<Value> {
		serde_json::from_slice(&self.body).ok()
	}
}

/// Thread-safe slot for sharing a [`CapturedResponse`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseSlot(Arc<Mutex<Option<CapturedResponse>>>);
impl ResponseSlot {
	/// Stores the captured response for the current request.
	pub fn store(&self, response: CapturedResponse) {
		*self.0.lock() = Some(response);
	}

	/// Returns the captured response, if any, consuming it from the slot.
	pub fn take(&self) -> Option<CapturedResponse> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that token endpoints
/// return results directly. Configure any custom [`ReqwestClient`] to disable redirect
/// following before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects.
	pub fn no_redirects() -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GraphHttpClient for ReqwestHttpClient {
	type Handle = CapturingHandle;
	type TransportError = ReqwestError;

	fn with_capture(&self, slot: ResponseSlot) -> Self::Handle {
		CapturingHandle(Arc::new(CapturingHttpClient { client: self.0.clone(), slot }))
	}
}

#[cfg(feature = "reqwest")]
struct CapturingHttpClient {
	client: ReqwestClient,
	slot: ResponseSlot,
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`GraphHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct CapturingHandle(Arc<CapturingHttpClient>);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for CapturingHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(Box::new)?.to_vec();

			if !status.is_success() {
				client.slot.store(CapturedResponse { status: status.as_u16(), body: body.clone() });
			}

			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Maps an [`HttpClientError`] emitted by any transport into an adapter [`Error`].
pub(crate) fn map_client_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unknown HTTP client failure".into() }.into(),
	}
}
