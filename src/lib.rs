//! Microsoft identity platform + Graph adapter for OAuth 2.0: tenant-aware endpoints, normalized
//! provider errors, and lossless user profiles on top of the `oauth2` crate.
//!
//! [`provider::GraphProvider`] derives the authorization, token, and resource-owner URLs and
//! classifies error bodies. [`client::GraphClient`] drives the code exchange and authenticated
//! Graph calls through a pluggable [`http::GraphHttpClient`] transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::GraphClient,
		http::ReqwestHttpClient,
		oauth::ClientCredentials,
		provider::{GraphConfig, GraphProvider},
	};

	/// Graph client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = GraphClient<ReqwestHttpClient>;

	/// Redirect URI registered by every test client.
	pub const TEST_REDIRECT_URI: &str = "https://app.example.com/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a provider whose login and API bases both point at `base_url` (typically a
	/// `httpmock` server).
	pub fn test_provider(base_url: &str) -> GraphProvider {
		let config = GraphConfig::builder().api_url_base(base_url).login_url_base(base_url).build();

		GraphProvider::new(config)
	}

	/// Constructs a [`GraphClient`] pointed at `base_url` with confidential client credentials
	/// and the reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestClient {
		let redirect = Url::parse(TEST_REDIRECT_URI).expect("Failed to parse test redirect URI.");
		let credentials =
			ClientCredentials::new(client_id, redirect).with_client_secret(client_secret);

		GraphClient::with_http_client(
			test_provider(base_url),
			credentials,
			test_reqwest_http_client(),
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
