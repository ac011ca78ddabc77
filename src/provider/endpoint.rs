//! Endpoint derivation for the login and Graph hosts.
//!
//! Every URL is recomputed from the current [`GraphConfig`] on each call; nothing is cached.

// self
use crate::{_prelude::*, auth::ScopeList, error::ConfigError, provider::GraphConfig};

/// Derives the OAuth 2.0 endpoints and scope parameters for a provider.
pub trait EndpointResolver: Send + Sync {
	/// Authorization endpoint the user agent is redirected to.
	fn authorization_url(&self) -> String;

	/// Token endpoint used for the code exchange.
	fn token_url(&self) -> String;

	/// Resource-owner (profile) endpoint.
	///
	/// The access token is never part of this URL; it travels in the `Authorization` header.
	fn resource_owner_details_url(&self) -> String;

	/// Scopes requested when the caller does not supply any.
	fn default_scopes(&self) -> ScopeList;

	/// Character used to join scopes into a single request parameter.
	fn scope_separator(&self) -> char {
		' '
	}

	/// Parses the three endpoints into [`Url`] values for the OAuth client.
	fn endpoints(&self) -> Result<GraphEndpoints, ConfigError> {
		Ok(GraphEndpoints {
			authorization: parse_endpoint("authorization", self.authorization_url())?,
			token: parse_endpoint("token", self.token_url())?,
			resource_owner: parse_endpoint("resource_owner", self.resource_owner_details_url())?,
		})
	}
}

/// Parsed endpoint set handed to the OAuth client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEndpoints {
	/// Authorization endpoint.
	pub authorization: Url,
	/// Token endpoint.
	pub token: Url,
	/// Resource-owner endpoint.
	pub resource_owner: Url,
}

impl GraphConfig {
	/// `{login_url_base}/{tenant}{oauth2_path}/authorize`
	pub fn authorization_url(&self) -> String {
		self.login_endpoint("authorize")
	}

	/// `{login_url_base}/{tenant}{oauth2_path}/token`
	pub fn token_url(&self) -> String {
		self.login_endpoint("token")
	}

	/// `{api_url_base}/{api_version}/me`
	pub fn resource_owner_details_url(&self) -> String {
		format!("{}/me", self.versioned_api_base())
	}

	/// `{api_url_base}/{api_version}`
	pub fn versioned_api_base(&self) -> String {
		format!("{}/{}", self.api_url_base(), self.api_version())
	}

	/// Resolves a Graph request target.
	///
	/// Targets starting with `/` are appended to [`GraphConfig::versioned_api_base`]; anything
	/// else must already be an absolute URL.
	pub fn api_url(&self, target: &str) -> Result<Url, ConfigError> {
		if target.starts_with('/') {
			parse_endpoint("api", format!("{}{target}", self.versioned_api_base()))
		} else {
			parse_endpoint("api", target.to_owned())
		}
	}

	fn login_endpoint(&self, leaf: &str) -> String {
		format!("{}/{}{}/{leaf}", self.login_url_base(), self.tenant(), self.oauth2_path())
	}
}

pub(crate) fn parse_endpoint(endpoint: &'static str, url: String) -> Result<Url, ConfigError> {
	Url::parse(&url).map_err(|source| ConfigError::InvalidEndpoint { endpoint, url, source })
}
