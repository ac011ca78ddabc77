//! The Microsoft identity platform + Graph provider adapter.
//!
//! `config` holds the immutable [`GraphConfig`] value, `endpoint` derives URLs from it via
//! [`EndpointResolver`], and `classify` normalizes error envelopes via [`ResponseClassifier`].
//! [`GraphProvider`] ties the three together and wraps resource-owner payloads.

pub mod classify;
pub mod config;
pub mod endpoint;

pub use classify::*;
pub use config::*;
pub use endpoint::*;

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, TenantId},
	error::ConfigError,
	profile::GraphUser,
};

/// Provider adapter for the Microsoft identity platform and Microsoft Graph.
///
/// The configuration itself is immutable; the `set_*` helpers swap in a rebuilt value and
/// return `&mut Self` for chaining. A setter that fails leaves the previous value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphProvider {
	config: GraphConfig,
	scopes: Option<ScopeList>,
}
impl GraphProvider {
	/// Creates a provider around `config` using the default scopes.
	pub fn new(config: GraphConfig) -> Self {
		Self { config, scopes: None }
	}

	/// Overrides the default scopes.
	pub fn with_scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = Some(scopes);

		self
	}

	/// Current configuration.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Replaces the configuration.
	pub fn set_config(&mut self, config: GraphConfig) -> &mut Self {
		self.config = config;

		self
	}

	/// Replaces the API version; non-string JSON input fails with
	/// [`ConfigError::InvalidApiVersion`].
	pub fn set_api_version<V>(&mut self, api_version: V) -> Result<&mut Self, ConfigError>
	where
		V: TryInto<crate::auth::ApiVersion>,
		V::Error: Into<ConfigError>,
	{
		self.config = self.config.with_api_version(api_version)?;

		Ok(self)
	}

	/// Replaces the tenant.
	pub fn set_tenant(&mut self, tenant: TenantId) -> &mut Self {
		self.config = self.config.with_tenant(tenant);

		self
	}

	/// Replaces the Graph API base URL; one trailing slash is stripped.
	pub fn set_api_url_base(&mut self, api_url_base: impl Into<String>) -> &mut Self {
		self.config = self.config.with_api_url_base(api_url_base);

		self
	}

	/// Replaces the login base URL; one trailing slash is stripped.
	pub fn set_login_url_base(&mut self, login_url_base: impl Into<String>) -> &mut Self {
		self.config = self.config.with_login_url_base(login_url_base);

		self
	}

	/// Replaces the OAuth 2.0 path segment.
	pub fn set_oauth2_path(&mut self, oauth2_path: impl Into<String>) -> &mut Self {
		self.config = self.config.with_oauth2_path(oauth2_path);

		self
	}

	/// Resolves a Graph request target; see [`GraphConfig::api_url`].
	pub fn api_url(&self, target: &str) -> Result<Url, ConfigError> {
		self.config.api_url(target)
	}

	/// Wraps a resource-owner payload without validating its fields.
	pub fn wrap_resource_owner(&self, payload: Map<String, Value>) -> GraphUser {
		GraphUser::new(payload)
	}
}
impl EndpointResolver for GraphProvider {
	fn authorization_url(&self) -> String {
		self.config.authorization_url()
	}

	fn token_url(&self) -> String {
		self.config.token_url()
	}

	fn resource_owner_details_url(&self) -> String {
		self.config.resource_owner_details_url()
	}

	fn default_scopes(&self) -> ScopeList {
		self.scopes.clone().unwrap_or_else(ScopeList::defaults)
	}
}
