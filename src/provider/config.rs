//! Immutable provider configuration plus its builder and loose option-bag loader.

// self
use crate::{
	_prelude::*,
	auth::{ApiVersion, TenantId},
	error::ConfigError,
};

/// Immutable Microsoft identity platform + Graph configuration.
///
/// Values are normalized once, when the builder runs. Use [`GraphConfig::builder`] for a fresh
/// value, [`GraphConfig::to_builder`] to derive a modified copy, or the `with_*` helpers for
/// single-field changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GraphOptions", into = "GraphOptions")]
pub struct GraphConfig {
	api_url_base: String,
	api_version: ApiVersion,
	login_url_base: String,
	tenant: TenantId,
	oauth2_path: String,
}
impl GraphConfig {
	/// Default Graph API host.
	pub const DEFAULT_API_URL_BASE: &'static str = "https://graph.microsoft.com";
	/// Default login host.
	pub const DEFAULT_LOGIN_URL_BASE: &'static str = "https://login.microsoftonline.com";
	/// OAuth 2.0 path segment for the v2.0 endpoints.
	pub const OAUTH2_PATH_V2: &'static str = "/oauth2/v2.0";
	/// OAuth 2.0 path segment for the legacy (v1) endpoints.
	pub const OAUTH2_PATH_LEGACY: &'static str = "/oauth2";

	/// Creates a builder seeded with the defaults.
	pub fn builder() -> GraphConfigBuilder {
		GraphConfigBuilder::default()
	}

	/// Creates a builder seeded with this configuration.
	pub fn to_builder(&self) -> GraphConfigBuilder {
		GraphConfigBuilder {
			api_url_base: self.api_url_base.clone(),
			api_version: self.api_version.clone(),
			login_url_base: self.login_url_base.clone(),
			tenant: self.tenant.clone(),
			oauth2_path: self.oauth2_path.clone(),
		}
	}

	/// Decodes a camelCase option bag (`apiUrlBase`, `apiVersion`, `loginUrlBase`, `tenant`,
	/// `pathOAuth2`). Missing keys keep their defaults and unknown keys are ignored.
	pub fn from_options(options: Value) -> Result<Self, ConfigError> {
		if let Some(version) = options.get("apiVersion") {
			ApiVersion::try_from(version)?;
		}

		let options: GraphOptions = serde_path_to_error::deserialize(options)
			.map_err(|source| ConfigError::InvalidOptions { source })?;

		Ok(options.into())
	}

	/// Parses a JSON document and forwards it to [`GraphConfig::from_options`].
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let options: Value = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::InvalidOptions { source })?;

		Self::from_options(options)
	}

	/// Graph API base URL without a trailing slash.
	pub fn api_url_base(&self) -> &str {
		&self.api_url_base
	}

	/// Graph API version segment.
	pub fn api_version(&self) -> &ApiVersion {
		&self.api_version
	}

	/// Login host without a trailing slash.
	pub fn login_url_base(&self) -> &str {
		&self.login_url_base
	}

	/// Directory (tenant) segment.
	pub fn tenant(&self) -> &TenantId {
		&self.tenant
	}

	/// OAuth 2.0 path segment placed between the tenant and `/authorize` or `/token`.
	pub fn oauth2_path(&self) -> &str {
		&self.oauth2_path
	}

	/// Returns a copy with a new API base URL.
	pub fn with_api_url_base(&self, api_url_base: impl Into<String>) -> Self {
		let mut config = self.clone();

		config.api_url_base = strip_trailing_slash(api_url_base.into());

		config
	}

	/// Returns a copy with a new API version.
	///
	/// Accepts an [`ApiVersion`], a string, or a raw JSON value; non-string JSON values fail with
	/// [`ConfigError::InvalidApiVersion`].
	pub fn with_api_version<V>(&self, api_version: V) -> Result<Self, ConfigError>
	where
		V: TryInto<ApiVersion>,
		V::Error: Into<ConfigError>,
	{
		let mut config = self.clone();

		config.api_version = api_version.try_into().map_err(Into::into)?;

		Ok(config)
	}

	/// Returns a copy with a new login base URL.
	pub fn with_login_url_base(&self, login_url_base: impl Into<String>) -> Self {
		let mut config = self.clone();

		config.login_url_base = strip_trailing_slash(login_url_base.into());

		config
	}

	/// Returns a copy with a new tenant.
	pub fn with_tenant(&self, tenant: TenantId) -> Self {
		let mut config = self.clone();

		config.tenant = tenant;

		config
	}

	/// Returns a copy with a new OAuth 2.0 path segment.
	pub fn with_oauth2_path(&self, oauth2_path: impl Into<String>) -> Self {
		let mut config = self.clone();

		config.oauth2_path = oauth2_path.into();

		config
	}
}
impl Default for GraphConfig {
	fn default() -> Self {
		GraphConfigBuilder::default().build()
	}
}

/// Builder for [`GraphConfig`] values.
#[derive(Clone, Debug)]
pub struct GraphConfigBuilder {
	/// Graph API base URL (a trailing slash is stripped on build).
	pub api_url_base: String,
	/// Graph API version segment.
	pub api_version: ApiVersion,
	/// Login host (a trailing slash is stripped on build).
	pub login_url_base: String,
	/// Directory (tenant) segment.
	pub tenant: TenantId,
	/// OAuth 2.0 path segment.
	pub oauth2_path: String,
}
impl GraphConfigBuilder {
	/// Sets the Graph API base URL.
	pub fn api_url_base(mut self, url: impl Into<String>) -> Self {
		self.api_url_base = url.into();

		self
	}

	/// Sets the Graph API version.
	pub fn api_version(mut self, version: ApiVersion) -> Self {
		self.api_version = version;

		self
	}

	/// Sets the login host.
	pub fn login_url_base(mut self, url: impl Into<String>) -> Self {
		self.login_url_base = url.into();

		self
	}

	/// Sets the tenant.
	pub fn tenant(mut self, tenant: TenantId) -> Self {
		self.tenant = tenant;

		self
	}

	/// Sets the OAuth 2.0 path segment.
	pub fn oauth2_path(mut self, path: impl Into<String>) -> Self {
		self.oauth2_path = path.into();

		self
	}

	/// Consumes the builder and normalizes the resulting configuration.
	pub fn build(self) -> GraphConfig {
		GraphConfig {
			api_url_base: strip_trailing_slash(self.api_url_base),
			api_version: self.api_version,
			login_url_base: strip_trailing_slash(self.login_url_base),
			tenant: self.tenant,
			oauth2_path: self.oauth2_path,
		}
	}
}
impl Default for GraphConfigBuilder {
	fn default() -> Self {
		Self {
			api_url_base: GraphConfig::DEFAULT_API_URL_BASE.into(),
			api_version: ApiVersion::default(),
			login_url_base: GraphConfig::DEFAULT_LOGIN_URL_BASE.into(),
			tenant: TenantId::default(),
			oauth2_path: GraphConfig::OAUTH2_PATH_V2.into(),
		}
	}
}

/// Wire form of [`GraphConfig`]: the camelCase option bag.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphOptions {
	#[serde(default = "default_api_url_base")]
	api_url_base: String,
	#[serde(default)]
	api_version: ApiVersion,
	#[serde(default = "default_login_url_base")]
	login_url_base: String,
	#[serde(default)]
	tenant: TenantId,
	#[serde(default = "default_oauth2_path", rename = "pathOAuth2")]
	oauth2_path: String,
}
impl From<GraphOptions> for GraphConfig {
	fn from(options: GraphOptions) -> Self {
		GraphConfig::builder()
			.api_url_base(options.api_url_base)
			.api_version(options.api_version)
			.login_url_base(options.login_url_base)
			.tenant(options.tenant)
			.oauth2_path(options.oauth2_path)
			.build()
	}
}
impl From<GraphConfig> for GraphOptions {
	fn from(config: GraphConfig) -> Self {
		Self {
			api_url_base: config.api_url_base,
			api_version: config.api_version,
			login_url_base: config.login_url_base,
			tenant: config.tenant,
			oauth2_path: config.oauth2_path,
		}
	}
}

fn default_api_url_base() -> String {
	GraphConfig::DEFAULT_API_URL_BASE.into()
}

fn default_login_url_base() -> String {
	GraphConfig::DEFAULT_LOGIN_URL_BASE.into()
}

fn default_oauth2_path() -> String {
	GraphConfig::OAUTH2_PATH_V2.into()
}

/// Removes exactly one trailing `/`, if present.
fn strip_trailing_slash(mut url: String) -> String {
	if url.ends_with('/') {
		url.pop();
	}

	url
}
