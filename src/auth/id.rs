//! Strongly typed identifiers for the tenant and API version URL segments.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{_prelude::*, error::ConfigError};

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}

			/// Returns the identifier as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl TryFrom<&str> for $name {
			type Error = IdentifierError;

			fn try_from(value: &str) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (tenant, API version).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (tenant, API version).
		kind: &'static str,
	},
	/// The identifier contains a `/`, which would shift the URL path.
	#[error("{kind} identifier contains a path separator.")]
	ContainsSlash {
		/// Kind of identifier (tenant, API version).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (tenant, API version).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { TenantId, "Directory (tenant) segment of the login endpoints.", "Tenant" }
def_id! { ApiVersion, "Graph API version segment such as `v1.0` or `beta`.", "ApiVersion" }

impl TenantId {
	/// Any work/school or personal account.
	pub const COMMON: &'static str = "common";
	/// Personal Microsoft accounts only.
	pub const CONSUMERS: &'static str = "consumers";
	/// Work/school accounts only.
	pub const ORGANIZATIONS: &'static str = "organizations";

	/// The `common` tenant.
	pub fn common() -> Self {
		Self(Self::COMMON.into())
	}

	/// The `organizations` tenant.
	pub fn organizations() -> Self {
		Self(Self::ORGANIZATIONS.into())
	}

	/// The `consumers` tenant.
	pub fn consumers() -> Self {
		Self(Self::CONSUMERS.into())
	}
}
impl Default for TenantId {
	fn default() -> Self {
		Self::common()
	}
}

impl ApiVersion {
	/// Stable Graph API.
	pub const V1: &'static str = "v1.0";
	/// Preview Graph API.
	pub const BETA: &'static str = "beta";

	/// The `v1.0` version.
	pub fn v1() -> Self {
		Self(Self::V1.into())
	}

	/// The `beta` version.
	pub fn beta() -> Self {
		Self(Self::BETA.into())
	}
}
impl Default for ApiVersion {
	fn default() -> Self {
		Self::v1()
	}
}
impl TryFrom<&Value> for ApiVersion {
	type Error = ConfigError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(version) => Ok(Self::new(version)?),
			other =>
				Err(ConfigError::InvalidApiVersion { found: crate::error::json_type_name(other) }),
		}
	}
}
impl TryFrom<Value> for ApiVersion {
	type Error = ConfigError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		Self::try_from(&value)
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains('/') {
		return Err(IdentifierError::ContainsSlash { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		assert!(TenantId::new(" contoso").is_err(), "Leading whitespace must be rejected.");
		assert!(TenantId::new("contoso ").is_err(), "Trailing whitespace must be rejected.");
		assert!(TenantId::new("contoso/oauth2").is_err(), "Path separators must be rejected.");

		let tenant = TenantId::new("contoso.onmicrosoft.com")
			.expect("Tenant fixture should be considered valid.");

		assert_eq!(tenant.as_ref(), "contoso.onmicrosoft.com");
		assert!(ApiVersion::new("").is_err());
	}

	#[test]
	fn defaults_match_well_known_values() {
		assert_eq!(TenantId::default().as_str(), "common");
		assert_eq!(TenantId::organizations().as_str(), "organizations");
		assert_eq!(TenantId::consumers().as_str(), "consumers");
		assert_eq!(ApiVersion::default().as_str(), "v1.0");
		assert_eq!(ApiVersion::beta().as_str(), "beta");
	}

	#[test]
	fn api_version_rejects_non_string_values() {
		let err = ApiVersion::try_from(json!(1.0)).expect_err("Numbers must be rejected.");

		assert!(matches!(err, ConfigError::InvalidApiVersion { found: "number" }));

		let err = ApiVersion::try_from(&json!(["beta"])).expect_err("Arrays must be rejected.");

		assert!(matches!(err, ConfigError::InvalidApiVersion { found: "array" }));

		let version =
			ApiVersion::try_from(json!("beta")).expect("String values should be accepted.");

		assert_eq!(version, ApiVersion::beta());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let tenant: TenantId = serde_json::from_str("\"contoso\"")
			.expect("Tenant should deserialize successfully.");

		assert_eq!(tenant.as_ref(), "contoso");
		assert!(serde_json::from_str::<TenantId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<ApiVersion>("42").is_err());
	}

	#[test]
	fn length_limits() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		TenantId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(TenantId::new(&too_long), Err(IdentifierError::TooLong { .. })));
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<TenantId, u8> = HashMap::from_iter([(TenantId::common(), 7_u8)]);

		assert_eq!(map.get("common"), Some(&7));
	}
}
