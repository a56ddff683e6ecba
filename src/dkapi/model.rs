use crate::error::{DkapiError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that must be present in the state file before any command runs,
/// paired with the hint shown when one is missing.
pub const REQUIRED_KEYS: &[(&str, &str)] = &[
    (
        "API_CLIENT_ID",
        "This is part of the API configuration on the Digi-Key API portal.",
    ),
    (
        "API_SECRET",
        "This is part of the API configuration on the Digi-Key API portal.",
    ),
    (
        "API_REDIRECT_URI",
        "This is part of the API configuration on the Digi-Key API portal.",
    ),
    (
        "LOGIN_NAME",
        "This is the login name of the Digi-Key account you use to buy parts.",
    ),
    (
        "LOGIN_PASSWORD",
        "This is the password of the Digi-Key account you use to buy parts.",
    ),
    (
        "CONTEXT",
        "The file is corrupt or incomplete; an empty CONTEXT object is enough to start.",
    ),
];

/// Persisted credentials, configuration and token context.
///
/// Key names match the on-disk format. Keys this type does not model are
/// carried in `extra` so a load/save cycle never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "API_CLIENT_ID")]
    pub client_id: String,
    #[serde(rename = "API_SECRET")]
    pub client_secret: String,
    #[serde(rename = "API_REDIRECT_URI")]
    pub redirect_uri: String,
    #[serde(rename = "LOGIN_NAME")]
    pub login_name: String,
    #[serde(rename = "LOGIN_PASSWORD")]
    pub login_password: String,
    #[serde(rename = "DEBUG", default, with = "debug_flag")]
    pub debug_enabled: bool,
    #[serde(rename = "CONTEXT")]
    pub auth_context: AuthContext,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl State {
    /// Build a state from a parsed document, rejecting it when a required
    /// key is absent.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            DkapiError::Api("State/config file must contain a JSON object".to_string())
        })?;

        for &(key, hint) in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(DkapiError::MissingConfig { key, hint });
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    #[serde(
        rename = "ACCESS_TOKEN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,
    #[serde(
        rename = "REFRESH_TOKEN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,
    /// Lifetime reported by the token endpoint, in seconds. Informational only.
    #[serde(rename = "EXPIRES", default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(
        rename = "GEN_TIMESTAMP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthContext {
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Tokens minted by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

/// Shorten a credential for log output: the first four characters followed
/// by an ellipsis. Short values are fully masked.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}…", prefix)
}

mod debug_flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "TRUE" } else { "FALSE" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(flag) => Ok(flag),
            Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
            Value::Null => Ok(false),
            other => Err(D::Error::custom(format!(
                "DEBUG must be \"TRUE\" or \"FALSE\", got {}",
                other
            ))),
        }
    }
}
