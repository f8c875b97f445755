use serde::{Deserialize, Serialize};

/// A header added to a request sent upstream or to a response returned by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Header {
    /// Names should be unique within one list of headers.
    pub name: String,

    /// Keep any incoming value for this header on the upstream request.
    /// Only meaningful for injected request headers; unset means strip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_request_value: Option<bool>,

    #[serde(default)]
    pub values: Vec<HeaderValue>,
}

impl Header {
    pub fn new(name: impl Into<String>, values: Vec<HeaderValue>) -> Self {
        Self {
            name: name.into(),
            preserve_request_value: None,
            values,
        }
    }

    /// Single-valued header sourced from a session claim.
    pub fn from_claim(name: impl Into<String>, claim: impl Into<String>) -> Self {
        Self::new(name, vec![HeaderValue::claim(ClaimSource::new(claim))])
    }
}

/// One value of a header. Exactly one source should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_source: Option<SecretSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_source: Option<ClaimSource>,
}

impl HeaderValue {
    pub fn secret(source: SecretSource) -> Self {
        Self {
            secret_source: Some(source),
            claim_source: None,
        }
    }

    pub fn claim(source: ClaimSource) -> Self {
        Self {
            secret_source: None,
            claim_source: Some(source),
        }
    }

    pub(crate) fn source_count(&self) -> usize {
        usize::from(self.secret_source.is_some()) + usize::from(self.claim_source.is_some())
    }
}

/// Loads a header value from a claim within the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimSource {
    /// One of `access_token`, `id_token`, `created_at`, `expires_on`,
    /// `refresh_token`, `email`, `user`, `groups`, `preferred_username`.
    pub claim: String,

    /// Prepended to the claim value when the claim is non-empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    /// Turns the claim into a basic auth header: the claim becomes the
    /// username and this secret the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_password: Option<SecretSource>,
}

impl ClaimSource {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            prefix: String::new(),
            basic_auth_password: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_basic_auth_password(mut self, password: SecretSource) -> Self {
        self.basic_auth_password = Some(password);
        self
    }
}

/// A secret loaded from exactly one of: an inline value, an environment
/// variable, or a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretSource {
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<u8>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from_env: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from_file: String,
}

impl SecretSource {
    pub fn from_value(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn from_file(path: impl Into<String>) -> Self {
        Self {
            from_file: path.into(),
            ..Self::default()
        }
    }
}

/// Inline secret bytes travel as standard base64 in config files.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.trim()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_value_is_base64_in_yaml() {
        let header = Header::new(
            "Authorization",
            vec![HeaderValue::claim(
                ClaimSource::new("user")
                    .with_basic_auth_password(SecretSource::from_value("s3cret")),
            )],
        );

        let yaml = serde_yml::to_string(&header).unwrap();
        assert!(yaml.contains("czNjcmV0"));
        assert!(!yaml.contains("s3cret"));

        let back: Header = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back, header);
    }

    #[test]
    fn test_claim_header_from_yaml() {
        let yaml = r#"
name: X-Forwarded-Email
preserve_request_value: false
values:
  - claim_source:
      claim: email
"#;
        let header: Header = serde_yml::from_str(yaml).unwrap();
        assert_eq!(header.name, "X-Forwarded-Email");
        assert_eq!(header.preserve_request_value, Some(false));
        assert_eq!(header.values, vec![HeaderValue::claim(ClaimSource::new("email"))]);
    }

    #[test]
    fn test_header_values_serialize_as_plain_maps() {
        let header = Header::new(
            "X-Token",
            vec![
                HeaderValue::claim(ClaimSource::new("access_token").with_prefix("Bearer ")),
                HeaderValue::secret(SecretSource::from_file("/etc/token")),
            ],
        );

        let yaml = serde_yml::to_string(&header).unwrap();
        assert!(!yaml.contains('!'));
        assert!(yaml.contains("claim_source:"));
        assert!(yaml.contains("secret_source:"));

        let back: Header = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back, header);
    }

    #[test]
    fn test_secret_value_from_yaml() {
        let yaml = r#"
name: X-Api-Key
values:
  - secret_source:
      value: czNjcmV0
"#;
        let header: Header = serde_yml::from_str(yaml).unwrap();
        assert_eq!(header.values, vec![HeaderValue::secret(SecretSource::from_value("s3cret"))]);
        assert_eq!(header.values[0].source_count(), 1);
    }

    #[test]
    fn test_unknown_source_key_is_rejected() {
        let yaml = r#"
name: X-Forwarded-Email
values:
  - claimSource:
      claim: email
"#;
        assert!(serde_yml::from_str::<Header>(yaml).is_err());
    }
}
