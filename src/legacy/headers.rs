use crate::config::{ClaimSource, Header, HeaderValue, SecretSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyHeaders {
    pub pass_basic_auth: bool,
    pub pass_access_token: bool,
    pub pass_user_headers: bool,
    #[serde(rename = "pass_authorization_header")]
    pub pass_authorization: bool,

    pub set_basic_auth: bool,
    #[serde(rename = "set_xauthrequest")]
    pub set_x_auth_request: bool,
    #[serde(rename = "set_authorization_header")]
    pub set_authorization: bool,

    /// Not a header list setting: ends up in the proxy options.
    pub prefer_email_to_user: bool,
    pub basic_auth_password: String,
    pub skip_auth_strip_headers: bool,
}

impl Default for LegacyHeaders {
    fn default() -> Self {
        Self {
            pass_basic_auth: true,
            pass_access_token: false,
            pass_user_headers: true,
            pass_authorization: false,
            set_basic_auth: false,
            set_x_auth_request: false,
            set_authorization: false,
            prefer_email_to_user: false,
            basic_auth_password: String::new(),
            skip_auth_strip_headers: true,
        }
    }
}

impl LegacyHeaders {
    /// Returns the (request, response) injection lists.
    pub fn convert(&self) -> (Vec<Header>, Vec<Header>) {
        (self.request_headers(), self.response_headers())
    }

    fn request_headers(&self) -> Vec<Header> {
        let mut headers = Vec::new();

        if self.pass_basic_auth && !self.basic_auth_password.is_empty() {
            headers.push(basic_auth_header(self.prefer_email_to_user, &self.basic_auth_password));
        }

        // User headers were always implied by basic auth.
        if self.pass_basic_auth || self.pass_user_headers {
            headers.extend(pass_user_headers(self.prefer_email_to_user));
            headers.push(Header::from_claim(
                "X-Forwarded-Preferred-Username",
                "preferred_username",
            ));
        }

        if self.pass_access_token {
            headers.push(Header::from_claim("X-Forwarded-Access-Token", "access_token"));
        }

        if self.pass_authorization {
            headers.push(authorization_header());
        }

        let preserve = !self.skip_auth_strip_headers;
        for header in &mut headers {
            header.preserve_request_value = Some(preserve);
        }

        headers
    }

    fn response_headers(&self) -> Vec<Header> {
        let mut headers = Vec::new();

        if self.set_x_auth_request {
            headers.extend([
                Header::from_claim("X-Auth-Request-User", "user"),
                Header::from_claim("X-Auth-Request-Email", "email"),
                Header::from_claim("X-Auth-Request-Preferred-Username", "preferred_username"),
                Header::from_claim("X-Auth-Request-Groups", "groups"),
            ]);
            if self.pass_access_token {
                headers.push(Header::from_claim("X-Auth-Request-Access-Token", "access_token"));
            }
        }

        if self.set_basic_auth {
            headers.push(basic_auth_header(self.prefer_email_to_user, &self.basic_auth_password));
        }

        if self.set_authorization {
            headers.push(authorization_header());
        }

        headers
    }
}

fn basic_auth_header(prefer_email_to_user: bool, password: &str) -> Header {
    let claim = if prefer_email_to_user { "email" } else { "user" };
    Header::new(
        "Authorization",
        vec![HeaderValue::claim(
            ClaimSource::new(claim).with_basic_auth_password(SecretSource::from_value(password)),
        )],
    )
}

fn pass_user_headers(prefer_email_to_user: bool) -> Vec<Header> {
    let groups = Header::from_claim("X-Forwarded-Groups", "groups");
    if prefer_email_to_user {
        return vec![groups, Header::from_claim("X-Forwarded-User", "email")];
    }
    vec![
        groups,
        Header::from_claim("X-Forwarded-User", "user"),
        Header::from_claim("X-Forwarded-Email", "email"),
    ]
}

fn authorization_header() -> Header {
    Header::new(
        "Authorization",
        vec![HeaderValue::claim(ClaimSource::new("id_token").with_prefix("Bearer "))],
    )
}
