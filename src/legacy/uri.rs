//! Splits an upstream string into the parts the classifier routes on.
//!
//! Paths and fragments are percent-decoded and otherwise kept as written:
//! no dot-segment removal, no backslash rewriting. References without a
//! scheme (`/app`, `app/v1`) are accepted and leave the scheme empty.

use crate::error::UriParseError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UpstreamUri {
    /// Lowercased. Empty for scheme-less references.
    pub scheme: String,
    /// The authority without user info, port included.
    pub host: String,
    pub path: String,
    pub fragment: String,
}

impl UpstreamUri {
    pub fn parse(raw: &str) -> Result<Self, UriParseError> {
        if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(UriParseError::ControlCharacter);
        }

        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, unescape(fragment)?),
            None => (raw, String::new()),
        };
        let (scheme, rest) = split_scheme(rest)?;
        let rest = rest.split_once('?').map_or(rest, |(before, _)| before);

        let mut uri = UpstreamUri {
            scheme: scheme.to_ascii_lowercase(),
            fragment,
            ..UpstreamUri::default()
        };

        if !rest.starts_with('/') {
            if !uri.scheme.is_empty() {
                // Opaque form such as `mailto:ops`, nothing to route on.
                return Ok(uri);
            }
            let first_segment = rest.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                return Err(UriParseError::ColonInFirstSegment);
            }
        }

        let mut path = rest;
        if rest.starts_with("//") && (!uri.scheme.is_empty() || !rest.starts_with("///")) {
            let authority = &rest[2..];
            let end = authority.find('/').unwrap_or(authority.len());
            uri.host = parse_host(&authority[..end])?;
            path = &authority[end..];
        }
        uri.path = unescape(path)?;

        Ok(uri)
    }
}

/// A scheme is a letter followed by letters, digits, `+`, `-` or `.`, ending
/// at the first `:`. Anything else means the input has no scheme.
fn split_scheme(raw: &str) -> Result<(&str, &str), UriParseError> {
    for (i, c) in raw.bytes().enumerate() {
        match c {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' if i > 0 => {}
            b':' if i == 0 => return Err(UriParseError::MissingScheme),
            b':' => return Ok((&raw[..i], &raw[i + 1..])),
            _ => return Ok(("", raw)),
        }
    }
    Ok(("", raw))
}

fn parse_host(authority: &str) -> Result<String, UriParseError> {
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    let port = if host.starts_with('[') {
        let close = host.rfind(']').ok_or(UriParseError::MissingBracket)?;
        &host[close + 1..]
    } else {
        host.rfind(':').map_or("", |i| &host[i..])
    };
    if !valid_optional_port(port) {
        return Err(UriParseError::InvalidPort(port.to_string()));
    }

    unescape(host)
}

/// Empty, or `:` followed by digits only. The value is not range checked.
fn valid_optional_port(port: &str) -> bool {
    match port.strip_prefix(':') {
        Some(digits) => digits.bytes().all(|b| b.is_ascii_digit()),
        None => port.is_empty(),
    }
}

fn unescape(s: &str) -> Result<String, UriParseError> {
    if !s.contains('%') {
        return Ok(s.to_string());
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let decoded = bytes
            .get(i + 1..i + 3)
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .filter(|_| bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit());
        match decoded {
            Some(byte) => out.push(byte),
            None => {
                let end = (i + 3).min(s.len());
                let escape = s.get(i..end).unwrap_or(&s[i..]);
                return Err(UriParseError::InvalidEscape(escape.to_string()));
            }
        }
        i += 3;
    }

    String::from_utf8(out).map_err(|_| UriParseError::InvalidUtf8(s.to_string()))
}
