//! Finds the session token carried by a request.
//!
//! Sources are tried in a fixed order and the first non-empty candidate wins:
//! `Authorization: Bearer`, then the `token` query parameter, then the
//! `session` cookie. Values are never merged across sources.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{header, HeaderMap, Uri};

pub const TOKEN_QUERY_PARAM: &str = "token";
pub const SESSION_COOKIE: &str = "session";

const BEARER_PREFIX: &str = "bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    AuthorizationHeader,
    QueryParameter,
    SessionCookie,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedToken {
    pub source: TokenSource,
    pub token: String,
}

pub fn locate(headers: &HeaderMap, uri: &Uri) -> Option<LocatedToken> {
    bearer_token(headers)
        .map(|token| (TokenSource::AuthorizationHeader, token))
        .or_else(|| query_token(uri).map(|token| (TokenSource::QueryParameter, token)))
        .or_else(|| {
            parse_cookie(headers, SESSION_COOKIE).map(|token| (TokenSource::SessionCookie, token))
        })
        .map(|(source, token)| LocatedToken { source, token })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let prefix = value.get(..BEARER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    non_empty(&value[BEARER_PREFIX.len()..])
}

fn query_token(uri: &Uri) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params.get(TOKEN_QUERY_PARAM).and_then(|v| non_empty(v))
}

/// Value of cookie `name` across every `Cookie` header; the last occurrence wins.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| unquote(value.trim()))
        })
        .last()
        .and_then(|value| non_empty(&value))
}

/// Undo cookie quoting: `"a\"b"` reads as `a"b` and `\012` as a newline.
/// Values without both surrounding quotes are returned untouched.
fn unquote(value: &str) -> String {
    let inner = match value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return value.to_owned(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut rest = inner;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let escaped = &rest[pos + 1..];
        if let Some(c) = octal_escape(escaped) {
            out.push(c);
            rest = &escaped[3..];
            continue;
        }
        let mut chars = escaped.chars();
        out.push(chars.next().unwrap_or('\\'));
        rest = chars.as_str();
    }
    out.push_str(rest);
    out
}

fn octal_escape(escaped: &str) -> Option<char> {
    let digits = escaped.get(..3)?;
    let valid = digits.starts_with(|c| matches!(c, '0'..='3'))
        && digits.bytes().all(|b| matches!(b, b'0'..=b'7'));
    valid
        .then(|| u8::from_str_radix(digits, 8).ok())
        .flatten()
        .map(char::from)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn header_beats_query_and_cookie() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer T1"),
            (header::COOKIE, "session=T2"),
        ]);
        let found = locate(&h, &uri("/api/profile?token=T3")).unwrap();
        assert_eq!(found.source, TokenSource::AuthorizationHeader);
        assert_eq!(found.token, "T1");
    }

    #[test]
    fn query_beats_cookie() {
        let h = headers(&[(header::COOKIE, "session=T2")]);
        let found = locate(&h, &uri("/api/profile?token=T3")).unwrap();
        assert_eq!(found.source, TokenSource::QueryParameter);
        assert_eq!(found.token, "T3");
    }

    #[test]
    fn cookie_is_the_last_resort() {
        let h = headers(&[(header::COOKIE, "theme=dark; session=T2; lang=en")]);
        let found = locate(&h, &uri("/api/profile")).unwrap();
        assert_eq!(found.source, TokenSource::SessionCookie);
        assert_eq!(found.token, "T2");
    }

    #[test]
    fn nothing_found() {
        assert_eq!(locate(&HeaderMap::new(), &uri("/api/profile?x=1")), None);
    }

    #[test]
    fn bearer_prefix_is_case_insensitive_and_remainder_verbatim() {
        let h = headers(&[(header::AUTHORIZATION, "bEaReR  spaced token")]);
        let found = locate(&h, &uri("/")).unwrap();
        assert_eq!(found.token, " spaced token");
    }

    #[test]
    fn non_bearer_schemes_are_ignored() {
        let h = headers(&[
            (header::AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            (header::COOKIE, "session=T2"),
        ]);
        let found = locate(&h, &uri("/")).unwrap();
        assert_eq!(found.source, TokenSource::SessionCookie);

        let h = headers(&[(header::AUTHORIZATION, "Bearer")]);
        assert_eq!(locate(&h, &uri("/")), None);
    }

    #[test]
    fn empty_candidates_fall_through() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer "),
            (header::COOKIE, "session=T2"),
        ]);
        let found = locate(&h, &uri("/?token=")).unwrap();
        assert_eq!(found.source, TokenSource::SessionCookie);
    }

    #[test]
    fn query_token_is_percent_decoded() {
        let found = locate(&HeaderMap::new(), &uri("/?token=a%2Eb.c")).unwrap();
        assert_eq!(found.token, "a.b.c");
    }

    #[test]
    fn cookie_lookup_scans_every_header() {
        let h = headers(&[
            (header::COOKIE, "session=first"),
            (header::COOKIE, "other=1; session=second"),
        ]);
        assert_eq!(parse_cookie(&h, SESSION_COOKIE).as_deref(), Some("second"));
        assert_eq!(parse_cookie(&h, "missing"), None);
    }

    #[test]
    fn quoted_cookie_values_are_unquoted() {
        let h = headers(&[(header::COOKIE, "session=\"a.b.c\"")]);
        let found = locate(&h, &uri("/")).unwrap();
        assert_eq!(found.token, "a.b.c");

        let h = headers(&[(header::COOKIE, r#"session="x\"y\\z\073""#)]);
        assert_eq!(parse_cookie(&h, SESSION_COOKIE).as_deref(), Some("x\"y\\z;"));

        // a lone quote is not a quoted value
        let h = headers(&[(header::COOKIE, "session=\"")]);
        assert_eq!(parse_cookie(&h, SESSION_COOKIE).as_deref(), Some("\""));

        let h = headers(&[
            (header::COOKIE, "session=\"\""),
            (header::AUTHORIZATION, "Basic x"),
        ]);
        assert_eq!(locate(&h, &uri("/")), None);
    }

    #[test]
    fn alt_session_cookie_is_not_a_session_cookie() {
        let h = headers(&[(header::COOKIE, "alt_session=T9")]);
        assert_eq!(locate(&h, &uri("/")), None);
    }
}
