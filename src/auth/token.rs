//! Session token codec.
//!
//! A token is `H.P.S`, three unpadded base64url segments: a fixed header, the
//! JSON identity claim and a fixed filler "signature". Nothing is signed and
//! nothing but the payload segment is ever read back.

use std::fmt;
use std::io::{self, Write};

use base64::{
    alphabet,
    engine::{
        general_purpose::URL_SAFE_NO_PAD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig,
    },
    Engine as _,
};
use serde::Serialize;
use serde_json::{ser::Formatter, Map, Value};

const SIGNATURE_FILLER: &[u8] = b"totally-secure-signature";

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Raw decoded payload. Keys beyond `email` and `iat` are kept as-is.
pub type ClaimMap = Map<String, Value>;

/// A value nobody has vouched for.
///
/// Tokens carry self-asserted claims, so the decoded payload is only reachable
/// through accessors whose names say so.
#[derive(Debug, Clone, PartialEq)]
pub struct Unverified<T>(T);

impl<T> Unverified<T> {
    pub(crate) fn new(inner: T) -> Self {
        Self(inner)
    }

    #[allow(dead_code)]
    pub fn insecure_inner(&self) -> &T {
        &self.0
    }

    pub fn into_insecure_inner(self) -> T {
        self.0
    }
}

#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "none",
    typ: "JWT",
};

/// Claim minted at login. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    pub email: String,
    pub iat: i64,
}

impl IdentityClaim {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            iat: chrono::Utc::now().timestamp(),
        }
    }
}

/// Why a token did not yield a claim.
#[derive(Debug)]
pub enum Malformed {
    MissingPayload,
    Base64(base64::DecodeError),
    Json(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::MissingPayload => f.write_str("token has no payload segment"),
            Malformed::Base64(e) => write!(f, "payload is not base64url: {}", e),
            Malformed::Json(e) => write!(f, "payload is not JSON: {}", e),
            Malformed::NotAnObject => f.write_str("payload is not a JSON object"),
        }
    }
}

impl std::error::Error for Malformed {}

/// Mint a token asserting `email`, issued now.
pub fn encode(email: &str) -> String {
    encode_claim(&IdentityClaim::new(email))
}

pub fn encode_claim(claim: &IdentityClaim) -> String {
    let header = segment(&HEADER);
    let payload = segment(claim);
    let signature = URL_SAFE_NO_PAD.encode(SIGNATURE_FILLER);
    format!("{}.{}.{}", header, payload, signature)
}

/// Decode the payload segment of `token`. Header and signature are ignored.
pub fn decode(token: &str) -> Result<Unverified<ClaimMap>, Malformed> {
    let payload = token.split('.').nth(1).ok_or(Malformed::MissingPayload)?;

    // standard-alphabet `+` and `/` are read as their url-safe twins
    let mut padded: String = payload
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = PAYLOAD_ENGINE
        .decode(padded.as_bytes())
        .map_err(Malformed::Base64)?;

    match serde_json::from_slice::<Value>(&bytes).map_err(Malformed::Json)? {
        Value::Object(map) => Ok(Unverified::new(map)),
        _ => Err(Malformed::NotAnObject),
    }
}

fn segment<T: Serialize>(value: &T) -> String {
    let mut json = Vec::with_capacity(64);
    let mut ser = serde_json::Serializer::with_formatter(&mut json, CompatFormatter);
    value
        .serialize(&mut ser)
        .expect("token segments are plain strings and integers");
    URL_SAFE_NO_PAD.encode(json)
}

/// JSON rendering of previously issued tokens: `", "` and `": "` separators,
/// everything outside printable ASCII escaped as lowercase `\uXXXX`.
struct CompatFormatter;

impl Formatter for CompatFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && ch != '\x7f' {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
