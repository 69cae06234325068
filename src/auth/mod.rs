//! Session tokens: minting, locating, decoding and resolving identities.

pub mod identity;
pub mod issuer;
pub mod locator;
pub mod token;

pub use identity::{CurrentIdentity, Identity};
