//! Request signature computation for the Last.fm API.
//!
//! Last.fm authenticates signed calls with an `api_sig` parameter: sort all
//! request parameters by name in ascending byte order, concatenate each name
//! and value with no delimiter, append the shared secret, and take the MD5
//! digest as lowercase hex. The `format` parameter and any existing
//! `api_sig` must be excluded before calling this (the request builder owns
//! that exclusion).
//!
//! Getting this byte-exact matters: a wrong ordering produces a provider
//! "invalid signature" error indistinguishable from a bad secret.

use md5::{Digest, Md5};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Compute the `api_sig` value for a parameter set.
///
/// Pure function: same parameters and secret always produce the same digest.
/// `BTreeMap` iteration already yields keys in ascending byte order, which is
/// exactly the ordering the provider mandates.
pub fn sign(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut material = String::new();
    for (key, value) in params {
        material.push_str(key);
        material.push_str(value);
    }
    material.push_str(secret);

    let digest = Md5::digest(material.as_bytes());
    let mut hex = String::with_capacity(32);
    for byte in digest {
        // infallible for String
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
