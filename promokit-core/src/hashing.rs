//! Job fingerprints
//!
//! Canonical JSON (sorted keys, no whitespace) hashed with SHA-256, so the
//! same job always reports the same fingerprint.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::platforms::PlatformKey;
use crate::templates::TemplateKey;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// job_hash = sha256(template + platform + canonical_payload + engine_version)
pub fn compute_job_hash(
    template: TemplateKey,
    platform: PlatformKey,
    payload: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let combined = format!(
        "{}:{}:{}:{}",
        template,
        platform,
        canonical_json(payload)?,
        engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": {"y": 2, "b": 3}, "m": [{"k": 1, "c": 2}]});
        assert_eq!(
            canonical_json(&obj).unwrap(),
            r#"{"a":{"b":3,"y":2},"m":[{"c":2,"k":1}],"z":1}"#
        );
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_job_hash_ignores_key_order() {
        let a = json!({"titleText": "Hello", "prCount": 3});
        let b = json!({"prCount": 3, "titleText": "Hello"});
        assert_eq!(
            compute_job_hash(TemplateKey::Hacktoberfest, PlatformKey::MeetupBanner, &a, "1.0.0").unwrap(),
            compute_job_hash(TemplateKey::Hacktoberfest, PlatformKey::MeetupBanner, &b, "1.0.0").unwrap()
        );
    }

    #[test]
    fn test_job_hash_depends_on_platform() {
        let payload = json!({"titleText": "Hello"});
        let post = compute_job_hash(TemplateKey::EventPromo, PlatformKey::InstagramPost, &payload, "1.0.0").unwrap();
        let story = compute_job_hash(TemplateKey::EventPromo, PlatformKey::InstagramStory, &payload, "1.0.0").unwrap();
        assert_ne!(post, story);
        assert_eq!(
            post,
            compute_job_hash(TemplateKey::EventPromo, PlatformKey::InstagramPost, &payload, "1.0.0").unwrap()
        );
    }
}
