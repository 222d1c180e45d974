//! Credential masking for displaying a document, as `kubectl config view` does.

use serde_yaml::Value;

use super::types::ConfigDocument;

pub const REDACTED: &str = "REDACTED";
pub const DATA_OMITTED: &str = "DATA+OMITTED";

/// Keys whose values are secrets wherever they appear under a user entry
/// (basic auth, `auth-provider.config`, OIDC settings).
const SECRET_KEYS: &[&str] = &[
    "password",
    "token",
    "access-token",
    "id-token",
    "refresh-token",
    "client-secret",
    "client-key-data",
];

/// Replace credentials in `doc` with placeholders.
///
/// Certificate data becomes `DATA+OMITTED`, every other secret `REDACTED`.
/// Secrets held in fields the model does not name are masked too.
pub fn redact_secrets(doc: &mut ConfigDocument) {
    for cluster in doc.clusters.values_mut() {
        if cluster.certificate_authority_data.is_some() {
            cluster.certificate_authority_data = Some(DATA_OMITTED.to_string());
        }
    }

    for auth in doc.auth_infos.values_mut() {
        if auth.token.is_some() {
            auth.token = Some(REDACTED.to_string());
        }
        if auth.client_certificate_data.is_some() {
            auth.client_certificate_data = Some(DATA_OMITTED.to_string());
        }
        if auth.client_key_data.is_some() {
            auth.client_key_data = Some(DATA_OMITTED.to_string());
        }
        for (key, value) in auth.extra.iter_mut() {
            redact_entry(key, value);
        }
    }
}

fn redact_entry(key: &str, value: &mut Value) {
    if SECRET_KEYS.contains(&key) && !value.is_null() {
        *value = Value::String(REDACTED.to_string());
    } else {
        redact_value(value);
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            for (key, entry) in map.iter_mut() {
                match key.as_str() {
                    Some(key) => redact_entry(key, entry),
                    None => redact_value(entry),
                }
            }
        }
        Value::Sequence(items) => items.iter_mut().for_each(redact_value),
        Value::Tagged(tagged) => redact_value(&mut tagged.value),
        _ => {}
    }
}
