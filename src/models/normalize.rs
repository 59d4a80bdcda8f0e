//! Key normalization for backend payloads.
//!
//! The backend mixes `id`/`_id` and camelCase/snake_case names. Before a
//! model is decoded, alternate spellings are folded into the canonical key so
//! a payload carrying both spellings still decodes.

use serde_json::{Map, Value};

/// Moves each `(alias, canonical)` alias value under its canonical key. A
/// non-null canonical value wins; the alias is dropped either way.
pub(crate) fn fold_aliases(mut map: Map<String, Value>, aliases: &[(&str, &str)]) -> Map<String, Value> {
    for (alias, canonical) in aliases {
        let Some(value) = map.remove(*alias) else {
            continue;
        };
        let keep_canonical = map.get(*canonical).is_some_and(|v| !v.is_null());
        if !keep_canonical {
            map.insert(canonical.to_string(), value);
        }
    }
    map
}

/// Implements `Serialize`/`Deserialize` for a model derived with
/// `#[serde(remote = "Self")]`, folding `$aliases` on the way in.
macro_rules! normalized_serde {
    ($model:ident, $aliases:expr) => {
        impl serde::Serialize for $model {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $model::serialize(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $model {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                use serde::de::Error as _;
                let raw = <serde_json::Map<String, serde_json::Value> as serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                let folded = $crate::models::normalize::fold_aliases(raw, $aliases);
                $model::deserialize(serde_json::Value::Object(folded)).map_err(D::Error::custom)
            }
        }
    };
}

pub(crate) use normalized_serde;
