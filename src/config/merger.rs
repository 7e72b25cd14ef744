//! Layering of the project config and its local override.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced wholesale (a local `paths:` list wins)
//! - A null in the override removes the key
//! - Scalars in the override replace the base

use serde_yaml::Value;

/// Merge `overlay` on top of `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();

            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                    continue;
                }
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }

            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Fold config layers in order; later layers take precedence.
pub fn merge_configs(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            // An empty file parses to null and contributes nothing.
            if layer.is_null() {
                acc
            } else {
                deep_merge(&acc, layer)
            }
        })
}
