//! Resource expansion: one declaration, many build objects.

use respack_convert::shaderc::SHADER_PLATFORMS;
use serde_json::Value;

use crate::object::BuildObject;
use crate::registry::{Expander, Expansion, Registry};

/// Separator between a base name and the expansion subtype.
pub const SUBTYPE_SEPARATOR: char = '#';

/// Applies every registered expander to `objects`.
///
/// An object whose expander yields variants is replaced, in place, by those
/// variants, each named `<name>#<subtype>`. Objects without an expander, or
/// whose expander yields nothing, pass through unchanged.
pub fn expand_objects(objects: Vec<BuildObject>, registry: &Registry) -> Vec<BuildObject> {
    let mut expanded = Vec::with_capacity(objects.len());
    for object in objects {
        let Some(expander) = registry.expander(&object.object_type) else {
            expanded.push(object);
            continue;
        };

        let variants = expander.expand(&object);
        if variants.is_empty() {
            expanded.push(object);
            continue;
        }

        log::debug!("expanded {} into {} objects", object.name, variants.len());
        for Expansion { object: mut derived, subtype } in variants {
            derived.name = format!("{}{SUBTYPE_SEPARATOR}{subtype}", object.name);
            derived.subtype = Some(subtype);
            expanded.push(derived);
        }
    }
    expanded
}

/// Fans a shader declaration out to every supported platform.
///
/// Applies when `platform` is absent or `"all"`; a shader pinned to one
/// platform is left alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShaderExpander;

impl Expander for ShaderExpander {
    fn expand(&self, object: &BuildObject) -> Vec<Expansion> {
        let platform = object.params.get("platform");
        let wants_all = match platform {
            None | Some(Value::Null) => true,
            Some(value) => value.as_str() == Some("all"),
        };
        if !wants_all {
            return Vec::new();
        }

        SHADER_PLATFORMS
            .iter()
            .filter_map(|platform| {
                let params = with_param(&object.params, "platform", Value::from(*platform))?;
                let mut derived = object.clone();
                derived.params = params;
                Some(Expansion {
                    object: derived,
                    subtype: platform.to_string(),
                })
            })
            .collect()
    }
}

/// Returns a copy of `params` with `key` set, or `None` if `params` is not
/// an object.
fn with_param(params: &Value, key: &str, value: Value) -> Option<Value> {
    let mut map = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Default::default(),
        _ => return None,
    };
    map.insert(key.to_string(), value);
    Some(Value::Object(map))
}
