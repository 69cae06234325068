//! Two YAML readings of the same document.
//!
//! The safe reading accepts plain YAML only and refuses custom tags. The
//! permissive reading keeps custom tags, rendering `!tag value` as
//! `{"!tag": value}`. Neither constructs or runs anything named by a tag.

use serde_json::{Map, Number, Value as Json};
use serde_yaml::Value as Yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Safe,
    Permissive,
}

pub fn parse_safe(text: &str) -> Result<Json, String> {
    parse(text, Mode::Safe)
}

pub fn parse_permissive(text: &str) -> Result<Json, String> {
    parse(text, Mode::Permissive)
}

pub fn parse(text: &str, mode: Mode) -> Result<Json, String> {
    if text.trim().is_empty() {
        return Ok(Json::Null);
    }
    let mut doc: Yaml = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    doc.apply_merge().map_err(|e| e.to_string())?;
    to_json(doc, mode)
}

fn to_json(value: Yaml, mode: Mode) -> Result<Json, String> {
    Ok(match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => number(&n),
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(items) => Json::Array(
            items
                .into_iter()
                .map(|item| to_json(item, mode))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(key_string(key, mode)?, to_json(value, mode)?);
            }
            Json::Object(object)
        }
        Yaml::Tagged(tagged) => match mode {
            Mode::Safe => return Err(format!("unsupported tag {}", tagged.tag)),
            Mode::Permissive => {
                let mut object = Map::with_capacity(1);
                object.insert(tagged.tag.to_string(), to_json(tagged.value, mode)?);
                Json::Object(object)
            }
        },
    })
}

fn number(n: &serde_yaml::Number) -> Json {
    if let Some(i) = n.as_i64() {
        Json::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Json::Number(u.into())
    } else {
        // NaN and infinities have no JSON form
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Json::Number)
            .unwrap_or(Json::Null)
    }
}

fn key_string(key: Yaml, mode: Mode) -> Result<String, String> {
    Ok(match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_owned(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => to_json(other, mode)?.to_string(),
    })
}
