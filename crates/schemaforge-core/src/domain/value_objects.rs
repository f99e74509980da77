//! Domain value objects: ConfigValue, RelationKind, ForeignAction.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! `ConfigValue` is the ordered, loosely typed tree the schema hands us for
//! pass-through sections, options and fragments; `RelationKind` and
//! `ForeignAction` are the closed vocabularies the resolvers dispatch on.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;

use crate::domain::error::DomainError;

/// Ordered string-keyed map of config values.
pub type ConfigMap = IndexMap<String, ConfigValue>;

// ── ConfigValue ──────────────────────────────────────────────────────────────

/// A loosely typed, order-preserving configuration value.
///
/// Mirrors what a YAML or JSON document can hold. Map keys are always
/// strings; scalar keys (`1: foo`) are stringified on the way in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// `true` for `Null`, empty strings, empty lists and empty maps.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::List(l) => l.is_empty(),
            Self::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Scalar rendered as plain text, the way it would read in a rule string.
    ///
    /// Returns `None` for `Null`, lists and maps.
    pub fn to_plain_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format_number(*f)),
            Self::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Render a float without a trailing `.0` when it is whole.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl Default for ConfigValue {
    fn default() -> Self {
        Self::Null
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(m: ConfigMap) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML or JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<ConfigValue, D::Error> {
        ConfigValue::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ConfigValue, E> {
        Ok(i64::try_from(v).map_or(ConfigValue::Float(v as f64), ConfigValue::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ConfigValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<ConfigValue>()? {
            items.push(item);
        }
        Ok(ConfigValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConfigValue, A::Error> {
        let mut entries = ConfigMap::new();
        while let Some(key) = map.next_key::<ConfigValue>()? {
            let key = key
                .to_plain_string()
                .ok_or_else(|| de::Error::custom("map keys must be scalars"))?;
            let value = map.next_value::<ConfigValue>()?;
            entries.insert(key, value);
        }
        Ok(ConfigValue::Map(entries))
    }
}

// ── RelationKind ─────────────────────────────────────────────────────────────

/// The eleven supported relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
    MorphTo,
    MorphOne,
    MorphMany,
    MorphToMany,
    MorphedByMany,
    HasOneThrough,
    HasManyThrough,
}

impl RelationKind {
    pub const ALL: [RelationKind; 11] = [
        Self::BelongsTo,
        Self::HasOne,
        Self::HasMany,
        Self::BelongsToMany,
        Self::MorphTo,
        Self::MorphOne,
        Self::MorphMany,
        Self::MorphToMany,
        Self::MorphedByMany,
        Self::HasOneThrough,
        Self::HasManyThrough,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasOne => "hasOne",
            Self::HasMany => "hasMany",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphTo => "morphTo",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
            Self::MorphToMany => "morphToMany",
            Self::MorphedByMany => "morphedByMany",
            Self::HasOneThrough => "hasOneThrough",
            Self::HasManyThrough => "hasManyThrough",
        }
    }

    /// Kinds whose dynamic property is a collection name.
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::BelongsToMany)
    }

    /// Kinds backed by an intermediate pivot table.
    pub const fn uses_pivot(self) -> bool {
        matches!(
            self,
            Self::BelongsToMany | Self::MorphToMany | Self::MorphedByMany
        )
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownRelationKind {
                relation: String::new(),
                kind: s.to_string(),
            })
    }
}

// ── ForeignAction ────────────────────────────────────────────────────────────

/// Referential action for `onDelete` / `onUpdate` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignAction {
    Cascade,
    Restrict,
    SetNull,
    NoAction,
}

impl ForeignAction {
    /// Case-insensitive parse. Unrecognised actions yield `None` and are
    /// dropped from the generated clause.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cascade" => Some(Self::Cascade),
            "restrict" => Some(Self::Restrict),
            "set null" => Some(Self::SetNull),
            "no action" => Some(Self::NoAction),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
            Self::SetNull => "set null",
            Self::NoAction => "no action",
        }
    }
}

impl fmt::Display for ForeignAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_kind_parses_case_insensitively() {
        assert_eq!(
            "belongsToMany".parse::<RelationKind>().unwrap(),
            RelationKind::BelongsToMany
        );
        assert_eq!(
            "MORPHEDBYMANY".parse::<RelationKind>().unwrap(),
            RelationKind::MorphedByMany
        );
        assert!("manyToMany".parse::<RelationKind>().is_err());
    }

    #[test]
    fn relation_kind_display_round_trips_every_kind() {
        for kind in RelationKind::ALL {
            assert_eq!(kind.to_string().parse::<RelationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn foreign_action_is_lenient() {
        assert_eq!(ForeignAction::parse("CASCADE"), Some(ForeignAction::Cascade));
        assert_eq!(ForeignAction::parse("Set Null"), Some(ForeignAction::SetNull));
        assert_eq!(ForeignAction::parse("explode"), None);
    }

    #[test]
    fn config_value_keeps_yaml_order_and_stringifies_keys() {
        let value: ConfigValue = serde_yaml::from_str("b: 1\na: [x, 2.5]\n3: null\n").unwrap();
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "3"]);
        assert_eq!(map["b"], ConfigValue::Int(1));
        assert_eq!(
            map["a"],
            ConfigValue::List(vec!["x".into(), ConfigValue::Float(2.5)])
        );
        assert_eq!(map["3"], ConfigValue::Null);
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(1.5), "1.5");
    }
}
