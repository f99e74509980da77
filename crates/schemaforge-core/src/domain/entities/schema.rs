//! The parsed schema document.
//!
//! A [`Schema`] is deserialised once per run and never mutated. Every
//! optional key stays optional here; resolvers own the defaults so that the
//! conventions live in one place.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::domain::{
    error::DomainError,
    naming,
    value_objects::{ConfigMap, ConfigValue, ForeignAction, RelationKind},
};

/// Root of a schema document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub models: IndexMap<String, ModelRecord>,
    #[serde(default)]
    pub wizards: Option<ConfigValue>,
    #[serde(default)]
    pub dashboards: Option<ConfigValue>,
}

impl Schema {
    pub fn model(&self, name: &str) -> Option<&ModelRecord> {
        self.models.get(name)
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

/// One entity's full declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub module: Option<String>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldDeclaration>,
    #[serde(default)]
    pub relations: IndexMap<String, RelationDeclaration>,
    pub table: Option<String>,

    #[serde(default)]
    pub indexes: Vec<String>,
    #[serde(default)]
    pub unique_indexes: Vec<String>,
    #[serde(default)]
    pub compound_indexes: Vec<Vec<String>>,
    #[serde(default)]
    pub compound_unique_indexes: Vec<Vec<String>>,

    #[serde(default)]
    pub is_pivot: bool,
    #[serde(default)]
    pub soft_deletes: bool,
    pub timestamps: Option<bool>,
    #[serde(default, rename = "override", alias = "overrideExisting")]
    pub override_existing: bool,

    // model class
    #[serde(default)]
    pub fillable: Vec<String>,
    #[serde(default)]
    pub guarded: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    pub display_fields: Option<Vec<String>>,
    pub primary_key: Option<String>,
    pub incrementing: Option<bool>,
    pub key_type: Option<String>,
    pub date_format: Option<String>,
    /// Model event name → handler class, e.g. `created: OrderCreated::class`.
    pub events: Option<ConfigMap>,
    pub rules: Option<ConfigMap>,
    pub messages: Option<ConfigMap>,
    /// Raw PHP statements placed in the model's `boot()` method.
    #[serde(default)]
    pub boot_methods: Vec<String>,

    // config file
    #[serde(default)]
    pub includes: Vec<String>,
    pub hidden_fields: Option<ConfigValue>,
    pub simple_actions: Option<ConfigValue>,
    pub is_transaction: Option<bool>,
    pub dispatch_events: Option<bool>,
    pub controls: Option<ConfigValue>,
    pub field_groups: Option<ConfigValue>,
    pub more_actions: Option<ConfigValue>,
    pub switch_views: Option<ConfigValue>,
    pub report: Option<ConfigValue>,

    // navigation
    pub sidebar: Option<MenuSection>,
    pub top_nav: Option<MenuSection>,
    pub bottom_bar: Option<MenuSection>,
    pub icon_classes: Option<String>,
}

impl ModelRecord {
    /// The owning module, or a missing-input error naming the model.
    pub fn require_module(&self, model: &str) -> Result<&str, DomainError> {
        self.module
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DomainError::MissingModule {
                model: model.to_string(),
            })
    }

    /// Table backing this model: explicit override, else the naming convention.
    pub fn table_name(&self, model: &str) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| naming::table_name(model, self.is_pivot))
    }

    pub fn has_timestamps(&self) -> bool {
        self.timestamps.unwrap_or(true)
    }
}

// ── Field ────────────────────────────────────────────────────────────────────

/// A declared field. Either a concrete column or a reference to a partial
/// field-set stored in a fragment file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDeclaration {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub display: Option<String>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub validation: Vec<String>,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub foreign: Option<ForeignKeySpec>,
    #[serde(default)]
    pub is_explicit_constraint: bool,
    pub options: Option<ConfigValue>,
    pub file_types: Option<ConfigValue>,
    #[serde(rename = "maxSizeMB", default, deserialize_with = "lenient_megabytes")]
    pub max_size_mb: Option<f64>,
    pub fillable: Option<bool>,
    #[serde(default)]
    pub auto_generate: bool,
    #[serde(default)]
    pub multi_select: bool,
    pub reactivity: Option<ConfigValue>,
    pub partial: Option<String>,
}

impl FieldDeclaration {
    /// Logical type, `string` when omitted.
    pub fn logical_type(&self) -> &str {
        self.field_type.as_deref().unwrap_or("string")
    }

    /// Whether the explicit-constraint style applies to this field's FK.
    pub fn uses_explicit_constraint(&self) -> bool {
        self.is_explicit_constraint
            || self
                .foreign
                .as_ref()
                .is_some_and(|fk| fk.is_explicit_constraint)
    }

    pub fn is_fillable(&self) -> bool {
        self.fillable.unwrap_or(true)
    }
}

/// Column modifiers.
///
/// Values are kept loosely typed: a malformed value (say `nullable: "yes"`)
/// is ignored by the column builder instead of failing the whole schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Modifiers {
    pub nullable: Option<ConfigValue>,
    pub unique: Option<ConfigValue>,
    pub default: Option<ConfigValue>,
    pub length: Option<ConfigValue>,
    pub precision: Option<ConfigValue>,
    pub comment: Option<ConfigValue>,
}

/// Foreign-key wiring for a column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeySpec {
    pub table: Option<String>,
    pub column: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    #[serde(default)]
    pub is_explicit_constraint: bool,
}

impl ForeignKeySpec {
    /// Referenced table; defaults to the plural of the field minus `_id`.
    pub fn table_for(&self, field: &str) -> String {
        self.table.clone().unwrap_or_else(|| {
            let base = field.strip_suffix("_id").unwrap_or(field);
            naming::plural(&naming::snake(base))
        })
    }

    /// Referenced column; defaults to `id`.
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or("id")
    }

    pub fn on_delete(&self) -> Option<ForeignAction> {
        self.on_delete.as_deref().and_then(ForeignAction::parse)
    }

    pub fn on_update(&self) -> Option<ForeignAction> {
        self.on_update.as_deref().and_then(ForeignAction::parse)
    }
}

// ── Relation ─────────────────────────────────────────────────────────────────

/// A declared relationship.
///
/// A missing `type` parses as an empty kind; [`Self::kind`] then reports it
/// for this relation alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDeclaration {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub model: Option<String>,
    pub module: Option<String>,

    pub foreign_key: Option<String>,
    pub owner_key: Option<String>,
    pub local_key: Option<String>,
    pub parent_key: Option<String>,
    pub related_key: Option<String>,

    pub pivot_table: Option<String>,
    pub foreign_pivot_key: Option<String>,
    pub related_pivot_key: Option<String>,

    pub name: Option<String>,
    pub morph_type: Option<String>,
    pub morph_id: Option<String>,

    pub through: Option<String>,
    pub first_key: Option<String>,
    pub second_key: Option<String>,
    pub second_local_key: Option<String>,

    pub display: Option<String>,
    pub display_field: Option<String>,
    pub inline_add: Option<bool>,
    pub hint_field: Option<String>,
}

impl RelationDeclaration {
    pub fn kind(&self, relation: &str) -> Result<RelationKind, DomainError> {
        self.kind
            .parse::<RelationKind>()
            .map_err(|_| DomainError::UnknownRelationKind {
                relation: relation.to_string(),
                kind: self.kind.clone(),
            })
    }

    /// The declaration as written, for pass-through into config files.
    pub fn to_config(&self) -> ConfigValue {
        let mut map = ConfigMap::new();
        map.insert("type".into(), self.kind.clone().into());
        let optional = [
            ("model", &self.model),
            ("module", &self.module),
            ("foreignKey", &self.foreign_key),
            ("ownerKey", &self.owner_key),
            ("localKey", &self.local_key),
            ("parentKey", &self.parent_key),
            ("relatedKey", &self.related_key),
            ("pivotTable", &self.pivot_table),
            ("foreignPivotKey", &self.foreign_pivot_key),
            ("relatedPivotKey", &self.related_pivot_key),
            ("name", &self.name),
            ("morphType", &self.morph_type),
            ("morphId", &self.morph_id),
            ("through", &self.through),
            ("firstKey", &self.first_key),
            ("secondKey", &self.second_key),
            ("secondLocalKey", &self.second_local_key),
            ("display", &self.display),
            ("displayField", &self.display_field),
            ("hintField", &self.hint_field),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                map.insert(key.into(), value.clone().into());
            }
        }
        if let Some(inline_add) = self.inline_add {
            map.insert("inlineAdd".into(), inline_add.into());
        }
        ConfigValue::Map(map)
    }
}

// ── Navigation ───────────────────────────────────────────────────────────────

/// Per-model settings for one navigation menu.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub add: Option<bool>,
    pub title: Option<String>,
    pub icon_classes: Option<String>,
    pub url: Option<String>,
    pub permission: Option<String>,
    pub group_title: Option<String>,
    pub item_type: Option<String>,
    pub key: Option<String>,
    #[serde(default)]
    pub submenu: Vec<SubmenuItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmenuItem {
    pub title: Option<String>,
    pub url: Option<String>,
    pub permission: Option<String>,
    pub icon: Option<String>,
}

/// Accept `validation: "required|max:5"` as well as a rule list.
fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(rules)) => rules
            .split('|')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect(),
        Some(OneOrMany::Many(rules)) => rules,
        None => Vec::new(),
    })
}

/// Accept `maxSizeMB: 2` and `maxSizeMB: "2"`. Anything else, or a size
/// that is not a positive number, falls back to the default policy.
fn lenient_megabytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let parsed = match Option::<Size>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Size::Number(n)) => Some(n),
        Some(Size::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(Size::Other(_)) => None,
    };
    match parsed {
        Some(n) if n.is_finite() && n > 0.0 => Ok(Some(n)),
        _ => {
            tracing::warn!("Ignoring unusable maxSizeMB; the default size limit applies");
            Ok(None)
        }
    }
}
