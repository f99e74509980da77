//! Field-definition metadata for the UI layer.
//!
//! Produces the `fieldDefinitions` map of a model config file: one
//! descriptor per declared field, partial field-sets expanded in place, and
//! one virtual descriptor per collection or polymorphic relation.

use crate::domain::{
    entities::schema::{FieldDeclaration, ModelRecord, RelationDeclaration},
    error::DomainError,
    naming,
    relations::{AccessorKeys, AccessorShape, build_relation_accessor},
    type_resolver::resolve_ui_type,
    value_objects::{ConfigMap, ConfigValue, RelationKind, format_number},
};

const DOCUMENT_TYPES: [&str; 3] = ["pdf", "doc", "docx"];
const IMAGE_TYPES: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];
const DEFAULT_MAX_SIZE_MB: f64 = 1.0;
const DEFAULT_DISPLAY_FIELD: &str = "name";

/// Result of building a model's field definitions.
#[derive(Debug, Clone, Default)]
pub struct FieldMetadata {
    pub definitions: ConfigMap,
    /// Units that were skipped: unknown relations, missing partials.
    pub issues: Vec<DomainError>,
}

/// Build the ordered descriptor map for `model`.
///
/// `load_partial` resolves a partial reference to its field-set; `None`
/// means the fragment does not exist.
pub fn build_field_metadata(
    model_name: &str,
    module: &str,
    model: &ModelRecord,
    load_partial: &mut dyn FnMut(&str) -> Option<ConfigMap>,
) -> FieldMetadata {
    let mut out = FieldMetadata::default();

    let mut shapes = Vec::with_capacity(model.relations.len());
    for (name, relation) in &model.relations {
        match build_relation_accessor(name, relation, model_name, module) {
            Ok(shape) => shapes.push((shape, relation)),
            Err(e) => out.issues.push(e),
        }
    }

    for (name, field) in &model.fields {
        if let Some(path) = &field.partial {
            match load_partial(path) {
                Some(partial) => out.definitions.extend(partial),
                None => out
                    .issues
                    .push(DomainError::MissingPartial { path: path.clone() }),
            }
            continue;
        }

        let mut descriptor = field_descriptor(name, field);
        if field.foreign.is_some() {
            if let Some((shape, relation)) = shapes
                .iter()
                .find(|(shape, _)| shape.foreign_key() == Some(name.as_str()))
            {
                descriptor.extend(foreign_key_overlay(name, shape, relation));
            }
        }
        out.definitions.insert(name.clone(), ConfigValue::Map(descriptor));
    }

    for (shape, relation) in &shapes {
        if let Some(descriptor) = relation_descriptor(shape, relation) {
            out.definitions
                .insert(shape.method.clone(), ConfigValue::Map(descriptor));
        }
    }

    out
}

fn field_descriptor(name: &str, field: &FieldDeclaration) -> ConfigMap {
    let mut d = ConfigMap::new();
    d.insert(
        "display".into(),
        field.display.as_deref().unwrap_or("inline").into(),
    );
    d.insert("field_type".into(), resolve_ui_type(field.logical_type()).into());
    d.insert(
        "label".into(),
        field
            .label
            .clone()
            .unwrap_or_else(|| naming::field_label(name))
            .into(),
    );
    if !field.validation.is_empty() {
        d.insert("validation".into(), field.validation.join("|").into());
    }
    if field.logical_type() == "file" {
        apply_file_policy(&mut d, field);
    }
    if let Some(options) = &field.options {
        d.insert("options".into(), normalize_options(options));
    }
    if field.auto_generate {
        d.insert("autoGenerate".into(), true.into());
    }
    if field.multi_select {
        d.insert("multiSelect".into(), true.into());
    }
    if let Some(reactivity) = &field.reactivity {
        d.insert("reactivity".into(), reactivity.clone());
    }
    d
}

/// Allowed extensions, the size limit in MB, and, unless the field declares
/// its own rules, a `mimes:...|max:...` rule whose ceiling is in KB.
fn apply_file_policy(d: &mut ConfigMap, field: &FieldDeclaration) {
    let file_types = resolve_file_types(field.file_types.as_ref());
    let max_size_mb = field.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB);

    if field.validation.is_empty() {
        d.insert(
            "validation".into(),
            format!(
                "mimes:{}|max:{}",
                file_types.join(","),
                format_number(max_size_mb * 1024.0)
            )
            .into(),
        );
    }
    d.insert("fileTypes".into(), file_types.into());
    d.insert("maxSizeMB".into(), number(max_size_mb));
}

fn resolve_file_types(declared: Option<&ConfigValue>) -> Vec<String> {
    let owned = |types: &[&str]| types.iter().map(ToString::to_string).collect();
    match declared {
        Some(ConfigValue::String(s)) if s == "document" => owned(&DOCUMENT_TYPES),
        Some(ConfigValue::String(s)) if s == "image" => owned(&IMAGE_TYPES),
        Some(ConfigValue::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Some(ConfigValue::List(items)) => items
            .iter()
            .filter_map(ConfigValue::to_plain_string)
            .collect(),
        _ => DOCUMENT_TYPES
            .iter()
            .chain(IMAGE_TYPES.iter())
            .map(ToString::to_string)
            .collect(),
    }
}

/// Lists and maps are kept; `"a, b"` becomes `{a: a, b: b}`.
fn normalize_options(options: &ConfigValue) -> ConfigValue {
    match options {
        ConfigValue::String(s) => ConfigValue::Map(
            s.split(',')
                .map(str::trim)
                .map(|o| (o.to_string(), ConfigValue::from(o)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn number(value: f64) -> ConfigValue {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        ConfigValue::Int(value as i64)
    } else {
        ConfigValue::Float(value)
    }
}

/// `customer_id` → `customer`; `line_item_id` on a hasMany → `lineItems`.
pub fn dynamic_property(kind: RelationKind, field_name: &str) -> String {
    let base = naming::camel(field_name.strip_suffix("_id").unwrap_or(field_name));
    if kind.is_collection() {
        naming::plural(&base)
    } else {
        base
    }
}

fn related_model(shape: &AccessorShape, relation: &RelationDeclaration) -> ConfigValue {
    shape
        .related
        .as_ref()
        .map(|class| ConfigValue::from(class.fqcn.as_str()))
        .or_else(|| relation.model.clone().map(ConfigValue::from))
        .unwrap_or_default()
}

fn display_field(relation: &RelationDeclaration) -> &str {
    relation
        .display_field
        .as_deref()
        .unwrap_or(DEFAULT_DISPLAY_FIELD)
}

fn picker_options(model: &ConfigValue, relation: &RelationDeclaration) -> ConfigValue {
    let mut options = ConfigMap::new();
    options.insert("model".into(), model.clone());
    options.insert("column".into(), display_field(relation).into());
    options.insert("hintField".into(), relation.hint_field.clone().into());
    ConfigValue::Map(options)
}

fn foreign_key_overlay(
    field_name: &str,
    shape: &AccessorShape,
    relation: &RelationDeclaration,
) -> ConfigMap {
    let model = related_model(shape, relation);
    let mut relationship = ConfigMap::new();
    relationship.insert("model".into(), model.clone());
    relationship.insert("type".into(), shape.kind.as_str().into());
    relationship.insert("display_field".into(), display_field(relation).into());
    relationship.insert(
        "dynamic_property".into(),
        dynamic_property(shape.kind, field_name).into(),
    );
    relationship.insert("foreign_key".into(), field_name.into());
    relationship.insert("inlineAdd".into(), relation.inline_add.unwrap_or(false).into());

    let mut overlay = ConfigMap::new();
    overlay.insert("relationship".into(), ConfigValue::Map(relationship));
    overlay.insert("options".into(), picker_options(&model, relation));
    overlay
}

/// Virtual descriptor for relations the UI edits as a field of their own.
fn relation_descriptor(
    shape: &AccessorShape,
    relation: &RelationDeclaration,
) -> Option<ConfigMap> {
    let model = related_model(shape, relation);
    let label = naming::title(&naming::snake(&shape.method).replace('_', " "));
    let display = relation.display.as_deref().unwrap_or("inline");
    let inline_add = relation.inline_add.unwrap_or(false);

    let mut relationship = ConfigMap::new();
    relationship.insert("model".into(), model.clone());
    relationship.insert("type".into(), shape.kind.as_str().into());

    let field_type = match (&shape.kind, &shape.keys) {
        (RelationKind::MorphTo, _) => {
            relationship.insert("dynamic_property".into(), shape.method.as_str().into());
            "morphTo"
        }
        (
            RelationKind::MorphToMany,
            AccessorKeys::MorphPivot {
                morph_type,
                pivot_table,
                foreign_pivot_key,
                related_pivot_key,
                ..
            },
        ) => {
            relationship.insert("display_field".into(), display_field(relation).into());
            relationship.insert("dynamic_property".into(), shape.method.as_str().into());
            relationship.insert("foreign_key".into(), foreign_pivot_key.as_str().into());
            relationship.insert("related_pivot_key".into(), related_pivot_key.as_str().into());
            relationship.insert("morph_type".into(), morph_type.as_str().into());
            relationship.insert("pivot_table".into(), pivot_table.as_str().into());
            relationship.insert("inlineAdd".into(), inline_add.into());
            "morphToMany"
        }
        (
            RelationKind::HasMany
            | RelationKind::BelongsToMany
            | RelationKind::MorphMany
            | RelationKind::MorphedByMany,
            keys,
        ) => {
            let foreign_key = match keys {
                AccessorKeys::HasOneOrMany { foreign_key, .. } => Some(foreign_key.as_str()),
                AccessorKeys::Pivot {
                    foreign_pivot_key, ..
                }
                | AccessorKeys::MorphPivot {
                    foreign_pivot_key, ..
                } => Some(foreign_pivot_key.as_str()),
                _ => None,
            };
            relationship.insert("display_field".into(), display_field(relation).into());
            relationship.insert("hintField".into(), relation.hint_field.clone().into());
            relationship.insert("dynamic_property".into(), shape.method.as_str().into());
            relationship.insert("foreign_key".into(), foreign_key.into());
            relationship.insert("local_key".into(), "id".into());
            relationship.insert("inlineAdd".into(), inline_add.into());
            "checkbox"
        }
        _ => return None,
    };

    let mut d = ConfigMap::new();
    d.insert("field_type".into(), field_type.into());
    d.insert("relationship".into(), ConfigValue::Map(relationship));
    if field_type != "morphTo" {
        d.insert("options".into(), picker_options(&model, relation));
    }
    d.insert("label".into(), label.into());
    if field_type != "morphTo" {
        d.insert("multiSelect".into(), true.into());
    }
    d.insert("display".into(), display.into());
    Some(d)
}
