//! Migration column and index declarations.

use crate::domain::{
    entities::schema::{FieldDeclaration, ForeignKeySpec, Modifiers, ModelRecord},
    naming::quote,
    type_resolver::{is_length_bounded, resolve_storage_type},
    value_objects::{ConfigValue, format_number},
};

/// Indentation of statements inside the migration's `Schema::create` closure.
pub const COLUMN_INDENT: &str = "            ";

/// One field's column declaration: a single statement, or a raw column
/// plus a separate foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub lines: Vec<String>,
    /// The trailing `;` is already part of `lines`.
    pub terminated: bool,
}

impl ColumnDefinition {
    fn open(line: String) -> Self {
        Self {
            lines: vec![line],
            terminated: false,
        }
    }

    fn closed(lines: Vec<String>) -> Self {
        Self {
            lines,
            terminated: true,
        }
    }

    /// Statement lines, each ending in exactly one `;`.
    pub fn statements(&self) -> Vec<String> {
        if self.terminated {
            return self.lines.clone();
        }
        self.lines.iter().map(|line| format!("{line};")).collect()
    }
}

/// Whether a field contributes no column at all.
pub fn is_column_less(field_name: &str, field: &FieldDeclaration) -> bool {
    field_name.ends_with("_confirmation") || field.partial.is_some()
}

/// Build the column declaration for one field.
///
/// Returns `None` for `_confirmation` fields and partial references.
pub fn build_column(field_name: &str, field: &FieldDeclaration) -> Option<ColumnDefinition> {
    if is_column_less(field_name, field) {
        return None;
    }
    let storage = resolve_storage_type(field.logical_type());

    match &field.foreign {
        Some(fk) if !field.uses_explicit_constraint() => {
            let mut line = format!("$table->foreignId('{field_name}')");
            apply_modifiers(&mut line, &field.modifiers);
            line.push_str(&format!(
                "->constrained('{}', '{}')",
                fk.table_for(field_name),
                fk.column()
            ));
            apply_actions(&mut line, fk);
            Some(ColumnDefinition::open(line))
        }
        Some(fk) => {
            let mut column = format!("$table->{storage}('{field_name}')");
            apply_modifiers(&mut column, &field.modifiers);
            column.push(';');

            let mut constraint = format!(
                "$table->foreign('{field_name}')->references('{}')->on('{}')",
                fk.column(),
                fk.table_for(field_name)
            );
            apply_actions(&mut constraint, fk);
            constraint.push(';');

            Some(ColumnDefinition::closed(vec![column, constraint]))
        }
        None => {
            let mut line = format!("$table->{storage}('{field_name}'");
            line.push_str(&type_parameters(&storage, &field.modifiers));
            line.push(')');
            apply_modifiers(&mut line, &field.modifiers);
            line.push(';');
            Some(ColumnDefinition::closed(vec![line]))
        }
    }
}

/// All column statements of a model, in field declaration order, joined
/// for interpolation into a migration stub.
pub fn render_columns(model: &ModelRecord) -> String {
    model
        .fields
        .iter()
        .filter_map(|(name, field)| build_column(name, field))
        .flat_map(|column| column.statements())
        .collect::<Vec<_>>()
        .join(&format!("\n{COLUMN_INDENT}"))
}

/// Index statements: single, unique, compound, compound unique, then a
/// unique index for every field validated with a `unique:` rule.
pub fn build_indexes(model: &ModelRecord) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(
        model
            .indexes
            .iter()
            .map(|column| format!("$table->index({});", quote(column))),
    );
    lines.extend(
        model
            .unique_indexes
            .iter()
            .map(|column| format!("$table->unique({});", quote(column))),
    );
    lines.extend(
        model
            .compound_indexes
            .iter()
            .map(|columns| format!("$table->index({});", column_list(columns))),
    );
    lines.extend(
        model
            .compound_unique_indexes
            .iter()
            .map(|columns| format!("$table->unique({});", column_list(columns))),
    );
    lines.extend(
        model
            .fields
            .iter()
            .filter(|(_, field)| field.validation.iter().any(|rule| rule.contains("unique:")))
            .map(|(name, _)| format!("$table->unique({});", quote(name))),
    );
    lines
}

/// Index statements joined for a migration stub.
pub fn render_indexes(model: &ModelRecord) -> String {
    build_indexes(model).join(&format!("\n{COLUMN_INDENT}"))
}

fn column_list(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| quote(c)).collect();
    format!("[{}]", quoted.join(", "))
}

/// `, {length}` for bounded strings and `, {precision}, {scale}` for decimals.
fn type_parameters(storage: &str, modifiers: &Modifiers) -> String {
    if is_length_bounded(storage) {
        if let Some(length) = modifiers.length.as_ref().and_then(ConfigValue::to_plain_string) {
            return format!(", {length}");
        }
    } else if storage == "decimal" {
        if let Some(precision) = modifiers
            .precision
            .as_ref()
            .and_then(ConfigValue::to_plain_string)
        {
            let mut parts = precision.split(',').map(str::trim);
            let total = parts.next().unwrap_or_default();
            let scale = parts.next().unwrap_or(total);
            return format!(", {total}, {scale}");
        }
    }
    String::new()
}

/// Append modifiers in their fixed order: nullable, unique, default, comment.
fn apply_modifiers(line: &mut String, modifiers: &Modifiers) {
    if is_true(modifiers.nullable.as_ref()) {
        line.push_str("->nullable()");
    }
    if is_true(modifiers.unique.as_ref()) {
        line.push_str("->unique()");
    }
    if let Some(default) = modifiers.default.as_ref().and_then(default_literal) {
        line.push_str(&format!("->default({default})"));
    }
    if let Some(comment) = modifiers.comment.as_ref().and_then(ConfigValue::to_plain_string) {
        line.push_str(&format!("->comment({})", quote(&comment)));
    }
}

fn apply_actions(line: &mut String, fk: &ForeignKeySpec) {
    if let Some(action) = fk.on_delete() {
        line.push_str(&format!("->onDelete('{action}')"));
    }
    if let Some(action) = fk.on_update() {
        line.push_str(&format!("->onUpdate('{action}')"));
    }
}

fn is_true(value: Option<&ConfigValue>) -> bool {
    matches!(value, Some(ConfigValue::Bool(true)))
}

fn default_literal(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Bool(b) => Some(b.to_string()),
        ConfigValue::Int(i) => Some(i.to_string()),
        ConfigValue::Float(f) => Some(format_number(*f)),
        ConfigValue::String(s) if is_numeric(s) => Some(s.trim().to_string()),
        ConfigValue::String(s) => Some(quote(s)),
        _ => None,
    }
}

/// Numeric-looking strings render as bare literals.
fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(yaml: &str) -> FieldDeclaration {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn model(yaml: &str) -> ModelRecord {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn confirmation_fields_produce_no_column() {
        assert!(build_column("password_confirmation", &field("type: password")).is_none());
        assert!(build_column("contacts", &field("partial: contact.yaml")).is_none());
    }

    #[test]
    fn plain_string_with_length_and_modifiers() {
        let column = build_column(
            "name",
            &field("type: string\nmodifiers: { comment: \"it's\", nullable: true, length: 100, unique: true }"),
        )
        .unwrap();
        assert_eq!(
            column.statements(),
            ["$table->string('name', 100)->nullable()->unique()->comment('it\\'s');"]
        );
    }

    #[test]
    fn nullable_needs_a_real_boolean() {
        let column = build_column("name", &field("modifiers: { nullable: \"yes\" }")).unwrap();
        assert_eq!(column.statements(), ["$table->string('name');"]);
    }

    #[test]
    fn decimal_precision_and_scale() {
        let column = build_column("price", &field("type: decimal\nmodifiers: { precision: \"10,4\" }")).unwrap();
        assert_eq!(column.statements(), ["$table->decimal('price', 10, 4);"]);

        let column = build_column("rate", &field("type: float\nmodifiers: { precision: 6 }")).unwrap();
        assert_eq!(column.statements(), ["$table->decimal('rate', 6, 6);"]);
    }

    #[test]
    fn defaults_render_by_kind() {
        let cases = [
            ("default: true", "->default(true)"),
            ("default: 0", "->default(0)"),
            ("default: 1.5", "->default(1.5)"),
            ("default: \"10\"", "->default(10)"),
            ("default: pending", "->default('pending')"),
        ];
        for (modifier, expected) in cases {
            let column = build_column("f", &field(&format!("modifiers: {{ {modifier} }}"))).unwrap();
            assert!(column.lines[0].contains(expected), "{modifier}: {}", column.lines[0]);
        }
    }

    #[test]
    fn inline_foreign_key_is_terminated_once() {
        let column = build_column(
            "customer_id",
            &field("type: integer\nforeign: { table: customers, column: id, onDelete: CASCADE, onUpdate: explode }"),
        )
        .unwrap();
        assert!(!column.terminated);
        assert_eq!(
            column.statements(),
            ["$table->foreignId('customer_id')->constrained('customers', 'id')->onDelete('cascade');"]
        );
    }

    #[test]
    fn foreign_key_defaults() {
        let column = build_column("job_category_id", &field("foreign: {}")).unwrap();
        assert_eq!(
            column.lines[0],
            "$table->foreignId('job_category_id')->constrained('job_categories', 'id')"
        );
    }

    #[test]
    fn explicit_constraint_emits_two_statements() {
        let column = build_column(
            "user_id",
            &field(
                "type: unsignedBigInteger\nisExplicitConstraint: true\nmodifiers: { nullable: true }\nforeign: { table: users, column: id, onDelete: set null }",
            ),
        )
        .unwrap();
        assert!(column.terminated);
        assert_eq!(
            column.statements(),
            [
                "$table->unsignedBigInteger('user_id')->nullable();",
                "$table->foreign('user_id')->references('id')->on('users')->onDelete('set null');",
            ]
        );
    }

    #[test]
    fn columns_keep_declaration_order() {
        let model = model(
            "fields:\n  title: {}\n  password: { type: password }\n  password_confirmation: { type: password }\n  body: { type: textarea }\n",
        );
        assert_eq!(
            render_columns(&model),
            format!(
                "$table->string('title');\n{COLUMN_INDENT}$table->string('password');\n{COLUMN_INDENT}$table->text('body');"
            )
        );
    }

    #[test]
    fn indexes_in_fixed_order() {
        let model = model(
            "indexes: [status]\nuniqueIndexes: [code]\ncompoundIndexes: [[a, b]]\ncompoundUniqueIndexes: [[c, d]]\nfields:\n  email: { validation: [required, \"unique:users\"] }\n",
        );
        assert_eq!(
            build_indexes(&model),
            [
                "$table->index('status');",
                "$table->unique('code');",
                "$table->index(['a', 'b']);",
                "$table->unique(['c', 'd']);",
                "$table->unique('email');",
            ]
        );
    }
}
