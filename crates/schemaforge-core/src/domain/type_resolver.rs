//! Logical field type → storage, UI and cast types.
//!
//! All three lookups are total: a type the tables do not know is passed
//! through (or yields no cast) rather than rejected, so a schema can name a
//! column type this tool has never heard of.

/// Storage column type for a logical field type. Case-insensitive.
pub fn resolve_storage_type(logical_type: &str) -> String {
    let resolved = match logical_type.to_lowercase().as_str() {
        "string" | "varchar" | "char" | "email" | "password" | "select" | "file" | "checkbox"
        | "radio" => "string",
        "text" | "textarea" | "encrypted_string" => "text",
        "integer" | "int" => "integer",
        "decimal" | "float" | "double" => "decimal",
        "boolean" | "bool" | "boolcheckbox" | "boolradio" => "boolean",
        "date" | "datepicker" => "date",
        "datetime" | "timestamp" | "datetimepicker" => "datetime",
        "time" | "timepicker" => "time",
        _ => return logical_type.to_string(),
    };
    resolved.to_string()
}

/// Input type exposed to the UI layer.
pub fn resolve_ui_type(logical_type: &str) -> String {
    match logical_type {
        "decimal" | "float" | "int" | "integer" => "number".to_string(),
        other => other.to_string(),
    }
}

/// Model attribute cast, if the type has one.
///
/// Decimal casts carry the scale: the second part of a `"p,s"` precision,
/// else the only part given. Precision defaults to `8,2`.
pub fn resolve_cast_type(logical_type: &str, precision: Option<&str>) -> Option<String> {
    let cast = match logical_type {
        "boolean" | "bool" | "checkbox" => "boolean",
        "integer" | "int" => "integer",
        "decimal" | "float" | "double" => {
            let precision = precision.unwrap_or("8,2");
            let mut parts = precision.split(',').map(str::trim);
            let first = parts.next().unwrap_or_default();
            let scale = parts.next().unwrap_or(first);
            return Some(format!("decimal:{scale}"));
        }
        "array" => "array",
        "json" => "json",
        "date" | "datepicker" => "date",
        "datetime" | "timestamp" => "datetime",
        _ => return None,
    };
    Some(cast.to_string())
}

/// Whether the storage type takes a length parameter.
pub(crate) fn is_length_bounded(storage_type: &str) -> bool {
    matches!(storage_type, "string" | "varchar" | "char")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_table_is_case_insensitive() {
        let cases = [
            ("email", "string"),
            ("SELECT", "string"),
            ("encrypted_string", "text"),
            ("Int", "integer"),
            ("double", "decimal"),
            ("boolradio", "boolean"),
            ("datepicker", "date"),
            ("timestamp", "datetime"),
            ("timepicker", "time"),
        ];
        for (input, expected) in cases {
            assert_eq!(resolve_storage_type(input), expected, "{input}");
        }
    }

    #[test]
    fn unknown_storage_types_pass_through() {
        assert_eq!(resolve_storage_type("uuid"), "uuid");
        assert_eq!(resolve_storage_type("unsignedBigInteger"), "unsignedBigInteger");
        assert_eq!(resolve_storage_type("uuid"), resolve_storage_type("uuid"));
    }

    #[test]
    fn ui_types() {
        assert_eq!(resolve_ui_type("decimal"), "number");
        assert_eq!(resolve_ui_type("integer"), "number");
        assert_eq!(resolve_ui_type("datetimepicker"), "datetimepicker");
        assert_eq!(resolve_ui_type("textarea"), "textarea");
    }

    #[test]
    fn cast_types() {
        assert_eq!(resolve_cast_type("checkbox", None).as_deref(), Some("boolean"));
        assert_eq!(resolve_cast_type("decimal", None).as_deref(), Some("decimal:2"));
        assert_eq!(resolve_cast_type("float", Some("10,4")).as_deref(), Some("decimal:4"));
        assert_eq!(resolve_cast_type("double", Some("3")).as_deref(), Some("decimal:3"));
        assert_eq!(resolve_cast_type("timestamp", None).as_deref(), Some("datetime"));
        assert_eq!(resolve_cast_type("string", None), None);
    }
}
