//! PHP array literals.
//!
//! [`render_return`] writes a `<?php return [...];` file from a
//! [`ConfigValue`]. [`parse_return`] reads one back, so generated menu files
//! can be merged without executing PHP. The parser understands the literal
//! subset these files use: nested `[...]` / `array(...)`, quoted strings,
//! numbers, `true`/`false`/`null`, and comments.

use thiserror::Error;

use crate::domain::{
    naming::quote,
    value_objects::{ConfigMap, ConfigValue, format_number},
};

/// Indentation of generated model config files.
pub const CONFIG_INDENT: &str = "  ";
/// Indentation of generated menu files.
pub const MENU_INDENT: &str = "    ";

// ── Writer ───────────────────────────────────────────────────────────────────

/// Render `value` as the array returned by a PHP file.
///
/// Maps become `'key' => value` entries, lists become positional entries,
/// empty arrays collapse to `[]`.
pub fn render_return(value: &ConfigValue, indent: &str) -> String {
    let mut out = String::from("<?php\n\nreturn ");
    match value {
        ConfigValue::Map(_) | ConfigValue::List(_) => write_array(&mut out, value, indent, 0),
        scalar => write_scalar(&mut out, scalar),
    }
    out.push_str(";\n");
    out
}

fn write_array(out: &mut String, value: &ConfigValue, indent: &str, level: usize) {
    let inner = indent.repeat(level + 1);
    match value {
        ConfigValue::Map(map) if !map.is_empty() => {
            out.push_str("[\n");
            for (key, item) in map {
                out.push_str(&inner);
                out.push_str(&quote(key));
                out.push_str(" => ");
                write_value(out, item, indent, level + 1);
                out.push_str(",\n");
            }
            out.push_str(&indent.repeat(level));
            out.push(']');
        }
        ConfigValue::List(items) if !items.is_empty() => {
            out.push_str("[\n");
            for item in items {
                out.push_str(&inner);
                write_value(out, item, indent, level + 1);
                out.push_str(",\n");
            }
            out.push_str(&indent.repeat(level));
            out.push(']');
        }
        _ => out.push_str("[]"),
    }
}

fn write_value(out: &mut String, value: &ConfigValue, indent: &str, level: usize) {
    match value {
        ConfigValue::Map(_) | ConfigValue::List(_) => write_array(out, value, indent, level),
        scalar => write_scalar(out, scalar),
    }
}

fn write_scalar(out: &mut String, value: &ConfigValue) {
    match value {
        ConfigValue::Null => out.push_str("null"),
        ConfigValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConfigValue::Int(i) => out.push_str(&i.to_string()),
        ConfigValue::Float(f) => out.push_str(&format_number(*f)),
        ConfigValue::String(s) => out.push_str(&quote(s)),
        ConfigValue::Map(_) | ConfigValue::List(_) => out.push_str("[]"),
    }
}

// ── Parser ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {offset}")]
pub struct PhpParseError {
    pub offset: usize,
    pub message: String,
}

/// Parse a file of the form `<?php return <literal>;`.
///
/// Arrays whose keys are all implicit become lists; any explicit key makes
/// the array a map, with integer keys stringified.
pub fn parse_return(source: &str) -> Result<ConfigValue, PhpParseError> {
    let mut parser = Parser {
        src: source.as_bytes(),
        pos: 0,
    };
    parser.skip_trivia();
    parser.eat_keyword("<?php");
    parser.skip_trivia();
    if !parser.eat_keyword("return") {
        return Err(parser.error("expected `return`"));
    }
    let value = parser.value()?;
    parser.skip_trivia();
    if !parser.eat(b';') {
        return Err(parser.error("expected `;`"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> PhpParseError {
        PhpParseError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        let matches = self
            .src
            .get(self.pos..end)
            .is_some_and(|s| s.eq_ignore_ascii_case(keyword.as_bytes()));
        let boundary = self
            .src
            .get(end)
            .is_none_or(|b| !(b.is_ascii_alphanumeric() || *b == b'_'));
        if matches && boundary {
            self.pos = end;
        }
        matches && boundary
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.src.get(self.pos + 1).copied()) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'/')) | (Some(b'#'), _) => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    self.pos += 2;
                    while self.pos < self.src.len() && !self.src[self.pos..].starts_with(b"*/") {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.src.len());
                }
                _ => return,
            }
        }
    }

    fn value(&mut self) -> Result<ConfigValue, PhpParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(b'[') => {
                self.pos += 1;
                self.array(b']')
            }
            Some(b'\'' | b'"') => self.string().map(ConfigValue::String),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.number(),
            _ if self.eat_keyword("array") => {
                self.skip_trivia();
                if !self.eat(b'(') {
                    return Err(self.error("expected `(` after `array`"));
                }
                self.array(b')')
            }
            _ if self.eat_keyword("true") => Ok(ConfigValue::Bool(true)),
            _ if self.eat_keyword("false") => Ok(ConfigValue::Bool(false)),
            _ if self.eat_keyword("null") => Ok(ConfigValue::Null),
            _ => Err(self.error("unsupported expression")),
        }
    }

    fn array(&mut self, close: u8) -> Result<ConfigValue, PhpParseError> {
        let mut entries: Vec<(Option<String>, ConfigValue)> = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(close) {
                break;
            }
            let first = self.value()?;
            self.skip_trivia();
            let entry = if self.src[self.pos..].starts_with(b"=>") {
                self.pos += 2;
                let key = first
                    .to_plain_string()
                    .ok_or_else(|| self.error("array keys must be scalars"))?;
                (Some(key), self.value()?)
            } else {
                (None, first)
            };
            entries.push(entry);
            self.skip_trivia();
            if !self.eat(b',') {
                self.skip_trivia();
                if self.eat(close) {
                    break;
                }
                return Err(self.error("expected `,` or end of array"));
            }
        }

        if entries.iter().all(|(key, _)| key.is_none()) {
            return Ok(ConfigValue::List(entries.into_iter().map(|(_, v)| v).collect()));
        }
        let mut map = ConfigMap::new();
        // `None` once an explicit key has reached the largest index.
        let mut next_index = Some(0usize);
        for (key, value) in entries {
            let key = match key {
                Some(key) => key,
                None => next_index
                    .ok_or_else(|| self.error("implicit array index overflows"))?
                    .to_string(),
            };
            if let Ok(index) = key.parse::<usize>() {
                next_index = index.checked_add(1);
            }
            map.insert(key, value);
        }
        Ok(ConfigValue::Map(map))
    }

    fn string(&mut self) -> Result<String, PhpParseError> {
        let delimiter = self.src[self.pos];
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b) if b == delimiter => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    let escaped = self.src.get(self.pos + 1).copied();
                    match (delimiter, escaped) {
                        (b'\'', Some(c @ (b'\\' | b'\''))) => bytes.push(c),
                        (b'"', Some(b'n')) => bytes.push(b'\n'),
                        (b'"', Some(b't')) => bytes.push(b'\t'),
                        (b'"', Some(c @ (b'\\' | b'"' | b'$'))) => bytes.push(c),
                        (_, Some(c)) => bytes.extend([b'\\', c]),
                        (_, None) => return Err(self.error("unterminated string")),
                    }
                    self.pos += 2;
                }
                Some(b) => {
                    bytes.push(b);
                    self.pos += 1;
                }
            }
        }
        String::from_utf8(bytes).map_err(|_| self.error("invalid UTF-8 in string"))
    }

    fn number(&mut self) -> Result<ConfigValue, PhpParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("invalid number"))?;
        if let Ok(int) = text.parse::<i64>() {
            return Ok(ConfigValue::Int(int));
        }
        text.parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|_| self.error("invalid number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, ConfigValue)]) -> ConfigValue {
        ConfigValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn config_layout_uses_two_space_indent() {
        let value = map(&[
            ("model", "App\\Modules\\Sales\\Models\\Order".into()),
            ("hiddenFields", ConfigValue::Map(ConfigMap::new())),
            ("isTransaction", false.into()),
            (
                "fieldDefinitions",
                map(&[("total", map(&[("maxSizeMB", ConfigValue::Int(2)), ("fileTypes", vec!["pdf"].into())]))]),
            ),
        ]);
        assert_eq!(
            render_return(&value, CONFIG_INDENT),
            "<?php\n\nreturn [\n  'model' => 'App\\\\Modules\\\\Sales\\\\Models\\\\Order',\n  'hiddenFields' => [],\n  'isTransaction' => false,\n  'fieldDefinitions' => [\n    'total' => [\n      'maxSizeMB' => 2,\n      'fileTypes' => [\n        'pdf',\n      ],\n    ],\n  ],\n];\n"
        );
    }

    #[test]
    fn menu_layout_uses_four_space_indent() {
        let value = ConfigValue::List(vec![map(&[("title", "Orders".into()), ("url", ConfigValue::Null)])]);
        assert_eq!(
            render_return(&value, MENU_INDENT),
            "<?php\n\nreturn [\n    [\n        'title' => 'Orders',\n        'url' => null,\n    ],\n];\n"
        );
    }

    #[test]
    fn parse_reads_back_what_render_writes() {
        let value = ConfigValue::List(vec![map(&[
            ("title", "O'Brien \\ Co".into()),
            ("count", ConfigValue::Int(3)),
            ("ratio", ConfigValue::Float(0.5)),
            ("flag", true.into()),
            ("none", ConfigValue::Null),
            ("tags", vec!["a", "b"].into()),
            ("empty", ConfigValue::List(Vec::new())),
        ])]);
        let rendered = render_return(&value, MENU_INDENT);
        assert_eq!(parse_return(&rendered).unwrap(), value);
    }

    #[test]
    fn parse_accepts_hand_written_php() {
        let source = r#"<?php
// menu
return array(
    /* first */ array('title' => "Home\n", 'url' => 'core/home',),
    5 => ['x'],
    ['y'],
);
"#;
        let value = parse_return(source).unwrap();
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["0", "5", "6"]);
        assert_eq!(map["0"].get("title"), Some(&ConfigValue::String("Home\n".into())));
    }

    #[test]
    fn parse_rejects_code() {
        let err = parse_return("<?php return config('menu');").unwrap_err();
        assert_eq!(err.message, "unsupported expression");
        assert!(parse_return("<?php return [1, 2]").is_err());
    }

    #[test]
    fn largest_index_then_implicit_entry_is_an_error() {
        let max = usize::MAX;
        let value = parse_return(&format!("<?php return ['{max}' => 'a'];")).unwrap();
        assert!(value.as_map().unwrap().contains_key(&max.to_string()));

        let err = parse_return(&format!("<?php return ['{max}' => 'a', 'b'];")).unwrap_err();
        assert_eq!(err.message, "implicit array index overflows");
    }
}
