//! Naming conventions shared by every generator.
//!
//! Casing goes through `heck`; English inflection is a small rule table
//! with the common irregular nouns. Both directions (plural and singular)
//! preserve the casing of the word they inflect, so `BlogPost` becomes
//! `BlogPosts` and `blog_posts` becomes `blog_post`.

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "money",
    "news",
    "series",
    "sheep",
    "species",
    "fish",
    "data",
    "metadata",
    "feedback",
];

// ── Casing ───────────────────────────────────────────────────────────────────

/// `BlogPost` → `blog_post`.
pub fn snake(name: &str) -> String {
    name.to_snake_case()
}

/// `blog_post` → `BlogPost`.
pub fn studly(name: &str) -> String {
    name.to_pascal_case()
}

/// `blog_post` → `blogPost`.
pub fn camel(name: &str) -> String {
    name.to_lower_camel_case()
}

/// `BlogPost` → `blog-post`.
pub fn kebab(name: &str) -> String {
    name.to_kebab_case()
}

/// Upper-case the first character, leave the rest untouched.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalise every space-separated word and lower-case the rest of it.
pub fn title(s: &str) -> String {
    s.split(' ')
        .map(|word| ucfirst(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Inflection ───────────────────────────────────────────────────────────────

/// Split off the last word of a snake_case or StudlyCase identifier.
fn split_tail(word: &str) -> (&str, &str) {
    if let Some(idx) = word.rfind(|c: char| matches!(c, '_' | '-' | ' ')) {
        return word.split_at(idx + 1);
    }
    let idx = word
        .char_indices()
        .skip(1)
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    word.split_at(idx)
}

/// Copy the capitalisation of `template`'s first letter onto `word`.
fn match_case(template: &str, word: &str) -> String {
    if template.chars().next().is_some_and(char::is_uppercase) {
        ucfirst(word)
    } else {
        word.to_string()
    }
}

fn is_consonant_y(lower: &str) -> bool {
    lower.ends_with('y')
        && lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| !"aeiou".contains(c))
}

/// English plural of the last word of `word`.
pub fn plural(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let (head, tail) = split_tail(word);
    let lower = tail.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, many)) = IRREGULAR.iter().find(|(one, _)| *one == lower) {
        return format!("{head}{}", match_case(tail, many));
    }

    let inflected = if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        format!("{tail}es")
    } else if is_consonant_y(&lower) {
        format!("{}ies", &tail[..tail.len() - 1])
    } else if lower.ends_with("fe") {
        format!("{}ves", &tail[..tail.len() - 2])
    } else if lower.ends_with('f') && !lower.ends_with("ff") && !lower.ends_with("oof") {
        format!("{}ves", &tail[..tail.len() - 1])
    } else {
        format!("{tail}s")
    };
    format!("{head}{inflected}")
}

/// English singular of the last word of `word`.
pub fn singular(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let (head, tail) = split_tail(word);
    let lower = tail.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((one, _)) = IRREGULAR.iter().find(|(_, many)| *many == lower) {
        return format!("{head}{}", match_case(tail, one));
    }

    let cut = |n: usize| tail[..tail.len() - n].to_string();
    let inflected = if lower.ends_with("ies") && lower.len() > 3 {
        format!("{}y", cut(3))
    } else if lower.ends_with("ives") {
        format!("{}fe", cut(3))
    } else if lower.ends_with("ves") {
        format!("{}f", cut(3))
    } else if ["sses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        cut(2)
    } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        tail.to_string()
    } else if lower.ends_with('s') {
        cut(1)
    } else {
        tail.to_string()
    };
    format!("{head}{inflected}")
}

// ── Derived names ────────────────────────────────────────────────────────────

/// `\App\Models\User` → `User`.
pub fn class_basename(path: &str) -> &str {
    path.rsplit('\\').next().unwrap_or(path)
}

/// Strip leading namespace separators from a class reference.
pub fn trim_class(path: &str) -> &str {
    path.trim_start_matches('\\')
}

/// Default table for a model: plural snake_case, or singular for pivots.
pub fn table_name(model: &str, is_pivot: bool) -> String {
    let snake = snake(model);
    if is_pivot {
        singular(&snake)
    } else {
        plural(&snake)
    }
}

/// Namespace holding a module's model classes.
pub fn model_namespace(module: &str) -> String {
    format!("App\\Modules\\{}\\Models", ucfirst(module))
}

/// Fully qualified class name of a model.
pub fn model_class(module: &str, model: &str) -> String {
    format!("{}\\{}", model_namespace(module), model)
}

/// Human label for a field name: `customer_id` → `Customer`.
pub fn field_label(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field);
    title(&base.replace('_', " "))
}

/// Backslash-escape quotes, backslashes and NUL the way PHP's `addslashes`
/// does, so the result is safe inside a single-quoted literal.
pub fn addslashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '\'' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a string as a single-quoted PHP literal.
pub fn quote(s: &str) -> String {
    format!("'{}'", addslashes(s))
}
