//! Turns raw specification identifiers into safe class, variable and namespace names.
//!
//! Every function here is deterministic and idempotent: feeding a resolved name back in
//! yields the same name.

use crate::{Case, Casing};

/// Reserved words and built-in type names of the emitted class model, lowercase.
pub const KEYWORDS: &[&str] = &[
    "abstract", "and", "array", "as", "bool", "break", "callable", "case", "catch", "class",
    "clone", "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum", "eval",
    "exit", "extends", "false", "final", "finally", "float", "fn", "for", "foreach", "function",
    "global", "goto", "if", "implements", "include", "instanceof", "insteadof", "int",
    "interface", "isset", "iterable", "list", "match", "mixed", "namespace", "never", "new",
    "null", "object", "or", "parent", "print", "private", "protected", "public", "readonly",
    "require", "return", "self", "static", "string", "switch", "this", "throw", "trait", "true",
    "try", "unset", "use", "var", "void", "while", "xor", "yield",
];

pub const NAMESPACE_SEPARATOR: char = '\\';

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word.to_lowercase().as_str())
}

pub fn fix_name_if_keyword(name: &mut String) {
    if is_keyword(name.as_str()) {
        name.push('_');
    }
}

fn starts_with_digit(name: &str) -> bool {
    name.chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or_default()
}

/// Every character that cannot appear in an identifier becomes a word boundary.
fn normalize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect()
}

/// Already a usable identifier whose first letter satisfies `first`. Such names are
/// left alone, since re-casing would split runs of capitals like `AB` differently.
fn is_resolved(name: &str, first: impl Fn(char) -> bool) -> bool {
    let mut chars = name.chars();
    chars.next().map(first).unwrap_or_default()
        && chars.all(|c| c.is_ascii_alphanumeric())
        && !is_keyword(name)
}

fn safe_class_name(name: &str) -> String {
    if is_resolved(name, |c| c.is_ascii_uppercase()) {
        return name.to_string();
    }
    let mut name = normalize(name).to_case(Case::UpperCamel);
    if name.is_empty() {
        return "Unnamed".into();
    }
    if starts_with_digit(&name) {
        name = format!("Value{name}");
    }
    fix_name_if_keyword(&mut name);
    name
}

pub fn dto_class_name(name: &str) -> String {
    safe_class_name(name)
}

pub fn request_class_name(name: &str) -> String {
    safe_class_name(name)
}

pub fn response_class_name(name: &str) -> String {
    safe_class_name(name)
}

pub fn resource_class_name(name: &str) -> String {
    safe_class_name(name)
}

/// Name of a constructor property or local variable. A leading `:` of a path
/// placeholder is dropped along with any other punctuation.
pub fn safe_variable_name(name: &str) -> String {
    if is_resolved(name, |c| c.is_ascii_lowercase()) {
        return name.to_string();
    }
    let mut name = normalize(name).to_case(Case::Camel);
    if name.is_empty() {
        return "value".into();
    }
    if starts_with_digit(&name) {
        name = format!("value{name}");
    }
    fix_name_if_keyword(&mut name);
    name
}

/// `\Suffix` for a non-empty suffix, nothing otherwise.
pub fn optional_namespace_suffix(suffix: &str) -> String {
    let suffix = suffix.trim_matches(NAMESPACE_SEPARATOR);
    if suffix.is_empty() {
        String::new()
    } else {
        format!("{NAMESPACE_SEPARATOR}{suffix}")
    }
}

pub fn join_namespace(base: &str, suffix: &str) -> String {
    let base = base.trim_end_matches(NAMESPACE_SEPARATOR);
    format!("{base}{}", optional_namespace_suffix(suffix))
}

/// Greedy word wrap; existing line breaks are kept.
pub fn wrap_long_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn class_names() {
        assert_eq!(dto_class_name("pet_store"), "PetStore");
        assert_eq!(dto_class_name("pet-store.item"), "PetStoreItem");
        assert_eq!(dto_class_name("PetStore"), "PetStore");
        assert_eq!(request_class_name("Get pet by id"), "GetPetById");
        assert_eq!(resource_class_name("pets"), "Pets");
    }

    #[test]
    fn class_names_never_start_with_digit() {
        let name = response_class_name("404 error");
        assert!(name.starts_with("Value"));
        assert!(!starts_with_digit(&name));
    }

    #[test]
    fn reserved_words_are_suffixed() {
        assert_eq!(dto_class_name("list"), "List_");
        assert_eq!(dto_class_name("Object"), "Object_");
        assert_eq!(safe_variable_name("class"), "class_");
        assert_eq!(safe_variable_name("default"), "default_");
    }

    #[test]
    fn class_name_is_idempotent() {
        for raw in [
            "pet_store",
            "Pet Store",
            "list",
            "404 error",
            "HTTPResponse",
            "v2 api",
            "",
            "::",
            "a_b",
            "x y",
            "a_b_1c",
            "1_a_b",
        ] {
            let once = dto_class_name(raw);
            assert_eq!(dto_class_name(&once), once, "not idempotent for `{raw}`");
        }
        assert_eq!(dto_class_name("a_b"), "AB");
        assert_eq!(dto_class_name("AB"), "AB");
    }

    #[test]
    fn variable_name_is_idempotent() {
        for raw in ["x_y_z", "page_size", ":user_id", "class", "2fa", "HTTPResponse", "a b c"] {
            let once = safe_variable_name(raw);
            assert_eq!(safe_variable_name(&once), once, "not idempotent for `{raw}`");
        }
    }

    #[test]
    fn variable_names() {
        assert_eq!(safe_variable_name(":user_id"), "userId");
        assert_eq!(safe_variable_name("Widgets"), "widgets");
        assert_eq!(safe_variable_name("page"), "page");
        assert_eq!(safe_variable_name(""), "value");
        let name = safe_variable_name("2fa");
        assert!(name.starts_with("value"));
        assert_eq!(safe_variable_name(&name), name);
    }

    #[test]
    fn namespace_suffix() {
        assert_eq!(optional_namespace_suffix(""), "");
        assert_eq!(optional_namespace_suffix("\\"), "");
        assert_eq!(optional_namespace_suffix("Dto"), "\\Dto");
        assert_eq!(join_namespace("App\\Sdk", ""), "App\\Sdk");
        assert_eq!(join_namespace("App\\Sdk\\", "Responses"), "App\\Sdk\\Responses");
    }

    #[test]
    fn wraps_long_lines() {
        let lines = wrap_long_lines("one two three four", 9);
        assert_eq!(lines, ["one two", "three", "four"]);
        assert_eq!(wrap_long_lines("a\nb", 100), ["a", "b"]);
        assert!(wrap_long_lines("", 100).is_empty());
    }
}
