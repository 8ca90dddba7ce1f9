//! Deterministic naming for generated types and filter paths.
//!
//! Generated names are part of the public query contract, so everything
//! here is a pure function of the schema structure: type names are the
//! PascalCase join of the schema path, filter paths join segments with
//! `__`, and localized leaves get the `i18n` marker segment in front of
//! their whole path.

/// Delimiter joining filter path segments: `meta__views`.
pub const FILTER_DELIMITER: &str = "__";

/// Marker segment put before the path of a localized leaf: `i18n__title`.
pub const I18N_SEGMENT: &str = "i18n";

/// Suffix of the record-id filter every reference leaf contributes.
pub const RECORD_ID_SUFFIX: &str = "recordId";

/// PascalCase one identifier segment: `article` → `Article`,
/// `name_plural` → `NamePlural`, `hero-block` → `HeroBlock`.
pub fn pascal_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = true;
    for ch in segment.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// camelCase one identifier segment: `Articles` → `articles`.
pub fn camel_case(segment: &str) -> String {
    let pascal = pascal_case(segment);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}

/// The generated type name one path level deeper.
pub fn join_type_name(parent: &str, key: &str) -> String {
    format!("{parent}{}", pascal_case(key))
}

/// The input-type name for an output-type name.
pub fn input_name(name: &str) -> String {
    format!("{name}Input")
}

/// The filter path one level deeper.
pub fn join_filter_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{FILTER_DELIMITER}{key}")
    }
}

/// Prefix a filter path with the localization marker.
pub fn i18n_filter_path(path: &str) -> String {
    format!("{I18N_SEGMENT}{FILTER_DELIMITER}{path}")
}

/// The record-id filter path of a reference leaf.
pub fn reference_filter_path(path: &str) -> String {
    format!("{path}{FILTER_DELIMITER}{RECORD_ID_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("article"), "Article");
        assert_eq!(pascal_case("hero_block"), "HeroBlock");
        assert_eq!(pascal_case("heroBlock"), "HeroBlock");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("Articles"), "articles");
        assert_eq!(camel_case("name_plural"), "namePlural");
    }

    #[test]
    fn test_filter_paths() {
        assert_eq!(join_filter_path("", "meta"), "meta");
        assert_eq!(join_filter_path("meta", "views"), "meta__views");
        assert_eq!(i18n_filter_path("title"), "i18n__title");
        assert_eq!(reference_filter_path("author"), "author__recordId");
    }
}
