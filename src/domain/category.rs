//! Mapping from URL category slugs to stored category labels.

/// Turns a camelCase slug into the stored label: `homeDecor` -> `Home Decor`.
///
/// A space goes before every uppercase letter, the first character is uppercased and the result
/// is trimmed. ASCII-oriented; no locale handling.
pub fn title_case(slug: &str) -> String {
    let mut spaced = String::with_capacity(slug.len() + 4);
    for c in slug.chars() {
        if c.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
