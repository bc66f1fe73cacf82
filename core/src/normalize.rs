use unidecode::unidecode;

/// Canonical form used for every name comparison: transliterated to ASCII,
/// trimmed, lowercased, inner whitespace collapsed to single spaces.
pub fn clean_name(input: &str) -> String {
    unidecode(input)
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
