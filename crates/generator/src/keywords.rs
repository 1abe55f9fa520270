//! Keyword list built from the product description.

use std::collections::HashSet;

use adwizard_core::payload::{Keyword, MAX_KEYWORDS};

/// Lowercase word tokens of `text`, split on anything that is not a letter,
/// digit or underscore.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per token: BROAD `token`, PHRASE `"token service"`, PHRASE `"best token"`.
/// Then BROAD and EXACT for the whole lowercased description and PHRASE
/// `"<description> near me"`. Duplicates are dropped (first occurrence wins)
/// and the list is cut to [`MAX_KEYWORDS`] in emission order.
pub fn generate_keywords(product_description: &str) -> Vec<Keyword> {
    let product = product_description.trim();
    let lowered = product.to_lowercase();

    let per_token = tokenize(product).into_iter().flat_map(|token| {
        let service = format!("{token} service");
        let best = format!("best {token}");
        [
            Keyword::broad(token),
            Keyword::phrase(service),
            Keyword::phrase(best),
        ]
    });

    let generic = [
        Keyword::broad(lowered.clone()),
        Keyword::phrase(format!("{product} near me")),
        Keyword::exact(lowered),
    ];

    let mut seen = HashSet::new();
    per_token
        .chain(generic)
        .filter(|kw| !kw.text.is_empty())
        .filter(|kw| seen.insert((kw.match_type, kw.text.clone())))
        .take(MAX_KEYWORDS)
        .collect()
}
