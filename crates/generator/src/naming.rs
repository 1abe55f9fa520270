//! Campaign display names derived from the advertiser's website.

use adwizard_core::payload::APP_NAME;
use url::{Host, Url};

/// Business name guessed from a website URL: the host without a leading
/// `www.` and without anything from its first remaining dot on, with the
/// first letter capitalised (`https://www.acme-coffee.com` → `Acme-coffee`).
///
/// Returns `None` when the URL does not parse, has no domain host, or has an
/// internationalised host (punycode labels make unreadable names).
pub fn business_name_from_url(website_url: &str) -> Option<String> {
    let url = Url::parse(website_url.trim()).ok()?;
    let domain = match url.host()? {
        Host::Domain(domain) => domain,
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };

    if domain.split('.').any(|label| label.starts_with("xn--")) {
        return None;
    }

    let domain = domain.strip_prefix("www.").unwrap_or(domain);
    let label = domain.split('.').next()?;
    if label.is_empty() {
        return None;
    }
    Some(capitalize(label))
}

/// `"<AppName> – <business name>"`, falling back to the product description
/// when the URL yields nothing usable.
pub fn campaign_name(website_url: &str, product_description: &str) -> String {
    let business = business_name_from_url(website_url)
        .unwrap_or_else(|| product_description.to_string());
    format!("{APP_NAME} – {business}")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
