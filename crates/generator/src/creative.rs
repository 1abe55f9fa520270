//! Ad copy generation.
//!
//! [`CreativeProvider`] is the seam where a generative text service plugs in.
//! [`TemplateCreativeProvider`] is the deterministic implementation used until
//! then: it fills fixed templates with the product and audience.

use adwizard_core::payload::{
    check_copy, DESCRIPTION_CHAR_LIMIT, HEADLINE_CHAR_LIMIT, MAX_DESCRIPTIONS, MAX_HEADLINES,
};
use adwizard_core::{AdWizardError, AdWizardResult};

/// Headlines and descriptions for one responsive search ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreativeSet {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

impl CreativeSet {
    /// Verify the provider contract: between one and the platform maximum of
    /// non-blank headlines and descriptions, optionally within the platform
    /// character limits.
    pub fn check(&self, enforce_char_limits: bool) -> AdWizardResult<()> {
        check_copy("headline", &self.headlines, MAX_HEADLINES).map_err(AdWizardError::Generation)?;
        check_copy("description", &self.descriptions, MAX_DESCRIPTIONS)
            .map_err(AdWizardError::Generation)?;

        if enforce_char_limits {
            check_lengths("headline", &self.headlines, HEADLINE_CHAR_LIMIT)?;
            check_lengths("description", &self.descriptions, DESCRIPTION_CHAR_LIMIT)?;
        }
        Ok(())
    }
}

fn check_lengths(kind: &str, items: &[String], limit: usize) -> AdWizardResult<()> {
    for item in items {
        let len = item.chars().count();
        if len > limit {
            return Err(AdWizardError::Generation(format!(
                "{kind} '{item}' is {len} characters, limit is {limit}"
            )));
        }
    }
    Ok(())
}

/// Source of ad copy for a product and audience.
///
/// Implementations must be deterministic for a given input if payload
/// generation is expected to be repeatable.
pub trait CreativeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate(&self, product: &str, audience: &str) -> AdWizardResult<CreativeSet>;
}

/// Fixed-template copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCreativeProvider;

impl TemplateCreativeProvider {
    pub fn new() -> Self {
        Self
    }

    fn headlines(product: &str) -> Vec<String> {
        vec![
            format!("{product} - Quality Service"),
            format!("Get Started with {product}"),
            format!("Affordable {product}"),
            format!("Best {product} in Town"),
            format!("Professional {product}"),
            format!("Top-Rated {product}"),
            format!("{product} Experts"),
            format!("Trusted {product} Provider"),
            format!("Premium {product}"),
            format!("Local {product} Service"),
        ]
    }

    fn descriptions(product: &str, audience: &str) -> Vec<String> {
        vec![
            format!("Perfect for {audience}. Get started today!"),
            format!("Quality {product} designed for {audience}."),
            "Trusted by customers. Call now for a free quote.".to_string(),
            "Fast, reliable, and affordable. Contact us today!".to_string(),
        ]
    }
}

impl CreativeProvider for TemplateCreativeProvider {
    fn name(&self) -> &'static str {
        "template"
    }

    fn generate(&self, product: &str, audience: &str) -> AdWizardResult<CreativeSet> {
        Ok(CreativeSet {
            headlines: Self::headlines(product),
            descriptions: Self::descriptions(product, audience),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_counts() {
        let set = TemplateCreativeProvider::new()
            .generate("Dog Walking", "busy professionals")
            .unwrap();
        assert_eq!(set.headlines.len(), MAX_HEADLINES);
        assert_eq!(set.descriptions.len(), MAX_DESCRIPTIONS);
        assert!(set.headlines.iter().all(|h| !h.is_empty()));
        assert!(set.descriptions.iter().all(|d| !d.is_empty()));
        set.check(false).unwrap();
    }

    #[test]
    fn test_template_interpolation() {
        let set = TemplateCreativeProvider::new()
            .generate("Yoga", "new parents")
            .unwrap();
        assert_eq!(set.headlines[0], "Yoga - Quality Service");
        assert_eq!(set.headlines[9], "Local Yoga Service");
        assert_eq!(set.descriptions[0], "Perfect for new parents. Get started today!");
        assert_eq!(set.descriptions[1], "Quality Yoga designed for new parents.");
    }

    #[test]
    fn test_check_rejects_bad_counts() {
        let empty = CreativeSet {
            headlines: vec![],
            descriptions: vec!["d".into()],
        };
        assert!(matches!(empty.check(false), Err(AdWizardError::Generation(_))));

        let too_many = CreativeSet {
            headlines: vec!["h".into()],
            descriptions: vec!["d".into(); MAX_DESCRIPTIONS + 1],
        };
        assert!(too_many.check(false).is_err());

        let blank = CreativeSet {
            headlines: vec!["h".into(), "  ".into()],
            descriptions: vec!["d".into()],
        };
        assert!(blank.check(false).is_err());
    }

    #[test]
    fn test_char_limits_only_when_enforced() {
        let set = TemplateCreativeProvider::new()
            .generate("handcrafted artisanal sourdough bread", "foodies")
            .unwrap();
        assert!(set.check(false).is_ok());
        assert!(set.check(true).is_err());

        let short = TemplateCreativeProvider::new().generate("Tea", "students").unwrap();
        assert!(short.check(true).is_ok());
    }
}
