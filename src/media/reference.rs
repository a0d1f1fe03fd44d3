//! Image reference classification
//!
//! Pure and stateless: the same input always yields the same variant, and
//! nothing here touches the network.

use serde::Serialize;
use url::Url;

use crate::errors::LinkshelfError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageReference {
    /// Empty or whitespace-only
    Empty,
    /// Provider-assigned asset identifier, e.g. `products/shoe_01`
    OpaqueId(String),
    /// Fully qualified URL on the provider's image host
    CdnUrl(String),
    /// Any other absolute URL, whatever the scheme. Untrusted.
    ExternalUrl(String),
    /// None of the above
    Invalid(String),
}

impl ImageReference {
    /// Classify `src`. `cdn_host` is the provider's canonical image host,
    /// e.g. `res.cloudinary.com`.
    pub fn classify(src: &str, cdn_host: &str) -> Self {
        let src = src.trim();

        if src.is_empty() {
            return ImageReference::Empty;
        }
        if is_opaque_id(src) && !src.contains(cdn_host) {
            return ImageReference::OpaqueId(src.to_string());
        }
        if src.contains(cdn_host) {
            return ImageReference::CdnUrl(src.to_string());
        }
        if Url::parse(src).is_ok() {
            return ImageReference::ExternalUrl(src.to_string());
        }
        ImageReference::Invalid(src.to_string())
    }

    /// `Err(InvalidReference)` for strings that cannot be rendered at all
    pub fn validate(&self) -> Result<(), LinkshelfError> {
        match self {
            ImageReference::Invalid(raw) => Err(LinkshelfError::invalid_reference(format!(
                "{:?} is neither an identifier nor a URL",
                raw
            ))),
            _ => Ok(()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageReference::Empty => "empty",
            ImageReference::OpaqueId(_) => "opaque_id",
            ImageReference::CdnUrl(_) => "cdn_url",
            ImageReference::ExternalUrl(_) => "external_url",
            ImageReference::Invalid(_) => "invalid",
        }
    }
}

/// Letters, digits, `_`, `-` and `/` only
pub fn is_opaque_id(src: &str) -> bool {
    !src.is_empty()
        && src
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/'))
}


#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "res.cloudinary.com";

    fn classify(src: &str) -> ImageReference {
        ImageReference::classify(src, HOST)
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(classify(""), ImageReference::Empty);
        assert_eq!(classify("   \t\n"), ImageReference::Empty);
    }

    #[test]
    fn test_opaque_ids() {
        assert_eq!(
            classify("abc_123/def"),
            ImageReference::OpaqueId("abc_123/def".to_string())
        );
        assert_eq!(
            classify("products/summer-2026/shoe_01"),
            ImageReference::OpaqueId("products/summer-2026/shoe_01".to_string())
        );
        // looks like a scheme prefix but is still a valid identifier shape
        assert_eq!(classify("https_banner").kind(), "opaque_id");
    }

    #[test]
    fn test_cdn_urls() {
        assert_eq!(
            classify("https://res.cloudinary.com/demo/x.jpg"),
            ImageReference::CdnUrl("https://res.cloudinary.com/demo/x.jpg".to_string())
        );
        // provider domain wins even without a scheme
        assert_eq!(classify("res.cloudinary.com/demo/x.jpg").kind(), "cdn_url");
    }

    #[test]
    fn test_external_urls() {
        assert_eq!(
            classify("https://example.com/x.jpg"),
            ImageReference::ExternalUrl("https://example.com/x.jpg".to_string())
        );
        assert_eq!(classify("http://localhost:3000/a.png").kind(), "external_url");
        assert_eq!(classify("ftp://example.com/x.jpg").kind(), "external_url");
        assert_eq!(classify("data:image/png;base64,AAAA").kind(), "external_url");
    }

    #[test]
    fn test_invalid_references() {
        assert_eq!(
            classify("!!!not a url!!!"),
            ImageReference::Invalid("!!!not a url!!!".to_string())
        );
        assert_eq!(classify("photo.jpg").kind(), "invalid");
        assert_eq!(classify("/images/photo.jpg").kind(), "invalid");
    }

    #[test]
    fn test_validate_flags_only_invalid() {
        let err = classify("!!!not a url!!!").validate().unwrap_err();
        assert!(matches!(err, LinkshelfError::InvalidReference(_)));
        assert_eq!(err.code(), "E004");
        assert!(err.format_simple().contains("!!!not a url!!!"));

        for src in ["", "abc_123/def", "https://example.com/x.jpg"] {
            assert!(classify(src).validate().is_ok());
        }
    }

    #[test]
    fn test_input_is_trimmed() {
        assert_eq!(
            classify("  sample  "),
            ImageReference::OpaqueId("sample".to_string())
        );
    }

    #[test]
    fn test_custom_cdn_host() {
        let r = ImageReference::classify("https://img.shop.test/a.jpg", "img.shop.test");
        assert_eq!(r.kind(), "cdn_url");
        let r = ImageReference::classify("https://res.cloudinary.com/a.jpg", "img.shop.test");
        assert_eq!(r.kind(), "external_url");
    }

    #[test]
    fn test_classification_is_repeatable() {
        for src in ["", "abc", "https://example.com/x.jpg", "%%%"] {
            assert_eq!(classify(src), classify(src));
        }
    }
}
