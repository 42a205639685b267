//! Object storage for rendered templates.

pub mod filesystem;
pub mod http;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::prompt::DecorationKind;
use crate::sanitize::slugify;

pub use filesystem::FilesystemStore;
pub use http::{HttpObjectStore, HttpStoreSettings};

/// Rendered assets are content-addressed by id and never rewritten in place.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendition {
    Full,
    Thumb,
}

impl Rendition {
    pub fn suffix(&self) -> &'static str {
        match self {
            Rendition::Full => "full",
            Rendition::Thumb => "thumb",
        }
    }
}

/// A key-addressed blob store that serves what it stores at a public URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing object, and returns
    /// its public URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, GenerationError>;

    fn public_url(&self, key: &str) -> String;
}

/// `templates/{category}/{subcategory}/{template_id}_{full|thumb}.png`
pub fn template_key(
    category: &str,
    subcategory: &str,
    template_id: &str,
    rendition: Rendition,
) -> String {
    format!(
        "templates/{}/{}/{}_{}.png",
        slugify(category),
        slugify(subcategory),
        template_id,
        rendition.suffix()
    )
}

/// `decorations/{kind}/{id}.png`, thumbnails as `decorations/{kind}/{id}_thumb.png`.
pub fn decoration_key(kind: DecorationKind, id: &str, rendition: Rendition) -> String {
    match rendition {
        Rendition::Full => format!("decorations/{}/{}.png", kind, id),
        Rendition::Thumb => format!("decorations/{}/{}_thumb.png", kind, id),
    }
}

/// MIME type for `key` by extension, `application/octet-stream` if unknown.
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Rejects keys that could escape a store root or are not plain relative paths.
pub(crate) fn check_key(key: &str) -> Result<(), GenerationError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(GenerationError::UploadFailed {
            key: key.to_string(),
            reason: "invalid object key".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_key_layout() {
        assert_eq!(
            template_key(
                "wedding",
                "save-the-date",
                "wedding-save-the-date-vintage-abc",
                Rendition::Full
            ),
            "templates/wedding/save-the-date/wedding-save-the-date-vintage-abc_full.png"
        );
        assert_eq!(
            template_key("Baby Shower", "Gender Reveal", "id", Rendition::Thumb),
            "templates/baby-shower/gender-reveal/id_thumb.png"
        );
    }

    #[test]
    fn test_decoration_key_layout() {
        assert_eq!(
            decoration_key(DecorationKind::Flourish, "flourish-art-deco-1", Rendition::Full),
            "decorations/flourish/flourish-art-deco-1.png"
        );
        assert_eq!(
            decoration_key(DecorationKind::Corner, "c-1", Rendition::Thumb),
            "decorations/corner/c-1_thumb.png"
        );
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("templates/a/b/c_full.png"), "image/png");
        assert_eq!(content_type_for("manifest.json"), "application/json");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("templates/a/b.png").is_ok());
        for bad in ["", "/abs.png", "a/../b.png", "a//b.png", "a\\b.png", "./a.png"] {
            assert!(check_key(bad).is_err(), "{:?}", bad);
        }
    }
}
