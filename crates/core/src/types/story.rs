//! Story domain model

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

const DRIVE_SHARE_PREFIX: &str = "https://drive.google.com/file/d/";

/// Identifier of a story document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    /// Creates a StoryId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty identifier a default-constructed story carries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for StoryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A story in the catalog. Immutable once fetched.
///
/// Missing fields in the stored document fall back to empty strings, so a
/// partially filled document still loads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub author: String,
}

impl Story {
    /// Creates a story with the given id, title and body text
    pub fn new(id: impl Into<StoryId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the image reference
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Returns the image reference in a directly loadable form.
    ///
    /// Drive share links (`/file/d/<id>/...`) are rewritten to the direct
    /// `uc?export=view` form; every other URL is returned untouched.
    pub fn display_image_url(&self) -> String {
        direct_image_url(&self.image_url)
    }
}

/// Rewrites a Drive share link into a direct view link
pub fn direct_image_url(url: &str) -> String {
    let file_id = url
        .find(DRIVE_SHARE_PREFIX)
        .map(|start| &url[start + DRIVE_SHARE_PREFIX.len()..])
        .and_then(|rest| rest.split('/').next())
        .filter(|id| !id.is_empty());

    match file_id {
        Some(id) => format!("https://drive.google.com/uc?export=view&id={}", id),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_builder() {
        let story = Story::new("s1", "Fox", "The quick fox").with_author("Aesop");
        assert_eq!(story.id.as_str(), "s1");
        assert_eq!(story.title, "Fox");
        assert_eq!(story.author, "Aesop");
        assert!(story.image_url.is_empty());
    }

    #[test]
    fn test_story_deserializes_with_missing_fields() {
        let story: Story = serde_json::from_value(serde_json::json!({
            "title": "Fox",
            "imageUrl": "https://example.com/fox.png"
        }))
        .unwrap();

        assert!(story.id.is_empty());
        assert_eq!(story.title, "Fox");
        assert_eq!(story.image_url, "https://example.com/fox.png");
        assert_eq!(story.content, "");
    }

    #[test]
    fn test_story_id_serializes_as_plain_string() {
        let json = serde_json::to_value(StoryId::new("s42")).unwrap();
        assert_eq!(json, serde_json::json!("s42"));
    }

    #[test]
    fn test_drive_share_link_is_rewritten() {
        let url = "https://drive.google.com/file/d/1AbC_dEf/view?usp=sharing";
        assert_eq!(
            direct_image_url(url),
            "https://drive.google.com/uc?export=view&id=1AbC_dEf"
        );
    }

    #[test]
    fn test_drive_link_without_trailing_path() {
        let url = "https://drive.google.com/file/d/XYZ";
        assert_eq!(
            direct_image_url(url),
            "https://drive.google.com/uc?export=view&id=XYZ"
        );
    }

    #[test]
    fn test_other_urls_untouched() {
        let url = "https://cdn.example.com/images/fox.png";
        assert_eq!(direct_image_url(url), url);
        assert_eq!(direct_image_url(""), "");
    }

    #[test]
    fn test_display_image_url_uses_story_field() {
        let story = Story::new("s1", "Fox", "")
            .with_image_url("https://drive.google.com/file/d/abc/view");
        assert_eq!(
            story.display_image_url(),
            "https://drive.google.com/uc?export=view&id=abc"
        );
    }
}
