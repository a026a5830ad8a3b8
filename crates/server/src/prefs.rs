//! Reader preferences carried in the query string.
//!
//! `?skin=plain&img=all` selects the flat skin and the full gallery. Default
//! values are never written back, so a reader on defaults gets bare URLs.
//! Unknown values fall back to the default instead of failing the request.

use httpedia_core::{ImageMode, Preferences, Skin};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrefsQuery {
    pub skin: Option<String>,
    pub img: Option<String>,
}

impl PrefsQuery {
    pub fn skin(&self) -> Skin {
        self.skin.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn images(&self) -> ImageMode {
        self.img.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    /// Preferences for the renderer, with the re-encoded query attached.
    pub fn to_preferences(&self) -> Preferences {
        let (skin, images) = (self.skin(), self.images());
        Preferences::new(skin, images).with_query(encode(skin, images))
    }
}

/// Encode preferences, omitting defaults. Empty when everything is default.
pub fn encode(skin: Skin, images: ImageMode) -> String {
    let mut parts = Vec::new();
    if skin != Skin::default() {
        parts.push(format!("skin={skin}"));
    }
    if images != ImageMode::default() {
        parts.push(format!("img={images}"));
    }
    parts.join("&")
}

/// `path`, followed by `?query` when there is one.
pub fn with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path.to_string(),
    }
}

/// One choice in the settings bar on the home page.
#[derive(Debug, Clone)]
pub struct PrefLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Links switching one preference at a time, keeping the other.
pub fn settings_links(skin: Skin, images: ImageMode) -> (Vec<PrefLink>, Vec<PrefLink>) {
    let skins = [Skin::Standard, Skin::Plain]
        .into_iter()
        .map(|option| PrefLink {
            label: option.to_string(),
            href: with_query("/", Some(&encode(option, images))),
            active: option == skin,
        })
        .collect();

    let modes = [ImageMode::None, ImageMode::First, ImageMode::All]
        .into_iter()
        .map(|option| PrefLink {
            label: option.to_string(),
            href: with_query("/", Some(&encode(skin, option))),
            active: option == images,
        })
        .collect();

    (skins, modes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(skin: Option<&str>, img: Option<&str>) -> PrefsQuery {
        PrefsQuery { skin: skin.map(String::from), img: img.map(String::from) }
    }

    #[test]
    fn test_defaults_encode_to_nothing() {
        let prefs = query(None, None).to_preferences();
        assert_eq!(prefs.skin, Skin::Standard);
        assert_eq!(prefs.images, ImageMode::First);
        assert!(prefs.query.is_none());
    }

    #[test]
    fn test_non_defaults_are_encoded() {
        let prefs = query(Some("plain"), Some("all")).to_preferences();
        assert_eq!(prefs.query.as_deref(), Some("skin=plain&img=all"));

        let prefs = query(Some("standard"), Some("none")).to_preferences();
        assert_eq!(prefs.query.as_deref(), Some("img=none"));
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let prefs = query(Some("neon"), Some("lots")).to_preferences();
        assert_eq!(prefs.skin, Skin::Standard);
        assert_eq!(prefs.images, ImageMode::First);
        assert!(prefs.query.is_none());
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/wiki/A", None), "/wiki/A");
        assert_eq!(with_query("/wiki/A", Some("")), "/wiki/A");
        assert_eq!(with_query("/wiki/A", Some("img=all")), "/wiki/A?img=all");
    }

    #[test]
    fn test_settings_links() {
        let (skins, modes) = settings_links(Skin::Plain, ImageMode::All);
        assert_eq!(skins[0].href, "/?img=all");
        assert!(skins[1].active);
        assert_eq!(modes[1].href, "/?skin=plain");
        assert_eq!(modes[0].href, "/?skin=plain&img=none");
        assert!(modes[2].active);
    }
}
