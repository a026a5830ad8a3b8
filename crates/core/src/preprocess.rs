use lol_html::{RewriteStrSettings, doc_comments, element, rewrite_str};

/// Configuration for the raw HTML pre-pass
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Whether to remove script and noscript tags
    pub remove_scripts: bool,
    /// Whether to remove style and stylesheet link tags
    pub remove_styles: bool,
    /// Whether to remove meta tags
    pub remove_meta: bool,
    /// Whether to remove inline svg
    pub remove_svg: bool,
    /// Whether to remove HTML comments
    pub remove_comments: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_scripts: true, remove_styles: true, remove_meta: true, remove_svg: true, remove_comments: true }
    }
}

/// Strip content no vintage browser can use before the tree is built.
///
/// Runs as a streaming rewrite so the parsed tree never holds script bodies,
/// stylesheets or inline SVG. On rewriter failure the input is returned
/// unchanged; the selector filter still prunes the tree afterwards.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut selectors: Vec<&str> = Vec::new();
    if config.remove_scripts {
        selectors.extend(["script", "noscript"]);
    }
    if config.remove_styles {
        selectors.extend(["style", "link"]);
    }
    if config.remove_meta {
        selectors.push("meta");
    }
    if config.remove_svg {
        selectors.push("svg");
    }

    let element_content_handlers = selectors
        .into_iter()
        .map(|selector| {
            element!(selector, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    let document_content_handlers = if config.remove_comments {
        vec![doc_comments!(|c| {
            c.remove();
            Ok(())
        })]
    } else {
        Vec::new()
    };

    let settings = RewriteStrSettings { element_content_handlers, document_content_handlers, ..Default::default() };

    match rewrite_str(html, settings) {
        Ok(output) if !output.is_empty() => output,
        _ => html.to_string(),
    }
}
