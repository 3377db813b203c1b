//! Rendering - markdown to HTML with syntax highlighting
//!
//! The core only talks to the `Renderer` trait; `HtmlRenderer` is the
//! concrete sink used by the CLI.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::Mutex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::manifest::Post;

/// Display sink for the viewer core.
///
/// Pure side-effecting collaborator: the core never reads anything
/// back. Only the fetch coordinator's still-current load may call
/// `render`; implementations must not call back into the core.
pub trait Renderer: Send + Sync {
    /// Show or clear the loading indicator
    fn set_loading(&self, loading: bool);

    /// Display a post with its markdown body
    fn render(&self, post: &Post, markdown: &str);

    /// Display an error message in place of content
    fn render_error(&self, message: &str);

    /// Display the empty-results state (no post selected)
    fn render_empty(&self);
}

/// Markdown to HTML conversion with highlighted code blocks
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a renderer with the default highlight theme
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    /// Create a renderer with a named syntect theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render a markdown body to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_body = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_body.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = self.highlight(&code_body, code_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_body.push_str(&text);
                }
                other => events.push(other),
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self.theme_set.themes.get(&self.theme_name) {
            Some(theme) => theme,
            None => match self.theme_set.themes.values().next() {
                Some(theme) => theme,
                None => {
                    return format!(
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        lang,
                        html_escape(code)
                    )
                }
            },
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(r#"<div class="highlight {}">{}</div>"#, lang, highlighted),
            Err(_) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// What the HTML renderer currently displays
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    /// Nothing rendered yet
    Blank,
    /// A rendered post document
    Document(String),
    /// An error message
    Error(String),
    /// The empty-results placeholder
    Empty,
}

/// Renderer that produces a self-contained HTML document per post
pub struct HtmlRenderer {
    markdown: MarkdownRenderer,
    state: Mutex<ViewState>,
}

struct ViewState {
    loading: bool,
    display: Display,
}

impl HtmlRenderer {
    /// Create an HTML renderer with a highlight theme
    pub fn new(theme: &str) -> Self {
        Self {
            markdown: MarkdownRenderer::with_theme(theme),
            state: Mutex::new(ViewState {
                loading: false,
                display: Display::Blank,
            }),
        }
    }

    /// The current display state
    pub fn display(&self) -> Display {
        self.state.lock().unwrap().display.clone()
    }

    /// The last rendered document, if the display holds one
    pub fn document(&self) -> Option<String> {
        match self.display() {
            Display::Document(html) => Some(html),
            _ => None,
        }
    }

    /// Whether the loading indicator is showing
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }
}

impl Renderer for HtmlRenderer {
    fn set_loading(&self, loading: bool) {
        self.state.lock().unwrap().loading = loading;
    }

    fn render(&self, post: &Post, markdown: &str) {
        let body = self.markdown.render(markdown);
        let document = format!(
            "<article class=\"post\">\n<header class=\"post-header\">\n<p class=\"eyebrow\">{}</p>\n<h1>{}</h1>\n</header>\n<div class=\"post-body\">\n{}</div>\n</article>\n",
            html_escape(&post.date),
            html_escape(&post.title),
            body
        );
        self.state.lock().unwrap().display = Display::Document(document);
    }

    fn render_error(&self, message: &str) {
        let html = format!(
            "<div class=\"placeholder-msg\">{}</div>\n",
            html_escape(message)
        );
        self.state.lock().unwrap().display = Display::Error(html);
    }

    fn render_empty(&self) {
        self.state.lock().unwrap().display = Display::Empty;
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::testing::post;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block_highlighted() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains("highlight rust"));
    }

    #[test]
    fn test_html_renderer_document() {
        let renderer = HtmlRenderer::new("base16-ocean.dark");
        let p = post(1, "A <Title>", "2024-05-01", "a.md");

        renderer.render(&p, "# Heading");
        let doc = renderer.document().unwrap();
        assert!(doc.contains("A &lt;Title&gt;"));
        assert!(doc.contains("2024-05-01"));
        assert!(doc.contains("<h1>Heading</h1>"));
    }

    #[test]
    fn test_html_renderer_error_and_empty() {
        let renderer = HtmlRenderer::new("base16-ocean.dark");
        renderer.render_error("content unavailable: HTTP 404");
        assert!(matches!(renderer.display(), Display::Error(html) if html.contains("HTTP 404")));

        renderer.render_empty();
        assert_eq!(renderer.display(), Display::Empty);
    }
}
