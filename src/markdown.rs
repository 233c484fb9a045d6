//! Markdown → HTML with highlighted code blocks and anchored headings.
//!
//! Uses pulldown-cmark with the GFM extensions (tables, strikethrough, task
//! lists) plus footnotes. Two rewrites happen on the event stream:
//!
//! - **Headings** get `id` attributes derived from their text through
//!   [`naming::sanitize`](crate::naming::sanitize), the same rule sidebar
//!   entries use, so a heading reported as a menu entry is its own anchor.
//! - **Code blocks** are replaced by `<pre><code>` HTML highlighted by the
//!   [`Highlighter`]. When highlighting leaves the code unchanged (unknown
//!   language) the code is HTML-escaped instead.

use crate::highlight::Highlighter;
use crate::naming;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// A heading found while rendering, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Rendered HTML plus the headings it contains.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub headings: Vec<Heading>,
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Render markdown to HTML, highlighting code through `highlighter`.
pub fn render(markdown: &str, highlighter: &Highlighter) -> Rendered {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut headings = Vec::new();

    // Buffered heading: level, plain text, inner events.
    let mut heading: Option<(u8, String, Vec<Event<'_>>)> = None;
    // Buffered code block: language, raw code.
    let mut code: Option<(Option<String>, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((heading_level(level), String::new(), Vec::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text, inner)) = heading.take() {
                    events.push(Event::Html(
                        format!("<h{level} id=\"{}\">", escape_html(&naming::sanitize(&text)))
                            .into(),
                    ));
                    events.extend(inner);
                    events.push(Event::Html(format!("</h{level}>\n").into()));
                    headings.push(Heading { level, text });
                }
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                code = Some((lang, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, source)) = code.take() {
                    events.push(Event::Html(code_block(&source, lang.as_deref(), highlighter).into()));
                }
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, source)) = code.as_mut() {
                    source.push_str(&text);
                }
            }
            event => match heading.as_mut() {
                Some((_, text, inner)) => {
                    if let Event::Text(t) | Event::Code(t) = &event {
                        text.push_str(t);
                    }
                    inner.push(event);
                }
                None => events.push(event),
            },
        }
    }

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, events.into_iter());
    Rendered {
        html: out,
        headings,
    }
}

/// Render markdown and keep only the HTML.
pub fn to_html(markdown: &str, highlighter: &Highlighter) -> String {
    render(markdown, highlighter).html
}

/// A highlighted `<pre><code>` block.
pub fn code_block(source: &str, lang: Option<&str>, highlighter: &Highlighter) -> String {
    let highlighted = highlighter.highlight(source, lang);
    let body = if highlighted == source {
        escape_html(source)
    } else {
        highlighted
    };
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{body}</code></pre>\n",
            escape_html(lang)
        ),
        None => format!("<pre><code>{body}</code></pre>\n"),
    }
}

/// Escape `&`, `<`, `>` and `"`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Strip HTML tags (simple angle-bracket stripping).
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}
