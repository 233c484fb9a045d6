use super::{ContentParser, ParseEnv, ParserOptions};
use crate::markdown;
use crate::types::{NavEntry, ParserResult};

/// Deepest heading level reported as a top-level menu entry by default.
const DEFAULT_MENU_LEVEL: u64 = 2;

/// Markdown documents. Every heading becomes a menu entry; headings deeper
/// than `menu_level` are nested (`sub`).
pub struct MarkdownParser;

impl ContentParser for MarkdownParser {
    fn kind(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &[".md", ".markdown"]
    }

    fn highlight(&self) -> Option<&str> {
        Some("markdown")
    }

    fn parse(
        &self,
        contents: &[String],
        options: &ParserOptions,
        env: &ParseEnv<'_>,
    ) -> ParserResult {
        let menu_level = options.u64("menu_level").unwrap_or(DEFAULT_MENU_LEVEL);
        let rendered = markdown::render(&contents.join("\n\n"), env.highlighter);

        let menus: Vec<NavEntry> = rendered
            .headings
            .iter()
            .map(|h| NavEntry::menu(&h.text, u64::from(h.level) > menu_level))
            .collect();

        ParserResult {
            kind: Some("markdown".to_string()),
            content: Some(rendered.html),
            menus: (!menus.is_empty()).then_some(menus),
            ..ParserResult::default()
        }
    }
}
