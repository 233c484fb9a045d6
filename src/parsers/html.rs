use super::{ContentParser, ParseEnv, ParserOptions};
use crate::types::ParserResult;

/// Hand-written HTML fragments, passed through verbatim.
pub struct HtmlParser;

impl ContentParser for HtmlParser {
    fn kind(&self) -> &str {
        "html"
    }

    fn extensions(&self) -> &[&str] {
        &[".html", ".htm"]
    }

    fn highlight(&self) -> Option<&str> {
        Some("markup")
    }

    fn parse(&self, contents: &[String], _: &ParserOptions, _: &ParseEnv<'_>) -> ParserResult {
        ParserResult {
            kind: Some("html".to_string()),
            content: Some(contents.concat()),
            ..ParserResult::default()
        }
    }
}
