//! Content parsers and the registry that picks one per content source.
//!
//! A parser turns the raw text of every file matched by a content pattern
//! into a [`ParserResult`]: rendered HTML plus, optionally, menu entries for
//! the sidebar. The page assembler never looks inside a result beyond
//! `menus`, so adding a content type means implementing [`ContentParser`]
//! and registering it.
//!
//! ## Selection
//!
//! [`ParserRegistry::find`] applies one rule:
//!
//! 1. An explicit `compile = "<type>"` matches by parser type only. The file
//!    extension is ignored even when another parser would claim it.
//! 2. Otherwise the first registered parser listing the pattern's extension
//!    (`.md`, with the dot) wins.
//!
//! Built-in registration order is `markdown`, `html`, `code`.

mod code;
mod html;
mod markdown;

pub use code::CodeParser;
pub use html::HtmlParser;
pub use markdown::MarkdownParser;

use crate::config::SiteConfig;
use crate::highlight::Highlighter;
use crate::types::ParserResult;
use serde_json::{Map, Value};
use std::path::Path;

/// Read-only services a parser may use.
pub struct ParseEnv<'a> {
    pub config: &'a SiteConfig,
    pub highlighter: &'a Highlighter,
}

/// Effective options of one parser invocation.
///
/// Merged lowest to highest: `{files}`, the config's `[options.<type>]`
/// table, the content source's own `options`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserOptions(Map<String, Value>);

impl ParserOptions {
    pub fn merged(
        files: &[String],
        defaults: Option<&Map<String, Value>>,
        overrides: &Map<String, Value>,
    ) -> Self {
        let mut map = Map::new();
        map.insert(
            "files".to_string(),
            Value::Array(files.iter().cloned().map(Value::String).collect()),
        );
        for layer in defaults.into_iter().chain(Some(overrides)) {
            for (key, value) in layer {
                map.insert(key.clone(), value.clone());
            }
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Truthiness of an option: `false`, `0`, `""` and `null` are off.
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Files the invocation resolved, relative to the working directory.
    pub fn files(&self) -> Vec<&str> {
        self.0
            .get("files")
            .and_then(Value::as_array)
            .map(|files| files.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A content type the generator can render.
pub trait ContentParser {
    /// Type identifier, matched by `compile` and `[options.<type>]`.
    fn kind(&self) -> &str;

    /// Extensions claimed by this parser, with the leading dot.
    fn extensions(&self) -> &[&str];

    /// Language hint for source listings; the parser type when `None`.
    fn highlight(&self) -> Option<&str> {
        None
    }

    /// Language of the source listing generated for `file`.
    fn source_lang(&self, _file: &str) -> String {
        self.highlight().unwrap_or(self.kind()).to_string()
    }

    /// Parse the contents of every matched file, in match order.
    fn parse(&self, contents: &[String], options: &ParserOptions, env: &ParseEnv<'_>)
    -> ParserResult;
}

/// Extension of a path or pattern in `.ext` form, empty when there is none.
pub fn extension_of(pattern: &str) -> String {
    Path::new(pattern)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Ordered set of parsers, queried by type or extension.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ContentParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in parsers.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MarkdownParser));
        registry.register(Box::new(HtmlParser));
        registry.register(Box::new(CodeParser));
        registry
    }

    /// Append a parser; earlier registrations win extension ties.
    pub fn register(&mut self, parser: Box<dyn ContentParser>) {
        self.parsers.push(parser);
    }

    pub fn find_by_type(&self, kind: &str) -> Option<&dyn ContentParser> {
        self.parsers
            .iter()
            .find(|p| p.kind() == kind)
            .map(Box::as_ref)
    }

    pub fn find_by_extension(&self, ext: &str) -> Option<&dyn ContentParser> {
        if ext.is_empty() {
            return None;
        }
        self.parsers
            .iter()
            .find(|p| p.extensions().contains(&ext))
            .map(Box::as_ref)
    }

    /// Parser for a content pattern: explicit type first, else by extension.
    pub fn find(&self, pattern: &str, compile: Option<&str>) -> Option<&dyn ContentParser> {
        match compile {
            Some(kind) => self.find_by_type(kind),
            None => self.find_by_extension(&extension_of(pattern)),
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.parsers.iter().map(|p| p.kind())
    }
}
