//! Shared types handed from parsers to the page assembler and on to the
//! page template.
//!
//! Everything here is `Serialize`: the fully assembled [`RenderContext`] is
//! turned into a template context as-is, so field names are the names
//! templates see.

use serde::Serialize;
use serde_json::{Map, Value};

/// One sidebar entry.
///
/// Used for multi-page navigation, block navigation and the menus a parser
/// reports for headings it found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NavEntry {
    pub name: String,
    /// Name of the nearest preceding non-`sub` entry (multi pages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_name: Option<String>,
    /// Nested under the previous top-level entry.
    pub sub: bool,
    /// Sub-page without content: listed in navigation, never written.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub blank: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Ordering hint copied verbatim from a block's `index`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    /// In-page anchor (`#name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl NavEntry {
    /// A menu entry reported by a parser, anchored at the sanitized name.
    pub fn menu(name: &str, sub: bool) -> Self {
        Self {
            name: name.to_string(),
            sub,
            tag: Some(crate::naming::fragment(name)),
            ..Self::default()
        }
    }
}

/// Output of one content parser over one content source.
///
/// The default value is the empty result substituted whenever a source
/// cannot be parsed (no parser, no files).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParserResult {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Rendered HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Extra navigation entries found inside the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menus: Option<Vec<NavEntry>>,
    /// Parser-specific data, exposed to templates next to `content`.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ParserResult {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Menus the parser marked as top-level.
    pub fn top_level_menus(&self) -> impl Iterator<Item = &NavEntry> {
        self.menus.iter().flatten().filter(|m| !m.sub)
    }
}

/// One fragment of a block-composed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    #[serde(flatten)]
    pub result: ParserResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    pub tag: String,
    pub sub: bool,
}

/// The page body handed to the template as `article`.
///
/// Navigation fields serialize as `null` when unset so templates can test
/// them without tripping over undefined variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Article {
    #[serde(flatten)]
    pub result: ParserResult,
    pub sidebars: Option<Vec<NavEntry>>,
    pub name: Option<String>,
    pub parent_name: Option<String>,
    pub blocks: Option<Vec<Block>>,
}

impl Article {
    pub fn from_result(result: ParserResult) -> Self {
        Self {
            result,
            ..Self::default()
        }
    }
}

/// Top-level page tab, one per configured page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub name: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub active: bool,
}

/// Navbar link from the `common.navbars` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavbarLink {
    pub name: String,
    pub url: Option<String>,
    pub target: String,
    pub active: bool,
}

/// Everything the page template sees for one output file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderContext {
    pub name: String,
    pub title: String,
    pub footer: Option<String>,
    pub home: Option<String>,
    pub home_url: Option<String>,
    pub theme_js: Vec<String>,
    pub theme_css: Vec<String>,
    pub navbars: Vec<NavbarLink>,
    pub tabs: Vec<Tab>,
    pub banner: Option<Value>,
    pub intro: Option<String>,
    pub pagename: String,
    pub article: Article,
    pub foldcode: bool,
    pub foldparam: bool,
    pub foldsidenav: bool,
    pub staticsidenav: bool,
    pub has_page_name: bool,
    pub insert_css: Option<Value>,
    pub insert_js: Option<Value>,
}

/// Context of a standalone source-listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceView {
    pub title: String,
    pub footer: Option<String>,
    /// Relative path from the listing back to `<dest>/source`.
    pub source_dir: String,
    /// Highlight language hint of the parser that owns the file.
    pub lang: String,
    pub content: String,
    pub highlighted: String,
}
