//! Site configuration module.
//!
//! Handles loading, validating, and merging `docweave.toml`. The file lives in
//! the working directory; every path inside it is relative to that directory.
//! Stock defaults are serialized to a TOML value and the user file is merged
//! on top, so a config only needs the keys it wants to change.
//!
//! ## Example
//!
//! ```toml
//! name = "Widgets"
//! dest = "_docs"
//! default_grammar = "javascript"
//! theme = "plain"
//!
//! [common]
//! title = "Widgets"
//! footer = "© Widgets contributors"
//! navbars = [{ name = "GitHub", url = "https://example.com/widgets", target = "_blank" }]
//!
//! [options]
//! foldcode = true
//! staticsidenav = true
//!
//! [options.markdown]        # per-parser-type defaults
//! menu_level = 2
//!
//! [resources]
//! images = "docs/images"
//!
//! [[pages]]                 # single document
//! name = "index"
//! title = "Home"
//! content = "README.md"
//!
//! [[pages]]                 # one document split over several files
//! name = "guide"
//! title = "Guide"
//! [pages.content]
//! multi = true
//! index = "docs/guide/index.md"
//! [[pages.content.pages]]
//! name = "install"
//! content = "docs/guide/install.md"
//! [[pages.content.pages]]
//! name = "linux"
//! sub = true
//! content = "docs/guide/linux.md"
//!
//! [[pages]]                 # one file assembled from fragments
//! name = "api"
//! title = "API"
//! [pages.content]
//! sidebar = true
//! [[pages.content.blocks]]
//! name = "Client"
//! content = "src/client/*.js"
//! ```
//!
//! ## Content shapes
//!
//! `content` is decided once, at load time, into [`ContentSpec`]: a string is
//! a single source, a table with `multi = true` is a multi-page document, a
//! table with `blocks` is a block-composed page. Anything else is rejected.
//!
//! Unknown keys are rejected to catch typos early, except inside option
//! tables, which belong to the parsers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "docweave.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `docweave.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory the configuration was loaded from. Content patterns,
    /// resources, the theme and templates resolve against it.
    #[serde(skip)]
    pub cwd: PathBuf,
    /// Output directory, relative to `cwd` unless absolute.
    pub dest: String,
    /// Site name, used as the `name` of every page and in source-view titles.
    pub name: String,
    /// Grammar for fenced code blocks that declare no language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_grammar: Option<String>,
    /// Page template file; the built-in template is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Source-listing template file; the built-in template is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_template: Option<String>,
    /// Theme name (`themes/<name>`) or path to a theme directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Feature flags and per-parser-type option tables.
    pub options: SiteOptions,
    /// Output subdirectory → source path, copied verbatim after the pages.
    pub resources: BTreeMap<String, String>,
    /// Shared header/footer settings.
    pub common: CommonConfig,
    /// Pages in build and tab order.
    pub pages: Vec<PageSpec>,
    /// Restrict the build to these page names (empty = all).
    pub build_pages: Vec<String>,
}

fn default_dest() -> String {
    "_docs".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cwd: PathBuf::new(),
            dest: default_dest(),
            name: String::new(),
            default_grammar: None,
            template: None,
            code_template: None,
            theme: None,
            options: SiteOptions::default(),
            resources: BTreeMap::new(),
            common: CommonConfig::default(),
            pages: Vec::new(),
            build_pages: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Validate structural rules serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for page in &self.pages {
            if page.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "pages[].name must not be empty".into(),
                ));
            }
            if !seen.insert(page.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate page name '{}'",
                    page.name
                )));
            }
            if let Some(ContentSpec::Multi(multi)) = &page.content {
                if multi.pages.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "page '{}': multi content needs at least one sub-page",
                        page.name
                    )));
                }
                if multi.pages.iter().any(|p| p.name.trim().is_empty()) {
                    return Err(ConfigError::Validation(format!(
                        "page '{}': sub-page names must not be empty",
                        page.name
                    )));
                }
            }
        }
        if let Some(missing) = self.build_pages.iter().find(|n| !seen.contains(n.as_str())) {
            return Err(ConfigError::Validation(format!(
                "build_pages names unknown page '{missing}'"
            )));
        }
        Ok(())
    }

    /// Absolute output directory.
    pub fn dest_dir(&self) -> PathBuf {
        self.cwd.join(&self.dest)
    }

    /// Whether `page` takes part in this build.
    pub fn should_build(&self, page: &PageSpec) -> bool {
        self.build_pages.is_empty() || self.build_pages.iter().any(|n| *n == page.name)
    }

    /// Option defaults configured for one parser type.
    pub fn parser_defaults(&self, kind: &str) -> Option<&Map<String, Value>> {
        self.options.parsers.get(kind)
    }
}

/// Site-wide feature flags, plus one option table per parser type.
///
/// ```toml
/// [options]
/// foldcode = true
/// [options.code]
/// source = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteOptions {
    pub foldcode: bool,
    pub foldparam: bool,
    pub foldsidenav: bool,
    /// Keeps the sidebar fixed; wins over `foldsidenav`.
    pub staticsidenav: bool,
    pub has_page_name: bool,
    /// Extra stylesheet(s) injected into every page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_css: Option<Value>,
    /// Extra script(s) injected into every page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_js: Option<Value>,
    /// Parser type → default options, e.g. `[options.markdown]`.
    #[serde(flatten)]
    pub parsers: BTreeMap<String, Map<String, Value>>,
}

/// Header/footer settings shared by every page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_url: Option<String>,
    pub navbars: Vec<NavbarEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavbarEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Link target; `self` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One top-level page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Value>,
    /// Markdown file rendered into the page's `intro`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default)]
    pub options: PageOptions,
    /// Ignore globs for a single-source page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    /// Parser type forced for a single-source page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<String>,
    /// Ignore globs for the `index` source of a multi page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_ignore: Vec<String>,
    /// Parser type forced for the `index` source of a multi page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_compile: Option<String>,
    /// Pages without content are listed as tabs but never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentSpec>,
}

/// Page-level overrides. `foldsidenav`/`staticsidenav` switch the site flags
/// on for this page; every other key is passed to the parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub foldsidenav: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub staticsidenav: bool,
    #[serde(flatten)]
    pub parser: Map<String, Value>,
}

/// The three page shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContent", into = "RawContent")]
pub enum ContentSpec {
    /// Path or glob of one content source.
    Single(String),
    /// A document split over several output files sharing one sidebar.
    Multi(MultiContent),
    /// One output file assembled from ordered fragments.
    Blocks(BlockContent),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiContent {
    pub pages: Vec<SubPageSpec>,
    /// Source of the container page itself.
    pub index: Option<String>,
    pub index_options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockContent {
    pub blocks: Vec<BlockSpec>,
    /// Expose the block navigation as the page sidebar.
    pub sidebar: bool,
}

/// On-disk form of `content`, before the shape is decided.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawContent {
    Path(String),
    Table(RawContentTable),
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawContentTable {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    multi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<Vec<SubPageSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    index_options: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<Vec<BlockSpec>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    sidebar: bool,
}

impl TryFrom<RawContent> for ContentSpec {
    type Error = String;

    fn try_from(raw: RawContent) -> Result<Self, Self::Error> {
        match raw {
            RawContent::Path(path) => Ok(ContentSpec::Single(path)),
            RawContent::Table(table) if table.multi => Ok(ContentSpec::Multi(MultiContent {
                pages: table.pages.unwrap_or_default(),
                index: table.index,
                index_options: table.index_options,
            })),
            RawContent::Table(RawContentTable {
                blocks: Some(blocks),
                sidebar,
                ..
            }) => Ok(ContentSpec::Blocks(BlockContent { blocks, sidebar })),
            RawContent::Table(_) => Err(
                "content table needs either `multi = true` with `pages`, or `blocks`".to_string(),
            ),
        }
    }
}

impl From<ContentSpec> for RawContent {
    fn from(spec: ContentSpec) -> Self {
        match spec {
            ContentSpec::Single(path) => RawContent::Path(path),
            ContentSpec::Multi(multi) => RawContent::Table(RawContentTable {
                multi: true,
                pages: Some(multi.pages),
                index: multi.index,
                index_options: multi.index_options,
                ..RawContentTable::default()
            }),
            ContentSpec::Blocks(blocks) => RawContent::Table(RawContentTable {
                blocks: Some(blocks.blocks),
                sidebar: blocks.sidebar,
                ..RawContentTable::default()
            }),
        }
    }
}

/// One file of a multi page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubPageSpec {
    pub name: String,
    /// Nested under the closest preceding non-`sub` entry.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sub: bool,
    /// Explicit output stem, instead of `<page>-<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl SubPageSpec {
    /// Content path, treating an empty string like no content.
    pub fn source(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// One fragment of a block-composed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockSpec {
    /// Unnamed blocks are rendered but get no navigation entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordering hint passed through to navigation and templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sub: bool,
    #[serde(default)]
    pub content: BlockSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

/// A block's content: a source path, or anything else (including nothing),
/// which yields an empty raw-HTML block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlockSource", into = "Option<String>")]
pub enum BlockSource {
    Path(String),
    #[default]
    Inline,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBlockSource {
    Path(String),
    Other(serde::de::IgnoredAny),
}

impl From<RawBlockSource> for BlockSource {
    fn from(raw: RawBlockSource) -> Self {
        match raw {
            RawBlockSource::Path(path) => BlockSource::Path(path),
            RawBlockSource::Other(_) => BlockSource::Inline,
        }
    }
}

impl From<BlockSource> for Option<String> {
    fn from(source: BlockSource) -> Self {
        match source {
            BlockSource::Path(path) => Some(path),
            BlockSource::Inline => None,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `docweave.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config of the working directory `cwd`.
///
/// Merges the user file on top of stock defaults, rejects unknown keys and
/// validates the result. `cwd` is recorded on the returned config.
pub fn load_config(cwd: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(cwd)?;
    let mut config = resolve_config(base, overlay)?;
    config.cwd = cwd.to_path_buf();
    Ok(config)
}

/// Returns a fully-commented stock `docweave.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docweave configuration
# ======================
# Paths are relative to the directory holding this file.
# Unknown keys cause an error, except inside [options.<parser>] tables.

# Site name, shown on every page and in source-listing titles.
name = "My Project"

# Output directory.
dest = "_docs"

# Grammar for fenced code blocks without a language tag.
# default_grammar = "javascript"

# Custom templates (tera syntax). The built-in ones are used when absent.
# template = "templates/page.html"
# code_template = "templates/source.html"

# Theme: a bare name resolves to themes/<name>, anything else is a path.
# The theme directory is copied to <dest>/theme; its theme.toml may list
# js = [...] and css = [...] assets to inject.
# theme = "plain"

# Only build these pages (empty = all).
build_pages = []

# ---------------------------------------------------------------------------
# Shared header/footer
# ---------------------------------------------------------------------------
[common]
title = "My Project"
footer = ""
# home = "Home"
# home_url = "https://example.com"
navbars = []
# navbars = [{ name = "GitHub", url = "https://example.com/repo", target = "_blank" }]

# ---------------------------------------------------------------------------
# Feature flags
# ---------------------------------------------------------------------------
[options]
foldcode = false
foldparam = false
foldsidenav = false
staticsidenav = false   # wins over foldsidenav
has_page_name = false
# insert_css = "extra.css"
# insert_js = "extra.js"

# Per-parser defaults, overridden by a content source's own options.
# [options.markdown]
# menu_level = 2        # deepest heading level listed as a top-level menu
# [options.code]
# source = true         # also write <dest>/static/<file>.html listings

# ---------------------------------------------------------------------------
# Resources copied verbatim to <dest>/<key>
# ---------------------------------------------------------------------------
[resources]
# images = "docs/images"

# ---------------------------------------------------------------------------
# Pages, in tab order
# ---------------------------------------------------------------------------
# [[pages]]
# name = "index"
# title = "Home"
# content = "README.md"
#
# [[pages]]
# name = "guide"
# title = "Guide"
# [pages.content]
# multi = true
# index = "docs/guide/index.md"
# [[pages.content.pages]]
# name = "install"
# content = "docs/guide/install.md"
# [[pages.content.pages]]
# name = "linux"
# sub = true
# content = "docs/guide/linux.md"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.dest, "_docs");
        assert!(config.pages.is_empty());
        assert!(config.build_pages.is_empty());
        assert!(!config.options.staticsidenav);
    }

    #[test]
    fn stock_defaults_round_trip() {
        let config: SiteConfig = stock_defaults_value().try_into().unwrap();
        assert_eq!(config.dest, "_docs");
    }

    #[test]
    fn stock_config_toml_parses() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.name, "My Project");
        config.validate().unwrap();
    }

    #[test]
    fn string_content_is_single() {
        let page: PageSpec = toml::from_str(
            r#"
name = "index"
content = "README.md"
"#,
        )
        .unwrap();
        assert_eq!(page.content, Some(ContentSpec::Single("README.md".into())));
    }

    #[test]
    fn multi_content_parsed() {
        let page: PageSpec = toml::from_str(
            r#"
name = "guide"
[content]
multi = true
index = "guide/index.md"
index_options = { source = true }
[[content.pages]]
name = "a"
content = "guide/a.md"
[[content.pages]]
name = "b"
sub = true
index = "bee"
"#,
        )
        .unwrap();
        let Some(ContentSpec::Multi(multi)) = page.content else {
            panic!("expected multi content");
        };
        assert_eq!(multi.index.as_deref(), Some("guide/index.md"));
        assert_eq!(multi.index_options["source"], Value::Bool(true));
        assert_eq!(multi.pages.len(), 2);
        assert!(multi.pages[1].sub);
        assert_eq!(multi.pages[1].index.as_deref(), Some("bee"));
        assert_eq!(multi.pages[1].source(), None);
    }

    #[test]
    fn block_content_parsed() {
        let page: PageSpec = toml::from_str(
            r#"
name = "api"
[content]
sidebar = true
[[content.blocks]]
name = "a"
content = "a.md"
[[content.blocks]]
content = 123
[[content.blocks]]
name = "b"
sub = true
index = 3
"#,
        )
        .unwrap();
        let Some(ContentSpec::Blocks(blocks)) = page.content else {
            panic!("expected block content");
        };
        assert!(blocks.sidebar);
        assert_eq!(blocks.blocks[0].content, BlockSource::Path("a.md".into()));
        assert_eq!(blocks.blocks[1].content, BlockSource::Inline);
        assert_eq!(blocks.blocks[2].content, BlockSource::Inline);
        assert_eq!(blocks.blocks[2].index, Some(Value::from(3)));
    }

    #[test]
    fn content_table_without_shape_rejected() {
        let result: Result<PageSpec, _> = toml::from_str(
            r#"
name = "broken"
[content]
sidebar = true
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn multi_false_with_pages_rejected() {
        let result: Result<PageSpec, _> = toml::from_str(
            r#"
name = "broken"
[content]
[[content.pages]]
name = "a"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn page_options_split_flags_from_parser_options() {
        let page: PageSpec = toml::from_str(
            r#"
name = "p"
options = { staticsidenav = true, source = true, menu_level = 3 }
"#,
        )
        .unwrap();
        assert!(page.options.staticsidenav);
        assert!(!page.options.foldsidenav);
        assert_eq!(page.options.parser["source"], Value::Bool(true));
        assert!(!page.options.parser.contains_key("staticsidenav"));
    }

    #[test]
    fn parser_option_tables_collected() {
        let config: SiteConfig = toml::from_str(
            r#"
[options]
foldcode = true
[options.markdown]
menu_level = 3
"#,
        )
        .unwrap();
        assert!(config.options.foldcode);
        assert_eq!(
            config.parser_defaults("markdown").unwrap()["menu_level"],
            Value::from(3)
        );
        assert!(config.parser_defaults("code").is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(r#"destination = "out""#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_common_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[common]
titel = "x"
"#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[common]
title = "Base"
footer = "f"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[common]
title = "Mine"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let common = merged.get("common").unwrap();
        assert_eq!(common.get("title").unwrap().as_str(), Some("Mine"));
        assert_eq!(common.get("footer").unwrap().as_str(), Some("f"));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str(r#"build_pages = ["a", "b"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"build_pages = ["c"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("build_pages").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn page(name: &str) -> PageSpec {
        PageSpec {
            name: name.to_string(),
            ..PageSpec::default()
        }
    }

    #[test]
    fn validate_default_config_passes() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_duplicate_page_names() {
        let config = SiteConfig {
            pages: vec![page("a"), page("a")],
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(m)) if m.contains("duplicate")));
    }

    #[test]
    fn validate_empty_page_name() {
        let config = SiteConfig {
            pages: vec![page(" ")],
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_unknown_build_page() {
        let config = SiteConfig {
            pages: vec![page("a")],
            build_pages: vec!["b".into()],
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_multi_page() {
        let mut p = page("guide");
        p.content = Some(ContentSpec::Multi(MultiContent::default()));
        let config = SiteConfig {
            pages: vec![p],
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_build_respects_build_pages() {
        let config = SiteConfig {
            pages: vec![page("a"), page("b")],
            build_pages: vec!["b".into()],
            ..SiteConfig::default()
        };
        assert!(!config.should_build(&config.pages[0]));
        assert!(config.should_build(&config.pages[1]));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.dest, "_docs");
        assert_eq!(config.cwd, tmp.path());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
name = "Widgets"
[[pages]]
name = "index"
content = "README.md"
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.name, "Widgets");
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.dest_dir(), tmp.path().join("_docs"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "name = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[[pages]]
name = "a"
[[pages]]
name = "a"
"#,
        )
        .unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Validation(_))));
    }
}
