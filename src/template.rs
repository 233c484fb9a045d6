//! Page and source-listing templates.
//!
//! Both templates are [tera](https://keats.github.io/tera/) sources compiled
//! once per build. Autoescaping is off: parser output is already HTML and
//! goes into the page untouched. Templates get four extra filters:
//!
//! | filter | effect |
//! |---|---|
//! | `markdown` | markdown → HTML, fenced code highlighted |
//! | `highlight(lang="js")` | highlighted code, language optional |
//! | `anchor` | sanitized name usable as an id (`null` → empty) |
//! | `txt` | strips tags |
//!
//! When the config names no template file the built-in ones under
//! `templates/` are used.

use crate::config::SiteConfig;
use crate::highlight::Highlighter;
use crate::markdown;
use crate::naming;
use crate::types::{RenderContext, SourceView};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tera::Tera;
use thiserror::Error;

const PAGE: &str = "page";
const SOURCE: &str = "source";

pub const DEFAULT_PAGE_TEMPLATE: &str = include_str!("../templates/page.html");
pub const DEFAULT_SOURCE_TEMPLATE: &str = include_str!("../templates/source.html");

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template error: {0}")]
    Tera(#[from] tera::Error),
    #[error("cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The compiled page and source-listing templates.
pub struct Templates {
    tera: Tera,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}

impl Templates {
    /// Compile both templates from source text.
    pub fn compile(
        page_src: &str,
        source_src: &str,
        highlighter: Arc<Highlighter>,
    ) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        register_filters(&mut tera, highlighter);
        tera.add_raw_template(PAGE, page_src)?;
        tera.add_raw_template(SOURCE, source_src)?;
        Ok(Self { tera })
    }

    /// Compile the templates a config names, falling back to the built-ins.
    pub fn load(config: &SiteConfig, highlighter: Arc<Highlighter>) -> Result<Self, TemplateError> {
        let page = read_or(config, config.template.as_deref(), DEFAULT_PAGE_TEMPLATE)?;
        let source = read_or(config, config.code_template.as_deref(), DEFAULT_SOURCE_TEMPLATE)?;
        Self::compile(&page, &source, highlighter)
    }

    pub fn render_page(&self, ctx: &RenderContext) -> Result<String, TemplateError> {
        let context = tera::Context::from_serialize(ctx)?;
        Ok(self.tera.render(PAGE, &context)?)
    }

    pub fn render_source(&self, view: &SourceView) -> Result<String, TemplateError> {
        let context = tera::Context::from_serialize(view)?;
        Ok(self.tera.render(SOURCE, &context)?)
    }
}

fn read_or(
    config: &SiteConfig,
    file: Option<&str>,
    builtin: &str,
) -> Result<String, TemplateError> {
    match file {
        Some(file) => {
            let path = config.cwd.join(file);
            fs::read_to_string(&path).map_err(|source| TemplateError::Io { path, source })
        }
        None => Ok(builtin.to_string()),
    }
}

fn register_filters(tera: &mut Tera, highlighter: Arc<Highlighter>) {
    let hl = Arc::clone(&highlighter);
    tera.register_filter(
        "markdown",
        move |value: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> {
            let text = value_text(value);
            Ok(Value::String(markdown::to_html(&text, &hl)))
        },
    );

    tera.register_filter(
        "highlight",
        move |value: &Value, args: &HashMap<String, Value>| -> tera::Result<Value> {
            let lang = args.get("lang").and_then(Value::as_str);
            Ok(Value::String(highlighter.highlight(&value_text(value), lang)))
        },
    );

    tera.register_filter("anchor", anchor);
    tera.register_filter("txt", txt);
}

/// String form of a filter input; `null` is empty.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn anchor(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(naming::sanitize(&value_text(value))))
}

fn txt(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(markdown::strip_tags(&value_text(value))))
}
