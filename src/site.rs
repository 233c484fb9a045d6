//! Build driver.
//!
//! [`build`] runs one full generation over a loaded [`SiteConfig`]:
//!
//! 1. Construct the highlighter with the configured default grammar (an
//!    unsupported grammar is reported, not fatal).
//! 2. Compile the page and source-listing templates.
//! 3. Assemble and write every configured page, in config order.
//! 4. Copy resources and the theme into the output directory.
//!
//! Everything the steps share lives in a [`BuildEnv`] built once up front and
//! passed by reference. Progress is reported as [`BuildEvent`]s over an
//! optional channel, the way the CLI expects to print it; a failed copy or an
//! unparseable content source becomes an event, while template, read and
//! write failures end the build with a [`BuildError`].

use crate::assemble;
use crate::config::{ConfigError, SiteConfig};
use crate::copy::{self, ThemeAssets};
use crate::highlight::Highlighter;
use crate::parsers::ParserRegistry;
use crate::template::{TemplateError, Templates};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Why a configured page produced no file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoContent,
    NotSelected,
}

/// Progress and diagnostics emitted during a build.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// A page or sub-page file was written. `file` is relative to the output
    /// directory.
    Generated { page: String, file: String },
    /// A source listing was written for `source`.
    SourceGenerated { source: String, file: String },
    /// A page was not built.
    PageSkipped { page: String, reason: SkipReason },
    /// No parser claims the pattern's extension or the forced type.
    NoParser {
        pattern: String,
        compile: Option<String>,
    },
    /// The pattern matched nothing, or was not a valid glob.
    NoFiles {
        pattern: String,
        error: Option<String>,
    },
    /// An entry under the pattern's directory could not be read and was
    /// passed over.
    EntrySkipped {
        pattern: String,
        path: PathBuf,
        error: String,
    },
    /// The configured default grammar is unknown to the highlighter.
    UnsupportedGrammar { lang: String },
    ResourceCopied { key: String, source: String },
    ResourceCopyFailed {
        key: String,
        source: String,
        error: String,
    },
    ThemeCopied { theme: String },
    ThemeCopyFailed { theme: String, error: String },
    ThemeConfigFailed { path: PathBuf, error: String },
}

/// Counts of what a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub sources: usize,
    pub skipped: usize,
    pub warnings: usize,
}

/// Immutable services shared by every step of one build.
pub struct BuildEnv {
    pub config: SiteConfig,
    pub highlighter: Arc<Highlighter>,
    pub templates: Templates,
    pub registry: ParserRegistry,
    pub theme: ThemeAssets,
    events: Option<Sender<BuildEvent>>,
    summary: RefCell<BuildSummary>,
}

impl BuildEnv {
    /// Set up highlighter, templates, parsers and theme assets for `config`.
    pub fn new(
        config: SiteConfig,
        registry: ParserRegistry,
        events: Option<Sender<BuildEvent>>,
    ) -> Result<Self, BuildError> {
        let highlighter = Arc::new(Highlighter::new(config.default_grammar.as_deref()));
        let templates = Templates::load(&config, Arc::clone(&highlighter))?;
        let mut env = Self {
            config,
            highlighter,
            templates,
            registry,
            theme: ThemeAssets::default(),
            events,
            summary: RefCell::new(BuildSummary::default()),
        };
        if let Some(lang) = env.highlighter.unsupported_default() {
            let lang = lang.to_string();
            env.emit(BuildEvent::UnsupportedGrammar { lang });
        }
        env.theme = copy::load_theme_assets(&env);
        Ok(env)
    }

    /// Record an event and forward it to the listener, if any.
    pub fn emit(&self, event: BuildEvent) {
        {
            let mut summary = self.summary.borrow_mut();
            match &event {
                BuildEvent::Generated { .. } => summary.pages += 1,
                BuildEvent::SourceGenerated { .. } => summary.sources += 1,
                BuildEvent::PageSkipped { .. } => summary.skipped += 1,
                BuildEvent::NoParser { .. }
                | BuildEvent::NoFiles { .. }
                | BuildEvent::EntrySkipped { .. }
                | BuildEvent::UnsupportedGrammar { .. }
                | BuildEvent::ResourceCopyFailed { .. }
                | BuildEvent::ThemeCopyFailed { .. }
                | BuildEvent::ThemeConfigFailed { .. } => summary.warnings += 1,
                BuildEvent::ResourceCopied { .. } | BuildEvent::ThemeCopied { .. } => {}
            }
        }
        if let Some(tx) = &self.events {
            // A closed receiver only means nobody is listening.
            tx.send(event).ok();
        }
    }

    pub fn summary(&self) -> BuildSummary {
        self.summary.borrow().clone()
    }

    /// Write one output file under the destination directory.
    pub fn write_output(&self, file: &str, html: &str) -> Result<PathBuf, BuildError> {
        let path = self.config.dest_dir().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, html).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Build the site described by `config` with the built-in parsers.
pub fn build(
    config: SiteConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    build_with_registry(config, ParserRegistry::with_builtin(), events)
}

/// Build with a caller-supplied parser registry.
pub fn build_with_registry(
    config: SiteConfig,
    registry: ParserRegistry,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    let env = BuildEnv::new(config, registry, events)?;
    let dest = env.config.dest_dir();
    fs::create_dir_all(&dest).map_err(|source| BuildError::Write { path: dest, source })?;

    for page in &env.config.pages {
        assemble::build_page(&env, page)?;
    }

    copy::copy_resources(&env);
    copy::copy_theme(&env);
    Ok(env.summary())
}
