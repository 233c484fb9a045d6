//! # docweave
//!
//! A static documentation-site generator. A declarative `docweave.toml`
//! lists pages; each page pulls its content from markdown, HTML or source
//! files, which are parsed into HTML fragments, rendered through a page
//! template and written to an output directory together with resources and
//! a theme.
//!
//! # Architecture
//!
//! ```text
//! docweave.toml ─▶ SiteConfig ─▶ BuildEnv ─▶ per page: assemble ─▶ render ─▶ <dest>/*.html
//!                                              │
//!                                              └─▶ per content source: resolve ─▶ parse
//! ```
//!
//! A build is single-threaded and runs in config order. Everything shared by
//! its steps (config, highlighter, compiled templates, parser registry, theme
//! assets) is built once into a [`site::BuildEnv`] and passed by reference;
//! nothing is global.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Build driver, build events and errors, the shared build environment |
//! | [`assemble`] | Page assembly: base context, single/multi/block shapes, navigation |
//! | [`invoke`] | Runs one content source through its parser, writes source listings |
//! | [`parsers`] | `ContentParser` trait, registry, built-in markdown/html/code parsers |
//! | [`resolve`] | Glob expansion of content patterns |
//! | [`highlight`] | Class-based syntax highlighting with a default language |
//! | [`markdown`] | Markdown → HTML with heading ids and highlighted code blocks |
//! | [`template`] | Tera page and source-listing templates with custom filters |
//! | [`copy`] | Resource and theme copying, theme asset manifest |
//! | [`config`] | `docweave.toml` loading, merging onto defaults, validation |
//! | [`types`] | Render context and navigation types handed to templates |
//! | [`naming`] | Anchor sanitization and sub-page file names |
//! | [`output`] | CLI output formatting for builds and `check` |
//!
//! # Failure Policy
//!
//! Content problems degrade a page instead of aborting the run: a pattern
//! with no parser or no matching files renders as empty content, and a
//! resource or theme that cannot be copied is skipped. Each of these is a
//! [`site::BuildEvent`]. Configuration, template, read and write failures
//! are [`site::BuildError`]s and stop the build.

pub mod assemble;
pub mod config;
pub mod copy;
pub mod highlight;
pub mod invoke;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod parsers;
pub mod resolve;
pub mod site;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
