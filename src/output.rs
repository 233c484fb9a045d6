//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Pages are listed by positional index and name, with the file they produce
//! after an arrow and their content sources as indented context lines. Build
//! progress is one status line per event: `✓` for files written, `✗` for
//! sources or copies that failed, `-` for pages left out, `!` for warnings.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 index (Home) → index.html
//!     Content: README.md
//! 002 guide (Guide) → guide.html
//!     Index: docs/guide/index.md
//!     001 install → setup.html
//!         Content: docs/guide/install.md
//!     002 linux (sub) → guide-linux.html
//!         Content: docs/guide/linux.md
//!     003 later (no content)
//! 003 api (API) → api.html
//!     Blocks: 3, sidebar
//! 004 empty (no content, skipped)
//!
//! Resources
//!     images ← docs/images
//!
//! Theme
//!     plain
//! ```
//!
//! ## Build
//!
//! ```text
//! ✓ generated setup.html
//! ✓ source src/a.js → static/src/a.js.html
//! ✗ docs/*.md: no files found
//! ✓ generated guide.html
//! ✓ copied docs/images → images
//! Generated 2 pages, 1 source listing (1 warning)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::{BlockSource, ContentSpec, PageSpec, SiteConfig};
use crate::naming;
use crate::site::{BuildEvent, BuildSummary, SkipReason};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Page header: index, name, optional title, produced file.
fn page_header(index: usize, page: &PageSpec, selected: bool) -> String {
    let title = page
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(" ({})", t))
        .unwrap_or_default();
    match (&page.content, selected) {
        (None, _) => format!("{} {} (no content, skipped)", format_index(index), page.name),
        (Some(_), false) => format!("{} {}{} (not selected)", format_index(index), page.name, title),
        (Some(_), true) => format!(
            "{} {}{} \u{2192} {}.html",
            format_index(index),
            page.name,
            title,
            page.name
        ),
    }
}

// ============================================================================
// Check: configured pages
// ============================================================================

/// Format the page inventory of a loaded config.
pub fn format_check_output(config: &SiteConfig) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    if config.pages.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    for (i, page) in config.pages.iter().enumerate() {
        let selected = config.should_build(page);
        lines.push(page_header(i + 1, page, selected));
        if !selected {
            continue;
        }
        match &page.content {
            None => {}
            Some(ContentSpec::Single(pattern)) => {
                lines.push(format!("{}Content: {}", indent(1), pattern));
            }
            Some(ContentSpec::Multi(multi)) => {
                if let Some(index) = multi.index.as_deref().filter(|i| !i.is_empty()) {
                    lines.push(format!("{}Index: {}", indent(1), index));
                }
                for (j, sub) in multi.pages.iter().enumerate() {
                    let flag = if sub.sub { " (sub)" } else { "" };
                    match sub.source() {
                        Some(source) => {
                            lines.push(format!(
                                "{}{} {}{} \u{2192} {}",
                                indent(1),
                                format_index(j + 1),
                                sub.name,
                                flag,
                                naming::sub_page_file(&page.name, &sub.name, sub.index.as_deref())
                            ));
                            lines.push(format!("{}Content: {}", indent(2), source));
                        }
                        None => lines.push(format!(
                            "{}{} {}{} (no content)",
                            indent(1),
                            format_index(j + 1),
                            sub.name,
                            flag
                        )),
                    }
                }
            }
            Some(ContentSpec::Blocks(blocks)) => {
                let sources = blocks
                    .blocks
                    .iter()
                    .filter(|b| matches!(b.content, BlockSource::Path(_)))
                    .count();
                let mut detail = format!("{}Blocks: {}", indent(1), blocks.blocks.len());
                if sources != blocks.blocks.len() {
                    detail.push_str(&format!(" ({} with content)", sources));
                }
                if blocks.sidebar {
                    detail.push_str(", sidebar");
                }
                lines.push(detail);
            }
        }
    }

    if !config.resources.is_empty() {
        lines.push(String::new());
        lines.push("Resources".to_string());
        for (key, source) in &config.resources {
            lines.push(format!("{}{} \u{2190} {}", indent(1), key, source));
        }
    }

    if let Some(theme) = &config.theme {
        lines.push(String::new());
        lines.push("Theme".to_string());
        lines.push(format!("{}{}", indent(1), theme));
    }

    lines
}

/// Print the page inventory to stdout.
pub fn print_check_output(config: &SiteConfig) {
    for line in format_check_output(config) {
        println!("{}", line);
    }
}

// ============================================================================
// Build: progress events
// ============================================================================

/// Format a single build event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    let line = match event {
        BuildEvent::Generated { file, .. } => format!("\u{2713} generated {}", file),
        BuildEvent::SourceGenerated { source, file } => {
            format!("\u{2713} source {} \u{2192} {}", source, file)
        }
        BuildEvent::PageSkipped { page, reason } => match reason {
            SkipReason::NoContent => format!("- skipped {}: no content", page),
            SkipReason::NotSelected => format!("- skipped {}: not in build_pages", page),
        },
        BuildEvent::NoParser { pattern, compile } => match compile {
            Some(kind) => format!("\u{2717} {}: no parser of type '{}'", pattern, kind),
            None => format!("\u{2717} {}: no parser found", pattern),
        },
        BuildEvent::NoFiles { pattern, error } => match error {
            Some(error) => format!("\u{2717} {}: invalid pattern: {}", pattern, error),
            None => format!("\u{2717} {}: no files found", pattern),
        },
        BuildEvent::EntrySkipped { pattern, path, error } => {
            format!("! {}: skipped {}: {}", pattern, path.display(), error)
        }
        BuildEvent::UnsupportedGrammar { lang } => format!(
            "! default grammar '{}' is not supported, unlabelled code stays plain",
            lang
        ),
        BuildEvent::ResourceCopied { key, source } => {
            format!("\u{2713} copied {} \u{2192} {}", source, key)
        }
        BuildEvent::ResourceCopyFailed { key, source, error } => {
            format!("\u{2717} resource {} ({}) not copied: {}", key, source, error)
        }
        BuildEvent::ThemeCopied { theme } => format!("\u{2713} theme {} \u{2192} theme", theme),
        BuildEvent::ThemeCopyFailed { theme, error } => {
            format!("\u{2717} theme {} not copied: {}", theme, error)
        }
        BuildEvent::ThemeConfigFailed { path, error } => {
            format!("\u{2717} theme config {}: {}", path.display(), error)
        }
    };
    vec![line]
}

/// Print a single build event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

/// Format the closing summary of a build.
pub fn format_build_summary(summary: &BuildSummary) -> Vec<String> {
    let mut line = format!(
        "Generated {}, {}",
        plural(summary.pages, "page", "pages"),
        plural(summary.sources, "source listing", "source listings")
    );
    let mut notes = Vec::new();
    if summary.skipped > 0 {
        notes.push(format!("{} skipped", summary.skipped));
    }
    if summary.warnings > 0 {
        notes.push(plural(summary.warnings, "warning", "warnings"));
    }
    if !notes.is_empty() {
        line.push_str(&format!(" ({})", notes.join(", ")));
    }
    vec![line]
}

/// Print the closing summary of a build.
pub fn print_build_summary(summary: &BuildSummary) {
    for line in format_build_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
