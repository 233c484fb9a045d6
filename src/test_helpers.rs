//! Shared test utilities for the docweave test suite.
//!
//! [`SiteFixture`] builds a throwaway working directory file by file, then
//! loads it the way the CLI would. The other helpers shorten assertions on
//! navigation and collected events.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new()
//!     .file("README.md", "# Hello\n")
//!     .config_toml("[[pages]]\nname = \"index\"\ncontent = \"README.md\"\n");
//! let env = env_for(site.config());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use tempfile::TempDir;

use crate::config::{CONFIG_FILE, SiteConfig, load_config};
use crate::parsers::ParserRegistry;
use crate::site::{BuildEnv, BuildEvent};
use crate::types::NavEntry;

// =========================================================================
// Fixture setup
// =========================================================================

/// A site working directory in a temp dir.
pub struct SiteFixture {
    tmp: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
        }
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.tmp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    /// Write the site's `docweave.toml`.
    pub fn config_toml(self, toml: &str) -> Self {
        self.file(CONFIG_FILE, toml)
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// Default output directory.
    pub fn dest(&self) -> PathBuf {
        self.tmp.path().join("_docs")
    }

    /// Load and validate the fixture's config.
    pub fn config(&self) -> SiteConfig {
        load_config(self.tmp.path()).unwrap()
    }
}

/// Build environment with the built-in parsers and no event listener.
pub fn env_for(config: SiteConfig) -> BuildEnv {
    BuildEnv::new(config, ParserRegistry::with_builtin(), None).unwrap()
}

/// Drain a channel whose senders have all been dropped.
pub fn collect_events(rx: Receiver<BuildEvent>) -> Vec<BuildEvent> {
    rx.iter().collect()
}

// =========================================================================
// Lookups
// =========================================================================

/// Names of a navigation list, in order.
pub fn nav_names(navs: &[NavEntry]) -> Vec<&str> {
    navs.iter().map(|n| n.name.as_str()).collect()
}

/// The entry named `name`; panics with the available names otherwise.
pub fn find_nav<'a>(navs: &'a [NavEntry], name: &str) -> &'a NavEntry {
    navs.iter()
        .find(|n| n.name == name)
        .unwrap_or_else(|| panic!("no nav entry '{name}' in {:?}", nav_names(navs)))
}
