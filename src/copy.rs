//! Resource and theme copying, plus theme asset discovery.
//!
//! Runs after every page is written. Each copy stands alone: a missing or
//! unreadable source is reported as an event and the remaining copies still
//! happen. Existing files in the destination are overwritten, never removed.
//!
//! A theme is a directory copied to `<dest>/theme`. Its optional `theme.toml`
//! lists the assets pages should reference:
//!
//! ```toml
//! js = ["js/app.js"]
//! css = ["css/main.css"]
//! ```

use crate::site::{BuildEnv, BuildEvent};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the asset manifest inside a theme directory.
pub const THEME_CONFIG_FILE: &str = "theme.toml";

/// Assets a theme asks every page to include, relative to `<dest>/theme`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeAssets {
    pub js: Vec<String>,
    pub css: Vec<String>,
}

/// Directory a theme identifier points at.
///
/// A bare word (`plain`, `dark-blue`) names `<cwd>/themes/<word>`; anything
/// else is a path relative to `cwd`.
pub fn theme_dir(cwd: &Path, theme: &str) -> PathBuf {
    if is_bare_name(theme) {
        cwd.join("themes").join(theme)
    } else {
        cwd.join(theme)
    }
}

fn is_bare_name(theme: &str) -> bool {
    let mut chars = theme.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Lexically normalize an asset path: drop `.` components, fold `..`, use
/// forward slashes.
fn normalize_asset(path: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    parts.join("/")
}

/// Read the configured theme's `theme.toml`.
///
/// No theme or no manifest means no assets. An unreadable or invalid manifest
/// is reported and also yields no assets.
pub fn load_theme_assets(env: &BuildEnv) -> ThemeAssets {
    let Some(theme) = env.config.theme.as_deref() else {
        return ThemeAssets::default();
    };
    let path = theme_dir(&env.config.cwd, theme).join(THEME_CONFIG_FILE);
    if !path.exists() {
        return ThemeAssets::default();
    }
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| toml::from_str::<ThemeAssets>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(assets) => ThemeAssets {
            js: assets.js.iter().map(|p| normalize_asset(p)).collect(),
            css: assets.css.iter().map(|p| normalize_asset(p)).collect(),
        },
        Err(error) => {
            env.emit(BuildEvent::ThemeConfigFailed { path, error });
            ThemeAssets::default()
        }
    }
}

/// Copy a file, or a directory tree merged into `dst`.
fn copy_path(src: &Path, dst: &Path) -> std::io::Result<()> {
    let meta = fs::metadata(src)?;
    if meta.is_file() {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        return Ok(());
    }
    fs::create_dir_all(dst)?;
    copy_dir_recursive(src, dst)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Copy every `[resources]` entry to `<dest>/<key>`, in key order.
pub fn copy_resources(env: &BuildEnv) {
    let dest = env.config.dest_dir();
    for (key, source) in &env.config.resources {
        let event = match copy_path(&env.config.cwd.join(source), &dest.join(key)) {
            Ok(()) => BuildEvent::ResourceCopied {
                key: key.clone(),
                source: source.clone(),
            },
            Err(e) => BuildEvent::ResourceCopyFailed {
                key: key.clone(),
                source: source.clone(),
                error: e.to_string(),
            },
        };
        env.emit(event);
    }
}

/// Copy the configured theme directory to `<dest>/theme`.
pub fn copy_theme(env: &BuildEnv) {
    let Some(theme) = env.config.theme.as_deref() else {
        return;
    };
    let src = theme_dir(&env.config.cwd, theme);
    let event = match copy_path(&src, &env.config.dest_dir().join("theme")) {
        Ok(()) => BuildEvent::ThemeCopied {
            theme: theme.to_string(),
        },
        Err(e) => BuildEvent::ThemeCopyFailed {
            theme: theme.to_string(),
            error: e.to_string(),
        },
    };
    env.emit(event);
}
