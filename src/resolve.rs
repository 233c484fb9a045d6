//! Content pattern expansion.
//!
//! A content source names its files with a glob relative to the working
//! directory: `README.md`, `docs/*.md`, `src/**/*.{js,ts}`. Matching uses
//! [wax](https://docs.rs/wax) semantics (`*` stays inside one component,
//! `**` crosses directories, `{a,b}` alternates) and the tree is walked
//! with walkdir.
//!
//! Results are files only, as forward-slash paths relative to the working
//! directory, sorted so output order never depends on directory iteration
//! order. Hidden directories are not descended into.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// An entry below the glob root that could not be read while walking,
/// such as a dangling symlink or a symlink loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: String,
}

/// Files a pattern expanded to, plus the entries the walk had to pass over.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolved {
    pub files: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

const GLOB_CHARS: &[char] = &['*', '?', '[', ']', '{', '}', '<', '>', '!'];

fn has_glob_chars(s: &str) -> bool {
    s.contains(GLOB_CHARS)
}

/// Compile `glob`, reporting failures against the `pattern` it came from.
fn compile<'t>(glob: &'t str, pattern: &str) -> Result<Glob<'t>, ResolveError> {
    Glob::new(glob).map_err(|e| ResolveError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Split a glob into its leading literal directories and the remainder
/// matched below them. A rooted pattern keeps `/` as its root.
fn split_pattern(pattern: &str) -> (&str, &str) {
    let mut end = 0;
    for (i, c) in pattern.char_indices() {
        if GLOB_CHARS.contains(&c) {
            break;
        }
        if c == '/' {
            end = i;
        }
    }
    if end == 0 && pattern.starts_with('/') {
        ("/", &pattern[1..])
    } else {
        (&pattern[..end], pattern[end..].trim_start_matches('/'))
    }
}

/// How deep the walk must go for `rest`, or `None` when it can cross
/// any number of directories.
fn walk_depth(rest: &str) -> Option<usize> {
    if rest.contains("**") || rest.contains(['{', '<']) {
        None
    } else {
        Some(rest.split('/').count())
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn join_slash(prefix: &str, rel: &str) -> String {
    match prefix {
        "" => rel.to_string(),
        "/" => format!("/{rel}"),
        _ => format!("{prefix}/{rel}"),
    }
}

/// Expand `pattern` against `cwd`, dropping files matched by any `ignore` glob.
///
/// Relative patterns yield paths relative to `cwd`; absolute patterns yield
/// absolute paths. Entries that cannot be read are passed over and listed in
/// [`Resolved::skipped`].
pub fn resolve(cwd: &Path, pattern: &str, ignore: &[String]) -> Result<Resolved, ResolveError> {
    let pattern = pattern.trim().trim_start_matches("./");
    if pattern.is_empty() {
        return Ok(Resolved::default());
    }
    let ignores = ignore
        .iter()
        .map(|i| compile(i.trim_start_matches("./"), i))
        .collect::<Result<Vec<_>, _>>()?;
    let ignored = |path: &str| {
        ignores
            .iter()
            .any(|g| g.is_match(CandidatePath::from(Path::new(path))))
    };

    if !has_glob_chars(pattern) {
        let is_file = fs::metadata(cwd.join(pattern)).is_ok_and(|m| m.is_file());
        let files = if is_file && !ignored(pattern) {
            vec![pattern.to_string()]
        } else {
            Vec::new()
        };
        return Ok(Resolved {
            files,
            skipped: Vec::new(),
        });
    }

    let (prefix, rest) = split_pattern(pattern);
    let glob = compile(rest, pattern)?;
    let root = cwd.join(prefix);
    if !root.is_dir() {
        return Ok(Resolved::default());
    }

    let mut resolved = Resolved::default();
    let mut walker = WalkDir::new(&root).follow_links(true);
    if let Some(depth) = walk_depth(rest) {
        walker = walker.max_depth(depth);
    }
    let entries = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && is_hidden(e.file_name())));
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map_or_else(|| root.clone(), Path::to_path_buf);
                let error = match e.io_error() {
                    Some(io) => io.to_string(),
                    None => "filesystem loop".to_string(),
                };
                resolved.skipped.push(SkippedEntry { path, error });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !glob.is_match(CandidatePath::from(Path::new(&rel))) {
            continue;
        }
        let path = join_slash(prefix, &rel);
        if !ignored(&path) {
            resolved.files.push(path);
        }
    }
    resolved.files.sort();
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for file in files {
            let path = tmp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, file).unwrap();
        }
        tmp
    }

    fn files(tmp: &TempDir, pattern: &str, ignore: &[String]) -> Vec<String> {
        resolve(tmp.path(), pattern, ignore).unwrap().files
    }

    #[test]
    fn split_stops_at_glob() {
        assert_eq!(split_pattern("docs/api/*.md"), ("docs/api", "*.md"));
        assert_eq!(split_pattern("*.md"), ("", "*.md"));
        assert_eq!(split_pattern("src/**/*.rs"), ("src", "**/*.rs"));
        assert_eq!(split_pattern("a/{b,c}/d.md"), ("a", "{b,c}/d.md"));
        assert_eq!(split_pattern("/*.md"), ("/", "*.md"));
        assert_eq!(split_pattern("/srv/docs/*.md"), ("/srv/docs", "*.md"));
    }

    #[test]
    fn depth_limited_without_recursion() {
        assert_eq!(walk_depth("*.md"), Some(1));
        assert_eq!(walk_depth("*/index.md"), Some(2));
        assert_eq!(walk_depth("**/*.md"), None);
        assert_eq!(walk_depth("{a,b/c}.md"), None);
    }

    #[test]
    fn literal_path_matches_existing_file() {
        let tmp = tree(&["README.md"]);
        assert_eq!(files(&tmp, "README.md", &[]), ["README.md"]);
        assert_eq!(files(&tmp, "./README.md", &[]), ["README.md"]);
    }

    #[test]
    fn missing_literal_path_is_empty() {
        let tmp = tree(&[]);
        assert!(files(&tmp, "nope.md", &[]).is_empty());
    }

    #[test]
    fn star_stays_in_one_directory() {
        let tmp = tree(&["docs/a.md", "docs/b.md", "docs/deep/c.md", "docs/x.txt"]);
        assert_eq!(files(&tmp, "docs/*.md", &[]), ["docs/a.md", "docs/b.md"]);
    }

    #[test]
    fn double_star_recurses_sorted() {
        let tmp = tree(&["src/z.rs", "src/a/b.rs", "src/a.rs"]);
        assert_eq!(
            files(&tmp, "src/**/*.rs", &[]),
            ["src/a.rs", "src/a/b.rs", "src/z.rs"]
        );
    }

    #[test]
    fn brace_sets() {
        let tmp = tree(&["a.js", "b.ts", "c.css"]);
        assert_eq!(files(&tmp, "*.{js,ts}", &[]), ["a.js", "b.ts"]);
    }

    #[test]
    fn ignore_patterns_exclude() {
        let tmp = tree(&["src/a.js", "src/a.min.js", "src/vendor/v.js"]);
        let ignore = vec!["**/*.min.js".to_string(), "src/vendor/**".to_string()];
        assert_eq!(files(&tmp, "src/**/*.js", &ignore), ["src/a.js"]);
    }

    #[test]
    fn ignore_applies_to_literal_paths() {
        let tmp = tree(&["README.md"]);
        let ignore = vec!["*.md".to_string()];
        assert!(files(&tmp, "README.md", &ignore).is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let tmp = tree(&["a.md"]);
        assert!(files(&tmp, "*.rs", &[]).is_empty());
        assert!(files(&tmp, "missing/*.md", &[]).is_empty());
    }

    #[test]
    fn hidden_directories_skipped() {
        let tmp = tree(&[".git/x.md", "a.md"]);
        assert_eq!(files(&tmp, "**/*.md", &[]), ["a.md"]);
    }

    #[test]
    fn invalid_pattern_is_error() {
        let tmp = tree(&[]);
        assert!(matches!(
            resolve(tmp.path(), "src/**.{rs", &[]),
            Err(ResolveError::Pattern { pattern, .. }) if pattern == "src/**.{rs"
        ));
    }

    #[test]
    fn absolute_glob_returns_absolute_paths() {
        let tmp = tree(&["docs/a.md", "docs/b.txt"]);
        let root = tmp.path().to_string_lossy().replace('\\', "/");
        let expected = format!("{root}/docs/a.md");
        assert_eq!(files(&tmp, &format!("{root}/docs/*.md"), &[]), [expected.clone()]);
        assert_eq!(files(&tmp, &expected, &[]), [expected]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_skipped() {
        let tmp = tree(&["docs/a.md"]);
        let link = tmp.path().join("docs/old-link");
        std::os::unix::fs::symlink(tmp.path().join("docs/gone.md"), &link).unwrap();

        let resolved = resolve(tmp.path(), "docs/*.md", &[]).unwrap();
        assert_eq!(resolved.files, ["docs/a.md"]);
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.skipped[0].path, link);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_skipped() {
        let tmp = tree(&["docs/a.md", "docs/deep/b.md"]);
        std::os::unix::fs::symlink(tmp.path().join("docs"), tmp.path().join("docs/deep/up")).unwrap();

        let resolved = resolve(tmp.path(), "docs/**/*.md", &[]).unwrap();
        assert_eq!(resolved.files, ["docs/a.md", "docs/deep/b.md"]);
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.skipped[0].error, "filesystem loop");
    }

    #[cfg(unix)]
    #[test]
    fn entries_below_pattern_depth_are_not_walked() {
        let tmp = tree(&["docs/a.md"]);
        fs::create_dir_all(tmp.path().join("docs/deep")).unwrap();
        std::os::unix::fs::symlink("/no/such/target", tmp.path().join("docs/deep/x.md")).unwrap();

        let resolved = resolve(tmp.path(), "docs/*.md", &[]).unwrap();
        assert_eq!(resolved.files, ["docs/a.md"]);
        assert!(resolved.skipped.is_empty());
    }
}
