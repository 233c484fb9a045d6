//! Running one content source through its parser.
//!
//! Invocation is tolerant up to the parser call: no parser for the pattern,
//! an invalid glob or an empty match each produce an event and the empty
//! [`ParserResult`], and the page is still written. Once files are matched,
//! failing to read one, or to write its source listing, ends the build.

use crate::markdown::escape_html;
use crate::parsers::{ContentParser, ParseEnv, ParserOptions};
use crate::resolve::{self, ResolveError};
use crate::site::{BuildEnv, BuildError, BuildEvent};
use crate::types::{ParserResult, SourceView};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Where a page, sub-page or block takes its content from.
#[derive(Debug, Clone, Copy)]
pub struct ContentSource<'a> {
    pub pattern: &'a str,
    pub ignore: &'a [String],
    /// Parser type forced regardless of extension.
    pub compile: Option<&'a str>,
    pub options: &'a Map<String, Value>,
}

impl<'a> ContentSource<'a> {
    pub fn new(pattern: &'a str, options: &'a Map<String, Value>) -> Self {
        Self {
            pattern,
            ignore: &[],
            compile: None,
            options,
        }
    }
}

pub fn invoke(env: &BuildEnv, source: &ContentSource<'_>) -> Result<ParserResult, BuildError> {
    let Some(parser) = env.registry.find(source.pattern, source.compile) else {
        env.emit(BuildEvent::NoParser {
            pattern: source.pattern.to_string(),
            compile: source.compile.map(str::to_string),
        });
        return Ok(ParserResult::default());
    };

    let resolved = match resolve::resolve(&env.config.cwd, source.pattern, source.ignore) {
        Ok(resolved) => resolved,
        Err(ResolveError::Pattern { message, .. }) => {
            env.emit(BuildEvent::NoFiles {
                pattern: source.pattern.to_string(),
                error: Some(message),
            });
            return Ok(ParserResult::default());
        }
    };
    for entry in resolved.skipped {
        env.emit(BuildEvent::EntrySkipped {
            pattern: source.pattern.to_string(),
            path: entry.path,
            error: entry.error,
        });
    }
    let files = resolved.files;
    if files.is_empty() {
        env.emit(BuildEvent::NoFiles {
            pattern: source.pattern.to_string(),
            error: None,
        });
        return Ok(ParserResult::default());
    }

    let options = ParserOptions::merged(
        &files,
        env.config.parser_defaults(parser.kind()),
        source.options,
    );

    let mut contents = Vec::with_capacity(files.len());
    for file in &files {
        let path = env.config.cwd.join(file);
        let text = fs::read_to_string(&path).map_err(|source| BuildError::Read { path, source })?;
        if options.flag("source") {
            write_source_view(env, parser, file, &text)?;
        }
        contents.push(text);
    }

    let parse_env = ParseEnv {
        config: &env.config,
        highlighter: &env.highlighter,
    };
    Ok(parser.parse(&contents, &options, &parse_env))
}

/// Output path of a file's source listing, relative to the destination:
/// `static/<dir>/<file name>.html`.
pub fn source_view_file(file: &str) -> String {
    format!("static/{file}.html")
}

/// Relative path from a listing's directory back to `<dest>/source`.
pub fn source_dir_for(file: &str) -> String {
    let depth = Path::new(file)
        .parent()
        .map_or(0, |dir| dir.components().count());
    format!("{}source", "../".repeat(depth + 1))
}

fn write_source_view(
    env: &BuildEnv,
    parser: &dyn ContentParser,
    file: &str,
    text: &str,
) -> Result<(), BuildError> {
    let lang = parser.source_lang(file);
    let highlighted = env.highlighter.highlight(text, Some(&lang));
    let highlighted = if highlighted == text {
        escape_html(text)
    } else {
        highlighted
    };
    let view = SourceView {
        title: format!("{} : {}", env.config.name, file),
        footer: env.config.common.footer.clone(),
        source_dir: source_dir_for(file),
        lang,
        content: text.to_string(),
        highlighted,
    };
    let html = env.templates.render_source(&view)?;
    let out = source_view_file(file);
    env.write_output(&out, &html)?;
    env.emit(BuildEvent::SourceGenerated {
        source: file.to_string(),
        file: out,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SiteFixture, collect_events};
    use crate::parsers::ParserRegistry;
    use serde_json::json;
    use std::sync::mpsc;

    fn env_for(site: &SiteFixture) -> (BuildEnv, mpsc::Receiver<BuildEvent>) {
        let (tx, rx) = mpsc::channel();
        let env = BuildEnv::new(site.config(), ParserRegistry::with_builtin(), Some(tx)).unwrap();
        (env, rx)
    }

    #[test]
    fn source_dir_depth() {
        assert_eq!(source_dir_for("a.js"), "../source");
        assert_eq!(source_dir_for("src/a.js"), "../../source");
        assert_eq!(source_dir_for("src/lib/a.js"), "../../../source");
    }

    #[test]
    fn source_view_keeps_file_name() {
        assert_eq!(source_view_file("src/a.js"), "static/src/a.js.html");
    }

    #[test]
    fn no_parser_yields_empty_result() {
        let site = SiteFixture::new().file("notes.txt", "hi");
        let (env, rx) = env_for(&site);
        let options = Map::new();
        let result = invoke(&env, &ContentSource::new("notes.txt", &options)).unwrap();
        assert!(result.is_empty());
        drop(env);
        assert!(matches!(
            &collect_events(rx)[..],
            [BuildEvent::NoParser { pattern, .. }] if pattern == "notes.txt"
        ));
    }

    #[test]
    fn empty_match_yields_empty_result() {
        let site = SiteFixture::new();
        let (env, rx) = env_for(&site);
        let options = Map::new();
        let result = invoke(&env, &ContentSource::new("docs/*.md", &options)).unwrap();
        assert!(result.is_empty());
        drop(env);
        assert!(matches!(
            &collect_events(rx)[..],
            [BuildEvent::NoFiles { error: None, .. }]
        ));
    }

    #[test]
    fn invalid_glob_yields_empty_result() {
        let site = SiteFixture::new();
        let (env, rx) = env_for(&site);
        let options = Map::new();
        let result = invoke(&env, &ContentSource::new("docs/**.{md", &options)).unwrap();
        assert!(result.is_empty());
        drop(env);
        assert!(matches!(
            &collect_events(rx)[..],
            [BuildEvent::NoFiles { error: Some(_), .. }]
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entry_is_reported_and_passed_over() {
        let site = SiteFixture::new().file("docs/a.md", "# First\n");
        let link = site.path().join("docs/old-link");
        std::os::unix::fs::symlink(site.path().join("docs/gone.md"), &link).unwrap();
        let (env, rx) = env_for(&site);
        let options = Map::new();
        let result = invoke(&env, &ContentSource::new("docs/*.md", &options)).unwrap();
        let names: Vec<_> = result.menus.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["First"]);
        drop(env);
        assert!(matches!(
            &collect_events(rx)[..],
            [BuildEvent::EntrySkipped { pattern, path, .. }]
                if pattern == "docs/*.md" && *path == link
        ));
    }

    #[test]
    fn parses_matched_files_in_order() {
        let site = SiteFixture::new()
            .file("docs/b.md", "# Second\n")
            .file("docs/a.md", "# First\n");
        let (env, _rx) = env_for(&site);
        let options = Map::new();
        let result = invoke(&env, &ContentSource::new("docs/*.md", &options)).unwrap();
        let names: Vec<_> = result.menus.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn ignore_and_compile_are_honored() {
        let site = SiteFixture::new()
            .file("src/a.md", "# A\n")
            .file("src/skip.md", "# Skip\n");
        let (env, _rx) = env_for(&site);
        let options = Map::new();
        let ignore = vec!["src/skip.md".to_string()];
        let source = ContentSource {
            pattern: "src/*.md",
            ignore: &ignore,
            compile: Some("code"),
            options: &options,
        };
        let result = invoke(&env, &source).unwrap();
        assert_eq!(result.kind.as_deref(), Some("code"));
        let names: Vec<_> = result.menus.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["src/a.md"]);
    }

    #[test]
    fn source_option_writes_listing() {
        let site = SiteFixture::new().file("src/a.js", "var a = 1 < 2;\n");
        let (env, rx) = env_for(&site);
        let options = json!({ "source": true });
        let options = options.as_object().unwrap();
        invoke(&env, &ContentSource::new("src/*.js", options)).unwrap();
        drop(env);

        let listing = site.dest().join("static/src/a.js.html");
        let html = fs::read_to_string(listing).unwrap();
        assert!(html.contains(" : src/a.js</title>"));
        assert!(html.contains("../../source"));
        assert!(matches!(
            &collect_events(rx)[..],
            [BuildEvent::SourceGenerated { source, file }]
                if source == "src/a.js" && file == "static/src/a.js.html"
        ));
    }

    #[test]
    fn parser_type_defaults_apply_below_call_site_options() {
        let site = SiteFixture::new()
            .file("a.md", "## Two\n")
            .config_toml("[options.markdown]\nmenu_level = 1\n");
        let (env, _rx) = env_for(&site);
        let none = Map::new();
        let result = invoke(&env, &ContentSource::new("a.md", &none)).unwrap();
        assert!(result.menus.unwrap()[0].sub);

        let overrides = json!({ "menu_level": 2 });
        let result =
            invoke(&env, &ContentSource::new("a.md", overrides.as_object().unwrap())).unwrap();
        assert!(!result.menus.unwrap()[0].sub);
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let site = SiteFixture::new().file("bad.md", "");
        fs::write(site.path().join("bad.md"), [0xff, 0xfe, 0xfd]).unwrap();
        let (env, _rx) = env_for(&site);
        let options = Map::new();
        assert!(matches!(
            invoke(&env, &ContentSource::new("bad.md", &options)),
            Err(BuildError::Read { .. })
        ));
    }
}
