//! Page assembly: from a [`PageSpec`] to the render contexts of its files.
//!
//! Every page starts from a base context shared by all of its files (site
//! name, title, flags, navbars, tabs, banner, intro). The page's content
//! shape then decides what gets written:
//!
//! - **single**: one source, one file. Menus the parser reports become the
//!   sidebar.
//! - **multi**: one file per sub-page with content, plus the page's own file
//!   built from the `index` source. All of them share one navigation list;
//!   each sub-page additionally sees its own menus nested right under its
//!   entry.
//! - **blocks**: one file assembled from fragments, each fragment parsed
//!   separately and anchored by its sanitized name.
//!
//! Sub-page files are `<index>.html` when the sub-page names one, otherwise
//! `<page>-<sub>.html`; the page's own file is always `<page>.html`.
//!
//! Assembly ([`assemble`]) produces contexts without touching the output
//! directory; [`build_page`] renders and writes them.

use crate::config::{BlockContent, BlockSource, ContentSpec, MultiContent, PageSpec, SubPageSpec};
use crate::invoke::{ContentSource, invoke};
use crate::markdown;
use crate::naming;
use crate::site::{BuildEnv, BuildError, BuildEvent, SkipReason};
use crate::types::{Article, Block, NavEntry, NavbarLink, ParserResult, RenderContext, Tab};
use std::fs;

/// One file a page produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFile {
    /// File name relative to the output directory.
    pub file: String,
    pub context: RenderContext,
}

/// Outcome of assembling one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutput {
    Skipped(SkipReason),
    /// Files in write order; the page's own file is last.
    Files(Vec<PageFile>),
}

/// Assemble, render and write one page.
pub fn build_page(env: &BuildEnv, page: &PageSpec) -> Result<(), BuildError> {
    match assemble(env, page)? {
        PageOutput::Skipped(reason) => {
            env.emit(BuildEvent::PageSkipped {
                page: page.name.clone(),
                reason,
            });
        }
        PageOutput::Files(files) => {
            for PageFile { file, context } in files {
                let html = env.templates.render_page(&context)?;
                env.write_output(&file, &html)?;
                env.emit(BuildEvent::Generated {
                    page: page.name.clone(),
                    file,
                });
            }
        }
    }
    Ok(())
}

/// Build the render contexts of every file `page` produces.
pub fn assemble(env: &BuildEnv, page: &PageSpec) -> Result<PageOutput, BuildError> {
    let Some(content) = &page.content else {
        return Ok(PageOutput::Skipped(SkipReason::NoContent));
    };
    if !env.config.should_build(page) {
        return Ok(PageOutput::Skipped(SkipReason::NotSelected));
    }

    let base = base_context(env, page)?;
    let mut files = Vec::new();
    let article = match content {
        ContentSpec::Single(pattern) => single_article(env, page, pattern)?,
        ContentSpec::Multi(multi) => {
            let (subs, container) = multi_articles(env, page, multi)?;
            for (file, pagename, article) in subs {
                files.push(PageFile {
                    file,
                    context: RenderContext {
                        pagename,
                        article,
                        ..base.clone()
                    },
                });
            }
            container
        }
        ContentSpec::Blocks(blocks) => block_article(env, blocks)?,
    };
    files.push(PageFile {
        file: format!("{}.html", page.name),
        context: RenderContext {
            pagename: page.name.clone(),
            article,
            ..base
        },
    });
    Ok(PageOutput::Files(files))
}

/// Context fields shared by every file of `page`.
fn base_context(env: &BuildEnv, page: &PageSpec) -> Result<RenderContext, BuildError> {
    let config = &env.config;
    let options = &config.options;
    let common = &config.common;

    let staticsidenav = options.staticsidenav || page.options.staticsidenav;
    let foldsidenav = (options.foldsidenav || page.options.foldsidenav) && !staticsidenav;

    let title = [common.title.as_deref(), page.title.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let navbars = common
        .navbars
        .iter()
        .map(|item| NavbarLink {
            name: item.name.clone(),
            url: item.url.clone(),
            target: item.target.clone().unwrap_or_else(|| "self".to_string()),
            active: item.name == page.name,
        })
        .collect();

    Ok(RenderContext {
        name: config.name.clone(),
        title,
        footer: common.footer.clone(),
        home: common.home.clone(),
        home_url: common.home_url.clone(),
        theme_js: env.theme.js.clone(),
        theme_css: env.theme.css.clone(),
        navbars,
        tabs: tabs(&config.pages, &page.name),
        banner: page.banner.clone(),
        intro: intro_html(env, page)?,
        pagename: page.name.clone(),
        article: Article::default(),
        foldcode: options.foldcode,
        foldparam: options.foldparam,
        foldsidenav,
        staticsidenav,
        has_page_name: options.has_page_name,
        insert_css: options.insert_css.clone(),
        insert_js: options.insert_js.clone(),
    })
}

/// One tab per configured page, in config order.
pub fn tabs(pages: &[PageSpec], current: &str) -> Vec<Tab> {
    pages
        .iter()
        .map(|p| Tab {
            name: p.name.clone(),
            url: p.url.clone(),
            title: p.title.clone(),
            active: p.name == current,
        })
        .collect()
}

fn intro_html(env: &BuildEnv, page: &PageSpec) -> Result<Option<String>, BuildError> {
    let Some(intro) = page.intro.as_deref() else {
        return Ok(None);
    };
    let path = env.config.cwd.join(intro);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|source| BuildError::Read { path, source })?;
    Ok(Some(markdown::to_html(&text, &env.highlighter)))
}

fn single_article(env: &BuildEnv, page: &PageSpec, pattern: &str) -> Result<Article, BuildError> {
    let result = invoke(
        env,
        &ContentSource {
            pattern,
            ignore: &page.ignore,
            compile: page.compile.as_deref(),
            options: &page.options.parser,
        },
    )?;
    let mut article = Article::from_result(result);
    if article.sidebars.is_none() {
        article.sidebars = article.result.menus.clone().filter(|m| !m.is_empty());
    }
    Ok(article)
}

/// Shared navigation of a multi page, in declared order.
///
/// Each entry's `p_name` is the name of the closest non-`sub` entry at or
/// before it; leading `sub` entries have none.
pub fn multi_navs(page: &str, subs: &[SubPageSpec]) -> Vec<NavEntry> {
    let mut parent: Option<&str> = None;
    subs.iter()
        .map(|sub| {
            if !sub.sub {
                parent = Some(sub.name.as_str());
            }
            NavEntry {
                name: sub.name.clone(),
                p_name: parent.map(str::to_string),
                sub: sub.sub,
                blank: sub.source().is_none(),
                url: Some(naming::sub_page_file(page, &sub.name, sub.index.as_deref())),
                ..NavEntry::default()
            }
        })
        .collect()
}

/// Copy of `navs` with the result's top-level menus nested after `position`.
pub fn splice_menus(navs: &[NavEntry], position: usize, result: &ParserResult) -> Vec<NavEntry> {
    let mut current = navs.to_vec();
    let nested = result.top_level_menus().map(|menu| NavEntry {
        sub: true,
        ..menu.clone()
    });
    let at = (position + 1).min(current.len());
    current.splice(at..at, nested);
    current
}

/// `p_name` of the last entry named `name`.
pub fn parent_name(navs: &[NavEntry], name: &str) -> Option<String> {
    navs.iter()
        .rev()
        .find(|entry| entry.name == name)
        .and_then(|entry| entry.p_name.clone())
}

type SubArticle = (String, String, Article);

fn multi_articles(
    env: &BuildEnv,
    page: &PageSpec,
    multi: &MultiContent,
) -> Result<(Vec<SubArticle>, Article), BuildError> {
    let navs = multi_navs(&page.name, &multi.pages);
    let mut subs = Vec::new();

    for (position, sub) in multi.pages.iter().enumerate() {
        let Some(pattern) = sub.source() else {
            continue;
        };
        let result = invoke(
            env,
            &ContentSource {
                pattern,
                ignore: &sub.ignore,
                compile: sub.compile.as_deref(),
                options: &sub.options,
            },
        )?;
        let sidebars = splice_menus(&navs, position, &result);
        let mut article = Article::from_result(result);
        article.name = Some(sub.name.clone());
        article.parent_name = parent_name(&sidebars, &sub.name);
        article.sidebars = Some(sidebars);
        subs.push((
            naming::sub_page_file(&page.name, &sub.name, sub.index.as_deref()),
            naming::sub_page_stem(&page.name, &sub.name, None),
            article,
        ));
    }

    let container = match multi.index.as_deref().filter(|i| !i.is_empty()) {
        Some(pattern) => invoke(
            env,
            &ContentSource {
                pattern,
                ignore: &page.index_ignore,
                compile: page.index_compile.as_deref(),
                options: &multi.index_options,
            },
        )?,
        None => ParserResult::default(),
    };
    let mut container = Article::from_result(container);
    container.sidebars = Some(navs);
    Ok((subs, container))
}

fn block_article(env: &BuildEnv, content: &BlockContent) -> Result<Article, BuildError> {
    let mut navs = Vec::new();
    let mut blocks = Vec::new();

    for spec in &content.blocks {
        let name = spec.name.as_deref().filter(|n| !n.is_empty());
        let tag = name.map(naming::sanitize).unwrap_or_default();
        if let Some(name) = name {
            navs.push(NavEntry {
                name: name.to_string(),
                index: spec.index.clone(),
                tag: Some(naming::fragment(name)),
                sub: spec.sub,
                ..NavEntry::default()
            });
        }

        let block = match &spec.content {
            BlockSource::Path(pattern) => {
                let result = invoke(
                    env,
                    &ContentSource {
                        pattern,
                        ignore: &spec.ignore,
                        compile: spec.compile.as_deref(),
                        options: &spec.options,
                    },
                )?;
                if name.is_some() && !spec.sub {
                    navs.extend(result.top_level_menus().map(|m| NavEntry::menu(&m.name, true)));
                }
                Block {
                    result,
                    name: name.map(str::to_string),
                    index: spec.index.clone(),
                    tag,
                    sub: spec.sub,
                }
            }
            BlockSource::Inline => Block {
                result: ParserResult {
                    kind: Some("html".to_string()),
                    content: Some(String::new()),
                    ..ParserResult::default()
                },
                name: name.map(str::to_string),
                index: spec.index.clone(),
                tag,
                sub: false,
            },
        };
        blocks.push(block);
    }

    Ok(Article {
        result: ParserResult {
            kind: Some("block".to_string()),
            ..ParserResult::default()
        },
        sidebars: content.sidebar.then_some(navs),
        blocks: Some(blocks),
        ..Article::default()
    })
}
