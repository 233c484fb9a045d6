//! Syntax highlighting for code blocks and source listings.
//!
//! Wraps syntect's bundled grammars behind one call, [`Highlighter::highlight`],
//! that never fails: a language syntect does not know yields the input code
//! unchanged, byte for byte. Output is class-based (`<span class="source js">`)
//! so the theme stylesheet decides the colors.
//!
//! Language tags are normalized before lookup:
//!
//! | Tag | Canonical |
//! |---|---|
//! | `js`, `JS`, `javascript`, `JavaScript` | `javascript` |
//! | `html` | `markup` |
//! | anything else | unchanged |
//!
//! `markup` is looked up as syntect's HTML grammar.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Canonical name of a language tag.
pub fn normalize_lang(lang: &str) -> String {
    let lang = lang.trim();
    if lang.eq_ignore_ascii_case("javascript") || lang.eq_ignore_ascii_case("js") {
        "javascript".to_string()
    } else if lang == "html" {
        "markup".to_string()
    } else {
        lang.to_string()
    }
}

/// Highlighter with a site-wide default language.
///
/// Built once per run and shared by reference; it holds no mutable state.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    default_lang: Option<String>,
}

impl Highlighter {
    pub fn new(default_lang: Option<&str>) -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            default_lang: default_lang
                .filter(|l| !l.trim().is_empty())
                .map(normalize_lang),
        }
    }

    pub fn default_lang(&self) -> Option<&str> {
        self.default_lang.as_deref()
    }

    /// The configured default language, if no grammar supports it.
    ///
    /// Checked once at startup so the build can warn a single time.
    pub fn unsupported_default(&self) -> Option<&str> {
        self.default_lang
            .as_deref()
            .filter(|lang| self.find_syntax(lang).is_none())
    }

    /// Whether `lang` resolves to a known grammar.
    pub fn supports(&self, lang: &str) -> bool {
        self.find_syntax(&normalize_lang(lang)).is_some()
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.to_lowercase();
        let token = match lang.as_str() {
            "markup" => "html",
            other => other,
        };
        self.syntaxes.find_syntax_by_token(token)
    }

    /// Highlight `code` as `lang`, falling back to the default language.
    ///
    /// Returns `code` unchanged when no language applies or the language is
    /// unsupported.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang
            .filter(|l| !l.trim().is_empty())
            .map(normalize_lang)
            .or_else(|| self.default_lang.clone());
        let Some(lang) = lang else {
            return code.to_string();
        };
        let Some(syntax) = self.find_syntax(&lang) else {
            return code.to_string();
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                return code.to_string();
            }
        }
        generator.finalize()
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("default_lang", &self.default_lang)
            .finish_non_exhaustive()
    }
}
