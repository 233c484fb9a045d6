//! Anchor and output-file naming.
//!
//! Every anchor, block tag and sidebar link derived from a configured name
//! goes through [`sanitize`], so a name written once in `docweave.toml`
//! produces the same fragment everywhere it is referenced:
//!
//! - `"Getting Started"` → `"Getting-Started"`
//! - `"api/v1.Client"` → `"api-v1-Client"`
//! - `"@scope:pkg"` → `"-scope-pkg"`
//!
//! Output filenames for sub-pages follow `<page>-<sub>.html` unless the
//! sub-page names an explicit `index`.

/// Replace each `.`, `:`, whitespace character, `@` and `/` with `-`.
///
/// Total and idempotent: no other character is touched, and the
/// replacement character is never itself replaced.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | ':' | '@' | '/' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}

/// Sidebar link target for a name: `#` followed by the sanitized name.
pub fn fragment(name: &str) -> String {
    format!("#{}", sanitize(name))
}

/// Output stem of a sub-page: the explicit `index`, else `<page>-<sub>`.
pub fn sub_page_stem(page: &str, sub: &str, index: Option<&str>) -> String {
    match index {
        Some(index) => index.to_string(),
        None => format!("{page}-{sub}"),
    }
}

/// Output filename (`<stem>.html`) of a sub-page.
pub fn sub_page_file(page: &str, sub: &str, index: Option<&str>) -> String {
    format!("{}.html", sub_page_stem(page, sub, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_separator() {
        assert_eq!(sanitize("a.b:c d@e/f"), "a-b-c-d-e-f");
    }

    #[test]
    fn leaves_other_characters_alone() {
        assert_eq!(sanitize("Getting_Started-#1 (beta)!"), "Getting_Started-#1-(beta)!");
    }

    #[test]
    fn tabs_and_newlines_count_as_whitespace() {
        assert_eq!(sanitize("a\tb\nc"), "a-b-c");
    }

    #[test]
    fn idempotent() {
        for input in ["", "plain", "a.b", "@scope/pkg:1.0 beta", "--", "日本 語"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "sanitize not idempotent for {input:?}");
        }
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn fragment_prefixes_hash() {
        assert_eq!(fragment("Quick Start"), "#Quick-Start");
    }

    #[test]
    fn sub_page_file_defaults_to_page_dash_sub() {
        assert_eq!(sub_page_file("guide", "intro", None), "guide-intro.html");
    }

    #[test]
    fn sub_page_file_uses_explicit_index() {
        assert_eq!(sub_page_file("guide", "intro", Some("start")), "start.html");
    }
}
