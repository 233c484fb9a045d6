use super::{ContentParser, ParseEnv, ParserOptions, extension_of};
use crate::markdown::{code_block, escape_html};
use crate::naming;
use crate::types::{NavEntry, ParserResult};

/// Source files shown as highlighted listings, one section per file.
///
/// The grammar is the `lang` option when set, otherwise the file extension.
/// Each file is reported as a top-level menu entry.
pub struct CodeParser;

fn lang_for(file: &str) -> Option<String> {
    let ext = extension_of(file);
    ext.strip_prefix('.').map(str::to_string).filter(|e| !e.is_empty())
}

impl ContentParser for CodeParser {
    fn kind(&self) -> &str {
        "code"
    }

    fn extensions(&self) -> &[&str] {
        &[
            ".rs", ".js", ".ts", ".css", ".py", ".go", ".c", ".h", ".java", ".sh", ".toml",
            ".json", ".yaml", ".yml",
        ]
    }

    fn source_lang(&self, file: &str) -> String {
        lang_for(file).unwrap_or_else(|| self.kind().to_string())
    }

    fn parse(
        &self,
        contents: &[String],
        options: &ParserOptions,
        env: &ParseEnv<'_>,
    ) -> ParserResult {
        let files = options.files();
        let mut html = String::new();
        let mut menus = Vec::new();

        for (i, source) in contents.iter().enumerate() {
            let file = files.get(i).copied().unwrap_or_default();
            let lang = options.str("lang").map(str::to_string).or_else(|| lang_for(file));

            html.push_str(&format!(
                "<section class=\"code-file\" id=\"{}\">\n<h3>{}</h3>\n",
                escape_html(&naming::sanitize(file)),
                escape_html(file)
            ));
            html.push_str(&code_block(source, lang.as_deref(), env.highlighter));
            html.push_str("</section>\n");

            if !file.is_empty() {
                menus.push(NavEntry::menu(file, false));
            }
        }

        ParserResult {
            kind: Some("code".to_string()),
            content: Some(html),
            menus: (!menus.is_empty()).then_some(menus),
            ..ParserResult::default()
        }
    }
}
