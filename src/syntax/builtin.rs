//! Built-in language definitions
//!
//! Comment syntax for common languages, used when no extension contributes
//! a configuration for a language id.

/// A built-in language entry
#[derive(Debug, Clone, Copy)]
pub struct BuiltinLanguage {
    /// Language id (e.g. "rust")
    pub id: &'static str,
    /// File extensions without the dot
    pub extensions: &'static [&'static str],
    /// Line comment delimiters; empty when the language has none
    pub line_comments: &'static [&'static str],
}

const fn lang(
    id: &'static str,
    extensions: &'static [&'static str],
    line_comments: &'static [&'static str],
) -> BuiltinLanguage {
    BuiltinLanguage {
        id,
        extensions,
        line_comments,
    }
}

const LANGUAGES: &[BuiltinLanguage] = &[
    lang("rust", &["rs"], &["//"]),
    lang("c", &["c", "h"], &["//"]),
    lang("cpp", &["cpp", "hpp", "cc", "cxx", "hh"], &["//"]),
    lang("csharp", &["cs"], &["//"]),
    lang("java", &["java"], &["//"]),
    lang("go", &["go"], &["//"]),
    lang("swift", &["swift"], &["//"]),
    lang("kotlin", &["kt", "kts"], &["//"]),
    lang("javascript", &["js", "mjs", "cjs", "jsx"], &["//"]),
    lang("typescript", &["ts", "mts", "cts", "tsx"], &["//"]),
    lang("python", &["py", "pyw"], &["#"]),
    lang("ruby", &["rb"], &["#"]),
    lang("shellscript", &["sh", "bash", "zsh"], &["#"]),
    lang("toml", &["toml"], &["#"]),
    lang("yaml", &["yaml", "yml"], &["#"]),
    lang("lua", &["lua"], &["--"]),
    lang("sql", &["sql"], &["--"]),
    lang("haskell", &["hs"], &["--"]),
    lang("clojure", &["clj", "cljs", "edn"], &[";"]),
    lang("markdown", &["md", "markdown"], &[]),
    lang("json", &["json"], &[]),
    lang("plaintext", &["txt"], &[]),
];

/// Get all built-in language definitions
pub fn all_languages() -> &'static [BuiltinLanguage] {
    LANGUAGES
}
