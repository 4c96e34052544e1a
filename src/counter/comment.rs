use serde::{Deserialize, Serialize};

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Code,
    Comment,
    Blank,
}

/// Comment introducers recognized regardless of extension.
pub const GENERIC_PREFIXES: &[&str] = &["#", "//", "/*", "*", "*/"];

const HASH_PREFIXES: &[&str] = &["#"];
const C_FAMILY_PREFIXES: &[&str] = &["//", "/*", "*", "*/"];
const DASH_PREFIXES: &[&str] = &["--"];
const MARKUP_PREFIXES: &[&str] = &["<!--", "-->"];
const PERCENT_PREFIXES: &[&str] = &["%"];
const SEMICOLON_PREFIXES: &[&str] = &[";"];

const HASH_FAMILY: &[&str] = &[
    ".py", ".pyw", ".rb", ".sh", ".bash", ".zsh", ".fish", ".pl", ".pm", ".r", ".R", ".jl",
    ".ex", ".exs", ".nim", ".cr", ".coffee", ".tcl", ".ps1", ".mk", ".cmake", ".dockerfile",
];

const C_FAMILY: &[&str] = &[
    ".c", ".h", ".cc", ".cpp", ".cxx", ".hpp", ".hh", ".cs", ".java", ".kt", ".kts", ".scala",
    ".go", ".rs", ".swift", ".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".dart", ".php",
    ".css", ".scss", ".less", ".groovy", ".gradle", ".m", ".mm", ".zig", ".v", ".sol", ".proto",
];

const DASH_FAMILY: &[&str] = &[".lua", ".hs", ".elm", ".ada", ".adb", ".ads", ".vhd", ".vhdl"];

const MARKUP_FAMILY: &[&str] = &[".html", ".htm", ".xml", ".xhtml", ".vue", ".svelte"];

const PERCENT_FAMILY: &[&str] = &[".erl", ".hrl", ".tex", ".sty", ".mat"];

const SEMICOLON_FAMILY: &[&str] = &[".lisp", ".cl", ".el", ".clj", ".cljs", ".scm", ".asm", ".s"];

/// How comment lines are recognized.
///
/// `Generic` matches the same fixed introducer set for every file. `PerLanguage`
/// narrows the set by extension family and falls back to the generic set for
/// extensions it does not know. Both are textual heuristics: a string literal
/// starting with `#` or `*` counts as a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentPolicy {
    #[default]
    Generic,
    PerLanguage,
}

impl CommentPolicy {
    /// Comment introducers applicable to files with `extension`.
    #[must_use]
    pub fn prefixes_for(self, extension: &str) -> &'static [&'static str] {
        match self {
            Self::Generic => GENERIC_PREFIXES,
            Self::PerLanguage => family_prefixes(extension).unwrap_or(GENERIC_PREFIXES),
        }
    }

    /// Classify one line of a file with the given extension.
    #[must_use]
    pub fn classify(self, line: &str, extension: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if self
            .prefixes_for(extension)
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
        {
            LineKind::Comment
        } else {
            LineKind::Code
        }
    }
}

fn family_prefixes(extension: &str) -> Option<&'static [&'static str]> {
    let families: [(&[&str], &'static [&'static str]); 6] = [
        (HASH_FAMILY, HASH_PREFIXES),
        (C_FAMILY, C_FAMILY_PREFIXES),
        (DASH_FAMILY, DASH_PREFIXES),
        (MARKUP_FAMILY, MARKUP_PREFIXES),
        (PERCENT_FAMILY, PERCENT_PREFIXES),
        (SEMICOLON_FAMILY, SEMICOLON_PREFIXES),
    ];
    families
        .iter()
        .find(|(extensions, _)| extensions.contains(&extension))
        .map(|(_, prefixes)| *prefixes)
}

/// Classify a line with the generic policy.
#[must_use]
pub fn classify(line: &str, extension: &str) -> LineKind {
    CommentPolicy::Generic.classify(line, extension)
}

#[cfg(test)]
#[path = "comment_tests.rs"]
mod tests;
