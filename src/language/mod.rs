//! Content-language labels and the heuristic detector that assigns them.

mod detector;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PasteError;

pub use detector::{detect_language, rules, Rule, Sample};

/// The fixed set of labels a paste can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Json,
    Markdown,
    Yaml,
    Dockerfile,
    Bash,
    Powershell,
    Python,
    Tsx,
    Typescript,
    Jsx,
    Javascript,
    Sql,
    Html,
    Xml,
    Java,
    Csharp,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Kotlin,
    C,
    Cpp,
    Css,
    Scss,
    #[default]
    Plaintext,
}

impl Language {
    pub const ALL: [Language; 27] = [
        Language::Json,
        Language::Markdown,
        Language::Yaml,
        Language::Dockerfile,
        Language::Bash,
        Language::Powershell,
        Language::Python,
        Language::Tsx,
        Language::Typescript,
        Language::Jsx,
        Language::Javascript,
        Language::Sql,
        Language::Html,
        Language::Xml,
        Language::Java,
        Language::Csharp,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Php,
        Language::Swift,
        Language::Kotlin,
        Language::C,
        Language::Cpp,
        Language::Css,
        Language::Scss,
        Language::Plaintext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Yaml => "yaml",
            Language::Dockerfile => "dockerfile",
            Language::Bash => "bash",
            Language::Powershell => "powershell",
            Language::Python => "python",
            Language::Tsx => "tsx",
            Language::Typescript => "typescript",
            Language::Jsx => "jsx",
            Language::Javascript => "javascript",
            Language::Sql => "sql",
            Language::Html => "html",
            Language::Xml => "xml",
            Language::Java => "java",
            Language::Csharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Plaintext => "plaintext",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| PasteError::Validation(format!("unknown language: {s}")))
    }
}
