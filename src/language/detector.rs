//! Heuristic language detection.
//!
//! Detection runs an ordered table of rules over the raw content; the first
//! rule that returns a label wins and `plaintext` is the fallback. The order is
//! part of the behaviour: `{"a": 1}` also looks like a CSS block, and is only
//! labelled `json` because the JSON rule runs first.

use std::sync::LazyLock;

use regex::Regex;

use super::Language;

/// Compile a pattern once and hand back a `&'static Regex`.
macro_rules! re {
    ($pat:expr) => {{
        static RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pat).expect("detector pattern is a valid regex"));
        &*RE
    }};
}

/// Input to a rule: the raw content plus its trimmed form, computed once.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub content: &'a str,
    pub trimmed: &'a str,
}

impl<'a> Sample<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            trimmed: content.trim(),
        }
    }
}

/// One entry of the detection cascade.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub classify: fn(&Sample<'_>) -> Option<Language>,
}

impl Rule {
    pub fn apply(&self, sample: &Sample<'_>) -> Option<Language> {
        (self.classify)(sample)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

static RULES: &[Rule] = &[
    Rule { name: "json", classify: json },
    Rule { name: "markdown", classify: markdown },
    Rule { name: "yaml", classify: yaml },
    Rule { name: "dockerfile", classify: dockerfile },
    Rule { name: "shell", classify: shell },
    Rule { name: "powershell", classify: powershell },
    Rule { name: "python", classify: python },
    Rule { name: "typescript", classify: typescript },
    Rule { name: "jsx", classify: jsx },
    Rule { name: "javascript", classify: javascript },
    Rule { name: "sql", classify: sql },
    Rule { name: "html", classify: html },
    Rule { name: "xml", classify: xml },
    Rule { name: "java", classify: java },
    Rule { name: "csharp", classify: csharp },
    Rule { name: "go", classify: go },
    Rule { name: "rust", classify: rust },
    Rule { name: "ruby", classify: ruby },
    Rule { name: "php", classify: php },
    Rule { name: "swift", classify: swift },
    Rule { name: "kotlin", classify: kotlin },
    Rule { name: "c", classify: c },
    Rule { name: "cpp", classify: cpp },
    Rule { name: "css", classify: css },
];

/// The detection cascade, in evaluation order.
pub fn rules() -> &'static [Rule] {
    RULES
}

/// Label `content` with the first matching rule, or `plaintext`.
pub fn detect_language(content: &str) -> Language {
    let sample = Sample::new(content);
    if sample.trimmed.is_empty() {
        return Language::Plaintext;
    }
    RULES
        .iter()
        .find_map(|rule| rule.apply(&sample))
        .unwrap_or(Language::Plaintext)
}

fn when(cond: bool, lang: Language) -> Option<Language> {
    cond.then_some(lang)
}

/// `function`, `const`, `let`, `var`: declarations that rule out shell and
/// Python.
fn has_js_declaration(content: &str) -> bool {
    re!(r"\bconst\b|\blet\b|\bvar\b|\bfunction\b").is_match(content)
}

fn has_powershell_syntax(content: &str) -> bool {
    re!(r"(?i)\$(env:|PSModulePath)|\[cmdletbinding\(\)\]").is_match(content)
}

fn has_markup_elements(content: &str) -> bool {
    re!(r"<[A-Z]\w*").is_match(content)
        || re!(r"return\s*\(?\s*<").is_match(content)
        || re!(r"</\w+>").is_match(content)
}

fn has_type_syntax(content: &str) -> bool {
    re!(r"\b(interface|type|enum)\s+\w+").is_match(content)
        || re!(r":\s*(string|number|boolean|any|void|unknown|React\.|JSX\.)").is_match(content)
        || re!(r"<.*>\s*\(").is_match(content)
        || re!(r"as\s+(const|string|number|any)").is_match(content)
}

fn json(s: &Sample<'_>) -> Option<Language> {
    let t = s.trimmed;
    let bracketed = (t.starts_with('{') || t.starts_with('[')) && (t.ends_with('}') || t.ends_with(']'));
    when(
        bracketed && serde_json::from_str::<serde_json::Value>(t).is_ok(),
        Language::Json,
    )
}

fn markdown(s: &Sample<'_>) -> Option<Language> {
    let heading = re!(r"^#{1,6}\s").is_match(s.trimmed);
    let link = re!(r"\[.+\]\(.+\)").is_match(s.content) && !re!(r"<\w+").is_match(s.content);
    let bullet = re!(r"^[-*+]\s").is_match(s.trimmed);
    let numbered = re!(r"^\d+\.\s").is_match(s.trimmed);
    when(heading || link || bullet || numbered, Language::Markdown)
}

fn yaml(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"(?m)^---\s*$|^[\w-]+:\s*.+$").is_match(s.content)
            && !s.content.contains('{')
            && !s.content.contains(';'),
        Language::Yaml,
    )
}

fn dockerfile(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"(?im)^FROM\s+\w+").is_match(s.content)
            || re!(r"(?im)^RUN\s+|^CMD\s+|^COPY\s+|^ADD\s+").is_match(s.content),
        Language::Dockerfile,
    )
}

fn shell(s: &Sample<'_>) -> Option<Language> {
    let shebang = re!(r"^#!/bin/(bash|sh)").is_match(s.trimmed);
    let keywords = re!(r"\b(echo|export|source|alias)\b").is_match(s.content)
        && !re!(r"\bconst\b|\blet\b|\bvar\b").is_match(s.content);
    if !(shebang || keywords) {
        return None;
    }
    if has_powershell_syntax(s.content) {
        Some(Language::Powershell)
    } else {
        Some(Language::Bash)
    }
}

fn powershell(s: &Sample<'_>) -> Option<Language> {
    when(
        has_powershell_syntax(s.content) || re!(r"(?i)Param\s*\(").is_match(s.content),
        Language::Powershell,
    )
}

/// Python keywords with no declaration keyword from a C-family language.
fn python(s: &Sample<'_>) -> Option<Language> {
    let keywords = re!(r"\b(def|class|import|from|if __name__|print|lambda|yield|async def)\b")
        .is_match(s.content);
    let c_family = has_js_declaration(s.content)
        || re!(r"\b(public|private|protected|static|void|namespace)\b")
            .is_match(s.content);
    when(keywords && !c_family, Language::Python)
}

fn typescript(s: &Sample<'_>) -> Option<Language> {
    if !has_type_syntax(s.content) {
        return None;
    }
    if has_markup_elements(s.content) {
        Some(Language::Tsx)
    } else {
        Some(Language::Typescript)
    }
}

fn jsx(s: &Sample<'_>) -> Option<Language> {
    when(
        has_markup_elements(s.content)
            && re!(r#"\b(import.*from ['"]react|export (default )?function|const \w+ = \(\)?\s*=>)"#)
                .is_match(s.content),
        Language::Jsx,
    )
}

fn javascript(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(function|const|let|var|=>|import|export|require)\b").is_match(s.content)
            || re!(r"console\.(log|error|warn)").is_match(s.content),
        Language::Javascript,
    )
}

fn sql(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|CREATE|DROP|ALTER|FROM|WHERE|JOIN)\b")
            .is_match(s.content),
        Language::Sql,
    )
}

fn html(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"(?i)<html|<!DOCTYPE html|<head|<body").is_match(s.content),
        Language::Html,
    )
}

fn xml(s: &Sample<'_>) -> Option<Language> {
    when(s.trimmed.starts_with("<?xml"), Language::Xml)
}

fn java(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(public|private|protected|class|interface|extends|implements)\b")
            .is_match(s.content)
            && re!(r"\bclass\s+\w+").is_match(s.content),
        Language::Java,
    )
}

fn csharp(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(namespace|using|public|private|class|interface)\b").is_match(s.content)
            && re!(r"using\s+System").is_match(s.content),
        Language::Csharp,
    )
}

fn go(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"^package\s+\w+").is_match(s.trimmed)
            || re!(r"\bfunc\s+\w+\s*\(").is_match(s.content)
            || re!(r"import\s*\([\s\S]*\)").is_match(s.content),
        Language::Go,
    )
}

fn rust(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(fn|let|mut|impl|trait|struct|enum|pub|use)\b").is_match(s.content)
            && re!(r"fn\s+\w+").is_match(s.content),
        Language::Rust,
    )
}

fn ruby(s: &Sample<'_>) -> Option<Language> {
    let keywords =
        re!(r"\b(def|end|class|module|require|puts|attr_accessor)\b").is_match(s.content);
    let shebang = s.trimmed.starts_with("#!") && s.trimmed.contains("ruby");
    when(keywords || shebang, Language::Ruby)
}

fn php(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"^<\?php|<\?=").is_match(s.trimmed) || re!(r"\$\w+\s*=").is_match(s.content),
        Language::Php,
    )
}

fn swift(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(func|var|let|class|struct|enum|import|protocol)\b").is_match(s.content)
            && re!(r"import\s+Foundation|import\s+UIKit").is_match(s.content),
        Language::Swift,
    )
}

fn kotlin(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(fun|val|var|class|object|interface|package)\b").is_match(s.content)
            && re!(r"fun\s+\w+").is_match(s.content),
        Language::Kotlin,
    )
}

fn c(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(int|char|float|double|void|struct|printf|scanf|#include)\b").is_match(s.content)
            && re!(r"#include\s*<[\w.]+>").is_match(s.content),
        Language::C,
    )
}

fn cpp(s: &Sample<'_>) -> Option<Language> {
    when(
        re!(r"\b(class|namespace|template|std::|cout|cin|#include)\b").is_match(s.content)
            || re!(r"#include\s*<iostream>").is_match(s.content),
        Language::Cpp,
    )
}

fn css(s: &Sample<'_>) -> Option<Language> {
    if !(re!(r"[\w-]+\s*\{[\s\S]*\}").is_match(s.content) && re!(r":\s*[^;]+;").is_match(s.content))
    {
        return None;
    }
    if re!(r"\$[\w-]+:|@mixin|@include|@extend").is_match(s.content) {
        Some(Language::Scss)
    } else {
        Some(Language::Css)
    }
}
