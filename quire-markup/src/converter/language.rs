//! Language detection for fenced code blocks without an info string.
//!
//! Detection only ever adds a `language-*` class hint for the client-side
//! highlighter. When nothing matches, the block is left alone.

use std::sync::LazyLock;

use comrak::nodes::{AstNode, NodeValue};
use regex::Regex;

use crate::utils::regex_or_never;

/// Trait for in-place transformations of the comrak AST before it is
/// formatted to HTML.
pub trait AstTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}

/// Fills in the info string of un-annotated fenced code blocks with a guessed
/// language.
pub struct LanguageGuesser;

impl AstTransformer for LanguageGuesser {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for descendant in node.descendants() {
      let mut data = descendant.data.borrow_mut();
      if let NodeValue::CodeBlock(ref mut block) = data.value {
        if !block.fenced || !block.info.trim().is_empty() {
          continue;
        }
        if let Some(language) = guess_language(&block.literal) {
          log::trace!("Guessed language '{language}' for fenced code block");
          block.info = language.to_owned();
        }
      }
    }
  }
}

static SHEBANG_RE: LazyLock<Regex> = LazyLock::new(|| {
  regex_or_never(r"^#!\s*\S*/(?:env\s+)?([A-Za-z]+)[0-9.]*")
});

/// Ordered signatures, the first match wins. Markup and data formats come
/// first because their openings are unambiguous.
static SIGNATURES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
  [
    ("html", r"(?i)^\s*<(?:!doctype|html|head|body|div|span|p|ul|ol|a|section|table)[\s>]"),
    ("json", r#"^\s*[\[{]\s*"[^"\n]*"\s*:"#),
    ("sql", r"(?i)^\s*(?:select\s.+\sfrom|insert\s+into|update\s+\w+\s+set|delete\s+from|create\s+(?:table|index|view))\b"),
    ("rust", r"(?m)^\s*(?:pub\s+)?(?:fn\s+\w+\s*[<(]|impl\b|use\s+\w+::|let\s+mut\s)|\bprintln!\("),
    ("python", r"(?m)^\s*(?:def\s+\w+\s*\(.*\)\s*(?:->.*)?:|class\s+\w+.*:\s*$|from\s+[\w.]+\s+import\s)"),
    ("javascript", r"(?m)^\s*(?:const|let|var)\s+\w+\s*=|\bfunction\s*\w*\s*\(|\bconsole\.log\(|=>\s*\{"),
    ("css", r"(?s)^\s*[.#@]?[\w-][^{;]*\{\s*[\w-]+\s*:\s*[^;{}]+;"),
    ("bash", r"(?m)^\s*(?:\$\s+\S|(?:sudo|apt(?:-get)?|pip|npm|cargo|git|cd|ls|echo|export)\s)"),
  ]
  .into_iter()
  .map(|(language, pattern)| (language, regex_or_never(pattern)))
  .collect()
});

/// Guess the language of a code snippet.
///
/// Returns `None` when no signature matches.
#[must_use]
pub fn guess_language(code: &str) -> Option<&'static str> {
  if let Some(caps) = SHEBANG_RE.captures(code) {
    let interpreter = match &caps[1] {
      "sh" | "bash" | "zsh" | "dash" => Some("bash"),
      "python" => Some("python"),
      "node" | "deno" => Some("javascript"),
      "ruby" => Some("ruby"),
      "perl" => Some("perl"),
      _ => None,
    };
    if interpreter.is_some() {
      return interpreter;
    }
  }

  SIGNATURES
    .iter()
    .find(|(_, re)| re.is_match(code))
    .map(|(language, _)| *language)
}
