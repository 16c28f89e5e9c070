//! Trigger-phrase lexicon for the intent classifier.
//!
//! JSON (or TOML) shape, keyed by intent:
//! {
//!   "bug_report": ["crash*", "not working", ...],
//!   "question":   ["?", "how do", ...]
//! }
//!
//! Phrase syntax:
//! - matched case-insensitively against whitespace-collapsed text
//! - a phrase only matches at word boundaries on its word-character ends
//! - a trailing `*` accepts any word suffix (`crash*` hits "crashes", "crashed")
//! - phrases without word characters (`?`) match literally, every occurrence

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::intent::Intent;

/// Built-in lexicon shipped with the crate.
pub const BUILTIN_LEXICON: &str = include_str!("../../intent_lexicon.json");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    pub phrases: BTreeMap<Intent, Vec<String>>,
}

impl Lexicon {
    pub fn builtin() -> Result<Self> {
        parse_lexicon(BUILTIN_LEXICON, "json")
    }

    /// Load a replacement lexicon. Format is picked by extension (`.toml` or JSON).
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading intent lexicon from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_lexicon(&content, &ext).with_context(|| format!("parsing {}", path.display()))
    }

    /// Compile every label's phrases, in priority order.
    pub fn compile(&self) -> Result<Vec<(Intent, Vec<Regex>)>> {
        if self.phrases.contains_key(&Intent::Unclassified) {
            bail!("`unclassified` is the fallback label and cannot own trigger phrases");
        }
        Intent::PRIORITY
            .iter()
            .map(|&intent| {
                let patterns = self
                    .phrases
                    .get(&intent)
                    .map(Vec::as_slice)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|p| compile_phrase(p).transpose())
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("compiling {intent} phrases"))?;
                Ok((intent, patterns))
            })
            .collect()
    }
}

fn parse_lexicon(s: &str, hint_ext: &str) -> Result<Lexicon> {
    let raw: BTreeMap<String, Vec<String>> = if hint_ext == "toml" {
        toml::from_str(s).map_err(|e| anyhow!("invalid toml lexicon: {e}"))?
    } else {
        serde_json::from_str(s).map_err(|e| anyhow!("invalid json lexicon: {e}"))?
    };

    let mut phrases = BTreeMap::new();
    for (key, list) in raw {
        let intent: Intent = serde_json::from_value(serde_json::Value::String(key.clone()))
            .map_err(|_| anyhow!("unknown intent label {key:?} in lexicon"))?;
        phrases.entry(intent).or_insert_with(Vec::new).extend(list);
    }
    Ok(Lexicon { phrases })
}

/// Compile one phrase; blank phrases yield `None`.
pub fn compile_phrase(phrase: &str) -> Result<Option<Regex>> {
    let norm = normalize_for_match(phrase);
    let (body, open_suffix) = match norm.strip_suffix('*') {
        Some(stem) => (stem.trim_end(), true),
        None => (norm.as_str(), false),
    };
    if body.is_empty() {
        return Ok(None);
    }

    let starts_word = body.chars().next().is_some_and(is_word_char);
    let ends_word = body.chars().last().is_some_and(is_word_char);

    let mut pat = String::with_capacity(body.len() + 8);
    if starts_word {
        pat.push_str(r"\b");
    }
    pat.push_str(&regex::escape(body));
    if open_suffix {
        pat.push_str(r"\w*");
    } else if ends_word {
        pat.push_str(r"\b");
    }

    Regex::new(&pat)
        .map(Some)
        .with_context(|| format!("invalid trigger phrase {phrase:?}"))
}

/// Lowercase, fold typographic apostrophes, collapse whitespace, trim.
pub fn normalize_for_match(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
            continue;
        }
        last_space = false;
        match ch {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            _ => out.extend(ch.to_lowercase()),
        }
    }
    out.trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
