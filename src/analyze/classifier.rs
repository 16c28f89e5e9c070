//! Lexicon-driven intent classifier.
//!
//! Each label's score is the number of trigger-phrase hits in the normalized text.
//! Highest score wins; ties go to the label earlier in [`Intent::PRIORITY`];
//! no hits at all (including empty text) is [`Intent::Unclassified`].

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::intent::Intent;
use super::lexicon::{normalize_for_match, Lexicon};

static BUILTIN: Lazy<IntentClassifier> = Lazy::new(|| {
    let lexicon = Lexicon::builtin().expect("valid built-in intent lexicon");
    IntentClassifier::from_lexicon(&lexicon).expect("compilable built-in intent lexicon")
});

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    /// Compiled phrases per label, in priority order.
    rules: Vec<(Intent, Vec<Regex>)>,
}

impl IntentClassifier {
    /// Classifier over the built-in lexicon (compiled once per process).
    pub fn builtin() -> &'static IntentClassifier {
        &BUILTIN
    }

    pub fn from_lexicon(lexicon: &Lexicon) -> Result<Self> {
        Ok(Self {
            rules: lexicon.compile()?,
        })
    }

    /// Built-in lexicon, or a replacement loaded from `path`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_lexicon(&Lexicon::from_path(p)?),
            None => Ok(Self::builtin().clone()),
        }
    }

    /// Hit count per label, in priority order.
    pub fn scores(&self, text: &str) -> Vec<(Intent, usize)> {
        let norm = normalize_for_match(text);
        self.rules
            .iter()
            .map(|(intent, patterns)| {
                let hits = if norm.is_empty() {
                    0
                } else {
                    patterns.iter().map(|re| re.find_iter(&norm).count()).sum()
                };
                (*intent, hits)
            })
            .collect()
    }

    pub fn classify(&self, text: &str) -> Intent {
        let mut best = Intent::Unclassified;
        let mut best_hits = 0usize;
        // Strictly greater: on a tie the earlier (higher-priority) label stays.
        for (intent, hits) in self.scores(text) {
            if hits > best_hits {
                best = intent;
                best_hits = hits;
            }
        }
        best
    }
}
