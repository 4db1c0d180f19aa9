//! Person-name extraction over full document text.

pub mod lazy;
pub mod lexicon;
pub mod traits;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use lazy::{LazyRecognizer, ModelSource};
pub use lexicon::LexiconModel;
pub use traits::{EntityError, EntityLabel, EntitySpan, PersonRecognizer};

/// People found in one document, plus a warning when recognition degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleOutcome {
    pub people: BTreeSet<String>,
    pub warning: Option<String>,
}

/// Runs an injected recognizer and keeps only person names, lower-cased and
/// de-duplicated. Recognition failures never propagate: the outcome is an
/// empty set with a warning.
#[derive(Clone)]
pub struct PersonExtractor {
    recognizer: Arc<dyn PersonRecognizer>,
}

impl PersonExtractor {
    pub fn new(recognizer: Arc<dyn PersonRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Extractor over the bundled model, loaded lazily.
    pub fn bundled() -> Self {
        Self::new(Arc::new(LazyRecognizer::bundled()))
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Load the model before the first document so load cost and load
    /// failures surface once, up front.
    pub fn warm_up(&self) -> Result<(), EntityError> {
        let started = std::time::Instant::now();
        self.recognizer.init()?;
        tracing::debug!(
            recognizer = self.recognizer.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "person model ready"
        );
        Ok(())
    }

    /// Release the model. Every clone of this extractor shares it.
    pub fn teardown(&self) {
        self.recognizer.teardown();
    }

    pub fn extract(&self, text: &str) -> PeopleOutcome {
        if text.trim().is_empty() {
            return PeopleOutcome::default();
        }

        match self.recognizer.recognize(text) {
            Ok(spans) => PeopleOutcome {
                people: spans
                    .into_iter()
                    .filter(|s| s.label == EntityLabel::Person)
                    .map(|s| normalize_name(&s.text))
                    .filter(|name| !name.is_empty())
                    .collect(),
                warning: None,
            },
            Err(e) => {
                tracing::warn!(
                    recognizer = self.recognizer.name(),
                    error = %e,
                    "person recognition failed, continuing without names"
                );
                PeopleOutcome {
                    people: BTreeSet::new(),
                    warning: Some(e.to_string()),
                }
            }
        }
    }
}

impl std::fmt::Debug for PersonExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonExtractor")
            .field("recognizer", &self.recognizer.name())
            .finish()
    }
}

/// Lookup key for a name: single-spaced and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
