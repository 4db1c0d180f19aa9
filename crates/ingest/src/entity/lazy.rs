use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::lexicon::LexiconModel;
use super::traits::{EntityError, EntitySpan, PersonRecognizer};

/// Where the person model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Bundled,
    File(PathBuf),
}

type ModelState = Option<Result<Arc<LexiconModel>, EntityError>>;

/// Person model loaded on first use and read-only afterwards.
///
/// One instance is created per process and handed to every pipeline as an
/// `Arc<dyn PersonRecognizer>`. A failed load is remembered, so a missing
/// model costs one attempt, not one per document. `teardown` works through
/// a shared reference; calls already running keep their model alive.
#[derive(Debug)]
pub struct LazyRecognizer {
    source: ModelSource,
    model: RwLock<ModelState>,
}

impl LazyRecognizer {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            model: RwLock::new(None),
        }
    }

    pub fn bundled() -> Self {
        Self::new(ModelSource::Bundled)
    }

    /// Model file when given, bundled model otherwise.
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::new(ModelSource::File(p.to_path_buf())),
            None => Self::bundled(),
        }
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// The loaded model, loading it on the first call.
    pub fn model(&self) -> Result<Arc<LexiconModel>, EntityError> {
        if let Some(state) = self.read().as_ref() {
            return state.clone();
        }

        let mut slot = self.write();
        // Another worker may have loaded it while we waited for the lock.
        if let Some(state) = slot.as_ref() {
            return state.clone();
        }
        let state = self.load().map(Arc::new);
        *slot = Some(state.clone());
        state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.read(), Some(Ok(_)))
    }

    fn read(&self) -> RwLockReadGuard<'_, ModelState> {
        self.model.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ModelState> {
        self.model.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<LexiconModel, EntityError> {
        let result = match &self.source {
            ModelSource::Bundled => LexiconModel::bundled(),
            ModelSource::File(path) => LexiconModel::load(path),
        };
        match &result {
            Ok(model) => tracing::info!(
                model = model.name(),
                version = model.version(),
                source = ?self.source,
                "person model loaded"
            ),
            Err(e) => tracing::warn!(source = ?self.source, error = %e, "person model failed to load"),
        }
        result
    }
}

impl PersonRecognizer for LazyRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        self.model()?.recognize(text)
    }

    fn name(&self) -> &str {
        "lexicon"
    }

    fn init(&self) -> Result<(), EntityError> {
        self.model().map(|_| ())
    }

    /// Drop the loaded model or cached failure. The next use loads again.
    fn teardown(&self) {
        if self.write().take().is_some() {
            tracing::debug!(source = ?self.source, "person model released");
        }
    }
}
