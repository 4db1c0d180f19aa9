use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("entity recognition failed: {0}")]
    Recognition(String),
}

/// Category assigned to a recognized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    /// A capitalized span the model scored as not a person.
    Other,
}

/// A labelled span of the input text. Offsets are byte offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// Trait for named-entity backends that can label people.
///
/// Implementations are shared read-only across batch workers.
pub trait PersonRecognizer: Send + Sync {
    /// Label every candidate span in `text`, in reading order.
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError>;

    /// Model name for logs and warnings.
    fn name(&self) -> &str;

    /// Load model resources ahead of the first `recognize` call.
    fn init(&self) -> Result<(), EntityError> {
        Ok(())
    }

    /// Release model resources. A later `recognize` loads them again.
    fn teardown(&self) {}
}
