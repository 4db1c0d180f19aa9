/// Integration tests for the ingestion pipeline covering single-document
/// processing, failure classification, batch runs, and result persistence.

mod batch;
mod helpers;
mod persist;
mod process;
