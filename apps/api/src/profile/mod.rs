//! Professional-profile core: the validated Bio record, the heuristic
//! extractor over document lines, and model-backed extraction with
//! reconciliation against the source text.

pub mod detectors;
pub mod extract;
pub mod handlers;
pub mod heuristic;
pub mod model;
pub mod normalize;
pub mod prompts;
pub mod reconcile;
pub mod segmenter;
