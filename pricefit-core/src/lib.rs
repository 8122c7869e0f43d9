pub mod error;
pub mod evaluator;
pub mod extract;
pub mod item;
pub mod predictor;
pub mod report;
pub mod tier;

// Re-export key types for convenience
pub use error::{Error, Result};
pub use evaluator::{
    DEFAULT_SAMPLE_SIZE, DiagnosticSink, EvalState, Evaluator, NullSink, PlainSink,
    PredictionRecord,
};
pub use extract::{PRICE_MARKER, extract_price, extract_price_loose, format_usd, weighted_price};
pub use item::{TestItem, load_items};
pub use predictor::{
    AnthropicPredictor, ConstantPredictor, Decode, NamedPredictor, OllamaPredictor,
    OpenAiPredictor, Predictor,
};
pub use report::{EvaluationReport, ScatterPoint, TierCounts};
pub use tier::Tier;
