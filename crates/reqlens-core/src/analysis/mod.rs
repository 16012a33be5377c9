//! Structured document analysis
//!
//! Raw document text goes in, a schema-validated [`AnalysisResult`] comes out.
//! The model's output is the only untrusted part, so everything it returns is
//! validated all-or-nothing before a result is handed back.

mod extract;
mod pipeline;
mod prompt;
mod schema;

pub use extract::extract_json_object;
pub use pipeline::{DocumentAnalysis, DocumentAnalysisPipeline};
pub use prompt::{
    build_analysis_prompt, prepare_document, truncation_marker, PreparedDocument,
    ANALYSIS_SYSTEM_PROMPT,
};
pub use schema::{
    AnalysisResult, FunctionalRequirement, Level, NonFunctionalRequirement, ProjectOverview,
    RiskFactor,
};

/// Default character ceiling before a document is truncated
pub const DEFAULT_MAX_INPUT_CHARS: usize = 80_000;
