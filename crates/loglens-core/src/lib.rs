//! loglens core - build/test log diagnostics
//!
//! Turns a raw, possibly huge, possibly mis-encoded compiler or test-runner
//! log into a bounded, deterministic report:
//! - Resolves the byte encoding (explicit, detected, trial decode, lossy)
//! - Indexes lines once and captures bounded context around failure markers
//! - Classifies each failure and extracts structured fields
//! - Attaches root-cause advice and renders a detailed or condensed report
//!
//! Keyword search and a last-lines excerpt share the same decoding front end.
//!
//! # Example
//!
//! ```rust,no_run
//! use loglens_core::{Analyzer, AnalyzerConfig, RenderOptions, ReportShape};
//!
//! # fn example() -> Result<(), loglens_core::DiagnoseError> {
//! let analyzer = Analyzer::new(AnalyzerConfig::new().with_max_errors(3))?;
//! let report = analyzer.analyze_path("target/build.log", ReportShape::BugReport)?;
//! println!("{}", report.render(ReportShape::BugReport, &RenderOptions::new()));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod advisor;
pub mod classify;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod lines;
pub mod report;
pub mod scanner;
pub mod search;
pub mod source;
pub mod tail;

pub use advisor::{Advice, RootCauseAdvisor};
pub use classify::{Category, ClassifiedError, ErrorClassifier, ExtractedFields, Field};
pub use config::AnalyzerConfig;
pub use encoding::{CharsetDetector, Confidence, EncodingResolver, ResolvedEncoding};
pub use engine::Analyzer;
pub use error::{DiagnoseError, DiagnoseResult};
pub use lines::{Line, LineIndex};
pub use report::{Destination, RenderOptions, Report, ReportShape, SourceSummary};
pub use scanner::{ErrorMatch, ErrorScanner, PatternKind, ScanOutcome, ScanParams};
pub use search::{InteractiveSearcher, Query, SearchHit, SearchParams, SearchResult};
pub use source::LogSource;
pub use tail::{TailExcerpt, TailReader};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the analyzer
    pub use crate::{
        Analyzer, AnalyzerConfig, Category, DiagnoseError, DiagnoseResult, Destination, Query,
        RenderOptions, Report, ReportShape,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
