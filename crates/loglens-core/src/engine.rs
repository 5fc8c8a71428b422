//! Pipeline orchestration
//!
//! Main path: resolve encoding, index lines, scan, classify, advise, build
//! the [`Report`]. Search and tail share the first two stages.

use crate::classify::ErrorClassifier;
use crate::config::AnalyzerConfig;
use crate::encoding::{lookup_label, EncodingResolver};
use crate::error::DiagnoseResult;
use crate::lines::LineIndex;
use crate::report::{Report, ReportShape, SourceSummary};
use crate::scanner::ErrorScanner;
use crate::search::{InteractiveSearcher, Query, SearchResult};
use crate::source::LogSource;
use crate::tail::{TailExcerpt, TailReader};
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};

/// Runs the analysis pipeline with one validated configuration
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    explicit: Option<&'static Encoding>,
    resolver: EncodingResolver,
    classifier: ErrorClassifier,
}

impl Analyzer {
    /// Validate `config` and build an analyzer
    ///
    /// Fails on an out-of-range parameter or an unknown encoding label.
    pub fn new(config: AnalyzerConfig) -> DiagnoseResult<Self> {
        config.validate()?;
        let explicit = config.encoding.as_deref().map(lookup_label).transpose()?;
        Ok(Self {
            config,
            explicit,
            resolver: EncodingResolver::new(),
            classifier: ErrorClassifier::default(),
        })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Read and decode a log file
    pub fn load(&self, path: impl AsRef<Path>) -> DiagnoseResult<(LogSource, LineIndex)> {
        LogSource::open(path, self.explicit, &self.resolver)
    }

    /// Decode in-memory log bytes
    #[must_use]
    pub fn load_bytes(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) -> (LogSource, LineIndex) {
        LogSource::from_bytes(path, bytes, self.explicit, &self.resolver)
    }

    /// Analyse a log file
    pub fn analyze_path(
        &self,
        path: impl AsRef<Path>,
        shape: ReportShape,
    ) -> DiagnoseResult<Report> {
        let (source, index) = self.load(path)?;
        Ok(self.analyze(&source, &index, shape))
    }

    /// Analyse an already decoded log
    ///
    /// Zero matches is a result, not an error; the report then carries the
    /// tail excerpt when one was requested.
    #[must_use]
    pub fn analyze(&self, source: &LogSource, index: &LineIndex, shape: ReportShape) -> Report {
        let params = self.config.scan_params(shape);
        let outcome = ErrorScanner::new(params).scan(index);
        let total_matches = outcome.total_matches;
        let errors = self.classifier.classify_all(outcome.matches);

        let tail = (errors.is_empty() && self.config.tail_lines > 0)
            .then(|| TailReader::new(self.config.tail_lines).read(index));

        tracing::info!(
            path = %source.path().display(),
            encoding = source.encoding().name(),
            lines = index.len(),
            shown = errors.len(),
            total = total_matches,
            "analysis complete"
        );

        Report {
            summary: SourceSummary {
                path: source.path().display().to_string(),
                encoding: source.encoding(),
                decode_errors: source.decode_errors(),
                total_lines: index.len(),
                total_matches,
            },
            errors,
            tail,
        }
    }

    /// Search a log file
    pub fn search_path(
        &self,
        path: impl AsRef<Path>,
        query: &Query,
    ) -> DiagnoseResult<SearchResult> {
        let params = self.config.search_params();
        params.validate()?;
        let (_, index) = self.load(path)?;
        Ok(InteractiveSearcher::new(params).search(&index, query))
    }

    /// Last `count` lines of a log file
    pub fn tail_path(&self, path: impl AsRef<Path>, count: usize) -> DiagnoseResult<TailExcerpt> {
        let (_, index) = self.load(path)?;
        Ok(TailReader::new(count).read(&index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::error::DiagnoseError;

    #[test]
    fn unknown_label_rejected_up_front() {
        let err = Analyzer::new(AnalyzerConfig::default().with_encoding("klingon-8")).unwrap_err();
        assert!(matches!(err, DiagnoseError::UnknownEncoding(_)));
    }

    #[test]
    fn zero_cap_rejected_up_front() {
        assert!(Analyzer::new(AnalyzerConfig::default().with_max_errors(0)).is_err());
    }

    #[test]
    fn tail_only_when_nothing_matched() {
        let analyzer = Analyzer::new(AnalyzerConfig::default().with_tail_lines(2)).unwrap();

        let (source, index) = analyzer.load_bytes("ok.log", b"a\nb\nc".to_vec());
        let report = analyzer.analyze(&source, &index, ReportShape::Detailed);
        assert!(report.is_clean());
        assert_eq!(report.tail.map(|t| t.lines.len()), Some(2));

        let (source, index) = analyzer.load_bytes("bad.log", b"a\n[ERROR] b\nc".to_vec());
        let report = analyzer.analyze(&source, &index, ReportShape::Detailed);
        assert!(report.tail.is_none());
        assert_eq!(report.errors[0].category(), Category::Unknown);
    }

    #[test]
    fn tail_disabled_by_zero() {
        let analyzer = Analyzer::new(AnalyzerConfig::default().with_tail_lines(0)).unwrap();
        let (source, index) = analyzer.load_bytes("ok.log", b"a".to_vec());
        assert!(analyzer.analyze(&source, &index, ReportShape::BugReport).tail.is_none());
    }

    #[test]
    fn shape_controls_leading_context() {
        let analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
        let (source, index) =
            analyzer.load_bytes("x.log", b"one\ntwo\nthree\n[ERROR] four".to_vec());
        let detailed = analyzer.analyze(&source, &index, ReportShape::Detailed);
        assert!(detailed.errors[0].error().context_before().is_empty());
        let bug = analyzer.analyze(&source, &index, ReportShape::BugReport);
        assert_eq!(bug.errors[0].error().context_before().len(), 2);
    }
}
