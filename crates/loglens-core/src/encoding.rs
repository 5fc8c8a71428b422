//! Byte-to-text encoding resolution
//!
//! Resolution order, first success wins:
//! 1. Operator-supplied label, used unconditionally
//! 2. Statistical detector over a leading sample, accepted above [`DETECTOR_THRESHOLD`]
//! 3. Trial decode of the same sample with [`TRIAL_LABELS`], in order
//! 4. Lossy UTF-8
//!
//! Resolution never fails. Only an unknown explicit label is rejected, and
//! that happens up front in [`lookup_label`].

use crate::error::{DiagnoseError, DiagnoseResult};
use encoding_rs::{DecoderResult, Encoding, GB18030, GBK, UTF_8};
use std::fmt::{self, Display, Formatter};

/// Number of leading bytes inspected by detection and trial decoding
pub const SAMPLE_LEN: usize = 10_000;

/// Minimum detector confidence for its verdict to be accepted
pub const DETECTOR_THRESHOLD: f32 = 0.70;

/// Encodings tried in order when the detector is not confident
pub const TRIAL_LABELS: [&str; 5] = ["utf-8", "gbk", "gb2312", "gb18030", "utf-16"];

/// How the encoding was chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    /// Operator override
    Explicit,
    /// Statistical detector verdict with its score (0.0 - 1.0)
    Detected(f32),
    /// First entry of the trial list that decoded cleanly
    Trial,
    /// Nothing else worked; lossy UTF-8
    Fallback,
}

impl Display for Confidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("explicit"),
            Self::Detected(score) => write!(f, "detected, {:.0}%", score * 100.0),
            Self::Trial => f.write_str("trial decode"),
            Self::Fallback => f.write_str("lossy fallback"),
        }
    }
}

/// Encoding chosen for a log, with the reason it was chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedEncoding {
    encoding: &'static Encoding,
    confidence: Confidence,
}

impl ResolvedEncoding {
    /// Create resolved encoding
    #[inline]
    #[must_use]
    pub fn new(encoding: &'static Encoding, confidence: Confidence) -> Self {
        Self {
            encoding,
            confidence,
        }
    }

    /// Underlying codec
    #[inline]
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Canonical encoding name (e.g. `UTF-8`, `GBK`)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Resolution step that produced this encoding
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Decode bytes, returning the text and the number of replacement
    /// characters substituted for undecodable input
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> (String, usize) {
        let (text, had_errors) = self.encoding.decode_with_bom_removal(bytes);
        let replacements = if had_errors {
            text.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count()
        } else {
            0
        };
        (text.into_owned(), replacements)
    }
}

impl Display for ResolvedEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.confidence)
    }
}

/// Look up an operator-supplied encoding label (`utf-8`, `gbk`, `cp936`, ...)
pub fn lookup_label(label: &str) -> DiagnoseResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| DiagnoseError::UnknownEncoding(label.to_string()))
}

/// Detector verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Guessed encoding
    pub encoding: &'static Encoding,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
}

/// Statistical charset detection over a byte sample
///
/// `complete` is true when the sample is the whole input, so a multibyte
/// sequence cut at the end of the sample is not held against any candidate.
pub trait CharsetDetector {
    /// Guess the encoding of the sample, if any guess is possible
    fn detect(&self, sample: &[u8], complete: bool) -> Option<Detection>;
}

/// [`CharsetDetector`] backed by chardetng
///
/// chardetng reports a binary assessment rather than a score, so a confident
/// verdict maps to [`Self::CONFIDENT`] and an unconfident one to
/// [`Self::UNCERTAIN`]. A byte-order mark or a pure ASCII sample is certain.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalDetector;

impl StatisticalDetector {
    /// Score reported for a confident chardetng verdict
    pub const CONFIDENT: f32 = 0.95;
    /// Score reported for an unconfident chardetng verdict
    pub const UNCERTAIN: f32 = 0.5;

    /// Create detector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CharsetDetector for StatisticalDetector {
    fn detect(&self, sample: &[u8], complete: bool) -> Option<Detection> {
        if sample.is_empty() {
            return None;
        }

        if let Some((encoding, _bom_len)) = Encoding::for_bom(sample) {
            return Some(Detection {
                encoding,
                confidence: 1.0,
            });
        }

        if sample.is_ascii() {
            return Some(Detection {
                encoding: UTF_8,
                confidence: 1.0,
            });
        }

        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(sample, complete);
        let (encoding, confident) = detector.guess_assess(None, true);
        Some(Detection {
            encoding,
            confidence: if confident {
                Self::CONFIDENT
            } else {
                Self::UNCERTAIN
            },
        })
    }
}

/// Resolves the encoding of a raw log
#[derive(Debug, Clone, Default)]
pub struct EncodingResolver<D = StatisticalDetector> {
    detector: D,
}

impl EncodingResolver {
    /// Create resolver with the default statistical detector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: CharsetDetector> EncodingResolver<D> {
    /// Create resolver with a custom detector
    #[inline]
    #[must_use]
    pub fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    /// Resolve the encoding for `bytes`
    ///
    /// An explicit encoding short-circuits everything else, even if it
    /// later decodes with replacement characters.
    #[must_use]
    pub fn resolve(&self, bytes: &[u8], explicit: Option<&'static Encoding>) -> ResolvedEncoding {
        if let Some(encoding) = explicit {
            tracing::debug!(encoding = encoding.name(), "using explicit encoding");
            return ResolvedEncoding::new(encoding, Confidence::Explicit);
        }

        let complete = bytes.len() <= SAMPLE_LEN;
        let sample = &bytes[..bytes.len().min(SAMPLE_LEN)];

        if let Some(detection) = self.detector.detect(sample, complete) {
            if detection.confidence > DETECTOR_THRESHOLD {
                let encoding = collapse_gb_family(detection.encoding);
                tracing::debug!(
                    encoding = encoding.name(),
                    confidence = f64::from(detection.confidence),
                    "detector verdict accepted"
                );
                return ResolvedEncoding::new(encoding, Confidence::Detected(detection.confidence));
            }
            tracing::debug!(
                encoding = detection.encoding.name(),
                confidence = f64::from(detection.confidence),
                "detector verdict below threshold"
            );
        }

        for label in TRIAL_LABELS {
            let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
                continue;
            };
            if decodes_cleanly(encoding, sample, complete) {
                tracing::debug!(encoding = encoding.name(), "trial decode succeeded");
                return ResolvedEncoding::new(encoding, Confidence::Trial);
            }
        }

        tracing::warn!("no encoding decoded the sample cleanly, falling back to lossy UTF-8");
        ResolvedEncoding::new(UTF_8, Confidence::Fallback)
    }
}

/// GB2312 and GB18030 verdicts are read as GBK
fn collapse_gb_family(encoding: &'static Encoding) -> &'static Encoding {
    if encoding == GB18030 {
        GBK
    } else {
        encoding
    }
}

fn decodes_cleanly(encoding: &'static Encoding, sample: &[u8], complete: bool) -> bool {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let Some(capacity) = decoder.max_utf8_buffer_length_without_replacement(sample.len()) else {
        return false;
    };
    let mut out = String::with_capacity(capacity);
    let (result, _read) = decoder.decode_to_string_without_replacement(sample, &mut out, complete);
    matches!(result, DecoderResult::InputEmpty)
}
