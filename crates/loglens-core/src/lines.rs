//! Addressable line view over decoded log text
//!
//! `\r\n` and lone `\r` are normalised to `\n` before splitting, so a log
//! produced by a progress-bar-happy build tool still has one line per break.
//! A log with `n` breaks has `n + 1` lines; a trailing break yields a final
//! empty line.

/// One log line with its 1-based number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    /// Line text without the break
    pub text: String,
}

impl Line {
    /// Create line
    #[inline]
    #[must_use]
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Ordered, 1-based index of decoded lines
///
/// Holds the text in a single buffer; each line is a byte span into it.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: String,
    spans: Vec<(usize, usize)>,
}

impl LineIndex {
    /// Build index from decoded text
    #[must_use]
    pub fn new(text: &str) -> Self {
        let text = if text.contains('\r') {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.to_owned()
        };

        let mut spans = Vec::new();
        let mut start = 0;
        for (pos, _) in text.match_indices('\n') {
            spans.push((start, pos));
            start = pos + 1;
        }
        spans.push((start, text.len()));

        Self { text, spans }
    }

    /// Number of lines (always at least one)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True when the log had no content at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Line text by 1-based number
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&str> {
        let (start, end) = *self.spans.get(number.checked_sub(1)?)?;
        Some(&self.text[start..end])
    }

    /// Iterate `(number, text)` from the top of the log
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| (i + 1, &self.text[start..end]))
    }

    /// Copy lines `first..=last`, clipped to the log
    #[must_use]
    pub fn range(&self, first: usize, last: usize) -> Vec<Line> {
        let first = first.max(1);
        let last = last.min(self.len());
        (first..=last)
            .filter_map(|n| self.get(n).map(|text| Line::new(n, text)))
            .collect()
    }

    /// Up to `count` lines immediately before `number`
    #[must_use]
    pub fn before(&self, number: usize, count: usize) -> Vec<Line> {
        if count == 0 || number <= 1 {
            return Vec::new();
        }
        self.range(number.saturating_sub(count), number - 1)
    }

    /// Up to `count` lines immediately after `number`
    #[must_use]
    pub fn after(&self, number: usize, count: usize) -> Vec<Line> {
        if count == 0 {
            return Vec::new();
        }
        self.range(number + 1, number.saturating_add(count))
    }

    /// The last `count` lines
    #[must_use]
    pub fn last(&self, count: usize) -> Vec<Line> {
        if count == 0 {
            return Vec::new();
        }
        self.range(self.len().saturating_sub(count) + 1, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_is_breaks_plus_one() {
        assert_eq!(LineIndex::new("").len(), 1);
        assert_eq!(LineIndex::new("a").len(), 1);
        assert_eq!(LineIndex::new("a\nb").len(), 2);
        assert_eq!(LineIndex::new("a\nb\n").len(), 3);
    }

    #[test]
    fn mixed_breaks_normalised() {
        let index = LineIndex::new("one\r\ntwo\rthree\nfour");
        let lines: Vec<_> = index.iter().map(|(_, t)| t).collect();
        assert_eq!(lines, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn get_is_one_based() {
        let index = LineIndex::new("first\nsecond");
        assert_eq!(index.get(0), None);
        assert_eq!(index.get(1), Some("first"));
        assert_eq!(index.get(2), Some("second"));
        assert_eq!(index.get(3), None);
    }

    #[test]
    fn windows_clip_at_boundaries() {
        let index = LineIndex::new("1\n2\n3\n4\n5");
        let before: Vec<_> = index.before(2, 10).into_iter().map(|l| l.number).collect();
        assert_eq!(before, vec![1]);
        let after: Vec<_> = index.after(4, 10).into_iter().map(|l| l.number).collect();
        assert_eq!(after, vec![5]);
        assert!(index.before(1, 3).is_empty());
        assert!(index.after(5, 3).is_empty());
    }

    #[test]
    fn last_lines() {
        let index = LineIndex::new("a\nb\nc");
        let tail: Vec<_> = index.last(2).into_iter().map(|l| l.text).collect();
        assert_eq!(tail, vec!["b", "c"]);
        assert_eq!(index.last(10).len(), 3);
        assert!(index.last(0).is_empty());
    }
}
