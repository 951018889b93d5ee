//! Accumulated output of one process
//!
//! stdout, stderr and system notes are kept as ordered segments so the GUI
//! can colour them and the CLI can stream them incrementally.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Where a piece of output came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    Stdout,
    Stderr,
    /// Notes written by procrun itself (exit status, runtime faults)
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSegment {
    /// Absolute position in the log, survives trimming of older segments
    pub seq: u64,
    pub channel: OutputChannel,
    pub text: String,
}

/// Ordered, optionally size-bounded log of output segments
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    segments: VecDeque<OutputSegment>,
    next_seq: u64,
    bytes: usize,
    limit: Option<usize>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most roughly `limit` bytes, dropping the oldest segments first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn push(&mut self, channel: OutputChannel, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.bytes += text.len();
        self.segments.push_back(OutputSegment {
            seq: self.next_seq,
            channel,
            text,
        });
        self.next_seq += 1;
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        // The newest segment is always kept, even if it alone exceeds the limit
        while self.bytes > limit && self.segments.len() > 1 {
            if let Some(dropped) = self.segments.pop_front() {
                self.bytes -= dropped.text.len();
            }
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &OutputSegment> {
        self.segments.iter()
    }

    /// Segments with `seq >= from`, for incremental readers.
    pub fn since(&self, from: u64) -> impl Iterator<Item = &OutputSegment> {
        self.segments.iter().filter(move |s| s.seq >= from)
    }

    /// Sequence number the next pushed segment will get.
    ///
    /// Changes whenever the log grows, so it doubles as a version counter.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len_bytes(&self) -> usize {
        self.bytes
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.bytes = 0;
    }

    /// Raw text of every segment, in order.
    pub fn to_plain(&self) -> String {
        let mut out = String::with_capacity(self.bytes);
        for segment in &self.segments {
            out.push_str(&segment.text);
        }
        out
    }

    /// HTML rendering: text escaped, newlines as `<br>`, stderr in red and
    /// system notes in italics.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.bytes + self.bytes / 4);
        for segment in &self.segments {
            let escaped = escape_html(&segment.text);
            match segment.channel {
                OutputChannel::Stdout => out.push_str(&escaped),
                OutputChannel::Stderr => {
                    out.push_str("<span style=\"color:red\">");
                    out.push_str(&escaped);
                    out.push_str("</span>");
                }
                OutputChannel::System => {
                    out.push_str("<i>");
                    out.push_str(&escaped);
                    out.push_str("</i>");
                }
            }
        }
        out
    }
}

/// Escape text for HTML display. Line feeds become `<br>`, carriage returns are dropped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b> & \"c\"\r\n"), "a&lt;b&gt; &amp; &quot;c&quot;<br>");
    }

    #[test]
    fn test_html_marks_stderr_and_system() {
        let mut log = OutputLog::new();
        log.push(OutputChannel::Stdout, "ok\n");
        log.push(OutputChannel::Stderr, "bad <thing>\n");
        log.push(OutputChannel::System, "exited");

        assert_eq!(
            log.to_html(),
            "ok<br><span style=\"color:red\">bad &lt;thing&gt;<br></span><i>exited</i>"
        );
        assert_eq!(log.to_plain(), "ok\nbad <thing>\nexited");
    }

    #[test]
    fn test_empty_text_is_ignored() {
        let mut log = OutputLog::new();
        log.push(OutputChannel::Stdout, "");
        assert!(log.is_empty());
        assert_eq!(log.next_seq(), 0);
    }

    #[test]
    fn test_limit_drops_oldest_segments() {
        let mut log = OutputLog::with_limit(10);
        log.push(OutputChannel::Stdout, "aaaa\n");
        log.push(OutputChannel::Stdout, "bbbb\n");
        log.push(OutputChannel::Stdout, "cccc\n");

        assert_eq!(log.to_plain(), "bbbb\ncccc\n");
        assert_eq!(log.len_bytes(), 10);
        let seqs: Vec<u64> = log.segments().map(|s| s.seq).collect();
        assert_eq!(seqs, vec![1, 2]);
    }

    #[test]
    fn test_limit_keeps_newest_oversized_segment() {
        let mut log = OutputLog::with_limit(4);
        log.push(OutputChannel::Stdout, "a");
        log.push(OutputChannel::Stdout, "0123456789");
        assert_eq!(log.to_plain(), "0123456789");
    }

    #[test]
    fn test_since_resumes_after_trim() {
        let mut log = OutputLog::with_limit(6);
        log.push(OutputChannel::Stdout, "111");
        log.push(OutputChannel::Stdout, "222");
        log.push(OutputChannel::Stdout, "333");

        let texts: Vec<&str> = log.since(0).map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["222", "333"]);
        let texts: Vec<&str> = log.since(2).map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["333"]);
    }
}
