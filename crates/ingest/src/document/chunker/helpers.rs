//! Boundary search utilities used by the splitter. Everything here works on
//! a `char` slice so offsets are character positions, never byte positions.

/// Cut points in descending priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    /// `\n\n` between pages.
    PageBreak,
    /// `\n` between paragraphs.
    ParagraphBreak,
    /// `.`, `!` or `?` followed by whitespace; the cut keeps the punctuation.
    SentenceEnd,
    /// Any other whitespace.
    Whitespace,
}

impl Separator {
    pub(crate) const PRIORITY: [Separator; 4] = [
        Separator::PageBreak,
        Separator::ParagraphBreak,
        Separator::SentenceEnd,
        Separator::Whitespace,
    ];

    /// Whether cutting right before `chars[at]` splits on this separator.
    fn cuts_at(self, chars: &[char], at: usize) -> bool {
        let Some(&c) = chars.get(at) else {
            return false;
        };
        match self {
            Separator::PageBreak => c == '\n' && chars.get(at + 1) == Some(&'\n'),
            Separator::ParagraphBreak => c == '\n',
            Separator::SentenceEnd => {
                c.is_whitespace() && at > 0 && matches!(chars[at - 1], '.' | '!' | '?')
            }
            Separator::Whitespace => c.is_whitespace(),
        }
    }
}

/// Pick the right edge for a window that ends at `hard_end` before the end of
/// the text. The edge is the last cut of the highest-priority separator
/// strictly after `lower`; with no such cut the window is cut at `hard_end`.
pub(crate) fn find_cut(chars: &[char], lower: usize, hard_end: usize) -> usize {
    for sep in Separator::PRIORITY {
        if let Some(cut) = ((lower + 1)..=hard_end).rev().find(|&at| sep.cuts_at(chars, at)) {
            return cut;
        }
    }
    hard_end
}

/// True when `at` sits between two non-whitespace characters.
pub(crate) fn is_mid_word(chars: &[char], at: usize) -> bool {
    at > 0
        && at < chars.len()
        && !chars[at - 1].is_whitespace()
        && !chars[at].is_whitespace()
}

/// First non-whitespace position at or after `from`.
pub(crate) fn skip_whitespace(chars: &[char], from: usize) -> usize {
    let mut pos = from;
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

/// Start of the window following one that began at `prev_start` and was cut
/// at `cut`: back off by `overlap`, then move forward to the next word start.
/// Never moves past `cut`, so no character between windows is skipped, and
/// is always strictly greater than `prev_start`.
pub(crate) fn next_start(chars: &[char], prev_start: usize, cut: usize, overlap: usize) -> usize {
    let raw = cut.saturating_sub(overlap).max(prev_start + 1);
    let mut pos = raw;
    while pos < cut && is_mid_word(chars, pos) {
        pos += 1;
    }
    // A hard cut through a long word leaves no word start to snap to.
    if pos == cut && is_mid_word(chars, cut) {
        pos = raw;
    }
    while pos < cut && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

/// Shrink `[start, end)` to exclude surrounding whitespace. `None` when the
/// range holds only whitespace.
pub(crate) fn trim_range(chars: &[char], start: usize, end: usize) -> Option<(usize, usize)> {
    let mut s = start;
    let mut e = end;
    while s < e && chars[s].is_whitespace() {
        s += 1;
    }
    while e > s && chars[e - 1].is_whitespace() {
        e -= 1;
    }
    (s < e).then_some((s, e))
}

/// Whitespace-delimited token count.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
