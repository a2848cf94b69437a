use std::cmp::Ordering;

/// A single line from a coupon file, compared byte-wise as a whole.
///
/// Coupon files hold one opaque candidate code per line with no further
/// structure, so the sort key is just the line itself, compared as plain
/// ascending bytes.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Line {
    text: String,
}

impl Line {
    pub(crate) fn new(text: String) -> Line {
        Line { text }
    }

    pub(crate) fn text(self) -> String {
        self.text
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialOrd<Self> for Line {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Line {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}
