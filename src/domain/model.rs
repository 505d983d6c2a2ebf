/// Outcome of trimming a mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimReport {
    pub total: usize,
    pub kept: usize,
    pub removed: usize,
}

impl TrimReport {
    pub fn untouched(total: usize) -> Self {
        Self {
            total,
            kept: total,
            removed: 0,
        }
    }

    pub fn is_untouched(&self) -> bool {
        self.removed == 0
    }
}

/// One entry of a Netscape bookmarks file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub url: String,
    pub title: String,
}

/// How a wrapped command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapOutcome {
    pub exit_code: i32,
    /// The reader of our stdout went away and the child was terminated.
    pub downstream_closed: bool,
}
