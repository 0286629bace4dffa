//! Code fence tracking for line-based markdown scanning.
//!
//! The gateway scanner walks a page line by line and must ignore fence
//! markers that appear inside an already-open fenced block. CommonMark
//! fences use three or more backticks or tildes; the closing fence uses
//! the same character and is at least as long as the opening one.

/// Tracks open-fence state across a line-by-line scan.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Fence character and opening length while inside a block.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the scanner is currently inside a fenced block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line, updating fence state.
    pub(crate) fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();
        match self.open {
            Some((ch, len)) => {
                if is_closing_fence(trimmed, ch, len) {
                    self.open = None;
                }
            }
            None => self.open = fence_open(trimmed),
        }
    }
}

/// Detect a fence-opening line, returning its character and length.
pub(crate) fn fence_open(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

/// Whether a line closes a fence opened with `len` repetitions of `ch`.
///
/// The closing fence must be at least as long as the opening one and may
/// carry only trailing whitespace.
pub(crate) fn is_closing_fence(trimmed: &str, ch: char, len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == ch).count();
    count >= len && trimmed[count..].chars().all(char::is_whitespace)
}
