//! Page loop state definitions
//!
//! The orchestrator walks listing pages as a small state machine:
//!
//! ```text
//! Running(p) --fetch--> HasLinks { p, slugs } --details done--> Running(p + 1)
//!            \--------> EndOfPages   (empty page, later-page failure, max pages)
//!             \-------> FatalError   (start page unreachable)
//! ```

use std::fmt;

/// Represents the current state of the page loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    // ===== Active States =====
    /// About to fetch listing page `page`
    Running(u32),

    /// Listing page `page` yielded company slugs still to be fetched
    HasLinks { page: u32, slugs: Vec<String> },

    // ===== Terminal States =====
    /// No further listing pages will be fetched; the run succeeded
    EndOfPages,

    /// The start page was unreachable; the run aborts without output
    FatalError,
}

impl LoopState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::EndOfPages | Self::FatalError)
    }

    /// Returns true if the loop ended on the success path
    pub fn is_success(&self) -> bool {
        matches!(self, Self::EndOfPages)
    }

    /// The listing page this state refers to, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Running(page) | Self::HasLinks { page, .. } => Some(*page),
            Self::EndOfPages | Self::FatalError => None,
        }
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Valid transitions:
    /// - Running(p) -> HasLinks { p, .. } | EndOfPages | FatalError
    /// - HasLinks { p, .. } -> Running(p + 1), or EndOfPages when p is the
    ///   last representable page number
    /// - terminal states never transition
    pub fn can_transition_to(&self, next: &LoopState) -> bool {
        match (self, next) {
            (Self::Running(p), Self::HasLinks { page, .. }) => p == page,
            (Self::Running(_), Self::EndOfPages | Self::FatalError) => true,
            (Self::HasLinks { page, .. }, Self::Running(next_page)) => {
                page.checked_add(1) == Some(*next_page)
            }
            (Self::HasLinks { page, .. }, Self::EndOfPages) => page.checked_add(1).is_none(),
            _ => false,
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running(page) => write!(f, "running(page {})", page),
            Self::HasLinks { page, slugs } => {
                write!(f, "has-links(page {}, {} slugs)", page, slugs.len())
            }
            Self::EndOfPages => write!(f, "end-of-pages"),
            Self::FatalError => write!(f, "fatal-error"),
        }
    }
}
