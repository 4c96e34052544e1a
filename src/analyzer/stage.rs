use tracing::{debug, warn};

use crate::error::RepoLocError;

/// Lifecycle of one repository analysis.
///
/// `Created → BranchResolved → Fetched → Counted → CleanedUp`, with
/// `Failed` reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Created,
    BranchResolved,
    Fetched,
    Counted,
    CleanedUp,
    Failed,
}

impl AnalysisStage {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CleanedUp | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::BranchResolved)
                | (Self::BranchResolved, Self::Fetched)
                | (Self::Fetched, Self::Counted)
                | (Self::Counted, Self::CleanedUp)
        ) || (!self.is_terminal() && matches!(next, Self::Failed))
    }
}

/// Records and logs the stage of one analysis run.
pub(super) struct StageTracker {
    label: String,
    stage: AnalysisStage,
}

impl StageTracker {
    pub(super) fn new(owner: &str, repo: &str) -> Self {
        let label = format!("{owner}/{repo}");
        debug!(repo = %label, stage = ?AnalysisStage::Created, "analysis stage");
        Self {
            label,
            stage: AnalysisStage::Created,
        }
    }

    pub(super) fn advance(&mut self, next: AnalysisStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal transition {:?} -> {next:?}",
            self.stage
        );
        self.stage = next;
        debug!(repo = %self.label, stage = ?next, "analysis stage");
    }

    pub(super) fn fail(&mut self, error: &RepoLocError) {
        let from = self.stage;
        self.advance(AnalysisStage::Failed);
        warn!(repo = %self.label, from = ?from, error = %error, "analysis failed");
    }

    #[cfg(test)]
    pub(super) const fn stage(&self) -> AnalysisStage {
        self.stage
    }
}
