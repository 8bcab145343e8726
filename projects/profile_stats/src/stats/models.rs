use crate::utils::aggregation::Tally;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralPath {
    pub path: String,
    pub title: String,
    pub count: u64,
}

/// Everything collected for one repository during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub name: String,
    pub star_count: u64,
    pub fork_count: u64,
    pub clone_count: u64,
    pub page_view_count: u64,
    pub referral_paths: Vec<ReferralPath>,
    /// Referrer -> views, duplicates already folded
    pub referral_sources: Tally,
    /// Login -> contributions, duplicates already folded
    pub contributors: Tally,
}

impl RepositorySnapshot {
    /// Snapshot with metadata only and every traffic field empty.
    pub fn new(name: impl Into<String>, star_count: u64, fork_count: u64) -> Self {
        Self {
            name: name.into(),
            star_count,
            fork_count,
            clone_count: 0,
            page_view_count: 0,
            referral_paths: Vec::new(),
            referral_sources: Tally::default(),
            contributors: Tally::default(),
        }
    }
}
