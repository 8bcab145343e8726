use std::collections::HashMap;

use crate::stats::models::RepositorySnapshot;

/// Insertion-ordered counter keyed by exact, case-sensitive string equality.
///
/// Adding an existing key sums into its first slot, so iteration order is
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn add(&mut self, key: &str, count: u64) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), count));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl<K: AsRef<str>> FromIterator<(K, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for (key, count) in iter {
            tally.add(key.as_ref(), count);
        }
        tally
    }
}

/// Account-wide sums of the per-repository breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTotals {
    pub contributors: Tally,
    pub referral_sources: Tally,
    pub referral_paths: Tally,
    /// First title seen for each referral path
    pub path_titles: HashMap<String, String>,
}

/// Folds every snapshot into one set of totals, in slice order.
pub fn aggregate(snapshots: &[RepositorySnapshot]) -> AggregateTotals {
    let mut totals = AggregateTotals::default();

    for snapshot in snapshots {
        for (login, contributions) in snapshot.contributors.iter() {
            totals.contributors.add(login, contributions);
        }
        for (referrer, count) in snapshot.referral_sources.iter() {
            totals.referral_sources.add(referrer, count);
        }
        for referral in &snapshot.referral_paths {
            totals.referral_paths.add(&referral.path, referral.count);
            totals
                .path_titles
                .entry(referral.path.clone())
                .or_insert_with(|| referral.title.clone());
        }
    }

    totals
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub label: String,
    /// Display text when it differs from the label (referral path titles)
    pub title: Option<String>,
    pub value: u64,
}

impl RankedEntry {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            title: None,
            value,
        }
    }
}

pub type RankedList = Vec<RankedEntry>;

/// Every list the README shows, each sorted by value, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedViews {
    pub stars: RankedList,
    pub forks: RankedList,
    pub clones: RankedList,
    pub page_views: RankedList,
    pub contributors: RankedList,
    pub referral_sources: RankedList,
    pub referral_paths: RankedList,
}

/// Descending by value. `sort_by` is stable, so ties keep input order.
fn sort_descending(mut list: RankedList) -> RankedList {
    list.sort_by(|a, b| b.value.cmp(&a.value));
    list
}

fn rank_repositories(
    snapshots: &[RepositorySnapshot],
    metric: impl Fn(&RepositorySnapshot) -> u64,
) -> RankedList {
    sort_descending(
        snapshots
            .iter()
            .map(|snapshot| RankedEntry::new(snapshot.name.clone(), metric(snapshot)))
            .collect(),
    )
}

fn rank_tally(tally: &Tally) -> RankedList {
    sort_descending(
        tally
            .iter()
            .map(|(key, count)| RankedEntry::new(key, count))
            .collect(),
    )
}

pub fn rank(snapshots: &[RepositorySnapshot]) -> RankedViews {
    let totals = aggregate(snapshots);

    let referral_paths = rank_tally(&totals.referral_paths)
        .into_iter()
        .map(|mut entry| {
            entry.title = totals.path_titles.get(&entry.label).cloned();
            entry
        })
        .collect();

    RankedViews {
        stars: rank_repositories(snapshots, |s| s.star_count),
        forks: rank_repositories(snapshots, |s| s.fork_count),
        clones: rank_repositories(snapshots, |s| s.clone_count),
        page_views: rank_repositories(snapshots, |s| s.page_view_count),
        contributors: rank_tally(&totals.contributors),
        referral_sources: rank_tally(&totals.referral_sources),
        referral_paths,
    }
}
