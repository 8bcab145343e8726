use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::aggregation::{RankedList, RankedViews};

pub const STAR_LIST: &str = "<!-- STAR_LIST -->";
pub const FORK_LIST: &str = "<!-- FORK_LIST -->";
pub const CLONE_LIST: &str = "<!-- CLONE_LIST -->";
pub const PAGE_VIEW_LIST: &str = "<!-- PAGE_VIEW_LIST -->";
pub const CONTRIBUTOR_LIST: &str = "<!-- CONTRIBUTOR_LIST -->";
pub const REFERRAL_PATH_LIST: &str = "<!-- REFERRAL_PATH_LIST -->";
pub const REFERRAL_SOURCE_LIST: &str = "<!-- REFERRAL_SOURCE_LIST -->";
pub const LAST_UPDATED: &str = "<!-- LAST_UPDATED -->";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Error)]
pub enum LoadTemplateError {
    #[error("ReadTemplate {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn load_template(path: &Path) -> Result<String, LoadTemplateError> {
    std::fs::read_to_string(path).map_err(|source| LoadTemplateError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn repository_lines(list: &RankedList, owner: &str, symbol: &str) -> String {
    list.iter()
        .map(|entry| {
            format!(
                "1. [{name}](https://github.com/{owner}/{name}) - {symbol} {value}",
                name = entry.label,
                value = entry.value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn contributor_lines(list: &RankedList) -> String {
    list.iter()
        .map(|entry| {
            format!(
                "1. [{login}](https://github.com/{login}) - 🤝 {value}",
                login = entry.label,
                value = entry.value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn referral_path_lines(list: &RankedList) -> String {
    list.iter()
        .map(|entry| {
            let title = entry.title.as_deref().unwrap_or(&entry.label);
            format!(
                "1. [{title}](https://github.com{path}) - 👣 {value}",
                path = entry.label,
                value = entry.value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn referral_source_lines(list: &RankedList) -> String {
    list.iter()
        .map(|entry| format!("1. {} - 🌍 {}", entry.label, entry.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fills the known placeholders of `template`.
///
/// The template is scanned once, left to right, for the exact marker strings,
/// so text inserted for one marker is never re-read as another marker. Any
/// other text, stray `<!--` and unknown comments included, is copied unchanged.
pub fn render_document(
    template: &str,
    views: &RankedViews,
    owner: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let fragments = [
        (STAR_LIST, repository_lines(&views.stars, owner, "★")),
        (FORK_LIST, repository_lines(&views.forks, owner, "🍴")),
        (CLONE_LIST, repository_lines(&views.clones, owner, "🔄")),
        (
            PAGE_VIEW_LIST,
            repository_lines(&views.page_views, owner, "👁️‍🗨️"),
        ),
        (CONTRIBUTOR_LIST, contributor_lines(&views.contributors)),
        (REFERRAL_PATH_LIST, referral_path_lines(&views.referral_paths)),
        (
            REFERRAL_SOURCE_LIST,
            referral_source_lines(&views.referral_sources),
        ),
        (
            LAST_UPDATED,
            generated_at.format(TIMESTAMP_FORMAT).to_string(),
        ),
    ];

    let mut document = String::with_capacity(template.len());
    let mut rest = template;

    // Earliest exact marker wins.
    while let Some((start, marker, fragment)) = fragments
        .iter()
        .filter_map(|(marker, fragment)| rest.find(marker).map(|at| (at, *marker, fragment)))
        .min_by_key(|(at, _, _)| *at)
    {
        document.push_str(&rest[..start]);
        document.push_str(fragment);
        rest = &rest[start + marker.len()..];
    }

    document.push_str(rest);
    document
}
