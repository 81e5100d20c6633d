//! Per-hyperlink extraction step.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use super::tree::{direct_text, nearest_list_item, tail_text};
use crate::error::ExtractError;
use crate::types::loss::{Loss, Status};

/// Leading count, separator, then the equipment type up to end of text.
static CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\W+(.+)$").expect("caption pattern is valid"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("number pattern is valid"));

/// Why a hyperlink did not produce any records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Link text is empty or not wrapped in parentheses
    NotParenthesized,
    /// No `li` ancestor to read the equipment type from
    NoListItem,
    /// List-item text does not match the numeric-prefix pattern
    MalformedCaption,
    /// Parenthesized text has no digit runs
    NoNumbers,
    /// A digit run does not fit a record number
    NumberOutOfRange,
}

/// Result of examining one hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Records(Vec<Loss>),
    Skipped(SkipReason),
}

/// Normalize a hyperlink target to the URL after any redirect wrapper.
///
/// Keeps everything from the last `http` onward. A target without `http`
/// degrades to `"http" + target`.
pub fn normalize_link(href: &str) -> String {
    let href = href.trim();
    let tail = href.rsplit_once("http").map_or(href, |(_, rest)| rest);
    format!("http{tail}")
}

/// Extract the loss records a single hyperlink stands for.
///
/// Malformed candidates are reported as [`CandidateOutcome::Skipped`]; a
/// caption with digits but no known status is a hard [`ExtractError`].
pub fn extract_candidate(link: ElementRef<'_>) -> Result<CandidateOutcome, ExtractError> {
    let caption = direct_text(link);
    if caption.is_empty() || !caption.starts_with('(') || !caption.ends_with(')') {
        return Ok(CandidateOutcome::Skipped(SkipReason::NotParenthesized));
    }

    let Some(item) = nearest_list_item(link) else {
        return Ok(CandidateOutcome::Skipped(SkipReason::NoListItem));
    };

    let text = tail_text(*item);
    let Some(kind) = CAPTION
        .captures(text.trim())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim_matches(':').trim().to_string())
    else {
        return Ok(CandidateOutcome::Skipped(SkipReason::MalformedCaption));
    };

    let runs: Vec<&str> = NUMBER.find_iter(&caption).map(|m| m.as_str()).collect();
    if runs.is_empty() {
        return Ok(CandidateOutcome::Skipped(SkipReason::NoNumbers));
    }

    let status = Status::detect(&caption).ok_or_else(|| ExtractError::UnknownStatus {
        caption: caption.clone(),
    })?;

    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| ExtractError::MissingHref {
            caption: caption.clone(),
        })?;
    let target = normalize_link(href);

    let mut records = Vec::with_capacity(runs.len());
    for run in runs {
        let Ok(number) = run.parse::<u32>() else {
            return Ok(CandidateOutcome::Skipped(SkipReason::NumberOutOfRange));
        };
        records.push(Loss::new(kind.clone(), status, number, target.clone()));
    }

    Ok(CandidateOutcome::Records(records))
}
