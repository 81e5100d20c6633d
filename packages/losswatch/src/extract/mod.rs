//! HTML extraction engine.
//!
//! Turns a raw loss-list page into [`Loss`] records. Every hyperlink whose
//! own text is a parenthesized caption such as `(1, destroyed)` is a
//! candidate; the equipment type comes from the surrounding list item.
//!
//! # Usage
//!
//! ```rust,ignore
//! use losswatch::extract::{collect_losses, parse_losses};
//!
//! for loss in parse_losses(&body) {
//!     println!("{}", loss?);
//! }
//!
//! let all = collect_losses(&body)?;
//! ```

pub mod candidate;
pub mod tree;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::trace;

use crate::error::ExtractError;
use crate::types::loss::Loss;

pub use candidate::{extract_candidate, normalize_link, CandidateOutcome, SkipReason};

/// Lazy sequence of losses in document order.
///
/// Each call to [`parse_losses`] re-parses from scratch. After the first
/// [`ExtractError`] the iterator is exhausted.
pub struct Losses {
    document: Html,
    anchors: std::vec::IntoIter<NodeId>,
    pending: std::vec::IntoIter<Loss>,
    failed: bool,
}

impl Losses {
    fn new(document: Html) -> Self {
        let anchors: Vec<NodeId> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "a")
            .map(|element| element.id())
            .collect();

        Self {
            document,
            anchors: anchors.into_iter(),
            pending: Vec::new().into_iter(),
            failed: false,
        }
    }
}

impl Iterator for Losses {
    type Item = Result<Loss, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(loss) = self.pending.next() {
                return Some(Ok(loss));
            }
            if self.failed {
                return None;
            }

            let id = self.anchors.next()?;
            let Some(link) = self.document.tree.get(id).and_then(ElementRef::wrap) else {
                continue;
            };

            match extract_candidate(link) {
                Ok(CandidateOutcome::Records(records)) => {
                    self.pending = records.into_iter();
                }
                Ok(CandidateOutcome::Skipped(reason)) => {
                    trace!(?reason, "Skipping hyperlink");
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Parse a document into a lazy sequence of losses.
///
/// Malformed markup never fails; the parser recovers. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn parse_losses(body: &[u8]) -> Losses {
    let html = String::from_utf8_lossy(body);
    Losses::new(Html::parse_document(&html))
}

/// Parse a document and collect every loss, stopping at the first hard fault.
pub fn collect_losses(body: &[u8]) -> Result<Vec<Loss>, ExtractError> {
    parse_losses(body).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::loss::Status;

    const PAGE: &str = r#"
        <html><body>
        <h3>Tanks (3, of which destroyed: 2, damaged: 1)</h3>
        <ul>
          <li><img src="flag.png"> 2 T-64BV: <a href="https://img/1.jpg">(1, destroyed)</a> <a href="https://img/2.jpg">(2, destroyed)</a></li>
          <li><img src="flag.png"> 1 T-72B3: <a href="https://img/3.jpg">(1, damaged)</a></li>
        </ul>
        <p><a href="https://elsewhere/">(not a loss)</a></p>
        </body></html>
    "#;

    #[test]
    fn test_parse_in_document_order() {
        let losses = collect_losses(PAGE.as_bytes()).unwrap();
        assert_eq!(
            losses,
            vec![
                Loss::new("T-64BV", Status::Destroyed, 1, "https://img/1.jpg"),
                Loss::new("T-64BV", Status::Destroyed, 2, "https://img/2.jpg"),
                Loss::new("T-72B3", Status::Damaged, 1, "https://img/3.jpg"),
            ]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = collect_losses(PAGE.as_bytes()).unwrap();
        let second = collect_losses(PAGE.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lazy_iteration_yields_before_fault() {
        let page = r#"<ul>
            <li><img src="flag.png"> 1 T-64BV: <a href="https://img/1.jpg">(1, destroyed)</a></li>
            <li><img src="flag.png"> 1 T-80BV: <a href="https://img/2.jpg">(1, vanished)</a></li>
            <li><img src="flag.png"> 1 T-90A: <a href="https://img/3.jpg">(1, captured)</a></li>
        </ul>"#;

        let mut losses = parse_losses(page.as_bytes());
        assert_eq!(losses.next().unwrap().unwrap().kind, "T-64BV");
        assert!(matches!(
            losses.next(),
            Some(Err(ExtractError::UnknownStatus { .. }))
        ));
        assert!(losses.next().is_none());

        assert!(collect_losses(page.as_bytes()).is_err());
    }

    #[test]
    fn test_garbage_input_does_not_fail() {
        let losses = collect_losses(
            b"<ul><li><img src='f.png'> 1 Moskva: <a href='https://img/m.jpg'>(1, sunk)</a></li><li><b>unclosed</ul><<<>>\xff\xfe</a></div>",
        )
        .unwrap();
        assert_eq!(losses, vec![Loss::new("Moskva", Status::Sunk, 1, "https://img/m.jpg")]);
        assert!(collect_losses(b"").unwrap().is_empty());
    }
}
