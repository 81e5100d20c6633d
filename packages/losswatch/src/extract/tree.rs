//! Text accessors over the parsed DOM.
//!
//! `scraper` stores text as sibling nodes. The accessors here rebuild the
//! element-tree view the captions are written against: an element's *direct
//! text* is the run of text nodes before its first non-text child, and its
//! *tail* is the run of text nodes right after it, up to the next non-text
//! sibling.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Text directly inside `element`, before its first child element or comment.
pub fn direct_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .map_while(|child| child.value().as_text().map(|text| &**text))
        .collect()
}

/// Text immediately following `node`, before the next non-text sibling.
pub fn tail(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        match sibling.value().as_text() {
            Some(text) => out.push_str(text),
            None => break,
        }
        next = sibling.next_sibling();
    }
    out
}

/// Concatenated tails of `root` and all of its non-text descendants, in
/// document order.
///
/// Text that sits directly inside an element (rather than after one) is not
/// collected, so for `<li><a>(1, destroyed)</a> 1 T-64BV</li>` only the
/// trailing ` 1 T-64BV` and the tail of the `li` itself are returned.
pub fn tail_text(root: NodeRef<'_, Node>) -> String {
    let mut buf = String::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        buf.push_str(&tail(node));

        let children: Vec<_> = node
            .children()
            .filter(|child| !child.value().is_text())
            .collect();
        stack.extend(children.into_iter().rev());
    }

    buf
}

/// Nearest `li` ancestor of `element`, if any.
pub fn nearest_list_item(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "li")
}
