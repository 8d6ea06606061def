//! Iterative traversal of two co-iterated trees.
//!
//! Implemented with an explicit work-stack rather than native recursion so
//! traversal depth is bounded only by heap, not by the call stack.

use std::sync::Arc;

use crate::coiterate::co_iterate;
use crate::default_analyzer::DifferenceAnalyzer;
use crate::difference::Report;
use crate::element::{Comparator, Element};
use crate::error::AnalysisError;
use crate::filter::ElementFilter;

enum WorkItem {
    Begin(Option<Arc<Element>>, Option<Arc<Element>>),
    /// `analyze_this` was decided at `Begin` time and must be replayed
    /// unchanged here, since it determines whether `end_analysis` is called
    /// to match a `begin_analysis` that was (or wasn't) called.
    End(Option<Arc<Element>>, Option<Arc<Element>>, bool),
}

fn push_children(
    stack: &mut Vec<WorkItem>,
    old: &Arc<Element>,
    new: &Arc<Element>,
    comparator: &Comparator,
) {
    let pairs: Vec<_> = co_iterate(old.children(), new.children(), |a, b| comparator(a, b)).collect();
    for (a, b) in pairs.into_iter().rev() {
        stack.push(WorkItem::Begin(a.cloned(), b.cloned()));
    }
}

/// Walks one side of a tree looking for two distinct siblings the
/// comparator treats as equal. An analyzer that builds trees over
/// caller-supplied data should call this on both sides before traversing,
/// since `co_iterate` has no cheap way to notice a tie within a single side
/// — it only ever compares across sides.
///
/// Iterative via an explicit stack, same as [`traverse`], so tree depth
/// never grows the call stack.
pub fn check_no_duplicate_siblings(roots: &[Arc<Element>], comparator: &Comparator) -> Result<(), AnalysisError> {
    let mut stack: Vec<Arc<Element>> = Vec::new();
    check_siblings_at_level(roots, comparator)?;
    stack.extend(roots.iter().cloned());

    while let Some(element) = stack.pop() {
        check_siblings_at_level(element.children(), comparator)?;
        stack.extend(element.children().iter().cloned());
    }

    Ok(())
}

fn check_siblings_at_level(siblings: &[Arc<Element>], comparator: &Comparator) -> Result<(), AnalysisError> {
    for pair in siblings.windows(2) {
        if comparator(&pair[0], &pair[1]) == std::cmp::Ordering::Equal {
            return Err(AnalysisError::DuplicateSibling {
                description: format!("siblings `{}` and `{}` compare equal", pair[0].full_name(), pair[1].full_name()),
            });
        }
    }
    Ok(())
}

/// Walks `old_roots` and `new_roots` in lockstep, dispatching each analyzed
/// pair to `analyzer` and every resulting report to `on_report`. Roots must
/// already be sorted by `comparator`, same as any other sibling list.
pub fn traverse(
    old_roots: &[Arc<Element>],
    new_roots: &[Arc<Element>],
    comparator: &Comparator,
    filter: &dyn ElementFilter,
    analyzer: &mut dyn DifferenceAnalyzer,
    on_report: &mut dyn FnMut(Report),
) {
    let mut stack: Vec<WorkItem> = Vec::new();
    let root_pairs: Vec<_> = co_iterate(old_roots, new_roots, |a, b| comparator(a, b)).collect();
    for (a, b) in root_pairs.into_iter().rev() {
        stack.push(WorkItem::Begin(a.cloned(), b.cloned()));
    }

    while let Some(item) = stack.pop() {
        match item {
            WorkItem::Begin(old, new) => {
                let analyze_this = filter.applies(old.as_deref()) && filter.applies(new.as_deref());
                if analyze_this {
                    analyzer.begin_analysis(old.as_ref(), new.as_ref());
                }

                stack.push(WorkItem::End(old.clone(), new.clone(), analyze_this));

                if let (Some(o), Some(n)) = (&old, &new) {
                    if filter.should_descend_into(o) && filter.should_descend_into(n) {
                        push_children(&mut stack, o, n, comparator);
                    }
                }
            }
            WorkItem::End(old, new, analyze_this) => {
                if analyze_this {
                    let report = analyzer.end_analysis(old.as_ref(), new.as_ref());
                    if !report.is_empty() {
                        on_report(report);
                    }
                }
            }
        }
    }
}
