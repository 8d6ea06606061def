//! Use-site graph traversal. The graph is potentially cyclic; implemented
//! as iterative DFS with an explicit visited set and path vector rather
//! than recursion.

use std::collections::HashSet;
use std::sync::Arc;

use crate::element::{Element, ElementId, UseSite, UseType};

/// One DFS frame: the element currently being expanded, the index of the
/// next outgoing use-site to try, and whether reaching it required a
/// `movesToApi` edge (annotations don't carry the walk across the API
/// boundary, see [`UseType::moves_to_api`]).
struct Frame {
    element: Arc<Element>,
    next_use_site: usize,
}

/// Walks the use-site graph outward from `start`, returning every distinct
/// path (as a list of elements, `start` first) that reaches an element
/// owned by one of `primary`'s archives. Tolerates cycles: an element is
/// expanded at most once per call via the visited set.
pub fn traverse_to_api(start: &Arc<Element>, primary: &HashSet<ElementId>) -> Vec<Vec<Arc<Element>>> {
    let mut paths = Vec::new();
    let mut visited: HashSet<ElementId> = HashSet::new();
    let mut path: Vec<Arc<Element>> = vec![Arc::clone(start)];
    let mut stack: Vec<Frame> = vec![Frame {
        element: Arc::clone(start),
        next_use_site: 0,
    }];
    visited.insert(start.id());

    if primary.contains(&start.id()) {
        paths.push(path.clone());
    }

    while let Some(frame) = stack.last_mut() {
        let use_sites: Vec<UseSite> = frame.element.use_sites().clone();
        let mut advanced = false;

        while frame.next_use_site < use_sites.len() {
            let use_site = &use_sites[frame.next_use_site];
            frame.next_use_site += 1;

            if !use_site.use_type.moves_to_api() {
                continue;
            }
            let Some(target) = use_site.target.upgrade() else {
                continue;
            };
            if visited.contains(&target.id()) {
                continue;
            }

            visited.insert(target.id());
            path.push(Arc::clone(&target));
            if primary.contains(&target.id()) {
                paths.push(path.clone());
            }
            stack.push(Frame {
                element: target,
                next_use_site: 0,
            });
            advanced = true;
            break;
        }

        if !advanced {
            stack.pop();
            path.pop();
        }
    }

    paths
}
