//! Per-difference rewriting, applied in registration order.

use crate::config::Configuration;
use crate::difference::Difference;
use crate::element::Element;

/// Rewrites or drops a single difference based on the pair it was raised
/// against. Must be pure w.r.t. the engine: may not mutate elements or other
/// differences, and must not depend on anything but its arguments and its
/// own configuration.
pub trait Transform: Send + Sync {
    /// Called once, before any difference reaches this transform.
    fn initialize(&mut self, config: &Configuration) {
        let _ = config;
    }

    /// `None` drops the difference; `Some` replaces it, possibly with an
    /// unchanged clone. Applying the same transform twice to its own output
    /// must be a no-op.
    fn apply(&self, old: Option<&Element>, new: Option<&Element>, difference: Difference) -> Option<Difference>;
}

/// Runs `difference` through `chain` in order, short-circuiting as soon as
/// one transform drops it.
pub fn apply_chain(
    chain: &[Box<dyn Transform>],
    old: Option<&Element>,
    new: Option<&Element>,
    mut difference: Difference,
) -> Option<Difference> {
    for transform in chain {
        difference = transform.apply(old, new, difference)?;
    }
    Some(difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difference::{CompatibilityType, Severity};

    struct DropCode(&'static str);
    impl Transform for DropCode {
        fn apply(&self, _old: Option<&Element>, _new: Option<&Element>, difference: Difference) -> Option<Difference> {
            if difference.code() == self.0 {
                None
            } else {
                Some(difference)
            }
        }
    }

    struct RenameCode(&'static str, &'static str);
    impl Transform for RenameCode {
        fn apply(&self, _old: Option<&Element>, _new: Option<&Element>, difference: Difference) -> Option<Difference> {
            if difference.code() == self.0 {
                Some(difference.with_code(self.1))
            } else {
                Some(difference)
            }
        }
    }

    #[test]
    fn scenario_four_drop_then_rename() {
        let chain: Vec<Box<dyn Transform>> = vec![Box::new(DropCode("X")), Box::new(RenameCode("Y", "Z"))];

        let x = Difference::new("X", "X", "x");
        assert!(apply_chain(&chain, None, None, x).is_none());

        let y = Difference::new("Y", "Y", "y").with_classification(CompatibilityType::SOURCE, Severity::Breaking);
        let result = apply_chain(&chain, None, None, y).unwrap();
        assert_eq!(result.code(), "Z");
    }

    #[test]
    fn identity_transform_is_idempotent() {
        struct Identity;
        impl Transform for Identity {
            fn apply(&self, _old: Option<&Element>, _new: Option<&Element>, difference: Difference) -> Option<Difference> {
                Some(difference)
            }
        }
        let chain: Vec<Box<dyn Transform>> = vec![Box::new(Identity)];
        let original = Difference::new("A", "A", "a");
        let result = apply_chain(&chain, None, None, original.clone()).unwrap();
        assert_eq!(result, original);
    }
}
