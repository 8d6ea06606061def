//! Integration coverage for `traverse_to_api` over a use-site graph spanning
//! several elements and a cycle.

use std::collections::HashSet;
use std::sync::Arc;

use apidiff_core::{Api, Archive, Element, ElementKind, UseSite, UseType};

fn leaf(name: &str) -> Arc<Element> {
    let api = Arc::new(Api::new(vec![Archive::new("a", vec![])], vec![]));
    Element::build_root(ElementKind::Class, name, api, Archive::new("a", vec![]), |_| vec![])
}

#[test]
fn finds_multiple_paths_through_a_branching_graph() {
    let entry = leaf("Entry");
    let via_param = leaf("ViaParam");
    let via_return = leaf("ViaReturn");
    let public_a = leaf("PublicA");
    let public_b = leaf("PublicB");

    entry.set_use_sites(vec![
        UseSite {
            site: Arc::downgrade(&entry),
            target: Arc::downgrade(&via_param),
            use_type: UseType::Parameter,
        },
        UseSite {
            site: Arc::downgrade(&entry),
            target: Arc::downgrade(&via_return),
            use_type: UseType::Return,
        },
    ]);
    via_param.set_use_sites(vec![UseSite {
        site: Arc::downgrade(&via_param),
        target: Arc::downgrade(&public_a),
        use_type: UseType::FieldType,
    }]);
    via_return.set_use_sites(vec![UseSite {
        site: Arc::downgrade(&via_return),
        target: Arc::downgrade(&public_b),
        use_type: UseType::Extends,
    }]);

    let mut primary = HashSet::new();
    primary.insert(public_a.id());
    primary.insert(public_b.id());

    let paths = apidiff_core::traverse_to_api(&entry, &primary);
    assert_eq!(paths.len(), 2);

    let endpoints: HashSet<&str> = paths.iter().map(|p| p.last().unwrap().full_name()).collect();
    assert!(endpoints.contains("PublicA"));
    assert!(endpoints.contains("PublicB"));
}

#[test]
fn a_long_cycle_terminates_and_yields_no_path_without_a_primary_sink() {
    let a = leaf("A");
    let b = leaf("B");
    let c = leaf("C");

    a.set_use_sites(vec![UseSite {
        site: Arc::downgrade(&a),
        target: Arc::downgrade(&b),
        use_type: UseType::FieldType,
    }]);
    b.set_use_sites(vec![UseSite {
        site: Arc::downgrade(&b),
        target: Arc::downgrade(&c),
        use_type: UseType::FieldType,
    }]);
    c.set_use_sites(vec![UseSite {
        site: Arc::downgrade(&c),
        target: Arc::downgrade(&a),
        use_type: UseType::FieldType,
    }]);

    let primary = HashSet::new();
    let paths = apidiff_core::traverse_to_api(&a, &primary);
    assert!(paths.is_empty());
}
