use depot_core::{Artifact, Requirement};

#[test]
fn canonical_strings_round_trip() {
    let canonical = [
        "",
        "numpy",
        "numpy 1.3.0",
        "numpy 1.3.0-2",
        "scipy 0.8.0.dev5698",
        "baz 1.8-2",
    ];
    for s in canonical {
        let r: Requirement = s.parse().unwrap();
        assert_eq!(r.to_string(), s, "round trip failed for {s:?}");
    }
}

#[test]
fn non_canonical_input_is_normalized() {
    let r: Requirement = "  NumPy   1.3.0 ".parse().unwrap();
    assert_eq!(r.to_string(), "numpy 1.3.0");
}

#[test]
fn empty_requirement_matches_every_artifact() {
    let r: Requirement = "".parse().unwrap();
    assert_eq!(r.strictness(), 0);
    for a in [
        Artifact::new("numpy", "1.3.0", 1, vec![]),
        Artifact::new("PIL", "1.1.6", 4, vec![]),
    ] {
        assert!(r.matches(&a));
    }
}

#[test]
fn strictness_tiers() {
    let cases: [(&str, u8); 4] = [
        ("", 0),
        ("baz", 1),
        ("baz 1.8", 2),
        ("baz 1.8-2", 3),
    ];
    for (s, strictness) in cases {
        let r: Requirement = s.parse().unwrap();
        assert_eq!(r.strictness(), strictness, "for {s:?}");
    }
}

#[test]
fn fully_pinned_requirement_matches_one_artifact_shape() {
    let r: Requirement = "BAZ 1.8-2".parse().unwrap();
    assert_eq!(r.name(), Some("baz"));
    assert_eq!(r.version(), Some("1.8"));
    assert_eq!(r.build(), Some(2));
    assert_eq!(r.strictness(), 3);

    assert!(r.matches(&Artifact::new("baz", "1.8", 2, vec![])));
    assert!(r.matches(&Artifact::new("Baz", "1.8", 2, vec![])));
    assert!(!r.matches(&Artifact::new("baz", "1.8", 3, vec![])));
    assert!(!r.matches(&Artifact::new("baz", "1.9", 2, vec![])));
}

#[test]
fn malformed_requirements_are_rejected() {
    for s in ["name version build extra", "a b c", "sp@m", "foo 1.0-one"] {
        assert!(s.parse::<Requirement>().is_err(), "accepted {s:?}");
    }
}
