use company_resolver::{EntityResolver, RawRecord, ResolverConfig};

fn acme_dataset() -> Vec<RawRecord> {
    vec![
        RawRecord::named("Acme Inc", "US"),
        RawRecord::named("ACME INC.", "US"),
        RawRecord::named("Acme Incorporated", "US"),
        RawRecord::named("Globex", "DE"),
    ]
}

#[test]
fn test_acme_records_cluster_together() {
    let resolver = EntityResolver::new(ResolverConfig::new().with_threshold(90)).unwrap();
    let resolution = resolver.resolve(&acme_dataset()).unwrap();
    let assignment = &resolution.assignment;

    // total over all four ids
    assert_eq!(assignment.len(), 4);
    assert!((0..4).all(|id| assignment.cluster_of(id).is_some()));

    let acme = assignment.cluster_of(0).unwrap();
    assert_eq!(assignment.cluster_of(1), Some(acme));
    assert_eq!(assignment.cluster_of(2), Some(acme));
    assert_eq!(assignment.cluster_size(acme), 3);

    assert_ne!(assignment.cluster_of(3), Some(acme));
    assert!(assignment.is_singleton(3));
    assert_eq!(assignment.partition(), vec![vec![0, 1, 2], vec![3]]);
}

#[test]
fn test_rerun_yields_identical_membership() {
    let resolver = EntityResolver::new(ResolverConfig::default()).unwrap();
    let dataset = acme_dataset();

    let first = resolver.resolve(&dataset).unwrap();
    let second = resolver.resolve(&dataset).unwrap();

    assert_eq!(first.assignment.partition(), second.assignment.partition());
    assert_eq!(
        first.assignment.membership_fingerprint(),
        second.assignment.membership_fingerprint()
    );
}

#[test]
fn test_input_order_does_not_change_membership() {
    let resolver = EntityResolver::new(ResolverConfig::default()).unwrap();
    let mut dataset = acme_dataset();
    let forward = resolver.resolve(&dataset).unwrap();

    dataset.reverse();
    let backward = resolver.resolve(&dataset).unwrap();

    // map reversed ids back to input positions before comparing
    let n = dataset.len();
    let mut remapped: Vec<Vec<usize>> = backward
        .assignment
        .partition()
        .into_iter()
        .map(|members| {
            let mut ids: Vec<usize> = members.into_iter().map(|id| n - 1 - id).collect();
            ids.sort();
            ids
        })
        .collect();
    remapped.sort();

    assert_eq!(remapped, forward.assignment.partition());
}

#[test]
fn test_unmatched_records_are_distinct_singletons() {
    let dataset = vec![
        RawRecord::named("Initech", "US"),
        RawRecord::named("Umbrella", "US"),
        RawRecord::named("Hooli", "US"),
    ];
    let resolution = EntityResolver::new(ResolverConfig::default())
        .unwrap()
        .resolve(&dataset)
        .unwrap();

    assert_eq!(resolution.assignment.cluster_count(), 3);
    assert!(resolution.assignment.multi_record_clusters().is_empty());
}

#[test]
fn test_divergent_prefixes_are_not_matched() {
    // same company, different name prefixes: blocking never compares them
    let dataset = vec![
        RawRecord::named("3M", "US"),
        RawRecord::named("Three M Company", "US"),
    ];
    let resolution = EntityResolver::new(ResolverConfig::new().with_threshold(0))
        .unwrap()
        .resolve(&dataset)
        .unwrap();

    assert!(resolution.matches.is_empty());
    assert_eq!(resolution.assignment.cluster_count(), 2);
}

#[test]
fn test_blank_names_never_merge() {
    let dataset = vec![
        RawRecord::named("", "US"),
        RawRecord::named("", "US"),
        RawRecord::default(),
        RawRecord::default(),
    ];
    let resolution = EntityResolver::new(ResolverConfig::new().with_threshold(0))
        .unwrap()
        .resolve(&dataset)
        .unwrap();

    assert!(resolution.matches.is_empty());
    assert_eq!(resolution.assignment.cluster_count(), 4);
}

#[test]
fn test_prefix_length_changes_blocking() {
    let dataset = vec![
        RawRecord::named("Acme Widgets", "US"),
        RawRecord::named("Acme", "US"),
    ];

    let short = EntityResolver::new(ResolverConfig::default())
        .unwrap()
        .resolve(&dataset)
        .unwrap();
    assert_eq!(short.assignment.cluster_count(), 1);

    // "acme widg" vs "acme": separate blocks with prefix length 9
    let long = EntityResolver::new(ResolverConfig::new().with_prefix_length(9))
        .unwrap()
        .resolve(&dataset)
        .unwrap();
    assert_eq!(long.assignment.cluster_count(), 2);
}
