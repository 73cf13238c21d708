//! Scenario tests over the seeded company tree.

use crate::*;

#[test]
fn test_seeded_collection() {
    let repo = seeded_repository();
    let all = repo.builder().unwrap().get_all(true).unwrap();
    assert_eq!(ids(&all), [1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_lookup_by_name_and_id() {
    let repo = seeded_repository();

    let acme = repo.builder().unwrap().by_name("Acme").unwrap().get_one().unwrap();
    assert_eq!(acme.map(|c| c.child_companies), Some(Some(vec![2, 3])));

    let labs = repo.builder().unwrap().by_id(6).unwrap().get_one().unwrap();
    assert_eq!(labs.map(|c| c.name), Some("Globex Labs".to_string()));

    assert!(repo
        .builder()
        .unwrap()
        .by_name("Initech")
        .unwrap()
        .get_one()
        .unwrap()
        .is_none());
}

#[test]
fn test_parent_of_child() {
    let repo = seeded_repository();

    let parents = repo
        .builder()
        .unwrap()
        .child_companies_contains(4)
        .unwrap()
        .get_all(false)
        .unwrap();
    assert_eq!(ids(&parents), [2]);

    // Empty arrays and missing arrays never match
    let none = repo
        .builder()
        .unwrap()
        .child_companies_contains(42)
        .unwrap()
        .get_all(false)
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_conjunction_of_fragments() {
    let repo = seeded_repository();

    let found = repo
        .builder()
        .unwrap()
        .by_name("Acme")
        .unwrap()
        .child_companies_contains(3)
        .unwrap()
        .get_all(false)
        .unwrap();
    assert_eq!(ids(&found), [1]);

    let found = repo
        .builder()
        .unwrap()
        .by_name("Globex")
        .unwrap()
        .child_companies_contains(3)
        .unwrap()
        .get_all(false)
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_rename_then_delete() {
    let repo = seeded_repository();

    let renamed = repo
        .builder()
        .unwrap()
        .by_id(5)
        .unwrap()
        .set_name("Globex Corp")
        .unwrap()
        .update_one(false)
        .unwrap();
    assert!(renamed);

    let corp = repo.builder().unwrap().by_name("Globex Corp").unwrap();
    assert_eq!(ids(&corp.get_all(false).unwrap()), [5]);
    assert_eq!(corp.delete_all(false).unwrap(), 1);
    assert_eq!(repo.builder().unwrap().get_all(true).unwrap().len(), 5);
}

#[test]
fn test_queryable_composition() {
    let repo = seeded_repository();

    // 4 has an empty child list, 3 and 6 have none
    let parents: Vec<i64> = repo
        .builder()
        .unwrap()
        .queryable(|q| {
            q.filter(|c| {
                c.child_companies
                    .as_ref()
                    .is_some_and(|children| !children.is_empty())
            })
            .map(|c| c.id)
            .collect()
        })
        .unwrap();
    assert_eq!(parents, [1, 2, 5]);
}

#[test]
fn test_limit_with_filter() {
    let repo = seeded_repository();

    assert_eq!(repo.builder().unwrap().get_some(2, true).unwrap().len(), 2);

    let acme = repo.builder().unwrap().by_name("Acme").unwrap();
    assert_eq!(ids(&acme.get_some(10, false).unwrap()), [1]);
    assert_eq!(ids(&acme.get_some(0, false).unwrap()), [1]);
}

#[test]
fn test_unfiltered_operations_are_rejected() {
    let repo = seeded_repository();
    let query = repo.builder().unwrap();

    for result in [
        query.delete_all(false).map(|_| ()),
        query.get_all(false).map(|_| ()),
        query.get_some(2, false).map(|_| ()),
    ] {
        assert!(matches!(result, Err(Error::UnsafeOperation { .. })));
    }
    assert_eq!(query.get_all(true).unwrap().len(), 6);
}

mod limits {
    use proptest::prelude::*;

    use crate::seeded_repository;

    proptest! {
        #[test]
        fn get_some_returns_at_most_limit(limit in -3i64..10) {
            let repo = seeded_repository();
            let found = repo.builder().unwrap().get_some(limit, true).unwrap();

            // Below one the limit is ignored
            let expected = if limit < 1 { 6 } else { (limit as usize).min(6) };
            prop_assert_eq!(found.len(), expected);
        }
    }
}
