//! Repository provider and configuration tests.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::*;

#[test]
fn test_same_names_share_a_collection() {
    let provider = MemoryRepositoryProvider::new();
    let config = RepositoryConfig::new("testdata", "companies");

    let writer: Repository<CompanyQuery> = provider
        .create_repository(config.clone(), standard_registry())
        .unwrap();
    let reader: Repository<CompanyQuery> = provider
        .create_repository(config, standard_registry())
        .unwrap();

    writer
        .save(&Company {
            id: 1,
            name: "Acme".to_string(),
            child_companies: None,
        })
        .unwrap();

    assert_eq!(reader.builder().unwrap().get_all(true).unwrap().len(), 1);
    assert!(provider.collections().contains("testdata", "companies"));
}

#[test]
fn test_different_collections_are_isolated() {
    let provider = MemoryRepositoryProvider::new();
    let a: Repository<CompanyQuery> = provider
        .create_repository(RepositoryConfig::new("testdata", "a"), standard_registry())
        .unwrap();
    let b: Repository<CompanyQuery> = provider
        .create_repository(RepositoryConfig::new("testdata", "b"), standard_registry())
        .unwrap();

    a.save(&Company {
        id: 1,
        name: "Acme".to_string(),
        child_companies: None,
    })
    .unwrap();

    assert!(b.builder().unwrap().get_all(true).unwrap().is_empty());
    assert_eq!(a.collection().name(), "a");
}

#[test]
fn test_save_upserts_on_id() {
    let repo = seeded_repository();
    let mut acme = repo
        .builder()
        .unwrap()
        .by_id(1)
        .unwrap()
        .get_one()
        .unwrap()
        .unwrap();
    acme.name = "Acme Holdings".to_string();
    assert!(repo.save(&acme).unwrap());

    assert_eq!(repo.builder().unwrap().get_all(true).unwrap().len(), 6);
    let renamed = repo.builder().unwrap().by_id(1).unwrap().get_one().unwrap();
    assert_eq!(renamed.map(|c| c.name), Some("Acme Holdings".to_string()));
}

#[test]
fn test_unsupported_connection_string() {
    let config = RepositoryConfig::new("testdata", "companies")
        .with_connection_string("mongodb://localhost:27017");
    let result: Result<Repository<CompanyQuery>> =
        MemoryRepositoryProvider::new().create_repository(config, standard_registry());
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_unregistered_contract_fails_at_creation() {
    let provider = MemoryRepositoryProvider::new();
    let result: Result<Repository<conventions::FamilyQuery>> = provider.create_repository(
        RepositoryConfig::new("testdata", "family"),
        standard_registry(),
    );

    match result {
        Err(Error::NotRegistered { contract }) => assert_eq!(contract, "FamilyQuery"),
        Err(other) => panic!("expected NotRegistered, got {other:?}"),
        Ok(_) => panic!("repository created for an unregistered contract"),
    }
    // Rejected before the collection is resolved
    assert!(!provider.collections().contains("testdata", "family"));
}

#[test]
fn test_config_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
connection_string = "memory://local"
database = "testdata"
collection = "loaded"
write_concern = "journaled"
"#
    )
    .unwrap();

    let config = RepositoryConfig::load(file.path()).unwrap();
    assert_eq!(config.write_concern, WriteConcern::Journaled);

    let repo = repository(config);
    assert_eq!(repo.collection().name(), "loaded");
    assert_eq!(repo.config().database, "testdata");
}

#[test]
fn test_wrapper_from_config() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let config = RepositoryConfig::new("testdata", "wrapped").with_wrapper(move |thunk| {
        seen.fetch_add(1, Ordering::SeqCst);
        thunk();
    });

    let repo = repository(config);
    repo.save(&Company {
        id: 7,
        name: "Initech".to_string(),
        child_companies: Some(vec![]),
    })
    .unwrap();

    let query = repo.builder().unwrap().by_name("Initech").unwrap();
    assert_eq!(query.get_all(false).unwrap().len(), 1);
    assert_eq!(query.queryable_many(|q| q.rev()).unwrap().count(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // Rejected before the wrapper
    assert!(repo.builder().unwrap().delete_all(false).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
