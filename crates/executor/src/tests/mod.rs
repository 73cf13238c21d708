//! Test modules for the executor crate.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    ByConvention, ContainsConvention, ConventionRegistry, DocumentStore, FieldType, MemoryStore,
    Model, ModelSchema, Repository, RepositoryConfig, SetConvention,
};

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_companies: Option<Vec<i64>>,
}

impl Company {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            child_companies: None,
        }
    }

    pub fn with_children(mut self, children: &[i64]) -> Self {
        self.child_companies = Some(children.to_vec());
        self
    }
}

impl Model for Company {
    fn schema() -> ModelSchema {
        ModelSchema::new("Company")
            .field("id", FieldType::Int)
            .field("name", FieldType::String)
            .field("child_companies", FieldType::array(FieldType::Int))
    }
}

crate::query_contract! {
    /// Queries over companies
    pub struct CompanyQuery for Company {
        fn by_name(name: &str);
        fn child_companies_contains(id: i64);
        fn set_name(name: &str);
    }
}

pub fn registry() -> Arc<ConventionRegistry> {
    Arc::new(
        ConventionRegistry::builder()
            .contract::<CompanyQuery>()
            .convention(ByConvention)
            .convention(ContainsConvention)
            .convention(SetConvention)
            .build()
            .unwrap(),
    )
}

/// Route `tracing` output through the test harness; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A repository and direct access to its collection
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub repo: Repository<CompanyQuery>,
}

impl Fixture {
    pub fn new(config: RepositoryConfig) -> Self {
        init_tracing();
        let store = Arc::new(MemoryStore::new(config.collection.clone()));
        let handle: Arc<dyn DocumentStore> = Arc::clone(&store) as Arc<dyn DocumentStore>;
        let repo = Repository::new(handle, config, registry());
        Self { store, repo }
    }

    pub fn seeded(config: RepositoryConfig, companies: &[Company]) -> Self {
        let fixture = Self::new(config);
        for company in companies {
            assert!(fixture.repo.save(company).unwrap());
        }
        fixture
    }

    pub fn builder(&self) -> CompanyQuery {
        self.repo.builder().unwrap()
    }
}

pub fn config() -> RepositoryConfig {
    RepositoryConfig::new("testdata", "companies")
}

/// `{id:1,name:"Test One"}` and `{id:2,name:"Test Two",child_companies:[1]}`
pub fn two_companies() -> Vec<Company> {
    vec![
        Company::new(1, "Test One"),
        Company::new(2, "Test Two").with_children(&[1]),
    ]
}

/// Config whose wrapper counts its invocations into `calls`
pub fn counting_config(calls: &Arc<AtomicUsize>) -> RepositoryConfig {
    let seen = Arc::clone(calls);
    config().with_wrapper(move |thunk| {
        seen.fetch_add(1, Ordering::SeqCst);
        thunk();
    })
}

pub fn ids(companies: &[Company]) -> Vec<i64> {
    let mut ids: Vec<i64> = companies.iter().map(|c| c.id).collect();
    ids.sort_unstable();
    ids
}
