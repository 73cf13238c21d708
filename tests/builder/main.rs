//! Builder Integration Test Suite
//!
//! End-to-end coverage of contract registration, fluent accumulation and
//! terminal execution through the public `quarry` API.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test builder
//!
//! # Run provider tests only
//! cargo test --test builder provider::
//! ```

use std::sync::Arc;

use quarry::*;
use serde::{Deserialize, Serialize};

// Test data loader
pub mod test_data;

// Test modules
pub mod conventions;
pub mod provider;
pub mod scenario;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_companies: Option<Vec<i64>>,
}

impl Model for Company {
    fn schema() -> ModelSchema {
        ModelSchema::new("Company")
            .field("id", FieldType::Int)
            .field("name", FieldType::String)
            .field("child_companies", FieldType::array(FieldType::Int))
    }
}

query_contract! {
    /// Company lookups by name and child id
    pub struct CompanyQuery for Company {
        fn by_name(name: &str);
        fn by_id(id: i64);
        fn child_companies_contains(id: i64);
        fn set_name(name: &str);
    }
}

/// Registry with the standard conventions and [`CompanyQuery`]
pub fn standard_registry() -> Arc<ConventionRegistry> {
    Arc::new(
        ConventionRegistry::builder()
            .contract::<CompanyQuery>()
            .convention(ByConvention)
            .convention(ContainsConvention)
            .convention(SetConvention)
            .build()
            .expect("standard conventions cover CompanyQuery"),
    )
}

/// Repository over a fresh in-memory collection
pub fn repository(config: RepositoryConfig) -> Repository<CompanyQuery> {
    MemoryRepositoryProvider::new()
        .create_repository(config, standard_registry())
        .expect("memory provider accepts memory:// configs")
}

/// Repository seeded from `testdata/companies.jsonl`
pub fn seeded_repository() -> Repository<CompanyQuery> {
    let repo = repository(RepositoryConfig::new("testdata", "companies"));
    for company in test_data::load_companies() {
        assert!(repo.save(&company).unwrap());
    }
    repo
}

/// Sorted ids of `companies`
pub fn ids(companies: &[Company]) -> Vec<i64> {
    let mut ids: Vec<i64> = companies.iter().map(|c| c.id).collect();
    ids.sort_unstable();
    ids
}
