//! Test Data Loader
//!
//! Loads the company fixtures from JSONL. The first line is a header; every
//! following line is one company.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::Company;

/// Header information from the JSONL file
#[derive(Debug, Deserialize)]
pub struct TestDataHeader {
    pub description: String,
    #[serde(default)]
    pub total_entries: usize,
}

fn testdata_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/builder/testdata")
        .join(file)
}

/// Every company in `companies.jsonl`, in file order
pub fn load_companies() -> Vec<Company> {
    let path = testdata_path("companies.jsonl");
    let file = File::open(&path).unwrap_or_else(|e| panic!("open {}: {}", path.display(), e));
    let mut lines = BufReader::new(file).lines();

    let header: TestDataHeader = serde_json::from_str(
        &lines
            .next()
            .expect("companies.jsonl has a header")
            .expect("readable header"),
    )
    .expect("valid header");

    let companies: Vec<Company> = lines
        .map(|line| line.expect("readable line"))
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(&line).expect("valid company"))
        .collect();

    assert_eq!(companies.len(), header.total_entries, "{}", header.description);
    companies
}
