//! Process-wide contract metadata cache
//!
//! Contract descriptors are static for the life of the process, so each
//! contract type is described once and the result shared by every registry
//! and builder. Two threads racing on first access may both describe the
//! contract; the first insert wins and both observe the same `Arc`.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use quarry_core::ContractDescriptor;

use crate::builder::Contract;
use crate::Result;

/// Contract type -> descriptor
static CONTRACTS: Lazy<DashMap<TypeId, Arc<ContractDescriptor>>> = Lazy::new(DashMap::new);

/// Descriptor of contract `C`, computed on first use
pub fn contract_metadata<C: Contract>() -> Result<Arc<ContractDescriptor>> {
    let key = TypeId::of::<C>();
    if let Some(cached) = CONTRACTS.get(&key) {
        return Ok(Arc::clone(cached.value()));
    }

    // Described outside any shard lock; `describe` is pure.
    let descriptor = Arc::new(C::describe()?);
    let entry = CONTRACTS.entry(key).or_insert(descriptor);
    Ok(Arc::clone(entry.value()))
}
