//! Convention registry
//!
//! Binds every custom method of every registered contract to exactly one
//! convention, once, before any builder exists. Conventions are tried in
//! registration order and the first one whose `matches` accepts the method
//! wins. If any custom method is left unbound the whole registration fails
//! with [`Error::NoMatchingConvention`] and no registry is produced.
//!
//! Methods whose names belong to the built-in surface are never bound; the
//! dispatcher routes them to the executor directly.
//!
//! Builders and repositories can only be created for contracts the registry
//! resolves, so every custom method a builder can call has a binding.
//!
//! Once built the registry is immutable and shared by `Arc` across every
//! builder on every thread.
//!
//! ```ignore
//! let registry = ConventionRegistry::builder()
//!     .contract::<CompanyQuery>()
//!     .convention(ByConvention)
//!     .convention(ContainsConvention)
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use quarry_core::ContractDescriptor;
use tracing::{debug, info};

use crate::builder::Contract;
use crate::command::BuiltinMethod;
use crate::convention::Convention;
use crate::metadata::contract_metadata;
use crate::{Error, Result};

/// Immutable binding table from contract methods to conventions
pub struct ConventionRegistry {
    conventions: Vec<Arc<dyn Convention>>,
    contracts: HashMap<String, Arc<ContractDescriptor>>,
    /// (contract, method) -> index into `conventions`
    bindings: HashMap<(String, String), usize>,
}

impl ConventionRegistry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Bind every custom method of `contracts` against `conventions`
    ///
    /// Contracts are processed in the given order and methods in declaration
    /// order; the first unbound method aborts registration. Registering the
    /// same descriptor twice is harmless, but two different descriptors
    /// under one name fail with [`Error::DuplicateContract`].
    pub fn register(
        contracts: impl IntoIterator<Item = Arc<ContractDescriptor>>,
        conventions: impl IntoIterator<Item = Arc<dyn Convention>>,
    ) -> Result<Self> {
        let conventions: Vec<Arc<dyn Convention>> = conventions.into_iter().collect();
        let mut table: HashMap<String, Arc<ContractDescriptor>> = HashMap::new();
        let mut bindings = HashMap::new();

        for contract in contracts {
            if let Some(existing) = table.get(&contract.name) {
                if existing.as_ref() == contract.as_ref() {
                    continue;
                }
                return Err(Error::DuplicateContract {
                    name: contract.name.clone(),
                });
            }

            for method in &contract.methods {
                if BuiltinMethod::from_name(&method.name).is_some() {
                    continue;
                }

                let index = conventions
                    .iter()
                    .position(|c| c.matches(&contract.model, method))
                    .ok_or_else(|| Error::NoMatchingConvention {
                        method: method.clone(),
                    })?;

                debug!(
                    target: "quarry::registry",
                    method = %method,
                    convention = conventions[index].name(),
                    "Bound method"
                );
                bindings.insert((contract.name.clone(), method.name.clone()), index);
            }

            table.insert(contract.name.clone(), contract);
        }

        info!(
            target: "quarry::registry",
            contracts = table.len(),
            conventions = conventions.len(),
            bindings = bindings.len(),
            "Convention registry built"
        );

        Ok(Self {
            conventions,
            contracts: table,
            bindings,
        })
    }

    /// The convention bound to `contract::method`, if any
    pub fn binding(&self, contract: &str, method: &str) -> Option<&Arc<dyn Convention>> {
        self.bindings
            .get(&(contract.to_string(), method.to_string()))
            .map(|&index| &self.conventions[index])
    }

    /// A registered contract by name
    pub fn contract(&self, name: &str) -> Option<&Arc<ContractDescriptor>> {
        self.contracts.get(name)
    }

    /// The registered descriptor of contract `C`
    ///
    /// Names are not identities: another contract type registered under the
    /// same name resolves only if its declaration is identical, since only
    /// then were its bindings validated for `C`. Anything else is
    /// [`Error::NotRegistered`].
    pub fn resolve<C: Contract>(&self) -> Result<Arc<ContractDescriptor>> {
        let described = contract_metadata::<C>()?;
        match self.contracts.get(C::NAME) {
            Some(registered) if registered.as_ref() == described.as_ref() => {
                Ok(Arc::clone(registered))
            }
            _ => Err(Error::NotRegistered {
                contract: C::NAME.to_string(),
            }),
        }
    }

    /// Whether contract `C` was registered
    pub fn is_registered<C: Contract>(&self) -> bool {
        self.resolve::<C>().is_ok()
    }

    /// Registered conventions in registration order
    pub fn conventions(&self) -> &[Arc<dyn Convention>] {
        &self.conventions
    }

    /// Number of bound methods
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no method is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for ConventionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConventionRegistry")
            .field("conventions", &self.conventions)
            .field("contracts", &self.contracts.keys().collect::<Vec<_>>())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

/// Collects contracts and conventions for [`ConventionRegistry::register`]
#[derive(Default)]
pub struct RegistryBuilder {
    contracts: Vec<Arc<ContractDescriptor>>,
    conventions: Vec<Arc<dyn Convention>>,
    error: Option<Error>,
}

impl RegistryBuilder {
    /// Add contract `C`, describing it through the metadata cache
    pub fn contract<C: Contract>(mut self) -> Self {
        match contract_metadata::<C>() {
            Ok(descriptor) => self.contracts.push(descriptor),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Add an already built contract descriptor
    pub fn contract_descriptor(mut self, descriptor: Arc<ContractDescriptor>) -> Self {
        self.contracts.push(descriptor);
        self
    }

    /// Add a convention; earlier conventions take precedence
    pub fn convention(mut self, convention: impl Convention + 'static) -> Self {
        self.conventions.push(Arc::new(convention));
        self
    }

    /// Validate and build the registry
    pub fn build(self) -> Result<ConventionRegistry> {
        if let Some(e) = self.error {
            return Err(e);
        }
        ConventionRegistry::register(self.contracts, self.conventions)
    }
}
