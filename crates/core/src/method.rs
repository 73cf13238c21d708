//! Method and contract descriptors
//!
//! A contract is a declared set of builder methods targeting one model type.
//! Descriptors are built once when a contract is first seen and never change
//! afterwards; conventions match against them instead of against live calls.

use crate::error::{DescriptorError, Result};
use crate::schema::{FieldType, ModelSchema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a contract method hands back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnKind {
    /// The same builder instance, for fluent chaining
    Builder,
    /// A terminal result computed by the store
    Terminal,
}

/// Identity of one declared contract method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Name of the owning contract
    pub contract: String,
    /// Method name
    pub name: String,
    /// Parameter types in declaration order
    pub params: Vec<FieldType>,
    /// Return kind
    pub returns: ReturnKind,
}

impl MethodDescriptor {
    /// Describe a fluent method returning the builder
    pub fn fluent(
        contract: impl Into<String>,
        name: impl Into<String>,
        params: Vec<FieldType>,
    ) -> Self {
        Self {
            contract: contract.into(),
            name: name.into(),
            params,
            returns: ReturnKind::Builder,
        }
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The single parameter type, if the method takes exactly one argument
    pub fn single_param(&self) -> Option<&FieldType> {
        match self.params.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.contract, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// A contract: its name, target model and custom methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    /// Contract name
    pub name: String,
    /// Schema of the model the contract queries
    pub model: ModelSchema,
    /// Declared methods, in declaration order
    pub methods: Vec<MethodDescriptor>,
}

impl ContractDescriptor {
    /// Start describing a contract over `model`
    pub fn builder(name: impl Into<String>, model: ModelSchema) -> ContractDescriptorBuilder {
        ContractDescriptorBuilder {
            name: name.into(),
            model,
            methods: Vec::new(),
        }
    }

    /// Look up a declared method by name
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Builder for [`ContractDescriptor`]
#[derive(Debug)]
pub struct ContractDescriptorBuilder {
    name: String,
    model: ModelSchema,
    methods: Vec<(String, Vec<FieldType>)>,
}

impl ContractDescriptorBuilder {
    /// Declare a fluent method
    pub fn method(mut self, name: impl Into<String>, params: Vec<FieldType>) -> Self {
        self.methods.push((name.into(), params));
        self
    }

    /// Finish the descriptor
    ///
    /// Fails if two methods share a name: dispatch is by name, so
    /// overloads cannot be told apart.
    pub fn build(self) -> Result<ContractDescriptor> {
        let mut methods: Vec<MethodDescriptor> = Vec::with_capacity(self.methods.len());
        for (name, params) in self.methods {
            if methods.iter().any(|m| m.name == name) {
                return Err(DescriptorError::DuplicateMethod {
                    contract: self.name,
                    method: name,
                });
            }
            methods.push(MethodDescriptor::fluent(self.name.clone(), name, params));
        }
        Ok(ContractDescriptor {
            name: self.name,
            model: self.model,
            methods,
        })
    }
}
