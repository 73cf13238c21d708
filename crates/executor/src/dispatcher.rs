//! Call routing for builder instances.
//!
//! Every call on a builder arrives here as a method name plus arguments.
//! Built-in names are decoded into a [`Command`] and run by the
//! [`QueryExecutor`]. Any other name must be a method the contract declares;
//! its bound convention turns the call into fragments which are appended to
//! the caller's session.
//!
//! Errors raised by a convention reach the caller as the convention's own
//! [`ConventionError`](crate::ConventionError), and store errors as the
//! store's own [`StoreError`](quarry_storage::StoreError).

use std::sync::Arc;

use quarry_core::{ContractDescriptor, MethodDescriptor, Value};
use tracing::debug;

use crate::command::{BuiltinMethod, Command};
use crate::convention::Invocation;
use crate::executor::QueryExecutor;
use crate::registry::ConventionRegistry;
use crate::session::FragmentAccumulator;
use crate::{Error, Output, Result};

/// Routes builder calls to the executor or to bound conventions
///
/// Holds no per-call state. A dispatcher is created for each builder, but
/// everything it points at is shared.
#[derive(Clone)]
pub struct Dispatcher {
    contract: Arc<ContractDescriptor>,
    registry: Arc<ConventionRegistry>,
    executor: QueryExecutor,
}

impl Dispatcher {
    /// Create a dispatcher for one contract
    pub fn new(
        contract: Arc<ContractDescriptor>,
        registry: Arc<ConventionRegistry>,
        executor: QueryExecutor,
    ) -> Self {
        Self {
            contract,
            registry,
            executor,
        }
    }

    /// The contract this dispatcher serves
    pub fn contract(&self) -> &ContractDescriptor {
        &self.contract
    }

    /// The executor running terminal operations
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Route one call by method name
    ///
    /// Custom methods return [`Output::Builder`] after extending `session`.
    pub fn dispatch(
        &self,
        session: &mut FragmentAccumulator,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Output> {
        if let Some(builtin) = BuiltinMethod::from_name(method) {
            let command = Command::parse(builtin, &args)?;
            return self.execute(command, session);
        }

        let descriptor =
            self.contract
                .method(method)
                .ok_or_else(|| Error::UnknownMethod {
                    contract: self.contract.name.clone(),
                    method: method.to_string(),
                })?;
        check_arguments(descriptor, &args)?;

        let convention = self
            .registry
            .binding(&self.contract.name, method)
            .ok_or_else(|| Error::UnboundMethod {
                contract: self.contract.name.clone(),
                method: method.to_string(),
            })?;

        let call = Invocation::new(descriptor, &args);
        let filter = convention.filter_fragment(&call)?;
        let update = convention.update_fragment(&call)?;

        debug!(
            target: "quarry::executor",
            method = %descriptor,
            convention = convention.name(),
            filter = filter.is_some(),
            update = update.is_some(),
            "Dispatched"
        );

        // Both emits succeeded; only now touch the session.
        if let Some(filter) = filter {
            session.add_filter(filter);
        }
        if let Some(update) = update {
            session.add_update(update);
        }
        Ok(Output::Builder)
    }

    /// Run a built-in command over `session`
    pub fn execute(&self, command: Command, session: &FragmentAccumulator) -> Result<Output> {
        self.executor.execute(command, session)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("contract", &self.contract.name)
            .finish_non_exhaustive()
    }
}

/// Arity and type agreement between `args` and the declared parameters
fn check_arguments(method: &MethodDescriptor, args: &[Value]) -> Result<()> {
    if args.len() != method.arity() {
        return Err(Error::InvalidArguments {
            method: method.to_string(),
            reason: format!("expected {} arguments, got {}", method.arity(), args.len()),
        });
    }
    for (index, (param, arg)) in method.params.iter().zip(args).enumerate() {
        if !param.accepts(arg) {
            return Err(Error::InvalidArguments {
                method: method.to_string(),
                reason: format!("argument {} must be {}, got {}", index, param, arg),
            });
        }
    }
    Ok(())
}
