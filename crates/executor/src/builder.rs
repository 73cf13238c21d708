//! Builders and contracts
//!
//! A contract is a struct wrapping a [`QueryBuilder`] with one typed method
//! per declared custom method. Contracts are normally declared with
//! [`query_contract!`](crate::query_contract), which generates the struct,
//! its descriptor and the forwarding methods:
//!
//! ```ignore
//! query_contract! {
//!     pub struct CompanyQuery for Company {
//!         fn by_name(name: &str);
//!         fn child_companies_contains(id: i64);
//!     }
//! }
//!
//! let found = repository
//!     .builder()?
//!     .by_name("Test One")?
//!     .get_all(false)?;
//! ```
//!
//! Custom methods consume and return the contract so calls chain. The
//! built-in terminal surface is reached through `Deref` to the builder.

use std::marker::PhantomData;
use std::sync::Arc;

use quarry_core::{ContractDescriptor, DescriptorError, Model, Value};
use quarry_storage::DocumentStore;
use serde::Serialize;

use crate::command::Command;
use crate::dispatcher::Dispatcher;
use crate::executor::QueryExecutor;
use crate::queryable::Queryable;
use crate::registry::ConventionRegistry;
use crate::session::FragmentAccumulator;
use crate::{Output, RepositoryConfig, Result};

/// A declared query-builder contract
pub trait Contract: Sized + 'static {
    /// Model type the contract queries
    type Model: Model;

    /// Contract name, unique within a registry
    const NAME: &'static str;

    /// Static description of the contract's custom methods
    fn describe() -> std::result::Result<ContractDescriptor, DescriptorError>;

    /// Wrap a freshly wired builder
    fn from_builder(builder: QueryBuilder<Self::Model>) -> Self;

    /// The underlying builder
    fn builder(&self) -> &QueryBuilder<Self::Model>;

    /// The underlying builder, mutably
    fn builder_mut(&mut self) -> &mut QueryBuilder<Self::Model>;
}

/// One live builder: a dispatcher plus its private session
///
/// Fragments accumulate across calls and are never cleared, so several
/// terminal calls on one builder all see the same criteria.
pub struct QueryBuilder<M> {
    dispatcher: Dispatcher,
    session: FragmentAccumulator,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> QueryBuilder<M> {
    /// Create a builder with an empty session
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            session: FragmentAccumulator::new(),
            _model: PhantomData,
        }
    }

    /// Invoke a method by name with JSON arguments
    ///
    /// Custom methods extend the session and return [`Output::Builder`];
    /// built-in names run the terminal operation.
    pub fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Output> {
        self.dispatcher.dispatch(&mut self.session, method, args)
    }

    /// Fragments accumulated so far
    pub fn session(&self) -> &FragmentAccumulator {
        &self.session
    }

    /// The contract this builder serves
    pub fn contract(&self) -> &ContractDescriptor {
        self.dispatcher.contract()
    }

    /// Remove every matching document
    pub fn delete_all(&self, allow_without_criteria: bool) -> Result<u64> {
        self.run(Command::DeleteAll {
            allow: allow_without_criteria,
        })?
        .into_count()
    }

    /// Remove at most one matching document
    pub fn delete_one(&self, allow_without_criteria: bool) -> Result<bool> {
        self.run(Command::DeleteOne {
            allow: allow_without_criteria,
        })?
        .into_bool()
    }

    /// Apply the accumulated updates to every matching document
    pub fn update_all(&self, allow_without_criteria: bool) -> Result<u64> {
        self.run(Command::UpdateAll {
            allow: allow_without_criteria,
        })?
        .into_count()
    }

    /// Apply the accumulated updates to the first matching document
    pub fn update_one(&self, allow_without_criteria: bool) -> Result<bool> {
        self.run(Command::UpdateOne {
            allow: allow_without_criteria,
        })?
        .into_bool()
    }

    /// Every matching model
    pub fn get_all(&self, allow_without_criteria: bool) -> Result<Vec<M>> {
        self.run(Command::GetAll {
            allow: allow_without_criteria,
        })?
        .into_models()
    }

    /// At most `limit` matching models; all of them when `limit < 1`
    pub fn get_some(&self, limit: i64, allow_without_criteria: bool) -> Result<Vec<M>> {
        self.run(Command::GetSome {
            limit,
            allow: allow_without_criteria,
        })?
        .into_models()
    }

    /// The first matching model
    pub fn get_one(&self) -> Result<Option<M>> {
        self.run(Command::GetOne)?.into_model()
    }

    /// Reduce the matching models with `transform`
    pub fn queryable<T>(&self, transform: impl FnOnce(Queryable<M>) -> T) -> Result<T> {
        self.dispatcher
            .executor()
            .queryable(&self.session, transform)
    }

    /// Build a sequence over the matching models with `transform`
    pub fn queryable_many<I>(&self, transform: impl FnOnce(Queryable<M>) -> I) -> Result<I>
    where
        I: Iterator<Item = M>,
    {
        self.dispatcher
            .executor()
            .queryable_many(&self.session, transform)
    }

    fn run(&self, command: Command) -> Result<Output> {
        self.dispatcher.execute(command, &self.session)
    }
}

impl<M> std::fmt::Debug for QueryBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("dispatcher", &self.dispatcher)
            .field("session", &self.session)
            .finish()
    }
}

/// Wires a fresh builder for a contract
#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderFactory;

impl BuilderFactory {
    /// Produce an independent builder for contract `C`
    ///
    /// Fails with [`Error::NotRegistered`](crate::Error::NotRegistered)
    /// unless `registry` validated `C`. The session is new and shared with
    /// nothing.
    pub fn create<C: Contract>(
        registry: &Arc<ConventionRegistry>,
        store: Arc<dyn DocumentStore>,
        config: Arc<RepositoryConfig>,
    ) -> Result<C> {
        let contract = registry.resolve::<C>()?;
        let executor = QueryExecutor::new(store, config);
        let dispatcher = Dispatcher::new(contract, Arc::clone(registry), executor);
        Ok(C::from_builder(QueryBuilder::new(dispatcher)))
    }
}

#[doc(hidden)]
pub fn __to_arg<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Declare a query-builder contract
///
/// Generates the contract struct, its [`Contract`] impl, one chaining
/// method per declared custom method, `Debug`, and `Deref` to
/// [`QueryBuilder`].
/// Parameter types must implement [`FieldKind`](quarry_core::FieldKind)
/// and `Serialize`.
#[macro_export]
macro_rules! query_contract {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident for $model:ty {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident($($arg:ident: $ty:ty),* $(,)?);
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            builder: $crate::QueryBuilder<$model>,
        }

        impl $crate::Contract for $name {
            type Model = $model;

            const NAME: &'static str = stringify!($name);

            fn describe(
            ) -> ::std::result::Result<$crate::ContractDescriptor, $crate::DescriptorError> {
                $crate::ContractDescriptor::builder(
                    stringify!($name),
                    <$model as $crate::Model>::schema(),
                )
                $(
                    .method(
                        stringify!($method),
                        vec![$(<$ty as $crate::FieldKind>::field_type()),*],
                    )
                )*
                .build()
            }

            fn from_builder(builder: $crate::QueryBuilder<$model>) -> Self {
                Self { builder }
            }

            fn builder(&self) -> &$crate::QueryBuilder<$model> {
                &self.builder
            }

            fn builder_mut(&mut self) -> &mut $crate::QueryBuilder<$model> {
                &mut self.builder
            }
        }

        impl $name {
            $(
                $(#[$method_meta])*
                pub fn $method(mut self, $($arg: $ty),*) -> $crate::Result<Self> {
                    self.builder
                        .invoke(stringify!($method), vec![$($crate::__to_arg(&$arg)?),*])?;
                    Ok(self)
                }
            )*
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("builder", &self.builder)
                    .finish()
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::QueryBuilder<$model>;

            fn deref(&self) -> &Self::Target {
                &self.builder
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.builder
            }
        }
    };
}
