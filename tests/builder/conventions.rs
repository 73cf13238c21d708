//! Application-defined conventions plugged into the registry.

use std::sync::Arc;

use crate::*;

/// `<field>_is_not(value)`: the field differs from `value` or is missing
struct IsNotConvention;

impl IsNotConvention {
    const SUFFIX: &'static str = "_is_not";
}

impl Convention for IsNotConvention {
    fn name(&self) -> &str {
        "is_not"
    }

    fn matches(&self, model: &ModelSchema, method: &MethodDescriptor) -> bool {
        let Some(field) = method.name.strip_suffix(Self::SUFFIX) else {
            return false;
        };
        match (model.field_type(field), method.single_param()) {
            (Some(field_ty), Some(param_ty)) => field_ty == param_ty,
            _ => false,
        }
    }

    fn filter_fragment(
        &self,
        call: &Invocation<'_>,
    ) -> std::result::Result<Option<Filter>, ConventionError> {
        let field = call.method.name.trim_end_matches(Self::SUFFIX);
        Ok(Some(Filter::ne(field, call.arg(0)?.clone())))
    }
}

/// `adopt_<field>(value)`: appends `value` to an array field, no criteria
struct AdoptConvention;

impl Convention for AdoptConvention {
    fn name(&self) -> &str {
        "adopt"
    }

    fn matches(&self, model: &ModelSchema, method: &MethodDescriptor) -> bool {
        let Some(field) = method.name.strip_prefix("adopt_") else {
            return false;
        };
        let element = model.field_type(field).and_then(FieldType::element);
        matches!((element, method.single_param()), (Some(e), Some(p)) if e == p)
    }

    fn filter_fragment(
        &self,
        _call: &Invocation<'_>,
    ) -> std::result::Result<Option<Filter>, ConventionError> {
        Ok(None)
    }

    fn update_fragment(
        &self,
        call: &Invocation<'_>,
    ) -> std::result::Result<Option<Update>, ConventionError> {
        let field = call.method.name.trim_start_matches("adopt_");
        Ok(Some(Update::new().push(field, call.arg(0)?.clone())))
    }
}

query_contract! {
    pub struct FamilyQuery for Company {
        fn by_name(name: &str);
        fn name_is_not(name: &str);
        fn adopt_child_companies(id: i64);
    }
}

fn family_repository() -> Repository<FamilyQuery> {
    let registry = Arc::new(
        ConventionRegistry::builder()
            .contract::<FamilyQuery>()
            .convention(ByConvention)
            .convention(IsNotConvention)
            .convention(AdoptConvention)
            .build()
            .unwrap(),
    );
    let provider = MemoryRepositoryProvider::new();
    let repo: Repository<FamilyQuery> = provider
        .create_repository(RepositoryConfig::new("testdata", "family"), registry)
        .unwrap();
    for company in test_data::load_companies() {
        repo.save(&company).unwrap();
    }
    repo
}

#[test]
fn test_custom_filter_convention() {
    let repo = family_repository();

    let others = repo
        .builder()
        .unwrap()
        .name_is_not("Acme")
        .unwrap()
        .get_all(false)
        .unwrap();
    assert_eq!(ids(&others), [2, 3, 4, 5, 6]);
}

#[test]
fn test_custom_update_convention() {
    let repo = family_repository();

    let adopted = repo
        .builder()
        .unwrap()
        .by_name("Acme Gadgets")
        .unwrap()
        .adopt_child_companies(6)
        .unwrap()
        .update_all(false)
        .unwrap();
    assert_eq!(adopted, 1);

    let gadgets = repo
        .builder()
        .unwrap()
        .by_name("Acme Gadgets")
        .unwrap()
        .get_one()
        .unwrap()
        .unwrap();
    assert_eq!(gadgets.child_companies, Some(vec![6]));
}

#[test]
fn test_missing_custom_convention_fails_registration() {
    let result = ConventionRegistry::builder()
        .contract::<FamilyQuery>()
        .convention(ByConvention)
        .convention(IsNotConvention)
        .build();

    match result {
        Err(Error::NoMatchingConvention { method }) => {
            assert_eq!(method.name, "adopt_child_companies");
            assert_eq!(
                method.to_string(),
                "FamilyQuery::adopt_child_companies(int)"
            );
        }
        other => panic!("expected NoMatchingConvention, got {other:?}"),
    }
}

#[test]
fn test_registry_shared_between_contracts() {
    let registry = Arc::new(
        ConventionRegistry::builder()
            .contract::<CompanyQuery>()
            .contract::<FamilyQuery>()
            .convention(ByConvention)
            .convention(ContainsConvention)
            .convention(SetConvention)
            .convention(IsNotConvention)
            .convention(AdoptConvention)
            .build()
            .unwrap(),
    );

    assert!(registry.is_registered::<CompanyQuery>());
    assert!(registry.is_registered::<FamilyQuery>());
    assert_eq!(
        registry.binding("FamilyQuery", "name_is_not").unwrap().name(),
        "is_not"
    );
    assert_eq!(
        registry.binding("CompanyQuery", "by_id").unwrap().name(),
        "by"
    );
}
