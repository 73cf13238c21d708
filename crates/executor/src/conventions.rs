//! Standard conventions
//!
//! | Convention | Method shape | Emits |
//! |------------|--------------|-------|
//! | [`ByConvention`] | `by_<field>(value)`, value typed as the field | filter: field equals value |
//! | [`ContainsConvention`] | `<field>_contains(value)`, field is an array of the value's type | filter: field exists, is not null, and contains value |
//! | [`SetConvention`] | `set_<field>(value)`, value typed as the field | update: set field to value |

use quarry_core::{Filter, MethodDescriptor, ModelSchema, Update, Value};

use crate::convention::{Convention, ConventionError, Invocation};

/// Field named by `method` once `prefix`/`suffix` are stripped
fn field_name<'m>(method: &'m str, prefix: &str, suffix: &str) -> Option<&'m str> {
    let field = method.strip_prefix(prefix)?.strip_suffix(suffix)?;
    (!field.is_empty()).then_some(field)
}

/// `by_<field>(value)`: equality on a scalar or whole-value field
#[derive(Debug, Clone, Copy, Default)]
pub struct ByConvention;

impl ByConvention {
    const PREFIX: &'static str = "by_";
}

impl Convention for ByConvention {
    fn name(&self) -> &str {
        "by"
    }

    fn matches(&self, model: &ModelSchema, method: &MethodDescriptor) -> bool {
        let Some(field) = field_name(&method.name, Self::PREFIX, "") else {
            return false;
        };
        match (model.field_type(field), method.single_param()) {
            (Some(field_ty), Some(param_ty)) => field_ty == param_ty,
            _ => false,
        }
    }

    fn filter_fragment(&self, call: &Invocation<'_>) -> Result<Option<Filter>, ConventionError> {
        let field = field_name(&call.method.name, Self::PREFIX, "").ok_or_else(|| {
            ConventionError::InvalidArgument {
                method: call.method.name.clone(),
                reason: "method name does not follow by_<field>".to_string(),
            }
        })?;
        Ok(Some(Filter::eq(field, call.arg(0)?.clone())))
    }
}

/// `<field>_contains(value)`: membership in an array field
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsConvention;

impl ContainsConvention {
    const SUFFIX: &'static str = "_contains";
}

impl Convention for ContainsConvention {
    fn name(&self) -> &str {
        "contains"
    }

    fn matches(&self, model: &ModelSchema, method: &MethodDescriptor) -> bool {
        let Some(field) = field_name(&method.name, "", Self::SUFFIX) else {
            return false;
        };
        let element = model.field_type(field).and_then(|ty| ty.element());
        match (element, method.single_param()) {
            (Some(element_ty), Some(param_ty)) => element_ty == param_ty,
            _ => false,
        }
    }

    fn filter_fragment(&self, call: &Invocation<'_>) -> Result<Option<Filter>, ConventionError> {
        let field = field_name(&call.method.name, "", Self::SUFFIX).ok_or_else(|| {
            ConventionError::InvalidArgument {
                method: call.method.name.clone(),
                reason: "method name does not follow <field>_contains".to_string(),
            }
        })?;
        Ok(Some(Filter::and(vec![
            Filter::exists(field),
            Filter::ne(field, Value::Null),
            Filter::is_in(field, vec![call.arg(0)?.clone()]),
        ])))
    }
}

/// `set_<field>(value)`: update-only, contributes no criteria
#[derive(Debug, Clone, Copy, Default)]
pub struct SetConvention;

impl SetConvention {
    const PREFIX: &'static str = "set_";
}

impl Convention for SetConvention {
    fn name(&self) -> &str {
        "set"
    }

    fn matches(&self, model: &ModelSchema, method: &MethodDescriptor) -> bool {
        let Some(field) = field_name(&method.name, Self::PREFIX, "") else {
            return false;
        };
        match (model.field_type(field), method.single_param()) {
            (Some(field_ty), Some(param_ty)) => field_ty == param_ty,
            _ => false,
        }
    }

    fn filter_fragment(&self, _call: &Invocation<'_>) -> Result<Option<Filter>, ConventionError> {
        Ok(None)
    }

    fn update_fragment(&self, call: &Invocation<'_>) -> Result<Option<Update>, ConventionError> {
        let field = field_name(&call.method.name, Self::PREFIX, "").ok_or_else(|| {
            ConventionError::InvalidArgument {
                method: call.method.name.clone(),
                reason: "method name does not follow set_<field>".to_string(),
            }
        })?;
        Ok(Some(Update::new().set(field, call.arg(0)?.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::{json, Document, FieldType};

    fn company() -> ModelSchema {
        ModelSchema::new("Company")
            .field("id", FieldType::Int)
            .field("name", FieldType::String)
            .field("child_companies", FieldType::array(FieldType::Int))
    }

    fn method(name: &str, params: Vec<FieldType>) -> MethodDescriptor {
        MethodDescriptor::fluent("CompanyQuery", name, params)
    }

    #[test]
    fn test_by_matches_on_name_arity_and_type() {
        let model = company();
        assert!(ByConvention.matches(&model, &method("by_name", vec![FieldType::String])));
        assert!(ByConvention.matches(&model, &method("by_id", vec![FieldType::Int])));
        // wrong parameter type
        assert!(!ByConvention.matches(&model, &method("by_name", vec![FieldType::Int])));
        // unknown field
        assert!(!ByConvention.matches(&model, &method("by_email", vec![FieldType::String])));
        // wrong arity
        assert!(!ByConvention.matches(&model, &method("by_name", vec![])));
        assert!(!ByConvention.matches(
            &model,
            &method("by_name", vec![FieldType::String, FieldType::String])
        ));
        // no field after prefix
        assert!(!ByConvention.matches(&model, &method("by_", vec![FieldType::String])));
    }

    #[test]
    fn test_by_emits_equality() {
        let m = method("by_name", vec![FieldType::String]);
        let args = [json!("Test One")];
        let filter = ByConvention
            .filter_fragment(&Invocation::new(&m, &args))
            .unwrap();
        assert_eq!(filter, Some(Filter::eq("name", "Test One")));
        assert_eq!(
            ByConvention.update_fragment(&Invocation::new(&m, &args)).unwrap(),
            None
        );
    }

    #[test]
    fn test_contains_matches_element_type() {
        let model = company();
        assert!(ContainsConvention.matches(
            &model,
            &method("child_companies_contains", vec![FieldType::Int])
        ));
        assert!(!ContainsConvention.matches(
            &model,
            &method("child_companies_contains", vec![FieldType::String])
        ));
        // scalar field has no element type
        assert!(!ContainsConvention.matches(&model, &method("name_contains", vec![FieldType::String])));
    }

    #[test]
    fn test_contains_fragment_requires_presence() {
        let m = method("child_companies_contains", vec![FieldType::Int]);
        let args = [json!(1)];
        let filter = ContainsConvention
            .filter_fragment(&Invocation::new(&m, &args))
            .unwrap()
            .unwrap();

        let with: Document = serde_json::from_value(json!({"child_companies": [1, 2]})).unwrap();
        let without: Document = serde_json::from_value(json!({"child_companies": [2]})).unwrap();
        let null: Document = serde_json::from_value(json!({"child_companies": null})).unwrap();
        let missing = Document::new();
        assert!(filter.matches(&with));
        assert!(!filter.matches(&without));
        assert!(!filter.matches(&null));
        assert!(!filter.matches(&missing));
    }

    #[test]
    fn test_set_emits_update_only() {
        let m = method("set_name", vec![FieldType::String]);
        let args = [json!("renamed")];
        let call = Invocation::new(&m, &args);
        assert!(SetConvention.matches(&company(), &m));
        assert_eq!(SetConvention.filter_fragment(&call).unwrap(), None);
        assert_eq!(
            SetConvention.update_fragment(&call).unwrap(),
            Some(Update::new().set("name", "renamed"))
        );
    }

    #[test]
    fn test_missing_argument_is_reported() {
        let m = method("by_name", vec![FieldType::String]);
        let err = ByConvention
            .filter_fragment(&Invocation::new(&m, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            ConventionError::MissingArgument {
                method: "by_name".to_string(),
                index: 0
            }
        );
    }
}
