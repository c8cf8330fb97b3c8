use shared::errors::ServiceError;
use validator::{ValidationErrors, ValidationErrorsKind};

fn describe(field: &str, code: &str) -> String {
    match code {
        "email" => format!("{field}: invalid email format"),
        "length" => format!("{field}: invalid length"),
        "range" => format!("{field}: value out of range"),
        _ => format!("{field}: invalid value"),
    }
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    out.push(match &err.message {
                        Some(message) => message.to_string(),
                        None => describe(&path, &err.code),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

/// Flattens nested validator output into readable messages.
pub fn validation_error(errors: &ValidationErrors) -> ServiceError {
    let mut messages = Vec::new();
    collect("", errors, &mut messages);
    messages.sort();
    messages.dedup();

    if messages.is_empty() {
        messages.push("invalid request".into());
    }
    ServiceError::Validation(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requests::order::{CreateOrderItemRequest, CustomerRequest};
    use validator::Validate;

    #[test]
    fn field_messages_are_reported() {
        let req = CustomerRequest {
            name: String::new(),
            email: "not-an-email".into(),
            phone: None,
        };

        let err = validation_error(&req.validate().unwrap_err());

        match err {
            ServiceError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec![
                        "customer email is invalid".to_string(),
                        "customer name is required".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn item_errors_are_collected() {
        let item = CreateOrderItemRequest {
            product_id: "p1".into(),
            name: "Flower".into(),
            unit_price: -1,
            quantity: 0,
        };

        let err = validation_error(&item.validate().unwrap_err());
        assert!(matches!(err, ServiceError::Validation(m) if m.len() == 2));
    }
}
