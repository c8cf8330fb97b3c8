use crate::{
    domain::requests::order::CreateOrderRequest,
    model::order::{OrderItem, Totals},
};
use shared::errors::ServiceError;

fn overflow() -> ServiceError {
    ServiceError::validation("order amounts are out of range")
}

/// Server-side pricing of a create request. All amounts are minor units.
pub fn compute_totals(req: &CreateOrderRequest) -> Result<(Vec<OrderItem>, Totals), ServiceError> {
    let items: Vec<OrderItem> = req
        .items
        .iter()
        .map(|item| OrderItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
        })
        .collect();

    let subtotal = items.iter().try_fold(0i64, |acc, item| {
        item.line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(overflow)
    })?;

    let total = subtotal
        .checked_add(req.tax)
        .and_then(|v| v.checked_add(req.shipping))
        .and_then(|v| v.checked_sub(req.discount))
        .ok_or_else(overflow)?;

    if total < 0 {
        return Err(ServiceError::validation(
            "discount must not exceed the order amount",
        ));
    }

    if let Some(client_total) = req.total {
        if client_total != total {
            return Err(ServiceError::validation(format!(
                "total {client_total} does not match computed total {total}"
            )));
        }
    }

    Ok((
        items,
        Totals {
            subtotal,
            tax: req.tax,
            shipping: req.shipping,
            discount: req.discount,
            total,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::requests::order::{CreateOrderItemRequest, CustomerRequest},
        model::order::Address,
    };

    fn request(total: Option<i64>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer: CustomerRequest {
                name: "Ada".into(),
                email: "a@b.com".into(),
                phone: None,
            },
            items: vec![CreateOrderItemRequest {
                product_id: "flower-35".into(),
                name: "Flower 3.5g".into(),
                unit_price: 40,
                quantity: 2,
            }],
            shipping_address: Address {
                line1: "1 Main St".into(),
                line2: None,
                city: "Springfield".into(),
                state: None,
                postal_code: "12345".into(),
                country: "US".into(),
            },
            billing_address: None,
            tax: 8,
            shipping: 5,
            discount: 0,
            total,
            notes: None,
        }
    }

    #[test]
    fn totals_add_tax_and_shipping() {
        let (items, totals) = compute_totals(&request(None)).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(
            totals,
            Totals {
                subtotal: 80,
                tax: 8,
                shipping: 5,
                discount: 0,
                total: 93,
            }
        );
    }

    #[test]
    fn matching_client_total_is_accepted() {
        assert!(compute_totals(&request(Some(93))).is_ok());
    }

    #[test]
    fn mismatched_client_total_is_rejected() {
        let err = compute_totals(&request(Some(90))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn discount_above_amount_is_rejected() {
        let mut req = request(None);
        req.discount = 1_000;
        assert!(matches!(
            compute_totals(&req),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn overflowing_line_is_rejected() {
        let mut req = request(None);
        req.items[0].unit_price = i64::MAX;
        assert!(matches!(
            compute_totals(&req),
            Err(ServiceError::Validation(_))
        ));
    }
}
