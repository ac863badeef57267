//! Order management: fleet-wide listing and status control.

use meridian_core::{Order, OrderId, OrderStatus, Page};
use serde::Deserialize;
use tracing::instrument;

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::query::ListQuery;
use crate::rest::AdminRest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    order: Option<Order>,
}

impl OrderEnvelope {
    fn into_order(self) -> Result<Order> {
        match (self.success, self.order) {
            (true, Some(order)) => Ok(order),
            _ => Err(AdminError::Rejected(self.message)),
        }
    }
}

/// Admin client for the order service.
#[derive(Debug, Clone)]
pub struct AdminOrderApi {
    rest: AdminRest,
}

impl AdminOrderApi {
    /// Create a client bound to the admin's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig, token: String) -> Result<Self> {
        Ok(Self {
            rest: AdminRest::new(
                config.order_service_url.clone(),
                token,
                config.request_timeout,
            )?,
        })
    }

    /// List orders across all customers. Filter by status with
    /// `query.filter("status", ...)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Order>> {
        self.rest.get_with("/api/orders", &query.to_query()).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Order> {
        let envelope: OrderEnvelope = self.rest.get(&format!("/api/orders/{id}")).await?;
        envelope.into_order()
    }

    /// Move an order to a new status.
    ///
    /// The status ladder is checked before the request goes out; the
    /// service enforces it again. Returns the updated order.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Rejected`] for a transition the ladder
    /// forbids, without calling the service.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn update_status(&self, order: &Order, new_status: OrderStatus) -> Result<Order> {
        if !order.order_status.can_transition_to(new_status) {
            return Err(AdminError::Rejected(format!(
                "Cannot change status from {} to {}",
                order.order_status.label(),
                new_status.label()
            )));
        }
        let body = serde_json::json!({ "status": new_status });
        let envelope: OrderEnvelope = self
            .rest
            .put(&format!("/api/orders/{}/status", order.id), &body)
            .await?;
        envelope.into_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 9,
            "userId": 12,
            "items": [],
            "orderStatus": serde_json::to_value(status).unwrap(),
            "shippingAddress": {
                "firstName": "Jane",
                "lastName": "Doe",
                "street": "123 Main St",
                "city": "New York",
                "country": "United States",
                "zipcode": "10001"
            },
            "totalAmount": "100",
            "finalAmount": "105"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn backwards_transition_is_rejected_locally() {
        let config = crate::config::AdminConfig::from_env().unwrap();
        let api = AdminOrderApi::new(&config, "token".into()).unwrap();
        let order = sample_order(OrderStatus::Shipped);

        let err = api
            .update_status(&order, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Rejected(m) if m == "Cannot change status from In Transit to Order Placed"
        ));
    }

    #[test]
    fn envelope_unwraps_order() {
        let envelope: OrderEnvelope = serde_json::from_value(serde_json::json!({
            "success": true,
            "message": "updated",
            "order": {
                "id": 9,
                "userId": 12,
                "items": [],
                "orderStatus": "CONFIRMED",
                "shippingAddress": {
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "street": "123 Main St",
                    "city": "New York",
                    "country": "United States",
                    "zipcode": "10001"
                },
                "totalAmount": "100",
                "finalAmount": "105"
            }
        }))
        .unwrap();
        let order = envelope.into_order().unwrap();
        assert_eq!(order.order_status, OrderStatus::Confirmed);
    }
}
