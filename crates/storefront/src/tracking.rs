//! Order tracking timeline.
//!
//! The order service stores only the current status, so the tracking
//! view synthesizes a plausible event history from the order date and
//! the status ladder. Timestamps are fixed offsets from the order date;
//! the history is truncated at the order's current status.

use chrono::{DateTime, Duration, Utc};

use meridian_core::{Order, OrderStatus};

/// One event in an order's tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingEvent {
    pub status: OrderStatus,
    pub description: &'static str,
    /// Where the event happened; the delivery event uses the shipping
    /// city.
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// The full tracking view for one order.
#[derive(Debug, Clone)]
pub struct OrderTracking {
    pub current_status: OrderStatus,
    pub events: Vec<TrackingEvent>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Build the tracking view for an order. Returns `None` when the order
/// has no creation date to anchor the timeline.
#[must_use]
pub fn track(order: &Order) -> Option<OrderTracking> {
    let placed_at = order.created_at?;
    Some(OrderTracking {
        current_status: order.order_status,
        events: history(order, placed_at),
        estimated_delivery: estimated_delivery(order.order_status, placed_at),
    })
}

/// Synthesize the event history up to the order's current status.
///
/// A cancelled order shows only the placement event.
#[must_use]
pub fn history(order: &Order, placed_at: DateTime<Utc>) -> Vec<TrackingEvent> {
    let mut events = vec![TrackingEvent {
        status: OrderStatus::Pending,
        description: "Order placed successfully",
        location: "Online".to_string(),
        timestamp: placed_at,
    }];

    if order.order_status == OrderStatus::Cancelled {
        return events;
    }

    let ladder = [
        (
            OrderStatus::Confirmed,
            "Order confirmed and payment processed",
            "Processing Center",
            Duration::minutes(30),
        ),
        (
            OrderStatus::Processing,
            "Order is being prepared for shipment",
            "Fulfillment Center",
            Duration::days(1),
        ),
        (
            OrderStatus::Shipped,
            "Package shipped and in transit",
            "Distribution Hub",
            Duration::days(2),
        ),
    ];

    for (status, description, location, offset) in ladder {
        if !reached(order.order_status, status) {
            break;
        }
        events.push(TrackingEvent {
            status,
            description,
            location: location.to_string(),
            timestamp: placed_at + offset,
        });
    }

    if order.order_status == OrderStatus::Delivered {
        events.push(TrackingEvent {
            status: OrderStatus::Delivered,
            description: "Package delivered successfully",
            location: order.shipping_address.city.clone(),
            timestamp: placed_at + Duration::days(5),
        });
    }

    events
}

/// Estimated delivery date for an order placed at `placed_at`.
/// Delivered orders estimate their placement-relative delivery date;
/// cancelled orders have none.
#[must_use]
pub fn estimated_delivery(
    status: OrderStatus,
    placed_at: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let days = match status {
        OrderStatus::Cancelled => return None,
        OrderStatus::Delivered => 0,
        OrderStatus::Shipped => 2,
        OrderStatus::Processing => 4,
        OrderStatus::Pending | OrderStatus::Confirmed => 5,
    };
    Some(placed_at + Duration::days(days))
}

fn reached(current: OrderStatus, milestone: OrderStatus) -> bool {
    rank(current) >= rank(milestone)
}

const fn rank(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Pending => 0,
        OrderStatus::Confirmed => 1,
        OrderStatus::Processing => 2,
        OrderStatus::Shipped => 3,
        OrderStatus::Delivered => 4,
        OrderStatus::Cancelled => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 1,
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
            "finalAmount": "105",
            "createdAt": "2026-08-01T12:00:00Z"
        }))
        .unwrap()
    }

    fn placed_at() -> DateTime<Utc> {
        "2026-08-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn pending_order_has_only_placement() {
        let events = history(&sample_order(OrderStatus::Pending), placed_at());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Order placed successfully");
        assert_eq!(events[0].location, "Online");
    }

    #[test]
    fn shipped_order_stops_at_transit() {
        let events = history(&sample_order(OrderStatus::Shipped), placed_at());
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].timestamp, placed_at() + Duration::minutes(30));
        assert_eq!(events[2].timestamp, placed_at() + Duration::days(1));
        assert_eq!(events[3].description, "Package shipped and in transit");
        assert_eq!(events[3].location, "Distribution Hub");
    }

    #[test]
    fn delivered_order_ends_in_shipping_city() {
        let events = history(&sample_order(OrderStatus::Delivered), placed_at());
        assert_eq!(events.len(), 5);
        let last = events.last().unwrap();
        assert_eq!(last.location, "New York");
        assert_eq!(last.timestamp, placed_at() + Duration::days(5));
    }

    #[test]
    fn cancelled_order_keeps_placement_only() {
        let events = history(&sample_order(OrderStatus::Cancelled), placed_at());
        assert_eq!(events.len(), 1);
        assert_eq!(
            estimated_delivery(OrderStatus::Cancelled, placed_at()),
            None
        );
    }

    #[test]
    fn estimates_count_from_order_date() {
        let at = placed_at();
        assert_eq!(
            estimated_delivery(OrderStatus::Pending, at),
            Some(at + Duration::days(5))
        );
        assert_eq!(
            estimated_delivery(OrderStatus::Processing, at),
            Some(at + Duration::days(4))
        );
        assert_eq!(
            estimated_delivery(OrderStatus::Shipped, at),
            Some(at + Duration::days(2))
        );
        assert_eq!(estimated_delivery(OrderStatus::Delivered, at), Some(at));
    }

    #[test]
    fn track_requires_a_creation_date() {
        let mut order = sample_order(OrderStatus::Shipped);
        order.created_at = None;
        assert!(track(&order).is_none());

        let view = track(&sample_order(OrderStatus::Shipped)).unwrap();
        assert_eq!(view.current_status, OrderStatus::Shipped);
        assert_eq!(view.events.len(), 4);
    }
}
