//! Order lifecycle.
//!
//! An order is placed unpaid with the initial status. The payment callback
//! either marks it paid or, when the payment failed, deletes it while it is
//! still unpaid. The status is free text that any authenticated caller may
//! overwrite, independent of payment.

use thiserror::Error;

use food_delivery_core::{Amount, OrderId, OrderStatus, UserId};

use super::cart::{CartError, CartService};
use crate::db::{OrderStore, RepositoryError, UserStore};
use crate::models::{DeliveryAddress, NewOrder, Order, OrderItem};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("order not found")]
    NotFound,

    #[error("user not found")]
    UserNotFound,

    /// A failed-payment callback arrived for an order that is already paid.
    #[error("order is already paid")]
    AlreadyPaid,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<CartError> for OrderError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::UserNotFound => Self::UserNotFound,
            CartError::Repository(e) => Self::Repository(e),
            CartError::MissingItemId | CartError::InvalidQuantity => Self::Validation(e.to_string()),
        }
    }
}

/// What the client sends to place an order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub items: Vec<OrderItem>,
    pub amount: Amount,
    pub address: DeliveryAddress,
}

/// A newly placed order and where the payment page sends the customer next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of a payment callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Paid,
    Cancelled,
}

pub struct OrderService<'a> {
    orders: &'a dyn OrderStore,
    users: &'a dyn UserStore,
    frontend_url: &'a str,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(
        orders: &'a dyn OrderStore,
        users: &'a dyn UserStore,
        frontend_url: &'a str,
    ) -> Self {
        Self {
            orders,
            users,
            frontend_url,
        }
    }

    /// Create an unpaid order from the request and empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty item list, a zero
    /// quantity, a blank item id or blank address fields, and
    /// `OrderError::UserNotFound` if the user no longer exists.
    pub async fn place(
        &self,
        user_id: UserId,
        request: PlaceOrder,
    ) -> Result<PlacedOrder, OrderError> {
        validate_items(&request.items)?;
        let address = normalize_address(request.address)?;

        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(OrderError::UserNotFound);
        }

        let order = self
            .orders
            .insert(NewOrder {
                user_id,
                items: request.items,
                amount: request.amount,
                address,
            })
            .await?;

        CartService::new(self.users).clear(user_id).await?;

        tracing::info!(order_id = %order.id, %user_id, amount = %order.amount, "Order placed");

        Ok(PlacedOrder {
            order_id: order.id,
            success_url: self.checkout_url(order.id, true),
            cancel_url: self.checkout_url(order.id, false),
        })
    }

    /// Apply the payment provider's verdict.
    ///
    /// Success marks the order paid and may be repeated. Failure deletes the
    /// order while it is unpaid.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown id and
    /// `OrderError::AlreadyPaid` for a failure callback on a paid order.
    pub async fn verify(
        &self,
        order_id: OrderId,
        success: bool,
    ) -> Result<Verification, OrderError> {
        if success {
            self.orders
                .mark_paid(order_id)
                .await?
                .ok_or(OrderError::NotFound)?;
            tracing::info!(%order_id, "Payment confirmed");
            return Ok(Verification::Paid);
        }

        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;
        if order.payment {
            return Err(OrderError::AlreadyPaid);
        }
        if !self.orders.delete_unpaid(order_id).await? {
            // Paid or deleted since the read above
            return match self.orders.get(order_id).await? {
                Some(_) => Err(OrderError::AlreadyPaid),
                None => Err(OrderError::NotFound),
            };
        }

        tracing::info!(%order_id, "Unpaid order cancelled");
        Ok(Verification::Cancelled)
    }

    /// Overwrite the order status with any non-blank text.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for a blank status and
    /// `OrderError::NotFound` for an unknown id.
    pub async fn update_status(&self, order_id: OrderId, status: &str) -> Result<Order, OrderError> {
        let status = OrderStatus::parse(status).map_err(|e| OrderError::Validation(e.to_string()))?;

        let order = self
            .orders
            .update_status(order_id, &status)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !status.is_well_known() {
            tracing::debug!(%order_id, status = %status, "Custom order status");
        }
        tracing::info!(%order_id, status = %order.status, "Order status updated");
        Ok(order)
    }

    /// Orders placed by one user.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// Every order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_all().await?)
    }

    /// One order, visible only to the user who placed it.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist or belongs
    /// to someone else.
    pub async fn get(&self, user_id: UserId, order_id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .get(order_id)
            .await?
            .filter(|order| order.user_id == user_id)
            .ok_or(OrderError::NotFound)
    }

    fn checkout_url(&self, order_id: OrderId, success: bool) -> String {
        format!(
            "{}/verify?success={success}&orderId={order_id}",
            self.frontend_url
        )
    }
}

fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation("order has no items".to_owned()));
    }
    for item in items {
        if item.item_id.trim().is_empty() {
            return Err(OrderError::Validation("item id is required".to_owned()));
        }
        if item.quantity == 0 {
            return Err(OrderError::Validation(format!(
                "quantity for {} must be at least 1",
                item.item_id
            )));
        }
    }
    Ok(())
}

fn normalize_address(address: DeliveryAddress) -> Result<DeliveryAddress, OrderError> {
    let field = |name: &str, value: String| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(OrderError::Validation(format!("address {name} is required")))
        } else {
            Ok(trimmed.to_owned())
        }
    };

    Ok(DeliveryAddress {
        name: field("name", address.name)?,
        phone: field("phone", address.phone)?,
        address: field("address", address.address)?,
        email: address.email,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use food_delivery_core::{Cart, Email};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::NewUser;

    const FRONTEND: &str = "http://localhost:5173";

    async fn user(store: &MemoryStore) -> UserId {
        let user = store
            .create(NewUser {
                name: "Jane".to_string(),
                email: Email::parse("jane@example.com").unwrap(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let mut cart = Cart::new();
        cart.add("pizza", 2);
        store.set_cart(user.id, &cart).await.unwrap();
        user.id
    }

    fn request() -> PlaceOrder {
        PlaceOrder {
            items: vec![OrderItem {
                item_id: "pizza".to_string(),
                quantity: 2,
                name: Some("Pizza".to_string()),
                price: Some(Decimal::new(1200, 2)),
            }],
            amount: Amount::new(Decimal::new(2400, 2)).unwrap(),
            address: DeliveryAddress {
                name: "Jane".to_string(),
                email: Email::parse("jane@example.com").unwrap(),
                phone: "555-0100".to_string(),
                address: "1 Main St".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_place_then_verify_success() {
        let store = MemoryStore::new();
        let id = user(&store).await;
        let service = OrderService::new(&store, &store, FRONTEND);

        let placed = service.place(id, request()).await.unwrap();
        assert_eq!(
            placed.success_url,
            format!("{FRONTEND}/verify?success=true&orderId={}", placed.order_id)
        );
        assert_eq!(
            placed.cancel_url,
            format!("{FRONTEND}/verify?success=false&orderId={}", placed.order_id)
        );
        assert!(store.get_cart(id).await.unwrap().is_empty());

        assert_eq!(
            service.verify(placed.order_id, true).await.unwrap(),
            Verification::Paid
        );
        // Repeated success callbacks are harmless.
        service.verify(placed.order_id, true).await.unwrap();

        let order = service.get(id, placed.order_id).await.unwrap();
        assert!(order.payment);
        assert_eq!(order.items, request().items);
        assert_eq!(order.amount, request().amount);
        assert_eq!(order.status.as_str(), OrderStatus::FOOD_PROCESSING);
    }

    #[tokio::test]
    async fn test_verify_failure_deletes_unpaid_only() {
        let store = MemoryStore::new();
        let id = user(&store).await;
        let service = OrderService::new(&store, &store, FRONTEND);

        let unpaid = service.place(id, request()).await.unwrap().order_id;
        assert_eq!(
            service.verify(unpaid, false).await.unwrap(),
            Verification::Cancelled
        );
        assert!(matches!(
            service.get(id, unpaid).await,
            Err(OrderError::NotFound)
        ));

        let paid = service.place(id, request()).await.unwrap().order_id;
        service.verify(paid, true).await.unwrap();
        assert!(matches!(
            service.verify(paid, false).await,
            Err(OrderError::AlreadyPaid)
        ));
        assert!(service.get(id, paid).await.unwrap().payment);
    }

    #[tokio::test]
    async fn test_amount_keeps_every_decimal_place() {
        let store = MemoryStore::new();
        let id = user(&store).await;
        let service = OrderService::new(&store, &store, FRONTEND);

        let mut precise = request();
        precise.amount = Amount::new(Decimal::new(12_345, 3)).unwrap();
        let order_id = service.place(id, precise).await.unwrap().order_id;
        service.verify(order_id, true).await.unwrap();

        let order = service.get(id, order_id).await.unwrap();
        assert_eq!(order.amount.value(), Decimal::new(12_345, 3));
        assert_eq!(serde_json::to_value(order.amount).unwrap(), "12.345");
    }

    /// Deletes the order inside `delete_unpaid` and reports nothing removed,
    /// as when a concurrent failure callback wins the race.
    struct RacedOrders(MemoryStore);

    #[async_trait::async_trait]
    impl OrderStore for RacedOrders {
        async fn insert(&self, order: NewOrder) -> Result<Order, RepositoryError> {
            OrderStore::insert(&self.0, order).await
        }
        async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
            OrderStore::get(&self.0, id).await
        }
        async fn mark_paid(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
            self.0.mark_paid(id).await
        }
        async fn delete_unpaid(&self, id: OrderId) -> Result<bool, RepositoryError> {
            self.0.delete_unpaid(id).await?;
            Ok(false)
        }
        async fn update_status(
            &self,
            id: OrderId,
            status: &OrderStatus,
        ) -> Result<Option<Order>, RepositoryError> {
            self.0.update_status(id, status).await
        }
        async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
            self.0.list_for_user(user_id).await
        }
        async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
            self.0.list_all().await
        }
    }

    #[tokio::test]
    async fn test_verify_failure_lost_race_is_not_found() {
        let users = MemoryStore::new();
        let id = user(&users).await;
        let orders = RacedOrders(MemoryStore::new());
        let service = OrderService::new(&orders, &users, FRONTEND);

        let order_id = service.place(id, request()).await.unwrap().order_id;
        assert!(matches!(
            service.verify(order_id, false).await,
            Err(OrderError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_verify_unknown_order() {
        let store = MemoryStore::new();
        let service = OrderService::new(&store, &store, FRONTEND);
        for success in [true, false] {
            assert!(matches!(
                service.verify(OrderId::generate(), success).await,
                Err(OrderError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn test_status_overwrite_any_direction() {
        let store = MemoryStore::new();
        let id = user(&store).await;
        let service = OrderService::new(&store, &store, FRONTEND);
        let order_id = service.place(id, request()).await.unwrap().order_id;

        for status in [
            OrderStatus::DELIVERED,
            OrderStatus::FOOD_PROCESSING,
            "Left at the door",
        ] {
            let order = service.update_status(order_id, status).await.unwrap();
            assert_eq!(order.status.as_str(), status);
            assert_eq!(
                service.get(id, order_id).await.unwrap().status.as_str(),
                status
            );
        }

        assert!(matches!(
            service.update_status(order_id, "   ").await,
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            service.update_status(OrderId::generate(), "Delivered").await,
            Err(OrderError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_place_validation() {
        let store = MemoryStore::new();
        let id = user(&store).await;
        let service = OrderService::new(&store, &store, FRONTEND);

        let mut empty = request();
        empty.items.clear();
        let mut zero = request();
        zero.items[0].quantity = 0;
        let mut no_phone = request();
        no_phone.address.phone = " ".to_string();

        for bad in [empty, zero, no_phone] {
            assert!(matches!(
                service.place(id, bad).await,
                Err(OrderError::Validation(_))
            ));
        }
        assert!(service.list_all().await.unwrap().is_empty());
        assert_eq!(store.get_cart(id).await.unwrap().quantity("pizza"), 2);
    }

    #[tokio::test]
    async fn test_place_for_unknown_user() {
        let store = MemoryStore::new();
        let service = OrderService::new(&store, &store, FRONTEND);
        assert!(matches!(
            service.place(UserId::generate(), request()).await,
            Err(OrderError::UserNotFound)
        ));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_hides_other_users_orders() {
        let store = MemoryStore::new();
        let owner = user(&store).await;
        let service = OrderService::new(&store, &store, FRONTEND);
        let order_id = service.place(owner, request()).await.unwrap().order_id;

        assert!(matches!(
            service.get(UserId::generate(), order_id).await,
            Err(OrderError::NotFound)
        ));
        assert_eq!(service.list_for_user(owner).await.unwrap().len(), 1);
        assert!(service
            .list_for_user(UserId::generate())
            .await
            .unwrap()
            .is_empty());
    }
}
