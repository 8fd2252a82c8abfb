//! In-memory implementation of every store.
//!
//! Backs the test suites and local runs without `FOOD_DATABASE_URL`. Each
//! method takes the lock once, so single operations are atomic; sequences of
//! operations are not.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use food_delivery_core::{Cart, Email, FoodId, OrderId, OrderStatus, UserId};

use super::{FoodStore, OrderStore, RepositoryError, UserStore};
use crate::models::{Food, NewFood, NewOrder, NewUser, Order, User};

struct UserRecord {
    user: User,
    password_hash: String,
}

/// Process-local store. Insertion order is preserved for listings.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserRecord>>,
    foods: RwLock<Vec<Food>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|r| r.user.email == new.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            name: new.name,
            email: new.email,
            cart: Cart::new(),
            created_at: now,
            updated_at: now,
        };
        users.push(UserRecord {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|r| r.user.id == id).map(|r| r.user.clone()))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|r| &r.user.email == email)
            .map(|r| (r.user.clone(), r.password_hash.clone())))
    }

    async fn get_cart(&self, id: UserId) -> Result<Cart, RepositoryError> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.user.cart.clone())
            .ok_or(RepositoryError::NotFound)
    }

    async fn set_cart(&self, id: UserId, cart: &Cart) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let record = users
            .iter_mut()
            .find(|r| r.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.user.cart = cart.clone();
        record.user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl FoodStore for MemoryStore {
    async fn insert(&self, new: NewFood) -> Result<Food, RepositoryError> {
        let food = Food {
            id: FoodId::generate(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            image: new.image,
            created_at: Utc::now(),
        };
        self.foods.write().await.push(food.clone());
        Ok(food)
    }

    async fn list(&self) -> Result<Vec<Food>, RepositoryError> {
        Ok(self.foods.read().await.clone())
    }

    async fn delete(&self, id: FoodId) -> Result<Option<Food>, RepositoryError> {
        let mut foods = self.foods.write().await;
        let position = foods.iter().position(|f| f.id == id);
        Ok(position.map(|i| foods.remove(i)))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            user_id: new.user_id,
            items: new.items,
            amount: new.amount,
            address: new.address,
            status: OrderStatus::initial(),
            payment: false,
            created_at: now,
            updated_at: now,
        };
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn mark_paid(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let mut orders = self.orders.write().await;
        Ok(orders.iter_mut().find(|o| o.id == id).map(|order| {
            order.payment = true;
            order.updated_at = Utc::now();
            order.clone()
        }))
    }

    async fn delete_unpaid(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id || o.payment);
        Ok(orders.len() != before)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: &OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut orders = self.orders.write().await;
        Ok(orders.iter_mut().find(|o| o.id == id).map(|order| {
            order.status = status.clone();
            order.updated_at = Utc::now();
            order.clone()
        }))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.orders.read().await.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use food_delivery_core::Amount;

    use super::*;
    use crate::models::{DeliveryAddress, OrderItem};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_order(user_id: UserId) -> NewOrder {
        NewOrder {
            user_id,
            items: vec![OrderItem {
                item_id: "pizza".to_string(),
                quantity: 2,
                name: None,
                price: None,
            }],
            amount: Amount::ZERO,
            address: DeliveryAddress {
                name: "Jane".to_string(),
                email: Email::parse("jane@example.com").unwrap(),
                phone: "555".to_string(),
                address: "1 Main St".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        let err = UserStore::create(&store, new_user("A@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_cart_of_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_cart(UserId::generate()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        let err = store
            .set_cart(UserId::generate(), &Cart::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_set_cart_overwrites() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        let mut cart = Cart::new();
        cart.add("x", 3);
        store.set_cart(user.id, &cart).await.unwrap();
        assert_eq!(store.get_cart(user.id).await.unwrap(), cart);
    }

    #[tokio::test]
    async fn test_delete_unpaid_keeps_paid_orders() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let unpaid = OrderStore::insert(&store, new_order(user_id)).await.unwrap();
        let paid = OrderStore::insert(&store, new_order(user_id)).await.unwrap();
        store.mark_paid(paid.id).await.unwrap();

        assert!(store.delete_unpaid(unpaid.id).await.unwrap());
        assert!(!store.delete_unpaid(paid.id).await.unwrap());
        assert!(OrderStore::get(&store, paid.id).await.unwrap().is_some());
        assert!(OrderStore::get(&store, unpaid.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_filters() {
        let store = MemoryStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        OrderStore::insert(&store, new_order(alice)).await.unwrap();
        OrderStore::insert(&store, new_order(bob)).await.unwrap();
        OrderStore::insert(&store, new_order(alice)).await.unwrap();

        let orders = store.list_for_user(alice).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.user_id == alice));
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_food_delete_returns_removed() {
        let store = MemoryStore::new();
        let food = FoodStore::insert(
            &store,
            NewFood {
                name: "Salad".to_string(),
                description: "Green".to_string(),
                price: Amount::ZERO,
                category: "Salad".to_string(),
                image: "1.png".to_string(),
            },
        )
        .await
        .unwrap();

        let removed = FoodStore::delete(&store, food.id).await.unwrap().unwrap();
        assert_eq!(removed.image, "1.png");
        assert!(FoodStore::delete(&store, food.id).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }
}
