use chrono::{TimeZone, Utc};
use mockall::mock;
use storefront_engine::{
    db_types::{
        InsertOrderResult,
        Money,
        NewOrder,
        Order,
        OrderItem,
        OrderStatusType,
        Product,
        SellerOrder,
        SessionId,
        ShippingAddress,
    },
    traits::{AddressManagement, CartManagement, OrderManagement, ProductCatalog, StoreError, StorefrontDatabase},
};

mock! {
    pub Store {}
    impl Clone for Store {
        fn clone(&self) -> Self;
    }
    impl StorefrontDatabase for Store {
        fn url(&self) -> &str;
        async fn close(&mut self) -> Result<(), StoreError>;
    }
    impl AddressManagement for Store {
        async fn fetch_address(&self, address_id: &str) -> Result<Option<ShippingAddress>, StoreError>;
    }
    impl OrderManagement for Store {
        async fn fetch_order_by_session_id(&self, session_id: &SessionId) -> Result<Option<Order>, StoreError>;
        async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, StoreError>;
        async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, StoreError>;
        async fn fetch_items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError>;
        async fn fetch_orders_with_items(&self) -> Result<Vec<SellerOrder>, StoreError>;
        async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, StoreError>;
    }
    impl ProductCatalog for Store {
        async fn fetch_products(&self, product_ids: &[String]) -> Result<Vec<Product>, StoreError>;
        async fn decrement_stock(&self, product_id: &str, quantity: i64) -> Result<i64, StoreError>;
    }
    impl CartManagement for Store {
        async fn clear_cart(&self, buyer_id: &str) -> Result<u64, StoreError>;
    }
}

pub fn address() -> ShippingAddress {
    ShippingAddress {
        id: "a1".into(),
        buyer_id: "u1".into(),
        full_name: "Grace Hopper".into(),
        phone: "555-0199".into(),
        street: "1 Compiler Lane".into(),
        city: "Arlington".into(),
        state: "VA".into(),
        postal_code: "22201".into(),
    }
}

pub fn product() -> Product {
    Product { id: "p1".into(), name: "Mechanical keyboard".into(), price: Money::from(7500), stock: 10 }
}

pub fn order(id: i64, status: OrderStatusType) -> Order {
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Order {
        id,
        session_id: SessionId::from("cs_test_1"),
        buyer_id: "u1".into(),
        total_amount: Money::from(15000),
        address: address(),
        status,
        created_at,
        updated_at: created_at,
    }
}

pub fn order_item(order_id: i64) -> OrderItem {
    OrderItem { id: 1, order_id, product_id: "p1".into(), quantity: 2, price: Money::from(7500) }
}
