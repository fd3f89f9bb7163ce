//! In-memory data store loaded from JSON fixtures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use validator::Validate;

use storefront_core::status::{CustomerSegment, LineItemStatus, OrderStatus};
use storefront_core::types::{CustomerId, OrderId, PaymentId, ProductId};
use storefront_core::{
    Cart, Customer, DataGateway, NotificationPreferences, Order, Payment, Product,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for fixture loading failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A fixture file exists but could not be read.
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixture file is not valid JSON for its record type.
    #[error("Failed to parse fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record parsed but failed field validation.
    #[error("Invalid record {id} in {file}: {source}")]
    InvalidRecord {
        file: &'static str,
        id: String,
        #[source]
        source: validator::ValidationErrors,
    },
}

// ---------------------------------------------------------------------------
// DataStore
// ---------------------------------------------------------------------------

/// Central in-memory store over the demo fixture data.
///
/// In a real deployment each collection would be a separate service with
/// its own database; this store simulates querying across them. Reads
/// clone out; the mutators only touch in-memory state.
#[derive(Debug)]
pub struct DataStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    products: RwLock<HashMap<ProductId, Product>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    // Keyed by owning customer: one cart per customer.
    carts: RwLock<HashMap<CustomerId, Cart>>,
    preferences: RwLock<HashMap<CustomerId, NotificationPreferences>>,
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

impl DataStore {
    /// An empty store; populate with the `insert_*` methods.
    pub fn empty() -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
            products: RwLock::new(HashMap::new()),
            orders: RwLock::new(HashMap::new()),
            carts: RwLock::new(HashMap::new()),
            preferences: RwLock::new(HashMap::new()),
            payments: RwLock::new(HashMap::new()),
        }
    }

    /// Load every collection from JSON fixture files in `dir`.
    ///
    /// A missing file yields an empty collection; a present file must
    /// parse and every record must pass validation.
    pub fn from_fixture_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let store = Self::empty();

        let customers: Vec<Customer> = load_fixture(dir, "customers.json")?;
        for customer in customers {
            validate_record("customers.json", &customer.id, &customer)?;
            store.insert_customer(customer);
        }

        let products: Vec<Product> = load_fixture(dir, "products.json")?;
        for product in products {
            validate_record("products.json", &product.id, &product)?;
            store.insert_product(product);
        }

        let orders: Vec<Order> = load_fixture(dir, "orders.json")?;
        for order in orders {
            validate_record("orders.json", &order.id, &order)?;
            store.insert_order(order);
        }

        let carts: Vec<Cart> = load_fixture(dir, "carts.json")?;
        for cart in carts {
            validate_record("carts.json", &cart.customer_id, &cart)?;
            store.insert_cart(cart);
        }

        let preferences: Vec<NotificationPreferences> =
            load_fixture(dir, "notification_preferences.json")?;
        for record in preferences {
            store.insert_preferences(record);
        }

        let payments: Vec<Payment> = load_fixture(dir, "payments.json")?;
        for payment in payments {
            validate_record("payments.json", &payment.id, &payment)?;
            store.insert_payment(payment);
        }

        tracing::info!(
            customers = store.customers.read().expect("store poisoned").len(),
            products = store.products.read().expect("store poisoned").len(),
            orders = store.orders.read().expect("store poisoned").len(),
            "Loaded fixture data"
        );

        Ok(store)
    }

    // -- builders ----------------------------------------------------------

    pub fn insert_customer(&self, customer: Customer) {
        self.customers
            .write()
            .expect("store poisoned")
            .insert(customer.id.clone(), customer);
    }

    pub fn insert_product(&self, product: Product) {
        self.products
            .write()
            .expect("store poisoned")
            .insert(product.id.clone(), product);
    }

    pub fn insert_order(&self, order: Order) {
        self.orders
            .write()
            .expect("store poisoned")
            .insert(order.id.clone(), order);
    }

    pub fn insert_cart(&self, cart: Cart) {
        self.carts
            .write()
            .expect("store poisoned")
            .insert(cart.customer_id.clone(), cart);
    }

    pub fn insert_preferences(&self, preferences: NotificationPreferences) {
        self.preferences
            .write()
            .expect("store poisoned")
            .insert(preferences.customer_id.clone(), preferences);
    }

    pub fn insert_payment(&self, payment: Payment) {
        self.payments
            .write()
            .expect("store poisoned")
            .insert(payment.id.clone(), payment);
    }

    // -- extra reads beyond the gateway trait ------------------------------

    /// A customer's cart, if they have one.
    pub fn cart(&self, customer_id: &str) -> Option<Cart> {
        self.carts
            .read()
            .expect("store poisoned")
            .get(customer_id)
            .cloned()
    }

    /// Payment by id.
    pub fn payment(&self, payment_id: &str) -> Option<Payment> {
        self.payments
            .read()
            .expect("store poisoned")
            .get(payment_id)
            .cloned()
    }

    /// All payment attempts recorded against an order.
    pub fn payments_for_order(&self, order_id: &str) -> Vec<Payment> {
        self.payments
            .read()
            .expect("store poisoned")
            .values()
            .filter(|payment| payment.order_id == order_id)
            .cloned()
            .collect()
    }

    // -- demo-scenario mutators --------------------------------------------

    /// Set an order's overall status. Returns the updated order.
    pub fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Option<Order> {
        let mut orders = self.orders.write().expect("store poisoned");
        let order = orders.get_mut(order_id)?;
        order.status = status;
        order.updated_at = Some(chrono::Utc::now());
        Some(order.clone())
    }

    /// Set one line item's status within an order, stamping `shipped_at`
    /// on the transition to SHIPPED. Returns the updated order, or `None`
    /// when the order or the line item does not exist.
    pub fn update_line_item_status(
        &self,
        order_id: &str,
        product_id: &str,
        status: LineItemStatus,
    ) -> Option<Order> {
        let mut orders = self.orders.write().expect("store poisoned");
        let order = orders.get_mut(order_id)?;
        let item = order
            .line_items
            .iter_mut()
            .find(|item| item.product_id == product_id)?;
        item.status = status;
        if status == LineItemStatus::Shipped {
            item.shipped_at = Some(chrono::Utc::now());
        }
        order.updated_at = Some(chrono::Utc::now());
        Some(order.clone())
    }

    /// Set a product's price. Returns the updated product.
    pub fn update_product_price(&self, product_id: &str, new_price: f64) -> Option<Product> {
        let mut products = self.products.write().expect("store poisoned");
        let product = products.get_mut(product_id)?;
        product.price = new_price;
        Some(product.clone())
    }
}

impl DataGateway for DataStore {
    fn customer(&self, id: &str) -> Option<Customer> {
        self.customers
            .read()
            .expect("store poisoned")
            .get(id)
            .cloned()
    }

    fn product(&self, id: &str) -> Option<Product> {
        self.products
            .read()
            .expect("store poisoned")
            .get(id)
            .cloned()
    }

    fn order(&self, id: &str) -> Option<Order> {
        self.orders.read().expect("store poisoned").get(id).cloned()
    }

    fn carts_containing_product(&self, product_id: &str) -> Vec<Cart> {
        self.carts
            .read()
            .expect("store poisoned")
            .values()
            .filter(|cart| cart.contains_product(product_id))
            .cloned()
            .collect()
    }

    fn notification_preferences(&self, customer_id: &str) -> Option<NotificationPreferences> {
        self.preferences
            .read()
            .expect("store poisoned")
            .get(customer_id)
            .cloned()
    }

    fn customers_in_segment(&self, segment: CustomerSegment) -> Vec<Customer> {
        self.customers
            .read()
            .expect("store poisoned")
            .values()
            .filter(|customer| customer.segment == segment)
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Fixture loading
// ---------------------------------------------------------------------------

fn load_fixture<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Fixture file missing, collection empty");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Parse { path, source })
}

fn validate_record<T: Validate>(
    file: &'static str,
    id: &str,
    record: &T,
) -> Result<(), StoreError> {
    record.validate().map_err(|source| StoreError::InvalidRecord {
        file,
        id: id.to_string(),
        source,
    })
}
