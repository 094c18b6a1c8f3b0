use crate::db::DbService;
use crate::db::models::{
    Address, OrderCreate, OrderItem, PaymentMethod, TenantCreate, TenantSettings, TenantStatus,
};
use crate::db::repository::TenantRepository;
use crate::orders::OrderService;
use crate::tenancy::TenantDirectory;

const TENANT: &str = "acme";
const STORE: &str = "store-1";

/// Service over in-memory stores with one active tenant provisioned
async fn setup() -> (OrderService, DbService) {
    let db = DbService::open_in_memory().await.unwrap();
    provision_tenant(&db, TENANT, TenantStatus::Active, TenantSettings::default()).await;
    let service = OrderService::new(TenantDirectory::new(db.clone()));
    (service, db)
}

async fn provision_tenant(
    db: &DbService,
    tenant_id: &str,
    status: TenantStatus,
    settings: TenantSettings,
) {
    TenantRepository::new(db.directory().clone())
        .create(TenantCreate {
            tenant_id: tenant_id.to_string(),
            name: format!("{tenant_id} test tenant"),
            data_store_ref: format!("{tenant_id}_orders"),
            status: Some(status),
            settings: Some(settings),
        })
        .await
        .unwrap();
}

fn simple_item(unit_price: f64, quantity: u32) -> OrderItem {
    OrderItem {
        product_id: "prod-1".to_string(),
        product_name: "Espresso Machine".to_string(),
        sku: "SKU-0001".to_string(),
        quantity,
        unit_price,
        total_price: unit_price * quantity as f64,
        discount: 0.0,
    }
}

fn shipping_address() -> Address {
    Address {
        full_name: "Jane Doe".to_string(),
        address_line1: "1 Main St".to_string(),
        address_line2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
        phone: None,
    }
}

fn order_input(items: Vec<OrderItem>) -> OrderCreate {
    OrderCreate {
        customer_id: "cust-1".to_string(),
        customer_email: "jane@example.com".to_string(),
        customer_name: "Jane Doe".to_string(),
        store_id: STORE.to_string(),
        items,
        payment_method: PaymentMethod::CreditCard,
        tax: None,
        shipping: None,
        discount: None,
        currency: None,
        shipping_address: shipping_address(),
        billing_address: None,
        notes: None,
        created_by: "user-1".to_string(),
    }
}

mod test_core;
mod test_flows;
