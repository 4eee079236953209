//! In-memory stand-in for the POS backend, served by axum on an ephemeral
//! port. Identifiers are assigned here, never by the client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use posadmin_console::types::{
    Customer, Item, ItemCategory, ItemCategoryRef, Order, OrderCustomer, OrderDetail, OrderItemRef,
    OrderUser, Stock,
};
use posadmin_core::{EntityId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub bearer: bool,
}

#[derive(Default)]
struct Db {
    users: Vec<(i64, String, String)>,
    tokens: HashMap<String, i64>,
    next_ids: HashMap<&'static str, i64>,
    customers: Vec<Customer>,
    categories: Vec<ItemCategory>,
    items: Vec<Item>,
    stock: Vec<Stock>,
    orders: Vec<Order>,
}

impl Db {
    fn next_id(&mut self, collection: &'static str) -> i64 {
        let next = self.next_ids.entry(collection).or_insert(1);
        let id = *next;
        *next += 1;
        id
    }
}

#[derive(Default)]
pub struct Backend {
    db: Mutex<Db>,
    requests: Mutex<Vec<Recorded>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    withhold_tokens: AtomicBool,
}

impl Backend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().unwrap()
    }

    pub fn add_user(&self, username: &str, password: &str) -> i64 {
        let mut db = self.db();
        let id = db.next_id("users");
        db.users.push((id, username.to_string(), password.to_string()));
        id
    }

    /// Make the next id handed out for `collection` equal to `id`.
    pub fn set_next_id(&self, collection: &'static str, id: i64) {
        self.db().next_ids.insert(collection, id);
    }

    pub fn seed_category(&self, name: &str) -> EntityId {
        let mut db = self.db();
        let id = EntityId::from_raw(db.next_id("itemcategory"));
        db.categories.push(ItemCategory {
            category_id: id,
            category_name: name.to_string(),
            items: Vec::new(),
        });
        id
    }

    pub fn seed_customer(&self, name: &str) -> EntityId {
        let mut db = self.db();
        let id = EntityId::from_raw(db.next_id("customer"));
        db.customers.push(Customer {
            customer_id: id,
            name: name.to_string(),
            contact: "0110000000".to_string(),
            address: "Colombo".to_string(),
        });
        id
    }

    pub fn seed_item(&self, name: &str, price: f64, category: EntityId) -> EntityId {
        let mut db = self.db();
        let id = EntityId::from_raw(db.next_id("item"));
        let item_category = Some(category_ref(&db, category));
        db.items.push(Item {
            id,
            name: name.to_string(),
            price,
            qty: 50,
            item_category,
        });
        id
    }

    pub fn seed_stock(&self, quantity: i64) -> EntityId {
        let mut db = self.db();
        let id = EntityId::from_raw(db.next_id("stock"));
        db.stock.push(Stock {
            stock_id: id,
            quantity_available: quantity,
            items: Vec::new(),
        });
        id
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Answer logins with the user's identity but no token.
    pub fn withhold_tokens(&self, on: bool) {
        self.withhold_tokens.store(on, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn categories(&self) -> Vec<ItemCategory> {
        self.db().categories.clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.db().orders.clone()
    }

    fn check(&self, headers: &HeaderMap, needs_auth: bool, write: bool) -> Result<(), Response> {
        if needs_auth {
            let token = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));
            let known = token.is_some_and(|t| self.db().tokens.contains_key(t));
            if !known {
                return Err(StatusCode::UNAUTHORIZED.into_response());
            }
        }
        let failing = if write { &self.fail_writes } else { &self.fail_reads };
        if failing.load(Ordering::SeqCst) {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response());
        }
        Ok(())
    }
}

fn category_ref(db: &Db, id: EntityId) -> ItemCategoryRef {
    let name = db
        .categories
        .iter()
        .find(|c| c.category_id == id)
        .map(|c| c.category_name.clone())
        .unwrap_or_default();
    ItemCategoryRef {
        category_id: id,
        category_name: name,
    }
}

fn str_field(body: &Value, key: &str) -> String {
    body[key].as_str().unwrap_or_default().to_string()
}

type Shared = Arc<Backend>;

async fn record(State(backend): State<Shared>, req: Request, next: Next) -> Response {
    backend.requests.lock().unwrap().push(Recorded {
        method: req.method().clone(),
        path: req.uri().path().to_string(),
        bearer: req.headers().contains_key("authorization"),
    });
    next.run(req).await
}

fn issue_token(db: &mut Db, user_id: i64, username: &str) -> Value {
    let token = format!("tok-{username}-{user_id}");
    db.tokens.insert(token.clone(), user_id);
    json!({ "token": token, "userId": user_id, "username": username })
}

async fn login(State(b): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = str_field(&body, "username");
    let password = str_field(&body, "password");
    let mut db = b.db();
    let found = db
        .users
        .iter()
        .find(|(_, u, p)| *u == username && *p == password)
        .map(|(id, _, _)| *id);
    match found {
        Some(id) if b.withhold_tokens.load(Ordering::SeqCst) => {
            Json(json!({ "userId": id, "username": username })).into_response()
        }
        Some(id) => Json(issue_token(&mut db, id, &username)).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn signup(State(b): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = str_field(&body, "username");
    let password = str_field(&body, "password");
    let mut db = b.db();
    if db.users.iter().any(|(_, u, _)| *u == username) {
        return StatusCode::CONFLICT.into_response();
    }
    let id = db.next_id("users");
    db.users.push((id, username.clone(), password));
    (StatusCode::CREATED, Json(issue_token(&mut db, id, &username))).into_response()
}

async fn list_customers(State(b): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = b.check(&headers, true, false) {
        return r;
    }
    Json(b.db().customers.clone()).into_response()
}

async fn get_customer(State(b): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = b.check(&headers, true, false) {
        return r;
    }
    let db = b.db();
    match db.customers.iter().find(|c| c.customer_id.get() == id) {
        Some(c) => Json(c.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_customer(State(b): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    let customer = Customer {
        customer_id: EntityId::from_raw(db.next_id("customer")),
        name: str_field(&body, "name"),
        contact: str_field(&body, "contact"),
        address: str_field(&body, "address"),
    };
    db.customers.push(customer.clone());
    (StatusCode::CREATED, Json(customer)).into_response()
}

async fn update_customer(
    State(b): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    match db.customers.iter_mut().find(|c| c.customer_id.get() == id) {
        Some(c) => {
            c.name = str_field(&body, "name");
            c.contact = str_field(&body, "contact");
            c.address = str_field(&body, "address");
            Json(c.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_categories(State(b): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = b.check(&headers, true, false) {
        return r;
    }
    Json(b.db().categories.clone()).into_response()
}

async fn create_category(State(b): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    let category = ItemCategory {
        category_id: EntityId::from_raw(db.next_id("itemcategory")),
        category_name: str_field(&body, "categoryName"),
        items: Vec::new(),
    };
    db.categories.push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn update_category(
    State(b): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    match db.categories.iter_mut().find(|c| c.category_id.get() == id) {
        Some(c) => {
            c.category_name = str_field(&body, "categoryName");
            Json(c.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_category(State(b): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    let before = db.categories.len();
    db.categories.retain(|c| c.category_id.get() != id);
    if db.categories.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Items are readable without a session (the order screen's catalog).
async fn list_items(State(b): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = b.check(&headers, false, false) {
        return r;
    }
    Json(b.db().items.clone()).into_response()
}

fn item_from_body(db: &Db, id: EntityId, body: &Value) -> Result<Item, Response> {
    let category = body["itemCategory"]["categoryId"]
        .as_i64()
        .map(EntityId::from_raw)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "itemCategory.categoryId required").into_response())?;
    if !db.categories.iter().any(|c| c.category_id == category) {
        return Err((StatusCode::BAD_REQUEST, "unknown category").into_response());
    }
    Ok(Item {
        id,
        name: str_field(body, "name"),
        price: body["price"].as_f64().unwrap_or_default(),
        qty: body["qty"].as_i64().unwrap_or_default(),
        item_category: Some(category_ref(db, category)),
    })
}

async fn create_item(State(b): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    let id = EntityId::from_raw(db.next_id("item"));
    match item_from_body(&db, id, &body) {
        Ok(item) => {
            db.items.push(item.clone());
            (StatusCode::CREATED, Json(item)).into_response()
        }
        Err(r) => r,
    }
}

async fn update_item(
    State(b): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    let updated = match item_from_body(&db, EntityId::from_raw(id), &body) {
        Ok(item) => item,
        Err(r) => return r,
    };
    match db.items.iter_mut().find(|i| i.id.get() == id) {
        Some(slot) => {
            *slot = updated.clone();
            Json(updated).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_stock(State(b): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = b.check(&headers, true, false) {
        return r;
    }
    Json(b.db().stock.clone()).into_response()
}

fn stock_items(body: &Value) -> Vec<Item> {
    serde_json::from_value(body["items"].clone()).unwrap_or_default()
}

async fn create_stock(State(b): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    // Whatever stockId the client sent is ignored.
    let stock = Stock {
        stock_id: EntityId::from_raw(db.next_id("stock")),
        quantity_available: body["quantityAvailable"].as_i64().unwrap_or_default(),
        items: stock_items(&body),
    };
    db.stock.push(stock.clone());
    (StatusCode::CREATED, Json(stock)).into_response()
}

async fn update_stock(
    State(b): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    match db.stock.iter_mut().find(|s| s.stock_id.get() == id) {
        Some(s) => {
            s.quantity_available = body["quantityAvailable"].as_i64().unwrap_or_default();
            s.items = stock_items(&body);
            Json(s.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_stock(State(b): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = b.check(&headers, true, true) {
        return r;
    }
    let mut db = b.db();
    let before = db.stock.len();
    db.stock.retain(|s| s.stock_id.get() != id);
    if db.stock.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_orders(State(b): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = b.check(&headers, false, false) {
        return r;
    }
    Json(b.db().orders.clone()).into_response()
}

async fn create_order(State(b): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = b.check(&headers, false, true) {
        return r;
    }
    let mut db = b.db();

    let customer_id = EntityId::from_raw(body["customerId"].as_i64().unwrap_or_default());
    let Some(customer) = db.customers.iter().find(|c| c.customer_id == customer_id).cloned() else {
        return (StatusCode::BAD_REQUEST, "unknown customer").into_response();
    };
    let user_id = body["userId"].as_i64().unwrap_or_default();
    let Some(user_name) = db.users.iter().find(|(id, _, _)| *id == user_id).map(|(_, u, _)| u.clone()) else {
        return (StatusCode::BAD_REQUEST, "unknown user").into_response();
    };

    let mut details = Vec::new();
    for line in body["items"].as_array().cloned().unwrap_or_default() {
        let item_id = EntityId::from_raw(line["itemId"].as_i64().unwrap_or_default());
        let quantity = line["quantity"].as_u64().unwrap_or_default() as u32;
        let Some(item) = db.items.iter().find(|i| i.id == item_id).cloned() else {
            return (StatusCode::BAD_REQUEST, "unknown item").into_response();
        };
        let detail_id = EntityId::from_raw(db.next_id("orderdetail"));
        details.push(OrderDetail {
            order_detail_id: Some(detail_id),
            quantity,
            total_price: f64::from(quantity) * item.price,
            item: OrderItemRef {
                item_id,
                item_name: item.name.clone(),
                unit_price: item.price,
            },
        });
    }

    let order = Order {
        order_id: EntityId::from_raw(db.next_id("orders")),
        total_amount: details.iter().map(|d| d.total_price).sum(),
        order_date_time: NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(10, 30, 0)),
        payment_method: str_field(&body, "paymentMethod"),
        customer: Some(OrderCustomer {
            customer_id,
            customer_name: customer.name,
        }),
        user: Some(OrderUser {
            user_id: UserId::from_raw(user_id),
            user_name,
        }),
        order_details: details,
    };
    db.orders.push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn delete_order(State(b): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(r) = b.check(&headers, false, true) {
        return r;
    }
    let mut db = b.db();
    let before = db.orders.len();
    db.orders.retain(|o| o.order_id.get() != id);
    if db.orders.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

pub fn router(backend: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/users", post(signup))
        .route("/customer", get(list_customers).post(create_customer))
        .route("/customer/:id", get(get_customer).put(update_customer))
        .route("/itemcategory", get(list_categories).post(create_category))
        .route("/itemcategory/:id", put(update_category).delete(delete_category))
        .route("/item", get(list_items).post(create_item))
        .route("/item/:id", put(update_item))
        .route("/stock", get(list_stock).post(create_stock))
        .route("/stock/:id", put(update_stock).delete(delete_stock))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", delete(delete_order))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let backend = Backend::new();
        let app = router(backend.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
