use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ApiError, ApiResult};

/// The six list collections served by the booking API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Hotels,
    Bookings,
    Rooms,
    Accounts,
    Customers,
    Payments,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Hotels,
        Collection::Bookings,
        Collection::Rooms,
        Collection::Accounts,
        Collection::Customers,
        Collection::Payments,
    ];

    /// API path of the collection's list endpoint, relative to `/api`
    pub fn endpoint(&self) -> &'static str {
        match self {
            Collection::Hotels => "/hotel/",
            Collection::Bookings => "/booking/",
            Collection::Rooms => "/room/",
            Collection::Accounts => "/account/",
            Collection::Customers => "/customer/",
            Collection::Payments => "/payment/",
        }
    }

    /// Plural name used in log lines and placeholder text
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Hotels => "hotels",
            Collection::Bookings => "bookings",
            Collection::Rooms => "rooms",
            Collection::Accounts => "users",
            Collection::Customers => "customers",
            Collection::Payments => "payments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Derives the collection count from a list response body.
///
/// Precedence: an explicit `count` field, else the length of a `results`
/// array, else the length of a bare array, else zero. The `count` field
/// wins whenever it is present, including when it is zero.
pub fn item_count(body: &Value) -> u64 {
    if let Some(count) = body.get("count").and_then(Value::as_u64) {
        return count;
    }
    if let Some(results) = body.get("results").and_then(Value::as_array) {
        return results.len() as u64;
    }
    if let Some(items) = body.as_array() {
        return items.len() as u64;
    }
    0
}

/// Pulls the record list out of a list response body: the `results` array
/// of a paginated envelope, or the body itself when it is a bare array.
pub fn extract_items(body: &Value) -> ApiResult<Vec<Value>> {
    if let Some(results) = body.get("results").and_then(Value::as_array) {
        return Ok(results.clone());
    }
    if let Some(items) = body.as_array() {
        return Ok(items.clone());
    }
    Err(ApiError::ParsingError(
        "list response has neither a results array nor a bare array".to_string(),
    ))
}

/// One page of a collection, decoded into typed records.
///
/// Records are decoded leniently: an item that does not fit the record
/// shape becomes an empty record rather than failing the page.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T: DeserializeOwned + Default> Listing<T> {
    pub fn from_value(body: Value) -> ApiResult<Self> {
        let count = item_count(&body);
        let items = extract_items(&body)?
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect();
        Ok(Self { count, items })
    }
}

/// Hotel record as served by the hotel collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub landlord_email: Option<String>,
    pub landlord_name: Option<String>,
    pub star_rating: Option<u32>,
    pub phone_no: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

/// Room record; `room_no`, `floor_no` and `capacity` are served as either
/// numbers or strings depending on the backend serializer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub id: Option<i64>,
    pub hotel_name: Option<String>,
    pub room_no: Option<Value>,
    pub floor_no: Option<Value>,
    pub capacity: Option<Value>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
}

/// Booking record; `room_no` is filled by the list serializer while `room`
/// is the raw foreign key, so both are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Booking {
    pub id: Option<i64>,
    pub customer_phone_no: Option<String>,
    pub room_no: Option<Value>,
    pub room: Option<Value>,
    pub booking_start_time: Option<String>,
    pub booking_end_time: Option<String>,
    pub price: Option<f64>,
    pub discounted_price: Option<f64>,
}

/// Customer record as served by the customer collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_no: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub occupation: Option<String>,
}

/// Payment record; `booking` and `booking_id` mirror the serializer pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub id: Option<i64>,
    pub booking: Option<Value>,
    pub booking_id: Option<i64>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub created_at: Option<String>,
}

/// Authenticated user profile returned by the `me` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub date_joined: Option<String>,
    pub last_login: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
    pub is_staff: Option<bool>,
}

/// Login request body; the API authenticates by email passed as `username`
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request body; the server validates that both password
/// fields match
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password2: String,
}

/// Password change request body
#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Successful login response: the token plus whatever else the server sent
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
