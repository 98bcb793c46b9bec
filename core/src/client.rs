use log::{debug, info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult};
use crate::session::Session;
use crate::types::*;

/// Prefix shared by every API endpoint
const API_PREFIX: &str = "/api";

const LOGIN_ENDPOINT: &str = "/account/login";
const REGISTER_ENDPOINT: &str = "/account/register";
const ME_ENDPOINT: &str = "/account/me";
const CHANGE_PASSWORD_ENDPOINT: &str = "/account/change-password";

/// Fallback message when a login failure body cannot be decoded
pub const GENERIC_LOGIN_ERROR: &str = "Invalid credentials";

/// Client for the booking REST API.
///
/// Wraps one HTTP client and one [`Session`]; every authenticated request
/// carries the session token and a 401 answer drops that token before the
/// error reaches the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new API client for the configured base URL
    pub fn new(config: &ClientConfig, session: Session) -> ApiResult<Self> {
        let base_url = config.base_url.clone().ok_or_else(|| {
            ApiError::ConfigError(
                "A base URL is required to initialize the API client".to_string(),
            )
        })?;

        let client = Client::new();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The session this client authenticates with
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API endpoint path
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Performs an authenticated request.
    ///
    /// Attaches the JSON content type and, when present, the session token
    /// as `Authorization: Token <t>`. A 401 response clears the token and
    /// short-circuits into [`ApiError::Unauthorized`]; the caller must not
    /// retry with the dropped session.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<reqwest::Response> {
        let url = self.endpoint_url(path);
        debug!("Sending {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Token {}", token));
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to send request: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("The API rejected the stored token; dropping the session");
            self.session.clear_token()?;
            return Err(ApiError::Unauthorized);
        }

        Ok(response)
    }

    /// Turns a response into its JSON body, mapping non-success statuses
    /// into [`ApiError::HttpError`]
    async fn decode(response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                ApiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(ApiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::ParsingError(format!("Failed to parse response: {}", e)))
    }

    /// Authenticated GET returning the JSON body
    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        let response = self.send(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    /// Authenticated POST with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// Authenticated PATCH with an optional JSON body
    pub async fn patch(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let response = self.send(Method::PATCH, path, body).await?;
        Self::decode(response).await
    }

    /// Signs in with email and password.
    ///
    /// The API authenticates by email submitted in the `username` field.
    /// On success the returned token is stored in the session. On refusal
    /// the server's error body is surfaced; a body that cannot be decoded
    /// falls back to the fixed [`GENERIC_LOGIN_ERROR`] message.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthPayload> {
        let url = self.endpoint_url(LOGIN_ENDPOINT);
        let request = LoginRequest {
            username: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to send login request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<Value>().await {
                Ok(body) => {
                    let detail = error_detail(&body);
                    if detail.trim().is_empty() {
                        GENERIC_LOGIN_ERROR.to_string()
                    } else {
                        detail
                    }
                }
                Err(_) => GENERIC_LOGIN_ERROR.to_string(),
            };
            warn!("Login rejected ({}): {}", status.as_u16(), message);
            return Err(ApiError::Rejected { message });
        }

        let payload = response.json::<AuthPayload>().await.map_err(|e| {
            ApiError::ParsingError(format!("Failed to parse login response: {}", e))
        })?;

        self.session.set_token(&payload.token)?;
        info!("Signed in as {}; token stored", email);

        Ok(payload)
    }

    /// Registers a new account.
    ///
    /// On success the token in the response body is stored, so the new
    /// account is signed in immediately, as with [`ApiClient::login`]. On
    /// refusal the server's error body is surfaced verbatim.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Value> {
        let url = self.endpoint_url(REGISTER_ENDPOINT);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                ApiError::RequestError(format!("Failed to send registration request: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<Value>().await {
                Ok(body) => error_detail(&body),
                Err(_) => format!("Registration failed with status {}", status.as_u16()),
            };
            warn!("Registration rejected ({}): {}", status.as_u16(), message);
            return Err(ApiError::Rejected { message });
        }

        let body = response.json::<Value>().await.map_err(|e| {
            ApiError::ParsingError(format!("Failed to parse registration response: {}", e))
        })?;

        if let Some(token) = body.get("token").and_then(Value::as_str) {
            self.session.set_token(token)?;
            info!("Registered {}; token stored", request.email);
        }

        Ok(body)
    }

    /// Signs out by dropping the stored token.
    ///
    /// The API keeps no revocable server-side session for token auth, so
    /// sign-out is purely a local state change.
    pub fn logout(&self) -> ApiResult<()> {
        self.session.clear_token()?;
        info!("Signed out; token cleared");
        Ok(())
    }

    /// Profile of the currently authenticated user
    pub async fn current_user(&self) -> ApiResult<Account> {
        let body = self.get(ME_ENDPOINT).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Changes the authenticated user's password
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> ApiResult<Value> {
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.post(CHANGE_PASSWORD_ENDPOINT, serde_json::to_value(&request)?)
            .await
    }

    /// First page of a collection, as served
    pub async fn collection_page(&self, collection: Collection) -> ApiResult<Value> {
        self.get(collection.endpoint()).await
    }

    pub async fn get_hotels(&self) -> ApiResult<Listing<Hotel>> {
        Listing::from_value(self.get(Collection::Hotels.endpoint()).await?)
    }

    pub async fn get_rooms(&self) -> ApiResult<Listing<Room>> {
        Listing::from_value(self.get(Collection::Rooms.endpoint()).await?)
    }

    pub async fn create_room<T: Serialize>(&self, room: &T) -> ApiResult<Value> {
        self.post(Collection::Rooms.endpoint(), serde_json::to_value(room)?)
            .await
    }

    pub async fn get_customers(&self) -> ApiResult<Listing<Customer>> {
        Listing::from_value(self.get(Collection::Customers.endpoint()).await?)
    }

    pub async fn create_customer<T: Serialize>(&self, customer: &T) -> ApiResult<Value> {
        self.post(Collection::Customers.endpoint(), serde_json::to_value(customer)?)
            .await
    }

    pub async fn get_bookings(&self) -> ApiResult<Listing<Booking>> {
        Listing::from_value(self.get(Collection::Bookings.endpoint()).await?)
    }

    pub async fn create_booking<T: Serialize>(&self, booking: &T) -> ApiResult<Value> {
        self.post(Collection::Bookings.endpoint(), serde_json::to_value(booking)?)
            .await
    }

    /// Marks a booking as checked in
    pub async fn check_in_booking(&self, booking_id: i64) -> ApiResult<Value> {
        self.patch(&format!("/booking/{}/checkin/", booking_id), None)
            .await
    }

    /// Marks a booking as checked out
    pub async fn check_out_booking(&self, booking_id: i64) -> ApiResult<Value> {
        self.patch(&format!("/booking/{}/checkout/", booking_id), None)
            .await
    }

    pub async fn get_payments(&self) -> ApiResult<Listing<Payment>> {
        Listing::from_value(self.get(Collection::Payments.endpoint()).await?)
    }

    pub async fn create_payment<T: Serialize>(&self, payment: &T) -> ApiResult<Value> {
        self.post(Collection::Payments.endpoint(), serde_json::to_value(payment)?)
            .await
    }

    pub async fn get_accounts(&self) -> ApiResult<Listing<Account>> {
        Listing::from_value(self.get(Collection::Accounts.endpoint()).await?)
    }
}

/// Flattens a server error body into one readable line.
///
/// The API reports validation failures as `{field: [messages]}` maps and
/// other refusals as `{detail: message}` or plain strings.
pub fn error_detail(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(error_detail)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, error_detail(value)))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_detail_flattens_field_maps() {
        let body = json!({"password": ["Passwords must match."]});
        assert_eq!(error_detail(&body), "password: Passwords must match.");
    }

    #[test]
    fn error_detail_joins_multiple_fields() {
        let body = json!({
            "email": ["This field is required."],
            "password": ["Too short.", "Too common."]
        });
        let detail = error_detail(&body);
        assert!(detail.contains("email: This field is required."));
        assert!(detail.contains("password: Too short. Too common."));
    }

    #[test]
    fn error_detail_passes_strings_through() {
        assert_eq!(error_detail(&json!("throttled")), "throttled");
    }

    #[test]
    fn client_requires_a_base_url() {
        let config = ClientConfig::new(None, None, None, None);
        let err = ApiClient::new(&config, Session::in_memory()).unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[test]
    fn endpoint_url_joins_base_prefix_and_path() {
        let config = ClientConfig {
            base_url: Some("http://localhost:8000/".to_string()),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config, Session::in_memory()).unwrap();
        assert_eq!(
            client.endpoint_url("/hotel/"),
            "http://localhost:8000/api/hotel/"
        );
    }
}
