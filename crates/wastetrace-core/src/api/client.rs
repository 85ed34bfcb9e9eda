//! API gateway client for the waste-tracking backend.
//!
//! Every network call goes through [`ApiClient`]: the current bearer token
//! is read from the session store at send time and attached when present,
//! and an auth-rejected response clears the session store before the error
//! reaches the caller. Individual screens never repeat either contract.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::api::response::{
    parse_ack, parse_insights, parse_list, parse_login, parse_products, parse_record,
    parse_register, RegisterOutcome,
};
use crate::auth::SessionStore;
use crate::models::{
    Account, Entry, Insights, KycStatus, NewAccount, NewEntry, Product, RegistrationForm,
    ReportStats, User, UserStats,
};

/// HTTP request timeout in seconds.
/// The only bound on call duration - there is no retry or cancellation.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// API client for the wastetrace backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session store is shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client against the given base URL (including the `/api`
    /// path segment), sharing the given session store.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    /// The session store backing this client.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach-token step: read the current token at send time. A missing
    /// token sends the request unauthenticated; the backend decides whether
    /// that is acceptable.
    fn with_bearer(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and classify the response.
    ///
    /// An auth-rejected response clears the session store before the error
    /// propagates, so any other in-flight or subsequent call observes
    /// "unauthenticated" instead of retrying with a dead token.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .with_bearer(request)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        if matches!(err, ApiError::AuthRejected) {
            debug!("Auth rejected, invalidating local session");
            if let Err(e) = self.store.clear_all() {
                warn!(error = %e, "Failed to clear session after auth rejection");
            }
        }
        Err(err)
    }

    async fn request_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = self.execute(request).await?;
        response.text().await.map_err(ApiError::from_transport)
    }

    async fn request_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(bytes.to_vec())
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn accounts(&self) -> AccountsApi<'_> {
        AccountsApi { client: self }
    }

    pub fn entries(&self) -> EntriesApi<'_> {
        EntriesApi { client: self }
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi { client: self }
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }
}

/// `/auth` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// Log in with email and password.
    ///
    /// The response must carry both a token and a user profile; both are
    /// persisted together before this returns. A failed login leaves the
    /// session store untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let c = self.client;
        let body = serde_json::json!({ "email": email, "password": password });
        let text = c
            .request_text(c.http.post(c.url("/auth/login")).json(&body))
            .await?;

        let (token, user) = parse_login(&text)?;
        c.store.save_session(&token, &user)?;
        debug!(user = %user.email, "Login succeeded, session persisted");
        Ok(user)
    }

    /// Register a new account with a multipart profile payload.
    ///
    /// Client-side validation runs before any network I/O. When the backend
    /// signs the new user in, the session is persisted exactly as for login.
    pub async fn register(&self, form: &RegistrationForm) -> Result<RegisterOutcome> {
        form.validate().map_err(ApiError::from)?;

        let c = self.client;
        let mut payload = Form::new()
            .text("name", form.name.clone())
            .text("email", form.email.clone())
            .text("password", form.password.clone())
            .text("contact", form.contact.clone())
            .text("area", form.area.clone())
            .text("plot_number", form.plot_number.clone())
            .text("account_type", form.account_type.to_string())
            .text("kyc_status", KycStatus::Pending.to_string())
            .text("is_international", form.is_international.to_string());

        if let Some(ref doc) = form.id_document {
            let part = Part::bytes(doc.bytes.clone())
                .file_name(doc.file_name.clone())
                .mime_str(&doc.mime_type)?;
            payload = payload.part("id_document", part);
        }
        // The selfie travels as a base64 data URI in a text field, matching
        // what the capture screen produces.
        if let Some(ref selfie) = form.selfie {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&selfie.bytes);
            payload = payload.text(
                "selfie",
                format!("data:{};base64,{}", selfie.mime_type, encoded),
            );
        }

        let text = c
            .request_text(c.http.post(c.url("/auth/register")).multipart(payload))
            .await?;

        let outcome = parse_register(&text)?;
        if let RegisterOutcome::SignedIn {
            ref token,
            ref user,
        } = outcome
        {
            c.store.save_session(token, user)?;
            debug!(user = %user.email, "Registration signed in, session persisted");
        }
        Ok(outcome)
    }

    /// Per-user quantity statistics.
    pub async fn stats(&self) -> Result<UserStats> {
        let c = self.client;
        let text = c.request_text(c.http.get(c.url("/auth/stats"))).await?;
        Ok(parse_record(&text, "/auth/stats")?)
    }
}

/// `/accounts` endpoints.
pub struct AccountsApi<'a> {
    client: &'a ApiClient,
}

impl AccountsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Account>> {
        let c = self.client;
        let text = c.request_text(c.http.get(c.url("/accounts"))).await?;
        Ok(parse_list(&text, "/accounts")?)
    }

    pub async fn create(&self, account: &NewAccount) -> Result<Account> {
        let c = self.client;
        let text = c
            .request_text(c.http.post(c.url("/accounts")).json(account))
            .await?;
        Ok(parse_record(&text, "/accounts")?)
    }

    pub async fn block(&self, account_id: &str) -> Result<Option<String>> {
        let c = self.client;
        let path = format!("/accounts/{}/block", account_id);
        let text = c.request_text(c.http.post(c.url(&path))).await?;
        Ok(parse_ack(&text, &path)?)
    }

    pub async fn suspend(&self, account_id: &str) -> Result<Option<String>> {
        let c = self.client;
        let path = format!("/accounts/{}/suspend", account_id);
        let text = c.request_text(c.http.put(c.url(&path))).await?;
        Ok(parse_ack(&text, &path)?)
    }

    pub async fn unsuspend(&self, account_id: &str) -> Result<Option<String>> {
        let c = self.client;
        let path = format!("/accounts/{}/unsuspend", account_id);
        let text = c.request_text(c.http.put(c.url(&path))).await?;
        Ok(parse_ack(&text, &path)?)
    }

    pub async fn update_kyc(&self, account_id: &str, status: KycStatus) -> Result<Option<String>> {
        let c = self.client;
        let path = format!("/accounts/{}/kyc", account_id);
        let body = serde_json::json!({ "kyc_status": status });
        let text = c.request_text(c.http.put(c.url(&path)).json(&body)).await?;
        Ok(parse_ack(&text, &path)?)
    }

    pub async fn delete(&self, account_id: &str) -> Result<Option<String>> {
        let c = self.client;
        let path = format!("/accounts/{}", account_id);
        let text = c.request_text(c.http.delete(c.url(&path))).await?;
        Ok(parse_ack(&text, &path)?)
    }
}

/// `/entries` endpoints.
pub struct EntriesApi<'a> {
    client: &'a ApiClient,
}

impl EntriesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Entry>> {
        let c = self.client;
        let text = c.request_text(c.http.get(c.url("/entries"))).await?;
        Ok(parse_list(&text, "/entries")?)
    }

    /// Record a new transaction. Required-field validation runs before any
    /// network I/O; quantities are expected to be normalized already.
    pub async fn create(&self, entry: &NewEntry) -> Result<Entry> {
        entry.validate().map_err(ApiError::from)?;

        let c = self.client;
        let text = c
            .request_text(c.http.post(c.url("/entries")).json(entry))
            .await?;
        Ok(parse_record(&text, "/entries")?)
    }

    pub async fn delete(&self, entry_id: &str) -> Result<Option<String>> {
        let c = self.client;
        let path = format!("/entries/{}", entry_id);
        let text = c.request_text(c.http.delete(c.url(&path))).await?;
        Ok(parse_ack(&text, &path)?)
    }
}

/// `/reports` endpoints.
pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl ReportsApi<'_> {
    pub async fn stats(&self) -> Result<ReportStats> {
        let c = self.client;
        let text = c.request_text(c.http.get(c.url("/reports/stats"))).await?;
        Ok(parse_record(&text, "/reports/stats")?)
    }

    /// Fetch the exported report document (PDF bytes).
    pub async fn export(&self) -> Result<Vec<u8>> {
        let c = self.client;
        Ok(c.request_bytes(c.http.get(c.url("/reports/export")))
            .await?)
    }

    pub async fn insights(&self) -> Result<Insights> {
        let c = self.client;
        let text = c
            .request_text(c.http.get(c.url("/reports/insights")))
            .await?;
        Ok(parse_insights(&text)?)
    }
}

/// `/products` endpoint.
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ProductsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Product>> {
        let c = self.client;
        let text = c.request_text(c.http.get(c.url("/products"))).await?;
        Ok(parse_products(&text)?)
    }
}
