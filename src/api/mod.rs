//! Signing & transport client for the payment gateway.
//!
//! [`GatewayClient`] turns a payment order into an authenticated HTTP
//! request and trusts only a response whose signature verifies. The flow for
//! one attempt:
//!
//! 1. merge caller options over documented defaults ([`PaymentOptions`])
//! 2. build the canonical JSON body from the model projections
//! 3. build the `checkout-*` header set and sign it together with the body
//! 4. POST to `{server_url}/payments`
//! 5. classify transport failures, verify the response signature, and only
//!    then parse the body
//!
//! Every failure emits one [`FailureReport`] to the configured notifier and
//! the log before the error is surfaced. Failures are never retried; the
//! `stamp` nonce is attempt-scoped.

use std::{
    fmt,
    sync::{Arc, LazyLock},
    time::Duration,
};

use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    config::{GatewayConfig, MerchantCredentials},
    error::{GatewayError, Result},
    model::{Address, Customer, Item, UrlPair, put_map, put_str, put_u64},
    notify::{FailureReport, LogNotifier, Notifier},
    signature::{HmacAlgorithm, calculate_hmac, validate_hmac},
};

/// Default HTTP client with connection pooling enabled.
///
/// A singleton avoids recreating the client per `GatewayClient`, preserving
/// connection pooling across all clients with default timeouts.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(100)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("failed to create default HTTP client")
});

/// Caller-supplied payment fields, merged over defaults by [`resolve`].
///
/// Leave a field `None` to get the documented default: a fresh UUIDv4
/// `stamp`, `sha256`, `POST`, and empty sub-objects (which the projection
/// then elides from the wire payload).
///
/// [`resolve`]: PaymentOptions::resolve
#[derive(Debug, Clone, Default)]
pub struct PaymentOptions {
    /// Attempt nonce; defaults to a fresh lowercase hyphenated UUIDv4.
    pub stamp: Option<String>,
    /// Signature algorithm; defaults to [`HmacAlgorithm::Sha256`].
    pub hmac_algorithm: Option<HmacAlgorithm>,
    /// HTTP method for the payment call; defaults to `POST`.
    pub http_method: Option<Method>,
    /// Order lines. Homogeneity is enforced by the type.
    pub items: Vec<Item>,
    /// Customer details.
    pub customer: Option<Customer>,
    /// Delivery address.
    pub delivery_address: Option<Address>,
    /// Invoicing address.
    pub invoicing_address: Option<Address>,
    /// Redirect URLs after payment.
    pub redirect_urls: Option<UrlPair>,
    /// Callback URLs for asynchronous status updates. Leave `None` when the
    /// deployment cannot receive callbacks over TLS.
    pub callback_urls: Option<UrlPair>,
}

impl PaymentOptions {
    /// Merges this set of options over the defaults.
    fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            stamp: self.stamp.unwrap_or_else(|| Uuid::new_v4().to_string()),
            hmac_algorithm: self.hmac_algorithm.unwrap_or_default(),
            http_method: self.http_method.unwrap_or(Method::POST),
            items: self.items,
            customer: self.customer.unwrap_or_default(),
            delivery_address: self.delivery_address.unwrap_or_default(),
            invoicing_address: self.invoicing_address.unwrap_or_default(),
            redirect_urls: self.redirect_urls.unwrap_or_default(),
            callback_urls: self.callback_urls.unwrap_or_default(),
        }
    }
}

/// Fully-defaulted payment fields.
#[derive(Debug)]
struct ResolvedOptions {
    stamp: String,
    hmac_algorithm: HmacAlgorithm,
    http_method: Method,
    items: Vec<Item>,
    customer: Customer,
    delivery_address: Address,
    invoicing_address: Address,
    redirect_urls: UrlPair,
    callback_urls: UrlPair,
}

/// A verified gateway response.
#[derive(Debug)]
pub struct PaymentResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Parsed JSON payload. Only ever populated from a response whose
    /// signature verified.
    pub body: Value,
}

impl PaymentResponse {
    /// Looks up a response header by its lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// The gateway's request-correlation id, when present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("cof-request-id")
    }
}

/// Outcome of a payment attempt, with the failure side-channel made explicit.
///
/// On failure the caller receives the error plus, when a failure URL was
/// supplied, a ready-made [`FailureRedirect`]. Persisting the error message
/// and navigating away is the caller's decision; the client never terminates
/// the process.
#[derive(Debug)]
pub enum PaymentAttempt {
    /// The gateway accepted the order and its response verified.
    Completed(PaymentResponse),
    /// The attempt failed; the error has already been reported once.
    Failed {
        /// What went wrong.
        error: GatewayError,
        /// Where to send the customer, when a failure URL was supplied.
        redirect: Option<FailureRedirect>,
    },
}

impl PaymentAttempt {
    /// True for [`PaymentAttempt::Completed`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Converts into a `Result`, dropping any redirect.
    ///
    /// # Errors
    ///
    /// Returns the attempt's error when it failed.
    pub fn into_result(self) -> Result<PaymentResponse> {
        match self {
            Self::Completed(response) => Ok(response),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Failure redirect the caller may act on.
#[derive(Debug, Clone)]
pub struct FailureRedirect {
    /// The failure URL supplied with the attempt.
    pub url: String,
    /// Error message to persist for the failure page (`orderError`).
    pub order_error: String,
}

/// Client for opening payments against the gateway.
///
/// Holds immutable merchant credentials, validated configuration, a pooled
/// HTTP client, and the notification sink. One client serves any number of
/// sequential checkout attempts; it keeps no per-attempt state.
///
/// # Examples
///
/// ```no_run
/// use checkout_gateway::{GatewayClient, GatewayConfig, MerchantCredentials, PaymentOptions};
///
/// # async fn example() -> checkout_gateway::Result<()> {
/// let credentials = MerchantCredentials::new("375917", "SAIPPUAKAUPPIAS");
/// let client = GatewayClient::new(credentials, GatewayConfig::default())?;
///
/// let response = client
///     .open_payment("order-1234", 2500, "EUR", "FI", PaymentOptions::default())
///     .await?;
/// println!("transaction: {}", response.body["transactionId"]);
/// # Ok(())
/// # }
/// ```
pub struct GatewayClient {
    credentials: MerchantCredentials,
    config: GatewayConfig,
    http: Client,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Creates a client from credentials and validated configuration.
    ///
    /// Clients with default timeouts share one pooled HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when the configuration is rejected.
    pub fn new(credentials: MerchantCredentials, config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        let http = if config.uses_default_timeouts() {
            DEFAULT_HTTP_CLIENT.clone()
        } else {
            Client::builder()
                .pool_max_idle_per_host(100)
                .timeout(config.timeout())
                .connect_timeout(config.connect_timeout())
                .build()?
        };

        Ok(Self { credentials, config, http, notifier: Arc::new(LogNotifier) })
    }

    /// Replaces the notification sink.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The client's configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Opens a payment at the gateway.
    ///
    /// Merges `options` over defaults, signs and transmits the order, and
    /// verifies the response signature before parsing the body. `amount`
    /// must equal the sum of `unit_price_minor × units` over the items, in
    /// minor currency units.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingResponse`]: the request never produced a
    ///   response
    /// - [`GatewayError::Transport`]: the response could not be read
    /// - [`GatewayError::UnexpectedStatus`]: the gateway answered non-2xx
    /// - [`GatewayError::SignatureMismatch`]: the response did not verify
    /// - [`GatewayError::InvalidResponse`]: a verified body was not JSON
    ///
    /// Each of these has been reported to the notifier and the log exactly
    /// once before it is returned.
    #[instrument(skip(self, options), fields(reference, amount, currency, language))]
    pub async fn open_payment(
        &self,
        reference: &str,
        amount: u64,
        currency: &str,
        language: &str,
        options: PaymentOptions,
    ) -> Result<PaymentResponse> {
        let resolved = options.resolve();

        let body = build_payment_body(reference, amount, currency, language, &resolved);
        let body = Value::Object(body).to_string();

        let mut headers = self.payment_headers(&resolved, reference);
        let signature =
            calculate_hmac(&self.credentials.shared_secret, resolved.hmac_algorithm, &headers, &body);
        headers.push(("signature".to_owned(), signature));

        let url = format!("{}/payments", self.config.server_url.trim_end_matches('/'));
        let mut request = self.http.request(resolved.http_method.clone(), url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = match request.body(body.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                self.report_failure(
                    FailureReport::new(&self.config.service_name, &e.to_string())
                        .with_request(headers, &body),
                );
                return Err(GatewayError::MissingResponse(e));
            }
        };

        let status = response.status().as_u16();
        let response_headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_owned(), value.to_str().unwrap_or("").to_owned()))
            .collect();

        let response_body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                self.report_failure(
                    FailureReport::new(&self.config.service_name, &e.to_string())
                        .with_request(headers, &body)
                        .with_response(status, response_headers, ""),
                );
                return Err(GatewayError::Transport(e));
            }
        };

        let payment = self.process_response(
            resolved.hmac_algorithm,
            headers,
            &body,
            status,
            response_headers,
            response_body,
        )?;

        info!(
            service = %self.config.service_name,
            request_id = payment.request_id().unwrap_or(""),
            "payment opened"
        );
        Ok(payment)
    }

    /// Opens a payment and folds failures into a [`PaymentAttempt`].
    ///
    /// Behaves exactly like [`open_payment`], but instead of an `Err` the
    /// caller gets [`PaymentAttempt::Failed`] carrying the error and, when
    /// `failure_url` is non-empty, a [`FailureRedirect`] with the error
    /// message as `order_error`.
    ///
    /// [`open_payment`]: Self::open_payment
    pub async fn open_payment_or_redirect(
        &self,
        reference: &str,
        amount: u64,
        currency: &str,
        language: &str,
        options: PaymentOptions,
        failure_url: Option<&str>,
    ) -> PaymentAttempt {
        match self.open_payment(reference, amount, currency, language, options).await {
            Ok(response) => PaymentAttempt::Completed(response),
            Err(error) => {
                let redirect = failure_url.filter(|url| !url.is_empty()).map(|url| {
                    FailureRedirect { url: url.to_owned(), order_error: error.to_string() }
                });
                PaymentAttempt::Failed { error, redirect }
            }
        }
    }

    /// Builds the signed header set for a payment request.
    fn payment_headers(
        &self,
        resolved: &ResolvedOptions,
        reference: &str,
    ) -> Vec<(String, String)> {
        vec![
            ("checkout-account".to_owned(), self.credentials.account_id.clone()),
            ("checkout-algorithm".to_owned(), resolved.hmac_algorithm.to_string()),
            ("checkout-method".to_owned(), resolved.http_method.as_str().to_owned()),
            ("checkout-nonce".to_owned(), reference.to_owned()),
            (
                "checkout-timestamp".to_owned(),
                Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("content-type".to_owned(), "application/json; charset=utf-8".to_owned()),
        ]
    }

    /// Classifies an obtained response: status check, signature verification,
    /// then JSON parsing. Reports each failure once.
    fn process_response(
        &self,
        algorithm: HmacAlgorithm,
        request_headers: Vec<(String, String)>,
        request_body: &str,
        status: u16,
        response_headers: Vec<(String, String)>,
        response_body: String,
    ) -> Result<PaymentResponse> {
        if !(200..300).contains(&status) {
            let error =
                GatewayError::UnexpectedStatus { status, body: response_body.clone() };
            self.report_failure(
                FailureReport::new(&self.config.service_name, &error.to_string())
                    .with_request(request_headers, request_body)
                    .with_response(status, response_headers, &response_body),
            );
            return Err(error);
        }

        let provided = response_headers
            .iter()
            .find(|(name, _)| name == "signature")
            .map(|(_, value)| value.clone());

        let verified = provided.as_deref().is_some_and(|signature| {
            validate_hmac(
                &self.credentials.shared_secret,
                algorithm,
                &response_headers,
                &response_body,
                signature,
            )
        });

        if !verified {
            warn!(service = %self.config.service_name, "response signature mismatch");
            self.report_failure(
                FailureReport::new(&self.config.service_name, "response HMAC signature mismatch")
                    .with_request(request_headers, request_body)
                    .with_response(status, response_headers, &response_body),
            );
            return Err(GatewayError::SignatureMismatch);
        }

        let body: Value = match serde_json::from_str(&response_body) {
            Ok(body) => body,
            Err(e) => {
                let error =
                    GatewayError::InvalidResponse(format!("response body is not valid JSON: {e}"));
                self.report_failure(
                    FailureReport::new(&self.config.service_name, &error.to_string())
                        .with_request(request_headers, request_body)
                        .with_response(status, response_headers, &response_body),
                );
                return Err(error);
            }
        };

        Ok(PaymentResponse { status, headers: response_headers, body })
    }

    /// Delivers one failure report to the log and the notification sink.
    fn report_failure(&self, report: FailureReport) {
        tracing::error!("{report}");
        self.notifier.notify(&report);
    }
}

/// Assembles the order payload: exactly the mandatory fields, object values
/// projected via `expose()`, items element-wise, empty values dropped.
///
/// The returned map serializes with keys in lexicographic order, which is
/// the canonical encoding both signed and transmitted.
fn build_payment_body(
    reference: &str,
    amount: u64,
    currency: &str,
    language: &str,
    resolved: &ResolvedOptions,
) -> Map<String, Value> {
    let mut body = Map::new();
    put_str(&mut body, "stamp", &resolved.stamp);
    put_str(&mut body, "reference", reference);
    put_u64(&mut body, "amount", amount);
    put_str(&mut body, "currency", currency);
    put_str(&mut body, "language", language);

    if !resolved.items.is_empty() {
        let items: Vec<Value> =
            resolved.items.iter().map(|item| Value::Object(item.expose())).collect();
        body.insert("items".to_owned(), Value::Array(items));
    }

    put_map(&mut body, "customer", resolved.customer.expose());
    put_map(&mut body, "deliveryAddress", resolved.delivery_address.expose());
    put_map(&mut body, "invoicingAddress", resolved.invoicing_address.expose());
    put_map(&mut body, "redirectUrls", resolved.redirect_urls.expose());
    put_map(&mut body, "callbackUrls", resolved.callback_urls.expose());
    body
}
