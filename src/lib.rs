//! Payment gateway client with HMAC-authenticated requests, responses, and
//! callbacks.
//!
//! This crate integrates a merchant checkout flow with a payment gateway
//! whose REST API authenticates every exchange — outbound payment requests,
//! their responses, and asynchronous status callbacks — with an HMAC over
//! the `checkout-`-prefixed parameters and the raw body.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   add_item / set_customer / set_urls
//! │    Checkout    │   per-attempt order builder, running amount
//! └───────┬────────┘
//!         │ create_order
//! ┌───────▼────────┐   merge defaults → canonical body → sign →
//! │  GatewayClient │   POST /payments → verify response signature
//! └───────┬────────┘
//!         │                         ┌───────────────────┐
//!         ▼                         │ CallbackValidator │ ◄── gateway
//!   PaymentAttempt                  └───────────────────┘     callback
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use checkout_gateway::{Checkout, GatewayClient, GatewayConfig, MerchantCredentials};
//!
//! # async fn example() -> checkout_gateway::Result<()> {
//! let credentials = MerchantCredentials::new("375917", "SAIPPUAKAUPPIAS");
//! let client = GatewayClient::new(credentials, GatewayConfig::default())?;
//!
//! let mut checkout = Checkout::new();
//! checkout.add_item(1990, 1, 24, "SKU-COFFEE", "2026-09-01", "coffee beans");
//! checkout.set_customer("ada@example.com", "Ada", "Lovelace", "", "");
//! checkout.set_urls("https://shop.example.com/ok", "https://shop.example.com/cancel");
//!
//! let attempt = checkout
//!     .create_order(&client, "order-1234", Some("https://shop.example.com/failure"))
//!     .await;
//! let response = attempt.into_result()?;
//! println!("payment page: {}", response.body["href"]);
//! # Ok(())
//! # }
//! ```
//!
//! Validating an inbound status callback:
//!
//! ```
//! use checkout_gateway::{CallbackValidator, MerchantCredentials};
//!
//! let validator = CallbackValidator::new(MerchantCredentials::new("375917", "secret"));
//!
//! let params = vec![("checkout-status".to_owned(), "ok".to_owned())];
//! if validator.has_validation_params(&params) && validator.validate_signature(&params) {
//!     // only now is the callback payload trustworthy
//! }
//! ```
//!
//! # Module organization
//!
//! - [`checkout`]: per-attempt order builder
//! - [`api`]: signing & transport client, payment options and outcomes
//! - [`model`]: order value objects and their wire projections
//! - [`signature`]: HMAC canonicalization, signing, constant-time
//!   verification
//! - [`webhook`]: callback validation
//! - [`config`]: merchant credentials and client configuration
//! - [`notify`]: failure diagnostics and the notification-sink seam
//! - [`error`]: error types
//!
//! # Security considerations
//!
//! - All monetary amounts are integers in minor currency units; the API
//!   never accepts major-unit values.
//! - The shared secret is redacted from `Debug` output and never part of a
//!   request body, header, or diagnostic.
//! - Signature verification is constant-time, and a response or callback
//!   that cannot be verified is never parsed or acted upon.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod signature;
pub mod webhook;

pub use api::{FailureRedirect, GatewayClient, PaymentAttempt, PaymentOptions, PaymentResponse};
pub use checkout::Checkout;
pub use config::{GatewayConfig, MerchantCredentials};
pub use error::{GatewayError, Result};
pub use model::{Address, Commission, Customer, Item, UrlPair};
pub use notify::{FailureReport, LogNotifier, Notifier};
pub use signature::{HmacAlgorithm, calculate_hmac, validate_hmac};
pub use webhook::CallbackValidator;
