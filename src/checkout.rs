//! Per-attempt order builder.
//!
//! A [`Checkout`] accumulates items, customer details, an address, and the
//! redirect URL pair for exactly one payment attempt, deriving the total
//! amount as items are added. `create_order` consumes the builder, so a
//! builder can never be reused across attempts.

use crate::{
    api::{GatewayClient, PaymentAttempt, PaymentOptions},
    model::{Address, Customer, Item, UrlPair},
};

/// Order builder for a single checkout attempt.
///
/// The running `amount` is maintained incrementally by [`add_item`] and is
/// not settable by callers — it always equals the sum of
/// `unit_price_minor × units` over the added items.
///
/// [`add_item`]: Checkout::add_item
///
/// # Examples
///
/// ```no_run
/// use checkout_gateway::{Checkout, GatewayClient, GatewayConfig, MerchantCredentials};
///
/// # async fn example() -> checkout_gateway::Result<()> {
/// let credentials = MerchantCredentials::new("375917", "SAIPPUAKAUPPIAS");
/// let client = GatewayClient::new(credentials, GatewayConfig::default())?;
///
/// let mut checkout = Checkout::new();
/// checkout.add_item(1990, 1, 24, "SKU-COFFEE", "2026-09-01", "coffee beans");
/// checkout.set_customer("ada@example.com", "Ada", "Lovelace", "", "");
/// checkout.set_urls("https://shop.example.com/ok", "https://shop.example.com/cancel");
///
/// let attempt = checkout
///     .create_order(&client, "order-1234", Some("https://shop.example.com/failure"))
///     .await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    customer: Customer,
    address: Address,
    items: Vec<Item>,
    urls: UrlPair,
    amount: u64,
}

impl Checkout {
    /// Creates an empty builder for one checkout attempt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the customer details.
    pub fn set_customer(
        &mut self,
        email: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        vat_id: &str,
    ) {
        self.customer = Customer::new(email, first_name, last_name, phone, vat_id);
    }

    /// Sets the address, used for both the delivery and invoicing roles.
    pub fn set_address(
        &mut self,
        street_address: &str,
        postal_code: &str,
        city: &str,
        county: &str,
        country: &str,
    ) {
        self.address = Address::new(street_address, postal_code, city, county, country);
    }

    /// Adds an order line and grows the running amount by
    /// `unit_price_minor × units`.
    ///
    /// `unit_price_minor` is in minor currency units (cents for EUR) — never
    /// pass a major-unit value.
    pub fn add_item(
        &mut self,
        unit_price_minor: u64,
        units: u64,
        vat_percentage: u64,
        product_code: &str,
        delivery_date: &str,
        description: &str,
    ) {
        self.amount += unit_price_minor * units;
        self.items.push(Item::new(
            unit_price_minor,
            units,
            vat_percentage,
            product_code,
            delivery_date,
            description,
        ));
    }

    /// Sets the success and cancel URLs, used for both the redirect and
    /// callback roles.
    pub fn set_urls(&mut self, success: &str, cancel: &str) {
        self.urls = UrlPair::new(success, cancel);
    }

    /// The customer accumulated so far.
    #[must_use]
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// The items accumulated so far.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The URL pair accumulated so far.
    #[must_use]
    pub fn urls(&self) -> &UrlPair {
        &self.urls
    }

    /// The running total in minor currency units.
    #[must_use]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Assembles the order and opens the payment, consuming the builder.
    ///
    /// The same URL pair serves both the redirect and callback roles; when
    /// the client's configuration says callbacks cannot be delivered over
    /// TLS (`secure_callbacks` off), callback URLs are omitted from the
    /// order. Currency and language come from the client configuration.
    pub async fn create_order(
        self,
        client: &GatewayClient,
        reference: &str,
        failure_url: Option<&str>,
    ) -> PaymentAttempt {
        let Self { customer, address, items, urls, amount } = self;

        let callback_urls = client.config().secure_callbacks.then(|| urls.clone());
        let options = PaymentOptions {
            items,
            customer: Some(customer),
            delivery_address: Some(address.clone()),
            invoicing_address: Some(address),
            redirect_urls: Some(urls),
            callback_urls,
            ..PaymentOptions::default()
        };

        let currency = client.config().currency.clone();
        let language = client.config().language.clone();
        client
            .open_payment_or_redirect(reference, amount, &currency, &language, options, failure_url)
            .await
    }
}
