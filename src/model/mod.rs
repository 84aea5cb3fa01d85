//! Order data model: plain value objects and their wire projections.
//!
//! Every type serializes through its `expose()` method, which returns only
//! the fields that carry a value — empty strings, zero amounts, and empty
//! nested objects are omitted, recursively. `expose()` is the sole path to
//! the wire format; nothing else in the crate hand-serializes these types.
//!
//! No validation happens at construction. All fields default to safe empty
//! values, so a partially-specified object is always valid to serialize.

use serde_json::{Map, Value};

/// Inserts a string field, skipping empty values.
pub(crate) fn put_str(map: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_owned(), Value::String(value.to_owned()));
    }
}

/// Inserts an integer field, skipping zero (zero means unset in this
/// protocol).
pub(crate) fn put_u64(map: &mut Map<String, Value>, key: &str, value: u64) {
    if value != 0 {
        map.insert(key.to_owned(), Value::from(value));
    }
}

/// Inserts a nested object, skipping empty projections.
pub(crate) fn put_map(map: &mut Map<String, Value>, key: &str, value: Map<String, Value>) {
    if !value.is_empty() {
        map.insert(key.to_owned(), Value::Object(value));
    }
}

/// Commission split for a line item, used by shop-in-shop merchants.
///
/// Elided entirely from the wire payload when both fields are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commission {
    /// Sub-merchant receiving the commission, in minor currency units.
    pub merchant_amount: u64,
    /// Commission amount in minor currency units.
    pub amount: u64,
}

impl Commission {
    /// Creates a commission split.
    #[must_use]
    pub fn new(merchant_amount: u64, amount: u64) -> Self {
        Self { merchant_amount, amount }
    }

    /// Wire projection; empty fields omitted.
    #[must_use]
    pub fn expose(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_u64(&mut map, "merchant", self.merchant_amount);
        put_u64(&mut map, "amount", self.amount);
        map
    }
}

/// A single order line.
///
/// `unit_price_minor` is the item price in the currency's smallest unit
/// (cents for EUR). This crate accepts minor units ONLY — never pass a
/// major-unit value, scaled or not. On the wire the field is named
/// `unitPrice`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Price per unit in minor currency units.
    pub unit_price_minor: u64,
    /// Number of units.
    pub units: u64,
    /// VAT percentage applied to this line.
    pub vat_percentage: u64,
    /// Merchant-side product code.
    pub product_code: String,
    /// Expected delivery date, `YYYY-MM-DD`.
    pub delivery_date: String,
    /// Line description shown on the payment page.
    pub description: String,
    /// Merchant-side category.
    pub category: String,
    /// Sub-merchant id for shop-in-shop orders; wire name `merchant`.
    pub merchant_id: u64,
    /// Line-level deduplication stamp.
    pub stamp: u64,
    /// Line-level reference.
    pub reference: u64,
    /// Commission split; elided when empty.
    pub commission: Commission,
}

impl Item {
    /// Creates a line item from the fields a checkout normally supplies.
    ///
    /// The remaining fields (`category`, `merchant_id`, `stamp`, `reference`,
    /// `commission`) default to unset and can be filled in on the returned
    /// value.
    #[must_use]
    pub fn new(
        unit_price_minor: u64,
        units: u64,
        vat_percentage: u64,
        product_code: &str,
        delivery_date: &str,
        description: &str,
    ) -> Self {
        Self {
            unit_price_minor,
            units,
            vat_percentage,
            product_code: product_code.to_owned(),
            delivery_date: delivery_date.to_owned(),
            description: description.to_owned(),
            ..Self::default()
        }
    }

    /// Wire projection; empty fields omitted, commission nested and filtered.
    #[must_use]
    pub fn expose(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_u64(&mut map, "unitPrice", self.unit_price_minor);
        put_u64(&mut map, "units", self.units);
        put_u64(&mut map, "vatPercentage", self.vat_percentage);
        put_str(&mut map, "productCode", &self.product_code);
        put_str(&mut map, "deliveryDate", &self.delivery_date);
        put_str(&mut map, "description", &self.description);
        put_str(&mut map, "category", &self.category);
        put_u64(&mut map, "merchant", self.merchant_id);
        put_u64(&mut map, "stamp", self.stamp);
        put_u64(&mut map, "reference", self.reference);
        put_map(&mut map, "commission", self.commission.expose());
        map
    }
}

/// Customer contact details. All fields optional; empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    /// Customer email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// VAT id for business customers.
    pub vat_id: String,
}

impl Customer {
    /// Creates customer details.
    #[must_use]
    pub fn new(email: &str, first_name: &str, last_name: &str, phone: &str, vat_id: &str) -> Self {
        Self {
            email: email.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            phone: phone.to_owned(),
            vat_id: vat_id.to_owned(),
        }
    }

    /// Wire projection; empty fields omitted.
    #[must_use]
    pub fn expose(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_str(&mut map, "email", &self.email);
        put_str(&mut map, "firstName", &self.first_name);
        put_str(&mut map, "lastName", &self.last_name);
        put_str(&mut map, "phone", &self.phone);
        put_str(&mut map, "vatId", &self.vat_id);
        map
    }
}

/// Postal address for the delivery and invoicing roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Street address line.
    pub street_address: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// County or region.
    pub county: String,
    /// Two-letter country code.
    pub country: String,
}

impl Address {
    /// Creates an address. An empty `country` falls back to `"FI"`; the
    /// all-empty [`Address::default`] stays empty so an unset address still
    /// vanishes from the payload.
    #[must_use]
    pub fn new(
        street_address: &str,
        postal_code: &str,
        city: &str,
        county: &str,
        country: &str,
    ) -> Self {
        Self {
            street_address: street_address.to_owned(),
            postal_code: postal_code.to_owned(),
            city: city.to_owned(),
            county: county.to_owned(),
            country: if country.is_empty() { "FI".to_owned() } else { country.to_owned() },
        }
    }

    /// Wire projection; empty fields omitted.
    #[must_use]
    pub fn expose(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_str(&mut map, "streetAddress", &self.street_address);
        put_str(&mut map, "postalCode", &self.postal_code);
        put_str(&mut map, "city", &self.city);
        put_str(&mut map, "county", &self.county);
        put_str(&mut map, "country", &self.country);
        map
    }
}

/// Success and cancel URLs, reused for both the redirect and callback roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPair {
    /// Target after a successful payment.
    pub success: String,
    /// Target after a cancelled payment.
    pub cancel: String,
}

impl UrlPair {
    /// Creates a URL pair.
    #[must_use]
    pub fn new(success: &str, cancel: &str) -> Self {
        Self { success: success.to_owned(), cancel: cancel.to_owned() }
    }

    /// Wire projection; empty fields omitted.
    #[must_use]
    pub fn expose(&self) -> Map<String, Value> {
        let mut map = Map::new();
        put_str(&mut map, "success", &self.success);
        put_str(&mut map, "cancel", &self.cancel);
        map
    }
}
