//! # Configuration
//!
//! Session configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after startup, so no lock is needed.

use serde::{Deserialize, Serialize};
use storefront_core::{Price, DISPLAY_DECIMALS};

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    /// Shown in the list view header.
    pub store_name: String,

    /// Base URL of the Product Service.
    pub catalog_url: String,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Decimal places prices are rounded to for display.
    pub currency_decimals: u32,
}

impl Default for StorefrontConfig {
    /// Defaults matching the public fake store catalog.
    fn default() -> Self {
        StorefrontConfig {
            store_name: "Shop Online".to_string(),
            catalog_url: "https://fakestoreapi.com".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: DISPLAY_DECIMALS,
        }
    }
}

impl StorefrontConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_STORE_NAME`
    /// - `STOREFRONT_CATALOG_URL`
    /// - `STOREFRONT_CURRENCY_CODE`
    /// - `STOREFRONT_CURRENCY_SYMBOL`
    /// - `STOREFRONT_CURRENCY_DECIMALS` (ignored unless it parses as 0..=8)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StorefrontConfig::default();

        if let Some(store_name) = lookup("STOREFRONT_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(catalog_url) = lookup("STOREFRONT_CATALOG_URL") {
            config.catalog_url = catalog_url.trim_end_matches('/').to_string();
        }

        if let Some(code) = lookup("STOREFRONT_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("STOREFRONT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("STOREFRONT_CURRENCY_DECIMALS") {
            if let Ok(decimals) = decimals.trim().parse::<u32>() {
                if decimals <= 8 {
                    config.currency_decimals = decimals;
                }
            }
        }

        config
    }

    /// URL of the product list endpoint.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.catalog_url)
    }

    /// Formats a price for display, e.g. `$19.98`.
    ///
    /// This is the only place prices are rounded.
    pub fn format_price(&self, price: Price) -> String {
        let rounded = price.rounded(self.currency_decimals).amount();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{}{}{:.prec$}",
            sign,
            self.currency_symbol,
            rounded.abs(),
            prec = self.currency_decimals as usize
        )
    }
}
