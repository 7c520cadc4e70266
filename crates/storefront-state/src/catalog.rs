//! # Catalog
//!
//! The contract between views and the external Product Service.
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  List / detail view mounts                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Fetch::Loading  ──► spinner                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load_products(&service).await                                          │
//! │       │                                                                 │
//! │       ├── Ok(products) ──► Fetch::Ready(products) ──► list              │
//! │       │                                                                 │
//! │       └── Err(e) ────────► error! log ──► Fetch::Failed ──► nothing     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here retries or caches. A failed fetch leaves the cart and the
//! favorites exactly as they were.

use std::future::Future;

use storefront_core::{CoreError, Product, ProductId, ValidationError};
use tracing::{debug, error};

use crate::error::{CatalogError, CatalogResult};

/// The Product Service as seen by the state core.
pub trait ProductService {
    fn list_products(&self) -> impl Future<Output = CatalogResult<Vec<Product>>> + Send;

    fn get_product(&self, id: ProductId) -> impl Future<Output = CatalogResult<Product>> + Send;
}

// =============================================================================
// Fetch State
// =============================================================================

/// The loading/error pair a view renders for one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fetch<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

impl<T> Fetch<T> {
    /// Converts a service result, logging the failure if there is one.
    pub fn from_result(result: CatalogResult<T>, what: &str) -> Self {
        match result {
            Ok(value) => Fetch::Ready(value),
            Err(err) => {
                error!(error = %err, what, "catalog fetch failed");
                Fetch::Failed
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Fetch::Failed)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Fetch::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Fetch::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Loads the product list for the list view.
pub async fn load_products<S: ProductService>(service: &S) -> Fetch<Vec<Product>> {
    let fetch = Fetch::from_result(service.list_products().await, "product list");
    if let Some(products) = fetch.data() {
        debug!(count = products.len(), "product list loaded");
    }
    fetch
}

/// Loads one product for the detail view.
pub async fn load_product<S: ProductService>(service: &S, id: ProductId) -> Fetch<Product> {
    Fetch::from_result(service.get_product(id).await, "product detail")
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// A [`ProductService`] backed by a fixed product list.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    outage: Option<String>,
}

impl InMemoryCatalog {
    /// Builds a catalog, validating every product.
    ///
    /// ## Errors
    /// - A product fails [`Product::validate`]
    /// - Two products share an id
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id) {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: product.id.to_string(),
                }
                .into());
            }
        }
        Ok(InMemoryCatalog {
            products,
            outage: None,
        })
    }

    /// Parses a catalog JSON array (the `/products` response format).
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// A catalog whose every call fails as if the service were down.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        InMemoryCatalog {
            products: Vec::new(),
            outage: Some(reason.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn check_available(&self) -> CatalogResult<()> {
        match &self.outage {
            Some(reason) => Err(CatalogError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl ProductService for InMemoryCatalog {
    async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        self.check_available()?;
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        self.check_available()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }
}
