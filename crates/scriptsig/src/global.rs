//! Process-wide catalog
//!
//! Convenience entry points for bridges that only ever run one script
//! environment. The catalog is created on first use and lives until exit.
//! Embedders running several environments should own a `Catalog` each.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::{Catalog, RegistrationReport};
use crate::descriptor::{ClassDescriptor, MethodDescriptor};

static GLOBAL_CATALOG: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::new()));

/// The process-wide catalog
pub fn global_catalog() -> Arc<Catalog> {
    Arc::clone(&GLOBAL_CATALOG)
}

/// Add method signatures from the given class to the process-wide catalog
pub fn add_method_signatures_for_class(class: &ClassDescriptor) -> RegistrationReport {
    GLOBAL_CATALOG.register(class)
}

/// Find a method signature for a selector in the process-wide catalog
pub fn find_method_signature_for_selector(selector: &str) -> Option<Arc<MethodDescriptor>> {
    GLOBAL_CATALOG.lookup(selector)
}
