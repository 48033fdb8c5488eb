//! Dispatch resolution
//!
//! Resolution order for `resolve_for_invocation(class_hint, selector)`:
//!
//! 1. exact match on the hinted class (inherited selectors included)
//! 2. each configured fallback class, in order
//! 3. class-agnostic lookup by selector, if enabled
//!
//! Anything else is `ResolveError::NotResolvable`, which the bridge turns
//! into a script-level "method not found" error.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::descriptor::MethodDescriptor;
use crate::error::{ResolveError, ResolveResult};
use crate::options::ResolverOptions;

/// Which step of the resolution order produced a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedVia {
    /// The hinted class has the selector
    ExactClass,
    /// A configured fallback class has the selector
    Fallback(String),
    /// Lookup by selector alone
    ClassAgnostic,
}

/// Successful resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Descriptor to marshal the call with
    pub descriptor: Arc<MethodDescriptor>,
    /// How it was found
    pub via: ResolvedVia,
}

/// Resolves script-requested selectors against a catalog
#[derive(Debug, Clone)]
pub struct DispatchResolver {
    catalog: Arc<Catalog>,
    options: ResolverOptions,
}

impl DispatchResolver {
    /// Create a resolver with default options
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_options(catalog, ResolverOptions::default())
    }

    /// Create a resolver with the given options
    pub fn with_options(catalog: Arc<Catalog>, options: ResolverOptions) -> Self {
        Self { catalog, options }
    }

    /// Catalog this resolver reads from
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Options this resolver was created with
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Descriptor for a script-initiated call
    pub fn resolve_for_invocation(
        &self,
        class_hint: Option<&str>,
        selector: &str,
    ) -> ResolveResult<Arc<MethodDescriptor>> {
        self.resolve(class_hint, selector).map(|r| r.descriptor)
    }

    /// Like `resolve_for_invocation`, also reporting which step matched
    pub fn resolve(&self, class_hint: Option<&str>, selector: &str) -> ResolveResult<Resolution> {
        if let Some(class) = class_hint {
            if let Some(descriptor) = self.catalog.lookup_in_class(class, selector) {
                return Ok(Resolution {
                    descriptor,
                    via: ResolvedVia::ExactClass,
                });
            }
        }

        for fallback in &self.options.fallback_classes {
            if class_hint == Some(fallback.as_str()) {
                continue;
            }
            if let Some(descriptor) = self.catalog.lookup_in_class(fallback, selector) {
                tracing::debug!(
                    selector,
                    class_hint = class_hint.unwrap_or("<none>"),
                    fallback = %fallback,
                    "resolved through fallback class"
                );
                return Ok(Resolution {
                    descriptor,
                    via: ResolvedVia::Fallback(fallback.clone()),
                });
            }
        }

        if self.options.class_agnostic_fallback {
            if self.options.reject_ambiguous {
                let conflicts = self.catalog.conflicts(selector);
                if !conflicts.is_empty() {
                    return Err(ResolveError::AmbiguousSignature {
                        selector: selector.to_string(),
                        classes: conflicts
                            .iter()
                            .map(|d| d.class_name().to_string())
                            .collect(),
                    });
                }
            }
            if let Some(descriptor) = self.catalog.lookup(selector) {
                tracing::debug!(
                    selector,
                    class_hint = class_hint.unwrap_or("<none>"),
                    class = %descriptor.class_name(),
                    "resolved by selector alone"
                );
                return Ok(Resolution {
                    descriptor,
                    via: ResolvedVia::ClassAgnostic,
                });
            }
        }

        tracing::debug!(
            selector,
            class_hint = class_hint.unwrap_or("<none>"),
            "selector not resolvable"
        );
        Err(ResolveError::NotResolvable {
            class_hint: class_hint.map(str::to_string),
            selector: selector.to_string(),
        })
    }

    /// Whether a call would resolve
    pub fn responds_to(&self, class_hint: Option<&str>, selector: &str) -> bool {
        self.resolve(class_hint, selector).is_ok()
    }
}
