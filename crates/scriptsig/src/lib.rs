//! scriptsig - method signature registry for script-to-native bridges
//!
//! Lets a scripting runtime call native object methods by selector without
//! per-method glue. Native classes register their messages with a
//! [`Catalog`]; at call time the bridge asks a [`DispatchResolver`] for the
//! [`MethodDescriptor`] of a selector and marshals arguments with it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use scriptsig::{Catalog, ClassDescriptor, DispatchResolver, ScriptValue};
//!
//! let catalog = Arc::new(Catalog::new());
//! catalog.register(
//!     &ClassDescriptor::new("Widget")
//!         .method("length", "Q")
//!         .method("item:", "@q"),
//! );
//!
//! let resolver = DispatchResolver::new(Arc::clone(&catalog));
//! let item = resolver.resolve_for_invocation(Some("Widget"), "item:")?;
//! let args = item.marshal_args(&[ScriptValue::Number(0.0)])?;
//! ```
//!
//! Native types can describe themselves with `#[scriptable]`:
//!
//! ```ignore
//! use scriptsig::{scriptable, ObjectHandle};
//!
//! struct Widget { items: Vec<ObjectHandle> }
//!
//! #[scriptable]
//! impl Widget {
//!     pub fn length(&self) -> u64 { self.items.len() as u64 }
//!     pub fn item(&self, index: i64) -> Option<ObjectHandle> { None }
//! }
//!
//! catalog.register_class::<Widget>();
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod descriptor;
pub mod dom;
pub mod encoding;
pub mod error;
pub mod global;
mod marshal;
pub mod options;
pub mod resolver;
pub mod value;

pub use catalog::{Catalog, RegistrationReport};
pub use descriptor::{ArgSlot, ClassDescriptor, MethodDescriptor, RawMethod, ScriptClass};
pub use encoding::{parse_encoding, SlotKind, TypeTag};
pub use error::{EncodingError, MarshalError, OptionsError, RegisterError, ResolveError};
pub use global::{
    add_method_signatures_for_class, find_method_signature_for_selector, global_catalog,
};
pub use options::{BridgeOptions, CatalogOptions, ResolverOptions};
pub use resolver::{DispatchResolver, Resolution, ResolvedVia};
pub use value::{NativeArg, ObjectHandle, ScriptValue};

pub use scriptsig_native::scriptable;

/// Catalog and resolver wired from one set of options
pub fn bridge(options: &BridgeOptions) -> (std::sync::Arc<Catalog>, DispatchResolver) {
    let catalog = std::sync::Arc::new(Catalog::with_options(options.catalog.clone()));
    let resolver =
        DispatchResolver::with_options(std::sync::Arc::clone(&catalog), options.resolver.clone());
    (catalog, resolver)
}
