// scriptsig-native: #[scriptable] attribute for native classes
//
// Turns an inherent impl block into a ScriptClass implementation whose
// descriptor lists every public `&self` method with a selector and a type
// encoding derived from its Rust signature.
//
// Example:
// ```
// #[scriptable(name = "Widget", superclass = "Element")]
// impl Widget {
//     pub fn length(&self) -> u64 { ... }
//     pub fn item(&self, index: i64) -> Option<ObjectHandle> { ... }
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemImpl};

mod scriptable;
mod types;

use scriptable::ScriptableArgs;

/// Describes a native class to the signature catalog.
///
/// Every `pub fn` taking `&self` or `&mut self` becomes a message:
/// - selector: the method name in camelCase plus one `:` per argument
///   (`get_element_by_id(&self, id: &str)` is `getElementById:`), or the
///   string given by `#[selector("...")]` on the method
/// - encoding: return type then argument types, see `scriptsig::encoding`
///
/// Types with no encoding are emitted as `?`; the catalog skips those
/// methods at registration and logs why.
///
/// Arguments:
/// - `name = "..."`: class name (defaults to the impl's type name)
/// - `superclass = "..."`: declared superclass
///
/// # Example
///
/// ```ignore
/// #[scriptable]
/// impl Widget {
///     pub fn length(&self) -> u64 {
///         self.items.len() as u64
///     }
///
///     #[selector("item:")]
///     pub fn element_at(&self, index: i64) -> Option<ObjectHandle> {
///         self.items.get(index as usize).copied()
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn scriptable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = ScriptableArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(meta));
    parse_macro_input!(attr with parser);

    let input = parse_macro_input!(item as ItemImpl);
    scriptable::expand_scriptable(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
