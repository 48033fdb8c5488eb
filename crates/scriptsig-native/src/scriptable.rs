// #[scriptable] proc-macro implementation
//
// Generates a ScriptClass impl listing the impl block's script-visible
// methods.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Result, Type, Visibility};

use crate::types::{encode_return, encode_type};

/// Arguments of `#[scriptable(...)]`
#[derive(Default)]
pub struct ScriptableArgs {
    name: Option<LitStr>,
    superclass: Option<LitStr>,
}

impl ScriptableArgs {
    pub fn parse(&mut self, meta: ParseNestedMeta) -> Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("superclass") {
            self.superclass = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `name` or `superclass`"))
        }
    }
}

/// One script-visible method
struct Message {
    selector: String,
    encoding: String,
}

/// Expands the #[scriptable] attribute macro.
///
/// Input: inherent impl block
/// Output: the impl block (minus `#[selector]` attributes) plus
/// `impl ::scriptsig::ScriptClass for Type`
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[scriptable]
/// impl Widget {
///     pub fn item(&self, index: i64) -> Option<ObjectHandle> { ... }
/// }
///
/// // Output:
/// impl Widget {
///     pub fn item(&self, index: i64) -> Option<ObjectHandle> { ... }
/// }
///
/// impl ::scriptsig::ScriptClass for Widget {
///     fn class_name() -> &'static str { "Widget" }
///     fn class_descriptor() -> ::scriptsig::ClassDescriptor {
///         let mut class = ::scriptsig::ClassDescriptor::new("Widget");
///         class = class.method("item:", "@q");
///         class
///     }
/// }
/// ```
pub fn expand_scriptable(args: ScriptableArgs, mut input: ItemImpl) -> Result<TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[scriptable] must be applied to an inherent impl block",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[scriptable] does not support generic impl blocks",
        ));
    }

    let class_name = match &args.name {
        Some(name) => name.value(),
        None => type_name(&input.self_ty)?,
    };

    let mut messages = Vec::new();
    for item in &mut input.items {
        if let ImplItem::Fn(method) = item {
            let selector_override = take_selector_attr(method)?;
            if let Some(message) = describe_method(method, selector_override) {
                messages.push(message);
            }
        }
    }

    let self_ty = &input.self_ty;
    let superclass = args.superclass.iter();
    let selectors = messages.iter().map(|m| &m.selector);
    let encodings = messages.iter().map(|m| &m.encoding);

    let expanded = quote! {
        #input

        impl ::scriptsig::ScriptClass for #self_ty {
            fn class_name() -> &'static str {
                #class_name
            }

            fn class_descriptor() -> ::scriptsig::ClassDescriptor {
                #[allow(unused_mut)]
                let mut class = ::scriptsig::ClassDescriptor::new(#class_name);
                #( class = class.with_superclass(#superclass); )*
                #( class = class.method(#selectors, #encodings); )*
                class
            }
        }
    };

    Ok(expanded)
}

/// Default class name: last path segment of the impl's self type
fn type_name(ty: &Type) -> Result<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "cannot name this type")),
        _ => Err(syn::Error::new_spanned(
            ty,
            "#[scriptable] needs `name = \"...\"` for this type",
        )),
    }
}

/// Remove `#[selector("...")]` from a method, returning its value
fn take_selector_attr(method: &mut ImplItemFn) -> Result<Option<String>> {
    let mut selector = None;
    let mut error = None;
    method.attrs.retain(|attr| {
        if !attr.path().is_ident("selector") {
            return true;
        }
        match attr.parse_args::<LitStr>() {
            Ok(lit) => selector = Some(lit.value()),
            Err(e) => error = Some(e),
        }
        false
    });
    match error {
        Some(e) => Err(e),
        None => Ok(selector),
    }
}

/// Selector and encoding for a public `&self` / `&mut self` method
fn describe_method(method: &ImplItemFn, selector_override: Option<String>) -> Option<Message> {
    if !matches!(method.vis, Visibility::Public(_)) {
        return None;
    }

    let mut inputs = method.sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => {}
        _ => return None,
    }

    let mut encoding = String::new();
    encoding.push(encode_return(&method.sig.output));
    let mut arg_count = 0;
    for arg in inputs {
        if let FnArg::Typed(pat_type) = arg {
            encoding.push(encode_type(&pat_type.ty));
            arg_count += 1;
        }
    }

    let selector = selector_override.unwrap_or_else(|| {
        let mut name = camel_case(&method.sig.ident.unraw().to_string());
        name.push_str(&":".repeat(arg_count));
        name
    });

    Some(Message { selector, encoding })
}

/// `get_element_by_id` -> `getElementById`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.trim_start_matches('_').chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
