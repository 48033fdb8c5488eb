// Rust type -> type encoding code
//
// Mirrors the table in scriptsig::encoding. Anything without a faithful
// encoding maps to '?' so the catalog rejects it at registration instead of
// the macro refusing to compile the whole impl.

use syn::{GenericArgument, PathArguments, ReturnType, Type, TypePath};

const UNSUPPORTED: char = '?';

/// Encoding code for a return type
pub fn encode_return(output: &ReturnType) -> char {
    match output {
        ReturnType::Default => 'v',
        ReturnType::Type(_, ty) => encode_type(ty),
    }
}

/// Encoding code for a value type
pub fn encode_type(ty: &Type) -> char {
    match ty {
        Type::Paren(inner) => encode_type(&inner.elem),
        Type::Group(inner) => encode_type(&inner.elem),
        Type::Tuple(tuple) if tuple.elems.is_empty() => 'v',
        Type::Reference(reference) => encode_reference(&reference.elem),
        Type::Path(path) => encode_path(path),
        _ => UNSUPPORTED,
    }
}

fn encode_reference(elem: &Type) -> char {
    match elem {
        Type::Path(path) if path.path.is_ident("str") => '*',
        Type::Slice(slice) if is_u8(&slice.elem) => '%',
        Type::Path(path) => match encode_path(path) {
            '@' => '@',
            _ => UNSUPPORTED,
        },
        _ => UNSUPPORTED,
    }
}

fn encode_path(ty: &TypePath) -> char {
    if ty.qself.is_some() {
        return UNSUPPORTED;
    }
    let Some(segment) = ty.path.segments.last() else {
        return UNSUPPORTED;
    };

    match segment.ident.to_string().as_str() {
        "bool" => 'B',
        "i8" => 'c',
        "u8" => 'C',
        "i16" => 's',
        "u16" => 'S',
        "i32" => 'i',
        "u32" => 'I',
        "i64" | "isize" => 'q',
        "u64" | "usize" => 'Q',
        "f32" => 'f',
        "f64" => 'd',
        "String" => '*',
        "char" | "i128" | "u128" | "str" => UNSUPPORTED,
        "Vec" => match first_type_arg(&segment.arguments) {
            Some(elem) if is_u8(elem) => '%',
            Some(_) => '@',
            None => UNSUPPORTED,
        },
        // nil is only representable for pointer slots
        "Option" => match first_type_arg(&segment.arguments).map(encode_type) {
            Some('@') => '@',
            _ => UNSUPPORTED,
        },
        // errors surface to script as exceptions, the slot carries the value
        "Result" => first_type_arg(&segment.arguments)
            .map(encode_type)
            .unwrap_or(UNSUPPORTED),
        _ => '@',
    }
}

fn first_type_arg(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.path.is_ident("u8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn code(ty: Type) -> char {
        encode_type(&ty)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(code(parse_quote!(bool)), 'B');
        assert_eq!(code(parse_quote!(i32)), 'i');
        assert_eq!(code(parse_quote!(u64)), 'Q');
        assert_eq!(code(parse_quote!(usize)), 'Q');
        assert_eq!(code(parse_quote!(f64)), 'd');
        assert_eq!(code(parse_quote!(())), 'v');
    }

    #[test]
    fn test_text_and_bytes() {
        assert_eq!(code(parse_quote!(String)), '*');
        assert_eq!(code(parse_quote!(&str)), '*');
        assert_eq!(code(parse_quote!(&'a str)), '*');
        assert_eq!(code(parse_quote!(Vec<u8>)), '%');
        assert_eq!(code(parse_quote!(&[u8])), '%');
    }

    #[test]
    fn test_objects() {
        assert_eq!(code(parse_quote!(ObjectHandle)), '@');
        assert_eq!(code(parse_quote!(Option<ObjectHandle>)), '@');
        assert_eq!(code(parse_quote!(&Element)), '@');
        assert_eq!(code(parse_quote!(Vec<Element>)), '@');
        assert_eq!(code(parse_quote!(crate::ui::Element)), '@');
    }

    #[test]
    fn test_result_uses_ok_type() {
        assert_eq!(code(parse_quote!(Result<u32, String>)), 'I');
        assert_eq!(code(parse_quote!(Result<(), Error>)), 'v');
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(code(parse_quote!((i32, i32))), '?');
        assert_eq!(code(parse_quote!([u8; 4])), '?');
        assert_eq!(code(parse_quote!(*const u8)), '?');
        assert_eq!(code(parse_quote!(fn(i32) -> i32)), '?');
        assert_eq!(code(parse_quote!(Option<i32>)), '?');
        assert_eq!(code(parse_quote!(&i32)), '?');
        assert_eq!(code(parse_quote!(char)), '?');
    }

    #[test]
    fn test_return() {
        assert_eq!(encode_return(&parse_quote!()), 'v');
        assert_eq!(encode_return(&parse_quote!(-> u64)), 'Q');
    }
}
