//! Type encodings for native message signatures
//!
//! A native class describes each message with a compact encoding string:
//! the return type code first, then one code per argument.
//!
//! ```text
//! v  void (return only)     B  bool
//! c  i8     C  u8           s  i16    S  u16
//! i  i32    I  u32          q  i64    Q  u64
//! f  f32    d  f64
//! @  object pointer         #  class pointer     :  selector
//! *  text (ptr + len)       %  byte buffer (ptr + len)
//! ?  unknown / unrepresentable native type
//! ```
//!
//! `length` returning `u64` is `"Q"`; `item:` taking an `i64` and returning
//! an object is `"@q"`.

use std::fmt;

use crate::error::EncodingError;

/// Width of a pointer-sized slot
const WORD: usize = 8;

/// Tag for one argument or return slot of a native message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// No value (return position only)
    Void,
    /// Boolean
    Bool,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// Object pointer
    Object,
    /// Class pointer
    Class,
    /// Selector reference
    Selector,
    /// Variable-length text buffer
    Text,
    /// Variable-length byte buffer
    Bytes,
}

/// How a slot is passed across the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Nothing is passed
    Empty,
    /// Fixed-size value passed inline
    Fixed,
    /// Pointer to a native object
    Pointer,
    /// Pointer plus length
    Variable,
}

impl TypeTag {
    /// Parse a single type code
    pub fn from_code(code: char) -> Option<Self> {
        let tag = match code {
            'v' => TypeTag::Void,
            'B' => TypeTag::Bool,
            'c' => TypeTag::Int8,
            'C' => TypeTag::UInt8,
            's' => TypeTag::Int16,
            'S' => TypeTag::UInt16,
            'i' => TypeTag::Int32,
            'I' => TypeTag::UInt32,
            'q' => TypeTag::Int64,
            'Q' => TypeTag::UInt64,
            'f' => TypeTag::Float32,
            'd' => TypeTag::Float64,
            '@' => TypeTag::Object,
            '#' => TypeTag::Class,
            ':' => TypeTag::Selector,
            '*' => TypeTag::Text,
            '%' => TypeTag::Bytes,
            _ => return None,
        };
        Some(tag)
    }

    /// Type code for this tag
    pub const fn code(self) -> char {
        match self {
            TypeTag::Void => 'v',
            TypeTag::Bool => 'B',
            TypeTag::Int8 => 'c',
            TypeTag::UInt8 => 'C',
            TypeTag::Int16 => 's',
            TypeTag::UInt16 => 'S',
            TypeTag::Int32 => 'i',
            TypeTag::UInt32 => 'I',
            TypeTag::Int64 => 'q',
            TypeTag::UInt64 => 'Q',
            TypeTag::Float32 => 'f',
            TypeTag::Float64 => 'd',
            TypeTag::Object => '@',
            TypeTag::Class => '#',
            TypeTag::Selector => ':',
            TypeTag::Text => '*',
            TypeTag::Bytes => '%',
        }
    }

    /// Passing convention for the tag
    pub const fn kind(self) -> SlotKind {
        match self {
            TypeTag::Void => SlotKind::Empty,
            TypeTag::Object | TypeTag::Class | TypeTag::Selector => SlotKind::Pointer,
            TypeTag::Text | TypeTag::Bytes => SlotKind::Variable,
            _ => SlotKind::Fixed,
        }
    }

    /// Size of the slot in bytes
    pub const fn size(self) -> usize {
        match self {
            TypeTag::Void => 0,
            TypeTag::Bool | TypeTag::Int8 | TypeTag::UInt8 => 1,
            TypeTag::Int16 | TypeTag::UInt16 => 2,
            TypeTag::Int32 | TypeTag::UInt32 | TypeTag::Float32 => 4,
            TypeTag::Int64 | TypeTag::UInt64 | TypeTag::Float64 => 8,
            TypeTag::Object | TypeTag::Class | TypeTag::Selector => WORD,
            TypeTag::Text | TypeTag::Bytes => 2 * WORD,
        }
    }

    /// Alignment of the slot in bytes
    pub const fn align(self) -> usize {
        match self.kind() {
            SlotKind::Empty => 1,
            SlotKind::Variable => WORD,
            _ => self.size(),
        }
    }

    /// Whether the tag is an integer type
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::UInt8
                | TypeTag::Int16
                | TypeTag::UInt16
                | TypeTag::Int32
                | TypeTag::UInt32
                | TypeTag::Int64
                | TypeTag::UInt64
        )
    }

    /// Half-open range `[min, end)` of integers representable by the tag
    ///
    /// Both bounds are powers of two (or zero), so they are exact as `f64`
    /// even for the 64-bit tags, where `MAX as f64` would round up past the
    /// type's range.
    pub fn integer_range(self) -> Option<(f64, f64)> {
        let range = match self {
            TypeTag::Int8 => (-128.0, 128.0),
            TypeTag::UInt8 => (0.0, 256.0),
            TypeTag::Int16 => (-32_768.0, 32_768.0),
            TypeTag::UInt16 => (0.0, 65_536.0),
            TypeTag::Int32 => (-2_147_483_648.0, 2_147_483_648.0),
            TypeTag::UInt32 => (0.0, 4_294_967_296.0),
            TypeTag::Int64 => (-9_223_372_036_854_775_808.0, 9_223_372_036_854_775_808.0),
            TypeTag::UInt64 => (0.0, 18_446_744_073_709_551_616.0),
            _ => return None,
        };
        Some(range)
    }

    /// Human-readable type name
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Bool => "bool",
            TypeTag::Int8 => "i8",
            TypeTag::UInt8 => "u8",
            TypeTag::Int16 => "i16",
            TypeTag::UInt16 => "u16",
            TypeTag::Int32 => "i32",
            TypeTag::UInt32 => "u32",
            TypeTag::Int64 => "i64",
            TypeTag::UInt64 => "u64",
            TypeTag::Float32 => "f32",
            TypeTag::Float64 => "f64",
            TypeTag::Object => "object",
            TypeTag::Class => "class",
            TypeTag::Selector => "selector",
            TypeTag::Text => "text",
            TypeTag::Bytes => "bytes",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed encoding: return tag plus ordered argument tags
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Return slot
    pub return_tag: TypeTag,
    /// Argument slots, in call order
    pub arg_tags: Vec<TypeTag>,
}

impl Signature {
    /// Render back to the compact encoding string
    pub fn encoding(&self) -> String {
        std::iter::once(self.return_tag)
            .chain(self.arg_tags.iter().copied())
            .map(TypeTag::code)
            .collect()
    }
}

/// Parse an encoding string into tags.
///
/// Whitespace is ignored so hand-written encodings can be spaced out.
pub fn parse_encoding(encoding: &str) -> Result<Signature, EncodingError> {
    let mut tags = Vec::with_capacity(encoding.len());

    for (position, code) in encoding.chars().enumerate() {
        if code.is_whitespace() {
            continue;
        }
        if code == '?' {
            return Err(EncodingError::UnsupportedType { position });
        }
        match TypeTag::from_code(code) {
            Some(tag) => tags.push(tag),
            None => return Err(EncodingError::UnknownTypeCode { code, position }),
        }
    }

    let mut tags = tags.into_iter();
    let return_tag = tags.next().ok_or(EncodingError::Empty)?;
    let arg_tags: Vec<TypeTag> = tags.collect();

    if let Some(index) = arg_tags.iter().position(|t| *t == TypeTag::Void) {
        return Err(EncodingError::VoidArgument { index });
    }

    Ok(Signature {
        return_tag,
        arg_tags,
    })
}

/// Number of arguments a keyword selector takes (one per `:`)
pub fn selector_arity(selector: &str) -> usize {
    selector.chars().filter(|c| *c == ':').count()
}

/// Check selector syntax
pub fn validate_selector(selector: &str) -> Result<(), EncodingError> {
    if selector.is_empty() || selector.starts_with(':') || selector.chars().any(char::is_whitespace)
    {
        return Err(EncodingError::InvalidSelector(selector.to_string()));
    }
    Ok(())
}

/// Parse an encoding and check it against the selector's arity
pub fn parse_for_selector(selector: &str, encoding: &str) -> Result<Signature, EncodingError> {
    validate_selector(selector)?;
    let signature = parse_encoding(encoding)?;
    let expected = selector_arity(selector);
    if signature.arg_tags.len() != expected {
        return Err(EncodingError::ArityMismatch {
            expected,
            found: signature.arg_tags.len(),
        });
    }
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        let sig = parse_encoding("Q").unwrap();
        assert_eq!(sig.return_tag, TypeTag::UInt64);
        assert!(sig.arg_tags.is_empty());
    }

    #[test]
    fn test_parse_item() {
        let sig = parse_encoding("@q").unwrap();
        assert_eq!(sig.return_tag, TypeTag::Object);
        assert_eq!(sig.arg_tags, vec![TypeTag::Int64]);
    }

    #[test]
    fn test_parse_preserves_order() {
        let sig = parse_encoding("v*%@d").unwrap();
        assert_eq!(
            sig.arg_tags,
            vec![TypeTag::Text, TypeTag::Bytes, TypeTag::Object, TypeTag::Float64]
        );
        assert_eq!(sig.encoding(), "v*%@d");
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        let sig = parse_encoding("@ q i").unwrap();
        assert_eq!(sig.encoding(), "@qi");
    }

    #[test]
    fn test_every_code_roundtrips() {
        for code in "vBcCsSiIqQfd@#:*%".chars() {
            let tag = TypeTag::from_code(code).unwrap();
            assert_eq!(tag.code(), code);
        }
    }

    #[test]
    fn test_empty_encoding() {
        assert_eq!(parse_encoding(""), Err(EncodingError::Empty));
        assert_eq!(parse_encoding("   "), Err(EncodingError::Empty));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            parse_encoding("@x"),
            Err(EncodingError::UnknownTypeCode {
                code: 'x',
                position: 1
            })
        );
    }

    #[test]
    fn test_unsupported_type() {
        assert_eq!(
            parse_encoding("v?"),
            Err(EncodingError::UnsupportedType { position: 1 })
        );
    }

    #[test]
    fn test_void_argument_rejected() {
        assert_eq!(
            parse_encoding("@qv"),
            Err(EncodingError::VoidArgument { index: 1 })
        );
    }

    #[test]
    fn test_selector_arity() {
        assert_eq!(selector_arity("length"), 0);
        assert_eq!(selector_arity("item:"), 1);
        assert_eq!(selector_arity("setValue:forKey:"), 2);
    }

    #[test]
    fn test_parse_for_selector_arity_mismatch() {
        assert_eq!(
            parse_for_selector("item:", "@"),
            Err(EncodingError::ArityMismatch {
                expected: 1,
                found: 0
            })
        );
        assert!(parse_for_selector("item:", "@q").is_ok());
    }

    #[test]
    fn test_invalid_selector() {
        assert!(parse_for_selector("", "v").is_err());
        assert!(parse_for_selector(":x", "vq").is_err());
        assert!(parse_for_selector("get item:", "@q").is_err());
    }

    #[test]
    fn test_integer_range_bounds() {
        assert_eq!(TypeTag::UInt8.integer_range(), Some((0.0, 256.0)));
        assert_eq!(
            TypeTag::Int64.integer_range(),
            Some((i64::MIN as f64, 2f64.powi(63)))
        );
        assert_eq!(TypeTag::UInt64.integer_range(), Some((0.0, 2f64.powi(64))));
        assert_eq!(TypeTag::Float64.integer_range(), None);
    }

    #[test]
    fn test_slot_kinds() {
        assert_eq!(TypeTag::Int32.kind(), SlotKind::Fixed);
        assert_eq!(TypeTag::Object.kind(), SlotKind::Pointer);
        assert_eq!(TypeTag::Text.kind(), SlotKind::Variable);
        assert_eq!(TypeTag::Void.kind(), SlotKind::Empty);
        assert_eq!(TypeTag::Text.size(), 16);
        assert_eq!(TypeTag::Text.align(), 8);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = parse_encoding("@*q").unwrap();
        let b = parse_encoding("@*q").unwrap();
        assert_eq!(a, b);
    }
}
