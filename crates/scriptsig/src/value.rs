//! Values on either side of the bridge
//!
//! `ScriptValue` is what the scripting runtime hands over; `NativeArg` is one
//! filled slot of a native call frame, shaped by a `TypeTag`.

use crate::encoding::TypeTag;

/// Opaque handle to a native object wrapped for script code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u64);

/// A value coming from (or going back to) script code
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    /// `null` / `undefined`
    Null,
    /// Boolean
    Bool(bool),
    /// Number (scripts only have doubles)
    Number(f64),
    /// String
    Text(String),
    /// Binary buffer
    Bytes(Vec<u8>),
    /// Wrapped native object
    Object(ObjectHandle),
}

impl ScriptValue {
    /// Kind name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::Text(_) => "string",
            ScriptValue::Bytes(_) => "buffer",
            ScriptValue::Object(_) => "object",
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }
}

/// One marshaled native argument or return value
#[derive(Debug, Clone, PartialEq)]
pub enum NativeArg {
    /// No value
    Void,
    /// `B`
    Bool(bool),
    /// `c`
    I8(i8),
    /// `C`
    U8(u8),
    /// `s`
    I16(i16),
    /// `S`
    U16(u16),
    /// `i`
    I32(i32),
    /// `I`
    U32(u32),
    /// `q`
    I64(i64),
    /// `Q`
    U64(u64),
    /// `f`
    F32(f32),
    /// `d`
    F64(f64),
    /// `@`, `None` is a nil pointer
    Object(Option<ObjectHandle>),
    /// `#`, `None` is a nil pointer
    Class(Option<ObjectHandle>),
    /// `:`
    Selector(String),
    /// `*`
    Text(String),
    /// `%`
    Bytes(Vec<u8>),
}

impl NativeArg {
    /// Tag this value fills
    pub fn tag(&self) -> TypeTag {
        match self {
            NativeArg::Void => TypeTag::Void,
            NativeArg::Bool(_) => TypeTag::Bool,
            NativeArg::I8(_) => TypeTag::Int8,
            NativeArg::U8(_) => TypeTag::UInt8,
            NativeArg::I16(_) => TypeTag::Int16,
            NativeArg::U16(_) => TypeTag::UInt16,
            NativeArg::I32(_) => TypeTag::Int32,
            NativeArg::U32(_) => TypeTag::UInt32,
            NativeArg::I64(_) => TypeTag::Int64,
            NativeArg::U64(_) => TypeTag::UInt64,
            NativeArg::F32(_) => TypeTag::Float32,
            NativeArg::F64(_) => TypeTag::Float64,
            NativeArg::Object(_) => TypeTag::Object,
            NativeArg::Class(_) => TypeTag::Class,
            NativeArg::Selector(_) => TypeTag::Selector,
            NativeArg::Text(_) => TypeTag::Text,
            NativeArg::Bytes(_) => TypeTag::Bytes,
        }
    }

    /// Convert to the value script code sees
    pub fn into_script(self) -> ScriptValue {
        match self {
            NativeArg::Void => ScriptValue::Null,
            NativeArg::Bool(b) => ScriptValue::Bool(b),
            NativeArg::I8(v) => ScriptValue::Number(v as f64),
            NativeArg::U8(v) => ScriptValue::Number(v as f64),
            NativeArg::I16(v) => ScriptValue::Number(v as f64),
            NativeArg::U16(v) => ScriptValue::Number(v as f64),
            NativeArg::I32(v) => ScriptValue::Number(v as f64),
            NativeArg::U32(v) => ScriptValue::Number(v as f64),
            NativeArg::I64(v) => ScriptValue::Number(v as f64),
            NativeArg::U64(v) => ScriptValue::Number(v as f64),
            NativeArg::F32(v) => ScriptValue::Number(v as f64),
            NativeArg::F64(v) => ScriptValue::Number(v),
            NativeArg::Object(handle) | NativeArg::Class(handle) => {
                handle.map_or(ScriptValue::Null, ScriptValue::Object)
            }
            NativeArg::Selector(s) | NativeArg::Text(s) => ScriptValue::Text(s),
            NativeArg::Bytes(b) => ScriptValue::Bytes(b),
        }
    }
}
