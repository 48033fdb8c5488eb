//! Argument marshaling against a method descriptor
//!
//! The bridge calls `marshal_args` right before invoking a native method and
//! `unmarshal_return` (or just `check_return`) on the way back. Conversions follow script semantics:
//! numbers are doubles, so integer slots only accept integral values in
//! range, and `null` is a nil pointer for object slots.

use crate::descriptor::MethodDescriptor;
use crate::encoding::TypeTag;
use crate::error::MarshalError;
use crate::value::{NativeArg, ScriptValue};

impl MethodDescriptor {
    /// Convert script arguments into native slots for this descriptor
    pub fn marshal_args(&self, args: &[ScriptValue]) -> Result<Vec<NativeArg>, MarshalError> {
        if args.len() != self.arg_count() {
            return Err(MarshalError::ArgumentCount {
                selector: self.selector().to_string(),
                expected: self.arg_count(),
                got: args.len(),
            });
        }

        self.arg_tags()
            .zip(args)
            .enumerate()
            .map(|(index, (tag, value))| marshal_value(index, tag, value))
            .collect()
    }

    /// Check that a native return value matches the declared return type
    pub fn check_return(&self, value: &NativeArg) -> Result<(), MarshalError> {
        if value.tag() != self.return_tag() {
            return Err(MarshalError::ReturnMismatch {
                expected: self.return_tag(),
                got: value.tag().name(),
            });
        }
        Ok(())
    }

    /// Check a native return value and convert it for script code
    pub fn unmarshal_return(&self, value: NativeArg) -> Result<ScriptValue, MarshalError> {
        self.check_return(&value)?;
        Ok(value.into_script())
    }
}

fn marshal_value(index: usize, tag: TypeTag, value: &ScriptValue) -> Result<NativeArg, MarshalError> {
    let mismatch = || MarshalError::TypeMismatch {
        index,
        expected: tag,
        got: value.type_name(),
    };

    if tag.is_integer() {
        let n = match value {
            ScriptValue::Number(n) => *n,
            ScriptValue::Bool(b) => f64::from(u8::from(*b)),
            _ => return Err(mismatch()),
        };
        return integer_arg(index, tag, n);
    }

    let arg = match (tag, value) {
        (TypeTag::Bool, ScriptValue::Bool(b)) => NativeArg::Bool(*b),
        (TypeTag::Bool, ScriptValue::Number(n)) => NativeArg::Bool(*n != 0.0 && !n.is_nan()),
        (TypeTag::Float32, ScriptValue::Number(n)) => NativeArg::F32(*n as f32),
        (TypeTag::Float64, ScriptValue::Number(n)) => NativeArg::F64(*n),
        (TypeTag::Object, ScriptValue::Object(h)) => NativeArg::Object(Some(*h)),
        (TypeTag::Object, ScriptValue::Null) => NativeArg::Object(None),
        (TypeTag::Class, ScriptValue::Object(h)) => NativeArg::Class(Some(*h)),
        (TypeTag::Class, ScriptValue::Null) => NativeArg::Class(None),
        (TypeTag::Selector, ScriptValue::Text(s)) => NativeArg::Selector(s.clone()),
        (TypeTag::Text, ScriptValue::Text(s)) => NativeArg::Text(s.clone()),
        (TypeTag::Bytes, ScriptValue::Bytes(b)) => NativeArg::Bytes(b.clone()),
        (TypeTag::Bytes, ScriptValue::Text(s)) => NativeArg::Bytes(s.as_bytes().to_vec()),
        _ => return Err(mismatch()),
    };
    Ok(arg)
}

fn integer_arg(index: usize, tag: TypeTag, n: f64) -> Result<NativeArg, MarshalError> {
    let out_of_range = || MarshalError::OutOfRange {
        index,
        tag,
        value: n,
    };

    let Some((min, end)) = tag.integer_range() else {
        return Err(out_of_range());
    };
    if !n.is_finite() || n.fract() != 0.0 || n < min || n >= end {
        return Err(out_of_range());
    }

    let arg = match tag {
        TypeTag::Int8 => NativeArg::I8(n as i8),
        TypeTag::UInt8 => NativeArg::U8(n as u8),
        TypeTag::Int16 => NativeArg::I16(n as i16),
        TypeTag::UInt16 => NativeArg::U16(n as u16),
        TypeTag::Int32 => NativeArg::I32(n as i32),
        TypeTag::UInt32 => NativeArg::U32(n as u32),
        TypeTag::Int64 => NativeArg::I64(n as i64),
        TypeTag::UInt64 => NativeArg::U64(n as u64),
        _ => return Err(out_of_range()),
    };
    Ok(arg)
}
