//! Class and method descriptors
//!
//! `ClassDescriptor` is what a native class hands to the catalog: its name,
//! its declared superclass, and the raw encoding of every message it
//! exposes. The catalog turns each raw message into a `MethodDescriptor`
//! once, at registration time.

use crate::encoding::{parse_for_selector, Signature, TypeTag};
use crate::error::EncodingError;

/// Raw message metadata as exposed by a native class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    /// Message selector (`item:`, `length`)
    pub selector: String,
    /// Type encoding, return type first
    pub encoding: String,
}

impl RawMethod {
    /// Create raw method metadata
    pub fn new(selector: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            encoding: encoding.into(),
        }
    }
}

/// A native class offered for registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Class name (identity within a catalog)
    pub name: String,
    /// Declared superclass, if any
    pub superclass: Option<String>,
    /// Messages the class itself declares
    pub methods: Vec<RawMethod>,
}

impl ClassDescriptor {
    /// Create a descriptor with no methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            methods: Vec::new(),
        }
    }

    /// Declare the superclass
    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add a message
    pub fn method(mut self, selector: impl Into<String>, encoding: impl Into<String>) -> Self {
        self.methods.push(RawMethod::new(selector, encoding));
        self
    }
}

/// Native types that can describe themselves to the catalog.
///
/// Usually implemented by `#[scriptable]`.
pub trait ScriptClass {
    /// Name the class registers under
    fn class_name() -> &'static str;

    /// Full descriptor for registration
    fn class_descriptor() -> ClassDescriptor;
}

/// One argument slot in the native call frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgSlot {
    /// Slot type
    pub tag: TypeTag,
    /// Byte offset from the start of the argument frame
    pub offset: usize,
}

/// Calling-convention record for one selector on one class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    selector: String,
    class_name: String,
    return_tag: TypeTag,
    args: Vec<ArgSlot>,
    frame_size: usize,
}

impl MethodDescriptor {
    /// Derive a descriptor from raw message metadata
    pub fn derive(class_name: &str, raw: &RawMethod) -> Result<Self, EncodingError> {
        let signature = parse_for_selector(&raw.selector, &raw.encoding)?;
        Ok(Self::from_signature(class_name, &raw.selector, &signature))
    }

    /// Lay out a parsed signature
    pub fn from_signature(class_name: &str, selector: &str, signature: &Signature) -> Self {
        let mut offset = 0;
        let mut args = Vec::with_capacity(signature.arg_tags.len());
        for &tag in &signature.arg_tags {
            offset = align_up(offset, tag.align());
            args.push(ArgSlot { tag, offset });
            offset += tag.size();
        }

        Self {
            selector: selector.to_string(),
            class_name: class_name.to_string(),
            return_tag: signature.return_tag,
            args,
            frame_size: align_up(offset, 8),
        }
    }

    /// Selector name
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Class that declared the message
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Return slot tag
    pub fn return_tag(&self) -> TypeTag {
        self.return_tag
    }

    /// Argument slots in call order
    pub fn args(&self) -> &[ArgSlot] {
        &self.args
    }

    /// Argument tags in call order
    pub fn arg_tags(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.args.iter().map(|slot| slot.tag)
    }

    /// Number of arguments
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Total argument frame size in bytes (8-byte aligned)
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Encoding string equivalent of this descriptor
    pub fn encoding(&self) -> String {
        self.signature().encoding()
    }

    /// Return and argument tags without layout
    pub fn signature(&self) -> Signature {
        Signature {
            return_tag: self.return_tag,
            arg_tags: self.arg_tags().collect(),
        }
    }

    /// Same argument and return tags, regardless of declaring class
    pub fn same_signature(&self, other: &MethodDescriptor) -> bool {
        self.return_tag == other.return_tag && self.args == other.args
    }
}

fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}
