//! #[scriptable] Integration Tests
//!
//! Native types described with `#[scriptable]` register with the catalog
//! like hand-written descriptors:
//! - Selectors and encodings derived from Rust signatures
//! - `#[selector]` overrides
//! - Unrepresentable types skipped at registration
//! - Superclass inheritance
//!
//! # Running Tests
//! ```bash
//! cargo test --test scriptable_tests
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use scriptsig::{
    scriptable, Catalog, DispatchResolver, EncodingError, ObjectHandle, RegisterError,
    ScriptClass, TypeTag,
};

struct Element;

#[scriptable]
impl Element {
    pub fn get_element_by_id(&self, _id: &str) -> Option<ObjectHandle> {
        None
    }

    pub fn query_selector_all(&self, _selector: &str) -> Vec<ObjectHandle> {
        Vec::new()
    }

    pub fn set_hidden(&mut self, _hidden: bool) {}
}

struct Widget {
    items: Vec<ObjectHandle>,
}

#[scriptable(superclass = "Element")]
impl Widget {
    pub fn new(items: Vec<ObjectHandle>) -> Self {
        Self { items }
    }

    pub fn length(&self) -> u64 {
        self.items.len() as u64
    }

    #[selector("item:")]
    pub fn element_at(&self, index: i64) -> Option<ObjectHandle> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get(i))
            .copied()
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (0.0, 0.0, 0.0, 0.0)
    }

    fn internal_state(&self) -> usize {
        self.items.len()
    }
}

struct RenamedView;

#[scriptable(name = "GAView")]
impl RenamedView {
    pub fn set_frame_width(&self, _width: f64) {}
}

#[test]
fn test_generated_descriptor() {
    assert_eq!(Widget::class_name(), "Widget");

    let class = Widget::class_descriptor();
    assert_eq!(class.name, "Widget");
    assert_eq!(class.superclass.as_deref(), Some("Element"));

    let selectors: Vec<&str> = class.methods.iter().map(|m| m.selector.as_str()).collect();
    assert_eq!(selectors, vec!["length", "item:", "bounds"]);

    let encodings: Vec<&str> = class.methods.iter().map(|m| m.encoding.as_str()).collect();
    assert_eq!(encodings, vec!["Q", "@q", "?"]);
}

#[test]
fn test_register_scriptable_classes() {
    let catalog = Catalog::new();
    let element = catalog.register_class::<Element>();
    assert!(element.is_clean());
    assert_eq!(
        element.registered,
        vec!["getElementById:", "querySelectorAll:", "setHidden:"]
    );

    let widget = catalog.register_class::<Widget>();
    assert_eq!(widget.registered, vec!["length", "item:"]);
    assert_eq!(
        widget.inherited,
        vec!["getElementById:", "querySelectorAll:", "setHidden:"]
    );
    assert_eq!(
        widget.skipped,
        vec![RegisterError::MalformedDescriptor {
            class: "Widget".to_string(),
            selector: "bounds".to_string(),
            source: EncodingError::UnsupportedType { position: 0 },
        }]
    );

    let by_id = catalog.lookup_in_class("Widget", "getElementById:").unwrap();
    assert_eq!(by_id.arg_tags().collect::<Vec<_>>(), vec![TypeTag::Text]);
    assert_eq!(by_id.class_name(), "Element");

    let hidden = catalog.lookup("setHidden:").unwrap();
    assert_eq!(hidden.encoding(), "vB");
}

#[test]
fn test_generated_methods_still_callable() {
    let widget = Widget::new(vec![ObjectHandle(4), ObjectHandle(5)]);
    assert_eq!(widget.length(), 2);
    assert_eq!(widget.element_at(1), Some(ObjectHandle(5)));
    assert_eq!(widget.element_at(-1), None);
    assert_eq!(widget.internal_state(), 2);
}

#[test]
fn test_renamed_class() {
    assert_eq!(RenamedView::class_name(), "GAView");

    let catalog = Arc::new(Catalog::new());
    catalog.register_class::<RenamedView>();
    let resolver = DispatchResolver::new(Arc::clone(&catalog));
    let desc = resolver
        .resolve_for_invocation(Some("GAView"), "setFrameWidth:")
        .unwrap();
    assert_eq!(desc.encoding(), "vd");
}
