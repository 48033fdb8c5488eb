//! Browser-style query surface over native UI trees
//!
//! The DOM-shaped methods are ordinary catalog entries of a shared class so
//! script code gets a familiar `document.querySelectorAll(...)`,
//! `list.length`, `list.item(i)` object model. What they actually return is
//! up to the UI tree behind `ElementTree`.
//!
//! | selector                  | encoding | returns                 |
//! |---------------------------|----------|-------------------------|
//! | `length`                  | `Q`      | collection size         |
//! | `item:`                   | `@q`     | element or nil          |
//! | `getElementById:`         | `@*`     | element or nil          |
//! | `getElementsByTagName:`   | `@*`     | collection              |
//! | `getElementsByClassName:` | `@*`     | collection              |
//! | `querySelector:`          | `@*`     | element or nil          |
//! | `querySelectorAll:`       | `@*`     | collection              |
//! | `getComputedStyle:`       | `@@`     | style object or nil     |

use crate::catalog::{Catalog, RegistrationReport};
use crate::descriptor::ClassDescriptor;
use crate::value::{NativeArg, ObjectHandle};

/// Class the common DOM methods are registered under
pub const COMMON_CLASS: &str = "ScriptMethodSignatures";

/// Selector/encoding pairs of the common surface
pub const COMMON_METHODS: &[(&str, &str)] = &[
    ("length", "Q"),
    ("item:", "@q"),
    ("getElementById:", "@*"),
    ("getElementsByTagName:", "@*"),
    ("getElementsByClassName:", "@*"),
    ("querySelector:", "@*"),
    ("querySelectorAll:", "@*"),
    ("getComputedStyle:", "@@"),
];

/// Descriptor of the common DOM class
pub fn common_class_descriptor() -> ClassDescriptor {
    COMMON_METHODS
        .iter()
        .fold(ClassDescriptor::new(COMMON_CLASS), |class, (selector, encoding)| {
            class.method(*selector, *encoding)
        })
}

/// Register the common DOM class with a catalog
pub fn register_common_methods(catalog: &Catalog) -> RegistrationReport {
    catalog.register(&common_class_descriptor())
}

/// Native UI hierarchy the query methods read from
pub trait ElementTree: Send + Sync {
    /// Element with the given id
    fn element_by_id(&self, id: &str) -> Option<ObjectHandle>;

    /// Elements with the given tag name, in tree order
    fn elements_by_tag_name(&self, tag_name: &str) -> Vec<ObjectHandle>;

    /// Elements carrying the given class name, in tree order
    fn elements_by_class_name(&self, class_name: &str) -> Vec<ObjectHandle>;

    /// Elements matching a selector, in tree order
    fn query_selector_all(&self, selector: &str) -> Vec<ObjectHandle>;

    /// First element matching a selector
    fn query_selector(&self, selector: &str) -> Option<ObjectHandle> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Computed style object for an element
    fn computed_style(&self, element: ObjectHandle) -> Option<ObjectHandle>;
}

/// Ordered set of elements exposed to script as `length` / `item:`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementCollection {
    items: Vec<ObjectHandle>,
}

impl ElementCollection {
    /// Wrap a list of elements
    pub fn new(items: Vec<ObjectHandle>) -> Self {
        Self { items }
    }

    /// `length`
    pub fn length(&self) -> u64 {
        self.items.len() as u64
    }

    /// `item:`; out-of-range and negative indices give nil
    pub fn item(&self, index: i64) -> Option<ObjectHandle> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get(i))
            .copied()
    }

    /// Check if the collection has no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of a DOM query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// A single element
    Element(ObjectHandle),
    /// A collection (possibly empty)
    Collection(ElementCollection),
    /// No match
    Nothing,
}

impl From<Option<ObjectHandle>> for QueryResult {
    fn from(handle: Option<ObjectHandle>) -> Self {
        handle.map_or(QueryResult::Nothing, QueryResult::Element)
    }
}

/// Route a marshaled DOM call to the tree.
///
/// `args` must already be marshaled against the selector's descriptor.
/// Returns `None` for selectors that are not tree queries (`length` and
/// `item:` are answered by `ElementCollection`).
pub fn dispatch_query(
    tree: &dyn ElementTree,
    selector: &str,
    args: &[NativeArg],
) -> Option<QueryResult> {
    let result: QueryResult = match (selector, args) {
        ("getElementById:", [NativeArg::Text(id)]) => tree.element_by_id(id).into(),
        ("getElementsByTagName:", [NativeArg::Text(tag)]) => {
            QueryResult::Collection(ElementCollection::new(tree.elements_by_tag_name(tag)))
        }
        ("getElementsByClassName:", [NativeArg::Text(class)]) => {
            QueryResult::Collection(ElementCollection::new(tree.elements_by_class_name(class)))
        }
        ("querySelector:", [NativeArg::Text(sel)]) => tree.query_selector(sel).into(),
        ("querySelectorAll:", [NativeArg::Text(sel)]) => {
            QueryResult::Collection(ElementCollection::new(tree.query_selector_all(sel)))
        }
        ("getComputedStyle:", [NativeArg::Object(Some(element))]) => {
            tree.computed_style(*element).into()
        }
        ("getComputedStyle:", [NativeArg::Object(None)]) => QueryResult::Nothing,
        _ => return None,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TypeTag;

    struct FixedTree;

    impl ElementTree for FixedTree {
        fn element_by_id(&self, id: &str) -> Option<ObjectHandle> {
            (id == "main").then_some(ObjectHandle(1))
        }

        fn elements_by_tag_name(&self, tag_name: &str) -> Vec<ObjectHandle> {
            match tag_name {
                "button" => vec![ObjectHandle(2), ObjectHandle(3)],
                _ => Vec::new(),
            }
        }

        fn elements_by_class_name(&self, _class_name: &str) -> Vec<ObjectHandle> {
            Vec::new()
        }

        fn query_selector_all(&self, selector: &str) -> Vec<ObjectHandle> {
            match selector {
                ".primary" => vec![ObjectHandle(3), ObjectHandle(4)],
                _ => Vec::new(),
            }
        }

        fn computed_style(&self, element: ObjectHandle) -> Option<ObjectHandle> {
            Some(ObjectHandle(100 + element.0))
        }
    }

    #[test]
    fn test_register_common_methods() {
        let catalog = Catalog::new();
        let report = register_common_methods(&catalog);
        assert!(report.is_clean());
        assert_eq!(report.registered.len(), COMMON_METHODS.len());

        let by_id = catalog.lookup("getElementById:").unwrap();
        assert_eq!(by_id.class_name(), COMMON_CLASS);
        assert_eq!(by_id.arg_tags().collect::<Vec<_>>(), vec![TypeTag::Text]);
        assert_eq!(by_id.return_tag(), TypeTag::Object);

        let style = catalog.lookup("getComputedStyle:").unwrap();
        assert_eq!(style.arg_tags().collect::<Vec<_>>(), vec![TypeTag::Object]);
    }

    #[test]
    fn test_collection() {
        let list = ElementCollection::new(vec![ObjectHandle(1), ObjectHandle(2)]);
        assert_eq!(list.length(), 2);
        assert_eq!(list.item(1), Some(ObjectHandle(2)));
        assert_eq!(list.item(2), None);
        assert_eq!(list.item(-1), None);
        assert!(ElementCollection::default().is_empty());
    }

    #[test]
    fn test_dispatch_query() {
        let tree = FixedTree;
        let text = |s: &str| vec![NativeArg::Text(s.to_string())];

        assert_eq!(
            dispatch_query(&tree, "getElementById:", &text("main")),
            Some(QueryResult::Element(ObjectHandle(1)))
        );
        assert_eq!(
            dispatch_query(&tree, "getElementById:", &text("nope")),
            Some(QueryResult::Nothing)
        );
        assert_eq!(
            dispatch_query(&tree, "querySelector:", &text(".primary")),
            Some(QueryResult::Element(ObjectHandle(3)))
        );

        let Some(QueryResult::Collection(buttons)) =
            dispatch_query(&tree, "getElementsByTagName:", &text("button"))
        else {
            panic!("expected a collection");
        };
        assert_eq!(buttons.length(), 2);

        assert_eq!(
            dispatch_query(&tree, "getElementsByClassName:", &text("x")),
            Some(QueryResult::Collection(ElementCollection::default()))
        );
        assert_eq!(
            dispatch_query(
                &tree,
                "getComputedStyle:",
                &[NativeArg::Object(Some(ObjectHandle(5)))]
            ),
            Some(QueryResult::Element(ObjectHandle(105)))
        );
        assert_eq!(dispatch_query(&tree, "length", &[]), None);
    }
}
