//! Signature catalog
//!
//! Maps selectors to calling-convention descriptors, populated one class at
//! a time. Each class keeps its own selector table; a global index records
//! which classes declare a selector, oldest first, so a class-agnostic lookup
//! can pick the most recently registered definer.
//!
//! Descriptors are derived before the write lock is taken and published as
//! `Arc`s, so readers only ever see a complete descriptor.
//!
//! Classes only store the selectors they declare. Inherited selectors are
//! found by walking the superclass chain on lookup, so a subclass always sees
//! the superclass's current descriptor, whichever was registered first.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::{ClassDescriptor, MethodDescriptor, ScriptClass};
use crate::error::RegisterError;
use crate::options::CatalogOptions;

/// Outcome of registering one class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Class that was registered
    pub class: String,
    /// Selectors the class declared that were registered
    pub registered: Vec<String>,
    /// Selectors reachable through the superclass chain at registration time
    pub inherited: Vec<String>,
    /// Selectors skipped because their encoding was malformed
    pub skipped: Vec<RegisterError>,
}

impl RegistrationReport {
    /// True if no selector was skipped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Default)]
struct ClassEntry {
    superclass: Option<String>,
    /// Descriptors the class declares itself
    methods: FxHashMap<String, Arc<MethodDescriptor>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    classes: FxHashMap<String, ClassEntry>,
    /// selector -> declaring classes, least recently registered first
    definers: FxHashMap<String, Vec<String>>,
}

impl CatalogState {
    /// Descriptor the class declares itself
    fn own_descriptor(&self, class: &str, selector: &str) -> Option<Arc<MethodDescriptor>> {
        self.classes.get(class)?.methods.get(selector).cloned()
    }

    /// Registered entries from `class` up its superclass chain, nearest
    /// first. Stops at the first unregistered class or repeated name.
    fn lineage<'a>(&'a self, class: &'a str, inherit: bool) -> Vec<&'a ClassEntry> {
        let mut lineage = Vec::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut next = Some(class);
        while let Some(name) = next {
            if !seen.insert(name) {
                break;
            }
            let Some(entry) = self.classes.get(name) else {
                break;
            };
            lineage.push(entry);
            if !inherit {
                break;
            }
            next = entry.superclass.as_deref();
        }
        lineage
    }

    /// Descriptor for (class, selector), inherited ones included
    fn descriptor(
        &self,
        class: &str,
        selector: &str,
        inherit: bool,
    ) -> Option<Arc<MethodDescriptor>> {
        if let Some(own) = self.own_descriptor(class, selector) {
            return Some(own);
        }
        self.lineage(class, inherit)
            .into_iter()
            .skip(1)
            .find_map(|entry| entry.methods.get(selector).cloned())
    }

    /// Selectors available on a class, own and inherited, sorted
    fn available_selectors(&self, class: &str, inherit: bool) -> Vec<String> {
        let mut selectors: Vec<String> = self
            .lineage(class, inherit)
            .into_iter()
            .flat_map(|entry| entry.methods.keys().cloned())
            .collect();
        selectors.sort();
        selectors.dedup();
        selectors
    }

    /// Descriptors of every declaring class, most recent first
    fn definer_descriptors(&self, selector: &str) -> Vec<Arc<MethodDescriptor>> {
        let Some(classes) = self.definers.get(selector) else {
            return Vec::new();
        };
        classes
            .iter()
            .rev()
            .filter_map(|class| self.own_descriptor(class, selector))
            .collect()
    }

    fn promote_definer(&mut self, selector: &str, class: &str) {
        let classes = self.definers.entry(selector.to_string()).or_default();
        classes.retain(|c| c != class);
        classes.push(class.to_string());
    }
}

/// Store of method descriptors, shared between registration and dispatch.
///
/// Safe to share across threads; registration takes the write lock for the
/// duration of one class's update, lookups take the read lock.
#[derive(Debug, Default)]
pub struct Catalog {
    options: CatalogOptions,
    state: RwLock<CatalogState>,
}

impl Catalog {
    /// Create an empty catalog with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog with the given options
    pub fn with_options(options: CatalogOptions) -> Self {
        Self {
            options,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Options this catalog was created with
    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    fn inherits(&self) -> bool {
        self.options.inherit_superclass_methods
    }

    /// Register (or re-register) a class.
    ///
    /// Selectors whose encoding is malformed are skipped and logged; the rest
    /// of the class still registers. Re-registering merges: selectors in the
    /// new descriptor overwrite, previously registered ones are kept.
    /// Subclasses pick up the new descriptors on their next lookup.
    pub fn register(&self, class: &ClassDescriptor) -> RegistrationReport {
        let mut report = RegistrationReport {
            class: class.name.clone(),
            ..Default::default()
        };

        let mut derived: Vec<Arc<MethodDescriptor>> = Vec::with_capacity(class.methods.len());
        for raw in &class.methods {
            match MethodDescriptor::derive(&class.name, raw) {
                Ok(desc) => {
                    derived.retain(|d| d.selector() != desc.selector());
                    derived.push(Arc::new(desc));
                }
                Err(source) => {
                    tracing::warn!(
                        class = %class.name,
                        selector = %raw.selector,
                        encoding = %raw.encoding,
                        error = %source,
                        "skipping malformed method signature"
                    );
                    report.skipped.push(RegisterError::MalformedDescriptor {
                        class: class.name.clone(),
                        selector: raw.selector.clone(),
                        source,
                    });
                }
            }
        }

        let mut state = self.state.write();

        if self.options.warn_on_conflict {
            for desc in &derived {
                for other in state.definer_descriptors(desc.selector()) {
                    if other.class_name() != class.name && !other.same_signature(desc) {
                        tracing::warn!(
                            selector = %desc.selector(),
                            class = %class.name,
                            encoding = %desc.encoding(),
                            other_class = %other.class_name(),
                            other_encoding = %other.encoding(),
                            "selector registered with conflicting signatures"
                        );
                    }
                }
            }
        }

        let entry = state.classes.entry(class.name.clone()).or_default();
        if class.superclass.is_some() {
            entry.superclass = class.superclass.clone();
        }
        for desc in &derived {
            entry
                .methods
                .insert(desc.selector().to_string(), Arc::clone(desc));
            report.registered.push(desc.selector().to_string());
        }

        for selector in &report.registered {
            state.promote_definer(selector, &class.name);
        }

        if self.inherits() {
            let lineage = state.lineage(&class.name, true);
            if let Some(last) = lineage.last() {
                if last.superclass.as_deref() == Some(class.name.as_str()) {
                    tracing::warn!(
                        class = %class.name,
                        "superclass chain loops back to the class; lookups stop at the repeat"
                    );
                }
            }
            if let Some((own, ancestors)) = lineage.split_first() {
                let mut inherited: Vec<String> = ancestors
                    .iter()
                    .flat_map(|entry| entry.methods.keys())
                    .filter(|selector| !own.methods.contains_key(selector.as_str()))
                    .cloned()
                    .collect();
                inherited.sort();
                inherited.dedup();
                report.inherited = inherited;
            }
        }
        drop(state);
        tracing::debug!(
            class = %report.class,
            registered = report.registered.len(),
            inherited = report.inherited.len(),
            skipped = report.skipped.len(),
            "registered class signatures"
        );
        report
    }

    /// Register a type that describes itself
    pub fn register_class<T: ScriptClass>(&self) -> RegistrationReport {
        self.register(&T::class_descriptor())
    }

    /// Descriptor for a selector from the most recently registered class
    /// declaring it
    pub fn lookup(&self, selector: &str) -> Option<Arc<MethodDescriptor>> {
        let state = self.state.read();
        let class = state.definers.get(selector)?.last()?;
        state.own_descriptor(class, selector)
    }

    /// Descriptor for an exact (class, selector) pair, inherited ones included
    pub fn lookup_in_class(&self, class: &str, selector: &str) -> Option<Arc<MethodDescriptor>> {
        self.state.read().descriptor(class, selector, self.inherits())
    }

    /// Descriptors from every class declaring the selector, most recent first
    pub fn definers(&self, selector: &str) -> Vec<Arc<MethodDescriptor>> {
        self.state.read().definer_descriptors(selector)
    }

    /// Descriptors for the selector if declaring classes disagree on its
    /// signature, most recent first; empty when there is no conflict
    pub fn conflicts(&self, selector: &str) -> Vec<Arc<MethodDescriptor>> {
        let definers = self.definers(selector);
        match definers.split_first() {
            Some((first, rest)) if rest.iter().any(|d| !d.same_signature(first)) => definers,
            _ => Vec::new(),
        }
    }

    /// Whether the class has been registered
    pub fn contains_class(&self, class: &str) -> bool {
        self.state.read().classes.contains_key(class)
    }

    /// Whether any class declares the selector
    pub fn contains_selector(&self, selector: &str) -> bool {
        self.state
            .read()
            .definers
            .get(selector)
            .is_some_and(|classes| !classes.is_empty())
    }

    /// Declared superclass of a registered class
    pub fn superclass_of(&self, class: &str) -> Option<String> {
        self.state.read().classes.get(class)?.superclass.clone()
    }

    /// Registered class names, sorted
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().classes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Selectors available on a class (own and inherited), sorted
    pub fn selectors_for_class(&self, class: &str) -> Vec<String> {
        self.state.read().available_selectors(class, self.inherits())
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.state.read().classes.len()
    }

    /// Check if no class is registered
    pub fn is_empty(&self) -> bool {
        self.state.read().classes.is_empty()
    }

    /// Number of distinct declared selectors
    pub fn selector_count(&self) -> usize {
        self.state.read().definers.len()
    }
}
