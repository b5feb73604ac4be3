//! Source descriptors and registry keys.
//!
//! [`SourceSpec`] describes sources at registration time (types or sample
//! instances), [`Sources`] carries the concrete instances handed to a map call.
//! Both reduce to the same [`SourceKey`], so a rule set registered for
//! `(A, B)` applies when mapping from an `(a, b)` tuple.

use std::fmt;

use attrmap_model::{AttributeSource, Record, RecordKind, TypeInfo, TypeKey};

/// Registry key for one source type or an ordered tuple of source types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKey {
    Single(TypeKey),
    Composite(Vec<TypeKey>),
}

impl SourceKey {
    pub fn of<S: Record>() -> Self {
        Self::Single(TypeKey::of::<S>())
    }

    pub fn composite(keys: impl IntoIterator<Item = TypeKey>) -> Self {
        Self::Composite(keys.into_iter().collect())
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(key) => write!(f, "{key}"),
            Self::Composite(keys) => {
                let names: Vec<&str> = keys.iter().map(TypeKey::name).collect();
                write!(f, "({})", names.join(", "))
            }
        }
    }
}

/// Registry key for a `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MappingKey {
    pub source: SourceKey,
    pub target: TypeKey,
}

impl MappingKey {
    pub fn new(source: SourceKey, target: TypeKey) -> Self {
        Self { source, target }
    }

    pub fn of<S: Record, T: Record>() -> Self {
        Self::new(SourceKey::of::<S>(), TypeKey::of::<T>())
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Source type names as they appear in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabel {
    names: Vec<&'static str>,
    collection: bool,
}

impl SourceLabel {
    pub fn new(names: Vec<&'static str>, collection: bool) -> Self {
        Self { names, collection }
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    /// Names in source order, parenthesized for collections.
    pub fn ordered(&self) -> String {
        if self.collection {
            format!("({})", self.names.join(", "))
        } else {
            self.names.join(", ")
        }
    }
}

/// Sorted names, parenthesized for collections.
impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.collection {
            return f.write_str(&self.names.join(", "));
        }
        let mut sorted = self.names.clone();
        sorted.sort_unstable();
        write!(f, "({})", sorted.join(", "))
    }
}

/// One registration-time source element.
pub enum SpecEntry<'a> {
    Type(TypeInfo),
    Instance(&'a dyn AttributeSource),
}

impl SpecEntry<'_> {
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Self::Type(info) => info.clone(),
            Self::Instance(source) => source.type_info(),
        }
    }
}

impl fmt::Debug for SpecEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(info) => f.debug_tuple("Type").field(&info.name()).finish(),
            Self::Instance(source) => f.debug_tuple("Instance").field(source).finish(),
        }
    }
}

/// What a rule set is registered for: a type, an instance, or an ordered
/// collection of either.
#[derive(Debug)]
pub struct SourceSpec<'a> {
    entries: Vec<SpecEntry<'a>>,
    collection: bool,
}

impl<'a> SourceSpec<'a> {
    /// A single source type.
    pub fn of<S: Record>() -> Self {
        Self {
            entries: vec![SpecEntry::Type(TypeInfo::of::<S>())],
            collection: false,
        }
    }

    /// A single sample instance; its instance attributes count as discoverable.
    pub fn instance(source: &'a dyn AttributeSource) -> Self {
        Self {
            entries: vec![SpecEntry::Instance(source)],
            collection: false,
        }
    }

    /// An ordered collection of source types.
    pub fn types(types: impl IntoIterator<Item = TypeInfo>) -> Self {
        Self {
            entries: types.into_iter().map(SpecEntry::Type).collect(),
            collection: true,
        }
    }

    /// Append a source type, turning the spec into a collection.
    #[must_use]
    pub fn then<S: Record>(mut self) -> Self {
        self.entries.push(SpecEntry::Type(TypeInfo::of::<S>()));
        self.collection = true;
        self
    }

    /// Append a sample instance, turning the spec into a collection.
    #[must_use]
    pub fn then_instance(mut self, source: &'a dyn AttributeSource) -> Self {
        self.entries.push(SpecEntry::Instance(source));
        self.collection = true;
        self
    }

    pub fn entries(&self) -> &[SpecEntry<'a>] {
        &self.entries
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn key(&self) -> SourceKey {
        let keys = self.entries.iter().map(|e| e.type_info().key());
        source_key(keys, self.collection)
    }

    pub fn label(&self) -> SourceLabel {
        let names = self.entries.iter().map(|e| e.type_info().name()).collect();
        SourceLabel::new(names, self.collection)
    }
}

impl<'a, S: Record> From<&'a S> for SourceSpec<'a> {
    fn from(source: &'a S) -> Self {
        Self::instance(source)
    }
}

/// Concrete source instances for a map call.
#[derive(Debug)]
pub struct Sources<'a> {
    items: Vec<&'a dyn AttributeSource>,
    collection: bool,
}

impl<'a> Sources<'a> {
    pub fn one(source: &'a dyn AttributeSource) -> Self {
        Self {
            items: vec![source],
            collection: false,
        }
    }

    /// An ordered collection; later sources shadow earlier ones.
    pub fn many(sources: impl IntoIterator<Item = &'a dyn AttributeSource>) -> Self {
        Self {
            items: sources.into_iter().collect(),
            collection: true,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a dyn AttributeSource> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn key(&self) -> SourceKey {
        let keys = self.items.iter().map(|s| s.type_info().key());
        source_key(keys, self.collection)
    }

    pub fn label(&self) -> SourceLabel {
        let names = self.items.iter().map(|s| s.type_info().name()).collect();
        SourceLabel::new(names, self.collection)
    }

    /// Record kind of the sources as a whole, reported in mapping logs.
    ///
    /// Models only when every element is a model; an empty collection counts
    /// as all-model. Attribute gathering picks an adapter per element and does
    /// not consult this.
    pub fn kind(&self) -> RecordKind {
        if self
            .items
            .iter()
            .all(|s| s.type_info().kind() == RecordKind::Model)
        {
            RecordKind::Model
        } else {
            RecordKind::Plain
        }
    }
}

impl<'a, S: Record> From<&'a S> for Sources<'a> {
    fn from(source: &'a S) -> Self {
        Self::one(source)
    }
}

impl<'a, A: Record, B: Record> From<(&'a A, &'a B)> for Sources<'a> {
    fn from((a, b): (&'a A, &'a B)) -> Self {
        Self::many([a as &dyn AttributeSource, b])
    }
}

impl<'a, A: Record, B: Record, C: Record> From<(&'a A, &'a B, &'a C)> for Sources<'a> {
    fn from((a, b, c): (&'a A, &'a B, &'a C)) -> Self {
        Self::many([a as &dyn AttributeSource, b, c])
    }
}

impl<'a> From<Vec<&'a dyn AttributeSource>> for Sources<'a> {
    fn from(sources: Vec<&'a dyn AttributeSource>) -> Self {
        Self::many(sources)
    }
}

fn source_key(keys: impl Iterator<Item = TypeKey>, collection: bool) -> SourceKey {
    let keys: Vec<TypeKey> = keys.collect();
    match keys.as_slice() {
        [only] if !collection => SourceKey::Single(*only),
        _ => SourceKey::Composite(keys),
    }
}
