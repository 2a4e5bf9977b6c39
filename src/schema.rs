//! Record shapes used for result-type bookkeeping.
//!
//! A [`Schema`] describes the fields of a document so that projections can
//! report how optionality and arrays propagate into their output. Nothing here
//! is consulted when rendering: an unknown path simply yields [`Kind::Unknown`].

use std::collections::BTreeMap;

use crate::path::{Path, PathSegment};

/// How a value is wrapped around its underlying kind.
///
/// Read from the outside in: `Optional(List(Plain))` is "an array that may be
/// absent", while `List(Optional(Plain))` is "an array whose items may be null".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modality {
    Plain,
    Optional(Box<Modality>),
    List(Box<Modality>),
}

impl Modality {
    pub fn optional() -> Self {
        Modality::Optional(Box::new(Modality::Plain))
    }

    pub fn list() -> Self {
        Modality::List(Box::new(Modality::Plain))
    }

    /// Marks the value as possibly absent. Already optional values are
    /// returned unchanged.
    pub fn map_optional(self) -> Self {
        match self {
            Modality::Optional(_) => self,
            other => Modality::Optional(Box::new(other)),
        }
    }

    pub fn map_list(self) -> Self {
        Modality::List(Box::new(self))
    }

    /// Places `inner` underneath `self`, so a field reached through an
    /// optional parent stays optional and one reached through an array is
    /// produced per element.
    pub fn compose(self, inner: Modality) -> Self {
        match self {
            Modality::Plain => inner,
            Modality::Optional(rest) => rest.compose(inner).map_optional(),
            Modality::List(rest) => rest.compose(inner).map_list(),
        }
    }

    /// Modality of one element when indexing into an array. `None` when
    /// there is no array to index.
    pub fn element(&self) -> Option<Modality> {
        match self {
            Modality::Plain => None,
            Modality::Optional(inner) => inner.element().map(Modality::map_optional),
            Modality::List(inner) => Some(inner.as_ref().clone()),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Modality::Optional(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            Modality::List(_) => true,
            Modality::Optional(inner) => inner.is_list(),
            Modality::Plain => false,
        }
    }
}

/// The underlying kind of a field, beneath its [`Modality`].
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Scalar,
    Object(Schema),
    /// Reference to a document of the named collection
    Reference(String),
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub modality: Modality,
    pub kind: Kind,
}

impl FieldType {
    pub fn new(modality: Modality, kind: Kind) -> Self {
        FieldType { modality, kind }
    }

    pub fn scalar() -> Self {
        FieldType::new(Modality::Plain, Kind::Scalar)
    }

    pub fn object(schema: Schema) -> Self {
        FieldType::new(Modality::Plain, Kind::Object(schema))
    }

    pub fn reference(collection: impl Into<String>) -> Self {
        FieldType::new(Modality::Plain, Kind::Reference(collection.into()))
    }

    pub fn unknown() -> Self {
        FieldType::new(Modality::Plain, Kind::Unknown)
    }

    pub fn optional(self) -> Self {
        FieldType::new(self.modality.map_optional(), self.kind)
    }

    pub fn list(self) -> Self {
        FieldType::new(self.modality.map_list(), self.kind)
    }

    /// Fields of an object kind, if this is one.
    pub fn fields(&self) -> Option<&Schema> {
        match &self.kind {
            Kind::Object(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Field layout of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: BTreeMap<String, FieldType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    /// Base document fields every stored document carries, extended with the
    /// collection's own fields.
    pub fn document(collection: &str, fields: &Schema) -> Self {
        let mut base = Schema::new()
            .field("id", FieldType::scalar())
            .field("coll", FieldType::reference(collection))
            .field("ts", FieldType::scalar())
            .field("ttl", FieldType::scalar().optional());
        base.fields
            .extend(fields.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        base
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldType)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sub-schema holding only `keys`. Keys the schema does not know are kept
    /// with an unknown type.
    pub fn pick<S: AsRef<str>>(&self, keys: &[S]) -> Schema {
        let fields = keys
            .iter()
            .map(|k| {
                let k = k.as_ref();
                let ty = self.get(k).cloned().unwrap_or_else(FieldType::unknown);
                (k.to_string(), ty)
            })
            .collect();
        Schema { fields }
    }

    /// Type of the value at `path`, composing the modality of every hop.
    pub fn lookup(&self, path: &Path) -> FieldType {
        let mut modality = Modality::Plain;
        let mut kind = Kind::Object(self.clone());

        for segment in path.segments() {
            match segment {
                PathSegment::Field(name) => {
                    let Kind::Object(schema) = &kind else {
                        return FieldType::unknown();
                    };
                    let Some(field) = schema.get(name) else {
                        return FieldType::unknown();
                    };
                    modality = modality.compose(field.modality.clone());
                    kind = field.kind.clone();
                }
                PathSegment::Index(_) => match modality.element() {
                    Some(element) => modality = element,
                    None => return FieldType::unknown(),
                },
            }
        }

        FieldType { modality, kind }
    }
}
