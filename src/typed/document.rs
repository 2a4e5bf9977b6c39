use std::marker::PhantomData;

use serde::Deserialize;

use crate::{
    call::{Call, MethodCall},
    chain::{Expression, Node, Rendered, Shape, Wrapped, bind},
    projection::Projection,
    schema::{FieldType, Modality},
    typed::{Collection, step},
    value::{Arguments, Value},
};

/// A single document that may not exist.
pub struct Document<C: Collection, T = <C as Collection>::Record> {
    collection: C,
    inner: Wrapped,
    _record: PhantomData<fn() -> T>,
}

impl<C: Collection, T> Clone for Document<C, T> {
    fn clone(&self) -> Self {
        Document {
            collection: self.collection.clone(),
            inner: self.inner.clone(),
            _record: PhantomData,
        }
    }
}

impl<C: Collection, T> std::fmt::Debug for Document<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("collection", &self.collection.name())
            .field("query", &self.inner.render().query)
            .finish()
    }
}

impl<C: Collection, T> Document<C, T> {
    pub(crate) fn from_parts(collection: C, inner: Wrapped) -> Self {
        Document {
            collection,
            inner,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Requires the document to exist for the operation to succeed.
    pub fn forced(self) -> Self {
        Document::from_parts(self.collection, self.inner.forced())
    }

    pub fn merge_arguments(self, next: Arguments) -> Self {
        Document::from_parts(self.collection, self.inner.merge_arguments(next))
    }

    pub fn exists(&self) -> Call<bool> {
        Call::new(MethodCall::new("exists").link(Node::of(self)))
    }

    pub fn delete(&self) -> NullDocument<C> {
        NullDocument::from_parts(
            self.collection.clone(),
            step(Shape::NullDocument, MethodCall::new("delete"), Node::of(self)),
        )
    }

    /// Binds `payload` under `key` and renders `name(key)`.
    fn write(&self, name: &str, key: String, payload: Value) -> Document<C, T> {
        let operation = MethodCall::new(name)
            .arg(key.clone())
            .merge_arguments(bind(key, payload));
        Document::from_parts(
            self.collection.clone(),
            step(Shape::Document, operation, Node::of(self)),
        )
    }

    pub fn replace(&self, key: impl Into<String>, payload: impl Into<Value>) -> Document<C, T> {
        self.write("replace", key.into(), payload.into())
    }

    pub fn replace_data(&self, key: impl Into<String>, payload: impl Into<Value>) -> Document<C, T> {
        self.write("replaceData", key.into(), payload.into())
    }

    pub fn update(&self, key: impl Into<String>, payload: impl Into<Value>) -> Document<C, T> {
        self.write("update", key.into(), payload.into())
    }

    pub fn update_data(&self, key: impl Into<String>, payload: impl Into<Value>) -> Document<C, T> {
        self.write("updateData", key.into(), payload.into())
    }

    pub fn project<S: AsRef<str>>(&self, pick: &[S]) -> Projection {
        let input = FieldType::object(self.collection.complete_schema());
        let input = FieldType::new(Modality::optional(), input.kind);
        Projection::over(input, pick).link(Node::of(self))
    }
}

impl<C: Collection, T> Expression for Document<C, T> {
    type Output = Option<T>;
    type Response = Option<T>;

    fn shape(&self) -> Shape {
        Shape::Document
    }

    fn to_node(&self) -> Node {
        self.inner.clone().into_node()
    }

    fn render(&self) -> Rendered {
        self.inner.render()
    }
}

/// Reference to a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub coll: String,
}

/// What a deletion leaves behind: the reference and why it is now null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NullDoc {
    #[serde(rename = "ref")]
    pub reference: DocumentRef,
    pub cause: String,
}

/// The outcome of deleting a document.
pub struct NullDocument<C: Collection> {
    collection: C,
    inner: Wrapped,
}

impl<C: Collection> Clone for NullDocument<C> {
    fn clone(&self) -> Self {
        NullDocument {
            collection: self.collection.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<C: Collection> std::fmt::Debug for NullDocument<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NullDocument")
            .field("collection", &self.collection.name())
            .field("query", &self.inner.render().query)
            .finish()
    }
}

impl<C: Collection> NullDocument<C> {
    pub(crate) fn from_parts(collection: C, inner: Wrapped) -> Self {
        NullDocument { collection, inner }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Requires the document to exist before it is deleted.
    pub fn forced(self) -> Self {
        NullDocument::from_parts(self.collection, self.inner.forced())
    }
}

impl<C: Collection> Expression for NullDocument<C> {
    type Output = Option<NullDoc>;
    type Response = Option<NullDoc>;

    fn shape(&self) -> Shape {
        Shape::NullDocument
    }

    fn to_node(&self) -> Node {
        self.inner.clone().into_node()
    }

    fn render(&self) -> Rendered {
        self.inner.render()
    }
}
