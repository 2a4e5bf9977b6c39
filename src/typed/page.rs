use std::marker::PhantomData;

use serde::Deserialize;

use crate::{
    chain::{Expression, Node, Rendered, Shape, Wrapped},
    projection::Projection,
    schema::{FieldType, Modality},
    typed::Collection,
};

/// A materialised page of items.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageOf<T> {
    pub data: Vec<T>,
    /// Cursor for the next page, absent on the last one
    #[serde(default)]
    pub after: Option<String>,
}

impl<T> Default for PageOf<T> {
    fn default() -> Self {
        PageOf {
            data: Vec::new(),
            after: None,
        }
    }
}

/// A bounded page taken from a set.
pub struct Page<C: Collection, T = <C as Collection>::Record> {
    collection: C,
    inner: Wrapped,
    _item: PhantomData<fn() -> T>,
}

impl<C: Collection, T> Clone for Page<C, T> {
    fn clone(&self) -> Self {
        Page {
            collection: self.collection.clone(),
            inner: self.inner.clone(),
            _item: PhantomData,
        }
    }
}

impl<C: Collection, T> std::fmt::Debug for Page<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("collection", &self.collection.name())
            .field("query", &self.inner.render().query)
            .finish()
    }
}

impl<C: Collection, T> Page<C, T> {
    pub(crate) fn from_parts(collection: C, inner: Wrapped) -> Self {
        Page {
            collection,
            inner,
            _item: PhantomData,
        }
    }

    /// Wraps an expression that already evaluates to a page without adding
    /// any text of its own.
    pub(crate) fn around(collection: C, predecessor: std::sync::Arc<Node>) -> Self {
        Page::from_parts(collection, Wrapped::new(Shape::Page, None).link(predecessor))
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn project<S: AsRef<str>>(&self, pick: &[S]) -> Projection {
        let input = FieldType::object(self.collection.complete_schema());
        let input = FieldType::new(Modality::list(), input.kind);
        Projection::over(input, pick).link(Node::of(self))
    }
}

impl<C: Collection, T> Expression for Page<C, T> {
    type Output = PageOf<T>;
    type Response = PageOf<T>;

    fn shape(&self) -> Shape {
        Shape::Page
    }

    fn to_node(&self) -> Node {
        self.inner.clone().into_node()
    }

    fn render(&self) -> Rendered {
        self.inner.render()
    }
}
