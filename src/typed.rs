//! Typed expressions rooted at a collection.
//!
//! Each wrapper pairs the operation that produced it with the collection it
//! came from, and exposes only the operations that make sense for its shape:
//!
//! | Wrapper          | Evaluates to              | Shape          |
//! |------------------|---------------------------|----------------|
//! | [`Set`]          | `Vec<T>` (lazily)         | `Set`          |
//! | [`Document`]     | `Option<T>`               | `Document`     |
//! | [`NullDocument`] | `Option<NullDoc>`         | `NullDocument` |
//! | [`Page`]         | [`PageOf<T>`]             | `Page`         |
//!
//! Scalar results ([`Call`](crate::Call)) and projections
//! ([`Projection`](crate::Projection)) end a chain.

pub mod collection;
pub mod document;
pub mod page;
pub mod set;

pub use collection::{Collection, CollectionDescriptor, IndexSignature, ParamKind, sanitize_id};
pub use document::{Document, DocumentRef, NullDoc, NullDocument};
pub use page::{Page, PageOf};
pub use set::Set;

use std::sync::Arc;

use crate::{
    call::MethodCall,
    chain::{Node, Shape, Wrapped},
};

/// Wraps `operation` as a value of `shape` called on `predecessor`.
pub(crate) fn step(shape: Shape, operation: MethodCall, predecessor: Arc<Node>) -> Wrapped {
    Wrapped::new(shape, Some(operation)).link(predecessor)
}
