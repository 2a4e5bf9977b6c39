//! Turning a finished chain into a request for the database.
//!
//! [`prepare`] decides how the terminal expression is dispatched, renders the
//! whole chain and merges in caller-supplied arguments. [`query`] hands the
//! result to an [`Executor`], the client that actually talks to the database.
//!
//! A terminal [`Set`](crate::Set) is never sent as-is: it is wrapped in a page
//! first, so every collection result arrives bounded, with a cursor to resume
//! from. Pages, documents, scalars and projections go out directly.

use std::{collections::BTreeMap, time::Duration};

use crate::{
    chain::{Expression, Node, Rendered, Shape, Wrapped},
    value::{Arguments, Value},
};

/// How a terminal expression is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Rendered exactly as built
    Direct,
    /// Wrapped in a page before rendering
    AutoPaged,
}

impl Dispatch {
    pub fn for_shape(shape: Shape) -> Self {
        match shape {
            Shape::Set => Dispatch::AutoPaged,
            _ => Dispatch::Direct,
        }
    }
}

/// Per-query settings forwarded to the executor.
///
/// Only `arguments` is interpreted here: its entries are merged over the
/// chain's own arguments. Everything else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub arguments: Arguments,
    pub typecheck: Option<bool>,
    pub query_timeout: Option<Duration>,
    pub query_tags: BTreeMap<String, String>,
    pub linearized: Option<bool>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn typecheck(mut self, typecheck: bool) -> Self {
        self.typecheck = Some(typecheck);
        self
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn query_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_tags.insert(key.into(), value.into());
        self
    }

    pub fn linearized(mut self, linearized: bool) -> Self {
        self.linearized = Some(linearized);
        self
    }
}

/// A rendered query ready for execution.
///
/// `arguments` already includes the caller's arguments, which are removed
/// from `options`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub query: String,
    pub arguments: Arguments,
    pub options: QueryOptions,
    /// Shape of what was actually sent
    pub shape: Shape,
    pub dispatch: Dispatch,
}

/// Renders `entry` the way it will be dispatched.
pub fn render_for_dispatch<E: Expression + ?Sized>(entry: &E) -> (Dispatch, Rendered) {
    let dispatch = Dispatch::for_shape(entry.shape());
    let rendered = match dispatch {
        Dispatch::Direct => entry.render(),
        Dispatch::AutoPaged => Wrapped::new(Shape::Page, None)
            .link(Node::of(entry))
            .render(),
    };
    (dispatch, rendered)
}

/// Builds the request for `entry`.
///
/// # Examples
///
/// ```
/// use fql_chain::{Collection, CollectionDescriptor, QueryOptions, Shape, prepare};
///
/// let people = CollectionDescriptor::new("Person");
/// let request = prepare(&people.all(), QueryOptions::new().argument("limit", 10));
///
/// assert_eq!(request.query, "Person.all()");
/// assert_eq!(request.shape, Shape::Page);
/// assert!(request.arguments.contains_key("limit"));
/// ```
pub fn prepare<E: Expression + ?Sized>(entry: &E, mut options: QueryOptions) -> Request {
    let (dispatch, rendered) = render_for_dispatch(entry);
    let shape = match dispatch {
        Dispatch::Direct => entry.shape(),
        Dispatch::AutoPaged => Shape::Page,
    };

    let mut arguments = rendered.arguments;
    arguments.extend(std::mem::take(&mut options.arguments));

    tracing::debug!(
        shape = %shape,
        auto_paged = dispatch == Dispatch::AutoPaged,
        query = %rendered.query,
        arguments = arguments.len(),
        "prepared query"
    );

    Request {
        query: rendered.query,
        arguments,
        options,
        shape,
        dispatch,
    }
}

/// A client able to run a request and decode its result as `T`.
pub trait Executor<T> {
    type Error;

    fn execute(&self, request: Request) -> Result<T, Self::Error>;
}

/// Prepares `entry` and runs it on `executor`.
///
/// The result type follows the expression: a set yields a
/// [`PageOf`](crate::PageOf) its items, anything else its own output.
pub fn query<E, X>(executor: &X, entry: &E, options: QueryOptions) -> Result<E::Response, X::Error>
where
    E: Expression + ?Sized,
    X: Executor<E::Response>,
{
    executor.execute(prepare(entry, options))
}
