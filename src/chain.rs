//! # Chain links
//!
//! Every expression is built by calling a method on an existing one. The new
//! expression remembers the expression it was called on (its predecessor) in
//! a [`Chain`], and rendering walks those links back to the root to produce
//! the query text in the order the calls were written.
//!
//! ## Ownership
//!
//! Predecessors are stored as [`Arc<Node>`] snapshots. A builder method takes
//! its receiver by reference, snapshots it into a node and links that node
//! into the expression it returns, so the receiver can keep being extended
//! (branching) and nothing already linked is ever mutated. Methods that do
//! change an expression in place, such as `forced()`, consume it and hand back
//! a new value.
//!
//! ## Rendering
//!
//! ```text
//! Person.all().where(.age > 18).count()
//! ^^^^^^ ^^^^^ ^^^^^^^^^^^^^^^ ^^^^^^^
//! root   link  link            terminal
//! ```
//!
//! Each node renders its predecessors first and then appends its own fragment.
//! Argument maps are merged in the same order, with a node's own arguments
//! applied last.

use std::sync::Arc;

use crate::{
    call::MethodCall,
    projection::Projection,
    value::{Arguments, Value},
};

/// Query text plus the named literal arguments it refers to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub query: String,
    pub arguments: Arguments,
}

/// Runtime category of an expression.
///
/// This is the only piece of result typing visible at runtime; the precise
/// result type lives in [`Expression::Output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Collection,
    /// A single document that may be absent
    Document,
    /// Outcome of a deletion
    NullDocument,
    /// An unbounded, lazily evaluated set of items
    Set,
    /// A bounded page of items with an optional continuation cursor
    Page,
    Scalar,
    Projection,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Collection => "collection",
            Shape::Document => "document",
            Shape::NullDocument => "null document",
            Shape::Set => "set",
            Shape::Page => "page",
            Shape::Scalar => "scalar",
            Shape::Projection => "projection",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predecessor links and the literal arguments a node contributes.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    links: Vec<Arc<Node>>,
    arguments: Arguments,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(mut self, predecessor: Arc<Node>) -> Self {
        self.links.push(predecessor);
        self
    }

    /// Shallow-merges `next` into this node's arguments; keys in `next` win.
    pub fn merge_arguments(mut self, next: Arguments) -> Self {
        self.arguments.extend(next);
        self
    }

    pub fn links(&self) -> &[Arc<Node>] {
        &self.links
    }

    pub fn last(&self) -> Option<&Arc<Node>> {
        self.links.last()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Renders predecessors only. Each later link is prepended to the text,
    /// and its arguments merged over the earlier ones.
    pub(crate) fn compose(&self) -> Rendered {
        let mut composed = Rendered::default();
        for link in &self.links {
            let Rendered { query, arguments } = link.render();
            composed.query.insert_str(0, &query);
            composed.arguments.extend(arguments);
        }
        composed
    }

    pub(crate) fn overlay(&self, rendered: &mut Rendered) {
        rendered
            .arguments
            .extend(self.arguments.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn render(&self) -> Rendered {
        let mut rendered = self.compose();
        self.overlay(&mut rendered);
        rendered
    }
}

/// An expression whose result type is tracked by the compiler.
///
/// `Output` is what the expression evaluates to and `Response` is what the
/// database sends back when it is executed on its own (a set arrives as a
/// page). Neither has a runtime accessor.
pub trait Expression {
    type Output;
    type Response;

    fn shape(&self) -> Shape;

    /// Snapshot of this expression for linking into a successor.
    fn to_node(&self) -> Node;

    fn render(&self) -> Rendered;
}

/// Type-erased expression stored as a chain link.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    /// Bare root token such as a collection name
    Root(String),
    Call(MethodCall),
    Wrapped(Wrapped),
    Projection(Projection),
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Node { kind }
    }

    pub fn root(token: impl Into<String>) -> Self {
        Node::new(NodeKind::Root(token.into()))
    }

    /// Snapshots `expr` into a shareable link.
    pub fn of<E: Expression + ?Sized>(expr: &E) -> Arc<Node> {
        Arc::new(expr.to_node())
    }

    pub fn shape(&self) -> Shape {
        match &self.kind {
            NodeKind::Root(_) => Shape::Collection,
            NodeKind::Call(_) => Shape::Scalar,
            NodeKind::Wrapped(w) => w.shape,
            NodeKind::Projection(_) => Shape::Projection,
        }
    }

    pub fn render(&self) -> Rendered {
        match &self.kind {
            NodeKind::Root(token) => Rendered {
                query: token.clone(),
                arguments: Arguments::new(),
            },
            NodeKind::Call(call) => call.render(),
            NodeKind::Wrapped(w) => w.render(),
            NodeKind::Projection(p) => p.render(),
        }
    }
}

/// Erased nodes keep their runtime shape but lose the result type.
impl Expression for Node {
    type Output = Value;
    type Response = Value;

    fn shape(&self) -> Shape {
        Node::shape(self)
    }

    fn to_node(&self) -> Node {
        self.clone()
    }

    fn render(&self) -> Rendered {
        Node::render(self)
    }
}

/// Token a set renders with when nothing precedes it.
const ANONYMOUS_SET: &str = "Set";

/// Shared body of the typed wrappers: the operation that produced the value
/// plus the chain it was called on.
#[derive(Debug, Clone)]
pub(crate) struct Wrapped {
    pub(crate) shape: Shape,
    pub(crate) operation: Option<MethodCall>,
    pub(crate) chain: Chain,
}

impl Wrapped {
    pub(crate) fn new(shape: Shape, operation: Option<MethodCall>) -> Self {
        Wrapped {
            shape,
            operation,
            chain: Chain::new(),
        }
    }

    pub(crate) fn link(mut self, predecessor: Arc<Node>) -> Self {
        self.chain = self.chain.link(predecessor);
        self
    }

    pub(crate) fn merge_arguments(mut self, next: Arguments) -> Self {
        self.chain = self.chain.merge_arguments(next);
        self
    }

    pub(crate) fn forced(mut self) -> Self {
        self.operation = self.operation.map(MethodCall::forced);
        self
    }

    pub(crate) fn render(&self) -> Rendered {
        let mut rendered = self.chain.compose();
        if self.shape == Shape::Set && self.chain.is_empty() {
            rendered.query.push_str(ANONYMOUS_SET);
        }
        if let Some(operation) = &self.operation {
            let Rendered { query, arguments } = operation.render();
            rendered.query.push_str(&query);
            rendered.arguments.extend(arguments);
        }
        self.chain.overlay(&mut rendered);
        rendered
    }

    pub(crate) fn into_node(self) -> Node {
        Node::new(NodeKind::Wrapped(self))
    }
}

/// Builds an argument map holding a single binding.
pub(crate) fn bind(key: impl Into<String>, value: impl Into<Value>) -> Arguments {
    let mut arguments = Arguments::new();
    arguments.insert(key.into(), value.into());
    arguments
}
