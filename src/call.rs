use std::{marker::PhantomData, sync::Arc};

use crate::{
    chain::{Chain, Expression, Node, NodeKind, Rendered, Shape},
    value::{Arguments, Value},
};

/// A single named database operation with positional arguments.
///
/// Renders as `.name(arg1,arg2)`, or `!.name(...)` once [forced](Self::forced).
/// String arguments are opaque FQL fragments and are inserted verbatim; other
/// values are written as literals (see [`Value::to_argument`]).
///
/// # Examples
///
/// ```
/// use fql_chain::MethodCall;
///
/// let call = MethodCall::new("where").arg(".age > 18");
/// assert_eq!(call.render().query, ".where(.age > 18)");
///
/// let call = MethodCall::new("delete").forced();
/// assert_eq!(call.render().query, "!.delete()");
/// ```
#[derive(Debug, Clone)]
pub struct MethodCall {
    name: String,
    args: Vec<Value>,
    force: bool,
    chain: Chain,
}

impl MethodCall {
    pub fn new(name: impl Into<String>) -> Self {
        MethodCall {
            name: name.into(),
            args: Vec::new(),
            force: false,
            chain: Chain::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args<I, A>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Requires the receiver to be non-null for the call to succeed.
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn is_forced(&self) -> bool {
        self.force
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Value] {
        &self.args
    }

    pub fn link(mut self, predecessor: Arc<Node>) -> Self {
        self.chain = self.chain.link(predecessor);
        self
    }

    pub fn merge_arguments(mut self, next: Arguments) -> Self {
        self.chain = self.chain.merge_arguments(next);
        self
    }

    pub fn render(&self) -> Rendered {
        let Rendered {
            mut query,
            arguments,
        } = self.chain.render();
        let args = self
            .args
            .iter()
            .map(Value::to_argument)
            .collect::<Vec<_>>()
            .join(",");

        tracing::trace!(name = %self.name, forced = self.force, "rendering method call");

        if self.force {
            query.push('!');
        }
        query.push('.');
        query.push_str(&self.name);
        query.push('(');
        query.push_str(&args);
        query.push(')');

        Rendered { query, arguments }
    }
}

/// An operation evaluating to a plain value, such as `count()` or `exists()`.
#[derive(Debug, Clone)]
pub struct Call<T> {
    call: MethodCall,
    _output: PhantomData<fn() -> T>,
}

impl<T> Call<T> {
    pub(crate) fn new(call: MethodCall) -> Self {
        Call {
            call,
            _output: PhantomData,
        }
    }

    pub fn forced(self) -> Self {
        Call::new(self.call.forced())
    }

    pub fn operation(&self) -> &MethodCall {
        &self.call
    }
}

impl<T> Expression for Call<T> {
    type Output = T;
    type Response = T;

    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn to_node(&self) -> Node {
        Node::new(NodeKind::Call(self.call.clone()))
    }

    fn render(&self) -> Rendered {
        self.call.render()
    }
}
