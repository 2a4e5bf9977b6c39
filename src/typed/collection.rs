use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use serde::Deserialize;

use crate::{
    call::MethodCall,
    chain::{Node, Shape, bind},
    output::to_fql,
    schema::Schema,
    typed::{Document, Set, step},
    value::Value,
};

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("static pattern is valid"));

/// Strips every non-digit character from a document id.
///
/// This is best-effort sanitisation, not validation: `"abc123"` becomes
/// `"123"` and an id without digits becomes the empty string.
pub fn sanitize_id(raw: &str) -> String {
    NON_DIGIT.replace_all(raw, "").into_owned()
}

/// Expected literal type of one index argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    Any,
}

impl ParamKind {
    /// Whether `value` may be passed for this parameter. Strings are always
    /// accepted since they can name a query variable.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ParamKind::Any, _) | (_, Value::String(_)) => true,
            (ParamKind::Number, Value::Integer(_) | Value::Float(_)) => true,
            (ParamKind::Boolean, Value::Boolean(_)) => true,
            _ => false,
        }
    }
}

/// A declared secondary index: its name and the arguments it takes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexSignature {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamKind>,
}

impl IndexSignature {
    pub fn new(name: impl Into<String>, params: Vec<ParamKind>) -> Self {
        IndexSignature {
            name: name.into(),
            params,
        }
    }
}

/// A database collection, the root of every chain.
///
/// Implementors supply the name (the root token of rendered queries) and,
/// optionally, a schema and index declarations used for bookkeeping. The
/// provided methods start chains.
///
/// # Examples
///
/// ```
/// use fql_chain::{Collection, Expression};
///
/// #[derive(Clone)]
/// struct Person;
///
/// impl Collection for Person {
///     type Record = ();
///     fn name(&self) -> &str {
///         "Person"
///     }
/// }
///
/// let count = Person.all().count();
/// assert_eq!(count.render().query, "Person.all().count()");
/// ```
pub trait Collection: Clone {
    /// Document type stored in the collection
    type Record;

    fn name(&self) -> &str;

    fn schema(&self) -> Schema {
        Schema::new()
    }

    fn indexes(&self) -> Vec<IndexSignature> {
        Vec::new()
    }

    /// The collection schema extended with the fields every document has.
    fn complete_schema(&self) -> Schema {
        Schema::document(self.name(), &self.schema())
    }

    fn index_signature(&self, name: &str) -> Option<IndexSignature> {
        self.indexes().into_iter().find(|i| i.name == name)
    }

    fn root(&self) -> Arc<Node> {
        Arc::new(Node::root(self.name()))
    }

    fn all(&self) -> Set<Self> {
        Set::from_parts(
            self.clone(),
            step(Shape::Set, MethodCall::new("all"), self.root()),
        )
    }

    fn where_(&self, body: &str) -> Set<Self> {
        Set::from_parts(
            self.clone(),
            step(Shape::Set, MethodCall::new("where").arg(body), self.root()),
        )
    }

    /// Reads through the named index. Argument count and types are the
    /// caller's responsibility; an undeclared name is logged and still
    /// rendered.
    fn index<I, A>(&self, name: &str, args: I) -> Set<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<Value>,
    {
        if self.index_signature(name).is_none() {
            tracing::warn!(collection = self.name(), index = name, "index is not declared");
        }
        Set::from_parts(
            self.clone(),
            step(Shape::Set, MethodCall::new(name).args(args), self.root()),
        )
    }

    fn first_where(&self, body: &str) -> Document<Self> {
        Document::from_parts(
            self.clone(),
            step(Shape::Document, MethodCall::new("firstWhere").arg(body), self.root()),
        )
    }

    /// Looks up a document by id, see [`sanitize_id`].
    fn by_id(&self, id: impl fmt::Display) -> Document<Self> {
        let id = Value::String(sanitize_id(&id.to_string()));
        Document::from_parts(
            self.clone(),
            step(Shape::Document, MethodCall::new("byId").arg(to_fql(&id)), self.root()),
        )
    }

    /// Creates a document. The payload is bound under `key` rather than
    /// inlined, and a string `ttl` is converted into a timestamp.
    fn create(&self, key: impl Into<String>, payload: impl Into<Value>) -> Document<Self> {
        let key = key.into();
        let payload = normalize_ttl(payload.into());
        let operation = MethodCall::new("create")
            .arg(key.clone())
            .merge_arguments(bind(key, payload));
        Document::from_parts(self.clone(), step(Shape::Document, operation, self.root()))
    }
}

pub(crate) fn normalize_ttl(payload: Value) -> Value {
    let Value::Object(mut fields) = payload else {
        return payload;
    };
    let parsed = match fields.get("ttl") {
        Some(Value::String(raw)) => {
            let parsed = Value::parse_time(raw);
            if parsed.is_none() {
                tracing::warn!(ttl = %raw, "ttl is not an RFC 3339 timestamp, binding it unchanged");
            }
            parsed
        }
        _ => None,
    };
    if let Some(time) = parsed {
        fields.insert("ttl".to_string(), time);
    }
    Value::Object(fields)
}

/// A collection described at runtime.
///
/// # Examples
///
/// ```
/// use fql_chain::{Collection, CollectionDescriptor, Expression, ParamKind};
///
/// let people = CollectionDescriptor::new("Person")
///     .with_index("byFirstName", vec![ParamKind::String]);
///
/// let set = people.index("byFirstName", ["name"]);
/// assert_eq!(set.render().query, "Person.byFirstName(name)");
/// ```
#[derive(Debug, Clone)]
pub struct CollectionDescriptor {
    inner: Arc<Descriptor>,
}

#[derive(Debug, Clone)]
struct Descriptor {
    name: String,
    schema: Schema,
    indexes: Vec<IndexSignature>,
}

impl CollectionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        CollectionDescriptor {
            inner: Arc::new(Descriptor {
                name: name.into(),
                schema: Schema::new(),
                indexes: Vec::new(),
            }),
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        Arc::make_mut(&mut self.inner).schema = schema;
        self
    }

    pub fn with_index(mut self, name: impl Into<String>, params: Vec<ParamKind>) -> Self {
        Arc::make_mut(&mut self.inner)
            .indexes
            .push(IndexSignature::new(name, params));
        self
    }
}

impl Collection for CollectionDescriptor {
    type Record = Value;

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn schema(&self) -> Schema {
        self.inner.schema.clone()
    }

    fn indexes(&self) -> Vec<IndexSignature> {
        self.inner.indexes.clone()
    }
}
