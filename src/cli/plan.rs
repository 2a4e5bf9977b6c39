//! Chains described as data.
//!
//! A plan names a root collection and lists the operations to apply, in call
//! order. It is the JSON counterpart of the typed builder API:
//!
//! ```json
//! {
//!   "collections": [{ "name": "Person", "indexes": [{ "name": "byFirstName", "params": ["string"] }] }],
//!   "root": "Person",
//!   "steps": [
//!     { "op": "index", "name": "byFirstName", "args": ["\"John\""] },
//!     { "op": "count" }
//!   ]
//! }
//! ```
//!
//! Without the compiler to rule out misuse, [`Plan::build`] checks every step
//! against the shape built so far and rejects what the typed API would not
//! allow.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    Call, Collection, CollectionDescriptor, Document, Expression, IndexSignature, Node,
    NullDocument, Page, Projection, QueryOptions, Set, Shape, Value,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("`{op}` is not available on a {shape}")]
    Unsupported { op: &'static str, shape: Shape },
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),
    #[error("index `{index}` is not declared on `{collection}`")]
    UnknownIndex { collection: String, index: String },
    #[error("index `{index}` takes {expected} argument(s), got {found}")]
    IndexArity {
        index: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {position} of index `{index}` does not match its declared type")]
    IndexArgument { index: String, position: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    #[serde(default)]
    pub indexes: Vec<IndexSignature>,
}

/// One builder call.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    All,
    Where { body: String },
    Index {
        name: String,
        #[serde(default)]
        args: Vec<serde_json::Value>,
    },
    FirstWhere { body: String },
    LastWhere { body: String },
    ById { id: serde_json::Value },
    Create { key: String, payload: serde_json::Value },
    Map { body: String },
    Order { ordering: String },
    Reverse,
    Distinct,
    First,
    Last,
    Any { body: String },
    Count,
    IsEmpty,
    NonEmpty,
    Paginate {
        #[serde(default)]
        count: Option<i64>,
    },
    PaginateFrom { cursor: String, count: i64 },
    Exists,
    Delete,
    Replace { key: String, payload: serde_json::Value },
    ReplaceData { key: String, payload: serde_json::Value },
    Update { key: String, payload: serde_json::Value },
    UpdateData { key: String, payload: serde_json::Value },
    Forced,
    Project { fields: Vec<String> },
    Alias { key: String, path: String },
    Resolve {
        key: String,
        path: String,
        keys: Vec<String>,
        collection: String,
    },
    Nest {
        key: String,
        path: String,
        pick: Vec<String>,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::All => "all",
            Step::Where { .. } => "where",
            Step::Index { .. } => "index",
            Step::FirstWhere { .. } => "firstWhere",
            Step::LastWhere { .. } => "lastWhere",
            Step::ById { .. } => "byId",
            Step::Create { .. } => "create",
            Step::Map { .. } => "map",
            Step::Order { .. } => "order",
            Step::Reverse => "reverse",
            Step::Distinct => "distinct",
            Step::First => "first",
            Step::Last => "last",
            Step::Any { .. } => "any",
            Step::Count => "count",
            Step::IsEmpty => "isEmpty",
            Step::NonEmpty => "nonEmpty",
            Step::Paginate { .. } => "paginate",
            Step::PaginateFrom { .. } => "paginateFrom",
            Step::Exists => "exists",
            Step::Delete => "delete",
            Step::Replace { .. } => "replace",
            Step::ReplaceData { .. } => "replaceData",
            Step::Update { .. } => "update",
            Step::UpdateData { .. } => "updateData",
            Step::Forced => "forced",
            Step::Project { .. } => "project",
            Step::Alias { .. } => "alias",
            Step::Resolve { .. } => "resolve",
            Step::Nest { .. } => "nest",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub collections: Vec<CollectionSpec>,
    pub root: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Extra arguments for the request, overriding bound ones
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

/// A chain built from a plan, one variant per shape.
#[derive(Debug, Clone)]
pub enum Dynamic {
    Collection(CollectionDescriptor),
    Set(Set<CollectionDescriptor>),
    Document(Document<CollectionDescriptor>),
    NullDocument(NullDocument<CollectionDescriptor>),
    Page(Page<CollectionDescriptor>),
    Boolean(Call<bool>),
    Integer(Call<i64>),
    Projection(Projection),
}

impl Dynamic {
    pub fn shape(&self) -> Shape {
        match self {
            Dynamic::Collection(_) => Shape::Collection,
            Dynamic::Set(_) => Shape::Set,
            Dynamic::Document(_) => Shape::Document,
            Dynamic::NullDocument(_) => Shape::NullDocument,
            Dynamic::Page(_) => Shape::Page,
            Dynamic::Boolean(_) | Dynamic::Integer(_) => Shape::Scalar,
            Dynamic::Projection(_) => Shape::Projection,
        }
    }

    pub fn to_node(&self) -> Node {
        match self {
            Dynamic::Collection(c) => Node::root(c.name()),
            Dynamic::Set(s) => s.to_node(),
            Dynamic::Document(d) => d.to_node(),
            Dynamic::NullDocument(n) => n.to_node(),
            Dynamic::Page(p) => p.to_node(),
            Dynamic::Boolean(c) => c.to_node(),
            Dynamic::Integer(c) => c.to_node(),
            Dynamic::Projection(p) => p.to_node(),
        }
    }
}

fn payload(v: &serde_json::Value) -> Value {
    Value::from(v.clone())
}

fn id_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Plan {
    fn collection(&self, name: &str) -> Result<CollectionDescriptor, PlanError> {
        let declared = self
            .collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PlanError::UnknownCollection(name.to_string()))?;
        Ok(declared
            .indexes
            .iter()
            .fold(CollectionDescriptor::new(&declared.name), |desc, index| {
                desc.with_index(index.name.clone(), index.params.clone())
            }))
    }

    /// Request options carrying the plan's extra arguments.
    pub fn options(&self) -> QueryOptions {
        let arguments: BTreeMap<String, Value> = self
            .arguments
            .iter()
            .map(|(k, v)| (k.clone(), payload(v)))
            .collect();
        QueryOptions {
            arguments,
            ..QueryOptions::default()
        }
    }

    /// Applies every step in order, starting from the root collection.
    pub fn build(&self) -> Result<Dynamic, PlanError> {
        let root = self.collection(&self.root)?;
        self.steps
            .iter()
            .try_fold(Dynamic::Collection(root), |current, step| self.apply(current, step))
    }

    fn apply(&self, current: Dynamic, step: &Step) -> Result<Dynamic, PlanError> {
        let unsupported = |shape: Shape| PlanError::Unsupported {
            op: step.name(),
            shape,
        };

        let next = match (current, step) {
            (Dynamic::Collection(c), Step::All) => Dynamic::Set(c.all()),
            (Dynamic::Collection(c), Step::Where { body }) => Dynamic::Set(c.where_(body)),
            (Dynamic::Collection(c), Step::Index { name, args }) => {
                let args: Vec<Value> = args.iter().map(payload).collect();
                check_index(&c, name, &args)?;
                Dynamic::Set(c.index(name, args))
            }
            (Dynamic::Collection(c), Step::FirstWhere { body }) => Dynamic::Document(c.first_where(body)),
            (Dynamic::Collection(c), Step::ById { id }) => Dynamic::Document(c.by_id(id_text(id))),
            (Dynamic::Collection(c), Step::Create { key, payload: p }) => {
                Dynamic::Document(c.create(key.as_str(), payload(p)))
            }
            (Dynamic::Collection(c), Step::PaginateFrom { cursor, count }) => {
                Dynamic::Page(Set::<CollectionDescriptor>::paginate_from(c, cursor.as_str(), *count))
            }

            (Dynamic::Set(s), Step::Where { body }) => Dynamic::Set(s.where_(body)),
            (Dynamic::Set(s), Step::Map { body }) => Dynamic::Set(s.map(body)),
            (Dynamic::Set(s), Step::Order { ordering }) => Dynamic::Set(s.order(ordering)),
            (Dynamic::Set(s), Step::Reverse) => Dynamic::Set(s.reverse()),
            (Dynamic::Set(s), Step::Distinct) => Dynamic::Set(s.distinct()),
            (Dynamic::Set(s), Step::First) => Dynamic::Document(s.first()),
            (Dynamic::Set(s), Step::Last) => Dynamic::Document(s.last()),
            (Dynamic::Set(s), Step::FirstWhere { body }) => Dynamic::Document(s.first_where(body)),
            (Dynamic::Set(s), Step::LastWhere { body }) => Dynamic::Document(s.last_where(body)),
            (Dynamic::Set(s), Step::Any { body }) => Dynamic::Boolean(s.any(body)),
            (Dynamic::Set(s), Step::Count) => Dynamic::Integer(s.count()),
            (Dynamic::Set(s), Step::IsEmpty) => Dynamic::Boolean(s.is_empty()),
            (Dynamic::Set(s), Step::NonEmpty) => Dynamic::Boolean(s.non_empty()),
            (Dynamic::Set(s), Step::Paginate { count }) => Dynamic::Page(s.paginate(*count)),
            (Dynamic::Set(s), Step::Forced) => Dynamic::Set(s.forced()),
            (Dynamic::Set(s), Step::Project { fields }) => Dynamic::Projection(s.project(fields.as_slice())),

            (Dynamic::Document(d), Step::Exists) => Dynamic::Boolean(d.exists()),
            (Dynamic::Document(d), Step::Delete) => Dynamic::NullDocument(d.delete()),
            (Dynamic::Document(d), Step::Replace { key, payload: p }) => {
                Dynamic::Document(d.replace(key.as_str(), payload(p)))
            }
            (Dynamic::Document(d), Step::ReplaceData { key, payload: p }) => {
                Dynamic::Document(d.replace_data(key.as_str(), payload(p)))
            }
            (Dynamic::Document(d), Step::Update { key, payload: p }) => {
                Dynamic::Document(d.update(key.as_str(), payload(p)))
            }
            (Dynamic::Document(d), Step::UpdateData { key, payload: p }) => {
                Dynamic::Document(d.update_data(key.as_str(), payload(p)))
            }
            (Dynamic::Document(d), Step::Forced) => Dynamic::Document(d.forced()),
            (Dynamic::Document(d), Step::Project { fields }) => Dynamic::Projection(d.project(fields.as_slice())),

            (Dynamic::NullDocument(n), Step::Forced) => Dynamic::NullDocument(n.forced()),

            (Dynamic::Page(p), Step::Project { fields }) => Dynamic::Projection(p.project(fields.as_slice())),

            (Dynamic::Boolean(c), Step::Forced) => Dynamic::Boolean(c.forced()),
            (Dynamic::Integer(c), Step::Forced) => Dynamic::Integer(c.forced()),

            (Dynamic::Projection(p), Step::Alias { key, path }) => {
                Dynamic::Projection(p.alias(key.as_str(), path.as_str()))
            }
            (
                Dynamic::Projection(p),
                Step::Resolve {
                    key,
                    path,
                    keys,
                    collection,
                },
            ) => {
                let target = self.collection(collection)?;
                Dynamic::Projection(p.resolve(key.as_str(), path.as_str(), keys.as_slice(), &target))
            }
            (Dynamic::Projection(p), Step::Nest { key, path, pick }) => {
                Dynamic::Projection(p.nest(key.as_str(), path.as_str(), pick.as_slice()))
            }

            (current, _) => return Err(unsupported(current.shape())),
        };
        Ok(next)
    }
}

fn check_index(collection: &CollectionDescriptor, name: &str, args: &[Value]) -> Result<(), PlanError> {
    let signature = collection
        .index_signature(name)
        .ok_or_else(|| PlanError::UnknownIndex {
            collection: collection.name().to_string(),
            index: name.to_string(),
        })?;
    if signature.params.len() != args.len() {
        return Err(PlanError::IndexArity {
            index: name.to_string(),
            expected: signature.params.len(),
            found: args.len(),
        });
    }
    match signature
        .params
        .iter()
        .zip(args)
        .position(|(kind, arg)| !kind.accepts(arg))
    {
        Some(position) => Err(PlanError::IndexArgument {
            index: name.to_string(),
            position,
        }),
        None => Ok(()),
    }
}
