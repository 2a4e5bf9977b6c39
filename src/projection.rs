//! Field selection and reshaping.
//!
//! A [`Projection`] renders as an FQL projection body attached to the
//! expression it was called on:
//!
//! ```text
//! Person.byId("123"){firstName,familyName:.lastName,address:.address{street}}
//! ```
//!
//! Besides plain field picks it carries named sub-projections:
//!
//! - **alias** `key:.path` renames a deep field
//! - **resolve** `key:.path {a,b}` expands a document reference in place
//! - **nest** `key:.path{...}` applies a full nested projection
//!
//! Each projection also records the type of the value it projects, so
//! [`Projection::output`] can report how optionality and arrays carry through
//! to the result.

use std::sync::Arc;

use crate::{
    chain::{Chain, Expression, Node, NodeKind, Rendered, Shape},
    path::Path,
    schema::{FieldType, Kind, Modality, Schema},
    typed::Collection,
    value::{Arguments, Value},
};

static EMPTY_PATH: Path = Path::empty();

#[derive(Debug, Clone)]
pub enum Subprojection {
    Alias {
        path: Path,
        ty: FieldType,
    },
    Resolve {
        path: Path,
        keys: Vec<String>,
        ty: FieldType,
    },
    Nest(Projection),
}

impl Subprojection {
    fn fragment(&self) -> String {
        match self {
            Subprojection::Alias { path, .. } => path.to_string(),
            Subprojection::Resolve { path, keys, .. } => format!("{} {{{}}}", path, keys.join(",")),
            Subprojection::Nest(projection) => projection.render().query,
        }
    }

    /// Path of the value the sub-projection reads from.
    pub fn path(&self) -> &Path {
        match self {
            Subprojection::Alias { path, .. } | Subprojection::Resolve { path, .. } => path,
            Subprojection::Nest(projection) => projection.path.as_ref().unwrap_or(&EMPTY_PATH),
        }
    }

    fn output(&self) -> FieldType {
        match self {
            Subprojection::Alias { ty, .. } | Subprojection::Resolve { ty, .. } => ty.clone(),
            Subprojection::Nest(projection) => projection.output(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    pick: Vec<String>,
    path: Option<Path>,
    subprojections: Vec<(String, Subprojection)>,
    input: FieldType,
    chain: Chain,
}

impl Projection {
    /// A root projection over a value of unknown type.
    pub fn new<S: AsRef<str>>(pick: &[S]) -> Self {
        Projection::over(FieldType::unknown(), pick)
    }

    /// A root projection over a value of the given type.
    pub fn over<S: AsRef<str>>(input: FieldType, pick: &[S]) -> Self {
        Projection {
            pick: pick.iter().map(|s| s.as_ref().to_string()).collect(),
            path: None,
            subprojections: Vec::new(),
            input,
            chain: Chain::new(),
        }
    }

    fn nested<S: AsRef<str>>(input: FieldType, path: Path, pick: &[S]) -> Self {
        Projection {
            path: Some(path),
            ..Projection::over(input, pick)
        }
    }

    pub fn link(mut self, predecessor: Arc<Node>) -> Self {
        self.chain = self.chain.link(predecessor);
        self
    }

    pub fn merge_arguments(mut self, next: Arguments) -> Self {
        self.chain = self.chain.merge_arguments(next);
        self
    }

    pub fn pick(&self) -> &[String] {
        &self.pick
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn subprojections(&self) -> &[(String, Subprojection)] {
        &self.subprojections
    }

    /// Type of the value being projected.
    pub fn input(&self) -> &FieldType {
        &self.input
    }

    /// Fields of one projected item, whether the input is a single value or
    /// an array of them.
    fn item_schema(&self) -> Schema {
        match &self.input.kind {
            Kind::Object(schema) => schema.clone(),
            _ => Schema::new(),
        }
    }

    /// Adds `sub` under `key`. A sub-projection whose path is empty has
    /// nothing to select and is dropped.
    fn with(mut self, key: impl Into<String>, sub: Subprojection) -> Self {
        let key = key.into();
        if sub.path().is_empty() {
            tracing::warn!(key = %key, "sub-projection path is empty, skipping it");
            return self;
        }
        match self.subprojections.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = sub,
            None => self.subprojections.push((key, sub)),
        }
        self
    }

    /// Exposes the deep field at `path` under `key`.
    pub fn alias(self, key: impl Into<String>, path: impl Into<Path>) -> Self {
        let path = path.into();
        let ty = self.item_schema().lookup(&path);
        self.with(key, Subprojection::Alias { path, ty })
    }

    /// Expands the reference (or array of references) at `path` into the
    /// `keys` of the referenced document from `collection`. A reference that
    /// no longer resolves comes back as null.
    pub fn resolve<C, S>(
        self,
        key: impl Into<String>,
        path: impl Into<Path>,
        keys: &[S],
        collection: &C,
    ) -> Self
    where
        C: Collection,
        S: AsRef<str>,
    {
        let path = path.into();
        let selected = self.item_schema().lookup(&path);
        let target = collection.complete_schema().pick(keys);
        let ty = FieldType::new(
            selected.modality.compose(Modality::optional()),
            Kind::Object(target),
        );
        let keys = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self.with(key, Subprojection::Resolve { path, keys, ty })
    }

    /// Applies a nested projection picking `pick` from the value at `path`.
    pub fn nest<S: AsRef<str>>(self, key: impl Into<String>, path: impl Into<Path>, pick: &[S]) -> Self {
        let path = path.into();
        let selected = self.item_schema().lookup(&path);
        self.with(key, Subprojection::Nest(Projection::nested(selected, path, pick)))
    }

    /// Like [`nest`](Self::nest), letting the caller shape the nested
    /// projection further (for example with its own aliases).
    pub fn nest_with<S, F>(self, key: impl Into<String>, path: impl Into<Path>, pick: &[S], build: F) -> Self
    where
        S: AsRef<str>,
        F: FnOnce(Projection) -> Projection,
    {
        let path = path.into();
        let selected = self.item_schema().lookup(&path);
        let nested = build(Projection::nested(selected, path, pick));
        self.with(key, Subprojection::Nest(nested))
    }

    /// Result type: the picked and sub-projected fields, wrapped the same way
    /// as the input (absent stays absent, arrays are projected per element).
    pub fn output(&self) -> FieldType {
        let mut fields = self.item_schema().pick(&self.pick);
        for (key, sub) in &self.subprojections {
            fields = fields.field(key.clone(), sub.output());
        }
        FieldType::new(self.input.modality.clone(), Kind::Object(fields))
    }

    pub fn render(&self) -> Rendered {
        let Rendered {
            mut query,
            arguments,
        } = self.chain.render();

        let picks = self.pick.join(",");
        let subs = self
            .subprojections
            .iter()
            .map(|(key, sub)| format!("{}:{}", key, sub.fragment()))
            .collect::<Vec<_>>()
            .join(",");
        let body = [picks, subs]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        if let Some(path) = &self.path {
            query.push_str(&path.to_string());
        }
        query.push('{');
        query.push_str(&body);
        query.push('}');

        Rendered { query, arguments }
    }
}

impl Expression for Projection {
    type Output = Value;
    type Response = Value;

    fn shape(&self) -> Shape {
        Shape::Projection
    }

    fn to_node(&self) -> Node {
        Node::new(NodeKind::Projection(self.clone()))
    }

    fn render(&self) -> Rendered {
        Projection::render(self)
    }
}
