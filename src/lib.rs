//! Typed FQL query builder.
//!
//! Chains of collection, set, document and projection operations are
//! composed into a single query string plus a map of bound arguments, ready
//! for a database client to execute.
//!
//! ```
//! use fql_chain::{Collection, CollectionDescriptor, Expression};
//!
//! let people = CollectionDescriptor::new("Person");
//! let rendered = people
//!     .by_id(42)
//!     .update("data", [("firstName", "X")].into_iter().collect::<fql_chain::Value>())
//!     .render();
//!
//! assert_eq!(rendered.query, r#"Person.byId("42").update(data)"#);
//! assert!(rendered.arguments.contains_key("data"));
//! ```

pub mod call;
pub mod chain;
pub mod cli;
pub mod output;
pub mod path;
pub mod projection;
pub mod query;
pub mod schema;
pub mod typed;
pub mod value;

pub use call::{Call, MethodCall};
pub use chain::{Chain, Expression, Node, Rendered, Shape};
pub use output::{to_fql, to_json, to_json_pretty};
pub use path::{Path, PathSegment};
pub use projection::{Projection, Subprojection};
pub use query::{Dispatch, Executor, QueryOptions, Request, prepare, query};
pub use schema::{FieldType, Kind, Modality, Schema};
pub use typed::{
    Collection, CollectionDescriptor, Document, DocumentRef, IndexSignature, NullDoc, NullDocument,
    Page, PageOf, ParamKind, Set, sanitize_id,
};
pub use value::{Arguments, Value};
