//! Documentation content for the fqlc CLI

use super::CliError;

/// Available documentation topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTopic {
    Collection,
    Set,
    Document,
    Page,
    Projection,
    Dispatch,
    Plans,
}

impl DocTopic {
    /// Parse topic name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "collection" | "collections" => Some(Self::Collection),
            "set" | "sets" => Some(Self::Set),
            "document" | "documents" | "doc" => Some(Self::Document),
            "page" | "pages" | "paginate" => Some(Self::Page),
            "projection" | "projections" | "project" => Some(Self::Projection),
            "dispatch" | "query" | "arguments" => Some(Self::Dispatch),
            "plans" | "plan" | "render" => Some(Self::Plans),
            _ => None,
        }
    }
}

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"FQLC DOCUMENTATION

fqlc renders chains of collection, set, document and projection operations
into FQL query text plus a map of bound arguments. Chains are described as
JSON plans and checked step by step against the shape built so far.

DOCUMENTATION TOPICS

  collection        Chain roots: all, where, indexes, byId, create
  set               Set operations: filtering, ordering, terminals
  document          Single documents: exists, delete, replace, update
  page              Pagination and cursors
  projection        Picking fields, aliases, resolving references, nesting
  dispatch          How a finished chain becomes a request
  plans             The JSON plan format read by 'fqlc render'

QUICK REFERENCE

  Person.all()                        Every document
  Person.byId("42")                   One document, id reduced to digits
  Person.all().count()                Scalar terminal
  Person.byId("5")!.delete()          Forced call
  Person.all(){name,age}              Projection

Run 'fqlc doc <topic>' for detailed documentation.
"#
}

/// Get documentation for a specific topic
pub fn get_doc_topic(name: &str) -> Result<&'static str, CliError> {
    match DocTopic::from_str(name) {
        Some(DocTopic::Collection) => Ok(COLLECTION_DOC),
        Some(DocTopic::Set) => Ok(SET_DOC),
        Some(DocTopic::Document) => Ok(DOCUMENT_DOC),
        Some(DocTopic::Page) => Ok(PAGE_DOC),
        Some(DocTopic::Projection) => Ok(PROJECTION_DOC),
        Some(DocTopic::Dispatch) => Ok(DISPATCH_DOC),
        Some(DocTopic::Plans) => Ok(PLANS_DOC),
        None => Err(CliError::UnknownTopic(name.to_string())),
    }
}

const COLLECTION_DOC: &str = r#"COLLECTION - Chain Roots

Every chain starts at a collection. Its name is the first token of the query.

SETS
  all()
    Every document in the collection.
      Person.all()

  where(body)
    Documents matching a predicate. The body is inserted verbatim.
      Person.where(.age > 18)

  <index>(args...)
    Reads through a declared index. Arguments are inserted verbatim
    (strings) or as literals (numbers, booleans).
      Person.byFirstName("John")

    An index that is not declared on the collection still renders, and a
    warning is logged.

DOCUMENTS
  firstWhere(body)
    First matching document, or null.

  byId(id)
    Every non-digit character is removed from the id, which is then
    quoted:
      byId("abc123")    ->  Person.byId("123")
      byId("007")       ->  Person.byId("007")

  create(key, payload)
    The payload is bound as an argument named <key>, not inlined:
      Person.create(data)      arguments: {data: {...}}

    A string "ttl" field in the payload is converted to a timestamp when
    it parses as RFC 3339.
"#;

const SET_DOC: &str = r#"SET - Lazily Evaluated Collections

Set operations return a new set and leave the one they were called on
untouched, so a set can be extended along several branches.

FILTERING AND SHAPING
  where(body)        Keep matching items
  map(body)          Transform every item
  order(ordering)    Sort, e.g. order(.name)
  reverse()          Reverse the order
  distinct()         Drop duplicates

TERMINALS
  first() / last()             A document
  firstWhere(b) / lastWhere(b) A document
  any(body)                    Boolean
  count()                      Integer
  isEmpty() / nonEmpty()       Boolean
  paginate(count?)             A page, see 'fqlc doc page'

FORCING
  Marking a call forced renders '!' before it:
    Person.all()!.count()
"#;

const DOCUMENT_DOC: &str = r#"DOCUMENT - Single Documents

A document may be absent; evaluating one yields null in that case.

OPERATIONS
  exists()                     Boolean
  delete()                     Null document describing the deletion
  replace(key, payload)        Replace the whole document
  replaceData(key, payload)    Replace the user data only
  update(key, payload)         Merge into the document
  updateData(key, payload)     Merge into the user data only

  Payloads are always bound under <key>:
    Person.byId("42").update(data)      arguments: {data: {"firstName": "X"}}

FORCING
    Person.byId("5")!.delete()
"#;

const PAGE_DOC: &str = r#"PAGE - Bounded Results

A page holds a list of items ("data") and an optional cursor ("after") to
fetch the next page with.

  paginate()
    Server default page size.

  paginate(count)
    The count is bound as an argument named "count":
      Person.all().paginate(count)      arguments: {count: 100}

  Resuming from a cursor
    The cursor and count are both bound:
      Set.paginate(cursor,count)        arguments: {cursor: "...", count: 10}
"#;

const PROJECTION_DOC: &str = r#"PROJECTION - Selecting Fields

  project(fields...)
    Picks fields from each item:
      Person.all(){name,age}

SUBPROJECTIONS
  alias(key, path)
    Exposes the value at <path> as <key>:
      {name,first:.names[0]}

  resolve(key, path, keys, collection)
    Follows a reference (or array of references) and picks <keys> from the
    referenced documents:
      {name,owner:.owner {name,email}}

  nest(key, path, pick)
    Applies a nested projection to the value at <path>:
      {a,b,c:.path.to.c{x}}

  Subprojections render in the order they were added. Adding one under an
  existing key replaces it in place. One whose path is empty (after
  dropping empty segments) selects nothing and is skipped.

PATHS
  Written with dots. Numeric segments are array indices:
    "children.0.name"   ->  .children[0].name
"#;

const DISPATCH_DOC: &str = r#"DISPATCH - From Chain To Request

A finished chain is rendered into query text and arguments.

  Set        Sent as a page. The text is unchanged, the result is paged.
  Page       Sent as-is.
  Document   Sent as-is.
  Scalar     Sent as-is.
  Projection Sent as-is.

ARGUMENTS
  Arguments bound along the chain are merged in call order, later calls
  winning on conflicting keys. Arguments supplied with the request are
  merged last and win over everything in the chain.

OPTIONS
  typecheck, query timeout, query tags and linearized are passed to the
  executor unchanged.
"#;

const PLANS_DOC: &str = r#"PLANS - JSON Chain Descriptions

'fqlc render' reads a plan from --input or stdin:

  {
    "collections": [
      { "name": "Person",
        "indexes": [{ "name": "byFirstName", "params": ["string"] }] }
    ],
    "root": "Person",
    "steps": [
      { "op": "all" },
      { "op": "where", "body": ".age > 18" },
      { "op": "count" }
    ],
    "arguments": {}
  }

Each step is an object with an "op" field, named like the builder method
in camelCase (byId, firstWhere, replaceData, paginateFrom, ...). A step
not available on the current shape is rejected. Index steps are checked
against the declared parameter count and types.

OUTPUT
  {"query": "...", "arguments": {...}, "shape": "..."}

  --direct     Skip dispatch wrapping (a set stays a set)
  --pretty     Indent the JSON output

LOGGING
  Set FQLC_LOG to a tracing filter (default "warn"), e.g. FQLC_LOG=debug.
"#;
