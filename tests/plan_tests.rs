use fql_chain::cli::{self, CliError, Plan, PlanError, RenderOptions};
use fql_chain::Shape;
use serde_json::json;

fn plan(steps: serde_json::Value) -> Plan {
    serde_json::from_value(json!({
        "collections": [
            { "name": "Person", "indexes": [{ "name": "byFirstName", "params": ["string"] },
                                            { "name": "byAge", "params": ["number"] }] },
            { "name": "Address" }
        ],
        "root": "Person",
        "steps": steps,
    }))
    .unwrap()
}

fn render(steps: serde_json::Value) -> String {
    plan(steps).build().unwrap().to_node().render().query
}

fn build_error(steps: serde_json::Value) -> PlanError {
    plan(steps).build().unwrap_err()
}

// ========================================================================
// Building
// ========================================================================

#[test]
fn test_empty_plan_is_the_collection() {
    let built = plan(json!([])).build().unwrap();
    assert_eq!(built.shape(), Shape::Collection);
    assert_eq!(built.to_node().render().query, "Person");
}

#[test]
fn test_set_chain() {
    let query = render(json!([
        { "op": "all" },
        { "op": "where", "body": ".age > 18" },
        { "op": "order", "ordering": "asc(.name)" },
        { "op": "count" }
    ]));
    assert_eq!(query, "Person.all().where(.age > 18).order(asc(.name)).count()");
}

#[test]
fn test_document_chain() {
    let query = render(json!([
        { "op": "byId", "id": "abc123" },
        { "op": "forced" },
        { "op": "delete" }
    ]));
    assert_eq!(query, "Person!.byId(\"123\").delete()");
}

#[test]
fn test_numeric_id() {
    assert_eq!(render(json!([{ "op": "byId", "id": 42 }])), "Person.byId(\"42\")");
}

#[test]
fn test_write_binds_payload() {
    let node = plan(json!([
        { "op": "byId", "id": 1 },
        { "op": "updateData", "key": "data", "payload": { "name": "Ada" } }
    ]))
    .build()
    .unwrap()
    .to_node();
    let rendered = node.render();

    assert_eq!(rendered.query, "Person.byId(\"1\").updateData(data)");
    assert!(rendered.arguments.contains_key("data"));
}

#[test]
fn test_projection_chain() {
    let query = render(json!([
        { "op": "all" },
        { "op": "project", "fields": ["name"] },
        { "op": "alias", "key": "first", "path": "names.0" },
        { "op": "resolve", "key": "home", "path": "address", "keys": ["city"], "collection": "Address" },
        { "op": "nest", "key": "c", "path": "path.to.c", "pick": ["x"] }
    ]));
    assert_eq!(query, "Person.all(){name,first:.names[0],home:.address {city},c:.path.to.c{x}}");
}

#[test]
fn test_paginate_from_cursor() {
    assert_eq!(
        render(json!([{ "op": "paginateFrom", "cursor": "abc", "count": 5 }])),
        "Set.paginate(cursor,count)"
    );
}

#[test]
fn test_declared_index() {
    assert_eq!(
        render(json!([{ "op": "index", "name": "byAge", "args": [30] }])),
        "Person.byAge(30)"
    );
}

// ========================================================================
// Rejected Plans
// ========================================================================

#[test]
fn test_unknown_root() {
    let mut p = plan(json!([]));
    p.root = "Nobody".to_string();
    assert_eq!(p.build().unwrap_err(), PlanError::UnknownCollection("Nobody".into()));
}

#[test]
fn test_operation_on_wrong_shape() {
    let err = build_error(json!([{ "op": "all" }, { "op": "delete" }]));
    assert_eq!(
        err,
        PlanError::Unsupported {
            op: "delete",
            shape: Shape::Set
        }
    );
}

#[test]
fn test_nothing_follows_a_scalar() {
    let err = build_error(json!([{ "op": "all" }, { "op": "count" }, { "op": "count" }]));
    assert_eq!(
        err,
        PlanError::Unsupported {
            op: "count",
            shape: Shape::Scalar
        }
    );
}

#[test]
fn test_undeclared_index() {
    let err = build_error(json!([{ "op": "index", "name": "byEmail", "args": ["x"] }]));
    assert_eq!(
        err,
        PlanError::UnknownIndex {
            collection: "Person".into(),
            index: "byEmail".into()
        }
    );
}

#[test]
fn test_index_arity() {
    let err = build_error(json!([{ "op": "index", "name": "byAge", "args": [] }]));
    assert_eq!(
        err,
        PlanError::IndexArity {
            index: "byAge".into(),
            expected: 1,
            found: 0
        }
    );
}

#[test]
fn test_index_argument_type() {
    let err = build_error(json!([{ "op": "index", "name": "byAge", "args": [true] }]));
    assert_eq!(
        err,
        PlanError::IndexArgument {
            index: "byAge".into(),
            position: 0
        }
    );
}

#[test]
fn test_resolve_unknown_collection() {
    let err = build_error(json!([
        { "op": "byId", "id": 1 },
        { "op": "project", "fields": [] },
        { "op": "resolve", "key": "k", "path": "p", "keys": ["a"], "collection": "Ghost" }
    ]));
    assert_eq!(err, PlanError::UnknownCollection("Ghost".into()));
}

// ========================================================================
// Render Command
// ========================================================================

fn render_options(plan: serde_json::Value, direct: bool) -> RenderOptions {
    RenderOptions {
        plan: Some(plan.to_string()),
        pretty: false,
        direct,
    }
}

#[test]
fn test_render_set_is_paged() {
    let input = json!({
        "collections": [{ "name": "Person" }],
        "root": "Person",
        "steps": [{ "op": "all" }],
        "arguments": { "limit": 10 }
    });
    let result = cli::execute_render(&render_options(input, false)).unwrap();

    assert_eq!(result.query, "Person.all()");
    assert_eq!(result.shape, Shape::Page);
    assert_eq!(result.arguments, json!({ "limit": 10 }));
}

#[test]
fn test_render_direct_keeps_set() {
    let input = json!({
        "collections": [{ "name": "Person" }],
        "root": "Person",
        "steps": [{ "op": "all" }]
    });
    let result = cli::execute_render(&render_options(input, true)).unwrap();
    assert_eq!(result.shape, Shape::Set);
}

#[test]
fn test_render_output_json() {
    let input = json!({
        "collections": [{ "name": "Person" }],
        "root": "Person",
        "steps": [{ "op": "all" }, { "op": "paginate", "count": 100 }]
    });
    let result = cli::execute_render(&render_options(input, false)).unwrap();

    assert_eq!(
        result.to_json(),
        json!({
            "query": "Person.all().paginate(count)",
            "arguments": { "count": 100 },
            "shape": "page"
        })
    );
}

#[test]
fn test_render_without_input() {
    let err = cli::execute_render(&RenderOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::NoInput));
}

#[test]
fn test_render_invalid_json() {
    let options = RenderOptions {
        plan: Some("{not json".to_string()),
        ..RenderOptions::default()
    };
    let err = cli::execute_render(&options).unwrap_err();
    assert!(matches!(err, CliError::Json(_)));
}

#[test]
fn test_render_plan_error() {
    let input = json!({ "root": "Person" });
    let err = cli::execute_render(&render_options(input, false)).unwrap_err();
    assert!(matches!(err, CliError::Plan(PlanError::UnknownCollection(_))));
}

// ========================================================================
// Docs
// ========================================================================

#[test]
fn test_docs_overview_lists_topics() {
    let overview = cli::get_docs_overview();
    for topic in ["collection", "set", "document", "page", "projection", "dispatch", "plans"] {
        assert!(overview.contains(topic), "missing {}", topic);
        assert!(cli::get_doc_topic(topic).is_ok());
    }
}

#[test]
fn test_unknown_doc_topic() {
    let err = cli::get_doc_topic("lexer").unwrap_err();
    assert!(matches!(err, CliError::UnknownTopic(t) if t == "lexer"));
}
