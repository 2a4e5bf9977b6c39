use fql_chain::*;

fn address() -> Schema {
    Schema::new()
        .field("street", FieldType::scalar())
        .field("city", FieldType::scalar())
}

fn people() -> CollectionDescriptor {
    CollectionDescriptor::new("Person").with_schema(
        Schema::new()
            .field("name", FieldType::scalar())
            .field("nickname", FieldType::scalar().optional())
            .field("address", FieldType::object(address()).optional())
            .field("tags", FieldType::scalar().list())
            .field("friends", FieldType::reference("Person").list())
            .field("owner", FieldType::reference("Person")),
    )
}

// ========================================================================
// Rendering
// ========================================================================

#[test]
fn test_plain_picks() {
    let projection = Projection::new(&["a", "b"]);
    assert_eq!(projection.render().query, "{a,b}");
}

#[test]
fn test_nested_subprojection() {
    let projection = Projection::new(&["a", "b"]).nest("c", "path.to.c", &["x"]);
    assert_eq!(projection.render().query, "{a,b,c:.path.to.c{x}}");
}

#[test]
fn test_alias() {
    let projection = Projection::new(&["name"]).alias("firstTag", "tags.0");
    assert_eq!(projection.render().query, "{name,firstTag:.tags[0]}");
}

#[test]
fn test_resolve() {
    let projection = Projection::new(&["name"]).resolve("owner", "owner", &["name", "email"], &people());
    assert_eq!(projection.render().query, "{name,owner:.owner {name,email}}");
}

#[test]
fn test_subprojections_only() {
    let projection = Projection::new::<&str>(&[]).alias("n", "name");
    assert_eq!(projection.render().query, "{n:.name}");
}

#[test]
fn test_subprojections_keep_insertion_order() {
    let projection = Projection::new(&["id"])
        .alias("z", "zeta")
        .alias("a", "alpha")
        .nest("m", "mid", &["x"]);
    assert_eq!(projection.render().query, "{id,z:.zeta,a:.alpha,m:.mid{x}}");
}

#[test]
fn test_reused_key_replaces_in_place() {
    let projection = Projection::new(&["id"])
        .alias("first", "one")
        .alias("second", "two")
        .alias("first", "three");
    assert_eq!(projection.render().query, "{id,first:.three,second:.two}");
}

#[test]
fn test_empty_paths_are_skipped() {
    let projection = people()
        .by_id(1)
        .project(&["a"])
        .alias("k", "")
        .resolve("r", "..", &["name"], &people())
        .nest("n", "", &["x"]);

    assert!(projection.subprojections().is_empty());
    assert_eq!(projection.render().query, "Person.byId(\"1\"){a}");
}

#[test]
fn test_subprojection_paths() {
    let projection = Projection::new(&["id"])
        .alias("first", "tags.0")
        .nest("home", "address", &["city"]);
    let paths: Vec<String> = projection
        .subprojections()
        .iter()
        .map(|(key, sub)| format!("{}={}", key, sub.path()))
        .collect();

    assert_eq!(paths, vec!["first=.tags[0]", "home=.address"]);
}

#[test]
fn test_nest_with_builder() {
    let projection = Projection::new(&["name"]).nest_with("home", "address", &["city"], |p| p.alias("road", "street"));
    assert_eq!(projection.render().query, "{name,home:.address{city,road:.street}}");
}

#[test]
fn test_project_after_set() {
    let projection = people().all().where_(".age > 18").project(&["name", "age"]);
    assert_eq!(projection.shape(), Shape::Projection);
    assert_eq!(projection.render().query, "Person.all().where(.age > 18){name,age}");
}

#[test]
fn test_project_after_document() {
    let projection = people().by_id(123).project(&["name"]).alias("city", "address.city");
    assert_eq!(projection.render().query, "Person.byId(\"123\"){name,city:.address.city}");
}

#[test]
fn test_projection_keeps_chain_arguments() {
    let projection = people().all().paginate(Some(3)).project(&["name"]);
    let rendered = projection.render();
    assert_eq!(rendered.query, "Person.all().paginate(count){name}");
    assert_eq!(rendered.arguments.get("count"), Some(&Value::Integer(3)));
}

// ========================================================================
// Output Shapes
// ========================================================================

#[test]
fn test_document_projection_is_optional() {
    let output = people().by_id(1).project(&["name"]).output();
    assert_eq!(output.modality, Modality::optional());
    assert_eq!(output.fields().unwrap().get("name"), Some(&FieldType::scalar()));
}

#[test]
fn test_set_projection_is_a_list() {
    let projection = people().all().project(&["name"]);
    assert_eq!(projection.input().modality, Modality::list());
    assert_eq!(projection.input().fields(), Some(&people().complete_schema()));
    assert!(projection.output().modality.is_list());
}

#[test]
fn test_alias_through_optional_parent_is_optional() {
    let output = people().by_id(1).project::<&str>(&[]).alias("city", "address.city").output();
    let city = output.fields().unwrap().get("city").unwrap();
    assert_eq!(city.modality, Modality::optional());
    assert_eq!(city.kind, Kind::Scalar);
}

#[test]
fn test_alias_of_array_element() {
    let output = people().by_id(1).project::<&str>(&[]).alias("tag", "tags.0").output();
    let tag = output.fields().unwrap().get("tag").unwrap();
    assert_eq!(tag.modality, Modality::Plain);
}

#[test]
fn test_resolve_array_of_references() {
    let projection = people()
        .by_id(1)
        .project(&["name"])
        .resolve("friends", "friends", &["name"], &people());
    let friends = projection.output().fields().unwrap().get("friends").cloned().unwrap();

    assert_eq!(friends.modality, Modality::optional().map_list());
    assert_eq!(friends.fields().unwrap().get("name"), Some(&FieldType::scalar()));
}

#[test]
fn test_resolve_single_reference_is_optional() {
    let projection = Projection::over(FieldType::object(people().complete_schema()), &["name"])
        .resolve("owner", "owner", &["name"], &people());
    let owner = projection.output().fields().unwrap().get("owner").cloned().unwrap();
    assert_eq!(owner.modality, Modality::optional());
}

#[test]
fn test_unknown_field_is_unknown() {
    let output = people().by_id(1).project(&["nope"]).output();
    assert_eq!(output.fields().unwrap().get("nope"), Some(&FieldType::unknown()));
}
