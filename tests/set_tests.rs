use fql_chain::*;

fn people() -> CollectionDescriptor {
    CollectionDescriptor::new("Person")
}

fn arguments(pairs: Vec<(&str, Value)>) -> Arguments {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

// ========================================================================
// Ordering
// ========================================================================

#[test]
fn test_calls_render_in_call_order() {
    let set = people()
        .all()
        .where_(".age > 18")
        .map::<String>(".name")
        .order("asc(.name)")
        .reverse()
        .distinct();

    assert_eq!(
        set.render().query,
        "Person.all().where(.age > 18).map(.name).order(asc(.name)).reverse().distinct()"
    );
}

#[test]
fn test_no_argument_calls() {
    let set = people().all();
    assert_eq!(set.first().render().query, "Person.all().first()");
    assert_eq!(set.last().render().query, "Person.all().last()");
    assert_eq!(set.count().render().query, "Person.all().count()");
    assert_eq!(set.is_empty().render().query, "Person.all().isEmpty()");
    assert_eq!(set.non_empty().render().query, "Person.all().nonEmpty()");
}

#[test]
fn test_predicate_terminals() {
    let set = people().all();
    assert_eq!(set.any(".admin").render().query, "Person.all().any(.admin)");
    assert_eq!(
        set.first_where(".age > 1").render().query,
        "Person.all().firstWhere(.age > 1)"
    );
    assert_eq!(
        set.last_where(".age > 1").render().query,
        "Person.all().lastWhere(.age > 1)"
    );
}

#[test]
fn test_shapes() {
    let set = people().all();
    assert_eq!(set.shape(), Shape::Set);
    assert_eq!(set.first().shape(), Shape::Document);
    assert_eq!(set.count().shape(), Shape::Scalar);
    assert_eq!(set.paginate(None).shape(), Shape::Page);
}

// ========================================================================
// Branching
// ========================================================================

#[test]
fn test_receiver_is_unchanged() {
    let base = people().all();
    let _ = base.where_(".a");
    let _ = base.count();
    assert_eq!(base.render().query, "Person.all()");
}

#[test]
fn test_chain_links_snapshots() {
    let base = people().all();
    let chain = Chain::new()
        .link(Node::of(&base))
        .link(Node::of(&base.count()));

    assert_eq!(chain.links().len(), 2);
    assert_eq!(chain.links()[0].shape(), Shape::Set);
    assert_eq!(chain.last().map(|n| n.shape()), Some(Shape::Scalar));
}

#[test]
fn test_sibling_branches_are_independent() {
    let base = people().all();
    let adults = base.where_(".age >= 18");
    let minors = base.where_(".age < 18");

    assert_eq!(adults.count().render().query, "Person.all().where(.age >= 18).count()");
    assert_eq!(minors.count().render().query, "Person.all().where(.age < 18).count()");
}

#[test]
fn test_sibling_branch_arguments_are_isolated() {
    let base = people().all();
    let left = base.paginate(Some(10));
    let right = base.paginate(Some(20));
    let plain = base.paginate(None);

    assert_eq!(left.render().arguments, arguments(vec![("count", Value::Integer(10))]));
    assert_eq!(right.render().arguments, arguments(vec![("count", Value::Integer(20))]));
    assert!(plain.render().arguments.is_empty());
    assert!(base.render().arguments.is_empty());
}

// ========================================================================
// Forcing
// ========================================================================

#[test]
fn test_forced_terminal() {
    let count = people().all().count();
    assert!(!count.operation().is_forced());

    let count = count.forced();
    assert!(count.operation().is_forced());
    assert_eq!(count.render().query, "Person.all()!.count()");
}

#[test]
fn test_forced_set_operation() {
    let set = people().all().where_(".a").forced();
    assert_eq!(set.render().query, "Person.all()!.where(.a)");
}

// ========================================================================
// Pagination
// ========================================================================

#[test]
fn test_paginate_with_count() {
    let rendered = people().all().paginate(Some(100)).render();
    assert_eq!(rendered.query, "Person.all().paginate(count)");
    assert_eq!(rendered.arguments, arguments(vec![("count", Value::Integer(100))]));
}

#[test]
fn test_paginate_without_count() {
    let rendered = people().all().paginate(None).render();
    assert_eq!(rendered.query, "Person.all().paginate()");
    assert!(rendered.arguments.is_empty());
}

#[test]
fn test_paginate_from_cursor() {
    let page = Set::<CollectionDescriptor>::paginate_from(people(), "abc", 25);
    let rendered = page.render();

    assert_eq!(page.shape(), Shape::Page);
    assert_eq!(rendered.query, "Set.paginate(cursor,count)");
    assert_eq!(
        rendered.arguments,
        arguments(vec![("count", Value::Integer(25)), ("cursor", Value::from("abc"))])
    );
}

// ========================================================================
// Arguments
// ========================================================================

#[test]
fn test_later_arguments_win() {
    let set = people()
        .all()
        .paginate(Some(5))
        .project(&["name"])
        .merge_arguments(arguments(vec![("count", Value::Integer(7))]));

    assert_eq!(set.render().arguments.get("count"), Some(&Value::Integer(7)));
}

#[test]
fn test_merged_arguments_carry_to_successors() {
    let set = people()
        .all()
        .merge_arguments(arguments(vec![("minAge", Value::Integer(18))]));
    let rendered = set.where_(".age > minAge").count().render();

    assert_eq!(rendered.query, "Person.all().where(.age > minAge).count()");
    assert_eq!(rendered.arguments.get("minAge"), Some(&Value::Integer(18)));
}
