use std::marker::PhantomData;

use crate::{
    call::{Call, MethodCall},
    chain::{Expression, Node, Rendered, Shape, Wrapped, bind},
    projection::Projection,
    schema::{FieldType, Modality},
    typed::{Collection, Document, Page, PageOf, step},
    value::Arguments,
};

/// A lazily evaluated set of items from a collection.
///
/// Executed on its own a set comes back as a [`PageOf`] items, see
/// [`crate::query`].
///
/// # Examples
///
/// ```
/// use fql_chain::{CollectionDescriptor, Collection, Expression};
///
/// let people = CollectionDescriptor::new("Person");
/// let set = people.all().where_(".age > 18").order("desc(.age)");
///
/// assert_eq!(set.render().query, "Person.all().where(.age > 18).order(desc(.age))");
/// ```
pub struct Set<C: Collection, T = <C as Collection>::Record> {
    collection: C,
    inner: Wrapped,
    _item: PhantomData<fn() -> T>,
}

impl<C: Collection, T> Clone for Set<C, T> {
    fn clone(&self) -> Self {
        Set {
            collection: self.collection.clone(),
            inner: self.inner.clone(),
            _item: PhantomData,
        }
    }
}

impl<C: Collection, T> std::fmt::Debug for Set<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Set")
            .field("collection", &self.collection.name())
            .field("query", &self.inner.render().query)
            .finish()
    }
}

impl<C: Collection> Set<C> {
    /// Resumes pagination from a continuation cursor. Both values are bound
    /// as arguments (`cursor`, `count`) rather than inlined.
    ///
    /// ```
    /// use fql_chain::{CollectionDescriptor, Expression, Set};
    ///
    /// let page = Set::paginate_from(CollectionDescriptor::new("Person"), "after-cursor", 100);
    /// assert_eq!(page.render().query, "Set.paginate(cursor,count)");
    /// ```
    pub fn paginate_from(collection: C, cursor: impl Into<String>, count: i64) -> Page<C> {
        let mut arguments = bind("cursor", cursor.into());
        arguments.extend(bind("count", count));
        let operation = MethodCall::new("paginate")
            .arg("cursor")
            .arg("count")
            .merge_arguments(arguments);
        let set: Set<C> = Set::from_parts(
            collection.clone(),
            Wrapped::new(Shape::Set, Some(operation)),
        );
        Page::around(collection, Node::of(&set))
    }
}

impl<C: Collection, T> Set<C, T> {
    pub(crate) fn from_parts(collection: C, inner: Wrapped) -> Self {
        Set {
            collection,
            inner,
            _item: PhantomData,
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Requires the operation's receiver to be non-null.
    pub fn forced(self) -> Self {
        Set::from_parts(self.collection, self.inner.forced())
    }

    pub fn merge_arguments(self, next: Arguments) -> Self {
        Set::from_parts(self.collection, self.inner.merge_arguments(next))
    }

    fn set<U>(&self, operation: MethodCall) -> Set<C, U> {
        Set::from_parts(
            self.collection.clone(),
            step(Shape::Set, operation, Node::of(self)),
        )
    }

    fn document(&self, operation: MethodCall) -> Document<C, T> {
        Document::from_parts(
            self.collection.clone(),
            step(Shape::Document, operation, Node::of(self)),
        )
    }

    fn call<U>(&self, operation: MethodCall) -> Call<U> {
        Call::new(operation.link(Node::of(self)))
    }

    pub fn where_(&self, body: &str) -> Set<C, T> {
        self.set(MethodCall::new("where").arg(body))
    }

    /// Transforms every item; `U` is the type the transform produces.
    pub fn map<U>(&self, body: &str) -> Set<C, U> {
        self.set(MethodCall::new("map").arg(body))
    }

    pub fn order(&self, ordering: &str) -> Set<C, T> {
        self.set(MethodCall::new("order").arg(ordering))
    }

    pub fn reverse(&self) -> Set<C, T> {
        self.set(MethodCall::new("reverse"))
    }

    pub fn distinct(&self) -> Set<C, T> {
        self.set(MethodCall::new("distinct"))
    }

    pub fn first(&self) -> Document<C, T> {
        self.document(MethodCall::new("first"))
    }

    pub fn last(&self) -> Document<C, T> {
        self.document(MethodCall::new("last"))
    }

    pub fn first_where(&self, body: &str) -> Document<C, T> {
        self.document(MethodCall::new("firstWhere").arg(body))
    }

    pub fn last_where(&self, body: &str) -> Document<C, T> {
        self.document(MethodCall::new("lastWhere").arg(body))
    }

    pub fn any(&self, body: &str) -> Call<bool> {
        self.call(MethodCall::new("any").arg(body))
    }

    pub fn count(&self) -> Call<i64> {
        self.call(MethodCall::new("count"))
    }

    pub fn is_empty(&self) -> Call<bool> {
        self.call(MethodCall::new("isEmpty"))
    }

    pub fn non_empty(&self) -> Call<bool> {
        self.call(MethodCall::new("nonEmpty"))
    }

    /// Materialises one page. A `count` is bound as the `count` argument;
    /// without one the database picks the page size.
    pub fn paginate(&self, count: Option<i64>) -> Page<C, T> {
        let operation = match count {
            Some(count) => MethodCall::new("paginate")
                .arg("count")
                .merge_arguments(bind("count", count)),
            None => MethodCall::new("paginate"),
        };
        Page::from_parts(
            self.collection.clone(),
            step(Shape::Page, operation, Node::of(self)),
        )
    }

    /// Projects every item down to `pick`.
    pub fn project<S: AsRef<str>>(&self, pick: &[S]) -> Projection {
        let input = FieldType::object(self.collection.complete_schema());
        let input = FieldType::new(Modality::list(), input.kind);
        Projection::over(input, pick).link(Node::of(self))
    }
}

impl<C: Collection, T> Expression for Set<C, T> {
    type Output = Vec<T>;
    type Response = PageOf<T>;

    fn shape(&self) -> Shape {
        Shape::Set
    }

    fn to_node(&self) -> Node {
        self.inner.clone().into_node()
    }

    fn render(&self) -> Rendered {
        self.inner.render()
    }
}
