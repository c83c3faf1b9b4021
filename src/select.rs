use std::collections::HashSet;

use serde_json::Value;

use crate::identify::Identify;
use crate::ordered_map::OrderedMap;
use crate::query::Query;
use crate::slice::Slice;

/// Resolves a query against a slice that may not exist yet.
///
/// Absent slices, unknown lists, and ids with no backing resource all
/// resolve to an empty result. Missing data is an expected transient state,
/// never an error.
pub fn get_resources<'s, R: Identify>(
    slice: Option<&'s Slice<R>>,
    query: Query<'_, R>,
) -> Vec<&'s R> {
    match slice {
        Some(slice) => slice.select(query),
        None => Vec::new(),
    }
}

/// Like [`get_resources`], but keyed by id instead of ordered.
pub fn get_resources_by_id<'s, R: Identify>(
    slice: Option<&'s Slice<R>>,
    query: Query<'_, R>,
) -> OrderedMap<R::Id, &'s R> {
    match slice {
        Some(slice) => slice.select_by_id(query),
        None => OrderedMap::new(),
    }
}

impl<R: Identify> Slice<R> {
    /// Matching resources in slice order, never query order.
    pub fn select<'s>(&'s self, query: Query<'_, R>) -> Vec<&'s R> {
        self.matches(query)
            .into_iter()
            .map(|(_, resource)| resource)
            .collect()
    }

    pub fn select_by_id<'s>(&'s self, query: Query<'_, R>) -> OrderedMap<R::Id, &'s R> {
        self.matches(query)
            .into_iter()
            .map(|(id, resource)| (id.clone(), resource))
            .collect()
    }

    fn matches<'s>(&'s self, query: Query<'_, R>) -> Vec<(&'s R::Id, &'s R)> {
        match query {
            Query::All => self.resources.iter().collect(),
            Query::Ids(ids) => {
                let wanted: HashSet<&R::Id> = ids.iter().collect();
                self.in_id_set(&wanted)
            }
            Query::List(name) => match self.lists.get(name) {
                Some(ids) => {
                    let wanted: HashSet<&R::Id> = ids.iter().collect();
                    self.in_id_set(&wanted)
                }
                None => Vec::new(),
            },
            Query::Filter(keep) => self
                .resources
                .iter()
                .filter(|&(id, resource)| keep(resource, self.meta_for(id), self))
                .collect(),
        }
    }

    fn in_id_set<'s>(&'s self, wanted: &HashSet<&R::Id>) -> Vec<(&'s R::Id, &'s R)> {
        if wanted.is_empty() {
            return Vec::new();
        }
        self.resources
            .iter()
            .filter(|&(id, _)| wanted.contains(id))
            .collect()
    }
}

/// Compatibility stub for the removed `(state, slice_name, ids)` call form.
///
/// Emits a single diagnostic through the `log` facade and yields nothing;
/// callers must select on the slice itself instead.
#[deprecated(note = "select on the slice itself: get_resources(Some(&slice), ids.into())")]
pub fn get_resources_by_slice_name(_state: &Value, slice_name: &str, _ids: &[Value]) -> Vec<Value> {
    log::error!(
        "get_resources no longer takes the whole state and a slice name; \
         pass the {slice_name:?} slice directly"
    );
    Vec::new()
}

#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::slice::Meta;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Book {
        id: u64,
        name: String,
    }

    impl Identify for Book {
        type Id = u64;

        fn id(&self) -> &u64 {
            &self.id
        }
    }

    fn book(id: u64, name: &str) -> Book {
        Book {
            id,
            name: name.into(),
        }
    }

    fn books() -> Slice<Book> {
        Slice::from_value(json!({
            "resources": {
                "1": { "id": 1, "name": "sandwiches" },
                "10": { "id": 10, "name": "pizza" },
                "102": { "id": 102, "name": "fried" },
                "116": { "id": 116, "name": "pickles" },
            },
            "meta": {
                "1": {},
                "10": { "selected": true },
                "102": { "selected": false },
                "116": { "selected": true },
            },
            "lists": {
                "dashboard_search": [10, 22, 102],
                "details_page": [],
            },
            "requests": {},
        }))
        .unwrap()
    }

    fn movies() -> Slice<Book> {
        Slice::from_value(json!({
            "resources": {},
            "meta": {},
            "lists": {},
            "requests": {},
        }))
        .unwrap()
    }

    #[test]
    fn nonexistent_slice_selects_nothing() {
        assert_eq!(get_resources::<Book>(None, Query::Ids(&[1])), Vec::<&Book>::new());
        assert!(get_resources_by_id::<Book>(None, Query::Ids(&[1])).is_empty());
    }

    #[test]
    fn empty_resources_select_nothing() {
        let movies = movies();
        assert!(movies.select(Query::Ids(&[1])).is_empty());
        assert!(movies.select_by_id(Query::Ids(&[1])).is_empty());
    }

    #[test]
    fn unknown_list_selects_nothing() {
        let books = books();
        assert!(books.select("sandwiches".into()).is_empty());
        assert!(books.select_by_id("sandwiches".into()).is_empty());
    }

    #[test]
    fn empty_list_selects_nothing() {
        let books = books();
        assert!(books.select("details_page".into()).is_empty());
        assert!(books.select_by_id("details_page".into()).is_empty());
    }

    #[test]
    fn list_selects_the_resources_that_exist() {
        let books = books();
        let pizza = book(10, "pizza");
        let fried = book(102, "fried");
        assert_eq!(books.select("dashboard_search".into()), vec![&pizza, &fried]);

        let by_id = books.select_by_id("dashboard_search".into());
        let expected: OrderedMap<u64, &Book> =
            [(10, &pizza), (102, &fried)].into_iter().collect();
        assert_eq!(by_id, expected);
    }

    #[test]
    fn empty_id_set_selects_nothing() {
        assert!(books().select(Query::Ids(&[])).is_empty());
    }

    #[test]
    fn missing_ids_are_silently_dropped() {
        let books = books();
        let sandwiches = book(1, "sandwiches");
        let pickles = book(116, "pickles");
        assert_eq!(
            books.select(Query::Ids(&[1, 116, 130])),
            vec![&sandwiches, &pickles]
        );
    }

    #[test]
    fn id_selection_follows_slice_order_not_query_order() {
        let books = books();
        let sandwiches = book(1, "sandwiches");
        let pickles = book(116, "pickles");
        assert_eq!(books.select(Query::Ids(&[116, 1])), vec![&sandwiches, &pickles]);
    }

    #[test]
    fn filter_sees_resource_meta_and_slice() {
        let books = books();
        let filter = |resource: &Book, meta: Option<&Meta>, slice: &Slice<Book>| -> bool {
            assert_eq!(Some(resource), slice.resources.get(&resource.id));
            assert_eq!(meta, slice.meta_for(&resource.id));
            meta.and_then(|m| m.get("selected"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };

        let pizza = book(10, "pizza");
        let pickles = book(116, "pickles");
        assert_eq!(books.select(Query::Filter(&filter)), vec![&pizza, &pickles]);

        let by_id = books.select_by_id(Query::Filter(&filter));
        let expected: OrderedMap<u64, &Book> =
            [(10, &pizza), (116, &pickles)].into_iter().collect();
        assert_eq!(by_id, expected);
    }

    #[test]
    fn filter_runs_once_per_resource() {
        let books = books();
        let calls = Cell::new(0usize);
        let count_all = |_: &Book, _: Option<&Meta>, _: &Slice<Book>| -> bool {
            calls.set(calls.get() + 1);
            true
        };

        let all = books.select(Query::Filter(&count_all));
        assert_eq!(all.len(), books.resources.len());
        assert_eq!(calls.get(), books.resources.len());
    }

    #[test]
    fn filter_that_matches_nothing_selects_nothing() {
        let never = |_: &Book, _: Option<&Meta>, _: &Slice<Book>| -> bool { false };
        assert!(books().select(Query::Filter(&never)).is_empty());
        assert!(books().select_by_id(Query::Filter(&never)).is_empty());
    }

    #[test]
    fn filter_gets_none_for_resources_without_meta() {
        let slice: Slice<Book> = Slice::from_resources([book(1, "sandwiches")]);
        let unmetad = |_: &Book, meta: Option<&Meta>, _: &Slice<Book>| -> bool {
            meta.is_none()
        };
        assert_eq!(slice.select(Query::Filter(&unmetad)).len(), 1);
    }

    #[test]
    fn no_query_selects_everything_in_slice_order() {
        let books = books();
        let all = books.select(Query::default());
        let ids: Vec<u64> = all.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 10, 102, 116]);
    }

    struct CountingLogger;

    static ERRORS: AtomicUsize = AtomicUsize::new(0);

    impl log::Log for CountingLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if record.level() == log::Level::Error {
                ERRORS.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn removed_signature_emits_exactly_one_diagnostic() {
        static LOGGER: CountingLogger = CountingLogger;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Error);

        let before = ERRORS.load(Ordering::SeqCst);
        #[allow(deprecated)]
        let result = get_resources_by_slice_name(&json!({ "books": {} }), "books", &[json!(10)]);
        assert!(result.is_empty());
        assert_eq!(ERRORS.load(Ordering::SeqCst) - before, 1);
    }
}
