use crate::identify::Identify;
use crate::slice::{Meta, Slice};

/// How a selection picks resources out of a slice.
///
/// Every variant resolves in slice order; ids with no backing resource are
/// silently skipped.
pub enum Query<'q, R: Identify> {
    /// Every resource.
    All,
    /// Resources whose id appears in the given set.
    Ids(&'q [R::Id]),
    /// Ids resolved through one of the slice's named lists. An unknown name
    /// resolves to nothing.
    List(&'q str),
    /// Predicate over the resource, its meta entry, and the whole slice.
    Filter(&'q dyn Fn(&R, Option<&Meta>, &Slice<R>) -> bool),
}

impl<R: Identify> Default for Query<'_, R> {
    fn default() -> Self {
        Self::All
    }
}

impl<'q, R: Identify> From<&'q [R::Id]> for Query<'q, R> {
    fn from(ids: &'q [R::Id]) -> Self {
        Self::Ids(ids)
    }
}

impl<'q, R: Identify> From<&'q Vec<R::Id>> for Query<'q, R> {
    fn from(ids: &'q Vec<R::Id>) -> Self {
        Self::Ids(ids)
    }
}

impl<'q, R: Identify> From<&'q str> for Query<'q, R> {
    fn from(list_name: &'q str) -> Self {
        Self::List(list_name)
    }
}
