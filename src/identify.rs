use std::fmt::Debug;
use std::hash::Hash;

/// A resource is any record carrying a stable identifier.
///
/// The id is what slices key their containers by; everything else about the
/// record is the caller's business.
pub trait Identify {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;
}
