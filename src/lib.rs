mod identify;
mod ordered_map;
mod query;
mod reduce;
mod select;
mod slice;
mod status;

pub use identify::Identify;
pub use ordered_map::OrderedMap;
pub use query::Query;
pub use reduce::{Reducer, ResourceAction, ResourceReducer, DELETE_STATUS_KEY};
#[allow(deprecated)]
pub use select::get_resources_by_slice_name;
pub use select::{get_resources, get_resources_by_id};
pub use slice::{Label, Meta, Slice, SliceError};
pub use status::RequestStatus;
