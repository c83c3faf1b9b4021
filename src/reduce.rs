use std::borrow::Cow;
use std::collections::HashSet;

use serde_json::Value;

use crate::identify::Identify;
use crate::slice::{Label, Meta, Slice};
use crate::status::RequestStatus;

/// Meta key the delete lifecycle writes its per-resource status under.
pub const DELETE_STATUS_KEY: &str = "delete_status";

/// Dispatched mutations for one resource type's slice.
///
/// Every variant names the resource type it targets; reducers for other
/// types pass the action through.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceAction<Id> {
    DeletePending {
        resource_name: String,
        ids: Vec<Id>,
        request_label: Option<String>,
    },
    DeleteSucceeded {
        resource_name: String,
        ids: Option<Vec<Id>>,
        request_label: Option<String>,
    },
    DeleteFailed {
        resource_name: String,
        ids: Vec<Id>,
        request_label: Option<String>,
    },
    DeleteReset {
        resource_name: String,
        ids: Vec<Id>,
        request_label: Option<String>,
    },
}

impl<Id> ResourceAction<Id> {
    pub fn resource_name(&self) -> &str {
        match self {
            Self::DeletePending { resource_name, .. }
            | Self::DeleteSucceeded { resource_name, .. }
            | Self::DeleteFailed { resource_name, .. }
            | Self::DeleteReset { resource_name, .. } => resource_name,
        }
    }
}

/// Seam between a host store's dispatch loop and a slice's reducer.
///
/// Reducers are pure: the previous state is never mutated, and a
/// `Cow::Borrowed` return means the action changed nothing. `None` previous
/// state means the store has not initialized this slice yet.
pub trait Reducer<State: Clone> {
    type Action;

    fn reduce<'a>(&'a self, state: Option<&'a State>, action: &Self::Action) -> Cow<'a, State>;
}

/// Reducer for one resource type's slice, configured with the type's name
/// and the state it starts from.
pub struct ResourceReducer<R: Identify> {
    resource_name: String,
    initial_state: Slice<R>,
}

impl<R: Identify> ResourceReducer<R> {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            initial_state: Slice::new(),
        }
    }

    pub fn with_initial_state(resource_name: impl Into<String>, initial_state: Slice<R>) -> Self {
        Self {
            resource_name: resource_name.into(),
            initial_state,
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }
}

impl<R> Reducer<Slice<R>> for ResourceReducer<R>
where
    R: Identify + Clone,
{
    type Action = ResourceAction<R::Id>;

    fn reduce<'a>(
        &'a self,
        state: Option<&'a Slice<R>>,
        action: &Self::Action,
    ) -> Cow<'a, Slice<R>> {
        let slice = state.unwrap_or(&self.initial_state);
        if action.resource_name() != self.resource_name {
            return Cow::Borrowed(slice);
        }
        match action {
            ResourceAction::DeleteSucceeded {
                ids,
                request_label,
                ..
            } => delete_succeeded(slice, ids.as_deref(), request_label.as_deref()),
            ResourceAction::DeletePending {
                ids,
                request_label,
                ..
            } => delete_status_update(slice, ids, request_label.as_deref(), RequestStatus::Pending),
            ResourceAction::DeleteFailed {
                ids,
                request_label,
                ..
            } => delete_status_update(slice, ids, request_label.as_deref(), RequestStatus::Failed),
            ResourceAction::DeleteReset {
                ids,
                request_label,
                ..
            } => delete_status_update(slice, ids, request_label.as_deref(), RequestStatus::Null),
        }
    }
}

fn delete_succeeded<'a, R>(
    slice: &'a Slice<R>,
    ids: Option<&[R::Id]>,
    request_label: Option<&str>,
) -> Cow<'a, Slice<R>>
where
    R: Identify + Clone,
{
    if ids.is_none() && request_label.is_none() {
        return Cow::Borrowed(slice);
    }

    let mut next = slice.clone();
    match ids {
        Some(ids) => {
            let deleted: HashSet<&R::Id> = ids.iter().collect();
            next.resources.retain(|id, _| !deleted.contains(id));
            // Nulled, not removed: key presence survives deletion.
            for id in ids {
                next.meta.insert(id.clone(), None);
            }
            if let Some(name) = request_label {
                let label = next.labels.get_or_insert_with(name.to_owned(), Label::default);
                label.status = RequestStatus::Succeeded;
                if let Some(label_ids) = &mut label.ids {
                    label_ids.retain(|id| !deleted.contains(id));
                }
            }
            log::debug!(
                "delete succeeded for {} ids, {} resources remain",
                ids.len(),
                next.resources.len()
            );
        }
        None => {
            if let Some(name) = request_label {
                next.labels
                    .get_or_insert_with(name.to_owned(), Label::default)
                    .status = RequestStatus::Succeeded;
            }
        }
    }
    Cow::Owned(next)
}

fn delete_status_update<'a, R>(
    slice: &'a Slice<R>,
    ids: &[R::Id],
    request_label: Option<&str>,
    status: RequestStatus,
) -> Cow<'a, Slice<R>>
where
    R: Identify + Clone,
{
    if ids.is_empty() && request_label.is_none() {
        return Cow::Borrowed(slice);
    }

    let mut next = slice.clone();
    for id in ids {
        let entry = next.meta.get_or_insert_with(id.clone(), || Some(Meta::new()));
        let meta = entry.get_or_insert_with(Meta::new);
        meta.insert(
            DELETE_STATUS_KEY.to_owned(),
            Value::String(status.as_str().to_owned()),
        );
    }
    if let Some(name) = request_label {
        let label = next.labels.get_or_insert_with(name.to_owned(), Label::default);
        label.status = status;
        if !ids.is_empty() {
            label.ids = Some(ids.to_vec());
        }
    }
    Cow::Owned(next)
}
