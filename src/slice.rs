use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::identify::Identify;
use crate::ordered_map::OrderedMap;
use crate::status::RequestStatus;

/// Free-form per-resource bookkeeping record.
pub type Meta = Map<String, Value>;

/// Per-request bookkeeping: an explicit status, the ids the request is scoped
/// to, and whatever extra fields the host attaches. Reducers must carry the
/// extra fields through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label<Id> {
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<Id>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<Id> Default for Label<Id> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Null,
            ids: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("slice document must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("malformed slice document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The portion of application state dedicated to one resource type.
///
/// Every container preserves insertion order. `meta` entries for deleted ids
/// are nulled rather than removed, so key presence survives deletion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "R: Serialize, R::Id: Serialize",
    deserialize = "R: DeserializeOwned, R::Id: DeserializeOwned"
))]
pub struct Slice<R: Identify> {
    #[serde(default)]
    pub resources: OrderedMap<R::Id, R>,
    #[serde(default)]
    pub meta: OrderedMap<R::Id, Option<Meta>>,
    #[serde(default, deserialize_with = "lenient_lists")]
    pub lists: OrderedMap<String, Vec<R::Id>>,
    #[serde(default)]
    pub labels: OrderedMap<String, Label<R::Id>>,
    /// Reserved bookkeeping section; carried through untouched.
    #[serde(default)]
    pub requests: Map<String, Value>,
}

impl<R: Identify> Slice<R> {
    pub fn new() -> Self {
        Self {
            resources: OrderedMap::new(),
            meta: OrderedMap::new(),
            lists: OrderedMap::new(),
            labels: OrderedMap::new(),
            requests: Map::new(),
        }
    }

    /// Builds a slice holding the given resources, keyed by their ids.
    pub fn from_resources(resources: impl IntoIterator<Item = R>) -> Self {
        let mut slice = Self::new();
        for resource in resources {
            slice.insert_resource(resource);
        }
        slice
    }

    pub fn insert_resource(&mut self, resource: R) -> Option<R> {
        self.resources.insert(resource.id().clone(), resource)
    }

    /// The live meta record for an id, if one exists and has not been nulled.
    pub fn meta_for(&self, id: &R::Id) -> Option<&Meta> {
        self.meta.get(id).and_then(|meta| meta.as_ref())
    }
}

impl<R: Identify> Default for Slice<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Slice<R>
where
    R: Identify + DeserializeOwned,
    R::Id: DeserializeOwned,
{
    /// Hydrates a slice from a JSON document.
    ///
    /// Missing sections default to empty, and list values that are not id
    /// arrays hydrate as empty lists. Anything but an object at the top
    /// level is an error.
    pub fn from_value(value: Value) -> Result<Self, SliceError> {
        if !value.is_object() {
            return Err(SliceError::NotAnObject {
                found: json_type(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl<R> Slice<R>
where
    R: Identify + Serialize,
    R::Id: Serialize,
{
    pub fn to_value(&self) -> Result<Value, SliceError> {
        Ok(serde_json::to_value(self)?)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_lists<'de, D, Id>(deserializer: D) -> Result<OrderedMap<String, Vec<Id>>, D::Error>
where
    D: Deserializer<'de>,
    Id: DeserializeOwned + Clone + Eq + Hash,
{
    let raw: OrderedMap<String, Value> = OrderedMap::deserialize(deserializer)?;
    let mut lists = OrderedMap::with_capacity(raw.len());
    for (name, value) in raw.iter() {
        lists.insert(name.clone(), ids_or_empty(value));
    }
    Ok(lists)
}

fn ids_or_empty<Id: DeserializeOwned>(value: &Value) -> Vec<Id> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item.clone()) {
            Ok(id) => ids.push(id),
            Err(_) => return Vec::new(),
        }
    }
    ids
}
