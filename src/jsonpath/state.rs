//! Path-state: the mapping from resolved path to located value that tasks
//! transform one step at a time.

use indexmap::IndexMap;

use crate::record::{Kind, Value};

use super::ast::{index_path, key_path, ROOT};
use super::backend::Backend;

/// Resolved path strings mapped to the values found there.
pub type PathMap = IndexMap<String, Value>;

/// A concrete, resolved step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Seg {
    Key(String),
    Index(usize),
}

impl Seg {
    /// Canonical path of this child under `parent`.
    pub(crate) fn path_under(&self, parent: &str) -> String {
        match self {
            Seg::Key(key) => key_path(parent, key),
            Seg::Index(index) => index_path(parent, *index),
        }
    }
}

/// A borrowed location in a record: the record itself or a nested value.
pub(crate) enum Node<'a, B: Backend> {
    Root(&'a B::Object),
    Value(&'a Value),
}

impl<B: Backend> Clone for Node<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend> Copy for Node<'_, B> {}

impl<'a, B: Backend> Node<'a, B> {
    pub(crate) fn kind(self) -> Kind {
        match self {
            Node::Root(_) => B::OBJECT_KIND,
            Node::Value(value) => value.kind(),
        }
    }

    pub(crate) fn object(self) -> Option<&'a B::Object> {
        match self {
            Node::Root(object) => Some(object),
            Node::Value(value) => B::as_object(value),
        }
    }

    pub(crate) fn array(self) -> Option<&'a Vec<Value>> {
        match self {
            Node::Root(_) => None,
            Node::Value(value) => value.as_array(),
        }
    }

    pub(crate) fn child(self, seg: &Seg) -> Option<&'a Value> {
        match seg {
            Seg::Key(key) => B::get_key(self.object()?, key),
            Seg::Index(index) => self.array()?.get(*index),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Node::Root(object) => B::into_value(object.clone()),
            Node::Value(value) => value.clone(),
        }
    }
}

/// Follows `location` from the record root.
pub(crate) fn resolve<'a, B: Backend>(root: &'a B::Object, location: &[Seg]) -> Option<Node<'a, B>> {
    let mut node = Node::Root(root);
    for seg in location {
        node = Node::Value(node.child(seg)?);
    }
    Some(node)
}

/// A mutable location in a record.
pub(crate) enum NodeMut<'a, B: Backend> {
    Root(&'a mut B::Object),
    Value(&'a mut Value),
}

/// Follows `location` from the record root, mutably.
pub(crate) fn resolve_mut<'a, B: Backend>(
    root: &'a mut B::Object,
    location: &[Seg],
) -> Option<NodeMut<'a, B>> {
    let Some((first, rest)) = location.split_first() else {
        return Some(NodeMut::Root(root));
    };
    let mut current = match first {
        Seg::Key(key) => B::get_key_mut(root, key)?,
        Seg::Index(_) => return None,
    };
    for seg in rest {
        current = match seg {
            Seg::Key(key) => B::get_key_mut(B::as_object_mut(current)?, key)?,
            Seg::Index(index) => current.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(NodeMut::Value(current))
}

/// What an update writes.
#[derive(Debug, Clone, Copy)]
pub enum UpdateIntent<'v> {
    /// One value written at every resolved leaf path.
    Broadcast(&'v Value),
    /// A distinct value per resolved path; paths not listed are left alone.
    Selective(&'v PathMap),
}

impl<'v> UpdateIntent<'v> {
    /// Returns the replacement for `path`. `Null` means no replacement.
    pub fn value_for(&self, path: &str) -> Option<&'v Value> {
        let value = match *self {
            UpdateIntent::Broadcast(value) => Some(value),
            UpdateIntent::Selective(values) => values.get(path),
        };
        value.filter(|v| !v.is_null())
    }

    /// True for a selective intent with nothing to write.
    pub fn is_empty(&self) -> bool {
        matches!(self, UpdateIntent::Selective(values) if values.is_empty())
    }
}

impl<'v> From<&'v Value> for UpdateIntent<'v> {
    fn from(value: &'v Value) -> Self {
        UpdateIntent::Broadcast(value)
    }
}

impl<'v> From<&'v PathMap> for UpdateIntent<'v> {
    fn from(values: &'v PathMap) -> Self {
        UpdateIntent::Selective(values)
    }
}

/// Number of paths a state currently tracks.
pub trait ActivePaths {
    fn active_paths(&self) -> usize;
}

/// Path-state for read-only evaluation. Values are borrowed from the record.
pub struct GetState<'a, B: Backend> {
    pub(crate) paths: IndexMap<String, Node<'a, B>>,
}

impl<'a, B: Backend> GetState<'a, B> {
    pub(crate) fn new(record: &'a B::Object) -> Self {
        let mut paths = IndexMap::new();
        paths.insert(ROOT.to_string(), Node::Root(record));
        Self { paths }
    }

    pub(crate) fn into_path_map(self) -> PathMap {
        self.paths
            .into_iter()
            .map(|(path, node)| (path, node.to_value()))
            .collect()
    }
}

impl<B: Backend> ActivePaths for GetState<'_, B> {
    fn active_paths(&self) -> usize {
        self.paths.len()
    }
}

/// Path-state for updates. Owns the cloned record and tracks each resolved
/// path by its location in that record.
pub struct UpdateState<'v, B: Backend> {
    pub(crate) record: B::Object,
    pub(crate) paths: IndexMap<String, Vec<Seg>>,
    pub(crate) intent: UpdateIntent<'v>,
}

impl<'v, B: Backend> UpdateState<'v, B> {
    pub(crate) fn new(record: B::Object, intent: UpdateIntent<'v>) -> Self {
        let mut paths = IndexMap::new();
        paths.insert(ROOT.to_string(), Vec::new());
        Self {
            record,
            paths,
            intent,
        }
    }

    pub(crate) fn into_record(self) -> B::Object {
        self.record
    }
}

impl<B: Backend> ActivePaths for UpdateState<'_, B> {
    fn active_paths(&self) -> usize {
        self.paths.len()
    }
}
