//! Compiled tasks and the executor that replays them.
//!
//! A path expression compiles once into an ordered list of tasks, one per
//! step. Each task replaces the whole path-state mapping: every active path
//! fans into zero or more child paths. A step matching nothing leaves an
//! empty mapping, and every later step then runs on nothing.

use indexmap::IndexMap;
use tracing::trace;

use super::ast::{JsonPath, Step};
use super::backend::{classify, Backend, Shape};
use super::error::PathError;
use super::state::{resolve, resolve_mut, ActivePaths, GetState, Node, NodeMut, Seg, UpdateState};
use crate::record::{DataError, Value};

/// Builds one task per step kind.
pub trait TaskGen {
    type Task;

    fn object_key(&self, key: &str) -> Self::Task;
    fn object_keys(&self, keys: &[String]) -> Self::Task;
    fn array_index(&self, index: isize) -> Self::Task;
    fn array_slice(&self, start: Option<isize>, end: Option<isize>) -> Self::Task;
    fn wildcard(&self) -> Self::Task;
}

/// Compiles `path` into tasks, preserving root-to-leaf step order.
pub fn compile<G: TaskGen>(path: &JsonPath, generator: &G) -> Vec<G::Task> {
    path.steps
        .iter()
        .map(|step| match step {
            Step::Key(key) => generator.object_key(key),
            Step::Keys(keys) => generator.object_keys(keys),
            Step::Index(index) => generator.array_index(*index),
            Step::Slice(start, end) => generator.array_slice(*start, *end),
            Step::Wildcard => generator.wildcard(),
        })
        .collect()
}

/// One executable step over a path-state `S`.
pub trait Task<S> {
    fn run(&self, state: &mut S) -> Result<(), PathError>;
}

/// Applies `tasks` to `state` in order, stopping at the first error.
pub fn run_tasks<S, T>(state: &mut S, tasks: &[T]) -> Result<(), PathError>
where
    S: ActivePaths,
    T: Task<S>,
{
    for (step, task) in tasks.iter().enumerate() {
        task.run(state)?;
        trace!(step, active = state.active_paths(), "task complete");
    }
    Ok(())
}

/// Which children of a container a step selects.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Key(String),
    Keys(Vec<String>),
    Index(isize),
    Slice(Option<isize>, Option<isize>),
    All,
}

impl Selector {
    /// Resolves the selector against the container at `path`.
    fn select<B: Backend>(&self, path: &str, node: Node<'_, B>) -> Result<Vec<Seg>, PathError> {
        match self {
            Selector::Key(key) => {
                let object = expect_object(path, node)?;
                Ok(if B::has_key(object, key) {
                    vec![Seg::Key(key.clone())]
                } else {
                    Vec::new()
                })
            }
            Selector::Keys(keys) => {
                let object = expect_object(path, node)?;
                Ok(keys
                    .iter()
                    .filter(|key| B::has_key(object, key))
                    .map(|key| Seg::Key(key.clone()))
                    .collect())
            }
            Selector::Index(index) => {
                let len = expect_array(path, node)?.len();
                let resolved =
                    normalize_index(*index, len).ok_or_else(|| PathError::IndexOutOfBounds {
                        path: path.to_string(),
                        index: *index,
                        len,
                    })?;
                Ok(vec![Seg::Index(resolved)])
            }
            Selector::Slice(start, end) => {
                let len = expect_array(path, node)?.len();
                let (from, to) = slice_bounds(*start, *end, len);
                Ok((from..to).map(Seg::Index).collect())
            }
            Selector::All => {
                if let Some(object) = node.object() {
                    Ok(B::keys(object)
                        .into_iter()
                        .map(|key| Seg::Key(key.to_string()))
                        .collect())
                } else if let Some(items) = node.array() {
                    Ok((0..items.len()).map(Seg::Index).collect())
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }
}

fn expect_object<'a, B: Backend>(path: &str, node: Node<'a, B>) -> Result<&'a B::Object, PathError> {
    node.object()
        .ok_or_else(|| PathError::type_mismatch(path, format!("a {}", B::OBJECT_KIND), node.kind()))
}

fn expect_array<'a, B: Backend>(path: &str, node: Node<'a, B>) -> Result<&'a Vec<Value>, PathError> {
    node.array()
        .ok_or_else(|| PathError::type_mismatch(path, "an Array", node.kind()))
}

/// Maps a possibly negative index onto `0..len`.
fn normalize_index(index: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Clamps slice bounds to `0..=len`; negative bounds count from the end.
fn slice_bounds(start: Option<isize>, end: Option<isize>, len: usize) -> (usize, usize) {
    let len = len as isize;
    let clamp = |bound: isize| {
        if bound < 0 {
            (len + bound).max(0)
        } else {
            bound.min(len)
        }
    };
    let from = start.map_or(0, clamp);
    let to = end.map_or(len, clamp);
    (from as usize, to.max(from) as usize)
}

/// A read-only step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTask {
    selector: Selector,
}

/// Generates read-only tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTaskGen;

impl TaskGen for GetTaskGen {
    type Task = GetTask;

    fn object_key(&self, key: &str) -> GetTask {
        GetTask {
            selector: Selector::Key(key.to_string()),
        }
    }

    fn object_keys(&self, keys: &[String]) -> GetTask {
        GetTask {
            selector: Selector::Keys(keys.to_vec()),
        }
    }

    fn array_index(&self, index: isize) -> GetTask {
        GetTask {
            selector: Selector::Index(index),
        }
    }

    fn array_slice(&self, start: Option<isize>, end: Option<isize>) -> GetTask {
        GetTask {
            selector: Selector::Slice(start, end),
        }
    }

    fn wildcard(&self) -> GetTask {
        GetTask {
            selector: Selector::All,
        }
    }
}

impl<'a, B: Backend> Task<GetState<'a, B>> for GetTask {
    fn run(&self, state: &mut GetState<'a, B>) -> Result<(), PathError> {
        let mut next = IndexMap::new();
        for (path, node) in &state.paths {
            for seg in self.selector.select(path, *node)? {
                match node.child(&seg) {
                    Some(child) if !child.is_null() => {
                        next.insert(seg.path_under(path), Node::Value(child));
                    }
                    _ => {}
                }
            }
        }
        state.paths = next;
        Ok(())
    }
}

/// A mutating step. Only leaves (and absent values) are ever overwritten;
/// containers on the way to them pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTask {
    selector: Selector,
}

/// Generates mutating tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateTaskGen;

impl TaskGen for UpdateTaskGen {
    type Task = UpdateTask;

    fn object_key(&self, key: &str) -> UpdateTask {
        UpdateTask {
            selector: Selector::Key(key.to_string()),
        }
    }

    fn object_keys(&self, keys: &[String]) -> UpdateTask {
        UpdateTask {
            selector: Selector::Keys(keys.to_vec()),
        }
    }

    fn array_index(&self, index: isize) -> UpdateTask {
        UpdateTask {
            selector: Selector::Index(index),
        }
    }

    fn array_slice(&self, start: Option<isize>, end: Option<isize>) -> UpdateTask {
        UpdateTask {
            selector: Selector::Slice(start, end),
        }
    }

    fn wildcard(&self) -> UpdateTask {
        UpdateTask {
            selector: Selector::All,
        }
    }
}

impl<'v, B: Backend> Task<UpdateState<'v, B>> for UpdateTask {
    fn run(&self, state: &mut UpdateState<'v, B>) -> Result<(), PathError> {
        let mut next = IndexMap::new();
        let active = std::mem::take(&mut state.paths);
        for (path, location) in active {
            let segs = match resolve::<B>(&state.record, &location) {
                Some(node) => self.selector.select(&path, node)?,
                // location was resolved by the previous step
                None => continue,
            };
            for seg in segs {
                let child_path = seg.path_under(&path);
                let keep = update_child::<B>(state, &location, &seg, &child_path)?;
                if keep {
                    let mut child_location = location.clone();
                    child_location.push(seg);
                    next.insert(child_path, child_location);
                }
            }
        }
        state.paths = next;
        Ok(())
    }
}

/// Writes the intent's value for `child_path` if the child is a leaf or
/// absent. Returns whether the child stays on the active path set.
fn update_child<B: Backend>(
    state: &mut UpdateState<'_, B>,
    parent: &[Seg],
    seg: &Seg,
    child_path: &str,
) -> Result<bool, PathError> {
    let shape = match resolve::<B>(&state.record, parent).and_then(|node| node.child(seg)) {
        Some(child) => classify::<B>(child.kind()),
        None => return Ok(false),
    };
    if !matches!(shape, Shape::Leaf | Shape::Absent) {
        return Ok(true);
    }

    let Some(value) = state.intent.value_for(child_path) else {
        return Ok(shape == Shape::Leaf);
    };
    write::<B>(&mut state.record, parent, seg, value.clone())
        .map_err(|source| PathError::access(child_path, B::OBJECT_KIND.name(), source))?;
    Ok(true)
}

/// Writes `value` at `seg` under the container located by `parent`.
/// Array elements are written through the object and key owning the array.
fn write<B: Backend>(
    record: &mut B::Object,
    parent: &[Seg],
    seg: &Seg,
    value: Value,
) -> Result<(), DataError> {
    match seg {
        Seg::Key(key) => match object_mut::<B>(record, parent) {
            Some(object) => B::put_key(object, key, value),
            None => Ok(()),
        },
        Seg::Index(index) => match parent.split_last() {
            Some((Seg::Key(key), owner)) => match object_mut::<B>(record, owner) {
                Some(object) => B::set_index(object, key, *index, value),
                None => Ok(()),
            },
            _ => Ok(()),
        },
    }
}

fn object_mut<'a, B: Backend>(record: &'a mut B::Object, location: &[Seg]) -> Option<&'a mut B::Object> {
    match resolve_mut::<B>(record, location)? {
        NodeMut::Root(object) => Some(object),
        NodeMut::Value(value) => B::as_object_mut(value),
    }
}
