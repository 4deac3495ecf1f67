//! Getters and updaters: a path expression compiled once and run against
//! many records.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use super::backend::{Backend, MapBackend, StructBackend};
use super::error::PathError;
use super::parser::Parser;
use super::state::{GetState, PathMap, UpdateIntent, UpdateState};
use super::task::{compile, run_tasks, GetTask, GetTaskGen, TaskGen, UpdateTask, UpdateTaskGen};

fn compile_expression<G: TaskGen>(expression: &str, generator: &G) -> Result<Vec<G::Task>, PathError> {
    let path = Parser::parse(expression).map_err(|source| PathError::Parse {
        expression: expression.to_string(),
        source,
    })?;
    let tasks = compile(&path, generator);
    debug!(expression, tasks = tasks.len(), "compiled path expression");
    Ok(tasks)
}

/// Reads the values an expression resolves to.
///
/// # Example
///
/// ```
/// use recordpath::jsonpath::MapGetter;
/// use recordpath::record::{Map, Value};
///
/// let mut record = Map::new();
/// record.insert("a".to_string(), Value::Int32(1));
///
/// let getter = MapGetter::new("$.a").unwrap();
/// let found = getter.run(&record).unwrap();
/// assert_eq!(found["$.a"], Value::Int32(1));
/// assert!(MapGetter::new("$.missing").unwrap().run(&record).unwrap().is_empty());
/// ```
pub struct Getter<B: Backend> {
    expression: String,
    tasks: Vec<GetTask>,
    backend: PhantomData<fn() -> B>,
}

impl<B: Backend> Getter<B> {
    /// Parses and compiles `expression`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Parse`] for a malformed expression.
    pub fn new(expression: &str) -> Result<Self, PathError> {
        Ok(Self {
            expression: expression.to_string(),
            tasks: compile_expression(expression, &GetTaskGen)?,
            backend: PhantomData,
        })
    }

    /// The expression this getter was compiled from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Resolves the expression against `record`, mapping each resolved path
    /// to the value found there. `record` is never modified.
    pub fn run(&self, record: &B::Object) -> Result<PathMap, PathError> {
        let mut state = GetState::<B>::new(record);
        run_tasks(&mut state, &self.tasks)?;
        Ok(state.into_path_map())
    }
}

impl<B: Backend> fmt::Debug for Getter<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("expression", &self.expression)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// Writes values at the leaves an expression resolves to, producing a new
/// record.
pub struct Updater<B: Backend> {
    expression: String,
    tasks: Vec<UpdateTask>,
    backend: PhantomData<fn() -> B>,
}

impl<B: Backend> Updater<B> {
    /// Parses and compiles `expression`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Parse`] for a malformed expression.
    pub fn new(expression: &str) -> Result<Self, PathError> {
        Ok(Self {
            expression: expression.to_string(),
            tasks: compile_expression(expression, &UpdateTaskGen)?,
            backend: PhantomData,
        })
    }

    /// The expression this updater was compiled from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns a copy of `record` with the intent applied.
    ///
    /// `intent` is either a single [`Value`](crate::record::Value) written
    /// at every resolved leaf, or a [`PathMap`] holding one value per
    /// resolved path. An empty `PathMap` returns the copy without
    /// evaluating anything.
    ///
    /// # Errors
    ///
    /// Fails if the record holds a kind its model cannot clone, if a step
    /// meets the wrong container kind, or if the record model rejects a
    /// write.
    pub fn run<'v>(
        &self,
        record: &B::Object,
        intent: impl Into<UpdateIntent<'v>>,
    ) -> Result<B::Object, PathError> {
        let intent = intent.into();
        let copy = B::clone_record(record)?;
        if intent.is_empty() {
            debug!(expression = %self.expression, "no values to write, returning copy");
            return Ok(copy);
        }
        let mut state = UpdateState::<B>::new(copy, intent);
        run_tasks(&mut state, &self.tasks)?;
        Ok(state.into_record())
    }
}

impl<B: Backend> fmt::Debug for Updater<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("expression", &self.expression)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

pub type MapGetter = Getter<MapBackend>;
pub type MapUpdater = Updater<MapBackend>;
pub type StructGetter = Getter<StructBackend>;
pub type StructUpdater = Updater<StructBackend>;
