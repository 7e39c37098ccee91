//! Resource input properties
//!
//! Inputs are literals, deferred outputs, or arbitrarily nested lists and
//! maps of either (a function app's `app_settings` carries an output three
//! levels deep). The dependency walk below is what turns input wiring into
//! graph edges.

use std::collections::BTreeMap;

use stratus_graph::{OutputGraph, OutputId, Value};

use crate::output::Output;

/// An input property of a resource declaration
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Literal(Value),
    Output(OutputId),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn map(entries: impl IntoIterator<Item = (&'static str, PropertyValue)>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    pub fn list(items: impl IntoIterator<Item = PropertyValue>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Every deferred value this property reads, transitively
    pub fn dependencies(&self) -> Vec<OutputId> {
        let mut deps = Vec::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    fn collect_dependencies(&self, deps: &mut Vec<OutputId>) {
        match self {
            PropertyValue::Literal(_) => {}
            PropertyValue::Output(id) => deps.push(*id),
            PropertyValue::List(items) => {
                for item in items {
                    item.collect_dependencies(deps);
                }
            }
            PropertyValue::Map(entries) => {
                for value in entries.values() {
                    value.collect_dependencies(deps);
                }
            }
        }
    }

    /// Substitute resolved output values, producing plain JSON.
    ///
    /// Callers only materialize once every dependency is resolved; a pending
    /// or failed output surfaces as the underlying graph error.
    pub fn materialize(&self, graph: &OutputGraph) -> stratus_graph::Result<Value> {
        match self {
            PropertyValue::Literal(value) => Ok(value.clone()),
            PropertyValue::Output(id) => graph.value(*id),
            PropertyValue::List(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(|item| item.materialize(graph))
                    .collect::<stratus_graph::Result<Vec<_>>>()?,
            )),
            PropertyValue::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, value) in entries {
                    object.insert(key.clone(), value.materialize(graph)?);
                }
                Ok(Value::Object(object))
            }
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Literal(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Literal(Value::String(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Literal(Value::Bool(value))
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Literal(value.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Literal(value.into())
    }
}

impl From<OutputId> for PropertyValue {
    fn from(id: OutputId) -> Self {
        PropertyValue::Output(id)
    }
}

impl<T> From<Output<T>> for PropertyValue {
    fn from(output: Output<T>) -> Self {
        PropertyValue::Output(output.id())
    }
}

/// Literal-or-deferred argument for typed resource constructors
#[derive(Debug, Clone)]
pub enum Input<T> {
    Value(T),
    Output(Output<T>),
}

impl<T: serde::Serialize> Input<T> {
    pub fn into_property(self) -> crate::error::Result<PropertyValue> {
        match self {
            Input::Value(value) => Ok(PropertyValue::Literal(serde_json::to_value(value)?)),
            Input::Output(output) => Ok(PropertyValue::Output(output.id())),
        }
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Input::Value(value.to_string())
    }
}

impl From<String> for Input<String> {
    fn from(value: String) -> Self {
        Input::Value(value)
    }
}

impl<T> From<Output<T>> for Input<T> {
    fn from(output: Output<T>) -> Self {
        Input::Output(output)
    }
}
