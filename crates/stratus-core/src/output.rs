//! Typed handles over deferred graph values

use std::marker::PhantomData;

use stratus_graph::{OutputId, Value};

/// A typed, copyable handle to a deferred value.
///
/// Carries no data of its own; all reads and combinations go through the
/// owning [`Stack`](crate::Stack), which holds the graph.
pub struct Output<T> {
    id: OutputId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Output<T> {
    pub(crate) fn new(id: OutputId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> OutputId {
        self.id
    }

    /// Drop the type, keeping the handle
    pub fn untyped(self) -> Output<Value> {
        Output::new(self.id)
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Output<T> {}

impl<T> std::fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Output").field(&self.id).finish()
    }
}
