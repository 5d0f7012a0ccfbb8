//! Named invariants checked after every action.

/// A named predicate over the model
pub struct Invariant<M> {
    name: String,
    check: Box<dyn Fn(&M) -> bool>,
}

impl<M> Invariant<M> {
    /// Create an invariant from a name and a predicate
    pub fn new(name: impl Into<String>, check: impl Fn(&M) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    /// The invariant's label, used in failure reports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the invariant holds for the given model
    pub fn holds(&self, model: &M) -> bool {
        (self.check)(model)
    }
}
