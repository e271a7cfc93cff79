use std::{
    fmt::Debug,
    ops::{Deref, DerefMut},
    rc::Rc,
};

/// A mutable working view of a `State`, handed to a case reducer.
///
/// Reading through the draft reads the base state. The first mutable
/// access clones the base state once; every later mutation applies to
/// that copy. When the case reducer returns, the draft is finished
/// into a new `Rc<State>`, or into the unchanged base if it was never
/// mutably accessed. The base state itself is never modified.
///
/// Structural sharing comes from the state's own layout: fields held
/// behind an `Rc` are shared by the clone until they are written
/// through [Rc::make_mut()].
///
/// ```
/// use slice_state::Draft;
/// use std::rc::Rc;
///
/// let base = Rc::new(vec![1, 2]);
/// let mut draft = Draft::new(&base);
/// draft.push(3);
///
/// let next = draft.finish();
/// assert_eq!(*base, vec![1, 2]);
/// assert_eq!(*next, vec![1, 2, 3]);
/// ```
pub struct Draft<'a, State> {
    base: &'a Rc<State>,
    copy: Option<State>,
}

impl<'a, State: Clone> Draft<'a, State> {
    pub fn new(base: &'a Rc<State>) -> Self {
        Draft { base, copy: None }
    }

    /// The state this draft was created from, ignoring any mutations.
    pub fn base(&self) -> &State {
        &**self.base
    }

    /// Returns `true` once the draft has been mutably accessed.
    pub fn is_modified(&self) -> bool {
        self.copy.is_some()
    }

    /// Materialize the draft. Returns the base `Rc` itself when the
    /// draft was never mutably accessed.
    pub fn finish(self) -> Rc<State> {
        match self.copy {
            Some(state) => Rc::new(state),
            None => self.base.clone(),
        }
    }
}

impl<'a, State> Deref for Draft<'a, State> {
    type Target = State;

    fn deref(&self) -> &State {
        match &self.copy {
            Some(state) => state,
            None => &**self.base,
        }
    }
}

impl<'a, State: Clone> DerefMut for Draft<'a, State> {
    fn deref_mut(&mut self) -> &mut State {
        let base = self.base;
        self.copy.get_or_insert_with(|| State::clone(base))
    }
}

impl<'a, State: Debug> Debug for Draft<'a, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Draft")
            .field("state", &**self)
            .field("modified", &self.copy.is_some())
            .finish()
    }
}
