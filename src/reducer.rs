use crate::{
    case_reducers::execute_reducer_builder_callback, Action, ActionReducerMapBuilder,
    CaseReducers, Draft, ReducerError,
};
use std::rc::Rc;

/// Using the [reduce()](Reducer::reduce()) method, implementors of
/// this trait take an [Action] dispatched by a store and the store's
/// current `State`, and produce the next `State`.
///
/// The previous state is never mutated. A store calls `reduce()` with
/// `None` exactly once, when it is initialized, to obtain the initial
/// state; afterwards it passes the state produced by the previous
/// call.
pub trait Reducer<State> {
    /// Take an [Action] and the `prev_state`, producing the next
    /// `State`.
    ///
    /// If the reducer has nothing to do for this action, the returned
    /// `Rc` is `prev_state` itself, so that `Rc::ptr_eq()` can be used
    /// to detect that nothing changed.
    fn reduce(&self, prev_state: Option<&Rc<State>>, action: &Action) -> Rc<State>;
}

/// A [Reducer] composed of a [CaseReducers] mapping: each action is
/// handled by the case reducer registered for its type.
///
/// Created with [create_reducer()] or [create_reducer_with()].
pub struct ComposedReducer<State> {
    initial_state: Rc<State>,
    cases: Rc<CaseReducers<State>>,
}

impl<State> ComposedReducer<State> {
    pub fn initial_state(&self) -> &Rc<State> {
        &self.initial_state
    }

    pub fn cases(&self) -> &CaseReducers<State> {
        &self.cases
    }
}

impl<State> Clone for ComposedReducer<State> {
    fn clone(&self) -> Self {
        ComposedReducer {
            initial_state: self.initial_state.clone(),
            cases: self.cases.clone(),
        }
    }
}

impl<State> std::fmt::Debug for ComposedReducer<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComposedReducer{{cases: {:?}}}", self.cases)
    }
}

impl<State: Clone> Reducer<State> for ComposedReducer<State> {
    fn reduce(&self, prev_state: Option<&Rc<State>>, action: &Action) -> Rc<State> {
        let state = match prev_state {
            Some(state) => state,
            None => return self.initial_state.clone(),
        };

        let case_reducer = match self.cases.get(&action.action_type) {
            Some(case_reducer) => case_reducer,
            None => return state.clone(),
        };

        log::trace!("reducing action `{}`", action.action_type);

        let mut draft = Draft::new(state);
        match case_reducer(&mut draft, action) {
            Some(next_state) => Rc::new(next_state),
            None => draft.finish(),
        }
    }
}

/// Create a [ComposedReducer] which starts from `initial_state` and
/// handles actions with the given `cases`.
///
/// ```
/// use slice_state::{case_reducer, create_reducer, Action, CaseReducers, Reducer};
///
/// let cases = CaseReducers::from_cases(vec![
///     ("increment", case_reducer::<i32, _>(|state, _| Some(**state + 1))),
/// ])
/// .unwrap();
/// let reducer = create_reducer(0, cases);
///
/// let state = reducer.reduce(None, &Action::new("@@init"));
/// let state = reducer.reduce(Some(&state), &Action::new("increment"));
/// assert_eq!(1, *state);
/// ```
pub fn create_reducer<State>(
    initial_state: State,
    cases: CaseReducers<State>,
) -> ComposedReducer<State> {
    log::debug!("creating reducer with cases {:?}", cases);

    ComposedReducer {
        initial_state: Rc::new(initial_state),
        cases: Rc::new(cases),
    }
}

/// Create a [ComposedReducer] whose cases are registered by `callback`
/// on an [ActionReducerMapBuilder].
pub fn create_reducer_with<State, F>(
    initial_state: State,
    callback: F,
) -> Result<ComposedReducer<State>, ReducerError>
where
    F: FnOnce(&mut ActionReducerMapBuilder<State>) -> Result<(), ReducerError>,
{
    let cases = execute_reducer_builder_callback(callback)?;
    Ok(create_reducer(initial_state, cases))
}
