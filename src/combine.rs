use crate::{Action, Reducer, ReducerError, Slice};
use std::{any::Any, collections::BTreeMap, fmt, rc::Rc};

/// The state produced by a [CombinedReducer]: one state per key, each
/// owned by the reducer registered under that key.
#[derive(Clone)]
pub struct CombinedState {
    states: BTreeMap<String, Rc<dyn Any>>,
}

impl CombinedState {
    /// The state stored under `key`, if there is one of type `State`.
    pub fn get<State: 'static>(&self, key: &str) -> Option<Rc<State>> {
        self.states.get(key)?.clone().downcast::<State>().ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.states.keys()).finish()
    }
}

type ErasedReducer = Box<dyn Fn(Option<&Rc<dyn Any>>, &Action) -> Rc<dyn Any>>;

/// A [Reducer] composed of multiple reducers, each managing the part
/// of a [CombinedState] stored under its key.
///
/// Every action is passed to every reducer. If none of them produces a
/// new state, the previous [CombinedState] is returned as is.
pub struct CombinedReducer {
    reducers: Vec<(String, ErasedReducer)>,
}

impl CombinedReducer {
    /// Create a new, empty [CombinedReducer].
    pub fn new() -> Self {
        CombinedReducer {
            reducers: Vec::new(),
        }
    }

    /// Add `reducer` to manage the state under `key`.
    pub fn with_reducer<State, R>(mut self, key: &str, reducer: R) -> Result<Self, ReducerError>
    where
        State: 'static,
        R: Reducer<State> + 'static,
    {
        if self.reducers.iter().any(|(k, _)| k == key) {
            return Err(ReducerError::DuplicateKey {
                key: key.to_string(),
            });
        }

        let state_key = key.to_string();
        let erased: ErasedReducer = Box::new(
            move |prev_state: Option<&Rc<dyn Any>>, action: &Action| -> Rc<dyn Any> {
                let prev_state = prev_state.and_then(|state| {
                    let typed = state.clone().downcast::<State>().ok();
                    if typed.is_none() {
                        log::warn!(
                            "state under key `{}` is not a `{}`, reinitializing it",
                            state_key,
                            std::any::type_name::<State>()
                        );
                    }
                    typed
                });
                reducer.reduce(prev_state.as_ref(), action)
            },
        );

        self.reducers.push((key.to_string(), erased));
        Ok(self)
    }

    /// Add the reducer of `slice` to manage the state under the slice's
    /// name, where [Slice::selector()] looks for it.
    pub fn with_slice<State>(self, slice: &Slice<State>) -> Result<Self, ReducerError>
    where
        State: Clone + 'static,
    {
        self.with_reducer(slice.name(), slice.reducer().clone())
    }
}

impl Default for CombinedReducer {
    fn default() -> Self {
        CombinedReducer::new()
    }
}

impl Reducer<CombinedState> for CombinedReducer {
    fn reduce(&self, prev_state: Option<&Rc<CombinedState>>, action: &Action) -> Rc<CombinedState> {
        let mut states = BTreeMap::new();
        let mut changed = prev_state.is_none();

        for (key, reducer) in &self.reducers {
            let prev = prev_state.and_then(|state| state.states.get(key));
            let next = reducer(prev, action);

            changed |= match prev {
                Some(prev) => !same_state(prev, &next),
                None => true,
            };
            states.insert(key.clone(), next);
        }

        match prev_state {
            Some(prev_state) if !changed => prev_state.clone(),
            _ => Rc::new(CombinedState { states }),
        }
    }
}

fn same_state(a: &Rc<dyn Any>, b: &Rc<dyn Any>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use crate::{
        create_action, create_reducer, create_slice, Action, CaseReducers, CombinedReducer, Reducer,
        ReducerError, SliceOptions,
    };
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct TodoState {
        todos: Vec<String>,
    }

    fn test_reducer() -> (CombinedReducer, crate::Slice<i32>, crate::Slice<TodoState>) {
        let counter = create_slice(
            SliceOptions::new("counter", 0).reducer("increment", |state, _| Some(**state + 1)),
        )
        .unwrap();
        let todos = create_slice(SliceOptions::new("todos", TodoState::default()).reducer(
            "add",
            |state, action| {
                let text = action.payload.as_ref().and_then(|p| p.as_str()).unwrap_or_default();
                state.todos.push(text.to_string());
                None
            },
        ))
        .unwrap();

        let reducer = CombinedReducer::new()
            .with_slice(&counter)
            .unwrap()
            .with_slice(&todos)
            .unwrap();

        (reducer, counter, todos)
    }

    #[test]
    fn initializes_every_slice() {
        let (reducer, counter, todos) = test_reducer();
        let state = reducer.reduce(None, &Action::new("@@init"));

        assert_eq!(vec!["counter", "todos"], state.keys().collect::<Vec<_>>());
        assert_eq!(Some(Rc::new(0)), counter.selector().select(&state));
        assert_eq!(
            Some(Rc::new(TodoState::default())),
            todos.selector().select(&state)
        );
    }

    #[test]
    fn only_the_matching_slice_changes() {
        let (reducer, counter, todos) = test_reducer();
        let state = reducer.reduce(None, &Action::new("@@init"));
        let add = todos.action("add").unwrap().with_payload("milk").unwrap();
        let next = reducer.reduce(Some(&state), &add);

        assert!(!Rc::ptr_eq(&state, &next));
        assert_eq!(vec!["milk".to_string()], todos.selector().select(&next).unwrap().todos);
        assert!(Rc::ptr_eq(
            &counter.selector().select(&state).unwrap(),
            &counter.selector().select(&next).unwrap()
        ));
    }

    #[test]
    fn unmatched_action_returns_same_combined_state() {
        let (reducer, _, _) = test_reducer();
        let state = reducer.reduce(None, &Action::new("@@init"));
        let unknown = create_action("other/thing").unwrap().create().unwrap();

        assert!(Rc::ptr_eq(&state, &reducer.reduce(Some(&state), &unknown)));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let (_, counter, _) = test_reducer();
        let result = CombinedReducer::new()
            .with_slice(&counter)
            .and_then(|reducer| reducer.with_slice(&counter));

        assert_eq!(
            ReducerError::DuplicateKey {
                key: "counter".to_string()
            },
            result.err().unwrap()
        );
    }

    #[test]
    fn state_of_another_reducer_is_reinitialized() {
        let (reducer, counter, _) = test_reducer();
        let other = CombinedReducer::new()
            .with_reducer("counter", create_reducer(String::from("fresh"), CaseReducers::new()))
            .unwrap();
        let foreign = other.reduce(None, &Action::new("@@init"));

        let state = reducer.reduce(Some(&foreign), &Action::new("@@init"));
        assert_eq!(Some(Rc::new(0)), counter.selector().select(&state));
    }

    #[test]
    fn selector_of_wrong_type_finds_nothing() {
        let (reducer, counter, _) = test_reducer();
        let state = reducer.reduce(None, &Action::new("@@init"));

        assert_eq!(None, state.get::<String>(counter.name()));
    }
}
