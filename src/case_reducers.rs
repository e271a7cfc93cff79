use crate::{Action, ActionType, Draft, ReducerError};
use std::{collections::BTreeMap, fmt, rc::Rc};

/// A handler for a single action type.
///
/// A case reducer either mutates the [Draft] it is given and returns
/// `None`, or returns `Some(next_state)` to replace the state outright.
/// An explicit return always wins over mutations made to the draft.
pub type CaseReducer<State> = Rc<dyn Fn(&mut Draft<'_, State>, &Action) -> Option<State>>;

/// Wrap a closure as a [CaseReducer].
pub fn case_reducer<State, F>(reducer: F) -> CaseReducer<State>
where
    F: Fn(&mut Draft<'_, State>, &Action) -> Option<State> + 'static,
{
    Rc::new(reducer)
}

/// A mapping from action types to the [CaseReducer] handling them.
///
/// An action type can only be registered once; a second registration
/// fails with [ReducerError::DuplicateCase] rather than replacing the
/// first handler.
pub struct CaseReducers<State> {
    cases: BTreeMap<String, CaseReducer<State>>,
}

impl<State> CaseReducers<State> {
    pub fn new() -> Self {
        CaseReducers {
            cases: BTreeMap::new(),
        }
    }

    /// Build a mapping from `(action type, case reducer)` pairs,
    /// failing on the first repeated action type.
    pub fn from_cases<K, I>(cases: I) -> Result<Self, ReducerError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CaseReducer<State>)>,
    {
        let mut map = CaseReducers::new();
        for (action_type, reducer) in cases {
            map.insert(action_type, reducer)?;
        }
        Ok(map)
    }

    pub fn insert<K: Into<String>>(
        &mut self,
        action_type: K,
        reducer: CaseReducer<State>,
    ) -> Result<(), ReducerError> {
        let action_type = action_type.into();
        if self.cases.contains_key(&action_type) {
            return Err(ReducerError::DuplicateCase { action_type });
        }
        self.cases.insert(action_type, reducer);
        Ok(())
    }

    /// Move every case of `other` into this mapping. Fails without
    /// modifying `self` if any action type is present in both.
    pub fn merge(&mut self, other: CaseReducers<State>) -> Result<(), ReducerError> {
        if let Some(action_type) = other.cases.keys().find(|k| self.cases.contains_key(*k)) {
            return Err(ReducerError::DuplicateCase {
                action_type: action_type.clone(),
            });
        }
        self.cases.extend(other.cases);
        Ok(())
    }

    pub fn get(&self, action_type: &str) -> Option<&CaseReducer<State>> {
        self.cases.get(action_type)
    }

    pub fn contains(&self, action_type: &str) -> bool {
        self.cases.contains_key(action_type)
    }

    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<State> Default for CaseReducers<State> {
    fn default() -> Self {
        CaseReducers::new()
    }
}

impl<State> Clone for CaseReducers<State> {
    fn clone(&self) -> Self {
        CaseReducers {
            cases: self.cases.clone(),
        }
    }
}

impl<State> fmt::Debug for CaseReducers<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cases.keys()).finish()
    }
}

/// A builder for [CaseReducers], registering one case at a time.
///
/// ```
/// use slice_state::{create_action, ActionReducerMapBuilder, ReducerError};
///
/// let increment = create_action("increment").unwrap();
///
/// let mut builder = ActionReducerMapBuilder::<i32>::new();
/// builder
///     .add_case(&increment, |state, _| Some(**state + 1))?
///     .add_case("reset", |_, _| Some(0))?;
///
/// let duplicate = builder.add_case("increment", |_, _| None);
/// assert!(matches!(duplicate, Err(ReducerError::DuplicateCase { .. })));
/// # Ok::<(), ReducerError>(())
/// ```
pub struct ActionReducerMapBuilder<State> {
    cases: CaseReducers<State>,
}

impl<State> ActionReducerMapBuilder<State> {
    pub fn new() -> Self {
        ActionReducerMapBuilder {
            cases: CaseReducers::new(),
        }
    }

    /// Register `reducer` for the action type of `action`, which is
    /// either a type string or an [ActionCreator](crate::ActionCreator).
    pub fn add_case<A, F>(&mut self, action: A, reducer: F) -> Result<&mut Self, ReducerError>
    where
        A: ActionType,
        F: Fn(&mut Draft<'_, State>, &Action) -> Option<State> + 'static,
    {
        self.add_case_reducer(action, Rc::new(reducer))
    }

    /// Register an existing [CaseReducer], for instance one taken from
    /// another slice.
    pub fn add_case_reducer<A: ActionType>(
        &mut self,
        action: A,
        reducer: CaseReducer<State>,
    ) -> Result<&mut Self, ReducerError> {
        self.cases.insert(action.action_type(), reducer)?;
        Ok(self)
    }

    pub fn build(self) -> CaseReducers<State> {
        self.cases
    }
}

impl<State> Default for ActionReducerMapBuilder<State> {
    fn default() -> Self {
        ActionReducerMapBuilder::new()
    }
}

/// Run `callback` against a fresh [ActionReducerMapBuilder] and return
/// the cases it registered.
pub fn execute_reducer_builder_callback<State, F>(
    callback: F,
) -> Result<CaseReducers<State>, ReducerError>
where
    F: FnOnce(&mut ActionReducerMapBuilder<State>) -> Result<(), ReducerError>,
{
    let mut builder = ActionReducerMapBuilder::new();
    callback(&mut builder)?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_action;

    #[test]
    fn insert_rejects_duplicates() {
        let mut cases: CaseReducers<i32> = CaseReducers::new();
        cases.insert("a", case_reducer(|_, _| Some(1))).unwrap();

        assert_eq!(
            Err(ReducerError::DuplicateCase {
                action_type: "a".to_string()
            }),
            cases.insert("a", case_reducer(|_, _| Some(2)))
        );
        assert_eq!(1, cases.len());
    }

    #[test]
    fn from_cases_rejects_duplicates() {
        let result = CaseReducers::<i32>::from_cases(vec![
            ("a", case_reducer(|_, _| None)),
            ("b", case_reducer(|_, _| None)),
            ("a", case_reducer(|_, _| None)),
        ]);

        assert!(matches!(
            result,
            Err(ReducerError::DuplicateCase { action_type }) if action_type == "a"
        ));
    }

    #[test]
    fn builder_accepts_strings_and_creators() {
        let add = create_action("add").unwrap();
        let cases = execute_reducer_builder_callback::<i32, _>(|builder| {
            builder
                .add_case(&add, |state, _| Some(**state + 1))?
                .add_case("reset", |_, _| Some(0))?
                .add_case(Action::new("clear"), |_, _| Some(0))?;
            Ok(())
        })
        .unwrap();

        assert!(cases.contains("add"));
        assert!(cases.contains("reset"));
        assert_eq!(
            vec!["add", "clear", "reset"],
            cases.action_types().collect::<Vec<_>>()
        );
    }

    #[test]
    fn builder_rejects_creator_after_string() {
        let add = create_action("add").unwrap();
        let result = execute_reducer_builder_callback::<i32, _>(|builder| {
            builder.add_case("add", |_, _| None)?;
            builder.add_case(add.clone(), |_, _| None)?;
            Ok(())
        });

        assert!(matches!(result, Err(ReducerError::DuplicateCase { .. })));
    }

    #[test]
    fn merge_is_all_or_nothing() {
        let mut cases =
            CaseReducers::<i32>::from_cases(vec![("a", case_reducer(|_, _| None))]).unwrap();
        let other = CaseReducers::from_cases(vec![
            ("b", case_reducer(|_, _| None)),
            ("a", case_reducer(|_, _| None)),
        ])
        .unwrap();

        assert!(cases.merge(other).is_err());
        assert!(!cases.contains("b"));

        let other = CaseReducers::from_cases(vec![("c", case_reducer(|_, _| None))]).unwrap();
        cases.merge(other).unwrap();
        assert_eq!(2, cases.len());
    }
}
