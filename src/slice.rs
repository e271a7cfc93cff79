use crate::{
    action::new_action_creator, case_reducers::execute_reducer_builder_callback,
    combine::CombinedState, create_reducer, Action, ActionCreator, ActionReducerMapBuilder,
    CaseReducer, CaseReducers, ComposedReducer, Draft, PrepareFn, PreparedAction, ReducerError,
};
use serde_json::Value;
use std::{collections::BTreeMap, fmt, marker::PhantomData, rc::Rc};

/// The action type of the case `case_name` in the slice `slice_name`:
/// `"slice_name/case_name"`, or just `case_name` for an unnamed slice.
pub fn qualify_type(slice_name: &str, case_name: &str) -> String {
    if slice_name.is_empty() {
        case_name.to_string()
    } else {
        format!("{}/{}", slice_name, case_name)
    }
}

/// The definition of one case declared on a slice.
#[derive(Clone)]
pub enum SliceCaseReducer<State> {
    /// A case reducer whose action creator takes the payload as its
    /// only argument.
    Reducer(CaseReducer<State>),
    /// A case reducer whose action creator computes payload and meta
    /// with a prepare function.
    Prepared {
        reducer: CaseReducer<State>,
        prepare: PrepareFn,
    },
}

impl<State> SliceCaseReducer<State> {
    fn into_parts(self) -> (CaseReducer<State>, Option<PrepareFn>) {
        match self {
            SliceCaseReducer::Reducer(reducer) => (reducer, None),
            SliceCaseReducer::Prepared { reducer, prepare } => (reducer, Some(prepare)),
        }
    }
}

type ExtraReducersCallback<State> =
    Box<dyn FnOnce(&mut ActionReducerMapBuilder<State>) -> Result<(), ReducerError>>;

/// Case reducers for actions a slice does not own (for instance the
/// actions of another slice), keyed by their full action type. No
/// action creators are generated for them.
pub enum ExtraReducers<State> {
    Cases(CaseReducers<State>),
    Builder(ExtraReducersCallback<State>),
}

impl<State> ExtraReducers<State> {
    fn into_cases(self) -> Result<CaseReducers<State>, ReducerError> {
        match self {
            ExtraReducers::Cases(cases) => Ok(cases),
            ExtraReducers::Builder(callback) => execute_reducer_builder_callback(callback),
        }
    }
}

/// Options for [create_slice()].
///
/// ```
/// use slice_state::{create_slice, Reducer, SliceOptions};
///
/// let counter = create_slice(
///     SliceOptions::new("counter", 0)
///         .reducer("increment", |state, _| Some(**state + 1))
///         .reducer("decrement", |state, _| Some(**state - 1)),
/// )
/// .unwrap();
///
/// let increment = counter.action("increment").unwrap().create().unwrap();
/// assert_eq!("counter/increment", increment.action_type);
/// assert_eq!(1, *counter.reducer().reduce(Some(&std::rc::Rc::new(0)), &increment));
/// ```
pub struct SliceOptions<State> {
    name: String,
    initial_state: State,
    reducers: Vec<(String, SliceCaseReducer<State>)>,
    extra_reducers: Option<ExtraReducers<State>>,
}

impl<State> SliceOptions<State> {
    /// `name` namespaces the action types generated for the slice;
    /// it may be empty.
    pub fn new<N: Into<String>>(name: N, initial_state: State) -> Self {
        SliceOptions {
            name: name.into(),
            initial_state,
            reducers: Vec::new(),
            extra_reducers: None,
        }
    }

    /// Declare the case `case_name`, handled by `reducer`.
    pub fn reducer<N, F>(self, case_name: N, reducer: F) -> Self
    where
        N: Into<String>,
        F: Fn(&mut Draft<'_, State>, &Action) -> Option<State> + 'static,
    {
        self.case(case_name, SliceCaseReducer::Reducer(Rc::new(reducer)))
    }

    /// Declare the case `case_name`, handled by `reducer`, whose action
    /// creator passes its arguments through `prepare`.
    pub fn prepared_reducer<N, F, P>(self, case_name: N, reducer: F, prepare: P) -> Self
    where
        N: Into<String>,
        F: Fn(&mut Draft<'_, State>, &Action) -> Option<State> + 'static,
        P: Fn(&[Value]) -> Option<PreparedAction> + 'static,
    {
        self.case(
            case_name,
            SliceCaseReducer::Prepared {
                reducer: Rc::new(reducer),
                prepare: Rc::new(prepare),
            },
        )
    }

    /// Declare the case `case_name` from an existing definition.
    pub fn case<N>(mut self, case_name: N, definition: SliceCaseReducer<State>) -> Self
    where
        N: Into<String>,
    {
        self.reducers.push((case_name.into(), definition));
        self
    }

    pub fn extra_reducers(mut self, cases: CaseReducers<State>) -> Self {
        self.extra_reducers = Some(ExtraReducers::Cases(cases));
        self
    }

    pub fn extra_reducers_with<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut ActionReducerMapBuilder<State>) -> Result<(), ReducerError> + 'static,
    {
        self.extra_reducers = Some(ExtraReducers::Builder(Box::new(callback)));
        self
    }
}

/// A named bundle of a [ComposedReducer], the [ActionCreator]s for the
/// cases it declares, and those cases' raw [CaseReducer]s.
///
/// A slice is immutable once created by [create_slice()].
pub struct Slice<State> {
    name: String,
    reducer: ComposedReducer<State>,
    actions: BTreeMap<String, ActionCreator>,
    case_reducers: BTreeMap<String, CaseReducer<State>>,
}

impl<State> Slice<State> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reducer(&self) -> &ComposedReducer<State> {
        &self.reducer
    }

    /// The action creators of this slice, keyed by case name.
    pub fn actions(&self) -> &BTreeMap<String, ActionCreator> {
        &self.actions
    }

    /// The action creator for the case `case_name`.
    pub fn action(&self, case_name: &str) -> Option<&ActionCreator> {
        self.actions.get(case_name)
    }

    /// The case reducers declared on this slice (not including the
    /// extra reducers), keyed by case name.
    pub fn case_reducers(&self) -> &BTreeMap<String, CaseReducer<State>> {
        &self.case_reducers
    }

    /// A selector for this slice's state within a [CombinedState]
    /// built with [CombinedReducer::with_slice()](crate::CombinedReducer::with_slice()).
    pub fn selector(&self) -> SliceSelector<State> {
        SliceSelector {
            name: selector_name(&self.name),
            key: self.name.clone(),
            phantom_state: PhantomData,
        }
    }
}

impl<State> fmt::Debug for Slice<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("name", &self.name)
            .field("actions", &self.actions)
            .field("reducer", &self.reducer)
            .finish()
    }
}

/// Create a [Slice] from `options`.
///
/// Every declared case gets an action creator for the type
/// [qualify_type(name, case_name)](qualify_type), and its case reducer
/// is registered under that type, alongside the extra reducers.
///
/// # Errors
///
/// Fails if a case name is empty, or if two cases (declared or extra)
/// end up with the same action type.
pub fn create_slice<State>(options: SliceOptions<State>) -> Result<Slice<State>, ReducerError> {
    let SliceOptions {
        name,
        initial_state,
        reducers,
        extra_reducers,
    } = options;

    let mut cases = CaseReducers::new();
    let mut actions = BTreeMap::new();
    let mut case_reducers = BTreeMap::new();

    for (case_name, definition) in reducers {
        if case_name.is_empty() {
            return Err(crate::ActionError::EmptyActionType.into());
        }

        let action_type = qualify_type(&name, &case_name);
        let (reducer, prepare) = definition.into_parts();

        cases.insert(action_type.clone(), reducer.clone())?;
        actions.insert(case_name.clone(), new_action_creator(action_type, prepare)?);
        case_reducers.insert(case_name, reducer);
    }

    if let Some(extra_reducers) = extra_reducers {
        cases.merge(extra_reducers.into_cases()?)?;
    }

    log::debug!(
        "creating slice `{}` with actions {:?}",
        name,
        actions.keys().collect::<Vec<_>>()
    );

    Ok(Slice {
        name,
        reducer: create_reducer(initial_state, cases),
        actions,
        case_reducers,
    })
}

/// The name of the selector for a slice: `"get"` followed by the slice
/// name with its first letter capitalized, or `"getState"` for an
/// unnamed slice.
pub fn selector_name(slice_name: &str) -> String {
    let mut chars = slice_name.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "getState".to_string(),
    }
}

/// Selects the state of one slice out of a [CombinedState].
pub struct SliceSelector<State> {
    name: String,
    key: String,
    phantom_state: PhantomData<State>,
}

impl<State: 'static> SliceSelector<State> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slice's state, or `None` if `state` holds no state of this
    /// slice's type under its name.
    ///
    /// An unnamed slice is looked up under the empty key; when its
    /// reducer is used as the root reducer instead, use
    /// [select_root](SliceSelector::select_root).
    pub fn select(&self, state: &CombinedState) -> Option<Rc<State>> {
        state.get(&self.key)
    }

    /// The slice's state when the slice's reducer is the root reducer,
    /// so the root state is the slice's state itself.
    pub fn select_root(&self, state: &Rc<State>) -> Rc<State> {
        state.clone()
    }
}

impl<State> Clone for SliceSelector<State> {
    fn clone(&self) -> Self {
        SliceSelector {
            name: self.name.clone(),
            key: self.key.clone(),
            phantom_state: PhantomData,
        }
    }
}

impl<State> fmt::Debug for SliceSelector<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SliceSelector({})", self.name)
    }
}
