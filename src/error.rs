use thiserror::Error;

/// Errors produced while building or invoking an
/// [ActionCreator](crate::ActionCreator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// An action creator was requested for an empty action type.
    #[error("action type must not be empty")]
    EmptyActionType,

    /// The prepare function of an action creator did not produce a
    /// [PreparedAction](crate::PreparedAction).
    #[error("prepare function for `{action_type}` did not return a prepared action")]
    PrepareResult { action_type: String },

    /// An action creator without a prepare function was called with
    /// more than one argument.
    #[error("action creator for `{action_type}` accepts at most one argument, got {count}")]
    UnexpectedArguments { action_type: String, count: usize },
}

/// Errors produced while assembling case reducers, composed reducers
/// and slices. All of them are raised at construction time, never
/// during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerError {
    /// A second case reducer was registered for the same action type.
    #[error("a case reducer for action type `{action_type}` is already registered")]
    DuplicateCase { action_type: String },

    /// A second reducer was added to a
    /// [CombinedReducer](crate::CombinedReducer) under the same state key.
    #[error("a reducer for state key `{key}` is already registered")]
    DuplicateKey { key: String },

    #[error(transparent)]
    InvalidAction(#[from] ActionError),
}
