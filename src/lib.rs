//! Action creators, case reducers and slices for managing application
//! state with reducers (similar to redux toolkit).
//!
//! A [Slice] bundles a [ComposedReducer] with the [ActionCreator]s for
//! the actions it handles. Case reducers receive a [Draft] of the
//! state which they may mutate freely; the previous state is never
//! modified.
//!
//! ```
//! use slice_state::{create_slice, Action, CombinedReducer, Reducer, SliceOptions};
//!
//! #[derive(Clone, Default)]
//! struct Todos {
//!     items: Vec<String>,
//! }
//!
//! let todos = create_slice(SliceOptions::new("todos", Todos::default()).reducer(
//!     "add",
//!     |state, action| {
//!         let text = action.payload.as_ref()?.as_str()?.to_string();
//!         state.items.push(text);
//!         None
//!     },
//! ))
//! .unwrap();
//!
//! let reducer = CombinedReducer::new().with_slice(&todos).unwrap();
//! let add = todos.action("add").unwrap();
//!
//! let state = reducer.reduce(None, &Action::new("@@init"));
//! let state = reducer.reduce(Some(&state), &add.with_payload("milk").unwrap());
//! let state = reducer.reduce(Some(&state), &add.with_payload("eggs").unwrap());
//!
//! let items = todos.selector().select(&state).unwrap();
//! assert_eq!(vec!["milk".to_string(), "eggs".to_string()], items.items);
//! ```

mod action;
mod case_reducers;
mod combine;
mod draft;
mod error;
mod reducer;
mod slice;

pub use action::*;
pub use case_reducers::*;
pub use combine::*;
pub use draft::*;
pub use error::*;
pub use reducer::*;
pub use slice::*;
