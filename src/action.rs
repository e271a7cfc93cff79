use crate::ActionError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, rc::Rc};

/// An action submitted to a [Reducer](crate::Reducer), identified by
/// its `type` discriminator.
///
/// The `payload`, `meta` and `error` fields are untyped
/// ([serde_json::Value]); the case reducer registered for the action
/// type gives them meaning. When `None` they are omitted from
/// serialized output.
///
/// ```
/// use slice_state::Action;
/// use serde_json::json;
///
/// let action = Action::new("todos/add").with_payload(json!("buy milk"));
/// assert_eq!(action.action_type, "todos/add");
/// assert_eq!(action.payload, Some(json!("buy milk")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The discriminator selecting the case reducer for this action.
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub meta: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only an absent
/// field becomes `None`.
fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Action {
    /// Create an action of the given type with no payload.
    pub fn new<T: Into<String>>(action_type: T) -> Self {
        Action {
            action_type: action_type.into(),
            payload: None,
            meta: None,
            error: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }
}

/// Anything which exposes an action type discriminator.
///
/// This is how both raw type strings and [ActionCreator]s can be used
/// as keys when registering case reducers: the discriminator is read
/// once at registration.
pub trait ActionType {
    fn action_type(&self) -> &str;
}

impl ActionType for str {
    fn action_type(&self) -> &str {
        self
    }
}

impl ActionType for String {
    fn action_type(&self) -> &str {
        self.as_str()
    }
}

impl ActionType for Action {
    fn action_type(&self) -> &str {
        &self.action_type
    }
}

impl<T: ActionType + ?Sized> ActionType for &T {
    fn action_type(&self) -> &str {
        (**self).action_type()
    }
}

/// The result of a prepare function: the payload, and optionally the
/// `meta` and `error` of the action about to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedAction {
    pub payload: Value,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub meta: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<Value>,
}

impl PreparedAction {
    pub fn new<P: Into<Value>>(payload: P) -> Self {
        PreparedAction {
            payload: payload.into(),
            meta: None,
            error: None,
        }
    }

    pub fn with_meta<M: Into<Value>>(mut self, meta: M) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn with_error<E: Into<Value>>(mut self, error: E) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Derives a [PreparedAction] from the arguments an [ActionCreator] was
/// called with. Returning `None` is a contract violation reported as
/// [ActionError::PrepareResult].
pub type PrepareFn = Rc<dyn Fn(&[Value]) -> Option<PreparedAction>>;

/// A function-like value bound to a single action type, which creates
/// [Action]s of that type.
///
/// Formatting an action creator with `{}` yields its action type, as
/// does [get_type()].
#[derive(Clone)]
pub struct ActionCreator {
    action_type: Rc<str>,
    prepare: Option<PrepareFn>,
}

impl ActionCreator {
    /// Create an [Action] from the call-time `args`.
    ///
    /// Without a prepare function at most one argument is accepted, and
    /// it becomes the payload. With a prepare function all arguments are
    /// forwarded to it.
    pub fn call(&self, args: &[Value]) -> Result<Action, ActionError> {
        match &self.prepare {
            Some(prepare) => {
                let prepared =
                    prepare(args).ok_or_else(|| ActionError::PrepareResult {
                        action_type: self.action_type.to_string(),
                    })?;

                Ok(Action {
                    action_type: self.action_type.to_string(),
                    payload: Some(prepared.payload),
                    meta: prepared.meta,
                    error: prepared.error,
                })
            }
            None => match args {
                [] => Ok(Action::new(&*self.action_type)),
                [payload] => {
                    Ok(Action::new(&*self.action_type).with_payload(payload.clone()))
                }
                _ => Err(ActionError::UnexpectedArguments {
                    action_type: self.action_type.to_string(),
                    count: args.len(),
                }),
            },
        }
    }

    /// Create an [Action] without any call-time arguments.
    pub fn create(&self) -> Result<Action, ActionError> {
        self.call(&[])
    }

    /// Create an [Action] with a single call-time argument.
    pub fn with_payload<P: Into<Value>>(&self, payload: P) -> Result<Action, ActionError> {
        self.call(&[payload.into()])
    }

    /// Returns `true` if `action` has the type this creator is bound to.
    pub fn matches(&self, action: &Action) -> bool {
        action.action_type == *self.action_type
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn has_prepare(&self) -> bool {
        self.prepare.is_some()
    }
}

impl ActionType for ActionCreator {
    fn action_type(&self) -> &str {
        &self.action_type
    }
}

impl fmt::Display for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_type)
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.action_type)
            .field("prepare", &self.prepare.is_some())
            .finish()
    }
}

/// Create an [ActionCreator] for `action_type`. The created actions
/// carry the first call-time argument (if any) as their payload.
///
/// The type is not checked for uniqueness here; that happens when it
/// is registered as a case.
pub fn create_action<T: Into<String>>(action_type: T) -> Result<ActionCreator, ActionError> {
    new_action_creator(action_type.into(), None)
}

/// Create an [ActionCreator] for `action_type` which passes its
/// call-time arguments through `prepare` to compute the payload, meta
/// and error of the created actions.
///
/// ```
/// use slice_state::{create_action_with_prepare, PreparedAction};
/// use serde_json::json;
///
/// let add_todo = create_action_with_prepare("todos/add", |args| {
///     let text = args.first()?.as_str()?;
///     Some(PreparedAction::new(text).with_meta(json!({ "length": text.len() })))
/// })
/// .unwrap();
///
/// let action = add_todo.with_payload("walk the dog").unwrap();
/// assert_eq!(action.payload, Some(json!("walk the dog")));
/// assert_eq!(action.meta, Some(json!({ "length": 12 })));
/// ```
pub fn create_action_with_prepare<T, F>(
    action_type: T,
    prepare: F,
) -> Result<ActionCreator, ActionError>
where
    T: Into<String>,
    F: Fn(&[Value]) -> Option<PreparedAction> + 'static,
{
    new_action_creator(action_type.into(), Some(Rc::new(prepare)))
}

pub(crate) fn new_action_creator(
    action_type: String,
    prepare: Option<PrepareFn>,
) -> Result<ActionCreator, ActionError> {
    if action_type.is_empty() {
        return Err(ActionError::EmptyActionType);
    }

    Ok(ActionCreator {
        action_type: action_type.into(),
        prepare,
    })
}

/// Returns the action type of the actions created by `action_creator`.
pub fn get_type(action_creator: &ActionCreator) -> &str {
    action_creator.action_type()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creator_type_round_trip() {
        let creator = create_action("T").unwrap();

        assert_eq!("T", creator.to_string());
        assert_eq!("T", creator.action_type());
        assert_eq!("T", get_type(&creator));
        assert_eq!("T", ActionType::action_type(&&creator));
    }

    #[test]
    fn empty_type_is_rejected() {
        assert_eq!(
            Err(ActionError::EmptyActionType),
            create_action("").map(|_| ())
        );
    }

    #[test]
    fn creator_without_payload() {
        let creator = create_action("counter/increment").unwrap();
        let action = creator.create().unwrap();

        assert_eq!(action, Action::new("counter/increment"));
        assert_eq!(None, action.payload);
    }

    #[test]
    fn first_argument_is_payload() {
        let creator = create_action("counter/add").unwrap();
        let action = creator.with_payload(5).unwrap();

        assert_eq!(Some(json!(5)), action.payload);
        assert_eq!(None, action.meta);
    }

    #[test]
    fn too_many_arguments_without_prepare() {
        let creator = create_action("counter/add").unwrap();

        assert_eq!(
            Err(ActionError::UnexpectedArguments {
                action_type: "counter/add".to_string(),
                count: 2,
            }),
            creator.call(&[json!(1), json!(2)])
        );
    }

    #[test]
    fn prepare_receives_all_arguments() {
        let creator = create_action_with_prepare("point/set", |args| {
            Some(
                PreparedAction::new(json!({ "x": args[0], "y": args[1] }))
                    .with_meta("moved")
                    .with_error(false),
            )
        })
        .unwrap();

        let action = creator.call(&[json!(1), json!(2)]).unwrap();

        assert_eq!(Some(json!({ "x": 1, "y": 2 })), action.payload);
        assert_eq!(Some(json!("moved")), action.meta);
        assert_eq!(Some(json!(false)), action.error);
        assert!(creator.has_prepare());
    }

    #[test]
    fn prepare_without_result_fails() {
        let creator = create_action_with_prepare("broken", |_| None).unwrap();

        assert_eq!(
            Err(ActionError::PrepareResult {
                action_type: "broken".to_string()
            }),
            creator.create()
        );
    }

    #[test]
    fn matches_action_type() {
        let creator = create_action("a").unwrap();

        assert!(creator.matches(&Action::new("a")));
        assert!(!creator.matches(&Action::new("b")));
    }

    #[test]
    fn action_serializes_with_type_field() {
        let action = Action::new("todos/add").with_payload(json!("milk"));
        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(json!({ "type": "todos/add", "payload": "milk" }), value);

        let parsed: Action = serde_json::from_value(json!({ "type": "todos/clear" })).unwrap();
        assert_eq!(Action::new("todos/clear"), parsed);
    }

    #[test]
    fn null_payload_survives_serialization() {
        let creator = create_action("todos/set").unwrap();
        let action = creator.with_payload(Value::Null).unwrap();
        let wire = serde_json::to_string(&action).unwrap();
        let parsed: Action = serde_json::from_str(&wire).unwrap();

        assert_eq!(Some(Value::Null), parsed.payload);
        assert_eq!(action, parsed);

        let parsed: Action =
            serde_json::from_value(json!({ "type": "todos/set", "meta": null })).unwrap();
        assert_eq!(None, parsed.payload);
        assert_eq!(Some(Value::Null), parsed.meta);
    }

    #[test]
    fn prepared_action_serialization() {
        let prepared = PreparedAction::new(5).with_meta(Value::Null);
        let value = serde_json::to_value(&prepared).unwrap();

        assert_eq!(json!({ "payload": 5, "meta": null }), value);

        let parsed: PreparedAction = serde_json::from_value(value).unwrap();
        assert_eq!(prepared, parsed);
        assert_eq!(None, parsed.error);
    }

    #[test]
    fn action_exposes_its_type() {
        let action = Action::new("todos/add");

        assert_eq!("todos/add", ActionType::action_type(&action));
        assert_eq!("todos/add", ActionType::action_type(&&action));
    }
}
