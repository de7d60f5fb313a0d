//! Updates pushed by the engine without a matching request.

use serde::{Deserialize, Serialize};

use super::{Chat, Error, File, Message, User};
use crate::enums::{AuthorizationState, CallbackQueryPayload, ConnectionState, MessageContent, OptionValue};

/// The client's authorization state changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateAuthorizationState {
    pub authorization_state: AuthorizationState,
}

/// A new message was received or sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateNewMessage {
    pub message: Message,
}

/// The content of a message changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessageContent {
    #[serde(with = "crate::int64")]
    pub chat_id:     i64,
    #[serde(with = "crate::int64")]
    pub message_id:  i64,
    pub new_content: MessageContent,
}

/// A pending outgoing message was accepted by the server and got its final id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessageSendSucceeded {
    pub message:        Message,
    #[serde(with = "crate::int64")]
    pub old_message_id: i64,
}

/// A pending outgoing message could not be sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessageSendFailed {
    pub message:        Message,
    #[serde(with = "crate::int64")]
    pub old_message_id: i64,
    #[serde(default)]
    pub error:          Error,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeleteMessages {
    #[serde(with = "crate::int64")]
    pub chat_id:      i64,
    #[serde(with = "crate::int64::vec")]
    pub message_ids:  Vec<i64>,
    pub is_permanent: bool,
    pub from_cache:   bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateNewChat {
    pub chat: Chat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateConnectionState {
    pub state: ConnectionState,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateFile {
    pub file: File,
}

/// An engine option changed, e.g. `version` or `my_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateOption {
    pub name:  String,
    pub value: OptionValue,
}

/// A callback button under a bot message was pressed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateNewCallbackQuery {
    #[serde(with = "crate::int64")]
    pub id:             i64,
    #[serde(with = "crate::int64")]
    pub sender_user_id: i64,
    #[serde(with = "crate::int64")]
    pub chat_id:        i64,
    #[serde(with = "crate::int64")]
    pub message_id:     i64,
    #[serde(default, with = "crate::int64")]
    pub chat_instance:  i64,
    pub payload:        CallbackQueryPayload,
}

td_object! {
    UpdateAuthorizationState   => "updateAuthorizationState",
    UpdateNewMessage           => "updateNewMessage",
    UpdateMessageContent       => "updateMessageContent",
    UpdateMessageSendSucceeded => "updateMessageSendSucceeded",
    UpdateMessageSendFailed    => "updateMessageSendFailed",
    UpdateDeleteMessages       => "updateDeleteMessages",
    UpdateNewChat              => "updateNewChat",
    UpdateUser                 => "updateUser",
    UpdateConnectionState      => "updateConnectionState",
    UpdateFile                 => "updateFile",
    UpdateOption               => "updateOption",
    UpdateNewCallbackQuery     => "updateNewCallbackQuery",
}
