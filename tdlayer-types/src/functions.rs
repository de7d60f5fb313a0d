//! Outgoing requests.
//!
//! Every request implements [`RemoteCall`](crate::RemoteCall), so its reply
//! type is known statically.

use serde::{Deserialize, Serialize};

use crate::enums::{
    AuthorizationState, CallbackQueryPayload, ChatList, FileType, InputMessageContent,
    InputMessageReplyTo, LogStream, ReplyMarkup,
};
use crate::types;

macro_rules! remote_calls {
    ($($ty:ty => $tag:literal -> $ret:ty),* $(,)?) => {
        $(
            impl $crate::TdObject for $ty {
                const TYPE: &'static str = $tag;
            }

            impl $crate::RemoteCall for $ty {
                type Return = $ret;
            }
        )*
    };
}

// ─── Authorization ────────────────────────────────────────────────────────────

/// Engine parameters, answering `authorizationStateWaitTdlibParameters`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetTdlibParameters {
    pub use_test_dc:             bool,
    pub database_directory:      String,
    pub files_directory:         String,
    pub database_encryption_key: String,
    pub use_file_database:       bool,
    pub use_chat_info_database:  bool,
    pub use_message_database:    bool,
    pub use_secret_chats:        bool,
    pub api_id:                  i32,
    pub api_hash:                String,
    pub system_language_code:    String,
    pub device_model:            String,
    pub system_version:          String,
    pub application_version:     String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetAuthenticationPhoneNumber {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings:     Option<types::PhoneNumberAuthenticationSettings>,
}

impl SetAuthenticationPhoneNumber {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self { phone_number: phone_number.into(), settings: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckAuthenticationCode {
    pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckAuthenticationPassword {
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUser {
    pub first_name:           String,
    pub last_name:            String,
    pub disable_notification: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetAuthorizationState {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogOut {}

/// Close the engine instance. The client receives `authorizationStateClosed` afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Close {}

// ─── Users & chats ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetMe {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetChat {
    #[serde(with = "crate::int64")]
    pub chat_id: i64,
}

/// Returns up to `limit` chat ids from `chat_list` (the main list if `None`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetChats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_list: Option<ChatList>,
    pub limit:     i32,
}

/// Ask the engine to load more chats into `chat_list`; they arrive as `updateNewChat`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadChats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_list: Option<ChatList>,
    pub limit:     i32,
}

// ─── Messages ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetChatHistory {
    #[serde(with = "crate::int64")]
    pub chat_id:         i64,
    #[serde(with = "crate::int64")]
    pub from_message_id: i64,
    pub offset:          i32,
    pub limit:           i32,
    pub only_local:      bool,
}

/// Send a message. The reply is the pending message; its final id arrives
/// later in `updateMessageSendSucceeded`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendMessage {
    #[serde(with = "crate::int64")]
    pub chat_id:               i64,
    #[serde(default, with = "crate::int64")]
    pub message_thread_id:     i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to:              Option<InputMessageReplyTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options:               Option<types::MessageSendOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_markup:          Option<ReplyMarkup>,
    pub input_message_content: InputMessageContent,
}

impl SendMessage {
    pub fn new(chat_id: i64, content: impl Into<InputMessageContent>) -> Self {
        Self {
            chat_id,
            message_thread_id: 0,
            reply_to: None,
            options: None,
            reply_markup: None,
            input_message_content: content.into(),
        }
    }

    /// Reply to `message_id` in the same chat.
    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_to = Some(types::InputMessageReplyToMessage { message_id }.into());
        self
    }

    pub fn reply_markup(mut self, markup: impl Into<ReplyMarkup>) -> Self {
        self.reply_markup = Some(markup.into());
        self
    }

    /// Send without a notification sound.
    pub fn silent(mut self, v: bool) -> Self {
        self.options.get_or_insert_with(Default::default).disable_notification = v;
        self
    }
}

// ─── Files & callbacks ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetRemoteFile {
    pub remote_file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type:      Option<FileType>,
}

/// Press a callback button on behalf of the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetCallbackQueryAnswer {
    #[serde(with = "crate::int64")]
    pub chat_id:    i64,
    #[serde(with = "crate::int64")]
    pub message_id: i64,
    pub payload:    CallbackQueryPayload,
}

// ─── Engine logging ───────────────────────────────────────────────────────────

/// Usable through `execute`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetLogVerbosityLevel {
    pub new_verbosity_level: i32,
}

/// Usable through `execute`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetLogStream {
    pub log_stream: LogStream,
}

remote_calls! {
    SetTdlibParameters           => "setTdlibParameters"           -> types::Ok,
    SetAuthenticationPhoneNumber => "setAuthenticationPhoneNumber" -> types::Ok,
    CheckAuthenticationCode      => "checkAuthenticationCode"      -> types::Ok,
    CheckAuthenticationPassword  => "checkAuthenticationPassword"  -> types::Ok,
    RegisterUser                 => "registerUser"                 -> types::Ok,
    GetAuthorizationState        => "getAuthorizationState"        -> AuthorizationState,
    LogOut                       => "logOut"                       -> types::Ok,
    Close                        => "close"                        -> types::Ok,
    GetMe                        => "getMe"                        -> types::User,
    GetChat                      => "getChat"                      -> types::Chat,
    GetChats                     => "getChats"                     -> types::Chats,
    LoadChats                    => "loadChats"                    -> types::Ok,
    GetChatHistory               => "getChatHistory"               -> types::Messages,
    SendMessage                  => "sendMessage"                  -> types::Message,
    GetRemoteFile                => "getRemoteFile"                -> types::File,
    GetCallbackQueryAnswer       => "getCallbackQueryAnswer"       -> types::CallbackQueryAnswer,
    SetLogVerbosityLevel         => "setLogVerbosityLevel"         -> types::Ok,
    SetLogStream                 => "setLogStream"                 -> types::Ok,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_carries_type_and_string_ids() {
        let req = SendMessage::new(-1001234567890, "hello").reply_to(9007199254740993);
        let v = crate::to_value(&req).unwrap();
        assert_eq!(v["@type"], "sendMessage");
        assert_eq!(v["chat_id"], "-1001234567890");
        assert_eq!(v["reply_to"], json!({"@type": "inputMessageReplyToMessage", "message_id": "9007199254740993"}));
        assert_eq!(v["input_message_content"]["@type"], "inputMessageText");
        assert_eq!(v["input_message_content"]["text"]["text"], "hello");
        assert!(v.get("reply_markup").is_none());
    }

    #[test]
    fn optional_list_is_omitted() {
        let v = crate::to_value(&GetChats { chat_list: None, limit: 20 }).unwrap();
        assert_eq!(v, json!({"@type": "getChats", "limit": 20}));

        let v = crate::to_value(&LoadChats { chat_list: Some(types::ChatListArchive {}.into()), limit: 5 }).unwrap();
        assert_eq!(v["chat_list"], json!({"@type": "chatListArchive"}));
    }

    #[test]
    fn empty_request_is_just_its_type() {
        assert_eq!(crate::to_string(&GetMe {}).unwrap(), r#"{"@type":"getMe"}"#);
    }
}
