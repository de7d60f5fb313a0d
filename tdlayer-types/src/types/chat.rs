use serde::{Deserialize, Serialize};

use super::Message;
use crate::enums::ChatType;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatListMain {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatListArchive {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatListFolder {
    pub chat_folder_id: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatTypePrivate {
    #[serde(with = "crate::int64")]
    pub user_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatTypeBasicGroup {
    #[serde(with = "crate::int64")]
    pub basic_group_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatTypeSupergroup {
    #[serde(with = "crate::int64")]
    pub supergroup_id: i64,
    pub is_channel:    bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatTypeSecret {
    pub secret_chat_id: i32,
    #[serde(with = "crate::int64")]
    pub user_id:        i64,
}

/// A chat (private, group, supergroup, channel or secret).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(with = "crate::int64")]
    pub id:                   i64,
    #[serde(rename = "type")]
    pub kind:                 ChatType,
    #[serde(default)]
    pub title:                String,
    #[serde(default)]
    pub last_message:         Option<Box<Message>>,
    #[serde(default)]
    pub unread_count:         i32,
    #[serde(default, with = "crate::int64")]
    pub last_read_inbox_message_id: i64,
    #[serde(default, with = "crate::int64")]
    pub last_read_outbox_message_id: i64,
    #[serde(default)]
    pub unread_mention_count: i32,
}

/// A list of chat ids, e.g. from `getChats`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chats {
    pub total_count: i32,
    #[serde(with = "crate::int64::vec")]
    pub chat_ids:    Vec<i64>,
}

td_object! {
    ChatListMain    => "chatListMain",
    ChatListArchive => "chatListArchive",
    ChatListFolder  => "chatListFolder",
    Chat            => "chat",
    Chats           => "chats",
}
