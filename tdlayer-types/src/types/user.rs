use serde::{Deserialize, Serialize};

use crate::enums::UserType;

/// A user account (person or bot).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "crate::int64")]
    pub id:            i64,
    #[serde(default)]
    pub first_name:    String,
    #[serde(default)]
    pub last_name:     String,
    #[serde(default)]
    pub usernames:     Option<Usernames>,
    #[serde(default)]
    pub phone_number:  String,
    #[serde(rename = "type")]
    pub kind:          UserType,
    #[serde(default)]
    pub is_contact:    bool,
    #[serde(default)]
    pub is_premium:    bool,
    #[serde(default)]
    pub language_code: String,
}

impl User {
    /// First and last name joined, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// The primary active username, if any.
    pub fn username(&self) -> Option<&str> {
        self.usernames.as_ref()?.active_usernames.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usernames {
    pub active_usernames:   Vec<String>,
    pub disabled_usernames: Vec<String>,
    pub editable_username:  String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTypeRegular {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTypeDeleted {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTypeBot {
    pub can_join_groups:             bool,
    pub can_read_all_group_messages: bool,
    pub is_inline:                   bool,
    pub inline_query_placeholder:    String,
    pub need_location:               bool,
}

td_object! {
    User      => "user",
    Usernames => "usernames",
}
