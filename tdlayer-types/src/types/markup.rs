use serde::{Deserialize, Serialize};

use crate::enums::{InlineKeyboardButtonType, KeyboardButtonType};

// ─── Reply markups ────────────────────────────────────────────────────────────

/// Asks the recipient's client to open a reply interface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyMarkupForceReply {
    pub is_personal:             bool,
    pub input_field_placeholder: String,
}

/// Buttons attached under the message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyMarkupInlineKeyboard {
    pub rows: Vec<Vec<InlineKeyboardButton>>,
}

impl ReplyMarkupInlineKeyboard {
    /// Find the first button whose label is `text`.
    pub fn button(&self, text: &str) -> Option<&InlineKeyboardButton> {
        self.rows.iter().flatten().find(|b| b.text == text)
    }
}

/// Hides a previously shown custom keyboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyMarkupRemoveKeyboard {
    pub is_personal: bool,
}

/// Replaces the recipient's keyboard with custom buttons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyMarkupShowKeyboard {
    pub rows:                    Vec<Vec<KeyboardButton>>,
    pub is_persistent:           bool,
    pub resize_keyboard:         bool,
    pub one_time:                bool,
    pub is_personal:             bool,
    pub input_field_placeholder: String,
}

// ─── Inline keyboard buttons ──────────────────────────────────────────────────

/// One inline button. What pressing it does is decided by the nested `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: InlineKeyboardButtonType,
}

impl InlineKeyboardButton {
    /// A button that sends `data` back as a callback query.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: InlineKeyboardButtonTypeCallback { data: data.into() }.into(),
        }
    }

    /// A button that opens `url`.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: InlineKeyboardButtonTypeUrl { url: url.into() }.into(),
        }
    }

    /// Callback data, if this is a callback button.
    pub fn callback_data(&self) -> Option<&str> {
        match &self.kind {
            InlineKeyboardButtonType::Callback(c) => Some(&c.data),
            InlineKeyboardButtonType::CallbackWithPassword(c) => Some(&c.data),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeUrl {
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineKeyboardButtonTypeLoginUrl {
    pub url:          String,
    #[serde(with = "crate::int64")]
    pub id:           i64,
    pub forward_text: String,
}

/// Callback data is base64 on the wire; it is kept encoded here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeCallback {
    pub data: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeCallbackWithPassword {
    pub data: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeCallbackGame {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineKeyboardButtonTypeSwitchInline {
    pub query: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeBuy {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeUser {
    #[serde(with = "crate::int64")]
    pub user_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButtonTypeWebApp {
    pub url: String,
}

// ─── Keyboard buttons ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: KeyboardButtonType,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardButtonTypeText {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardButtonTypeRequestPhoneNumber {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardButtonTypeRequestLocation {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardButtonTypeRequestPoll {
    pub force_regular: bool,
    pub force_quiz:    bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardButtonTypeWebApp {
    pub url: String,
}

// ─── Callback queries ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackQueryPayloadData {
    pub data: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackQueryPayloadDataWithPassword {
    pub password: String,
    pub data:     String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackQueryPayloadGame {
    pub game_short_name: String,
}

/// The bot's answer to a pressed callback button.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackQueryAnswer {
    pub text:       String,
    pub show_alert: bool,
    pub url:        String,
}

td_object! {
    ReplyMarkupForceReply                       => "replyMarkupForceReply",
    ReplyMarkupInlineKeyboard                   => "replyMarkupInlineKeyboard",
    ReplyMarkupRemoveKeyboard                   => "replyMarkupRemoveKeyboard",
    ReplyMarkupShowKeyboard                     => "replyMarkupShowKeyboard",
    InlineKeyboardButton                        => "inlineKeyboardButton",
    KeyboardButton                              => "keyboardButton",
    CallbackQueryPayloadData                    => "callbackQueryPayloadData",
    CallbackQueryPayloadDataWithPassword        => "callbackQueryPayloadDataWithPassword",
    CallbackQueryPayloadGame                    => "callbackQueryPayloadGame",
    CallbackQueryAnswer                         => "callbackQueryAnswer",
}
