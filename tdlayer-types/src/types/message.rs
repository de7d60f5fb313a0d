use serde::{Deserialize, Serialize};

use super::{File, is_false, skip_nulls};
use crate::enums::{InputFile, MessageContent, MessageSender, ReplyMarkup, TextEntityType};

// ─── Text ─────────────────────────────────────────────────────────────────────

/// Text with formatting entities. Offsets and lengths are in UTF-16 code units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattedText {
    pub text:     String,
    pub entities: Vec<TextEntity>,
}

impl FormattedText {
    /// Plain text with no entities.
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), entities: Vec::new() }
    }
}

impl From<&str> for FormattedText {
    fn from(s: &str) -> Self { Self::plain(s) }
}

impl From<String> for FormattedText {
    fn from(s: String) -> Self { Self::plain(s) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    pub offset: i32,
    pub length: i32,
    #[serde(rename = "type")]
    pub kind:   TextEntityType,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeMention {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeHashtag {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeBotCommand {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeUrl {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeEmailAddress {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypePhoneNumber {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeBold {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeItalic {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeUnderline {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeStrikethrough {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeSpoiler {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeCode {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypePre {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypePreCode {
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeTextUrl {
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntityTypeMentionName {
    #[serde(with = "crate::int64")]
    pub user_id: i64,
}

// ─── Message ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSenderUser {
    #[serde(with = "crate::int64")]
    pub user_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSenderChat {
    #[serde(with = "crate::int64")]
    pub chat_id: i64,
}

/// A message in a chat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(with = "crate::int64")]
    pub id:                  i64,
    pub sender_id:           MessageSender,
    #[serde(with = "crate::int64")]
    pub chat_id:             i64,
    #[serde(default)]
    pub is_outgoing:         bool,
    #[serde(default)]
    pub is_pinned:           bool,
    #[serde(default)]
    pub can_be_edited:       bool,
    #[serde(default)]
    pub can_be_forwarded:    bool,
    #[serde(default)]
    pub can_be_deleted_only_for_self: bool,
    #[serde(default)]
    pub can_be_deleted_for_all_users: bool,
    #[serde(default)]
    pub is_channel_post:     bool,
    #[serde(default)]
    pub contains_unread_mention: bool,
    #[serde(default)]
    pub date:                i32,
    #[serde(default)]
    pub edit_date:           i32,
    #[serde(default, with = "crate::int64::option")]
    pub message_thread_id:   Option<i64>,
    #[serde(default, with = "crate::int64::option")]
    pub media_album_id:      Option<i64>,
    #[serde(default)]
    pub author_signature:    String,
    pub content:             MessageContent,
    #[serde(default)]
    pub reply_markup:        Option<ReplyMarkup>,
}

impl Message {
    /// The message text, or the caption of a media message.
    pub fn text(&self) -> Option<&str> {
        let text = match &self.content {
            MessageContent::Text(m)      => &m.text,
            MessageContent::Photo(m)     => &m.caption,
            MessageContent::Document(m)  => &m.caption,
            MessageContent::Animation(m) => &m.caption,
            MessageContent::Video(m)     => &m.caption,
            MessageContent::VoiceNote(m) => &m.caption,
            _ => return None,
        };
        if text.text.is_empty() { None } else { Some(&text.text) }
    }

    /// The sending user, if the message was not sent on behalf of a chat.
    pub fn sender_user_id(&self) -> Option<i64> {
        match &self.sender_id {
            MessageSender::User(u) => Some(u.user_id),
            _ => None,
        }
    }
}

/// A page of messages, e.g. from `getChatHistory`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub total_count: i32,
    #[serde(deserialize_with = "skip_nulls")]
    pub messages:    Vec<Message>,
}

// ─── Message content ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageText {
    pub text: FormattedText,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagePhoto {
    pub photo:       Photo,
    pub caption:     FormattedText,
    pub has_spoiler: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageDocument {
    pub document: Document,
    pub caption:  FormattedText,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSticker {
    pub sticker:    Sticker,
    pub is_premium: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageAnimation {
    pub animation:   Animation,
    pub caption:     FormattedText,
    pub has_spoiler: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageVideo {
    pub video:       Video,
    pub caption:     FormattedText,
    pub has_spoiler: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageVoiceNote {
    pub voice_note:  VoiceNote,
    pub caption:     FormattedText,
    pub is_listened: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageContact {
    pub contact: Contact,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageLocation {
    pub location:    Location,
    pub live_period: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagePoll {
    pub poll: Poll,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageUnsupported {}

// ─── Media ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub has_stickers: bool,
    pub sizes:        Vec<PhotoSize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSize {
    #[serde(rename = "type")]
    pub kind:   String,
    pub photo:  File,
    pub width:  i32,
    pub height: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub file_name: String,
    pub mime_type: String,
    pub document:  File,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sticker {
    #[serde(with = "crate::int64")]
    pub set_id:  i64,
    pub width:   i32,
    pub height:  i32,
    pub emoji:   String,
    pub sticker: File,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub duration:  i32,
    pub width:     i32,
    pub height:    i32,
    pub file_name: String,
    pub mime_type: String,
    pub animation: File,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub duration:  i32,
    pub width:     i32,
    pub height:    i32,
    pub file_name: String,
    pub mime_type: String,
    pub video:     File,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceNote {
    pub duration:  i32,
    pub mime_type: String,
    pub voice:     File,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub phone_number: String,
    pub first_name:   String,
    pub last_name:    String,
    pub vcard:        String,
    #[serde(with = "crate::int64")]
    pub user_id:      i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub latitude:            f64,
    pub longitude:           f64,
    pub horizontal_accuracy: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poll {
    #[serde(with = "crate::int64")]
    pub id:                i64,
    pub question:          FormattedText,
    pub options:           Vec<PollOption>,
    pub total_voter_count: i32,
    pub is_anonymous:      bool,
    pub is_closed:         bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollOption {
    pub text:            FormattedText,
    pub voter_count:     i32,
    pub vote_percentage: i32,
    pub is_chosen:       bool,
}

// ─── Outgoing content ─────────────────────────────────────────────────────────

/// A text message to send.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputMessageText {
    pub text:                     FormattedText,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub clear_draft:              bool,
}

impl InputMessageText {
    pub fn new(text: impl Into<FormattedText>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    /// Disable link preview.
    pub fn no_webpage(mut self, v: bool) -> Self {
        self.disable_web_page_preview = v; self
    }

    /// Clear the chat draft after sending.
    pub fn clear_draft(mut self, v: bool) -> Self {
        self.clear_draft = v; self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputMessageDocument {
    pub document: InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption:  Option<FormattedText>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputMessagePhoto {
    pub photo:   InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<FormattedText>,
    #[serde(default)]
    pub width:   i32,
    #[serde(default)]
    pub height:  i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputMessageReplyToMessage {
    #[serde(with = "crate::int64")]
    pub message_id: i64,
}

/// Delivery options for `sendMessage`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSendOptions {
    pub disable_notification: bool,
    pub from_background:      bool,
    pub protect_content:      bool,
}

td_object! {
    FormattedText              => "formattedText",
    TextEntity                 => "textEntity",
    Message                    => "message",
    Messages                   => "messages",
    MessageText                => "messageText",
    MessagePhoto               => "messagePhoto",
    MessageDocument            => "messageDocument",
    MessageSticker             => "messageSticker",
    MessageAnimation           => "messageAnimation",
    MessageVideo               => "messageVideo",
    MessageVoiceNote           => "messageVoiceNote",
    MessageContact             => "messageContact",
    MessageLocation            => "messageLocation",
    MessagePoll                => "messagePoll",
    MessageUnsupported         => "messageUnsupported",
    InputMessageText           => "inputMessageText",
    InputMessageDocument       => "inputMessageDocument",
    InputMessagePhoto          => "inputMessagePhoto",
    MessageSendOptions         => "messageSendOptions",
}
