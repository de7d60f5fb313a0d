//! Discriminated families.
//!
//! Each family is a closed enum over the shapes that may appear where the
//! family is expected, plus an `Unknown` variant for values the crate has no
//! shape for. Decoding never fails because of an unfamiliar `@type`.

#![allow(clippy::large_enum_variant)]

use crate::types;

td_enum! {
    /// Where the client stands in the login flow.
    AuthorizationState {
        WaitTdlibParameters(types::AuthorizationStateWaitTdlibParameters) = "authorizationStateWaitTdlibParameters",
        WaitPhoneNumber(types::AuthorizationStateWaitPhoneNumber) = "authorizationStateWaitPhoneNumber",
        WaitEmailAddress(types::AuthorizationStateWaitEmailAddress) = "authorizationStateWaitEmailAddress",
        WaitCode(types::AuthorizationStateWaitCode) = "authorizationStateWaitCode",
        WaitOtherDeviceConfirmation(types::AuthorizationStateWaitOtherDeviceConfirmation) = "authorizationStateWaitOtherDeviceConfirmation",
        WaitRegistration(types::AuthorizationStateWaitRegistration) = "authorizationStateWaitRegistration",
        WaitPassword(types::AuthorizationStateWaitPassword) = "authorizationStateWaitPassword",
        Ready(types::AuthorizationStateReady) = "authorizationStateReady",
        LoggingOut(types::AuthorizationStateLoggingOut) = "authorizationStateLoggingOut",
        Closing(types::AuthorizationStateClosing) = "authorizationStateClosing",
        Closed(types::AuthorizationStateClosed) = "authorizationStateClosed",
    }
}

impl AuthorizationState {
    /// `true` once the client can make authorized requests.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// `true` for the terminal state; the engine will not reuse the client id.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

td_enum! {
    AuthenticationCodeType {
        Sms(types::AuthenticationCodeTypeSms) = "authenticationCodeTypeSms",
        Call(types::AuthenticationCodeTypeCall) = "authenticationCodeTypeCall",
        FlashCall(types::AuthenticationCodeTypeFlashCall) = "authenticationCodeTypeFlashCall",
        TelegramMessage(types::AuthenticationCodeTypeTelegramMessage) = "authenticationCodeTypeTelegramMessage",
    }
}

// ─── Messages ─────────────────────────────────────────────────────────────────

td_enum! {
    /// What a message carries.
    MessageContent {
        Text(types::MessageText) = "messageText",
        Photo(types::MessagePhoto) = "messagePhoto",
        Document(types::MessageDocument) = "messageDocument",
        Sticker(types::MessageSticker) = "messageSticker",
        Animation(types::MessageAnimation) = "messageAnimation",
        Video(types::MessageVideo) = "messageVideo",
        VoiceNote(types::MessageVoiceNote) = "messageVoiceNote",
        Contact(types::MessageContact) = "messageContact",
        Location(types::MessageLocation) = "messageLocation",
        Poll(types::MessagePoll) = "messagePoll",
        Unsupported(types::MessageUnsupported) = "messageUnsupported",
    }
}

td_enum! {
    /// Who sent a message: a user, or a chat posting on its own behalf.
    MessageSender {
        User(types::MessageSenderUser) = "messageSenderUser",
        Chat(types::MessageSenderChat) = "messageSenderChat",
    }
}

td_enum! {
    TextEntityType {
        Mention(types::TextEntityTypeMention) = "textEntityTypeMention",
        Hashtag(types::TextEntityTypeHashtag) = "textEntityTypeHashtag",
        BotCommand(types::TextEntityTypeBotCommand) = "textEntityTypeBotCommand",
        Url(types::TextEntityTypeUrl) = "textEntityTypeUrl",
        EmailAddress(types::TextEntityTypeEmailAddress) = "textEntityTypeEmailAddress",
        PhoneNumber(types::TextEntityTypePhoneNumber) = "textEntityTypePhoneNumber",
        Bold(types::TextEntityTypeBold) = "textEntityTypeBold",
        Italic(types::TextEntityTypeItalic) = "textEntityTypeItalic",
        Underline(types::TextEntityTypeUnderline) = "textEntityTypeUnderline",
        Strikethrough(types::TextEntityTypeStrikethrough) = "textEntityTypeStrikethrough",
        Spoiler(types::TextEntityTypeSpoiler) = "textEntityTypeSpoiler",
        Code(types::TextEntityTypeCode) = "textEntityTypeCode",
        Pre(types::TextEntityTypePre) = "textEntityTypePre",
        PreCode(types::TextEntityTypePreCode) = "textEntityTypePreCode",
        TextUrl(types::TextEntityTypeTextUrl) = "textEntityTypeTextUrl",
        MentionName(types::TextEntityTypeMentionName) = "textEntityTypeMentionName",
    }
}

td_enum! {
    /// Outgoing message content for `sendMessage`.
    InputMessageContent {
        Text(types::InputMessageText) = "inputMessageText",
        Document(types::InputMessageDocument) = "inputMessageDocument",
        Photo(types::InputMessagePhoto) = "inputMessagePhoto",
    }
}

impl From<&str> for InputMessageContent {
    fn from(text: &str) -> Self {
        Self::Text(types::InputMessageText::new(text))
    }
}

impl From<String> for InputMessageContent {
    fn from(text: String) -> Self {
        Self::Text(types::InputMessageText::new(text))
    }
}

td_enum! {
    InputMessageReplyTo {
        Message(types::InputMessageReplyToMessage) = "inputMessageReplyToMessage",
    }
}

// ─── Keyboards ────────────────────────────────────────────────────────────────

td_enum! {
    /// Keyboard attached to a message.
    ReplyMarkup {
        ForceReply(types::ReplyMarkupForceReply) = "replyMarkupForceReply",
        InlineKeyboard(types::ReplyMarkupInlineKeyboard) = "replyMarkupInlineKeyboard",
        RemoveKeyboard(types::ReplyMarkupRemoveKeyboard) = "replyMarkupRemoveKeyboard",
        ShowKeyboard(types::ReplyMarkupShowKeyboard) = "replyMarkupShowKeyboard",
    }
}

td_enum! {
    InlineKeyboardButtonType {
        Url(types::InlineKeyboardButtonTypeUrl) = "inlineKeyboardButtonTypeUrl",
        LoginUrl(types::InlineKeyboardButtonTypeLoginUrl) = "inlineKeyboardButtonTypeLoginUrl",
        Callback(types::InlineKeyboardButtonTypeCallback) = "inlineKeyboardButtonTypeCallback",
        CallbackWithPassword(types::InlineKeyboardButtonTypeCallbackWithPassword) = "inlineKeyboardButtonTypeCallbackWithPassword",
        CallbackGame(types::InlineKeyboardButtonTypeCallbackGame) = "inlineKeyboardButtonTypeCallbackGame",
        SwitchInline(types::InlineKeyboardButtonTypeSwitchInline) = "inlineKeyboardButtonTypeSwitchInline",
        Buy(types::InlineKeyboardButtonTypeBuy) = "inlineKeyboardButtonTypeBuy",
        User(types::InlineKeyboardButtonTypeUser) = "inlineKeyboardButtonTypeUser",
        WebApp(types::InlineKeyboardButtonTypeWebApp) = "inlineKeyboardButtonTypeWebApp",
    }
}

td_enum! {
    KeyboardButtonType {
        Text(types::KeyboardButtonTypeText) = "keyboardButtonTypeText",
        RequestPhoneNumber(types::KeyboardButtonTypeRequestPhoneNumber) = "keyboardButtonTypeRequestPhoneNumber",
        RequestLocation(types::KeyboardButtonTypeRequestLocation) = "keyboardButtonTypeRequestLocation",
        RequestPoll(types::KeyboardButtonTypeRequestPoll) = "keyboardButtonTypeRequestPoll",
        WebApp(types::KeyboardButtonTypeWebApp) = "keyboardButtonTypeWebApp",
    }
}

td_enum! {
    /// What a pressed callback button carries.
    CallbackQueryPayload {
        Data(types::CallbackQueryPayloadData) = "callbackQueryPayloadData",
        DataWithPassword(types::CallbackQueryPayloadDataWithPassword) = "callbackQueryPayloadDataWithPassword",
        Game(types::CallbackQueryPayloadGame) = "callbackQueryPayloadGame",
    }
}

// ─── Chats, users, files ──────────────────────────────────────────────────────

td_enum! {
    ChatList {
        Main(types::ChatListMain) = "chatListMain",
        Archive(types::ChatListArchive) = "chatListArchive",
        Folder(types::ChatListFolder) = "chatListFolder",
    }
}

td_enum! {
    ChatType {
        Private(types::ChatTypePrivate) = "chatTypePrivate",
        BasicGroup(types::ChatTypeBasicGroup) = "chatTypeBasicGroup",
        Supergroup(types::ChatTypeSupergroup) = "chatTypeSupergroup",
        Secret(types::ChatTypeSecret) = "chatTypeSecret",
    }
}

td_enum! {
    UserType {
        Regular(types::UserTypeRegular) = "userTypeRegular",
        Deleted(types::UserTypeDeleted) = "userTypeDeleted",
        Bot(types::UserTypeBot) = "userTypeBot",
    }
}

td_enum! {
    FileType {
        None(types::FileTypeNone) = "fileTypeNone",
        Animation(types::FileTypeAnimation) = "fileTypeAnimation",
        Audio(types::FileTypeAudio) = "fileTypeAudio",
        Document(types::FileTypeDocument) = "fileTypeDocument",
        Photo(types::FileTypePhoto) = "fileTypePhoto",
        ProfilePhoto(types::FileTypeProfilePhoto) = "fileTypeProfilePhoto",
        Secret(types::FileTypeSecret) = "fileTypeSecret",
        Sticker(types::FileTypeSticker) = "fileTypeSticker",
        Thumbnail(types::FileTypeThumbnail) = "fileTypeThumbnail",
        Video(types::FileTypeVideo) = "fileTypeVideo",
        VideoNote(types::FileTypeVideoNote) = "fileTypeVideoNote",
        VoiceNote(types::FileTypeVoiceNote) = "fileTypeVoiceNote",
        Wallpaper(types::FileTypeWallpaper) = "fileTypeWallpaper",
    }
}

td_enum! {
    /// A file to upload or reference in an outgoing request.
    InputFile {
        Id(types::InputFileId) = "inputFileId",
        Remote(types::InputFileRemote) = "inputFileRemote",
        Local(types::InputFileLocal) = "inputFileLocal",
    }
}

impl InputFile {
    /// A file on the local disk.
    pub fn local(path: impl Into<String>) -> Self {
        Self::Local(types::InputFileLocal { path: path.into() })
    }
}

// ─── Engine state ─────────────────────────────────────────────────────────────

td_enum! {
    ConnectionState {
        WaitingForNetwork(types::ConnectionStateWaitingForNetwork) = "connectionStateWaitingForNetwork",
        ConnectingToProxy(types::ConnectionStateConnectingToProxy) = "connectionStateConnectingToProxy",
        Connecting(types::ConnectionStateConnecting) = "connectionStateConnecting",
        Updating(types::ConnectionStateUpdating) = "connectionStateUpdating",
        Ready(types::ConnectionStateReady) = "connectionStateReady",
    }
}

td_enum! {
    OptionValue {
        Boolean(types::OptionValueBoolean) = "optionValueBoolean",
        Empty(types::OptionValueEmpty) = "optionValueEmpty",
        Integer(types::OptionValueInteger) = "optionValueInteger",
        String(types::OptionValueString) = "optionValueString",
    }
}

td_enum! {
    /// Destination of the engine's own log.
    LogStream {
        Default(types::LogStreamDefault) = "logStreamDefault",
        File(types::LogStreamFile) = "logStreamFile",
        Empty(types::LogStreamEmpty) = "logStreamEmpty",
    }
}

// ─── Top level ────────────────────────────────────────────────────────────────

td_enum! {
    /// Every event and reply that can arrive from the engine.
    ///
    /// Authorization states appear here directly because
    /// `getAuthorizationState` answers with the bare state object.
    Object {
        UpdateAuthorizationState(types::UpdateAuthorizationState) = "updateAuthorizationState",
        UpdateNewMessage(types::UpdateNewMessage) = "updateNewMessage",
        UpdateMessageContent(types::UpdateMessageContent) = "updateMessageContent",
        UpdateMessageSendSucceeded(types::UpdateMessageSendSucceeded) = "updateMessageSendSucceeded",
        UpdateMessageSendFailed(types::UpdateMessageSendFailed) = "updateMessageSendFailed",
        UpdateDeleteMessages(types::UpdateDeleteMessages) = "updateDeleteMessages",
        UpdateNewChat(types::UpdateNewChat) = "updateNewChat",
        UpdateUser(types::UpdateUser) = "updateUser",
        UpdateConnectionState(types::UpdateConnectionState) = "updateConnectionState",
        UpdateFile(types::UpdateFile) = "updateFile",
        UpdateOption(types::UpdateOption) = "updateOption",
        UpdateNewCallbackQuery(types::UpdateNewCallbackQuery) = "updateNewCallbackQuery",

        Ok(types::Ok) = "ok",
        Error(types::Error) = "error",
        User(types::User) = "user",
        Message(types::Message) = "message",
        Messages(types::Messages) = "messages",
        Chat(types::Chat) = "chat",
        Chats(types::Chats) = "chats",
        File(types::File) = "file",
        CallbackQueryAnswer(types::CallbackQueryAnswer) = "callbackQueryAnswer",

        AuthorizationStateWaitTdlibParameters(types::AuthorizationStateWaitTdlibParameters) = "authorizationStateWaitTdlibParameters",
        AuthorizationStateWaitPhoneNumber(types::AuthorizationStateWaitPhoneNumber) = "authorizationStateWaitPhoneNumber",
        AuthorizationStateWaitEmailAddress(types::AuthorizationStateWaitEmailAddress) = "authorizationStateWaitEmailAddress",
        AuthorizationStateWaitCode(types::AuthorizationStateWaitCode) = "authorizationStateWaitCode",
        AuthorizationStateWaitOtherDeviceConfirmation(types::AuthorizationStateWaitOtherDeviceConfirmation) = "authorizationStateWaitOtherDeviceConfirmation",
        AuthorizationStateWaitRegistration(types::AuthorizationStateWaitRegistration) = "authorizationStateWaitRegistration",
        AuthorizationStateWaitPassword(types::AuthorizationStateWaitPassword) = "authorizationStateWaitPassword",
        AuthorizationStateReady(types::AuthorizationStateReady) = "authorizationStateReady",
        AuthorizationStateLoggingOut(types::AuthorizationStateLoggingOut) = "authorizationStateLoggingOut",
        AuthorizationStateClosing(types::AuthorizationStateClosing) = "authorizationStateClosing",
        AuthorizationStateClosed(types::AuthorizationStateClosed) = "authorizationStateClosed",
    }
}

impl Object {
    /// The new authorization state, if this object carries one.
    ///
    /// Covers both the `updateAuthorizationState` event and a bare state
    /// returned as a reply.
    pub fn authorization_state(&self) -> Option<AuthorizationState> {
        let state: AuthorizationState = match self {
            Self::UpdateAuthorizationState(u) => u.authorization_state.clone(),
            Self::AuthorizationStateWaitTdlibParameters(s) => s.clone().into(),
            Self::AuthorizationStateWaitPhoneNumber(s) => s.clone().into(),
            Self::AuthorizationStateWaitEmailAddress(s) => s.clone().into(),
            Self::AuthorizationStateWaitCode(s) => s.clone().into(),
            Self::AuthorizationStateWaitOtherDeviceConfirmation(s) => s.clone().into(),
            Self::AuthorizationStateWaitRegistration(s) => s.clone().into(),
            Self::AuthorizationStateWaitPassword(s) => s.clone().into(),
            Self::AuthorizationStateReady(s) => s.clone().into(),
            Self::AuthorizationStateLoggingOut(s) => s.clone().into(),
            Self::AuthorizationStateClosing(s) => s.clone().into(),
            Self::AuthorizationStateClosed(s) => s.clone().into(),
            _ => return None,
        };
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_content_is_discriminated() {
        let obj = Object::from_value(json!({
            "@type": "updateNewMessage",
            "message": {
                "@type": "message",
                "id": 42,
                "chat_id": "-1001234567890",
                "sender_id": {"@type": "messageSenderUser", "user_id": 7},
                "content": {"@type": "messageText", "text": {"@type": "formattedText", "text": "hi", "entities": []}}
            }
        }))
        .unwrap();

        let Object::UpdateNewMessage(u) = obj else { panic!("wrong variant") };
        assert_eq!(u.message.chat_id, -1001234567890);
        assert_eq!(u.message.text(), Some("hi"));
        assert_eq!(u.message.sender_user_id(), Some(7));
    }

    #[test]
    fn unknown_nested_content_keeps_outer_shape() {
        let obj = Object::from_value(json!({
            "@type": "updateMessageContent",
            "chat_id": 1,
            "message_id": 2,
            "new_content": {"@type": "messageDice", "value": 6}
        }))
        .unwrap();

        let Object::UpdateMessageContent(u) = obj else { panic!("wrong variant") };
        assert!(u.new_content.is_unknown());
        assert_eq!(u.new_content.type_name(), "messageDice");
    }

    #[test]
    fn unknown_button_type_is_kept() {
        let markup: ReplyMarkup = serde_json::from_value(json!({
            "@type": "replyMarkupInlineKeyboard",
            "rows": [[
                {"@type": "inlineKeyboardButton", "text": "Go",
                 "type": {"@type": "inlineKeyboardButtonTypeCallback", "data": "Z28="}},
                {"@type": "inlineKeyboardButton", "text": "?",
                 "type": {"@type": "inlineKeyboardButtonTypeSomethingNew"}}
            ]]
        }))
        .unwrap();

        let ReplyMarkup::InlineKeyboard(kb) = markup else { panic!("wrong variant") };
        assert_eq!(kb.button("Go").and_then(|b| b.callback_data()), Some("Z28="));
        assert!(kb.button("?").unwrap().kind.is_unknown());
    }

    #[test]
    fn bare_state_reply_maps_to_authorization_state() {
        let obj = Object::from_value(json!({"@type": "authorizationStateReady"})).unwrap();
        assert!(obj.authorization_state().unwrap().is_ready());

        let obj = Object::from_value(json!({"@type": "ok"})).unwrap();
        assert!(obj.authorization_state().is_none());
    }

    #[test]
    fn families_list_their_tags() {
        assert!(Object::KNOWN_TYPES.contains(&"updateNewMessage"));
        assert!(AuthorizationState::KNOWN_TYPES.contains(&"authorizationStateClosed"));
        assert!(!MessageContent::KNOWN_TYPES.contains(&"messageDice"));
    }
}
