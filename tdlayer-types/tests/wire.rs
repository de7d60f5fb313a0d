use serde_json::{Value, json};
use tdlayer_types::enums::{AuthorizationState, MessageContent, Object, ReplyMarkup};
use tdlayer_types::functions::{GetCallbackQueryAnswer, SetAuthenticationPhoneNumber};
use tdlayer_types::types::{CallbackQueryPayloadData, UpdateNewMessage};
use tdlayer_types::{DecodeError, Envelope, TdObject};

// ── Events ────────────────────────────────────────────────────────────────────

#[test]
fn auth_state_update_decodes_nested_state() {
    let env: Envelope = r#"{
        "@type": "updateAuthorizationState",
        "@client_id": 1,
        "authorization_state": {
            "@type": "authorizationStateWaitCode",
            "code_info": {
                "@type": "authenticationCodeInfo",
                "phone_number": "+15550000000",
                "type": {"@type": "authenticationCodeTypeTelegramMessage", "length": 5},
                "timeout": 0
            }
        }
    }"#
    .parse()
    .unwrap();

    let state = env.object.authorization_state().unwrap();
    let AuthorizationState::WaitCode(code) = state else { panic!("wrong state") };
    assert_eq!(code.code_info.phone_number, "+15550000000");
}

#[test]
fn large_ids_survive_decode_and_encode() {
    let raw = json!({
        "@type": "updateNewMessage",
        "message": {
            "@type": "message",
            "id": "9007199254740993",
            "chat_id": "-1009007199254740993",
            "sender_id": {"@type": "messageSenderChat", "chat_id": "-1009007199254740993"},
            "content": {"@type": "messageText", "text": {"text": "x", "entities": []}}
        }
    });
    let obj = Object::from_value(raw).unwrap();
    let update = UpdateNewMessage::try_from(obj.clone()).unwrap();
    assert_eq!(update.message.id, 9007199254740993);
    assert_eq!(update.message.chat_id, -1009007199254740993);

    let back = serde_json::to_value(&obj).unwrap();
    assert_eq!(back["message"]["id"], "9007199254740993");
    assert_eq!(back["message"]["chat_id"], "-1009007199254740993");
    assert_eq!(back["@type"], "updateNewMessage");
}

#[test]
fn message_with_inline_keyboard() {
    let obj = Object::from_value(json!({
        "@type": "message",
        "id": 1,
        "chat_id": 2,
        "sender_id": {"@type": "messageSenderUser", "user_id": 3},
        "content": {"@type": "messagePhoto", "photo": {"sizes": []}, "caption": {"text": "look"}},
        "reply_markup": {
            "@type": "replyMarkupInlineKeyboard",
            "rows": [[{"@type": "inlineKeyboardButton", "text": "Yes",
                       "type": {"@type": "inlineKeyboardButtonTypeCallback", "data": "eWVz"}}]]
        }
    }))
    .unwrap();

    let Object::Message(msg) = obj else { panic!("wrong variant") };
    assert!(matches!(msg.content, MessageContent::Photo(_)));
    assert_eq!(msg.text(), Some("look"));
    let Some(ReplyMarkup::InlineKeyboard(kb)) = msg.reply_markup else { panic!("no keyboard") };
    assert_eq!(kb.rows[0][0].callback_data(), Some("eWVz"));
}

#[test]
fn history_skips_null_holes() {
    let obj = Object::from_value(json!({
        "@type": "messages",
        "total_count": 2,
        "messages": [null, {
            "@type": "message", "id": 5, "chat_id": 6,
            "sender_id": {"@type": "messageSenderUser", "user_id": 7},
            "content": {"@type": "messageUnsupported"}
        }]
    }))
    .unwrap();
    let Object::Messages(m) = obj else { panic!("wrong variant") };
    assert_eq!(m.messages.len(), 1);
    assert_eq!(m.messages[0].id, 5);
}

// ── Fallback ──────────────────────────────────────────────────────────────────

#[test]
fn unregistered_event_is_kept_whole() {
    let raw = json!({"@type": "updateChatTheme", "chat_id": 5, "theme_name": "x"});
    let obj = Object::from_value(raw.clone()).unwrap();
    assert!(obj.is_unknown());
    assert_eq!(obj.type_name(), "updateChatTheme");
    assert_eq!(serde_json::to_value(&obj).unwrap(), raw);
}

#[test]
fn missing_type_is_an_error_not_a_fallback() {
    let err = Object::from_value(json!({"chat_id": 5})).unwrap_err();
    assert!(matches!(err, DecodeError::MissingType));

    let err = "[1,2]".parse::<Envelope>().unwrap_err();
    assert!(matches!(err, DecodeError::NotAnObject(_)));

    let err = "{oops".parse::<Envelope>().unwrap_err();
    assert!(matches!(err, DecodeError::Syntax(_)));
}

// ── Requests ──────────────────────────────────────────────────────────────────

#[test]
fn phone_number_request_shape() {
    let v = tdlayer_types::to_value(&SetAuthenticationPhoneNumber::new("+15550000000")).unwrap();
    assert_eq!(v, json!({"@type": "setAuthenticationPhoneNumber", "phone_number": "+15550000000"}));
}

#[test]
fn callback_query_request_shape() {
    let req = GetCallbackQueryAnswer {
        chat_id:    -100,
        message_id: 42,
        payload:    CallbackQueryPayloadData { data: "eWVz".into() }.into(),
    };
    let v: Value = tdlayer_types::to_value(&req).unwrap();
    assert_eq!(v["@type"], GetCallbackQueryAnswer::TYPE);
    assert_eq!(v["chat_id"], "-100");
    assert_eq!(v["message_id"], "42");
    assert_eq!(v["payload"], json!({"@type": "callbackQueryPayloadData", "data": "eWVz"}));
}
