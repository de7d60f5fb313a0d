use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tdlayer_client::types::enums::{AuthorizationState, Object};
use tdlayer_client::types::types::UpdateOption;
use tdlayer_client::{ClientConfig, Handlers, LogConfig, Manager, ManagerConfig, ManagerHandlers, MemoryEngine, MessageFilter};
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn start(engine: &Arc<MemoryEngine>) -> Manager {
    let config = ManagerConfig::default()
        .receive_timeout(Duration::from_millis(20))
        .log(LogConfig { verbosity: None, ..Default::default() });
    Manager::start(engine.clone(), config, ManagerHandlers::new())
}

fn auth_state(state: &str) -> serde_json::Value {
    json!({"@type": "updateAuthorizationState", "authorization_state": {"@type": state}})
}

fn new_message(chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "@type": "updateNewMessage",
        "message": {
            "@type": "message",
            "id": 10,
            "chat_id": chat_id,
            "sender_id": {"@type": "messageSenderUser", "user_id": 42},
            "content": {"@type": "messageText", "text": {"@type": "formattedText", "text": text}},
        }
    })
}

#[tokio::test]
async fn unknown_event_reaches_raw_type_handler() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = Handlers::new().on_event("updateStoryPosted", None, move |_, obj| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(obj);
        }
    });
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();

    engine.push_event(Some(client.id()), json!({"@type": "updateStoryPosted", "story_id": 7, "poster": "x"}));

    let Object::Unknown(u) = timeout(WAIT, rx.recv()).await.unwrap().unwrap() else {
        panic!("expected the unknown fallback");
    };
    assert_eq!(u.type_name, "updateStoryPosted");
    assert_eq!(u.get("story_id"), Some(&json!(7)));
    assert_eq!(u.get("poster"), Some(&json!("x")));
    manager.shutdown();
}

#[tokio::test]
async fn slow_handler_finishes_before_next_event_is_dispatched() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (tx_auth, tx_msg) = (tx.clone(), tx);
    let handlers = Handlers::new()
        .on_authorization_state(move |_, state| {
            let tx = tx_auth.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(80)).await;
                let _ = tx.send(format!("auth:{}", state.type_name()));
            }
        })
        .on_new_message(MessageFilter::new(), move |_, msg| {
            let tx = tx_msg.clone();
            async move {
                let _ = tx.send(format!("msg:{}", msg.text().unwrap_or_default()));
            }
        });
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();

    engine.push_event(Some(client.id()), auth_state("authorizationStateReady"));
    engine.push_event(Some(client.id()), new_message(5, "hello"));

    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), "auth:authorizationStateReady");
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), "msg:hello");
    manager.shutdown();
}

#[tokio::test]
async fn handlers_fire_in_registration_order() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handlers = Handlers::new();
    for n in 0..3 {
        let tx = tx.clone();
        handlers = handlers.on::<UpdateOption, _, _>(move |_, _| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(n);
            }
        });
    }
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();
    engine.push_event(Some(client.id()), json!({"@type": "updateOption", "name": "a", "value": {"@type": "optionValueEmpty"}}));

    for n in 0..3 {
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), n);
    }
    manager.shutdown();
}

#[tokio::test]
async fn panicking_handler_does_not_stop_the_client() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = Handlers::new().on::<UpdateOption, _, _>(move |_, opt| {
        let tx = tx.clone();
        async move {
            if opt.name == "boom" {
                panic!("handler failure");
            }
            let _ = tx.send(opt.name);
        }
    });
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();

    for name in ["boom", "after"] {
        engine.push_event(Some(client.id()), json!({"@type": "updateOption", "name": name, "value": {"@type": "optionValueEmpty"}}));
    }
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), "after");
    assert!(client.is_running());
    manager.shutdown();
}

#[tokio::test]
async fn message_filter_selects_chat() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = Handlers::new().on_new_message(MessageFilter::new().chat_id(7), move |_, msg| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(msg.chat_id);
        }
    });
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();

    engine.push_event(Some(client.id()), new_message(3, "skip"));
    engine.push_event(Some(client.id()), new_message(7, "keep"));

    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap().unwrap(), 7);
    assert!(rx.try_recv().is_err());
    manager.shutdown();
}

#[tokio::test]
async fn authorization_state_is_mirrored_and_awaitable() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let client = manager.new_client(ClientConfig::default(), Handlers::new()).unwrap();
    assert_eq!(client.authorization_state(), None);

    let id = client.id();
    let pusher = engine.clone();
    tokio::spawn(async move {
        pusher.push_event(Some(id), auth_state("authorizationStateWaitPhoneNumber"));
        tokio::time::sleep(Duration::from_millis(30)).await;
        pusher.push_event(Some(id), auth_state("authorizationStateReady"));
    });

    let state = client.wait_for_authorization(AuthorizationState::is_ready, WAIT).await.unwrap();
    assert!(state.is_ready());
    assert!(client.authorization_state().is_some_and(|s| s.is_ready()));

    // Already satisfied: returns at once.
    let again = client.wait_for_authorization(AuthorizationState::is_ready, Duration::from_millis(1)).await;
    assert!(again.is_ok());
    manager.shutdown();
}

#[tokio::test]
async fn closed_state_unregisters_the_client() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = Handlers::new().on_authorization_state(move |_, state| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(state);
        }
    });
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();

    engine.push_event(Some(client.id()), auth_state("authorizationStateClosed"));

    let state = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(state.is_closed());
    timeout(WAIT, async {
        while manager.registry().contains(client.id()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert!(!client.is_running());
    manager.shutdown();
}

#[tokio::test]
async fn untyped_event_is_delivered_as_unknown() {
    let engine = Arc::new(MemoryEngine::new());
    let manager = start(&engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handlers = Handlers::new().on_event("", None, move |_, obj| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(obj);
        }
    });
    let client = manager.new_client(ClientConfig::default(), handlers).unwrap();
    let mut updates = client.updates();

    engine.push_event(Some(client.id()), json!({"foo": 1, "@extra": 99}));

    let Some(Object::Unknown(u)) = timeout(WAIT, updates.next()).await.unwrap() else {
        panic!("expected an unknown object");
    };
    assert_eq!(u.type_name, "");
    assert_eq!(u.get("foo"), Some(&json!(1)));
    assert!(u.get("@client_id").is_none() && u.get("@extra").is_none());

    let handled = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(handled.type_name(), "");
    manager.shutdown();
}
