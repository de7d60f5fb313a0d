//! Chats, messages, files and callback queries.

use tdlayer_types::enums::{CallbackQueryPayload, ChatList};
use tdlayer_types::functions::{
    GetCallbackQueryAnswer, GetChat, GetChatHistory, GetChats, GetMe, GetRemoteFile, LoadChats,
    SendMessage,
};
use tdlayer_types::types::{CallbackQueryAnswer, Chat, Chats, File, Message, Messages, User};

use crate::{Client, InvocationError};

impl Client {
    /// The account this client is logged in as.
    pub async fn get_me(&self) -> Result<User, InvocationError> {
        self.invoke(&GetMe {}).await
    }

    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat, InvocationError> {
        self.invoke(&GetChat { chat_id }).await
    }

    /// Up to `limit` chat ids from `chat_list`, or from the main list if `None`.
    pub async fn get_chats(&self, chat_list: Option<ChatList>, limit: i32) -> Result<Chats, InvocationError> {
        self.invoke(&GetChats { chat_list, limit }).await
    }

    /// Load more chats; they arrive as `updateNewChat`.
    pub async fn load_chats(&self, chat_list: Option<ChatList>, limit: i32) -> Result<(), InvocationError> {
        self.invoke(&LoadChats { chat_list, limit }).await?;
        Ok(())
    }

    /// Messages older than `from_message_id`, newest first. `0` starts at the last message.
    pub async fn get_chat_history(
        &self,
        chat_id:         i64,
        from_message_id: i64,
        limit:           i32,
    ) -> Result<Messages, InvocationError> {
        let req = GetChatHistory { chat_id, from_message_id, limit, ..Default::default() };
        self.invoke(&req).await
    }

    /// Send a message. The returned message is pending; its final id arrives
    /// in `updateMessageSendSucceeded`.
    pub async fn send_message(&self, req: SendMessage) -> Result<Message, InvocationError> {
        self.invoke(&req).await
    }

    /// Send plain text to `chat_id`.
    pub async fn send_text(&self, chat_id: i64, text: impl Into<String>) -> Result<Message, InvocationError> {
        self.send_message(SendMessage::new(chat_id, text.into())).await
    }

    /// Resolve a remote file id into a file object.
    pub async fn get_remote_file(&self, remote_file_id: impl Into<String>) -> Result<File, InvocationError> {
        let req = GetRemoteFile { remote_file_id: remote_file_id.into(), file_type: None };
        self.invoke(&req).await
    }

    /// Press a callback button on `message_id` and wait for the bot's answer.
    pub async fn get_callback_query_answer(
        &self,
        chat_id:    i64,
        message_id: i64,
        payload:    impl Into<CallbackQueryPayload>,
    ) -> Result<CallbackQueryAnswer, InvocationError> {
        let req = GetCallbackQueryAnswer { chat_id, message_id, payload: payload.into() };
        self.invoke(&req).await
    }
}
