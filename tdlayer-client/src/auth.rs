//! Authorization flow helpers.
//!
//! TDLib drives login through `updateAuthorizationState`. A typical flow:
//!
//! ```rust,no_run
//! # async fn f(client: tdlayer_client::Client) -> Result<(), tdlayer_client::InvocationError> {
//! use std::time::Duration;
//! use tdlayer_types::enums::AuthorizationState;
//!
//! client.set_tdlib_parameters().await?;
//! client.set_authentication_phone_number("+15550100").await?;
//! client
//!     .wait_for_authorization(
//!         |s| matches!(s, AuthorizationState::WaitCode(_)),
//!         Duration::from_secs(30),
//!     )
//!     .await?;
//! client.check_authentication_code("12345").await?;
//! # Ok(()) }
//! ```

use tdlayer_types::enums::AuthorizationState;
use tdlayer_types::functions::{
    CheckAuthenticationCode, CheckAuthenticationPassword, Close, GetAuthorizationState, LogOut,
    RegisterUser, SetAuthenticationPhoneNumber,
};

use crate::{Client, InvocationError};

impl Client {
    /// Answer `authorizationStateWaitTdlibParameters` with this client's configuration.
    pub async fn set_tdlib_parameters(&self) -> Result<(), InvocationError> {
        let params = self.config().tdlib_parameters();
        self.invoke(&params).await?;
        Ok(())
    }

    pub async fn set_authentication_phone_number(&self, phone: impl Into<String>) -> Result<(), InvocationError> {
        self.invoke(&SetAuthenticationPhoneNumber::new(phone)).await?;
        Ok(())
    }

    pub async fn check_authentication_code(&self, code: impl Into<String>) -> Result<(), InvocationError> {
        self.invoke(&CheckAuthenticationCode { code: code.into() }).await?;
        Ok(())
    }

    /// Answer `authorizationStateWaitPassword` (two-step verification).
    pub async fn check_authentication_password(&self, password: impl Into<String>) -> Result<(), InvocationError> {
        self.invoke(&CheckAuthenticationPassword { password: password.into() }).await?;
        Ok(())
    }

    /// Answer `authorizationStateWaitRegistration` for a new account.
    pub async fn register_user(
        &self,
        first_name: impl Into<String>,
        last_name:  impl Into<String>,
    ) -> Result<(), InvocationError> {
        let req = RegisterUser {
            first_name: first_name.into(),
            last_name:  last_name.into(),
            ..Default::default()
        };
        self.invoke(&req).await?;
        Ok(())
    }

    /// Ask the engine for the current state instead of using the mirrored one.
    pub async fn get_authorization_state(&self) -> Result<AuthorizationState, InvocationError> {
        self.invoke(&GetAuthorizationState {}).await
    }

    pub async fn log_out(&self) -> Result<(), InvocationError> {
        self.invoke(&LogOut {}).await?;
        Ok(())
    }

    /// Close the engine instance. The client unregisters itself once
    /// `authorizationStateClosed` arrives.
    pub async fn close(&self) -> Result<(), InvocationError> {
        self.invoke(&Close {}).await?;
        Ok(())
    }
}
