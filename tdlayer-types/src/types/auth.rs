use serde::{Deserialize, Serialize};

use super::FormattedText;
use crate::enums::AuthenticationCodeType;

// ─── Authorization states ─────────────────────────────────────────────────────

/// The engine needs `setTdlibParameters` before anything else.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitTdlibParameters {}

/// The engine waits for a phone number (or a QR-code login request).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitPhoneNumber {}

/// The engine waits for an email address used to receive login codes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationStateWaitEmailAddress {
    pub allow_apple_id:  bool,
    pub allow_google_id: bool,
}

/// A login code was sent; `checkAuthenticationCode` is valid now.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitCode {
    pub code_info: AuthenticationCodeInfo,
}

/// Another logged-in device must confirm a `tg://login` link.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateWaitOtherDeviceConfirmation {
    pub link: String,
}

/// The phone number is new; `registerUser` is valid now.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationStateWaitRegistration {
    pub terms_of_service: Option<TermsOfService>,
}

/// Two-step verification is on; `checkAuthenticationPassword` is valid now.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationStateWaitPassword {
    pub password_hint:                  String,
    pub has_recovery_email_address:     bool,
    pub has_passport_data:              bool,
    pub recovery_email_address_pattern: String,
}

/// Logged in; every request is valid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateReady {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateLoggingOut {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateClosing {}

/// Terminal state. The client id is dead and may be reused by the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateClosed {}

// ─── Supporting shapes ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationCodeInfo {
    pub phone_number: String,
    #[serde(rename = "type")]
    pub kind:         AuthenticationCodeType,
    #[serde(default)]
    pub next_type:    Option<AuthenticationCodeType>,
    #[serde(default)]
    pub timeout:      i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationCodeTypeSms {
    pub length: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationCodeTypeCall {
    pub length: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationCodeTypeFlashCall {
    pub pattern: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationCodeTypeTelegramMessage {
    pub length: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsOfService {
    pub text:         FormattedText,
    pub min_user_age: i32,
    pub show_popup:   bool,
}

/// Options for `setAuthenticationPhoneNumber`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumberAuthenticationSettings {
    pub allow_flash_call:        bool,
    pub allow_missed_call:       bool,
    pub is_current_phone_number: bool,
    pub allow_sms_retriever_api: bool,
    pub authentication_tokens:   Vec<String>,
}

td_object! {
    AuthorizationStateWaitTdlibParameters         => "authorizationStateWaitTdlibParameters",
    AuthorizationStateWaitPhoneNumber             => "authorizationStateWaitPhoneNumber",
    AuthorizationStateWaitEmailAddress            => "authorizationStateWaitEmailAddress",
    AuthorizationStateWaitCode                    => "authorizationStateWaitCode",
    AuthorizationStateWaitOtherDeviceConfirmation => "authorizationStateWaitOtherDeviceConfirmation",
    AuthorizationStateWaitRegistration            => "authorizationStateWaitRegistration",
    AuthorizationStateWaitPassword                => "authorizationStateWaitPassword",
    AuthorizationStateReady                       => "authorizationStateReady",
    AuthorizationStateLoggingOut                  => "authorizationStateLoggingOut",
    AuthorizationStateClosing                     => "authorizationStateClosing",
    AuthorizationStateClosed                      => "authorizationStateClosed",
    PhoneNumberAuthenticationSettings             => "phoneNumberAuthenticationSettings",
    TermsOfService                                => "termsOfService",
    AuthenticationCodeInfo                        => "authenticationCodeInfo",
}
