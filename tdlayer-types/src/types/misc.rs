use serde::{Deserialize, Serialize};

/// An empty successful reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ok {}

/// An engine-reported failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Error {
    pub code:    i32,
    pub message: String,
}

// ─── Connection states ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStateWaitingForNetwork {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStateConnectingToProxy {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStateConnecting {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStateUpdating {}
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStateReady {}

// ─── Option values ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionValueBoolean {
    pub value: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionValueEmpty {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionValueInteger {
    #[serde(with = "crate::int64")]
    pub value: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionValueString {
    pub value: String,
}

// ─── Log streams ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogStreamDefault {}

/// Write engine logs to a rotating file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStreamFile {
    pub path:            String,
    pub max_file_size:   i64,
    pub redirect_stderr: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogStreamEmpty {}

td_object! {
    Ok    => "ok",
    Error => "error",
}
