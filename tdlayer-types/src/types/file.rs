use serde::{Deserialize, Serialize};

/// A file known to the engine, local or remote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    pub id:            i32,
    pub size:          i64,
    pub expected_size: i64,
    pub local:         LocalFile,
    pub remote:        RemoteFile,
}

impl File {
    /// `true` once the whole file is on disk.
    pub fn is_downloaded(&self) -> bool {
        self.local.is_downloading_completed
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalFile {
    pub path:                     String,
    pub can_be_downloaded:        bool,
    pub can_be_deleted:           bool,
    pub is_downloading_active:    bool,
    pub is_downloading_completed: bool,
    pub download_offset:          i64,
    pub downloaded_prefix_size:   i64,
    pub downloaded_size:          i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteFile {
    pub id:                     String,
    pub unique_id:              String,
    pub is_uploading_active:    bool,
    pub is_uploading_completed: bool,
    pub uploaded_size:          i64,
}

// ─── File types ───────────────────────────────────────────────────────────────

macro_rules! unit_shapes {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
            pub struct $name {}
        )*
    };
}

unit_shapes! {
    FileTypeNone, FileTypeAnimation, FileTypeAudio, FileTypeDocument, FileTypePhoto,
    FileTypeProfilePhoto, FileTypeSecret, FileTypeSticker, FileTypeThumbnail,
    FileTypeVideo, FileTypeVideoNote, FileTypeVoiceNote, FileTypeWallpaper,
}

// ─── Input files ──────────────────────────────────────────────────────────────

/// A file already known to the engine by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFileId {
    pub id: i32,
}

/// A file identified by its persistent remote id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFileRemote {
    pub id: String,
}

/// A file on the local disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFileLocal {
    pub path: String,
}

td_object! {
    File       => "file",
    LocalFile  => "localFile",
    RemoteFile => "remoteFile",
}
