//! Stream handles
//!
//! The SDK treats media streams as opaque references: capture, encoding and
//! rendering happen behind the peer connection channel collaborator. A stream
//! handle carries just enough to route it - an id and its track layout - and
//! two handles refer to the same stream when their ids match.

use crate::identity::RemoteId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stream captured locally, available for publishing to a remote user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStream {
    /// Stream identifier, unique within this client
    pub id: String,
    /// Whether the stream carries an audio track
    pub has_audio: bool,
    /// Whether the stream carries a video track
    pub has_video: bool,
}

impl LocalStream {
    /// Create a handle for a stream with both audio and video
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_audio: true,
            has_video: true,
        }
    }

    /// Create a handle for an audio-only stream
    pub fn audio_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_audio: true,
            has_video: false,
        }
    }

    /// Create a handle for a video-only stream
    pub fn video_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_audio: false,
            has_video: true,
        }
    }
}

impl fmt::Display for LocalStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A stream published by a remote user and received over a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStream {
    /// Stream identifier, assigned by the publishing side
    pub id: String,
    /// The remote user this stream came from
    pub origin: RemoteId,
    /// Whether the stream carries an audio track
    pub has_audio: bool,
    /// Whether the stream carries a video track
    pub has_video: bool,
}

impl RemoteStream {
    /// Create a handle for a remote stream
    pub fn new(id: impl Into<String>, origin: impl Into<RemoteId>) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            has_audio: true,
            has_video: true,
        }
    }

    /// The remote user this stream came from
    pub fn origin(&self) -> &RemoteId {
        &self.origin
    }
}

impl fmt::Display for RemoteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.id, self.origin)
    }
}
