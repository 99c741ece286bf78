//! Turn, session, and history record types.

use dcommon::SessionId;
use dprovider::{ModelVariant, RequestOptions, ResponseContext};
use serde::{Deserialize, Serialize};

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Pending,
    Settled,
    Failed,
}

/// What was asked, kept verbatim for replay and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub prompt: String,
    /// `None` on user turns; the resolved options on assistant turns.
    pub options: Option<RequestOptions>,
}

impl RequestPayload {
    pub fn new(prompt: impl Into<String>, options: Option<RequestOptions>) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}

/// One message in a session.
///
/// `is_inversion` marks user-authored turns. Only pending turns accept patches, so `text`,
/// `status`, `response_context`, and `failure_reason` are frozen once a turn settles or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub timestamp: String,
    pub text: String,
    pub is_inversion: bool,
    pub is_image_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_variant: Option<ModelVariant>,
    pub status: TurnStatus,
    pub request_payload: RequestPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_context: Option<ResponseContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Turn {
    pub fn user(
        timestamp: impl Into<String>,
        prompt: impl Into<String>,
        is_image_mode: bool,
    ) -> Self {
        let prompt = prompt.into();
        Self {
            timestamp: timestamp.into(),
            text: prompt.clone(),
            is_inversion: true,
            is_image_mode,
            model_variant: None,
            status: TurnStatus::Settled,
            request_payload: RequestPayload::new(prompt, None),
            response_context: None,
            failure_reason: None,
        }
    }

    /// Empty pending assistant turn awaiting reconciliation.
    pub fn assistant_placeholder(
        timestamp: impl Into<String>,
        prompt: impl Into<String>,
        options: RequestOptions,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            text: String::new(),
            is_inversion: false,
            is_image_mode: options.is_image_mode,
            model_variant: Some(options.model_variant),
            status: TurnStatus::Pending,
            request_payload: RequestPayload::new(prompt, Some(options)),
            response_context: None,
            failure_reason: None,
        }
    }

    /// Assistant turn usable as a context source.
    pub fn is_respondable(&self) -> bool {
        !self.is_inversion && self.status != TurnStatus::Failed
    }

    pub fn is_retriable(&self) -> bool {
        self.is_inversion
    }

    pub fn is_pending(&self) -> bool {
        self.status == TurnStatus::Pending
    }

    /// The recorded failure of a failed turn.
    pub fn failure(&self) -> Option<ChatError> {
        match (self.status, &self.failure_reason) {
            (TurnStatus::Failed, Some(reason)) => Some(ChatError::reconciliation(reason.clone())),
            _ => None,
        }
    }

    /// Merges `patch` into a pending turn. Returns `false` and leaves the turn untouched
    /// when the turn is no longer pending.
    pub fn apply(&mut self, patch: TurnPatch) -> bool {
        if !self.is_pending() {
            return false;
        }

        let TurnPatch {
            append_text,
            text,
            status,
            response_context,
            failure_reason,
        } = patch;

        if let Some(delta) = append_text {
            self.text.push_str(&delta);
        }

        if let Some(text) = text {
            self.text = text;
        }

        if let Some(status) = status {
            self.status = status;
        }

        match self.status {
            TurnStatus::Settled if !self.is_inversion => {
                self.response_context = response_context;
            }
            TurnStatus::Failed => {
                self.failure_reason = failure_reason;
            }
            _ => {}
        }

        true
    }
}

/// Partial update for a pending turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnPatch {
    pub append_text: Option<String>,
    pub text: Option<String>,
    pub status: Option<TurnStatus>,
    pub response_context: Option<ResponseContext>,
    pub failure_reason: Option<String>,
}

impl TurnPatch {
    pub fn partial(delta: impl Into<String>) -> Self {
        Self {
            append_text: Some(delta.into()),
            ..Self::default()
        }
    }

    pub fn settled(text: impl Into<String>, response_context: Option<ResponseContext>) -> Self {
        Self {
            text: Some(text.into()),
            status: Some(TurnStatus::Settled),
            response_context,
            ..Self::default()
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: Some(TurnStatus::Failed),
            failure_reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Address of a committed turn, tagged with the session generation it was appended in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnTarget {
    pub session_id: SessionId,
    pub index: usize,
    pub generation: u64,
}

impl TurnTarget {
    pub fn new(session_id: impl Into<SessionId>, index: usize, generation: u64) -> Self {
        Self {
            session_id: session_id.into(),
            index,
            generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Bumped by every clear.
    #[serde(default)]
    pub generation: u64,
    pub turns: Vec<Turn>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            generation: 0,
            turns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: SessionId,
    pub title: String,
}

impl HistoryEntry {
    pub fn new(id: impl Into<SessionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}
