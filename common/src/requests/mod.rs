//! Request and response payloads exchanged between the editor and the backend.

use serde::{Deserialize, Serialize};

use crate::error::BandError;
use crate::model::{BandPayload, SlideDraft, VisualConfig};
use crate::reorder::ReorderIntent;

pub const ACTION_REORDER_BANDS: &str = "reorder_bands";
pub const ACTION_REORDER_SLIDES: &str = "reorder_slides";

/// Form-encoded body of `POST /api/reorder`.
///
/// `order` is a JSON object mapping identifiers to one-based ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderForm {
    pub action: String,
    pub page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_id: Option<String>,
    pub order: String,
}

/// A decoded reorder submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderCommand {
    Bands {
        page_id: String,
        intent: ReorderIntent,
    },
    Slides {
        page_id: String,
        band_id: String,
        intent: ReorderIntent,
    },
}

impl ReorderForm {
    pub fn bands(page_id: impl Into<String>, intent: &ReorderIntent) -> Self {
        Self {
            action: ACTION_REORDER_BANDS.to_string(),
            page_id: page_id.into(),
            band_id: None,
            order: intent.to_wire(),
        }
    }

    pub fn slides(
        page_id: impl Into<String>,
        band_id: impl Into<String>,
        intent: &ReorderIntent,
    ) -> Self {
        Self {
            action: ACTION_REORDER_SLIDES.to_string(),
            page_id: page_id.into(),
            band_id: Some(band_id.into()),
            order: intent.to_wire(),
        }
    }

    /// Fields as `(name, value)` pairs, in the order they are encoded.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("action", self.action.as_str()), ("page_id", self.page_id.as_str())];
        if let Some(band_id) = &self.band_id {
            fields.push(("band_id", band_id.as_str()));
        }
        fields.push(("order", self.order.as_str()));
        fields
    }

    pub fn parse(&self) -> Result<ReorderCommand, BandError> {
        if self.page_id.trim().is_empty() {
            return Err(BandError::validation("page_id is required"));
        }
        let intent = ReorderIntent::from_wire(&self.order)?;
        match self.action.as_str() {
            ACTION_REORDER_BANDS => Ok(ReorderCommand::Bands {
                page_id: self.page_id.clone(),
                intent,
            }),
            ACTION_REORDER_SLIDES => {
                let band_id = self
                    .band_id
                    .clone()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| BandError::validation("band_id is required for slides"))?;
                Ok(ReorderCommand::Slides {
                    page_id: self.page_id.clone(),
                    band_id,
                    intent,
                })
            }
            other => Err(BandError::validation(format!("unknown action '{other}'"))),
        }
    }
}

/// `POST /api/bands/create` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBandRequest {
    pub page_id: String,
    /// Band type; validated against the enumerated kinds by the band model.
    pub kind: String,
    /// Defaults to the empty payload of `kind`.
    #[serde(default)]
    pub payload: Option<BandPayload>,
    #[serde(default)]
    pub visual: VisualConfig,
}

/// `POST /api/slides/create` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSlideRequest {
    pub band_id: String,
    #[serde(default)]
    pub slide: SlideDraft,
}

/// JSON status body: `{success: true[, path]}` or `{success: false, error}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Typed view of a [`StatusReply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success { path: Option<String> },
    Failure { error: String },
}

impl StatusReply {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn ok_with_path(path: impl Into<String>) -> Self {
        Self {
            success: true,
            path: Some(path.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: None,
            error: Some(error.into()),
        }
    }
}

impl From<StatusReply> for Reply {
    fn from(value: StatusReply) -> Self {
        match (value.success, value.error) {
            (true, _) => Reply::Success { path: value.path },
            (false, Some(error)) => Reply::Failure { error },
            (false, None) => Reply::Failure {
                error: "the server reported a failure without details".to_string(),
            },
        }
    }
}

impl Reply {
    /// Interprets a reorder reply.
    pub fn into_ack(self) -> Result<(), BandError> {
        match self {
            Reply::Success { .. } => Ok(()),
            Reply::Failure { error } => Err(BandError::Transport(error)),
        }
    }

    /// Interprets an upload reply; success must carry the stored path.
    pub fn into_path(self) -> Result<String, BandError> {
        match self {
            Reply::Success { path: Some(path) } if !path.is_empty() => Ok(path),
            Reply::Success { .. } => Err(BandError::transport("upload reply without a path")),
            Reply::Failure { error } => Err(BandError::Transport(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_form_round_trips_to_a_command() {
        let intent = ReorderIntent::from_ordering(&["b2".to_string(), "b1".to_string()]);
        let form = ReorderForm::bands("home", &intent);
        assert_eq!(
            form.fields(),
            vec![("action", "reorder_bands"), ("page_id", "home"), ("order", r#"{"b1":2,"b2":1}"#)]
        );
        assert_eq!(
            form.parse().unwrap(),
            ReorderCommand::Bands {
                page_id: "home".into(),
                intent
            }
        );
    }

    #[test]
    fn slide_reorder_requires_band_id() {
        let mut form = ReorderForm::slides("home", "b1", &ReorderIntent::default());
        assert!(matches!(form.parse(), Ok(ReorderCommand::Slides { .. })));
        form.band_id = None;
        assert!(matches!(form.parse(), Err(BandError::Validation(_))));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let mut form = ReorderForm::bands("home", &ReorderIntent::default());
        form.action = "shuffle".into();
        assert!(matches!(form.parse(), Err(BandError::Validation(_))));
    }

    #[test]
    fn replies_decode_into_tagged_outcomes() {
        let ok: StatusReply = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(Reply::from(ok).into_ack(), Ok(()));

        let err: StatusReply = serde_json::from_str(r#"{"error":"stale order"}"#).unwrap();
        assert_eq!(
            Reply::from(err).into_ack(),
            Err(BandError::Transport("stale order".into()))
        );

        let uploaded: StatusReply =
            serde_json::from_str(r#"{"success":true,"path":"/uploads/a.png"}"#).unwrap();
        assert_eq!(Reply::from(uploaded).into_path().unwrap(), "/uploads/a.png");

        let missing_path = Reply::from(StatusReply::ok());
        assert!(missing_path.into_path().is_err());
    }

    #[test]
    fn failure_reply_serialises_without_path() {
        let json = serde_json::to_value(StatusReply::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }
}
