use crate::error::ApiError;
use jiff::Timestamp;
use reelvault_core::{
    Entry, EntryDraft, EntryKind, EntryPatch, FieldError, ReactionAction, UserId,
};
use serde::{Deserialize, Serialize};

/// Wire shape of an entry, matching the original JSON contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBody {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_released: bool,
    pub likes: u64,
    pub dislikes: u64,
    pub user_id: UserId,
    pub user: OwnerBody,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct OwnerBody {
    pub id: UserId,
    pub name: String,
}

impl From<Entry> for EntryBody {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            kind: entry.kind,
            director: entry.director,
            budget: entry.budget,
            location: entry.location,
            duration: entry.duration,
            year_time: entry.year_time,
            image_url: entry.image_url,
            is_released: entry.is_released,
            likes: entry.likes,
            dislikes: entry.dislikes,
            user_id: entry.owner.id,
            user: OwnerBody {
                id: entry.owner.id,
                name: entry.owner.name,
            },
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// The caller's current reaction to an entry.
#[derive(Debug, Serialize)]
pub struct InteractionBody {
    pub action: Option<ReactionAction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryBody {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub year_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreateEntryBody {
    /// Converts the wire body into a draft; the kind string is the one
    /// field that cannot be checked by the draft's own validation.
    pub fn into_draft(self) -> Result<EntryDraft, ApiError> {
        let kind = parse_kind(&self.kind)?;
        Ok(EntryDraft {
            title: self.title,
            kind,
            director: self.director,
            budget: self.budget,
            location: self.location,
            duration: self.duration,
            year_time: self.year_time,
            image_url: self.image_url,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryBody {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub director: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year_time: Option<String>,
    pub image_url: Option<String>,
    pub is_released: Option<bool>,
}

impl UpdateEntryBody {
    pub fn into_patch(self) -> Result<EntryPatch, ApiError> {
        let kind = match self.kind.as_deref() {
            None => None,
            Some(raw) => Some(parse_kind(raw)?),
        };
        Ok(EntryPatch {
            title: self.title,
            kind,
            director: self.director,
            budget: self.budget,
            location: self.location,
            duration: self.duration,
            year_time: self.year_time,
            image_url: self.image_url,
            is_released: self.is_released,
        })
    }
}

fn parse_kind(raw: &str) -> Result<EntryKind, ApiError> {
    raw.parse().map_err(|()| {
        ApiError::Validation(vec![FieldError::new(
            "type",
            "Type must be either Movie or TV",
        )])
    })
}
