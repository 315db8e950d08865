use crate::error::FieldError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub type UserId = i64;
pub type EntryId = i64;

/// Whether an entry catalogs a movie or a TV show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Movie,
    #[serde(rename = "TV")]
    Tv,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Movie => "Movie",
            EntryKind::Tv => "TV",
        }
    }
}

impl FromStr for EntryKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Movie" => Ok(EntryKind::Movie),
            "TV" => Ok(EntryKind::Tv),
            _ => Err(()),
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user who created an entry, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOwner {
    pub id: UserId,
    pub name: String,
}

/// A catalogued movie or TV show.
///
/// Invariant: `likes` and `dislikes` always equal the number of reaction
/// ledger rows with the matching action for this entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub kind: EntryKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year_time: String,
    pub image_url: Option<String>,
    pub is_released: bool,
    pub likes: u64,
    pub dislikes: u64,
    pub owner: EntryOwner,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The full payload for creating an entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryDraft {
    pub title: String,
    pub kind: EntryKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year_time: String,
    pub image_url: Option<String>,
}

impl EntryDraft {
    /// Checks field constraints, collecting every violation.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        check_text("title", &self.title, TITLE_MAX, &mut errors);
        check_text("director", &self.director, FIELD_MAX, &mut errors);
        check_text("budget", &self.budget, FIELD_MAX, &mut errors);
        check_text("location", &self.location, FIELD_MAX, &mut errors);
        check_text("duration", &self.duration, FIELD_MAX, &mut errors);
        check_text("yearTime", &self.year_time, YEAR_TIME_MAX, &mut errors);
        if let Some(url) = &self.image_url {
            check_image_url(url, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A field-wise partial update of an entry. Absent fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub kind: Option<EntryKind>,
    pub director: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year_time: Option<String>,
    pub image_url: Option<String>,
    pub is_released: Option<bool>,
}

impl EntryPatch {
    /// A patch that only releases the entry into the community scope.
    pub fn release() -> Self {
        Self {
            is_released: Some(true),
            ..Self::default()
        }
    }

    /// Checks field constraints on every present field.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(title) = &self.title {
            check_text("title", title, TITLE_MAX, &mut errors);
        }
        if let Some(director) = &self.director {
            check_text("director", director, FIELD_MAX, &mut errors);
        }
        if let Some(budget) = &self.budget {
            check_text("budget", budget, FIELD_MAX, &mut errors);
        }
        if let Some(location) = &self.location {
            check_text("location", location, FIELD_MAX, &mut errors);
        }
        if let Some(duration) = &self.duration {
            check_text("duration", duration, FIELD_MAX, &mut errors);
        }
        if let Some(year_time) = &self.year_time {
            check_text("yearTime", year_time, YEAR_TIME_MAX, &mut errors);
        }
        if let Some(url) = &self.image_url {
            check_image_url(url, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Applies the patch to an entry in place.
    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(title) = &self.title {
            entry.title = title.clone();
        }
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(director) = &self.director {
            entry.director = director.clone();
        }
        if let Some(budget) = &self.budget {
            entry.budget = budget.clone();
        }
        if let Some(location) = &self.location {
            entry.location = location.clone();
        }
        if let Some(duration) = &self.duration {
            entry.duration = duration.clone();
        }
        if let Some(year_time) = &self.year_time {
            entry.year_time = year_time.clone();
        }
        if let Some(url) = &self.image_url {
            entry.image_url = Some(url.clone());
        }
        if let Some(is_released) = self.is_released {
            entry.is_released = is_released;
        }
    }
}

const TITLE_MAX: usize = 200;
const FIELD_MAX: usize = 100;
const YEAR_TIME_MAX: usize = 50;

fn check_text(field: &'static str, value: &str, max: usize, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{field} is required")));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
}

fn check_image_url(url: &str, errors: &mut Vec<FieldError>) {
    // Basic validation: an image URL must have an http(s) scheme and a host.
    let parts: Vec<&str> = url.split("://").collect();
    if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
        errors.push(FieldError::new(
            "imageUrl",
            format!("imageUrl must be a valid URL: {url}"),
        ));
        return;
    }

    let scheme = parts[0].to_lowercase();
    if scheme != "http" && scheme != "https" {
        errors.push(FieldError::new(
            "imageUrl",
            format!("imageUrl scheme must be http or https: {scheme}"),
        ));
    }
}
