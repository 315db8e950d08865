use reelvault_core::{Entry, Page, PageInfo};
use serde::Serialize;

use crate::model::entry::EntryBody;

/// Success envelope: `{"success": true, "data": ..., "message"?: ...}`.
#[derive(Debug, Serialize)]
pub struct SuccessBody<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T: Serialize> SuccessBody<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message),
        }
    }
}

/// Success envelope for operations that return no data.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: &'static str,
}

impl MessageBody {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Listing envelope: a page of entries plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct PageBody {
    pub success: bool,
    pub data: Vec<EntryBody>,
    pub pagination: PageInfo,
}

impl PageBody {
    pub fn from_page(page: Page<Entry>) -> Self {
        Self {
            success: true,
            data: page.items.into_iter().map(EntryBody::from).collect(),
            pagination: page.info,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}
