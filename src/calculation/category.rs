//! Leave type to category mapping.
//!
//! Leave types arrive from the HR system as free-form codes and names. They
//! are folded onto the closed [`LeaveCategory`] set here; anything the lookup
//! does not recognise lands in [`DEFAULT_CATEGORY`] and is reported through a
//! trace warning by the caller.

use serde::{Deserialize, Serialize};

use crate::models::LeaveCategory;

/// The bucket for leave types that match no known code or name.
pub const DEFAULT_CATEGORY: LeaveCategory = LeaveCategory::Casual;

/// Where a category resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Matched on the leave type code.
    Code,
    /// Matched on the leave type display name.
    Name,
    /// Nothing matched; the default category was used.
    Default,
}

/// The outcome of mapping a leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResolution {
    /// The category the leave is counted under.
    pub category: LeaveCategory,
    /// How the category was found.
    pub source: ResolutionSource,
}

impl CategoryResolution {
    /// True when the leave type fell back to [`DEFAULT_CATEGORY`].
    pub fn is_default(&self) -> bool {
        self.source == ResolutionSource::Default
    }
}

fn lookup_token(token: &str) -> Option<LeaveCategory> {
    match token {
        "ANNUAL" | "AL" => Some(LeaveCategory::Annual),
        "SICK" | "SL" | "MEDICAL" | "ML" => Some(LeaveCategory::Sick),
        "CASUAL" | "CL" => Some(LeaveCategory::Casual),
        _ => None,
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Codes must match a known token exactly.
fn lookup_code(code: &str) -> Option<LeaveCategory> {
    lookup_token(&normalize(code))
}

/// Names match a known token alone or followed by the word "leave", as in
/// "Annual Leave", "sick_leave" or "Medical-Leave".
fn lookup_name(name: &str) -> Option<LeaveCategory> {
    let normalized = normalize(name);
    if let Some(category) = lookup_token(&normalized) {
        return Some(category);
    }

    let mut words = normalized
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty());
    match (words.next(), words.next(), words.next()) {
        (Some(token), Some("LEAVE"), None) => lookup_token(token),
        _ => None,
    }
}

/// Maps a leave type code (and optional display name) to a category.
///
/// The code is tried first, then the name. Matching is case-insensitive and
/// never by prefix: a code such as `ANNUAL_UNPAID` is not annual leave.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::{map_leave_type, ResolutionSource};
/// use leave_engine::models::LeaveCategory;
///
/// let resolved = map_leave_type("ml", None);
/// assert_eq!(resolved.category, LeaveCategory::Sick);
///
/// let resolved = map_leave_type("LT-07", Some("Annual Leave"));
/// assert_eq!(resolved.category, LeaveCategory::Annual);
/// assert_eq!(resolved.source, ResolutionSource::Name);
///
/// let resolved = map_leave_type("STUDY", Some("Study Leave"));
/// assert_eq!(resolved.category, LeaveCategory::Casual);
/// assert!(resolved.is_default());
/// ```
pub fn map_leave_type(code: &str, name: Option<&str>) -> CategoryResolution {
    if let Some(category) = lookup_code(code) {
        return CategoryResolution {
            category,
            source: ResolutionSource::Code,
        };
    }

    match name.and_then(lookup_name) {
        Some(category) => CategoryResolution {
            category,
            source: ResolutionSource::Name,
        },
        None => CategoryResolution {
            category: DEFAULT_CATEGORY,
            source: ResolutionSource::Default,
        },
    }
}
