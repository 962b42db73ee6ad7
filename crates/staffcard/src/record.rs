//! Employee record types for staffcard.
//!
//! This module defines the flat record persisted by the store, the draft
//! used to create one, the patch used to update one, and id generation.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name given to a record created without one.
pub const DEFAULT_NAME: &str = "New Employee";

/// Character limit the profile form applies to `bio`.
///
/// The store never enforces it.
pub const BIO_DISPLAY_LIMIT: usize = 300;

/// Base of the placeholder avatar service.
pub const AVATAR_BASE_URL: &str = "https://i.pravatar.cc/150";

/// Upper bound (exclusive) of the random id suffix.
const ID_SUFFIX_RANGE: u32 = 100_000;

/// Keys [`Employee`] serializes from its own fields.
pub const FIELD_NAMES: [&str; 8] = [
    "id",
    "name",
    "position",
    "phone",
    "email",
    "image_url",
    "linkedin_link",
    "bio",
];

/// Last timestamp component handed out by [`generate_id`].
static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// One directory entry.
///
/// Every field is a string. Records read back from storage are decoded
/// leniently: missing or `null` fields become empty, numbers and booleans
/// become their string form, and fields this type does not know about are
/// kept (see [`Employee::extra`]) so they survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Opaque unique identifier, stable for the record's lifetime.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// Display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Role label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,

    /// Contact phone number, free text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,

    /// Contact email address, free text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    /// Avatar URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,

    /// `LinkedIn` profile URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin_link: String,

    /// Short biography.
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: String,

    /// Fields carried by older or foreign record shapes. Never holds a
    /// key from [`FIELD_NAMES`].
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Employee {
    /// Create a record with just an id and a name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fields this type does not model, as read from storage.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Carry an extra field through reads and writes.
    ///
    /// Returns `false` and stores nothing when `key` names one of the
    /// record's own fields; set those directly instead.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if FIELD_NAMES.contains(&key.as_str()) {
            return false;
        }
        self.extra.insert(key, value);
        true
    }

    /// Check whether this record has the given id.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.id == id
    }

    /// Case-insensitive substring match on name or position.
    ///
    /// An empty term matches every record.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.position.to_lowercase().contains(&term)
    }

    /// Check whether `bio` fits in `limit` characters.
    #[must_use]
    pub fn bio_within_limit(&self, limit: usize) -> bool {
        self.bio.chars().count() <= limit
    }
}

/// Fields supplied when creating a record.
///
/// Any field left `None` (or set to an empty string) is filled with its
/// default by [`NewEmployee::into_employee`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewEmployee {
    /// Caller-supplied id; generated when absent.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Role label.
    pub position: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub image_url: Option<String>,
    /// `LinkedIn` profile URL.
    pub linkedin_link: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
}

impl NewEmployee {
    /// Start a draft with a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The caller-supplied id, if it is non-empty.
    #[must_use]
    pub fn supplied_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Build a full record, assigning an id and defaults where missing.
    #[must_use]
    pub fn into_employee(self) -> Employee {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(generate_id);

        Employee {
            id,
            name: or_default(self.name, DEFAULT_NAME.to_string()),
            position: or_default(self.position, String::new()),
            phone: or_default(self.phone, String::new()),
            email: or_default(self.email, String::new()),
            image_url: self
                .image_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(placeholder_image_url),
            linkedin_link: or_default(self.linkedin_link, String::new()),
            bio: or_default(self.bio, String::new()),
            extra: Map::new(),
        }
    }
}

/// A shallow patch over an existing record.
///
/// `Some` fields replace the record's value; `None` fields are left alone.
/// The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeePatch {
    /// New display name.
    pub name: Option<String>,
    /// New role label.
    pub position: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New avatar URL.
    pub image_url: Option<String>,
    /// New `LinkedIn` profile URL.
    pub linkedin_link: Option<String>,
    /// New biography.
    pub bio: Option<String>,
}

impl EmployeePatch {
    /// Check whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge this patch onto `employee`.
    pub fn apply_to(self, employee: &mut Employee) {
        let Self {
            name,
            position,
            phone,
            email,
            image_url,
            linkedin_link,
            bio,
        } = self;

        let fields = [
            (name, &mut employee.name),
            (position, &mut employee.position),
            (phone, &mut employee.phone),
            (email, &mut employee.email),
            (image_url, &mut employee.image_url),
            (linkedin_link, &mut employee.linkedin_link),
            (bio, &mut employee.bio),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Generate a fresh record id.
///
/// The id is `<millis>-<suffix>`. The millisecond component never repeats
/// within a process: when the clock has not moved since the last call it
/// is bumped past the previous value. The random suffix separates ids
/// minted by different processes in the same millisecond.
#[must_use]
pub fn generate_id() -> String {
    let suffix = rand::thread_rng().gen_range(0..ID_SUFFIX_RANGE);
    format!("{}-{suffix}", next_id_millis())
}

fn next_id_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut previous = LAST_ID_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(previous + 1);
        match LAST_ID_MILLIS.compare_exchange_weak(
            previous,
            next,
            Ordering::SeqCst,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(actual) => previous = actual,
        }
    }
}

/// Placeholder avatar keyed by a random token.
#[must_use]
pub fn placeholder_image_url() -> String {
    let token: u64 = rand::random();
    format!("{AVATAR_BASE_URL}?u={token}")
}

fn or_default(value: Option<String>, default: String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
