//! Mapping from loosely typed person payloads to employee records.
//!
//! Synthetic-person generators disagree on field names and leave fields out
//! at will. Everything here works on raw [`serde_json::Value`]s and is
//! total: any input produces a well-formed [`Employee`].

use serde_json::Value;

use crate::record::Employee;

/// Job titles handed out when a person carries no employer title.
pub const POSITION_CATALOG: [&str; 10] = [
    "Software Engineer",
    "Product Manager",
    "UX Designer",
    "QA Engineer",
    "DevOps Engineer",
    "Sales Manager",
    "Marketing Lead",
    "HR Manager",
    "Support Engineer",
    "CTO",
];

/// Number of distinct placeholder avatars cycled through by index.
const AVATAR_POOL_SIZE: usize = 70;

const LINKEDIN_BASE_URL: &str = "https://linkedin.com/in";

/// Map a whole seed response into records.
///
/// The payload is expected to be an object with a `data` array. Anything
/// else maps to an empty list.
#[must_use]
pub fn map_payload(payload: &Value) -> Vec<Employee> {
    payload
        .get("data")
        .and_then(Value::as_array)
        .map(|people| {
            people
                .iter()
                .enumerate()
                .map(|(index, person)| map_person(person, index))
                .collect()
        })
        .unwrap_or_default()
}

/// Map one person at position `index` of the seed response.
#[must_use]
pub fn map_person(person: &Value, index: usize) -> Employee {
    let ordinal = index + 1;
    let first = field(person, "firstname");
    let last = field(person, "lastname");

    let id = field(person, "uuid")
        .or_else(|| field(person, "id"))
        .unwrap_or_else(|| ordinal.to_string());

    let full_name = format!(
        "{} {}",
        first.as_deref().unwrap_or_default(),
        last.as_deref().unwrap_or_default()
    )
    .trim()
    .to_string();
    let name = if full_name.is_empty() {
        format!("Employee {ordinal}")
    } else {
        full_name
    };

    let position = person
        .get("employer")
        .and_then(|employer| field(employer, "title"))
        .unwrap_or_else(|| POSITION_CATALOG[index % POSITION_CATALOG.len()].to_string());

    let image_url = field(person, "image")
        .or_else(|| field(person, "photo"))
        .unwrap_or_else(|| {
            format!(
                "https://i.pravatar.cc/150?img={}",
                (index % AVATAR_POOL_SIZE) + 1
            )
        });

    let linkedin_link = match field(person, "username") {
        Some(username) => format!("{LINKEDIN_BASE_URL}/{username}"),
        None => format!(
            "{LINKEDIN_BASE_URL}/{}{}",
            first.as_deref().unwrap_or("user").to_lowercase(),
            last.as_deref().unwrap_or_default().to_lowercase()
        ),
    };

    let mut employee = Employee::new(id, name);
    employee.position = position;
    employee.phone = field(person, "phone").unwrap_or_default();
    employee.email = field(person, "email").unwrap_or_default();
    employee.image_url = image_url;
    employee.linkedin_link = linkedin_link;
    employee.bio = field(person, "description")
        .or_else(|| field(person, "text"))
        .unwrap_or_default();
    employee
}

/// A non-empty scalar field rendered as a string.
///
/// Missing keys, `null`, empty strings, objects and arrays all count as
/// absent.
fn field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
