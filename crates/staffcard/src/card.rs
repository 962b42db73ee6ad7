//! Digital business card rendering.
//!
//! Turns an [`Employee`] into the artifacts its public profile offers: a
//! vCard 3.0 contact file, a shareable profile link (the QR code payload)
//! and a click-to-chat link.

use crate::config::CardConfig;
use crate::record::Employee;

/// MIME type of the generated contact file.
pub const VCARD_MIME_TYPE: &str = "text/vcard;charset=utf-8";

const CHAT_BASE_URL: &str = "https://wa.me";

/// Renders cards for one organization and public base URL.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    organization: String,
    public_base_url: String,
}

impl CardRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new(organization: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Create a renderer from the card section of the configuration.
    #[must_use]
    pub fn from_config(config: &CardConfig) -> Self {
        Self::new(config.organization.clone(), config.public_base_url.clone())
    }

    /// Render the employee as a vCard 3.0 document.
    ///
    /// Lines are CRLF-terminated and text values are escaped per RFC 2426.
    #[must_use]
    pub fn vcard(&self, employee: &Employee) -> String {
        let lines = [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{}", escape_text(&employee.name)),
            format!("ORG:{}", escape_text(&self.organization)),
            format!("TITLE:{}", escape_text(&employee.position)),
            format!("TEL;TYPE=CELL:{}", escape_text(&employee.phone)),
            format!("EMAIL:{}", escape_text(&employee.email)),
            format!("URL:{}", employee.linkedin_link),
            format!("NOTE:{}", escape_text(&employee.bio)),
            "END:VCARD".to_string(),
        ];

        let mut card = lines.join("\r\n");
        card.push_str("\r\n");
        card
    }

    /// Public profile link for the employee; this is what the QR code encodes.
    #[must_use]
    pub fn profile_url(&self, employee_id: &str) -> String {
        format!("{}#/profile/{employee_id}", self.public_base_url)
    }
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::from_config(&CardConfig::default())
    }
}

/// File name the contact is saved under: whitespace runs become `_`.
#[must_use]
pub fn vcard_file_name(employee: &Employee) -> String {
    let stem = employee.name.split_whitespace().collect::<Vec<_>>().join("_");
    let stem = if stem.is_empty() { "contact" } else { &stem };
    format!("{stem}.vcf")
}

/// Click-to-chat link built from the digits of the employee's phone.
///
/// `None` when the phone holds no digits.
#[must_use]
pub fn chat_link(employee: &Employee) -> Option<String> {
    let digits: String = employee
        .phone
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("{CHAT_BASE_URL}/{digits}"))
    }
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Employee {
        let mut ann = Employee::new("1", "Ann  Marie Smith");
        ann.position = "Lead, Platform".to_string();
        ann.phone = "+1 (555) 010-0100".to_string();
        ann.email = "ann@example.com".to_string();
        ann.linkedin_link = "https://linkedin.com/in/annsmith".to_string();
        ann.bio = "Builds things;\nbreaks things".to_string();
        ann
    }

    #[test]
    fn test_vcard_layout() {
        let card = CardRenderer::new("Acme", "https://cards.example/").vcard(&ann());
        let lines: Vec<&str> = card.split("\r\n").collect();

        assert_eq!(lines[0], "BEGIN:VCARD");
        assert_eq!(lines[1], "VERSION:3.0");
        assert_eq!(lines[2], "FN:Ann  Marie Smith");
        assert_eq!(lines[3], "ORG:Acme");
        assert_eq!(lines[4], "TITLE:Lead\\, Platform");
        assert_eq!(lines[5], "TEL;TYPE=CELL:+1 (555) 010-0100");
        assert_eq!(lines[6], "EMAIL:ann@example.com");
        assert_eq!(lines[7], "URL:https://linkedin.com/in/annsmith");
        assert_eq!(lines[8], "NOTE:Builds things\\;\\nbreaks things");
        assert_eq!(lines[9], "END:VCARD");
        assert_eq!(lines[10], "");
    }

    #[test]
    fn test_vcard_with_empty_fields() {
        let employee = Employee::new("2", "Bo");
        let card = CardRenderer::default().vcard(&employee);

        assert!(card.contains("ORG:Electric Filament\r\n"));
        assert!(card.contains("URL:\r\n"));
        assert!(card.contains("NOTE:\r\n"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a\\b"), "a\\\\b");
        assert_eq!(escape_text("x\r\ny"), "x\\ny");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn test_profile_url() {
        let renderer = CardRenderer::new("Acme", "https://cards.example/app/");
        assert_eq!(
            renderer.profile_url("17-42"),
            "https://cards.example/app/#/profile/17-42"
        );
    }

    #[test]
    fn test_vcard_file_name() {
        assert_eq!(vcard_file_name(&ann()), "Ann_Marie_Smith.vcf");
        assert_eq!(vcard_file_name(&Employee::new("1", "   ")), "contact.vcf");
    }

    #[test]
    fn test_chat_link() {
        assert_eq!(
            chat_link(&ann()).as_deref(),
            Some("https://wa.me/15550100100")
        );
        assert!(chat_link(&Employee::new("1", "Bo")).is_none());
    }
}
