//! Contacts, clubs and admin statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    /// Only set for contacts built from a [`Club`].
    #[serde(default)]
    pub club_name: Option<String>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        if let Some(club) = self.club_name.as_deref() {
            return club.to_string();
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            "-".to_string()
        } else {
            full
        }
    }

    /// Case-insensitive match of `term` against name, institution, e-mail and club.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            self.institution_name.as_deref(),
            self.email.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.club_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Clubs live in their own table on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: u64,
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub club_type: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contacted: bool,
}

impl From<Club> for Contact {
    fn from(club: Club) -> Self {
        Contact {
            id: club.id,
            first_name: None,
            last_name: None,
            institution_name: club.institution_name,
            email: club.email,
            contact_type: Some("club".to_string()),
            status: Some(if club.contacted { "contacted" } else { "active" }.to_string()),
            linkedin_url: None,
            instagram_handle: club.instagram_handle,
            club_name: club.club_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_contacts: u64,
    pub total_clubs: u64,
    pub contacts_by_type: BTreeMap<String, u64>,
}

/// Query parameters for `POST /admin/discover-contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club(contacted: bool) -> Club {
        Club {
            id: 9,
            club_name: Some("Robotics Society".to_string()),
            club_type: Some("engineering".to_string()),
            institution_name: Some("Pasadena City College".to_string()),
            email: None,
            instagram_handle: Some("@pccrobotics".to_string()),
            description: None,
            contacted,
        }
    }

    #[test]
    fn test_club_maps_to_contact() {
        let contact = Contact::from(club(true));
        assert_eq!(contact.contact_type.as_deref(), Some("club"));
        assert_eq!(contact.status.as_deref(), Some("contacted"));
        assert_eq!(contact.display_name(), "Robotics Society");

        assert_eq!(Contact::from(club(false)).status.as_deref(), Some("active"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let contact = Contact::from(club(false));
        assert!(contact.matches("pasadena"));
        assert!(contact.matches("ROBOTICS"));
        assert!(!contact.matches("berkeley"));
    }

    #[test]
    fn test_display_name_of_person() {
        let contact: Contact = serde_json::from_str(
            r#"{"id": 1, "first_name": "Ada", "last_name": null, "email": "ada@college.edu"}"#,
        )
        .unwrap();
        assert_eq!(contact.display_name(), "Ada");
    }
}
