use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One server page of results.
///
/// The backend returns Spring-style page envelopes; field names are
/// camelCase on the wire. `last` is server-authoritative: when it is
/// `true` there are no further pages for the current filter/search.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index echoed by the server.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub(crate) enum NoteCategory {
    Maths,
    Science,
    History,
    Art,
    Languages,
    Others,
}

impl NoteCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            NoteCategory::Maths => "Maths",
            NoteCategory::Science => "Science",
            NoteCategory::History => "History",
            NoteCategory::Art => "Art",
            NoteCategory::Languages => "Languages",
            NoteCategory::Others => "Others",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NoteCategory::Maths => "📐",
            NoteCategory::Science => "🔬",
            NoteCategory::History => "📚",
            NoteCategory::Art => "🎨",
            NoteCategory::Languages => "🌍",
            NoteCategory::Others => "📝",
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub(crate) enum NoteVisibility {
    Public,
    Private,
}

/// Which backing query a note list uses: the caller's own notes or the
/// "shared with me" alternate resource set. Client-side only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum ListScope {
    #[default]
    Own,
    SharedWithMe,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub visibility: Option<NoteVisibility>,
    #[serde(default)]
    pub category: Option<NoteCategory>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub shared_with_user_ids: Vec<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub note_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_profile_pic_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_reported: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: String,
    /// Only populated on registration; never echoed by the server.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "ADMIN")
    }

    pub fn is_banned(&self) -> bool {
        self.status.as_deref() == Some("BANNED")
    }

    pub fn shown_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => &self.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_contract_deserialize() {
        // Contract based on the Spring page envelope the API returns.
        let json = r#"{
            "content": [{"id": 7, "title": "Pythagoras", "category": "MATHS"}],
            "totalElements": 11,
            "totalPages": 2,
            "number": 0,
            "size": 10,
            "first": true,
            "last": false,
            "empty": false
        }"#;
        let page: Page<Note> = serde_json::from_str(json).expect("page should parse");
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, Some(7));
        assert_eq!(page.content[0].category, Some(NoteCategory::Maths));
        assert_eq!(page.total_elements, 11);
        assert!(!page.last);
        assert_eq!(page.empty, page.content.is_empty());
    }

    #[test]
    fn test_page_missing_fields_default() {
        // A defensive parse: an empty envelope still yields a usable page.
        let page: Page<Comment> = serde_json::from_str("{}").expect("should parse");
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 0);
        assert!(!page.last);
    }

    #[test]
    fn test_category_wire_names_are_uppercase() {
        let v = serde_json::to_value(NoteCategory::Languages).expect("should serialize");
        assert_eq!(v, "LANGUAGES");
        let parsed: NoteCategory =
            serde_json::from_value(serde_json::json!("SCIENCE")).expect("should parse");
        assert_eq!(parsed, NoteCategory::Science);
        assert_eq!(NoteCategory::Maths.to_string(), "MATHS");
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let note = Note {
            title: "t".into(),
            visibility: Some(NoteVisibility::Private),
            category: Some(NoteCategory::Others),
            ..Default::default()
        };
        let v = serde_json::to_value(note).expect("should serialize");
        assert_eq!(v["visibility"], "PRIVATE");
        assert_eq!(v["category"], "OTHERS");
        // id is absent on create, not null
        assert!(v.get("id").is_none());
        assert!(v.get("sharedWithUserIds").is_some());
    }

    #[test]
    fn test_comment_contract_deserialize() {
        let json = r#"{
            "id": 3,
            "content": "Nice summary",
            "noteId": 7,
            "userId": 2,
            "username": "genericUser",
            "displayName": "Generic User",
            "userProfilePicUrl": "/api/v1/users/profile-image/2",
            "createdAt": "2025-03-01T10:00:00",
            "isReported": true
        }"#;
        let c: Comment = serde_json::from_str(json).expect("comment should parse");
        assert_eq!(c.id, Some(3));
        assert_eq!(c.note_id, Some(7));
        assert!(c.is_reported);
        assert_eq!(
            c.user_profile_pic_url.as_deref(),
            Some("/api/v1/users/profile-image/2")
        );
    }

    #[test]
    fn test_user_role_and_status_helpers() {
        let admin = User {
            username: "root".into(),
            roles: vec!["USER".into(), "ADMIN".into()],
            ..Default::default()
        };
        assert!(admin.is_admin());
        assert!(!admin.is_banned());

        let banned = User {
            username: "troll".into(),
            status: Some("BANNED".into()),
            ..Default::default()
        };
        assert!(!banned.is_admin());
        assert!(banned.is_banned());
    }

    #[test]
    fn test_user_password_not_echoed() {
        let u = User {
            username: "u".into(),
            email: "u@example.com".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(u).expect("should serialize");
        assert!(v.get("password").is_none());
    }

    #[test]
    fn test_shown_name_falls_back_to_username() {
        let mut u = User {
            username: "plain".into(),
            ..Default::default()
        };
        assert_eq!(u.shown_name(), "plain");
        u.display_name = Some("  ".into());
        assert_eq!(u.shown_name(), "plain");
        u.display_name = Some("Display".into());
        assert_eq!(u.shown_name(), "Display");
    }
}
