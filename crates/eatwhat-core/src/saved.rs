//! Saved-list ("favorites") wire types shared by the client and the server.

use serde::{Deserialize, Serialize};

/// The personal lists a venue can be saved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListType {
    Favorites,
    WantToGo,
    Starred,
}

impl ListType {
    pub const ALL: [ListType; 3] = [ListType::Favorites, ListType::WantToGo, ListType::Starred];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Favorites => "favorites",
            ListType::WantToGo => "wantToGo",
            ListType::Starred => "starred",
        }
    }
}

impl std::fmt::Display for ListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveAction {
    Add,
    Remove,
}

/// Body of `POST /saved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub id: String,
    pub name: String,
    pub list_type: ListType,
    pub action: SaveAction,
}

/// List memberships of one venue, as returned by `GET /saved/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedLists {
    pub favorites: bool,
    pub want_to_go: bool,
    pub starred: bool,
}

impl SavedLists {
    #[must_use]
    pub fn contains(&self, list: ListType) -> bool {
        match list {
            ListType::Favorites => self.favorites,
            ListType::WantToGo => self.want_to_go,
            ListType::Starred => self.starred,
        }
    }

    pub fn set(&mut self, list: ListType, member: bool) {
        match list {
            ListType::Favorites => self.favorites = member,
            ListType::WantToGo => self.want_to_go = member,
            ListType::Starred => self.starred = member,
        }
    }

    /// Applies one add/remove mutation.
    pub fn apply(&mut self, list: ListType, action: SaveAction) {
        self.set(list, action == SaveAction::Add);
    }
}

/// What the core knows about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AuthSession {
    #[default]
    SignedOut,
    SignedIn {
        name: Option<String>,
        email: Option<String>,
    },
}

impl AuthSession {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthSession::SignedIn { .. })
    }

    /// Display name, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            AuthSession::SignedOut => None,
            AuthSession::SignedIn { name, email } => name.as_deref().or(email.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_uses_camel_case_wire_names() {
        let req = SaveRequest {
            id: "ChIJ123".into(),
            name: "Village Park".into(),
            list_type: ListType::WantToGo,
            action: SaveAction::Remove,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "ChIJ123",
                "name": "Village Park",
                "listType": "wantToGo",
                "action": "remove"
            })
        );
    }

    #[test]
    fn saved_lists_tolerate_missing_fields() {
        let lists: SavedLists = serde_json::from_str(r#"{"starred": true}"#).unwrap();
        assert!(lists.starred);
        assert!(!lists.favorites);
        assert!(!lists.contains(ListType::WantToGo));
    }

    #[test]
    fn apply_sets_and_clears_membership() {
        let mut lists = SavedLists::default();
        lists.apply(ListType::Favorites, SaveAction::Add);
        assert!(lists.contains(ListType::Favorites));
        lists.apply(ListType::Favorites, SaveAction::Remove);
        assert_eq!(lists, SavedLists::default());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let session = AuthSession::SignedIn {
            name: None,
            email: Some("makan@example.com".into()),
        };
        assert!(session.is_signed_in());
        assert_eq!(session.display_name(), Some("makan@example.com"));
        assert_eq!(AuthSession::SignedOut.display_name(), None);
    }
}
