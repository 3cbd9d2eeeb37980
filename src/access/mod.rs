use crate::models::User;

/// What the signed-in user may do with a resource (note or comment).
///
/// Owners edit their own resources; admins moderate (delete) anything
/// but never edit content they do not own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct Capabilities {
    pub can_edit: bool,
    pub can_delete: bool,
}

pub(crate) fn capabilities_for(owner_id: Option<i64>, user: Option<&User>) -> Capabilities {
    let Some(user) = user else {
        return Capabilities::default();
    };

    let is_owner = match (owner_id, user.id) {
        (Some(o), Some(u)) => o == u,
        _ => false,
    };
    let is_admin = user.is_admin();

    Capabilities {
        can_edit: is_owner && !is_admin,
        can_delete: is_owner || is_admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, admin: bool) -> User {
        User {
            id: Some(id),
            username: "u".into(),
            roles: if admin {
                vec!["ADMIN".into()]
            } else {
                vec!["USER".into()]
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_owner_edits_and_deletes() {
        let caps = capabilities_for(Some(1), Some(&user(1, false)));
        assert!(caps.can_edit);
        assert!(caps.can_delete);
    }

    #[test]
    fn test_stranger_gets_nothing() {
        let caps = capabilities_for(Some(1), Some(&user(2, false)));
        assert!(!caps.can_edit);
        assert!(!caps.can_delete);
    }

    #[test]
    fn test_admin_deletes_but_never_edits() {
        let caps = capabilities_for(Some(1), Some(&user(2, true)));
        assert!(!caps.can_edit);
        assert!(caps.can_delete);

        // Even on their own resource, an admin moderates rather than edits.
        let caps = capabilities_for(Some(2), Some(&user(2, true)));
        assert!(!caps.can_edit);
        assert!(caps.can_delete);
    }

    #[test]
    fn test_missing_identity_gets_nothing() {
        assert_eq!(capabilities_for(Some(1), None), Capabilities::default());
        assert_eq!(
            capabilities_for(None, Some(&user(1, false))),
            Capabilities::default()
        );
        let anonymous = User {
            id: None,
            ..Default::default()
        };
        assert_eq!(
            capabilities_for(Some(1), Some(&anonymous)),
            Capabilities::default()
        );
    }
}
