//! Administrator allow-list

use std::collections::HashSet;

/// Usernames allowed to run the admin commands
///
/// Matching is by exact username. Telegram usernames are mutable, so this
/// trusts whatever the transport reports as the sender's username.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    usernames: HashSet<String>,
}

impl AdminList {
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            usernames: usernames.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether the sender's username is on the list
    pub fn is_admin(&self, username: Option<&str>) -> bool {
        username.is_some_and(|name| self.usernames.contains(name))
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin_exact_match() {
        let admins = AdminList::new(["alice", "bob"]);
        assert!(admins.is_admin(Some("alice")));
        assert!(admins.is_admin(Some("bob")));
        assert!(!admins.is_admin(Some("Alice")));
        assert!(!admins.is_admin(Some("alice ")));
        assert!(!admins.is_admin(Some("carol")));
    }

    #[test]
    fn test_absent_username_is_not_admin() {
        let admins = AdminList::new(["alice"]);
        assert!(!admins.is_admin(None));
        assert!(!AdminList::default().is_admin(Some("alice")));
    }
}
