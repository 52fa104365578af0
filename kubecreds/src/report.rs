use std::{fmt, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A new record was created in the store.
    Stored,
    /// An existing record was deleted and written again.
    Replaced,
    /// A record already held this user's credentials and was kept.
    AlreadyStored,
    /// A different record exists and the user chose not to replace it.
    KeptExisting,
    /// The user declined creating a record for this context.
    Declined,
    /// Inline credentials were removed in favour of the exec plugin.
    Delegated,
    /// The user kept the inline credentials.
    KeptInline,
    /// Credentials were copied back from the store.
    Restored,
    /// The store had nothing usable for this context.
    Missing,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Stored => "stored",
            Action::Replaced => "replaced",
            Action::AlreadyStored => "already stored",
            Action::KeptExisting => "kept existing",
            Action::Declined => "declined",
            Action::Delegated => "delegated",
            Action::KeptInline => "kept inline",
            Action::Restored => "restored",
            Action::Missing => "missing",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub user: String,
    pub context: Option<String>,
    pub server: Option<String>,
    pub action: Action,
}

/// What a SECURE or UNDO run did, in order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub path: PathBuf,
    pub entries: Vec<Entry>,
    /// Whether the kubeconfig was rewritten.
    pub written: bool,
}

impl Report {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub(crate) fn context(&mut self, user: &str, context: &str, server: &str, action: Action) {
        self.entries.push(Entry {
            user: user.to_string(),
            context: Some(context.to_string()),
            server: Some(server.to_string()),
            action,
        });
    }

    pub(crate) fn user(&mut self, user: &str, action: Action) {
        self.entries.push(Entry {
            user: user.to_string(),
            context: None,
            server: None,
            action,
        });
    }

    pub fn actions_for(&self, user: &str) -> Vec<Action> {
        self.entries
            .iter()
            .filter(|e| e.user == user)
            .map(|e| e.action)
            .collect()
    }
}
