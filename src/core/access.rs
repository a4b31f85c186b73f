//! Access control - Which actors may perform privileged operations.
//!
//! Punching and reading one's own data need no privilege. Everything that
//! rewrites someone's hours (pardons, schedules, recomputation) or reads
//! another employee's data goes through [`AccessPolicy::authorize`].

use crate::{
    config::admins,
    errors::{Error, Result},
};
use std::{collections::HashSet, fmt};
use tracing::{info, warn};

/// Operations that require a privileged actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Pardon a day for an employee
    GrantPardon,
    /// Remove an existing pardon
    RevokePardon,
    /// Change an employee's work schedule
    UpdateSchedule,
    /// Force recomputation of cached summaries
    RecomputeSummaries,
    /// Read another employee's punches, summaries or heatmap
    ViewOthers,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GrantPardon => "grant pardons",
            Self::RevokePardon => "revoke pardons",
            Self::UpdateSchedule => "update schedules",
            Self::RecomputeSummaries => "recompute summaries",
            Self::ViewOthers => "view other employees",
        })
    }
}

/// Set of privileged actor identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    admin_ids: HashSet<String>,
}

impl AccessPolicy {
    /// Creates a policy from explicit identifiers.
    #[must_use]
    pub fn new<I, S>(admin_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admin_ids: admin_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads the privileged identifiers from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let policy = Self {
            admin_ids: admins::get_admin_ids(),
        };
        if policy.is_empty() {
            warn!("No privileged actors configured; pardons and schedules are read-only");
        } else {
            info!(admins = policy.len(), "Loaded privileged actors");
        }
        policy
    }

    /// Whether `actor` holds privileges.
    #[must_use]
    pub fn is_privileged(&self, actor: &str) -> bool {
        self.admin_ids.contains(actor)
    }

    /// Number of privileged actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.admin_ids.len()
    }

    /// Whether no actor is privileged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.admin_ids.is_empty()
    }

    /// Checks that `actor` may perform `action`.
    ///
    /// # Errors
    /// [`Error::PermissionDenied`] when the actor is not privileged.
    pub fn authorize(&self, actor: &str, action: Action) -> Result<()> {
        if self.is_privileged(actor) {
            Ok(())
        } else {
            warn!(actor, %action, "Denied privileged action");
            Err(Error::PermissionDenied {
                actor: actor.to_string(),
                action,
            })
        }
    }

    /// Checks that `actor` may read `employee_id`'s data.
    ///
    /// # Errors
    /// [`Error::PermissionDenied`] when reading someone else without privilege.
    pub fn authorize_view(&self, actor: &str, employee_id: &str) -> Result<()> {
        if actor == employee_id {
            Ok(())
        } else {
            self.authorize(actor, Action::ViewOthers)
        }
    }
}
