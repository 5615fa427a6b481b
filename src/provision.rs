//! Workspace provisioning.
//!
//! Creating a workspace and its OWNER membership is a single transaction, so
//! the "every workspace has an owner" invariant can't be observed broken.
//! Slug uniqueness is enforced by the database constraint; the probe loop in
//! [`allocate_slug`] only picks a likely-free candidate, and callers that
//! auto-provision retry on [`ProvisionError::SlugTaken`] when they lose a
//! concurrent race.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewWorkspace, NewWorkspaceMember, Workspace};
use crate::schema::{workspace_members, workspaces};
use crate::slug::slugify;

pub const ROLE_OWNER: &str = "OWNER";

/// Base used when slugification of a display name leaves nothing.
const FALLBACK_SLUG_BASE: &str = "workspace";

/// Bound on re-allocation when default provisioning loses slug races.
const MAX_ALLOCATION_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("workspace slug is already taken")]
    SlugTaken,
    #[error(transparent)]
    Database(#[from] DieselError),
}

/// Creates a workspace together with the creator's OWNER membership.
pub fn create_workspace(
    conn: &mut PgConnection,
    owner_id: Uuid,
    name: &str,
    slug: &str,
) -> Result<Workspace, ProvisionError> {
    conn.transaction(|conn| {
        let workspace: Workspace = diesel::insert_into(workspaces::table)
            .values(&NewWorkspace {
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .get_result(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ProvisionError::SlugTaken
                }
                other => ProvisionError::Database(other),
            })?;

        diesel::insert_into(workspace_members::table)
            .values(&NewWorkspaceMember {
                workspace_id: workspace.id,
                user_id: owner_id,
                role: ROLE_OWNER.to_string(),
            })
            .execute(conn)
            .map_err(ProvisionError::Database)?;

        Ok(workspace)
    })
}

/// Finds a free slug for the given display name by sequential probing:
/// `base`, `base-1`, `base-2`, ...
///
/// Not isolated against concurrent allocation of the same base; the unique
/// constraint on `workspaces.slug` is what actually guarantees uniqueness.
pub fn allocate_slug(conn: &mut PgConnection, name: &str) -> QueryResult<String> {
    let mut base = slugify(name);
    if base.is_empty() {
        base = FALLBACK_SLUG_BASE.to_string();
    }

    let mut candidate = base.clone();
    let mut suffix = 1u32;
    loop {
        let taken: bool = diesel::select(diesel::dsl::exists(
            workspaces::table.filter(workspaces::slug.eq(&candidate)),
        ))
        .get_result(conn)?;

        if !taken {
            return Ok(candidate);
        }

        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
}

/// Name a user's auto-created workspace is given: `{base}'s workspace`,
/// where base is the user's display name or the local part of their email.
pub fn default_workspace_base(user_name: Option<&str>, email: &str) -> String {
    user_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email))
        .to_string()
}

/// Provisions the default workspace for a user who has none yet.
///
/// Retries allocation when the insert loses a slug race to a concurrent
/// request; a lost race means someone else just took the probed candidate,
/// so the next probe will pick the following suffix.
pub fn ensure_default_workspace(
    conn: &mut PgConnection,
    user_id: Uuid,
    user_name: Option<&str>,
    email: &str,
) -> Result<Workspace, ProvisionError> {
    let base = default_workspace_base(user_name, email);
    let workspace_name = format!("{}'s workspace", base);

    for _ in 0..MAX_ALLOCATION_ATTEMPTS {
        let slug = allocate_slug(conn, &base)?;
        match create_workspace(conn, user_id, &workspace_name, &slug) {
            Err(ProvisionError::SlugTaken) => continue,
            other => return other,
        }
    }

    Err(ProvisionError::SlugTaken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_workspace_base_prefers_name() {
        assert_eq!(
            default_workspace_base(Some("Jane Doe"), "jane@example.com"),
            "Jane Doe"
        );
    }

    #[test]
    fn test_default_workspace_base_falls_back_to_email_local_part() {
        assert_eq!(default_workspace_base(None, "jane@example.com"), "jane");
        assert_eq!(default_workspace_base(Some("  "), "jane@example.com"), "jane");
    }
}
