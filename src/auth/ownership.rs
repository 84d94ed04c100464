// Ownership checks for mutating owned resources
//
// Mutating handlers follow: load by id -> existence -> ownership -> mutate.

use uuid::Uuid;

use crate::auth::{error::AuthError, middleware::VerifiedIdentity};

/// A record with an immutable owning account
pub trait OwnedResource {
    /// Lowercase resource name used in messages, e.g. `"service"`
    const RESOURCE: &'static str;

    fn owner_id(&self) -> Uuid;
}

impl VerifiedIdentity {
    /// Exact id equality between the caller and the resource owner
    pub fn ensure_owns<R: OwnedResource>(&self, resource: &R, action: &'static str) -> Result<(), AuthError> {
        if resource.owner_id() == self.user_id {
            Ok(())
        } else {
            tracing::warn!(
                "user_id={} attempted to {} {} owned by {}",
                self.user_id,
                action,
                R::RESOURCE,
                resource.owner_id()
            );
            Err(AuthError::NotOwner {
                action,
                resource: R::RESOURCE,
            })
        }
    }
}

/// Existence first, then ownership; hands the resource back on success
pub fn authorize_mutation<R: OwnedResource>(
    found: Option<R>,
    identity: &VerifiedIdentity,
    action: &'static str,
) -> Result<R, AuthError> {
    let resource = found.ok_or(AuthError::ResourceNotFound {
        resource: R::RESOURCE,
    })?;
    identity.ensure_owns(&resource, action)?;
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Account, Role};
    use chrono::Utc;

    struct Listing {
        owner: Uuid,
    }

    impl OwnedResource for Listing {
        const RESOURCE: &'static str = "listing";

        fn owner_id(&self) -> Uuid {
            self.owner
        }
    }

    fn identity(user_id: Uuid) -> VerifiedIdentity {
        let now = Utc::now();
        VerifiedIdentity {
            user_id,
            email: "owner@example.com".to_string(),
            role: Role::Freelancer,
            account: Account {
                id: user_id,
                email: "owner@example.com".to_string(),
                full_name: "Owner".to_string(),
                phone: "+91 98765 43210".to_string(),
                city: "Delhi".to_string(),
                role: Role::Freelancer,
                skill: None,
                experience: None,
                description: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        let listing = authorize_mutation(Some(Listing { owner }), &identity(owner), "update");
        assert!(listing.is_ok());
    }

    #[test]
    fn test_other_account_is_not_owner() {
        let result = authorize_mutation(
            Some(Listing { owner: Uuid::new_v4() }),
            &identity(Uuid::new_v4()),
            "delete",
        );
        assert!(matches!(
            result,
            Err(AuthError::NotOwner { action: "delete", resource: "listing" })
        ));
    }

    #[test]
    fn test_missing_resource_is_not_found_for_anyone() {
        let result = authorize_mutation::<Listing>(None, &identity(Uuid::new_v4()), "update");
        assert!(matches!(
            result,
            Err(AuthError::ResourceNotFound { resource: "listing" })
        ));
    }
}
