use thiserror::Error;

use crate::domain::blog::models::BlogPost;
use crate::domain::user::models::Username;

/// A resource with a single recorded owner.
pub trait Owned {
    fn owner(&self) -> &Username;
}

impl Owned for BlogPost {
    fn owner(&self) -> &Username {
        &self.author
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("{acting_user} is not the owner of this resource (owner: {owner})")]
    Forbidden { owner: String, acting_user: String },
}

/// Allow the mutation only if `acting_user` owns `resource`.
///
/// Existence is the caller's concern: look the resource up first and
/// report a missing one as not found before calling this.
///
/// # Errors
/// * `Forbidden` - `acting_user` is not the recorded owner
pub fn assert_owner<R>(resource: &R, acting_user: &Username) -> Result<(), OwnershipError>
where
    R: Owned + ?Sized,
{
    if resource.owner() == acting_user {
        Ok(())
    } else {
        Err(OwnershipError::Forbidden {
            owner: resource.owner().to_string(),
            acting_user: acting_user.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::blog::models::BlogId;
    use crate::domain::blog::models::BlogTitle;
    use crate::domain::tag::TagSet;

    fn post_by(author: &str) -> BlogPost {
        BlogPost {
            id: BlogId::new(),
            title: BlogTitle::new("T".to_string()).unwrap(),
            content: "body".to_string(),
            author: Username::new(author.to_string()).unwrap(),
            tags: TagSet::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_passes() {
        let post = post_by("alice");
        let alice = Username::new("alice".to_string()).unwrap();

        assert_eq!(assert_owner(&post, &alice), Ok(()));
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let post = post_by("alice");
        let bob = Username::new("bob".to_string()).unwrap();

        assert_eq!(
            assert_owner(&post, &bob),
            Err(OwnershipError::Forbidden {
                owner: "alice".to_string(),
                acting_user: "bob".to_string(),
            })
        );
    }

    #[test]
    fn test_guard_through_trait_object() {
        let post = post_by("alice");
        let resource: &dyn Owned = &post;
        let bob = Username::new("bob".to_string()).unwrap();

        assert!(assert_owner(resource, &bob).is_err());
    }
}
