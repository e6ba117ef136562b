use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::blog::errors::BlogError;
use crate::domain::blog::models::BlogId;
use crate::domain::blog::models::BlogPost;
use crate::domain::blog::models::BlogSortField;
use crate::domain::blog::models::BlogTitle;
use crate::domain::blog::models::ListBlogsQuery;
use crate::domain::blog::models::SortOrder;
use crate::domain::blog::ports::BlogRepository;
use crate::domain::tag::TagSet;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local credential store keyed by username.
///
/// Each operation touches a single map entry under its shard lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify<F>(&self, username: &Username, f: F) -> Result<User, UserError>
    where
        F: FnOnce(&mut User),
    {
        let mut user = self
            .users
            .get_mut(username.as_str())
            .ok_or_else(|| UserError::NotFound(username.to_string()))?;

        f(user.value_mut());

        Ok(user.value().clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        match self.users.entry(user.username.as_str().to_string()) {
            Entry::Occupied(_) => Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .get(username.as_str())
            .map(|user| user.value().clone()))
    }

    async fn update_profile(
        &self,
        username: &Username,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        self.modify(username, |user| {
            if let Some(email) = command.email {
                user.email = email;
            }
            if let Some(full_name) = command.full_name {
                user.full_name = Some(full_name);
            }
            if let Some(tags) = command.tags {
                user.tags = tags;
            }
        })
    }

    async fn add_tags(&self, username: &Username, tags: &TagSet) -> Result<User, UserError> {
        self.modify(username, |user| user.tags.extend(tags.iter().cloned()))
    }

    async fn remove_tags(&self, username: &Username, tags: &TagSet) -> Result<User, UserError> {
        self.modify(username, |user| user.tags.retain(|t| !tags.contains(t)))
    }
}

/// Process-local blog store with a unique title index.
///
/// Lock order is posts before titles; no path takes them the other way round.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    posts: DashMap<BlogId, BlogPost>,
    titles: DashMap<String, BlogId>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn compare(query: &ListBlogsQuery, a: &BlogPost, b: &BlogPost) -> Ordering {
        let ordering = match query.sort_by {
            BlogSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            BlogSortField::Title => a.title.as_str().cmp(b.title.as_str()),
        }
        .then_with(|| a.id.0.cmp(&b.id.0));

        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn create(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
        match self.titles.entry(post.title.as_str().to_string()) {
            Entry::Occupied(_) => return Err(BlogError::TitleAlreadyExists(post.title.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(post.id);
            }
        }

        self.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn find_by_title(&self, title: &BlogTitle) -> Result<Option<BlogPost>, BlogError> {
        let id = match self.titles.get(title.as_str()) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };

        Ok(self.posts.get(&id).map(|post| post.value().clone()))
    }

    async fn list(&self, query: &ListBlogsQuery) -> Result<Vec<BlogPost>, BlogError> {
        let mut posts: Vec<BlogPost> = self
            .posts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        posts.sort_by(|a, b| Self::compare(query, a, b));

        Ok(posts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn update(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
        let mut current = match self.posts.get_mut(&post.id) {
            Some(current) if current.author == post.author => current,
            _ => return Err(BlogError::NotFound(post.title.to_string())),
        };

        if current.title != post.title {
            match self.titles.entry(post.title.as_str().to_string()) {
                Entry::Occupied(_) => {
                    return Err(BlogError::TitleAlreadyExists(post.title.to_string()))
                }
                Entry::Vacant(slot) => {
                    slot.insert(post.id);
                }
            }
            self.titles
                .remove_if(current.title.as_str(), |_, id| *id == post.id);
        }

        *current.value_mut() = post.clone();

        Ok(post)
    }

    async fn delete(&self, id: &BlogId, author: &Username) -> Result<(), BlogError> {
        let (_, removed) = self
            .posts
            .remove_if(id, |_, post| &post.author == author)
            .ok_or_else(|| BlogError::NotFound(id.to_string()))?;

        self.titles
            .remove_if(removed.title.as_str(), |_, indexed| indexed == id);

        Ok(())
    }
}
