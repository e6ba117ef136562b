use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use chrono::Utc;

use crate::domain::blog::errors::BlogError;
use crate::domain::blog::guard::assert_owner;
use crate::domain::blog::models::BlogId;
use crate::domain::blog::models::BlogPost;
use crate::domain::blog::models::BlogTitle;
use crate::domain::blog::models::CreateBlogCommand;
use crate::domain::blog::models::ListBlogsQuery;
use crate::domain::blog::models::UpdateBlogCommand;
use crate::domain::blog::ports::BlogRepository;
use crate::domain::blog::ports::BlogServicePort;
use crate::domain::user::models::Username;

/// Domain service for blog posts.
///
/// Mutations look the post up first, then run the ownership guard, then write.
pub struct BlogService<BR>
where
    BR: BlogRepository,
{
    repository: Arc<BR>,
}

impl<BR> BlogService<BR>
where
    BR: BlogRepository,
{
    pub fn new(repository: Arc<BR>) -> Self {
        Self { repository }
    }

    async fn find_owned(
        &self,
        title: &BlogTitle,
        acting_user: &Username,
    ) -> Result<BlogPost, BlogError> {
        let post = self
            .repository
            .find_by_title(title)
            .await?
            .ok_or_else(|| BlogError::NotFound(title.to_string()))?;

        assert_owner(&post, acting_user).map_err(|e| {
            tracing::warn!(
                title = %title,
                acting_user = %acting_user,
                "Rejected mutation by non-author"
            );
            BlogError::from(e)
        })?;

        Ok(post)
    }
}

#[async_trait]
impl<BR> BlogServicePort for BlogService<BR>
where
    BR: BlogRepository,
{
    async fn create_blog(
        &self,
        command: CreateBlogCommand,
        author: Username,
    ) -> Result<BlogPost, BlogError> {
        let post = BlogPost {
            id: BlogId::new(),
            title: command.title,
            content: command.content,
            author,
            tags: command.tags,
            created_at: Utc::now().trunc_subsecs(6),
        };

        let created = self.repository.create(post).await?;

        tracing::info!(
            blog_id = %created.id,
            title = %created.title,
            author = %created.author,
            "Blog created"
        );

        Ok(created)
    }

    async fn list_blogs(&self, query: ListBlogsQuery) -> Result<Vec<BlogPost>, BlogError> {
        self.repository.list(&query).await
    }

    async fn get_blog(&self, title: &BlogTitle) -> Result<BlogPost, BlogError> {
        self.repository
            .find_by_title(title)
            .await?
            .ok_or_else(|| BlogError::NotFound(title.to_string()))
    }

    async fn update_blog(
        &self,
        title: &BlogTitle,
        command: UpdateBlogCommand,
        acting_user: &Username,
    ) -> Result<BlogPost, BlogError> {
        let post = self.find_owned(title, acting_user).await?;

        let updated = self.repository.update(command.apply_to(post)).await?;

        tracing::info!(blog_id = %updated.id, title = %updated.title, "Blog updated");

        Ok(updated)
    }

    async fn delete_blog(
        &self,
        title: &BlogTitle,
        acting_user: &Username,
    ) -> Result<(), BlogError> {
        let post = self.find_owned(title, acting_user).await?;

        self.repository.delete(&post.id, &post.author).await?;

        tracing::info!(blog_id = %post.id, title = %title, "Blog deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::blog::guard::OwnershipError;
    use crate::domain::tag::parse_tags;
    use crate::domain::tag::TagSet;

    mock! {
        pub TestBlogRepository {}

        #[async_trait]
        impl BlogRepository for TestBlogRepository {
            async fn create(&self, post: BlogPost) -> Result<BlogPost, BlogError>;
            async fn find_by_title(&self, title: &BlogTitle) -> Result<Option<BlogPost>, BlogError>;
            async fn list(&self, query: &ListBlogsQuery) -> Result<Vec<BlogPost>, BlogError>;
            async fn update(&self, post: BlogPost) -> Result<BlogPost, BlogError>;
            async fn delete(&self, id: &BlogId, author: &Username) -> Result<(), BlogError>;
        }
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn title(value: &str) -> BlogTitle {
        BlogTitle::new(value.to_string()).unwrap()
    }

    fn post(value: &str, author: &str) -> BlogPost {
        BlogPost {
            id: BlogId::new(),
            title: title(value),
            content: "body".to_string(),
            author: username(author),
            tags: TagSet::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_sets_author_from_caller() {
        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_create()
            .withf(|post| post.author.as_str() == "alice" && post.title.as_str() == "T")
            .times(1)
            .returning(|post| Ok(post));

        let service = BlogService::new(Arc::new(repository));

        let command = CreateBlogCommand {
            title: title("T"),
            content: "hello".to_string(),
            tags: parse_tags(vec!["rust".to_string()]).unwrap(),
        };

        let created = service.create_blog(command, username("alice")).await.unwrap();
        assert_eq!(created.author.as_str(), "alice");
        assert_eq!(created.content, "hello");
        assert_eq!(created.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_title() {
        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|post| Err(BlogError::TitleAlreadyExists(post.title.to_string())));

        let service = BlogService::new(Arc::new(repository));

        let command = CreateBlogCommand {
            title: title("T"),
            content: "hello".to_string(),
            tags: TagSet::new(),
        };

        let result = service.create_blog(command, username("alice")).await;
        assert!(matches!(
            result.unwrap_err(),
            BlogError::TitleAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_missing_blog() {
        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_find_by_title()
            .times(1)
            .returning(|_| Ok(None));

        let service = BlogService::new(Arc::new(repository));

        let result = service.get_blog(&title("T")).await;
        assert!(matches!(result.unwrap_err(), BlogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_passes_query_through() {
        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_list()
            .withf(|query| query.limit == 20 && query.offset == 0)
            .times(1)
            .returning(|_| Ok(vec![post("A", "alice"), post("B", "bob")]));

        let service = BlogService::new(Arc::new(repository));

        let posts = service.list_blogs(ListBlogsQuery::default()).await.unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_update_by_author() {
        let existing = post("T", "alice");

        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_find_by_title()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|post| post.content == "edited" && post.author.as_str() == "alice")
            .times(1)
            .returning(|post| Ok(post));

        let service = BlogService::new(Arc::new(repository));

        let command = UpdateBlogCommand {
            content: Some("edited".to_string()),
            ..Default::default()
        };

        let updated = service
            .update_blog(&title("T"), command, &username("alice"))
            .await
            .unwrap();
        assert_eq!(updated.content, "edited");
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let existing = post("T", "alice");

        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_find_by_title()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_update().times(0);

        let service = BlogService::new(Arc::new(repository));

        let command = UpdateBlogCommand {
            content: Some("hijacked".to_string()),
            ..Default::default()
        };

        let result = service
            .update_blog(&title("T"), command, &username("bob"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            BlogError::Forbidden(OwnershipError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_blog_is_not_found_before_ownership() {
        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_find_by_title()
            .times(2)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);
        repository.expect_delete().times(0);

        let service = BlogService::new(Arc::new(repository));

        let update = service
            .update_blog(&title("T"), UpdateBlogCommand::default(), &username("bob"))
            .await;
        assert!(matches!(update.unwrap_err(), BlogError::NotFound(_)));

        let delete = service.delete_blog(&title("T"), &username("bob")).await;
        assert!(matches!(delete.unwrap_err(), BlogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_by_author() {
        let existing = post("T", "alice");
        let id = existing.id;

        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_find_by_title()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_delete()
            .withf(move |blog_id, author| *blog_id == id && author.as_str() == "alice")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = BlogService::new(Arc::new(repository));

        let result = service.delete_blog(&title("T"), &username("alice")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_forbidden() {
        let existing = post("T", "alice");

        let mut repository = MockTestBlogRepository::new();
        repository
            .expect_find_by_title()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_delete().times(0);

        let service = BlogService::new(Arc::new(repository));

        let result = service.delete_blog(&title("T"), &username("bob")).await;
        assert!(matches!(result.unwrap_err(), BlogError::Forbidden(_)));
    }
}
