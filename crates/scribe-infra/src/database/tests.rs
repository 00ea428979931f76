#[cfg(test)]
mod tests {
    use crate::database::entity::{category, category_post, comment, post, user};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
        PostgresUserRepository,
    };
    use scribe_core::domain::{Category, Comment, Post};
    use scribe_core::error::RepoError;
    use crate::database::postgres_repositories;
    use scribe_core::ports::{BaseRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn user_row(id: i64, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_owned(),
            created: chrono::Utc::now().into(),
        }
    }

    fn affected(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: 1,
                created: now.into(),
                title: "Hello".to_owned(),
                body: "World".to_owned(),
                owner_id: 7,
            }]])
            .append_query_results(vec![vec![user_row(7, "alice")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(1).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.owner.id, 7);
        assert_eq!(post.owner.username, "alice");
        assert_eq!(post.created, now);
    }

    #[tokio::test]
    async fn test_find_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(42).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_comments_attaches_owners_in_row_order() {
        let now = chrono::Utc::now();
        let row = |id: i64, owner_id: i64| comment::Model {
            id,
            created: now.into(),
            body: format!("comment {id}"),
            owner_id,
            post_id: 1,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row(1, 2), row(2, 1)]])
            .append_query_results(vec![vec![user_row(1, "alice"), user_row(2, "bob")]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let comments: Vec<Comment> = repo.list().await.unwrap();
        let owners: Vec<&str> = comments.iter().map(|c| c.owner.username.as_str()).collect();
        assert_eq!(owners, vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_find_category_with_members() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: 3,
                name: "rust".to_owned(),
                owner_id: 1,
            }]])
            .append_query_results(vec![vec![user_row(1, "alice")]])
            .append_query_results(vec![vec![
                category_post::Model {
                    category_id: 3,
                    post_id: 4,
                },
                category_post::Model {
                    category_id: 3,
                    post_id: 9,
                },
            ]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let category: Category = repo.find_by_id(3).await.unwrap().unwrap();
        assert_eq!(category.name, "rust");
        assert_eq!(category.posts, vec![4, 9]);
        assert_eq!(category.owner.username, "alice");
    }

    #[tokio::test]
    async fn test_delete_post_runs_cascade() {
        // comments, memberships, post
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![affected(2), affected(1), affected(1)])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(BaseRepository::<Post, _, _>::delete(&repo, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![affected(0), affected(0), affected(0)])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, _, _>::delete(&repo, 1).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_user_runs_cascade() {
        // comments, memberships, categories, posts, user
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                affected(3),
                affected(2),
                affected(1),
                affected(2),
                affected(1),
            ])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        assert!(repo.delete(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_row(5, "carol")]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_username("carol").await.unwrap().unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.email, "carol@example.com");
    }

    #[tokio::test]
    async fn test_bundle_shares_one_connection() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_row(2, "bob")]])
            .append_query_results(vec![vec![post::Model {
                id: 4,
                created: now.into(),
                title: "Shared".to_owned(),
                body: String::new(),
                owner_id: 2,
            }]])
            .append_query_results(vec![vec![user_row(2, "bob")]])
            .into_connection();

        let db = Arc::new(db);
        let repos = postgres_repositories(&db);
        assert_eq!(Arc::strong_count(&db), 5);

        let user = repos.users.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(user.username, "bob");

        // Second repository reads from the same mock query queue
        let post = repos.posts.find_by_id(4).await.unwrap().unwrap();
        assert_eq!(post.owner.username, "bob");
    }
}
