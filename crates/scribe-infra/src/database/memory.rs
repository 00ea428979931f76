//! In-memory entity store - used when no database is configured, and in tests.
//!
//! All four repositories share one set of tables behind an async `RwLock`,
//! so a cascading delete is a single write-locked step.
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use scribe_core::Repositories;
use scribe_core::domain::{
    Category, CategoryId, Comment, CommentId, NewCategory, NewComment, NewPost, NewUser, Owner,
    Post, PostId, User, UserId,
};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};

struct PostRow {
    title: String,
    body: String,
    owner: UserId,
    created: DateTime<Utc>,
}

struct CommentRow {
    body: String,
    post: PostId,
    owner: UserId,
    created: DateTime<Utc>,
}

struct CategoryRow {
    name: String,
    owner: UserId,
}

#[derive(Default)]
struct Tables {
    next_id: BTreeMap<&'static str, i64>,
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, PostRow>,
    comments: BTreeMap<CommentId, CommentRow>,
    categories: BTreeMap<CategoryId, CategoryRow>,
    /// (category, post) pairs.
    memberships: BTreeSet<(CategoryId, PostId)>,
}

impl Tables {
    /// Next id for `table`, starting at 1.
    fn allocate(&mut self, table: &'static str) -> i64 {
        let next = self.next_id.entry(table).or_insert(0);
        *next += 1;
        *next
    }

    fn owner(&self, id: UserId) -> Result<Owner, RepoError> {
        self.users
            .get(&id)
            .map(Owner::from)
            .ok_or_else(|| RepoError::Constraint(format!("owner {id} does not exist")))
    }

    fn post(&self, id: PostId) -> Option<Post> {
        let row = self.posts.get(&id)?;
        Some(Post {
            id,
            title: row.title.clone(),
            body: row.body.clone(),
            owner: self.owner(row.owner).ok()?,
            created: row.created,
        })
    }

    fn comment(&self, id: CommentId) -> Option<Comment> {
        let row = self.comments.get(&id)?;
        Some(Comment {
            id,
            body: row.body.clone(),
            post: row.post,
            owner: self.owner(row.owner).ok()?,
            created: row.created,
        })
    }

    fn category(&self, id: CategoryId) -> Option<Category> {
        let row = self.categories.get(&id)?;
        Some(Category {
            id,
            name: row.name.clone(),
            owner: self.owner(row.owner).ok()?,
            posts: self
                .memberships
                .range((id, PostId::MIN)..=(id, PostId::MAX))
                .map(|&(_, post)| post)
                .collect(),
        })
    }

    /// Oldest first; ids break ties between equal timestamps.
    fn sorted_posts(&self, owner: Option<UserId>) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|(_, row)| owner.is_none_or(|o| row.owner == o))
            .filter_map(|(&id, _)| self.post(id))
            .collect();
        posts.sort_by_key(|p| (p.created, p.id));
        posts
    }

    fn sorted_comments(&self, owner: Option<UserId>) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|(_, row)| owner.is_none_or(|o| row.owner == o))
            .filter_map(|(&id, _)| self.comment(id))
            .collect();
        comments.sort_by_key(|c| (c.created, c.id));
        comments
    }

    fn sorted_categories(&self, owner: Option<UserId>) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|(_, row)| owner.is_none_or(|o| row.owner == o))
            .filter_map(|(&id, _)| self.category(id))
            .collect()
    }

    fn remove_post(&mut self, id: PostId) -> bool {
        if self.posts.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post != id);
        self.memberships.retain(|&(_, post)| post != id);
        true
    }

    fn remove_category(&mut self, id: CategoryId) -> bool {
        if self.categories.remove(&id).is_none() {
            return false;
        }
        self.memberships.retain(|&(category, _)| category != id);
        true
    }

    fn set_members(&mut self, category: CategoryId, posts: &[PostId]) -> Result<(), RepoError> {
        if let Some(missing) = posts.iter().find(|p| !self.posts.contains_key(*p)) {
            return Err(RepoError::Constraint(format!("post {missing} does not exist")));
        }
        self.memberships.retain(|&(c, _)| c != category);
        self.memberships
            .extend(posts.iter().map(|&post| (category, post)));
        Ok(())
    }
}

/// Shared in-memory tables. Hand out per-entity repositories with the
/// accessor methods or build a full [`Repositories`] bundle.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository(self.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository(self.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository(self.clone())
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.users()),
            posts: Arc::new(self.posts()),
            comments: Arc::new(self.comments()),
            categories: Arc::new(self.categories()),
        }
    }
}

pub struct InMemoryUserRepository(InMemoryStore);
pub struct InMemoryPostRepository(InMemoryStore);
pub struct InMemoryCommentRepository(InMemoryStore);
pub struct InMemoryCategoryRepository(InMemoryStore);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.0.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let user = User {
            id: tables.allocate("users"),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created: new.created,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let posts: Vec<PostId> = tables
            .posts
            .iter()
            .filter(|(_, p)| p.owner == id)
            .map(|(&pid, _)| pid)
            .collect();
        for post in posts {
            tables.remove_post(post);
        }

        let categories: Vec<CategoryId> = tables
            .categories
            .iter()
            .filter(|(_, c)| c.owner == id)
            .map(|(&cid, _)| cid)
            .collect();
        for category in categories {
            tables.remove_category(category);
        }

        tables.comments.retain(|_, c| c.owner != id);
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, PostId> for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.0.tables.read().await.sorted_posts(None))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Post>, RepoError> {
        Ok(self.0.tables.read().await.sorted_posts(Some(owner)))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.0.tables.read().await.post(id))
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.0.tables.write().await;
        let owner = tables.owner(new.owner)?;
        let id = tables.allocate("posts");
        tables.posts.insert(
            id,
            PostRow {
                title: new.title.clone(),
                body: new.body.clone(),
                owner: new.owner,
                created: new.created,
            },
        );

        Ok(Post {
            id,
            title: new.title,
            body: new.body,
            owner,
            created: new.created,
        })
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.tables.write().await;
        let row = tables.posts.get_mut(&entity.id).ok_or(RepoError::NotFound)?;
        row.title = entity.title;
        row.body = entity.body;

        tables.post(entity.id).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        if tables.remove_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

impl PostRepository for InMemoryPostRepository {}

#[async_trait]
impl BaseRepository<Comment, NewComment, CommentId> for InMemoryCommentRepository {
    async fn list(&self) -> Result<Vec<Comment>, RepoError> {
        Ok(self.0.tables.read().await.sorted_comments(None))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, RepoError> {
        Ok(self.0.tables.read().await.sorted_comments(Some(owner)))
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        Ok(self.0.tables.read().await.comment(id))
    }

    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.0.tables.write().await;
        let owner = tables.owner(new.owner)?;
        if !tables.posts.contains_key(&new.post) {
            return Err(RepoError::Constraint(format!("post {} does not exist", new.post)));
        }

        let id = tables.allocate("comments");
        tables.comments.insert(
            id,
            CommentRow {
                body: new.body.clone(),
                post: new.post,
                owner: new.owner,
                created: new.created,
            },
        );

        Ok(Comment {
            id,
            body: new.body,
            post: new.post,
            owner,
            created: new.created,
        })
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.0.tables.write().await;
        if !tables.posts.contains_key(&entity.post) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                entity.post
            )));
        }
        let row = tables
            .comments
            .get_mut(&entity.id)
            .ok_or(RepoError::NotFound)?;
        row.body = entity.body;
        row.post = entity.post;

        tables.comment(entity.id).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        match tables.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

impl CommentRepository for InMemoryCommentRepository {}

#[async_trait]
impl BaseRepository<Category, NewCategory, CategoryId> for InMemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.0.tables.read().await.sorted_categories(None))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Category>, RepoError> {
        Ok(self.0.tables.read().await.sorted_categories(Some(owner)))
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepoError> {
        Ok(self.0.tables.read().await.category(id))
    }

    async fn insert(&self, new: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.0.tables.write().await;
        tables.owner(new.owner)?;
        if let Some(missing) = new.posts.iter().find(|p| !tables.posts.contains_key(*p)) {
            return Err(RepoError::Constraint(format!("post {missing} does not exist")));
        }

        let id = tables.allocate("categories");
        tables.categories.insert(
            id,
            CategoryRow {
                name: new.name,
                owner: new.owner,
            },
        );
        tables.set_members(id, &new.posts)?;

        tables.category(id).ok_or(RepoError::NotFound)
    }

    async fn update(&self, entity: Category) -> Result<Category, RepoError> {
        let mut tables = self.0.tables.write().await;
        if !tables.categories.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.set_members(entity.id, &entity.posts)?;
        if let Some(row) = tables.categories.get_mut(&entity.id) {
            row.name = entity.name;
        }

        tables.category(entity.id).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        if tables.remove_category(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

impl CategoryRepository for InMemoryCategoryRepository {}
