//! PostgreSQL repository implementations.
//!
//! Cascades are explicit: every delete that has dependents runs its
//! dependent deletes and its own delete inside one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, TransactionTrait,
};

use scribe_core::domain::{
    Category, CategoryId, Comment, CommentId, NewCategory, NewComment, NewPost, NewUser, Post,
    PostId, User, UserId,
};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::category_post::{self, Entity as CategoryPostEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{
    PostgresBaseRepository, attach_owners, load_owner, load_owners, query_err, write_err,
};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(new)
            .insert(&*self.db)
            .await
            .map_err(write_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        let owned_posts = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::OwnerId.eq(id))
            .into_query();
        let owned_categories = CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::OwnerId.eq(id))
            .into_query();

        // Comments written by the user, and comments under the user's posts.
        CommentEntity::delete_many()
            .filter(
                Condition::any()
                    .add(comment::Column::OwnerId.eq(id))
                    .add(comment::Column::PostId.in_subquery(owned_posts.clone())),
            )
            .exec(&txn)
            .await
            .map_err(query_err)?;

        CategoryPostEntity::delete_many()
            .filter(
                Condition::any()
                    .add(category_post::Column::PostId.in_subquery(owned_posts))
                    .add(category_post::Column::CategoryId.in_subquery(owned_categories)),
            )
            .exec(&txn)
            .await
            .map_err(query_err)?;

        CategoryEntity::delete_many()
            .filter(category::Column::OwnerId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_err)?;

        PostEntity::delete_many()
            .filter(post::Column::OwnerId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_err)?;

        let result = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(query_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_err)?;
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, PostId> for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_asc(post::Column::Created)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        attach_owners(&*self.db, rows).await
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .filter(post::Column::OwnerId.eq(owner))
            .order_by_asc(post::Column::Created)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        attach_owners(&*self.db, rows).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let Some(row) = PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        let owner = load_owner(&*self.db, row.owner_id).await?;
        Ok(Some(row.into_domain(owner)))
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let owner = load_owner(&*self.db, new.owner).await?;
        let model = post::ActiveModel::from(new)
            .insert(&*self.db)
            .await
            .map_err(write_err)?;

        Ok(model.into_domain(owner))
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let owner = entity.owner.clone();
        let model = post::ActiveModel::from(entity)
            .update(&*self.db)
            .await
            .map_err(write_err)?;

        Ok(model.into_domain(owner))
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_err)?;

        CategoryPostEntity::delete_many()
            .filter(category_post::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_err)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(query_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_err)?;
        Ok(())
    }
}

impl PostRepository for PostgresPostRepository {}

#[async_trait]
impl BaseRepository<Comment, NewComment, CommentId> for PostgresCommentRepository {
    async fn list(&self) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        attach_owners(&*self.db, rows).await
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::OwnerId.eq(owner))
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        attach_owners(&*self.db, rows).await
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        let Some(row) = CommentEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        let owner = load_owner(&*self.db, row.owner_id).await?;
        Ok(Some(row.into_domain(owner)))
    }

    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let owner = load_owner(&*self.db, new.owner).await?;
        let model = comment::ActiveModel::from(new)
            .insert(&*self.db)
            .await
            .map_err(write_err)?;

        Ok(model.into_domain(owner))
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        let owner = entity.owner.clone();
        let model = comment::ActiveModel::from(entity)
            .update(&*self.db)
            .await
            .map_err(write_err)?;

        Ok(model.into_domain(owner))
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

impl CommentRepository for PostgresCommentRepository {}

/// Member post ids per category, ascending.
async fn load_members<C: ConnectionTrait>(
    db: &C,
    category_ids: Vec<CategoryId>,
) -> Result<HashMap<CategoryId, Vec<PostId>>, RepoError> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = CategoryPostEntity::find()
        .filter(category_post::Column::CategoryId.is_in(category_ids))
        .order_by_asc(category_post::Column::CategoryId)
        .order_by_asc(category_post::Column::PostId)
        .all(db)
        .await
        .map_err(query_err)?;

    let mut members: HashMap<CategoryId, Vec<PostId>> = HashMap::new();
    for row in rows {
        members.entry(row.category_id).or_default().push(row.post_id);
    }
    Ok(members)
}

/// Replace the membership rows of a category.
async fn write_members<C: ConnectionTrait>(
    db: &C,
    category_id: CategoryId,
    posts: &[PostId],
) -> Result<(), RepoError> {
    CategoryPostEntity::delete_many()
        .filter(category_post::Column::CategoryId.eq(category_id))
        .exec(db)
        .await
        .map_err(query_err)?;

    if posts.is_empty() {
        return Ok(());
    }

    let rows = posts.iter().map(|&post_id| category_post::ActiveModel {
        category_id: sea_orm::ActiveValue::Set(category_id),
        post_id: sea_orm::ActiveValue::Set(post_id),
    });
    CategoryPostEntity::insert_many(rows)
        .exec_without_returning(db)
        .await
        .map_err(write_err)?;

    Ok(())
}

/// Assemble domain categories from rows, keeping row order.
async fn assemble_categories<C: ConnectionTrait>(
    db: &C,
    rows: Vec<category::Model>,
) -> Result<Vec<Category>, RepoError> {
    let owners = load_owners(db, rows.iter().map(|r| r.owner_id)).await?;
    let mut members = load_members(db, rows.iter().map(|r| r.id).collect()).await?;

    rows.into_iter()
        .map(|row| {
            let owner = owners
                .get(&row.owner_id)
                .cloned()
                .ok_or_else(|| RepoError::Query(format!("dangling owner {}", row.owner_id)))?;
            Ok(Category {
                posts: members.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
                owner,
            })
        })
        .collect()
}

#[async_trait]
impl BaseRepository<Category, NewCategory, CategoryId> for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let rows = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        assemble_categories(&*self.db, rows).await
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Category>, RepoError> {
        let rows = CategoryEntity::find()
            .filter(category::Column::OwnerId.eq(owner))
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await
            .map_err(query_err)?;

        assemble_categories(&*self.db, rows).await
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepoError> {
        let Some(row) = CategoryEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        Ok(assemble_categories(&*self.db, vec![row]).await?.pop())
    }

    async fn insert(&self, new: NewCategory) -> Result<Category, RepoError> {
        let owner = load_owner(&*self.db, new.owner).await?;
        let txn = self.db.begin().await.map_err(query_err)?;

        let model = category::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: sea_orm::ActiveValue::Set(new.name),
            owner_id: sea_orm::ActiveValue::Set(new.owner),
        }
        .insert(&txn)
        .await
        .map_err(write_err)?;
        write_members(&txn, model.id, &new.posts).await?;

        txn.commit().await.map_err(query_err)?;

        Ok(Category {
            id: model.id,
            name: model.name,
            owner,
            posts: new.posts,
        })
    }

    async fn update(&self, entity: Category) -> Result<Category, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        category::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(entity.id),
            name: sea_orm::ActiveValue::Set(entity.name.clone()),
            owner_id: sea_orm::ActiveValue::NotSet,
        }
        .update(&txn)
        .await
        .map_err(write_err)?;
        write_members(&txn, entity.id, &entity.posts).await?;

        txn.commit().await.map_err(query_err)?;
        Ok(entity)
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        CategoryPostEntity::delete_many()
            .filter(category_post::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_err)?;

        let result = CategoryEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(query_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_err)?;
        Ok(())
    }
}

impl CategoryRepository for PostgresCategoryRepository {}
