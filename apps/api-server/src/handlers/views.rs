//! Domain entities to wire representations.

use scribe_core::domain::{Category, Comment, Post, UserProfile};
use scribe_shared::dto::{CategoryResponse, CommentResponse, PostResponse, UserResponse};

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        body: post.body,
        owner: post.owner.username,
        created: post.created,
    }
}

pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        body: comment.body,
        owner: comment.owner.username,
        post: comment.post,
        created: comment.created,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        owner: category.owner.username,
        posts: category.posts,
    }
}

pub fn user(profile: UserProfile) -> UserResponse {
    UserResponse {
        id: profile.id,
        username: profile.username,
        posts: profile.posts,
        comments: profile.comments,
        categories: profile.categories,
    }
}

/// Map a list with one of the converters above.
pub fn many<T, R>(items: Vec<T>, view: fn(T) -> R) -> Vec<R> {
    items.into_iter().map(view).collect()
}
