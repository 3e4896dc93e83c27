//! Request and response bodies of the user and post endpoints.

use pagination::Paginated;
use schemas::{
    CreatePost, CreateUser, Post, PostWithAuthor, PostWithAuthorAndTags, UpdatePost, UpdateUser,
    User,
};

/// Body of `POST /users`.
pub type CreateUserRequest = CreateUser;
/// Body of `PATCH /users/{id}`.
pub type UpdateUserRequest = UpdateUser;
/// Answer to `POST /users`.
pub type CreateUserResponse = User;
/// Answer to `GET /users`.
pub type GetUsersResponse = Paginated<User>;

/// Body of `POST /posts`.
pub type CreatePostRequest = CreatePost;
/// Body of `PATCH /posts/{id}`.
pub type UpdatePostRequest = UpdatePost;
/// Answer to `POST /posts`.
pub type CreatePostResponse = Post;
/// Answer to `GET /posts`.
pub type GetPostsResponse = Paginated<PostWithAuthor>;
/// Answer to `GET /posts/{id}`.
pub type GetPostResponse = PostWithAuthorAndTags;
