//! Business logic services.

#![allow(missing_docs)]

pub mod like;
pub mod post;
pub mod token;
pub mod user;

pub use like::LikeService;
pub use post::{CreatePostInput, PostBody, PostFilter, PostService, can_mutate};
pub use token::{Claims, TokenService};
pub use user::{
    ChangePasswordInput, LoginInput, RegisterInput, UpdateProfileInput, UserService,
};
