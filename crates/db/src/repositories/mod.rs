//! Repository layer.

#![allow(missing_docs)]

pub mod post;
pub mod post_like;
pub mod user;

pub use post::PostRepository;
pub use post_like::PostLikeRepository;
pub use user::UserRepository;
