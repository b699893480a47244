//! Blog domain module: posts and the form used to write them.

pub mod post;

pub use post::{format_post_date, BlogPost, NewPost, PostContent, PostForm};
