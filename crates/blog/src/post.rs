use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crudapps_core::form::{not_blank, required_url};
use crudapps_core::{DomainError, Entity, RecordId};

/// A stored blog post.
///
/// `date` is the display string captured at creation; edits never touch it.
/// `body` is rich HTML written by the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    pub id: RecordId,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

impl Entity for BlogPost {
    const TABLE: &'static str = "blog_post";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// The author-editable part of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

/// A post ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: PostContent,
    pub date: String,
}

/// Display format of post dates, e.g. "August 24, 2019".
pub fn format_post_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Create/edit form. Values are kept exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub subtitle: String,
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    #[validate(custom(function = "required_url"))]
    pub img_url: String,
    #[validate(custom(function = "not_blank"))]
    pub body: String,
}

impl PostForm {
    /// Pre-fill the form from a stored post (edit page).
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            img_url: post.img_url.clone(),
            body: post.body.clone(),
        }
    }

    pub fn into_content(self) -> Result<PostContent, DomainError> {
        self.validate()?;
        Ok(PostContent {
            title: self.title,
            subtitle: self.subtitle,
            body: self.body,
            author: self.author,
            img_url: self.img_url,
        })
    }
}
