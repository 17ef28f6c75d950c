pub mod models;
pub mod schema;
pub mod sqlite;

use crate::errors::Result;
use models::{Analytics, Attachment, NewPost, Post};

pub trait PostStorage {
    fn list_posts(&self) -> Result<Vec<Post>>;
    fn list_post_ids(&self) -> Result<Vec<i64>>;
    fn get_post(&self, post_id: i64) -> Result<Option<Post>>;
    fn create_post(&self, post: NewPost) -> Result<i64>;
    fn delete_post(&self, post_id: i64) -> Result<bool>;
    fn get_attachments(&self, post_id: i64) -> Result<Vec<Attachment>>;
    fn append_comment(&self, post_id: i64, text: &str) -> Result<bool>;
    fn get_comments(&self, post_id: i64) -> Result<Option<String>>;
}

pub trait AnalyticsStorage {
    fn get_analytics(&self, post_id: i64) -> Result<Option<Analytics>>;
    fn increment_view(&self, post_id: i64) -> Result<bool>;
    fn increment_like(&self, post_id: i64) -> Result<bool>;
    fn ensure_all_have_analytics(&self) -> Result<usize>;
}
