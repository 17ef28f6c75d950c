use serde::Serialize;

/// Number of attachment slots a post carries on disk.
pub const MAX_ATTACHMENTS: usize = 3;

/// Name written into unused attachment slots.
pub const EMPTY_SLOT_NAME: &str = "none.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Image,
    Video,
    Text,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "Image",
            FileType::Video => "Video",
            FileType::Text => "Text",
        }
    }

    pub fn parse(s: &str) -> Option<FileType> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Some(FileType::Image),
            "video" => Some(FileType::Video),
            "text" => Some(FileType::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub date_time: String,
    pub file_type: String,
    pub comments: String,
}

impl Post {
    pub fn comment_lines(&self) -> impl Iterator<Item = &str> {
        self.comments.lines().filter(|line| !line.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// A slot counts as filled only when both the name and the bytes are present.
    pub fn is_filled(&self) -> bool {
        !self.name.is_empty() && !self.content.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub content: String,
    pub date_time: String,
    pub file_type: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub post_id: i64,
    pub views: i64,
    pub likes: i64,
}
