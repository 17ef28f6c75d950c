pub const CREATE_POSTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS Posts (
        post_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        file_type TEXT NOT NULL,
        content TEXT NOT NULL,
        post_DateTime TEXT NOT NULL,
        file_name_1 TEXT,
        file_content_1 BLOB,
        file_name_2 TEXT,
        file_content_2 BLOB,
        file_name_3 TEXT,
        file_content_3 BLOB,
        comments TEXT
    )
";

// `comments` stays for on-disk compatibility; nothing reads or writes it.
pub const CREATE_ANALYTICS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS Analytics (
        post_id INTEGER PRIMARY KEY,
        views INTEGER NOT NULL DEFAULT 0,
        likes INTEGER NOT NULL DEFAULT 0,
        comments TEXT,
        FOREIGN KEY (post_id) REFERENCES Posts(post_id)
    )
";
