use std::path::PathBuf;
use std::process;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;

use snoopdrop::browse::{AttachmentCursor, PostPager};
use snoopdrop::config::AppPaths;
use snoopdrop::errors::{DropError, Result};
use snoopdrop::export::{export_attachment, read_attachment};
use snoopdrop::storage::models::{Analytics, FileType, MAX_ATTACHMENTS, NewPost, Post};
use snoopdrop::storage::sqlite::SqliteStorage;
use snoopdrop::storage::{AnalyticsStorage, PostStorage};

#[derive(Parser)]
#[command(name = "snoopdrop", version, about = "Drop short media posts and track their views and likes")]
struct Cli {
    /// Output results as JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Database file to use instead of ~/.snoopdrop/snoopdrop.db
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a post
    Post {
        /// Author's user ID
        #[arg(short, long)]
        user: i64,

        /// Kind of media: Image, Video or Text
        #[arg(short = 't', long = "type", default_value = "Text", value_parser = parse_file_type)]
        file_type: FileType,

        /// Timestamp to record (defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// File to attach (up to three)
        #[arg(short, long = "attach")]
        attach: Vec<PathBuf>,

        /// Post description
        content: String,
    },

    /// List all posts
    List,

    /// Show a post and count a view
    Show {
        /// Post ID (defaults to the first post)
        id: Option<i64>,

        /// Which attachment to show, starting at 1
        #[arg(short, long, default_value = "1")]
        file: usize,
    },

    /// Like a post
    Like {
        /// Post ID
        id: i64,
    },

    /// Add a comment to a post
    Comment {
        /// Post ID
        id: i64,

        /// Comment text
        text: String,
    },

    /// Delete a post and its analytics
    Delete {
        /// Post ID
        id: i64,
    },

    /// Write a post's attachments to disk
    Export {
        /// Post ID
        id: i64,

        /// Target directory (defaults to ~/.snoopdrop/temp_files)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Create missing analytics rows
    Reconcile,
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_id: Option<i64>,
}

fn parse_file_type(s: &str) -> std::result::Result<FileType, String> {
    FileType::parse(s).ok_or_else(|| format!("unknown file type '{}' (expected Image, Video or Text)", s))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            eprintln!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut paths = AppPaths::new();
    if let Some(db) = cli.db {
        paths = paths.with_db_path(db);
    }
    let json = cli.json;

    match cli.command {
        None | Some(Commands::List) => cmd_list(&paths, json),
        Some(Commands::Post {
            user,
            file_type,
            date,
            attach,
            content,
        }) => cmd_post(&paths, user, file_type, date, &attach, content, json),
        Some(Commands::Show { id, file }) => cmd_show(&paths, id, file, json),
        Some(Commands::Like { id }) => cmd_like(&paths, id, json),
        Some(Commands::Comment { id, text }) => cmd_comment(&paths, id, &text, json),
        Some(Commands::Delete { id }) => cmd_delete(&paths, id, json),
        Some(Commands::Export { id, dir }) => {
            let dir = dir.unwrap_or_else(|| paths.export_dir.clone());
            cmd_export(&paths, id, &dir, json)
        }
        Some(Commands::Reconcile) => cmd_reconcile(&paths, json),
    }
}

fn open_storage(paths: &AppPaths) -> Result<SqliteStorage> {
    if let Some(parent) = paths.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    SqliteStorage::open(&paths.db_path)
}

fn print_status(json: bool, success: bool, message: String, post_id: Option<i64>) {
    if json {
        let response = StatusResponse {
            success,
            message,
            post_id,
        };
        println!("{}", serde_json::json!(response));
    } else {
        println!("{}", message);
    }
}

fn not_found(id: i64) -> DropError {
    DropError::NotFound(format!("Post #{} not found", id))
}

fn cmd_post(
    paths: &AppPaths,
    user_id: i64,
    file_type: FileType,
    date: Option<String>,
    attach: &[PathBuf],
    content: String,
    json: bool,
) -> Result<()> {
    if attach.len() > MAX_ATTACHMENTS {
        return Err(DropError::InvalidInput(format!(
            "at most {} files can be attached",
            MAX_ATTACHMENTS
        )));
    }
    let attachments = attach
        .iter()
        .map(|path| read_attachment(path))
        .collect::<Result<Vec<_>>>()?;

    let storage = open_storage(paths)?;
    let post_id = storage.create_post(NewPost {
        user_id,
        content,
        date_time: date.unwrap_or_else(|| Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        file_type: file_type.as_str().to_string(),
        attachments,
    })?;

    print_status(json, true, format!("Dropped post #{}.", post_id), Some(post_id));
    Ok(())
}

fn cmd_list(paths: &AppPaths, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    let posts = storage.list_posts()?;

    if json {
        println!("{}", serde_json::json!(posts));
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }

    for post in &posts {
        print_post_row(post);
    }
    Ok(())
}

fn cmd_show(paths: &AppPaths, id: Option<i64>, file: usize, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    storage.ensure_all_have_analytics()?;

    let ids = storage.list_post_ids()?;
    let pager = match id {
        Some(id) if !ids.contains(&id) => return Err(not_found(id)),
        Some(id) => PostPager::with_position(ids, id),
        None => PostPager::new(ids),
    };
    let Some(post_id) = pager.current() else {
        print_status(json, false, "No posts yet.".into(), None);
        return Ok(());
    };

    let post = storage.get_post(post_id)?.ok_or_else(|| not_found(post_id))?;
    storage.increment_view(post_id)?;
    let analytics = storage.get_analytics(post_id)?.unwrap_or(Analytics {
        post_id,
        views: 0,
        likes: 0,
    });
    let attachments = storage.get_attachments(post_id)?;
    let cursor = AttachmentCursor::at(attachments.len(), file.saturating_sub(1));

    if json {
        println!(
            "{}",
            serde_json::json!({
                "post": post,
                "analytics": analytics,
                "attachments": attachments,
                "position": pager.position(),
                "total": pager.len(),
                "prev": pager.peek_prev(),
                "next": pager.peek_next(),
            })
        );
        return Ok(());
    }

    println!("Post:     #{} ({} of {})", post.post_id, pager.position(), pager.len());
    println!("User:     {}", post.user_id);
    println!("Date:     {}", post.date_time);
    println!("Type:     {}", post.file_type);
    println!("Views:    {}", analytics.views);
    println!("Likes:    {}", analytics.likes);
    match cursor.current() {
        Some(i) => {
            let attachment = &attachments[i];
            println!(
                "File:     {} of {}: {} ({})",
                i + 1,
                attachments.len(),
                attachment.name,
                format_bytes(attachment.content.len())
            );
        }
        None => println!("File:     No attached files"),
    }
    println!("─────────────────────────");
    println!("{}", post.content);

    let comments: Vec<&str> = post.comment_lines().collect();
    if !comments.is_empty() {
        println!("─────────────────────────");
        for comment in comments {
            println!("  {}", comment);
        }
    }

    let nav: Vec<String> = [("prev", pager.peek_prev()), ("next", pager.peek_next())]
        .into_iter()
        .filter_map(|(label, id)| id.map(|id| format!("{} #{}", label, id)))
        .collect();
    if !nav.is_empty() {
        println!("─────────────────────────");
        println!("{}", nav.join("  "));
    }
    Ok(())
}

fn cmd_like(paths: &AppPaths, id: i64, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    if !storage.increment_like(id)? {
        return Err(not_found(id));
    }
    let likes = storage.get_analytics(id)?.map(|a| a.likes).unwrap_or(0);
    print_status(json, true, format!("Liked post #{} ({} likes).", id, likes), Some(id));
    Ok(())
}

fn cmd_comment(paths: &AppPaths, id: i64, text: &str, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    if storage.get_post(id)?.is_none() {
        return Err(not_found(id));
    }
    let added = storage.append_comment(id, text)?;
    let message = if added {
        format!("Commented on post #{}.", id)
    } else {
        "Comment is empty, nothing added.".to_string()
    };
    print_status(json, added, message, Some(id));
    Ok(())
}

fn cmd_delete(paths: &AppPaths, id: i64, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    let found = storage.delete_post(id)?;
    let message = if found {
        format!("Post #{} and its files were smoked.", id)
    } else {
        format!("Post #{} not found.", id)
    };
    print_status(json, found, message, Some(id));
    Ok(())
}

fn cmd_export(paths: &AppPaths, id: i64, dir: &std::path::Path, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    if storage.get_post(id)?.is_none() {
        return Err(not_found(id));
    }
    let written = storage
        .get_attachments(id)?
        .iter()
        .map(|attachment| export_attachment(dir, attachment))
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::json!({ "post_id": id, "files": written }));
        return Ok(());
    }

    if written.is_empty() {
        println!("Post #{} has no attached files.", id);
    }
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_reconcile(paths: &AppPaths, json: bool) -> Result<()> {
    let storage = open_storage(paths)?;
    let added = storage.ensure_all_have_analytics()?;
    print_status(json, true, format!("Added {} missing analytics rows.", added), None);
    Ok(())
}

fn print_post_row(post: &Post) {
    let oneline = post.content.replace('\n', "\\n");
    let preview = if oneline.chars().count() > 50 {
        format!("{}...", oneline.chars().take(47).collect::<String>())
    } else {
        oneline
    };
    println!(
        "{:>4} u{:<5} {:<19} {:<5} {}",
        post.post_id, post.user_id, post.date_time, post.file_type, preview
    );
}

fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
