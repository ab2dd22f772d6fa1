//! Feedline - drive a comment overlay session from the terminal

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use feedline::comments::signals::{drain, SignalReceiver};
use feedline::{ClientConfig, Comment, CommentSession, HttpCommentApi, SessionContext, ViewSignal, Viewer};

const ENV_USER_ID: &str = "FEEDLINE_USER_ID";
const ENV_USERNAME: &str = "FEEDLINE_USERNAME";

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG=debug for verbose output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = parse_args()?;
    match command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("feedline {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let config = ClientConfig::from_env().context("Failed to read API configuration")?;
    let api = HttpCommentApi::new(config).context("Failed to build HTTP client")?;
    let (session, mut signals) = CommentSession::new(Arc::new(api), session_context());

    let result = run(&session, &mut signals, command).await;

    session.close();
    session.exit_finished();
    report_signals(&mut signals);
    result
}

/// CLI commands
enum Command {
    List {
        post_id: String,
        json: bool,
    },
    Post {
        post_id: String,
        text: String,
    },
    Reply {
        post_id: String,
        comment_id: String,
        text: String,
    },
    Delete {
        post_id: String,
        comment_id: String,
    },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    let Some(command) = args.get(1) else {
        return Ok(Command::Help);
    };
    let arg = |index: usize, what: &str| {
        args.get(index)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Missing {what}\nRun 'feedline --help' for usage"))
    };

    match command.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "list" | "ls" => Ok(Command::List {
            post_id: arg(2, "post id")?,
            json: args.iter().skip(3).any(|a| a == "--json"),
        }),

        "post" => {
            let post_id = arg(2, "post id")?;
            arg(3, "comment text")?;
            Ok(Command::Post {
                post_id,
                text: args[3..].join(" "),
            })
        }

        "reply" => {
            let post_id = arg(2, "post id")?;
            let comment_id = arg(3, "comment id")?;
            arg(4, "reply text")?;
            Ok(Command::Reply {
                post_id,
                comment_id,
                text: args[4..].join(" "),
            })
        }

        "delete" | "rm" => Ok(Command::Delete {
            post_id: arg(2, "post id")?,
            comment_id: arg(3, "comment id")?,
        }),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'feedline --help' for usage"
        )),
    }
}

fn print_help() {
    println!(
        r#"Feedline - comment overlay client

USAGE:
    feedline [COMMAND]

COMMANDS:
    list <post-id> [--json]                 Show the comments of a post
    post <post-id> <text>                   Add a top-level comment
    reply <post-id> <comment-id> <text>     Reply to a comment
    delete <post-id> <comment-id>           Delete one of your comments

OPTIONS:
    -h, --help                              Show this help message
    -v, --version                           Show version information

ENVIRONMENT:
    FEEDLINE_API_URL                        API base URL (required)
    FEEDLINE_TOKEN                          Bearer token
    FEEDLINE_TIMEOUT_SECS                   Request timeout (default: 30)
    FEEDLINE_USER_ID, FEEDLINE_USERNAME     Signed-in viewer
    RUST_LOG                                Log filter (default: warn)
"#
    );
}

fn session_context() -> SessionContext {
    match (std::env::var(ENV_USER_ID), std::env::var(ENV_USERNAME)) {
        (Ok(id), username) => SessionContext::new(Viewer::new(id, username.unwrap_or_default())),
        _ => SessionContext::anonymous(),
    }
}

async fn run(session: &CommentSession, signals: &mut SignalReceiver, command: Command) -> Result<()> {
    match command {
        Command::List { post_id, json } => {
            open(session, &post_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            } else {
                print_thread(session, &session.comments(), 0);
            }
        }

        Command::Post { post_id, text } => {
            open(session, &post_id).await?;
            session.set_draft(&text);
            let comment = session.submit().await.context("Failed to post comment")?;
            println!("✓ Posted {}", comment.id);
        }

        Command::Reply {
            post_id,
            comment_id,
            text,
        } => {
            open(session, &post_id).await?;
            let target = find(&session.comments(), &comment_id)
                .cloned()
                .with_context(|| format!("No comment {comment_id} on {post_id}"))?;

            let username = target.author.username.clone();
            session.begin_reply(target, Some(&username));
            session.set_draft(&format!("{}{}", session.draft(), text));
            let reply = session.submit().await.context("Failed to post reply")?;
            println!("✓ Replied {} to {}", reply.id, comment_id);
        }

        Command::Delete {
            post_id,
            comment_id,
        } => {
            open(session, &post_id).await?;
            session
                .delete_comment(&comment_id)
                .await
                .context("Failed to delete comment")?;
            println!("✓ Deleted {}", comment_id);
        }

        Command::Help | Command::Version => {}
    }

    report_signals(signals);
    Ok(())
}

async fn open(session: &CommentSession, post_id: &str) -> Result<()> {
    session
        .set_visibility(true, post_id)
        .await
        .with_context(|| format!("Failed to load comments for {post_id}"))?;
    session.entrance_finished();
    Ok(())
}

fn find<'a>(comments: &'a [Comment], id: &str) -> Option<&'a Comment> {
    comments
        .iter()
        .find_map(|c| if c.id == id { Some(c) } else { find(&c.replies, id) })
}

fn print_thread(session: &CommentSession, comments: &[Comment], depth: usize) {
    if comments.is_empty() && depth == 0 {
        println!("No comments yet");
        return;
    }
    for comment in comments {
        let own = if session.can_delete(comment) { " (you)" } else { "" };
        println!(
            "{:indent$}[{}] @{}{}: {}  ♥ {}",
            "",
            comment.id,
            comment.author.label(),
            own,
            comment.content,
            comment.like_count,
            indent = depth * 2
        );
        print_thread(session, &comment.replies, depth + 1);
    }
}

fn report_signals(signals: &mut SignalReceiver) {
    for signal in drain(signals) {
        match signal {
            ViewSignal::Notice(text) => eprintln!("note: {}", text),
            other => tracing::debug!("View signal: {:?}", other),
        }
    }
}
