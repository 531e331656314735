use std::{fmt, fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Editor, InquireError, Select};
use owo_colors::OwoColorize;
use session::{Notice, Notices, Session};

use crate::api::{FeedApi, FeedClient};
use crate::cli::{Args, Command};
use crate::controller::FeedController;
use crate::models::{LikeLabel, PostId, PostSnapshot};
use crate::settings::merge_settings_with_args;
use crate::view::{PostCard, PostMode, render_feed, render_post};

enum FeedChoice {
    Post(PostId, String),
    Quit,
}

impl fmt::Display for FeedChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedChoice::Post(id, preview) => write!(f, "#{id} {preview}"),
            FeedChoice::Quit => write!(f, "Quit"),
        }
    }
}

#[derive(Clone, Copy)]
enum PostAction {
    ToggleLike(LikeLabel),
    Edit,
    ChangeDraft,
    Save,
    CancelEdit,
    Back,
}

impl fmt::Display for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostAction::ToggleLike(label) => write!(f, "{label}"),
            PostAction::Edit => write!(f, "Edit"),
            PostAction::ChangeDraft => write!(f, "Change draft"),
            PostAction::Save => write!(f, "Save"),
            PostAction::CancelEdit => write!(f, "Cancel edit"),
            PostAction::Back => write!(f, "Back"),
        }
    }
}

pub async fn run(args: Args) -> Result<()> {
    let args = merge_settings_with_args(&args)?;
    let client = FeedClient::new(Session::new(&args.server.session_config())?);

    match args.command {
        Command::Feed { snapshot } => {
            let posts = read_snapshot(&snapshot)?;
            let mut controller = FeedController::new(client, posts, args.reconcile);
            feed_loop(&mut controller).await?;
        }
        Command::Follow { username } => {
            let mut controller = FeedController::new(client, Vec::new(), args.reconcile);
            let progress = spinner(format!("Following {username}..."));
            let result = controller.follow(&username).await;
            progress.finish_and_clear();
            result?;
            print_notices(controller.notices_mut());
        }
        Command::Unfollow { username } => {
            let mut controller = FeedController::new(client, Vec::new(), args.reconcile);
            let progress = spinner(format!("Unfollowing {username}..."));
            let result = controller.unfollow(&username).await;
            progress.finish_and_clear();
            result?;
            print_notices(controller.notices_mut());
        }
        Command::Post { message } => {
            let mut controller = FeedController::new(client, Vec::new(), args.reconcile);
            let progress = spinner("Posting...".to_string());
            let result = controller.new_post(&message).await;
            progress.finish_and_clear();
            result?;
            print_notices(controller.notices_mut());
        }
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Vec<PostSnapshot>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse feed snapshot {}", path.display()))
}

async fn feed_loop<A>(controller: &mut FeedController<A>) -> Result<()>
where
    A: FeedApi + Send + Sync + 'static,
{
    if controller.posts().is_empty() {
        println!("{} No posts.", "ℹ".blue());
        return Ok(());
    }

    loop {
        controller.poll_background().await;
        print_notices(controller.notices_mut());
        println!("\n{}\n", render_feed(controller.posts()));

        let step = feed_step(controller).await;

        match step {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => match e.downcast_ref::<InquireError>() {
                Some(InquireError::OperationInterrupted) => break,
                Some(InquireError::OperationCanceled) => {}
                _ => controller.notices_mut().push(Notice::error(format!("{e:#}"))),
            },
        }
    }

    let progress = spinner(format!("Saving {} edit(s)...", controller.pending_edits()));
    controller.reconcile().await;
    progress.finish_and_clear();
    print_notices(controller.notices_mut());

    Ok(())
}

/// Runs one user action; `false` means the user is done.
async fn feed_step<A>(controller: &mut FeedController<A>) -> Result<bool>
where
    A: FeedApi + Send + Sync + 'static,
{
    let mut options: Vec<FeedChoice> = controller
        .posts()
        .iter()
        .map(|post| FeedChoice::Post(post.id, preview(post)))
        .collect();
    options.push(FeedChoice::Quit);

    let id = match Select::new("Post", options).with_page_size(15).prompt()? {
        FeedChoice::Post(id, _) => id,
        FeedChoice::Quit => return Ok(false),
    };

    let post = controller.post(id)?;
    println!("\n{}\n", render_post(post));

    let actions = match post.mode {
        PostMode::Display => vec![
            PostAction::ToggleLike(post.like_button),
            PostAction::Edit,
            PostAction::Back,
        ],
        PostMode::Editing { .. } => vec![
            PostAction::ChangeDraft,
            PostAction::Save,
            PostAction::CancelEdit,
            PostAction::Back,
        ],
    };

    match Select::new("Action", actions).prompt()? {
        PostAction::ToggleLike(_) => controller.toggle_like(id).await?,
        PostAction::Edit => {
            controller.enter_edit_mode(id)?;
            change_draft(controller, id)?;
        }
        PostAction::ChangeDraft => change_draft(controller, id)?,
        PostAction::Save => controller.save_edit(id)?,
        PostAction::CancelEdit => controller.cancel_edit(id)?,
        PostAction::Back => {}
    }

    Ok(true)
}

fn change_draft<A>(controller: &mut FeedController<A>, id: PostId) -> Result<()>
where
    A: FeedApi + Send + Sync + 'static,
{
    let current = match &controller.post(id)?.mode {
        PostMode::Editing { draft } => draft.clone(),
        PostMode::Display => return Ok(()),
    };

    let text = Editor::new("Post:")
        .with_predefined_text(&current)
        .with_file_extension(".txt")
        .prompt()?;

    controller.update_draft(id, text.trim_end().to_string())
}

fn preview(post: &PostCard) -> String {
    let first_line = post.message.lines().next().unwrap_or_default();
    let mut preview: String = first_line.chars().take(50).collect();
    if first_line.chars().count() > 50 || post.message.lines().count() > 1 {
        preview.push('…');
    }
    if post.is_editing() {
        preview.push_str(" (editing)");
    }
    preview
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_notices(notices: &mut Notices) {
    for notice in notices.drain() {
        println!("{notice}");
    }
}
