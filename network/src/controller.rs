use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use session::{BackgroundTasks, Notice, Notices, TaskOutcome};

use crate::api::FeedApi;
use crate::models::{PostEdit, PostId, PostSnapshot, ReconcilePolicy};
use crate::view::{PostCard, PostMode};

/// An edit that was applied on screen before the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub post: PostId,
    /// Increases with every saved edit, across all posts.
    pub seq: u64,
    pub submitted: String,
}

/// What the server is known to hold for a post and which edit is on screen.
///
/// Sequence 0 stands for the text the post had before its first edit.
#[derive(Debug)]
struct EditHistory {
    confirmed_seq: u64,
    confirmed: String,
    shown_seq: u64,
}

impl EditHistory {
    fn new(confirmed: String) -> Self {
        Self {
            confirmed_seq: 0,
            confirmed,
            shown_seq: 0,
        }
    }
}

/// Keeps the per-post state of a feed page.
///
/// Likes wait for the server and then adjust the count locally by one; the
/// count is never fetched again. Edits are shown at once and sent in the
/// background; [`FeedController::reconcile`] settles them according to the
/// configured [`ReconcilePolicy`].
pub struct FeedController<A> {
    api: Arc<A>,
    posts: Vec<PostCard>,
    edits: BackgroundTasks<PendingEdit>,
    history: HashMap<PostId, EditHistory>,
    next_seq: u64,
    policy: ReconcilePolicy,
    notices: Notices,
}

impl<A> FeedController<A>
where
    A: FeedApi + Send + Sync + 'static,
{
    pub fn new(api: A, posts: Vec<PostSnapshot>, policy: ReconcilePolicy) -> Self {
        Self::with_shared_api(Arc::new(api), posts, policy)
    }

    pub fn with_shared_api(api: Arc<A>, posts: Vec<PostSnapshot>, policy: ReconcilePolicy) -> Self {
        Self {
            api,
            posts: posts.into_iter().map(PostCard::from).collect(),
            edits: BackgroundTasks::new(),
            history: HashMap::new(),
            next_seq: 1,
            policy,
            notices: Notices::default(),
        }
    }

    pub fn posts(&self) -> &[PostCard] {
        &self.posts
    }

    pub fn post(&self, id: PostId) -> Result<&PostCard> {
        self.posts
            .iter()
            .find(|post| post.id == id)
            .ok_or_else(|| anyhow::anyhow!("post {id} is not on this page"))
    }

    fn post_mut(&mut self, id: PostId) -> Result<&mut PostCard> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| anyhow::anyhow!("post {id} is not on this page"))
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn pending_edits(&self) -> usize {
        self.edits.pending()
    }

    pub async fn toggle_like(&mut self, id: PostId) -> Result<()> {
        let label = self.post(id)?.like_button;

        let response = if label.is_liked() {
            self.api.unlike(id).await
        } else {
            self.api.like(id).await
        }
        .with_context(|| format!("Failed to {} post {id}", label.as_str().to_lowercase()))?;

        info!("{}", response.message);

        let post = self.post_mut(id)?;
        post.like_button = label.toggled();
        post.like_count += if label.is_liked() { -1 } else { 1 };

        Ok(())
    }

    pub fn enter_edit_mode(&mut self, id: PostId) -> Result<()> {
        let post = self.post_mut(id)?;
        if !post.is_editing() {
            post.mode = PostMode::Editing {
                draft: post.message.clone(),
            };
        }
        Ok(())
    }

    pub fn update_draft(&mut self, id: PostId, text: impl Into<String>) -> Result<()> {
        match &mut self.post_mut(id)?.mode {
            PostMode::Editing { draft } => {
                *draft = text.into();
                Ok(())
            }
            PostMode::Display => anyhow::bail!("post {id} is not being edited"),
        }
    }

    pub fn cancel_edit(&mut self, id: PostId) -> Result<()> {
        self.post_mut(id)?.mode = PostMode::Display;
        Ok(())
    }

    /// Shows the draft as the post's message right away, then sends it.
    pub fn save_edit(&mut self, id: PostId) -> Result<()> {
        let api = Arc::clone(&self.api);
        let seq = self.next_seq;
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| anyhow::anyhow!("post {id} is not on this page"))?;

        let PostMode::Editing { draft } = &post.mode else {
            anyhow::bail!("post {id} is not being edited");
        };
        let submitted = draft.clone();

        let previous = std::mem::replace(&mut post.message, submitted.clone());
        post.mode = PostMode::Display;

        self.next_seq += 1;
        self.history
            .entry(id)
            .or_insert_with(|| EditHistory::new(previous))
            .shown_seq = seq;

        let edit = PostEdit {
            message: submitted.clone(),
        };
        self.edits.spawn(
            PendingEdit {
                post: id,
                seq,
                submitted,
            },
            async move {
                let response = api.edit_post(id, &edit).await?;
                info!("{}", response.message);
                Ok(())
            },
        );

        Ok(())
    }

    /// Applies the outcome of edits that already finished.
    pub async fn poll_background(&mut self) {
        let outcomes = self.edits.take_finished().await;
        self.apply(outcomes);
    }

    /// Waits for every edit still in flight and applies the outcomes.
    pub async fn reconcile(&mut self) {
        let outcomes = self.edits.settle().await;
        self.apply(outcomes);
    }

    fn apply(&mut self, outcomes: Vec<TaskOutcome<PendingEdit>>) {
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Completed(edit) => {
                    debug!("post {} saved", edit.post);
                    self.confirm(edit);
                }
                TaskOutcome::Cancelled(edit) => debug!("edit of post {} cancelled", edit.post),
                TaskOutcome::Failed(edit, e) => {
                    self.notices
                        .push(Notice::error(format!("Failed to save post {}: {e:#}", edit.post)));

                    if self.policy == ReconcilePolicy::Rollback {
                        self.roll_back(edit);
                    }
                }
            }
        }
    }

    fn confirm(&mut self, edit: PendingEdit) {
        let Some(history) = self.history.get_mut(&edit.post) else {
            return;
        };
        if edit.seq < history.confirmed_seq {
            return;
        }
        history.confirmed_seq = edit.seq;
        history.confirmed = edit.submitted;

        // The screen was rolled back past this edit before it landed.
        if history.shown_seq < edit.seq {
            history.shown_seq = edit.seq;
            if let Some(post) = self.posts.iter_mut().find(|post| post.id == edit.post) {
                post.message = history.confirmed.clone();
            }
        }
    }

    /// Restores the last confirmed text, unless a later edit is on screen.
    fn roll_back(&mut self, edit: PendingEdit) {
        let Some(history) = self.history.get_mut(&edit.post) else {
            return;
        };
        if history.shown_seq != edit.seq {
            return;
        }
        history.shown_seq = history.confirmed_seq;

        if let Some(post) = self.posts.iter_mut().find(|post| post.id == edit.post) {
            post.message = history.confirmed.clone();
            self.notices
                .push(Notice::warn(format!("Post {} restored", edit.post)));
        }
    }

    pub async fn follow(&mut self, username: &str) -> Result<()> {
        self.api
            .follow(username)
            .await
            .with_context(|| format!("Failed to follow {username}"))?;
        self.notices.push(Notice::info(format!("Following {username}")));
        Ok(())
    }

    pub async fn unfollow(&mut self, username: &str) -> Result<()> {
        self.api
            .unfollow(username)
            .await
            .with_context(|| format!("Failed to unfollow {username}"))?;
        self.notices.push(Notice::info(format!("Unfollowed {username}")));
        Ok(())
    }

    pub async fn new_post(&mut self, message: &str) -> Result<()> {
        self.api
            .new_post(message)
            .await
            .context("Failed to create post")?;
        self.notices.push(Notice::info("Post created"));
        Ok(())
    }
}
