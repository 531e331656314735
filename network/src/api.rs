use anyhow::Result;
use async_trait::async_trait;
use session::{Session, ensure_success};

use crate::models::{PostEdit, PostId, ServerMessage};

#[async_trait]
pub trait FeedApi {
    async fn like(&self, id: PostId) -> Result<ServerMessage>;
    async fn unlike(&self, id: PostId) -> Result<ServerMessage>;
    async fn edit_post(&self, id: PostId, edit: &PostEdit) -> Result<ServerMessage>;
    async fn follow(&self, username: &str) -> Result<()>;
    async fn unfollow(&self, username: &str) -> Result<()>;
    async fn new_post(&self, message: &str) -> Result<()>;
}

pub struct FeedClient {
    session: Session,
}

impl FeedClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    async fn get_message(&self, path: &str, action: &str) -> Result<ServerMessage> {
        let response = self.session.get(path).send().await?;
        let response = ensure_success(response, action).await?;

        let message: ServerMessage = response.json().await?;

        Ok(message)
    }

    async fn get_page(&self, path: &str, action: &str) -> Result<()> {
        let response = self.session.get(path).send().await?;
        ensure_success(response, action).await?;

        Ok(())
    }
}

#[async_trait]
impl FeedApi for FeedClient {
    async fn like(&self, id: PostId) -> Result<ServerMessage> {
        self.get_message(&format!("like/{id}"), &format!("like post {id}"))
            .await
    }

    async fn unlike(&self, id: PostId) -> Result<ServerMessage> {
        self.get_message(&format!("unlike/{id}"), &format!("unlike post {id}"))
            .await
    }

    async fn edit_post(&self, id: PostId, edit: &PostEdit) -> Result<ServerMessage> {
        let request = self.session.post(&format!("edit/{id}")).json(edit);

        let response = self.session.signed(request).send().await?;
        let response = ensure_success(response, &format!("edit post {id}")).await?;

        let message: ServerMessage = response.json().await?;

        Ok(message)
    }

    async fn follow(&self, username: &str) -> Result<()> {
        self.get_page(
            &format!("profile/{username}/follow"),
            &format!("follow {username}"),
        )
        .await
    }

    async fn unfollow(&self, username: &str) -> Result<()> {
        self.get_page(
            &format!("profile/{username}/unfollow"),
            &format!("unfollow {username}"),
        )
        .await
    }

    async fn new_post(&self, message: &str) -> Result<()> {
        let request = self.session.post("new").form(&[("new_post", message)]);

        let response = self.session.signed(request).send().await?;
        ensure_success(response, "create post").await?;

        Ok(())
    }
}
