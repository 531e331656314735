use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use session::{Session, ensure_success};

use crate::models::{Email, EmailChangeset, EmailId, Mailbox, NewEmail, SendResponse};

#[async_trait]
pub trait MailApi {
    async fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>>;
    async fn get_email(&self, id: EmailId) -> Result<Email>;
    async fn update_email(&self, id: EmailId, changeset: &EmailChangeset) -> Result<()>;
    async fn send_email(&self, email: &NewEmail) -> Result<SendResponse>;
}

pub struct MailClient {
    session: Session,
    sign_updates: bool,
}

impl MailClient {
    pub fn new(session: Session, sign_updates: bool) -> Self {
        if !sign_updates {
            warn!(
                "email updates are sent without the anti-forgery header, set sign_updates = true to attach it"
            );
        }

        Self {
            session,
            sign_updates,
        }
    }
}

#[async_trait]
impl MailApi for MailClient {
    async fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>> {
        let response = self
            .session
            .get(&format!("emails/{mailbox}"))
            .send()
            .await?;
        let response = ensure_success(response, &format!("list mailbox {mailbox}")).await?;

        let emails: Vec<Email> = response.json().await?;

        Ok(emails)
    }

    async fn get_email(&self, id: EmailId) -> Result<Email> {
        let response = self.session.get(&format!("emails/{id}")).send().await?;
        let response = ensure_success(response, &format!("fetch email {id}")).await?;

        let email: Email = response.json().await?;

        Ok(email)
    }

    async fn update_email(&self, id: EmailId, changeset: &EmailChangeset) -> Result<()> {
        let mut request = self.session.put(&format!("emails/{id}")).json(changeset);
        if self.sign_updates {
            request = self.session.signed(request);
        }

        let response = request.send().await?;
        ensure_success(response, &format!("update email {id}")).await?;

        Ok(())
    }

    async fn send_email(&self, email: &NewEmail) -> Result<SendResponse> {
        let request = self.session.post("emails").json(email);
        let response = self.session.signed(request).send().await?;

        let status = response.status();
        let text = response.text().await?;

        // The server answers rejected mail with a JSON {"error": ...} body.
        let result: SendResponse = serde_json::from_str(&text).unwrap_or_default();

        if let Some(error) = result.error {
            anyhow::bail!("{error}");
        }

        if !status.is_success() {
            anyhow::bail!("cannot send email with status {}: {}", status, text);
        }

        Ok(result)
    }
}
