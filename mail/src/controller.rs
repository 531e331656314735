use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use session::{BackgroundTasks, Notice, Notices, TaskOutcome};

use crate::api::MailApi;
use crate::models::{EmailChangeset, EmailId, Mailbox};
use crate::view::{ComposeForm, EmailRow, MailView};

/// Drives [`MailView`] from user actions and server responses.
///
/// Marking a message read is not awaited: [`MailController::open_message`]
/// returns while the update may still be in flight, so a quick return to the
/// list can show the message as unread. Failures of these updates surface as
/// notices once [`MailController::poll_background`] or
/// [`MailController::settle`] runs.
pub struct MailController<A> {
    api: Arc<A>,
    view: MailView,
    read_markers: BackgroundTasks<EmailId>,
    notices: Notices,
}

impl<A> MailController<A>
where
    A: MailApi + Send + Sync + 'static,
{
    pub fn new(api: A) -> Self {
        Self::with_shared_api(Arc::new(api))
    }

    pub fn with_shared_api(api: Arc<A>) -> Self {
        Self {
            api,
            view: MailView::default(),
            read_markers: BackgroundTasks::new(),
            notices: Notices::default(),
        }
    }

    pub fn view(&self) -> &MailView {
        &self.view
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn pending_read_markers(&self) -> usize {
        self.read_markers.pending()
    }

    pub fn open_compose(&mut self) {
        self.view = MailView::Compose(ComposeForm::empty());
    }

    pub async fn open_mailbox(&mut self, mailbox: Mailbox) -> Result<()> {
        let emails = self
            .api
            .list_mailbox(mailbox)
            .await
            .with_context(|| format!("Failed to load {}", mailbox.heading()))?;

        debug!("{} emails in {}", emails.len(), mailbox);

        self.view = MailView::List {
            mailbox,
            rows: emails.iter().map(EmailRow::from).collect(),
        };

        Ok(())
    }

    pub async fn open_message(&mut self, id: EmailId, mailbox: Mailbox) -> Result<()> {
        let email = self
            .api
            .get_email(id)
            .await
            .with_context(|| format!("Failed to open email {id}"))?;

        if !email.read {
            let api = Arc::clone(&self.api);
            self.read_markers.spawn(id, async move {
                let changeset = EmailChangeset::new().with_read(true);
                api.update_email(id, &changeset).await
            });
        }

        self.view = MailView::Detail { mailbox, email };

        Ok(())
    }

    /// Flips the archived flag of the open message, then shows the inbox.
    pub async fn toggle_archive(&mut self) -> Result<()> {
        let MailView::Detail { mailbox, email } = &self.view else {
            anyhow::bail!("no email is open");
        };

        if *mailbox == Mailbox::Sent {
            anyhow::bail!("sent emails cannot be archived");
        }

        let (id, archived) = (email.id, email.archived);
        let changeset = EmailChangeset::new().with_archived(!archived);

        self.api
            .update_email(id, &changeset)
            .await
            .with_context(|| format!("Failed to update email {id}"))?;

        self.notices.push(Notice::info(if archived {
            "Email moved to inbox"
        } else {
            "Email archived"
        }));

        // The flag changed on the server; never leave the stale detail open.
        self.view = MailView::List {
            mailbox: Mailbox::Inbox,
            rows: Vec::new(),
        };
        self.open_mailbox(Mailbox::Inbox)
            .await
            .context("Email updated, but the inbox could not be reloaded")
    }

    pub fn reply(&mut self) -> Result<()> {
        let MailView::Detail { email, .. } = &self.view else {
            anyhow::bail!("no email is open");
        };

        self.view = MailView::Compose(ComposeForm::reply_to(email));

        Ok(())
    }

    pub fn compose_mut(&mut self) -> Option<&mut ComposeForm> {
        match &mut self.view {
            MailView::Compose(form) => Some(form),
            _ => None,
        }
    }

    /// Sends the composed email and shows the sent mailbox. If sending fails
    /// the compose form stays on screen untouched. Once the email is sent the
    /// form is gone, even when listing the sent mailbox fails.
    pub async fn submit_compose(&mut self) -> Result<()> {
        let MailView::Compose(form) = &self.view else {
            anyhow::bail!("no email is being composed");
        };

        let result = self
            .api
            .send_email(&form.to_new_email())
            .await
            .context("Failed to send email")?;

        if let Some(message) = result.message {
            info!("{message}");
            self.notices.push(Notice::info(message));
        }

        self.view = MailView::List {
            mailbox: Mailbox::Sent,
            rows: Vec::new(),
        };
        self.open_mailbox(Mailbox::Sent)
            .await
            .context("Email sent, but the sent mailbox could not be loaded")
    }

    /// Turns read markers that already finished into notices.
    pub async fn poll_background(&mut self) {
        let outcomes = self.read_markers.take_finished().await;
        self.report(outcomes);
    }

    /// Waits for every outstanding read marker.
    pub async fn settle(&mut self) {
        let outcomes = self.read_markers.settle().await;
        self.report(outcomes);
    }

    fn report(&mut self, outcomes: Vec<TaskOutcome<EmailId>>) {
        for outcome in outcomes {
            if let TaskOutcome::Failed(id, e) = outcome {
                self.notices
                    .push(Notice::error(format!("Failed to mark email {id} as read: {e:#}")));
            }
        }
    }
}
