use comfy_table::{Attribute, Cell, Table, presets::UTF8_FULL};
use owo_colors::OwoColorize;

use crate::models::{Email, EmailId, Mailbox, NewEmail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Read,
    Unread,
}

impl ReadState {
    pub fn from_flag(read: bool) -> Self {
        if read { ReadState::Read } else { ReadState::Unread }
    }

    pub fn class(self) -> &'static str {
        match self {
            ReadState::Read => "read",
            ReadState::Unread => "unread",
        }
    }
}

/// One summary line of a mailbox listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRow {
    pub id: EmailId,
    pub sender: String,
    pub subject: String,
    pub timestamp: String,
    pub state: ReadState,
}

impl From<&Email> for EmailRow {
    fn from(email: &Email) -> Self {
        Self {
            id: email.id,
            sender: email.sender.clone(),
            subject: email.subject.clone(),
            timestamp: email.timestamp.clone(),
            state: ReadState::from_flag(email.read),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Archive,
    Unarchive,
    Reply,
}

impl DetailAction {
    pub fn label(self) -> &'static str {
        match self {
            DetailAction::Archive => "Archive",
            DetailAction::Unarchive => "Unarchive",
            DetailAction::Reply => "Reply",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeForm {
    pub recipients: String,
    pub subject: String,
    pub body: String,
}

impl ComposeForm {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Prepares an answer to `email`, addressed back to its sender.
    pub fn reply_to(email: &Email) -> Self {
        Self {
            recipients: email.sender.clone(),
            subject: reply_subject(&email.subject),
            body: format!(
                "\n\nOn {}, {} wrote:\n{}\n",
                email.timestamp, email.sender, email.body
            ),
        }
    }

    pub fn to_new_email(&self) -> NewEmail {
        NewEmail {
            recipients: self.recipients.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }
}

/// Adds `Re: ` unless the first word of the subject already is `Re:`.
pub fn reply_subject(subject: &str) -> String {
    if subject.split(' ').next() == Some("Re:") {
        subject.to_string()
    } else {
        format!("Re: {subject}")
    }
}

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailView {
    List {
        mailbox: Mailbox,
        rows: Vec<EmailRow>,
    },
    Detail {
        mailbox: Mailbox,
        email: Email,
    },
    Compose(ComposeForm),
}

impl Default for MailView {
    fn default() -> Self {
        MailView::List {
            mailbox: Mailbox::Inbox,
            rows: Vec::new(),
        }
    }
}

impl MailView {
    pub fn name(&self) -> &'static str {
        match self {
            MailView::List { .. } => "list",
            MailView::Detail { .. } => "detail",
            MailView::Compose(_) => "compose",
        }
    }

    /// Buttons under an opened message. Sent mail cannot be archived.
    pub fn actions(&self) -> Vec<DetailAction> {
        let MailView::Detail { mailbox, email } = self else {
            return Vec::new();
        };

        let mut actions = Vec::with_capacity(2);
        if *mailbox != Mailbox::Sent {
            actions.push(if email.archived {
                DetailAction::Unarchive
            } else {
                DetailAction::Archive
            });
        }
        actions.push(DetailAction::Reply);
        actions
    }
}

pub fn render(view: &MailView) -> String {
    match view {
        MailView::List { mailbox, rows } => render_list(*mailbox, rows),
        MailView::Detail { email, .. } => render_detail(email, &view.actions()),
        MailView::Compose(form) => render_compose(form),
    }
}

fn render_list(mailbox: Mailbox, rows: &[EmailRow]) -> String {
    let heading = mailbox.heading().bold().to_string();

    if rows.is_empty() {
        return format!("{heading}\n{}", "No emails.".dimmed());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["From", "Subject", "Timestamp"]);

    for row in rows {
        let cells = [&row.sender, &row.subject, &row.timestamp].map(|text| {
            let cell = Cell::new(text);
            match row.state {
                ReadState::Unread => cell.add_attribute(Attribute::Bold),
                ReadState::Read => cell,
            }
        });
        table.add_row(cells);
    }

    format!("{heading}\n{table}")
}

fn render_detail(email: &Email, actions: &[DetailAction]) -> String {
    let buttons = actions
        .iter()
        .map(|action| format!("[{}]", action.label()))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{} {}\n{} {}\n{} {}\n{}\n\n{}\n\n{}",
        "From:".bold(),
        email.sender,
        "To:".bold(),
        email.recipients.join(", "),
        "Subject:".bold(),
        email.subject,
        email.timestamp.dimmed(),
        email.body,
        buttons
    )
}

fn render_compose(form: &ComposeForm) -> String {
    format!(
        "{}\n{} {}\n{} {}\n\n{}",
        "New Email".bold(),
        "To:".bold(),
        form.recipients,
        "Subject:".bold(),
        form.subject,
        form.body
    )
}
