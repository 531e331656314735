use std::{fmt, future::Future, time::Duration};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Editor, InquireError, Select, Text};
use owo_colors::OwoColorize;
use session::{Notice, Notices, Session};

use crate::api::{MailApi, MailClient};
use crate::cli::Args;
use crate::controller::MailController;
use crate::models::Mailbox;
use crate::settings::merge_settings_with_args;
use crate::view::{DetailAction, EmailRow, MailView, ReadState, render};

enum Flow {
    Continue,
    Quit,
}

enum ListChoice {
    Open(EmailRow),
    Mailbox(Mailbox),
    Compose,
    Quit,
}

impl fmt::Display for ListChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListChoice::Open(row) => {
                let marker = match row.state {
                    ReadState::Unread => "●".bright_cyan().to_string(),
                    ReadState::Read => " ".to_string(),
                };
                write!(
                    f,
                    "{marker} {} | {} | {}",
                    row.sender,
                    row.subject,
                    row.timestamp.dimmed()
                )
            }
            ListChoice::Mailbox(mailbox) => write!(f, "Go to {}", mailbox.heading()),
            ListChoice::Compose => write!(f, "Compose"),
            ListChoice::Quit => write!(f, "Quit"),
        }
    }
}

enum DetailChoice {
    Action(DetailAction),
    Back,
    Quit,
}

impl fmt::Display for DetailChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailChoice::Action(action) => write!(f, "{}", action.label()),
            DetailChoice::Back => write!(f, "Back"),
            DetailChoice::Quit => write!(f, "Quit"),
        }
    }
}

pub async fn run(args: Args) -> Result<()> {
    let args = merge_settings_with_args(&args)?;
    let session = Session::new(&args.server.session_config())?;
    let mut controller = MailController::new(MailClient::new(session, args.sign_updates));

    with_spinner("Loading mailbox...", controller.open_mailbox(args.mailbox)).await?;

    loop {
        controller.poll_background().await;
        print_notices(controller.notices_mut());
        println!("\n{}\n", render(controller.view()));

        let step = match controller.view().clone() {
            MailView::List { mailbox, rows } => list_step(&mut controller, mailbox, rows).await,
            MailView::Detail { mailbox, .. } => detail_step(&mut controller, mailbox).await,
            MailView::Compose(_) => compose_step(&mut controller).await,
        };

        match step {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => match e.downcast_ref::<InquireError>() {
                Some(InquireError::OperationInterrupted) => break,
                Some(InquireError::OperationCanceled) => {}
                _ => controller.notices_mut().push(Notice::error(format!("{e:#}"))),
            },
        }
    }

    controller.settle().await;
    print_notices(controller.notices_mut());

    Ok(())
}

async fn list_step<A>(
    controller: &mut MailController<A>,
    mailbox: Mailbox,
    rows: Vec<EmailRow>,
) -> Result<Flow>
where
    A: MailApi + Send + Sync + 'static,
{
    let mut options: Vec<ListChoice> = rows.into_iter().map(ListChoice::Open).collect();
    options.push(ListChoice::Compose);
    options.extend(
        Mailbox::ALL
            .into_iter()
            .filter(|other| *other != mailbox)
            .map(ListChoice::Mailbox),
    );
    options.push(ListChoice::Quit);

    match Select::new(mailbox.heading(), options)
        .with_page_size(15)
        .prompt()?
    {
        ListChoice::Open(row) => {
            with_spinner("Opening email...", controller.open_message(row.id, mailbox)).await?
        }
        ListChoice::Mailbox(other) => {
            with_spinner("Loading mailbox...", controller.open_mailbox(other)).await?
        }
        ListChoice::Compose => controller.open_compose(),
        ListChoice::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

async fn detail_step<A>(controller: &mut MailController<A>, mailbox: Mailbox) -> Result<Flow>
where
    A: MailApi + Send + Sync + 'static,
{
    let mut options: Vec<DetailChoice> = controller
        .view()
        .actions()
        .into_iter()
        .map(DetailChoice::Action)
        .collect();
    options.push(DetailChoice::Back);
    options.push(DetailChoice::Quit);

    match Select::new("Email", options).prompt()? {
        DetailChoice::Action(DetailAction::Reply) => controller.reply()?,
        DetailChoice::Action(DetailAction::Archive | DetailAction::Unarchive) => {
            with_spinner("Updating email...", controller.toggle_archive()).await?
        }
        DetailChoice::Back => {
            with_spinner("Loading mailbox...", controller.open_mailbox(mailbox)).await?
        }
        DetailChoice::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

async fn compose_step<A>(controller: &mut MailController<A>) -> Result<Flow>
where
    A: MailApi + Send + Sync + 'static,
{
    let Some(form) = controller.compose_mut() else {
        return Ok(Flow::Continue);
    };

    form.recipients = Text::new("To:")
        .with_initial_value(&form.recipients)
        .with_help_message("Separate addresses with commas")
        .prompt()?;
    form.subject = Text::new("Subject:")
        .with_initial_value(&form.subject)
        .prompt()?;
    form.body = Editor::new("Body:")
        .with_predefined_text(&form.body)
        .with_file_extension(".txt")
        .prompt()?;

    match Select::new("Send this email?", vec!["Send", "Edit again", "Discard"]).prompt()? {
        "Send" => with_spinner("Sending...", controller.submit_compose()).await?,
        "Discard" => {
            with_spinner("Loading mailbox...", controller.open_mailbox(Mailbox::Inbox)).await?
        }
        _ => {}
    }

    Ok(Flow::Continue)
}

async fn with_spinner<T>(message: &'static str, task: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;

    spinner.finish_and_clear();
    result
}

fn print_notices(notices: &mut Notices) {
    for notice in notices.drain() {
        println!("{notice}");
    }
}
