use owo_colors::OwoColorize;

use crate::models::{LikeLabel, PostId, PostSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostMode {
    Display,
    Editing { draft: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub message: String,
    pub like_count: i64,
    pub like_button: LikeLabel,
    pub mode: PostMode,
}

impl From<PostSnapshot> for PostCard {
    fn from(snapshot: PostSnapshot) -> Self {
        Self {
            id: snapshot.id,
            message: snapshot.message,
            like_count: snapshot.likes,
            like_button: LikeLabel::for_liked(snapshot.liked),
            mode: PostMode::Display,
        }
    }
}

impl PostCard {
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, PostMode::Editing { .. })
    }
}

pub fn render_post(post: &PostCard) -> String {
    let body = match &post.mode {
        PostMode::Display => post.message.clone(),
        PostMode::Editing { draft } => format!("{}\n{draft}", "editing:".yellow()),
    };

    format!(
        "{} {}\n{}\n{} {}",
        "#".dimmed(),
        post.id.dimmed(),
        body,
        "♥".bright_red(),
        format!("{} [{}]", post.like_count, post.like_button).bold()
    )
}

pub fn render_feed<'a>(posts: impl IntoIterator<Item = &'a PostCard>) -> String {
    posts
        .into_iter()
        .map(render_post)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> PostCard {
        PostCard::from(PostSnapshot {
            id: 9,
            message: "First post".to_string(),
            likes: 2,
            liked: true,
        })
    }

    #[test]
    fn test_card_from_snapshot() {
        let card = card();
        assert_eq!(card.like_button, LikeLabel::Unlike);
        assert_eq!(card.like_count, 2);
        assert!(!card.is_editing());
    }

    #[test]
    fn test_render_post_shows_message_or_draft() {
        let mut card = card();
        let rendered = render_post(&card);
        assert!(rendered.contains("First post"));
        assert!(rendered.contains("[Unlike]"));

        card.mode = PostMode::Editing {
            draft: "Draft text".to_string(),
        };
        let rendered = render_post(&card);
        assert!(rendered.contains("Draft text"));
        assert!(!rendered.contains("First post"));
    }
}
