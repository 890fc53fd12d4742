use maud::{html, Markup};

pub mod categories;
pub mod construction_card;
pub mod details;
pub mod error;
pub mod field;
pub mod filter_bar;

pub use categories::category_chips;
pub use construction_card::construction_card;
pub use details::details_dialog;
pub use error::error_page;
pub use field::{password_field, text_field};
pub use filter_bar::filter_bar;

pub fn card(title: &str, description: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            div class="card-header text-center" {
                h2 { (title) }
                @if !description.is_empty() {
                    p class="muted" { (description) }
                }
            }
            div class="card-body" {
                (body)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Banner for auth outcomes and backend failures.
pub fn notice(kind: NoticeKind, title: &str, message: &str) -> Markup {
    let class = match kind {
        NoticeKind::Success => "alert alert-success",
        NoticeKind::Error => "alert alert-error",
    };
    html! {
        div class=(class) role="alert" {
            strong { (title) }
            p { (message) }
        }
    }
}

/// Full-height centered wrapper used by the auth pages.
pub fn centered(content: Markup) -> Markup {
    html! {
        main class="container narrow centered" {
            (content)
        }
    }
}
