use chrono::Datelike;
use maud::{html, Markup, DOCTYPE};

use crate::templates::APP_NAME;

/// Page shell. `user_email` is set for signed-in pages and switches the
/// header to the app navigation with the sign-out button.
pub fn desktop_layout(title: &str, user_email: Option<&str>, content: Markup) -> Markup {
    let year = chrono::Local::now().year();

    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · " (APP_NAME) }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" {
                        svg
                            xmlns="http://www.w3.org/2000/svg"
                            width="24"
                            height="24"
                            viewBox="0 0 24 24"
                            fill="none"
                            stroke="#524ed2"
                            stroke-width="2"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                        {
                            path d="M12 21s-6-5.3-6-10a6 6 0 0 1 12 0c0 4.7-6 10-6 10z" {}
                            circle cx="12" cy="11" r="2" {}
                        }
                        h3 { (APP_NAME) }
                    }
                    @if let Some(email) = user_email {
                        nav {
                            ul {
                                li { a href="/" { "Mapa" } }
                                li { a href="/filter" { "Filtrar" } }
                            }
                        }
                        div class="flex items-center gap-2" {
                            span class="text-sm muted" { (email) }
                            form method="post" action="/logout" class="inline" {
                                button type="submit" class="btn btn-outline btn-sm" { "Sair" }
                            }
                        }
                    } @else {
                        a href="/login" class="text-base font-medium" { "Entrar" }
                    }
                }
                (content)
                footer class="text-center text-xs muted py-6" {
                    "© " (year) " " (APP_NAME) ". Todos os direitos reservados."
                }
            }
        }
    }
}
