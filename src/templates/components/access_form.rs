use maud::{html, Markup};

/// The access-code prompt. `error` is shown inline under the field.
pub fn access_code_form(error: Option<&str>) -> Markup {
    html! {
        div class="access-wrapper" {
            form method="post" action="/auth/login" class="access-form" {
                label for="code" { "Digite o código de acesso" }
                input
                    type="password"
                    id="code"
                    name="code"
                    autocomplete="current-password"
                    autofocus
                    required;

                button type="submit" class="primary" { "Entrar" }

                @if let Some(msg) = error {
                    p class="error" role="alert" { (msg) }
                }
            }
        }
    }
}
