//! Page Shells
//!
//! Minimal HTML for the public and sign-in pages. Forms post JSON to the
//! `/api/auth/*` actions and follow the returned `redirectTo`.

use axum::extract::Query;
use axum::response::Html;

use crate::presentation::dto::LoginPageQuery;

const FORM_SCRIPT: &str = r#"<script>
document.querySelectorAll('form[data-action]').forEach(function (form) {
  form.addEventListener('submit', async function (event) {
    event.preventDefault();
    var button = form.querySelector('button');
    if (button.disabled) return;
    button.disabled = true;
    var body = Object.fromEntries(new FormData(form));
    var redirectTo = new URLSearchParams(location.search).get('redirectTo');
    if (redirectTo) body.redirectTo = redirectTo;
    try {
      var res = await fetch(form.dataset.action, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
      });
      var data = await res.json();
      if (data.success) { location.assign(data.redirectTo || '/dashboard'); return; }
      form.querySelector('.error').textContent = data.error.message;
    } catch (e) {
      form.querySelector('.error').textContent = 'An unexpected error occurred';
    }
    button.disabled = false;
  });
});
</script>"#;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | GOSPL</title>
</head>
<body>
<main>
{body}
</main>
{FORM_SCRIPT}
</body>
</html>"#
    ))
}

fn auth_form(action: &str, submit: &str, with_password: bool) -> String {
    let password = if with_password {
        r#"<label>Password <input name="password" type="password" required></label>"#
    } else {
        ""
    };

    format!(
        r#"<form data-action="{action}">
<label>Email address <input name="email" type="email" required></label>
{password}
<p class="error" role="alert"></p>
<button type="submit">{submit}</button>
</form>"#
    )
}

const SOCIAL_LINKS: &str = r#"<p>Or continue with
<a href="/auth/oauth/google">Google</a>
<a href="/auth/oauth/github">GitHub</a></p>"#;

/// GET /
pub async fn landing_page() -> Html<String> {
    layout(
        "Gait monitoring",
        r#"<h1>GOSPL</h1>
<p>Gait monitoring for elders and the people who care for them.</p>
<p><a href="/login">Sign in</a> <a href="/register">Create account</a></p>"#,
    )
}

/// GET /login
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = if query.registered.as_deref() == Some("true") {
        "<p class=\"notice\">Check your email to confirm your account, then sign in.</p>"
    } else if query.reset.as_deref() == Some("requested") {
        "<p class=\"notice\">If an account exists, a reset link is on its way.</p>"
    } else if query.error.as_deref() == Some("oauth") {
        "<p class=\"notice\">Social sign-in failed. Please try again.</p>"
    } else {
        ""
    };

    layout(
        "Sign in",
        &format!(
            r#"<h1>Sign in</h1>
{notice}
{form}
<p><a href="/reset-password">Forgot password?</a></p>
{SOCIAL_LINKS}
<p>Don't have an account? <a href="/register">Sign up</a></p>"#,
            form = auth_form("/api/auth/login", "Sign in", true),
        ),
    )
}

/// GET /register
pub async fn register_page() -> Html<String> {
    layout(
        "Create account",
        &format!(
            r#"<h1>Create account</h1>
{form}
{SOCIAL_LINKS}
<p>Already have an account? <a href="/login">Sign in</a></p>"#,
            form = auth_form("/api/auth/register", "Sign up", true),
        ),
    )
}

/// GET /reset-password
pub async fn reset_password_page() -> Html<String> {
    layout(
        "Reset password",
        &format!(
            r#"<h1>Reset password</h1>
{form}
<p><a href="/login">Back to sign in</a></p>"#,
            form = auth_form("/api/auth/reset-password", "Send reset link", false),
        ),
    )
}
