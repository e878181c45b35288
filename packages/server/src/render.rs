//! HTML rendering for pages and forms.

use std::fmt::Write as _;

use chrono::Datelike as _;
use sylithe_server_models::{FieldError, LoginForm, Page, PageGroup, SignupForm};

use crate::pages::PageRegistry;

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn dropdown<'a>(html: &mut String, label: &str, pages: impl Iterator<Item = &'a Page>) {
    let _ = write!(html, "<li class=\"dropdown\"><span>{}</span><ul>", escape(label));
    for page in pages {
        let _ = write!(
            html,
            "<li><a href=\"{}\">{}</a>",
            escape(&page.path()),
            escape(&page.title)
        );
        if let Some(summary) = &page.summary {
            let _ = write!(html, "<p>{}</p>", escape(summary));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul></li>");
}

fn navbar(registry: &PageRegistry) -> String {
    let mut html = String::from("<nav class=\"navbar\"><a class=\"brand\" href=\"/\">Sylithe</a><ul>");
    html.push_str("<li><a href=\"/platform\">Platform</a></li>");
    dropdown(&mut html, "Our Approach", registry.group(PageGroup::Approach));
    dropdown(&mut html, "Methodology", registry.group(PageGroup::Methodology));
    dropdown(&mut html, "Insights", registry.group(PageGroup::Insights));
    html.push_str(
        "</ul><div class=\"auth\"><a href=\"/login\">Log in</a>\
         <a class=\"cta\" href=\"/signup\">Sign up</a></div></nav>",
    );
    html
}

fn footer() -> String {
    format!(
        "<footer><p>&copy; {} Sylithe. Forest carbon intelligence.</p>\
         <p><a href=\"/solutions\">Solutions</a> &middot; \
         <a href=\"/methodology/lulc\">LULC Classification</a> &middot; \
         <a href=\"/methodology/chm\">Canopy Height Model</a></p></footer>",
        chrono::Utc::now().year()
    )
}

/// Wraps `body` in the site chrome. Auth pages pass `None` for the registry
/// and get neither navbar nor footer.
#[must_use]
pub fn layout(title: &str, body: &str, chrome: Option<&PageRegistry>) -> String {
    let (nav, foot) = chrome.map_or_else(
        || (String::new(), String::new()),
        |registry| (navbar(registry), footer()),
    );
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title></head><body>{nav}<main>{body}</main>{foot}</body></html>",
        escape(title)
    )
}

#[must_use]
pub fn page(registry: &PageRegistry, page: &Page) -> String {
    let mut body = String::from("<header class=\"hero\">");
    if let Some(eyebrow) = &page.eyebrow {
        let _ = write!(body, "<span class=\"eyebrow\">{}</span>", escape(eyebrow));
    }
    let _ = write!(
        body,
        "<h1>{}</h1><p class=\"tagline\">{}</p></header>",
        escape(&page.title),
        escape(&page.tagline)
    );

    for section in &page.sections {
        let _ = write!(body, "<section><h2>{}</h2>", escape(&section.heading));
        if !section.body.is_empty() {
            let _ = write!(body, "<p>{}</p>", escape(&section.body));
        }
        if !section.bullets.is_empty() {
            body.push_str("<ul>");
            for bullet in &section.bullets {
                let _ = write!(body, "<li>{}</li>", escape(bullet));
            }
            body.push_str("</ul>");
        }
        body.push_str("</section>");
    }

    if !page.steps.is_empty() {
        body.push_str("<section class=\"steps\"><h2>How it works</h2><ol>");
        for step in &page.steps {
            let _ = write!(
                body,
                "<li><h3>{}</h3><p>{}</p></li>",
                escape(&step.title),
                escape(&step.description)
            );
        }
        body.push_str("</ol></section>");
    }

    layout(&page.title, &body, Some(registry))
}

#[must_use]
pub fn not_found(registry: &PageRegistry, path: &str) -> String {
    layout(
        "Page not found",
        &format!(
            "<header class=\"hero\"><h1>Page not found</h1>\
             <p class=\"tagline\">Nothing lives at <code>{}</code>.</p>\
             <a href=\"/\">Back to Home</a></header>",
            escape(path)
        ),
        Some(registry),
    )
}

fn field_error(errors: &[FieldError], field: &str) -> String {
    errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| format!("<p class=\"error\">{}</p>", escape(&e.message)))
        .collect()
}

fn input(name: &str, label: &str, kind: &str, value: &str, errors: &[FieldError]) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\
         <input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{}\">{}",
        escape(value),
        field_error(errors, name)
    )
}

/// Signup form, re-filled with the submitted name and email. Passwords are
/// never echoed back.
#[must_use]
pub fn signup(form: &SignupForm, errors: &[FieldError]) -> String {
    let body = format!(
        "<h1>Create your account</h1>\
         <p>Start your journey to confident climate action.</p>\
         <form method=\"post\" action=\"/signup\">{}{}{}{}\
         <button type=\"submit\">Create account</button></form>\
         <p>Already have an account? <a href=\"/login\">Log in</a></p>",
        input("name", "Full name", "text", &form.name, errors),
        input("email", "Work email", "email", &form.email, errors),
        input("password", "Password", "password", "", errors),
        input("confirm_password", "Confirm password", "password", "", errors),
    );
    layout("Sign up | Sylithe", &body, None)
}

#[must_use]
pub fn login(form: &LoginForm, errors: &[FieldError]) -> String {
    let body = format!(
        "<h1>Welcome back</h1>\
         <form method=\"post\" action=\"/login\">{}{}\
         <button type=\"submit\">Log in</button></form>\
         <p>New to Sylithe? <a href=\"/signup\">Create an account</a></p>",
        input("email", "Email", "email", &form.email, errors),
        input("password", "Password", "password", "", errors),
    );
    layout("Log in | Sylithe", &body, None)
}

/// Shown after a form passes validation.
#[must_use]
pub fn acknowledgement(heading: &str, message: &str) -> String {
    layout(
        heading,
        &format!(
            "<h1>{}</h1><p>{}</p><a href=\"/\">Back to Home</a>",
            escape(heading),
            escape(message)
        ),
        None,
    )
}
