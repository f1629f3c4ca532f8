//! Minimal server-rendered HTML for the portal pages.
//!
//! Layout and styling are deliberately plain; the pages exist to exercise
//! the session state machine, not to be pretty.

use session::{Notice, Session, User};

/// Escape a string for safe interpolation into HTML text content.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n"
    )
}

/// Public landing page, with any pending notice rendered inline.
pub fn home(session: &Session, notice: Option<Notice>) -> String {
    let notice_html = notice
        .map(|n| format!("<p class=\"notice\">{}</p>\n", n.message()))
        .unwrap_or_default();

    let nav = if session.is_authenticated {
        "<nav>\
         <a href=\"/video\">Exclusive Video</a> \
         <a href=\"/profile\">Profile</a> \
         <form method=\"post\" action=\"/auth/logout\"><button type=\"submit\">Log out</button></form>\
         </nav>"
    } else {
        "<nav><a href=\"/auth/login\">Log in</a></nav>"
    };

    let body = format!(
        "{notice_html}{nav}\n\
         <h1>Secure Access, Simplified</h1>\n\
         <p>Identity and access management that keeps your team moving. \
         Log in to unlock exclusive member content.</p>"
    );
    layout("Home", &body)
}

/// Protected video page.
pub fn video() -> String {
    let body = "<h1>Exclusive Content</h1>\n\
         <video controls src=\"/assets/demo.mp4\"></video>\n\
         <h2>How to Implement Multi-Factor Authentication</h2>\n\
         <p>Our team shows you the ins and outs of rolling out MFA across \
         your organization.</p>\n\
         <h2>Behind the Scenes</h2>\n\
         <p>Filmed during our team retreat, where serious security \
         discussions meet a bit of fun.</p>\n\
         <p><a href=\"/\">Back home</a></p>";
    layout("Exclusive Content", body)
}

/// Protected profile page rendering the user claims projection.
pub fn profile(user: &User) -> String {
    let name = user.name.as_deref().unwrap_or("Not provided");
    let username = user.username.as_deref().unwrap_or("Not provided");
    let email = user.email.as_deref().unwrap_or("Not provided");
    let groups = if user.groups.is_empty() {
        "None".to_string()
    } else {
        escape(&user.groups.join(", "))
    };

    let body = format!(
        "<h1>Your Profile</h1>\n\
         <div class=\"avatar\">{initials}</div>\n\
         <dl>\n\
         <dt>Full Name</dt><dd>{name}</dd>\n\
         <dt>Username</dt><dd>{username}</dd>\n\
         <dt>Email</dt><dd>{email}</dd>\n\
         <dt>Groups</dt><dd>{groups}</dd>\n\
         </dl>\n\
         <p><a href=\"/\">Back home</a></p>",
        initials = escape(&user.initials()),
        name = escape(name),
        username = escape(username),
        email = escape(email),
    );
    layout("Your Profile", &body)
}

/// 404 fallback page.
pub fn not_found() -> String {
    layout(
        "Not Found",
        "<h1>404</h1>\n<p>Oops! Page not found.</p>\n<p><a href=\"/\">Return to Home</a></p>",
    )
}
