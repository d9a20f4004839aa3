//! HTML rendering for the portal views

use crate::store::DriverApplication;

/// Placeholder shown for any field the backend did not return
pub const PLACEHOLDER: &str = "N/A";

pub const LOGIN_FAILED_MSG: &str = "Failed to login. Please check your email and password.";
pub const FETCH_FAILED_MSG: &str =
    "Failed to fetch drivers. Check security rules and ensure you are logged in with an authorized account.";
pub const APPROVE_FAILED_MSG: &str = "Failed to approve driver.";
pub const REJECT_FAILED_MSG: &str = "Failed to reject driver.";
pub const LOGOUT_FAILED_MSG: &str = "Failed to log out.";
pub const NO_PENDING_MSG: &str = "No pending applications found.";

const PAGE_STYLE: &str = "font-family: system-ui, sans-serif; margin: 0; background-color: #f3f4f6;";
const CARD_STYLE: &str =
    "background: white; border-radius: 0.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.2); padding: 1.5rem;";
const CELL_STYLE: &str = "padding: 0.75rem; border-bottom: 1px solid #dee2e6;";
const HEAD_CELL_STYLE: &str =
    "padding: 0.75rem; text-align: left; border-bottom: 2px solid #dee2e6; color: #6b7280; font-size: 0.8em; text-transform: uppercase;";
const BUTTON_STYLE: &str =
    "border: none; border-radius: 0.375rem; padding: 0.5rem 1rem; font-weight: 600; color: white; cursor: pointer;";

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(text) => escape(text),
        None => PLACEHOLDER.to_string(),
    }
}

fn date_or_placeholder(app: &DriverApplication) -> String {
    match app.submission_date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// The login view, optionally with the inline failure message
pub fn login_page(error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!(
            r#"<p style="color: #dc2626; font-size: 0.9em; text-align: center;">{}</p>"#,
            escape(message)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Admin Portal Login</title>
</head>
<body style="{page_style}">
    <div style="display: flex; align-items: center; justify-content: center; min-height: 100vh;">
        <div style="{card_style} width: 100%; max-width: 28rem;">
            <h2 style="text-align: center; margin-top: 0;">Admin Portal Login</h2>
            <form method="post" action="/login"
                  onsubmit="var b=document.getElementById('signin'); b.disabled=true; b.textContent='Signing in...';">
                <input type="email" name="email" required placeholder="Email address"
                       style="display: block; width: 100%; box-sizing: border-box; padding: 0.5rem; margin-bottom: 0.5rem; border: 1px solid #d1d5db; border-radius: 0.375rem;">
                <input type="password" name="password" required placeholder="Password"
                       style="display: block; width: 100%; box-sizing: border-box; padding: 0.5rem; margin-bottom: 1rem; border: 1px solid #d1d5db; border-radius: 0.375rem;">
                {error_html}
                <button id="signin" type="submit" style="{button_style} width: 100%; background-color: #db2777;">Sign in</button>
            </form>
        </div>
    </div>
</body>
</html>"#,
        page_style = PAGE_STYLE,
        card_style = CARD_STYLE,
        button_style = BUTTON_STYLE,
        error_html = error_html,
    )
}

fn application_row(app: &DriverApplication) -> String {
    format!(
        r#"<tr>
            <td style="{cell}">{name}</td>
            <td style="{cell}">{vehicle} ({plate})</td>
            <td style="{cell}">{date}</td>
            <td style="{cell} text-align: right;"><a href="/?review={id}" style="color: #db2777;">Review</a></td>
        </tr>"#,
        cell = CELL_STYLE,
        name = text_or_placeholder(app.full_name.as_deref()),
        vehicle = text_or_placeholder(app.vehicle_model.as_deref()),
        plate = text_or_placeholder(app.plate_number.as_deref()),
        date = date_or_placeholder(app),
        id = escape(&app.id),
    )
}

fn review_modal(app: &DriverApplication) -> String {
    let license_href = app.license_url.as_deref().unwrap_or("#");
    let orcr_href = app.orcr_url.as_deref().unwrap_or("#");

    format!(
        r#"<div style="position: fixed; inset: 0; background: rgba(107,114,128,0.75); display: flex; align-items: center; justify-content: center;">
        <div style="{card_style} width: 100%; max-width: 32rem;">
            <h3 style="margin-top: 0;">Driver Application Details</h3>
            <p><strong>Name:</strong> {name}</p>
            <p><strong>Email:</strong> {email}</p>
            <p><strong>Phone:</strong> {phone}</p>
            <p><strong>Vehicle:</strong> {vehicle} - {plate}</p>
            <p><strong>Documents:</strong></p>
            <p><a href="{license}" target="_blank" rel="noopener noreferrer" style="color: #db2777;">View Driver's License</a></p>
            <p><a href="{orcr}" target="_blank" rel="noopener noreferrer" style="color: #db2777;">View OR/CR</a></p>
            <div style="display: flex; justify-content: flex-end; gap: 0.5rem; margin-top: 1.5rem;">
                <a href="/" style="align-self: center; color: #374151;">Cancel</a>
                <form method="post" action="/applications/{id}/reject">
                    <button type="submit" style="{button_style} background-color: #dc2626;">Reject</button>
                </form>
                <form method="post" action="/applications/{id}/approve">
                    <button type="submit" style="{button_style} background-color: #16a34a;">Approve</button>
                </form>
            </div>
        </div>
    </div>"#,
        card_style = CARD_STYLE,
        button_style = BUTTON_STYLE,
        name = text_or_placeholder(app.full_name.as_deref()),
        email = text_or_placeholder(app.email.as_deref()),
        phone = text_or_placeholder(app.phone.as_deref()),
        vehicle = text_or_placeholder(app.vehicle_model.as_deref()),
        plate = text_or_placeholder(app.plate_number.as_deref()),
        license = escape(license_href),
        orcr = escape(orcr_href),
        id = escape(&app.id),
    )
}

/// The dashboard view: pending applications table, optional error banner,
/// optional review modal over the table
pub fn dashboard_page(
    applications: &[DriverApplication],
    error: Option<&str>,
    selected: Option<&DriverApplication>,
) -> String {
    let body = if let Some(message) = error {
        format!(r#"<p style="color: #dc2626;">{}</p>"#, escape(message))
    } else if applications.is_empty() {
        format!(
            r#"<table style="width: 100%; border-collapse: collapse;">
            <tbody><tr><td style="{cell} text-align: center; color: #6b7280;" colspan="4">{message}</td></tr></tbody>
        </table>"#,
            cell = CELL_STYLE,
            message = NO_PENDING_MSG,
        )
    } else {
        let rows: String = applications.iter().map(application_row).collect();
        format!(
            r#"<table style="width: 100%; border-collapse: collapse;">
            <thead>
                <tr>
                    <th style="{head}">Name</th>
                    <th style="{head}">Vehicle</th>
                    <th style="{head}">Date Submitted</th>
                    <th style="{head}"></th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>"#,
            head = HEAD_CELL_STYLE,
            rows = rows,
        )
    };

    let modal = selected.map(review_modal).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>GoHatod Admin Portal</title>
</head>
<body style="{page_style}">
    <header style="background: white; box-shadow: 0 1px 3px rgba(0,0,0,0.2);">
        <div style="max-width: 80rem; margin: 0 auto; padding: 1rem; display: flex; justify-content: space-between; align-items: center;">
            <h1 style="margin: 0;">GoHatod Admin Portal</h1>
            <form method="post" action="/logout">
                <button type="submit" style="{button_style} background-color: #db2777;">Logout</button>
            </form>
        </div>
    </header>
    <main style="max-width: 80rem; margin: 0 auto; padding: 1.5rem 1rem;">
        <div style="{card_style}">
            <div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem;">
                <h2 style="margin: 0;">Pending Driver Applications</h2>
                <a href="/" title="Refresh" style="text-decoration: none; font-size: 1.4em; color: #4b5563;">&#x27f3;</a>
            </div>
            {body}
        </div>
    </main>
    {modal}
</body>
</html>"#,
        page_style = PAGE_STYLE,
        card_style = CARD_STYLE,
        button_style = BUTTON_STYLE,
        body = body,
        modal = modal,
    )
}

/// A blocking alert followed by a return to the dashboard
pub fn alert_redirect(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body>
    <script>alert('{}'); window.location.replace('/');</script>
</body>
</html>"#,
        message.replace('\\', "\\\\").replace('\'', "\\'"),
    )
}
