//! HTML pages: the empty entry form and the confirmation page.

use babycontest_core::entry::{
    FIELD_BABY_AGE, FIELD_BABY_NAME, FIELD_CONTACT, FIELD_IMAGE, FIELD_PARENT_NAME,
};

use crate::pipeline::{Step, SubmissionOutcome};

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; max-width: 640px; margin: 2rem auto; padding: 0 1rem; }
label { display: block; margin-top: 1rem; font-weight: 600; }
input { width: 100%; padding: 0.4rem; }
.notice { background: #fff4e5; border-left: 4px solid #f0a020; padding: 0.75rem 1rem; margin: 1rem 0; }
img.entry { max-width: 100%; border-radius: 8px; margin-top: 1rem; }
dt { font-weight: 600; }
</style>"#;

/// The empty entry form.
pub fn render_form() -> String {
    page(
        "Enter the Baby Contest",
        &format!(
            r#"<form method="post" action="/" enctype="multipart/form-data">
<label for="{FIELD_BABY_NAME}">Baby's name</label>
<input id="{FIELD_BABY_NAME}" name="{FIELD_BABY_NAME}" type="text" required>
<label for="{FIELD_BABY_AGE}">Baby's age</label>
<input id="{FIELD_BABY_AGE}" name="{FIELD_BABY_AGE}" type="text" required>
<label for="{FIELD_PARENT_NAME}">Parent's name</label>
<input id="{FIELD_PARENT_NAME}" name="{FIELD_PARENT_NAME}" type="text" required>
<label for="{FIELD_CONTACT}">Contact</label>
<input id="{FIELD_CONTACT}" name="{FIELD_CONTACT}" type="text" required>
<label for="{FIELD_IMAGE}">Photo</label>
<input id="{FIELD_IMAGE}" name="{FIELD_IMAGE}" type="file" accept="image/*" required>
<p><button type="submit">Submit entry</button></p>
</form>"#
        ),
    )
}

/// The confirmation page for a stored submission.
pub fn render_confirmation(outcome: &SubmissionOutcome) -> String {
    let fields = &outcome.fields;
    let url = escape(&outcome.image_url);

    let notice = if outcome.is_complete() {
        String::new()
    } else {
        let items: String = outcome
            .warnings
            .iter()
            .map(|w| format!("<li>{}</li>", step_notice(w.step)))
            .collect();
        format!(
            r#"<div class="notice"><p>Your photo was uploaded, but some steps could not be completed:</p><ul>{items}</ul></div>"#
        )
    };

    page(
        "Entry received",
        &format!(
            r#"{notice}<dl>
<dt>Baby's name</dt><dd>{baby_name}</dd>
<dt>Baby's age</dt><dd>{baby_age}</dd>
<dt>Parent's name</dt><dd>{parent_name}</dd>
<dt>Contact</dt><dd>{contact}</dd>
<dt>Image URL</dt><dd><a href="{url}">{url}</a></dd>
</dl>
<img class="entry" src="{url}" alt="Photo of {baby_name}">
<p><a href="/">Submit another entry</a></p>"#,
            baby_name = escape(&fields.baby_name),
            baby_age = escape(&fields.baby_age),
            parent_name = escape(&fields.parent_name),
            contact = escape(&fields.contact),
        ),
    )
}

/// User-facing wording for a failed best-effort step. Error detail stays in
/// the server log.
fn step_notice(step: Step) -> &'static str {
    match step {
        Step::Stage | Step::Upload => "The photo could not be stored.",
        Step::AuditAppend => "The upload could not be written to the upload log.",
        Step::EntryInsert => "The entry could not be saved to the contest database.",
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
{STYLE}
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
