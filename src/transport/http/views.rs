//! Server-rendered HTML views.
//!
//! Every dynamic value passes through `escape` before it reaches the page.

use crate::domain::error::ValidationErrors;
use crate::domain::forms::{AddCafeForm, CSRF_FIELD};
use crate::domain::model::CafeRecord;
use axum::http::StatusCode;
use std::fmt::Write;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// Errors that belong to the form as a whole rather than one input.
pub const FORM_LEVEL_FIELDS: &[&str] = &[CSRF_FIELD, "id"];

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="{css}">
</head>
<body>
  <nav class="navbar navbar-expand navbar-dark bg-dark mb-4">
    <div class="container">
      <a class="navbar-brand" href="/">Cafe &amp; Wifi</a>
      <div class="navbar-nav">
        <a class="nav-link" href="/all">All Cafes</a>
        <a class="nav-link" href="/random">Random Cafe</a>
        <a class="nav-link" href="/add">Add Cafe</a>
      </div>
    </div>
  </nav>
  <main class="container">
{body}
  </main>
</body>
</html>
"#,
        title = escape(title),
        css = BOOTSTRAP_CSS,
        body = body
    )
}

pub fn index() -> String {
    layout(
        "Cafe & Wifi",
        r#"    <div class="p-5 mb-4 bg-light rounded-3">
      <h1 class="display-5 fw-bold">Cafe &amp; Wifi</h1>
      <p class="fs-5">Find a cafe with sockets, wifi and room to take calls. Add the ones you know and keep prices current.</p>
      <a class="btn btn-primary btn-lg" href="/all">Show all cafes</a>
      <a class="btn btn-outline-secondary btn-lg" href="/random">Pick one at random</a>
      <a class="btn btn-outline-success btn-lg" href="/add">Add a cafe</a>
    </div>"#,
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "✔"
    } else {
        "✘"
    }
}

/// The café table used by `/all` and `/random`.
pub fn cafes(heading: &str, cafes: &[CafeRecord], notice: Option<&str>) -> String {
    let mut body = format!("    <h1 class=\"mb-4\">{}</h1>\n", escape(heading));

    if cafes.is_empty() {
        let notice = notice.unwrap_or("There are no cafes yet.");
        let _ = writeln!(
            body,
            "    <div class=\"alert alert-info\">{} <a href=\"/add\">Add one</a>.</div>",
            escape(notice)
        );
        return layout(heading, &body);
    }

    body.push_str(
        r#"    <table class="table table-striped align-middle">
      <thead>
        <tr>
          <th>Name</th><th>Location</th><th>Map</th><th>Image</th><th>Seats</th>
          <th>Toilet</th><th>Wi-fi</th><th>Sockets</th><th>Calls</th><th>Coffee Price</th><th></th>
        </tr>
      </thead>
      <tbody>
"#,
    );
    for cafe in cafes {
        let _ = writeln!(
            body,
            "        <tr data-cafe-id=\"{id}\">\
<td>{name}</td><td>{location}</td>\
<td><a href=\"{map}\">Map</a></td>\
<td><img src=\"{img}\" alt=\"{name}\" width=\"80\"></td>\
<td>{seats}</td><td>{toilet}</td><td>{wifi}</td><td>{sockets}</td><td>{calls}</td>\
<td>{price}</td>\
<td><a class=\"btn btn-sm btn-outline-primary\" href=\"/update_price/{id}\">Update price</a> \
<a class=\"btn btn-sm btn-outline-danger\" href=\"/report-closed/{id}\">Report closed</a></td></tr>",
            id = cafe.id,
            name = escape(&cafe.name),
            location = escape(&cafe.location),
            map = escape(&cafe.map_url),
            img = escape(&cafe.img_url),
            seats = escape(&cafe.seats),
            toilet = yes_no(cafe.has_toilet),
            wifi = yes_no(cafe.has_wifi),
            sockets = yes_no(cafe.has_sockets),
            calls = yes_no(cafe.can_take_calls),
            price = escape(cafe.coffee_price.as_deref().unwrap_or("-")),
        );
    }
    body.push_str("      </tbody>\n    </table>");
    layout(heading, &body)
}

fn form_level_errors(errors: &ValidationErrors) -> String {
    let mut out = String::new();
    for e in errors.iter().filter(|e| FORM_LEVEL_FIELDS.contains(&e.field)) {
        let _ = writeln!(
            out,
            "      <div class=\"alert alert-danger\">{}</div>",
            escape(&e.message)
        );
    }
    out
}

fn field_errors(errors: &ValidationErrors, field: &str) -> String {
    errors
        .for_field(field)
        .iter()
        .map(|m| format!("<div class=\"invalid-feedback d-block\">{}</div>", escape(m)))
        .collect()
}

fn invalid_class(errors: &ValidationErrors, field: &str) -> &'static str {
    if errors.for_field(field).is_empty() {
        ""
    } else {
        " is-invalid"
    }
}

fn input(
    input_type: &str,
    name: &str,
    label: &str,
    value: Option<&str>,
    errors: &ValidationErrors,
) -> String {
    format!(
        "      <div class=\"mb-3\">\
<label class=\"form-label\" for=\"{name}\">{label}</label>\
<input class=\"form-control{invalid}\" type=\"{input_type}\" id=\"{name}\" name=\"{name}\" value=\"{value}\" required>\
{errors}</div>\n",
        name = name,
        label = escape(label),
        invalid = invalid_class(errors, name),
        input_type = input_type,
        value = escape(value.unwrap_or("")),
        errors = field_errors(errors, name),
    )
}

fn checkbox(name: &str, label: &str, checked: bool, errors: &ValidationErrors) -> String {
    format!(
        "      <div class=\"form-check mb-2\">\
<input class=\"form-check-input{invalid}\" type=\"checkbox\" id=\"{name}\" name=\"{name}\" value=\"y\"{checked}>\
<label class=\"form-check-label\" for=\"{name}\">{label}</label>\
{errors}</div>\n",
        name = name,
        label = escape(label),
        invalid = invalid_class(errors, name),
        checked = if checked { " checked" } else { "" },
        errors = field_errors(errors, name),
    )
}

fn form(action: &str, csrf_token: &str, errors: &ValidationErrors, fields: &str, submit: &str) -> String {
    format!(
        "    <form method=\"post\" action=\"{action}\" novalidate>\n\
{form_errors}\
      <input type=\"hidden\" name=\"{csrf_field}\" value=\"{token}\">\n\
{fields}\
      <button class=\"btn btn-primary\" type=\"submit\">{submit}</button>\n\
    </form>",
        action = escape(action),
        form_errors = form_level_errors(errors),
        csrf_field = CSRF_FIELD,
        token = escape(csrf_token),
        fields = fields,
        submit = escape(submit),
    )
}

pub fn add_form(values: &AddCafeForm, errors: &ValidationErrors, csrf_token: &str) -> String {
    let mut fields = String::new();
    fields.push_str(&input("text", "name", "Name", values.name.as_deref(), errors));
    fields.push_str(&input("url", "map_link", "Map Link", values.map_link.as_deref(), errors));
    fields.push_str(&input("url", "image_link", "Image Link", values.image_link.as_deref(), errors));
    fields.push_str(&input("text", "location", "Location", values.location.as_deref(), errors));
    fields.push_str(&checkbox("sockets", "Has Sockets", values.is_checked("sockets"), errors));
    fields.push_str(&checkbox("toilet", "Has Toilet", values.is_checked("toilet"), errors));
    fields.push_str(&checkbox("wi_fi", "Has Wi-fi", values.is_checked("wi_fi"), errors));
    fields.push_str(&checkbox("calls", "Can Take Calls", values.is_checked("calls"), errors));
    fields.push_str(&input("text", "seats", "Number Of Seats", values.seats.as_deref(), errors));
    fields.push_str(&input("text", "price", "Coffee Price", values.price.as_deref(), errors));

    let body = format!(
        "    <h1 class=\"mb-4\">Add a new cafe</h1>\n{}",
        form("/add", csrf_token, errors, &fields, "Add")
    );
    layout("Add Cafe", &body)
}

fn cafe_heading(prefix: &str, cafe: Option<&CafeRecord>) -> String {
    match cafe {
        Some(c) => format!("{} {}", prefix, c.name),
        None => prefix.to_string(),
    }
}

pub fn update_form(
    id: i64,
    cafe: Option<&CafeRecord>,
    price: Option<&str>,
    errors: &ValidationErrors,
    csrf_token: &str,
) -> String {
    let heading = cafe_heading("Update coffee price for", cafe);
    let current = cafe
        .and_then(|c| c.coffee_price.as_deref())
        .map(|p| format!("    <p>Current price: {}</p>\n", escape(p)))
        .unwrap_or_default();
    let fields = input("text", "price", "Enter new price", price, errors);
    let body = format!(
        "    <h1 class=\"mb-4\">{}</h1>\n{}{}",
        escape(&heading),
        current,
        form(&format!("/update_price/{}", id), csrf_token, errors, &fields, "Update")
    );
    layout("Update Price", &body)
}

/// The deletion key is never echoed back into the page.
pub fn delete_form(
    id: i64,
    cafe: Option<&CafeRecord>,
    errors: &ValidationErrors,
    csrf_token: &str,
) -> String {
    let heading = cafe_heading("Report closed:", cafe);
    let fields = input("password", "key", "Enter API KEY", None, errors);
    let body = format!(
        "    <h1 class=\"mb-4\">{}</h1>\n{}",
        escape(&heading),
        form(&format!("/report-closed/{}", id), csrf_token, errors, &fields, "Delete")
    );
    layout("Report Closed", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let body = format!(
        "    <h1>{}</h1>\n    <p>{}</p>\n    <a href=\"/all\">Back to all cafes</a>",
        escape(&title),
        escape(message)
    );
    layout(&title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::REQUIRED_MESSAGE;

    fn cafe(name: &str) -> CafeRecord {
        CafeRecord {
            id: 1,
            name: name.to_string(),
            map_url: "https://maps.example/a?x=1&y=2".to_string(),
            img_url: "https://img.example/a.jpg".to_string(),
            location: "Soho".to_string(),
            seats: "10-20".to_string(),
            has_toilet: true,
            has_wifi: false,
            has_sockets: true,
            can_take_calls: false,
            coffee_price: None,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom's" & co</b>"#),
            "&lt;b&gt;&quot;Tom&#x27;s&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn cafe_table_escapes_user_content() {
        let page = cafes("All Cafes", &[cafe("<script>alert(1)</script>")], None);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("x=1&amp;y=2"));
        assert!(page.contains("/update_price/1"));
        assert!(page.contains("/report-closed/1"));
    }

    #[test]
    fn empty_table_shows_notice() {
        let page = cafes("Random Cafe", &[], Some("Nothing to pick from."));
        assert!(page.contains("Nothing to pick from."));
        assert!(!page.contains("<table"));
    }

    #[test]
    fn add_form_keeps_values_and_marks_errors() {
        let values = AddCafeForm {
            name: Some("Half Cup".to_string()),
            sockets: Some("y".to_string()),
            ..AddCafeForm::default()
        };
        let mut errors = ValidationErrors::new();
        errors.push("location", REQUIRED_MESSAGE);
        errors.push(CSRF_FIELD, "The CSRF token is missing.");

        let page = add_form(&values, &errors, "tok.en.sig");

        assert!(page.contains("value=\"Half Cup\""));
        assert!(page.contains("id=\"sockets\" name=\"sockets\" value=\"y\" checked"));
        assert!(page.contains(REQUIRED_MESSAGE));
        assert!(page.contains("The CSRF token is missing."));
        assert!(page.contains("name=\"csrf_token\" value=\"tok.en.sig\""));
    }

    #[test]
    fn delete_form_never_prefills_key() {
        let page = delete_form(4, Some(&cafe("Gone")), &ValidationErrors::new(), "t");
        assert!(page.contains("Report closed: Gone"));
        assert!(page.contains("type=\"password\" id=\"key\" name=\"key\" value=\"\""));
    }
}
