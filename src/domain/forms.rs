//! Submitted HTML forms and their required-field validation.
//!
//! Every field is optional at the deserialization layer so a partially filled
//! form still reaches validation and can be re-rendered with the values the
//! user typed.

use crate::domain::error::{ValidationErrors, REQUIRED_MESSAGE};
use crate::domain::model::NewCafe;
use serde::Deserialize;

/// Name of the hidden anti-forgery input carried by every form.
pub const CSRF_FIELD: &str = "csrf_token";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddCafeForm {
    pub name: Option<String>,
    pub map_link: Option<String>,
    pub image_link: Option<String>,
    pub location: Option<String>,
    pub sockets: Option<String>,
    pub toilet: Option<String>,
    pub wi_fi: Option<String>,
    pub calls: Option<String>,
    pub seats: Option<String>,
    pub price: Option<String>,
    pub csrf_token: Option<String>,
}

impl AddCafeForm {
    /// Checks every required field and builds the record to insert.
    pub fn validate(&self) -> Result<NewCafe, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", &self.name);
        let map_url = required_text(&mut errors, "map_link", &self.map_link);
        let img_url = required_text(&mut errors, "image_link", &self.image_link);
        let location = required_text(&mut errors, "location", &self.location);
        let has_sockets = required_checkbox(&mut errors, "sockets", &self.sockets);
        let has_toilet = required_checkbox(&mut errors, "toilet", &self.toilet);
        let has_wifi = required_checkbox(&mut errors, "wi_fi", &self.wi_fi);
        let can_take_calls = required_checkbox(&mut errors, "calls", &self.calls);
        let seats = required_text(&mut errors, "seats", &self.seats);
        let price = required_text(&mut errors, "price", &self.price);

        errors.into_result()?;

        Ok(NewCafe {
            name: name.unwrap_or_default(),
            map_url: map_url.unwrap_or_default(),
            img_url: img_url.unwrap_or_default(),
            location: location.unwrap_or_default(),
            seats: seats.unwrap_or_default(),
            has_toilet,
            has_wifi,
            has_sockets,
            can_take_calls,
            coffee_price: price,
        })
    }

    /// Whether the checkbox `field` was ticked in this submission.
    pub fn is_checked(&self, field: &str) -> bool {
        let value = match field {
            "sockets" => &self.sockets,
            "toilet" => &self.toilet,
            "wi_fi" => &self.wi_fi,
            "calls" => &self.calls,
            _ => return false,
        };
        checkbox_value(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceUpdateForm {
    pub price: Option<String>,
    pub csrf_token: Option<String>,
}

impl PriceUpdateForm {
    /// Returns the new price exactly as submitted.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let price = required_text(&mut errors, "price", &self.price);
        errors.into_result()?;
        Ok(price.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub key: Option<String>,
    pub csrf_token: Option<String>,
}

impl DeleteForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "key", &self.key);
        errors.into_result()
    }
}

/// Whitespace-only input counts as missing; accepted values are kept untrimmed.
fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.clone()),
        _ => {
            errors.push(field, REQUIRED_MESSAGE);
            None
        }
    }
}

/// Browsers omit unchecked boxes; an explicit `false` or empty value is also unchecked.
fn checkbox_value(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some(v) if !v.is_empty() && v != "false")
}

fn required_checkbox(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
) -> bool {
    let checked = checkbox_value(value);
    if !checked {
        errors.push(field, REQUIRED_MESSAGE);
    }
    checked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> AddCafeForm {
        AddCafeForm {
            name: Some("Lighthaus".to_string()),
            map_link: Some("https://goo.gl/maps/lighthaus".to_string()),
            image_link: Some("https://img.example/lighthaus.jpg".to_string()),
            location: Some("Clerkenwell".to_string()),
            sockets: Some("y".to_string()),
            toilet: Some("y".to_string()),
            wi_fi: Some("y".to_string()),
            calls: Some("y".to_string()),
            seats: Some("20-30".to_string()),
            price: Some("£2.40".to_string()),
            csrf_token: None,
        }
    }

    #[test]
    fn complete_add_form_builds_new_cafe() {
        let cafe = complete_form().validate().unwrap();
        assert_eq!(cafe.name, "Lighthaus");
        assert_eq!(cafe.map_url, "https://goo.gl/maps/lighthaus");
        assert_eq!(cafe.img_url, "https://img.example/lighthaus.jpg");
        assert!(cafe.has_sockets && cafe.has_toilet && cafe.has_wifi && cafe.can_take_calls);
        assert_eq!(cafe.coffee_price.as_deref(), Some("£2.40"));
    }

    #[test]
    fn empty_add_form_lists_every_field_in_order() {
        let errors = AddCafeForm::default().validate().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                "name",
                "map_link",
                "image_link",
                "location",
                "sockets",
                "toilet",
                "wi_fi",
                "calls",
                "seats",
                "price"
            ]
        );
    }

    #[test]
    fn unchecked_amenity_fails_validation() {
        let mut form = complete_form();
        form.calls = None;
        form.toilet = Some("false".to_string());

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["toilet", "calls"]);
    }

    #[test]
    fn whitespace_only_text_is_missing_but_padding_is_kept() {
        let mut form = complete_form();
        form.seats = Some("   ".to_string());
        assert_eq!(form.validate().unwrap_err().fields(), vec!["seats"]);

        let mut form = complete_form();
        form.location = Some(" Soho ".to_string());
        assert_eq!(form.validate().unwrap().location, " Soho ");
    }

    #[test]
    fn price_and_delete_forms_require_their_field() {
        assert_eq!(
            PriceUpdateForm::default().validate().unwrap_err().fields(),
            vec!["price"]
        );
        let price = PriceUpdateForm {
            price: Some("£3.00".to_string()),
            csrf_token: None,
        };
        assert_eq!(price.validate().unwrap(), "£3.00");

        assert_eq!(
            DeleteForm::default().validate().unwrap_err().fields(),
            vec!["key"]
        );
    }
}
