use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored café listing.
///
/// Field names double as the JSON shape returned by `/find`, so they must not
/// be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CafeRecord {
    pub id: i64,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    /// Free-form currency string (e.g. `£2.50`).
    pub coffee_price: Option<String>,
}

/// A validated café that has not been stored yet.
///
/// Produced by `AddCafeForm::validate`; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

impl NewCafe {
    /// Attaches the storage-assigned id.
    pub fn into_record(self, id: i64) -> CafeRecord {
        CafeRecord {
            id,
            name: self.name,
            map_url: self.map_url,
            img_url: self.img_url,
            location: self.location,
            seats: self.seats,
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            has_sockets: self.has_sockets,
            can_take_calls: self.can_take_calls,
            coffee_price: self.coffee_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_find_endpoint_field_names() {
        let cafe = CafeRecord {
            id: 7,
            name: "Science Gallery".to_string(),
            map_url: "https://maps.example/sg".to_string(),
            img_url: "https://img.example/sg.jpg".to_string(),
            location: "London Bridge".to_string(),
            seats: "20-30".to_string(),
            has_toilet: true,
            has_wifi: false,
            has_sockets: true,
            can_take_calls: true,
            coffee_price: None,
        };

        let value = serde_json::to_value(&cafe).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "Science Gallery",
                "map_url": "https://maps.example/sg",
                "img_url": "https://img.example/sg.jpg",
                "location": "London Bridge",
                "seats": "20-30",
                "has_toilet": true,
                "has_wifi": false,
                "has_sockets": true,
                "can_take_calls": true,
                "coffee_price": null
            })
        );
    }
}
