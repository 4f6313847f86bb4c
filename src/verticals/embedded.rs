const WEDDINGS_VERTICAL: &str = include_str!("../../verticals/weddings.json");
const CORPORATE_VERTICAL: &str = include_str!("../../verticals/corporate.json");
const PORTRAITS_VERTICAL: &str = include_str!("../../verticals/portraits.json");

/// All built-in verticals in display order.
const ALL_VERTICALS: &[(&str, &str)] = &[
    ("weddings", WEDDINGS_VERTICAL),
    ("corporate", CORPORATE_VERTICAL),
    ("portraits", PORTRAITS_VERTICAL),
];

/// Look up a built-in vertical's JSON by id.
pub fn get_embedded(id: &str) -> Option<&'static str> {
    ALL_VERTICALS
        .iter()
        .find(|(vid, _)| *vid == id)
        .map(|(_, json)| *json)
}

/// Ids of all built-in verticals, in display order.
pub fn embedded_ids() -> impl Iterator<Item = &'static str> {
    ALL_VERTICALS.iter().map(|(id, _)| *id)
}

/// List all built-in verticals as (id, label, description).
pub fn list_embedded() -> Vec<(String, String, String)> {
    let mut result = Vec::new();
    for (id, json) in ALL_VERTICALS {
        if let Ok(vertical) = serde_json::from_str::<super::schema::Vertical>(json) {
            result.push((vertical.id, vertical.label, vertical.description));
        } else {
            result.push((id.to_string(), id.to_string(), String::new()));
        }
    }
    result
}
