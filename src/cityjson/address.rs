use super::Properties;

/// Allow-list of source address keys and their CityJSON (xAL) names.
pub const ADDRESS_RENAMES: &[(&str, &str)] = &[
    ("addr:housenumber", "ThoroughfareNumber"),
    ("addr:street", "ThoroughfareName"),
    ("addr:city", "LocalityName"),
    ("addr:postcode", "PostalCode"),
    ("addr:country", "CountryName"),
];

/// Builds the address object of a city object.
///
/// Only keys in [`ADDRESS_RENAMES`] are kept; null values are dropped.
#[must_use]
pub fn map_address(properties: &Properties) -> Properties {
    properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(key, value)| {
            ADDRESS_RENAMES
                .iter()
                .find(|(from, _)| from == key)
                .map(|(_, to)| ((*to).to_owned(), value.clone()))
        })
        .collect()
}
