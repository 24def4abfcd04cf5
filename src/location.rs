//! Display formatting for place name + country pairs.
//!
//! Geocoders frequently return place names that already carry the country
//! ("Onomichi, Japan"). These helpers strip that redundancy and decide
//! whether the country belongs in the rendered label at all, given an
//! optional context country (e.g. the heading of the section the label
//! appears under).

/// A cleaned place name with the country to display alongside it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLocation {
    pub name: String,
    pub country: Option<String>,
}

/// Strip one trailing occurrence of `country` from `name`, case-insensitively.
///
/// Separators are tried in priority order: `", "`, then `" "`, then `","`.
/// Returns the input unchanged when no suffix matches.
fn strip_country_suffix(name: &str, country: &str) -> String {
    if country.is_empty() {
        return name.to_string();
    }
    let name_lower = name.to_lowercase();
    let country_lower = country.to_lowercase();
    for separator in [", ", " ", ","] {
        let suffix = format!("{}{}", separator, country_lower);
        if name_lower.len() > suffix.len() && name_lower.ends_with(&suffix) {
            let keep = name_lower[..name_lower.len() - suffix.len()].chars().count();
            return name.chars().take(keep).collect();
        }
    }
    name.to_string()
}

/// Split a raw place name + country into display parts.
///
/// The country is part of the result only when no context country was given
/// and `country` is non-empty, or when the context country differs from
/// `country` case-insensitively. A place shown inside its own country's
/// section keeps just the name.
pub fn split_location(name: &str, country: &str, context_country: Option<&str>) -> SplitLocation {
    if name.trim().is_empty() {
        return SplitLocation {
            name: String::new(),
            country: None,
        };
    }

    // Double strip: the raw name can carry either the place's own country
    // or the surrounding context's. Stripping is idempotent when no match.
    let mut cleaned = strip_country_suffix(name, country);
    if let Some(context) = context_country {
        cleaned = strip_country_suffix(&cleaned, context);
    }

    let include_country = match context_country {
        None => !country.is_empty(),
        Some(context) => !country.is_empty() && !context.eq_ignore_ascii_case(country),
    };

    SplitLocation {
        name: cleaned,
        country: include_country.then(|| country.to_string()),
    }
}

/// Render a location as `"Name, Country"` or just `"Name"`.
pub fn format_location(name: &str, country: &str, context_country: Option<&str>) -> String {
    let split = split_location(name, country, context_country);
    match split.country {
        Some(country) => format!("{}, {}", split.name, country),
        None => split.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_comma_space_suffix() {
        let split = split_location("Onomichi, Japan", "Japan", None);
        assert_eq!(split.name, "Onomichi");
        assert_eq!(split.country.as_deref(), Some("Japan"));
    }

    #[test]
    fn test_strips_space_and_bare_comma_suffixes() {
        assert_eq!(split_location("Onomichi Japan", "Japan", None).name, "Onomichi");
        assert_eq!(split_location("Onomichi,Japan", "Japan", None).name, "Onomichi");
    }

    #[test]
    fn test_strip_is_case_insensitive() {
        assert_eq!(split_location("Onomichi, JAPAN", "Japan", None).name, "Onomichi");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = split_location("Onomichi, Japan", "Japan", None);
        let twice = split_location(&once.name, "Japan", None);
        assert_eq!(once.name, twice.name);
    }

    #[test]
    fn test_context_country_suppresses_country() {
        let split = split_location("Tokyo", "Japan", Some("Japan"));
        assert_eq!(split.name, "Tokyo");
        assert_eq!(split.country, None);

        let split = split_location("Tokyo", "Japan", Some("japan"));
        assert_eq!(split.country, None);
    }

    #[test]
    fn test_differing_context_country_keeps_country() {
        let split = split_location("Tokyo", "Japan", Some("Thailand"));
        assert_eq!(split.country.as_deref(), Some("Japan"));
    }

    #[test]
    fn test_context_country_is_also_stripped() {
        // Name tagged with the section's country rather than its own
        let split = split_location("Chiang Mai, Thailand", "Thailand", Some("Thailand"));
        assert_eq!(split.name, "Chiang Mai");
        assert_eq!(split.country, None);
    }

    #[test]
    fn test_empty_name_yields_empty_result() {
        let split = split_location("  ", "Japan", None);
        assert_eq!(split.name, "");
        assert_eq!(split.country, None);
    }

    #[test]
    fn test_empty_country_is_omitted() {
        let split = split_location("Somewhere", "", None);
        assert_eq!(split.name, "Somewhere");
        assert_eq!(split.country, None);
    }

    #[test]
    fn test_name_equal_to_country_is_kept() {
        // "Japan" alone must not strip down to an empty name
        let split = split_location("Japan", "Japan", None);
        assert_eq!(split.name, "Japan");
    }

    #[test]
    fn test_format_location() {
        assert_eq!(format_location("Kyoto, Japan", "Japan", None), "Kyoto, Japan");
        assert_eq!(format_location("Kyoto", "Japan", Some("Japan")), "Kyoto");
    }
}
