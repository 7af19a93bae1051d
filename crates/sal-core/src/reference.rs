//! Static lookup tables: country codes and display labels

use std::borrow::Cow;

use ahash::AHashMap;
use once_cell::sync::Lazy;

use crate::record::CategoryField;

/// ISO alpha-2 to ISO numeric country codes for every location in the salary dataset.
/// The numeric codes match the feature ids of the world geometry.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("AE", "784"), // United Arab Emirates
    ("AL", "008"), // Albania
    ("AM", "051"), // Armenia
    ("AR", "032"), // Argentina
    ("AS", "016"), // American Samoa
    ("AT", "040"), // Austria
    ("AU", "036"), // Australia
    ("BA", "070"), // Bosnia and Herzegovina
    ("BE", "056"), // Belgium
    ("BO", "068"), // Bolivia
    ("BR", "076"), // Brazil
    ("BS", "044"), // Bahamas
    ("CA", "124"), // Canada
    ("CF", "140"), // Central African Republic
    ("CH", "756"), // Switzerland
    ("CL", "152"), // Chile
    ("CN", "156"), // China
    ("CO", "170"), // Colombia
    ("CR", "188"), // Costa Rica
    ("CZ", "203"), // Czech Republic
    ("DE", "276"), // Germany
    ("DK", "208"), // Denmark
    ("DZ", "012"), // Algeria
    ("EE", "233"), // Estonia
    ("EG", "818"), // Egypt
    ("ES", "724"), // Spain
    ("FI", "246"), // Finland
    ("FR", "250"), // France
    ("GB", "826"), // United Kingdom
    ("GH", "288"), // Ghana
    ("GR", "300"), // Greece
    ("HK", "344"), // Hong Kong
    ("HN", "340"), // Honduras
    ("HR", "191"), // Croatia
    ("HU", "348"), // Hungary
    ("ID", "360"), // Indonesia
    ("IE", "372"), // Ireland
    ("IL", "376"), // Israel
    ("IN", "356"), // India
    ("IQ", "368"), // Iraq
    ("IR", "364"), // Iran
    ("IT", "380"), // Italy
    ("JP", "392"), // Japan
    ("KE", "404"), // Kenya
    ("LT", "440"), // Lithuania
    ("LU", "442"), // Luxembourg
    ("LV", "428"), // Latvia
    ("MA", "504"), // Morocco
    ("MD", "498"), // Moldova
    ("MK", "807"), // North Macedonia
    ("MT", "470"), // Malta
    ("MX", "484"), // Mexico
    ("MY", "458"), // Malaysia
    ("NG", "566"), // Nigeria
    ("NL", "528"), // Netherlands
    ("NZ", "554"), // New Zealand
    ("PH", "608"), // Philippines
    ("PK", "586"), // Pakistan
    ("PL", "616"), // Poland
    ("PR", "630"), // Puerto Rico
    ("PT", "620"), // Portugal
    ("RO", "642"), // Romania
    ("RU", "643"), // Russia
    ("SE", "752"), // Sweden
    ("SG", "702"), // Singapore
    ("SI", "705"), // Slovenia
    ("SK", "703"), // Slovakia
    ("TH", "764"), // Thailand
    ("TR", "792"), // Turkey
    ("UA", "804"), // Ukraine
    ("US", "840"), // United States
    ("VN", "704"), // Vietnam
];

/// Lookup from alpha-2 to numeric country code
#[derive(Debug, Clone, Default)]
pub struct CountryCodeMap {
    codes: AHashMap<String, String>,
}

impl CountryCodeMap {
    /// Build a map from explicit pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            codes: pairs
                .into_iter()
                .map(|(alpha2, numeric)| (alpha2.to_string(), numeric.to_string()))
                .collect(),
        }
    }

    /// The built-in table
    pub fn builtin() -> &'static CountryCodeMap {
        static BUILTIN: Lazy<CountryCodeMap> =
            Lazy::new(|| CountryCodeMap::from_pairs(COUNTRY_CODES.iter().copied()));
        &BUILTIN
    }

    pub fn get(&self, alpha2: &str) -> Option<&str> {
        self.codes.get(alpha2).map(String::as_str)
    }

    /// Key used to group a location: the numeric code when known, the raw code otherwise.
    pub fn normalize<'a>(&'a self, location: &'a str) -> &'a str {
        self.get(location).unwrap_or(location)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Display label for a categorical value; unknown values are shown verbatim.
pub fn label_for(field: CategoryField, key: &str) -> Cow<'_, str> {
    let label = match field {
        CategoryField::RemoteRatio => match key {
            "0" => Some("No Remote"),
            "50" => Some("Hybrid"),
            "100" => Some("Remote"),
            _ => None,
        },
        CategoryField::CompanySize => match key {
            "S" => Some("Small"),
            "M" => Some("Medium"),
            "L" => Some("Large"),
            _ => None,
        },
        CategoryField::EmploymentType => match key {
            "PT" => Some("Part Time"),
            "FT" => Some("Full Time"),
            "CT" => Some("Contract"),
            _ => None,
        },
        CategoryField::ExperienceLevel => key
            .parse::<crate::record::ExperienceLevel>()
            .ok()
            .map(|level| level.label()),
        CategoryField::JobTitle => None,
    };

    match label {
        Some(label) => Cow::Borrowed(label),
        None => Cow::Borrowed(key),
    }
}
