/// Column order of the persisted output.
pub const CSV_HEADER: [&str; 6] = ["county", "name", "phone", "address", "lat", "lng"];

/// A coordinate entry parsed from the page's inline `locations` array.
///
/// Coordinates are optional because the strict parse keeps every object of
/// the array, including ones the site rendered without a position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptLocation {
    pub label: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl ScriptLocation {
    pub fn new(label: Option<&str>, lat: f64, lng: f64) -> Self {
        Self {
            label: label.map(str::to_string),
            lat: Some(lat),
            lng: Some(lng),
        }
    }
}

/// One data row of the results table, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub county: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// The persisted unit: a table row merged with its coordinates.
///
/// Empty text fields serialize as empty strings and unresolved coordinates
/// as empty cells, never as `0`.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct LocationRecord {
    pub county: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationRecord {
    /// Start a record from a table row, without coordinates.
    pub fn from_row(row: &TableRow) -> Self {
        Self {
            county: row.county.clone(),
            name: row.name.clone(),
            phone: row.phone.clone(),
            address: row.address.clone(),
            lat: None,
            lng: None,
        }
    }

    /// A coordinate-only record for a script entry with no table row.
    pub fn from_script(location: &ScriptLocation) -> Self {
        Self {
            name: location.label.clone().unwrap_or_default(),
            lat: location.lat,
            lng: location.lng,
            ..Self::default()
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

/// Optional narrowing of the search form. All empty requests the full listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilter {
    pub county: String,
    pub town: String,
    pub village: String,
}

/// The search form submitted for every page.
#[derive(Debug, Clone)]
pub struct SearchForm<'a> {
    pub token: &'a str,
    pub page: u32,
    pub filter: &'a SearchFilter,
}

impl SearchForm<'_> {
    /// Form fields in submission order.
    pub fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("_csrf".to_string(), self.token.to_string()),
            ("p".to_string(), self.page.to_string()),
            ("countySel".to_string(), self.filter.county.clone()),
            ("townSel".to_string(), self.filter.town.clone()),
            ("villageSel".to_string(), self.filter.village.clone()),
        ]
    }
}

/// HTTP method used by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request issued through a [`crate::traits::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub method: Method,
    /// URL-form-encoded body fields; empty for GET.
    pub form: Vec<(String, String)>,
    /// Page the form lives on, sent as `Referer` with submissions.
    pub referer: Option<String>,
}

impl PageRequest {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: Method::Get,
            form: Vec::new(),
            referer: None,
        }
    }

    pub fn post_form(url: &str, form: Vec<(String, String)>, referer: &str) -> Self {
        Self {
            url: url.to_string(),
            method: Method::Post,
            form,
            referer: Some(referer.to_string()),
        }
    }
}

/// Raw response body and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}
