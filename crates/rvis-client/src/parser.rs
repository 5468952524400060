use rvis_core::models::{ScriptLocation, TableRow};
use rvis_core::traits::PageParser;

use crate::script::extract_script_locations;
use crate::table::extract_table_rows;
use crate::token::extract_token;

/// [`PageParser`] for the registry's search pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryPageParser;

impl RegistryPageParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for RegistryPageParser {
    fn token(&self, html: &str) -> Option<String> {
        extract_token(html)
    }

    fn script_locations(&self, html: &str) -> Vec<ScriptLocation> {
        extract_script_locations(html)
    }

    fn table_rows(&self, html: &str) -> Vec<TableRow> {
        extract_table_rows(html)
    }
}
