use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::ObservationTable;

/// Qualitative palette: Plotly Alphabet, then Dark24, then Dark2.
pub const PALETTE: &[&str] = &[
    // Alphabet
    "#AA0DFE", "#3283FE", "#85660D", "#782AB6", "#565656", "#1C8356", "#16FF32", "#F7E1A0",
    "#E2E2E2", "#1CBE4F", "#C4451C", "#DEA0FD", "#FE00FA", "#325A9B", "#FEAF16", "#F8A19F",
    "#90AD1C", "#F6222E", "#1CFFCE", "#2ED9FF", "#B10DA1", "#C075A6", "#FC1CBF", "#B00068",
    "#FBE426", "#FA0087",
    // Dark24
    "#2E91E5", "#E15F99", "#1CA71C", "#FB0D0D", "#DA16FF", "#222A2A", "#B68100", "#750D86",
    "#EB663B", "#511CFB", "#00A08B", "#FB00D1", "#FC0080", "#B2828D", "#6C7C32", "#778AAE",
    "#862A16", "#A777F1", "#620042", "#1616A7", "#DA60CA", "#6C4516", "#0D2A63", "#AF0038",
    // Dark2
    "#1B9E77", "#D95F02", "#7570B3", "#E7298A", "#66A61E", "#E6AB02", "#A6761D", "#666666",
];

/// Color for the `index`-th catalog entry. Wraps around once the palette is
/// exhausted.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Distinct entities and codes in first-appearance order, with their colors.
///
/// Built once at load; immutable afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityCatalog {
    entities: Vec<String>,
    codes: Vec<String>,
    #[serde(skip)]
    entity_index: HashMap<String, usize>,
    #[serde(skip)]
    code_index: HashMap<String, usize>,
    #[serde(skip)]
    code_of: HashMap<String, String>,
}

impl EntityCatalog {
    pub fn from_table(table: &ObservationTable) -> Self {
        let mut catalog = Self::default();
        let mut seen_entities = HashSet::new();
        let mut seen_codes = HashSet::new();

        for row in table.iter() {
            if seen_entities.insert(row.location.as_str()) {
                catalog
                    .entity_index
                    .insert(row.location.clone(), catalog.entities.len());
                catalog.entities.push(row.location.clone());
                catalog
                    .code_of
                    .insert(row.location.clone(), row.iso_code.clone());
            }
            if seen_codes.insert(row.iso_code.as_str()) {
                catalog
                    .code_index
                    .insert(row.iso_code.clone(), catalog.codes.len());
                catalog.codes.push(row.iso_code.clone());
            }
        }

        catalog
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Code recorded for an entity.
    pub fn code_of(&self, entity: &str) -> Option<&str> {
        self.code_of.get(entity).map(String::as_str)
    }

    pub fn entity_color(&self, entity: &str) -> Option<&'static str> {
        self.entity_index.get(entity).map(|i| palette_color(*i))
    }

    pub fn code_color(&self, code: &str) -> Option<&'static str> {
        self.code_index.get(code).map(|i| palette_color(*i))
    }

    /// Code → color pairs in catalog order.
    pub fn code_colors(&self) -> Vec<(String, &'static str)> {
        self.codes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), palette_color(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::fixtures::obs;

    fn table() -> ObservationTable {
        ObservationTable::from_observations(vec![
            obs(0, "Germany", "DEU", "2021-01-01", 1.0, 0.0),
            obs(0, "France", "FRA", "2021-01-01", 1.0, 0.0),
            obs(0, "Germany", "DEU", "2021-01-02", 2.0, 0.0),
            obs(0, "Italy", "ITA", "2021-01-01", 1.0, 0.0),
        ])
    }

    #[test]
    fn test_first_appearance_order() {
        let catalog = EntityCatalog::from_table(&table());
        assert_eq!(catalog.entities(), ["Germany", "France", "Italy"]);
        assert_eq!(catalog.codes(), ["DEU", "FRA", "ITA"]);
        assert_eq!(catalog.code_of("France"), Some("FRA"));
        assert_eq!(catalog.code_of("Spain"), None);
    }

    #[test]
    fn test_colors_are_a_palette_prefix() {
        let catalog = EntityCatalog::from_table(&table());
        let colors: Vec<_> = catalog
            .entities()
            .iter()
            .filter_map(|e| catalog.entity_color(e))
            .collect();
        assert_eq!(colors, PALETTE[..3]);

        assert_eq!(catalog.entity_color("Italy"), Some(PALETTE[2]));
        assert_eq!(catalog.code_color("DEU"), Some(PALETTE[0]));
        assert_eq!(catalog.entity_color("Atlantis"), None);
    }

    #[test]
    fn test_colors_are_stable_across_calls() {
        let catalog = EntityCatalog::from_table(&table());
        assert_eq!(catalog.entity_color("France"), catalog.entity_color("France"));
        assert_eq!(
            EntityCatalog::from_table(&table()).code_colors(),
            catalog.code_colors()
        );
    }

    #[test]
    fn test_palette_wraps_when_exhausted() {
        assert_eq!(PALETTE.len(), 58);
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
        assert_eq!(palette_color(59), PALETTE[1]);
    }
}
