use serde::{Deserialize, Serialize};

/// Document order of play-by-play rows on the vendor page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOrder {
    /// Oldest row first
    #[default]
    Ascending,
    /// Newest row first; rows are reversed before numbering
    Descending,
}

/// Configuration for the structural parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Play-by-play row order as rendered (default: ascending)
    pub row_order: RowOrder,

    /// Leader categories to read, by vendor stat id
    pub leader_categories: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            row_order: RowOrder::Ascending,
            leader_categories: vec![
                "sPoints".to_string(),
                "sReboundsTotal".to_string(),
                "sAssists".to_string(),
            ],
        }
    }
}

impl ParserConfig {
    /// Read every leader category the vendor publishes
    pub fn all_leaders() -> Self {
        Self {
            leader_categories: vec![
                "sPoints".to_string(),
                "sReboundsTotal".to_string(),
                "sAssists".to_string(),
                "sSteals".to_string(),
                "sBlocks".to_string(),
            ],
            ..Default::default()
        }
    }
}
