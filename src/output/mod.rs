pub mod export;
pub mod formatter;

pub use export::{export_csv, write_csv};
pub use formatter::{
    format_catalog, format_json, format_ranking_table, format_score, format_tsv, format_weights,
    should_use_colors,
};
