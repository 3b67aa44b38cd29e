pub mod load_data;
pub mod save_data;

pub use load_data::{load_rule_set, load_search_config, load_stock, load_targets};
pub use save_data::{save_results_json, save_summary_csv, BatchReport};
