//! Search API: query construction, execution and response shaping.

pub mod search_solr;

mod search_for_results;
pub use search_for_results::{execute_query, normalize_documents, search_by_entities, search_by_patent_ids, search_for_results};

mod search_for_results_hit_count;
pub use search_for_results_hit_count::total_stats;


pub mod search_facets;
pub use search_facets::{examiner_stats_by_date, stats_by_date_range};
