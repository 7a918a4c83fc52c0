pub mod enrich_csv;
