pub mod u101_enrich_csv;
pub mod u102_mailbox_monitor;
