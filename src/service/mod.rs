pub mod clock;
pub mod geo;
pub mod holiday;
pub mod ledger;
pub mod report;
pub mod request_flow;
pub mod schedule;
pub mod time_accounting;
