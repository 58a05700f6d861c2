pub mod dataset;
pub mod flow_table;
pub mod fund;
