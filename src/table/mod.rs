pub mod columns;
pub mod observation_table;
pub mod reshape;
