pub mod process_stats;

pub use process_stats::ProcessSnapshot;
