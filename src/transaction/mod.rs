pub mod handlers;
pub mod models;
pub mod service;
pub mod stats;

// Re-export handlers for use in main.rs
pub use handlers::{
    create_transaction, delete_transaction, get_monthly_summary, get_stats, list_transactions,
    update_transaction,
};

pub use models::{Transaction, TransactionKind};
pub use service::TransactionService;
pub use stats::{
    compute_aggregate_stats, compute_monthly_summary, AggregateStats, MonthTotals, MonthlySummary,
    StatsError, MONTH_ABBREVIATIONS,
};
