//! Metric names emitted by the Store.
//!
//! The runtime records through the `metrics` facade only. Whichever
//! recorder the host application installs (none in tests) receives them.

use ::metrics::{describe_counter, describe_histogram, Unit};

/// Total actions sent to any store
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Effects executed, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Number of effects returned per reducer call
pub const EFFECTS_COUNT: &str = "store.effects.count";

/// Time spent inside `Reducer::reduce`
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Actions rejected because the store was shutting down
pub const SHUTDOWN_REJECTED: &str = "store.shutdown.rejected_actions";

/// Register descriptions for every store metric.
///
/// Call once after installing a recorder. Safe to call without one.
pub fn describe_store_metrics() {
    describe_counter!(COMMANDS_TOTAL, Unit::Count, "Actions processed by stores");
    describe_counter!(
        EFFECTS_EXECUTED,
        Unit::Count,
        "Effects executed by stores, by effect type"
    );
    describe_histogram!(
        EFFECTS_COUNT,
        Unit::Count,
        "Effects produced per reducer invocation"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Reducer execution time"
    );
    describe_counter!(
        SHUTDOWN_REJECTED,
        Unit::Count,
        "Actions rejected during shutdown"
    );
}
