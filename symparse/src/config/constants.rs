pub mod compile_time {
    pub mod tabular {
        /// Maximum number of columns a column set may declare
        /// RESOURCE: bounds the per-row value vector and the header lookup
        pub const MAX_COLUMNS: usize = 4096;
    }

    pub mod logging {
        /// Maximum events retained by the in-memory logger
        /// RESOURCE: oldest events are dropped once the buffer is full
        pub const EVENT_BUFFER_SIZE: usize = 10_000;
    }
}
