pub mod ts;

pub use ts::{ParsedModule, parse_ts_source};
