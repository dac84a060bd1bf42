// cmcd2timestream - CDN real-time logs with CMCD telemetry into Amazon Timestream
//
// The Lambda runtime lives in `cmcd2timestream-lambda`. This package carries
// the local command-line tooling: replaying captured logs through the same
// pipeline and inspecting the field schemas.

mod init;
mod replay;
mod schema_table;

pub use init::init_tracing;
pub use replay::{read_input, replay_lines, run_replay, InputFormat, ReplayOptions};
pub use schema_table::render_schema;
