/*!
# Blueprint DevKit - test doubles and fixtures

- `RecordedRunner`: replays canned command output instead of spawning processes
- `RecordingReporter`: captures driver events for assertions
- `SnapshotBuilder` and sample snapshots
- `TestWorkspace`: scratch directory with a config pointing into it
*/

pub mod fixtures;
pub mod recorder;
pub mod runner_stub;
pub mod workspace;

pub use fixtures::{sample_snapshot, SnapshotBuilder, SAMPLE_CRONTAB, SAMPLE_SSHD_CONFIG};
pub use recorder::{RecordingReporter, ReportEvent};
pub use runner_stub::RecordedRunner;
pub use workspace::TestWorkspace;

/// Install a test subscriber once; later calls are no-ops
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
