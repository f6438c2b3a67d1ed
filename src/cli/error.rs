use rayon::ThreadPoolBuildError;
use shtester::test_file::ReadError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    FailedToReadTestFile { path: String, source: ReadError },

    #[error("the shell '{program}' was not found: {source}")]
    ShellNotFound {
        program: String,
        source: which::Error,
    },

    #[error("failed to start worker pool: {0}")]
    FailedToStartWorkers(#[from] ThreadPoolBuildError),
}
