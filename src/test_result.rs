pub struct TestResult {
    pub stdout: ValueComparison<Vec<u8>>,
    // Captured for diagnostics only
    pub stderr: Vec<u8>,
    pub exit_code: Option<i32>,
}

impl TestResult {
    /// Only standard output decides whether a test passes
    pub fn is_success(&self) -> bool {
        self.stdout.is_success()
    }
}

pub enum ValueComparison<T> {
    Matches(T),
    Diff { expected: T, got: T },
}

impl<T> ValueComparison<T> {
    pub fn compare(expected: T, got: T) -> ValueComparison<T>
    where
        T: PartialEq,
    {
        if expected == got {
            Self::Matches(got)
        } else {
            Self::Diff { expected, got }
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Matches(_) => true,
            Self::Diff { .. } => false,
        }
    }

    pub fn got(&self) -> &T {
        match self {
            Self::Matches(got) => got,
            Self::Diff { got, .. } => got,
        }
    }
}
