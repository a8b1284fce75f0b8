//! Build steps and the build state machine

use std::fmt;

/// One step of a package build, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Clean,
    Prepare,
    Transpile,
    GenerateEntry,
    GenerateManifest,
    CopyReadme,
    CopyLicense,
}

impl BuildStep {
    /// Every step, in the order a build runs them
    pub const ALL: [BuildStep; 7] = [
        BuildStep::Clean,
        BuildStep::Prepare,
        BuildStep::Transpile,
        BuildStep::GenerateEntry,
        BuildStep::GenerateManifest,
        BuildStep::CopyReadme,
        BuildStep::CopyLicense,
    ];

    /// State the builder is in while this step runs
    pub fn state(self) -> BuildState {
        match self {
            BuildStep::Clean => BuildState::Cleaning,
            BuildStep::Prepare => BuildState::Preparing,
            BuildStep::Transpile => BuildState::Transpiling,
            BuildStep::GenerateEntry => BuildState::GeneratingEntry,
            BuildStep::GenerateManifest => BuildState::GeneratingManifest,
            BuildStep::CopyReadme => BuildState::CopyingReadme,
            BuildStep::CopyLicense => BuildState::CopyingLicense,
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStep::Clean => "clean",
            BuildStep::Prepare => "prepare",
            BuildStep::Transpile => "transpile",
            BuildStep::GenerateEntry => "generate entry",
            BuildStep::GenerateManifest => "generate manifest",
            BuildStep::CopyReadme => "copy readme",
            BuildStep::CopyLicense => "copy license",
        };
        f.write_str(name)
    }
}

/// Where a builder is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Cleaning,
    Preparing,
    Transpiling,
    GeneratingEntry,
    GeneratingManifest,
    CopyingReadme,
    CopyingLicense,
    Done,
    /// The build failed; later steps never ran
    ///
    /// `at` is `None` when configuration was rejected before the first step.
    Failed { at: Option<BuildStep> },
}

impl BuildState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildState::Done | BuildState::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let states: Vec<BuildState> = BuildStep::ALL.iter().map(|s| s.state()).collect();
        assert_eq!(
            states,
            [
                BuildState::Cleaning,
                BuildState::Preparing,
                BuildState::Transpiling,
                BuildState::GeneratingEntry,
                BuildState::GeneratingManifest,
                BuildState::CopyingReadme,
                BuildState::CopyingLicense,
            ]
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(BuildState::Done.is_terminal());
        assert!(BuildState::Failed { at: Some(BuildStep::Transpile) }.is_terminal());
        assert!(BuildState::Failed { at: None }.is_terminal());
        assert!(!BuildState::Idle.is_terminal());
        assert!(!BuildState::Transpiling.is_terminal());
    }
}
