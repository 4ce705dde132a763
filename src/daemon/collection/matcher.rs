use std::{collections::BTreeSet, sync::Arc};

use crate::process_api::RunningProcess;

/// Decides whether a process counts as reading. Comparison ignores case, and both the OS
/// process name and the executable file name are checked.
pub struct TargetMatcher {
    targets: BTreeSet<String>,
}

impl TargetMatcher {
    pub fn new<'a>(targets: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            targets: targets
                .into_iter()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, process: &RunningProcess) -> bool {
        self.is_target(&process.name)
            || process
                .exe_name
                .as_deref()
                .is_some_and(|exe| self.is_target(exe))
    }

    /// Returns name of the first running target process, if there is any.
    pub fn find_active<'a>(
        &self,
        processes: impl IntoIterator<Item = &'a RunningProcess>,
    ) -> Option<Arc<str>> {
        processes
            .into_iter()
            .find(|v| self.matches(v))
            .map(|v| v.name.clone())
    }

    fn is_target(&self, name: &str) -> bool {
        self.targets.contains(&name.to_lowercase())
    }
}
