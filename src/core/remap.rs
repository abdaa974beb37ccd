//! Destination rules for bundled templates.
//!
//! Most templates mirror their bundle path under the target root. The
//! OpenCode configuration (`config.json`, `plan.md`) and the agent
//! definitions are relocated into the hidden `.opencode/` directory.

use crate::core::assets::{EntryKind, TemplateEntry};
use std::path::{Path, PathBuf};

/// Hidden configuration directory created under the target root.
pub const CONFIG_DIR: &str = ".opencode";
/// Bundle directory whose contents are relocated into [`CONFIG_DIR`].
pub const AGENTS_DIR: &str = "agents";
/// Root-level files relocated into [`CONFIG_DIR`].
pub const ROOT_SINGLETONS: [&str; 2] = ["config.json", "plan.md"];

fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Relative destination of a bundle entry under the target root.
pub fn remap(path: &str, kind: EntryKind) -> PathBuf {
    let relative = Path::new(path);
    if ROOT_SINGLETONS.contains(&path) || parent_of(path) == Some(AGENTS_DIR) {
        return Path::new(CONFIG_DIR).join(relative);
    }
    if kind == EntryKind::Directory && path == AGENTS_DIR {
        return Path::new(CONFIG_DIR).join(AGENTS_DIR);
    }
    relative.to_path_buf()
}

/// Absolute destination of `entry` under `target_root`.
pub fn destination(target_root: &Path, entry: &TemplateEntry) -> PathBuf {
    target_root.join(remap(&entry.path, entry.kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_root_singletons_move_into_config_dir() {
        assert_eq!(
            remap("config.json", EntryKind::File),
            PathBuf::from(".opencode/config.json")
        );
        assert_eq!(
            remap("plan.md", EntryKind::File),
            PathBuf::from(".opencode/plan.md")
        );
    }

    #[test]
    fn test_nested_singleton_names_are_not_relocated() {
        assert_eq!(
            remap("docs/config.json", EntryKind::File),
            PathBuf::from("docs/config.json")
        );
        assert_eq!(
            remap("docs/plan.md", EntryKind::File),
            PathBuf::from("docs/plan.md")
        );
    }

    #[test]
    fn test_agents_directory_and_children() {
        assert_eq!(
            remap("agents", EntryKind::Directory),
            PathBuf::from(".opencode/agents")
        );
        assert_eq!(
            remap("agents/reviewer.md", EntryKind::File),
            PathBuf::from(".opencode/agents/reviewer.md")
        );
    }

    #[test]
    fn test_only_the_top_level_agents_directory_is_special() {
        assert_eq!(
            remap("docs/agents", EntryKind::Directory),
            PathBuf::from("docs/agents")
        );
        assert_eq!(
            remap("docs/agents/notes.md", EntryKind::File),
            PathBuf::from("docs/agents/notes.md")
        );
        assert_eq!(remap("agents", EntryKind::File), PathBuf::from("agents"));
    }

    #[test]
    fn test_destination_joins_target_root() {
        let root = Path::new("/work/repo");
        assert_eq!(
            destination(root, &TemplateEntry::file("AGENTS.md")),
            PathBuf::from("/work/repo/AGENTS.md")
        );
        assert_eq!(
            destination(root, &TemplateEntry::directory("agents")),
            PathBuf::from("/work/repo/.opencode/agents")
        );
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,7}(\\.md|\\.json)?"
    }

    proptest! {
        #[test]
        fn prop_agent_files_land_in_config_agents(name in segment()) {
            let path = format!("agents/{}", name);
            prop_assert_eq!(
                remap(&path, EntryKind::File),
                Path::new(".opencode").join("agents").join(&name)
            );
        }

        #[test]
        fn prop_other_paths_are_mirrored(
            first in segment(),
            rest in proptest::collection::vec(segment(), 0..3),
        ) {
            prop_assume!(first != AGENTS_DIR);
            let mut path = first.clone();
            for part in &rest {
                path.push('/');
                path.push_str(part);
            }
            prop_assume!(!ROOT_SINGLETONS.contains(&path.as_str()));
            prop_assert_eq!(remap(&path, EntryKind::File), PathBuf::from(&path));
            prop_assert_eq!(remap(&path, EntryKind::Directory), PathBuf::from(&path));
        }
    }
}
