//! Monster profile loader.

use std::collections::BTreeMap;
use std::path::Path;

use maze_core::AgentProfile;

use crate::loaders::{LoadResult, read_file};

/// Loader for named monster profiles from RON files.
///
/// The file is a map from type name to [`AgentProfile`]:
///
/// ```ron
/// {
///     "stalker": (brain: room_hunter, role: leader, squad: Some(SquadId(1))),
///     "drone": (brain: roaming, vision_fov_deg: 360.0),
/// }
/// ```
pub struct ProfileLoader;

impl ProfileLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, AgentProfile>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid profiles {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, AgentProfile>> {
        let profiles: BTreeMap<String, AgentProfile> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profiles RON: {}", e))?;

        for (name, profile) in &profiles {
            profile
                .validate()
                .map_err(|e| anyhow::anyhow!("profile '{}': {}", name, e))?;
        }
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{BrainKind, ModuleSet, Role, SquadId};

    #[test]
    fn parses_named_profiles() {
        let profiles = ProfileLoader::parse(
            r#"{
                "stalker": (
                    brain: room_hunter,
                    role: leader,
                    squad: Some(SquadId(1)),
                    modules: "SQUAD | INVESTIGATION | TACTICS",
                ),
                "drone": (brain: roaming, vision_fov_deg: 360.0),
            }"#,
        )
        .unwrap();

        let stalker = &profiles["stalker"];
        assert_eq!(stalker.brain, BrainKind::RoomHunter);
        assert_eq!(stalker.role, Role::Leader);
        assert_eq!(stalker.squad, Some(SquadId(1)));
        assert!(stalker.modules.contains(ModuleSet::TACTICS));

        let drone = &profiles["drone"];
        assert_eq!(drone.role, Role::Default);
        assert_eq!(drone.vision_fov_deg, 360.0);
    }

    #[test]
    fn squad_module_without_squad_fails_validation() {
        let err = ProfileLoader::parse(r#"{ "lonely": (modules: "SQUAD") }"#).unwrap_err();
        assert!(err.to_string().contains("lonely"));
    }

    #[test]
    fn bundled_profiles_spell_modules_as_flag_text() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/profiles.ron");
        let profiles = ProfileLoader::load(&path).unwrap();

        assert_eq!(profiles["stalker"].modules, ModuleSet::all());
        assert_eq!(profiles["gunner"].modules, ModuleSet::SQUAD | ModuleSet::TACTICS);
        assert!(profiles["sentry"].modules.is_empty());
        assert_eq!(profiles["wanderer"].modules, ModuleSet::INVESTIGATION);
    }

    #[test]
    fn modules_survive_a_ron_round_trip() {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "scout".to_string(),
            maze_core::AgentProfile::new(BrainKind::Roaming, Role::Scout)
                .with_squad(SquadId(2))
                .with_modules(ModuleSet::SQUAD | ModuleSet::TACTICS),
        );
        let text = ron::to_string(&profiles).unwrap();
        assert!(text.contains("SQUAD | TACTICS"), "{text}");

        let parsed = ProfileLoader::parse(&text).unwrap();
        assert_eq!(parsed, profiles);
    }
}
