//! TOML manifests that extend the built-in object catalog.
//!
//! ```toml
//! version = 1
//!
//! [[objects]]
//! identifier = "custom.scenery_small.gnome"
//! category = "small_scenery"
//! price = 3
//! shape = { kind = "small", full_tile = false }
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use track_design_core::{LargeSceneryTile, ObjectCategory, ObjectShape, SmallSceneryShape};
use track_design_world::{ObjectCatalog, ObjectDefinition};

/// Manifest format understood by this build.
const MANIFEST_VERSION: u32 = 1;

/// Errors raised while loading an object manifest.
#[derive(Debug, Error)]
pub(crate) enum ManifestError {
    /// The manifest file could not be read.
    #[error("could not read object manifest: {0}")]
    Read(#[from] std::io::Error),
    /// The manifest is not valid TOML or does not match the schema.
    #[error("could not parse object manifest: {0}")]
    Parse(#[from] toml::de::Error),
    /// The manifest declares a format this build does not know.
    #[error("object manifest version {0} is not supported")]
    UnsupportedVersion(u32),
    /// Two entries share an identifier.
    #[error("object '{0}' is declared more than once")]
    DuplicateIdentifier(String),
    /// A shape was given to an object of a category that has none.
    #[error("object '{identifier}' cannot have a {shape} shape")]
    ShapeMismatch {
        /// Offending object.
        identifier: String,
        /// Shape kind given.
        shape: &'static str,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectManifest {
    version: u32,
    #[serde(default)]
    objects: Vec<ManifestObject>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestObject {
    identifier: String,
    category: ManifestCategory,
    #[serde(default)]
    price: i32,
    #[serde(default)]
    shape: Option<ManifestShape>,
    #[serde(default = "available_by_default")]
    available: bool,
    #[serde(default)]
    queue: bool,
}

const fn available_by_default() -> bool {
    true
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ManifestCategory {
    SmallScenery,
    LargeScenery,
    Wall,
    Path,
    Railings,
    Vehicle,
}

impl From<ManifestCategory> for ObjectCategory {
    fn from(category: ManifestCategory) -> Self {
        match category {
            ManifestCategory::SmallScenery => ObjectCategory::SmallScenery,
            ManifestCategory::LargeScenery => ObjectCategory::LargeScenery,
            ManifestCategory::Wall => ObjectCategory::Wall,
            ManifestCategory::Path => ObjectCategory::Path,
            ManifestCategory::Railings => ObjectCategory::Railings,
            ManifestCategory::Vehicle => ObjectCategory::Vehicle,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ManifestShape {
    Small {
        #[serde(default)]
        full_tile: bool,
        #[serde(default)]
        diagonal: bool,
        #[serde(default)]
        half_space: bool,
        #[serde(default)]
        three_quarters: bool,
    },
    Large {
        tiles: Vec<[i32; 2]>,
    },
}

impl ManifestShape {
    const fn name(&self) -> &'static str {
        match self {
            ManifestShape::Small { .. } => "small",
            ManifestShape::Large { .. } => "large",
        }
    }

    const fn fits(&self, category: ObjectCategory) -> bool {
        matches!(
            (self, category),
            (ManifestShape::Small { .. }, ObjectCategory::SmallScenery)
                | (ManifestShape::Large { .. }, ObjectCategory::LargeScenery)
        )
    }

    fn into_shape(self) -> ObjectShape {
        match self {
            ManifestShape::Small {
                full_tile,
                diagonal,
                half_space,
                three_quarters,
            } => ObjectShape::Small(SmallSceneryShape {
                full_tile,
                diagonal,
                half_space,
                three_quarters,
            }),
            ManifestShape::Large { tiles } => ObjectShape::Large(
                tiles
                    .into_iter()
                    .map(|[x, y]| LargeSceneryTile { x, y })
                    .collect(),
            ),
        }
    }
}

/// Reads a manifest file and loads it on top of the built-in catalog.
pub(crate) fn load_catalog(path: &Path) -> Result<ObjectCatalog, ManifestError> {
    let text = fs::read_to_string(path)?;
    parse_catalog(&text)
}

/// Parses manifest text and loads it on top of the built-in catalog.
///
/// Entries that reuse a built-in identifier replace the built-in object.
pub(crate) fn parse_catalog(text: &str) -> Result<ObjectCatalog, ManifestError> {
    let manifest: ObjectManifest = toml::from_str(text)?;
    if manifest.version != MANIFEST_VERSION {
        return Err(ManifestError::UnsupportedVersion(manifest.version));
    }

    let mut catalog = ObjectCatalog::builtin();
    let mut seen = std::collections::BTreeSet::new();
    for object in manifest.objects {
        if !seen.insert(object.identifier.clone()) {
            return Err(ManifestError::DuplicateIdentifier(object.identifier));
        }
        let category = ObjectCategory::from(object.category);
        let mut definition = ObjectDefinition::new(&object.identifier, category, object.price);
        if let Some(shape) = object.shape {
            if !shape.fits(category) {
                return Err(ManifestError::ShapeMismatch {
                    identifier: object.identifier,
                    shape: shape.name(),
                });
            }
            definition = definition.with_shape(shape.into_shape());
        }
        if !object.available {
            definition = definition.unavailable();
        }
        if object.queue {
            definition = definition.queue();
        }
        let _ = catalog.insert(definition);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::{ObjectReference, ObjectResolver};
    use track_design_world::World;

    const MANIFEST: &str = r#"
version = 1

[[objects]]
identifier = "custom.scenery_small.gnome"
category = "small_scenery"
price = 3
shape = { kind = "small", half_space = true }

[[objects]]
identifier = "custom.scenery_large.arch"
category = "large_scenery"
price = 40
shape = { kind = "large", tiles = [[0, 0], [32, 0]] }

[[objects]]
identifier = "custom.ride.rocket"
category = "vehicle"
available = false
"#;

    #[test]
    fn manifest_objects_extend_the_builtin_catalog() {
        let catalog = parse_catalog(MANIFEST).expect("manifest parses");
        assert_eq!(catalog.len(), ObjectCatalog::builtin().len() + 3);

        let mut world = World::new();
        world.set_objects(catalog);
        let gnome = world
            .resolve(&ObjectReference::new("custom.scenery_small.gnome"))
            .expect("gnome is loaded");
        assert_eq!(gnome.category, ObjectCategory::SmallScenery);
        assert!(matches!(gnome.shape, ObjectShape::Small(shape) if shape.half_space));

        let arch = world
            .resolve(&ObjectReference::new("custom.scenery_large.arch"))
            .expect("arch is loaded");
        assert_eq!(arch.shape.large_extents(), Some((0, 32, 0, 0)));

        let rocket = world
            .resolve(&ObjectReference::new("custom.ride.rocket"))
            .expect("rocket is loaded");
        assert!(!rocket.available);
        assert!(world
            .resolve(&ObjectReference::new("rct2.scenery_small.tree_oak"))
            .is_some());
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        assert!(matches!(
            parse_catalog("version = 2"),
            Err(ManifestError::UnsupportedVersion(2))
        ));
        assert!(matches!(parse_catalog("objects = []"), Err(ManifestError::Parse(_))));
    }

    #[test]
    fn duplicates_and_misplaced_shapes_are_rejected() {
        let duplicate = r#"
version = 1
[[objects]]
identifier = "custom.wall.brick"
category = "wall"
[[objects]]
identifier = "custom.wall.brick"
category = "wall"
"#;
        assert!(matches!(
            parse_catalog(duplicate),
            Err(ManifestError::DuplicateIdentifier(identifier)) if identifier == "custom.wall.brick"
        ));

        let misplaced = r#"
version = 1
[[objects]]
identifier = "custom.wall.brick"
category = "wall"
shape = { kind = "large", tiles = [[0, 0]] }
"#;
        assert!(matches!(
            parse_catalog(misplaced),
            Err(ManifestError::ShapeMismatch { shape: "large", .. })
        ));
    }
}
