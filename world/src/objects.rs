//! Loaded object catalog and its resolution of design object references.

use std::collections::BTreeMap;

use track_design_core::{
    LargeSceneryTile, Money, ObjectCategory, ObjectIndex, ObjectReference, ObjectResolver,
    ObjectShape, ResolvedObject, SmallSceneryShape,
};

/// Description of an object that can be loaded into the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectDefinition {
    /// Portable identifier.
    pub reference: ObjectReference,
    /// Category the object belongs to.
    pub category: ObjectCategory,
    /// Footprint information.
    pub shape: ObjectShape,
    /// Cost of placing the object.
    pub price: Money,
    /// Whether research has made the object buildable.
    pub available: bool,
    /// Path surfaces only: whether the surface is a queue line.
    pub queue: bool,
}

impl ObjectDefinition {
    /// Creates an available definition with a plain shape.
    #[must_use]
    pub fn new(reference: &str, category: ObjectCategory, price: i32) -> Self {
        Self {
            reference: ObjectReference::new(reference),
            category,
            shape: ObjectShape::Plain,
            price: Money::new(price),
            available: true,
            queue: false,
        }
    }

    /// Replaces the shape.
    #[must_use]
    pub fn with_shape(mut self, shape: ObjectShape) -> Self {
        self.shape = shape;
        self
    }

    /// Marks the object as not yet researched.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Marks a path surface as a queue line.
    #[must_use]
    pub fn queue(mut self) -> Self {
        self.queue = true;
        self
    }
}

/// Registry of loaded objects, indexed per category in load order.
#[derive(Clone, Debug, Default)]
pub struct ObjectCatalog {
    entries: BTreeMap<ObjectCategory, Vec<ObjectDefinition>>,
}

impl ObjectCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with a small set of stock objects of every category.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let small = |full_tile, diagonal, half_space, three_quarters| {
            ObjectShape::Small(SmallSceneryShape {
                full_tile,
                diagonal,
                half_space,
                three_quarters,
            })
        };
        let definitions = [
            ObjectDefinition::new("rct2.scenery_small.tree_oak", ObjectCategory::SmallScenery, 12)
                .with_shape(small(true, false, false, false)),
            ObjectDefinition::new("rct2.scenery_small.bush", ObjectCategory::SmallScenery, 4)
                .with_shape(small(false, false, false, false)),
            ObjectDefinition::new("rct2.scenery_small.fence_diagonal", ObjectCategory::SmallScenery, 6)
                .with_shape(small(false, true, false, false)),
            ObjectDefinition::new("rct2.scenery_small.hedge_half", ObjectCategory::SmallScenery, 6)
                .with_shape(small(false, false, true, false)),
            ObjectDefinition::new("rct2.scenery_large.castle_tower", ObjectCategory::LargeScenery, 80)
                .with_shape(ObjectShape::Large(vec![
                    LargeSceneryTile { x: 0, y: 0 },
                    LargeSceneryTile { x: 32, y: 0 },
                    LargeSceneryTile { x: 0, y: 32 },
                    LargeSceneryTile { x: 32, y: 32 },
                ])),
            ObjectDefinition::new("rct2.scenery_wall.wooden_fence", ObjectCategory::Wall, 5),
            ObjectDefinition::new("rct2.footpath_surface.tarmac", ObjectCategory::Path, 10),
            ObjectDefinition::new("rct2.footpath_surface.queue_blue", ObjectCategory::Path, 10).queue(),
            ObjectDefinition::new("rct2.footpath_railings.wood", ObjectCategory::Railings, 0),
            ObjectDefinition::new("rct2.ride.steel_train", ObjectCategory::Vehicle, 0),
            ObjectDefinition::new("rct2.ride.miniature_train", ObjectCategory::Vehicle, 0),
            ObjectDefinition::new("rct2.ride.hedges", ObjectCategory::Vehicle, 0),
            ObjectDefinition::new("rct2.ride.prototype_flyer", ObjectCategory::Vehicle, 0)
                .unavailable(),
        ];
        for definition in definitions {
            let _ = catalog.insert(definition);
        }
        catalog
    }

    /// Loads an object, returning its slot; reloading an identifier replaces it in place.
    pub fn insert(&mut self, definition: ObjectDefinition) -> ObjectIndex {
        let slots = self.entries.entry(definition.category).or_default();
        if let Some(position) = slots
            .iter()
            .position(|existing| existing.reference == definition.reference)
        {
            slots[position] = definition;
            return index_of(position);
        }
        slots.push(definition);
        index_of(slots.len() - 1)
    }

    /// Object loaded in the given slot.
    #[must_use]
    pub fn get(&self, category: ObjectCategory, index: ObjectIndex) -> Option<&ObjectDefinition> {
        self.entries
            .get(&category)?
            .get(usize::from(index.get()))
    }

    /// Number of loaded objects across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether no object is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locate(&self, reference: &ObjectReference) -> Option<(ObjectIndex, &ObjectDefinition)> {
        self.entries.values().find_map(|slots| {
            slots
                .iter()
                .position(|definition| &definition.reference == reference)
                .map(|position| (index_of(position), &slots[position]))
        })
    }

    fn first_slot<F>(&self, category: ObjectCategory, predicate: F) -> Option<ObjectIndex>
    where
        F: Fn(&ObjectDefinition) -> bool,
    {
        self.entries
            .get(&category)?
            .iter()
            .position(predicate)
            .map(index_of)
    }
}

fn index_of(position: usize) -> ObjectIndex {
    ObjectIndex::new(u16::try_from(position).unwrap_or(u16::MAX))
}

impl ObjectResolver for ObjectCatalog {
    fn resolve(&self, reference: &ObjectReference) -> Option<ResolvedObject> {
        let (primary, definition) = self.locate(reference)?;
        let secondary = match definition.category {
            ObjectCategory::Path => self.default_railings(),
            _ => None,
        };
        Some(ResolvedObject {
            category: definition.category,
            primary,
            secondary,
            shape: definition.shape.clone(),
            available: definition.available,
        })
    }

    fn reference_of(&self, category: ObjectCategory, index: ObjectIndex) -> Option<ObjectReference> {
        self.get(category, index)
            .map(|definition| definition.reference.clone())
    }

    fn default_path_surface(&self, is_queue: bool) -> Option<ObjectIndex> {
        self.first_slot(ObjectCategory::Path, |definition| {
            definition.available && definition.queue == is_queue
        })
    }

    fn default_railings(&self) -> Option<ObjectIndex> {
        self.first_slot(ObjectCategory::Railings, |definition| definition.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_assigned_per_category_in_load_order() {
        let mut catalog = ObjectCatalog::new();
        let first = catalog.insert(ObjectDefinition::new("a", ObjectCategory::Wall, 1));
        let other = catalog.insert(ObjectDefinition::new("b", ObjectCategory::Path, 1));
        let second = catalog.insert(ObjectDefinition::new("c", ObjectCategory::Wall, 1));

        assert_eq!(first, ObjectIndex::new(0));
        assert_eq!(other, ObjectIndex::new(0));
        assert_eq!(second, ObjectIndex::new(1));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn reloading_an_identifier_keeps_its_slot() {
        let mut catalog = ObjectCatalog::new();
        let _ = catalog.insert(ObjectDefinition::new("a", ObjectCategory::Wall, 1));
        let slot = catalog.insert(ObjectDefinition::new("a", ObjectCategory::Wall, 9));

        assert_eq!(slot, ObjectIndex::new(0));
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(ObjectCategory::Wall, slot).map(|d| d.price),
            Some(Money::new(9))
        );
    }

    #[test]
    fn path_resolution_attaches_default_railings() {
        let catalog = ObjectCatalog::builtin();
        let resolved = catalog
            .resolve(&ObjectReference::new("rct2.footpath_surface.tarmac"))
            .expect("tarmac is built in");

        assert_eq!(resolved.category, ObjectCategory::Path);
        assert_eq!(resolved.secondary, catalog.default_railings());
        assert!(resolved.secondary.is_some());
    }

    #[test]
    fn default_surfaces_distinguish_queues() {
        let catalog = ObjectCatalog::builtin();
        let path = catalog.default_path_surface(false).expect("path surface");
        let queue = catalog.default_path_surface(true).expect("queue surface");

        assert_ne!(path, queue);
        assert_eq!(
            catalog.reference_of(ObjectCategory::Path, queue),
            Some(ObjectReference::new("rct2.footpath_surface.queue_blue"))
        );
    }

    #[test]
    fn unknown_references_do_not_resolve() {
        let catalog = ObjectCatalog::builtin();
        assert!(catalog.resolve(&ObjectReference::new("missing.object")).is_none());
    }
}
