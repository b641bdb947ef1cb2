/// SceneGraph — slot-map backed object hierarchy.
///
/// Objects are addressed by stable `SceneObjectKey`s and carry a name,
/// an optional world-space AABB and a static flag. The graph implements
/// `EntityProvider`, so a `SpatialIndex` can be built straight from it.
///
/// The graph never talks to an index: when a static flag flips, the
/// caller forwards the change through `SpatialIndex::on_staticity_changed`.

use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::geometry::AABB;
use crate::spatial::EntityProvider;

new_key_type! {
    /// Stable key for a SceneObject within a SceneGraph.
    ///
    /// Keys remain valid even after other objects are removed.
    pub struct SceneObjectKey;
}

const SOURCE: &str = "galaxy3d::SceneGraph";

/// One node of the hierarchy.
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    /// World-space bounds, `None` for grouping nodes without geometry
    bounds: Option<AABB>,
    /// Static by default
    is_static: bool,
    parent: Option<SceneObjectKey>,
    children: Vec<SceneObjectKey>,
}

impl SceneObject {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Option<&AABB> {
        self.bounds.as_ref()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn parent(&self) -> Option<SceneObjectKey> {
        self.parent
    }

    pub fn children(&self) -> &[SceneObjectKey] {
        &self.children
    }
}

/// Object hierarchy with stable keys.
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: SlotMap<SceneObjectKey, SceneObject>,
    /// Top-level objects, in creation order
    roots: Vec<SceneObjectKey>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Create a static object, attached under `parent` or at the top level.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidBounds` if `bounds` is inverted
    /// - `Error::UnknownEntity` if `parent` is not in the graph
    pub fn create_object(
        &mut self,
        name: &str,
        bounds: Option<AABB>,
        parent: Option<SceneObjectKey>,
    ) -> Result<SceneObjectKey> {
        let bounds = bounds.map(AABB::validated).transpose()?;

        if let Some(parent) = parent {
            if !self.objects.contains_key(parent) {
                crate::engine_bail!(SOURCE, Error::UnknownEntity(format!(
                    "parent {:?} of '{}'", parent, name
                )));
            }
        }

        let key = self.objects.insert(SceneObject {
            name: name.to_string(),
            bounds,
            is_static: true,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|parent| self.objects.get_mut(parent)) {
            Some(parent) => parent.children.push(key),
            None => self.roots.push(key),
        }

        Ok(key)
    }

    /// Remove an object and its whole subtree.
    ///
    /// Returns the removed keys (the object first, then its descendants),
    /// or an empty list if `key` is unknown.
    pub fn remove_object(&mut self, key: SceneObjectKey) -> Vec<SceneObjectKey> {
        let Some(parent) = self.objects.get(key).map(|object| object.parent) else {
            return Vec::new();
        };

        match parent.and_then(|parent| self.objects.get_mut(parent)) {
            Some(parent) => parent.children.retain(|&child| child != key),
            None => self.roots.retain(|&root| root != key),
        }

        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(object) = self.objects.remove(current) {
                stack.extend(object.children.iter().rev());
                removed.push(current);
            }
        }
        removed
    }

    /// Change the static flag.
    ///
    /// Returns `Ok(true)` if the flag actually changed.
    ///
    /// # Errors
    ///
    /// `Error::UnknownEntity` if `key` is not in the graph.
    pub fn set_static(&mut self, key: SceneObjectKey, is_static: bool) -> Result<bool> {
        let object = self.object_mut(key)?;
        let changed = object.is_static != is_static;
        object.is_static = is_static;
        Ok(changed)
    }

    /// Replace the world-space bounds of an object.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidBounds` if `bounds` is inverted
    /// - `Error::UnknownEntity` if `key` is not in the graph
    pub fn set_bounds(&mut self, key: SceneObjectKey, bounds: Option<AABB>) -> Result<()> {
        let bounds = bounds.map(AABB::validated).transpose()?;
        self.object_mut(key)?.bounds = bounds;
        Ok(())
    }

    pub fn object(&self, key: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// All object keys (in slot order, not hierarchy order).
    pub fn object_keys(&self) -> impl Iterator<Item = SceneObjectKey> + '_ {
        self.objects.keys()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn object_mut(&mut self, key: SceneObjectKey) -> Result<&mut SceneObject> {
        match self.objects.get_mut(key) {
            Some(object) => Ok(object),
            None => Err(crate::engine_err!(SOURCE, Error::UnknownEntity(format!("{:?}", key)))),
        }
    }
}

impl EntityProvider for SceneGraph {
    type Key = SceneObjectKey;

    fn roots(&self) -> &[SceneObjectKey] {
        &self.roots
    }

    fn bounds(&self, key: SceneObjectKey) -> Option<AABB> {
        self.objects.get(key).and_then(|object| object.bounds)
    }

    fn is_static(&self, key: SceneObjectKey) -> bool {
        self.objects.get(key).is_some_and(|object| object.is_static)
    }

    fn children(&self, key: SceneObjectKey) -> &[SceneObjectKey] {
        self.objects.get(key).map(|object| object.children.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
