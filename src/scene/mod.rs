mod object;

pub use object::{euler_degrees, ObjectId, PlacedObject, SelectionVisual, Transform};

use std::collections::BTreeMap;

/// Owned store of every placed object, iterated in creation order.
pub struct Registry {
    objects: BTreeMap<ObjectId, PlacedObject>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve a fresh id. Ids keep counting across `clear`.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, object: PlacedObject) {
        debug_assert!(object.id.0 < self.next_id, "id not allocated by this registry");
        self.objects.insert(object.id, object);
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<PlacedObject> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.values()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove everything, returning the removed ids in creation order.
    pub fn clear(&mut self) -> Vec<ObjectId> {
        let ids = self.ids();
        self.objects.clear();
        ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
