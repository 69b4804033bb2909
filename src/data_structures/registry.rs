//! Fixed-size texture registry.
//!
//! Textures are addressed by a string tag and live in one of
//! [`TEXTURE_SLOTS`] slots. The slot index doubles as the texture unit the
//! texture is bound to, so slots are handed out in insertion order and never
//! reordered.

use std::fmt;

/// Number of texture slots available to a scene.
pub const TEXTURE_SLOTS: usize = 16;

/// Handle assigned to every texture that enters the registry.
///
/// Ids are never reused, even after [`TextureRegistry::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("all {} texture slots are in use, cannot register \"{}\"", TEXTURE_SLOTS, .0)]
    Full(String),
    #[error("texture tags must not be empty")]
    EmptyTag,
}

/// A registered texture: its tag, id and payload (usually a GPU texture).
#[derive(Debug)]
pub struct TextureEntry<T> {
    pub tag: String,
    pub id: TextureId,
    pub payload: T,
}

#[derive(Debug)]
pub struct TextureRegistry<T> {
    slots: [Option<TextureEntry<T>>; TEXTURE_SLOTS],
    loaded: usize,
    next_id: u32,
}

impl<T> TextureRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            loaded: 0,
            next_id: 1,
        }
    }

    /// Store `payload` under `tag` in the next free slot and return that slot.
    pub fn insert(&mut self, tag: &str, payload: T) -> Result<usize, RegistryError> {
        if tag.is_empty() {
            return Err(RegistryError::EmptyTag);
        }
        if self.is_full() {
            return Err(RegistryError::Full(tag.to_string()));
        }
        let slot = self.loaded;
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.slots[slot] = Some(TextureEntry {
            tag: tag.to_string(),
            id,
            payload,
        });
        self.loaded += 1;
        log::debug!("registered texture \"{tag}\" ({id}) in slot {slot}");
        Ok(slot)
    }

    /// Slot of the first texture tagged `tag`.
    pub fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        self.iter()
            .find(|(_, entry)| entry.tag == tag)
            .map(|(slot, _)| slot)
    }

    pub fn find_texture_id(&self, tag: &str) -> Option<TextureId> {
        self.iter()
            .find(|(_, entry)| entry.tag == tag)
            .map(|(_, entry)| entry.id)
    }

    pub fn get(&self, slot: usize) -> Option<&TextureEntry<T>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }

    pub fn is_full(&self) -> bool {
        self.loaded == TEXTURE_SLOTS
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TextureEntry<T>)> {
        self.slots[..self.loaded]
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|entry| (slot, entry)))
    }

    /// Empty every slot and hand the payloads back in slot order.
    pub fn clear(&mut self) -> Vec<T> {
        let payloads = self.slots[..self.loaded]
            .iter_mut()
            .filter_map(Option::take)
            .map(|entry| entry.payload)
            .collect();
        self.loaded = 0;
        payloads
    }
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
