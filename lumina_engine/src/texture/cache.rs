use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace, warn};

use crate::core::targets::TEXTURE;
use crate::texture::{TextureError, TextureMap};

/// Caches texture maps by filename, so that each file is only decoded once
///
/// The lock is held while a texture loads, so two threads asking for the same new file
/// will not both decode it
#[derive(Debug, Default)]
pub struct TextureCache {
    maps: Mutex<HashMap<String, Arc<TextureMap>>>,
}

impl TextureCache {
    pub fn new() -> Self { Self::default() }

    /// Returns the cached texture for `name`, loading it from disk if this is the first request
    ///
    /// Failed loads are not cached, and will be retried next time
    pub fn get_or_load(&self, name: &str) -> Result<Arc<TextureMap>, TextureError> {
        // A panic elsewhere can't leave the map half-written, so a poisoned lock is still usable
        let mut maps = self.maps.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(map) = maps.get(name) {
            trace!(target: TEXTURE, name, "texture cache hit");
            return Ok(Arc::clone(map));
        }

        let map = match TextureMap::load(name) {
            Ok(map) => Arc::new(map),
            Err(err) => {
                warn!(target: TEXTURE, name, ?err, "failed to load texture");
                return Err(err);
            }
        };
        debug!(
            target: TEXTURE,
            name,
            width = map.width(),
            height = map.height(),
            "loaded texture"
        );
        maps.insert(name.to_owned(), Arc::clone(&map));
        Ok(map)
    }

    /// Registers an in-memory texture under a name, replacing anything cached there
    pub fn insert(&self, name: impl Into<String>, map: TextureMap) -> Arc<TextureMap> {
        let map = Arc::new(map);
        self.maps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::clone(&map));
        map
    }

    pub fn len(&self) -> usize { self.maps.lock().unwrap_or_else(PoisonError::into_inner).len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
