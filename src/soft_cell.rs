// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::error::Result;

/// A structure that can be rebuilt from its own canonical JSON text.
pub(crate) trait Rederive: Default + Sized {
    fn rederive(repr: &str) -> Result<Self>;
}

/// Backing storage of arrays and objects.
///
/// The canonical string, once computed, is kept for the lifetime of the cell
/// and is the source of truth. The materialized structure may be released and
/// is then rebuilt by re-parsing the string on the next access. Both caches are
/// filled lazily; concurrent recomputation of the structure is harmless because
/// it is a pure function of the string, whichever result is stored last wins.
pub(crate) struct SoftCell<T> {
    repr: OnceLock<Arc<str>>,
    structure: RwLock<Option<Arc<T>>>,
}

impl<T: Rederive> SoftCell<T> {
    pub(crate) fn new(structure: T) -> SoftCell<T> {
        SoftCell {
            repr: OnceLock::new(),
            structure: RwLock::new(Some(Arc::new(structure))),
        }
    }

    pub(crate) fn with_repr(structure: T, repr: Arc<str>) -> SoftCell<T> {
        let cell = SoftCell::new(structure);
        let _ = cell.repr.set(repr);
        cell
    }

    /// Returns the structure, re-deriving it from the cached string if it was released.
    pub(crate) fn structure(&self) -> Arc<T> {
        if let Some(structure) = self
            .structure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return structure.clone();
        }

        let rederived = match self.repr.get() {
            Some(repr) => {
                tracing::trace!(len = repr.len(), "re-deriving structure from cached JSON string");
                match T::rederive(repr) {
                    Ok(structure) => structure,
                    Err(err) => {
                        tracing::error!(%err, "cached JSON string could not be parsed again");
                        T::default()
                    }
                }
            }
            None => T::default(),
        };
        let rederived = Arc::new(rederived);
        *self
            .structure
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(rederived.clone());
        rederived
    }

    /// Returns the canonical string, rendering it from the structure on first use.
    pub(crate) fn repr(&self, render: impl FnOnce(&T) -> String) -> Arc<str> {
        self.repr
            .get_or_init(|| {
                let structure = self.structure();
                Arc::from(render(&structure))
            })
            .clone()
    }

    pub(crate) fn cached_repr(&self) -> Option<&str> {
        self.repr.get().map(|repr| repr.as_ref())
    }

    pub(crate) fn is_materialized(&self) -> bool {
        self.structure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drops the materialized structure if the string form is already cached.
    /// Returns whether the structure was released.
    pub(crate) fn release(&self) -> bool {
        if self.repr.get().is_none() {
            return false;
        }
        *self
            .structure
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        true
    }
}

impl<T> Debug for SoftCell<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftCell")
            .field("repr", &self.repr.get())
            .finish_non_exhaustive()
    }
}
