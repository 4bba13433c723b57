//! Shared glow material state.
//!
//! One [`GlowMaterial`] exists per path. The path keeps the strong
//! [`MaterialHandle`]; each quad only keeps a [`WeakMaterialHandle`], so every
//! segment reads the same parameter block and a parameter change reaches the
//! whole ribbon at once.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use stormlight_shader::{GlowParams, UniformValue};

use crate::util::Result;

/// Parameter block plus a revision counter for GPU mirrors.
#[derive(Clone, Debug, PartialEq)]
pub struct GlowMaterial {
    params: GlowParams,
    revision: u64,
}

impl GlowMaterial {
    pub fn params(&self) -> &GlowParams {
        &self.params
    }

    /// Incremented on every effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Owning handle to a path's material.
#[derive(Debug)]
pub struct MaterialHandle(Arc<RwLock<GlowMaterial>>);

impl MaterialHandle {
    pub fn new(params: GlowParams) -> Self {
        Self(Arc::new(RwLock::new(GlowMaterial { params, revision: 0 })))
    }

    /// Second owner for components of the same path (the animation driver).
    pub(crate) fn share(&self) -> Self {
        Self(Arc::clone(&self.0))
    }

    /// Copy of the current parameters.
    pub fn params(&self) -> GlowParams {
        self.0.read().params
    }

    pub fn revision(&self) -> u64 {
        self.0.read().revision
    }

    /// Parameters and revision read under one lock.
    pub fn snapshot(&self) -> (GlowParams, u64) {
        let m = self.0.read();
        (m.params, m.revision)
    }

    /// Mutate the parameters; the revision only moves if something changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut GlowParams) -> R) -> R {
        let mut m = self.0.write();
        let before = m.params;
        let r = f(&mut m.params);
        if m.params != before {
            m.revision += 1;
        }
        r
    }

    /// Write a tunable uniform by schema name.
    pub fn set_uniform(&self, name: &str, value: UniformValue) -> Result<()> {
        self.update(|p| p.set_uniform(name, value))?;
        Ok(())
    }

    pub(crate) fn set_time(&self, seconds: f32) {
        self.update(|p| p.set_time(seconds));
    }

    pub fn downgrade(&self) -> WeakMaterialHandle {
        WeakMaterialHandle(Arc::downgrade(&self.0))
    }

    /// Same underlying state object.
    pub fn ptr_eq(&self, other: &MaterialHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Non-owning handle held by quads and GPU mirrors.
#[derive(Clone, Debug)]
pub struct WeakMaterialHandle(Weak<RwLock<GlowMaterial>>);

impl WeakMaterialHandle {
    /// Current parameters, or `None` once the owning path is gone.
    pub fn params(&self) -> Option<GlowParams> {
        self.0.upgrade().map(|m| m.read().params)
    }

    pub fn snapshot(&self) -> Option<(GlowParams, u64)> {
        self.0.upgrade().map(|m| {
            let m = m.read();
            (m.params, m.revision)
        })
    }

    /// True if this handle points at `owner`'s state.
    pub fn refers_to(&self, owner: &MaterialHandle) -> bool {
        std::ptr::eq(self.0.as_ptr(), Arc::as_ptr(&owner.0))
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
