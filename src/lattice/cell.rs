//! Cell geometry and the shared shape cache.
//!
//! Every lattice point of a stratum references the same mesh, so meshes
//! are built once per distinct shape and handed out as `Arc<CellMesh>`.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::{FillMode, LatticeStratum, FALLBACK_CELL_SIZE};

const DOT_SEGMENTS: u32 = 8;

/// Structural identity of a cell mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellShapeKey {
    /// Cylinder with `sides` radial segments, base at y=0.
    Prism { sides: u32, size: f32, height: f32 },
    /// UV sphere centered on the origin.
    Dot { size: f32 },
}

fn valid_size(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        FALLBACK_CELL_SIZE
    }
}

impl CellShapeKey {
    pub fn prism(sides: u32, size: f32, height: f32) -> Self {
        CellShapeKey::Prism {
            sides: sides.max(3),
            size: valid_size(size),
            height: valid_size(height),
        }
    }

    pub fn dot(size: f32) -> Self {
        CellShapeKey::Dot { size: valid_size(size) }
    }

    /// The shape drawn by a stratum's cells.
    pub fn for_stratum(stratum: &LatticeStratum) -> Self {
        match stratum.fill_mode {
            FillMode::DotMatrix => Self::dot(stratum.size),
            _ => Self::prism(stratum.sides, stratum.size, stratum.height),
        }
    }
}

// Sizes are always finite and positive once built through the constructors.
impl Eq for CellShapeKey {}

impl Hash for CellShapeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellShapeKey::Prism { sides, size, height } => {
                0u8.hash(state);
                sides.hash(state);
                size.to_bits().hash(state);
                height.to_bits().hash(state);
            }
            CellShapeKey::Dot { size } => {
                1u8.hash(state);
                size.to_bits().hash(state);
            }
        }
    }
}

/// Indexed triangle mesh in cell-local space (+Y is outward).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl CellMesh {
    pub fn build(key: &CellShapeKey) -> Self {
        match *key {
            CellShapeKey::Prism { sides, size, height } => Self::prism(sides, size, height),
            CellShapeKey::Dot { size } => Self::uv_sphere(size, DOT_SEGMENTS, DOT_SEGMENTS),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn prism(sides: u32, radius: f32, height: f32) -> Self {
        let mut mesh = CellMesh::default();

        // Side wall: a top and a bottom row, with a seam vertex at each end.
        for &y in &[height, 0.0] {
            for x in 0..=sides {
                let theta = x as f32 / sides as f32 * TAU;
                let (s, c) = theta.sin_cos();
                mesh.positions.push(Vec3::new(radius * s, y, radius * c));
                mesh.normals.push(Vec3::new(s, 0.0, c));
            }
        }
        let row = sides + 1;
        for x in 0..sides {
            let a = x;
            let b = x + row;
            let c = x + row + 1;
            let d = x + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        for (y, up) in [(height, 1.0f32), (0.0, -1.0)] {
            let normal = Vec3::new(0.0, up, 0.0);
            let center = mesh.positions.len() as u32;
            mesh.positions.push(Vec3::new(0.0, y, 0.0));
            mesh.normals.push(normal);
            for x in 0..=sides {
                let theta = x as f32 / sides as f32 * TAU;
                let (s, c) = theta.sin_cos();
                mesh.positions.push(Vec3::new(radius * s, y, radius * c));
                mesh.normals.push(normal);
            }
            for x in 0..sides {
                let i = center + 1 + x;
                if up > 0.0 {
                    mesh.indices.extend_from_slice(&[center, i, i + 1]);
                } else {
                    mesh.indices.extend_from_slice(&[center, i + 1, i]);
                }
            }
        }
        mesh
    }

    fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let mut mesh = CellMesh::default();
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let n = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                mesh.positions.push(n * radius);
                mesh.normals.push(n);
            }
        }
        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        mesh
    }
}

/// Append-only map from shape key to shared mesh.
///
/// Reads take a shared lock. Two threads racing to build the same key
/// both build it; the first insert wins and the other copy is dropped.
#[derive(Debug, Default)]
pub struct ShapeCache {
    meshes: RwLock<HashMap<CellShapeKey, Arc<CellMesh>>>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, key: &CellShapeKey) -> Arc<CellMesh> {
        {
            let meshes = self.meshes.read().unwrap_or_else(|e| e.into_inner());
            if let Some(mesh) = meshes.get(key) {
                return Arc::clone(mesh);
            }
        }
        let built = Arc::new(CellMesh::build(key));
        let mut meshes = self.meshes.write().unwrap_or_else(|e| e.into_inner());
        let mesh = meshes.entry(*key).or_insert_with(|| {
            tracing::debug!("Built cell mesh {:?}", key);
            built
        });
        Arc::clone(mesh)
    }

    pub fn len(&self) -> usize {
        self.meshes.read().map(|m| m.len()).unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_prism_sits_on_base() {
        let mesh = CellMesh::build(&CellShapeKey::prism(6, 2.0, 5.0));
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_y, max_y), (0.0, 5.0));
        for p in &mesh.positions {
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= 2.0 + 1e-5);
        }
        // 2 triangles per side plus two fans.
        assert_eq!(mesh.triangle_count(), 6 * 2 + 6 * 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn test_dot_is_sphere() {
        let mesh = CellMesh::build(&CellShapeKey::dot(0.5));
        assert_eq!(mesh.positions.len(), 81);
        for p in &mesh.positions {
            assert!((p.length() - 0.5).abs() < 1e-5);
        }
        assert_eq!(mesh.triangle_count(), 8 + 8 + 6 * 16);
    }

    #[test]
    fn test_zero_size_falls_back() {
        assert_eq!(
            CellShapeKey::prism(6, 0.0, 0.0),
            CellShapeKey::Prism { sides: 6, size: FALLBACK_CELL_SIZE, height: FALLBACK_CELL_SIZE }
        );
        assert_eq!(CellShapeKey::dot(-1.0), CellShapeKey::Dot { size: FALLBACK_CELL_SIZE });
    }

    #[test]
    fn test_cache_shares_meshes() {
        let cache = ShapeCache::new();
        let a = cache.get_or_build(&CellShapeKey::prism(6, 1.0, 1.0));
        let b = cache.get_or_build(&CellShapeKey::prism(6, 1.0, 1.0));
        let c = cache.get_or_build(&CellShapeKey::prism(5, 1.0, 1.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_population_is_idempotent() {
        let cache = ShapeCache::new();
        let key = CellShapeKey::dot(0.3);
        let meshes: Vec<Arc<CellMesh>> = (0..32).into_par_iter().map(|_| cache.get_or_build(&key)).collect();
        assert_eq!(cache.len(), 1);
        assert!(meshes.iter().all(|m| Arc::ptr_eq(m, &meshes[0])));
    }
}
