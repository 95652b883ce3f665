//! Render world: meshes owned by a packed store, referenced by id.
//!
//! Demonstrates:
//!   1. Adding meshes and filling them through their ids
//!   2. Iterating the contiguous mesh array
//!   3. Removing a mesh from the middle and iterating again
//!   4. Surviving ids still finding their own mesh
//!   5. A removed id failing gracefully instead of aborting
//!
//! Run with:
//!   cargo run --example render_world

use densepack::prelude::*;

// ─── Payload ────────────────────────────────────────────────────

/// Stand-in for a real mesh (vertex buffer, index buffer, ...).
#[derive(Clone, Copy, Debug, Default)]
struct Mesh {
    dummy: i32,
}

type MeshId = Handle;

const MAX_MESH_COUNT: usize = 256;

// ─── World ──────────────────────────────────────────────────────

/// Holds meshes only. After every operation the meshes are contiguous in
/// memory, and every outstanding `MeshId` still refers to its own mesh.
struct RenderWorld {
    meshes: PackedStore<Mesh>,
}

impl RenderWorld {
    fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            meshes: PackedStore::new(StoreConfig::new(MAX_MESH_COUNT))?,
        })
    }

    fn add_mesh(&mut self) -> Result<MeshId, StoreError> {
        self.meshes.insert(Mesh::default())
    }

    fn remove_mesh(&mut self, id: MeshId) -> Result<(), StoreError> {
        self.meshes.remove(id).map(|_| ())
    }

    fn lookup(&mut self, id: MeshId) -> Result<&mut Mesh, StoreError> {
        self.meshes.get_mut(id)
    }

    fn iterate(&self) {
        for (i, mesh) in self.meshes.iter().enumerate() {
            println!("Mesh instance {i}: dummy = {}", mesh.dummy);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rw = RenderWorld::new()?;

    let mesh_id0 = rw.add_mesh()?;
    let mesh_id1 = rw.add_mesh()?;
    let mesh_id2 = rw.add_mesh()?;

    rw.lookup(mesh_id0)?.dummy = 0;
    rw.lookup(mesh_id1)?.dummy = 1;
    rw.lookup(mesh_id2)?.dummy = 2;

    // [Mesh][Mesh][Mesh]
    rw.iterate();

    // Removing the middle mesh would leave [Mesh][Empty][Mesh]; the store
    // moves the last mesh into the hole instead.
    rw.remove_mesh(mesh_id1)?;
    println!("--- removed {mesh_id1} ---");
    rw.iterate();

    assert_eq!(rw.lookup(mesh_id0)?.dummy, 0);
    assert_eq!(rw.lookup(mesh_id2)?.dummy, 2);

    match rw.lookup(mesh_id1) {
        Err(e) => println!("lookup of removed mesh rejected: {e}"),
        Ok(mesh) => return Err(format!("removed mesh still reachable: {mesh:?}").into()),
    }

    let m = rw.meshes.metrics();
    println!(
        "inserts={} removals={} relocations={}",
        m.inserts, m.removals, m.relocations
    );
    Ok(())
}
