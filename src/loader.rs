//! GLB import into the scene.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use bevy_ecs::prelude::Entity;
use gltf::Gltf;

use crate::components::{Geometry, Material, MaterialId, Transform};
use crate::math::{Color3, UnitQuatf, Vec3f};
use crate::scene::Scene;

/// Imports every mesh primitive of the default glTF scene and returns the new
/// mesh entities in document order.
pub fn import_glb(bytes: &[u8], scene: &mut Scene) -> Result<Vec<Entity>> {
    let gltf = Gltf::from_slice(bytes).context("Failed to parse glTF binary")?;
    let buffers = load_buffers(&gltf)?;

    // glTF material index -> shared scene material
    let mut materials: HashMap<usize, MaterialId> = HashMap::new();
    for gltf_material in gltf.materials() {
        if let Some(index) = gltf_material.index() {
            materials.insert(index, scene.add_material(convert_material(&gltf_material)));
        }
    }

    let gltf_scene = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(s) => s,
        None => return Ok(vec![]),
    };

    let mut imported = vec![];
    for node in gltf_scene.nodes() {
        import_node(&node, &Transform::default(), &buffers, &materials, scene, &mut imported)?;
    }
    Ok(imported)
}

fn load_buffers(gltf: &Gltf) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().context("Missing binary blob")?;
                if blob.len() < buffer.length() {
                    bail!("Binary blob is {} bytes, buffer declares {}", blob.len(), buffer.length());
                }
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                bail!("External buffer '{}' is not supported, embed it in the .glb", uri);
            }
        }
    }
    Ok(buffer_data)
}

fn convert_material(gltf_material: &gltf::Material) -> Material {
    let [r, g, b, _] = gltf_material.pbr_metallic_roughness().base_color_factor();
    let mut material = Material::new(gltf_material.name().unwrap_or("Material"))
        .with_diffuse_color(Color3::new(r, g, b));
    material.back_face_culling = !gltf_material.double_sided();
    material
}

fn node_transform(node: &gltf::Node) -> Transform {
    let (translation, rotation, scale) = node.transform().decomposed();
    let [x, y, z, w] = rotation;
    Transform::new(
        Vec3f::from(translation),
        UnitQuatf::from_quaternion(nalgebra::Quaternion::new(w, x, y, z)),
        Vec3f::from(scale),
    )
}

fn import_node(
    node: &gltf::Node,
    parent: &Transform,
    buffers: &[Vec<u8>],
    materials: &HashMap<usize, MaterialId>,
    scene: &mut Scene,
    imported: &mut Vec<Entity>,
) -> Result<()> {
    let transform = parent.compose(&node_transform(node));

    if let Some(mesh) = node.mesh() {
        let base_name = node
            .name()
            .or_else(|| mesh.name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));
        let primitive_count = mesh.primitives().count();

        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{}_primitive{}", base_name, primitive.index())
            } else {
                base_name.clone()
            };
            let geometry = read_geometry(&primitive, buffers)
                .with_context(|| format!("Failed to read mesh '{}'", name))?;
            let material = primitive.material().index().and_then(|i| materials.get(&i).copied());
            imported.push(scene.spawn_mesh(&name, material, geometry, transform.clone()));
        }
    }

    for child in node.children() {
        import_node(&child, &transform, buffers, materials, scene, imported)?;
    }
    Ok(())
}

fn read_geometry(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Result<Geometry> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.as_slice()));
    let vertex_count = reader
        .read_positions()
        .context("Mesh primitive missing positions")?
        .count();
    // Non-indexed geometry is drawn as if indexed 0..n
    let index_count = match reader.read_indices() {
        Some(indices) => indices.into_u32().count(),
        None => vertex_count,
    };
    Ok(Geometry { vertex_count, index_count })
}
