use std::fs;
use std::path::Path;

use base64::Engine as _;
use glam::{EulerRot, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::channel::{Axis, Channel, CurveKey};
use crate::animation::schedule::Keyframe;
use crate::errors::{ChoreoError, Result};
use crate::scene::{Action, Armature, Node, NodeHandle, NodeKind, SceneGraph, Transform};
use crate::settings::ChoreoSettings;

/// Imports the node hierarchy, skins and first animation of a glTF file
/// into a [`SceneGraph`].
pub struct GltfImporter<'a> {
    graph: &'a mut SceneGraph,
    settings: &'a ChoreoSettings,
    node_mapping: Vec<NodeHandle>,
    // glTF joint node index -> owning armature
    joint_armatures: FxHashMap<usize, NodeHandle>,
}

impl<'a> GltfImporter<'a> {
    /// Imports `path` (`.gltf` or `.glb`) and returns the new root node.
    ///
    /// The document is validated before anything is added to the graph;
    /// dangling indices and unsupported required extensions are
    /// [`ChoreoError::GltfError`]s.
    ///
    /// Every node of the file ends up below that root, so callers can scope
    /// searches to what this call added.
    pub fn import(
        path: &Path,
        graph: &'a mut SceneGraph,
        settings: &'a ChoreoSettings,
    ) -> Result<NodeHandle> {
        let bytes = fs::read(path).map_err(|e| ChoreoError::io(path, e))?;
        let gltf = gltf::Gltf::from_slice(&bytes)?;

        let base_path = path.parent().unwrap_or(Path::new("./"));
        let buffers = load_buffers(&gltf, base_path)?;

        let mut importer = Self {
            graph,
            settings,
            node_mapping: Vec::with_capacity(gltf.nodes().count()),
            joint_armatures: FxHashMap::default(),
        };

        // Nodes first, then hierarchy, so skins can reference any node
        for node in gltf.nodes() {
            let handle = importer.create_node(&node);
            importer.node_mapping.push(handle);
        }

        let root_name = path
            .file_stem()
            .map_or_else(|| "gltf_root".to_string(), |s| s.to_string_lossy().into_owned());
        let root = importer.graph.add_node(Node::new(root_name));

        for node in gltf.nodes() {
            let parent = importer.node_mapping[node.index()];
            for child in node.children() {
                importer.graph.attach(importer.node_mapping[child.index()], parent);
            }
        }

        // Top-level nodes go under the import root, whether or not a scene
        // lists them
        for &handle in &importer.node_mapping {
            let is_top = importer
                .graph
                .get_node(handle)
                .is_some_and(|n| n.parent().is_none());
            if is_top {
                importer.graph.attach(handle, root);
            }
        }

        importer.load_skins(&gltf);
        importer.load_first_animation(&gltf, &buffers);

        log::debug!(
            "Imported {} ({} nodes, {} skins, {} animations)",
            path.display(),
            gltf.nodes().count(),
            gltf.skins().count(),
            gltf.animations().count()
        );
        Ok(root)
    }

    fn create_node(&mut self, node: &gltf::Node) -> NodeHandle {
        let (t, r, s) = node.transform().decomposed();
        let transform = Transform::from_trs(
            Vec3::from_array(t),
            Quat::from_array(r),
            Vec3::from_array(s),
        );
        let kind = if node.mesh().is_some() {
            NodeKind::Mesh
        } else {
            NodeKind::Empty
        };
        self.graph.add_node(
            Node::new(node_name(node))
                .with_kind(kind)
                .with_transform(transform),
        )
    }

    /// Turns every skin into an armature node owning the skin's joints.
    ///
    /// The armature is the parent of the skin's root joint, or the root joint
    /// itself when it is top-level in the file.
    fn load_skins(&mut self, gltf: &gltf::Gltf) {
        for skin in gltf.skins() {
            let joints: Vec<_> = skin.joints().collect();
            if joints.is_empty() {
                log::warn!("Skin '{}' has no joints", skin.name().unwrap_or("Skin"));
                continue;
            }

            let root_joint = skin
                .skeleton()
                .filter(|s| joints.iter().any(|j| j.index() == s.index()))
                .or_else(|| {
                    joints
                        .iter()
                        .find(|j| {
                            !joints
                                .iter()
                                .any(|p| p.children().any(|c| c.index() == j.index()))
                        })
                        .cloned()
                })
                .unwrap_or_else(|| joints[0].clone());

            let root_handle = self.node_mapping[root_joint.index()];
            let armature_handle = match self.graph.get_node(root_handle).and_then(Node::parent) {
                Some(parent) if self.graph.get_node(parent).is_some_and(|n| n.parent().is_some()) => {
                    parent
                }
                _ => root_handle,
            };

            let bones: Vec<NodeHandle> = joints
                .iter()
                .map(|j| self.node_mapping[j.index()])
                .collect();

            for (joint, &bone) in joints.iter().zip(&bones) {
                self.joint_armatures.insert(joint.index(), armature_handle);
                if bone != armature_handle
                    && let Some(node) = self.graph.get_node_mut(bone)
                {
                    node.kind = NodeKind::Bone;
                }
            }

            if let Some(node) = self.graph.get_node_mut(armature_handle) {
                match &mut node.kind {
                    NodeKind::Armature(armature) => armature.bones.extend(bones),
                    kind => {
                        *kind = NodeKind::Armature(Armature {
                            bones,
                            action: None,
                        });
                    }
                }
            }
        }
    }

    /// Converts the file's first animation into actions on the armatures
    /// whose bones it animates.
    fn load_first_animation(&mut self, gltf: &gltf::Gltf, buffers: &[Vec<u8>]) {
        let mut animations = gltf.animations();
        let Some(animation) = animations.next() else {
            return;
        };
        let ignored = animations.count();
        if ignored > 0 {
            log::warn!("Clip file has {ignored} extra animation(s); only the first is used");
        }

        let action_name = animation.name().unwrap_or("Action").to_string();
        let mut actions: FxHashMap<NodeHandle, Action> = FxHashMap::default();

        for channel in animation.channels() {
            let target = channel.target();
            let target_node = target.node();
            let Some(&armature) = self.joint_armatures.get(&target_node.index()) else {
                log::warn!(
                    "Animation channel targets '{}', which is not a bone; skipped",
                    node_name(&target_node)
                );
                continue;
            };
            let bone = self
                .graph
                .get_node(self.node_mapping[target_node.index()])
                .map_or_else(|| node_name(&target_node), |n| n.name.clone());

            let reader = channel.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
            let Some(inputs) = reader.read_inputs() else {
                log::warn!("Animation channel on '{bone}' has no input times; skipped");
                continue;
            };
            let frames: Vec<i32> = inputs.map(|t| self.settings.seconds_to_frame(t)).collect();

            // Cubic-spline outputs are (in-tangent, value, out-tangent) triples
            let (stride, offset) = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::CubicSpline => (3, 1),
                _ => (1, 0),
            };

            let values: Vec<(Channel, Vec<f32>)> = match reader.read_outputs() {
                Some(gltf::animation::util::ReadOutputs::Translations(iter)) => {
                    let raw: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                    split_axes(&pick(&raw, stride, offset), Channel::Location)
                }
                Some(gltf::animation::util::ReadOutputs::Rotations(iter)) => {
                    let raw: Vec<Vec3> = iter
                        .into_f32()
                        .map(|r| {
                            let (x, y, z) = Quat::from_array(r).to_euler(EulerRot::XYZ);
                            Vec3::new(x, y, z)
                        })
                        .collect();
                    split_axes(&pick(&raw, stride, offset), Channel::Rotation)
                }
                Some(gltf::animation::util::ReadOutputs::Scales(iter)) => {
                    let raw: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                    split_axes(&pick(&raw, stride, offset), Channel::Scale)
                }
                Some(gltf::animation::util::ReadOutputs::MorphTargetWeights(_)) => {
                    log::warn!("Morph target weights on '{bone}' are not supported; skipped");
                    continue;
                }
                None => {
                    log::warn!("Animation channel on '{bone}' has no output values; skipped");
                    continue;
                }
            };

            let action = actions
                .entry(armature)
                .or_insert_with(|| Action::new(action_name.clone()));
            for (channel, samples) in values {
                let curve = action.curve_mut(CurveKey::new(bone.clone(), channel));
                curve.keyframes.extend(
                    frames
                        .iter()
                        .zip(samples)
                        .map(|(&frame, value)| Keyframe::new(frame, value)),
                );
            }
        }

        for (handle, action) in actions {
            if let Some(armature) = self.graph.armature_mut(handle) {
                armature.action = Some(action);
            }
        }
    }
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn pick(raw: &[Vec3], stride: usize, offset: usize) -> Vec<Vec3> {
    raw.iter().skip(offset).step_by(stride).copied().collect()
}

fn split_axes(values: &[Vec3], channel: fn(Axis) -> Channel) -> Vec<(Channel, Vec<f32>)> {
    Axis::ALL
        .iter()
        .map(|&axis| {
            let i = axis.index();
            (channel(axis), values.iter().map(|v| v[i]).collect())
        })
        .collect()
}

fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let Some(blob) = gltf.blob.as_deref() else {
                    return Err(ChoreoError::GltfError("Missing GLB binary chunk".to_string()));
                };
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                buffer_data.push(decode_data_uri(uri)?);
            }
            gltf::buffer::Source::Uri(uri) => {
                let buffer_path = base_path.join(uri);
                let data = fs::read(&buffer_path).map_err(|e| ChoreoError::io(&buffer_path, e))?;
                buffer_data.push(data);
            }
        }
    }
    Ok(buffer_data)
}

/// Decodes a `data:[<mediatype>];base64,<payload>` URI.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ChoreoError::DataUriError("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ChoreoError::DataUriError("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(ChoreoError::DataUriError(format!(
            "only base64 data URIs are supported, got '{header}'"
        )));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_data_uri() {
        let bytes = decode_data_uri("data:application/octet-stream;base64,AQID").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_plain_data_uri() {
        let err = decode_data_uri("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, ChoreoError::DataUriError(_)));
    }

    #[test]
    fn cubic_spline_picks_value_elements() {
        let raw = [
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
            Vec3::splat(-1.0),
            Vec3::splat(-2.0),
            Vec3::splat(2.0),
            Vec3::splat(-2.0),
        ];
        assert_eq!(pick(&raw, 3, 1), vec![Vec3::splat(1.0), Vec3::splat(2.0)]);
    }
}
