use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Outline shell is this much larger than the die on each side
pub const OUTLINE_MARGIN: f32 = 0.06;

pub fn create_die_mesh_and_collider(size: f32) -> (Mesh, Collider) {
    let mesh = Mesh::from(Cuboid::new(size, size, size));
    let collider = Collider::cuboid(size / 2.0, size / 2.0, size / 2.0);

    (mesh, collider)
}

pub fn create_outline_mesh(size: f32) -> Mesh {
    let outline = size + OUTLINE_MARGIN * 2.0;
    Mesh::from(Cuboid::new(outline, outline, outline))
}

/// Pip layout of each face in local space, in face value order.
/// Used to dot the faces so the value read-out can be checked by eye.
pub fn pip_positions(size: f32) -> Vec<(Vec3, Vec3)> {
    let h = size / 2.0;
    let o = size * 0.25;
    let lift = 0.005;
    let mut pips = Vec::new();

    // (face normal, in-plane axis u, in-plane axis v, pip pattern in (u, v))
    let faces: [(Vec3, Vec3, Vec3, &[(f32, f32)]); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z, &[(0.0, 0.0)]),
        (Vec3::NEG_X, Vec3::Y, Vec3::Z, &[(-1.0, -1.0), (1.0, 1.0)]),
        (Vec3::Y, Vec3::X, Vec3::Z, &[(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)]),
        (
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::Z,
            &[(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)],
        ),
        (
            Vec3::Z,
            Vec3::X,
            Vec3::Y,
            &[(-1.0, -1.0), (-1.0, 1.0), (0.0, 0.0), (1.0, -1.0), (1.0, 1.0)],
        ),
        (
            Vec3::NEG_Z,
            Vec3::X,
            Vec3::Y,
            &[
                (-1.0, -1.0),
                (-1.0, 0.0),
                (-1.0, 1.0),
                (1.0, -1.0),
                (1.0, 0.0),
                (1.0, 1.0),
            ],
        ),
    ];

    for (normal, u, v, pattern) in faces {
        for (a, b) in pattern {
            let position = normal * (h + lift) + u * (a * o) + v * (b * o);
            pips.push((position, normal));
        }
    }

    pips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice_tray::types::FACE_NORMALS;

    #[test]
    fn test_pip_count_matches_faces() {
        let pips = pip_positions(1.0);
        // 1 + 2 + 3 + 4 + 5 + 6
        assert_eq!(pips.len(), 21);

        for (value, normal) in FACE_NORMALS.iter().enumerate() {
            let on_face = pips.iter().filter(|(_, n)| n == normal).count();
            assert_eq!(on_face, value + 1);
        }
    }

    #[test]
    fn test_pips_sit_on_their_face() {
        for (position, normal) in pip_positions(2.0) {
            assert!((position.dot(normal) - 1.005).abs() < 1e-5);
        }
    }

    #[test]
    fn test_outline_matches_die_topology() {
        let outline = create_outline_mesh(1.0);
        let die = create_die_mesh_and_collider(1.0).0;
        assert_eq!(outline.count_vertices(), die.count_vertices());
    }
}
