// Affine transform wrapper around glam::Mat4
//
// Scene description files write matrices row-major, so this type exposes a
// row-major view (entry/to_rows_array) while storing a glam::Mat4 internally.
// Points use the column-vector convention: (a * b) applies b first, then a.

use std::ops::Mul;

use glam::{Mat4, Vec3, Vec4};

/// A 4x4 affine transform built from scene-description elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// Wrap an existing matrix.
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn from_translation(delta: Vec3) -> Self {
        Self {
            matrix: Mat4::from_translation(delta),
        }
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            matrix: Mat4::from_scale(scale),
        }
    }

    /// Axis-angle rotation (Rodrigues). The axis is normalized before use
    /// and the angle is given in degrees.
    pub fn from_rotation(axis: Vec3, angle_deg: f32) -> Self {
        Self {
            matrix: Mat4::from_axis_angle(axis.normalize(), angle_deg.to_radians()),
        }
    }

    /// Camera-style frame: forward towards `target`, `origin` in the
    /// translation column. Column order is (left, up, forward, origin).
    pub fn from_look_at(origin: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - origin).normalize();
        let left = up.cross(forward).normalize();
        let adj_up = forward.cross(left).normalize();

        Self {
            matrix: Mat4::from_cols(
                Vec4::new(left.x, left.y, left.z, 0.0),
                Vec4::new(adj_up.x, adj_up.y, adj_up.z, 0.0),
                Vec4::new(forward.x, forward.y, forward.z, 0.0),
                Vec4::new(origin.x, origin.y, origin.z, 1.0),
            ),
        }
    }

    /// Build from a flat row-major value list. Accepts exactly 9 (3x3),
    /// 12 (3x4) or 16 values; missing rows/columns are padded from the
    /// identity. Any other count is rejected.
    pub fn from_row_slice(values: &[f32]) -> Option<Self> {
        let v = values;
        let rows: [f32; 16] = match v.len() {
            9 => [
                v[0], v[1], v[2], 0.0, //
                v[3], v[4], v[5], 0.0, //
                v[6], v[7], v[8], 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            12 => [
                v[0], v[1], v[2], v[3], //
                v[4], v[5], v[6], v[7], //
                v[8], v[9], v[10], v[11], //
                0.0, 0.0, 0.0, 1.0,
            ],
            16 => v.try_into().ok()?,
            _ => return None,
        };

        // from_cols_array reads column-major, so transpose the row-major input
        Some(Self {
            matrix: Mat4::from_cols_array(&rows).transpose(),
        })
    }

    /// Row-major element access.
    pub fn entry(&self, row: usize, col: usize) -> f32 {
        self.matrix.row(row)[col]
    }

    /// Export the matrix as a flat row-major array.
    pub fn to_rows_array(&self) -> [f32; 16] {
        self.matrix.transpose().to_cols_array()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_entries(t: &Transform, expected: &[[f32; 4]; 4]) {
        for row in 0..4 {
            for col in 0..4 {
                assert!(
                    (t.entry(row, col) - expected[row][col]).abs() < 1e-5,
                    "entry ({}, {}): got {}, expected {}",
                    row,
                    col,
                    t.entry(row, col),
                    expected[row][col]
                );
            }
        }
    }

    #[test]
    fn test_identity() {
        assert_entries(
            &Transform::identity(),
            &[
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn test_translation() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_entries(
            &t,
            &[
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 2.0],
                [0.0, 0.0, 1.0, 3.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn test_scale() {
        let t = Transform::from_scale(Vec3::new(1.0, 2.0, 3.0));
        assert_entries(
            &t,
            &[
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 2.0, 0.0, 0.0],
                [0.0, 0.0, 3.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn test_rotation_x_axis() {
        let angle: f32 = 180.0;
        let (sa, ca) = angle.to_radians().sin_cos();

        let t = Transform::from_rotation(Vec3::new(1.0, 0.0, 0.0), angle);
        assert_entries(
            &t,
            &[
                [1.0, 0.0, 0.0, 0.0],
                [0.0, ca, -sa, 0.0],
                [0.0, sa, ca, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn test_rotation_normalizes_axis() {
        let a = Transform::from_rotation(Vec3::new(0.0, 2.0, 0.0), 90.0);
        let b = Transform::from_rotation(Vec3::new(0.0, 1.0, 0.0), 90.0);
        for row in 0..4 {
            for col in 0..4 {
                assert!((a.entry(row, col) - b.entry(row, col)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_look_at() {
        let t = Transform::from_look_at(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert_entries(
            &t,
            &[
                [0.0, 0.0, -1.0, 1.0],
                [-1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn test_compose_scale_then_translate() {
        let t = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))
            * Transform::from_scale(Vec3::splat(2.0));
        assert_entries(
            &t,
            &[
                [2.0, 0.0, 0.0, 1.0],
                [0.0, 2.0, 0.0, 0.0],
                [0.0, 0.0, 2.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }

    #[test]
    fn test_from_row_slice_counts() {
        let m3 = Transform::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        assert_eq!(m3.entry(0, 1), 2.0);
        assert_eq!(m3.entry(2, 2), 9.0);
        assert_eq!(m3.entry(0, 3), 0.0);
        assert_eq!(m3.entry(3, 3), 1.0);

        let m4 = Transform::from_row_slice(&[
            1.0, 0.0, 0.0, 5.0, //
            0.0, 1.0, 0.0, 6.0, //
            0.0, 0.0, 1.0, 7.0,
        ])
        .unwrap();
        assert_eq!(m4.entry(0, 3), 5.0);
        assert_eq!(m4.entry(3, 2), 0.0);
        assert_eq!(m4.entry(3, 3), 1.0);

        assert!(Transform::from_row_slice(&[1.0; 10]).is_none());
        assert!(Transform::from_row_slice(&[]).is_none());
    }

    #[test]
    fn test_rows_array_round_trip() {
        let t = Transform::from_look_at(
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
        );
        let rows = t.to_rows_array();
        let back = Transform::from_row_slice(&rows).unwrap();
        assert_eq!(t, back);
    }
}
