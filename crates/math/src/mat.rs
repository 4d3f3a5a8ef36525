use bytemuck::{Pod, Zeroable};

use crate::vec::{Vec2, Vec3};

/// 2x2 row-major matrix, used for 2D mesh rotation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat2 {
    pub e: [[f32; 2]; 2],
}

impl Mat2 {
    #[inline]
    pub fn identity() -> Mat2 {
        Mat2 { e: [[1.0, 0.0], [0.0, 1.0]] }
    }

    /// Counter-clockwise rotation by `angle` radians (row-vector form).
    pub fn rotation(angle: f32) -> Mat2 {
        let (s, c) = angle.sin_cos();
        Mat2 { e: [[c, s], [-s, c]] }
    }

    #[inline]
    pub fn mul_vec(&self, v: Vec2) -> Vec2 {
        Vec2 {
            x: v.x * self.e[0][0] + v.y * self.e[1][0],
            y: v.x * self.e[0][1] + v.y * self.e[1][1],
            w: v.w,
        }
    }

    #[inline]
    pub fn to_array(&self) -> [f32; 4] {
        [self.e[0][0], self.e[0][1], self.e[1][0], self.e[1][1]]
    }
}

/// 4x4 row-major matrix (array of rows). All constructors are factory
/// functions; a default `Mat4` is all zeroes, not the identity.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat4 {
    pub e: [[f32; 4]; 4],
}

impl Mat4 {
    #[inline]
    pub fn zero() -> Mat4 {
        Mat4::default()
    }

    pub fn identity() -> Mat4 {
        let mut m = Mat4::zero();
        for i in 0..4 {
            m.e[i][i] = 1.0;
        }
        m
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Mat4::identity();
        m.e[3][0] = x;
        m.e[3][1] = y;
        m.e[3][2] = z;
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Mat4::identity();
        m.e[0][0] = x;
        m.e[1][1] = y;
        m.e[2][2] = z;
        m
    }

    pub fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m.e[1][1] = c;
        m.e[1][2] = s;
        m.e[2][1] = -s;
        m.e[2][2] = c;
        m
    }

    pub fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m.e[0][0] = c;
        m.e[0][2] = s;
        m.e[2][0] = -s;
        m.e[2][2] = c;
        m
    }

    pub fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m.e[0][0] = c;
        m.e[0][1] = s;
        m.e[1][0] = -s;
        m.e[1][1] = c;
        m
    }

    /// Perspective projection from a vertical FOV in degrees.
    ///
    /// Depth maps forward: `e[2][2] = far/(far-near)`,
    /// `e[3][2] = -far*near/(far-near)`, with `e[2][3] = 1` feeding the
    /// hardware divide (`e[3][3] = 0`). `aspect` is height/width.
    pub fn perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_deg.to_radians() * 0.5).tan();
        let mut m = Mat4::zero();
        m.e[0][0] = aspect * f;
        m.e[1][1] = f;
        m.e[2][2] = far / (far - near);
        m.e[3][2] = -far * near / (far - near);
        m.e[2][3] = 1.0;
        m
    }

    /// Camera world matrix looking from `pos` toward `target`.
    ///
    /// The basis is Gram-Schmidt orthogonalised against `up`; `pos` lands
    /// in the translation row.
    pub fn pointed_at(pos: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - pos).normalized();
        let new_up = (up - forward * up.dot(forward)).normalized();
        let right = new_up.cross(forward);

        let mut m = Mat4::zero();
        m.e[0] = [right.x, right.y, right.z, 0.0];
        m.e[1] = [new_up.x, new_up.y, new_up.z, 0.0];
        m.e[2] = [forward.x, forward.y, forward.z, 0.0];
        m.e[3] = [pos.x, pos.y, pos.z, 1.0];
        m
    }

    /// Closed-form inverse for rigid transforms (rotation + translation,
    /// uniform scale at most). Transposes the 3x3 block and re-projects
    /// the translation; it is NOT a general 4x4 inverse and silently
    /// returns garbage for sheared or non-uniformly scaled matrices.
    pub fn rigid_inverse(&self) -> Mat4 {
        let mut m = Mat4::zero();
        for r in 0..3 {
            for c in 0..3 {
                m.e[r][c] = self.e[c][r];
            }
        }
        let t = self.e[3];
        for c in 0..3 {
            m.e[3][c] = -(t[0] * m.e[0][c] + t[1] * m.e[1][c] + t[2] * m.e[2][c]);
        }
        m.e[3][3] = 1.0;
        m
    }

    /// Matrix product. Under the row-vector convention `a.mul(&b)`
    /// applies `a` first: `v * a.mul(&b) == (v * a) * b`.
    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let mut m = Mat4::zero();
        for r in 0..4 {
            for c in 0..4 {
                m.e[r][c] = self.e[r][0] * rhs.e[0][c]
                    + self.e[r][1] * rhs.e[1][c]
                    + self.e[r][2] * rhs.e[2][c]
                    + self.e[r][3] * rhs.e[3][c];
            }
        }
        m
    }

    /// Row-vector transform, `v * M`. No homogeneous divide.
    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        Vec3 {
            x: v.x * self.e[0][0] + v.y * self.e[1][0] + v.z * self.e[2][0] + v.w * self.e[3][0],
            y: v.x * self.e[0][1] + v.y * self.e[1][1] + v.z * self.e[2][1] + v.w * self.e[3][1],
            z: v.x * self.e[0][2] + v.y * self.e[1][2] + v.z * self.e[2][2] + v.w * self.e[3][2],
            w: v.x * self.e[0][3] + v.y * self.e[1][3] + v.z * self.e[2][3] + v.w * self.e[3][3],
        }
    }

    /// Flat row-major float array for uniform upload.
    pub fn to_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for r in 0..4 {
            out[r * 4..r * 4 + 4].copy_from_slice(&self.e[r]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
    }

    #[test]
    fn identity_is_multiplicative_neutral() {
        let m = Mat4::translation(1.0, 2.0, 3.0).mul(&Mat4::rotation_y(0.7));
        assert_eq!(Mat4::identity().mul(&m), m);
        assert_eq!(m.mul(&Mat4::identity()), m);
    }

    #[test]
    fn translation_round_trips_through_rigid_inverse() {
        let m = Mat4::translation(4.0, -2.0, 9.5);
        let inv = m.rigid_inverse();
        let p = Vec3::new(1.0, 2.0, 3.0);
        let back = inv.mul_vec(m.mul_vec(p));
        assert!(approx_vec(back, p));
    }

    #[test]
    fn rigid_inverse_undoes_rotation_plus_translation() {
        let m = Mat4::rotation_x(0.4)
            .mul(&Mat4::rotation_y(1.1))
            .mul(&Mat4::translation(-3.0, 0.5, 7.0));
        let inv = m.rigid_inverse();
        let p = Vec3::new(-2.0, 8.0, 1.5);
        assert!(approx_vec(inv.mul_vec(m.mul_vec(p)), p));
    }

    #[test]
    fn perspective_encodes_forward_depth_range() {
        let near = 0.1;
        let far = 100.0;
        let m = Mat4::perspective(90.0, 1.0, near, far);
        assert!(approx(m.e[2][2], far / (far - near)));
        assert!(approx(m.e[3][2], -far * near / (far - near)));
        assert!(approx(m.e[2][3], 1.0));
        assert!(approx(m.e[3][3], 0.0));
    }

    #[test]
    fn pointed_at_puts_position_in_translation_row() {
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let m = Mat4::pointed_at(pos, Vec3::new(1.0, 2.0, 10.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(approx(m.e[3][0], 1.0));
        assert!(approx(m.e[3][1], 2.0));
        assert!(approx(m.e[3][2], 3.0));
        // Basis rows stay orthonormal.
        let right = Vec3::new(m.e[0][0], m.e[0][1], m.e[0][2]);
        let up = Vec3::new(m.e[1][0], m.e[1][1], m.e[1][2]);
        let fwd = Vec3::new(m.e[2][0], m.e[2][1], m.e[2][2]);
        assert!(approx(right.length(), 1.0));
        assert!(approx(up.length(), 1.0));
        assert!(approx(fwd.length(), 1.0));
        assert!(approx(right.dot(up), 0.0));
        assert!(approx(up.dot(fwd), 0.0));
    }

    #[test]
    fn mat2_rotation_quarter_turn() {
        let m = Mat2::rotation(std::f32::consts::FRAC_PI_2);
        let v = m.mul_vec(Vec2::new(1.0, 0.0));
        assert!(approx(v.x, 0.0));
        assert!(approx(v.y, 1.0));
    }
}
