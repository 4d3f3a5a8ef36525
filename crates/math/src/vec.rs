use core::ops;

use bytemuck::{Pod, Zeroable};

/// Homogeneous 2D vector. `w` rides along untouched by arithmetic and
/// defaults to 1; the 2D pipeline uses it as the perspective-correct
/// interpolation hint when packed next to a UV pair.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
    pub w: f32,
}

/// Homogeneous 3D vector (`w` defaults to 1 for points).
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y, w: 1.0 }
    }

    #[inline]
    pub const fn with_w(x: f32, y: f32, w: f32) -> Vec2 {
        Vec2 { x, y, w }
    }

    #[inline]
    pub fn dot(self, b: Vec2) -> f32 {
        self.x * b.x + self.y * b.y
    }

    #[inline]
    pub fn length2(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length2().sqrt()
    }

    /// Unit vector in the same direction. A zero-length input yields the
    /// zero vector rather than NaN components.
    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 { Vec2::ZERO } else { self * (1.0 / len) }
    }

    #[inline]
    pub fn lerp(self, b: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (b.x - self.x) * t,
            y: self.y + (b.y - self.y) * t,
            w: self.w + (b.w - self.w) * t,
        }
    }
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z, w: 1.0 }
    }

    #[inline]
    pub const fn with_w(x: f32, y: f32, z: f32, w: f32) -> Vec3 {
        Vec3 { x, y, z, w }
    }

    #[inline]
    pub fn dot(self, b: Vec3) -> f32 {
        self.x * b.x + self.y * b.y + self.z * b.z
    }

    #[inline]
    pub fn cross(self, b: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * b.z - self.z * b.y,
            y: self.z * b.x - self.x * b.z,
            z: self.x * b.y - self.y * b.x,
            w: 1.0,
        }
    }

    #[inline]
    pub fn length2(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length2().sqrt()
    }

    /// Unit vector in the same direction. A zero-length input yields the
    /// zero vector rather than NaN components.
    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len == 0.0 { Vec3::ZERO } else { self * (1.0 / len) }
    }

    #[inline]
    pub fn lerp(self, b: Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (b.x - self.x) * t,
            y: self.y + (b.y - self.y) * t,
            z: self.z + (b.z - self.z) * t,
            w: self.w + (b.w - self.w) * t,
        }
    }
}

// Arithmetic touches the spatial components only; `w` is carried from
// the left operand so points stay points.

impl ops::Add<Vec2> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y, w: self.w }
    }
}

impl ops::Sub<Vec2> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y, w: self.w }
    }
}

impl ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs, w: self.w }
    }
}

impl ops::AddAssign<Vec2> for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl ops::SubAssign<Vec2> for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl ops::Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2 { x: -self.x, y: -self.y, w: self.w }
    }
}

impl ops::Add<Vec3> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z, w: self.w }
    }
}

impl ops::Sub<Vec3> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z, w: self.w }
    }
}

impl ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3 { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs, w: self.w }
    }
}

impl ops::AddAssign<Vec3> for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl ops::SubAssign<Vec3> for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl ops::MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl ops::Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3 { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        assert!(approx(v.normalized().length(), 1.0));
        let v2 = Vec2::new(-5.0, 12.0);
        assert!(approx(v2.normalized().length(), 1.0));
    }

    #[test]
    fn normalized_zero_is_zero() {
        assert_eq!(Vec3::new(0.0, 0.0, 0.0).normalized(), Vec3::ZERO);
        assert_eq!(Vec2::new(0.0, 0.0).normalized(), Vec2::ZERO);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(y);
        assert!(approx(z.x, 0.0) && approx(z.y, 0.0) && approx(z.z, 1.0));
    }

    #[test]
    fn arithmetic_keeps_w() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let q = p + Vec3::new(1.0, 1.0, 1.0);
        assert!(approx(q.w, 1.0));
        let d = Vec3::with_w(0.5, 0.5, 0.5, 0.0);
        assert!(approx((d * 2.0).w, 0.0));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 4.0, 6.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let m = a.lerp(b, 0.5);
        assert!(approx(m.x, 1.0) && approx(m.y, 2.0) && approx(m.z, 3.0));
    }
}
