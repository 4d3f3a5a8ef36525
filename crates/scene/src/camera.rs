use math::{Mat4, Vec2, Vec3};

/// Perspective fly camera. Rotation is Euler radians applied X then Y
/// then Z around the camera position to find the look target.
#[derive(Clone, Copy, Debug)]
pub struct Camera3D {
    pub position: Vec3,
    /// Euler angles in radians (pitch, yaw, roll), applied XYZ.
    pub rotation: Vec3,
    pub fov_deg: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(90.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera3D {
    pub fn new(fov_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_deg,
            aspect,
            z_near,
            z_far,
        }
    }

    /// Unit vector the camera is looking along.
    pub fn look_direction(&self) -> Vec3 {
        let rot = Mat4::rotation_x(self.rotation.x)
            .mul(&Mat4::rotation_y(self.rotation.y))
            .mul(&Mat4::rotation_z(self.rotation.z));
        rot.mul_vec(Vec3::new(0.0, 0.0, 1.0)).normalized()
    }

    /// World transform of the camera: rotated basis pointed at the look
    /// target, position in the translation row.
    pub fn camera_matrix(&self) -> Mat4 {
        let target = self.position + self.look_direction();
        Mat4::pointed_at(self.position, target, Vec3::new(0.0, 1.0, 0.0))
    }

    /// View matrix (rigid inverse of the camera matrix; valid because
    /// the camera transform is rotation + translation only).
    pub fn view(&self) -> Mat4 {
        self.camera_matrix().rigid_inverse()
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_deg, self.aspect, self.z_near, self.z_far)
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Apply one tick of fly-style movement from a polled input snapshot.
    pub fn fly(&mut self, input: &CameraInput, dt: f32) {
        let forward = self.look_direction();
        let right = Vec3::new(0.0, 1.0, 0.0).cross(forward).normalized();
        let mut delta = Vec3::new(0.0, 0.0, 0.0);
        if input.forward {
            delta += forward;
        }
        if input.back {
            delta -= forward;
        }
        if input.right {
            delta += right;
        }
        if input.left {
            delta -= right;
        }
        if input.up {
            delta += Vec3::new(0.0, 1.0, 0.0);
        }
        if input.down {
            delta -= Vec3::new(0.0, 1.0, 0.0);
        }
        self.position += delta.normalized() * (input.move_speed * dt);
        self.rotation.y += input.turn.x * input.turn_speed * dt;
        self.rotation.x += input.turn.y * input.turn_speed * dt;
    }
}

/// One polled keyboard/mouse snapshot feeding [`Camera3D::fly`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Turn input in (yaw, pitch) units of full speed.
    pub turn: Vec2,
    pub move_speed: f32,
    pub turn_speed: f32,
}

/// 2D camera: world offset plus uniform zoom.
#[derive(Clone, Copy, Debug)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self { position: Vec2::ZERO, zoom: 1.0 }
    }
}
