use gl::types::*;
use glam::Vec3;
use std::f32::consts::{PI, TAU};
use std::mem;
use std::ptr;

/// CPU-side geometry: interleaved position + normal, and triangle indices.
#[derive(Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / 6) as u32
    }

    /// Shift every position by `offset`; moves the pivot of the shape.
    pub fn translated(mut self, offset: Vec3) -> Self {
        for v in self.vertices.chunks_exact_mut(6) {
            v[0] += offset.x;
            v[1] += offset.y;
            v[2] += offset.z;
        }
        self
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3) -> u32 {
        let i = self.vertex_count();
        self.vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
        i
    }

    /// Counter-clockwise quad `a b c d` seen from the side `n` points to.
    fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, n: Vec3) {
        let base = self.push_vertex(a, n);
        self.push_vertex(b, n);
        self.push_vertex(c, n);
        self.push_vertex(d, n);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    pub index_count: i32,
}

impl Mesh {
    pub fn upload(data: &MeshData) -> Self {
        let (mut vao, mut vbo, mut ebo) = (0, 0, 0);

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.vertices.len() * mem::size_of::<f32>()) as GLsizeiptr,
                data.vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (data.indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
                data.indices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            let stride = 6 * mem::size_of::<f32>() as GLsizei;
            // location 0: position, location 1: normal
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, ptr::null());
            gl::EnableVertexAttribArray(0);
            gl::VertexAttribPointer(
                1,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (3 * mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(1);

            gl::BindVertexArray(0);
        }

        Self {
            vao,
            vbo,
            ebo,
            index_count: data.indices.len() as i32,
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Axis-aligned box centred on the origin.
pub fn box_data(size: Vec3) -> MeshData {
    frustum_data(size.x, size.z, size.x, size.z, size.y)
}

/// Box whose top face is `top_w × top_d` and bottom `bot_w × bot_d`.
/// A zero-sized top gives a pyramid (used for roofs).
pub fn frustum_data(top_w: f32, top_d: f32, bot_w: f32, bot_d: f32, height: f32) -> MeshData {
    let hh = height * 0.5;
    let (tw, td, bw, bd) = (top_w * 0.5, top_d * 0.5, bot_w * 0.5, bot_d * 0.5);
    let t = [
        Vec3::new(-tw, hh, td),
        Vec3::new(tw, hh, td),
        Vec3::new(tw, hh, -td),
        Vec3::new(-tw, hh, -td),
    ];
    let b = [
        Vec3::new(-bw, -hh, bd),
        Vec3::new(bw, -hh, bd),
        Vec3::new(bw, -hh, -bd),
        Vec3::new(-bw, -hh, -bd),
    ];

    let mut data = MeshData::default();
    data.push_quad(t[0], t[1], t[2], t[3], Vec3::Y);
    data.push_quad(b[3], b[2], b[1], b[0], Vec3::NEG_Y);
    // Sides: front, right, back, left.
    for i in 0..4 {
        let j = (i + 1) % 4;
        let n = (b[j] - b[i]).cross(t[i] - b[i]).normalize_or(Vec3::Y);
        data.push_quad(b[i], b[j], t[j], t[i], n);
    }
    data
}

pub fn sphere_data(radius: f32, stacks: u32, sectors: u32) -> MeshData {
    let mut data = MeshData::default();
    for i in 0..=stacks {
        let phi = PI / 2.0 - i as f32 * PI / stacks as f32;
        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let n = Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin());
            data.push_vertex(n * radius, n);
        }
    }
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * (sectors + 1) + j;
            let b = a + sectors + 1;
            data.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    data
}

pub fn cylinder_data(radius: f32, height: f32, segments: u32) -> MeshData {
    let mut data = MeshData::default();
    let hh = height * 0.5;
    let ring = |i: u32| {
        let a = TAU * i as f32 / segments as f32;
        Vec3::new(a.cos(), 0.0, a.sin())
    };

    for i in 0..segments {
        let (n0, n1) = (ring(i), ring(i + 1));
        let (p0, p1) = (n0 * radius, n1 * radius);
        let base = data.push_vertex(p0 - Vec3::Y * hh, n0);
        data.push_vertex(p1 - Vec3::Y * hh, n1);
        data.push_vertex(p1 + Vec3::Y * hh, n1);
        data.push_vertex(p0 + Vec3::Y * hh, n0);
        data.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    for (y, n) in [(hh, Vec3::Y), (-hh, Vec3::NEG_Y)] {
        let centre = data.push_vertex(Vec3::new(0.0, y, 0.0), n);
        for i in 0..segments {
            let a = data.push_vertex(ring(i) * radius + Vec3::Y * y, n);
            let b = data.push_vertex(ring(i + 1) * radius + Vec3::Y * y, n);
            if y > 0.0 {
                data.indices.extend_from_slice(&[centre, b, a]);
            } else {
                data.indices.extend_from_slice(&[centre, a, b]);
            }
        }
    }
    data
}

/// Flat square on the XZ plane facing up.
pub fn plane_data(size: f32) -> MeshData {
    let h = size * 0.5;
    let mut data = MeshData::default();
    data.push_quad(
        Vec3::new(-h, 0.0, h),
        Vec3::new(h, 0.0, h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(-h, 0.0, -h),
        Vec3::Y,
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_six_quads() {
        let data = box_data(Vec3::ONE);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.indices.len(), 36);
    }

    #[test]
    fn box_side_normals_point_outward() {
        let data = box_data(Vec3::new(2.0, 1.0, 2.0));
        // Third quad is the front (+Z) side.
        let v = &data.vertices[2 * 4 * 6..2 * 4 * 6 + 6];
        assert!((Vec3::new(v[3], v[4], v[5]) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn indices_stay_in_range() {
        for data in [sphere_data(1.0, 8, 12), cylinder_data(0.5, 2.0, 10), plane_data(4.0)] {
            let n = data.vertex_count();
            assert!(data.indices.iter().all(|&i| i < n));
        }
    }
}
