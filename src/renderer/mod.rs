pub mod mesh;
pub mod shader;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use hecs::World;
use mesh::{Mesh, MeshData};
use shader::ShaderProgram;

use arena::components::{Checkerboard, Color, GlobalTransform, MeshHandle};

const VERT_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 a_pos;
layout (location = 1) in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_pos;
out vec3 v_normal;

void main() {
    vec4 world = u_model * vec4(a_pos, 1.0);
    v_world_pos = world.xyz;
    v_normal = mat3(transpose(inverse(u_model))) * a_normal;
    gl_Position = u_projection * u_view * world;
}
"#;

const FRAG_SRC: &str = r#"#version 330 core
in vec3 v_world_pos;
in vec3 v_normal;

uniform vec3 u_light_dir;
uniform vec3 u_camera_pos;
uniform vec3 u_ambient_color;
uniform vec3 u_object_color;
uniform vec3 u_object_color_2;
uniform int u_checkerboard;
uniform vec3 u_fog_color;
uniform float u_fog_start;
uniform float u_fog_end;

out vec4 frag_color;

void main() {
    vec3 base = u_object_color;
    if (u_checkerboard == 1) {
        ivec2 cell = ivec2(floor(v_world_pos.xz / 2.0));
        if (((cell.x + cell.y) & 1) == 1) {
            base = u_object_color_2;
        }
    }
    float diffuse = max(dot(normalize(v_normal), normalize(-u_light_dir)), 0.0);
    vec3 lit = base * (u_ambient_color + diffuse * 0.85);

    float dist = length(v_world_pos - u_camera_pos);
    float fog = clamp((dist - u_fog_start) / (u_fog_end - u_fog_start), 0.0, 1.0);
    frag_color = vec4(mix(lit, u_fog_color, fog), 1.0);
}
"#;

const SKY_COLOR: Vec3 = Vec3::new(0.53, 0.72, 0.9);
const LIGHT_DIR: Vec3 = Vec3::new(-0.5, -1.0, -0.3);

/// Holds all uploaded meshes. Entities reference meshes by MeshHandle index.
#[derive(Default)]
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    pub fn add(&mut self, data: &MeshData) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(Mesh::upload(data));
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }
}

pub struct Renderer {
    shader: ShaderProgram,
}

impl Renderer {
    pub fn init() -> Result<Self> {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::ClearColor(SKY_COLOR.x, SKY_COLOR.y, SKY_COLOR.z, 1.0);
        }
        let shader =
            ShaderProgram::from_sources(VERT_SRC, FRAG_SRC).context("building scene shader")?;
        Ok(Self { shader })
    }

    pub fn resize(&self, width: i32, height: i32) {
        unsafe {
            gl::Viewport(0, 0, width, height);
        }
    }

    pub fn draw_scene(
        &mut self,
        world: &World,
        meshes: &MeshStore,
        view: &Mat4,
        proj: &Mat4,
        camera_pos: Vec3,
    ) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.shader.bind();
        self.shader.set_mat4("u_view", view);
        self.shader.set_mat4("u_projection", proj);
        self.shader.set_vec3("u_light_dir", LIGHT_DIR);
        self.shader.set_vec3("u_camera_pos", camera_pos);
        self.shader.set_vec3("u_ambient_color", Vec3::splat(0.35));
        self.shader.set_vec3("u_fog_color", SKY_COLOR);
        self.shader.set_float("u_fog_start", 60.0);
        self.shader.set_float("u_fog_end", 160.0);

        for (_entity, (global, handle, color, checker)) in world
            .query::<(&GlobalTransform, &MeshHandle, &Color, Option<&Checkerboard>)>()
            .iter()
        {
            let Some(mesh) = meshes.get(*handle) else {
                continue;
            };
            self.shader.set_mat4("u_model", &global.0);
            self.shader.set_vec3("u_object_color", color.0);
            match checker {
                Some(checker) => {
                    self.shader.set_int("u_checkerboard", 1);
                    self.shader.set_vec3("u_object_color_2", checker.0);
                }
                None => self.shader.set_int("u_checkerboard", 0),
            }
            mesh.draw();
        }
    }
}
