use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec3};
use glow::HasContext;
use shared::Rgb;

use super::mesh::{self, LineMeshData, MeshData, LINE_STRIDE, MESH_STRIDE};
use crate::scene::{DrawItem, NodeId};
use crate::state::settings::GridSettings;

/// Opacity of projected shadows
const SHADOW_ALPHA: f32 = 0.35;

// ── Render parameters ────────────────────────────────────────

/// Everything a frame needs besides the meshes
pub struct RenderParams {
    /// Destination rectangle [x, y, width, height] in framebuffer pixels
    pub viewport: [f32; 4],
    /// Scene resolution, from the capped device pixel ratio
    pub target_size: [u32; 2],
    pub view_proj: Mat4,
    pub background: Rgb,
    /// Ambient color premultiplied by intensity
    pub ambient: [f32; 3],
    /// Directional color premultiplied by intensity
    pub light_color: [f32; 3],
    /// Unit vector from the scene toward the directional light
    pub light_dir: Vec3,
    /// Planar shadow projection; `None` disables the shadow pass
    pub shadow: Option<Mat4>,
    pub grid_visible: bool,
    /// Line width for gizmo handles, already scaled by pixel ratio
    pub overlay_width: f32,
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

/// Offscreen color + depth/stencil target the scene renders into
struct RenderTarget {
    fbo: glow::Framebuffer,
    color: glow::Renderbuffer,
    depth_stencil: glow::Renderbuffer,
    size: [u32; 2],
}

/// Scene resolution for a destination rect: the requested size, or the
/// rect itself before the first resize has been seen
pub fn target_size(requested: [u32; 2], viewport: [f32; 4]) -> [u32; 2] {
    if requested[0] > 0 && requested[1] > 0 {
        requested
    } else {
        [viewport[2].max(0.0) as u32, viewport[3].max(0.0) as u32]
    }
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    grid: Option<GpuLines>,
    /// Cached grid settings to detect changes
    cached_grid_settings: Option<(i32, f32, f32)>,
    /// Node meshes keyed by node id. Node geometry never changes in place,
    /// so an id uploaded once stays valid until the node goes away.
    meshes: HashMap<NodeId, GpuMesh>,
    /// Gizmo handles and the pending wall marker
    overlay: Option<GpuLines>,
    target: Option<RenderTarget>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;

        Ok(Self {
            mesh_program,
            line_program,
            grid: None,
            cached_grid_settings: None,
            meshes: HashMap::new(),
            overlay: None,
            target: None,
        })
    }

    /// Rebuild the grid when its settings change
    pub fn update_grid(&mut self, gl: &glow::Context, settings: &GridSettings) {
        let new_settings = (settings.range, settings.size, settings.opacity);
        if self.cached_grid_settings == Some(new_settings) {
            return;
        }

        if let Some(old) = self.grid.take() {
            delete_lines(gl, &old);
        }

        let grid_data = mesh::grid(settings.range, settings.size, settings.opacity);
        self.grid = upload_lines(gl, &grid_data)
            .map_err(|e| tracing::error!("Grid upload failed: {e}"))
            .ok();
        self.cached_grid_settings = Some(new_settings);
    }

    /// Whether the GPU already holds geometry for `id`
    pub fn has_mesh(&self, id: NodeId) -> bool {
        self.meshes.contains_key(&id)
    }

    /// Upload `fresh` meshes and free every GPU mesh whose node is not in `live`
    pub fn sync_meshes(
        &mut self,
        gl: &glow::Context,
        fresh: &[(NodeId, MeshData)],
        live: &HashSet<NodeId>,
    ) {
        self.meshes.retain(|id, mesh| {
            let keep = live.contains(id);
            if !keep {
                delete_mesh(gl, mesh);
            }
            keep
        });

        for (id, data) in fresh {
            if self.meshes.contains_key(id) {
                continue;
            }
            match upload_mesh(gl, data) {
                Ok(gpu) => {
                    self.meshes.insert(*id, gpu);
                }
                Err(e) => tracing::error!("Mesh upload for {} failed: {e}", id.short()),
            }
        }
    }

    /// Replace the overlay lines
    pub fn sync_overlay(&mut self, gl: &glow::Context, data: Option<&LineMeshData>) {
        if let Some(old) = self.overlay.take() {
            delete_lines(gl, &old);
        }
        if let Some(line_data) = data.filter(|d| d.vertex_count() > 0) {
            self.overlay = upload_lines(gl, line_data)
                .map_err(|e| tracing::error!("Overlay upload failed: {e}"))
                .ok();
        }
    }

    /// Render the scene at `params.target_size` and scale it into
    /// `params.viewport` of the `dest` framebuffer. Without an offscreen
    /// target the scene is drawn straight into the destination rect.
    pub fn paint(
        &mut self,
        gl: &glow::Context,
        dest: Option<glow::Framebuffer>,
        items: &[DrawItem],
        params: &RenderParams,
    ) {
        let [w, h] = target_size(params.target_size, params.viewport);
        if w == 0 || h == 0 {
            return;
        }
        let fbo = match self.ensure_target(gl, [w, h]) {
            Ok(fbo) => fbo,
            Err(e) => {
                tracing::error!("Offscreen target unavailable: {e}");
                unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, dest) };
                self.draw_scene(gl, items, params, params.viewport.map(|v| v as i32));
                return;
            }
        };

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            self.draw_scene(gl, items, params, [0, 0, w as i32, h as i32]);

            let [x, y, dw, dh] = params.viewport.map(|v| v as i32);
            gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(fbo));
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, dest);
            gl.blit_framebuffer(
                0,
                0,
                w as i32,
                h as i32,
                x,
                y,
                x + dw,
                y + dh,
                glow::COLOR_BUFFER_BIT,
                glow::LINEAR,
            );
            gl.bind_framebuffer(glow::FRAMEBUFFER, dest);
        }
    }

    /// Offscreen framebuffer of `size`, recreated when the size changes
    fn ensure_target(&mut self, gl: &glow::Context, size: [u32; 2]) -> Result<glow::Framebuffer, String> {
        if let Some(target) = self.target.as_ref().filter(|t| t.size == size) {
            return Ok(target.fbo);
        }
        if let Some(old) = self.target.take() {
            delete_target(gl, &old);
        }
        let target = create_target(gl, size)?;
        let fbo = target.fbo;
        self.target = Some(target);
        tracing::debug!("Offscreen target resized to {}x{}", size[0], size[1]);
        Ok(fbo)
    }

    fn draw_scene(&self, gl: &glow::Context, items: &[DrawItem], params: &RenderParams, rect: [i32; 4]) {
        let [x, y, w, h] = rect;

        unsafe {
            gl.viewport(x, y, w, h);
            gl.scissor(x, y, w, h);
            gl.enable(glow::SCISSOR_TEST);

            let bg = params.background.to_f32();
            gl.clear_color(bg[0], bg[1], bg[2], 1.0);
            gl.clear_stencil(0);
            gl.stencil_mask(0xff);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            // Lit pass. Shadow receivers tag the stencil buffer.
            let p = self.mesh_program;
            gl.use_program(Some(p));
            set_uniform_mat4(gl, p, "u_view_proj", &params.view_proj);
            set_uniform_vec3(gl, p, "u_ambient", params.ambient);
            set_uniform_vec3(gl, p, "u_light_color", params.light_color);
            set_uniform_vec3(gl, p, "u_light_dir", params.light_dir.to_array());
            set_uniform_f32(gl, p, "u_shadow", 0.0);

            gl.enable(glow::STENCIL_TEST);
            gl.stencil_op(glow::KEEP, glow::KEEP, glow::REPLACE);
            for item in items {
                let Some(mesh) = self.meshes.get(&item.node) else {
                    continue;
                };
                if item.receive_shadow {
                    gl.stencil_func(glow::ALWAYS, 1, 0xff);
                    gl.stencil_mask(0xff);
                } else {
                    gl.stencil_func(glow::ALWAYS, 0, 0xff);
                    gl.stencil_mask(0x00);
                }
                set_uniform_mat4(gl, p, "u_model", &item.model);
                set_uniform_vec3(gl, p, "u_color", item.color.to_f32());
                draw_mesh(gl, mesh);
            }

            // Shadow pass: casters flattened onto the floor plane, blended
            // once per receiver pixel
            if let Some(shadow) = params.shadow {
                gl.enable(glow::BLEND);
                gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
                gl.depth_func(glow::LEQUAL);
                gl.depth_mask(false);
                gl.enable(glow::POLYGON_OFFSET_FILL);
                gl.polygon_offset(-1.0, -1.0);
                gl.stencil_func(glow::EQUAL, 1, 0xff);
                gl.stencil_mask(0xff);
                gl.stencil_op(glow::KEEP, glow::KEEP, glow::INCR);

                set_uniform_f32(gl, p, "u_shadow", SHADOW_ALPHA);
                for item in items.iter().filter(|i| i.cast_shadow) {
                    let Some(mesh) = self.meshes.get(&item.node) else {
                        continue;
                    };
                    set_uniform_mat4(gl, p, "u_model", &(shadow * item.model));
                    draw_mesh(gl, mesh);
                }

                gl.disable(glow::POLYGON_OFFSET_FILL);
                gl.depth_mask(true);
                gl.depth_func(glow::LESS);
                gl.disable(glow::BLEND);
            }
            gl.stencil_mask(0xff);
            gl.disable(glow::STENCIL_TEST);

            // Grid and overlays (lines)
            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &params.view_proj);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            if params.grid_visible {
                if let Some(ref grid) = self.grid {
                    draw_lines(gl, grid);
                }
            }

            // Gizmo on top (no depth test so it's always visible)
            if let Some(ref overlay) = self.overlay {
                gl.disable(glow::DEPTH_TEST);
                gl.line_width(params.overlay_width);
                draw_lines(gl, overlay);
                gl.line_width(1.0);
            }

            gl.disable(glow::BLEND);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
        }
        if let Some(grid) = self.grid.take() {
            delete_lines(gl, &grid);
        }
        if let Some(overlay) = self.overlay.take() {
            delete_lines(gl, &overlay);
        }
        for (_, mesh) in self.meshes.drain() {
            delete_mesh(gl, &mesh);
        }
        if let Some(target) = self.target.take() {
            delete_target(gl, &target);
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (MESH_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (LINE_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn create_target(gl: &glow::Context, size: [u32; 2]) -> Result<RenderTarget, String> {
    let [w, h] = size.map(|v| v as i32);
    unsafe {
        let color = gl.create_renderbuffer()?;
        gl.bind_renderbuffer(glow::RENDERBUFFER, Some(color));
        gl.renderbuffer_storage(glow::RENDERBUFFER, glow::RGBA8, w, h);

        // Planar shadows need the stencil as much as the main framebuffer does
        let depth_stencil = gl.create_renderbuffer()?;
        gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth_stencil));
        gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, w, h);
        gl.bind_renderbuffer(glow::RENDERBUFFER, None);

        let fbo = gl.create_framebuffer()?;
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
        gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, glow::COLOR_ATTACHMENT0, glow::RENDERBUFFER, Some(color));
        gl.framebuffer_renderbuffer(
            glow::FRAMEBUFFER,
            glow::DEPTH_STENCIL_ATTACHMENT,
            glow::RENDERBUFFER,
            Some(depth_stencil),
        );
        let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);

        let target = RenderTarget {
            fbo,
            color,
            depth_stencil,
            size,
        };
        if status != glow::FRAMEBUFFER_COMPLETE {
            delete_target(gl, &target);
            return Err(format!("framebuffer incomplete (0x{status:x})"));
        }
        Ok(target)
    }
}

fn delete_target(gl: &glow::Context, target: &RenderTarget) {
    unsafe {
        gl.delete_framebuffer(target.fbo);
        gl.delete_renderbuffer(target.color);
        gl.delete_renderbuffer(target.depth_stencil);
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let mut shaders = Vec::with_capacity(2);
        for (kind, src) in [(glow::VERTEX_SHADER, vert_src), (glow::FRAGMENT_SHADER, frag_src)] {
            let shader = gl.create_shader(kind)?;
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                tracing::error!("Shader compile error: {log}");
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("Program link error: {log}"));
        }

        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: [f32; 3]) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v[0], v[1], v[2]);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_view_proj;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

out vec3 v_normal;

void main() {
    gl_Position = u_view_proj * u_model * vec4(a_position, 1.0);
    v_normal = transpose(inverse(mat3(u_model))) * a_normal;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_color;
uniform vec3 u_ambient;
uniform vec3 u_light_color;
uniform vec3 u_light_dir;
uniform float u_shadow;

in vec3 v_normal;

out vec4 frag_color;

void main() {
    if (u_shadow > 0.0) {
        frag_color = vec4(0.0, 0.0, 0.0, u_shadow);
        return;
    }
    vec3 n = normalize(v_normal);
    if (!gl_FrontFacing) {
        n = -n;
    }
    float diffuse = max(dot(n, u_light_dir), 0.0);
    vec3 light = min(u_ambient + u_light_color * diffuse, vec3(1.0));
    frag_color = vec4(u_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_size_uses_capped_resolution() {
        // 1000x500 points on a 3x display, capped at 1.5
        let viewport = [0.0, 0.0, 3000.0, 1500.0];
        assert_eq!(target_size([1500, 750], viewport), [1500, 750]);
    }

    #[test]
    fn test_target_size_falls_back_to_viewport() {
        assert_eq!(target_size([0, 0], [10.0, 20.0, 640.0, 480.0]), [640, 480]);
        assert_eq!(target_size([0, 0], [0.0, 0.0, -4.0, 0.0]), [0, 0]);
    }
}
