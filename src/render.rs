//! WebGL2 proxy renderer.
//!
//! Every visible mesh is drawn as its bounding box in the material's base
//! color, lit by the scene's ambient + hemisphere lights. The same context
//! backs the emulated canvas and the XR base layer.

use ar_core::{ArScene, Aabb, RETICLE_COLOR, RETICLE_HALF_EXTENT};
use glam::{Mat4, Vec3};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;
use web_sys::WebGl2RenderingContext as Gl;

use crate::constants::{CONTROLLER_PROXY_COLOR, CONTROLLER_PROXY_SIZE, RETICLE_THICKNESS};
use crate::shading::{proxy_matrix, unit_cube, LightTerms};

const VERTEX_SHADER: &str = include_str!("../shaders/scene.vert");
const FRAGMENT_SHADER: &str = include_str!("../shaders/scene.frag");

struct Uniforms {
    view_proj: web::WebGlUniformLocation,
    model: web::WebGlUniformLocation,
    color: web::WebGlUniformLocation,
    ambient: web::WebGlUniformLocation,
    sky: web::WebGlUniformLocation,
    ground: web::WebGlUniformLocation,
}

pub struct Renderer {
    gl: Gl,
    program: web::WebGlProgram,
    vao: web::WebGlVertexArrayObject,
    _vertices: web::WebGlBuffer,
    vertex_count: i32,
    uniforms: Uniforms,
}

/// Pixel rectangle `[x, y, width, height]` inside the bound framebuffer.
pub type Viewport = [i32; 4];

/// WebGL2 context on `canvas`, flagged XR-compatible so a session can adopt it.
pub fn create_context(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Gl> {
    let attrs = crate::xr::js_object(&[
        ("xrCompatible", JsValue::TRUE),
        ("alpha", JsValue::TRUE),
        ("antialias", JsValue::TRUE),
    ])
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let ctx = canvas
        .get_context_with_context_options("webgl2", &attrs)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("WebGL2 unavailable"))?;
    ctx.dyn_into::<Gl>().map_err(|e| anyhow::anyhow!("{:?}", e))
}

impl Renderer {
    pub fn new(gl: Gl) -> anyhow::Result<Self> {
        let vs = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fs = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vs, &fs)?;

        let uniform = |name: &str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| anyhow::anyhow!("missing uniform {name}"))
        };
        let uniforms = Uniforms {
            view_proj: uniform("u_view_proj")?,
            model: uniform("u_model")?,
            color: uniform("u_color")?,
            ambient: uniform("u_ambient")?,
            sky: uniform("u_sky")?,
            ground: uniform("u_ground")?,
        };

        let cube = unit_cube();
        let floats: &[f32] = bytemuck::cast_slice(&cube);
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| anyhow::anyhow!("create_vertex_array failed"))?;
        gl.bind_vertex_array(Some(&vao));
        let vertices = gl
            .create_buffer()
            .ok_or_else(|| anyhow::anyhow!("create_buffer failed"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertices));
        let view = js_sys::Float32Array::from(floats);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
        let stride = std::mem::size_of::<crate::shading::Vertex>() as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, stride, 12);
        gl.bind_vertex_array(None);

        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);

        log::info!("[render] webgl2 ready ({} vertices)", cube.len());
        Ok(Self {
            gl,
            program,
            vao,
            _vertices: vertices,
            vertex_count: cube.len() as i32,
            uniforms,
        })
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    /// Bind `framebuffer` (the canvas when `None`) and clear it.
    pub fn begin(&self, framebuffer: Option<&web::WebGlFramebuffer>, clear: [f32; 4]) {
        let gl = &self.gl;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, framebuffer);
        gl.clear_color(clear[0], clear[1], clear[2], clear[3]);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    /// Draw one view of the scene. Controllers are only drawn without a
    /// physical device in hand.
    pub fn draw_view(
        &self,
        scene: &ArScene,
        view_proj: Mat4,
        viewport: Viewport,
        controllers: bool,
    ) {
        let gl = &self.gl;
        let u = &self.uniforms;
        gl.viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));

        let terms = LightTerms::from_lights(&scene.graph.lights());
        gl.uniform_matrix4fv_with_f32_array(Some(&u.view_proj), false, &view_proj.to_cols_array());
        gl.uniform3fv_with_f32_array(Some(&u.ambient), &terms.ambient.to_array());
        gl.uniform3fv_with_f32_array(Some(&u.sky), &terms.sky.to_array());
        gl.uniform3fv_with_f32_array(Some(&u.ground), &terms.ground.to_array());

        for (_, world, proxy) in scene.graph.visible_meshes() {
            self.draw_box(proxy_matrix(world, &proxy.bounds), proxy.color);
        }

        if controllers {
            let size = Vec3::from(CONTROLLER_PROXY_SIZE);
            // Box sits in front of the grip along the pointing (-Z) axis.
            let bounds = Aabb::from_half_extents(Vec3::new(0.0, 0.0, -size.z * 0.5), size * 0.5);
            for id in scene.controllers() {
                if scene.graph.is_visible_in_tree(*id) {
                    let world = scene.graph.world_matrix(*id);
                    self.draw_box(proxy_matrix(world, &bounds), CONTROLLER_PROXY_COLOR);
                }
            }
        }

        let reticle = scene.reticle();
        if reticle.is_visible(&scene.graph) {
            let half = Vec3::new(RETICLE_HALF_EXTENT, RETICLE_THICKNESS * 0.5, RETICLE_HALF_EXTENT);
            let bounds = Aabb::from_half_extents(Vec3::ZERO, half);
            gl.depth_mask(false);
            self.draw_box(proxy_matrix(reticle.pose(&scene.graph), &bounds), RETICLE_COLOR);
            gl.depth_mask(true);
        }

        gl.bind_vertex_array(None);
    }

    fn draw_box(&self, model: Mat4, color: [f32; 4]) {
        let gl = &self.gl;
        let u = &self.uniforms;
        gl.uniform_matrix4fv_with_f32_array(Some(&u.model), false, &model.to_cols_array());
        gl.uniform4fv_with_f32_array(Some(&u.color), &color);
        gl.draw_arrays(Gl::TRIANGLES, 0, self.vertex_count);
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> anyhow::Result<web::WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| anyhow::anyhow!("create_shader failed"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(anyhow::anyhow!("shader compile error: {info}"))
    }
}

fn link_program(
    gl: &Gl,
    vs: &web::WebGlShader,
    fs: &web::WebGlShader,
) -> anyhow::Result<web::WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| anyhow::anyhow!("create_program failed"))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    let ok = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        Err(anyhow::anyhow!("program link error: {info}"))
    }
}
