use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{error, info};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, Performance,
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use super::dom::{self, Overlay, RootStyle};
use crate::loader::AssetOutcome;
use crate::motion::PointerWriter;
use crate::scene::{self, background_assets, Frame};
use crate::{KeyInput, Scene, ThemeId};

const BG_COLOR: [f32; 3] = [0x04 as f32 / 255.0, 0x0b as f32 / 255.0, 0x12 as f32 / 255.0];
const MAX_DPR: f64 = 2.0;

const LAYER_VS: &str = r#"#version 300 es
in vec2 a_pos;
uniform vec2 u_scale;
uniform vec3 u_position;
uniform vec2 u_half_view;
uniform float u_camera;
out vec2 v_uv;
void main() {
    float persp = u_camera / max(u_camera - u_position.z, 0.001);
    vec2 world = a_pos * u_scale + u_position.xy;
    gl_Position = vec4(world * persp / u_half_view, 0.0, 1.0);
    v_uv = vec2(a_pos.x + 0.5, 0.5 - a_pos.y);
}
"#;

const LAYER_FS: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
uniform sampler2D u_tex;
uniform float u_opacity;
uniform vec2 u_chroma;
uniform vec3 u_bloom;
out vec4 out_color;
void main() {
    vec4 base = texture(u_tex, v_uv);
    float r = texture(u_tex, v_uv + u_chroma).r;
    float b = texture(u_tex, v_uv - u_chroma).b;
    vec3 color = vec3(r, base.g, b);
    float luma = dot(color, vec3(0.2126, 0.7152, 0.0722));
    float glow = smoothstep(u_bloom.y, u_bloom.y + u_bloom.z, luma);
    color += color * glow * u_bloom.x;
    out_color = vec4(color, base.a * u_opacity);
}
"#;

const POINTS_VS: &str = r#"#version 300 es
in vec3 a_pos;
uniform vec2 u_half_view;
uniform float u_camera;
uniform float u_size_px;
void main() {
    float persp = u_camera / max(u_camera - a_pos.z, 0.001);
    gl_Position = vec4(a_pos.xy * persp / u_half_view, 0.0, 1.0);
    gl_PointSize = max(u_size_px * persp, 1.0);
}
"#;

const POINTS_FS: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
uniform float u_opacity;
out vec4 out_color;
void main() {
    if (length(gl_PointCoord - vec2(0.5)) > 0.5) discard;
    out_color = vec4(u_color, u_opacity);
}
"#;

const VIGNETTE_VS: &str = r#"#version 300 es
in vec2 a_pos;
out vec2 v_uv;
void main() {
    gl_Position = vec4(a_pos * 2.0, 0.0, 1.0);
    v_uv = a_pos + 0.5;
}
"#;

const VIGNETTE_FS: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
uniform vec2 u_vignette;
out vec4 out_color;
void main() {
    float d = distance(v_uv, vec2(0.5));
    float keep = smoothstep(0.8, u_vignette.x * 0.799, d * (u_vignette.y + u_vignette.x));
    out_color = vec4(0.0, 0.0, 0.0, 1.0 - keep);
}
"#;

/// Time since mount, read from `performance.now()`.
#[derive(Clone)]
struct Clock {
    performance: Performance,
    origin: f64,
}

impl Clock {
    fn new(window: &Window) -> Result<Self, JsValue> {
        let performance = window.performance().ok_or("performance not available")?;
        let origin = performance.now();
        Ok(Self {
            performance,
            origin,
        })
    }

    fn now(&self) -> Duration {
        Duration::from_secs_f64(((self.performance.now() - self.origin) / 1000.0).max(0.0))
    }
}

struct Program {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
}

impl Program {
    fn uniform(&self, gl: &GL, name: &str) -> Option<WebGlUniformLocation> {
        gl.get_uniform_location(&self.program, name)
    }
}

struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    layer: Program,
    points: Program,
    points_buffer: WebGlBuffer,
    vignette: Program,
    textures: Vec<WebGlTexture>,
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        Err(JsValue::from_str(&format!("shader compile failed: {log}")))
    }
}

fn link(gl: &GL, vs: &str, fs: &str) -> Result<WebGlProgram, JsValue> {
    let vs = compile(gl, GL::VERTEX_SHADER, vs)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, fs)?;
    let program = gl.create_program().ok_or("unable to create program")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(JsValue::from_str(&format!("program link failed: {log}")))
    }
}

/// Links a program and binds `buffer` to its `a_pos` attribute in a new VAO.
fn program_with_buffer(
    gl: &GL,
    vs: &str,
    fs: &str,
    buffer: &WebGlBuffer,
    components: i32,
) -> Result<Program, JsValue> {
    let program = link(gl, vs, fs)?;
    let vao = gl.create_vertex_array().ok_or("unable to create vertex array")?;
    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    let loc = gl.get_attrib_location(&program, "a_pos");
    if loc >= 0 {
        gl.enable_vertex_attrib_array(loc as u32);
        gl.vertex_attrib_pointer_with_i32(loc as u32, components, GL::FLOAT, false, 0, 0);
    }
    gl.bind_vertex_array(None);
    Ok(Program { program, vao })
}

/// 1x1 placeholder so missing or failed images draw as the background tint.
fn placeholder_texture(gl: &GL) -> Result<WebGlTexture, JsValue> {
    let texture = gl.create_texture().ok_or("unable to create texture")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        1,
        1,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&[0x04u8, 0x0b, 0x12, 0xff][..]),
    )?;
    for (param, value) in [
        (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
        (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
        (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
        (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
    ] {
        gl.tex_parameteri(GL::TEXTURE_2D, param, value as i32);
    }
    Ok(texture)
}

impl Renderer {
    fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;

        let quad: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, -0.5, 0.5, 0.5, 0.5];
        let quad_buffer = gl.create_buffer().ok_or("unable to create buffer")?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad_buffer));
        gl.buffer_data_with_array_buffer_view(
            GL::ARRAY_BUFFER,
            &js_sys::Float32Array::from(&quad[..]),
            GL::STATIC_DRAW,
        );
        let points_buffer = gl.create_buffer().ok_or("unable to create buffer")?;

        let layer = program_with_buffer(&gl, LAYER_VS, LAYER_FS, &quad_buffer, 2)?;
        let vignette = program_with_buffer(&gl, VIGNETTE_VS, VIGNETTE_FS, &quad_buffer, 2)?;
        let points = program_with_buffer(&gl, POINTS_VS, POINTS_FS, &points_buffer, 3)?;

        let textures = ThemeId::ALL
            .iter()
            .map(|_| placeholder_texture(&gl))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            gl,
            canvas,
            layer,
            points,
            points_buffer,
            vignette,
            textures,
        })
    }

    fn resize(&self, window: &Window) -> Result<f32, JsValue> {
        let w = window.inner_width()?.as_f64().unwrap_or(1.0);
        let h = window.inner_height()?.as_f64().unwrap_or(1.0);
        let dpr = window.device_pixel_ratio().clamp(1.0, MAX_DPR);
        self.canvas.set_width((w * dpr) as u32);
        self.canvas.set_height((h * dpr) as u32);
        Ok((w / h.max(1.0)) as f32)
    }

    fn draw(&self, frame: &Frame) {
        let gl = &self.gl;
        let width = self.canvas.width() as i32;
        let height = self.canvas.height() as i32;
        gl.viewport(0, 0, width, height);
        gl.clear_color(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2], 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.enable(GL::BLEND);

        let aspect = width as f32 / height.max(1) as f32;
        let [view_w, view_h] = scene::world_viewport(aspect);
        let half_view = [view_w / 2.0, view_h / 2.0];
        let filter = &frame.filter;

        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.use_program(Some(&self.layer.program));
        gl.bind_vertex_array(Some(&self.layer.vao));
        gl.active_texture(GL::TEXTURE0);
        gl.uniform1i(self.layer.uniform(gl, "u_tex").as_ref(), 0);
        gl.uniform2f(self.layer.uniform(gl, "u_half_view").as_ref(), half_view[0], half_view[1]);
        gl.uniform1f(self.layer.uniform(gl, "u_camera").as_ref(), scene::CAMERA_DISTANCE);
        gl.uniform2f(
            self.layer.uniform(gl, "u_chroma").as_ref(),
            filter.chromatic_offset[0],
            filter.chromatic_offset[1],
        );
        gl.uniform3f(
            self.layer.uniform(gl, "u_bloom").as_ref(),
            filter.bloom_intensity,
            filter.bloom_threshold,
            filter.bloom_smoothing,
        );
        for layer in &frame.layers {
            let t = &layer.transform;
            gl.bind_texture(GL::TEXTURE_2D, self.textures.get(layer.theme.index()));
            gl.uniform2f(self.layer.uniform(gl, "u_scale").as_ref(), t.scale[0], t.scale[1]);
            gl.uniform3f(
                self.layer.uniform(gl, "u_position").as_ref(),
                t.position[0],
                t.position[1],
                t.position[2],
            );
            gl.uniform1f(self.layer.uniform(gl, "u_opacity").as_ref(), t.opacity);
            gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        }

        let particles = &frame.particles;
        if particles.opacity > 0.0 && !particles.positions.is_empty() {
            let flat: Vec<f32> = particles.positions.iter().flatten().copied().collect();
            gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.points_buffer));
            gl.buffer_data_with_array_buffer_view(
                GL::ARRAY_BUFFER,
                &js_sys::Float32Array::from(&flat[..]),
                GL::DYNAMIC_DRAW,
            );
            gl.blend_func(GL::SRC_ALPHA, GL::ONE);
            gl.use_program(Some(&self.points.program));
            gl.bind_vertex_array(Some(&self.points.vao));
            gl.uniform2f(self.points.uniform(gl, "u_half_view").as_ref(), half_view[0], half_view[1]);
            gl.uniform1f(self.points.uniform(gl, "u_camera").as_ref(), scene::CAMERA_DISTANCE);
            let px_per_unit = height as f32 / view_h;
            gl.uniform1f(
                self.points.uniform(gl, "u_size_px").as_ref(),
                particles.size * px_per_unit,
            );
            let [r, g, b] = particles.color;
            gl.uniform3f(self.points.uniform(gl, "u_color").as_ref(), r, g, b);
            gl.uniform1f(self.points.uniform(gl, "u_opacity").as_ref(), particles.opacity);
            gl.draw_arrays(GL::POINTS, 0, particles.positions.len() as i32);
        }

        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.use_program(Some(&self.vignette.program));
        gl.bind_vertex_array(Some(&self.vignette.vao));
        gl.uniform2f(
            self.vignette.uniform(gl, "u_vignette").as_ref(),
            filter.vignette_offset,
            filter.vignette_darkness,
        );
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
    }
}

/// Starts loading every background image. `load` and `error` both count
/// toward the loading screen.
fn load_backgrounds(
    renderer: &Rc<Renderer>,
    scene: &Rc<RefCell<Scene>>,
    clock: &Clock,
) -> Result<(), JsValue> {
    for (theme, src) in background_assets() {
        let img = HtmlImageElement::new()?;

        let onload = {
            let renderer = Rc::clone(renderer);
            let scene = Rc::clone(scene);
            let clock = clock.clone();
            let img = img.clone();
            Closure::wrap(Box::new(move || {
                let gl = &renderer.gl;
                gl.bind_texture(GL::TEXTURE_2D, renderer.textures.get(theme.index()));
                let uploaded = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                    GL::TEXTURE_2D,
                    0,
                    GL::RGBA as i32,
                    GL::RGBA,
                    GL::UNSIGNED_BYTE,
                    &img,
                );
                let mut scene = scene.borrow_mut();
                match uploaded {
                    Ok(()) => {
                        let (w, h) = (img.natural_width(), img.natural_height());
                        if h > 0 {
                            scene.set_image_aspect(theme, w as f32 / h as f32);
                        }
                        scene.record_asset(AssetOutcome::Loaded, clock.now());
                    }
                    Err(err) => {
                        error!(%theme, ?err, "texture upload failed");
                        scene.record_asset(AssetOutcome::Failed, clock.now());
                    }
                }
            }) as Box<dyn FnMut()>)
        };

        let onerror = {
            let scene = Rc::clone(scene);
            let clock = clock.clone();
            Closure::wrap(Box::new(move || {
                error!(%theme, src, "background failed to load");
                scene
                    .borrow_mut()
                    .record_asset(AssetOutcome::Failed, clock.now());
            }) as Box<dyn FnMut()>)
        };

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        img.set_src(src);
    }
    Ok(())
}

fn tick(
    scene: &RefCell<Scene>,
    renderer: &Renderer,
    overlay: &mut Overlay,
    clock: &Clock,
) -> Result<(), JsValue> {
    let frame = scene.borrow_mut().frame(clock.now());
    overlay.apply(&frame)?;
    renderer.draw(&frame);
    Ok(())
}

/// Builds the scene, wires input, and starts the render loop.
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = dom::read_config(&canvas);
    let clock = Clock::new(&window)?;
    let renderer = Rc::new(Renderer::new(canvas)?);

    let pointer = PointerWriter::new();
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let scene = Rc::new(RefCell::new(Scene::new(
        config,
        pointer.reader(),
        seed,
        clock.now(),
    )));

    scene
        .borrow_mut()
        .set_display_vars(Box::new(RootStyle::new(&document)?));

    let aspect = renderer.resize(&window)?;
    scene.borrow_mut().set_viewport_aspect(aspect);

    // Resize canvas to fit window
    let resize_closure = {
        let renderer = Rc::clone(&renderer);
        let scene = Rc::clone(&scene);
        let window = window.clone();
        Closure::wrap(Box::new(move || match renderer.resize(&window) {
            Ok(aspect) => scene.borrow_mut().set_viewport_aspect(aspect),
            Err(err) => error!(?err, "resize failed"),
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // The pointer writer lives in this closure; the scene only holds a reader.
    let mouse_closure = {
        let window = window.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            pointer.move_to(
                event.client_x() as f32,
                event.client_y() as f32,
                w as f32,
                h as f32,
            );
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    window.add_event_listener_with_callback("mousemove", mouse_closure.as_ref().unchecked_ref())?;
    mouse_closure.forget();

    let key_closure = {
        let scene = Rc::clone(&scene);
        let clock = clock.clone();
        Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if let Some(key) = KeyInput::from_key(&event.key()) {
                event.prevent_default();
                scene.borrow_mut().key(key, clock.now());
            }
        }) as Box<dyn FnMut(KeyboardEvent)>)
    };
    window.add_event_listener_with_callback("keydown", key_closure.as_ref().unchecked_ref())?;
    key_closure.forget();

    // One listener for every switcher button; the theme key sits in `data-theme`.
    let click_closure = {
        let scene = Rc::clone(&scene);
        let clock = clock.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let button = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-theme]").ok().flatten());
            if let Some(name) = button.and_then(|b| b.get_attribute("data-theme")) {
                scene.borrow_mut().change_theme_named(&name, clock.now());
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    document.add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())?;
    click_closure.forget();

    load_backgrounds(&renderer, &scene, &clock)?;
    info!(themes = ThemeId::ALL.len(), "scene mounted");

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let mut overlay = Overlay::new(&document);
    let loop_window = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(err) = tick(&scene, &renderer, &mut overlay, &clock) {
            error!(?err, "frame failed; stopping render loop");
            return;
        }

        // schedule next
        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = loop_window.request_animation_frame(next.as_ref().unchecked_ref()) {
                error!(?err, "request_animation_frame failed");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(first) = g.borrow().as_ref() {
        window.request_animation_frame(first.as_ref().unchecked_ref())?;
    }

    Ok(())
}
