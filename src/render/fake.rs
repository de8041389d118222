// fake.rs - in-memory backend that records calls and mimics a GLSL driver

use crate::render::backend::{ShaderBackend, UniformValue};
use crate::render::shaders::ShaderStage;
use gl::types::{GLint, GLuint};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    Compile(ShaderStage),
    DeleteShader(GLuint),
    CreateProgram,
    Attach(GLuint, GLuint),
    Detach(GLuint, GLuint),
    Link(GLuint),
    DeleteProgram(GLuint),
    UseProgram(GLuint),
    SetUniform(GLint, UniformValue),
}

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
    delete_pending: bool,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    uniforms: HashMap<String, GLint>,
    attributes: HashMap<String, GLuint>,
}

#[derive(Debug, Default)]
struct State {
    next_id: GLuint,
    shaders: BTreeMap<GLuint, FakeShader>,
    programs: BTreeMap<GLuint, FakeProgram>,
    calls: Vec<Call>,
    refuse_programs: bool,
    refused_stage: Option<ShaderStage>,
    current_program: GLuint,
}

/// Shared, cloneable handle to one simulated context.
///
/// Compilation fails when a source has no `main` or when a statement line
/// does not end in `;`, `{` or `}`. Linking fails when a fragment `in`
/// has no vertex `out` of the same name and type. Deleting an attached
/// shader only flags it, as GL does.
#[derive(Debug, Clone, Default)]
pub struct FakeGl {
    state: Rc<RefCell<State>>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn is_program_live(&self, program: GLuint) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    pub fn is_program_linked(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    pub fn compiled_stages(&self) -> Vec<ShaderStage> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Compile(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }

    pub fn current_program(&self) -> GLuint {
        self.state.borrow().current_program
    }

    /// Makes every later `create_program` return no object.
    pub fn refuse_program_creation(&self) {
        self.state.borrow_mut().refuse_programs = true;
    }

    /// Makes every later `create_shader` for `stage` return no object.
    pub fn refuse_shader_creation(&self, stage: ShaderStage) {
        self.state.borrow_mut().refused_stage = Some(stage);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn allocate(state: &mut State) -> GLuint {
        state.next_id += 1;
        state.next_id
    }
}

impl ShaderBackend for FakeGl {
    fn create_shader(&self, stage: ShaderStage) -> Option<GLuint> {
        self.record(Call::CreateShader(stage));
        let mut state = self.state.borrow_mut();
        if state.refused_stage == Some(stage) {
            return None;
        }
        let id = Self::allocate(&mut state);
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
                delete_pending: false,
            },
        );
        Some(id)
    }

    fn compile_shader(&self, shader: GLuint, source: &str) {
        let mut state = self.state.borrow_mut();
        let Some(object) = state.shaders.get_mut(&shader) else {
            return;
        };
        object.source = source.to_owned();
        match check_syntax(source) {
            Ok(()) => {
                object.compiled = true;
                object.log.clear();
            }
            Err(log) => {
                object.compiled = false;
                object.log = log;
            }
        }
        let stage = object.stage;
        state.calls.push(Call::Compile(stage));
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
        let mut state = self.state.borrow_mut();
        let attached = state
            .programs
            .values()
            .any(|p| p.attached.contains(&shader));
        if attached {
            if let Some(object) = state.shaders.get_mut(&shader) {
                object.delete_pending = true;
            }
        } else {
            state.shaders.remove(&shader);
        }
    }

    fn create_program(&self) -> Option<GLuint> {
        self.record(Call::CreateProgram);
        let mut state = self.state.borrow_mut();
        if state.refuse_programs {
            return None;
        }
        let id = Self::allocate(&mut state);
        state.programs.insert(id, FakeProgram::default());
        Some(id)
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::Attach(program, shader));
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::Detach(program, shader));
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
        release_if_pending(&mut state, shader);
    }

    fn link_program(&self, program: GLuint) {
        self.record(Call::Link(program));
        let mut state = self.state.borrow_mut();
        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            return;
        };

        let mut vertex = None;
        let mut fragment = None;
        let mut log = String::new();
        for id in attached {
            match state.shaders.get(&id) {
                Some(s) if !s.compiled => {
                    log.push_str("error: linking with uncompiled shader\n");
                }
                Some(s) if s.stage == ShaderStage::Vertex => vertex = Some(s.source.clone()),
                Some(s) => fragment = Some(s.source.clone()),
                None => log.push_str("error: attached shader does not exist\n"),
            }
        }

        let (uniforms, attributes) = match (&vertex, &fragment) {
            (Some(vs), Some(fs)) if log.is_empty() => {
                log.push_str(&check_interface(vs, fs));
                let mut uniforms = HashMap::new();
                for name in declarations("uniform", vs)
                    .into_iter()
                    .chain(declarations("uniform", fs))
                    .map(|(_, name)| name)
                {
                    let next = uniforms.len() as GLint;
                    uniforms.entry(name).or_insert(next);
                }
                let attributes = declarations("in", vs)
                    .into_iter()
                    .enumerate()
                    .map(|(i, (_, name))| (name, i as GLuint))
                    .collect();
                (uniforms, attributes)
            }
            (None, _) if log.is_empty() => {
                log.push_str("error: program lacks a vertex shader\n");
                Default::default()
            }
            (_, None) if log.is_empty() => {
                log.push_str("error: program lacks a fragment shader\n");
                Default::default()
            }
            _ => Default::default(),
        };

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = log.is_empty();
            p.log = log.trim_end().to_owned();
            p.uniforms = uniforms;
            p.attributes = attributes;
        }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.is_program_linked(program)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.remove(&program) {
            for shader in p.attached {
                release_if_pending(&mut state, shader);
            }
        }
        if state.current_program == program {
            state.current_program = 0;
        }
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
        self.state.borrow_mut().current_program = program;
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.get(name).copied())
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> Option<GLuint> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.attributes.get(name).copied())
    }

    fn set_uniform(&self, location: GLint, value: UniformValue) {
        self.record(Call::SetUniform(location, value));
    }
}

fn release_if_pending(state: &mut State, shader: GLuint) {
    let still_attached = state
        .programs
        .values()
        .any(|p| p.attached.contains(&shader));
    let pending = state
        .shaders
        .get(&shader)
        .map_or(false, |s| s.delete_pending);
    if pending && !still_attached {
        state.shaders.remove(&shader);
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    for (index, line) in source.lines().enumerate() {
        let code = line.split("//").next().unwrap_or("").trim();
        if code.is_empty() || code.starts_with('#') {
            continue;
        }
        if !(code.ends_with(';') || code.ends_with('{') || code.ends_with('}')) {
            return Err(format!(
                "0:{}(1): error: syntax error, unexpected end of line, expecting ';'",
                index + 1
            ));
        }
    }
    if !source.contains("void main") {
        return Err("0:1(1): error: no function with name 'main'".to_owned());
    }
    Ok(())
}

/// Global `<qualifier> <type> <name>;` declarations, layout prefixes skipped.
fn declarations(qualifier: &str, source: &str) -> Vec<(String, String)> {
    source
        .lines()
        .filter_map(|line| {
            let mut code = line.split("//").next()?.trim();
            if code.starts_with("layout") {
                code = code.split_once(')')?.1.trim();
            }
            let code = code.strip_prefix("flat ").unwrap_or(code);
            let rest = code.strip_prefix(qualifier)?.strip_prefix(' ')?;
            let mut words = rest.trim_end_matches(';').split_whitespace();
            let ty = words.next()?.to_owned();
            let name = words.next()?.to_owned();
            Some((ty, name))
        })
        .collect()
}

fn check_interface(vertex: &str, fragment: &str) -> String {
    let outputs: HashMap<String, String> = declarations("out", vertex)
        .into_iter()
        .map(|(ty, name)| (name, ty))
        .collect();

    let mut log = String::new();
    for (ty, name) in declarations("in", fragment) {
        match outputs.get(&name) {
            None => log.push_str(&format!(
                "error: fragment shader input `{name}' has no matching output in the previous stage\n"
            )),
            Some(out_ty) if *out_ty != ty => log.push_str(&format!(
                "error: `{name}' declared as type `{out_ty}' in vertex and `{ty}' in fragment\n"
            )),
            Some(_) => {}
        }
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_check_reports_line() {
        let err = check_syntax("void main() {\n    gl_Position = vec4(0.0)\n}\n").unwrap_err();
        assert!(err.starts_with("0:2(1)"), "{err}");
    }

    #[test]
    fn test_declarations_skip_layout() {
        let decls = declarations("in", "layout (location = 0) in vec3 aPos;\nin vec3 aColor;\n");
        assert_eq!(
            decls,
            vec![
                ("vec3".to_owned(), "aPos".to_owned()),
                ("vec3".to_owned(), "aColor".to_owned()),
            ]
        );
    }

    #[test]
    fn test_delete_attached_shader_is_deferred() {
        let gl = FakeGl::new();
        let shader = gl.create_shader(ShaderStage::Vertex).unwrap();
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, shader);
        gl.delete_shader(shader);
        assert_eq!(gl.live_shaders(), 1);
        gl.delete_program(program);
        assert_eq!(gl.live_shaders(), 0);
    }
}
