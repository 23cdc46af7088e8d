use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use thiserror::Error;

pub struct ProgramBuilder<'a> {
    vertex_src: &'a str,
    fragment_src: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vertex_src: &'a str, fragment_src: &'a str) -> Self {
        Self {
            vertex_src,
            fragment_src,
        }
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        let vertex = compile_stage(gl::VERTEX_SHADER, self.vertex_src)
            .map_err(ProgramError::VertexCompile)?;
        let fragment = match compile_stage(gl::FRAGMENT_SHADER, self.fragment_src) {
            Ok(id) => id,
            Err(log) => {
                unsafe { gl::DeleteShader(vertex) }
                return Err(ProgramError::FragmentCompile(log));
            }
        };

        let id = unsafe {
            let id = gl::CreateProgram();
            gl::AttachShader(id, vertex);
            gl::AttachShader(id, fragment);
            gl::LinkProgram(id);
            id
        };

        let mut status = 0;
        unsafe {
            gl::GetProgramiv(id, gl::LINK_STATUS, (&mut status) as *mut i32);
        }

        if status == 0 {
            let log = program_log(id);
            unsafe {
                gl::DeleteProgram(id);
                gl::DeleteShader(vertex);
                gl::DeleteShader(fragment);
            }
            return Err(ProgramError::Link(log));
        }

        Ok(Program {
            id,
            vertex,
            fragment,
        })
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("Vertex shader failed to compile: {0}")]
    VertexCompile(String),
    #[error("Fragment shader failed to compile: {0}")]
    FragmentCompile(String),
    #[error("Program failed to link: {0}")]
    Link(String),
}

/// Linked vertex + fragment pair. Owns both stages and deletes them
/// together with the program.
pub struct Program {
    id: u32,
    vertex: u32,
    fragment: u32,
}

impl Program {
    pub fn get_id(&self) -> u32 {
        self.id
    }

    pub fn bind(&self) {
        unsafe { gl::UseProgram(self.id) }
    }

    /// Looks up an active uniform, `None` if the linker optimized it out.
    pub fn uniform_location(&self, name: &str) -> Option<i32> {
        let name = CString::new(name).ok()?;

        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };

        (location != -1).then_some(location)
    }

    pub fn set_i32(&self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    pub fn set_mat4(&self, location: i32, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
            gl::DeleteShader(self.vertex);
            gl::DeleteShader(self.fragment);
        }
    }
}

fn compile_stage(kind: u32, src: &str) -> Result<u32, String> {
    let id = unsafe { gl::CreateShader(kind) };

    unsafe {
        let src_ptr = src.as_ptr() as *const c_char;
        let src_len = src.len() as i32;
        gl::ShaderSource(id, 1, (&src_ptr) as *const *const c_char, (&src_len) as *const i32);
        gl::CompileShader(id);
    }

    let mut status = 0;
    unsafe {
        gl::GetShaderiv(id, gl::COMPILE_STATUS, (&mut status) as *mut i32);
    }

    if status == 0 {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut i32);
        }

        let mut log = vec![0_u8; len as usize];
        unsafe {
            gl::GetShaderInfoLog(id, len, ptr::null_mut(), log.as_mut_ptr() as *mut c_char);
            gl::DeleteShader(id);
        }

        return Err(String::from_utf8_lossy(&log).trim_end_matches('\0').into());
    }

    Ok(id)
}

fn program_log(id: u32) -> String {
    let mut len = 0;
    unsafe {
        gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut i32);
    }

    let mut log = vec![0_u8; len as usize];
    unsafe {
        gl::GetProgramInfoLog(id, len, ptr::null_mut(), log.as_mut_ptr() as *mut c_char);
    }

    String::from_utf8_lossy(&log).trim_end_matches('\0').into()
}
