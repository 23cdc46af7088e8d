use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn build(self) -> Result<Geometry, GeometryError> {
        let stride: usize = self.attributes.iter().map(|a| a.size()).sum();

        if stride == 0 || self.data.len() % stride != 0 {
            return Err(GeometryError::InvalidDataLength);
        }

        let vertices = self.data.len() / stride;

        if let Some(indices) = self.indices {
            if indices.iter().any(|&i| i as usize >= vertices) {
                return Err(GeometryError::IndexOutOfRange);
            }
        }

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = None;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.data.len() * std::mem::size_of::<f32>()) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (stride * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }

            if let Some(indices) = self.indices {
                let mut id = 0;
                gl::GenBuffers(1, (&mut id) as *mut u32);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    (indices.len() * std::mem::size_of::<u32>()) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
                ebo = Some(id);
            }

            // the element buffer binding lives in the VAO, so unbind that first
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        }

        let index_count = self.indices.map(|i| i.len());

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            vertices,
            index_count,
        })
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Index refers to a vertex outside the buffer")]
    IndexOutOfRange,
}

pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    index_count: Option<usize>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn index_count(&self) -> Option<usize> {
        self.index_count
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, (&ebo) as *const u32);
            }
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // error paths below return before any GL call is made,
    // so no context is needed

    #[test]
    fn rejects_data_not_matching_stride() {
        let data = [0.0_f32; 27];

        let res = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec2)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec2)
            .build();

        assert!(matches!(res, Err(GeometryError::InvalidDataLength)));
    }

    #[test]
    fn rejects_empty_attribute_list() {
        let data = [0.0_f32; 8];

        let res = GeometryBuilder::new(&data).build();

        assert!(matches!(res, Err(GeometryError::InvalidDataLength)));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let data = [0.0_f32; 8];

        let res = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&[0, 1, 2, 2, 3, 4])
            .build();

        assert!(matches!(res, Err(GeometryError::IndexOutOfRange)));
    }
}
