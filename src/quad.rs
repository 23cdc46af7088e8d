use cgmath::{Deg, Matrix4};

/// Vertex layout: position.xy, color.rgb, texcoord.uv
pub const VERTEX_STRIDE: usize = 7;

#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 28] = [
    -0.5,  0.5,   1.0, 0.0, 0.0,   0.0, 0.0, // top left
     0.5,  0.5,   0.0, 1.0, 0.0,   1.0, 0.0, // top right
     0.5, -0.5,   0.0, 0.0, 1.0,   1.0, 1.0, // bottom right
    -0.5, -0.5,   1.0, 1.0, 1.0,   0.0, 1.0, // bottom left
];

#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// Spin transform for a given point in time, half a turn per second
/// around the Z axis.
pub fn rotation(elapsed_secs: f32) -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(elapsed_secs * 180.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn matrix_approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();

        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    #[test]
    fn vertices_form_unit_square_around_origin() {
        assert_eq!(QUAD_VERTICES.len() % VERTEX_STRIDE, 0);

        let positions: Vec<(f32, f32)> = QUAD_VERTICES
            .chunks_exact(VERTEX_STRIDE)
            .map(|v| (v[0], v[1]))
            .collect();

        assert_eq!(
            positions,
            [(-0.5, 0.5), (0.5, 0.5), (0.5, -0.5), (-0.5, -0.5)]
        );
    }

    #[test]
    fn indices_cover_quad_with_two_triangles() {
        let vertex_count = QUAD_VERTICES.len() / VERTEX_STRIDE;

        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < vertex_count));
        assert_eq!(&QUAD_INDICES[0..3], &[0, 1, 2]);
        assert_eq!(&QUAD_INDICES[3..6], &[2, 3, 0]);

        // shared diagonal traversed in opposite directions means
        // both triangles wind the same way
        assert_eq!((QUAD_INDICES[0], QUAD_INDICES[2]), (0, 2));
        assert_eq!((QUAD_INDICES[3], QUAD_INDICES[5]), (2, 0));
    }

    #[test]
    fn rotation_starts_at_identity() {
        use cgmath::SquareMatrix;

        assert!(matrix_approx_eq(&rotation(0.0), &Matrix4::identity()));
    }

    #[test]
    fn rotation_reaches_half_turn_after_one_second() {
        #[rustfmt::skip]
        let expected = Matrix4::new(
            -1.0,  0.0, 0.0, 0.0,
             0.0, -1.0, 0.0, 0.0,
             0.0,  0.0, 1.0, 0.0,
             0.0,  0.0, 0.0, 1.0,
        );

        assert!(matrix_approx_eq(&rotation(1.0), &expected));
    }

    #[test]
    fn rotation_angle_scales_linearly_with_time() {
        // quarter turn at 0.5 s
        let m = rotation(0.5);

        assert!((m[0][0] - 0.0).abs() < EPSILON);
        assert!((m[0][1] - 1.0).abs() < EPSILON);
        assert!((m[1][0] - (-1.0)).abs() < EPSILON);
        assert!((m[1][1] - 0.0).abs() < EPSILON);
    }
}
