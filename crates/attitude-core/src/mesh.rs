/// Two triangles over a four-vertex quad, shared by both meshes.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A static quad in NDC.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadMesh {
    pub label: &'static str,
    pub vertices: [[f32; 2]; 4],
}

/// Upper half: y in [0, 1].
pub const SKY: QuadMesh = QuadMesh {
    label: "sky",
    vertices: [[-1.0, 0.0], [1.0, 0.0], [1.0, 1.0], [-1.0, 1.0]],
};

/// Lower half: y in [-1, 0].
pub const GROUND: QuadMesh = QuadMesh {
    label: "ground",
    vertices: [[-1.0, 0.0], [1.0, 0.0], [1.0, -1.0], [-1.0, -1.0]],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn y_range(m: &QuadMesh) -> (f32, f32) {
        let ys = m.vertices.iter().map(|v| v[1]);
        let min = ys.clone().fold(f32::INFINITY, f32::min);
        let max = ys.fold(f32::NEG_INFINITY, f32::max);
        (min, max)
    }

    #[test]
    fn sky_covers_upper_half() {
        assert_eq!(y_range(&SKY), (0.0, 1.0));
    }

    #[test]
    fn ground_covers_lower_half() {
        assert_eq!(y_range(&GROUND), (-1.0, 0.0));
    }

    #[test]
    fn meshes_share_the_horizon_edge() {
        assert_eq!(SKY.vertices[0], GROUND.vertices[0]);
        assert_eq!(SKY.vertices[1], GROUND.vertices[1]);
    }

    #[test]
    fn indices_reference_all_four_vertices() {
        for v in 0..4u32 {
            assert!(QUAD_INDICES.contains(&v));
        }
        assert!(QUAD_INDICES.iter().all(|&i| i < 4));
    }
}
