use crate::orientation::Orientation;

/// Pitch that shifts the horizon by one full NDC unit.
pub const PITCH_FULL_SCALE_DEGREES: f32 = 90.0;

/// Homogeneous 4x4 transform, stored as four columns.
///
/// Layout matches WGSL `mat4x4<f32>` so `to_cols_array` can be uploaded
/// without reordering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    cols: [[f32; 4]; 4],
}

impl Transform {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Builds the horizon transform with the default pitch scale.
    #[inline]
    pub fn from_orientation(orientation: Orientation) -> Self {
        Self::with_pitch_scale(orientation, PITCH_FULL_SCALE_DEGREES)
    }

    /// Roll rotates the X/Y basis in-plane; pitch translates along Y by
    /// `pitch / full_scale`.
    ///
    /// Positive roll is counter-clockwise: roll 90 maps `(1, 0)` to `(0, 1)`.
    pub fn with_pitch_scale(orientation: Orientation, full_scale: f32) -> Self {
        let (sin, cos) = orientation.roll.to_radians().sin_cos();
        let translate_y = orientation.pitch / full_scale;

        Self {
            cols: [
                [cos, sin, 0.0, 0.0],
                [-sin, cos, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, translate_y, 0.0, 1.0],
            ],
        }
    }

    #[inline]
    pub fn cols(&self) -> &[[f32; 4]; 4] {
        &self.cols
    }

    /// Flattens to 16 floats, column-major.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        out
    }

    /// Top-left 2x2 block as columns.
    #[inline]
    pub fn rotation(&self) -> [[f32; 2]; 2] {
        [
            [self.cols[0][0], self.cols[0][1]],
            [self.cols[1][0], self.cols[1][1]],
        ]
    }

    #[inline]
    pub fn translation_y(&self) -> f32 {
        self.cols[3][1]
    }

    /// Transforms a 2D point (z = 0, w = 1).
    pub fn apply(&self, p: [f32; 2]) -> [f32; 2] {
        let [x, y] = p;
        [
            self.cols[0][0] * x + self.cols[1][0] * y + self.cols[3][0],
            self.cols[0][1] * x + self.cols[1][1] * y + self.cols[3][1],
        ]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPS
    }

    fn rotation_close(a: [[f32; 2]; 2], b: [[f32; 2]; 2]) -> bool {
        a.iter().flatten().zip(b.iter().flatten()).all(|(x, y)| close(*x, *y))
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn level_is_identity() {
        assert_eq!(Transform::from_orientation(Orientation::LEVEL), Transform::IDENTITY);
    }

    #[test]
    fn cols_array_is_column_major() {
        let t = Transform::from_orientation(Orientation::new(45.0, 0.0));
        let a = t.to_cols_array();
        // Translation lives in the last column.
        assert_eq!(a[13], 0.5);
        assert_eq!(a[12], 0.0);
        assert_eq!(a[15], 1.0);
    }

    // ── pitch ─────────────────────────────────────────────────────────────

    #[test]
    fn pitch_90_translates_one_unit() {
        let t = Transform::from_orientation(Orientation::new(90.0, 0.0));
        assert_eq!(t.translation_y(), 1.0);
        assert_eq!(t.rotation(), [[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(t.apply([0.0, 0.0]), [0.0, 1.0]);
    }

    #[test]
    fn translation_is_pitch_over_90_regardless_of_roll() {
        for pitch in [-1000.0, -90.0, -0.5, 0.0, 0.5, 33.0, 180.0, 12345.5] {
            for roll in [0.0, 17.0, 90.0, -250.0, 720.5] {
                let t = Transform::from_orientation(Orientation::new(pitch, roll));
                assert_eq!(t.translation_y(), pitch / 90.0, "pitch={pitch} roll={roll}");
                assert_eq!(t.cols()[3][0], 0.0);
            }
        }
    }

    #[test]
    fn extreme_pitch_moves_geometry_off_screen() {
        let t = Transform::from_orientation(Orientation::new(360.0, 0.0));
        let [_, y] = t.apply([0.0, -1.0]);
        assert!(y > 1.0);
    }

    #[test]
    fn custom_pitch_scale() {
        let t = Transform::with_pitch_scale(Orientation::new(30.0, 0.0), 60.0);
        assert_eq!(t.translation_y(), 0.5);
    }

    // ── roll ──────────────────────────────────────────────────────────────

    #[test]
    fn roll_90_maps_x_to_y() {
        let t = Transform::from_orientation(Orientation::new(0.0, 90.0));
        let [x, y] = t.apply([1.0, 0.0]);
        assert!(close(x, 0.0) && close(y, 1.0), "got ({x}, {y})");
        assert_eq!(t.translation_y(), 0.0);
    }

    #[test]
    fn roll_is_periodic_in_360() {
        for roll in [-720.0, -45.5, 0.0, 0.5, 30.0, 90.0, 179.5, 271.0] {
            let a = Transform::from_orientation(Orientation::new(0.0, roll)).rotation();
            let b = Transform::from_orientation(Orientation::new(0.0, roll + 360.0)).rotation();
            assert!(rotation_close(a, b), "roll={roll}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn rotation_is_orthonormal() {
        let r = Transform::from_orientation(Orientation::new(12.0, 33.3)).rotation();
        let det = r[0][0] * r[1][1] - r[1][0] * r[0][1];
        assert!(close(det, 1.0));
        assert!(close(r[0][0] * r[1][0] + r[0][1] * r[1][1], 0.0));
    }

    #[test]
    fn z_and_w_axes_are_identity() {
        let t = Transform::from_orientation(Orientation::new(-20.0, 140.0));
        assert_eq!(t.cols()[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(t.cols()[3][2], 0.0);
        assert_eq!(t.cols()[3][3], 1.0);
    }
}
