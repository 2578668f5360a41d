use crate::core::types::{Colour, Number, Vector3};

/// Calculates the vector reflection of vector `d` across the surface normal `n`
pub fn reflect(d: Vector3, n: Vector3) -> Vector3 { d - n * (2. * d.dot(n)) }

/// Perceptual (Rec. 601) luminance of a colour
pub fn luminance(c: Colour) -> Number { (0.299 * c.x) + (0.587 * c.y) + (0.114 * c.z) }

/// Your standard linear interpolation function
pub fn lerp(a: Colour, b: Colour, t: Number) -> Colour { a + (b - a) * t }

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflect_mirrors_about_normal() {
        let r = reflect(Vector3::new(1., -1., 0.), Vector3::Y);
        assert_relative_eq!(r, Vector3::new(1., 1., 0.));
    }

    #[test]
    fn luminance_weights_sum_to_one() {
        assert_relative_eq!(luminance(Colour::ONE), 1., epsilon = 1e-12);
        assert_relative_eq!(luminance(Colour::new(0., 1., 0.)), 0.587);
    }
}
