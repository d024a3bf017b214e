//! 3D vector arithmetic on plain `[f64; 3]` arrays.
//!
//! Free functions rather than an operator-overloaded type: the growth code
//! composes a handful of weighted sums per step and reads closest to the
//! model equations when each operation is spelled out.

/// A 3D vector or point.
pub type Vec3 = [f64; 3];

/// The zero vector.
pub const ZERO: Vec3 = [0.0, 0.0, 0.0];

/// Component-wise sum `a + b`.
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Component-wise difference `a - b`.
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Scale every component of `v` by `k`.
pub fn scalar_mult(k: f64, v: Vec3) -> Vec3 {
    [k * v[0], k * v[1], k * v[2]]
}

/// Dot product.
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a × b`.
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean length.
pub fn norm(v: Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Unit vector along `v`. The zero vector is returned unchanged.
pub fn normalize(v: Vec3) -> Vec3 {
    let n = norm(v);
    if n == 0.0 {
        return v;
    }
    scalar_mult(1.0 / n, v)
}

/// Rotate `v` by `theta` radians around `axis` (Rodrigues' formula).
///
/// The axis does not need to be normalized. Positive angles follow the
/// right-hand rule.
pub fn rot_around_axis(v: Vec3, theta: f64, axis: Vec3) -> Vec3 {
    let naxis = normalize(axis);
    let parallel = scalar_mult(dot(v, naxis), naxis);
    let radial = scalar_mult((-theta).cos(), sub(v, parallel));
    let tangent = scalar_mult((-theta).sin(), cross(v, naxis));
    add(add(parallel, radial), tangent)
}

/// Unit vector perpendicular to `a`, spun around `a` by an angle
/// proportional to `rand`.
///
/// `rand` is normally a uniform draw in `[0, 1)`; the spin angle is
/// `6.35 * rand`, which covers a full turn.
pub fn perp3(a: Vec3, rand: f64) -> Vec3 {
    let start = if a[0] == 0.0 {
        [1.0, 0.0, 0.0]
    } else {
        normalize([a[1], -a[0], 0.0])
    };
    rot_around_axis(start, 6.35 * rand, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < EPS)
    }

    #[test]
    fn basic_ops() {
        assert_eq!(add([1.0, 2.0, 3.0], [1.0, 1.0, 1.0]), [2.0, 3.0, 4.0]);
        assert_eq!(sub([1.0, 2.0, 3.0], [1.0, 1.0, 1.0]), [0.0, 1.0, 2.0]);
        assert_eq!(scalar_mult(3.0, [0.0, 0.0, 1.0]), [0.0, 0.0, 3.0]);
        assert_eq!(dot([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]), 32.0);
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(norm([3.0, 4.0, 0.0]), 5.0);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(ZERO), ZERO);
    }

    #[test]
    fn rotation_by_zero_is_identity() {
        let v = [0.3, -1.2, 2.0];
        assert!(approx(rot_around_axis(v, 0.0, [0.0, 0.0, 1.0]), v));
    }

    #[test]
    fn quarter_turn_around_z() {
        let r = rot_around_axis([1.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2, [0.0, 0.0, 1.0]);
        assert!(approx(r, [0.0, 1.0, 0.0]), "got {r:?}");
    }

    #[test]
    fn perp3_of_z_axis_starts_on_x() {
        assert!(approx(perp3([0.0, 0.0, 1.0], 0.0), [1.0, 0.0, 0.0]));
    }

    proptest! {
        #[test]
        fn perp3_is_perpendicular_unit(
            x in -10.0f64..10.0, y in -10.0f64..10.0, z in -10.0f64..10.0,
            r in 0.0f64..1.0,
        ) {
            let a = [x, y, z];
            prop_assume!(norm(a) > 1e-3);
            let p = perp3(a, r);
            prop_assert!(dot(p, normalize(a)).abs() < 1e-9);
            prop_assert!((norm(p) - 1.0).abs() < 1e-9);
        }

        #[test]
        fn rotation_preserves_length(
            x in -10.0f64..10.0, y in -10.0f64..10.0, z in -10.0f64..10.0,
            theta in -6.3f64..6.3,
        ) {
            let v = [x, y, z];
            let r = rot_around_axis(v, theta, [0.2, 1.0, -0.4]);
            prop_assert!((norm(r) - norm(v)).abs() < 1e-9);
        }
    }
}
