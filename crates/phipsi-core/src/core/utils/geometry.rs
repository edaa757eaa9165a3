use nalgebra::Point3;

/// Wraps an angle in degrees into the half-open range (-180, 180].
///
/// Non-finite input is returned unchanged.
pub fn normalize_angle(angle_degrees: f64) -> f64 {
    if !angle_degrees.is_finite() {
        return angle_degrees;
    }
    let angle = angle_degrees.rem_euclid(360.0);
    if angle > 180.0 { angle - 360.0 } else { angle }
}

/// Signed torsion angle in degrees defined by four points.
///
/// A right-handed rotation from the 1-2-3 plane to the 2-3-4 plane is positive (IUPAC
/// convention). The result lies in [-180, 180]; callers that need the half-open range wrap
/// it with [`normalize_angle`].
pub fn dihedral_degrees(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);

    y.atan2(x).to_degrees()
}

pub fn distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p2).norm()
}
