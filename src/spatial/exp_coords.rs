//! Exponential coordinates of rigid transforms and their time derivatives.
//!
//! A transform `(R, p)` is parameterized by `ϕ = [ϕ_ω; ϕ_v]` with
//! `R = exp([ϕ_ω×])` and `p = J_l(ϕ_ω) ϕ_v`, where `J_l` is the left Jacobian
//! of SO(3). Velocities are body twists `(ω, v)` of `from` relative to `to`,
//! expressed in `from`.

use super::{CartesianFrame3D, Scalar, Transform3D, Twist, framecheck, lit};
use nalgebra::{Matrix3, UnitQuaternion, Vector3, Vector6};

/// Below this rotation angle the coefficients use their Taylor series.
const SERIES_THRESHOLD: f64 = 0.1;

/// SO(3) Jacobian coefficients at rotation angle `θ`:
///
/// * `a = (1 - cos θ) / θ²`
/// * `b = (θ - sin θ) / θ³`
/// * `c = 1/θ² - sin θ / (2θ (1 - cos θ))`
/// * `d = c'(θ) / θ`
struct Coefficients<T> {
    a: T,
    b: T,
    c: T,
    d: T,
}

impl<T: Scalar> Coefficients<T> {
    fn at(theta: T) -> Self {
        if theta < lit::<T>(SERIES_THRESHOLD) {
            let t2 = theta * theta;
            let t4 = t2 * t2;
            Self {
                a: lit::<T>(0.5) - t2 / lit(24.0) + t4 / lit(720.0),
                b: lit::<T>(1.0 / 6.0) - t2 / lit(120.0) + t4 / lit(5040.0),
                c: lit::<T>(1.0 / 12.0) + t2 / lit(720.0) + t4 / lit(30240.0),
                d: lit::<T>(1.0 / 360.0) + t2 / lit(7560.0),
            }
        } else {
            let (s, co) = theta.sin_cos();
            let k = T::one() - co;
            let t2 = theta * theta;
            let t3 = t2 * theta;
            let half: T = lit(0.5);
            let two: T = lit(2.0);
            let dc = -two / t3 - half * (theta * k * co - s * k - theta * s * s) / (t2 * k * k);
            Self {
                a: k / t2,
                b: (theta - s) / t3,
                c: T::one() / t2 - s / (two * theta * k),
                d: dc / theta,
            }
        }
    }
}

/// `J_l = I + a[ϕ×] + b[ϕ×]²`
fn left_jacobian<T: Scalar>(k: &Coefficients<T>, hat: &Matrix3<T>) -> Matrix3<T> {
    Matrix3::identity() + hat * k.a + hat * hat * k.b
}

/// `J_r = I - a[ϕ×] + b[ϕ×]²`
fn right_jacobian<T: Scalar>(k: &Coefficients<T>, hat: &Matrix3<T>) -> Matrix3<T> {
    Matrix3::identity() - hat * k.a + hat * hat * k.b
}

fn left_jacobian_inv<T: Scalar>(k: &Coefficients<T>, hat: &Matrix3<T>) -> Matrix3<T> {
    Matrix3::identity() - hat * lit::<T>(0.5) + hat * hat * k.c
}

fn right_jacobian_inv<T: Scalar>(k: &Coefficients<T>, hat: &Matrix3<T>) -> Matrix3<T> {
    Matrix3::identity() + hat * lit::<T>(0.5) + hat * hat * k.c
}

/// Time derivative of `J_l⁻¹(ϕ)` along `ϕ̇`.
fn left_jacobian_inv_dot<T: Scalar>(
    k: &Coefficients<T>,
    phi: &Vector3<T>,
    phid: &Vector3<T>,
) -> Matrix3<T> {
    let hat = phi.cross_matrix();
    let hatd = phid.cross_matrix();
    -hatd * lit::<T>(0.5) + hat * hat * (k.d * phi.dot(phid)) + (hatd * hat + hat * hatd) * k.c
}

fn split<T: Scalar>(v: &Vector6<T>) -> (Vector3<T>, Vector3<T>) {
    (v.fixed_rows::<3>(0).into_owned(), v.fixed_rows::<3>(3).into_owned())
}

fn stack<T: Scalar>(angular: &Vector3<T>, linear: &Vector3<T>) -> Vector6<T> {
    let mut out = Vector6::zeros();
    out.fixed_rows_mut::<3>(0).copy_from(angular);
    out.fixed_rows_mut::<3>(3).copy_from(linear);
    out
}

/// Exponential coordinates `ϕ` of `tf` and their time derivative `ϕ̇` given
/// the body twist of `tf.from` relative to `tf.to`, expressed in `tf.from`.
pub fn log_with_time_derivative<T: Scalar>(
    tf: &Transform3D<T>,
    twist: &Twist<T>,
) -> (Vector6<T>, Vector6<T>) {
    framecheck!(twist.body, tf.from);
    framecheck!(twist.base, tf.to);
    framecheck!(twist.frame, tf.from);

    let phi_w = tf.rotation().scaled_axis();
    let k = Coefficients::at(phi_w.norm());
    let hat = phi_w.cross_matrix();
    let jl_inv = left_jacobian_inv(&k, &hat);
    let p = tf.translation();
    let phi_v = jl_inv * p;

    let phid_w = right_jacobian_inv(&k, &hat) * twist.angular;
    let phid_v = left_jacobian_inv_dot(&k, &phi_w, &phid_w) * p
        + jl_inv * (tf.rotation() * twist.linear);

    (stack(&phi_w, &phi_v), stack(&phid_w, &phid_v))
}

/// Inverse of [`log_with_time_derivative`]: the transform `from → to` with
/// exponential coordinates `phi`, and the body twist that makes them evolve
/// at rate `phid`.
pub fn exp_with_time_derivative<T: Scalar>(
    from: CartesianFrame3D,
    to: CartesianFrame3D,
    phi: &Vector6<T>,
    phid: &Vector6<T>,
) -> (Transform3D<T>, Twist<T>) {
    let (phi_w, phi_v) = split(phi);
    let (phid_w, phid_v) = split(phid);

    let rotation = UnitQuaternion::from_scaled_axis(phi_w);
    let k = Coefficients::at(phi_w.norm());
    let hat = phi_w.cross_matrix();
    let p = left_jacobian(&k, &hat) * phi_v;

    let angular = right_jacobian(&k, &hat) * phid_w;
    let p_dot = left_jacobian(&k, &hat) * (phid_v - left_jacobian_inv_dot(&k, &phi_w, &phid_w) * p);
    let linear = rotation.inverse() * p_dot;

    (
        Transform3D::new(from, to, rotation, p),
        Twist::new(from, to, from, angular, linear),
    )
}
