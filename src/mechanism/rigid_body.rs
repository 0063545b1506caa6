use crate::spatial::{CartesianFrame3D, Scalar, SpatialInertia, Transform3D};
use std::fmt;

/// A rigid body: a default frame, optional inertia, and the definitions of
/// additional frames fixed to it.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody<T: Scalar> {
    name: String,
    frame: CartesianFrame3D,
    inertia: Option<SpatialInertia<T>>,
    /// Transforms from each additional body-fixed frame to `frame`.
    frame_definitions: Vec<Transform3D<T>>,
}

impl<T: Scalar> RigidBody<T> {
    /// A massless body with a fresh default frame.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_frame(name, CartesianFrame3D::new())
    }

    pub fn with_frame(name: impl Into<String>, frame: CartesianFrame3D) -> Self {
        Self {
            name: name.into(),
            frame,
            inertia: None,
            frame_definitions: Vec::new(),
        }
    }

    /// Sets the inertia, which must be expressed in the default frame.
    pub fn with_inertia(mut self, inertia: SpatialInertia<T>) -> Self {
        self.inertia = Some(inertia);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[inline]
    pub fn inertia(&self) -> Option<&SpatialInertia<T>> {
        self.inertia.as_ref()
    }

    #[inline]
    pub fn frame_definitions(&self) -> &[Transform3D<T>] {
        &self.frame_definitions
    }

    /// Transform from `frame` to the default frame, if `frame` is fixed to this body.
    pub fn frame_definition(&self, frame: CartesianFrame3D) -> Option<Transform3D<T>> {
        if frame == self.frame {
            return Some(Transform3D::identity(frame, frame));
        }
        self.frame_definitions
            .iter()
            .find(|tf| tf.from == frame)
            .copied()
    }

    /// Default frame followed by the additional frames, in definition order.
    pub fn frames(&self) -> impl Iterator<Item = CartesianFrame3D> + '_ {
        std::iter::once(self.frame).chain(self.frame_definitions.iter().map(|tf| tf.from))
    }

    pub(crate) fn push_frame_definition(&mut self, tf: Transform3D<T>) {
        debug_assert_eq!(tf.to, self.frame);
        self.frame_definitions.push(tf);
    }
}

impl<T: Scalar> fmt::Display for RigidBody<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
