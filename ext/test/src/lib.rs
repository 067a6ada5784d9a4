//! casewise-test: Test domain for conformance testing
//!
//! Provides small domain types with hand-written [`ToValue`] impls and a
//! custom value, for exercising chains against user-defined data. This is
//! the reference extension that shows how to plug domain types into
//! deep equality.
//!
//! # Example
//!
//! ```
//! use casewise_test::prelude::*;
//!
//! let quadrant = matcher(Point::new(0, 0))
//!     .case(Point::ORIGIN, |_| "origin")
//!     .case_guarded(|p| p.x > 0 && p.y > 0, |_| "first")
//!     .default(|_| "elsewhere")
//!     .exec();
//! assert_eq!(quadrant, Ok("origin"));
//! ```

use casewise::{CustomValue, ToValue, Value};
use std::any::Any;
use std::sync::Arc;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// A point on an integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl ToValue for Point {
    fn to_value(&self) -> Value {
        Value::named("Point", [("x", self.x.to_value()), ("y", self.y.to_value())])
    }
}

/// A shape with one variant per record flavour (named, positional, unit).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: u32 },
    Rect(Point, Point),
    Empty,
}

impl ToValue for Shape {
    fn to_value(&self) -> Value {
        match self {
            Self::Circle { center, radius } => Value::named(
                "Shape::Circle",
                [("center", center.to_value()), ("radius", radius.to_value())],
            ),
            Self::Rect(a, b) => Value::positional("Shape::Rect", [a.to_value(), b.to_value()]),
            Self::Empty => Value::unit("Shape::Empty"),
        }
    }
}

/// An opaque identifier compared case-insensitively.
///
/// Stored in [`Value::Custom`]; deep equality asks
/// [`CustomValue::structural_eq`] instead of comparing allocations.
#[derive(Debug, Clone)]
pub struct Token(pub String);

impl CustomValue for Token {
    fn custom_type_name(&self) -> &'static str {
        "Token"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn structural_eq(&self, other: &dyn CustomValue) -> Option<bool> {
        other
            .as_any()
            .downcast_ref::<Token>()
            .map(|t| t.0.eq_ignore_ascii_case(&self.0))
    }
}

impl ToValue for Token {
    fn to_value(&self) -> Value {
        Value::Custom(Arc::new(self.clone()))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{Point, Shape, Token};
    pub use casewise::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use casewise::{deep_equal, matcher, Customizer, Path, Verdict};

    #[test]
    fn point_matches_structurally() {
        let result = matcher(Point::new(3, 4))
            .case(Point::new(4, 3), |_| "swapped")
            .case(Point::new(3, 4), |p| if p.x == 3 { "same" } else { "?" })
            .exec();
        assert_eq!(result, Ok("same"));
    }

    #[test]
    fn shape_variants() {
        let classify = |s: Shape| {
            matcher(s)
                .case(Shape::Empty, |_| "empty")
                .case_guarded(|s| matches!(s, Shape::Circle { .. }), |_| "circle")
                .case(Shape::Rect(Point::ORIGIN, Point::new(1, 1)), |_| "unit square")
                .exec()
        };
        assert_eq!(classify(Shape::Empty), Ok("empty"));
        assert_eq!(
            classify(Shape::Circle {
                center: Point::ORIGIN,
                radius: 2
            }),
            Ok("circle")
        );
        assert_eq!(
            classify(Shape::Rect(Point::ORIGIN, Point::new(1, 1))),
            Ok("unit square")
        );
        assert!(classify(Shape::Rect(Point::ORIGIN, Point::new(2, 2))).is_err());
    }

    #[test]
    fn token_uses_structural_eq() {
        assert!(deep_equal(
            &Token("ABC".into()).to_value(),
            &Token("abc".into()).to_value()
        ));
        assert!(!deep_equal(
            &Token("abc".into()).to_value(),
            &Token("abd".into()).to_value()
        ));
    }

    #[test]
    fn tokens_inside_composites() {
        let result = matcher(vec![Token("Admin".into()), Token("ops".into())])
            .case(vec![Token("admin".into())], |_| "admin only")
            .case(vec![Token("ADMIN".into()), Token("OPS".into())], |_| "admin and ops")
            .exec();
        assert_eq!(result, Ok("admin and ops"));
    }

    #[test]
    fn customizer_ignores_radius() {
        struct IgnoreRadius;
        impl Customizer for IgnoreRadius {
            fn compare(&self, _: &Value, _: &Value, path: &Path) -> Verdict {
                if path.ends_with_name("radius") {
                    Verdict::Equal
                } else {
                    Verdict::Defer
                }
            }
        }

        let circle = |r| Shape::Circle {
            center: Point::ORIGIN,
            radius: r,
        };
        let result = matcher(circle(5))
            .case(circle(1), |_| "exact")
            .case_with(circle(1), |_| "centered", IgnoreRadius)
            .exec();
        assert_eq!(result, Ok("centered"));
    }
}
